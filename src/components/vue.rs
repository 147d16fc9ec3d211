#![forbid(unsafe_code)]

//! Vue component
//!
//! The installed `vue` package is a hard prerequisite: without it the
//! component contributes nothing at all. Runs after the typescript
//! component and reads its enabled state to decide whether single-file
//! components get the TypeScript parser and the typed-blocks rule.

use crate::builder::{Builder, ConfigSpec, Selector};
use crate::catalog::{BundledCatalog, CatalogRule, RuleCatalog};
use crate::component::{Component, ComponentOutput};
use crate::context::ComponentContext;
use crate::error::{CatalogError, ComposeError};
use crate::fragment::RuleEntry;
use crate::globs::GLOB_VUE;
use crate::options::{OptionPatch, explicit_enabled, resolve_options};
use crate::types::{GlobPattern, RuleId, Severity};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

/// Fully-resolved options for the vue component
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VueOptions {
    /// File selector; defaults to single-file components
    pub files: Vec<GlobPattern>,

    /// Raw rule overrides merged last into the emitted fragment
    pub overrides: BTreeMap<RuleId, RuleEntry>,
}

impl Default for VueOptions {
    fn default() -> Self {
        Self {
            files: vec![GlobPattern::new(GLOB_VUE)],
            overrides: BTreeMap::new(),
        }
    }
}

/// Caller-supplied partial options for the vue component
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VuePatch {
    pub files: Option<Vec<GlobPattern>>,
    pub overrides: Option<BTreeMap<RuleId, RuleEntry>>,
}

impl OptionPatch for VuePatch {
    type Resolved = VueOptions;

    fn apply(self, mut base: VueOptions) -> VueOptions {
        if let Some(files) = self.files {
            base.files = files;
        }
        if let Some(overrides) = self.overrides {
            base.overrides = overrides;
        }
        base
    }
}

fn vue_catalog() -> RuleCatalog {
    RuleCatalog::new("vue")
        .rule(CatalogRule::new("require-v-for-key", Severity::Error))
        .rule(CatalogRule::new("no-unused-refs", Severity::Error))
        .rule(CatalogRule::new("no-dupe-keys", Severity::Error))
        .rule(CatalogRule::new("multi-word-component-names", Severity::Warn))
        // Vue 3 API surface only
        .rule(CatalogRule::new("prefer-import-from-vue", Severity::Error).min_major(3))
        .rule(CatalogRule::new("no-deprecated-slot-attribute", Severity::Error).min_major(3))
        .rule(CatalogRule::new("no-setup-props-reactivity-loss", Severity::Error).min_major(3))
}

/// The Vue single-file-component component
pub struct Vue;

#[async_trait]
impl Component for Vue {
    fn name(&self) -> &'static str {
        "vue"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["typescript"]
    }

    async fn configure(
        &self,
        ctx: &ComponentContext,
    ) -> Result<Option<ComponentOutput>, ComposeError> {
        let resolved = resolve_options(&ctx.options.vue, VueOptions::default());
        if explicit_enabled(&ctx.options.vue) == Some(false) {
            return ComponentOutput::disabled(self.name(), &resolved).map(Some);
        }

        let probe = ctx.probe.clone();
        let loader =
            BundledCatalog::gated("vue", vue_catalog, move || probe.is_installed("vue"));
        let catalog = match ctx.catalogs.get_or_load(&loader).await {
            Ok(catalog) => catalog,
            // Hard prerequisite absent: no result at all
            Err(CatalogError::NotInstalled(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let typescript_enabled = ctx.is_enabled("typescript");
        let template_parser = if typescript_enabled {
            json!({
                "parser": "vue-eslint-parser",
                "parserOptions": {"parser": "@typescript-eslint/parser", "extraFileExtensions": [".vue"]}
            })
        } else {
            json!({"parser": "vue-eslint-parser"})
        };

        let mut builder = Builder::active(self.name(), resolved.files.clone());
        builder
            .add_config(
                ConfigSpec::new("flatkit/vue/rules")
                    .files(Selector::ComponentDefault)
                    .language_options(template_parser),
            )
            .add_catalog(&catalog, ctx.probe.major("vue"));
        if typescript_enabled {
            // TypeScript-in-templates: only meaningful with the TS layer on
            builder.add_rule_with(
                "vue/block-lang",
                Severity::Error,
                vec![json!({"script": {"lang": "ts"}})],
            );
        }
        builder.add_overrides(&resolved.overrides);

        ComponentOutput::enabled(self.name(), &resolved, builder.finish()).map(Some)
    }
}
