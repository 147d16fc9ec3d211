#![forbid(unsafe_code)]

//! YAML component

use crate::builder::{Builder, ConfigSpec};
use crate::catalog::{BundledCatalog, CatalogRule, RuleCatalog};
use crate::component::{Component, ComponentOutput};
use crate::context::ComponentContext;
use crate::error::ComposeError;
use crate::fragment::RuleEntry;
use crate::globs::GLOB_YAML;
use crate::options::{OptionPatch, is_enabled, resolve_options};
use crate::types::{GlobPattern, RuleId, Severity};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

/// Fully-resolved options for the yaml component
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YamlOptions {
    pub files: Vec<GlobPattern>,
    pub overrides: BTreeMap<RuleId, RuleEntry>,
}

impl Default for YamlOptions {
    fn default() -> Self {
        Self {
            files: vec![GlobPattern::new(GLOB_YAML)],
            overrides: BTreeMap::new(),
        }
    }
}

/// Caller-supplied partial options for the yaml component
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YamlPatch {
    pub files: Option<Vec<GlobPattern>>,
    pub overrides: Option<BTreeMap<RuleId, RuleEntry>>,
}

impl OptionPatch for YamlPatch {
    type Resolved = YamlOptions;

    fn apply(self, mut base: YamlOptions) -> YamlOptions {
        if let Some(files) = self.files {
            base.files = files;
        }
        if let Some(overrides) = self.overrides {
            base.overrides = overrides;
        }
        base
    }
}

fn yaml_catalog() -> RuleCatalog {
    RuleCatalog::new("yaml")
        .rule(CatalogRule::new("no-empty-document", Severity::Error))
        .rule(CatalogRule::new("no-empty-key", Severity::Error))
        .rule(CatalogRule::new("no-irregular-whitespace", Severity::Error))
        .rule(CatalogRule::new("indent", Severity::Warn).options(vec![json!(2)]))
}

/// The YAML component
pub struct Yaml;

#[async_trait]
impl Component for Yaml {
    fn name(&self) -> &'static str {
        "yaml"
    }

    async fn configure(
        &self,
        ctx: &ComponentContext,
    ) -> Result<Option<ComponentOutput>, ComposeError> {
        let resolved = resolve_options(&ctx.options.yaml, YamlOptions::default());
        if !is_enabled(&ctx.options.yaml, true) {
            return ComponentOutput::disabled(self.name(), &resolved).map(Some);
        }

        let loader = BundledCatalog::new("yaml", yaml_catalog);
        let catalog = ctx.catalogs.get_or_load(&loader).await?;

        let mut builder = Builder::active(self.name(), resolved.files.clone());
        builder
            .add_config(
                ConfigSpec::new("flatkit/yaml/rules")
                    .language_options(json!({"parser": "yaml-eslint-parser"})),
            )
            .add_catalog(&catalog, None)
            .add_overrides(&resolved.overrides);

        ComponentOutput::enabled(self.name(), &resolved, builder.finish()).map(Some)
    }
}
