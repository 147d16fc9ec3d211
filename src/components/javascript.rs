#![forbid(unsafe_code)]

//! Base JavaScript component
//!
//! Always first in the pipeline and enabled unless explicitly turned off;
//! every script-scoped component layers on top of the fragment this one
//! emits.

use crate::builder::{Builder, ConfigSpec};
use crate::catalog::{BundledCatalog, CatalogRule, RuleCatalog};
use crate::component::{Component, ComponentOutput};
use crate::context::ComponentContext;
use crate::error::ComposeError;
use crate::fragment::RuleEntry;
use crate::globs::script_globs;
use crate::options::{OptionPatch, is_enabled, resolve_options};
use crate::types::{GlobPattern, RuleId, Severity};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

/// Fully-resolved options for the javascript component
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JavascriptOptions {
    /// File selector; defaults to the script-source glob set
    pub files: Vec<GlobPattern>,

    /// Raw rule overrides merged last into the emitted fragment
    pub overrides: BTreeMap<RuleId, RuleEntry>,
}

impl Default for JavascriptOptions {
    fn default() -> Self {
        Self {
            files: script_globs(),
            overrides: BTreeMap::new(),
        }
    }
}

/// Caller-supplied partial options for the javascript component
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavascriptPatch {
    pub files: Option<Vec<GlobPattern>>,
    pub overrides: Option<BTreeMap<RuleId, RuleEntry>>,
}

impl OptionPatch for JavascriptPatch {
    type Resolved = JavascriptOptions;

    fn apply(self, mut base: JavascriptOptions) -> JavascriptOptions {
        if let Some(files) = self.files {
            base.files = files;
        }
        if let Some(overrides) = self.overrides {
            base.overrides = overrides;
        }
        base
    }
}

fn core_catalog() -> RuleCatalog {
    RuleCatalog::core()
        .rule(CatalogRule::new("eqeqeq", Severity::Error).options(vec![json!("smart")]))
        .rule(CatalogRule::new("no-var", Severity::Error))
        .rule(CatalogRule::new("prefer-const", Severity::Error))
        .rule(CatalogRule::new("no-unused-vars", Severity::Error))
        .rule(CatalogRule::new("no-undef", Severity::Error))
        .rule(CatalogRule::new("no-cond-assign", Severity::Error))
        .rule(CatalogRule::new("no-debugger", Severity::Error))
        .rule(CatalogRule::new("no-console", Severity::Warn).options(vec![json!({"allow": ["warn", "error"]})]))
        .rule(CatalogRule::new("no-unused-expressions", Severity::Error))
}

/// The base JavaScript component
pub struct Javascript;

#[async_trait]
impl Component for Javascript {
    fn name(&self) -> &'static str {
        "javascript"
    }

    async fn configure(
        &self,
        ctx: &ComponentContext,
    ) -> Result<Option<ComponentOutput>, ComposeError> {
        let resolved = resolve_options(&ctx.options.javascript, JavascriptOptions::default());
        if !is_enabled(&ctx.options.javascript, true) {
            return ComponentOutput::disabled(self.name(), &resolved).map(Some);
        }

        let loader = BundledCatalog::new("javascript", core_catalog);
        let catalog = ctx.catalogs.get_or_load(&loader).await?;

        let mut builder = Builder::active(self.name(), resolved.files.clone());
        builder
            .add_config(ConfigSpec::new("flatkit/javascript/rules"))
            .add_catalog(&catalog, None)
            .add_overrides(&resolved.overrides);

        ComponentOutput::enabled(self.name(), &resolved, builder.finish()).map(Some)
    }
}
