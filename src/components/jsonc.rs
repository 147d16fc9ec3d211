#![forbid(unsafe_code)]

//! JSON/JSONC component
//!
//! Lockfiles stay in the global default-ignore set: this component lints
//! hand-written JSON, not generated artifacts, so it never opts the data
//! category back in.

use crate::builder::{Builder, ConfigSpec};
use crate::catalog::{BundledCatalog, CatalogRule, RuleCatalog};
use crate::component::{Component, ComponentOutput};
use crate::context::ComponentContext;
use crate::error::ComposeError;
use crate::fragment::RuleEntry;
use crate::globs::GLOB_JSON;
use crate::options::{OptionPatch, is_enabled, resolve_options};
use crate::types::{GlobPattern, RuleId, Severity};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

/// Fully-resolved options for the jsonc component
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsoncOptions {
    pub files: Vec<GlobPattern>,
    pub overrides: BTreeMap<RuleId, RuleEntry>,
}

impl Default for JsoncOptions {
    fn default() -> Self {
        Self {
            files: vec![GlobPattern::new(GLOB_JSON)],
            overrides: BTreeMap::new(),
        }
    }
}

/// Caller-supplied partial options for the jsonc component
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsoncPatch {
    pub files: Option<Vec<GlobPattern>>,
    pub overrides: Option<BTreeMap<RuleId, RuleEntry>>,
}

impl OptionPatch for JsoncPatch {
    type Resolved = JsoncOptions;

    fn apply(self, mut base: JsoncOptions) -> JsoncOptions {
        if let Some(files) = self.files {
            base.files = files;
        }
        if let Some(overrides) = self.overrides {
            base.overrides = overrides;
        }
        base
    }
}

fn jsonc_catalog() -> RuleCatalog {
    RuleCatalog::new("jsonc")
        .rule(CatalogRule::new("no-dupe-keys", Severity::Error))
        .rule(CatalogRule::new("no-octal", Severity::Error))
        .rule(CatalogRule::new("no-bigint-literals", Severity::Error))
        .rule(CatalogRule::new("sort-keys", Severity::Off))
}

/// The JSON/JSONC component
pub struct Jsonc;

#[async_trait]
impl Component for Jsonc {
    fn name(&self) -> &'static str {
        "jsonc"
    }

    async fn configure(
        &self,
        ctx: &ComponentContext,
    ) -> Result<Option<ComponentOutput>, ComposeError> {
        let resolved = resolve_options(&ctx.options.jsonc, JsoncOptions::default());
        if !is_enabled(&ctx.options.jsonc, true) {
            return ComponentOutput::disabled(self.name(), &resolved).map(Some);
        }

        let loader = BundledCatalog::new("jsonc", jsonc_catalog);
        let catalog = ctx.catalogs.get_or_load(&loader).await?;

        let mut builder = Builder::active(self.name(), resolved.files.clone());
        builder
            .add_config(
                ConfigSpec::new("flatkit/jsonc/rules")
                    .language_options(json!({"parser": "jsonc-eslint-parser"})),
            )
            .add_catalog(&catalog, None)
            .add_overrides(&resolved.overrides);

        ComponentOutput::enabled(self.name(), &resolved, builder.finish()).map(Some)
    }
}
