#![forbid(unsafe_code)]

//! TypeScript component
//!
//! The installed `typescript` package is a hard prerequisite: without it
//! the component contributes nothing at all, even when explicitly enabled.
//! An explicit `false` wins over detection and records a disabled state.
//! The plugin catalog and the parser handle are independent lazy loads, so
//! they run concurrently and are joined before the component proceeds.
//! Type-aware rules are layered in only when the caller points at a
//! tsconfig.

use crate::builder::{Builder, ConfigSpec};
use crate::catalog::{BundledCatalog, CatalogRule, RuleCatalog};
use crate::component::{Component, ComponentOutput};
use crate::context::ComponentContext;
use crate::error::{CatalogError, ComposeError};
use crate::fragment::RuleEntry;
use crate::globs::GLOB_TS;
use crate::options::{OptionPatch, explicit_enabled, resolve_options};
use crate::probe::PeerProbe;
use crate::types::{GlobPattern, RuleId, Severity};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

/// Fully-resolved options for the typescript component
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypescriptOptions {
    /// File selector; defaults to the TypeScript glob set
    pub files: Vec<GlobPattern>,

    /// Path to a tsconfig; setting it turns on the type-aware rule layer
    pub tsconfig_path: Option<String>,

    /// Raw rule overrides merged last into the emitted fragment
    pub overrides: BTreeMap<RuleId, RuleEntry>,
}

impl Default for TypescriptOptions {
    fn default() -> Self {
        Self {
            files: vec![GlobPattern::new(GLOB_TS)],
            tsconfig_path: None,
            overrides: BTreeMap::new(),
        }
    }
}

/// Caller-supplied partial options for the typescript component
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypescriptPatch {
    pub files: Option<Vec<GlobPattern>>,
    pub tsconfig_path: Option<String>,
    pub overrides: Option<BTreeMap<RuleId, RuleEntry>>,
}

impl OptionPatch for TypescriptPatch {
    type Resolved = TypescriptOptions;

    fn apply(self, mut base: TypescriptOptions) -> TypescriptOptions {
        if let Some(files) = self.files {
            base.files = files;
        }
        if let Some(tsconfig_path) = self.tsconfig_path {
            base.tsconfig_path = Some(tsconfig_path);
        }
        if let Some(overrides) = self.overrides {
            base.overrides = overrides;
        }
        base
    }
}

fn plugin_catalog() -> RuleCatalog {
    RuleCatalog::new("ts")
        .rule(CatalogRule::new("no-explicit-any", Severity::Warn))
        .rule(CatalogRule::new("ban-ts-comment", Severity::Error).options(vec![json!({"ts-expect-error": "allow-with-description"})]))
        .rule(CatalogRule::new("consistent-type-imports", Severity::Error).options(vec![json!({"prefer": "type-imports"})]))
        .rule(CatalogRule::new("no-unused-vars", Severity::Error))
        .rule(CatalogRule::new("no-require-imports", Severity::Error))
        .rule(CatalogRule::new("no-import-type-side-effects", Severity::Error))
}

fn type_aware_catalog() -> RuleCatalog {
    RuleCatalog::new("ts")
        .rule(CatalogRule::new("await-thenable", Severity::Error))
        .rule(CatalogRule::new("no-floating-promises", Severity::Error))
        .rule(CatalogRule::new("no-misused-promises", Severity::Error))
        .rule(CatalogRule::new("unbound-method", Severity::Error))
}

/// Resolves the parser handle for the language-options bag
///
/// Modeled as its own capability so it can load concurrently with the
/// plugin catalog.
async fn load_parser(probe: &dyn PeerProbe) -> Result<serde_json::Value, CatalogError> {
    if !probe.is_installed("typescript") {
        return Err(CatalogError::NotInstalled("typescript".to_string()));
    }
    Ok(json!({"parser": "@typescript-eslint/parser"}))
}

/// The TypeScript component
pub struct Typescript;

#[async_trait]
impl Component for Typescript {
    fn name(&self) -> &'static str {
        "typescript"
    }

    async fn configure(
        &self,
        ctx: &ComponentContext,
    ) -> Result<Option<ComponentOutput>, ComposeError> {
        let resolved = resolve_options(&ctx.options.typescript, TypescriptOptions::default());
        if explicit_enabled(&ctx.options.typescript) == Some(false) {
            return ComponentOutput::disabled(self.name(), &resolved).map(Some);
        }

        let probe = ctx.probe.clone();
        let loader = BundledCatalog::gated("typescript", plugin_catalog, move || {
            probe.is_installed("typescript")
        });

        // Independent lazy loads, joined before the component proceeds
        let loaded = futures::future::try_join(
            ctx.catalogs.get_or_load(&loader),
            load_parser(ctx.probe.as_ref()),
        )
        .await;
        let (catalog, mut parser) = match loaded {
            Ok(loaded) => loaded,
            // Hard prerequisite absent: no result at all
            Err(CatalogError::NotInstalled(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if let (Some(tsconfig), Some(parser_object)) =
            (&resolved.tsconfig_path, parser.as_object_mut())
        {
            parser_object.insert(
                "parserOptions".to_string(),
                json!({"project": tsconfig, "tsconfigRootDir": "."}),
            );
        }

        let mut builder = Builder::active(self.name(), resolved.files.clone());
        builder
            .add_config(ConfigSpec::new("flatkit/typescript/rules").language_options(parser))
            .add_catalog(&catalog, ctx.probe.major("typescript"))
            // The plugin re-implements these core rules for TS sources
            .disable_any_rule("ts", "no-unused-vars")
            .disable_any_rule("ts", "no-redeclare");
        if resolved.tsconfig_path.is_some() {
            let type_aware = ctx
                .catalogs
                .get_or_load(&BundledCatalog::new("typescript-type-aware", type_aware_catalog))
                .await?;
            builder.add_catalog(&type_aware, ctx.probe.major("typescript"));
        }
        builder.add_overrides(&resolved.overrides);

        ComponentOutput::enabled(self.name(), &resolved, builder.finish()).map(Some)
    }
}
