#![forbid(unsafe_code)]

//! Markdown component
//!
//! Emits two fragments: a processor fragment that extracts fenced code
//! blocks from markdown files, and a blanket-disable fragment for rules
//! that cannot hold inside extracted snippets (no surrounding module, no
//! imports in scope). Opts the markup category back out of the global
//! default ignores so changelog-style files are seen at all.

use crate::builder::{Builder, ConfigSpec, Selector};
use crate::catalog::{BundledCatalog, CatalogRule, RuleCatalog};
use crate::component::{Component, ComponentOutput};
use crate::context::ComponentContext;
use crate::error::ComposeError;
use crate::fragment::RuleEntry;
use crate::globs::{ContentCategory, GLOB_MARKDOWN, GLOB_MARKDOWN_CODE};
use crate::options::{OptionPatch, is_enabled, resolve_options};
use crate::types::{GlobPattern, RuleId, Severity};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rules that cannot apply to fenced code blocks
const EMBEDDED_CODE_DISABLES: &[&str] = &[
    "no-undef",
    "no-unused-vars",
    "no-unused-expressions",
    "no-console",
    "ts/no-unused-vars",
    "ts/no-require-imports",
];

/// Fully-resolved options for the markdown component
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownOptions {
    /// File selector; defaults to all markdown files
    pub files: Vec<GlobPattern>,

    /// Raw rule overrides merged last into both emitted fragments
    pub overrides: BTreeMap<RuleId, RuleEntry>,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            files: vec![GlobPattern::new(GLOB_MARKDOWN)],
            overrides: BTreeMap::new(),
        }
    }
}

/// Caller-supplied partial options for the markdown component
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownPatch {
    pub files: Option<Vec<GlobPattern>>,
    pub overrides: Option<BTreeMap<RuleId, RuleEntry>>,
}

impl OptionPatch for MarkdownPatch {
    type Resolved = MarkdownOptions;

    fn apply(self, mut base: MarkdownOptions) -> MarkdownOptions {
        if let Some(files) = self.files {
            base.files = files;
        }
        if let Some(overrides) = self.overrides {
            base.overrides = overrides;
        }
        base
    }
}

fn markdown_catalog() -> RuleCatalog {
    RuleCatalog::new("markdown")
        .rule(CatalogRule::new("no-missing-label-refs", Severity::Error))
        .rule(CatalogRule::new("fenced-code-language", Severity::Warn))
        .rule(CatalogRule::new("no-empty-links", Severity::Error))
}

fn embedded_disables() -> Vec<(RuleId, RuleEntry)> {
    EMBEDDED_CODE_DISABLES
        .iter()
        .filter_map(|name| RuleId::new(*name))
        .map(|id| (id, RuleEntry::off()))
        .collect()
}

/// The markdown component
pub struct Markdown;

#[async_trait]
impl Component for Markdown {
    fn name(&self) -> &'static str {
        "markdown"
    }

    async fn configure(
        &self,
        ctx: &ComponentContext,
    ) -> Result<Option<ComponentOutput>, ComposeError> {
        let resolved = resolve_options(&ctx.options.markdown, MarkdownOptions::default());
        if !is_enabled(&ctx.options.markdown, true) {
            return ComponentOutput::disabled(self.name(), &resolved).map(Some);
        }

        let loader = BundledCatalog::new("markdown", markdown_catalog);
        let catalog = ctx.catalogs.get_or_load(&loader).await?;

        let mut builder = Builder::active(self.name(), resolved.files.clone());
        builder
            .add_config(
                ConfigSpec::new("flatkit/markdown/processor")
                    .processor("markdown/markdown")
                    .unignore(ContentCategory::Markup),
            )
            .add_catalog(&catalog, None)
            .add_config(
                ConfigSpec::new("flatkit/markdown/disables")
                    .files(Selector::Explicit(vec![GlobPattern::new(GLOB_MARKDOWN_CODE)])),
            )
            .add_bulk_rules(embedded_disables())
            .add_overrides(&resolved.overrides);

        ComponentOutput::enabled(self.name(), &resolved, builder.finish()).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_catalog_is_valid() {
        markdown_catalog().validate().unwrap();
    }

    #[test]
    fn test_embedded_disables_parse_as_rule_ids() {
        assert_eq!(embedded_disables().len(), EMBEDDED_CODE_DISABLES.len());
        assert!(
            embedded_disables()
                .iter()
                .all(|(_, entry)| entry.severity == Severity::Off)
        );
    }
}
