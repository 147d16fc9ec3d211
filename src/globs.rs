#![forbid(unsafe_code)]

//! Default glob sets and the global ignore table
//!
//! This module is the selector registry: process-wide immutable tables of
//! default file globs per content category, the default test-file patterns,
//! and the global default-ignore set. Components read these tables; nothing
//! mutates them at runtime.

use crate::error::OptionsError;
use crate::types::GlobPattern;
use serde::{Deserialize, Serialize};

/// Content category a glob set or ignore entry belongs to
///
/// Used by components to opt specific categories back out of the global
/// default-ignore set (e.g. a markdown-aware component un-ignoring files the
/// rest of the pipeline never sees).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentCategory {
    /// JavaScript/TypeScript sources
    Script,
    /// Markdown and other markup formats
    Markup,
    /// Stylesheets
    Style,
    /// Data-serialization formats (JSON, YAML, lockfiles)
    Data,
}

/// Default selector for JavaScript sources
pub const GLOB_JS: &str = "**/*.{js,jsx,mjs,cjs}";

/// Default selector for TypeScript sources
pub const GLOB_TS: &str = "**/*.{ts,tsx,mts,cts}";

/// Default selector for Vue single-file components
pub const GLOB_VUE: &str = "**/*.vue";

/// Default selector for markdown files
pub const GLOB_MARKDOWN: &str = "**/*.md";

/// Default selector for code blocks embedded in markdown
pub const GLOB_MARKDOWN_CODE: &str = "**/*.md/**";

/// Default selector for YAML files
pub const GLOB_YAML: &str = "**/*.{yaml,yml}";

/// Default selector for JSON-family files
pub const GLOB_JSON: &str = "**/*.{json,json5,jsonc}";

/// Default selector for stylesheets
pub const GLOB_STYLE: &str = "**/*.{css,scss,less}";

/// An entry in the global default-ignore table
///
/// Entries with a category can be opted back in by components; entries
/// without one (build output, dependency directories) are always ignored.
#[derive(Debug, Clone, Copy)]
pub struct IgnoreEntry {
    pub pattern: &'static str,
    pub category: Option<ContentCategory>,
}

const fn always(pattern: &'static str) -> IgnoreEntry {
    IgnoreEntry {
        pattern,
        category: None,
    }
}

const fn categorized(pattern: &'static str, category: ContentCategory) -> IgnoreEntry {
    IgnoreEntry {
        pattern,
        category: Some(category),
    }
}

/// The global default-ignore table
///
/// Mirrors what the external linter should never look at: dependency and
/// build directories, lockfiles, minified artifacts, and generated docs.
pub const DEFAULT_IGNORES: &[IgnoreEntry] = &[
    always("**/node_modules/**"),
    always("**/dist/**"),
    always("**/build/**"),
    always("**/out/**"),
    always("**/coverage/**"),
    always("**/.cache/**"),
    always("**/.output/**"),
    always("**/.next/**"),
    always("**/.nuxt/**"),
    always("**/.vite-inspect/**"),
    categorized("**/*.min.*", ContentCategory::Script),
    categorized("**/CHANGELOG*.md", ContentCategory::Markup),
    categorized("**/LICENSE*.md", ContentCategory::Markup),
    categorized("**/package-lock.json", ContentCategory::Data),
    categorized("**/yarn.lock", ContentCategory::Data),
    categorized("**/pnpm-lock.yaml", ContentCategory::Data),
    categorized("**/bun.lock", ContentCategory::Data),
];

/// Returns the default glob set for a content category
pub fn category_globs(category: ContentCategory) -> Vec<GlobPattern> {
    let patterns: &[&str] = match category {
        ContentCategory::Script => &[GLOB_JS, GLOB_TS, GLOB_VUE],
        ContentCategory::Markup => &[GLOB_MARKDOWN],
        ContentCategory::Style => &[GLOB_STYLE],
        ContentCategory::Data => &[GLOB_YAML, GLOB_JSON],
    };
    patterns.iter().map(|p| GlobPattern::new(*p)).collect()
}

/// Returns the default script-source glob set
pub fn script_globs() -> Vec<GlobPattern> {
    vec![GlobPattern::new(GLOB_JS), GlobPattern::new(GLOB_TS)]
}

/// Composes the default test-file glob set
///
/// Covers `__tests__` directories plus `.test` and `.spec` suffixed files
/// for every script extension. Components with a `files` override replace
/// this set verbatim.
pub fn default_test_globs() -> Vec<GlobPattern> {
    vec![
        GlobPattern::new("**/__tests__/**/*.{js,jsx,mjs,cjs,ts,tsx,mts,cts}"),
        GlobPattern::new("**/*.spec.{js,jsx,mjs,cjs,ts,tsx,mts,cts}"),
        GlobPattern::new("**/*.test.{js,jsx,mjs,cjs,ts,tsx,mts,cts}"),
    ]
}

/// Builds the global ignore patterns, skipping opted-out categories
///
/// `unignored` lists the content categories whose categorized entries must
/// be dropped from the table; uncategorized entries are always kept.
pub fn global_ignores(unignored: &[ContentCategory]) -> Vec<GlobPattern> {
    DEFAULT_IGNORES
        .iter()
        .filter(|entry| match entry.category {
            Some(category) => !unignored.contains(&category),
            None => true,
        })
        .map(|entry| GlobPattern::new(entry.pattern))
        .collect()
}

/// Validates a set of glob patterns by compiling them with `globset`
///
/// The external linter applies its own glob engine to the emitted config,
/// but malformed patterns are caught here so they fail at build time rather
/// than inside the linter.
pub fn validate_patterns(field: &str, patterns: &[GlobPattern]) -> Result<(), OptionsError> {
    for pattern in patterns {
        globset::Glob::new(pattern.as_str()).map_err(|e| OptionsError::InvalidValue {
            field: field.to_string(),
            message: format!("invalid glob pattern '{}': {}", pattern.as_str(), e),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_are_valid_globs() {
        for entry in DEFAULT_IGNORES {
            assert!(
                globset::Glob::new(entry.pattern).is_ok(),
                "invalid ignore pattern: {}",
                entry.pattern
            );
        }
        for category in [
            ContentCategory::Script,
            ContentCategory::Markup,
            ContentCategory::Style,
            ContentCategory::Data,
        ] {
            validate_patterns("category", &category_globs(category)).unwrap();
        }
        validate_patterns("tests", &default_test_globs()).unwrap();
    }

    #[test]
    fn test_global_ignores_full_table() {
        let ignores = global_ignores(&[]);
        assert_eq!(ignores.len(), DEFAULT_IGNORES.len());
    }

    #[test]
    fn test_global_ignores_unignore_category() {
        let ignores = global_ignores(&[ContentCategory::Markup]);
        assert!(
            ignores
                .iter()
                .all(|p| !p.as_str().contains("CHANGELOG") && !p.as_str().contains("LICENSE"))
        );
        // Uncategorized entries survive any opt-out
        assert!(ignores.iter().any(|p| p.as_str() == "**/node_modules/**"));
        // Other categories are untouched
        assert!(ignores.iter().any(|p| p.as_str() == "**/yarn.lock"));
    }

    #[test]
    fn test_default_test_globs_cover_script_extensions() {
        let globs = default_test_globs();
        assert_eq!(globs.len(), 3);
        assert!(globs.iter().any(|p| p.as_str().contains("__tests__")));
        assert!(globs.iter().any(|p| p.as_str().contains(".test.")));
    }

    #[test]
    fn test_validate_patterns_rejects_malformed() {
        let bad = vec![GlobPattern::new("src/{unclosed")];
        let result = validate_patterns("ignores", &bad);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("ignores"));
    }
}
