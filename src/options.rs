#![forbid(unsafe_code)]

//! Caller-facing options and the option resolver
//!
//! The root options record is keyed by component name; each component's
//! value is `false` (disable), `true` (enable with defaults), absent (let
//! the component decide), or a partial options object layered over that
//! component's defaults. The resolver itself only merges shapes —
//! enablement is decided one level up, by each component.

use crate::components::javascript::JavascriptPatch;
use crate::components::jsonc::JsoncPatch;
use crate::components::markdown::MarkdownPatch;
use crate::components::test::TestPatch;
use crate::components::typescript::TypescriptPatch;
use crate::components::vue::VuePatch;
use crate::components::yaml::YamlPatch;
use crate::error::OptionsError;
use crate::fragment::RuleEntry;
use crate::globs::validate_patterns;
use crate::types::{GlobPattern, RuleId};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A component's raw option value: plain boolean or a partial options object
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Toggle<P> {
    /// Simple boolean enable/disable
    Enabled(bool),
    /// Partial options, implying the component is enabled
    Options(P),
}

/// A partial options object that can be layered over resolved defaults
///
/// Merging is shallow per field: a `Some` patch field replaces the default
/// wholesale. Fields documented as deep-merged say so on the field.
pub trait OptionPatch: Clone {
    type Resolved;

    /// Layers this patch over a fully-populated defaults value
    fn apply(self, base: Self::Resolved) -> Self::Resolved;
}

/// Resolves a component's raw option value against its defaults
///
/// Only merges object shapes; `Enabled(_)` and absent values pass the
/// defaults through untouched.
pub fn resolve_options<P: OptionPatch>(
    toggle: &Option<Toggle<P>>,
    defaults: P::Resolved,
) -> P::Resolved {
    match toggle {
        Some(Toggle::Options(patch)) => patch.clone().apply(defaults),
        _ => defaults,
    }
}

/// Returns the caller's explicit enablement intent, if any
///
/// `Some(bool)` for an explicit boolean, `Some(true)` for a partial options
/// object, `None` when the caller left the component unset (the component's
/// own default — often an environment probe — decides).
pub fn explicit_enabled<P>(toggle: &Option<Toggle<P>>) -> Option<bool> {
    match toggle {
        Some(Toggle::Enabled(enabled)) => Some(*enabled),
        Some(Toggle::Options(_)) => Some(true),
        None => None,
    }
}

/// Decides enablement from the raw value, falling back to a default
pub fn is_enabled<P>(toggle: &Option<Toggle<P>>, default: bool) -> bool {
    explicit_enabled(toggle).unwrap_or(default)
}

/// The root options record for one configuration build
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RootOptions {
    /// Extra patterns appended to the global default-ignore set
    pub ignores: Vec<GlobPattern>,

    /// Global rule overrides, emitted as the final config entry so they win
    /// over every generated default under last-matching-entry-wins merging
    pub overrides: BTreeMap<RuleId, RuleEntry>,

    pub javascript: Option<Toggle<JavascriptPatch>>,
    pub typescript: Option<Toggle<TypescriptPatch>>,
    pub vue: Option<Toggle<VuePatch>>,
    pub test: Option<Toggle<TestPatch>>,
    pub markdown: Option<Toggle<MarkdownPatch>>,
    pub yaml: Option<Toggle<YamlPatch>>,
    pub jsonc: Option<Toggle<JsoncPatch>>,
}

impl RootOptions {
    /// Parses options from a JSON string
    pub fn parse_json(s: &str) -> Result<Self, OptionsError> {
        let options: RootOptions =
            serde_json::from_str(s).map_err(|e| OptionsError::InvalidSyntax(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Parses options from a TOML string
    pub fn parse_toml(s: &str) -> Result<Self, OptionsError> {
        let options: RootOptions =
            toml::from_str(s).map_err(|e| OptionsError::InvalidSyntax(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Loads options from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_toml(&content)
    }

    /// Validates cross-cutting option values
    ///
    /// Rule options are never schema-checked here (the external linter is
    /// the source of truth for rule shapes); glob patterns — the root
    /// `ignores` and every component's `files` selector — are compiled
    /// eagerly so they fail at build time rather than silently never
    /// matching.
    pub fn validate(&self) -> Result<(), OptionsError> {
        validate_patterns("ignores", &self.ignores)?;
        component_files("javascript.files", &self.javascript, |p| p.files.as_deref())?;
        component_files("typescript.files", &self.typescript, |p| p.files.as_deref())?;
        component_files("vue.files", &self.vue, |p| p.files.as_deref())?;
        component_files("test.files", &self.test, |p| p.files.as_deref())?;
        component_files("markdown.files", &self.markdown, |p| p.files.as_deref())?;
        component_files("yaml.files", &self.yaml, |p| p.files.as_deref())?;
        component_files("jsonc.files", &self.jsonc, |p| p.files.as_deref())?;
        Ok(())
    }
}

fn component_files<P>(
    field: &str,
    toggle: &Option<Toggle<P>>,
    files: impl Fn(&P) -> Option<&[GlobPattern]>,
) -> Result<(), OptionsError> {
    if let Some(Toggle::Options(patch)) = toggle
        && let Some(patterns) = files(patch)
    {
        validate_patterns(field, patterns)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct DemoPatch {
        max: Option<u32>,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct DemoOptions {
        max: u32,
        label: &'static str,
    }

    impl OptionPatch for DemoPatch {
        type Resolved = DemoOptions;

        fn apply(self, mut base: DemoOptions) -> DemoOptions {
            if let Some(max) = self.max {
                base.max = max;
            }
            base
        }
    }

    const DEMO_DEFAULTS: DemoOptions = DemoOptions {
        max: 10,
        label: "default",
    };

    #[test]
    fn test_resolve_passes_defaults_through() {
        assert_eq!(resolve_options::<DemoPatch>(&None, DEMO_DEFAULTS), DEMO_DEFAULTS);
        assert_eq!(
            resolve_options(&Some(Toggle::<DemoPatch>::Enabled(true)), DEMO_DEFAULTS),
            DEMO_DEFAULTS
        );
    }

    #[test]
    fn test_resolve_layers_patch_over_defaults() {
        let toggle = Some(Toggle::Options(DemoPatch { max: Some(3) }));
        let resolved = resolve_options(&toggle, DEMO_DEFAULTS);
        assert_eq!(resolved.max, 3);
        assert_eq!(resolved.label, "default");
    }

    #[test]
    fn test_explicit_enabled() {
        assert_eq!(explicit_enabled::<DemoPatch>(&None), None);
        assert_eq!(
            explicit_enabled(&Some(Toggle::<DemoPatch>::Enabled(false))),
            Some(false)
        );
        assert_eq!(
            explicit_enabled(&Some(Toggle::Options(DemoPatch { max: None }))),
            Some(true)
        );
    }

    #[test]
    fn test_toggle_deserializes_bool_and_object() {
        let enabled: Toggle<DemoPatch> = serde_json::from_value(json!(false)).unwrap();
        assert_eq!(enabled, Toggle::Enabled(false));

        let options: Toggle<DemoPatch> = serde_json::from_value(json!({"max": 2})).unwrap();
        assert_eq!(options, Toggle::Options(DemoPatch { max: Some(2) }));
    }

    #[test]
    fn test_root_options_parse_json() {
        let options = RootOptions::parse_json(
            r#"{
                "ignores": ["**/generated/**"],
                "typescript": true,
                "vue": false,
                "test": {"enforceMaxAssertions": 3},
                "overrides": {"eqeqeq": "off"}
            }"#,
        )
        .unwrap();

        assert_eq!(options.ignores.len(), 1);
        assert_eq!(explicit_enabled(&options.typescript), Some(true));
        assert_eq!(explicit_enabled(&options.vue), Some(false));
        assert_eq!(explicit_enabled(&options.test), Some(true));
        assert_eq!(
            options.overrides[&RuleId::new("eqeqeq").unwrap()].severity,
            Severity::Off
        );
    }

    #[test]
    fn test_root_options_parse_toml() {
        let options = RootOptions::parse_toml(
            r#"
                ignores = ["**/generated/**"]
                typescript = true

                [test]
                enforceMaxAssertions = 3
            "#,
        )
        .unwrap();

        assert_eq!(options.ignores.len(), 1);
        assert_eq!(explicit_enabled(&options.test), Some(true));
    }

    #[test]
    fn test_root_options_rejects_bad_glob() {
        let result = RootOptions::parse_json(r#"{"ignores": ["src/{unclosed"]}"#);
        assert!(matches!(result, Err(OptionsError::InvalidValue { .. })));
    }

    #[test]
    fn test_root_options_rejects_bad_component_glob() {
        let result = RootOptions::parse_json(r#"{"test": {"files": ["e2e/{unclosed"]}}"#);
        assert!(matches!(result, Err(OptionsError::InvalidValue { .. })));

        let message = RootOptions::parse_json(r#"{"typescript": {"files": ["src/{unclosed"]}}"#)
            .unwrap_err()
            .to_string();
        assert!(message.contains("typescript.files"));
    }

    #[test]
    fn test_root_options_rejects_bad_syntax() {
        let result = RootOptions::parse_json("{not json");
        assert!(matches!(result, Err(OptionsError::InvalidSyntax(_))));
    }
}
