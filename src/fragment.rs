#![forbid(unsafe_code)]

//! Config fragments and the flat-config output record
//!
//! A [`Fragment`] is the atomic unit of composition: a named, glob-scoped
//! set of rule entries plus optional non-rule settings. Fragments are built
//! by components, handed to the composition root, and flattened into
//! [`FlatConfigEntry`] records — the plain data shape the external linter's
//! flat-config loader consumes.

use crate::types::{GlobPattern, RuleId, Severity};
use serde::de::Error as DeError;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// One rule's severity and options within a fragment
///
/// Serializes the way ESLint spells rule values: a bare severity keyword
/// when there are no options, otherwise `[severity, ...options]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEntry {
    pub severity: Severity,
    pub options: Vec<serde_json::Value>,
}

impl RuleEntry {
    /// Creates an entry with no options
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            options: Vec::new(),
        }
    }

    /// Creates an entry with per-rule options
    pub fn with_options(severity: Severity, options: Vec<serde_json::Value>) -> Self {
        Self { severity, options }
    }

    /// Creates an `off` entry
    pub fn off() -> Self {
        Self::new(Severity::Off)
    }
}

impl Serialize for RuleEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.options.is_empty() {
            self.severity.serialize(serializer)
        } else {
            let mut seq = serializer.serialize_seq(Some(1 + self.options.len()))?;
            seq.serialize_element(&self.severity)?;
            for option in &self.options {
                seq.serialize_element(option)?;
            }
            seq.end()
        }
    }
}

impl<'de> Deserialize<'de> for RuleEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Severity(Severity),
            Entry(Vec<serde_json::Value>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Severity(severity) => Ok(RuleEntry::new(severity)),
            Repr::Entry(values) => {
                let mut values = values.into_iter();
                let head = values
                    .next()
                    .ok_or_else(|| D::Error::custom("rule entry array must not be empty"))?;
                let severity = serde_json::from_value(head).map_err(|_| {
                    D::Error::custom("first element of a rule entry must be off/warn/error")
                })?;
                Ok(RuleEntry::with_options(severity, values.collect()))
            }
        }
    }
}

/// One named, glob-scoped configuration entry under construction
///
/// Owned by exactly one component until handed to the composition root.
/// Empty `files` means the fragment applies to the linter's default global
/// selector. The rule map is keyed by rule ID with last-write-wins upsert
/// semantics, so defaults can be layered and overridden in declaration
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub name: String,
    pub files: Vec<GlobPattern>,
    pub ignores: Vec<GlobPattern>,
    pub rules: BTreeMap<RuleId, RuleEntry>,
    pub language_options: Option<serde_json::Value>,
    pub settings: Option<serde_json::Value>,
    pub processor: Option<String>,
}

impl Fragment {
    /// Creates an empty fragment with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
            ignores: Vec::new(),
            rules: BTreeMap::new(),
            language_options: None,
            settings: None,
            processor: None,
        }
    }

    /// Inserts or replaces the entry for a rule (last write wins)
    pub fn upsert_rule(&mut self, id: RuleId, entry: RuleEntry) {
        self.rules.insert(id, entry);
    }

    /// Checks whether this fragment's selector matches a path
    ///
    /// Empty `files` applies to everything not excluded by `ignores`. This
    /// mirrors the external linter's matching only closely enough to test
    /// the fragment-ordering contract; the linter's own glob engine is the
    /// source of truth at lint time.
    pub fn matches(&self, path: &str) -> bool {
        if glob_set(&self.ignores).is_match(path) {
            return false;
        }
        if self.files.is_empty() {
            return true;
        }
        glob_set(&self.files).is_match(path)
    }

    /// Flattens the fragment into its plain output record
    pub fn into_flat_entry(self) -> FlatConfigEntry {
        FlatConfigEntry {
            name: Some(self.name),
            files: self.files,
            ignores: self.ignores,
            rules: self.rules,
            language_options: self.language_options,
            settings: self.settings,
            processor: self.processor,
        }
    }
}

fn glob_set(patterns: &[GlobPattern]) -> globset::GlobSet {
    let mut builder = globset::GlobSetBuilder::new();
    for pattern in patterns {
        // Patterns are validated when options are parsed; a malformed
        // pattern here simply never matches.
        if let Ok(glob) = globset::Glob::new(pattern.as_str()) {
            builder.add(glob);
        }
    }
    builder.build().unwrap_or_else(|_| globset::GlobSet::empty())
}

/// One entry of the final configuration array
///
/// The only artifact the engine produces: a plain data record consumable
/// directly by the external linter's flat-config loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatConfigEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<GlobPattern>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignores: Vec<GlobPattern>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<RuleId, RuleEntry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_options: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
}

impl FlatConfigEntry {
    /// Checks whether this entry's selector matches a path
    ///
    /// Same semantics as [`Fragment::matches`]; exposed on the output
    /// record so the emission-order precedence contract can be tested
    /// against the final array.
    pub fn matches(&self, path: &str) -> bool {
        if glob_set(&self.ignores).is_match(path) {
            return false;
        }
        if self.files.is_empty() {
            return true;
        }
        glob_set(&self.files).is_match(path)
    }

    /// Creates an ignores-only entry (a "global ignores" record)
    pub fn ignores_only(name: impl Into<String>, ignores: Vec<GlobPattern>) -> Self {
        Self {
            name: Some(name.into()),
            files: Vec::new(),
            ignores,
            rules: BTreeMap::new(),
            language_options: None,
            settings: None,
            processor: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule_id(s: &str) -> RuleId {
        RuleId::new(s).unwrap()
    }

    #[test]
    fn test_rule_entry_serializes_bare_severity() {
        let entry = RuleEntry::new(Severity::Error);
        assert_eq!(serde_json::to_value(&entry).unwrap(), json!("error"));
    }

    #[test]
    fn test_rule_entry_serializes_with_options() {
        let entry = RuleEntry::with_options(Severity::Warn, vec![json!({"max": 3})]);
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!(["warn", {"max": 3}])
        );
    }

    #[test]
    fn test_rule_entry_deserializes_both_shapes() {
        let bare: RuleEntry = serde_json::from_value(json!("off")).unwrap();
        assert_eq!(bare, RuleEntry::off());

        let with_options: RuleEntry = serde_json::from_value(json!(["error", 3])).unwrap();
        assert_eq!(with_options.severity, Severity::Error);
        assert_eq!(with_options.options, vec![json!(3)]);
    }

    #[test]
    fn test_rule_entry_rejects_empty_array() {
        let result: Result<RuleEntry, _> = serde_json::from_value(json!([]));
        assert!(result.is_err());
    }

    #[test]
    fn test_upsert_last_write_wins() {
        let mut fragment = Fragment::new("test/fragment");
        fragment.upsert_rule(rule_id("x"), RuleEntry::new(Severity::Error));
        fragment.upsert_rule(rule_id("x"), RuleEntry::off());

        assert_eq!(fragment.rules.len(), 1);
        assert_eq!(fragment.rules[&rule_id("x")].severity, Severity::Off);
    }

    #[test]
    fn test_matches_with_empty_files_is_global() {
        let fragment = Fragment::new("global");
        assert!(fragment.matches("src/index.ts"));
        assert!(fragment.matches("README.md"));
    }

    #[test]
    fn test_matches_respects_files_and_ignores() {
        let mut fragment = Fragment::new("scoped");
        fragment.files = vec![GlobPattern::new("**/*.ts")];
        fragment.ignores = vec![GlobPattern::new("**/*.d.ts")];

        assert!(fragment.matches("src/index.ts"));
        assert!(!fragment.matches("src/index.js"));
        assert!(!fragment.matches("src/env.d.ts"));
    }

    #[test]
    fn test_flat_entry_serialization_shape() {
        let mut fragment = Fragment::new("flatkit/demo");
        fragment.files = vec![GlobPattern::new("**/*.ts")];
        fragment.upsert_rule(
            rule_id("ts/no-explicit-any"),
            RuleEntry::new(Severity::Warn),
        );

        let entry = fragment.into_flat_entry();
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "flatkit/demo",
                "files": ["**/*.ts"],
                "rules": {"ts/no-explicit-any": "warn"}
            })
        );
    }

    #[test]
    fn test_ignores_only_entry_omits_empty_fields() {
        let entry = FlatConfigEntry::ignores_only(
            "flatkit/ignores",
            vec![GlobPattern::new("**/node_modules/**")],
        );
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "flatkit/ignores",
                "ignores": ["**/node_modules/**"]
            })
        );
    }
}
