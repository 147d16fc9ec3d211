#![forbid(unsafe_code)]

//! The fragment builder
//!
//! Components declare their fragments through a fluent accumulator. The
//! handle is a tagged variant: [`Builder::Active`] records every call,
//! [`Builder::Inactive`] defines every chain method as a no-op, so a
//! disabled component can run the same declaration code without enablement
//! guards at every call site.
//!
//! Misusing the builder — touching rules with no fragment open — is a
//! programming defect and panics; user-level misconfiguration never does
//! (unknown rule names pass through, the external linter is the source of
//! truth for rule existence).

use crate::catalog::RuleCatalog;
use crate::fragment::{Fragment, RuleEntry};
use crate::globs::ContentCategory;
use crate::types::{GlobPattern, RuleId, Severity};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// File selector for a new fragment
#[derive(Debug, Clone)]
pub enum Selector {
    /// No `files` — the fragment applies to the linter's global selector
    Global,
    /// Fall back to the component's computed default glob set
    ComponentDefault,
    /// Explicit glob set, used verbatim
    Explicit(Vec<GlobPattern>),
}

/// Declarative spec for opening a fragment
#[derive(Debug, Clone)]
pub struct ConfigSpec {
    name: String,
    files: Selector,
    ignores: Vec<GlobPattern>,
    unignore: Vec<ContentCategory>,
    language_options: Option<serde_json::Value>,
    settings: Option<serde_json::Value>,
    processor: Option<String>,
}

impl ConfigSpec {
    /// Starts a spec for a named fragment on the component default selector
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Selector::ComponentDefault,
            ignores: Vec::new(),
            unignore: Vec::new(),
            language_options: None,
            settings: None,
            processor: None,
        }
    }

    /// Sets the file selector
    pub fn files(mut self, selector: Selector) -> Self {
        self.files = selector;
        self
    }

    /// Sets fragment-local ignore patterns
    pub fn ignores(mut self, ignores: Vec<GlobPattern>) -> Self {
        self.ignores = ignores;
        self
    }

    /// Opts a content category back out of the global default-ignore set
    pub fn unignore(mut self, category: ContentCategory) -> Self {
        self.unignore.push(category);
        self
    }

    /// Sets the fragment's language options bag
    pub fn language_options(mut self, value: serde_json::Value) -> Self {
        self.language_options = Some(value);
        self
    }

    /// Sets the fragment's shared plugin settings bag
    pub fn settings(mut self, value: serde_json::Value) -> Self {
        self.settings = Some(value);
        self
    }

    /// Sets the fragment's processor reference
    pub fn processor(mut self, processor: impl Into<String>) -> Self {
        self.processor = Some(processor.into());
        self
    }
}

/// Predicate over rule IDs for bulk operations
#[derive(Debug, Clone)]
pub enum RuleFilter {
    /// Exact rule IDs
    List(Vec<RuleId>),
    /// Rules under a plugin prefix
    Prefix(String),
    /// Rules whose full ID matches a regex
    Matching(Regex),
}

impl RuleFilter {
    /// Builds a list filter from string IDs, skipping invalid ones
    pub fn list(ids: &[&str]) -> Self {
        RuleFilter::List(ids.iter().filter_map(|id| RuleId::new(*id)).collect())
    }

    /// Checks whether a rule ID matches this filter
    pub fn matches(&self, id: &RuleId) -> bool {
        match self {
            RuleFilter::List(ids) => ids.contains(id),
            RuleFilter::Prefix(prefix) => id.plugin() == Some(prefix.as_str()),
            RuleFilter::Matching(regex) => regex.is_match(id.as_str()),
        }
    }
}

/// Everything a component's builder produced
#[derive(Debug, Default)]
pub struct BuilderOutput {
    pub fragments: Vec<Fragment>,
    pub unignored: BTreeSet<ContentCategory>,
}

/// Accumulator state behind an active builder
#[derive(Debug)]
pub struct FragmentSet {
    component: String,
    default_files: Vec<GlobPattern>,
    fragments: Vec<Fragment>,
    unignored: BTreeSet<ContentCategory>,
}

/// Fluent builder handle bound to one component
#[derive(Debug)]
pub enum Builder {
    Active(FragmentSet),
    Inactive,
}

impl Builder {
    /// Creates an active builder for an enabled component
    ///
    /// `default_files` is the component's documented default selector,
    /// used by [`Selector::ComponentDefault`].
    pub fn active(component: impl Into<String>, default_files: Vec<GlobPattern>) -> Self {
        Builder::Active(FragmentSet {
            component: component.into(),
            default_files,
            fragments: Vec::new(),
            unignored: BTreeSet::new(),
        })
    }

    /// Creates the no-op handle for a disabled component
    pub fn inactive() -> Self {
        Builder::Inactive
    }

    fn set(&mut self) -> Option<&mut FragmentSet> {
        match self {
            Builder::Active(set) => Some(set),
            Builder::Inactive => None,
        }
    }

    /// Opens a new fragment; subsequent rule calls target it
    pub fn add_config(&mut self, spec: ConfigSpec) -> &mut Self {
        if let Some(set) = self.set() {
            let mut fragment = Fragment::new(spec.name);
            fragment.files = match spec.files {
                Selector::Global => Vec::new(),
                Selector::ComponentDefault => set.default_files.clone(),
                Selector::Explicit(files) => files,
            };
            fragment.ignores = spec.ignores;
            fragment.language_options = spec.language_options;
            fragment.settings = spec.settings;
            fragment.processor = spec.processor;
            set.unignored.extend(spec.unignore);
            set.fragments.push(fragment);
        }
        self
    }

    /// Upserts one rule into the open fragment (last write wins)
    pub fn add_rule(&mut self, id: &str, severity: Severity) -> &mut Self {
        self.add_rule_with(id, severity, Vec::new())
    }

    /// Upserts one rule with per-rule options into the open fragment
    pub fn add_rule_with(
        &mut self,
        id: &str,
        severity: Severity,
        options: Vec<serde_json::Value>,
    ) -> &mut Self {
        if let Some(set) = self.set() {
            let component = set.component.clone();
            let rule_id = RuleId::new(id)
                .unwrap_or_else(|| panic!("component '{component}' declared invalid rule ID '{id}'"));
            set.current(&component)
                .upsert_rule(rule_id, RuleEntry::with_options(severity, options));
        }
        self
    }

    /// Upserts a bulk mapping of rule entries into the open fragment
    pub fn add_bulk_rules(
        &mut self,
        entries: impl IntoIterator<Item = (RuleId, RuleEntry)>,
    ) -> &mut Self {
        if let Some(set) = self.set() {
            let component = set.component.clone();
            let fragment = set.current(&component);
            for (id, entry) in entries {
                fragment.upsert_rule(id, entry);
            }
        }
        self
    }

    /// Registers a catalog's default entries into the open fragment
    ///
    /// Rule names are scoped under the catalog's plugin prefix; entries
    /// whose applicability gate rejects the installed major version are
    /// skipped. The catalog is consumed generically — the builder never
    /// inspects rule semantics.
    pub fn add_catalog(&mut self, catalog: &RuleCatalog, installed_major: Option<u64>) -> &mut Self {
        let entries: Vec<(RuleId, RuleEntry)> = catalog
            .rules
            .iter()
            .filter(|rule| rule.applies(installed_major))
            .filter_map(|rule| {
                let id = match &catalog.plugin {
                    Some(plugin) => RuleId::scoped(plugin, &rule.name),
                    None => RuleId::new(&rule.name),
                }?;
                Some((
                    id,
                    RuleEntry::with_options(rule.severity, rule.options.clone()),
                ))
            })
            .collect();
        self.add_bulk_rules(entries)
    }

    /// Sets every already-registered matching rule in the open fragment to `off`
    ///
    /// Only rules registered at call time are affected; rules added
    /// afterward keep their explicit severities.
    pub fn disable_bulk_rules(&mut self, filter: &RuleFilter) -> &mut Self {
        if let Some(set) = self.set() {
            let component = set.component.clone();
            let fragment = set.current(&component);
            for (id, entry) in fragment.rules.iter_mut() {
                if filter.matches(id) {
                    entry.severity = Severity::Off;
                    entry.options.clear();
                }
            }
        }
        self
    }

    /// Disables a rule name across plugin namespaces, keeping one active
    ///
    /// When the same rule name is provided by several plugins and only the
    /// `plugin`-prefixed variant should remain, this turns off the core
    /// (unprefixed) rule and any already-registered variant under a
    /// different prefix.
    pub fn disable_any_rule(&mut self, plugin: &str, name: &str) -> &mut Self {
        if let Some(set) = self.set() {
            let component = set.component.clone();
            let fragment = set.current(&component);
            let others: Vec<RuleId> = fragment
                .rules
                .keys()
                .filter(|id| id.name() == name && id.plugin() != Some(plugin))
                .cloned()
                .collect();
            for id in others {
                fragment.upsert_rule(id, RuleEntry::off());
            }
            if let Some(core) = RuleId::new(name) {
                fragment.upsert_rule(core, RuleEntry::off());
            }
        }
        self
    }

    /// Merges caller-supplied raw overrides into every declared fragment
    ///
    /// Always the last call in a component: last-write-wins upsert makes
    /// the caller's severity and options final in each fragment the
    /// component emitted, whichever selector matches at lint time.
    pub fn add_overrides(&mut self, overrides: &BTreeMap<RuleId, RuleEntry>) -> &mut Self {
        if let Some(set) = self.set() {
            let component = set.component.clone();
            assert!(
                !set.fragments.is_empty(),
                "component '{component}' touched rules before opening a fragment with add_config"
            );
            for fragment in &mut set.fragments {
                for (id, entry) in overrides {
                    fragment.upsert_rule(id.clone(), entry.clone());
                }
            }
        }
        self
    }

    /// Consumes the builder, yielding the fragments and opt-out requests
    pub fn finish(self) -> BuilderOutput {
        match self {
            Builder::Active(set) => BuilderOutput {
                fragments: set.fragments,
                unignored: set.unignored,
            },
            Builder::Inactive => BuilderOutput::default(),
        }
    }
}

impl FragmentSet {
    fn current(&mut self, component: &str) -> &mut Fragment {
        self.fragments.last_mut().unwrap_or_else(|| {
            panic!("component '{component}' touched rules before opening a fragment with add_config")
        })
    }
}
