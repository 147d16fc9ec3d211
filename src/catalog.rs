#![forbid(unsafe_code)]

//! Rule catalogs and the async capability loader
//!
//! A catalog is the external, tool-specific registry of rules a component
//! references by name: each entry carries a default severity, default
//! options, and an applicability gate. The engine consumes catalogs
//! generically and never inspects rule semantics.
//!
//! Loading is modeled as an async capability: a [`CatalogLoader`] either
//! yields a catalog, reports the backing peer package as not installed
//! (recovered locally by the owning component), or fails the whole build.
//! Loads are memoized per build through [`CatalogCache`].

use crate::error::CatalogError;
use crate::types::Severity;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// One rule as declared by its catalog
#[derive(Debug, Clone)]
pub struct CatalogRule {
    /// Bare rule name, without the plugin prefix
    pub name: String,

    /// Severity the catalog recommends by default
    pub severity: Severity,

    /// Default per-rule options
    pub options: Vec<serde_json::Value>,

    /// Minimum installed major version of the backing peer package for
    /// this rule to apply; `None` applies everywhere
    pub min_major: Option<u64>,
}

impl CatalogRule {
    /// Creates a rule with no options and no version gate
    pub fn new(name: impl Into<String>, severity: Severity) -> Self {
        Self {
            name: name.into(),
            severity,
            options: Vec::new(),
            min_major: None,
        }
    }

    /// Sets default per-rule options
    pub fn options(mut self, options: Vec<serde_json::Value>) -> Self {
        self.options = options;
        self
    }

    /// Gates the rule on a minimum installed major version
    pub fn min_major(mut self, major: u64) -> Self {
        self.min_major = Some(major);
        self
    }

    /// Checks the applicability gate against an installed major version
    ///
    /// Version-gated rules never apply when the installed version is
    /// unknown.
    pub fn applies(&self, installed_major: Option<u64>) -> bool {
        match self.min_major {
            Some(min) => installed_major.is_some_and(|major| major >= min),
            None => true,
        }
    }
}

/// A plugin's rule catalog
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    /// Plugin prefix rule names are scoped under; `None` for core rules
    pub plugin: Option<String>,
    pub rules: Vec<CatalogRule>,
}

impl RuleCatalog {
    /// Creates an empty catalog for a plugin prefix
    pub fn new(plugin: impl Into<String>) -> Self {
        Self {
            plugin: Some(plugin.into()),
            rules: Vec::new(),
        }
    }

    /// Creates an empty catalog for unprefixed core rules
    pub fn core() -> Self {
        Self {
            plugin: None,
            rules: Vec::new(),
        }
    }

    /// Appends a rule to the catalog
    pub fn rule(mut self, rule: CatalogRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rejects catalogs declaring the same rule name twice
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.name.as_str()) {
                return Err(CatalogError::DuplicateRule {
                    catalog: self.plugin.clone().unwrap_or_else(|| "core".to_string()),
                    rule: rule.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Async capability to load one rule catalog
#[async_trait]
pub trait CatalogLoader: Send + Sync {
    /// Cache key; also used in diagnostics
    fn name(&self) -> &str;

    /// Loads the catalog once per build
    ///
    /// `Err(CatalogError::NotInstalled)` means the backing peer package is
    /// absent; the owning component recovers locally. Any other error
    /// rejects the whole build.
    async fn load(&self) -> Result<RuleCatalog, CatalogError>;
}

/// A catalog bundled with the engine, optionally gated on a peer package
///
/// Bundled catalogs are declarative tables compiled into the crate; the
/// async loader interface is kept so components treat them exactly like
/// catalogs resolved from the environment.
pub struct BundledCatalog {
    name: String,
    build: fn() -> RuleCatalog,
    gate: Option<Box<dyn Fn() -> bool + Send + Sync>>,
}

impl BundledCatalog {
    /// A catalog that always loads
    pub fn new(name: impl Into<String>, build: fn() -> RuleCatalog) -> Self {
        Self {
            name: name.into(),
            build,
            gate: None,
        }
    }

    /// A catalog that reports `NotInstalled` unless the gate passes
    pub fn gated(
        name: impl Into<String>,
        build: fn() -> RuleCatalog,
        gate: impl Fn() -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            build,
            gate: Some(Box::new(gate)),
        }
    }
}

#[async_trait]
impl CatalogLoader for BundledCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> Result<RuleCatalog, CatalogError> {
        if let Some(gate) = &self.gate
            && !gate()
        {
            return Err(CatalogError::NotInstalled(self.name.clone()));
        }
        let catalog = (self.build)();
        catalog.validate()?;
        Ok(catalog)
    }
}

/// Per-build memoization of catalog loads
///
/// Rebuilt fresh for every configuration build; loaders are keyed by name
/// and invoked at most once. Components run sequentially, so the lock is
/// only ever briefly contended by a component's own joined loads.
#[derive(Default)]
pub struct CatalogCache {
    loaded: Mutex<HashMap<String, Arc<RuleCatalog>>>,
}

impl CatalogCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the memoized catalog, loading it on first use
    pub async fn get_or_load(
        &self,
        loader: &dyn CatalogLoader,
    ) -> Result<Arc<RuleCatalog>, CatalogError> {
        let key = loader.name().to_string();
        if let Some(catalog) = self.loaded.lock().expect("catalog cache poisoned").get(&key) {
            return Ok(catalog.clone());
        }

        let catalog = Arc::new(loader.load().await?);
        self.loaded
            .lock()
            .expect("catalog cache poisoned")
            .insert(key, catalog.clone());
        Ok(catalog)
    }
}
