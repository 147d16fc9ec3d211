#![forbid(unsafe_code)]

//! Shared build context threaded through the component pipeline
//!
//! One [`ComponentContext`] lives for exactly one configuration build. It
//! carries the root options, the environment probe, the per-build catalog
//! cache, and the resolved state of every component evaluated so far. The
//! state map is append-only: the composition root records each component's
//! result once, and later components read earlier results only.

use crate::catalog::CatalogCache;
use crate::options::RootOptions;
use crate::probe::PeerProbe;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Resolved state of an already-evaluated component
#[derive(Debug, Clone)]
pub struct ComponentState {
    pub enabled: bool,
    /// The component's fully-resolved options, serialized generically so
    /// downstream components can read them without a type dependency
    pub resolved_options: serde_json::Value,
}

/// Read-only state threaded through every component config function
pub struct ComponentContext {
    pub options: RootOptions,
    pub probe: Arc<dyn PeerProbe>,
    pub catalogs: CatalogCache,
    states: BTreeMap<String, ComponentState>,
}

impl ComponentContext {
    /// Creates a fresh context for one build
    pub fn new(options: RootOptions, probe: Arc<dyn PeerProbe>) -> Self {
        Self {
            options,
            probe,
            catalogs: CatalogCache::new(),
            states: BTreeMap::new(),
        }
    }

    /// Returns an earlier component's resolved state
    pub fn state(&self, component: &str) -> Option<&ComponentState> {
        self.states.get(component)
    }

    /// Whether an earlier component ended up enabled
    ///
    /// Components that have not run (or returned no result) read as
    /// disabled.
    pub fn is_enabled(&self, component: &str) -> bool {
        self.states.get(component).is_some_and(|state| state.enabled)
    }

    /// Records a component's resolved state (append-only)
    pub(crate) fn record(&mut self, component: &str, state: ComponentState) {
        let previous = self.states.insert(component.to_string(), state);
        assert!(
            previous.is_none(),
            "component '{component}' was recorded twice in one build"
        );
    }
}
