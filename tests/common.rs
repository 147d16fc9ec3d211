//! Test utilities for flatkit integration tests

// Each integration test crate pulls in the subset of helpers it needs.
#![allow(dead_code)]

use flatkit::{Composer, FlatConfigEntry, RuleId, StaticProbe};
use std::sync::Arc;

/// Result type alias for tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Composer over the default pipeline with nothing installed
pub fn bare_composer() -> Composer {
    Composer::new(Arc::new(StaticProbe::empty()))
}

/// Composer over the default pipeline with a typical TS + Vue 3 project
pub fn full_composer() -> Composer {
    Composer::new(Arc::new(
        StaticProbe::empty()
            .with_package("typescript", "5.4.2")
            .with_package("vue", "3.4.21"),
    ))
}

/// Finds an entry by its exact name
pub fn entry<'a>(entries: &'a [FlatConfigEntry], name: &str) -> &'a FlatConfigEntry {
    entries
        .iter()
        .find(|e| e.name.as_deref() == Some(name))
        .unwrap_or_else(|| panic!("no entry named '{name}'"))
}

/// Counts entries whose name starts with a prefix
pub fn entries_named(entries: &[FlatConfigEntry], prefix: &str) -> usize {
    entries
        .iter()
        .filter(|e| e.name.as_deref().is_some_and(|n| n.starts_with(prefix)))
        .count()
}

/// Parses a rule ID or panics
pub fn rule_id(s: &str) -> RuleId {
    RuleId::new(s).unwrap_or_else(|| panic!("invalid rule id '{s}'"))
}
