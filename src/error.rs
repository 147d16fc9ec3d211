//! Error types for flatkit
//!
//! This module defines the error types used throughout the composition
//! engine, following a hierarchical structure with specific error variants
//! for different error categories.

use std::path::PathBuf;

/// Errors in the caller-supplied root options
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// Invalid options syntax (JSON or TOML)
    #[error("Invalid options syntax: {0}")]
    InvalidSyntax(String),

    /// Invalid option value
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// I/O error reading an options file
    #[error("Failed to read options file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors from loading a rule catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The peer package backing the catalog is not installed
    ///
    /// Recovered locally: the owning component yields no fragments and the
    /// build continues.
    #[error("Catalog '{0}' is not installed")]
    NotInstalled(String),

    /// The catalog was detected as installed but failed to load
    ///
    /// Not recoverable: the whole build fails (there is no partial-result
    /// mode).
    #[error("Failed to load catalog '{name}': {message}")]
    LoadFailed { name: String, message: String },

    /// A catalog declared the same rule twice
    #[error("Duplicate rule '{rule}' in catalog '{catalog}'")]
    DuplicateRule { catalog: String, rule: String },
}

/// Top-level error type for a configuration build
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// Options error
    #[error("Options error: {0}")]
    Options(#[from] OptionsError),

    /// Catalog load error
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A component failed while producing its fragments
    #[error("Component '{component}' failed: {message}")]
    Component { component: String, message: String },
}
