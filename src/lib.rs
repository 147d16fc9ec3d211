#![forbid(unsafe_code)]

//! flatkit: composable generation of ESLint flat-config arrays
//!
//! flatkit assembles a linter's flat configuration from a pipeline of
//! components, each contributing named, glob-scoped fragments with layered
//! defaults. Caller options resolve against per-component defaults, an
//! environment probe drives auto-detection, and raw overrides always win.
//! The output is a plain array of config entries for the external linter's
//! flat-config loader; flatkit never parses or lints source code itself.

pub mod builder;
pub mod catalog;
pub mod component;
pub mod components;
pub mod compose;
pub mod context;
pub mod error;
pub mod fragment;
pub mod globs;
pub mod options;
pub mod probe;
pub mod types;

// Re-export error types for convenient access
pub use error::{CatalogError, ComposeError, OptionsError};

// Re-export core domain types for convenient access
pub use builder::{Builder, ConfigSpec, RuleFilter, Selector};
pub use compose::{Composer, compose, default_pipeline};
pub use fragment::{FlatConfigEntry, Fragment, RuleEntry};
pub use options::{RootOptions, Toggle};
pub use probe::{DirProbe, PeerProbe, StaticProbe};
pub use types::{GlobPattern, RuleId, Severity};
