//! Concrete pipeline components
//!
//! One module per external tool/ecosystem integration. Each component reads
//! its slice of the root options, resolves defaults, loads its rule catalog
//! through the build's catalog cache, and declares fragments through the
//! builder. The per-plugin rule tables in these modules are declarative
//! data; all composition logic lives in the engine modules.

pub mod javascript;
pub mod jsonc;
pub mod markdown;
pub mod typescript;
pub mod vue;
pub mod yaml;

pub use javascript::Javascript;
pub use jsonc::Jsonc;
pub use markdown::Markdown;
pub use test::Test;
pub use typescript::Typescript;
pub use vue::Vue;
pub use yaml::Yaml;
