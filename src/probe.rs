#![forbid(unsafe_code)]

//! Package/environment probes
//!
//! Components compute defaults from the embedding project's environment:
//! whether a peer package is installed and at which version. The probe is a
//! capability handed to the composition root; [`DirProbe`] reads an
//! installed `node_modules` tree, [`StaticProbe`] answers from an in-memory
//! table for tests and hermetic builds.

use semver::Version;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Read-only view of the embedding project's installed peer packages
pub trait PeerProbe: Send + Sync {
    /// Whether the package is installed at all
    fn is_installed(&self, package: &str) -> bool;

    /// The installed version, when it can be determined
    fn version(&self, package: &str) -> Option<Version>;

    /// The installed major version, when it can be determined
    fn major(&self, package: &str) -> Option<u64> {
        self.version(package).map(|v| v.major)
    }
}

/// In-memory probe answering from a fixed table
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    packages: BTreeMap<String, Option<Version>>,
}

impl StaticProbe {
    /// Creates a probe that reports nothing installed
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registers a package with a parseable version
    ///
    /// Unparseable versions register the package as installed with an
    /// unknown version.
    pub fn with_package(mut self, package: impl Into<String>, version: &str) -> Self {
        self.packages
            .insert(package.into(), Version::parse(version).ok());
        self
    }

    /// Registers a package whose version cannot be determined
    pub fn with_unversioned(mut self, package: impl Into<String>) -> Self {
        self.packages.insert(package.into(), None);
        self
    }
}

impl PeerProbe for StaticProbe {
    fn is_installed(&self, package: &str) -> bool {
        self.packages.contains_key(package)
    }

    fn version(&self, package: &str) -> Option<Version> {
        self.packages.get(package)?.clone()
    }
}

/// Probe backed by an installed `node_modules` directory
///
/// A package is installed when `node_modules/<name>/package.json` exists;
/// its version comes from that manifest's `version` field. Missing or
/// malformed manifests degrade to "unknown version" rather than failing
/// the build — absence of a peer is an expected, recoverable state.
#[derive(Debug, Clone)]
pub struct DirProbe {
    node_modules: PathBuf,
}

impl DirProbe {
    /// Creates a probe rooted at a `node_modules` directory
    pub fn new(node_modules: impl Into<PathBuf>) -> Self {
        Self {
            node_modules: node_modules.into(),
        }
    }

    fn manifest_path(&self, package: &str) -> PathBuf {
        self.node_modules.join(package).join("package.json")
    }
}

impl PeerProbe for DirProbe {
    fn is_installed(&self, package: &str) -> bool {
        self.manifest_path(package).is_file()
    }

    fn version(&self, package: &str) -> Option<Version> {
        let content = fs::read_to_string(self.manifest_path(package)).ok()?;
        let manifest: serde_json::Value = serde_json::from_str(&content).ok()?;
        let version = manifest.get("version")?.as_str()?;
        Version::parse(version).ok()
    }
}
