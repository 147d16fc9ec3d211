#![forbid(unsafe_code)]

//! The component contract
//!
//! A component is a self-contained unit generating fragments for one
//! external tool or ecosystem integration. Components run in the fixed
//! pipeline order and may only read the resolved state of components that
//! executed before them; the composition root enforces that ordering when
//! the pipeline is constructed.

use crate::builder::BuilderOutput;
use crate::context::ComponentContext;
use crate::error::ComposeError;
use crate::fragment::Fragment;
use crate::globs::ContentCategory;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeSet;

/// Everything one component contributes to a build
#[derive(Debug)]
pub struct ComponentOutput {
    /// Whether the component ended up enabled; recorded into the context
    /// either way so later components can read it
    pub enabled: bool,

    /// The component's fully-resolved options, serialized generically
    pub resolved_options: serde_json::Value,

    /// Fragments in emission order
    pub fragments: Vec<Fragment>,

    /// Content categories to opt back out of the global default ignores
    pub unignored: BTreeSet<ContentCategory>,
}

impl ComponentOutput {
    /// Output for a component disabled by option: resolved state but no
    /// fragments
    pub fn disabled<O: Serialize>(component: &str, resolved: &O) -> Result<Self, ComposeError> {
        Ok(Self {
            enabled: false,
            resolved_options: serialize_resolved(component, resolved)?,
            fragments: Vec::new(),
            unignored: BTreeSet::new(),
        })
    }

    /// Output for an enabled component, from its finished builder
    pub fn enabled<O: Serialize>(
        component: &str,
        resolved: &O,
        builder_output: BuilderOutput,
    ) -> Result<Self, ComposeError> {
        Ok(Self {
            enabled: true,
            resolved_options: serialize_resolved(component, resolved)?,
            fragments: builder_output.fragments,
            unignored: builder_output.unignored,
        })
    }
}

fn serialize_resolved<O: Serialize>(
    component: &str,
    resolved: &O,
) -> Result<serde_json::Value, ComposeError> {
    serde_json::to_value(resolved).map_err(|e| ComposeError::Component {
        component: component.to_string(),
        message: format!("failed to serialize resolved options: {e}"),
    })
}

/// One component config function in the pipeline
#[async_trait]
pub trait Component: Send + Sync {
    /// Stable component name, also the key in the root options record
    fn name(&self) -> &'static str;

    /// Names of components whose resolved state this one reads
    ///
    /// Every listed name must appear earlier in the pipeline; the
    /// composition root asserts this at construction time.
    fn depends_on(&self) -> &'static [&'static str] {
        &[]
    }

    /// Produces this component's contribution to the build
    ///
    /// `Ok(None)` means the component's hard prerequisite is absent (the
    /// backing peer package is not installed) — distinct from disabled by
    /// option, which returns an output with `enabled: false` so downstream
    /// components can still read the resolved state.
    async fn configure(
        &self,
        ctx: &ComponentContext,
    ) -> Result<Option<ComponentOutput>, ComposeError>;
}
