#![forbid(unsafe_code)]

//! The composition root
//!
//! Runs the component pipeline in its fixed order, threads the shared
//! context through it, and concatenates the returned fragments into the
//! final configuration array. Cross-component signals flow only forward:
//! the pipeline order is asserted against every component's declared
//! dependencies when the composer is constructed, so there is nothing to
//! detect at run time.
//!
//! Fragment order is a load-bearing contract: the external linter merges
//! matching entries last-wins, so emission order *is* rule precedence.
//! The composer always emits the global-ignores entry first and the global
//! overrides entry last.

use crate::component::Component;
use crate::components::{Javascript, Jsonc, Markdown, Test, Typescript, Vue, Yaml};
use crate::context::{ComponentContext, ComponentState};
use crate::error::ComposeError;
use crate::fragment::{FlatConfigEntry, Fragment};
use crate::globs::{ContentCategory, global_ignores};
use crate::options::RootOptions;
use crate::probe::{DirProbe, PeerProbe};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::Instrument;

/// The default component pipeline, in dependency order
pub fn default_pipeline() -> Vec<Box<dyn Component>> {
    vec![
        Box::new(Javascript),
        Box::new(Typescript),
        Box::new(Vue),
        Box::new(Test),
        Box::new(Markdown),
        Box::new(Yaml),
        Box::new(Jsonc),
    ]
}

/// Orchestrates one configuration build
pub struct Composer {
    components: Vec<Box<dyn Component>>,
    probe: Arc<dyn PeerProbe>,
}

impl Composer {
    /// Creates a composer over the default pipeline
    pub fn new(probe: Arc<dyn PeerProbe>) -> Self {
        Self::with_pipeline(default_pipeline(), probe)
    }

    /// Creates a composer over a custom pipeline
    ///
    /// # Panics
    ///
    /// Panics when a component's declared dependency does not appear
    /// earlier in the pipeline, or when two components share a name. Both
    /// are configuration-time defects in the pipeline definition; the
    /// fixed order is the cycle-breaking mechanism of the whole engine and
    /// must hold before any build runs.
    pub fn with_pipeline(components: Vec<Box<dyn Component>>, probe: Arc<dyn PeerProbe>) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        for component in &components {
            let name = component.name();
            for dependency in component.depends_on() {
                assert!(
                    seen.contains(dependency),
                    "component '{name}' depends on '{dependency}', which must run earlier in the pipeline"
                );
            }
            assert!(
                seen.insert(name),
                "duplicate component '{name}' in the pipeline"
            );
        }
        Self { components, probe }
    }

    /// Builds the final configuration array
    ///
    /// Deterministic: identical options and probe state produce an
    /// identical entry sequence. Components run strictly sequentially;
    /// each one's resolved state is recorded before the next starts.
    pub async fn compose(
        &self,
        options: RootOptions,
    ) -> Result<Vec<FlatConfigEntry>, ComposeError> {
        options.validate()?;

        let mut ctx = ComponentContext::new(options, self.probe.clone());
        let mut fragments: Vec<Fragment> = Vec::new();
        let mut unignored: BTreeSet<ContentCategory> = BTreeSet::new();

        for component in &self.components {
            let name = component.name();
            let span = tracing::debug_span!("configure", component = name);
            match component.configure(&ctx).instrument(span).await? {
                Some(output) => {
                    tracing::debug!(
                        component = name,
                        enabled = output.enabled,
                        fragments = output.fragments.len(),
                        "component configured"
                    );
                    ctx.record(
                        name,
                        ComponentState {
                            enabled: output.enabled,
                            resolved_options: output.resolved_options,
                        },
                    );
                    unignored.extend(output.unignored);
                    fragments.extend(output.fragments);
                }
                None => {
                    tracing::debug!(component = name, "prerequisite absent, skipped");
                    ctx.record(
                        name,
                        ComponentState {
                            enabled: false,
                            resolved_options: serde_json::Value::Null,
                        },
                    );
                }
            }
        }

        let mut entries = Vec::with_capacity(fragments.len() + 2);

        let unignored: Vec<ContentCategory> = unignored.into_iter().collect();
        let mut ignores = global_ignores(&unignored);
        ignores.extend(ctx.options.ignores.iter().cloned());
        entries.push(FlatConfigEntry::ignores_only("flatkit/ignores", ignores));

        entries.extend(fragments.into_iter().map(Fragment::into_flat_entry));

        if !ctx.options.overrides.is_empty() {
            let mut fragment = Fragment::new("flatkit/overrides");
            for (id, entry) in &ctx.options.overrides {
                fragment.upsert_rule(id.clone(), entry.clone());
            }
            entries.push(fragment.into_flat_entry());
        }

        Ok(entries)
    }
}

/// Builds the final configuration array with the default pipeline
///
/// Probes peers in `./node_modules`, the embedding project's install tree.
pub async fn compose(options: RootOptions) -> Result<Vec<FlatConfigEntry>, ComposeError> {
    Composer::new(Arc::new(DirProbe::new("node_modules")))
        .compose(options)
        .await
}
