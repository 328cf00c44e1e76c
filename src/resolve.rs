//! Resolution pipeline: registry and roots in, ordered build plan out.

use tracing::info;

use crate::error::Result;
use crate::graph::{topological_order, DependencyGraph};
use crate::plan::{emit, BuildPlan};
use crate::propagate::propagate;
use crate::registry::Registry;

/// Resolves `roots` against `registry` into an ordered build plan.
///
/// Each call is an independent pass: it builds its own graph and resolved
/// modules and shares nothing but the read-only registry, so separate root
/// sets may be resolved concurrently.
///
/// # Errors
///
/// Returns [`crate::ResolveError::UnknownModule`] (or a recorded
/// [`crate::ResolveError::Parse`]) for an unresolvable reference and
/// [`crate::ResolveError::CyclicDependency`] for a static cycle. No partial
/// plan is returned.
pub fn resolve<S: AsRef<str>>(registry: &Registry, roots: &[S]) -> Result<BuildPlan> {
    let graph = DependencyGraph::build(registry, roots)?;
    let order = topological_order(&graph)?;
    let resolved = propagate(&graph, &order);

    let root_names = graph.roots().iter().map(|id| graph.name(*id).to_string()).collect();
    let plan = emit(root_names, resolved);
    info!(roots = ?plan.roots, units = plan.units.len(), "resolved build plan");
    Ok(plan)
}
