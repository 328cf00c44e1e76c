//! `modplan deps` command.

use std::fmt::Write as _;

use crate::config::Config;
use crate::context::ServiceContext;
use crate::graph::DependencyGraph;

/// Execute the `deps` command.
///
/// Prints every edge reachable from `root`, grouped by depending module in
/// name order.
///
/// # Errors
///
/// Returns an error string if loading fails or a reference does not resolve.
pub fn run(ctx: &ServiceContext, config: &Config, root: &str) -> Result<(), String> {
    let registry = super::load_registry(ctx, config)?;
    let graph = DependencyGraph::build(&registry, &[root]).map_err(|e| e.to_string())?;
    print!("{}", render_edges(&graph, root));
    Ok(())
}

fn render_edges(graph: &DependencyGraph<'_>, root: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Dependency Graph for {root}:");
    for &id in graph.nodes() {
        let edges: Vec<_> = graph.edges_from(id).collect();
        if edges.is_empty() {
            let _ = writeln!(out, "  {} (leaf)", graph.name(id));
            continue;
        }
        for edge in edges {
            let _ = writeln!(
                out,
                "  {} -> {} ({}, {})",
                graph.name(edge.from),
                graph.name(edge.to),
                edge.visibility,
                edge.timing
            );
        }
    }
    let _ = writeln!(out, "\n{} module(s), {} edge(s).", graph.len(), graph.edges().len());
    out
}
