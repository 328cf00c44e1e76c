//! Dependency graph over the modules reachable from a set of roots.
//!
//! An edge `A -> B` means "A depends on B" and carries the visibility and
//! timing under which A declared B. Nodes are [`ModuleId`] handles into the
//! registry the graph was built from.

pub mod order;

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::descriptor::{ModuleDescriptor, Timing, Visibility};
use crate::error::Result;
use crate::registry::{ModuleId, Registry};

pub use order::{check_acyclic, topological_order};

/// A single declared dependency between two modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DependencyEdge {
    /// The depending module.
    pub from: ModuleId,
    /// The module depended upon.
    pub to: ModuleId,
    /// Whether `to`'s interface is re-exported by `from`.
    pub visibility: Visibility,
    /// Whether `to` is needed at link time or loaded at runtime.
    pub timing: Timing,
}

/// Directed dependency graph restricted to the closure of the requested roots.
#[derive(Debug)]
pub struct DependencyGraph<'r> {
    registry: &'r Registry,
    roots: Vec<ModuleId>,
    nodes: Vec<ModuleId>,
    edges: Vec<DependencyEdge>,
    outgoing: HashMap<ModuleId, Vec<usize>>,
}

impl<'r> DependencyGraph<'r> {
    /// Builds the graph reachable from `roots` through public, private and
    /// dynamic dependencies.
    ///
    /// Roots are deduplicated and visited in ascending name order. Modules
    /// in the registry that are not reachable are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ResolveError::UnknownModule`] for a root or reference
    /// with no descriptor, or the recorded parse error of a malformed one.
    pub fn build<S: AsRef<str>>(registry: &'r Registry, roots: &[S]) -> Result<Self> {
        let mut root_names: Vec<&str> = roots.iter().map(AsRef::as_ref).collect();
        root_names.sort_unstable();
        root_names.dedup();

        let mut graph = Self {
            registry,
            roots: Vec::with_capacity(root_names.len()),
            nodes: Vec::new(),
            edges: Vec::new(),
            outgoing: HashMap::new(),
        };

        let mut visited: HashSet<ModuleId> = HashSet::new();
        let mut queue: VecDeque<ModuleId> = VecDeque::new();
        for name in root_names {
            let id = registry.resolve_ref(None, name)?;
            graph.roots.push(id);
            if visited.insert(id) {
                queue.push_back(id);
            }
        }

        let mut seen_edges: HashSet<DependencyEdge> = HashSet::new();
        while let Some(from) = queue.pop_front() {
            graph.nodes.push(from);
            let descriptor = registry.get(from);
            for (dep, visibility, timing) in descriptor.dependencies() {
                let to = registry.resolve_ref(Some(&descriptor.name), dep)?;
                let edge = DependencyEdge { from, to, visibility, timing };
                if seen_edges.insert(edge) {
                    graph.outgoing.entry(from).or_default().push(graph.edges.len());
                    graph.edges.push(edge);
                }
                if visited.insert(to) {
                    queue.push_back(to);
                }
            }
        }

        graph.nodes.sort_by(|a, b| registry.get(*a).name.cmp(&registry.get(*b).name));
        debug!(modules = graph.nodes.len(), edges = graph.edges.len(), "built dependency graph");
        Ok(graph)
    }

    /// The requested roots, in ascending name order.
    #[must_use]
    pub fn roots(&self) -> &[ModuleId] {
        &self.roots
    }

    /// Every reachable module, in ascending name order.
    #[must_use]
    pub fn nodes(&self) -> &[ModuleId] {
        &self.nodes
    }

    /// Every edge, in discovery order.
    #[must_use]
    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// Outgoing edges of `id`, in declaration order.
    pub fn edges_from(&self, id: ModuleId) -> impl Iterator<Item = &DependencyEdge> {
        let edges = &self.edges;
        self.outgoing.get(&id).into_iter().flatten().map(move |&i| &edges[i])
    }

    /// Static dependencies of `id` with their visibility, in declaration order.
    pub fn static_dependencies(
        &self,
        id: ModuleId,
    ) -> impl Iterator<Item = (ModuleId, Visibility)> + '_ {
        let edges = &self.edges;
        self.outgoing
            .get(&id)
            .into_iter()
            .flatten()
            .map(move |&i| edges[i])
            .filter(|e| e.timing == Timing::Static)
            .map(|e| (e.to, e.visibility))
    }

    /// Returns `true` if `id` is reachable from the roots.
    #[must_use]
    pub fn contains(&self, id: ModuleId) -> bool {
        self.nodes.binary_search_by(|n| self.name(*n).cmp(self.name(id))).is_ok()
    }

    /// Descriptor behind a node.
    #[must_use]
    pub fn descriptor(&self, id: ModuleId) -> &'r ModuleDescriptor {
        self.registry.get(id)
    }

    /// Module name behind a node.
    #[must_use]
    pub fn name(&self, id: ModuleId) -> &'r str {
        &self.registry.get(id).name
    }

    /// Number of reachable modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no roots were requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
