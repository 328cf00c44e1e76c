//! Cycle detection and build ordering over the static subgraph.
//!
//! Dynamic edges are ignored here: runtime-loaded modules may refer to each
//! other freely. Static cycles are found with Tarjan's strongly connected
//! components and are always fatal.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use tracing::debug;

use super::DependencyGraph;
use crate::error::{ResolveError, Result};
use crate::registry::ModuleId;

/// Fails if the static subgraph contains a cycle.
///
/// The reported cycle starts at the lowest-named member of the lowest-named
/// offending component, follows a shortest path back to it, and repeats the
/// first name at the end.
///
/// # Errors
///
/// Returns [`ResolveError::CyclicDependency`] when a cycle exists.
pub fn check_acyclic(graph: &DependencyGraph<'_>) -> Result<()> {
    let components = Tarjan::new(graph).run();

    let mut cyclic: Vec<Vec<ModuleId>> = components
        .into_iter()
        .filter(|component| {
            component.len() > 1
                || graph.static_dependencies(component[0]).any(|(to, _)| to == component[0])
        })
        .collect();
    if cyclic.is_empty() {
        return Ok(());
    }

    for component in &mut cyclic {
        component.sort_by(|a, b| graph.name(*a).cmp(graph.name(*b)));
    }
    cyclic.sort_by(|a, b| graph.name(a[0]).cmp(graph.name(b[0])));

    let cycle = trace_cycle(graph, &cyclic[0]);
    debug!(cycle = ?cycle, "static dependency cycle");
    Err(ResolveError::CyclicDependency { cycle })
}

/// Returns every reachable module so that each appears after all of its
/// static dependencies. Ties are broken by ascending module name.
///
/// # Errors
///
/// Returns [`ResolveError::CyclicDependency`] if the static subgraph is not
/// acyclic.
pub fn topological_order(graph: &DependencyGraph<'_>) -> Result<Vec<ModuleId>> {
    check_acyclic(graph)?;

    // pending[m] = distinct static dependencies of m not yet ordered.
    let mut pending: HashMap<ModuleId, usize> = HashMap::new();
    let mut dependents: HashMap<ModuleId, Vec<ModuleId>> = HashMap::new();
    for &id in graph.nodes() {
        let deps: HashSet<ModuleId> = graph.static_dependencies(id).map(|(to, _)| to).collect();
        pending.insert(id, deps.len());
        for dep in deps {
            dependents.entry(dep).or_default().push(id);
        }
    }

    let mut ready: BTreeSet<(&str, ModuleId)> = pending
        .iter()
        .filter(|&(_, &count)| count == 0)
        .map(|(&id, _)| (graph.name(id), id))
        .collect();

    let mut order = Vec::with_capacity(graph.len());
    while let Some((_, id)) = ready.pop_first() {
        order.push(id);
        for &dependent in dependents.get(&id).into_iter().flatten() {
            if let Some(count) = pending.get_mut(&dependent) {
                *count -= 1;
                if *count == 0 {
                    ready.insert((graph.name(dependent), dependent));
                }
            }
        }
    }

    Ok(order)
}

/// Shortest cycle through the first member of `component`, closed.
fn trace_cycle(graph: &DependencyGraph<'_>, component: &[ModuleId]) -> Vec<String> {
    let start = component[0];
    let members: HashSet<ModuleId> = component.iter().copied().collect();
    let successors = |id: ModuleId| {
        let mut next: Vec<ModuleId> = graph
            .static_dependencies(id)
            .map(|(to, _)| to)
            .filter(|to| members.contains(to))
            .collect();
        next.sort_by(|a, b| graph.name(*a).cmp(graph.name(*b)));
        next.dedup();
        next
    };

    let mut parent: HashMap<ModuleId, ModuleId> = HashMap::new();
    let mut queue = VecDeque::from([start]);
    while let Some(id) = queue.pop_front() {
        for next in successors(id) {
            if next == start {
                let mut path = vec![id];
                let mut cursor = id;
                while let Some(&prev) = parent.get(&cursor) {
                    path.push(prev);
                    cursor = prev;
                }
                path.reverse();
                let mut cycle: Vec<String> =
                    path.into_iter().map(|m| graph.name(m).to_string()).collect();
                cycle.push(graph.name(start).to_string());
                return cycle;
            }
            if next != start && !parent.contains_key(&next) {
                parent.insert(next, id);
                queue.push_back(next);
            }
        }
    }

    // Every member of a strongly connected component reaches every other.
    component.iter().map(|m| graph.name(*m).to_string()).collect()
}

/// Tarjan's strongly connected components over static edges.
struct Tarjan<'g, 'r> {
    graph: &'g DependencyGraph<'r>,
    next_index: usize,
    index: HashMap<ModuleId, usize>,
    lowlink: HashMap<ModuleId, usize>,
    stack: Vec<ModuleId>,
    on_stack: HashSet<ModuleId>,
    components: Vec<Vec<ModuleId>>,
}

impl<'g, 'r> Tarjan<'g, 'r> {
    fn new(graph: &'g DependencyGraph<'r>) -> Self {
        Self {
            graph,
            next_index: 0,
            index: HashMap::new(),
            lowlink: HashMap::new(),
            stack: Vec::new(),
            on_stack: HashSet::new(),
            components: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Vec<ModuleId>> {
        for &id in self.graph.nodes() {
            if !self.index.contains_key(&id) {
                self.visit(id);
            }
        }
        self.components
    }

    fn visit(&mut self, id: ModuleId) {
        self.index.insert(id, self.next_index);
        self.lowlink.insert(id, self.next_index);
        self.next_index += 1;
        self.stack.push(id);
        self.on_stack.insert(id);

        let successors: Vec<ModuleId> =
            self.graph.static_dependencies(id).map(|(to, _)| to).collect();
        for next in successors {
            if !self.index.contains_key(&next) {
                self.visit(next);
                let low = self.lowlink[&id].min(self.lowlink[&next]);
                self.lowlink.insert(id, low);
            } else if self.on_stack.contains(&next) {
                let low = self.lowlink[&id].min(self.index[&next]);
                self.lowlink.insert(id, low);
            }
        }

        if self.lowlink[&id] == self.index[&id] {
            let mut component = Vec::new();
            while let Some(member) = self.stack.pop() {
                self.on_stack.remove(&member);
                component.push(member);
                if member == id {
                    break;
                }
            }
            self.components.push(component);
        }
    }
}
