//! Visibility propagation: computes what each module sees and links.
//!
//! Modules are processed dependencies-first. For every module two views are
//! built:
//!
//! - the *exported* view, what a dependent inherits: the module's public
//!   include paths and public dependencies, plus the exported view of each
//!   public static dependency;
//! - the *effective* view, what the module itself compiles and links with:
//!   its own include paths and static dependencies, plus the exported view of
//!   every static dependency, public or private.
//!
//! Private dependencies therefore stop at the module that declared them, and
//! dynamic dependencies are never inherited at all.

use std::collections::{HashMap, HashSet};

use crate::descriptor::{PchUsage, Visibility};
use crate::graph::DependencyGraph;
use crate::registry::ModuleId;

/// Fully resolved compile and link requirements of one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    /// Registry handle.
    pub id: ModuleId,
    /// Module name.
    pub name: String,
    /// Own public and private include paths, then inherited public ones.
    pub effective_include_paths: Vec<String>,
    /// Own static dependencies, then inherited public link dependencies.
    pub effective_link_set: Vec<String>,
    /// Own dynamic dependencies only.
    pub dynamic_load_set: Vec<String>,
    /// Precompiled-header policy, passed through untouched.
    pub pch_usage: PchUsage,
}

/// What a module hands on to anything depending on it.
#[derive(Debug, Default)]
struct Exports {
    include_paths: OrderedSet,
    links: OrderedSet,
}

/// Resolves every module in `order`, which must list dependencies before
/// dependents (see [`crate::graph::topological_order`]).
///
/// The result follows `order`.
#[must_use]
pub fn propagate(graph: &DependencyGraph<'_>, order: &[ModuleId]) -> Vec<ResolvedModule> {
    let mut exports: HashMap<ModuleId, Exports> = HashMap::with_capacity(order.len());
    let mut resolved = Vec::with_capacity(order.len());

    for &id in order {
        let descriptor = graph.descriptor(id);

        let mut exported = Exports::default();
        exported.include_paths.extend(&descriptor.public_include_paths);

        let mut include_paths = OrderedSet::default();
        include_paths.extend(&descriptor.public_include_paths);
        include_paths.extend(&descriptor.private_include_paths);

        let mut links = OrderedSet::default();
        let static_deps: Vec<(ModuleId, Visibility)> = graph.static_dependencies(id).collect();
        for &(dep, visibility) in &static_deps {
            let dep_name = graph.name(dep);
            links.insert(dep_name);
            if visibility == Visibility::Public {
                exported.links.insert(dep_name);
            }
        }

        for &(dep, visibility) in &static_deps {
            let Some(inherited) = exports.get(&dep) else {
                continue;
            };
            include_paths.extend(inherited.include_paths.iter());
            links.extend(inherited.links.iter());
            if visibility == Visibility::Public {
                exported.include_paths.extend(inherited.include_paths.iter());
                exported.links.extend(inherited.links.iter());
            }
        }

        resolved.push(ResolvedModule {
            id,
            name: descriptor.name.clone(),
            effective_include_paths: include_paths.into_vec(),
            effective_link_set: links.into_vec(),
            dynamic_load_set: OrderedSet::from_iter(&descriptor.dynamic_dependencies).into_vec(),
            pch_usage: descriptor.pch_usage,
        });
        exports.insert(id, exported);
    }

    resolved
}

/// Insertion-ordered set of strings.
#[derive(Debug, Default)]
struct OrderedSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedSet {
    fn insert(&mut self, item: &str) {
        if !self.seen.contains(item) {
            self.seen.insert(item.to_string());
            self.items.push(item.to_string());
        }
    }

    fn extend<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for item in items {
            self.insert(item.as_ref());
        }
    }

    fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    fn into_vec(self) -> Vec<String> {
        self.items
    }
}

impl<S: AsRef<str>> FromIterator<S> for OrderedSet {
    fn from_iter<I: IntoIterator<Item = S>>(items: I) -> Self {
        let mut set = Self::default();
        set.extend(items);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ModuleDescriptor;
    use crate::graph::topological_order;
    use crate::registry::Registry;

    fn registry(descriptors: Vec<ModuleDescriptor>) -> Registry {
        let mut registry = Registry::new();
        for descriptor in descriptors {
            registry.register(descriptor).unwrap();
        }
        registry
    }

    fn resolve_all(registry: &Registry, roots: &[&str]) -> HashMap<String, ResolvedModule> {
        let graph = DependencyGraph::build(registry, roots).unwrap();
        let order = topological_order(&graph).unwrap();
        propagate(&graph, &order).into_iter().map(|m| (m.name.clone(), m)).collect()
    }

    /// App -public-> Ui -public-> Core, Ui -private-> Renderer -public-> Gpu.
    fn layered() -> Registry {
        registry(vec![
            ModuleDescriptor::leaf("App")
                .with_includes(&["App/Public"], &["App/Private"])
                .with_public(&["Ui"]),
            ModuleDescriptor::leaf("Ui")
                .with_includes(&["Ui/Public"], &["Ui/Private"])
                .with_public(&["Core"])
                .with_private(&["Renderer"]),
            ModuleDescriptor::leaf("Core").with_includes(&["Core/Public"], &["Core/Private"]),
            ModuleDescriptor::leaf("Renderer")
                .with_includes(&["Renderer/Public"], &["Renderer/Private"])
                .with_public(&["Gpu"]),
            ModuleDescriptor::leaf("Gpu").with_includes(&["Gpu/Public"], &[]),
        ])
    }

    #[test]
    fn public_chain_is_inherited() {
        let resolved = resolve_all(&layered(), &["App"]);
        let app = &resolved["App"];

        assert_eq!(
            app.effective_include_paths,
            vec!["App/Public", "App/Private", "Ui/Public", "Core/Public"]
        );
        assert_eq!(app.effective_link_set, vec!["Ui", "Core"]);
    }

    #[test]
    fn private_dependency_stops_at_declarer() {
        let resolved = resolve_all(&layered(), &["App"]);
        let ui = &resolved["Ui"];
        let app = &resolved["App"];

        assert_eq!(
            ui.effective_include_paths,
            vec!["Ui/Public", "Ui/Private", "Core/Public", "Renderer/Public", "Gpu/Public"]
        );
        assert_eq!(ui.effective_link_set, vec!["Core", "Renderer", "Gpu"]);

        assert!(!app.effective_link_set.contains(&"Renderer".to_string()));
        assert!(!app.effective_link_set.contains(&"Gpu".to_string()));
        assert!(!app.effective_include_paths.iter().any(|p| p.starts_with("Renderer")));
        assert!(!app.effective_include_paths.iter().any(|p| p.starts_with("Gpu")));
    }

    #[test]
    fn private_include_paths_never_leak() {
        let resolved = resolve_all(&layered(), &["App"]);
        for module in resolved.values() {
            for path in &module.effective_include_paths {
                if path.ends_with("/Private") {
                    assert!(path.starts_with(&module.name), "{path} leaked into {}", module.name);
                }
            }
        }
    }

    #[test]
    fn dynamic_dependencies_are_not_inherited() {
        let reg = registry(vec![
            ModuleDescriptor::leaf("Game").with_public(&["Engine"]),
            ModuleDescriptor::leaf("Engine").with_dynamic(&["Plugin"]),
            ModuleDescriptor::leaf("Plugin").with_includes(&["Plugin/Public"], &[]),
        ]);
        let resolved = resolve_all(&reg, &["Game"]);

        assert_eq!(resolved["Engine"].dynamic_load_set, vec!["Plugin"]);
        assert!(resolved["Engine"].effective_link_set.is_empty());
        assert!(resolved["Game"].dynamic_load_set.is_empty());
        assert_eq!(resolved["Game"].effective_link_set, vec!["Engine"]);
        assert!(resolved["Game"].effective_include_paths.is_empty());
    }

    #[test]
    fn visibility_is_per_edge() {
        // Shared is public to A and private to B; each dependent sees its own view.
        let reg = registry(vec![
            ModuleDescriptor::leaf("Top").with_private(&["A", "B"]),
            ModuleDescriptor::leaf("A").with_public(&["Shared"]),
            ModuleDescriptor::leaf("B").with_private(&["Shared"]),
            ModuleDescriptor::leaf("Shared").with_includes(&["Shared/Public"], &[]),
        ]);
        let resolved = resolve_all(&reg, &["Top"]);

        assert_eq!(resolved["Top"].effective_link_set, vec!["A", "B", "Shared"]);
        assert_eq!(resolved["Top"].effective_include_paths, vec!["Shared/Public"]);
        assert_eq!(resolved["B"].effective_link_set, vec!["Shared"]);
    }

    #[test]
    fn paths_are_deduplicated_in_first_seen_order() {
        let reg = registry(vec![
            ModuleDescriptor::leaf("App").with_includes(&["inc", "inc"], &["inc"]).with_public(&["Lib"]),
            ModuleDescriptor::leaf("Lib").with_includes(&["inc", "lib"], &[]),
        ]);
        let resolved = resolve_all(&reg, &["App"]);
        assert_eq!(resolved["App"].effective_include_paths, vec!["inc", "lib"]);
    }

    #[test]
    fn pch_usage_is_passed_through() {
        let mut descriptor = ModuleDescriptor::leaf("App");
        descriptor.pch_usage = PchUsage::NoPchs;
        let resolved = resolve_all(&registry(vec![descriptor]), &["App"]);
        assert_eq!(resolved["App"].pch_usage, PchUsage::NoPchs);
    }
}
