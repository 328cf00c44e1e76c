//! Core module descriptor type.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::pch::PchUsage;
use super::tier::{Timing, Visibility};
use crate::error::{ResolveError, Result};

/// Declarative description of one module: its include paths and the modules
/// it depends on, split by visibility tier and load timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModuleDescriptor {
    /// Unique module name.
    pub name: String,
    /// Include paths exposed to dependents.
    #[serde(default)]
    pub public_include_paths: Vec<String>,
    /// Include paths used only when compiling this module.
    #[serde(default)]
    pub private_include_paths: Vec<String>,
    /// Modules whose interface this module re-exports.
    #[serde(default)]
    pub public_dependencies: Vec<String>,
    /// Modules needed only to build this module.
    #[serde(default)]
    pub private_dependencies: Vec<String>,
    /// Modules loaded at runtime, never linked.
    #[serde(default)]
    pub dynamic_dependencies: Vec<String>,
    /// Precompiled-header policy.
    #[serde(default, skip_serializing_if = "PchUsage::is_default")]
    pub pch_usage: PchUsage,
}

impl ModuleDescriptor {
    /// Creates a descriptor with no include paths and no dependencies.
    #[must_use]
    pub fn leaf(name: &str) -> Self {
        Self {
            name: name.to_string(),
            public_include_paths: Vec::new(),
            private_include_paths: Vec::new(),
            public_dependencies: Vec::new(),
            private_dependencies: Vec::new(),
            dynamic_dependencies: Vec::new(),
            pch_usage: PchUsage::Default,
        }
    }

    /// Replaces the public dependency list.
    #[must_use]
    pub fn with_public(mut self, names: &[&str]) -> Self {
        self.public_dependencies = names.iter().map(ToString::to_string).collect();
        self
    }

    /// Replaces the private dependency list.
    #[must_use]
    pub fn with_private(mut self, names: &[&str]) -> Self {
        self.private_dependencies = names.iter().map(ToString::to_string).collect();
        self
    }

    /// Replaces the dynamic dependency list.
    #[must_use]
    pub fn with_dynamic(mut self, names: &[&str]) -> Self {
        self.dynamic_dependencies = names.iter().map(ToString::to_string).collect();
        self
    }

    /// Replaces both include path lists.
    #[must_use]
    pub fn with_includes(mut self, public: &[&str], private: &[&str]) -> Self {
        self.public_include_paths = public.iter().map(ToString::to_string).collect();
        self.private_include_paths = private.iter().map(ToString::to_string).collect();
        self
    }

    /// Iterates every declared dependency with its tier, in declaration order:
    /// public, then private, then dynamic.
    pub fn dependencies(&self) -> impl Iterator<Item = (&str, Visibility, Timing)> {
        let public =
            self.public_dependencies.iter().map(|d| (d.as_str(), Visibility::Public, Timing::Static));
        let private = self
            .private_dependencies
            .iter()
            .map(|d| (d.as_str(), Visibility::Private, Timing::Static));
        let dynamic = self
            .dynamic_dependencies
            .iter()
            .map(|d| (d.as_str(), Visibility::Private, Timing::Dynamic));
        public.chain(private).chain(dynamic)
    }

    /// Static (public and private) dependencies in declaration order.
    pub fn static_dependencies(&self) -> impl Iterator<Item = &str> {
        self.public_dependencies.iter().chain(&self.private_dependencies).map(String::as_str)
    }

    /// Checks the descriptor's own invariants.
    ///
    /// A name may appear at most once across the three dependency lists, and
    /// a module may not depend on itself.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Parse`] for an empty name and
    /// [`ResolveError::DuplicateDependency`] for a repeated or self-referencing
    /// dependency.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ResolveError::Parse {
                origin: "<descriptor>".to_string(),
                message: "module name must not be empty".to_string(),
            });
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for (dep, _, _) in self.dependencies() {
            if dep == self.name || !seen.insert(dep) {
                return Err(ResolveError::DuplicateDependency {
                    module: self.name.clone(),
                    dependency: dep.to_string(),
                });
            }
        }
        Ok(())
    }
}
