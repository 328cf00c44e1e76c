//! Error taxonomy for descriptor loading and resolution.

use thiserror::Error;

/// Errors raised while loading descriptors or resolving a build plan.
///
/// Every variant aborts the current resolution pass; no partial plan is ever
/// produced.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A descriptor could not be parsed.
    #[error("failed to parse descriptor {origin}: {message}")]
    Parse {
        /// Where the descriptor came from (file path, module name or `<input>`).
        origin: String,
        /// Parser message.
        message: String,
    },

    /// Two different descriptors claim the same module name.
    #[error("module {name} is defined more than once with different contents")]
    DuplicateModule {
        /// The contested module name.
        name: String,
    },

    /// A descriptor lists a dependency twice, across tiers, or on itself.
    #[error("module {module} declares dependency {dependency} more than once")]
    DuplicateDependency {
        /// The declaring module.
        module: String,
        /// The repeated (or self-referencing) dependency name.
        dependency: String,
    },

    /// A referenced module has no descriptor.
    #[error("{}", unknown_message(.module, .missing))]
    UnknownModule {
        /// The module holding the reference; `None` for a requested root.
        module: Option<String>,
        /// The name that failed to resolve.
        missing: String,
    },

    /// The static dependency graph contains a cycle.
    #[error("cyclic dependency: {}", format_cycle(.cycle))]
    CyclicDependency {
        /// Module names along the cycle, closed (first name repeated last).
        cycle: Vec<String>,
    },

    /// A descriptor file or directory could not be read.
    #[error("failed to read {path}: {message}")]
    Io {
        /// The path being read.
        path: String,
        /// Underlying I/O message.
        message: String,
    },
}

impl ResolveError {
    /// Returns `true` for the duplicate-identity class of validation failures.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateModule { .. } | Self::DuplicateDependency { .. })
    }
}

fn unknown_message(module: &Option<String>, missing: &str) -> String {
    match module {
        Some(module) => format!("module {module} depends on unknown module {missing}"),
        None => format!("unknown root module {missing}"),
    }
}

fn format_cycle(cycle: &[String]) -> String {
    cycle.join(" -> ")
}

/// Convenience alias for resolver results.
pub type Result<T> = std::result::Result<T, ResolveError>;
