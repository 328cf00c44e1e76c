//! Module descriptor resolver.
//!
//! Loads declarative module descriptors, builds the dependency graph
//! reachable from a set of root modules, checks it for static cycles,
//! propagates include paths and link dependencies according to each edge's
//! visibility, and emits an ordered build plan for a compiler/linker driver.
//!
//! ```
//! use modplan::{load_descriptors, resolve};
//!
//! let registry = load_descriptors(
//!     "name: Game\npublicDependencies: [Core]\n---\nname: Core\npublicIncludePaths: [Core/Public]\n",
//! )?;
//! let plan = resolve(&registry, &["Game"])?;
//! assert_eq!(plan.order(), vec!["Core", "Game"]);
//! assert_eq!(plan.units[1].effective_include_paths, vec!["Core/Public"]);
//! # Ok::<(), modplan::ResolveError>(())
//! ```

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod graph;
pub mod logging;
pub mod plan;
pub mod ports;
pub mod propagate;
pub mod registry;
pub mod resolve;
pub mod store;

use clap::Parser;

pub use descriptor::{ModuleDescriptor, PchUsage, Timing, Visibility};
pub use error::ResolveError;
pub use plan::{BuildPlan, BuildUnit, PlanFormat};
pub use registry::{load_descriptors, ModuleId, Registry};
pub use resolve::resolve;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // --help and --version are not failures.
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    logging::init_logging(cli.verbose);
    commands::dispatch(&cli)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["modplan", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_prints_help_successfully() {
        assert!(run(["modplan", "--help"]).is_ok());
    }

    #[test]
    fn run_lists_an_empty_descriptor_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = run([
            "modplan".into(),
            "list".into(),
            "--descriptors".into(),
            dir.path().as_os_str().to_owned(),
        ]);
        assert!(result.is_ok());
    }
}
