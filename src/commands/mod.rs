//! Command dispatch and handlers.

pub mod check;
pub mod deps;
pub mod list;
pub mod plan;
pub mod show;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::registry::Registry;
use crate::store::DescriptorStore;

/// Dispatch a parsed command line to its handler.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the selected
/// command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let config = Config::from_env(cli.descriptors.clone())?;
    let ctx = ServiceContext::live();
    dispatch_with_context(&cli.command, &ctx, &config)
}

/// Dispatch a command with the given service context and configuration.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    config: &Config,
) -> Result<(), String> {
    match command {
        Command::Plan { roots, format, output } => {
            plan::run(ctx, config, roots, format.unwrap_or(config.format), output.as_deref())
        }
        Command::Check { roots } => check::run(ctx, config, roots),
        Command::List => list::run(ctx, config),
        Command::Show { name } => show::run(ctx, config, name),
        Command::Deps { root } => deps::run(ctx, config, root),
    }
}

/// Loads the descriptor registry named by `config`.
fn load_registry(ctx: &ServiceContext, config: &Config) -> Result<Registry, String> {
    DescriptorStore::new(ctx, &config.descriptors).load().map_err(|e| e.to_string())
}
