//! `modplan plan` command.

use std::path::Path;

use crate::config::Config;
use crate::context::ServiceContext;
use crate::plan::{render, PlanFormat};
use crate::resolve::resolve;

/// Execute the `plan` command.
///
/// Resolves `roots` and prints the rendered plan, or writes it to `output`.
///
/// # Errors
///
/// Returns an error string if loading, resolution, rendering or writing fails.
pub fn run(
    ctx: &ServiceContext,
    config: &Config,
    roots: &[String],
    format: PlanFormat,
    output: Option<&Path>,
) -> Result<(), String> {
    let registry = super::load_registry(ctx, config)?;
    let plan = resolve(&registry, roots).map_err(|e| e.to_string())?;
    let rendered = render(&plan, format)?;

    match output {
        Some(path) => {
            ctx.fs
                .write(path, &rendered)
                .map_err(|e| format!("Failed to write plan to {}: {e}", path.display()))?;
            eprintln!("Plan with {} unit(s) written to {}", plan.units.len(), path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
