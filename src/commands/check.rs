//! `modplan check` command.

use crate::config::Config;
use crate::context::ServiceContext;
use crate::resolve::resolve;

/// Execute the `check` command.
///
/// Resolves the given roots, or every registered module when none are given,
/// and reports the first error. Malformed descriptors that no root reaches
/// were already logged as warnings while loading.
///
/// # Errors
///
/// Returns an error string if loading or resolution fails.
pub fn run(ctx: &ServiceContext, config: &Config, roots: &[String]) -> Result<(), String> {
    let registry = super::load_registry(ctx, config)?;

    let roots: Vec<String> = if roots.is_empty() {
        registry.names().into_iter().map(String::from).collect()
    } else {
        roots.to_vec()
    };

    let plan = resolve(&registry, &roots).map_err(|e| e.to_string())?;

    println!("OK: {} module(s) resolved from {} root(s).", plan.units.len(), plan.roots.len());
    Ok(())
}
