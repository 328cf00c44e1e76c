//! `modplan list` command.

use crate::config::Config;
use crate::context::ServiceContext;
use crate::registry::Registry;

/// Execute the `list` command.
///
/// Displays a table of all registered modules with the size of each
/// dependency tier.
///
/// # Errors
///
/// Returns an error string if descriptor loading fails.
pub fn run(ctx: &ServiceContext, config: &Config) -> Result<(), String> {
    let registry = super::load_registry(ctx, config)?;
    if registry.is_empty() {
        println!("No modules found in {}.", config.descriptors.display());
        return Ok(());
    }
    print!("{}", render_table(&registry));
    Ok(())
}

fn render_table(registry: &Registry) -> String {
    // Collect rows for column-width calculation.
    let rows: Vec<[String; 4]> = registry
        .names()
        .into_iter()
        .filter_map(|name| registry.lookup(name).ok())
        .map(|d| {
            [
                d.name.clone(),
                d.public_dependencies.len().to_string(),
                d.private_dependencies.len().to_string(),
                d.dynamic_dependencies.len().to_string(),
            ]
        })
        .collect();

    let name_width = rows.iter().map(|r| r[0].len()).max().unwrap_or(6).max(6);

    let mut out = format!("{:<name_width$}  {:>6}  {:>7}  {:>7}\n", "MODULE", "PUBLIC", "PRIVATE", "DYNAMIC");
    out.push_str(&format!("{:-<name_width$}  {:-<6}  {:-<7}  {:-<7}\n", "", "", "", ""));
    for [name, public, private, dynamic] in &rows {
        out.push_str(&format!("{name:<name_width$}  {public:>6}  {private:>7}  {dynamic:>7}\n"));
    }

    let malformed = registry.malformed().count();
    out.push_str(&format!("\n{} module(s) total.", rows.len()));
    if malformed > 0 {
        out.push_str(&format!(" {malformed} malformed descriptor(s) skipped."));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{config, write_descriptors, GAME};
    use crate::descriptor::ModuleDescriptor;

    #[test]
    fn table_lists_modules_sorted() {
        let mut registry = Registry::new();
        registry.register(ModuleDescriptor::leaf("Zeta").with_public(&["Alpha"])).unwrap();
        registry.register(ModuleDescriptor::leaf("Alpha")).unwrap();

        let table = render_table(&registry);
        let alpha = table.find("Alpha ").unwrap();
        let zeta = table.find("Zeta ").unwrap();
        assert!(alpha < zeta);
        assert!(table.starts_with("MODULE"));
        assert!(table.contains("2 module(s) total."));
    }

    #[test]
    fn list_command_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(&ServiceContext::live(), &config(dir.path())).is_ok());
    }

    #[test]
    fn list_command_with_modules() {
        let dir = tempfile::tempdir().unwrap();
        write_descriptors(dir.path(), &GAME);
        assert!(run(&ServiceContext::live(), &config(dir.path())).is_ok());
    }
}
