//! `modplan show` command.

use crate::config::Config;
use crate::context::ServiceContext;
use crate::descriptor::ModuleDescriptor;
use crate::error::ResolveError;

/// Execute the `show` command: pretty-print one module descriptor.
///
/// # Errors
///
/// Returns an error string if loading fails, the module is unknown, or its
/// descriptor file failed to parse.
pub fn run(ctx: &ServiceContext, config: &Config, name: &str) -> Result<(), String> {
    let registry = super::load_registry(ctx, config)?;
    let id = registry.resolve_ref(None, name).map_err(|e| match e {
        ResolveError::UnknownModule { missing, .. } => format!("unknown module {missing}"),
        other => other.to_string(),
    })?;
    print!("{}", format_descriptor(registry.get(id)));
    Ok(())
}

fn format_descriptor(descriptor: &ModuleDescriptor) -> String {
    let mut out = format!("Module: {}\n", descriptor.name);
    if !descriptor.pch_usage.is_default() {
        out.push_str(&format!("PCH usage: {}\n", descriptor.pch_usage));
    }
    for (label, items) in [
        ("Public include paths", &descriptor.public_include_paths),
        ("Private include paths", &descriptor.private_include_paths),
        ("Public dependencies", &descriptor.public_dependencies),
        ("Private dependencies", &descriptor.private_dependencies),
        ("Dynamic dependencies", &descriptor.dynamic_dependencies),
    ] {
        if items.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{label}:\n"));
        for item in items {
            out.push_str(&format!("  - {item}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{config, write_descriptors, GAME};

    #[test]
    fn formats_only_populated_sections() {
        let descriptor = ModuleDescriptor::leaf("Game").with_public(&["Engine"]).with_dynamic(&["Mods"]);
        let text = format_descriptor(&descriptor);

        assert!(text.starts_with("Module: Game\n"));
        assert!(text.contains("Public dependencies:\n  - Engine\n"));
        assert!(text.contains("Dynamic dependencies:\n  - Mods\n"));
        assert!(!text.contains("Private dependencies"));
        assert!(!text.contains("PCH usage"));
    }

    #[test]
    fn show_known_module() {
        let dir = tempfile::tempdir().unwrap();
        write_descriptors(dir.path(), &GAME);
        assert!(run(&ServiceContext::live(), &config(dir.path()), "Engine").is_ok());
    }

    #[test]
    fn show_unknown_module_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_descriptors(dir.path(), &GAME);
        let err = run(&ServiceContext::live(), &config(dir.path()), "Nope").unwrap_err();
        assert_eq!(err, "unknown module Nope");
    }

    #[test]
    fn show_malformed_module_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write_descriptors(
            dir.path(),
            &[("App.module.yaml", "name: App\n"), ("Broken.module.yaml", "name: [\n")],
        );
        let err = run(&ServiceContext::live(), &config(dir.path()), "Broken").unwrap_err();
        assert!(err.starts_with("failed to parse descriptor"), "{err}");
        assert!(err.contains("Broken.module.yaml"));
    }
}
