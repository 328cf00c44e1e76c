//! Descriptor store: discovers descriptor files under a source tree.
//!
//! Descriptors are files named `<Module>.module.yaml`, `<Module>.module.yml`
//! or `<Module>.module.json`, anywhere below the root. A typical layout:
//!
//! ```text
//! <root>/
//!   ├── Core/Core.module.yaml
//!   └── Game/
//!       ├── Game.module.yaml
//!       └── Plugins/Mods.module.json
//! ```
//!
//! All I/O goes through the `FileSystem` port.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::context::ServiceContext;
use crate::error::{ResolveError, Result};
use crate::registry::{parse_descriptors, Registry};

/// Recognised descriptor file suffixes.
const DESCRIPTOR_SUFFIXES: [&str; 3] = [".module.yaml", ".module.yml", ".module.json"];

/// Loads module descriptors from a directory tree.
pub struct DescriptorStore<'a> {
    ctx: &'a ServiceContext,
    root: PathBuf,
}

impl<'a> DescriptorStore<'a> {
    /// Creates a new store rooted at the given path.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, root: &Path) -> Self {
        Self { ctx, root: root.to_path_buf() }
    }

    /// Loads every descriptor file into a fresh registry.
    ///
    /// Files are read in sorted path order. A file that fails to parse, or
    /// holds a descriptor with an empty name, is recorded under the module
    /// name taken from its file name; the error
    /// only surfaces if a resolution pass reaches that module. A missing root
    /// yields an empty registry.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Io`] if a file or directory cannot be read and
    /// [`ResolveError::DuplicateModule`] or
    /// [`ResolveError::DuplicateDependency`] if registration fails.
    pub fn load(&self) -> Result<Registry> {
        let mut registry = Registry::new();
        if !self.ctx.fs.exists(&self.root) {
            debug!(root = %self.root.display(), "descriptor root does not exist");
            return Ok(registry);
        }

        for path in self.descriptor_files()? {
            let origin = path.display().to_string();
            let contents = self
                .ctx
                .fs
                .read_to_string(&path)
                .map_err(|e| ResolveError::Io { path: origin.clone(), message: e.to_string() })?;

            let loaded = parse_descriptors(&contents, &origin).and_then(|descriptors| {
                descriptors.into_iter().try_for_each(|d| registry.register(d).map(drop))
            });
            match loaded {
                Ok(()) => {}
                // Unreadable or invalid content; duplicates stay fatal.
                Err(ResolveError::Parse { message, .. }) => {
                    let error = ResolveError::Parse { origin: origin.clone(), message };
                    let name = module_name(&path).unwrap_or_default();
                    warn!(file = %origin, %error, "skipping malformed descriptor");
                    registry.record_malformed(&name, error);
                }
                Err(error) => return Err(error),
            }
        }

        debug!(modules = registry.len(), root = %self.root.display(), "loaded descriptors");
        Ok(registry)
    }

    /// Lists descriptor files below the root, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Io`] if a directory cannot be listed.
    pub fn descriptor_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending = vec![self.root.clone()];
        while let Some(dir) = pending.pop() {
            let entries = self.ctx.fs.list_dir(&dir).map_err(|e| ResolveError::Io {
                path: dir.display().to_string(),
                message: e.to_string(),
            })?;
            for entry in entries {
                let path = dir.join(&entry);
                if module_name(&path).is_some() {
                    files.push(path);
                } else if self.ctx.fs.is_dir(&path) {
                    pending.push(path);
                }
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Module name encoded in a descriptor file name, if it is one.
fn module_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    DESCRIPTOR_SUFFIXES
        .iter()
        .find_map(|suffix| file_name.strip_suffix(suffix))
        .filter(|stem| !stem.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::ports::filesystem::FileSystem;

    /// In-memory filesystem for testing the store without touching disk.
    struct MemFs {
        files: Mutex<HashMap<PathBuf, String>>,
    }

    impl MemFs {
        fn with(files: &[(&str, &str)]) -> Self {
            let files = files.iter().map(|(p, c)| (PathBuf::from(*p), (*c).to_string())).collect();
            Self { files: Mutex::new(files) }
        }
    }

    impl FileSystem for MemFs {
        fn read_to_string(
            &self,
            path: &Path,
        ) -> std::result::Result<String, Box<dyn std::error::Error + Send + Sync>> {
            let files = self.files.lock().unwrap();
            files
                .get(path)
                .cloned()
                .ok_or_else(|| format!("File not found: {}", path.display()).into())
        }

        fn write(
            &self,
            path: &Path,
            contents: &str,
        ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
            let mut files = self.files.lock().unwrap();
            files.insert(path.to_path_buf(), contents.to_string());
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            let files = self.files.lock().unwrap();
            files.contains_key(path) || files.keys().any(|k| k.starts_with(path) && k != path)
        }

        fn is_dir(&self, path: &Path) -> bool {
            let files = self.files.lock().unwrap();
            files.keys().any(|k| k.starts_with(path) && k != path)
        }

        fn list_dir(
            &self,
            path: &Path,
        ) -> std::result::Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
            let files = self.files.lock().unwrap();
            let mut names: Vec<String> = files
                .keys()
                .filter_map(|k| k.strip_prefix(path).ok())
                .filter_map(|rest| rest.components().next())
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            names.sort();
            names.dedup();
            Ok(names)
        }
    }

    fn context(files: &[(&str, &str)]) -> ServiceContext {
        ServiceContext::with_fs(Box::new(MemFs::with(files)))
    }

    #[test]
    fn loads_nested_descriptor_files() {
        let ctx = context(&[
            ("/src/Game/Game.module.yaml", "name: Game\npublicDependencies: [Core]\n"),
            ("/src/Core/Core.module.json", r#"{"name": "Core"}"#),
            ("/src/Game/README.md", "not a descriptor"),
        ]);
        let store = DescriptorStore::new(&ctx, Path::new("/src"));

        let files = store.descriptor_files().unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("/src/Core/Core.module.json"),
                PathBuf::from("/src/Game/Game.module.yaml"),
            ]
        );

        let registry = store.load().unwrap();
        assert_eq!(registry.names(), vec!["Core", "Game"]);
    }

    #[test]
    fn missing_root_is_empty() {
        let ctx = context(&[]);
        let store = DescriptorStore::new(&ctx, Path::new("/nowhere"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn malformed_file_is_recorded_not_fatal() {
        let ctx = context(&[
            ("/src/App.module.yaml", "name: App\n"),
            ("/src/Broken.module.yaml", "name: [oops\n"),
        ]);
        let store = DescriptorStore::new(&ctx, Path::new("/src"));

        let registry = store.load().unwrap();
        assert_eq!(registry.names(), vec!["App"]);

        let err = registry.resolve_ref(Some("App"), "Broken").unwrap_err();
        assert!(matches!(err, ResolveError::Parse { ref origin, .. } if origin.contains("Broken")));
    }

    #[test]
    fn blank_module_name_is_recorded_against_its_file() {
        let ctx = context(&[
            ("/src/App.module.yaml", "name: App\n"),
            ("/src/Blank.module.yaml", "name: \"\"\n"),
        ]);
        let store = DescriptorStore::new(&ctx, Path::new("/src"));

        let registry = store.load().unwrap();
        assert_eq!(registry.names(), vec!["App"]);
        assert!(crate::resolve::resolve(&registry, &["App"]).is_ok());

        match registry.resolve_ref(Some("App"), "Blank").unwrap_err() {
            ResolveError::Parse { origin, message } => {
                assert_eq!(origin, "/src/Blank.module.yaml");
                assert!(message.contains("must not be empty"));
            }
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_dependency_is_fatal() {
        let ctx = context(&[(
            "/src/App.module.yaml",
            "name: App\npublicDependencies: [Core]\nprivateDependencies: [Core]\n",
        )]);
        let store = DescriptorStore::new(&ctx, Path::new("/src"));
        let err = store.load().unwrap_err();
        assert!(matches!(err, ResolveError::DuplicateDependency { .. }));
    }

    #[test]
    fn duplicate_names_across_files_fail() {
        let ctx = context(&[
            ("/src/a/Core.module.yaml", "name: Core\n"),
            ("/src/b/Core.module.yaml", "name: Core\nprivateIncludePaths: [x]\n"),
        ]);
        let store = DescriptorStore::new(&ctx, Path::new("/src"));
        let err = store.load().unwrap_err();
        assert_eq!(err, ResolveError::DuplicateModule { name: "Core".to_string() });
    }

    #[test]
    fn module_name_from_file_name() {
        assert_eq!(module_name(Path::new("x/Core.module.yaml")).as_deref(), Some("Core"));
        assert_eq!(module_name(Path::new("x/Core.module.yml")).as_deref(), Some("Core"));
        assert_eq!(module_name(Path::new("Core.module.json")).as_deref(), Some("Core"));
        assert_eq!(module_name(Path::new("Core.yaml")), None);
        assert_eq!(module_name(Path::new(".module.yaml")), None);
    }
}
