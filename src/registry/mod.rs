//! Descriptor registry: indexes module descriptors by name.
//!
//! The registry is an explicitly constructed value owned by the caller and
//! passed to each resolution pass. Descriptors live in a `Vec`; a name table
//! maps each name to its [`ModuleId`] so that references can be resolved
//! lazily, after every descriptor has been registered.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use tracing::debug;

use crate::descriptor::ModuleDescriptor;
use crate::error::{ResolveError, Result};

/// Stable handle for a registered descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(usize);

/// Name-indexed set of module descriptors for one or more resolution passes.
#[derive(Debug, Default)]
pub struct Registry {
    descriptors: Vec<ModuleDescriptor>,
    index: HashMap<String, ModuleId>,
    malformed: BTreeMap<String, ResolveError>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor after validating it.
    ///
    /// Registering a descriptor identical to one already present is a no-op
    /// and returns the existing id.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::DuplicateModule`] if a different descriptor
    /// already uses the name, or the validation error from
    /// [`ModuleDescriptor::validate`].
    pub fn register(&mut self, descriptor: ModuleDescriptor) -> Result<ModuleId> {
        descriptor.validate()?;

        if let Some(&id) = self.index.get(&descriptor.name) {
            if self.descriptors[id.0] == descriptor {
                return Ok(id);
            }
            return Err(ResolveError::DuplicateModule { name: descriptor.name });
        }

        let id = ModuleId(self.descriptors.len());
        debug!(module = %descriptor.name, id = id.0, "registered descriptor");
        self.index.insert(descriptor.name.clone(), id);
        self.descriptors.push(descriptor);
        Ok(id)
    }

    /// Records a descriptor that failed to load.
    ///
    /// The error is reported only if a resolution pass reaches `name`.
    pub fn record_malformed(&mut self, name: &str, error: ResolveError) {
        debug!(module = %name, %error, "recorded malformed descriptor");
        self.malformed.entry(name.to_string()).or_insert(error);
    }

    /// Looks up a descriptor by name.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnknownModule`] if no descriptor has that name.
    pub fn lookup(&self, name: &str) -> Result<&ModuleDescriptor> {
        self.id(name)
            .map(|id| &self.descriptors[id.0])
            .ok_or_else(|| ResolveError::UnknownModule { module: None, missing: name.to_string() })
    }

    /// Resolves a reference made by `from` (or a root, when `from` is `None`).
    ///
    /// # Errors
    ///
    /// Returns the recorded parse error if `name` was malformed, otherwise
    /// [`ResolveError::UnknownModule`] naming both sides of the reference.
    pub fn resolve_ref(&self, from: Option<&str>, name: &str) -> Result<ModuleId> {
        if let Some(id) = self.id(name) {
            return Ok(id);
        }
        if let Some(error) = self.malformed.get(name) {
            return Err(error.clone());
        }
        Err(ResolveError::UnknownModule {
            module: from.map(ToString::to_string),
            missing: name.to_string(),
        })
    }

    /// Returns the id registered for `name`, if any.
    #[must_use]
    pub fn id(&self, name: &str) -> Option<ModuleId> {
        self.index.get(name).copied()
    }

    /// Returns the descriptor behind an id handed out by this registry.
    #[must_use]
    pub fn get(&self, id: ModuleId) -> &ModuleDescriptor {
        &self.descriptors[id.0]
    }

    /// Registered module names in ascending order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.index.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Names of descriptors that failed to load, with their errors.
    pub fn malformed(&self) -> impl Iterator<Item = (&str, &ResolveError)> {
        self.malformed.iter().map(|(name, err)| (name.as_str(), err))
    }

    /// Number of registered descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Builds a registry from descriptor text.
///
/// `source` is either JSON (an object or an array of objects) or a YAML
/// stream whose `---`-separated documents are each a descriptor or a list of
/// descriptors.
///
/// # Errors
///
/// Returns [`ResolveError::Parse`] on malformed input and
/// [`ResolveError::DuplicateModule`] on a name collision.
pub fn load_descriptors(source: &str) -> Result<Registry> {
    let mut registry = Registry::new();
    for descriptor in parse_descriptors(source, "<input>")? {
        registry.register(descriptor)?;
    }
    Ok(registry)
}

/// Parses descriptor text without registering it.
///
/// `origin` names the source in error messages.
///
/// # Errors
///
/// Returns [`ResolveError::Parse`] if any document is malformed.
pub fn parse_descriptors(source: &str, origin: &str) -> Result<Vec<ModuleDescriptor>> {
    let parse_error = |message: String| ResolveError::Parse { origin: origin.to_string(), message };

    let trimmed = source.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        let value: serde_json::Value =
            serde_json::from_str(source).map_err(|e| parse_error(e.to_string()))?;
        return match value {
            serde_json::Value::Array(_) => {
                serde_json::from_value(value).map_err(|e| parse_error(e.to_string()))
            }
            other => serde_json::from_value(other)
                .map(|d| vec![d])
                .map_err(|e| parse_error(e.to_string())),
        };
    }

    let mut descriptors = Vec::new();
    for document in serde_yaml::Deserializer::from_str(source) {
        let value = serde_yaml::Value::deserialize(document).map_err(|e| parse_error(e.to_string()))?;
        match value {
            serde_yaml::Value::Null => {}
            serde_yaml::Value::Sequence(_) => {
                let batch: Vec<ModuleDescriptor> =
                    serde_yaml::from_value(value).map_err(|e| parse_error(e.to_string()))?;
                descriptors.extend(batch);
            }
            other => {
                descriptors
                    .push(serde_yaml::from_value(other).map_err(|e| parse_error(e.to_string()))?);
            }
        }
    }
    Ok(descriptors)
}
