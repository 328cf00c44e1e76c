//! Runtime configuration: CLI flags over environment over defaults.

use std::path::PathBuf;

use crate::plan::PlanFormat;

/// Environment variable naming the descriptor root directory.
pub const DESCRIPTORS_ENV: &str = "MODPLAN_DESCRIPTORS";
/// Environment variable naming the default plan format.
pub const FORMAT_ENV: &str = "MODPLAN_FORMAT";
/// Descriptor root used when nothing else is configured.
pub const DEFAULT_DESCRIPTORS: &str = "Source";

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory searched for descriptor files.
    pub descriptors: PathBuf,
    /// Plan format used when `--format` is not given.
    pub format: PlanFormat,
}

impl Config {
    /// Builds the configuration from an optional CLI override and the
    /// process environment. An optional `.env` file is loaded first; variables
    /// already set in the environment win over it.
    ///
    /// # Errors
    ///
    /// Returns an error string if `MODPLAN_FORMAT` holds an unknown format.
    pub fn from_env(descriptors: Option<PathBuf>) -> Result<Self, String> {
        // A missing .env is the common case.
        let _ = dotenvy::dotenv();
        Self::resolve(descriptors, |key| std::env::var(key).ok())
    }

    /// Builds the configuration from an explicit variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error string if the format variable holds an unknown format.
    pub fn resolve<F>(descriptors: Option<PathBuf>, lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let descriptors = descriptors
            .or_else(|| lookup(DESCRIPTORS_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DESCRIPTORS));
        let format = match lookup(FORMAT_ENV) {
            Some(value) => value.parse().map_err(|e| format!("{FORMAT_ENV}: {e}"))?,
            None => PlanFormat::default(),
        };
        Ok(Self { descriptors, format })
    }
}
