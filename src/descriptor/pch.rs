//! Precompiled-header policy carried through to build units.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a module uses precompiled headers.
///
/// The resolver never interprets this value; it is forwarded verbatim to the
/// compiler driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PchUsage {
    /// Let the driver decide.
    #[default]
    Default,
    /// Use an explicit PCH if the module has one, otherwise a shared one.
    UseExplicitOrSharedPchs,
    /// Always use a shared PCH.
    UseSharedPchs,
    /// Disable precompiled headers.
    NoPchs,
}

impl PchUsage {
    /// Returns `true` for [`PchUsage::Default`].
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::Default
    }
}

impl fmt::Display for PchUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Default => "default",
            Self::UseExplicitOrSharedPchs => "useExplicitOrSharedPchs",
            Self::UseSharedPchs => "useSharedPchs",
            Self::NoPchs => "noPchs",
        })
    }
}
