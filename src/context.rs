//! Service context bundling the port trait objects.

use crate::ports::filesystem::FileSystem;

/// Bundles the port trait objects used by commands.
///
/// Constructors wire up different adapter implementations; tests swap in an
/// in-memory filesystem.
pub struct ServiceContext {
    /// Filesystem for descriptor reads and plan writes.
    pub fs: Box<dyn FileSystem>,
}

impl ServiceContext {
    /// Creates a live context backed by the real filesystem.
    #[must_use]
    pub fn live() -> Self {
        use crate::adapters::live::filesystem::LiveFileSystem;

        Self { fs: Box::new(LiveFileSystem) }
    }

    /// Creates a context around the given filesystem.
    #[must_use]
    pub fn with_fs(fs: Box<dyn FileSystem>) -> Self {
        Self { fs }
    }
}
