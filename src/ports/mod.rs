//! Port traits defining external boundaries.
//!
//! The resolver core only touches the filesystem, through the trait below.
//! Implementations live in `src/adapters/`.

pub mod filesystem;

pub use filesystem::FileSystem;
