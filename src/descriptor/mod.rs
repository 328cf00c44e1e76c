//! Module descriptor types.
//!
//! Defines the Rust types that mirror the descriptor schema. Descriptors are
//! deserialized by the registry and the descriptor store, then consumed by
//! the graph builder.

mod module_descriptor;
mod pch;
mod tier;

pub use module_descriptor::ModuleDescriptor;
pub use pch::PchUsage;
pub use tier::{Timing, Visibility};
