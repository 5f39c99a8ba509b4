//! Canopy Registry
//!
//! The registry owns a forest of root nodes and provides:
//! - Path-based addressing (`"root/child/grandchild"`)
//! - On-demand creation of missing path segments
//! - Dynamic bindings that keep subtrees in sync with external structs

mod builder;
mod dynamic;
mod path;
mod registry;

pub use builder::RegistryBuilder;
pub use dynamic::StructConverter;
pub use path::split_path;
pub use registry::Registry;
