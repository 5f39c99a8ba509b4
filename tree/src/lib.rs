//! Canopy Tree Storage
//!
//! This crate provides the hierarchical node storage:
//! - Node: named, identified unit owning attributes and children
//! - NodeHandle: shared, reference-counted view into a live tree
//! - Structural merge: patch a live subtree to match a fresh snapshot
//! - Dotted attribute paths: address attributes of named descendants

mod handle;
mod merge;
mod node;
mod path;

pub use handle::*;
pub use merge::*;
pub use node::*;
pub use path::*;
