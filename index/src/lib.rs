//! Canopy Indexer
//!
//! Read-side caches over a registry's forest:
//! - Name index: name -> nodes sharing that name
//! - Id index: id -> node
//! - Attribute indices: (attribute, type) -> ordered key -> nodes, for exact
//!   and range lookups
//!
//! Indices are never invalidated by tree mutation; call
//! [`Indexer::refresh_index`] after changing the tree.

mod attribute;
mod builder;
mod indexer;

pub use builder::IndexerBuilder;
pub use indexer::{Indexer, Predicate};
