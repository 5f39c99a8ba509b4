//! Canopy Core Types
//!
//! This crate provides the foundational types used throughout Canopy:
//! - Type-erased attribute storage (AttributeValue, AttributeKind)
//! - Cross-type ordered keys for attribute indices (IndexKey)
//! - Common error types

mod attribute;
mod error;
mod key;

pub use attribute::*;
pub use error::*;
pub use key::*;
