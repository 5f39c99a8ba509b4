//! IndexerBuilder for declaring attribute indices up front.

use crate::attribute::{extract_key, KeyExtractor};
use crate::Indexer;
use canopy_core::{AttributeKind, Indexable};
use canopy_registry::Registry;
use std::fmt;

/// Builder for an Indexer whose attribute indices are built eagerly.
pub struct IndexerBuilder<'r> {
    registry: &'r Registry,
    indices: Vec<(String, AttributeKind, KeyExtractor)>,
}

impl<'r> IndexerBuilder<'r> {
    /// Create a new builder over a registry.
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            indices: Vec::new(),
        }
    }

    /// Declare an index for attribute `name` stored as `T`.
    pub fn attribute_index<T: Indexable>(&mut self, name: impl Into<String>) -> &mut Self {
        self.indices
            .push((name.into(), AttributeKind::of::<T>(), extract_key::<T>));
        self
    }

    /// Build the Indexer: basic indices first, then each declared index.
    pub fn build(self) -> Indexer<'r> {
        let mut indexer = Indexer::new(self.registry);
        for (name, kind, extract) in self.indices {
            indexer.create_attribute_index_raw(&name, kind, extract);
        }
        indexer
    }
}

impl fmt::Debug for IndexerBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indices: Vec<_> = self
            .indices
            .iter()
            .map(|(name, kind, _)| (name.as_str(), kind.name()))
            .collect();
        f.debug_struct("IndexerBuilder")
            .field("indices", &indices)
            .finish_non_exhaustive()
    }
}
