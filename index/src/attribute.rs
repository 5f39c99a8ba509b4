//! Ordered attribute index: key -> nodes.

use canopy_core::{AttributeKind, AttributeValue, IndexKey, Indexable};
use canopy_registry::Registry;
use canopy_tree::NodeHandle;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound;

/// Extracts the index key from an attribute stored under one concrete type.
pub(crate) type KeyExtractor = fn(&AttributeValue) -> Option<IndexKey>;

pub(crate) fn extract_key<T: Indexable>(value: &AttributeValue) -> Option<IndexKey> {
    value.downcast_ref::<T>().map(Indexable::index_key)
}

/// Index over one (attribute name, attribute type) pair.
pub(crate) struct AttributeIndex {
    kind: AttributeKind,
    extract: KeyExtractor,
    /// Nodes per key, in traversal order within a key.
    entries: BTreeMap<IndexKey, Vec<NodeHandle>>,
}

impl AttributeIndex {
    pub(crate) fn new(kind: AttributeKind, extract: KeyExtractor) -> Self {
        Self {
            kind,
            extract,
            entries: BTreeMap::new(),
        }
    }

    /// An empty index for attributes of type `T`.
    pub(crate) fn of<T: Indexable>() -> Self {
        Self::new(AttributeKind::of::<T>(), extract_key::<T>)
    }

    pub(crate) fn kind(&self) -> AttributeKind {
        self.kind
    }

    /// Rebuild from scratch by traversing the whole forest.
    pub(crate) fn rebuild(&mut self, attr_name: &str, registry: &Registry) {
        self.entries.clear();
        let extract = self.extract;
        let mut indexed = 0usize;
        registry.traverse_nodes(|node| {
            let key = node.borrow().attribute_value(attr_name).and_then(extract);
            if let Some(key) = key {
                self.entries.entry(key).or_default().push(node.clone());
                indexed += 1;
            }
        });
        tracing::debug!(
            attribute = %attr_name,
            kind = %self.kind,
            nodes = indexed,
            keys = self.entries.len(),
            "built attribute index"
        );
    }

    pub(crate) fn find_exact(&self, key: &IndexKey) -> Vec<NodeHandle> {
        self.entries.get(key).cloned().unwrap_or_default()
    }

    /// Nodes whose key falls within the bounds, ascending by key.
    pub(crate) fn find_range(&self, lower: Bound<IndexKey>, upper: Bound<IndexKey>) -> Vec<NodeHandle> {
        if is_empty_range(&lower, &upper) {
            return Vec::new();
        }
        self.entries
            .range((lower, upper))
            .flat_map(|(_, nodes)| nodes.iter().cloned())
            .collect()
    }
}

impl fmt::Debug for AttributeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeIndex")
            .field("kind", &self.kind)
            .field("entries", &self.entries)
            .finish()
    }
}

/// `BTreeMap::range` panics on inverted bounds; those ranges select nothing.
fn is_empty_range(lower: &Bound<IndexKey>, upper: &Bound<IndexKey>) -> bool {
    match (lower, upper) {
        (Bound::Included(lo), Bound::Included(hi)) => lo > hi,
        (Bound::Included(lo), Bound::Excluded(hi))
        | (Bound::Excluded(lo), Bound::Included(hi))
        | (Bound::Excluded(lo), Bound::Excluded(hi)) => lo >= hi,
        _ => false,
    }
}
