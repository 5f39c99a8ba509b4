//! Indexer over a registry's forest.

use crate::attribute::{AttributeIndex, KeyExtractor};
use crate::IndexerBuilder;
use canopy_core::{AttributeKind, AttributeType, Indexable, Numeric};
use canopy_registry::Registry;
use canopy_tree::{Node, NodeHandle};
use std::collections::HashMap;
use std::ops::Bound;

/// A boxed node predicate for multi-condition queries.
pub type Predicate<'a> = Box<dyn Fn(&Node) -> bool + 'a>;

/// Attribute indices are keyed by attribute name and stored type, so the same
/// name indexed as `i32` and as `f64` yields two independent indices.
type IndexSlot = (String, AttributeKind);

/// Caches name, id and attribute lookups over a registry.
///
/// Built indices are snapshots: mutations to the tree are not visible until
/// [`Indexer::refresh_index`] runs. Linear scans (`find_by_predicate`,
/// `find_by_attribute`, `find_by_multi_conditions`) always see live state.
///
/// The indexer holds a shared borrow of the registry, so root-level changes
/// (`register_root_node`, `create_path`, `register_dynamic_struct`, `clear`)
/// need `&mut Registry` and cannot happen while it lives. Drop the indexer,
/// make the change, then build a new one.
#[derive(Debug)]
pub struct Indexer<'r> {
    registry: &'r Registry,
    name_index: HashMap<String, Vec<NodeHandle>>,
    id_index: HashMap<String, NodeHandle>,
    attribute_indices: HashMap<IndexSlot, AttributeIndex>,
}

impl<'r> Indexer<'r> {
    /// Create an indexer and build the name and id indices.
    pub fn new(registry: &'r Registry) -> Self {
        let mut indexer = Self {
            registry,
            name_index: HashMap::new(),
            id_index: HashMap::new(),
            attribute_indices: HashMap::new(),
        };
        indexer.build_basic_indices();
        indexer
    }

    /// Start building an indexer with eagerly created attribute indices.
    pub fn builder(registry: &'r Registry) -> IndexerBuilder<'r> {
        IndexerBuilder::new(registry)
    }

    /// The registry this indexer reads.
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    // ==================== Basic Indices ====================

    /// Nodes with the given display name, in traversal order.
    pub fn find_by_name(&self, name: &str) -> Vec<NodeHandle> {
        self.name_index.get(name).cloned().unwrap_or_default()
    }

    /// The node with the given id. When ids collide across the forest, the
    /// node visited last wins.
    pub fn find_by_id(&self, id: &str) -> Option<NodeHandle> {
        self.id_index.get(id).cloned()
    }

    fn build_basic_indices(&mut self) {
        self.name_index.clear();
        self.id_index.clear();

        let name_index = &mut self.name_index;
        let id_index = &mut self.id_index;
        self.registry.traverse_nodes(|node| {
            let (name, id) = {
                let n = node.borrow();
                (n.name().to_string(), n.id().to_string())
            };
            name_index.entry(name).or_default().push(node.clone());
            if let Some(previous) = id_index.insert(id, node.clone()) {
                tracing::warn!(
                    id = %node.id(),
                    replaced = ?previous,
                    "duplicate node id in forest; id index keeps the later node"
                );
            }
        });

        tracing::debug!(
            names = self.name_index.len(),
            ids = self.id_index.len(),
            "built basic indices"
        );
    }

    /// Rebuild the name and id indices, then every attribute index.
    pub fn refresh_index(&mut self) {
        self.build_basic_indices();
        let registry = self.registry;
        for ((name, _), index) in self.attribute_indices.iter_mut() {
            index.rebuild(name, registry);
        }
        tracing::info!(
            attribute_indices = self.attribute_indices.len(),
            "refreshed indexer"
        );
    }

    // ==================== Linear Scans ====================

    /// Every node satisfying `predicate`, in traversal order.
    pub fn find_by_predicate<P>(&self, predicate: P) -> Vec<NodeHandle>
    where
        P: FnMut(&Node) -> bool,
    {
        self.registry.find_nodes(predicate)
    }

    /// Every node whose attribute `name` is stored as `T` and equals `value`.
    /// Nodes storing the attribute under another type do not match.
    pub fn find_by_attribute<T>(&self, name: &str, value: T) -> Vec<NodeHandle>
    where
        T: AttributeType + PartialEq,
    {
        self.registry.find_nodes(|node| {
            node.attribute_value(name)
                .and_then(|v| v.downcast_ref::<T>())
                .is_some_and(|v| *v == value)
        })
    }

    /// Nodes satisfying all (`match_all`) or any of the conditions. An empty
    /// condition list matches nothing.
    pub fn find_by_multi_conditions(
        &self,
        conditions: &[Predicate<'_>],
        match_all: bool,
    ) -> Vec<NodeHandle> {
        if conditions.is_empty() {
            return Vec::new();
        }
        self.registry.find_nodes(|node| {
            if match_all {
                conditions.iter().all(|condition| condition(node))
            } else {
                conditions.iter().any(|condition| condition(node))
            }
        })
    }

    // ==================== Attribute Indices ====================

    /// Build (or rebuild) the index for attribute `name` stored as `T`.
    pub fn create_attribute_index<T: Indexable>(&mut self, name: &str) {
        let mut index = AttributeIndex::of::<T>();
        index.rebuild(name, self.registry);
        self.attribute_indices
            .insert((name.to_string(), AttributeKind::of::<T>()), index);
    }

    pub(crate) fn create_attribute_index_raw(
        &mut self,
        name: &str,
        kind: AttributeKind,
        extract: KeyExtractor,
    ) {
        let mut index = AttributeIndex::new(kind, extract);
        index.rebuild(name, self.registry);
        self.attribute_indices.insert((name.to_string(), kind), index);
    }

    /// Whether an index exists for attribute `name` stored as `T`.
    pub fn has_attribute_index<T: AttributeType>(&self, name: &str) -> bool {
        self.attribute_indices
            .contains_key(&(name.to_string(), AttributeKind::of::<T>()))
    }

    /// Drop the index for attribute `name` stored as `T`.
    pub fn remove_attribute_index<T: AttributeType>(&mut self, name: &str) -> bool {
        self.attribute_indices
            .remove(&(name.to_string(), AttributeKind::of::<T>()))
            .is_some()
    }

    /// Every (attribute name, type) pair that currently has an index, sorted
    /// by name.
    pub fn indexed_attributes(&self) -> Vec<(&str, AttributeKind)> {
        let mut attributes: Vec<_> = self
            .attribute_indices
            .iter()
            .map(|((name, _), index)| (name.as_str(), index.kind()))
            .collect();
        attributes.sort_by(|a, b| a.0.cmp(b.0).then_with(|| a.1.name().cmp(b.1.name())));
        attributes
    }

    fn index_for<T: Indexable>(&mut self, name: &str) -> &AttributeIndex {
        let registry = self.registry;
        self.attribute_indices
            .entry((name.to_string(), AttributeKind::of::<T>()))
            .or_insert_with(|| {
                let mut index = AttributeIndex::of::<T>();
                index.rebuild(name, registry);
                index
            })
    }

    /// Exact lookup through the index, building it first if absent.
    pub fn find_by_attribute_indexed<T: Indexable>(&mut self, name: &str, value: T) -> Vec<NodeHandle> {
        let key = value.index_key();
        self.index_for::<T>(name).find_exact(&key)
    }

    // ==================== Range Queries ====================

    /// Nodes whose attribute is strictly greater than `value`, ascending.
    pub fn find_greater_than<T: Numeric>(&mut self, name: &str, value: T) -> Vec<NodeHandle> {
        let lower = Bound::Excluded(value.index_key());
        self.index_for::<T>(name).find_range(lower, Bound::Unbounded)
    }

    /// Nodes whose attribute is strictly less than `value`, ascending.
    pub fn find_less_than<T: Numeric>(&mut self, name: &str, value: T) -> Vec<NodeHandle> {
        let upper = Bound::Excluded(value.index_key());
        self.index_for::<T>(name).find_range(Bound::Unbounded, upper)
    }

    /// Nodes whose attribute lies in `[min, max]`, ascending. Empty when
    /// `min > max`.
    pub fn find_in_range<T: Numeric>(&mut self, name: &str, min: T, max: T) -> Vec<NodeHandle> {
        let lower = Bound::Included(min.index_key());
        let upper = Bound::Included(max.index_key());
        self.index_for::<T>(name).find_range(lower, upper)
    }
}
