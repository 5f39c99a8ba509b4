//! The Registry - owner of the resource forest.

use crate::dynamic::{BoundStruct, DynamicBinding};
use crate::path::split_path;
use crate::{RegistryBuilder, StructConverter};
use canopy_core::{AttributeValue, ResourceError, ResourceResult};
use canopy_tree::{merge_into, set_attribute_path, Node, NodeHandle};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

/// The Registry owns a set of root nodes keyed by id and resolves
/// slash-delimited paths of ids against them.
#[derive(Debug, Default)]
pub struct Registry {
    /// Root nodes in registration order.
    roots: IndexMap<String, NodeHandle>,
    /// Live struct bindings.
    bindings: Vec<DynamicBinding>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a registry with predeclared roots and paths.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    // ==================== Root Nodes ====================

    /// Register a root node. Fails with `DuplicateId` if its id is taken.
    pub fn register_root_node(&mut self, root: NodeHandle) -> ResourceResult<()> {
        let id = root.id();
        if self.roots.contains_key(&id) {
            return Err(ResourceError::DuplicateId(id));
        }
        tracing::debug!(root = %id, "registered root node");
        self.roots.insert(id, root);
        Ok(())
    }

    /// Remove a root node, returning it if it was registered.
    pub fn unregister_root_node(&mut self, id: &str) -> Option<NodeHandle> {
        let removed = self.roots.shift_remove(id);
        if removed.is_some() {
            tracing::debug!(root = %id, "unregistered root node");
        }
        removed
    }

    /// Get a root node by id.
    pub fn get_root_node(&self, id: &str) -> Option<NodeHandle> {
        self.roots.get(id).cloned()
    }

    /// Get all root nodes in registration order.
    pub fn get_all_root_nodes(&self) -> Vec<NodeHandle> {
        self.roots.values().cloned().collect()
    }

    /// Get the number of root nodes.
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    // ==================== Paths ====================

    fn resolve(&self, segments: &[&str]) -> Option<NodeHandle> {
        let (first, rest) = segments.split_first()?;
        let mut current = self.get_root_node(first)?;
        for segment in rest {
            let next = current.borrow().get_child(segment)?;
            current = next;
        }
        Some(current)
    }

    /// Resolve a path to a node. Returns `None` if any segment is missing or
    /// the path is empty.
    pub fn get_node_by_path(&self, path: &str) -> Option<NodeHandle> {
        self.resolve(&split_path(path))
    }

    /// Attach a node at a path.
    ///
    /// The final segment of the path is the node's own id; everything before
    /// it must resolve to the parent. An empty or single-segment path
    /// registers the node as a root.
    pub fn register_node_at_path(&mut self, path: &str, node: NodeHandle) -> ResourceResult<()> {
        let segments = split_path(path);
        let Some((last, parents)) = segments.split_last() else {
            return self.register_root_node(node);
        };
        let id = node.id();
        if *last != id {
            return Err(ResourceError::InvalidArgument(format!(
                "path {path} ends in {last} but the node id is {id}"
            )));
        }
        if parents.is_empty() {
            return self.register_root_node(node);
        }
        let parent = self
            .resolve(parents)
            .ok_or_else(|| ResourceError::PathNotFound(parents.join("/")))?;
        parent.add_child(node)?;
        tracing::debug!(path = %path, "registered node at path");
        Ok(())
    }

    /// Detach the node at a path, returning it if it existed.
    ///
    /// Fails with `PathNotFound` if the path is empty or its parent does not
    /// resolve. A missing final segment is not an error.
    pub fn remove_node_by_path(&mut self, path: &str) -> ResourceResult<Option<NodeHandle>> {
        let segments = split_path(path);
        let Some((last, parents)) = segments.split_last() else {
            return Err(ResourceError::PathNotFound(path.to_string()));
        };
        if parents.is_empty() {
            return Ok(self.unregister_root_node(last));
        }
        let parent = self
            .resolve(parents)
            .ok_or_else(|| ResourceError::PathNotFound(parents.join("/")))?;
        let removed = parent.borrow_mut().remove_child(last);
        Ok(removed)
    }

    /// Ensure every segment of a path exists and return the deepest node.
    ///
    /// Missing segments become bare nodes whose name and id are the segment.
    /// Calling this repeatedly never creates duplicates.
    pub fn create_path(&mut self, path: &str) -> ResourceResult<NodeHandle> {
        let segments = split_path(path);
        let Some((first, rest)) = segments.split_first() else {
            return Err(ResourceError::InvalidArgument(
                "cannot create an empty path".to_string(),
            ));
        };

        let mut current = match self.get_root_node(first) {
            Some(root) => root,
            None => {
                let root = NodeHandle::new(*first, *first);
                self.register_root_node(root.clone())?;
                root
            }
        };
        for segment in rest {
            let existing = current.borrow().get_child(segment);
            current = match existing {
                Some(child) => child,
                None => {
                    let child = NodeHandle::new(*segment, *segment);
                    current.add_child(child.clone())?;
                    tracing::debug!(parent = %current.id(), child = %segment, "created path segment");
                    child
                }
            };
        }
        Ok(current)
    }

    // ==================== Traversal ====================

    /// Depth-first traversal over every root in registration order. Depth is
    /// relative to each root.
    pub fn traverse_root_nodes<F>(&self, mut visitor: F)
    where
        F: FnMut(&NodeHandle, usize),
    {
        for root in self.roots.values() {
            root.traverse(&mut visitor);
        }
    }

    /// Visit every node of the forest in traversal order.
    pub fn traverse_nodes<F>(&self, mut callback: F)
    where
        F: FnMut(&NodeHandle),
    {
        self.traverse_root_nodes(|node, _| callback(node));
    }

    /// Collect every node for which `predicate` holds, in traversal order.
    pub fn find_nodes<P>(&self, mut predicate: P) -> Vec<NodeHandle>
    where
        P: FnMut(&Node) -> bool,
    {
        let mut results = Vec::new();
        self.traverse_nodes(|node| {
            if predicate(&*node.borrow()) {
                results.push(node.clone());
            }
        });
        results
    }

    /// Drop every root and every dynamic binding.
    pub fn clear(&mut self) {
        tracing::debug!(
            roots = self.roots.len(),
            bindings = self.bindings.len(),
            "clearing registry"
        );
        self.roots.clear();
        self.bindings.clear();
    }

    // ==================== Dynamic Structs ====================

    /// Convert an external struct, register the result at `path` and keep
    /// the two in sync on [`Registry::update_all_dynamic_objects`].
    ///
    /// The registry holds the struct weakly and keeps its own clone of the
    /// converter. Returns the handle of the produced node.
    pub fn register_dynamic_struct<S, C>(
        &mut self,
        source: &Rc<RefCell<S>>,
        path: &str,
        converter: &C,
        name: &str,
    ) -> ResourceResult<NodeHandle>
    where
        S: 'static,
        C: StructConverter<S>,
    {
        let bound = BoundStruct::new(Rc::downgrade(source), converter.clone(), name.to_string());
        let node = {
            let state = source.try_borrow().map_err(|_| {
                ResourceError::Conversion(format!("source of {name} is borrowed mutably"))
            })?;
            converter.convert(&state, name)?
        };
        self.register_node_at_path(path, node.clone())?;

        tracing::debug!(
            source_type = std::any::type_name::<S>(),
            node = %node.id(),
            path = %path,
            "registered dynamic struct"
        );
        self.bindings.push(DynamicBinding {
            source: Box::new(bound),
            node: node.clone(),
            path: path.to_string(),
        });
        Ok(node)
    }

    /// Re-convert every bound struct and merge the snapshots onto the bound
    /// nodes in place. Returns the number of bindings refreshed.
    ///
    /// Bindings whose struct has been dropped are discarded first. The pass
    /// stops at the first converter or merge error.
    pub fn update_all_dynamic_objects(&mut self) -> ResourceResult<usize> {
        let before = self.bindings.len();
        self.bindings.retain(|binding| binding.source.is_alive());
        let pruned = before - self.bindings.len();
        if pruned > 0 {
            tracing::debug!(pruned, "discarded bindings to dropped structs");
        }

        for binding in &self.bindings {
            let snapshot = binding.source.snapshot()?;
            let stats = merge_into(&binding.node, &snapshot)?;
            tracing::trace!(
                path = %binding.path,
                merged = stats.merged,
                added = stats.added,
                removed = stats.removed,
                "refreshed dynamic struct"
            );
        }
        tracing::debug!(refreshed = self.bindings.len(), "updated dynamic objects");
        Ok(self.bindings.len())
    }

    /// Drop the first binding whose bound node is `node`.
    pub fn remove_dynamic_object(&mut self, node: &NodeHandle) -> bool {
        match self.bindings.iter().position(|b| b.node.ptr_eq(node)) {
            Some(index) => {
                self.bindings.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drop every binding. The tree itself is untouched.
    pub fn clear_dynamic_objects(&mut self) {
        self.bindings.clear();
    }

    /// Get the number of live bindings.
    pub fn dynamic_object_count(&self) -> usize {
        self.bindings.len()
    }

    /// Overwrite several attributes below `node`, each addressed by a dotted
    /// child-name path such as `"maneuver.turningRadius"`.
    ///
    /// Updates are applied in order; the first unresolvable path aborts the
    /// batch, leaving earlier updates in place.
    ///
    /// Each update is a [`set_attribute_path`] call on `node`. Only the subtree
    /// under `node` is touched and the registry's own state is not consulted,
    /// so `node` does not need to be registered.
    pub fn batch_update_attributes<I, K>(&self, node: &NodeHandle, updates: I) -> ResourceResult<()>
    where
        I: IntoIterator<Item = (K, AttributeValue)>,
        K: AsRef<str>,
    {
        for (path, value) in updates {
            set_attribute_path(node, path.as_ref(), value)?;
        }
        Ok(())
    }
}
