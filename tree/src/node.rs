//! Tree nodes.
//!
//! A node is a named, identified unit that owns an open-ended set of typed
//! attributes and an ordered set of children. Child ids are unique among the
//! children of one node; names are display labels and may repeat.

use crate::NodeHandle;
use canopy_core::{AttributeKind, AttributeType, AttributeValue, ResourceError, ResourceResult};
use indexmap::IndexMap;
use std::collections::HashMap;

/// A node in the resource tree.
#[derive(Debug)]
pub struct Node {
    /// Display label, not required to be unique.
    name: String,
    /// Identifier, unique among siblings.
    id: String,
    /// Children in insertion order, keyed by id.
    children: IndexMap<String, NodeHandle>,
    /// Attribute values.
    attributes: HashMap<String, AttributeValue>,
}

impl Node {
    /// Create a new node with no attributes and no children.
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            children: IndexMap::new(),
            attributes: HashMap::new(),
        }
    }

    /// Get the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Rename the node. The id is unaffected.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // ==================== Attributes ====================

    /// Insert or overwrite an attribute, recording `T` as its type.
    pub fn set_attribute<T: AttributeType>(&mut self, key: impl Into<String>, value: T) {
        self.attributes.insert(key.into(), AttributeValue::new(value));
    }

    /// Insert or overwrite an already boxed attribute value.
    pub fn set_attribute_value(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.attributes.insert(key.into(), value);
    }

    /// Overwrite an existing attribute whose stored type is exactly `T`.
    pub fn modify_attribute<T: AttributeType>(&mut self, key: &str, value: T) -> ResourceResult<()> {
        let slot = self
            .attributes
            .get_mut(key)
            .ok_or_else(|| ResourceError::AttributeNotFound(key.to_string()))?;
        let actual = slot.kind();
        match slot.downcast_mut::<T>() {
            Some(current) => {
                *current = value;
                Ok(())
            }
            None => Err(type_mismatch::<T>(key, actual)),
        }
    }

    /// Read a copy of an attribute stored as `T`.
    pub fn get_attribute<T: AttributeType>(&self, key: &str) -> ResourceResult<T> {
        let value = self
            .attributes
            .get(key)
            .ok_or_else(|| ResourceError::AttributeNotFound(key.to_string()))?;
        value
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| type_mismatch::<T>(key, value.kind()))
    }

    /// Get the boxed attribute value.
    pub fn attribute_value(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Check whether an attribute exists, whatever its type.
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Remove an attribute. Removing a missing attribute is a no-op.
    pub fn remove_attribute(&mut self, key: &str) -> Option<AttributeValue> {
        self.attributes.remove(key)
    }

    /// Attribute names, in no particular order.
    pub fn attribute_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.attributes.keys().map(String::as_str)
    }

    /// All attributes, in no particular order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeValue)> + '_ {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The recorded type of an attribute.
    pub fn attribute_type(&self, key: &str) -> ResourceResult<AttributeKind> {
        self.attributes
            .get(key)
            .map(AttributeValue::kind)
            .ok_or_else(|| ResourceError::AttributeNotFound(key.to_string()))
    }

    /// Get the number of attributes.
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    // ==================== Children ====================

    /// Append a child.
    ///
    /// Fails with `DuplicateId` if a child with the same id exists, and with
    /// `InvalidArgument` if the child is mutably borrowed (which is the case
    /// when a node is added to itself through its own handle). On failure the
    /// node is left unchanged. No cycle check happens here; callers outside
    /// this crate attach through [`NodeHandle::add_child`].
    pub(crate) fn add_child(&mut self, child: NodeHandle) -> ResourceResult<()> {
        let id = match child.try_borrow() {
            Ok(node) => node.id.clone(),
            Err(_) => {
                return Err(ResourceError::InvalidArgument(format!(
                    "child of {} is borrowed mutably and cannot be attached",
                    self.id
                )))
            }
        };
        if self.children.contains_key(&id) {
            return Err(ResourceError::DuplicateId(id));
        }
        self.children.insert(id, child);
        Ok(())
    }

    /// Remove a child by id. Removing a missing child is a no-op.
    pub fn remove_child(&mut self, id: &str) -> Option<NodeHandle> {
        self.children.shift_remove(id)
    }

    /// Get a child by id.
    pub fn get_child(&self, id: &str) -> Option<NodeHandle> {
        self.children.get(id).cloned()
    }

    /// Check whether a child with this id exists.
    pub fn has_child(&self, id: &str) -> bool {
        self.children.contains_key(id)
    }

    /// First child carrying this display name.
    pub fn find_child_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.children
            .values()
            .find(|child| child.borrow().name == name)
            .cloned()
    }

    /// Children in insertion order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &NodeHandle> + ExactSizeIterator {
        self.children.values()
    }

    /// Snapshot of the child handles, so the node can be released while
    /// descending.
    pub fn child_handles(&self) -> Vec<NodeHandle> {
        self.children.values().cloned().collect()
    }

    /// Get the number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

/// Cloning a node copies its attributes and recursively clones its children,
/// yielding a fully independent subtree.
impl Clone for Node {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            id: self.id.clone(),
            children: self
                .children
                .iter()
                .map(|(id, child)| (id.clone(), child.deep_clone()))
                .collect(),
            attributes: self.attributes.clone(),
        }
    }
}

pub(crate) fn type_mismatch<T: AttributeType>(key: &str, actual: AttributeKind) -> ResourceError {
    ResourceError::TypeMismatch {
        key: key.to_string(),
        expected: std::any::type_name::<T>(),
        actual: actual.name(),
    }
}
