//! Shared node handles.
//!
//! A [`NodeHandle`] is a reference-counted view into a live tree. Parents own
//! their children through handles; traversal and queries hand out clones of
//! the same handles, so a mutation through any of them is visible to all.
//!
//! Borrowing follows `RefCell` rules: `borrow_mut` on a node that is already
//! borrowed panics. Traversal releases every node before calling the visitor.

use crate::Node;
use canopy_core::{AttributeType, ResourceError, ResourceResult};
use std::cell::{BorrowError, Ref, RefCell, RefMut};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A shared handle to a node in a live tree.
#[derive(Clone)]
pub struct NodeHandle(Rc<RefCell<Node>>);

impl NodeHandle {
    /// Create a handle to a fresh node.
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self::from(Node::new(name, id))
    }

    /// Immutably borrow the node.
    pub fn borrow(&self) -> Ref<'_, Node> {
        self.0.borrow()
    }

    /// Mutably borrow the node.
    pub fn borrow_mut(&self) -> RefMut<'_, Node> {
        self.0.borrow_mut()
    }

    /// Immutably borrow the node, failing if it is mutably borrowed.
    pub fn try_borrow(&self) -> Result<Ref<'_, Node>, BorrowError> {
        self.0.try_borrow()
    }

    /// Get a copy of the node's id.
    pub fn id(&self) -> String {
        self.borrow().id().to_string()
    }

    /// Get a copy of the node's name.
    pub fn name(&self) -> String {
        self.borrow().name().to_string()
    }

    /// Returns true if both handles point at the same node.
    pub fn ptr_eq(&self, other: &NodeHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Set an attribute on the node.
    pub fn set_attribute<T: AttributeType>(&self, key: impl Into<String>, value: T) {
        self.borrow_mut().set_attribute(key, value);
    }

    /// Read a copy of an attribute stored as `T`.
    pub fn get_attribute<T: AttributeType>(&self, key: &str) -> ResourceResult<T> {
        self.borrow().get_attribute(key)
    }

    /// Check whether the node has an attribute.
    pub fn has_attribute(&self, key: &str) -> bool {
        self.borrow().has_attribute(key)
    }

    /// Get a child by id.
    pub fn get_child(&self, id: &str) -> Option<NodeHandle> {
        self.borrow().get_child(id)
    }

    /// Append a child, rejecting children that would make the tree cyclic.
    ///
    /// Fails with `InvalidArgument` if `child` is this node or contains it,
    /// with `DuplicateId` if a sibling already has the child's id, and with
    /// `InvalidArgument` if the child is mutably borrowed. On failure nothing
    /// is attached.
    pub fn add_child(&self, child: NodeHandle) -> ResourceResult<()> {
        if child.contains(self) {
            return Err(ResourceError::InvalidArgument(format!(
                "adding {} under {} would create a cycle",
                child.id(),
                self.id()
            )));
        }
        self.borrow_mut().add_child(child)
    }

    /// Returns true if `other` is this node or one of its descendants.
    pub fn contains(&self, other: &NodeHandle) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        self.borrow().children().any(|child| child.contains(other))
    }

    /// Clone the node and its whole subtree into independent nodes.
    pub fn deep_clone(&self) -> NodeHandle {
        NodeHandle::from(self.borrow().clone())
    }

    /// Depth-first, pre-order traversal.
    ///
    /// The visitor receives each node with its depth relative to this node
    /// (this node is depth 0). Children are visited in insertion order. The
    /// child list is captured after the visitor returns, so the visitor may
    /// mutate the node it is given.
    pub fn traverse<F>(&self, mut visitor: F)
    where
        F: FnMut(&NodeHandle, usize),
    {
        self.traverse_at(0, &mut visitor);
    }

    fn traverse_at<F>(&self, depth: usize, visitor: &mut F)
    where
        F: FnMut(&NodeHandle, usize),
    {
        visitor(self, depth);
        let children = self.borrow().child_handles();
        for child in &children {
            child.traverse_at(depth + 1, visitor);
        }
    }

    /// Collect this node and every descendant in traversal order.
    pub fn descendants(&self) -> Vec<NodeHandle> {
        let mut nodes = Vec::new();
        self.traverse(|node, _| nodes.push(node.clone()));
        nodes
    }

    /// First node in traversal order (this node included) with the given id.
    pub fn find_descendant(&self, id: &str) -> Option<NodeHandle> {
        if self.borrow().id() == id {
            return Some(self.clone());
        }
        let children = self.borrow().child_handles();
        children.iter().find_map(|child| child.find_descendant(id))
    }
}

impl From<Node> for NodeHandle {
    fn from(node: Node) -> Self {
        Self(Rc::new(RefCell::new(node)))
    }
}

/// Handles compare by identity, not by content.
impl PartialEq for NodeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for NodeHandle {}

impl Hash for NodeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Rc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(node) => write!(f, "NodeHandle({} \"{}\")", node.id(), node.name()),
            Err(_) => write!(f, "NodeHandle(<borrowed>)"),
        }
    }
}
