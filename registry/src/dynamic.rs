//! Dynamic bindings between external structs and subtrees.
//!
//! A binding remembers an externally owned struct, the converter that turns
//! it into nodes, and the node produced at registration time. Refreshing a
//! binding converts the struct again and merges the snapshot onto the bound
//! node, so handles to the bound subtree stay valid.

use canopy_core::{ResourceError, ResourceResult};
use canopy_tree::NodeHandle;
use std::cell::RefCell;
use std::fmt;
use std::rc::Weak;

/// Converts an external struct into a node subtree.
///
/// `convert` must be callable repeatedly against a mutated instance: it runs
/// once at registration and again on every refresh. The registry keeps its
/// own clone of the converter.
pub trait StructConverter<S>: Clone + 'static {
    /// Build a fresh node (with children, if any) for the current state.
    fn convert(&self, source: &S, name: &str) -> ResourceResult<NodeHandle>;
}

impl<S, F> StructConverter<S> for F
where
    F: Fn(&S, &str) -> ResourceResult<NodeHandle> + Clone + 'static,
{
    fn convert(&self, source: &S, name: &str) -> ResourceResult<NodeHandle> {
        self(source, name)
    }
}

/// Type-erased source of fresh snapshots.
pub(crate) trait SnapshotSource {
    /// Returns false once the external struct has been dropped.
    fn is_alive(&self) -> bool;

    /// Convert the current state of the external struct.
    fn snapshot(&self) -> ResourceResult<NodeHandle>;

    /// Type name of the external struct.
    fn source_type(&self) -> &'static str;
}

/// A struct held weakly together with its converter.
pub(crate) struct BoundStruct<S, C> {
    source: Weak<RefCell<S>>,
    converter: C,
    name: String,
}

impl<S, C> BoundStruct<S, C> {
    pub(crate) fn new(source: Weak<RefCell<S>>, converter: C, name: String) -> Self {
        Self {
            source,
            converter,
            name,
        }
    }
}

impl<S: 'static, C: StructConverter<S>> SnapshotSource for BoundStruct<S, C> {
    fn is_alive(&self) -> bool {
        self.source.strong_count() > 0
    }

    fn snapshot(&self) -> ResourceResult<NodeHandle> {
        let source = self.source.upgrade().ok_or_else(|| {
            ResourceError::Conversion(format!("source of {} has been dropped", self.name))
        })?;
        let state = source.try_borrow().map_err(|_| {
            ResourceError::Conversion(format!("source of {} is borrowed mutably", self.name))
        })?;
        self.converter.convert(&state, &self.name)
    }

    fn source_type(&self) -> &'static str {
        std::any::type_name::<S>()
    }
}

/// A recorded association between an external struct and its subtree.
pub(crate) struct DynamicBinding {
    pub(crate) source: Box<dyn SnapshotSource>,
    pub(crate) node: NodeHandle,
    pub(crate) path: String,
}

impl fmt::Debug for DynamicBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicBinding")
            .field("source_type", &self.source.source_type())
            .field("node", &self.node)
            .field("path", &self.path)
            .finish()
    }
}
