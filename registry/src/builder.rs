//! RegistryBuilder for assembling a Registry up front.

use crate::Registry;
use canopy_core::ResourceResult;
use canopy_tree::NodeHandle;

/// A pending registration, applied in declaration order.
#[derive(Debug)]
enum Step {
    Root(NodeHandle),
    Path(String),
    Node(String, NodeHandle),
}

/// Builder for constructing a Registry from declared roots and paths.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    steps: Vec<Step>,
}

impl RegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root node.
    pub fn add_root(&mut self, root: NodeHandle) -> &mut Self {
        self.steps.push(Step::Root(root));
        self
    }

    /// Ensure a path exists, creating bare nodes for missing segments.
    pub fn add_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.steps.push(Step::Path(path.into()));
        self
    }

    /// Attach a node at a path whose final segment is the node's id.
    pub fn add_node(&mut self, path: impl Into<String>, node: NodeHandle) -> &mut Self {
        self.steps.push(Step::Node(path.into(), node));
        self
    }

    /// Build the Registry, applying every declaration in order.
    pub fn build(self) -> ResourceResult<Registry> {
        let mut registry = Registry::new();
        for step in self.steps {
            match step {
                Step::Root(root) => registry.register_root_node(root)?,
                Step::Path(path) => {
                    registry.create_path(&path)?;
                }
                Step::Node(path, node) => registry.register_node_at_path(&path, node)?,
            }
        }
        tracing::debug!(roots = registry.root_count(), "built registry");
        Ok(registry)
    }
}
