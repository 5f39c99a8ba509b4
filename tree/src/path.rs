//! Dotted attribute paths.
//!
//! `"perception.optical.detectionRange"` names the attribute `detectionRange`
//! on the child named `optical` of the child named `perception`. Segments are
//! matched against child display names, first match wins.

use crate::NodeHandle;
use canopy_core::{AttributeType, AttributeValue, ResourceError, ResourceResult};

/// Resolve a dotted attribute path to the owning node and the attribute key.
pub fn resolve_attribute_path<'p>(
    node: &NodeHandle,
    path: &'p str,
) -> ResourceResult<(NodeHandle, &'p str)> {
    let (parents, key) = match path.rsplit_once('.') {
        Some((parents, key)) => (Some(parents), key),
        None => (None, path),
    };
    if key.is_empty() {
        return Err(ResourceError::InvalidArgument(format!(
            "attribute path {path:?} has no attribute name"
        )));
    }

    let mut current = node.clone();
    for segment in parents.into_iter().flat_map(|p| p.split('.')) {
        let next = current.borrow().find_child_by_name(segment);
        current = next.ok_or_else(|| ResourceError::PathNotFound(path.to_string()))?;
    }
    Ok((current, key))
}

/// Overwrite the attribute at a dotted path.
pub fn set_attribute_path(
    node: &NodeHandle,
    path: &str,
    value: AttributeValue,
) -> ResourceResult<()> {
    let (owner, key) = resolve_attribute_path(node, path)?;
    owner.borrow_mut().set_attribute_value(key, value);
    Ok(())
}

/// Read a copy of the attribute at a dotted path.
pub fn get_attribute_path<T: AttributeType>(node: &NodeHandle, path: &str) -> ResourceResult<T> {
    let (owner, key) = resolve_attribute_path(node, path)?;
    let value = owner.borrow().get_attribute(key);
    value
}
