//! Structural merge.
//!
//! Patches a live subtree so its content matches a freshly produced snapshot
//! while keeping the identity of every node whose id survives:
//! - attributes: every snapshot attribute overwrites (or adds) the target's,
//!   even when the stored type changes; target-only attributes are kept
//! - children: matched by id and merged recursively, missing ones are deep
//!   cloned from the snapshot and appended, extra ones are removed

use crate::NodeHandle;
use canopy_core::ResourceResult;

/// Counters describing what a merge changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Nodes whose attributes were overwritten from the snapshot.
    pub merged: usize,
    /// Children cloned from the snapshot.
    pub added: usize,
    /// Children removed because the snapshot no longer has them.
    pub removed: usize,
}

/// Merge `snapshot` onto `target` in place.
pub fn merge_into(target: &NodeHandle, snapshot: &NodeHandle) -> ResourceResult<MergeStats> {
    let mut stats = MergeStats::default();
    merge_node(target, snapshot, &mut stats)?;
    Ok(stats)
}

fn merge_node(
    target: &NodeHandle,
    snapshot: &NodeHandle,
    stats: &mut MergeStats,
) -> ResourceResult<()> {
    if target.ptr_eq(snapshot) {
        return Ok(());
    }
    let source = snapshot.borrow();

    // Attributes: raw overwrite, type changes tolerated
    {
        let mut node = target.borrow_mut();
        for (key, value) in source.attributes() {
            node.set_attribute_value(key, value.clone());
        }
    }
    stats.merged += 1;

    // Children present in the snapshot: recurse or add
    for child in source.children() {
        let child_id = child.id();
        let existing = target.borrow().get_child(&child_id);
        match existing {
            Some(existing) => merge_node(&existing, child, stats)?,
            None => {
                tracing::trace!(parent = %source.id(), child = %child_id, "merge: adding child");
                target.borrow_mut().add_child(child.deep_clone())?;
                stats.added += 1;
            }
        }
    }

    // Children gone from the snapshot: remove
    let stale: Vec<String> = target
        .borrow()
        .children()
        .map(NodeHandle::id)
        .filter(|id| !source.has_child(id))
        .collect();
    if !stale.is_empty() {
        let mut node = target.borrow_mut();
        for id in &stale {
            tracing::trace!(parent = %node.id(), child = %id, "merge: removing child");
            node.remove_child(id);
        }
        stats.removed += stale.len();
    }

    Ok(())
}
