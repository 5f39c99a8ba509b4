//! Registry path model.

use canopy_tests::prelude::*;
use proptest::prelude::*;

// ========== TEST: create_path ==========

#[test]
fn test_create_path_is_idempotent() {
    // GIVEN
    let mut registry = Registry::new();

    // WHEN the same path is created twice
    let first = registry.create_path("a/b/c").unwrap();
    let second = registry.create_path("/a//b/c/").unwrap();

    // THEN one chain of nodes exists
    assert!(first.ptr_eq(&second));
    assert_eq!(registry.root_count(), 1);
    let a = registry.get_root_node("a").unwrap();
    assert_eq!(a.borrow().child_count(), 1);
    assert_eq!(a.get_child("b").unwrap().borrow().child_count(), 1);
}

#[test]
fn test_create_path_extends_existing_prefix() {
    // GIVEN
    let mut registry = Registry::new();
    let b = registry.create_path("a/b").unwrap();

    // WHEN
    let d = registry.create_path("a/b/c/d").unwrap();

    // THEN
    assert!(registry.get_node_by_path("a/b").unwrap().ptr_eq(&b));
    assert!(registry.get_node_by_path("a/b/c/d").unwrap().ptr_eq(&d));
    assert_eq!(d.name(), "d");
}

#[test]
fn test_create_empty_path_fails() {
    let mut registry = Registry::new();
    let err = registry.create_path("///").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_created_root_cannot_be_attached_below_itself() {
    // GIVEN
    let mut registry = Registry::new();
    let leaf = registry.create_path("a/b/c").unwrap();
    let root = registry.get_root_node("a").unwrap();

    // WHEN the root is attached under its own leaf
    let err = leaf.add_child(root.clone()).unwrap_err();

    // THEN the tree is unchanged and traversal terminates
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(leaf.borrow().child_count(), 0);
    let mut visited = 0;
    registry.traverse_nodes(|_| visited += 1);
    assert_eq!(visited, 3);
}

// ========== TEST: register and remove ==========

#[test]
fn test_register_then_remove_round_trip() {
    // GIVEN
    let mut registry = Registry::new();
    registry.create_path("fleet/wing").unwrap();
    let jet = NodeHandle::new("jet", "j1");

    // WHEN
    registry.register_node_at_path("fleet/wing/j1", jet.clone()).unwrap();
    let removed = registry.remove_node_by_path("fleet/wing/j1").unwrap();

    // THEN
    assert!(removed.unwrap().ptr_eq(&jet));
    assert!(registry.get_node_by_path("fleet/wing/j1").is_none());
    assert!(registry.remove_node_by_path("fleet/wing/j1").unwrap().is_none());
}

#[test]
fn test_register_rejects_mismatched_id() {
    let mut registry = Registry::new();
    registry.create_path("fleet").unwrap();
    let err = registry
        .register_node_at_path("fleet/j2", NodeHandle::new("jet", "j1"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_register_duplicate_sibling_fails() {
    let mut registry = Registry::new();
    registry.create_path("fleet/j1").unwrap();
    let err = registry
        .register_node_at_path("fleet/j1", NodeHandle::new("jet", "j1"))
        .unwrap_err();
    assert_eq!(err, ResourceError::DuplicateId("j1".to_string()));
}

#[test]
fn test_remove_with_missing_parent_fails() {
    let mut registry = Registry::new();
    let err = registry.remove_node_by_path("ghost/j1").unwrap_err();
    assert!(err.is_not_found());
    assert!(registry.remove_node_by_path("").is_err());
}

#[test]
fn test_remove_root_by_single_segment() {
    let mut registry = Registry::new();
    let root = registry.create_path("solo").unwrap();
    let removed = registry.remove_node_by_path("solo").unwrap().unwrap();
    assert!(removed.ptr_eq(&root));
    assert_eq!(registry.root_count(), 0);
}

#[test]
fn test_clear_drops_roots_and_bindings() {
    // GIVEN
    let agent = std::rc::Rc::new(std::cell::RefCell::new(AgentModel::default()));
    let mut registry = datacenter().unwrap();
    registry
        .register_dynamic_struct(&agent, "", &convert_agent, "missile1")
        .unwrap();

    // WHEN
    registry.clear();

    // THEN
    assert_eq!(registry.root_count(), 0);
    assert_eq!(registry.dynamic_object_count(), 0);
    assert!(registry.get_node_by_path("dc/cluster").is_none());
}

proptest! {
    #[test]
    fn created_paths_resolve(segments in prop::collection::vec("[a-z]{1,4}", 1..6)) {
        let mut registry = Registry::new();
        let path = segments.join("/");

        let created = registry.create_path(&path).unwrap();
        let again = registry.create_path(&path).unwrap();

        prop_assert!(created.ptr_eq(&again));
        prop_assert!(registry.get_node_by_path(&path).unwrap().ptr_eq(&created));
        prop_assert_eq!(created.id(), segments.last().unwrap().clone());
        prop_assert_eq!(registry.root_count(), 1);
    }
}
