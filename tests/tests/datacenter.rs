//! Datacenter scenarios: registry paths feeding indexer queries.

use canopy_tests::prelude::*;
use pretty_assertions::assert_eq;

fn ids(nodes: &[NodeHandle]) -> Vec<String> {
    nodes.iter().map(NodeHandle::id).collect()
}

// ========== TEST: register, index, query ==========

#[test]
fn test_end_to_end_cluster_query() {
    init_test_logging();

    // GIVEN a root "dc" and the path dc/cluster/web1
    let mut registry = Registry::new();
    registry
        .register_root_node(NodeHandle::new("datacenter", "dc"))
        .unwrap();
    let web1 = registry.create_path("dc/cluster/web1").unwrap();
    web1.set_attribute("cpu_cores", 8i32);
    web1.set_attribute("active", true);

    // WHEN an indexer is built over the registry
    let mut indexer = Indexer::new(&registry);

    // THEN attribute scans and range queries find exactly web1
    let active = indexer.find_by_attribute("active", true);
    assert_eq!(active.len(), 1);
    assert!(active[0].ptr_eq(&web1));

    indexer.create_attribute_index::<i32>("cpu_cores");
    let busy = indexer.find_greater_than("cpu_cores", 4i32);
    assert_eq!(busy.len(), 1);
    assert!(busy[0].ptr_eq(&web1));
    assert!(indexer.find_greater_than("cpu_cores", 8i32).is_empty());
}

#[test]
fn test_builder_fixture_queries() {
    init_test_logging();

    // GIVEN
    let registry = datacenter().unwrap();
    let mut indexer = Indexer::builder(&registry);
    indexer
        .attribute_index::<i32>("cpu_cores")
        .attribute_index::<f64>("memory_gb");
    let mut indexer = indexer.build();

    // THEN
    assert_eq!(ids(&indexer.find_by_name("web server")), vec!["web1", "web2"]);
    assert_eq!(ids(&indexer.find_by_attribute("active", true)), vec!["web1", "db1"]);
    assert_eq!(
        ids(&indexer.find_in_range("memory_gb", 8.0f64, 16.0f64)),
        vec!["web2", "web1"]
    );
    assert_eq!(ids(&indexer.find_less_than("cpu_cores", 16i32)), vec!["web2", "web1"]);
}

#[test]
fn test_multi_condition_query() {
    // GIVEN
    let registry = datacenter().unwrap();
    let indexer = Indexer::new(&registry);
    let min_cores = 10;
    let conditions: Vec<Predicate<'_>> = vec![
        Box::new(|n: &Node| n.get_attribute::<bool>("active").unwrap_or(false)),
        Box::new(move |n: &Node| {
            n.get_attribute::<i32>("cpu_cores")
                .is_ok_and(|c| c >= min_cores)
        }),
    ];

    // WHEN
    let all = indexer.find_by_multi_conditions(&conditions, true);
    let any = indexer.find_by_multi_conditions(&conditions, false);

    // THEN
    assert_eq!(ids(&all), vec!["db1"]);
    assert_eq!(ids(&any), vec!["web1", "db1"]);
}

// ========== TEST: mutation then refresh ==========

#[test]
fn test_mutations_visible_after_refresh() {
    init_test_logging();

    // GIVEN an indexed fixture
    let registry = datacenter().unwrap();
    let mut indexer = Indexer::new(&registry);
    indexer.create_attribute_index::<bool>("active");
    assert_eq!(ids(&indexer.find_by_attribute_indexed("active", true)), vec!["web1", "db1"]);

    // WHEN web2 comes online and a new node joins storage
    registry
        .get_node_by_path("dc/cluster/web2")
        .unwrap()
        .set_attribute("active", true);
    registry
        .get_node_by_path("dc/storage")
        .unwrap()
        .add_child(server("db server", "db2", 16, 64.0, true))
        .unwrap();
    indexer.refresh_index();

    // THEN both the basic and attribute indices reflect the new state
    assert_eq!(
        ids(&indexer.find_by_attribute_indexed("active", true)),
        vec!["web1", "web2", "db1", "db2"]
    );
    assert_eq!(ids(&indexer.find_by_name("db server")), vec!["db1", "db2"]);
    assert!(indexer.find_by_id("db2").is_some());
}

#[test]
fn test_removed_subtree_leaves_index_after_refresh() {
    // GIVEN
    let mut registry = datacenter().unwrap();
    let removed = registry.remove_node_by_path("dc/storage").unwrap().unwrap();

    // WHEN
    let indexer = Indexer::new(&registry);

    // THEN the detached subtree is still intact but no longer indexed
    assert!(removed.get_child("db1").is_some());
    assert!(indexer.find_by_id("db1").is_none());
    assert!(indexer.find_by_id("storage").is_none());
    assert_eq!(indexer.find_by_id("web1").unwrap().name(), "web server");
}

// ========== TEST: traversal ==========

#[test]
fn test_traversal_depths_and_order() {
    // GIVEN
    let registry = datacenter().unwrap();

    // WHEN
    let mut visited = Vec::new();
    registry.traverse_root_nodes(|node, depth| visited.push((node.id(), depth)));

    // THEN
    let expected: Vec<(String, usize)> = [
        ("dc", 0),
        ("cluster", 1),
        ("web1", 2),
        ("web2", 2),
        ("storage", 1),
        ("db1", 2),
    ]
    .into_iter()
    .map(|(id, depth)| (id.to_string(), depth))
    .collect();
    assert_eq!(visited, expected);
}
