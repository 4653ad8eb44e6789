use lamina::{Dag, Error, NodeId};

#[test]
fn add_node_is_idempotent_per_id() {
    let mut g = Dag::new();
    let a = g.add_node("a");
    let b = g.add_node("b");
    assert_ne!(a, b);
    assert_eq!(g.add_node("a"), a);
    assert_eq!(g.node_count(), 2);
    assert_eq!(g.find("b"), Some(b));
    assert_eq!(g.find("c"), None);
}

#[test]
fn edges_keep_insertion_order_and_parallel_edges() {
    let mut g = Dag::new();
    g.set_edge("a", "c");
    g.set_edge("a", "b");
    g.set_edge("a", "c");
    let a = g.find("a").unwrap();
    let b = g.find("b").unwrap();
    let c = g.find("c").unwrap();
    assert_eq!(g.children(a), &[c, b, c]);
    assert_eq!(g.parents(c), &[a, a]);
    assert_eq!(g.edge_count(), 3);
}

#[test]
fn add_edge_rejects_unknown_nodes() {
    let mut g = Dag::new();
    let a = g.add_node("a");
    assert_eq!(
        g.add_edge(a, NodeId(3)),
        Err(Error::MissingNode { index: 3 })
    );
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn sources_are_the_parentless_nodes() {
    let mut g = Dag::new();
    g.set_path(&["a", "b", "c"]);
    g.set_edge("d", "c");
    let sources: Vec<&str> = g
        .sources()
        .map(|v| g.node(v).unwrap().id.as_str())
        .collect();
    assert_eq!(sources, vec!["a", "d"]);
}

#[test]
fn topological_order_puts_parents_first() {
    let mut g = Dag::new();
    g.set_path(&["a", "b", "d"]);
    g.set_path(&["a", "c", "d"]);
    let order = g.topological_order().unwrap();
    let pos = |id: &str| order.iter().position(|&v| v == g.find(id).unwrap()).unwrap();
    assert!(pos("a") < pos("b"));
    assert!(pos("a") < pos("c"));
    assert!(pos("b") < pos("d"));
    assert!(pos("c") < pos("d"));
}

#[test]
fn validate_reports_cycles() {
    let mut g = Dag::new();
    g.set_path(&["a", "b", "c", "a"]);
    g.set_edge("x", "a");
    assert!(matches!(g.validate(), Err(Error::Cycle { .. })));
}

#[test]
fn validate_reports_self_loops() {
    let mut g = Dag::new();
    g.set_edge("a", "a");
    assert_eq!(
        g.validate(),
        Err(Error::Cycle {
            node: "a".to_string()
        })
    );
}
