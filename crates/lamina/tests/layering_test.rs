use lamina::{CoffmanGraham, Dag, Error, LayerAssignment, LayeringOptions, NodeId};

/// Small deterministic generator so property checks do not depend on an RNG crate.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn chance(&mut self, percent: u64) -> bool {
        self.next() % 100 < percent
    }
}

fn random_dag(seed: u64, nodes: usize, percent: u64) -> Dag {
    let mut rng = Lcg(seed);
    let mut g = Dag::new();
    for i in 0..nodes {
        g.add_node(format!("n{i}"));
    }
    for i in 0..nodes {
        for j in i + 1..nodes {
            if rng.chance(percent) {
                g.add_edge(NodeId(i), NodeId(j)).unwrap();
            }
        }
    }
    g
}

fn assert_valid(g: &Dag, assignment: &LayerAssignment, max_width: usize) {
    for v in g.node_ids() {
        for &w in g.children(v) {
            let lv = assignment.layer_of(v).unwrap();
            let lw = assignment.layer_of(w).unwrap();
            assert!(lv < lw, "edge {v:?} -> {w:?} goes from layer {lv} to {lw}");
        }
    }
    for (ix, layer) in assignment.layers().iter().enumerate() {
        assert!(
            layer.len() <= max_width,
            "layer {ix} holds {} nodes, max width is {max_width}",
            layer.len()
        );
    }
}

fn diamond() -> Dag {
    let mut g = Dag::new();
    for id in ["0", "1", "2", "3"] {
        g.add_node(id);
    }
    g.add_edge(NodeId(0), NodeId(1)).unwrap();
    g.add_edge(NodeId(0), NodeId(2)).unwrap();
    g.add_edge(NodeId(1), NodeId(3)).unwrap();
    g.add_edge(NodeId(2), NodeId(3)).unwrap();
    g
}

#[test]
fn coffman_graham_layers_a_diamond_with_automatic_width() {
    let g = diamond();
    let assignment = CoffmanGraham::new().width(0).unwrap().assign(&g).unwrap();
    assert_eq!(
        assignment.layers(),
        vec![
            vec![NodeId(0)],
            vec![NodeId(1), NodeId(2)],
            vec![NodeId(3)]
        ]
    );
}

#[test]
fn coffman_graham_width_one_gives_one_node_per_layer() {
    let g = diamond();
    let assignment = CoffmanGraham::new().width(1).unwrap().assign(&g).unwrap();
    assert_eq!(assignment.layer_count(), 4);
    assert_valid(&g, &assignment, 1);
}

#[test]
fn coffman_graham_packs_independent_nodes_up_to_the_width() {
    let mut g = Dag::new();
    for i in 0..7 {
        g.add_node(format!("n{i}"));
    }
    let assignment = CoffmanGraham::new().width(3).unwrap().assign(&g).unwrap();
    let widths: Vec<usize> = assignment.layers().iter().map(Vec::len).collect();
    assert_eq!(widths, vec![3, 3, 1]);
}

#[test]
fn coffman_graham_keeps_children_below_all_parents() {
    let mut g = Dag::new();
    g.set_path(&["a", "b", "c", "d"]);
    g.set_edge("a", "d");
    g.set_edge("x", "d");
    let assignment = CoffmanGraham::new().width(4).unwrap().assign(&g).unwrap();
    let layer = |id: &str| assignment.layer_of(g.find(id).unwrap()).unwrap();
    assert!(layer("a") < layer("b"));
    assert!(layer("b") < layer("c"));
    assert!(layer("c") < layer("d"));
    assert!(layer("x") < layer("d"));
}

#[test]
fn coffman_graham_counts_parallel_edges_once_per_edge() {
    let mut g = Dag::new();
    g.set_edge("a", "b");
    g.set_edge("a", "b");
    g.set_edge("c", "b");
    let assignment = CoffmanGraham::new().assign(&g).unwrap();
    assert_eq!(assignment.node_count(), 3);
    assert_valid(&g, &assignment, 2);
}

#[test]
fn coffman_graham_respects_edges_and_width_on_random_dags() {
    for seed in 0..40u64 {
        let nodes = 2 + (seed as usize % 23);
        let g = random_dag(seed, nodes, 15 + seed % 30);
        for width in [0i64, 1, 2, 3, 5] {
            let layering = CoffmanGraham::new().width(width).unwrap();
            let assignment = layering.assign(&g).unwrap();
            assert_eq!(assignment.node_count(), nodes);
            assert_valid(&g, &assignment, layering.effective_width(nodes));
        }
    }
}

#[test]
fn coffman_graham_auto_width_rounds_the_square_root() {
    let layering = CoffmanGraham::new();
    assert_eq!(layering.effective_width(1), 1);
    assert_eq!(layering.effective_width(4), 2);
    assert_eq!(layering.effective_width(6), 2);
    assert_eq!(layering.effective_width(7), 3);
    assert_eq!(layering.effective_width(100), 10);
    assert_eq!(layering.width(4).unwrap().effective_width(100), 4);
}

#[test]
fn coffman_graham_rejects_negative_widths() {
    let err = CoffmanGraham::new().width(-1).unwrap_err();
    assert!(matches!(err, Error::Configuration { option: "width", .. }));
}

#[test]
fn coffman_graham_setters_leave_the_original_untouched() {
    let base = CoffmanGraham::new();
    let narrow = base.width(2).unwrap();
    assert_eq!(base.configured_width(), 0);
    assert_eq!(narrow.configured_width(), 2);
}

#[test]
fn coffman_graham_rejects_cycles_before_assigning() {
    let mut g = Dag::new();
    g.set_path(&["a", "b", "a"]);
    assert!(matches!(
        CoffmanGraham::new().assign(&g),
        Err(Error::Cycle { .. })
    ));
    assert!(g.node(NodeId(0)).unwrap().layer.is_none());
}

#[test]
fn coffman_graham_handles_empty_graphs() {
    let assignment = CoffmanGraham::new().assign(&Dag::new()).unwrap();
    assert_eq!(assignment.layer_count(), 0);
    assert!(assignment.layers().is_empty());
}

#[test]
fn layer_assignment_apply_writes_node_layers() {
    let mut g = diamond();
    let assignment = CoffmanGraham::new().assign(&g).unwrap();
    assignment.apply(&mut g);
    let layers: Vec<Option<usize>> = g.node_ids().map(|v| g.node(v).unwrap().layer).collect();
    assert_eq!(layers, vec![Some(0), Some(1), Some(1), Some(2)]);
}

#[test]
fn layering_options_deserialize_from_camel_case_json() {
    let opts: LayeringOptions = serde_json::from_str(r#"{"width": 3}"#).unwrap();
    assert_eq!(
        CoffmanGraham::from_options(&opts).unwrap().configured_width(),
        3
    );

    let defaults: LayeringOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(defaults, LayeringOptions::default());

    let negative: LayeringOptions = serde_json::from_str(r#"{"width": -2}"#).unwrap();
    assert!(CoffmanGraham::from_options(&negative).is_err());
}

#[test]
fn layer_assignment_groups_nodes_in_ascending_id_order() {
    let assignment = LayerAssignment::new(vec![1, 0, 1, 0]);
    assert_eq!(
        assignment.layers(),
        vec![vec![NodeId(1), NodeId(3)], vec![NodeId(0), NodeId(2)]]
    );
}
