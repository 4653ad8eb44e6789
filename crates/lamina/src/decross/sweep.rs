//! Barycenter sweeps used to find a good starting order for the exact search.
//!
//! Alternates downward sweeps (each layer sorted by the mean position of its parents) with
//! upward ones (mean position of children), keeping the best order seen and stopping after four
//! sweeps without a strict improvement.

use super::crossings::two_layer_crossings;
use crate::layered::{LayeredGraph, VertexId};
use rustc_hash::FxHashMap as HashMap;

/// Layers of `g` reordered by barycenter sweeps. Never has more crossings than the current
/// order, and returns it unchanged when no sweep improves on it.
pub fn barycenter_order(g: &LayeredGraph) -> Vec<Vec<VertexId>> {
    let mut parents: Vec<Vec<VertexId>> = vec![Vec::new(); g.vertex_count()];
    let mut children: Vec<Vec<VertexId>> = vec![Vec::new(); g.vertex_count()];
    for layer in g.layers() {
        for &v in layer {
            for &w in g.children(v) {
                parents[w.0].push(v);
                children[v.0].push(w);
            }
        }
    }

    let mut layers = g.layers().to_vec();
    let mut best = layers.clone();
    let mut best_cc = total_crossings(g, &best);

    let mut i: usize = 0;
    let mut last_best: usize = 0;
    while last_best < 4 && best_cc > 0 {
        i += 1;
        let bias_right = i % 4 >= 2;
        if i % 2 == 1 {
            for ix in 1..layers.len() {
                let sorted = sort_layer(&layers[ix], &layers[ix - 1], &parents, bias_right);
                layers[ix] = sorted;
            }
        } else {
            for ix in (0..layers.len().saturating_sub(1)).rev() {
                let sorted = sort_layer(&layers[ix], &layers[ix + 1], &children, bias_right);
                layers[ix] = sorted;
            }
        }

        let cc = total_crossings(g, &layers);
        last_best += 1;
        if cc < best_cc {
            last_best = 0;
            best_cc = cc;
            best = layers.clone();
        }
    }

    tracing::debug!(sweeps = i, crossings = best_cc, "barycenter start");
    best
}

/// `movable` sorted by the mean position of its neighbors in `fixed`. A vertex without
/// neighbors there keeps its own index as its weight.
fn sort_layer(
    movable: &[VertexId],
    fixed: &[VertexId],
    neighbors: &[Vec<VertexId>],
    bias_right: bool,
) -> Vec<VertexId> {
    let fixed_pos: HashMap<VertexId, usize> =
        fixed.iter().enumerate().map(|(i, &v)| (v, i)).collect();

    let mut entries: Vec<(f64, usize, VertexId)> = movable
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let (sum, count) = neighbors[v.0]
                .iter()
                .filter_map(|w| fixed_pos.get(w))
                .fold((0usize, 0usize), |(s, c), &p| (s + p, c + 1));
            let barycenter = if count == 0 {
                i as f64
            } else {
                sum as f64 / count as f64
            };
            (barycenter, i, v)
        })
        .collect();

    entries.sort_by(|a, b| {
        a.0.total_cmp(&b.0).then_with(|| {
            if bias_right {
                b.1.cmp(&a.1)
            } else {
                a.1.cmp(&b.1)
            }
        })
    });
    entries.into_iter().map(|(.., v)| v).collect()
}

fn total_crossings(g: &LayeredGraph, layers: &[Vec<VertexId>]) -> usize {
    layers
        .windows(2)
        .map(|pair| two_layer_crossings(g, &pair[0], &pair[1]))
        .sum()
}
