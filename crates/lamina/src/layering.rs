//! Width-bounded layer assignment (Coffman-Graham style).
//!
//! Nodes are served from a priority queue keyed by their readiness list: the dequeue ranks of
//! their parents, most recent first. A node joins the current layer while the width budget lasts
//! and all of its parents sit in strictly earlier layers; otherwise a new layer is opened. The
//! packing is greedy, not globally optimal.

use crate::data::PriorityQueue;
use crate::error::{Error, Result};
use crate::graph::{Dag, NodeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayeringOptions {
    /// Maximum number of nodes per layer; `0` picks `round(sqrt(node count))`.
    pub width: i64,
}

/// Immutable layer assigner configuration. Setters return a new value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoffmanGraham {
    width: usize,
}

impl CoffmanGraham {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_options(options: &LayeringOptions) -> Result<Self> {
        Self::new().width(options.width)
    }

    pub fn width(self, width: i64) -> Result<Self> {
        let width = usize::try_from(width).map_err(|_| Error::Configuration {
            option: "width",
            message: format!("expected a nonnegative integer, got {width}"),
        })?;
        Ok(Self { width })
    }

    /// The configured width, `0` meaning automatic.
    pub fn configured_width(&self) -> usize {
        self.width
    }

    pub fn effective_width(&self, node_count: usize) -> usize {
        if self.width > 0 {
            return self.width;
        }
        ((node_count as f64).sqrt() + 0.5).floor() as usize
    }

    pub fn assign(&self, dag: &Dag) -> Result<LayerAssignment> {
        dag.validate()?;

        let n = dag.node_count();
        let max_width = self.effective_width(n);

        let mut pending: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut layer_of: Vec<Option<usize>> = vec![None; n];

        let mut queue = PriorityQueue::new(|a: &Ready, b: &Ready| precedes(&a.ranks, &b.ranks));
        queue.extend(dag.sources().map(|node| Ready {
            node,
            ranks: Vec::new(),
        }));

        let mut layer: usize = 0;
        let mut width: usize = 0;
        let mut rank: usize = 0;
        while let Some(Ready { node, .. }) = queue.pop() {
            let parents_done = dag
                .parents(node)
                .iter()
                .all(|p| layer_of[p.0].is_some_and(|l| l < layer));
            if width < max_width && parents_done {
                width += 1;
            } else {
                layer += 1;
                width = 1;
            }
            layer_of[node.0] = Some(layer);

            for &child in dag.children(node) {
                let ranks = &mut pending[child.0];
                ranks.push(rank);
                if ranks.len() == dag.parents(child).len() {
                    let mut ranks = std::mem::take(ranks);
                    ranks.sort_unstable_by(|a, b| b.cmp(a));
                    queue.push(Ready { node: child, ranks });
                }
            }
            rank += 1;
        }

        let layer_of: Vec<usize> = layer_of.into_iter().map(Option::unwrap_or_default).collect();
        let assignment = LayerAssignment::new(layer_of);
        tracing::debug!(
            nodes = n,
            max_width,
            layers = assignment.layer_count(),
            "assigned layers"
        );
        Ok(assignment)
    }
}

#[derive(Debug)]
struct Ready {
    node: NodeId,
    ranks: Vec<usize>,
}

/// Lexicographic readiness comparison. When `left` runs out first (or the lists are equal) it
/// precedes; when `right` runs out first it does not.
fn precedes(left: &[usize], right: &[usize]) -> bool {
    for (i, l) in left.iter().enumerate() {
        let Some(r) = right.get(i) else {
            return false;
        };
        if l < r {
            return true;
        }
        if r < l {
            return false;
        }
    }
    true
}

/// Per-node layer indices produced by [`CoffmanGraham::assign`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerAssignment {
    layer_of: Vec<usize>,
}

impl LayerAssignment {
    /// Builds an assignment from explicit layer indices, indexed by [`NodeId`].
    pub fn new(layer_of: Vec<usize>) -> Self {
        Self { layer_of }
    }

    pub fn layer_of(&self, v: NodeId) -> Option<usize> {
        self.layer_of.get(v.0).copied()
    }

    pub fn node_count(&self) -> usize {
        self.layer_of.len()
    }

    pub fn layer_count(&self) -> usize {
        self.layer_of.iter().max().map_or(0, |l| l + 1)
    }

    /// Nodes grouped by layer, ascending [`NodeId`] within each layer.
    pub fn layers(&self) -> Vec<Vec<NodeId>> {
        let mut out: Vec<Vec<NodeId>> = vec![Vec::new(); self.layer_count()];
        for (ix, &layer) in self.layer_of.iter().enumerate() {
            out[layer].push(NodeId(ix));
        }
        out
    }

    /// Writes the layer indices onto the graph's nodes.
    pub fn apply(&self, dag: &mut Dag) {
        for (ix, &layer) in self.layer_of.iter().enumerate() {
            dag.set_layer(NodeId(ix), Some(layer));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::precedes;

    #[test]
    fn earlier_ranks_take_priority() {
        assert!(precedes(&[3, 1], &[4, 0]));
        assert!(!precedes(&[4, 0], &[3, 1]));
        assert!(precedes(&[4, 0], &[4, 1]));
    }

    #[test]
    fn an_exhausted_left_list_precedes() {
        assert!(precedes(&[], &[2]));
        assert!(precedes(&[2], &[2, 1]));
        assert!(precedes(&[2, 1], &[2, 1]));
    }

    #[test]
    fn an_exhausted_right_list_does_not_precede() {
        assert!(!precedes(&[2], &[]));
        assert!(!precedes(&[2, 1], &[2]));
    }
}
