//! Integer program for exact crossing minimization over a fixed layering.
//!
//! Variables:
//! - one boolean per vertex pair in a layer, set when the lower-keyed vertex comes first;
//! - one nonnegative slack per (parent pair, child pair) combination, forced to 1 when the two
//!   pairs are drawn in opposite orders.
//!
//! Transitivity rows keep every layer's pair decisions a strict total order. Pair variables on
//! every other layer (whichever parity holds fewer pairs) are branched on first: once they are
//! fixed, each remaining layer only has to be ordered against fixed neighbors.

use super::canonical::OrderingIndex;
use crate::layered::{LayeredGraph, VertexId};
use crate::milp::{Model, Sense, VarId, VarKind};

/// One crossing indicator with the two pair variables it compares.
#[derive(Debug, Clone, Copy)]
struct SlackTerm {
    slack: VarId,
    parents: VarId,
    children: VarId,
    sign: f64,
    flip: f64,
}

#[derive(Debug, Clone)]
pub struct CrossingModel {
    model: Model,
    index: OrderingIndex,
    layers: Vec<Vec<VertexId>>,
    pairs: Vec<VarId>,
    slacks: Vec<SlackTerm>,
    transitivity_count: usize,
}

impl CrossingModel {
    pub fn build(g: &LayeredGraph) -> Self {
        let index = OrderingIndex::new(g);
        let mut model = Model::new(Sense::Minimize);
        let pairs: Vec<VarId> = (0..index.pair_count())
            .map(|_| model.add_variable(VarKind::Boolean, 0.0))
            .collect();

        let parity_pairs = |parity: usize| -> usize {
            g.layers()
                .iter()
                .skip(parity)
                .step_by(2)
                .map(|l| l.len() * l.len().saturating_sub(1) / 2)
                .sum()
        };
        let first = usize::from(parity_pairs(1) < parity_pairs(0));
        for layer in g.layers().iter().skip(first).step_by(2) {
            for (i, &a) in layer.iter().enumerate() {
                for &b in layer.iter().skip(i + 1) {
                    if let Some(p) = index.pair(a, b) {
                        model.set_priority(pairs[p.slot], 1);
                    }
                }
            }
        }

        let pair_var = |a: VertexId, b: VertexId| -> Option<(VarId, bool)> {
            index.pair(a, b).map(|p| (pairs[p.slot], p.forward))
        };

        let mut transitivity_count = 0;
        for layer in g.layers() {
            for (i, &n1) in layer.iter().enumerate() {
                for (j, &n2) in layer.iter().enumerate().skip(i + 1) {
                    for &n3 in layer.iter().skip(j + 1) {
                        let (Some((ab, _)), Some((bc, _)), Some((ac, _))) =
                            (pair_var(n1, n2), pair_var(n2, n3), pair_var(n1, n3))
                        else {
                            continue;
                        };
                        model.add_constraint(
                            [(ab, 1.0), (bc, 1.0), (ac, -1.0)],
                            Some(0.0),
                            Some(1.0),
                        );
                        transitivity_count += 1;
                    }
                }
            }
        }

        let mut slacks = Vec::new();
        for layer in g.layers() {
            for (i, &p1) in layer.iter().enumerate() {
                for &p2 in layer.iter().skip(i + 1) {
                    let Some((x, _)) = pair_var(p1, p2) else {
                        continue;
                    };
                    for &c1 in g.children(p1) {
                        for &c2 in g.children(p2) {
                            if c1 == c2 {
                                continue;
                            }
                            let Some((y, forward)) = pair_var(c1, c2) else {
                                continue;
                            };
                            // With `y` read as "c1 before c2", a crossing is `x != y`; when the
                            // children are stored reversed it is `x == y`.
                            let (sign, flip) = if forward { (1.0, 0.0) } else { (-1.0, 1.0) };
                            // Integral at every integer point of `x` and `y`; declaring it so
                            // lets the solver round relaxation bounds up.
                            let s = model.add_variable(VarKind::Integer, 1.0);
                            model.add_constraint(
                                [(s, 1.0), (x, -1.0), (y, sign)],
                                Some(-flip),
                                None,
                            );
                            model.add_constraint(
                                [(s, 1.0), (x, 1.0), (y, -sign)],
                                Some(flip),
                                None,
                            );
                            slacks.push(SlackTerm {
                                slack: s,
                                parents: x,
                                children: y,
                                sign,
                                flip,
                            });
                        }
                    }
                }
            }
        }

        tracing::debug!(
            pairs = pairs.len(),
            transitivity = transitivity_count,
            slacks = slacks.len(),
            "built crossing model"
        );

        Self {
            model,
            index,
            layers: g.layers().to_vec(),
            pairs,
            slacks,
            transitivity_count,
        }
    }

    /// The model variables describing `layers`, a reordering of the graph's layers: pair
    /// variables set from each pair's relative position and every slack at its smallest
    /// feasible value, so the objective equals the crossings of that order.
    pub fn assignment(&self, layers: &[Vec<VertexId>]) -> Vec<f64> {
        let vertex_count = self.layers.iter().map(Vec::len).sum();
        let mut position = vec![0usize; vertex_count];
        for layer in layers {
            for (pos, v) in layer.iter().enumerate() {
                if let Some(slot) = position.get_mut(v.0) {
                    *slot = pos;
                }
            }
        }

        let mut values = vec![0.0; self.model.variable_count()];
        for (a, b, var) in self.canonical_pairs() {
            if position[a.0] < position[b.0] {
                values[var.0] = 1.0;
            }
        }
        for term in &self.slacks {
            let x = values[term.parents.0];
            let y = values[term.children.0];
            let over = x - term.sign * y - term.flip;
            values[term.slack.0] = over.max(-over).max(0.0);
        }
        values
    }

    fn canonical_pairs(&self) -> impl Iterator<Item = (VertexId, VertexId, VarId)> + '_ {
        self.layers.iter().flat_map(move |layer| {
            layer.iter().enumerate().flat_map(move |(i, &a)| {
                layer[i + 1..].iter().filter_map(move |&b| {
                    self.index.pair(a, b).map(|p| (a, b, self.pairs[p.slot]))
                })
            })
        })
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn index(&self) -> &OrderingIndex {
        &self.index
    }

    /// The variable deciding the relative order of `a` and `b`, and whether it reads
    /// "`a` before `b`" (`true`) or "`b` before `a`" (`false`).
    pub fn pair_var(&self, a: VertexId, b: VertexId) -> Option<(VarId, bool)> {
        self.index
            .pair(a, b)
            .map(|p| (self.pairs[p.slot], p.forward))
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn transitivity_count(&self) -> usize {
        self.transitivity_count
    }

    pub fn slack_count(&self) -> usize {
        self.slacks.len()
    }

    pub fn variable_count(&self) -> usize {
        self.model.variable_count()
    }

    pub fn constraint_count(&self) -> usize {
        self.model.constraint_count()
    }
}
