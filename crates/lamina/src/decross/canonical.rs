//! Canonical vertex keys and the symmetric pair index built on them.
//!
//! A vertex's key is `(layer, position)` at the time the index is built. Pairs inside a layer
//! are packed into a triangular array so that `(a, b)` and `(b, a)` land on the same slot.

use crate::layered::{LayeredGraph, VertexId};
use std::cmp::Ordering;

/// A pair slot plus whether `(a, b)` was given in canonical order (`a` has the smaller key).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairSlot {
    pub slot: usize,
    pub forward: bool,
}

#[derive(Debug, Clone, Default)]
pub struct OrderingIndex {
    keys: Vec<(usize, usize)>,
    offsets: Vec<usize>,
    sizes: Vec<usize>,
    pair_count: usize,
}

fn triangle(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

impl OrderingIndex {
    pub fn new(g: &LayeredGraph) -> Self {
        let mut keys = vec![(0, 0); g.vertex_count()];
        let mut offsets = Vec::with_capacity(g.layer_count());
        let mut sizes = Vec::with_capacity(g.layer_count());
        let mut pair_count = 0;
        for (layer, vertices) in g.layers().iter().enumerate() {
            for (pos, v) in vertices.iter().enumerate() {
                keys[v.0] = (layer, pos);
            }
            offsets.push(pair_count);
            sizes.push(vertices.len());
            pair_count += triangle(vertices.len());
        }
        Self {
            keys,
            offsets,
            sizes,
            pair_count,
        }
    }

    pub fn key(&self, v: VertexId) -> (usize, usize) {
        self.keys[v.0]
    }

    pub fn cmp(&self, a: VertexId, b: VertexId) -> Ordering {
        self.key(a).cmp(&self.key(b))
    }

    pub fn pair_count(&self) -> usize {
        self.pair_count
    }

    /// Slot of two distinct vertices on the same layer.
    pub fn pair(&self, a: VertexId, b: VertexId) -> Option<PairSlot> {
        let (la, pa) = *self.keys.get(a.0)?;
        let (lb, pb) = *self.keys.get(b.0)?;
        if la != lb || pa == pb {
            return None;
        }
        let (i, j, forward) = if pa < pb {
            (pa, pb, true)
        } else {
            (pb, pa, false)
        };
        let n = self.sizes[la];
        let slot = self.offsets[la] + i * (2 * n - i - 1) / 2 + (j - i - 1);
        Some(PairSlot { slot, forward })
    }
}
