//! Layered graph consumed by crossing minimization.
//!
//! Every edge connects a vertex on layer `i` to one on layer `i + 1`; long edges are split into
//! placeholder chains beforehand (see [`crate::normalize`]). The order of each layer's vertex list
//! is the left-to-right drawing order.

use crate::error::{Error, Result};
use crate::graph::NodeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub usize);

impl VertexId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vertex {
    Real(NodeId),
    /// Synthetic vertex on a long edge `source -> target`.
    Placeholder { source: NodeId, target: NodeId },
}

impl Vertex {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Vertex::Placeholder { .. })
    }

    pub fn node(&self) -> Option<NodeId> {
        match self {
            Vertex::Real(v) => Some(*v),
            Vertex::Placeholder { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayeredGraph {
    vertices: Vec<Vertex>,
    layer_of: Vec<usize>,
    children: Vec<Vec<VertexId>>,
    layers: Vec<Vec<VertexId>>,
    edge_count: usize,
}

impl LayeredGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a vertex to the right end of `layer`, creating empty layers up to it.
    pub fn add_vertex(&mut self, layer: usize, vertex: Vertex) -> VertexId {
        let v = VertexId(self.vertices.len());
        self.vertices.push(vertex);
        self.layer_of.push(layer);
        self.children.push(Vec::new());
        if self.layers.len() <= layer {
            self.layers.resize_with(layer + 1, Vec::new);
        }
        self.layers[layer].push(v);
        v
    }

    pub fn add_edge(&mut self, from: VertexId, to: VertexId) -> Result<()> {
        for v in [from, to] {
            if v.0 >= self.vertices.len() {
                return Err(Error::MissingVertex { index: v.0 });
            }
        }
        let from_layer = self.layer_of[from.0];
        let to_layer = self.layer_of[to.0];
        if to_layer != from_layer + 1 {
            return Err(Error::NonAdjacentEdge {
                from: from.0,
                to: to.0,
                from_layer,
                to_layer,
            });
        }
        self.children[from.0].push(to);
        self.edge_count += 1;
        Ok(())
    }

    pub fn layers(&self) -> &[Vec<VertexId>] {
        &self.layers
    }

    pub fn layer(&self, ix: usize) -> Option<&[VertexId]> {
        self.layers.get(ix).map(Vec::as_slice)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn vertex(&self, v: VertexId) -> Option<&Vertex> {
        self.vertices.get(v.0)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn layer_of(&self, v: VertexId) -> Option<usize> {
        self.layer_of.get(v.0).copied()
    }

    /// Outgoing edges, in insertion order. Every child sits on the next layer.
    pub fn children(&self, v: VertexId) -> &[VertexId] {
        self.children.get(v.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of non-placeholder vertices on a layer.
    pub fn real_width(&self, ix: usize) -> usize {
        self.layer(ix)
            .unwrap_or(&[])
            .iter()
            .filter(|v| !self.vertices[v.0].is_placeholder())
            .count()
    }

    /// Sum of squared layer sizes, the quantity the crossing size guard limits.
    pub fn ordering_cost(&self) -> usize {
        self.layers.iter().map(|l| l.len() * l.len()).sum()
    }

    pub(crate) fn replace_layer(&mut self, ix: usize, order: Vec<VertexId>) {
        self.layers[ix] = order;
    }
}
