//! Normalize long edges by inserting placeholder vertices.
//!
//! Turns a [`Dag`] plus a [`LayerAssignment`] into a [`LayeredGraph`] where every edge spans
//! exactly one layer. Placeholders take part in ordering like real vertices.

use crate::error::{Error, Result};
use crate::graph::{Dag, NodeId};
use crate::layered::{LayeredGraph, Vertex, VertexId};
use crate::layering::LayerAssignment;

impl LayeredGraph {
    /// Real vertices are added layer by layer in ascending node order, followed by placeholders
    /// in edge order.
    pub fn from_assignment(dag: &Dag, assignment: &LayerAssignment) -> Result<Self> {
        if let Some(missing) = dag
            .node_ids()
            .find(|&v| assignment.layer_of(v).is_none())
        {
            return Err(Error::InvalidLayerAssignment {
                node: node_name(dag, missing.0),
                message: "node has no layer".to_string(),
            });
        }
        if assignment.node_count() > dag.node_count() {
            return Err(Error::InvalidLayerAssignment {
                node: dag.node_count().to_string(),
                message: format!(
                    "assignment covers {} nodes but the graph has {}",
                    assignment.node_count(),
                    dag.node_count()
                ),
            });
        }

        let mut g = LayeredGraph::new();
        let mut vertex_of: Vec<VertexId> = vec![VertexId(0); dag.node_count()];
        for (layer, nodes) in assignment.layers().into_iter().enumerate() {
            for v in nodes {
                vertex_of[v.0] = g.add_vertex(layer, Vertex::Real(v));
            }
        }

        for v in dag.node_ids() {
            let from_layer = assignment.layer_of(v).unwrap_or_default();
            for &w in dag.children(v) {
                let to_layer = assignment.layer_of(w).unwrap_or_default();
                if to_layer <= from_layer {
                    return Err(Error::InvalidLayerAssignment {
                        node: node_name(dag, w.0),
                        message: format!(
                            "edge from `{}` goes from layer {from_layer} to layer {to_layer}",
                            node_name(dag, v.0)
                        ),
                    });
                }

                let mut prev = vertex_of[v.0];
                for layer in from_layer + 1..to_layer {
                    let dummy = g.add_vertex(
                        layer,
                        Vertex::Placeholder {
                            source: v,
                            target: w,
                        },
                    );
                    g.add_edge(prev, dummy)?;
                    prev = dummy;
                }
                g.add_edge(prev, vertex_of[w.0])?;
            }
        }

        Ok(g)
    }
}

fn node_name(dag: &Dag, ix: usize) -> String {
    dag.node(NodeId(ix))
        .map(|n| n.id.clone())
        .unwrap_or_else(|| ix.to_string())
}
