//! Minimal DAG container consumed by the layering stage.
//!
//! Nodes are addressed by dense [`NodeId`] indices; string ids are kept for diagnostics and
//! lookups. Outgoing edges keep insertion order, and parallel edges are preserved.

use crate::error::{Error, Result};
use rustc_hash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// Written by [`crate::layering::LayerAssignment::apply`].
    pub layer: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Dag {
    nodes: Vec<Node>,
    node_index: HashMap<String, NodeId>,
    children: Vec<Vec<NodeId>>,
    parents: Vec<Vec<NodeId>>,
    edge_count: usize,
}

impl Dag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, or returns the existing one with the same id.
    pub fn add_node(&mut self, id: impl Into<String>) -> NodeId {
        let id = id.into();
        if let Some(&existing) = self.node_index.get(&id) {
            return existing;
        }
        let ix = NodeId(self.nodes.len());
        self.node_index.insert(id.clone(), ix);
        self.nodes.push(Node { id, layer: None });
        self.children.push(Vec::new());
        self.parents.push(Vec::new());
        ix
    }

    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<()> {
        for v in [from, to] {
            if v.0 >= self.nodes.len() {
                return Err(Error::MissingNode { index: v.0 });
            }
        }
        self.children[from.0].push(to);
        self.parents[to.0].push(from);
        self.edge_count += 1;
        Ok(())
    }

    /// Adds an edge between two named nodes, creating them as needed.
    pub fn set_edge(&mut self, from: &str, to: &str) -> (NodeId, NodeId) {
        let v = self.add_node(from);
        let w = self.add_node(to);
        self.children[v.0].push(w);
        self.parents[w.0].push(v);
        self.edge_count += 1;
        (v, w)
    }

    pub fn set_path(&mut self, path: &[&str]) {
        for w in path.windows(2) {
            self.set_edge(w[0], w[1]);
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn node(&self, v: NodeId) -> Option<&Node> {
        self.nodes.get(v.0)
    }

    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.node_index.get(id).copied()
    }

    pub fn set_layer(&mut self, v: NodeId, layer: Option<usize>) {
        if let Some(node) = self.nodes.get_mut(v.0) {
            node.layer = layer;
        }
    }

    pub fn children(&self, v: NodeId) -> &[NodeId] {
        self.children.get(v.0).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parents(&self, v: NodeId) -> &[NodeId] {
        self.parents.get(v.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Parentless nodes, in insertion order.
    pub fn sources(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_ids().filter(|v| self.parents[v.0].is_empty())
    }

    pub fn topological_order(&self) -> Result<Vec<NodeId>> {
        let mut indegree: Vec<usize> = self.parents.iter().map(Vec::len).collect();
        let mut queue: VecDeque<NodeId> = self.sources().collect();
        let mut out: Vec<NodeId> = Vec::with_capacity(self.nodes.len());
        while let Some(v) = queue.pop_front() {
            out.push(v);
            for &w in &self.children[v.0] {
                indegree[w.0] -= 1;
                if indegree[w.0] == 0 {
                    queue.push_back(w);
                }
            }
        }
        if out.len() < self.nodes.len() {
            let stuck = indegree
                .iter()
                .position(|&d| d > 0)
                .unwrap_or_default();
            return Err(Error::Cycle {
                node: self.nodes[stuck].id.clone(),
            });
        }
        Ok(out)
    }

    pub fn validate(&self) -> Result<()> {
        self.topological_order().map(|_| ())
    }
}
