#![forbid(unsafe_code)]

//! Layer assignment and exact crossing minimization for layered DAG drawings.
//!
//! The pipeline is:
//! 1. [`layering::CoffmanGraham`] assigns every node of a [`graph::Dag`] a layer under a width
//!    budget;
//! 2. [`layered::LayeredGraph::from_assignment`] splits long edges into placeholder chains;
//! 3. [`decross::OptimalDecrossing`] reorders each layer to the minimum number of crossings by
//!    solving an integer program through [`milp`].

pub use lamina_milp as milp;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod data;
pub mod decross;
pub mod error;
pub mod graph;
pub mod layered;
pub mod layering;
pub mod normalize;

pub use decross::{
    DecrossOptions, DecrossReport, FallbackOrder, LayerOrders, OptimalDecrossing, crossing_count,
};
pub use error::{Error, Result};
pub use graph::{Dag, Node, NodeId};
pub use layered::{LayeredGraph, Vertex, VertexId};
pub use layering::{CoffmanGraham, LayerAssignment, LayeringOptions};

/// Runs both stages: assigns layers (writing them onto `dag`), expands long edges and orders
/// every layer optimally.
pub fn layout(
    dag: &mut Dag,
    layering: &CoffmanGraham,
    decrossing: &OptimalDecrossing,
) -> Result<LayeredGraph> {
    let assignment = layering.assign(dag)?;
    let mut g = LayeredGraph::from_assignment(dag, &assignment)?;
    decrossing.decross(&mut g)?;
    assignment.apply(dag);
    Ok(g)
}
