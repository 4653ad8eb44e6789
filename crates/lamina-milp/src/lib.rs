#![forbid(unsafe_code)]

//! Mixed-integer linear programming interface used by `lamina`.
//!
//! A [`Model`] is a plain description (objective sense, typed variables, range constraints).
//! Anything implementing [`MilpSolver`] can solve it; [`BranchAndBound`] is the bundled exact
//! solver built on a dense simplex.

pub mod branch_bound;
pub mod error;
pub mod model;
mod simplex;

pub use branch_bound::{BranchAndBound, BranchAndBoundOptions};
pub use error::{Error, Result};
pub use model::{Constraint, MilpSolver, Model, Sense, Solution, VarId, VarKind, Variable};
