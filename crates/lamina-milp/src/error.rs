use crate::VarId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("constraint {constraint} references unknown variable {var:?}")]
    UnknownVariable { constraint: usize, var: VarId },

    #[error("constraint {constraint} has an empty range [{min}, {max}]")]
    EmptyRange { constraint: usize, min: f64, max: f64 },

    #[error("model is infeasible")]
    Infeasible,

    #[error("model is unbounded")]
    Unbounded,

    #[error("branch-and-bound explored more than {limit} nodes")]
    NodeLimit { limit: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
