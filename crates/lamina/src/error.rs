#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("invalid `{option}` option: {message}")]
    Configuration {
        option: &'static str,
        message: String,
    },

    #[error(
        "crossing minimization input is too large: sum of squared layer sizes is {cost}, limit is {limit}; split the input or explicitly override the size guard"
    )]
    SizeGuard { cost: usize, limit: usize },

    #[error("solver result is inconsistent with the crossing model: {message}")]
    SolverInconsistency { message: String },

    #[error("graph contains a cycle through node `{node}`")]
    Cycle { node: String },

    #[error("unknown node index {index}")]
    MissingNode { index: usize },

    #[error("unknown vertex index {index}")]
    MissingVertex { index: usize },

    #[error("edge {from} -> {to} does not connect adjacent layers ({from_layer} -> {to_layer})")]
    NonAdjacentEdge {
        from: usize,
        to: usize,
        from_layer: usize,
        to_layer: usize,
    },

    #[error("layer assignment does not fit the graph at node `{node}`: {message}")]
    InvalidLayerAssignment { node: String, message: String },

    #[error("layer {layer} changed between planning and applying its order")]
    StaleOrder { layer: usize },

    #[error(transparent)]
    Milp(#[from] lamina_milp::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
