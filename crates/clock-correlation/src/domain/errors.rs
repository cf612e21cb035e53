//! Error types for Clock Correlation
//!
//! Precondition violations (malformed input) and solver backend failures are
//! errors; `Infeasible` and `Timeout` are terminal statuses on
//! `SolutionResult`, never errors.

use super::value_objects::NodeId;
use thiserror::Error;

/// All errors that can occur while correlating node clocks.
#[derive(Debug, Error)]
pub enum CorrelationError {
    /// Nothing to correlate
    #[error("node set is empty")]
    EmptyNodeSet,

    /// Two input nodes share the same id
    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),

    /// A message references a node absent from the node set
    #[error("message {message_id} references unknown node {node}")]
    UnknownNode { message_id: String, node: NodeId },

    /// Two distinct message records share an id
    #[error("duplicate message id: {0}")]
    DuplicateMessageId(String),

    /// A message has the same node on both endpoints
    #[error("message {0} is self-directed")]
    SelfDirectedMessage(String),

    /// A fixed constraint references a node absent from the node set
    #[error("fixed constraint references unknown node {0}")]
    UnknownConstraintNode(NodeId),

    /// Node count exceeded limits (anti-DoS)
    #[error("node count exceeded: {count} > {max}")]
    TooManyNodes { count: usize, max: usize },

    /// Message count exceeded limits (anti-DoS)
    #[error("message count exceeded: {count} > {max}")]
    TooManyMessages { count: usize, max: usize },

    /// The solver backend failed (not an Infeasible/Timeout verdict)
    #[error("solver failure: {0}")]
    Solver(#[from] SolverError),
}

/// Internal failures of the LP solver adapter.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The backend reported an error other than infeasibility
    #[error("solver backend error: {0}")]
    Backend(String),

    /// The objective is unbounded; the model is missing variable bounds
    #[error("objective unbounded")]
    Unbounded,

    /// The solve worker died before producing a verdict
    #[error("solver worker failed: {0}")]
    Worker(String),

    /// The backend returned a different number of values than variables
    #[error("solution has {got} values for {expected} variables")]
    ShapeMismatch { expected: usize, got: usize },
}
