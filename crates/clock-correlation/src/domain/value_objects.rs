//! Value objects for Clock Correlation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Tick count in the fixed sub-microsecond time unit shared by all
/// timestamps and deltas in this model.
pub type Ticks = i64;

/// Deployment/physical grouping key for a node (e.g. a host identifier).
pub type DomainKey = String;

/// Identity of one log-producing participant.
///
/// `role` groups logically-equivalent participants (e.g. "WebServer");
/// `instance` distinguishes physical/replica instances of that role.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId {
    pub role: String,
    pub instance: String,
}

impl NodeId {
    pub fn new(role: impl Into<String>, instance: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            instance: instance.into(),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.role, self.instance)
    }
}

/// Relation between the delta difference and the constraint value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintOp {
    /// `delta(plus) - delta(minus) == value`
    Eq,
    /// `delta(plus) - delta(minus) >= value`
    Geq,
}

/// Provenance of a constraint in the assembled model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// Causal inequality derived from an observed message
    Messaging,
    /// Caller-asserted ground truth between two nodes
    Fixed,
    /// Reverse bound injected for a unidirectional node pair
    SyntheticReverse,
    /// Equality pinning an isolated role instance to its anchor
    IsolatedPin,
}

/// One linear constraint `delta(plus) - delta(minus) (op) value`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearConstraint {
    /// Node index whose delta has coefficient +1
    pub plus: usize,
    /// Node index whose delta has coefficient -1
    pub minus: usize,
    /// Relation to the constraint value
    pub op: ConstraintOp,
    /// Right-hand side, in ticks
    pub value: Ticks,
    /// Where this constraint came from
    pub kind: ConstraintKind,
}

impl LinearConstraint {
    pub fn messaging(plus: usize, minus: usize, value: Ticks) -> Self {
        Self {
            plus,
            minus,
            op: ConstraintOp::Geq,
            value,
            kind: ConstraintKind::Messaging,
        }
    }

    pub fn fixed(plus: usize, minus: usize, value: Ticks) -> Self {
        Self {
            plus,
            minus,
            op: ConstraintOp::Eq,
            value,
            kind: ConstraintKind::Fixed,
        }
    }

    pub fn synthetic_reverse(plus: usize, minus: usize, value: Ticks) -> Self {
        Self {
            plus,
            minus,
            op: ConstraintOp::Geq,
            value,
            kind: ConstraintKind::SyntheticReverse,
        }
    }

    pub fn isolated_pin(plus: usize, minus: usize) -> Self {
        Self {
            plus,
            minus,
            op: ConstraintOp::Eq,
            value: 0,
            kind: ConstraintKind::IsolatedPin,
        }
    }
}

/// The solver-facing model: one non-negative real variable per node index,
/// linear constraints over pairs of them, and the variable indices to
/// minimize jointly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearModel {
    /// Number of decision variables (one per node index)
    pub variables: usize,
    /// All constraints, including synthetic ones
    pub constraints: Vec<LinearConstraint>,
    /// Variable indexes to minimize jointly
    pub objectives: Vec<usize>,
}

/// Outcome of one solve attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum SolveVerdict {
    /// A feasible assignment, indexed like the model's variables
    Feasible(Vec<f64>),
    /// The constraints are mathematically contradictory
    Infeasible,
    /// The time budget elapsed before any verdict was reached
    Timeout,
}

/// Terminal status of a correlation call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolutionStatus {
    Solved,
    Infeasible,
    Timeout,
}

/// Per-node outcome of a solved correlation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSolution {
    /// Ticks to add to the node's local timestamps
    pub time_delta: Ticks,
    /// How many messaging/fixed constraints referenced the node.
    /// Zero means the delta is a meaningless default.
    pub constraint_count: u32,
}

/// Correlation metrics for observability.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationMetrics {
    /// Nodes in the graph
    pub node_count: u32,
    /// Unique internode messages observed
    pub message_count: u32,
    /// Causal inequalities derived from messages
    pub messaging_constraints: u32,
    /// Caller-asserted equality constraints
    pub fixed_constraints: u32,
    /// Reverse bounds injected for unidirectional pairs
    pub synthetic_constraints: u32,
    /// Isolated role instances pinned to an anchor
    pub pinned_instances: u32,
    /// Time spent in the solver (ms)
    pub solve_time_ms: u64,
}

/// Result of one correlation call.
///
/// `solutions` is populated only when `status` is `Solved`; callers are
/// expected to fall back to unsynchronized timestamps otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolutionResult {
    pub status: SolutionStatus,
    pub solutions: HashMap<NodeId, NodeSolution>,
    pub metrics: CorrelationMetrics,
}

impl SolutionResult {
    pub fn solved(solutions: HashMap<NodeId, NodeSolution>, metrics: CorrelationMetrics) -> Self {
        Self {
            status: SolutionStatus::Solved,
            solutions,
            metrics,
        }
    }

    pub fn infeasible(metrics: CorrelationMetrics) -> Self {
        Self {
            status: SolutionStatus::Infeasible,
            solutions: HashMap::new(),
            metrics,
        }
    }

    pub fn timeout(metrics: CorrelationMetrics) -> Self {
        Self {
            status: SolutionStatus::Timeout,
            solutions: HashMap::new(),
            metrics,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.status == SolutionStatus::Solved
    }

    /// Delta for a node, if the call was solved and the node is known.
    pub fn delta_of(&self, node: &NodeId) -> Option<Ticks> {
        self.solutions.get(node).map(|s| s.time_delta)
    }
}
