//! Core entities for Clock Correlation

use super::value_objects::{
    ConstraintKind, DomainKey, LinearConstraint, LinearModel, NodeId, Ticks,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One side of an observed message: which node, and the instant in that
/// node's local clock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEndpoint {
    pub node: NodeId,
    pub timestamp: Ticks,
}

impl MessageEndpoint {
    pub fn new(node: NodeId, timestamp: Ticks) -> Self {
        Self { node, timestamp }
    }
}

/// Directed observation of one message passing between two nodes.
///
/// Both timestamps are local to their respective endpoint's clock. The two
/// endpoints are always distinct nodes; a record violating that is rejected
/// before model construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternodeMessage {
    /// Unique across the dataset
    pub id: String,
    pub from: MessageEndpoint,
    pub to: MessageEndpoint,
    /// One-way/fire-and-forget observation with no matching reply;
    /// excluded from round-trip-based heuristics
    pub responseless: bool,
}

impl InternodeMessage {
    pub fn new(id: impl Into<String>, from: MessageEndpoint, to: MessageEndpoint) -> Self {
        Self {
            id: id.into(),
            from,
            to,
            responseless: false,
        }
    }

    pub fn with_responseless(mut self, responseless: bool) -> Self {
        self.responseless = responseless;
        self
    }

    /// The endpoint of this exchange that is not `node`'s side.
    pub fn opposite_of(&self, node: &NodeId) -> &MessageEndpoint {
        if self.from.node == *node {
            &self.to
        } else {
            &self.from
        }
    }
}

/// One log-producing participant and the messages it emitted or received,
/// in log order.
///
/// The same message record may appear in both endpoints' lists; the graph
/// builder counts each id once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub messages: Vec<InternodeMessage>,
}

impl Node {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            messages: Vec::new(),
        }
    }

    pub fn with_messages(mut self, messages: Vec<InternodeMessage>) -> Self {
        self.messages = messages;
        self
    }
}

/// Caller-asserted ground truth: `delta(node2) - delta(node1) == value`.
///
/// Supplied by the caller (e.g. two node ids known to be the same physical
/// host), never derived internally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodesConstraint {
    pub node1: NodeId,
    pub node2: NodeId,
    pub value: Ticks,
}

impl NodesConstraint {
    pub fn new(node1: NodeId, node2: NodeId, value: Ticks) -> Self {
        Self {
            node1,
            node2,
            value,
        }
    }
}

/// Indexed adjacency over the node set: who sent how many messages to whom,
/// and which deployment domain each node belongs to.
#[derive(Clone, Debug)]
pub struct InternodeMessagesMap {
    /// Stable index per node id, assigned in first-seen order
    pub node_indexes: HashMap<NodeId, usize>,
    /// Index -> node
    pub nodes: Vec<Node>,
    /// `counts[src][dst]` = number of observed messages src -> dst
    pub counts: Vec<Vec<usize>>,
    /// Index -> deployment domain
    pub node_domains: Vec<DomainKey>,
    /// All unique messages, in first-seen order
    pub messages: Vec<InternodeMessage>,
}

impl InternodeMessagesMap {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn index_of(&self, node: &NodeId) -> Option<usize> {
        self.node_indexes.get(node).copied()
    }

    pub fn node_id(&self, index: usize) -> &NodeId {
        &self.nodes[index].id
    }

    /// Number of observed messages src -> dst.
    pub fn message_count(&self, src: usize, dst: usize) -> usize {
        self.counts[src][dst]
    }

    pub fn has_traffic(&self, src: usize, dst: usize) -> bool {
        self.counts[src][dst] > 0
    }

    /// Total unique messages in the dataset.
    pub fn total_messages(&self) -> usize {
        self.messages.len()
    }
}

/// The constraint model under assembly: variables, constraints, the joint
/// minimization objectives, and per-node evidence counters.
#[derive(Clone, Debug)]
pub struct ConstraintModel {
    /// One non-negative decision variable per node index
    pub variables: usize,
    pub constraints: Vec<LinearConstraint>,
    /// Variable indexes minimized jointly (all of them)
    pub objectives: Vec<usize>,
    /// Per-node count of messaging/fixed constraints referencing the node
    pub usage: Vec<u32>,
}

impl ConstraintModel {
    pub fn new(variables: usize) -> Self {
        Self {
            variables,
            constraints: Vec::new(),
            objectives: (0..variables).collect(),
            usage: vec![0; variables],
        }
    }

    /// Add a constraint without touching the evidence counters
    /// (synthetic/pin constraints carry no independent evidence).
    pub fn push(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    /// Add a constraint and count it as evidence for both referenced nodes.
    pub fn push_counted(&mut self, constraint: LinearConstraint) {
        self.usage[constraint.plus] += 1;
        self.usage[constraint.minus] += 1;
        self.constraints.push(constraint);
    }

    pub fn count_of(&self, kind: ConstraintKind) -> usize {
        self.constraints.iter().filter(|c| c.kind == kind).count()
    }

    /// Snapshot handed to the solver port.
    pub fn to_linear_model(&self) -> LinearModel {
        LinearModel {
            variables: self.variables,
            constraints: self.constraints.clone(),
            objectives: self.objectives.clone(),
        }
    }
}
