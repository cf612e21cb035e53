//! Inbound Ports (Driving Ports / API)

use crate::domain::entities::{ConstraintModel, InternodeMessagesMap, Node, NodesConstraint};
use crate::domain::errors::CorrelationError;
use crate::domain::value_objects::SolutionResult;
use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;

/// One correlation request: the node set with resolved messages, externally
/// asserted fixed offsets, the roles eligible for isolated-instance pinning,
/// and an optional solve budget override.
///
/// Nodes are consumed as an ordered vector so index assignment, and with it
/// the whole assembled model, is deterministic.
#[derive(Clone, Debug)]
pub struct CorrelationRequest {
    pub nodes: Vec<Node>,
    pub fixed_constraints: Vec<NodesConstraint>,
    pub allowed_merge_roles: HashSet<String>,
    /// Falls back to the service's configured budget when absent
    pub time_budget: Option<Duration>,
}

impl CorrelationRequest {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            fixed_constraints: Vec::new(),
            allowed_merge_roles: HashSet::new(),
            time_budget: None,
        }
    }

    pub fn with_fixed_constraints(mut self, constraints: Vec<NodesConstraint>) -> Self {
        self.fixed_constraints = constraints;
        self
    }

    pub fn with_allowed_merge_roles(mut self, roles: HashSet<String>) -> Self {
        self.allowed_merge_roles = roles;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }
}

/// Primary Clock Correlation API
#[async_trait]
pub trait ClockCorrelationApi: Send + Sync {
    /// Correlate the node clocks of one analysis batch.
    ///
    /// This is the main entry point. It:
    /// 1. Validates the input
    /// 2. Builds the internode messages map
    /// 3. Assembles the constraint model and resolves degenerate topologies
    /// 4. Solves within the time budget
    /// 5. Extracts per-node deltas and confidence counters
    ///
    /// Precondition violations are errors; `Infeasible` and `Timeout` are
    /// statuses on the returned result.
    async fn correlate(
        &self,
        request: CorrelationRequest,
    ) -> Result<SolutionResult, CorrelationError>;

    /// Build the indexed adjacency structure for a node set.
    fn build_messages_map(&self, nodes: &[Node]) -> Result<InternodeMessagesMap, CorrelationError>;

    /// Assemble the full constraint model for a message map, including
    /// degenerate-case resolution.
    fn assemble_model(
        &self,
        map: &InternodeMessagesMap,
        fixed_constraints: &[NodesConstraint],
        allowed_merge_roles: &HashSet<String>,
    ) -> Result<ConstraintModel, CorrelationError>;
}
