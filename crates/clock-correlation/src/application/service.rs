//! Clock Correlation Service
//!
//! Main service implementing `ClockCorrelationApi`.

use crate::algorithms::{
    build_constraint_model, build_messages_map, pin_isolated_instances,
    resolve_unidirectional_pairs,
};
use crate::config::CorrelationConfig;
use crate::domain::entities::{ConstraintModel, InternodeMessagesMap, Node, NodesConstraint};
use crate::domain::errors::{CorrelationError, SolverError};
use crate::domain::value_objects::{
    ConstraintKind, CorrelationMetrics, NodeId, NodeSolution, SolutionResult, SolveVerdict, Ticks,
};
use crate::ports::inbound::{ClockCorrelationApi, CorrelationRequest};
use crate::ports::outbound::{DomainClassifier, LpSolver};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Clock Correlation Service
///
/// Orchestrates the correlation pipeline:
/// 1. Validate input
/// 2. Build the internode messages map
/// 3. Assemble the constraint model
/// 4. Resolve degenerate topologies
/// 5. Solve within the time budget
/// 6. Extract per-node deltas and confidence counters
///
/// Every invocation builds a disposable model; nothing is shared across
/// calls.
pub struct ClockCorrelationService<S: LpSolver, D: DomainClassifier> {
    solver: S,
    classifier: D,
    config: CorrelationConfig,
}

impl<S: LpSolver, D: DomainClassifier> ClockCorrelationService<S, D> {
    /// Create a new service with default config.
    pub fn new(solver: S, classifier: D) -> Self {
        Self {
            solver,
            classifier,
            config: CorrelationConfig::default(),
        }
    }

    /// Create a new service with custom config.
    pub fn with_config(solver: S, classifier: D, config: CorrelationConfig) -> Self {
        Self {
            solver,
            classifier,
            config,
        }
    }

    /// Validate node and raw message counts before building anything.
    fn validate(&self, request: &CorrelationRequest) -> Result<(), CorrelationError> {
        if request.nodes.is_empty() {
            return Err(CorrelationError::EmptyNodeSet);
        }
        if request.nodes.len() > self.config.max_nodes {
            return Err(CorrelationError::TooManyNodes {
                count: request.nodes.len(),
                max: self.config.max_nodes,
            });
        }

        let raw_messages: usize = request.nodes.iter().map(|n| n.messages.len()).sum();
        if raw_messages > self.config.max_messages {
            return Err(CorrelationError::TooManyMessages {
                count: raw_messages,
                max: self.config.max_messages,
            });
        }

        Ok(())
    }

    fn metrics_of(
        &self,
        map: &InternodeMessagesMap,
        model: &ConstraintModel,
        solve_time_ms: u64,
    ) -> CorrelationMetrics {
        CorrelationMetrics {
            node_count: map.node_count() as u32,
            message_count: map.total_messages() as u32,
            messaging_constraints: model.count_of(ConstraintKind::Messaging) as u32,
            fixed_constraints: model.count_of(ConstraintKind::Fixed) as u32,
            synthetic_constraints: model.count_of(ConstraintKind::SyntheticReverse) as u32,
            pinned_instances: model.count_of(ConstraintKind::IsolatedPin) as u32,
            solve_time_ms,
        }
    }

    /// Read the solved variable values back into per-node solutions.
    fn extract(
        &self,
        map: &InternodeMessagesMap,
        model: &ConstraintModel,
        values: &[f64],
    ) -> Result<HashMap<NodeId, NodeSolution>, CorrelationError> {
        if values.len() != model.variables {
            return Err(CorrelationError::Solver(SolverError::ShapeMismatch {
                expected: model.variables,
                got: values.len(),
            }));
        }

        let mut solutions = HashMap::with_capacity(map.node_count());
        for (index, node) in map.nodes.iter().enumerate() {
            solutions.insert(
                node.id.clone(),
                NodeSolution {
                    time_delta: values[index].round() as Ticks,
                    constraint_count: model.usage[index],
                },
            );
        }
        Ok(solutions)
    }
}

#[async_trait]
impl<S: LpSolver, D: DomainClassifier> ClockCorrelationApi for ClockCorrelationService<S, D> {
    async fn correlate(
        &self,
        request: CorrelationRequest,
    ) -> Result<SolutionResult, CorrelationError> {
        self.validate(&request)?;

        info!(
            node_count = request.nodes.len(),
            fixed_constraints = request.fixed_constraints.len(),
            "correlating node clocks"
        );

        let map = self.build_messages_map(&request.nodes)?;
        let model = self.assemble_model(
            &map,
            &request.fixed_constraints,
            &request.allowed_merge_roles,
        )?;

        debug!(
            variables = model.variables,
            constraints = model.constraints.len(),
            "assembled constraint model"
        );

        let budget = request
            .time_budget
            .unwrap_or_else(|| self.config.solve_budget());

        let started = Instant::now();
        let verdict = self.solver.solve(model.to_linear_model(), budget).await?;
        let solve_time_ms = started.elapsed().as_millis() as u64;
        let metrics = self.metrics_of(&map, &model, solve_time_ms);

        match verdict {
            SolveVerdict::Feasible(values) => {
                let solutions = self.extract(&map, &model, &values)?;
                info!(
                    node_count = solutions.len(),
                    solve_time_ms, "clock correlation solved"
                );
                Ok(SolutionResult::solved(solutions, metrics))
            }
            SolveVerdict::Infeasible => {
                warn!(solve_time_ms, "constraint model is infeasible");
                Ok(SolutionResult::infeasible(metrics))
            }
            SolveVerdict::Timeout => {
                warn!(
                    budget_ms = budget.as_millis() as u64,
                    "solver exhausted its time budget"
                );
                Ok(SolutionResult::timeout(metrics))
            }
        }
    }

    fn build_messages_map(&self, nodes: &[Node]) -> Result<InternodeMessagesMap, CorrelationError> {
        build_messages_map(nodes, &self.classifier)
    }

    fn assemble_model(
        &self,
        map: &InternodeMessagesMap,
        fixed_constraints: &[NodesConstraint],
        allowed_merge_roles: &HashSet<String>,
    ) -> Result<ConstraintModel, CorrelationError> {
        let mut model = build_constraint_model(map, fixed_constraints)?;
        resolve_unidirectional_pairs(map, &mut model);
        pin_isolated_instances(map, allowed_merge_roles, &mut model);
        Ok(model)
    }
}
