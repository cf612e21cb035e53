//! Outbound Ports (Driven Ports / SPI)

use crate::domain::errors::SolverError;
use crate::domain::value_objects::{DomainKey, LinearModel, NodeId, SolveVerdict};
use async_trait::async_trait;
use std::time::Duration;

/// External linear-program solving capability.
///
/// Given variables (each lower-bounded at zero), linear equality/inequality
/// constraints, joint minimization objectives, and a wall-clock budget, the
/// solver returns exactly one of: a feasible assignment, a proof of
/// infeasibility, or a budget-exceeded signal. A budget overrun must surface
/// as `SolveVerdict::Timeout`, never as `Infeasible`; the two require
/// different caller handling.
#[async_trait]
pub trait LpSolver: Send + Sync {
    async fn solve(
        &self,
        model: LinearModel,
        budget: Duration,
    ) -> Result<SolveVerdict, SolverError>;
}

/// External knowledge of deployment/physical grouping.
///
/// Classifies each node into the domain used by isolated-instance handling
/// (e.g. which host the instance runs on).
pub trait DomainClassifier: Send + Sync {
    fn classify(&self, node: &NodeId) -> DomainKey;
}
