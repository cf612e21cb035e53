//! LP solver adapter backed by `good_lp` (microlp backend).
//!
//! The engine only needs the narrow `LpSolver` contract; the algorithm
//! itself is delegated to the library. The solve runs on a blocking worker
//! under a `tokio` timeout: when the budget elapses first, the verdict is
//! `Timeout` and the worker's eventual result is discarded (cooperative
//! cancellation, the worker is not forcibly killed).

use crate::domain::errors::SolverError;
use crate::domain::value_objects::{ConstraintOp, LinearModel, SolveVerdict};
use crate::ports::outbound::LpSolver;
use async_trait::async_trait;
use good_lp::{
    constraint, default_solver, variable, variables, Expression, ResolutionError, Solution,
    SolverModel, Variable,
};
use std::time::Duration;
use tracing::debug;

/// `good_lp`-backed implementation of the `LpSolver` port.
#[derive(Clone, Copy, Debug, Default)]
pub struct GoodLpSolver;

impl GoodLpSolver {
    pub fn new() -> Self {
        Self
    }
}

fn solve_blocking(model: &LinearModel) -> Result<SolveVerdict, SolverError> {
    let mut problem_vars = variables!();
    let vars: Vec<Variable> = (0..model.variables)
        .map(|_| problem_vars.add(variable().min(0.0)))
        .collect();

    // Joint minimization: the sum of the objective variables. With the zero
    // lower bounds this lands on the component-wise minimal feasible vector.
    let objective = model
        .objectives
        .iter()
        .fold(Expression::default(), |acc, &i| acc + vars[i]);

    let mut problem = problem_vars.minimise(objective).using(default_solver);
    for c in &model.constraints {
        let difference = vars[c.plus] - vars[c.minus];
        problem = match c.op {
            ConstraintOp::Geq => problem.with(constraint!(difference >= c.value as f64)),
            ConstraintOp::Eq => problem.with(constraint!(difference == c.value as f64)),
        };
    }

    match problem.solve() {
        Ok(solution) => {
            let values = vars.iter().map(|v| solution.value(*v)).collect();
            Ok(SolveVerdict::Feasible(values))
        }
        Err(ResolutionError::Infeasible) => Ok(SolveVerdict::Infeasible),
        Err(ResolutionError::Unbounded) => Err(SolverError::Unbounded),
        Err(other) => Err(SolverError::Backend(other.to_string())),
    }
}

#[async_trait]
impl LpSolver for GoodLpSolver {
    async fn solve(
        &self,
        model: LinearModel,
        budget: Duration,
    ) -> Result<SolveVerdict, SolverError> {
        debug!(
            variables = model.variables,
            constraints = model.constraints.len(),
            budget_ms = budget.as_millis() as u64,
            "dispatching model to LP backend"
        );

        let worker = tokio::task::spawn_blocking(move || solve_blocking(&model));
        match tokio::time::timeout(budget, worker).await {
            Ok(Ok(verdict)) => verdict,
            Ok(Err(join_error)) => Err(SolverError::Worker(join_error.to_string())),
            Err(_elapsed) => Ok(SolveVerdict::Timeout),
        }
    }
}
