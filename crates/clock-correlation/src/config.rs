//! Configuration for the Clock Correlation Subsystem

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default wall-clock budget for one solve attempt (ms).
pub const DEFAULT_SOLVE_BUDGET_MS: u64 = 10_000;

/// Correlation configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// Wall-clock budget for the solve step (ms)
    pub solve_budget_ms: u64,
    /// Maximum nodes in one correlation (anti-DoS)
    pub max_nodes: usize,
    /// Maximum raw message records in one correlation (anti-DoS)
    pub max_messages: usize,
}

impl CorrelationConfig {
    pub fn solve_budget(&self) -> Duration {
        Duration::from_millis(self.solve_budget_ms)
    }
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            solve_budget_ms: DEFAULT_SOLVE_BUDGET_MS,
            max_nodes: 1_000,
            max_messages: 100_000,
        }
    }
}
