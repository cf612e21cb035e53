//! Domain invariants for Clock Correlation
//!
//! Checker functions for the properties a solved correlation must satisfy.
//! Used by unit and integration tests.

use super::entities::{InternodeMessage, NodesConstraint};
use super::value_objects::{NodeId, SolutionResult};

/// Every message's corrected receive instant is strictly later than its
/// corrected send instant: `fromTs + delta(from) < toTs + delta(to)`.
pub fn invariant_causality(messages: &[InternodeMessage], result: &SolutionResult) -> bool {
    messages.iter().all(|msg| {
        match (
            result.delta_of(&msg.from.node),
            result.delta_of(&msg.to.node),
        ) {
            (Some(from_delta), Some(to_delta)) => {
                msg.from.timestamp + from_delta < msg.to.timestamp + to_delta
            }
            _ => false,
        }
    })
}

/// Every caller-asserted constraint holds exactly:
/// `delta(node2) - delta(node1) == value`.
pub fn invariant_fixed_exactness(constraints: &[NodesConstraint], result: &SolutionResult) -> bool {
    constraints.iter().all(|c| {
        match (result.delta_of(&c.node1), result.delta_of(&c.node2)) {
            (Some(d1), Some(d2)) => d2 - d1 == c.value,
            _ => false,
        }
    })
}

/// All deltas are non-negative (the model's anchoring lower bound).
pub fn invariant_nonnegative(result: &SolutionResult) -> bool {
    result.solutions.values().all(|s| s.time_delta >= 0)
}

/// Two nodes received the same delta (used for isolated-instance pinning).
pub fn invariant_pinned(result: &SolutionResult, isolated: &NodeId, anchor: &NodeId) -> bool {
    match (result.delta_of(isolated), result.delta_of(anchor)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
