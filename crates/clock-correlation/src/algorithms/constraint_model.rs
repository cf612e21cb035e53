//! Constraint Model Builder
//!
//! Turns the message map plus externally-known fixed offsets into decision
//! variables, causal inequality constraints, equality constraints, and a
//! joint minimization objective.

use crate::domain::entities::{ConstraintModel, InternodeMessagesMap, NodesConstraint};
use crate::domain::errors::CorrelationError;
use crate::domain::value_objects::LinearConstraint;

/// Assemble the base constraint model: one non-negative variable per node,
/// one causal inequality per message, one equality per fixed constraint.
///
/// For a message A -> B the receive instant must land strictly after the
/// send instant once corrected, so `delta(B) - delta(A) >= (fromTs - toTs) + 1`
/// (the +1 tick rules out zero-latency delivery under integer arithmetic).
/// Messaging and fixed constraints both count as evidence for the nodes they
/// reference; the counters feed `NodeSolution::constraint_count`.
pub fn build_constraint_model(
    map: &InternodeMessagesMap,
    fixed: &[NodesConstraint],
) -> Result<ConstraintModel, CorrelationError> {
    let mut model = ConstraintModel::new(map.node_count());

    for msg in &map.messages {
        let src = map
            .index_of(&msg.from.node)
            .ok_or_else(|| CorrelationError::UnknownNode {
                message_id: msg.id.clone(),
                node: msg.from.node.clone(),
            })?;
        let dst = map
            .index_of(&msg.to.node)
            .ok_or_else(|| CorrelationError::UnknownNode {
                message_id: msg.id.clone(),
                node: msg.to.node.clone(),
            })?;

        let value = msg.from.timestamp - msg.to.timestamp + 1;
        model.push_counted(LinearConstraint::messaging(dst, src, value));
    }

    for constraint in fixed {
        let n1 = map
            .index_of(&constraint.node1)
            .ok_or_else(|| CorrelationError::UnknownConstraintNode(constraint.node1.clone()))?;
        let n2 = map
            .index_of(&constraint.node2)
            .ok_or_else(|| CorrelationError::UnknownConstraintNode(constraint.node2.clone()))?;

        // delta(node2) - delta(node1) == value
        model.push_counted(LinearConstraint::fixed(n2, n1, constraint.value));
    }

    Ok(model)
}
