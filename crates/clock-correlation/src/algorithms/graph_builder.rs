//! Node Graph Builder
//!
//! Turns raw per-node message lists into the indexed adjacency structure the
//! model builder works on: who sent how many messages to whom, and which
//! deployment domain each node belongs to.

use crate::domain::entities::{InternodeMessage, InternodeMessagesMap, Node};
use crate::domain::errors::CorrelationError;
use crate::domain::value_objects::NodeId;
use crate::ports::outbound::DomainClassifier;
use std::collections::HashMap;
use tracing::debug;

/// Build the indexed message map from the node set.
///
/// Node indices are assigned in first-seen order over the input vector, so
/// the resulting model is deterministic given the caller's ordering. Each
/// message id is counted once even when the same record appears in both
/// endpoints' lists.
///
/// Fails fast (precondition violation, not a solver outcome) on duplicate
/// node ids, self-directed messages, endpoints absent from the node set, and
/// distinct records sharing a message id.
pub fn build_messages_map(
    nodes: &[Node],
    classifier: &dyn DomainClassifier,
) -> Result<InternodeMessagesMap, CorrelationError> {
    let mut node_indexes = HashMap::with_capacity(nodes.len());
    for (index, node) in nodes.iter().enumerate() {
        if node_indexes.insert(node.id.clone(), index).is_some() {
            return Err(CorrelationError::DuplicateNode(node.id.clone()));
        }
    }

    let node_count = nodes.len();
    let mut counts = vec![vec![0usize; node_count]; node_count];
    let node_domains = nodes.iter().map(|n| classifier.classify(&n.id)).collect();

    // id -> index into `messages`, to deduplicate records observed from
    // both endpoints and to reject colliding ids
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut messages: Vec<InternodeMessage> = Vec::new();

    for node in nodes {
        for msg in &node.messages {
            if msg.from.node == msg.to.node {
                return Err(CorrelationError::SelfDirectedMessage(msg.id.clone()));
            }
            if let Some(&first) = seen.get(&msg.id) {
                if messages[first] != *msg {
                    return Err(CorrelationError::DuplicateMessageId(msg.id.clone()));
                }
                // same record, observed from the opposite endpoint
                continue;
            }

            let src = resolve(&node_indexes, msg, &msg.from.node)?;
            let dst = resolve(&node_indexes, msg, &msg.to.node)?;
            counts[src][dst] += 1;

            seen.insert(msg.id.clone(), messages.len());
            messages.push(msg.clone());
        }
    }

    debug!(
        node_count,
        message_count = messages.len(),
        "built internode messages map"
    );

    Ok(InternodeMessagesMap {
        node_indexes,
        nodes: nodes.to_vec(),
        counts,
        node_domains,
        messages,
    })
}

fn resolve(
    node_indexes: &HashMap<NodeId, usize>,
    msg: &InternodeMessage,
    node: &NodeId,
) -> Result<usize, CorrelationError> {
    node_indexes
        .get(node)
        .copied()
        .ok_or_else(|| CorrelationError::UnknownNode {
            message_id: msg.id.clone(),
            node: node.clone(),
        })
}
