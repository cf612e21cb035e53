//! Domain classifier adapters.
//!
//! The engine needs to know which deployment domain (typically: which host)
//! each node belongs to. These adapters cover the two common cases: instance
//! identifiers that already name hosts, and an explicit caller-supplied
//! mapping.

use crate::domain::value_objects::{DomainKey, NodeId};
use crate::ports::outbound::DomainClassifier;
use std::collections::HashMap;

/// Classifier for deployments where the instance identifier is the host
/// identifier: every instance is its own domain.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstanceDomainClassifier;

impl DomainClassifier for InstanceDomainClassifier {
    fn classify(&self, node: &NodeId) -> DomainKey {
        node.instance.clone()
    }
}

/// Classifier backed by an explicit node-to-domain mapping, falling back to
/// the instance identifier for unmapped nodes.
#[derive(Clone, Debug, Default)]
pub struct MapDomainClassifier {
    domains: HashMap<NodeId, DomainKey>,
}

impl MapDomainClassifier {
    pub fn new(domains: HashMap<NodeId, DomainKey>) -> Self {
        Self { domains }
    }
}

impl DomainClassifier for MapDomainClassifier {
    fn classify(&self, node: &NodeId) -> DomainKey {
        self.domains
            .get(node)
            .cloned()
            .unwrap_or_else(|| node.instance.clone())
    }
}
