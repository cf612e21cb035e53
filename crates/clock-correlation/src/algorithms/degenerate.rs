//! Degenerate-Case Resolver
//!
//! Two classes of topology leave the base model under- or mis-constrained:
//! node pairs whose traffic was only ever observed in one direction, and
//! role instances sitting alone in a deployment domain. Both get synthetic
//! constraints so the model stays well-posed.

use crate::domain::entities::{ConstraintModel, InternodeMessagesMap};
use crate::domain::value_objects::LinearConstraint;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Inject a reverse bound for every node pair with one-way traffic.
///
/// With messages flowing only source -> target, nothing bounds
/// `delta(source) - delta(target)` from below, which can turn the whole
/// model infeasible once combined with constraints elsewhere in the graph.
/// Among the non-responseless messages of the pair, the one with the
/// smallest `fromTs - toTs` (the fastest, least steep exchange) serves as a
/// proxy for a near-zero-latency path; its implied reply is treated as
/// effectively instantaneous:
/// `delta(source) - delta(target) >= (toTs - fromTs) - 1`.
///
/// A pair whose messages are all responseless gets no synthetic constraint
/// and simply stays looser than pairs with bidirectional evidence.
pub fn resolve_unidirectional_pairs(map: &InternodeMessagesMap, model: &mut ConstraintModel) {
    let node_count = map.node_count();
    for i in 0..node_count {
        for j in (i + 1)..node_count {
            let (source, target) = match (map.has_traffic(i, j), map.has_traffic(j, i)) {
                (true, false) => (i, j),
                (false, true) => (j, i),
                _ => continue,
            };

            let least_steep = map
                .messages
                .iter()
                .filter(|m| !m.responseless)
                .filter(|m| {
                    map.index_of(&m.from.node) == Some(source)
                        && map.index_of(&m.to.node) == Some(target)
                })
                .min_by_key(|m| m.from.timestamp - m.to.timestamp);

            match least_steep {
                Some(m) => {
                    let value = m.to.timestamp - m.from.timestamp - 1;
                    model.push(LinearConstraint::synthetic_reverse(source, target, value));
                }
                None => {
                    debug!(
                        source = %map.node_id(source),
                        target = %map.node_id(target),
                        "unidirectional pair has only responseless traffic, left unbounded"
                    );
                }
            }
        }
    }
}

/// Pin isolated single-instance domains of a role to its anchor domain.
///
/// An isolated instance has no co-located traffic to cross-validate its own
/// clock; its delta would otherwise settle on an arbitrary feasible value.
/// For each eligible role (spanning at least two domains, with exactly one
/// domain holding more than one instance, and listed in
/// `allowed_merge_roles`), every single-instance domain is pinned to the
/// anchor domain's representative with an equality. A domain is pinned at
/// most once even when several eligible roles co-occur in it.
pub fn pin_isolated_instances(
    map: &InternodeMessagesMap,
    allowed_merge_roles: &HashSet<String>,
    model: &mut ConstraintModel,
) {
    // role -> domain -> node indexes; BTreeMap keeps the scan deterministic
    let mut roles: BTreeMap<&str, BTreeMap<&str, Vec<usize>>> = BTreeMap::new();
    for (index, node) in map.nodes.iter().enumerate() {
        roles
            .entry(node.id.role.as_str())
            .or_default()
            .entry(map.node_domains[index].as_str())
            .or_default()
            .push(index);
    }

    let mut handled_domains: HashSet<&str> = HashSet::new();

    for (role, domains) in &roles {
        if domains.len() < 2 {
            continue;
        }
        if !allowed_merge_roles.contains(*role) {
            continue;
        }

        let multi_instance: Vec<&str> = domains
            .iter()
            .filter(|(_, indexes)| indexes.len() > 1)
            .map(|(domain, _)| *domain)
            .collect();
        if multi_instance.len() != 1 {
            continue;
        }
        let anchor_domain = multi_instance[0];
        let Some(anchor) = domains.get(anchor_domain).and_then(|idx| idx.first()) else {
            continue;
        };

        for (domain, indexes) in domains {
            if *domain == anchor_domain || indexes.len() != 1 {
                continue;
            }
            if !handled_domains.insert(*domain) {
                continue;
            }

            debug!(
                role,
                domain,
                isolated = %map.node_id(indexes[0]),
                anchor = %map.node_id(*anchor),
                "pinning isolated role instance to anchor domain"
            );
            model.push(LinearConstraint::isolated_pin(indexes[0], *anchor));
        }
    }
}
