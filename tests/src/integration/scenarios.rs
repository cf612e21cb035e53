//! Acceptance scenarios for clock correlation, end to end against the real
//! `good_lp` solver.

#[cfg(test)]
mod tests {
    use clock_correlation::domain::invariants::{
        invariant_causality, invariant_fixed_exactness, invariant_nonnegative, invariant_pinned,
    };
    use clock_correlation::{
        ClockCorrelationApi, ClockCorrelationService, CorrelationRequest, GoodLpSolver,
        InstanceDomainClassifier, InternodeMessage, MapDomainClassifier, MessageEndpoint, Node,
        NodeId, NodesConstraint, SolutionStatus, Ticks,
    };
    use std::collections::{HashMap, HashSet};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn node_id(role: &str, instance: &str) -> NodeId {
        NodeId::new(role, instance)
    }

    fn msg(id: &str, from: NodeId, from_ts: Ticks, to: NodeId, to_ts: Ticks) -> InternodeMessage {
        InternodeMessage::new(
            id,
            MessageEndpoint::new(from, from_ts),
            MessageEndpoint::new(to, to_ts),
        )
    }

    fn service() -> ClockCorrelationService<GoodLpSolver, InstanceDomainClassifier> {
        ClockCorrelationService::new(GoodLpSolver::new(), InstanceDomainClassifier)
    }

    fn roles(names: &[&str]) -> HashSet<String> {
        names.iter().map(|r| r.to_string()).collect()
    }

    // =============================================================================
    // ACCEPTANCE SCENARIOS
    // =============================================================================

    /// One message A -> B whose receiver clock reads far behind the sender:
    /// B's delta absorbs the whole gap plus one tick, A anchors at zero.
    #[tokio::test]
    async fn test_receiver_clock_far_behind() {
        let a = node_id("A", "1");
        let b = node_id("B", "1");
        let messages = vec![msg("m1", a.clone(), 100, b.clone(), 40)];
        let request = CorrelationRequest::new(vec![
            Node::new(a.clone()).with_messages(messages.clone()),
            Node::new(b.clone()),
        ]);

        let result = service().correlate(request).await.unwrap();

        assert_eq!(result.status, SolutionStatus::Solved);
        assert_eq!(result.delta_of(&a), Some(0));
        assert_eq!(result.delta_of(&b), Some(61));
        assert!(invariant_causality(&messages, &result));
        assert!(invariant_nonnegative(&result));
    }

    /// Three nodes: a fixed offset between A and B, and one-way traffic from
    /// C to A. The one-way pair gets a synthetic reverse bound, which fixes
    /// C's delta exactly; the fixed constraint carries A's delta over to B.
    #[tokio::test]
    async fn test_fixed_offset_with_one_way_traffic() {
        let a = node_id("A", "1");
        let b = node_id("B", "1");
        let c = node_id("C", "1");
        let messages = vec![msg("m1", c.clone(), 5, a.clone(), 50)];
        let fixed = vec![NodesConstraint::new(a.clone(), b.clone(), 10)];
        let request = CorrelationRequest::new(vec![
            Node::new(a.clone()),
            Node::new(b.clone()),
            Node::new(c.clone()).with_messages(messages.clone()),
        ])
        .with_fixed_constraints(fixed.clone());

        let result = service().correlate(request).await.unwrap();

        assert_eq!(result.status, SolutionStatus::Solved);
        assert_eq!(result.delta_of(&a), Some(0));
        assert_eq!(result.delta_of(&b), Some(10));
        assert_eq!(result.delta_of(&c), Some(44));
        assert!(invariant_causality(&messages, &result));
        assert!(invariant_fixed_exactness(&fixed, &result));

        // Evidence counters: only messaging and fixed constraints count
        assert_eq!(result.solutions[&a].constraint_count, 2);
        assert_eq!(result.solutions[&b].constraint_count, 1);
        assert_eq!(result.solutions[&c].constraint_count, 1);
        assert_eq!(result.metrics.synthetic_constraints, 1);
    }

    /// A pair exchanging only responseless messages gets no synthetic
    /// reverse bound; the model stays feasible with the receiver bounded
    /// from the forward direction only.
    #[tokio::test]
    async fn test_responseless_only_pair_stays_feasible() {
        let a = node_id("A", "1");
        let b = node_id("B", "1");
        let messages =
            vec![msg("m1", a.clone(), 100, b.clone(), 40).with_responseless(true)];
        let request = CorrelationRequest::new(vec![
            Node::new(a.clone()).with_messages(messages.clone()),
            Node::new(b.clone()),
        ]);

        let result = service().correlate(request).await.unwrap();

        assert_eq!(result.status, SolutionStatus::Solved);
        assert_eq!(result.metrics.synthetic_constraints, 0);
        assert_eq!(result.delta_of(&a), Some(0));
        assert_eq!(result.delta_of(&b), Some(61));
        assert!(invariant_causality(&messages, &result));
    }

    /// A request/response exchange bounds the offset from both sides.
    #[tokio::test]
    async fn test_round_trip_bounds_offset_both_ways() {
        let a = node_id("A", "1");
        let b = node_id("B", "1");
        // request takes 10 ticks, response 10 ticks, B's clock 500 behind
        let messages = vec![
            msg("req", a.clone(), 1000, b.clone(), 510),
            msg("rsp", b.clone(), 520, a.clone(), 1030),
        ];
        let request = CorrelationRequest::new(vec![
            Node::new(a.clone()).with_messages(messages.clone()),
            Node::new(b.clone()),
        ]);

        let result = service().correlate(request).await.unwrap();

        assert_eq!(result.status, SolutionStatus::Solved);
        assert_eq!(result.metrics.synthetic_constraints, 0);
        assert!(invariant_causality(&messages, &result));
        // delta(B) - delta(A) is boxed into [491, 509] by the round trip
        let gap = result.delta_of(&b).unwrap() - result.delta_of(&a).unwrap();
        assert!((491..=509).contains(&gap), "gap {gap} outside round trip");
    }

    // =============================================================================
    // FAILURE MODES
    // =============================================================================

    /// Two conflicting fixed constraints on the same pair are mathematically
    /// contradictory: Infeasible, no per-node data.
    #[tokio::test]
    async fn test_conflicting_fixed_constraints_infeasible() {
        let a = node_id("A", "1");
        let b = node_id("B", "1");
        let request = CorrelationRequest::new(vec![Node::new(a.clone()), Node::new(b.clone())])
            .with_fixed_constraints(vec![
                NodesConstraint::new(a.clone(), b.clone(), 10),
                NodesConstraint::new(a, b, 20),
            ]);

        let result = service().correlate(request).await.unwrap();

        assert_eq!(result.status, SolutionStatus::Infeasible);
        assert!(result.solutions.is_empty());
    }

    /// Causal data corrupted beyond repair: bidirectional traffic whose
    /// apparent latencies cannot both be positive.
    #[tokio::test]
    async fn test_contradictory_causal_data_infeasible() {
        let a = node_id("A", "1");
        let b = node_id("B", "1");
        // A -> B needs delta(B) - delta(A) >= 101; B -> A needs the reverse
        // gap >= 101 too. No assignment satisfies both.
        let messages = vec![
            msg("m1", a.clone(), 100, b.clone(), 0),
            msg("m2", b.clone(), 100, a.clone(), 0),
        ];
        let request = CorrelationRequest::new(vec![
            Node::new(a).with_messages(messages),
            Node::new(b),
        ]);

        let result = service().correlate(request).await.unwrap();

        assert_eq!(result.status, SolutionStatus::Infeasible);
    }

    // =============================================================================
    // DETERMINISM
    // =============================================================================

    /// Solving the same input twice yields identical per-node deltas.
    #[tokio::test]
    async fn test_deterministic_result() {
        let a = node_id("Web", "w1");
        let b = node_id("Db", "d1");
        let c = node_id("Cache", "c1");
        let messages = vec![
            msg("m1", a.clone(), 100, b.clone(), 700),
            msg("m2", b.clone(), 710, a.clone(), 130),
            msg("m3", a.clone(), 200, c.clone(), 90),
            msg("m4", c.clone(), 95, a.clone(), 230),
        ];
        let build = || {
            CorrelationRequest::new(vec![
                Node::new(a.clone()).with_messages(messages.clone()),
                Node::new(b.clone()),
                Node::new(c.clone()),
            ])
        };

        let first = service().correlate(build()).await.unwrap();
        let second = service().correlate(build()).await.unwrap();

        assert_eq!(first.status, SolutionStatus::Solved);
        assert_eq!(first.status, second.status);
        assert_eq!(first.solutions, second.solutions);
    }

    // =============================================================================
    // ISOLATED-INSTANCE PINNING
    // =============================================================================

    fn backend_cluster() -> (Vec<Node>, MapDomainClassifier, NodeId, NodeId, NodeId) {
        let b1 = node_id("Backend", "b1");
        let b2 = node_id("Backend", "b2");
        let b3 = node_id("Backend", "b3");
        let domains: HashMap<NodeId, String> = [
            (b1.clone(), "host-1".to_string()),
            (b2.clone(), "host-1".to_string()),
            (b3.clone(), "host-2".to_string()),
        ]
        .into_iter()
        .collect();

        // Cross-validated traffic inside the anchor domain forces the
        // anchor representative b1 off zero; b3 has no traffic at all.
        let nodes = vec![
            Node::new(b1.clone()).with_messages(vec![
                msg("m1", b2.clone(), 1000, b1.clone(), 200),
                msg("m2", b1.clone(), 210, b2.clone(), 1020),
            ]),
            Node::new(b2.clone()),
            Node::new(b3.clone()),
        ];

        (nodes, MapDomainClassifier::new(domains), b1, b2, b3)
    }

    /// An isolated single-instance domain of an eligible role is pinned to
    /// the anchor domain's representative.
    #[tokio::test]
    async fn test_isolated_instance_pinned_to_anchor() {
        let (nodes, classifier, b1, _b2, b3) = backend_cluster();
        let service = ClockCorrelationService::new(GoodLpSolver::new(), classifier);
        let request =
            CorrelationRequest::new(nodes).with_allowed_merge_roles(roles(&["Backend"]));

        let result = service.correlate(request).await.unwrap();

        assert_eq!(result.status, SolutionStatus::Solved);
        assert_eq!(result.metrics.pinned_instances, 1);
        // the round trip forces the anchor off zero; the pin drags b3 along
        assert_eq!(result.delta_of(&b1), Some(801));
        assert_eq!(result.delta_of(&b3), Some(801));
        assert!(invariant_pinned(&result, &b3, &b1));
        // the isolated instance still carries no messaging/fixed evidence
        assert_eq!(result.solutions[&b3].constraint_count, 0);
    }

    /// Without the role in the merge allowlist the isolated instance is left
    /// mathematically free and settles at the lower bound.
    #[tokio::test]
    async fn test_unlisted_role_not_pinned() {
        let (nodes, classifier, b1, _b2, b3) = backend_cluster();
        let service = ClockCorrelationService::new(GoodLpSolver::new(), classifier);
        let request = CorrelationRequest::new(nodes);

        let result = service.correlate(request).await.unwrap();

        assert_eq!(result.status, SolutionStatus::Solved);
        assert_eq!(result.metrics.pinned_instances, 0);
        // without the pin the isolated instance stays at the lower bound
        assert_eq!(result.delta_of(&b1), Some(801));
        assert_eq!(result.delta_of(&b3), Some(0));
        assert_eq!(result.solutions[&b3].constraint_count, 0);
    }

    // =============================================================================
    // MIXED TOPOLOGY
    // =============================================================================

    /// A four-node chain with round trips on every hop plus one fixed
    /// constraint: all invariants hold on the solved result.
    #[tokio::test]
    async fn test_chain_topology_invariants() {
        let ids: Vec<NodeId> = (0..4)
            .map(|i| node_id("Svc", &format!("s{i}")))
            .collect();

        // each node i runs (i * 1_000) ticks behind node 0
        let offset = |i: usize| (i as Ticks) * 1_000;
        let mut messages = Vec::new();
        for i in 0..3 {
            let (from, to) = (ids[i].clone(), ids[i + 1].clone());
            let base = 10_000 + (i as Ticks) * 500;
            messages.push(msg(
                &format!("req-{i}"),
                from.clone(),
                base - offset(i),
                to.clone(),
                base + 20 - offset(i + 1),
            ));
            messages.push(msg(
                &format!("rsp-{i}"),
                to,
                base + 30 - offset(i + 1),
                from,
                base + 50 - offset(i),
            ));
        }
        let fixed = vec![NodesConstraint::new(ids[0].clone(), ids[3].clone(), 3_000)];

        let mut nodes: Vec<Node> = ids.iter().map(|id| Node::new(id.clone())).collect();
        nodes[0] = nodes[0].clone().with_messages(messages.clone());

        let request =
            CorrelationRequest::new(nodes).with_fixed_constraints(fixed.clone());
        let result = service().correlate(request).await.unwrap();

        assert_eq!(result.status, SolutionStatus::Solved);
        assert!(invariant_causality(&messages, &result));
        assert!(invariant_fixed_exactness(&fixed, &result));
        assert!(invariant_nonnegative(&result));
        assert_eq!(result.metrics.messaging_constraints, 6);
        assert_eq!(result.metrics.fixed_constraints, 1);
    }
}
