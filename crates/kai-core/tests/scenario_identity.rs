use std::collections::BTreeMap;
use std::collections::HashSet;
use std::sync::Arc;

use kai_core::cluster::{ClusterComponents, Container, Namespace, Node, Pod};
use kai_core::rng::RngHandle;
use kai_core::scenario::{
    CompositeDependency, CompositeScenario, Scenario, ScenarioKind, ScenarioNode,
};

fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn sample_cluster() -> Arc<ClusterComponents> {
    Arc::new(ClusterComponents {
        namespaces: vec![Namespace {
            name: "payments".to_string(),
            pods: vec![
                Pod {
                    name: "api-0".to_string(),
                    labels: labels(&[("app", "payments"), ("tier", "web")]),
                    containers: vec![
                        Container {
                            name: "server".to_string(),
                        },
                        Container {
                            name: "sidecar".to_string(),
                        },
                    ],
                },
                Pod {
                    name: "worker-0".to_string(),
                    labels: labels(&[("app", "worker")]),
                    containers: vec![Container {
                        name: "worker".to_string(),
                    }],
                },
            ],
        }],
        nodes: vec![
            Node {
                name: "node-a".to_string(),
                labels: labels(&[("zone", "a"), ("role", "worker")]),
                taints: vec!["dedicated=infra:NoSchedule".to_string()],
                free_cpu: 4.0,
                free_mem: 8.0e9,
            },
            Node {
                name: "node-b".to_string(),
                labels: labels(&[("zone", "b"), ("role", "worker")]),
                taints: Vec::new(),
                free_cpu: 2.0,
                free_mem: 4.0e9,
            },
        ],
    })
}

#[test]
fn equal_seeds_build_structurally_equal_scenarios() {
    let cluster = sample_cluster();
    let a = Scenario::build(
        ScenarioKind::Container,
        Arc::clone(&cluster),
        &mut RngHandle::from_seed(11),
    )
    .expect("construction succeeds");
    let b = Scenario::build(
        ScenarioKind::Container,
        Arc::clone(&cluster),
        &mut RngHandle::from_seed(11),
    )
    .expect("construction succeeds");

    assert_eq!(a, b);
    assert_eq!(a.content_digest(), b.content_digest());

    let mut seen = HashSet::new();
    seen.insert(a);
    assert!(seen.contains(&b), "structural identity keys the dedup set");
}

#[test]
fn identity_covers_name_and_ordered_values() {
    let cluster = sample_cluster();
    let container = Scenario::build(
        ScenarioKind::Container,
        Arc::clone(&cluster),
        &mut RngHandle::from_seed(3),
    )
    .expect("construction succeeds");
    let hog = Scenario::build(
        ScenarioKind::NodeMemoryHog,
        Arc::clone(&cluster),
        &mut RngHandle::from_seed(3),
    )
    .expect("construction succeeds");

    assert_ne!(container, hog, "different kinds never compare equal");
    let rendered = format!("{container}");
    assert!(rendered.starts_with("container-scenarios("));
}

#[test]
fn composite_identity_follows_child_hashes() {
    let cluster = sample_cluster();
    let x = Scenario::build(
        ScenarioKind::ApplicationOutage,
        Arc::clone(&cluster),
        &mut RngHandle::from_seed(21),
    )
    .expect("construction succeeds");
    let y = Scenario::build(
        ScenarioKind::NodeCpuHog,
        Arc::clone(&cluster),
        &mut RngHandle::from_seed(22),
    )
    .expect("construction succeeds");

    let left = CompositeScenario::new(
        ScenarioNode::Atomic(x.clone()),
        ScenarioNode::Atomic(y.clone()),
        CompositeDependency::AOnB,
    );
    // Same children under a different regime: equality tracks the children.
    let right = CompositeScenario::new(
        ScenarioNode::Atomic(x),
        ScenarioNode::Atomic(y),
        CompositeDependency::None,
    );
    assert_eq!(left, right);
}

#[test]
fn cluster_snapshot_never_serializes() {
    let cluster = sample_cluster();
    let scenario = Scenario::build(
        ScenarioKind::NodeMemoryHog,
        cluster,
        &mut RngHandle::from_seed(9),
    )
    .expect("construction succeeds");

    let json = serde_json::to_value(&scenario).expect("scenario serializes");
    assert!(json.get("cluster").is_none());
    assert!(json.get("params").is_some());
}
