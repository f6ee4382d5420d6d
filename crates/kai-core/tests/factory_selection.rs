use std::collections::BTreeMap;
use std::sync::Arc;

use kai_core::cluster::{ClusterComponents, Container, Namespace, Node, Pod};
use kai_core::config::{ConfigFile, ScenarioSetting};
use kai_core::errors::KaiError;
use kai_core::rng::RngHandle;
use kai_core::scenario::{ScenarioFactory, ScenarioKind};

fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn sample_cluster() -> Arc<ClusterComponents> {
    Arc::new(ClusterComponents {
        namespaces: vec![Namespace {
            name: "checkout".to_string(),
            pods: vec![Pod {
                name: "cart-0".to_string(),
                labels: labels(&[("app", "cart")]),
                containers: vec![Container {
                    name: "cart".to_string(),
                }],
            }],
        }],
        nodes: vec![Node {
            name: "node-a".to_string(),
            labels: labels(&[("zone", "a")]),
            taints: Vec::new(),
            free_cpu: 4.0,
            free_mem: 8.0e9,
        }],
    })
}

#[test]
fn no_enabled_kind_is_a_missing_scenario_error() {
    let config = ConfigFile::default();
    let cluster = sample_cluster();
    let err = ScenarioFactory::generate_random_scenario(
        &config,
        &cluster,
        &mut RngHandle::from_seed(1),
    )
    .expect_err("nothing enabled");
    assert!(matches!(err, KaiError::MissingScenario(_)));
}

#[test]
fn listing_preserves_declaration_order() {
    let mut config = ConfigFile::default();
    config.scenario.time_scenarios = ScenarioSetting::enabled();
    config.scenario.pod_scenarios = ScenarioSetting::enabled();
    config.scenario.node_cpu_hog = ScenarioSetting::enabled();

    let kinds = ScenarioFactory::list_scenarios(&config);
    assert_eq!(
        kinds,
        vec![
            ScenarioKind::Pod,
            ScenarioKind::NodeCpuHog,
            ScenarioKind::Time
        ]
    );
}

#[test]
fn generation_never_selects_a_disabled_kind() {
    let mut config = ConfigFile::default();
    config.scenario.container_scenarios = ScenarioSetting::enabled();
    config.scenario.node_memory_hog = ScenarioSetting::enabled();
    let cluster = sample_cluster();

    let mut rng = RngHandle::from_seed(1234);
    for _ in 0..64 {
        let scenario =
            ScenarioFactory::generate_random_scenario(&config, &cluster, &mut rng)
                .expect("enabled kinds construct");
        assert!(matches!(
            scenario.kind(),
            ScenarioKind::Container | ScenarioKind::NodeMemoryHog
        ));
    }
}

#[test]
fn construction_failures_wrap_the_cause() {
    let mut config = ConfigFile::default();
    config.scenario.container_scenarios = ScenarioSetting::enabled();
    // A pod without labels makes the label draw undefined.
    let cluster = Arc::new(ClusterComponents {
        namespaces: vec![Namespace {
            name: "bare".to_string(),
            pods: vec![Pod {
                name: "opaque-0".to_string(),
                labels: BTreeMap::new(),
                containers: vec![Container {
                    name: "main".to_string(),
                }],
            }],
        }],
        nodes: Vec::new(),
    });

    let err = ScenarioFactory::generate_random_scenario(
        &config,
        &cluster,
        &mut RngHandle::from_seed(8),
    )
    .expect_err("label draw over an empty set fails");
    match err {
        KaiError::Scenario(info) => {
            assert_eq!(info.code, "scenario-init");
            assert!(info.hint.expect("cause retained").contains("empty-label-set"));
        }
        other => panic!("unexpected error family: {other}"),
    }
}

#[test]
fn dummy_scenario_carries_canned_parameters() {
    let dummy = ScenarioFactory::create_dummy_scenario();
    assert_eq!(dummy.kind(), ScenarioKind::Dummy);
    assert_eq!(dummy.name(), "dummy-scenario");

    let params = dummy.parameters();
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].name, "END");
    assert_eq!(params[0].render_value(), "10");
    assert_eq!(params[1].name, "EXIT_STATUS");
    assert_eq!(params[1].render_value(), "0");
}
