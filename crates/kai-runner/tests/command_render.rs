use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use kai_core::cluster::{ClusterComponents, Node};
use kai_core::rng::RngHandle;
use kai_core::scenario::{Scenario, ScenarioKind};
use kai_runner::{ctl_command, ctl_flag_name, graph_run_command, hub_command, quote};

const REGISTRY: &str = "containers.krkn-chaos.dev/krkn-chaos/krkn-hub";

fn sample_cluster() -> Arc<ClusterComponents> {
    let mut labels = BTreeMap::new();
    labels.insert("zone".to_string(), "a".to_string());
    Arc::new(ClusterComponents {
        namespaces: Vec::new(),
        nodes: vec![Node {
            name: "node-a".to_string(),
            labels,
            taints: Vec::new(),
            free_cpu: 4.0,
            free_mem: 8.0e9,
        }],
    })
}

fn memory_hog() -> Scenario {
    Scenario::build(
        ScenarioKind::NodeMemoryHog,
        sample_cluster(),
        &mut RngHandle::from_seed(23),
    )
    .expect("construction succeeds")
}

/// Extracts `NAME=value` pairs following `-e` flags.
fn env_pairs(argv: &[String]) -> BTreeMap<String, String> {
    let mut pairs = BTreeMap::new();
    let mut iter = argv.iter();
    while let Some(arg) = iter.next() {
        if arg == "-e" {
            let entry = iter.next().expect("-e takes a value");
            let (name, value) = entry.split_once('=').expect("env entries are NAME=value");
            pairs.insert(name.to_string(), value.to_string());
        }
    }
    pairs
}

/// Extracts `--flag value` pairs after the fixed prefix.
fn flag_pairs(argv: &[String]) -> BTreeMap<String, String> {
    let mut pairs = BTreeMap::new();
    let mut iter = argv.iter();
    while let Some(arg) = iter.next() {
        if let Some(flag) = arg.strip_prefix("--") {
            if let Some(value) = iter.next() {
                pairs.insert(flag.to_string(), value.clone());
            }
        }
    }
    pairs
}

#[test]
fn hub_command_round_trips_parameter_values() {
    let scenario = memory_hog();
    let argv = hub_command(&scenario, Path::new("/tmp/kubeconfig"), REGISTRY);

    assert_eq!(argv[0], "podman");
    assert_eq!(argv.last().map(String::as_str), Some(
        "containers.krkn-chaos.dev/krkn-chaos/krkn-hub:node-memory-hog"
    ));
    assert!(argv.contains(&"--net=host".to_string()));
    assert!(argv.contains(&"/tmp/kubeconfig:/home/krkn/.kube/config:Z".to_string()));

    let env = env_pairs(&argv);
    for param in scenario.parameters() {
        // The hub backend keys env by the default name, never the alias.
        assert_eq!(
            env.get(&param.name).map(String::as_str),
            Some(param.render_value().as_str()),
            "hub env must recover parameter {}",
            param.name
        );
    }
}

#[test]
fn ctl_command_round_trips_parameter_values() {
    let scenario = memory_hog();
    let argv = ctl_command(&scenario, Path::new("/tmp/kubeconfig"));

    assert_eq!(&argv[..3], &["krknctl", "run", "node-memory-hog"]);
    let flags = flag_pairs(&argv);
    assert_eq!(flags.get("kubeconfig").map(String::as_str), Some("/tmp/kubeconfig"));
    for param in scenario.parameters() {
        let flag = ctl_flag_name(param);
        assert_eq!(
            flags.get(&flag).map(String::as_str),
            Some(param.render_value().as_str()),
            "ctl flags must recover parameter {}",
            param.name
        );
    }
}

#[test]
fn ctl_flags_prefer_aliases_and_hyphenate_names() {
    let scenario = memory_hog();
    let flags: Vec<String> = scenario.parameters().iter().map(ctl_flag_name).collect();
    // Aliased parameters use the alias; the rest hyphenate the default name.
    assert!(flags.contains(&"chaos-duration".to_string()));
    assert!(flags.contains(&"memory-consumption".to_string()));
    assert!(flags.contains(&"memory-workers".to_string()));
    assert!(flags.contains(&"node-selector".to_string()));
    assert!(flags.contains(&"number-of-nodes".to_string()));
    assert!(!flags.iter().any(|f| f.contains('_')));
    assert!(!flags.iter().any(|f| f.chars().any(|c| c.is_ascii_uppercase())));
}

#[test]
fn graph_run_command_references_the_graph_file() {
    let argv = graph_run_command(
        Path::new("/out/graphs/scenario-1.json"),
        Path::new("/tmp/kubeconfig"),
    );
    assert_eq!(
        argv,
        vec![
            "krknctl",
            "graph",
            "run",
            "/out/graphs/scenario-1.json",
            "--kubeconfig",
            "/tmp/kubeconfig",
        ]
    );
}

#[test]
fn display_rendering_quotes_unsafe_values() {
    assert_eq!(quote("k8s-app=etcd"), "k8s-app=etcd");
    assert_eq!(quote("{app: cart}"), "'{app: cart}'");
    assert_eq!(quote("it's"), r"'it'\''s'");
    assert_eq!(quote(""), "''");
}
