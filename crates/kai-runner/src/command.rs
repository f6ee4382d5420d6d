//! Backend-specific command rendering.

use std::path::Path;

use kai_core::{Parameter, Scenario};

/// Renders the hub backend command: one `-e NAME=value` environment flag
/// per parameter, using the parameter's default name.
pub fn hub_command(scenario: &Scenario, kubeconfig: &Path, registry: &str) -> Vec<String> {
    let mut argv = vec![
        "podman".to_string(),
        "run".to_string(),
        "--env-host=true".to_string(),
        "-e".to_string(),
        "PUBLISH_KRAKEN_STATUS=False".to_string(),
        "-e".to_string(),
        "TELEMETRY_PROMETHEUS_BACKUP=False".to_string(),
        "-e".to_string(),
        "WAIT_DURATION=0".to_string(),
    ];
    for param in scenario.parameters() {
        argv.push("-e".to_string());
        argv.push(format!("{}={}", param.name, param.render_value()));
    }
    argv.push("--net=host".to_string());
    argv.push("-v".to_string());
    argv.push(format!(
        "{}:/home/krkn/.kube/config:Z",
        kubeconfig.display()
    ));
    argv.push(format!("{registry}:{}", scenario.name()));
    argv
}

/// Renders the CLI backend command: one `--flag value` pair per parameter.
///
/// Flag names use the parameter's alias when set, else its default name,
/// lower-cased with underscores converted to hyphens.
pub fn ctl_command(scenario: &Scenario, kubeconfig: &Path) -> Vec<String> {
    let mut argv = vec![
        "krknctl".to_string(),
        "run".to_string(),
        scenario.name().to_string(),
        "--telemetry-prometheus-backup".to_string(),
        "False".to_string(),
        "--wait-duration".to_string(),
        "0".to_string(),
        "--kubeconfig".to_string(),
        kubeconfig.display().to_string(),
    ];
    for param in scenario.parameters() {
        argv.push(format!("--{}", ctl_flag_name(param)));
        argv.push(param.render_value());
    }
    argv
}

/// Renders the single graph-run command referencing a compiled graph file.
pub fn graph_run_command(graph_file: &Path, kubeconfig: &Path) -> Vec<String> {
    vec![
        "krknctl".to_string(),
        "graph".to_string(),
        "run".to_string(),
        graph_file.display().to_string(),
        "--kubeconfig".to_string(),
        kubeconfig.display().to_string(),
    ]
}

/// CLI flag spelling for a parameter.
pub fn ctl_flag_name(param: &Parameter) -> String {
    param.effective_name().to_lowercase().replace('_', "-")
}
