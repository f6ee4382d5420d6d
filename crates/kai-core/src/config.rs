//! YAML-configurable run settings for the chaos search core.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cluster::ClusterComponents;
use crate::errors::{ErrorInfo, KaiError};

/// Top level configuration consumed by the factory and the runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Path to the kubeconfig forwarded to the chaos tooling. The core does
    /// not read it; it is a cluster-access handle only.
    #[serde(default)]
    pub kubeconfig: PathBuf,
    /// Image registry prefix for chaos scenario images.
    #[serde(default = "default_image_registry")]
    pub image_registry: String,
    /// Which scenario kinds the search may draw from.
    #[serde(default)]
    pub scenario: ScenarioToggles,
    /// Fitness function selection and additive component toggles.
    #[serde(default)]
    pub fitness: FitnessConfig,
    /// Health-check sampling configuration.
    #[serde(default)]
    pub health_checks: HealthCheckConfig,
    /// Cluster topology snapshot embedded by the discovery step.
    #[serde(default)]
    pub cluster_components: ClusterComponents,
}

fn default_image_registry() -> String {
    "containers.krkn-chaos.dev/krkn-chaos/krkn-hub".to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            kubeconfig: PathBuf::new(),
            image_registry: default_image_registry(),
            scenario: ScenarioToggles::default(),
            fitness: FitnessConfig::default(),
            health_checks: HealthCheckConfig::default(),
            cluster_components: ClusterComponents::default(),
        }
    }
}

impl ConfigFile {
    /// Loads a configuration file from a YAML document on disk.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, KaiError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| {
            KaiError::Config(
                ErrorInfo::new("config-read", "failed to read configuration file")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Parses a configuration from a YAML string.
    pub fn from_yaml_str(raw: &str) -> Result<Self, KaiError> {
        serde_yaml::from_str(raw).map_err(|err| {
            KaiError::Config(
                ErrorInfo::new("config-parse", "failed to parse configuration YAML")
                    .with_hint(err.to_string()),
            )
        })
    }
}

/// Enablement flag for one scenario kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScenarioSetting {
    /// Whether the kind participates in random generation.
    #[serde(default)]
    pub enable: bool,
}

impl ScenarioSetting {
    /// An enabled setting.
    pub fn enabled() -> Self {
        Self { enable: true }
    }
}

/// Per-kind enablement, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScenarioToggles {
    /// Pod disruption scenarios.
    #[serde(default)]
    pub pod_scenarios: ScenarioSetting,
    /// Application outage scenarios.
    #[serde(default)]
    pub application_outages: ScenarioSetting,
    /// Container kill scenarios.
    #[serde(default)]
    pub container_scenarios: ScenarioSetting,
    /// Node CPU hog scenarios.
    #[serde(default)]
    pub node_cpu_hog: ScenarioSetting,
    /// Node memory hog scenarios.
    #[serde(default)]
    pub node_memory_hog: ScenarioSetting,
    /// Clock skew scenarios.
    #[serde(default)]
    pub time_scenarios: ScenarioSetting,
}

/// How a telemetry query is evaluated over a run window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FitnessKind {
    /// Difference between the query value at the run's end and start
    /// instants. Isolates the delta on monotonic counters.
    #[default]
    Point,
    /// Single evaluation over the whole run window, with the `$range$`
    /// placeholder substituted by the run length in whole minutes.
    Range,
}

/// One independently weighted SLO item in multi-objective mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SloItem {
    /// Stable identifier echoed into the per-item score breakdown.
    pub id: String,
    /// Weight applied to the raw score.
    pub weight: f64,
    /// Telemetry query for the item.
    pub query: String,
    /// Evaluation mode for the item.
    #[serde(default)]
    pub kind: FitnessKind,
}

/// Fitness function selection.
///
/// Exactly one of the two modes is active: `query` selects single-query
/// mode and takes precedence; otherwise a non-empty `items` list selects
/// multi-objective mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FitnessConfig {
    /// Evaluation mode for the single query.
    #[serde(default)]
    pub kind: FitnessKind,
    /// Telemetry query for single-query mode.
    #[serde(default)]
    pub query: Option<String>,
    /// Weighted SLO items for multi-objective mode.
    #[serde(default)]
    pub items: Vec<SloItem>,
    /// Add a fixed penalty when the run exits with the SLO-violation code.
    #[serde(default)]
    pub include_failure_penalty: bool,
    /// Add the health-check failure-rate score.
    #[serde(default)]
    pub include_health_check_failure: bool,
    /// Add the health-check response-time score.
    #[serde(default)]
    pub include_health_check_response_time: bool,
}

/// One endpoint sampled by the health-check watcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckEndpoint {
    /// Display name used in summaries.
    pub name: String,
    /// Endpoint URL handed to the probe.
    pub url: String,
}

/// Health-check sampling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheckConfig {
    /// Endpoints to sample for the duration of each evaluation.
    #[serde(default)]
    pub endpoints: Vec<HealthCheckEndpoint>,
    /// Seconds between sampling rounds.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_interval_secs() -> u64 {
    5
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            endpoints: Vec::new(),
            interval_secs: default_interval_secs(),
        }
    }
}
