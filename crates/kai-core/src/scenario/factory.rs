//! Random construction of enabled scenario kinds.

use std::sync::Arc;

use tracing::debug;

use crate::cluster::ClusterComponents;
use crate::config::ConfigFile;
use crate::errors::{ErrorInfo, KaiError};
use crate::rng::RngHandle;
use crate::scenario::{Scenario, ScenarioKind};

/// Selects and constructs atomic scenarios for the search driver.
pub struct ScenarioFactory;

impl ScenarioFactory {
    /// Lists the enabled scenario kinds, preserving declaration order.
    pub fn list_scenarios(config: &ConfigFile) -> Vec<ScenarioKind> {
        let toggles = &config.scenario;
        let registry = [
            (toggles.pod_scenarios, ScenarioKind::Pod),
            (toggles.application_outages, ScenarioKind::ApplicationOutage),
            (toggles.container_scenarios, ScenarioKind::Container),
            (toggles.node_cpu_hog, ScenarioKind::NodeCpuHog),
            (toggles.node_memory_hog, ScenarioKind::NodeMemoryHog),
            (toggles.time_scenarios, ScenarioKind::Time),
        ];
        registry
            .into_iter()
            .filter(|(setting, _)| setting.enable)
            .map(|(_, kind)| kind)
            .collect()
    }

    /// Constructs one enabled kind chosen uniformly at random.
    ///
    /// Construction triggers the kind's mutation against the cluster
    /// snapshot. Fails with `MissingScenario` when nothing is enabled; any
    /// construction failure is wrapped as a `Scenario` error carrying the
    /// cause.
    pub fn generate_random_scenario(
        config: &ConfigFile,
        cluster: &Arc<ClusterComponents>,
        rng: &mut RngHandle,
    ) -> Result<Scenario, KaiError> {
        let candidates = Self::list_scenarios(config);
        let kind = match rng.pick(&candidates).copied() {
            Some(kind) => kind,
            None => {
                return Err(KaiError::MissingScenario(ErrorInfo::new(
                    "no-scenarios-enabled",
                    "no scenario kinds enabled; enable at least one in the configuration",
                )))
            }
        };
        debug!(kind = kind.as_str(), "generating random scenario");
        Scenario::build(kind, Arc::clone(cluster), rng).map_err(|err| {
            KaiError::Scenario(
                ErrorInfo::new("scenario-init", "unable to initialize scenario")
                    .with_context("kind", kind.as_str())
                    .with_hint(err.to_string()),
            )
        })
    }

    /// Returns the fixed no-op scenario used as a composite's anchor.
    pub fn create_dummy_scenario() -> Scenario {
        Scenario::dummy()
    }
}
