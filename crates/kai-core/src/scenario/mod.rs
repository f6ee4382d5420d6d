//! Scenario genomes: atomic chaos actions and their composite combinations.

use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use siphasher::sip::SipHasher13;

use crate::cluster::ClusterComponents;
use crate::errors::KaiError;
use crate::rng::RngHandle;

pub mod composite;
pub mod factory;
mod kinds;
pub mod params;

pub use composite::{CompositeDependency, CompositeScenario, ScenarioNode};
pub use factory::ScenarioFactory;
pub use params::{MutationRule, ParamValue, Parameter, RenderRule};

/// The closed set of atomic scenario kinds.
///
/// `as_str` doubles as the external chaos-tool image name for the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioKind {
    /// Pod disruption.
    #[serde(rename = "pod-scenarios")]
    Pod,
    /// Application outage via traffic blocking.
    #[serde(rename = "application-outages")]
    ApplicationOutage,
    /// Container kill inside a pod.
    #[serde(rename = "container-scenarios")]
    Container,
    /// Node CPU hog.
    #[serde(rename = "node-cpu-hog")]
    NodeCpuHog,
    /// Node memory hog.
    #[serde(rename = "node-memory-hog")]
    NodeMemoryHog,
    /// Clock skew.
    #[serde(rename = "time-scenarios")]
    Time,
    /// No-op anchor used as the synthetic root of unordered composites.
    #[serde(rename = "dummy-scenario")]
    Dummy,
}

impl ScenarioKind {
    /// Returns the external image name for the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioKind::Pod => "pod-scenarios",
            ScenarioKind::ApplicationOutage => "application-outages",
            ScenarioKind::Container => "container-scenarios",
            ScenarioKind::NodeCpuHog => "node-cpu-hog",
            ScenarioKind::NodeMemoryHog => "node-memory-hog",
            ScenarioKind::Time => "time-scenarios",
            ScenarioKind::Dummy => "dummy-scenario",
        }
    }
}

/// An atomic chaos action bound to a fixed ordered parameter list.
///
/// The cluster snapshot is a non-owned reference used only during mutation;
/// it is never serialized and is excluded from identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    kind: ScenarioKind,
    params: Vec<Parameter>,
    #[serde(skip)]
    cluster: Arc<ClusterComponents>,
}

impl Scenario {
    /// Constructs a scenario of the given kind and mutates it once.
    ///
    /// The dummy kind carries canned parameters and skips mutation.
    pub fn build(
        kind: ScenarioKind,
        cluster: Arc<ClusterComponents>,
        rng: &mut RngHandle,
    ) -> Result<Self, KaiError> {
        let mut scenario = Self {
            kind,
            params: kinds::params_for(kind),
            cluster,
        };
        if kind != ScenarioKind::Dummy {
            scenario.mutate(rng)?;
        }
        Ok(scenario)
    }

    /// Returns the fixed no-op anchor scenario with canned parameters.
    pub(crate) fn dummy() -> Self {
        Self {
            kind: ScenarioKind::Dummy,
            params: kinds::params_for(ScenarioKind::Dummy),
            cluster: Arc::default(),
        }
    }

    /// Returns the scenario kind.
    pub fn kind(&self) -> ScenarioKind {
        self.kind
    }

    /// Returns the external image name.
    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    /// Returns the ordered parameter genome.
    pub fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    /// Re-derives the genome from a fresh draw over the cluster snapshot.
    pub fn mutate(&mut self, rng: &mut RngHandle) -> Result<(), KaiError> {
        let cluster = Arc::clone(&self.cluster);
        kinds::mutate(self.kind, &mut self.params, &cluster, rng)
    }

    /// Raw parameter values joined in genome order; the identity payload.
    fn value_signature(&self) -> String {
        self.params
            .iter()
            .map(|p| p.value_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Stable hexadecimal content digest over (name, ordered values).
    pub fn content_digest(&self) -> String {
        let digest = Sha256::digest(format!("{self}").as_bytes());
        format!("{:x}", digest)
    }

    fn structural_hash(&self) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(0, 0);
        hasher.write(self.name().as_bytes());
        hasher.write(self.value_signature().as_bytes());
        hasher.finish()
    }
}

impl Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.value_signature())
    }
}

impl PartialEq for Scenario {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name() && self.value_signature() == other.value_signature()
    }
}

impl Eq for Scenario {}

impl Hash for Scenario {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

