//! Composite scenarios: binary combinations under an execution-order
//! dependency.

use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher13;

use crate::scenario::Scenario;

/// Execution-order relation between the two children of a composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompositeDependency {
    /// Children are unordered; both hang off a synthetic anchor.
    #[default]
    None,
    /// The left child runs after the right child.
    AOnB,
    /// The right child runs after the left child.
    BOnA,
}

/// A scenario tree node: either an atomic action or a composite pair.
///
/// The closed sum replaces the original's runtime type inspection; the
/// compiler and runner switch on it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "kebab-case")]
pub enum ScenarioNode {
    /// A single chaos action.
    Atomic(Scenario),
    /// A recursive pair of scenarios.
    Composite(Box<CompositeScenario>),
}

impl ScenarioNode {
    /// Wraps a composite scenario.
    pub fn composite(scenario: CompositeScenario) -> Self {
        ScenarioNode::Composite(Box::new(scenario))
    }

    /// Display name of the node.
    pub fn name(&self) -> &str {
        match self {
            ScenarioNode::Atomic(scenario) => scenario.name(),
            ScenarioNode::Composite(composite) => &composite.name,
        }
    }

    fn structural_hash(&self) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(0, 0);
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl Hash for ScenarioNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            ScenarioNode::Atomic(scenario) => scenario.hash(state),
            ScenarioNode::Composite(composite) => composite.hash(state),
        }
    }
}

impl Display for ScenarioNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioNode::Atomic(scenario) => scenario.fmt(f),
            ScenarioNode::Composite(composite) => composite.fmt(f),
        }
    }
}

/// Two scenarios combined under a dependency regime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeScenario {
    /// Fixed display name.
    pub name: String,
    /// Left child.
    pub scenario_a: ScenarioNode,
    /// Right child.
    pub scenario_b: ScenarioNode,
    /// Execution-order relation between the children.
    pub dependency: CompositeDependency,
}

impl CompositeScenario {
    /// Combines two scenario nodes under the given dependency.
    pub fn new(
        scenario_a: ScenarioNode,
        scenario_b: ScenarioNode,
        dependency: CompositeDependency,
    ) -> Self {
        Self {
            name: "composite-scenario".to_string(),
            scenario_a,
            scenario_b,
            dependency,
        }
    }

    fn child_hashes(&self) -> (u64, u64) {
        (
            self.scenario_a.structural_hash(),
            self.scenario_b.structural_hash(),
        )
    }
}

impl Display for CompositeScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Structural equality by child hashes; the dependency tag does not
/// participate, matching the dedup semantics of the search driver.
impl PartialEq for CompositeScenario {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.child_hashes() == other.child_hashes()
    }
}

impl Eq for CompositeScenario {}

impl Hash for CompositeScenario {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (a, b) = self.child_hashes();
        state.write_u64(a);
        state.write_u64(b);
    }
}
