//! Execution-graph node model.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use kai_core::Scenario;

/// One runnable node in the flat execution graph.
///
/// Serializes exactly as the external graph-run tool expects:
/// `{image, name, env, depends_on?}`. Valid only for the duration of one
/// run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Fully qualified chaos image reference.
    pub image: String,
    /// Scenario name.
    pub name: String,
    /// Environment handed to the node, one entry per parameter.
    pub env: IndexMap<String, String>,
    /// Key of the node that must complete first, when ordered.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub depends_on: Option<String>,
}

impl GraphNode {
    /// Builds the node for an atomic scenario.
    ///
    /// Every parameter lands in the env mapping under its default name with
    /// its rendered value, preserving genome order.
    pub fn from_scenario(scenario: &Scenario, registry: &str, depends_on: Option<String>) -> Self {
        let env = scenario
            .parameters()
            .iter()
            .map(|param| (param.name.clone(), param.render_value()))
            .collect();
        Self {
            image: format!("{registry}:{}", scenario.name()),
            name: scenario.name().to_string(),
            env,
            depends_on,
        }
    }
}

/// Flat node set keyed by path-encoded identifiers, in emission order.
pub type ExecutionGraph = IndexMap<String, GraphNode>;
