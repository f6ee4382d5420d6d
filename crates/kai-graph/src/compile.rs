//! Lowers a composite-scenario tree into a flat execution graph.
//!
//! The external graph-run tool consumes a flat node set where each node
//! names at most one predecessor. The compiler walks the binary tree
//! assigning each node a path-encoded key: the root key extended with `l`
//! or `r` per left/right descent. Unordered composites are anchored by one
//! synthetic dummy node at the composite's own key.

use kai_core::{CompositeDependency, CompositeScenario, ScenarioFactory, ScenarioNode};

use crate::node::{ExecutionGraph, GraphNode};

/// Compiles a composite tree into the flat node set, rooted at `root_key`.
///
/// The output contains exactly one node per atomic leaf plus one dummy node
/// per unordered composite; every `depends_on` key the walk emits refers to
/// a sibling subtree's root or the inherited predecessor. Compiling the
/// same tree twice yields identical output.
pub fn compile(scenario: &CompositeScenario, root_key: &str, registry: &str) -> ExecutionGraph {
    let mut graph = ExecutionGraph::new();
    expand(scenario, root_key, None, registry, &mut graph);
    graph
}

fn expand(
    scenario: &CompositeScenario,
    root: &str,
    inherited: Option<&str>,
    registry: &str,
    graph: &mut ExecutionGraph,
) {
    let key_a = format!("{root}l");
    let key_b = format!("{root}r");

    // An unordered pair hangs off a synthetic anchor at the current key.
    if scenario.dependency == CompositeDependency::None {
        let dummy = ScenarioFactory::create_dummy_scenario();
        graph.insert(
            root.to_string(),
            GraphNode::from_scenario(&dummy, registry, inherited.map(str::to_string)),
        );
    }

    // Predecessor each child's entry point must reference.
    let (pred_a, pred_b) = match scenario.dependency {
        CompositeDependency::None => (Some(root.to_string()), Some(root.to_string())),
        CompositeDependency::AOnB => (Some(key_b.clone()), inherited.map(str::to_string)),
        CompositeDependency::BOnA => (inherited.map(str::to_string), Some(key_a.clone())),
    };

    emit_child(&scenario.scenario_a, &key_a, pred_a, registry, graph);
    emit_child(&scenario.scenario_b, &key_b, pred_b, registry, graph);
}

fn emit_child(
    child: &ScenarioNode,
    key: &str,
    depends_on: Option<String>,
    registry: &str,
    graph: &mut ExecutionGraph,
) {
    match child {
        ScenarioNode::Atomic(scenario) => {
            graph.insert(
                key.to_string(),
                GraphNode::from_scenario(scenario, registry, depends_on),
            );
        }
        ScenarioNode::Composite(composite) => {
            expand(composite, key, depends_on.as_deref(), registry, graph);
        }
    }
}

/// Serializes the graph as the pretty-printed JSON document the external
/// graph-run command consumes.
pub fn graph_to_json(graph: &ExecutionGraph) -> Result<String, kai_core::KaiError> {
    serde_json::to_string_pretty(graph).map_err(|err| {
        kai_core::KaiError::Serde(
            kai_core::ErrorInfo::new("graph-serialize", "failed to serialize execution graph")
                .with_hint(err.to_string()),
        )
    })
}
