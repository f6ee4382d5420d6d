//! Per-kind parameter sets and mutation bodies.
//!
//! Each kind binds a fixed ordered parameter list; the index constants in
//! each module name the positions within that list. Mutation draws a
//! representative cluster element, derives the targeting parameters from the
//! draw, and delegates the remaining intensity parameters to their own
//! rules.

use std::collections::BTreeMap;

use crate::cluster::{ClusterComponents, Namespace, Node, Pod};
use crate::errors::{ErrorInfo, KaiError};
use crate::rng::RngHandle;
use crate::scenario::params::Parameter;
use crate::scenario::ScenarioKind;

/// Builds the fixed parameter list for a kind, in genome order.
pub(crate) fn params_for(kind: ScenarioKind) -> Vec<Parameter> {
    match kind {
        ScenarioKind::Pod => vec![
            Parameter::namespace(),
            Parameter::pod_label(),
            Parameter::name_pattern(),
            Parameter::disruption_count(),
            Parameter::kill_timeout(),
            Parameter::expected_recovery_time(),
        ],
        ScenarioKind::ApplicationOutage => vec![
            Parameter::namespace(),
            Parameter::duration(),
            Parameter::pod_selector(),
            Parameter::block_traffic_type(),
        ],
        ScenarioKind::Container => vec![
            Parameter::namespace(),
            Parameter::label_selector(),
            Parameter::disruption_count(),
            Parameter::container_name(),
            Parameter::signal_action(),
            Parameter::expected_recovery_time(),
        ],
        ScenarioKind::NodeCpuHog => vec![
            Parameter::total_chaos_duration(),
            Parameter::node_cpu_cores(),
            Parameter::node_cpu_percentage(),
            Parameter::node_selector(),
            Parameter::taints(),
            Parameter::number_of_nodes(),
            Parameter::hog_image(),
        ],
        ScenarioKind::NodeMemoryHog => vec![
            Parameter::total_chaos_duration(),
            Parameter::node_memory_percentage(),
            Parameter::workers(),
            Parameter::node_selector(),
            Parameter::taints(),
            Parameter::number_of_nodes(),
            Parameter::hog_image(),
        ],
        ScenarioKind::Time => vec![
            Parameter::object_type(),
            Parameter::label_selector(),
            Parameter::time_action(),
            Parameter::container_name(),
            Parameter::namespace(),
        ],
        ScenarioKind::Dummy => vec![Parameter::dummy("END", 10), Parameter::dummy("EXIT_STATUS", 0)],
    }
}

/// Applies the kind's mutation to the parameter list.
pub(crate) fn mutate(
    kind: ScenarioKind,
    params: &mut [Parameter],
    cluster: &ClusterComponents,
    rng: &mut RngHandle,
) -> Result<(), KaiError> {
    match kind {
        ScenarioKind::Pod => pod::mutate(params, cluster, rng),
        ScenarioKind::ApplicationOutage => app_outage::mutate(params, cluster, rng),
        ScenarioKind::Container => container::mutate(params, cluster, rng),
        ScenarioKind::NodeCpuHog => cpu_hog::mutate(params, cluster, rng),
        ScenarioKind::NodeMemoryHog => memory_hog::mutate(params, cluster, rng),
        ScenarioKind::Time => time::mutate(params, cluster, rng),
        ScenarioKind::Dummy => Ok(()),
    }
}

mod pod {
    use super::*;

    pub(super) const NAMESPACE: usize = 0;
    pub(super) const POD_LABEL: usize = 1;
    pub(super) const DISRUPTION_COUNT: usize = 3;

    pub(super) fn mutate(
        params: &mut [Parameter],
        cluster: &ClusterComponents,
        rng: &mut RngHandle,
    ) -> Result<(), KaiError> {
        let namespace = pick_namespace(cluster, rng)?;
        let pod = pick_pod(namespace, rng)?;
        let (key, value) = pick_label(&pod.labels, &pod.name, rng)?;

        params[NAMESPACE].set_string(&namespace.name);
        params[POD_LABEL].set_string(format!("{key}={value}"));

        // Disruption is bounded by how many pods in the namespace carry the
        // chosen label pair.
        let matching = namespace
            .pods
            .iter()
            .filter(|p| p.labels.get(&key).is_some_and(|v| *v == value))
            .count() as i64;
        params[DISRUPTION_COUNT].set_int(rng.int_below(1, matching));
        Ok(())
    }
}

mod app_outage {
    use super::*;

    pub(super) const NAMESPACE: usize = 0;
    pub(super) const POD_SELECTOR: usize = 2;
    pub(super) const BLOCK_TRAFFIC_TYPE: usize = 3;

    pub(super) fn mutate(
        params: &mut [Parameter],
        cluster: &ClusterComponents,
        rng: &mut RngHandle,
    ) -> Result<(), KaiError> {
        let namespace = pick_namespace(cluster, rng)?;
        let pod = pick_pod(namespace, rng)?;
        let (key, value) = pick_label(&pod.labels, &pod.name, rng)?;

        params[NAMESPACE].set_string(&namespace.name);
        // pod_selector is a string of the form "{app: foo}"
        params[POD_SELECTOR].set_string(format!("{{{key}: {value}}}"));
        params[BLOCK_TRAFFIC_TYPE].mutate(rng);
        Ok(())
    }
}

mod container {
    use super::*;

    pub(super) const NAMESPACE: usize = 0;
    pub(super) const LABEL_SELECTOR: usize = 1;
    pub(super) const DISRUPTION_COUNT: usize = 2;
    pub(super) const CONTAINER_NAME: usize = 3;
    pub(super) const ACTION: usize = 4;

    pub(super) fn mutate(
        params: &mut [Parameter],
        cluster: &ClusterComponents,
        rng: &mut RngHandle,
    ) -> Result<(), KaiError> {
        let namespace = pick_namespace(cluster, rng)?;
        let pod = pick_pod(namespace, rng)?;
        let (key, value) = pick_label(&pod.labels, &pod.name, rng)?;

        params[NAMESPACE].set_string(&namespace.name);
        params[LABEL_SELECTOR].set_string(format!("{key}={value}"));

        let count = rng.int_below(1, pod.containers.len() as i64);
        params[DISRUPTION_COUNT].set_int(count);
        if count == 1 {
            // A single disruption must match any container, never none.
            params[CONTAINER_NAME].set_string(".*");
        } else {
            let names: Vec<&str> = pod.containers.iter().map(|c| c.name.as_str()).collect();
            let name = rng.pick(&names).ok_or_else(|| {
                KaiError::Scenario(
                    ErrorInfo::new("empty-containers", "pod has no containers to disrupt")
                        .with_context("pod", pod.name.clone()),
                )
            })?;
            params[CONTAINER_NAME].set_string(*name);
        }
        params[ACTION].mutate(rng);
        Ok(())
    }
}

mod cpu_hog {
    use super::*;

    pub(super) const CPU_PERCENTAGE: usize = 2;
    pub(super) const NODE_SELECTOR: usize = 3;
    pub(super) const TAINTS: usize = 4;
    pub(super) const NUMBER_OF_NODES: usize = 5;

    pub(super) fn mutate(
        params: &mut [Parameter],
        cluster: &ClusterComponents,
        rng: &mut RngHandle,
    ) -> Result<(), KaiError> {
        target_nodes(params, NODE_SELECTOR, TAINTS, NUMBER_OF_NODES, cluster, rng)?;
        params[CPU_PERCENTAGE].mutate(rng);
        Ok(())
    }
}

mod memory_hog {
    use super::*;

    pub(super) const MEMORY_PERCENTAGE: usize = 1;
    pub(super) const WORKERS: usize = 2;
    pub(super) const NODE_SELECTOR: usize = 3;
    pub(super) const TAINTS: usize = 4;
    pub(super) const NUMBER_OF_NODES: usize = 5;

    pub(super) fn mutate(
        params: &mut [Parameter],
        cluster: &ClusterComponents,
        rng: &mut RngHandle,
    ) -> Result<(), KaiError> {
        target_nodes(params, NODE_SELECTOR, TAINTS, NUMBER_OF_NODES, cluster, rng)?;
        params[WORKERS].mutate(rng);
        params[MEMORY_PERCENTAGE].mutate(rng);
        Ok(())
    }
}

mod time {
    use super::*;

    pub(super) const OBJECT_TYPE: usize = 0;
    pub(super) const LABEL_SELECTOR: usize = 1;
    pub(super) const ACTION: usize = 2;
    pub(super) const NAMESPACE: usize = 4;

    pub(super) fn mutate(
        params: &mut [Parameter],
        cluster: &ClusterComponents,
        rng: &mut RngHandle,
    ) -> Result<(), KaiError> {
        params[OBJECT_TYPE].mutate(rng);
        params[ACTION].mutate(rng);

        if params[OBJECT_TYPE].str_value() == Some("pod") {
            let namespace = pick_namespace(cluster, rng)?;
            let mut selectors: Vec<String> = Vec::new();
            for pod in &namespace.pods {
                for (key, value) in &pod.labels {
                    let pair = format!("{key}={value}");
                    if !selectors.contains(&pair) {
                        selectors.push(pair);
                    }
                }
            }
            let selector = rng.pick(&selectors).cloned().ok_or_else(|| {
                empty_label_set("namespace", &namespace.name)
            })?;
            params[LABEL_SELECTOR].set_string(selector);
            params[NAMESPACE].set_string(&namespace.name);
        } else {
            let mut selectors: Vec<String> = Vec::new();
            for node in &cluster.nodes {
                for (key, value) in &node.labels {
                    let pair = format!("{key}={value}");
                    if !selectors.contains(&pair) {
                        selectors.push(pair);
                    }
                }
            }
            let selector = rng.pick(&selectors).cloned().ok_or_else(|| {
                empty_label_set("scope", "cluster-nodes")
            })?;
            params[LABEL_SELECTOR].set_string(selector);
            params[NAMESPACE].set_string("");
        }
        Ok(())
    }
}

/// Node-or-label targeting shared by the hog kinds.
///
/// With even odds either one node is pinned by hostname (propagating its
/// taints so the injected hog tolerates them) or a node label is chosen
/// weighted by how many nodes carry it.
fn target_nodes(
    params: &mut [Parameter],
    selector_idx: usize,
    taints_idx: usize,
    count_idx: usize,
    cluster: &ClusterComponents,
    rng: &mut RngHandle,
) -> Result<(), KaiError> {
    if rng.chance(0.5) {
        let node = pick_node(cluster, rng)?;
        params[selector_idx].set_string(format!("kubernetes.io/hostname={}", node.name));
        params[count_idx].set_int(1);
        params[taints_idx].set_string(render_taints(&node.taints));
    } else {
        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        for node in &cluster.nodes {
            for (key, value) in &node.labels {
                *counts.entry(format!("{key}={value}")).or_insert(0) += 1;
            }
        }
        let selectors: Vec<&String> = counts.keys().collect();
        let selector = (*rng
            .pick(&selectors)
            .ok_or_else(|| empty_label_set("scope", "cluster-nodes"))?)
        .clone();
        let matching = counts[&selector];
        params[selector_idx].set_string(&selector);
        params[count_idx].set_int(rng.int_below(1, matching));
        params[taints_idx].set_string("[]");
    }
    Ok(())
}

fn render_taints(taints: &[String]) -> String {
    format!("[{}]", taints.join(", "))
}

fn pick_namespace<'a>(
    cluster: &'a ClusterComponents,
    rng: &mut RngHandle,
) -> Result<&'a Namespace, KaiError> {
    rng.pick(&cluster.namespaces).ok_or_else(|| {
        KaiError::Scenario(ErrorInfo::new(
            "empty-namespaces",
            "cluster snapshot has no namespaces to draw from",
        ))
    })
}

fn pick_pod<'a>(namespace: &'a Namespace, rng: &mut RngHandle) -> Result<&'a Pod, KaiError> {
    rng.pick(&namespace.pods).ok_or_else(|| {
        KaiError::Scenario(
            ErrorInfo::new("empty-pods", "namespace has no pods to draw from")
                .with_context("namespace", namespace.name.clone()),
        )
    })
}

fn pick_node<'a>(cluster: &'a ClusterComponents, rng: &mut RngHandle) -> Result<&'a Node, KaiError> {
    rng.pick(&cluster.nodes).ok_or_else(|| {
        KaiError::Scenario(ErrorInfo::new(
            "empty-nodes",
            "cluster snapshot has no nodes to draw from",
        ))
    })
}

/// Draws one label pair from a label map, failing hard on an empty set.
fn pick_label(
    labels: &BTreeMap<String, String>,
    owner: &str,
    rng: &mut RngHandle,
) -> Result<(String, String), KaiError> {
    let keys: Vec<&String> = labels.keys().collect();
    let key = rng
        .pick(&keys)
        .ok_or_else(|| empty_label_set("owner", owner))?;
    Ok(((*key).clone(), labels[*key].clone()))
}

fn empty_label_set(context_key: &str, context_value: &str) -> KaiError {
    KaiError::Scenario(
        ErrorInfo::new("empty-label-set", "selection over an empty label set is undefined")
            .with_context(context_key, context_value),
    )
}
