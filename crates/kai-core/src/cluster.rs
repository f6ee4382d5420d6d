//! Read-only cluster topology snapshot consumed at mutation time.
//!
//! The snapshot is produced by an external discovery collaborator and is
//! immutable for the lifetime of a generation. Scenarios hold it behind an
//! `Arc` and never serialize it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single container inside a pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    /// Container name as reported by the cluster.
    pub name: String,
}

/// A pod with its labels and containers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Pod {
    /// Pod name.
    pub name: String,
    /// Pod labels, keyed by label name.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Containers running inside the pod.
    #[serde(default)]
    pub containers: Vec<Container>,
}

/// A namespace and the pods discovered in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Namespace {
    /// Namespace name.
    pub name: String,
    /// Pods discovered in the namespace.
    #[serde(default)]
    pub pods: Vec<Pod>,
}

/// A schedulable node with its labels, taints, and free capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Node {
    /// Node name.
    pub name: String,
    /// Node labels, keyed by label name.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Taints currently applied to the node, in `key=value:Effect` form.
    #[serde(default)]
    pub taints: Vec<String>,
    /// Free CPU capacity in cores.
    #[serde(default)]
    pub free_cpu: f64,
    /// Free memory capacity in bytes.
    #[serde(default)]
    pub free_mem: f64,
}

/// Read-only snapshot of the discoverable cluster surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ClusterComponents {
    /// Namespaces in discovery order.
    #[serde(default)]
    pub namespaces: Vec<Namespace>,
    /// Nodes in discovery order.
    #[serde(default)]
    pub nodes: Vec<Node>,
}
