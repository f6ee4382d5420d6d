#![deny(missing_docs)]

//! Core genome, mutation, and configuration types for the KAI chaos search
//! engine.
//!
//! The crate models chaos experiments as mutable genomes: [`Parameter`]
//! genes grouped into atomic [`Scenario`]s, recursively combined into
//! [`CompositeScenario`] trees. Construction and mutation draw from a
//! read-only [`ClusterComponents`] snapshot under a deterministic
//! [`RngHandle`], so every genome is reproducible from a master seed.

pub mod cluster;
pub mod config;
pub mod errors;
pub mod rng;
pub mod scenario;

pub use cluster::{ClusterComponents, Container, Namespace, Node, Pod};
pub use config::{
    ConfigFile, FitnessConfig, FitnessKind, HealthCheckConfig, HealthCheckEndpoint,
    ScenarioSetting, ScenarioToggles, SloItem,
};
pub use errors::{ErrorInfo, KaiError};
pub use rng::{derive_substream_seed, RngHandle};
pub use scenario::{
    CompositeDependency, CompositeScenario, MutationRule, ParamValue, Parameter, RenderRule,
    Scenario, ScenarioFactory, ScenarioKind, ScenarioNode,
};
