//! Execution and fitness pipeline for the KAI chaos search engine.
//!
//! [`ChaosRunner`] turns a scenario (or its compiled execution graph) into
//! an executable command, runs it while a [`HealthCheckWatcher`] samples
//! the configured endpoints, and computes a [`FitnessResult`] from
//! telemetry and health data. One [`CommandRunResult`] is produced per
//! evaluation for the external search driver; evaluations are independent
//! and safe to run in parallel.

mod backend;
mod command;
mod fitness;
mod health;
mod runner;
mod shell;
mod telemetry;

pub use backend::{probe_backend, RunnerKind};
pub use command::{ctl_command, ctl_flag_name, graph_run_command, hub_command};
pub use fitness::{
    fitness_value, point_fitness, range_fitness, score_slo_items, FitnessResult, SloScore,
    FAILURE_PENALTY_SCORE, QUERY_GRANULARITY, RANGE_PLACEHOLDER, SLO_VIOLATION_EXIT_CODE,
};
pub use health::{
    summarize_response_time, summarize_success_rate, HealthCheckWatcher, HealthProbe, HealthSample,
};
pub use runner::{ChaosRunner, CommandRunResult};
pub use shell::{quote, render_display, CommandExecutor, ExecOutcome, ShellExecutor};
pub use telemetry::{TelemetryClient, TelemetrySeries};
