//! Per-evaluation execution pipeline.
//!
//! One evaluation walks `select command → start health watch → execute →
//! stop health watch → score`. The health sampler is paired with the
//! subprocess: it starts immediately before the launch and stops
//! immediately after the subprocess returns, regardless of outcome.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::Builder;
use tracing::{debug, info};

use kai_core::{
    CompositeScenario, ConfigFile, ErrorInfo, KaiError, Scenario, ScenarioNode,
};
use kai_graph::{compile, graph_to_json};

use crate::backend::{probe_backend, RunnerKind};
use crate::command;
use crate::fitness::{
    self, FitnessResult, FAILURE_PENALTY_SCORE, SLO_VIOLATION_EXIT_CODE,
};
use crate::health::{
    summarize_response_time, summarize_success_rate, HealthCheckWatcher, HealthProbe, HealthSample,
};
use crate::shell::{self, CommandExecutor, ShellExecutor};
use crate::telemetry::TelemetryClient;

/// Root key assigned to compiled execution graphs.
const GRAPH_ROOT_KEY: &str = "$";

/// Immutable record of one evaluation, owned by the caller after return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRunResult {
    /// Generation the evaluation belongs to.
    pub generation_id: u64,
    /// The evaluated genome.
    pub scenario: ScenarioNode,
    /// Rendered command line.
    pub command: String,
    /// Combined subprocess output.
    pub log: String,
    /// Subprocess exit status.
    pub exit_code: i32,
    /// Wall-clock start of the evaluation.
    pub start_time: DateTime<Utc>,
    /// Wall-clock end of the evaluation.
    pub end_time: DateTime<Utc>,
    /// Fitness value and components.
    pub fitness: FitnessResult,
    /// Health samples collected during the run.
    pub health_checks: Vec<HealthSample>,
}

/// Turns scenarios into executable commands, runs them, and scores the
/// outcome.
pub struct ChaosRunner {
    config: Arc<ConfigFile>,
    output_dir: PathBuf,
    kind: RunnerKind,
    telemetry: Arc<dyn TelemetryClient>,
    health_probe: Arc<dyn HealthProbe>,
    executor: Arc<dyn CommandExecutor>,
}

impl ChaosRunner {
    /// Creates a runner, probing the available backends.
    pub fn new(
        config: Arc<ConfigFile>,
        output_dir: impl Into<PathBuf>,
        telemetry: Arc<dyn TelemetryClient>,
        health_probe: Arc<dyn HealthProbe>,
    ) -> Result<Self, KaiError> {
        Self::with_executor(
            config,
            output_dir,
            telemetry,
            health_probe,
            Arc::new(ShellExecutor),
            None,
        )
    }

    /// Creates a runner with an explicit executor and optional backend
    /// override; the backend is probed through the executor when not given.
    pub fn with_executor(
        config: Arc<ConfigFile>,
        output_dir: impl Into<PathBuf>,
        telemetry: Arc<dyn TelemetryClient>,
        health_probe: Arc<dyn HealthProbe>,
        executor: Arc<dyn CommandExecutor>,
        kind: Option<RunnerKind>,
    ) -> Result<Self, KaiError> {
        let kind = match kind {
            Some(kind) => {
                debug!(?kind, "using caller provided runner backend");
                kind
            }
            None => probe_backend(executor.as_ref())?,
        };
        Ok(Self {
            config,
            output_dir: output_dir.into(),
            kind,
            telemetry,
            health_probe,
            executor,
        })
    }

    /// Returns the selected backend.
    pub fn runner_kind(&self) -> RunnerKind {
        self.kind
    }

    /// Runs one evaluation to completion and scores it.
    ///
    /// Per-evaluation failures (launch, telemetry) surface as `Err`; the
    /// search driver decides whether to skip or retry the individual. The
    /// health sampler is stopped on every path.
    pub fn run(
        &self,
        scenario: &ScenarioNode,
        generation_id: u64,
    ) -> Result<CommandRunResult, KaiError> {
        debug!(scenario = %scenario, generation_id, "running scenario");
        let start_time = Utc::now();

        let argv = match scenario {
            ScenarioNode::Atomic(atomic) => self.scenario_command(atomic),
            ScenarioNode::Composite(composite) => self.graph_command(composite)?,
        };
        let display = shell::render_display(&argv);

        let mut watcher = HealthCheckWatcher::new(
            &self.config.health_checks,
            Arc::clone(&self.health_probe),
        );
        watcher.start();
        let exec = self.executor.execute(&argv);
        watcher.stop();
        let outcome = exec?;
        let end_time = Utc::now();

        let fitness = self.score(outcome.exit_code, start_time, end_time, &watcher)?;

        Ok(CommandRunResult {
            generation_id,
            scenario: scenario.clone(),
            command: display,
            log: outcome.log,
            exit_code: outcome.exit_code,
            start_time,
            end_time,
            fitness,
            health_checks: watcher.results(),
        })
    }

    fn score(
        &self,
        exit_code: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        watcher: &HealthCheckWatcher,
    ) -> Result<FitnessResult, KaiError> {
        let fit_cfg = &self.config.fitness;
        let mut result = if let Some(query) = &fit_cfg.query {
            FitnessResult {
                fitness_score: fitness::fitness_value(
                    self.telemetry.as_ref(),
                    query,
                    fit_cfg.kind,
                    start,
                    end,
                )?,
                ..FitnessResult::default()
            }
        } else if !fit_cfg.items.is_empty() {
            fitness::score_slo_items(self.telemetry.as_ref(), &fit_cfg.items, start, end)?
        } else {
            FitnessResult::default()
        };

        if fit_cfg.include_failure_penalty && exit_code == SLO_VIOLATION_EXIT_CODE {
            result.failure_penalty = FAILURE_PENALTY_SCORE;
        }
        let samples = watcher.results();
        if fit_cfg.include_health_check_failure {
            result.health_check_failure_score = summarize_success_rate(&samples);
        }
        if fit_cfg.include_health_check_response_time {
            result.health_check_response_time_score = summarize_response_time(&samples);
        }

        result.fitness_score = result.fitness_score
            + result.failure_penalty
            + result.health_check_failure_score
            + result.health_check_response_time_score;
        Ok(result)
    }

    fn scenario_command(&self, scenario: &Scenario) -> Vec<String> {
        match self.kind {
            RunnerKind::Hub => command::hub_command(
                scenario,
                &self.config.kubeconfig,
                &self.config.image_registry,
            ),
            RunnerKind::Ctl => command::ctl_command(scenario, &self.config.kubeconfig),
        }
    }

    /// Compiles the composite, writes the graph file, and renders the
    /// graph-run command. Always requires the graph-capable backend.
    fn graph_command(&self, scenario: &CompositeScenario) -> Result<Vec<String>, KaiError> {
        if self.kind != RunnerKind::Ctl {
            return Err(KaiError::Backend(
                ErrorInfo::new(
                    "graph-backend-required",
                    "composite scenarios require the graph-capable backend",
                )
                .with_hint("install krknctl to run composite scenarios"),
            ));
        }

        let graph_dir = self.output_dir.join("graphs");
        fs::create_dir_all(&graph_dir).map_err(|err| {
            KaiError::Exec(
                ErrorInfo::new("graph-dir", "failed to create graph output directory")
                    .with_context("path", graph_dir.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;

        let graph = compile(scenario, GRAPH_ROOT_KEY, &self.config.image_registry);
        let json = graph_to_json(&graph)?;

        // Unique per call so concurrent evaluations never collide.
        let mut file = Builder::new()
            .prefix("scenario-")
            .suffix(".json")
            .tempfile_in(&graph_dir)
            .map_err(|err| {
                KaiError::Exec(
                    ErrorInfo::new("graph-file", "failed to create graph file")
                        .with_context("dir", graph_dir.display().to_string())
                        .with_hint(err.to_string()),
                )
            })?;
        file.write_all(json.as_bytes()).map_err(|err| {
            KaiError::Exec(
                ErrorInfo::new("graph-write", "failed to write graph file")
                    .with_hint(err.to_string()),
            )
        })?;
        let (_, path) = file.keep().map_err(|err| {
            KaiError::Exec(
                ErrorInfo::new("graph-keep", "failed to persist graph file")
                    .with_hint(err.to_string()),
            )
        })?;
        info!(path = %path.display(), "created scenario graph file");

        Ok(command::graph_run_command(&path, &self.config.kubeconfig))
    }
}
