//! Execution backend selection.

use kai_core::{ErrorInfo, KaiError};
use tracing::{debug, warn};

use crate::shell::CommandExecutor;

/// The two interchangeable command backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerKind {
    /// `krknctl` CLI backend; supports execution graphs.
    Ctl,
    /// `podman`-launched hub image backend.
    Hub,
}

/// Probes the external tooling and picks a backend, preferring the
/// graph-capable CLI.
///
/// Fails with a `Backend` error when neither tool answers its `--version`
/// probe; this is fatal at startup.
pub fn probe_backend(executor: &dyn CommandExecutor) -> Result<RunnerKind, KaiError> {
    if probe(executor, "krknctl") {
        debug!("using krknctl as runner backend");
        return Ok(RunnerKind::Ctl);
    }
    warn!("krknctl is not available");
    if probe(executor, "podman") {
        debug!("using podman hub images as runner backend");
        return Ok(RunnerKind::Hub);
    }
    warn!("podman is not available");
    Err(KaiError::Backend(
        ErrorInfo::new("no-backend", "neither krknctl nor podman is available")
            .with_hint("install krknctl or podman and re-run"),
    ))
}

fn probe(executor: &dyn CommandExecutor, program: &str) -> bool {
    let argv = vec![program.to_string(), "--version".to_string()];
    matches!(executor.execute(&argv), Ok(outcome) if outcome.exit_code == 0)
}
