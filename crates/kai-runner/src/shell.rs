//! Subprocess execution seam and shell rendering helpers.

use std::process::Command;

use kai_core::{ErrorInfo, KaiError};
use tracing::debug;

/// Outcome of one subprocess run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Combined standard output and error, in capture order.
    pub log: String,
    /// Exit status; `-1` when the process was terminated by a signal.
    pub exit_code: i32,
}

/// Executes rendered commands.
///
/// The seam lets tests and embedding drivers substitute the subprocess
/// layer; production code uses [`ShellExecutor`]. Implementations must be
/// safe to share across concurrent evaluations.
pub trait CommandExecutor: Send + Sync {
    /// Runs the argv vector to completion, capturing its output.
    fn execute(&self, argv: &[String]) -> Result<ExecOutcome, KaiError>;
}

/// Default executor backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellExecutor;

impl CommandExecutor for ShellExecutor {
    fn execute(&self, argv: &[String]) -> Result<ExecOutcome, KaiError> {
        let (program, args) = argv.split_first().ok_or_else(|| {
            KaiError::Exec(ErrorInfo::new("empty-command", "cannot execute an empty command"))
        })?;
        debug!(command = %render_display(argv), "running command");
        let output = Command::new(program).args(args).output().map_err(|err| {
            KaiError::Exec(
                ErrorInfo::new("spawn-failed", "failed to launch subprocess")
                    .with_context("program", program.clone())
                    .with_hint(err.to_string()),
            )
        })?;

        let mut log = String::from_utf8_lossy(&output.stdout).into_owned();
        log.push_str(&String::from_utf8_lossy(&output.stderr));
        let exit_code = output.status.code().unwrap_or(-1);
        debug!(exit_code, "run status");
        Ok(ExecOutcome { log, exit_code })
    }
}

/// Quotes a value for safe inclusion in a POSIX shell command line.
pub fn quote(value: &str) -> String {
    if !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_=./:,".contains(c))
    {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Renders an argv vector as a copy-pasteable shell command line.
pub fn render_display(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| quote(arg))
        .collect::<Vec<_>>()
        .join(" ")
}
