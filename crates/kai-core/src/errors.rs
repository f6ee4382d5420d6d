//! Structured error types shared across KAI crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`KaiError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (scenario names, paths, counts, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the KAI engine.
///
/// Configuration and backend errors are fatal to the run; `Scenario` and
/// `Fitness` errors are scoped to one individual or one evaluation and are
/// surfaced to the search driver, which owns any retry policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum KaiError {
    /// No scenario kind is enabled in the configuration.
    #[error("missing scenario error: {0}")]
    MissingScenario(ErrorInfo),
    /// Scenario construction or mutation failed for one individual.
    #[error("scenario error: {0}")]
    Scenario(ErrorInfo),
    /// Telemetry-backed fitness calculation failed for one evaluation.
    #[error("fitness error: {0}")]
    Fitness(ErrorInfo),
    /// No usable execution backend, or the active backend cannot run the
    /// requested scenario shape.
    #[error("backend error: {0}")]
    Backend(ErrorInfo),
    /// Subprocess launch or capture failures.
    #[error("exec error: {0}")]
    Exec(ErrorInfo),
    /// Configuration file errors.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl KaiError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            KaiError::MissingScenario(info)
            | KaiError::Scenario(info)
            | KaiError::Fitness(info)
            | KaiError::Backend(info)
            | KaiError::Exec(info)
            | KaiError::Config(info)
            | KaiError::Serde(info) => info,
        }
    }
}
