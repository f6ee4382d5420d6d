//! Telemetry client seam.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kai_core::KaiError;

/// One series returned by a range query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TelemetrySeries {
    /// `(unix timestamp, value)` samples in time order.
    pub values: Vec<(i64, f64)>,
}

impl TelemetrySeries {
    /// Builds a series from raw samples.
    pub fn from_values(values: Vec<(i64, f64)>) -> Self {
        Self { values }
    }
}

/// Read-only telemetry query surface.
///
/// The query language and transport are external collaborators; the
/// pipeline only evaluates queries over `[start, end]` windows and reads
/// the last sample of the first returned series. Implementations perform
/// stateless reads and must be safe for concurrent use across evaluations.
pub trait TelemetryClient: Send + Sync {
    /// Evaluates `query` over `[start, end]` at the given step granularity
    /// in seconds.
    fn query_range(
        &self,
        query: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity: u32,
    ) -> Result<Vec<TelemetrySeries>, KaiError>;
}
