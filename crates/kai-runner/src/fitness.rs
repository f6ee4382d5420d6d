//! Fitness scoring from telemetry and health data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use kai_core::{ErrorInfo, FitnessKind, KaiError, SloItem};

use crate::telemetry::TelemetryClient;

/// Reserved exit status meaning the chaos tool observed an SLO violation.
pub const SLO_VIOLATION_EXIT_CODE: i32 = 2;
/// Fixed penalty added when the run exits with the SLO-violation code.
pub const FAILURE_PENALTY_SCORE: f64 = 5.0;
/// Step granularity in seconds for telemetry range queries.
pub const QUERY_GRANULARITY: u32 = 100;
/// Placeholder substituted with the run length in whole minutes.
pub const RANGE_PLACEHOLDER: &str = "$range$";

/// Per-item score in multi-objective mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SloScore {
    /// Item identifier, echoed from the configuration.
    pub id: String,
    /// Raw query score.
    pub fitness_score: f64,
    /// Raw score multiplied by the item weight.
    pub weighted_score: f64,
}

/// Fitness value with its additive components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FitnessResult {
    /// Final scalar consumed by the search driver.
    pub fitness_score: f64,
    /// Penalty contributed by the SLO-violation exit code.
    pub failure_penalty: f64,
    /// Health-check failure-rate component.
    pub health_check_failure_score: f64,
    /// Health-check response-time component.
    pub health_check_response_time_score: f64,
    /// Per-item breakdown in multi-objective mode, in declared order.
    #[serde(default)]
    pub scores: Vec<SloScore>,
}

/// Evaluates one query under the given mode.
pub fn fitness_value(
    client: &dyn TelemetryClient,
    query: &str,
    kind: FitnessKind,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<f64, KaiError> {
    match kind {
        FitnessKind::Point => point_fitness(client, query, start, end),
        FitnessKind::Range => range_fitness(client, query, start, end),
    }
}

/// Difference between the query value at the run's end and start instants.
///
/// Isolates the delta on monotonic counters such as restart totals.
pub fn point_fitness(
    client: &dyn TelemetryClient,
    query: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<f64, KaiError> {
    debug!("calculating point fitness");
    let at_start = last_value(client.query_range(query, start, start, QUERY_GRANULARITY)?)?;
    let at_end = last_value(client.query_range(query, end, end, QUERY_GRANULARITY)?)?;
    Ok(at_end - at_start)
}

/// Single evaluation over the whole run window.
///
/// When the query carries the range placeholder it is substituted with the
/// run length in whole minutes, floored and never below one; otherwise the
/// query runs unmodified with a warning.
pub fn range_fitness(
    client: &dyn TelemetryClient,
    query: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<f64, KaiError> {
    debug!("calculating range fitness");
    let query = if query.contains(RANGE_PLACEHOLDER) {
        let minutes = ((end - start).num_seconds() / 60).max(1);
        query.replace(RANGE_PLACEHOLDER, &format!("{minutes}m"))
    } else {
        warn!(
            "query has no {RANGE_PLACEHOLDER} placeholder; evaluating with the range as written"
        );
        query.to_string()
    };
    last_value(client.query_range(&query, start, end, QUERY_GRANULARITY)?)
}

/// Scores a weighted SLO item list: overall fitness is the weighted sum,
/// with every item's raw and weighted score retained in declared order.
pub fn score_slo_items(
    client: &dyn TelemetryClient,
    items: &[SloItem],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<FitnessResult, KaiError> {
    let mut scores = Vec::with_capacity(items.len());
    let mut overall = 0.0;
    for item in items {
        let raw = fitness_value(client, &item.query, item.kind, start, end)?;
        let weighted = item.weight * raw;
        overall += weighted;
        scores.push(SloScore {
            id: item.id.clone(),
            fitness_score: raw,
            weighted_score: weighted,
        });
    }
    Ok(FitnessResult {
        fitness_score: overall,
        scores,
        ..FitnessResult::default()
    })
}

/// Last sample of the first series; an empty result is a fitness error.
fn last_value(series: Vec<crate::telemetry::TelemetrySeries>) -> Result<f64, KaiError> {
    series
        .first()
        .and_then(|s| s.values.last())
        .map(|(_, value)| *value)
        .ok_or_else(|| {
            KaiError::Fitness(ErrorInfo::new(
                "empty-query-result",
                "telemetry query returned no samples",
            ))
        })
}
