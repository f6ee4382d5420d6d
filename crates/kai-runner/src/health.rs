//! Concurrent health-check sampling during a chaos run.
//!
//! The watcher owns one sampling thread per evaluation. It starts
//! immediately before the chaos subprocess launches and stops immediately
//! after the subprocess returns, on every path. The transport that actually
//! contacts an endpoint is an external collaborator injected as a
//! [`HealthProbe`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use kai_core::{HealthCheckConfig, HealthCheckEndpoint};

/// One observation of one endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSample {
    /// Endpoint display name.
    pub endpoint: String,
    /// When the sample was taken.
    pub at: DateTime<Utc>,
    /// Whether the endpoint answered successfully.
    pub success: bool,
    /// Response time in seconds.
    pub response_time: f64,
}

/// Transport that contacts one endpoint and reports the outcome.
pub trait HealthProbe: Send + Sync {
    /// Checks the endpoint once.
    fn check(&self, endpoint: &HealthCheckEndpoint) -> HealthSample;
}

/// Samples the configured endpoints on a background thread for the duration
/// of one evaluation.
pub struct HealthCheckWatcher {
    endpoints: Vec<HealthCheckEndpoint>,
    interval: Duration,
    probe: Arc<dyn HealthProbe>,
    stop: Arc<AtomicBool>,
    samples: Arc<Mutex<Vec<HealthSample>>>,
    handle: Option<JoinHandle<()>>,
}

impl HealthCheckWatcher {
    /// Creates a watcher for the configured endpoints.
    pub fn new(config: &HealthCheckConfig, probe: Arc<dyn HealthProbe>) -> Self {
        Self {
            endpoints: config.endpoints.clone(),
            interval: Duration::from_secs(config.interval_secs.max(1)),
            probe,
            stop: Arc::new(AtomicBool::new(false)),
            samples: Arc::new(Mutex::new(Vec::new())),
            handle: None,
        }
    }

    /// Starts the sampling thread. A watcher with no endpoints is inert.
    pub fn start(&mut self) {
        if self.endpoints.is_empty() || self.handle.is_some() {
            return;
        }
        self.stop.store(false, Ordering::SeqCst);
        let endpoints = self.endpoints.clone();
        let interval = self.interval;
        let probe = Arc::clone(&self.probe);
        let stop = Arc::clone(&self.stop);
        let samples = Arc::clone(&self.samples);
        self.handle = Some(thread::spawn(move || {
            while !stop.load(Ordering::SeqCst) {
                for endpoint in &endpoints {
                    let sample = probe.check(endpoint);
                    if let Ok(mut sink) = samples.lock() {
                        sink.push(sample);
                    }
                }
                // Sleep in short slices so stop() stays responsive.
                let mut remaining = interval;
                while !stop.load(Ordering::SeqCst) && remaining > Duration::ZERO {
                    let slice = remaining.min(Duration::from_millis(100));
                    thread::sleep(slice);
                    remaining = remaining.saturating_sub(slice);
                }
            }
        }));
    }

    /// Stops sampling and joins the thread. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("health-check sampling thread panicked");
            }
        }
    }

    /// Returns the samples collected so far, in observation order.
    pub fn results(&self) -> Vec<HealthSample> {
        self.samples
            .lock()
            .map(|sink| sink.clone())
            .unwrap_or_default()
    }
}

impl Drop for HealthCheckWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Fraction of samples that failed, in `[0, 1]`. Empty input scores 0.
pub fn summarize_success_rate(samples: &[HealthSample]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let failures = samples.iter().filter(|s| !s.success).count();
    failures as f64 / samples.len() as f64
}

/// Mean response time in seconds. Empty input scores 0.
pub fn summarize_response_time(samples: &[HealthSample]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let total: f64 = samples.iter().map(|s| s.response_time).sum();
    total / samples.len() as f64
}
