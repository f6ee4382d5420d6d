use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Utc;

use kai_core::config::{HealthCheckConfig, HealthCheckEndpoint};
use kai_runner::{
    summarize_response_time, summarize_success_rate, HealthCheckWatcher, HealthProbe, HealthSample,
};

struct FlakyProbe {
    calls: AtomicUsize,
}

impl HealthProbe for FlakyProbe {
    fn check(&self, endpoint: &HealthCheckEndpoint) -> HealthSample {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        HealthSample {
            endpoint: endpoint.name.clone(),
            at: Utc::now(),
            // Every other observation fails.
            success: call % 2 == 0,
            response_time: 0.1,
        }
    }
}

fn config(endpoints: &[&str]) -> HealthCheckConfig {
    HealthCheckConfig {
        endpoints: endpoints
            .iter()
            .map(|name| HealthCheckEndpoint {
                name: name.to_string(),
                url: format!("http://{name}.svc/healthz"),
            })
            .collect(),
        interval_secs: 1,
    }
}

#[test]
fn watcher_samples_every_endpoint_and_stops_cleanly() {
    let probe = Arc::new(FlakyProbe {
        calls: AtomicUsize::new(0),
    });
    let mut watcher = HealthCheckWatcher::new(&config(&["storefront", "cart"]), probe);

    watcher.start();
    // The first sampling round runs immediately after start.
    let mut tries = 0;
    while watcher.results().len() < 2 && tries < 100 {
        thread::sleep(Duration::from_millis(10));
        tries += 1;
    }
    watcher.stop();

    let results = watcher.results();
    assert!(results.len() >= 2, "one sample per endpoint per round");
    assert!(results.iter().any(|s| s.endpoint == "storefront"));
    assert!(results.iter().any(|s| s.endpoint == "cart"));

    // Stopped watchers collect nothing further.
    let settled = watcher.results().len();
    thread::sleep(Duration::from_millis(1200));
    assert_eq!(watcher.results().len(), settled);
}

#[test]
fn watcher_without_endpoints_is_inert() {
    let probe = Arc::new(FlakyProbe {
        calls: AtomicUsize::new(0),
    });
    let watcher_probe: Arc<dyn HealthProbe> = probe.clone();
    let mut watcher = HealthCheckWatcher::new(&config(&[]), watcher_probe);
    watcher.start();
    watcher.stop();
    assert!(watcher.results().is_empty());
    assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn stop_is_idempotent() {
    let probe = Arc::new(FlakyProbe {
        calls: AtomicUsize::new(0),
    });
    let mut watcher = HealthCheckWatcher::new(&config(&["storefront"]), probe);
    watcher.start();
    watcher.stop();
    watcher.stop();
}

fn sample(success: bool, response_time: f64) -> HealthSample {
    HealthSample {
        endpoint: "storefront".to_string(),
        at: Utc::now(),
        success,
        response_time,
    }
}

#[test]
fn success_rate_summary_is_the_failure_fraction() {
    let samples = vec![
        sample(true, 0.1),
        sample(false, 0.4),
        sample(true, 0.2),
        sample(false, 0.3),
    ];
    assert_eq!(summarize_success_rate(&samples), 0.5);
    assert_eq!(summarize_success_rate(&[]), 0.0);
}

#[test]
fn response_time_summary_is_the_mean() {
    let samples = vec![sample(true, 0.1), sample(true, 0.3)];
    assert!((summarize_response_time(&samples) - 0.2).abs() < 1e-9);
    assert_eq!(summarize_response_time(&[]), 0.0);
}
