//! Mock adapters and helpers for integration tests.
//!
//! GPIO is served by the library's `SimulatedIo`; this module adds a
//! console that records every line and a fast timing profile so the full
//! system can be exercised in milliseconds.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use pico_tasks::app::ports::ConsoleSink;
use pico_tasks::config::SystemConfig;
use pico_tasks::workers::status::STATUS_HEADER;

// ── RecordingConsole ──────────────────────────────────────────

/// Console sink whose lines stay readable after it has been moved into
/// the status worker.
#[derive(Clone, Default)]
pub struct RecordingConsole {
    lines: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Complete status reports, oldest first.  A report still being
    /// written (the last one) is left out.
    pub fn reports(&self) -> Vec<Vec<String>> {
        let lines = self.lines();
        let mut reports: Vec<Vec<String>> = Vec::new();
        for line in lines {
            if line == STATUS_HEADER {
                reports.push(Vec::new());
            }
            if let Some(current) = reports.last_mut() {
                current.push(line);
            }
        }
        reports.pop();
        reports
    }
}

impl ConsoleSink for RecordingConsole {
    fn line(&mut self, text: &str) {
        self.lines.lock().unwrap().push(text.to_owned());
    }
}

// ── Timing ────────────────────────────────────────────────────

/// Default layout with every period shrunk to a few milliseconds.
pub fn fast_config() -> SystemConfig {
    SystemConfig {
        producer_period_ms: 5,
        send_timeout_ms: 5,
        consumer_period_ms: 5,
        receive_timeout_ms: 5,
        receive_pulse_ms: 1,
        heartbeat_half_period_ms: 10,
        animator_period_ms: 5,
        timer_period_ms: 20,
        buzzer_burst_cycles: 3,
        buzzer_half_period_ms: 1,
        buzzer_quiet_ms: 5,
        button_sample_ms: 5,
        status_period_ms: 15,
        ..SystemConfig::default()
    }
}

/// Poll `cond` until it holds or two seconds pass.
pub fn wait_until(what: &str, mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        std::thread::sleep(Duration::from_millis(2));
    }
}

pub fn settle(ms: u64) {
    std::thread::sleep(Duration::from_millis(ms));
}
