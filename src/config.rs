//! System configuration parameters
//!
//! Every timing constant and static priority used by the task set.
//! Values can be overridden from a JSON file on the host simulator;
//! missing fields fall back to the defaults below.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Depth of the producer → consumer queue (elements of `u32`).
pub const QUEUE_CAPACITY: usize = 10;

/// The button monitor must sample at least this often for a brief human
/// press to be seen.
pub const MAX_BUTTON_SAMPLE_MS: u32 = 100;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Queue demo ---
    /// Producer period (milliseconds)
    pub producer_period_ms: u32,
    /// Maximum wait for queue space (milliseconds)
    pub send_timeout_ms: u32,
    /// Consumer polling period (milliseconds)
    pub consumer_period_ms: u32,
    /// Maximum wait for a queued value (milliseconds)
    pub receive_timeout_ms: u32,
    /// RX LED on-time per received value (milliseconds)
    pub receive_pulse_ms: u32,

    // --- LEDs ---
    /// Heartbeat LED half-period (milliseconds)
    pub heartbeat_half_period_ms: u32,
    /// Time spent on each RGB colour (milliseconds)
    pub animator_period_ms: u32,
    /// Repeating timer period (milliseconds)
    pub timer_period_ms: u32,

    // --- Buzzer ---
    /// Number of on/off toggles per burst
    pub buzzer_burst_cycles: u16,
    /// Half-period of the buzzer square wave (milliseconds)
    pub buzzer_half_period_ms: u32,
    /// Silence between bursts (milliseconds)
    pub buzzer_quiet_ms: u32,

    // --- Control ---
    /// Button sampling period, doubles as the debounce window (milliseconds)
    pub button_sample_ms: u32,
    /// Status report period (milliseconds)
    pub status_period_ms: u32,

    // --- Priorities (higher = more urgent) ---
    pub worker_priority: u8,
    pub monitor_priority: u8,
    pub status_priority: u8,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Queue demo
            producer_period_ms: 500,
            send_timeout_ms: 100,
            consumer_period_ms: 100,
            receive_timeout_ms: 100,
            receive_pulse_ms: 50,

            // LEDs
            heartbeat_half_period_ms: 3000,
            animator_period_ms: 1000,
            timer_period_ms: 2000,

            // Buzzer
            buzzer_burst_cycles: 100,
            buzzer_half_period_ms: 2,
            buzzer_quiet_ms: 1000,

            // Control
            button_sample_ms: 50,
            status_period_ms: 5000,

            // Priorities
            worker_priority: 1,
            monitor_priority: 2,
            status_priority: 0,
        }
    }
}

impl SystemConfig {
    /// Parse a JSON document; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the runtime cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            (self.producer_period_ms, "producer_period_ms must be > 0"),
            (self.send_timeout_ms, "send_timeout_ms must be > 0"),
            (self.consumer_period_ms, "consumer_period_ms must be > 0"),
            (self.receive_timeout_ms, "receive_timeout_ms must be > 0"),
            (self.receive_pulse_ms, "receive_pulse_ms must be > 0"),
            (self.heartbeat_half_period_ms, "heartbeat_half_period_ms must be > 0"),
            (self.animator_period_ms, "animator_period_ms must be > 0"),
            (self.timer_period_ms, "timer_period_ms must be > 0"),
            (self.buzzer_half_period_ms, "buzzer_half_period_ms must be > 0"),
            (self.buzzer_quiet_ms, "buzzer_quiet_ms must be > 0"),
            (self.button_sample_ms, "button_sample_ms must be > 0"),
            (self.status_period_ms, "status_period_ms must be > 0"),
        ];
        if let Some((_, msg)) = periods.iter().find(|(v, _)| *v == 0) {
            return Err(ConfigError::ValidationFailed(msg));
        }
        if self.buzzer_burst_cycles == 0 {
            return Err(ConfigError::ValidationFailed("buzzer_burst_cycles must be > 0"));
        }
        if self.button_sample_ms > MAX_BUTTON_SAMPLE_MS {
            return Err(ConfigError::ValidationFailed(
                "button_sample_ms too long to catch a short press",
            ));
        }
        if self.status_priority >= self.worker_priority
            || self.status_priority >= self.monitor_priority
        {
            return Err(ConfigError::ValidationFailed(
                "status_priority must be the lowest priority",
            ));
        }
        Ok(())
    }
}

/// Errors from loading or validating [`SystemConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid JSON for this schema.
    Malformed,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "config malformed"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
