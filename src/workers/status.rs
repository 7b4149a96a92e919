//! Periodic status report on the console.
//!
//! Read-only: the reporter holds [`SuspendFlagReader`]s and a console
//! sink, nothing else.  Output for two watched workers:
//!
//! ```text
//! ---- worker status ----
//! rgb-animator: RUNNING
//! buzzer: SUSPENDED
//! press button on GPIO 5 to toggle rgb-animator
//! press button on GPIO 6 to toggle buzzer
//! ```

use heapless::Vec;

use crate::app::ports::ConsoleSink;
use crate::error::{Resource, Result};
use crate::worker::{Worker, WorkerContext};
use crate::workers::button_monitor::{MAX_BINDINGS, SuspendFlagReader};

pub const STATUS_HEADER: &str = "---- worker status ----";

pub struct StatusReporter<S> {
    sink: S,
    flags: Vec<SuspendFlagReader, MAX_BINDINGS>,
}

impl<S: ConsoleSink> StatusReporter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            flags: Vec::new(),
        }
    }

    pub fn watch(&mut self, flag: SuspendFlagReader) -> Result<()> {
        self.flags.push(flag).map_err(|_| Resource::Worker.into())
    }

    /// Current snapshot, one line per entry.
    pub fn render(&self) -> std::vec::Vec<String> {
        let mut lines = std::vec::Vec::with_capacity(1 + 2 * self.flags.len());
        lines.push(STATUS_HEADER.to_owned());
        for f in &self.flags {
            let state = if f.is_suspended() { "SUSPENDED" } else { "RUNNING" };
            lines.push(format!("{}: {}", f.target(), state));
        }
        for f in &self.flags {
            lines.push(format!(
                "press button on GPIO {} to toggle {}",
                f.button(),
                f.target()
            ));
        }
        lines
    }

    /// Emit one snapshot to the sink.
    pub fn report(&mut self) {
        for line in self.render() {
            self.sink.line(&line);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: ConsoleSink> Worker for StatusReporter<S> {
    fn step(&mut self, _cx: &mut WorkerContext<'_>) {
        self.report();
    }
}
