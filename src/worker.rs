//! Periodic worker abstraction.
//!
//! A worker is a body that the scheduler runs in a loop on its own task:
//!
//! ```text
//!   configure ──▶ ┌─▶ wait while suspended ──▶ step ──▶ sleep(period) ─┐
//!                 └──────────────────────────────────────────────────┘
//! ```
//!
//! The sleep is a plain delay after each iteration, not a fixed-rate
//! tick, so execution time adds to the effective period.

use embassy_time::Duration;

use crate::app::ports::DigitalIo;
use crate::pins::PinId;
use crate::registry::WorkerControl;

/// Default task stack for workers (kilobytes).
pub const DEFAULT_STACK_KB: usize = 4;

/// Static description of a worker, fixed at creation.
#[derive(Debug, Clone, Copy)]
pub struct WorkerSpec {
    pub name: &'static str,
    /// Delay between the end of one iteration and the start of the next.
    pub period: Duration,
    /// Higher = more urgent.  Used once, when the task is spawned.
    pub priority: u8,
    pub stack_kb: usize,
}

impl WorkerSpec {
    pub const fn new(name: &'static str, period: Duration, priority: u8) -> Self {
        Self {
            name,
            period,
            priority,
            stack_kb: DEFAULT_STACK_KB,
        }
    }
}

/// The repeating body of a worker.
pub trait Worker: Send {
    /// One-time pin setup, run on the worker's task before the first step.
    fn configure(&mut self, _io: &dyn DigitalIo) {}

    /// One iteration.  May block on [`WorkerContext::delay`] or on a
    /// channel operation with a timeout.
    fn step(&mut self, cx: &mut WorkerContext<'_>);

    /// Output lines driven by this worker.  They are forced LOW when the
    /// worker is suspended.
    fn owned_outputs(&self) -> &[PinId] {
        &[]
    }
}

/// What a worker body may touch during one iteration.
pub struct WorkerContext<'a> {
    io: &'a dyn DigitalIo,
    control: &'a WorkerControl,
}

impl<'a> WorkerContext<'a> {
    pub fn new(io: &'a dyn DigitalIo, control: &'a WorkerControl) -> Self {
        Self { io, control }
    }

    pub fn io(&self) -> &dyn DigitalIo {
        self.io
    }

    pub fn name(&self) -> &'static str {
        self.control.name()
    }

    /// `true` once the worker has been suspended mid-iteration.  Long
    /// bodies check this to stop driving outputs early.
    pub fn suspended(&self) -> bool {
        self.control.is_suspended() || self.control.is_stopping()
    }

    /// Block the calling task for `d`.
    pub fn delay(&self, d: Duration) {
        self.control.sleep(d);
    }
}

/// Drive every owned output LOW.
pub fn silence(io: &dyn DigitalIo, outputs: &[PinId]) {
    for &pin in outputs {
        io.set_output(pin, false);
    }
}
