//! Buzzer burst generator.
//!
//! One iteration = one burst: the output is toggled HIGH/LOW every
//! `half_period` for `cycles` full cycles, then left LOW.  The worker's
//! own period provides the quiet gap between bursts.  A burst stops early
//! if the worker is suspended, so the line is never left HIGH.

use embassy_time::Duration;

use crate::app::ports::DigitalIo;
use crate::pins::PinId;
use crate::worker::{Worker, WorkerContext};

pub struct Pulse {
    pin: [PinId; 1],
    cycles: u16,
    half_period: Duration,
    bursts: u32,
}

impl Pulse {
    pub fn new(pin: PinId, cycles: u16, half_period: Duration) -> Self {
        Self {
            pin: [pin],
            cycles,
            half_period,
            bursts: 0,
        }
    }

    /// Completed (or cut-short) bursts.
    pub fn bursts(&self) -> u32 {
        self.bursts
    }
}

impl Worker for Pulse {
    fn configure(&mut self, io: &dyn DigitalIo) {
        io.configure_output(self.pin[0]);
    }

    fn step(&mut self, cx: &mut WorkerContext<'_>) {
        let pin = self.pin[0];
        for _ in 0..self.cycles {
            if cx.suspended() {
                break;
            }
            cx.io().set_output(pin, true);
            cx.delay(self.half_period);
            cx.io().set_output(pin, false);
            cx.delay(self.half_period);
        }
        cx.io().set_output(pin, false);
        self.bursts = self.bursts.wrapping_add(1);
    }

    fn owned_outputs(&self) -> &[PinId] {
        &self.pin
    }
}
