//! Producer / consumer pair around the bounded queue.
//!
//! ```text
//! ┌──────────┐ counter ┌─────────────────┐ value ┌──────────┐ pulse ┌────────┐
//! │ Producer │────────▶│ BoundedChannel  │──────▶│ Consumer │──────▶│ RX LED │
//! └──────────┘         └─────────────────┘       └──────────┘       └────────┘
//! ```
//!
//! The producer only advances its counter after a successful send, so a
//! value that timed out is offered again next period.  The sequence seen
//! by the consumer therefore has no gaps.

use std::sync::Arc;

use embassy_time::Duration;
use log::{debug, trace};

use crate::app::ports::DigitalIo;
use crate::channel::BoundedChannel;
use crate::error::Result;
use crate::pins::PinId;
use crate::worker::{Worker, WorkerContext};

// ───────────────────────────────────────────────────────────────
// Producer
// ───────────────────────────────────────────────────────────────

pub struct Producer<const N: usize> {
    channel: Arc<BoundedChannel<u32, N>>,
    timeout: Duration,
    counter: u32,
}

impl<const N: usize> Producer<N> {
    pub fn new(channel: Arc<BoundedChannel<u32, N>>, timeout: Duration) -> Self {
        Self {
            channel,
            timeout,
            counter: 0,
        }
    }

    /// Next value to send (= number of successful sends so far).
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Offer the current counter value to the queue.
    pub fn offer(&mut self) -> Result<()> {
        self.channel.send(self.counter, self.timeout)?;
        trace!("producer: sent {}", self.counter);
        self.counter = self.counter.wrapping_add(1);
        Ok(())
    }
}

impl<const N: usize> Worker for Producer<N> {
    fn step(&mut self, _cx: &mut WorkerContext<'_>) {
        if let Err(e) = self.offer() {
            debug!("producer: value {} not sent ({})", self.counter, e);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Consumer
// ───────────────────────────────────────────────────────────────

pub struct Consumer<const N: usize> {
    channel: Arc<BoundedChannel<u32, N>>,
    timeout: Duration,
    led: [PinId; 1],
    pulse: Duration,
    last: Option<u32>,
    received: u32,
}

impl<const N: usize> Consumer<N> {
    pub fn new(
        channel: Arc<BoundedChannel<u32, N>>,
        timeout: Duration,
        led: PinId,
        pulse: Duration,
    ) -> Self {
        Self {
            channel,
            timeout,
            led: [led],
            pulse,
            last: None,
            received: 0,
        }
    }

    pub fn last_value(&self) -> Option<u32> {
        self.last
    }

    pub fn received(&self) -> u32 {
        self.received
    }
}

impl<const N: usize> Worker for Consumer<N> {
    fn configure(&mut self, io: &dyn DigitalIo) {
        io.configure_output(self.led[0]);
    }

    fn step(&mut self, cx: &mut WorkerContext<'_>) {
        // Empty queue: try again next period.
        let Ok(value) = self.channel.receive(self.timeout) else {
            return;
        };
        trace!("consumer: got {}", value);
        self.last = Some(value);
        self.received = self.received.wrapping_add(1);

        cx.io().set_output(self.led[0], true);
        cx.delay(self.pulse);
        cx.io().set_output(self.led[0], false);
    }

    fn owned_outputs(&self) -> &[PinId] {
        &self.led
    }
}
