//! Software timer service.
//!
//! Timers are fired by a dedicated service task, not by the workers.
//! Each timer has a fixed period counted from its previous deadline
//! (fixed rate, no drift), an auto-reload flag and an optional one-time
//! `init` phase.  `init` runs when the timer is created, so the
//! callback's output is in a defined state before the first firing.
//!
//! Callbacks run on the service task and must not block: no channel
//! operations, no delays.

use embassy_time::{Duration, Instant};
use heapless::Vec;
use log::{debug, warn};

use crate::app::ports::DigitalIo;
use crate::error::{Resource, Result};

/// Maximum number of software timers.
pub const MAX_TIMERS: usize = 4;

/// Callback invoked by the timer service.
pub trait TimerCallback: Send {
    /// One-time setup, executed before the first firing.
    fn init(&mut self, _io: &dyn DigitalIo) {}

    /// One firing.  Must return quickly.
    fn fire(&mut self, io: &dyn DigitalIo);
}

#[derive(Debug, Clone, Copy)]
pub struct TimerSpec {
    pub name: &'static str,
    pub period: Duration,
    /// Re-arm after each firing; one-shot timers fire once.
    pub auto_reload: bool,
    pub id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    pub id: u32,
    pub name: &'static str,
}

struct TimerEntry {
    spec: TimerSpec,
    callback: Box<dyn TimerCallback>,
    /// `None` until started, and after a one-shot has fired.
    next_fire: Option<Instant>,
    fired: u32,
}

/// All timers of one scheduler, fired in deadline order.
#[derive(Default)]
pub struct TimerService {
    entries: Vec<TimerEntry, MAX_TIMERS>,
}

impl TimerService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a timer and run its `init` phase.
    pub fn add(
        &mut self,
        spec: TimerSpec,
        mut callback: Box<dyn TimerCallback>,
        io: &dyn DigitalIo,
    ) -> Result<TimerHandle> {
        if spec.period.as_ticks() == 0 || self.entries.is_full() {
            return Err(Resource::Timer.into());
        }
        callback.init(io);
        let handle = TimerHandle {
            id: spec.id,
            name: spec.name,
        };
        self.entries
            .push(TimerEntry {
                spec,
                callback,
                next_fire: None,
                fired: 0,
            })
            .map_err(|_| Resource::Timer)?;
        Ok(handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Arm every timer; the first firing is one period after `now`.
    pub fn start(&mut self, now: Instant) {
        for e in &mut self.entries {
            e.next_fire = Some(now + e.spec.period);
        }
    }

    /// Earliest armed deadline, if any timer is armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().filter_map(|e| e.next_fire).min()
    }

    /// Fire every timer whose deadline is at or before `now`.
    /// Returns how many callbacks ran.
    pub fn fire_due(&mut self, io: &dyn DigitalIo, now: Instant) -> usize {
        let mut fired = 0;
        for e in &mut self.entries {
            let Some(deadline) = e.next_fire else {
                continue;
            };
            if deadline > now {
                continue;
            }
            e.callback.fire(io);
            e.fired = e.fired.wrapping_add(1);
            fired += 1;

            e.next_fire = if e.spec.auto_reload {
                let mut next = deadline + e.spec.period;
                if next <= now {
                    warn!("timer '{}': overran, skipping missed periods", e.spec.name);
                    next = now + e.spec.period;
                }
                Some(next)
            } else {
                debug!("timer '{}': one-shot expired", e.spec.name);
                None
            };
        }
        fired
    }

    /// Times the timer with `id` has fired.
    pub fn fired_count(&self, id: u32) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.spec.id == id)
            .map(|e| e.fired)
    }
}
