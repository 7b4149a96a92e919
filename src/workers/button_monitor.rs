//! Button monitor: push-buttons toggle the lifecycle of target workers.
//!
//! Each binding pairs one button with one target worker.  Every period
//! the monitor samples all buttons; a pressed edge on a button flips its
//! target between `Runnable` and `Suspended`.  Released edges and held
//! levels do nothing.
//!
//! ```text
//!   button ─sample─▶ Edge::Pressed ─▶ toggle
//!                                      ├─ Runnable  → suspend, flag=true,  outputs LOW
//!                                      └─ Suspended → flag=false, resume
//! ```
//!
//! The monitor is the only writer of the suspend flags.  Readers get a
//! [`SuspendFlagReader`] and cannot change anything.

use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use heapless::Vec;
use log::info;

use crate::app::ports::DigitalIo;
use crate::drivers::button::{Button, Edge};
use crate::error::{Resource, Result};
use crate::pins::PinId;
use crate::registry::{LifecycleState, WorkerHandle};
use crate::worker::{Worker, WorkerContext, silence};

/// Maximum number of button → worker bindings.
pub const MAX_BINDINGS: usize = 4;

// ───────────────────────────────────────────────────────────────
// Suspend flags
// ───────────────────────────────────────────────────────────────

/// Write side of a suspend flag.  Not `Clone`: exactly one writer.
pub struct SuspendFlagWriter {
    flag: Arc<AtomicBool>,
}

impl SuspendFlagWriter {
    fn set(&self, suspended: bool) {
        self.flag.store(suspended, Ordering::Release);
    }
}

/// Read-only view of one target's suspend flag.
#[derive(Debug, Clone)]
pub struct SuspendFlagReader {
    target: &'static str,
    button: PinId,
    flag: Arc<AtomicBool>,
}

impl SuspendFlagReader {
    /// Name of the worker this flag tracks.
    pub fn target(&self) -> &'static str {
        self.target
    }

    /// Button that toggles the target.
    pub fn button(&self) -> PinId {
        self.button
    }

    pub fn is_suspended(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Create a linked writer/reader pair.
pub fn suspend_flag(
    target: &'static str,
    button: PinId,
    initial: bool,
) -> (SuspendFlagWriter, SuspendFlagReader) {
    let flag = Arc::new(AtomicBool::new(initial));
    (
        SuspendFlagWriter {
            flag: Arc::clone(&flag),
        },
        SuspendFlagReader {
            target,
            button,
            flag,
        },
    )
}

// ───────────────────────────────────────────────────────────────
// ButtonMonitor
// ───────────────────────────────────────────────────────────────

struct Binding {
    button: Button,
    target: WorkerHandle,
    flag: SuspendFlagWriter,
}

impl Binding {
    fn toggle(&self, io: &dyn DigitalIo) {
        match self.target.state() {
            LifecycleState::Runnable => {
                self.target.suspend();
                self.flag.set(true);
                silence(io, self.target.control().owned_outputs());
                info!(
                    "monitor: GPIO {} suspended '{}'",
                    self.button.pin(),
                    self.target.name()
                );
            }
            LifecycleState::Suspended => {
                self.flag.set(false);
                self.target.resume();
                info!(
                    "monitor: GPIO {} resumed '{}'",
                    self.button.pin(),
                    self.target.name()
                );
            }
        }
    }
}

#[derive(Default)]
pub struct ButtonMonitor {
    bindings: Vec<Binding, MAX_BINDINGS>,
    toggles: u32,
}

impl ButtonMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let the button on `button_pin` toggle `target`.  Returns the read
    /// side of the target's suspend flag.
    pub fn bind(&mut self, button_pin: PinId, target: WorkerHandle) -> Result<SuspendFlagReader> {
        let initial = target.state() == LifecycleState::Suspended;
        let (flag, reader) = suspend_flag(target.name(), button_pin, initial);
        self.bindings
            .push(Binding {
                button: Button::new(button_pin),
                target,
                flag,
            })
            .map_err(|_| Resource::Worker)?;
        Ok(reader)
    }

    /// Sample every button once and apply pressed edges.  Returns the
    /// number of toggles performed.
    pub fn poll(&mut self, io: &dyn DigitalIo) -> usize {
        let mut toggled = 0;
        for b in &mut self.bindings {
            if b.button.sample(io) == Some(Edge::Pressed) {
                b.toggle(io);
                toggled += 1;
            }
        }
        self.toggles = self.toggles.wrapping_add(toggled as u32);
        toggled
    }

    /// Total toggles since start.
    pub fn toggles(&self) -> u32 {
        self.toggles
    }
}

impl Worker for ButtonMonitor {
    /// Configure the inputs and take the baseline sample, so a button
    /// already held at start-up does not toggle its target.
    fn configure(&mut self, io: &dyn DigitalIo) {
        for b in &mut self.bindings {
            b.button.configure(io);
            b.button.sample(io);
        }
    }

    fn step(&mut self, cx: &mut WorkerContext<'_>) {
        self.poll(cx.io());
    }
}
