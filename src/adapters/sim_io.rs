//! In-memory GPIO backend for host simulation and tests.
//!
//! Implements [`DigitalIo`] over a fixed bank of pin records guarded by
//! an `embassy-sync` blocking mutex.  Every write is counted and rising
//! edges on outputs are tallied, so tests can assert on waveforms
//! (e.g. the timer LED's square wave) without timing the threads.
//!
//! Inputs configured with pull-up idle HIGH; [`SimulatedIo::press`]
//! and [`SimulatedIo::release`] model an active-low push-button.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::warn;

use crate::app::ports::DigitalIo;
use crate::pins::PinId;

/// GPIO bank size (RP2040 exposes GPIO 0–29).
pub const SIM_PIN_COUNT: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PinMode {
    #[default]
    Unconfigured,
    Output,
    InputPullUp,
}

#[derive(Debug, Clone, Copy, Default)]
struct PinRecord {
    mode: PinMode,
    level: bool,
    /// Level forced from outside (a held button); pull-up does not win.
    driven: bool,
    writes: u32,
    rising_edges: u32,
}

pub struct SimulatedIo {
    pins: Mutex<CriticalSectionRawMutex, RefCell<[PinRecord; SIM_PIN_COUNT]>>,
}

impl Default for SimulatedIo {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedIo {
    pub fn new() -> Self {
        Self {
            pins: Mutex::new(RefCell::new([PinRecord::default(); SIM_PIN_COUNT])),
        }
    }

    fn with_pin<R>(&self, pin: PinId, f: impl FnOnce(&mut PinRecord) -> R) -> Option<R> {
        self.pins.lock(|cell| {
            let mut bank = cell.borrow_mut();
            bank.get_mut(pin as usize).map(f)
        })
    }

    /// Current electrical level of `pin` (`false` for unknown pins).
    pub fn level(&self, pin: PinId) -> bool {
        self.with_pin(pin, |p| p.level).unwrap_or(false)
    }

    pub fn mode(&self, pin: PinId) -> PinMode {
        self.with_pin(pin, |p| p.mode).unwrap_or_default()
    }

    /// Number of `set_output` calls seen on `pin`.
    pub fn writes(&self, pin: PinId) -> u32 {
        self.with_pin(pin, |p| p.writes).unwrap_or(0)
    }

    /// Number of LOW → HIGH transitions written to `pin`.
    pub fn rising_edges(&self, pin: PinId) -> u32 {
        self.with_pin(pin, |p| p.rising_edges).unwrap_or(0)
    }

    /// Force the level an input reads back.
    pub fn drive_input(&self, pin: PinId, level: bool) {
        if self
            .with_pin(pin, |p| {
                p.level = level;
                p.driven = true;
            })
            .is_none()
        {
            warn!("sim_io: drive_input on unknown pin {}", pin);
        }
    }

    /// Hold an active-low button down.
    pub fn press(&self, pin: PinId) {
        self.drive_input(pin, false);
    }

    /// Let an active-low button go (pull-up restores HIGH).
    pub fn release(&self, pin: PinId) {
        self.drive_input(pin, true);
    }
}

impl DigitalIo for SimulatedIo {
    fn configure_output(&self, pin: PinId) {
        if self
            .with_pin(pin, |p| {
                p.mode = PinMode::Output;
                p.level = false;
            })
            .is_none()
        {
            warn!("sim_io: configure_output on unknown pin {}", pin);
        }
    }

    fn configure_input_with_pullup(&self, pin: PinId) {
        if self
            .with_pin(pin, |p| {
                p.mode = PinMode::InputPullUp;
                if !p.driven {
                    p.level = true;
                }
            })
            .is_none()
        {
            warn!("sim_io: configure_input on unknown pin {}", pin);
        }
    }

    fn set_output(&self, pin: PinId, level: bool) {
        let written = self.with_pin(pin, |p| {
            if level && !p.level {
                p.rising_edges += 1;
            }
            p.level = level;
            p.writes += 1;
        });
        if written.is_none() {
            warn!("sim_io: set_output on unknown pin {}", pin);
        }
    }

    fn read_input(&self, pin: PinId) -> bool {
        self.level(pin)
    }
}
