//! `embedded-hal` bridge: backs [`DigitalIo`] with real board pins.
//!
//! Board support code builds the HAL pin drivers (type-state already
//! selects direction and pull) and registers them here by GPIO number.
//! Pin errors are logged and swallowed: the runtime treats GPIO as
//! infallible once configured.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_hal::digital::{InputPin, OutputPin, PinState};
use heapless::Vec;
use log::{debug, warn};

use crate::app::ports::DigitalIo;
use crate::pins::PinId;

/// Maximum pins per direction.
pub const MAX_HAL_PINS: usize = 16;

type PinTable<P> = Mutex<CriticalSectionRawMutex, RefCell<Vec<(PinId, P), MAX_HAL_PINS>>>;

pub struct HalIo<O, I> {
    outputs: PinTable<O>,
    inputs: PinTable<I>,
}

impl<O, I> Default for HalIo<O, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O, I> HalIo<O, I> {
    pub fn new() -> Self {
        Self {
            outputs: Mutex::new(RefCell::new(Vec::new())),
            inputs: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    /// Register an output driver.  Returns `false` if the table is full.
    pub fn add_output(&mut self, id: PinId, pin: O) -> bool {
        self.outputs.get_mut().get_mut().push((id, pin)).is_ok()
    }

    /// Register an input driver.  Returns `false` if the table is full.
    pub fn add_input(&mut self, id: PinId, pin: I) -> bool {
        self.inputs.get_mut().get_mut().push((id, pin)).is_ok()
    }
}

impl<O, I> DigitalIo for HalIo<O, I>
where
    O: OutputPin + Send,
    I: InputPin + Send,
{
    fn configure_output(&self, pin: PinId) {
        // Direction is fixed by the driver type; start from a known LOW.
        self.set_output(pin, false);
    }

    fn configure_input_with_pullup(&self, pin: PinId) {
        debug!("hal_io: input {} configured by board support", pin);
    }

    fn set_output(&self, pin: PinId, level: bool) {
        self.outputs.lock(|cell| {
            let mut table = cell.borrow_mut();
            match table.iter_mut().find(|(id, _)| *id == pin) {
                Some((_, driver)) => {
                    if driver.set_state(PinState::from(level)).is_err() {
                        warn!("hal_io: write to GPIO {} failed", pin);
                    }
                }
                None => warn!("hal_io: GPIO {} is not a registered output", pin),
            }
        });
    }

    fn read_input(&self, pin: PinId) -> bool {
        self.inputs.lock(|cell| {
            let mut table = cell.borrow_mut();
            match table.iter_mut().find(|(id, _)| *id == pin) {
                Some((_, driver)) => driver.is_high().unwrap_or_else(|_| {
                    warn!("hal_io: read of GPIO {} failed", pin);
                    // Pull-up idle level: reads as "not pressed".
                    true
                }),
                None => {
                    warn!("hal_io: GPIO {} is not a registered input", pin);
                    true
                }
            }
        })
    }
}
