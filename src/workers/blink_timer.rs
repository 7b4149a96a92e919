//! Timer callback that toggles one LED per firing.

use log::debug;

use crate::app::ports::DigitalIo;
use crate::pins::PinId;
use crate::timer::TimerCallback;

pub struct BlinkTimer {
    pin: PinId,
    level: bool,
}

impl BlinkTimer {
    pub fn new(pin: PinId) -> Self {
        Self { pin, level: false }
    }

    pub fn level(&self) -> bool {
        self.level
    }
}

impl TimerCallback for BlinkTimer {
    /// Configure the pin and drive it LOW before the first firing.
    fn init(&mut self, io: &dyn DigitalIo) {
        io.configure_output(self.pin);
        self.level = false;
        io.set_output(self.pin, false);
        debug!("timer: GPIO {} armed low", self.pin);
    }

    fn fire(&mut self, io: &dyn DigitalIo) {
        self.level = !self.level;
        io.set_output(self.pin, self.level);
    }
}
