//! Sampled push-button with edge detection.
//!
//! ## Hardware
//!
//! Active-low momentary switch with the internal pull-up enabled. The
//! owner samples the line once per period; that period is the debounce
//! window, so contact bounce shorter than one period is never seen as two
//! transitions.
//!
//! ## Edges
//!
//! | Previous sample | Current sample | Result            |
//! |-----------------|----------------|-------------------|
//! | released        | pressed        | `Edge::Pressed`   |
//! | pressed         | released       | `Edge::Released`  |
//! | same            | same           | `None`            |

use crate::app::ports::DigitalIo;
use crate::pins::PinId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Rising edge of the logical "pressed" signal.
    Pressed,
    Released,
}

pub struct Button {
    pin: PinId,
    /// Last sampled logical state; `None` until the first sample.
    last_pressed: Option<bool>,
}

impl Button {
    pub fn new(pin: PinId) -> Self {
        Self {
            pin,
            last_pressed: None,
        }
    }

    /// GPIO pin this button is attached to.
    pub fn pin(&self) -> PinId {
        self.pin
    }

    pub fn configure(&self, io: &dyn DigitalIo) {
        io.configure_input_with_pullup(self.pin);
    }

    /// Read the line and compare with the previous sample.
    pub fn sample(&mut self, io: &dyn DigitalIo) -> Option<Edge> {
        let pressed = !io.read_input(self.pin);
        self.update(pressed)
    }

    /// Feed one logical sample.  The first sample only sets the baseline,
    /// so a button held at power-on is not a press.
    pub fn update(&mut self, pressed: bool) -> Option<Edge> {
        let edge = match (self.last_pressed, pressed) {
            (Some(false), true) => Some(Edge::Pressed),
            (Some(true), false) => Some(Edge::Released),
            _ => None,
        };
        self.last_pressed = Some(pressed);
        edge
    }

    pub fn is_pressed(&self) -> bool {
        self.last_pressed == Some(true)
    }
}
