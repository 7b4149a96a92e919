//! Port traits: the boundary between the task runtime and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ workers / timer callbacks
//! ```
//!
//! Driven adapters (GPIO backends, console sinks) implement these traits.
//! Workers and timer callbacks receive them as `&dyn` references, so the
//! coordination logic never touches registers directly.
//!
//! ## Contract
//!
//! - Every [`DigitalIo`] call is idempotent, non-blocking and infallible
//!   once the pin has been configured.
//! - Implementations are shared between worker threads and the timer
//!   service, hence the `Send + Sync` bound.

use crate::pins::PinId;

// ───────────────────────────────────────────────────────────────
// Digital I/O port (driven adapter: runtime ↔ GPIO)
// ───────────────────────────────────────────────────────────────

/// The two capabilities the runtime needs from the board, plus the
/// one-time configuration calls that precede them.
pub trait DigitalIo: Send + Sync {
    /// Configure `pin` as a push-pull digital output.
    fn configure_output(&self, pin: PinId);

    /// Configure `pin` as a digital input with the internal pull-up on.
    fn configure_input_with_pullup(&self, pin: PinId);

    /// Drive `pin` to `level` (`true` = HIGH).
    fn set_output(&self, pin: PinId, level: bool);

    /// Read the (electrically settled) level of `pin`.
    fn read_input(&self, pin: PinId) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Console port (driven adapter: runtime → serial console)
// ───────────────────────────────────────────────────────────────

/// Line-oriented human-readable output.  Not machine-parsed.
pub trait ConsoleSink: Send {
    fn line(&mut self, text: &str);
}
