//! Application layer: port traits and system assembly.
//!
//! All interaction with hardware happens through the **port traits** in
//! [`ports`]; [`system`] wires the concrete worker set, channel and timer
//! onto a [`Scheduler`](crate::scheduler::Scheduler).

pub mod ports;
pub mod system;
