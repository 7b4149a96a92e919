//! Terminal fault state.
//!
//! A resource-creation failure during startup cannot be retried: there is
//! no supervisor to restart the board.  Instead of spinning in an empty
//! loop, the failing path records the fault here, logs it, and parks the
//! calling task forever.  A watchdog or debugger can read [`current`] to
//! see why the system stopped.

use core::sync::atomic::{AtomicU8, Ordering};

use log::error;

use crate::error::{Error, Resource};

/// Observable system health.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultState {
    Healthy,
    Faulted(Error),
}

const HEALTHY: u8 = 0;
const TIMED_OUT: u8 = 0x10;

/// Encoded [`FaultState`]; written once, never cleared.
static FAULT: AtomicU8 = AtomicU8::new(HEALTHY);

fn encode(err: Error) -> u8 {
    match err {
        Error::ResourceCreation(r) => r as u8,
        Error::TimedOut => TIMED_OUT,
    }
}

fn decode(raw: u8) -> FaultState {
    let err = match raw {
        HEALTHY => return FaultState::Healthy,
        x if x == Resource::Channel as u8 => Error::ResourceCreation(Resource::Channel),
        x if x == Resource::Timer as u8 => Error::ResourceCreation(Resource::Timer),
        x if x == Resource::Worker as u8 => Error::ResourceCreation(Resource::Worker),
        _ => Error::TimedOut,
    };
    FaultState::Faulted(err)
}

/// Latch `err` as the system fault.  The first fault wins.
pub fn record(err: Error) -> FaultState {
    let _ = FAULT.compare_exchange(HEALTHY, encode(err), Ordering::AcqRel, Ordering::Acquire);
    current()
}

/// Current health, readable from any task.
pub fn current() -> FaultState {
    decode(FAULT.load(Ordering::Acquire))
}

/// Enter the terminal fault state.  Never returns.
pub fn halt(err: Error) -> ! {
    let state = record(err);
    error!("FAULT | {}, system halted ({:?})", err, state);
    loop {
        std::thread::park();
    }
}
