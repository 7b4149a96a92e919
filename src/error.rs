//! Unified error types for the task runtime.
//!
//! Two failure classes exist: a runtime resource (channel, timer, worker)
//! could not be created, or a bounded channel operation ran past its
//! deadline.  All variants are `Copy` so they can be passed through the
//! fault state and worker loops without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the runtime funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A runtime object could not be allocated.  Fatal at startup.
    ResourceCreation(Resource),
    /// A channel send or receive deadline elapsed.  Recovered locally.
    TimedOut,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceCreation(r) => write!(f, "could not create {r}"),
            Self::TimedOut => write!(f, "operation timed out"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Resource kinds
// ---------------------------------------------------------------------------

/// The kind of runtime object whose creation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Resource {
    Channel = 1,
    Timer = 2,
    Worker = 3,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Channel => write!(f, "channel"),
            Self::Timer => write!(f, "timer"),
            Self::Worker => write!(f, "worker"),
        }
    }
}

impl From<Resource> for Error {
    fn from(r: Resource) -> Self {
        Self::ResourceCreation(r)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
