//! pico-tasks library.
//!
//! A fixed set of periodic workers, a bounded queue and a software timer
//! on top of a small thread-per-task runtime.  Exposes every module for
//! integration testing; ESP-IDF specifics are guarded by
//! `#[cfg(feature = "espidf")]` inside the modules that need them.

#![deny(unused_must_use)]

pub mod app;
pub mod channel;
pub mod config;
pub mod error;
pub mod fault;
pub mod pins;
pub mod registry;
pub mod scheduler;
pub mod timer;
pub mod worker;
pub mod workers;

pub mod adapters;
pub mod drivers;
