//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  All tests run on the host with the simulated
//! GPIO bank; no real hardware required.

mod mock_io;
mod queue_tests;
mod system_tests;
mod timer_tests;
