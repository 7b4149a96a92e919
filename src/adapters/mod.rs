//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements  | Connects to                     |
//! |------------|-------------|---------------------------------|
//! | `hal_io`   | DigitalIo   | `embedded-hal` pin drivers      |
//! | `sim_io`   | DigitalIo   | In-memory pin bank (host/tests) |
//! | `log_sink` | ConsoleSink | Serial log output               |

pub mod hal_io;
pub mod log_sink;
pub mod sim_io;
