//! Log-based console adapter.
//!
//! Implements [`ConsoleSink`] by writing each line through the `log`
//! facade (serial console on the device, the tracing fmt subscriber on
//! the host simulator).

use log::info;

use crate::app::ports::ConsoleSink;

/// Adapter that logs every console line at `info` level.
#[derive(Debug, Default)]
pub struct LogConsole;

impl LogConsole {
    pub fn new() -> Self {
        Self
    }
}

impl ConsoleSink for LogConsole {
    fn line(&mut self, text: &str) {
        info!("{}", text);
    }
}
