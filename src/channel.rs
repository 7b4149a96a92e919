//! Bounded inter-task channel with timed send/receive.
//!
//! Wraps an `embassy-sync` bounded MPMC channel so that blocking worker
//! threads can use it with an explicit deadline.  Both operations first
//! try the non-blocking path and only then park on the async future,
//! bounded by `embassy_time::with_timeout`.
//!
//! ```text
//! ┌──────────┐  send(v, t)  ┌───────────────┐  receive(t)  ┌──────────┐
//! │ Producer │─────────────▶│ [_|_|_|...|_] │─────────────▶│ Consumer │
//! └──────────┘              └───────────────┘              └──────────┘
//! ```
//!
//! An element is either fully enqueued or not at all: a send that times
//! out drops its future before the value reaches the queue.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TryReceiveError, TrySendError};
use embassy_time::{Duration, with_timeout};
use futures_lite::future::block_on;

use crate::error::{Error, Result};

/// Fixed-capacity FIFO shared between worker threads.
pub struct BoundedChannel<T, const N: usize> {
    inner: Channel<CriticalSectionRawMutex, T, N>,
}

impl<T, const N: usize> BoundedChannel<T, N> {
    /// Create an empty channel.  A zero capacity is rejected at compile
    /// time.  On the host the allocation itself cannot fail; the `Result`
    /// keeps this in line with the other creation calls.
    pub fn new() -> Result<Self> {
        const { assert!(N > 0, "BoundedChannel capacity must be non-zero") };
        Ok(Self {
            inner: Channel::new(),
        })
    }

    /// Enqueue `value`, waiting up to `timeout` for space.
    ///
    /// Returns [`Error::TimedOut`] if the queue stayed full; the value is
    /// dropped and the queue is unchanged.
    pub fn send(&self, value: T, timeout: Duration) -> Result<()> {
        let value = match self.inner.try_send(value) {
            Ok(()) => return Ok(()),
            Err(TrySendError::Full(v)) => v,
        };
        if timeout.as_ticks() == 0 {
            return Err(Error::TimedOut);
        }
        block_on(with_timeout(timeout, self.inner.send(value))).map_err(|_| Error::TimedOut)
    }

    /// Dequeue the oldest element, waiting up to `timeout` for one.
    pub fn receive(&self, timeout: Duration) -> Result<T> {
        match self.inner.try_receive() {
            Ok(v) => return Ok(v),
            Err(TryReceiveError::Empty) => {}
        }
        if timeout.as_ticks() == 0 {
            return Err(Error::TimedOut);
        }
        block_on(with_timeout(timeout, self.inner.receive())).map_err(|_| Error::TimedOut)
    }

    /// Current occupancy (`0..=N`).
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}
