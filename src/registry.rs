//! Worker registry and per-worker control objects.
//!
//! Every worker gets one [`WorkerControl`] at creation time.  The control
//! object is the only place a worker's lifecycle state lives; suspend and
//! resume are compare-and-swap transitions on it, so repeated calls in the
//! same direction are no-ops.
//!
//! ```text
//!  Runnable ──suspend()──▶ Suspended
//!     ▲                        │
//!     └───────resume()─────────┘
//! ```
//!
//! A [`WorkerHandle`] can only be obtained from the registry that created
//! the worker, so a control call on an unregistered worker cannot be
//! written.

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};
use std::sync::Arc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, with_deadline};
use futures_lite::future::block_on;
use heapless::Vec;

use crate::error::{Resource, Result};
use crate::pins::PinId;

/// Maximum number of workers one scheduler can host.
pub const MAX_WORKERS: usize = 8;

/// Maximum number of output lines a single worker may own.
pub const MAX_OWNED_OUTPUTS: usize = 4;

// ───────────────────────────────────────────────────────────────
// Lifecycle
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    Runnable = 0,
    Suspended = 1,
}

impl LifecycleState {
    fn from_u8(raw: u8) -> Self {
        if raw == Self::Suspended as u8 {
            Self::Suspended
        } else {
            Self::Runnable
        }
    }
}

// ───────────────────────────────────────────────────────────────
// WorkerControl
// ───────────────────────────────────────────────────────────────

/// Shared control block for one worker thread.
pub struct WorkerControl {
    name: &'static str,
    priority: u8,
    state: AtomicU8,
    stopping: AtomicBool,
    iterations: AtomicU32,
    /// Raised on resume and on stop; wakes a parked or sleeping worker.
    wake: Signal<CriticalSectionRawMutex, ()>,
    owned_outputs: Vec<PinId, MAX_OWNED_OUTPUTS>,
}

impl WorkerControl {
    /// Build a standalone control block.  Outputs beyond
    /// [`MAX_OWNED_OUTPUTS`] are rejected as a creation failure.
    pub fn new(name: &'static str, priority: u8, owned_outputs: &[PinId]) -> Result<Self> {
        let owned_outputs =
            Vec::from_slice(owned_outputs).map_err(|()| Resource::Worker)?;
        Ok(Self {
            name,
            priority,
            state: AtomicU8::new(LifecycleState::Runnable as u8),
            stopping: AtomicBool::new(false),
            iterations: AtomicU32::new(0),
            wake: Signal::new(),
            owned_outputs,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_suspended(&self) -> bool {
        self.state() == LifecycleState::Suspended
    }

    /// Output lines this worker drives; cleared when it is suspended.
    pub fn owned_outputs(&self) -> &[PinId] {
        &self.owned_outputs
    }

    /// Completed iterations since start.
    pub fn iterations(&self) -> u32 {
        self.iterations.load(Ordering::Acquire)
    }

    /// Move to `Suspended`.  Returns `true` if the state changed.
    pub fn suspend(&self) -> bool {
        self.transition(LifecycleState::Runnable, LifecycleState::Suspended)
    }

    /// Move to `Runnable` and wake the worker.  Returns `true` if the
    /// state changed.
    pub fn resume(&self) -> bool {
        let changed = self.transition(LifecycleState::Suspended, LifecycleState::Runnable);
        if changed {
            self.wake.signal(());
        }
        changed
    }

    fn transition(&self, from: LifecycleState, to: LifecycleState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    // ── Worker-thread side ───────────────────────────────────

    pub(crate) fn request_stop(&self) {
        self.stopping.store(true, Ordering::Release);
        self.wake.signal(());
    }

    pub(crate) fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::Acquire)
    }

    pub(crate) fn record_iteration(&self) {
        self.iterations.fetch_add(1, Ordering::AcqRel);
    }

    /// Park while suspended.  Returns `false` if a stop was requested.
    pub(crate) fn wait_until_runnable(&self) -> bool {
        while self.is_suspended() && !self.is_stopping() {
            block_on(self.wake.wait());
        }
        !self.is_stopping()
    }

    /// Sleep for `period`, cut short only by a stop request.
    pub(crate) fn sleep(&self, period: Duration) {
        let deadline = Instant::now() + period;
        while !self.is_stopping() {
            if block_on(with_deadline(deadline, self.wake.wait())).is_err() {
                break;
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// WorkerHandle
// ───────────────────────────────────────────────────────────────

/// Opaque reference to a registered worker.
#[derive(Clone)]
pub struct WorkerHandle {
    index: u8,
    control: Arc<WorkerControl>,
}

impl WorkerHandle {
    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn name(&self) -> &'static str {
        self.control.name()
    }

    pub fn state(&self) -> LifecycleState {
        self.control.state()
    }

    /// Idempotent: suspending a suspended worker changes nothing.
    pub fn suspend(&self) -> bool {
        self.control.suspend()
    }

    /// Idempotent: resuming a runnable worker changes nothing.
    pub fn resume(&self) -> bool {
        self.control.resume()
    }

    pub fn control(&self) -> &Arc<WorkerControl> {
        &self.control
    }
}

impl core::fmt::Debug for WorkerHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WorkerHandle")
            .field("index", &self.index)
            .field("name", &self.control.name())
            .field("state", &self.control.state())
            .finish()
    }
}

// ───────────────────────────────────────────────────────────────
// WorkerRegistry
// ───────────────────────────────────────────────────────────────

/// Identity → control object map, built once before the scheduler starts.
#[derive(Default)]
pub struct WorkerRegistry {
    controls: Vec<Arc<WorkerControl>, MAX_WORKERS>,
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a worker.  Names must be unique; a duplicate name or a
    /// full table is a creation failure.
    pub fn register(
        &mut self,
        name: &'static str,
        priority: u8,
        owned_outputs: &[PinId],
    ) -> Result<WorkerHandle> {
        if self.lookup(name).is_some() {
            return Err(Resource::Worker.into());
        }
        let control = Arc::new(WorkerControl::new(name, priority, owned_outputs)?);
        let index = self.controls.len() as u8;
        self.controls
            .push(Arc::clone(&control))
            .map_err(|_| Resource::Worker)?;
        Ok(WorkerHandle { index, control })
    }

    pub fn lookup(&self, name: &str) -> Option<WorkerHandle> {
        self.controls
            .iter()
            .enumerate()
            .find(|(_, c)| c.name() == name)
            .map(|(i, c)| WorkerHandle {
                index: i as u8,
                control: Arc::clone(c),
            })
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<WorkerControl>> {
        self.controls.iter()
    }

    pub(crate) fn stop_all(&self) {
        for c in &self.controls {
            c.request_stop();
        }
    }
}
