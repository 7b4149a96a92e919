//! Task scheduler: worker creation, timer creation, start.
//!
//! Built in two phases so that every worker is registered before any of
//! them runs:
//!
//! ```text
//!  Scheduler::new ─▶ create_worker × N ─▶ create_timer × M ─▶ start()
//!                                                              │
//!                        ┌─────────────────────────────────────┘
//!                        ▼
//!               RunningScheduler ── run_forever() -> !
//!                                └─ shutdown()        (tests)
//! ```
//!
//! Each worker runs on its own task.  Timers share one service task.
//! Priorities are handed to the task spawner once and never revisited.

use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, with_deadline};
use futures_lite::future::block_on;
use log::{debug, error, info, warn};

use crate::app::ports::DigitalIo;
use crate::drivers::task_pin::spawn_task;
use crate::error::{Error, Resource, Result};
use crate::registry::{WorkerControl, WorkerHandle, WorkerRegistry};
use crate::timer::{TimerCallback, TimerHandle, TimerService, TimerSpec};
use crate::worker::{Worker, WorkerContext, WorkerSpec, silence};

/// GPIO backend shared by every task.
pub type SharedIo = Arc<dyn DigitalIo>;

/// The timer service outranks every worker so firings stay on time.
pub const TIMER_SERVICE_PRIORITY: u8 = 3;
const TIMER_SERVICE_STACK_KB: usize = 4;

struct PendingWorker {
    spec: WorkerSpec,
    body: Box<dyn Worker>,
    handle: WorkerHandle,
}

/// Stop request for the timer service task.
struct ServiceStop {
    flag: AtomicBool,
    wake: Signal<CriticalSectionRawMutex, ()>,
}

impl ServiceStop {
    fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
            wake: Signal::new(),
        }
    }

    fn raise(&self) {
        self.flag.store(true, Ordering::Release);
        self.wake.signal(());
    }

    fn is_raised(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

// ───────────────────────────────────────────────────────────────
// Scheduler (build phase)
// ───────────────────────────────────────────────────────────────

pub struct Scheduler {
    io: SharedIo,
    registry: WorkerRegistry,
    pending: Vec<PendingWorker>,
    timers: TimerService,
}

impl Scheduler {
    pub fn new(io: SharedIo) -> Self {
        Self {
            io,
            registry: WorkerRegistry::new(),
            pending: Vec::new(),
            timers: TimerService::new(),
        }
    }

    /// Register a worker.  It does not run until [`start`](Self::start).
    pub fn create_worker(&mut self, spec: WorkerSpec, body: Box<dyn Worker>) -> Result<WorkerHandle> {
        if spec.period.as_ticks() == 0 {
            return Err(Resource::Worker.into());
        }
        let handle = self
            .registry
            .register(spec.name, spec.priority, body.owned_outputs())
            .inspect_err(|e| error!("sched: worker '{}': {}", spec.name, e))?;
        debug!(
            "sched: created '{}' (period={}ms, pri={})",
            spec.name,
            spec.period.as_millis(),
            spec.priority
        );
        self.pending.push(PendingWorker {
            spec,
            body,
            handle: handle.clone(),
        });
        Ok(handle)
    }

    /// Register a timer and run its init phase immediately.
    pub fn create_timer(
        &mut self,
        spec: TimerSpec,
        callback: Box<dyn TimerCallback>,
    ) -> Result<TimerHandle> {
        self.timers
            .add(spec, callback, &*self.io)
            .inspect_err(|e| error!("sched: timer '{}': {}", spec.name, e))
    }

    pub fn registry(&self) -> &WorkerRegistry {
        &self.registry
    }

    pub fn io(&self) -> &SharedIo {
        &self.io
    }

    /// Spawn every task.  On failure, tasks already spawned are stopped
    /// and the error is returned for the caller to treat as fatal.
    pub fn start(self) -> Result<RunningScheduler> {
        let Self {
            io,
            registry,
            mut pending,
            timers,
        } = self;

        // Most urgent first, so it is running before lower-priority peers.
        pending.sort_by(|a, b| b.spec.priority.cmp(&a.spec.priority));

        let timer_stop = Arc::new(ServiceStop::new());
        let mut running = RunningScheduler {
            registry,
            tasks: Vec::new(),
            timer_stop: Arc::clone(&timer_stop),
        };

        for PendingWorker { spec, body, handle } in pending {
            let control = Arc::clone(handle.control());
            let io = Arc::clone(&io);
            let period = spec.period;
            match spawn_task(spec.name, spec.priority, spec.stack_kb, move || {
                run_worker(body, &control, &io, period);
            }) {
                Ok(task) => running.tasks.push(task),
                Err(e) => {
                    error!("sched: spawning '{}' failed: {}", spec.name, e);
                    running.shutdown();
                    return Err(Error::ResourceCreation(Resource::Worker));
                }
            }
        }

        if !timers.is_empty() {
            let io = Arc::clone(&io);
            match spawn_task(
                "timer-svc",
                TIMER_SERVICE_PRIORITY,
                TIMER_SERVICE_STACK_KB,
                move || run_timer_service(timers, &io, &timer_stop),
            ) {
                Ok(task) => running.tasks.push(task),
                Err(e) => {
                    error!("sched: spawning timer service failed: {}", e);
                    running.shutdown();
                    return Err(Error::ResourceCreation(Resource::Timer));
                }
            }
        }

        info!(
            "sched: started {} workers, {} tasks total",
            running.registry.len(),
            running.tasks.len()
        );
        Ok(running)
    }
}

// ───────────────────────────────────────────────────────────────
// RunningScheduler
// ───────────────────────────────────────────────────────────────

pub struct RunningScheduler {
    registry: WorkerRegistry,
    tasks: Vec<JoinHandle<()>>,
    timer_stop: Arc<ServiceStop>,
}

impl RunningScheduler {
    pub fn registry(&self) -> &WorkerRegistry {
        &self.registry
    }

    pub fn lookup(&self, name: &str) -> Option<WorkerHandle> {
        self.registry.lookup(name)
    }

    /// Hand the CPU to the tasks for good.
    pub fn run_forever(self) -> ! {
        for task in self.tasks {
            let name = task.thread().name().unwrap_or("?").to_owned();
            if task.join().is_err() {
                error!("sched: task '{}' panicked", name);
            }
        }
        // Every task exited: nothing is left to schedule.
        loop {
            std::thread::park();
        }
    }

    /// Stop every task and wait for it.  Workers finish their current
    /// iteration first.
    pub fn shutdown(self) {
        self.registry.stop_all();
        self.timer_stop.raise();
        for task in self.tasks {
            if task.join().is_err() {
                warn!("sched: task panicked during shutdown");
            }
        }
        info!("sched: stopped");
    }
}

// ───────────────────────────────────────────────────────────────
// Task bodies
// ───────────────────────────────────────────────────────────────

fn run_worker(mut body: Box<dyn Worker>, control: &WorkerControl, io: &SharedIo, period: Duration) {
    let io: &dyn DigitalIo = &**io;
    body.configure(io);
    debug!("sched: '{}' running", control.name());

    while control.wait_until_runnable() {
        {
            let mut cx = WorkerContext::new(io, control);
            body.step(&mut cx);
        }
        control.record_iteration();

        // Suspended mid-iteration: the body may have re-driven an output
        // after the suspender cleared it.
        if control.is_suspended() {
            silence(io, control.owned_outputs());
        }
        if control.is_stopping() {
            break;
        }
        control.sleep(period);
    }
    debug!("sched: '{}' stopped", control.name());
}

fn run_timer_service(mut timers: TimerService, io: &SharedIo, stop: &ServiceStop) {
    let io: &dyn DigitalIo = &**io;
    timers.start(Instant::now());
    info!("timer: service started ({} timers)", timers.len());

    while !stop.is_raised() {
        let Some(deadline) = timers.next_deadline() else {
            block_on(stop.wake.wait());
            continue;
        };
        if block_on(with_deadline(deadline, stop.wake.wait())).is_ok() {
            continue;
        }
        timers.fire_due(io, Instant::now());
    }
    debug!("timer: service stopped");
}
