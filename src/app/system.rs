//! System assembly: the fixed worker set, the queue and the LED timer.
//!
//! ```text
//!  ┌───────────────┐        ┌──────────┐  u32 ×10  ┌──────────┐
//!  │ rgb-animator  │        │ producer │──────────▶│ consumer │── RX LED
//!  │ buzzer        │        └──────────┘           └──────────┘
//!  │ heartbeat     │
//!  └──────▲────────┘
//!         │ suspend / resume
//!  ┌──────┴─────────┐ flags ┌────────┐
//!  │ button-monitor │──────▶│ status │── console
//!  └────────────────┘       └────────┘
//!
//!  timer-svc ── led-timer (2000 ms) ── timer LED
//! ```
//!
//! Everything is created here, before the scheduler starts.  Any
//! creation failure is returned to the caller, which treats it as fatal.

use std::sync::Arc;

use embassy_time::Duration;
use log::info;

use crate::app::ports::ConsoleSink;
use crate::channel::BoundedChannel;
use crate::config::{QUEUE_CAPACITY, SystemConfig};
use crate::error::Result;
use crate::pins;
use crate::scheduler::{Scheduler, SharedIo};
use crate::timer::{TimerHandle, TimerSpec};
use crate::worker::WorkerSpec;
use crate::workers::animator::Animator;
use crate::workers::blink_timer::BlinkTimer;
use crate::workers::button_monitor::{ButtonMonitor, SuspendFlagReader};
use crate::workers::pulse::Pulse;
use crate::workers::queue::{Consumer, Producer};
use crate::workers::status::StatusReporter;

pub const RGB_ANIMATOR: &str = "rgb-animator";
pub const BUZZER: &str = "buzzer";
pub const HEARTBEAT: &str = "heartbeat";
pub const PRODUCER: &str = "producer";
pub const CONSUMER: &str = "consumer";
pub const BUTTON_MONITOR: &str = "button-monitor";
pub const STATUS: &str = "status";

pub const LED_TIMER: &str = "led-timer";
pub const LED_TIMER_ID: u32 = 1;

pub type ValueQueue = BoundedChannel<u32, QUEUE_CAPACITY>;

/// A fully wired, not yet started system.
pub struct System {
    pub scheduler: Scheduler,
    pub queue: Arc<ValueQueue>,
    /// Suspend flags of the button-controlled workers, button A first.
    pub flags: [SuspendFlagReader; 2],
    pub timer: TimerHandle,
}

fn ms(v: u32) -> Duration {
    Duration::from_millis(u64::from(v))
}

/// Create the queue, the timer and every worker.
pub fn build<S>(config: &SystemConfig, io: SharedIo, console: S) -> Result<System>
where
    S: ConsoleSink + 'static,
{
    let queue = Arc::new(ValueQueue::new()?);
    let mut sched = Scheduler::new(io);

    let timer = sched.create_timer(
        TimerSpec {
            name: LED_TIMER,
            period: ms(config.timer_period_ms),
            auto_reload: true,
            id: LED_TIMER_ID,
        },
        Box::new(BlinkTimer::new(pins::TIMER_LED_GPIO)),
    )?;

    // ── Button-controlled workers ────────────────────────────
    let rgb = sched.create_worker(
        WorkerSpec::new(RGB_ANIMATOR, ms(config.animator_period_ms), config.worker_priority),
        Box::new(Animator::rgb_cycle(pins::RGB_LINES)),
    )?;
    let buzzer = sched.create_worker(
        WorkerSpec::new(BUZZER, ms(config.buzzer_quiet_ms), config.worker_priority),
        Box::new(Pulse::new(
            pins::BUZZER_GPIO,
            config.buzzer_burst_cycles,
            ms(config.buzzer_half_period_ms),
        )),
    )?;

    // ── Free-running workers ─────────────────────────────────
    sched.create_worker(
        WorkerSpec::new(
            HEARTBEAT,
            ms(config.heartbeat_half_period_ms),
            config.worker_priority,
        ),
        Box::new(Animator::blinker(pins::HEARTBEAT_LED_GPIO)),
    )?;
    sched.create_worker(
        WorkerSpec::new(PRODUCER, ms(config.producer_period_ms), config.worker_priority),
        Box::new(Producer::new(Arc::clone(&queue), ms(config.send_timeout_ms))),
    )?;
    sched.create_worker(
        WorkerSpec::new(CONSUMER, ms(config.consumer_period_ms), config.worker_priority),
        Box::new(Consumer::new(
            Arc::clone(&queue),
            ms(config.receive_timeout_ms),
            pins::RX_LED_GPIO,
            ms(config.receive_pulse_ms),
        )),
    )?;

    // ── Control and reporting ────────────────────────────────
    let mut monitor = ButtonMonitor::new();
    let flag_a = monitor.bind(pins::BUTTON_A_GPIO, rgb)?;
    let flag_b = monitor.bind(pins::BUTTON_B_GPIO, buzzer)?;
    sched.create_worker(
        WorkerSpec::new(BUTTON_MONITOR, ms(config.button_sample_ms), config.monitor_priority),
        Box::new(monitor),
    )?;

    let mut status = StatusReporter::new(console);
    status.watch(flag_a.clone())?;
    status.watch(flag_b.clone())?;
    sched.create_worker(
        WorkerSpec::new(STATUS, ms(config.status_period_ms), config.status_priority),
        Box::new(status),
    )?;

    info!(
        "system: {} workers, queue depth {}, timer '{}' every {} ms",
        sched.registry().len(),
        QUEUE_CAPACITY,
        LED_TIMER,
        config.timer_period_ms
    );

    Ok(System {
        scheduler: sched,
        queue,
        flags: [flag_a, flag_b],
        timer,
    })
}
