//! LED timer waveform.

use std::sync::Arc;

use embassy_time::{Duration, Instant};
use pico_tasks::adapters::sim_io::SimulatedIo;
use pico_tasks::app::ports::DigitalIo;
use pico_tasks::pins::TIMER_LED_GPIO;
use pico_tasks::timer::{TimerService, TimerSpec};
use pico_tasks::workers::blink_timer::BlinkTimer;

use crate::mock_io::{settle, wait_until};

fn led_timer(period_ms: u64) -> TimerSpec {
    TimerSpec {
        name: "led-timer",
        period: Duration::from_millis(period_ms),
        auto_reload: true,
        id: 1,
    }
}

#[test]
fn level_flips_every_period() {
    let io = SimulatedIo::new();
    let mut timers = TimerService::new();
    let h = timers
        .add(led_timer(2000), Box::new(BlinkTimer::new(TIMER_LED_GPIO)), &io)
        .unwrap();
    timers.start(Instant::from_millis(0));

    let mut levels = Vec::new();
    for t in (1000..=12_000).step_by(1000) {
        timers.fire_due(&io, Instant::from_millis(t));
        levels.push(io.level(TIMER_LED_GPIO));
    }
    // Sampled every second: two samples per level, 4000 ms full cycle.
    assert_eq!(
        levels,
        [false, true, true, false, false, true, true, false, false, true, true, false]
    );
    assert_eq!(timers.fired_count(h.id), Some(6));
}

#[test]
fn service_task_drives_square_wave() {
    let sim = Arc::new(SimulatedIo::new());
    let io: Arc<dyn DigitalIo> = sim.clone();
    let mut sched = pico_tasks::scheduler::Scheduler::new(io);
    sched
        .create_timer(led_timer(10), Box::new(BlinkTimer::new(TIMER_LED_GPIO)))
        .unwrap();

    let running = sched.start().unwrap();
    wait_until("three rising edges", || sim.rising_edges(TIMER_LED_GPIO) >= 3);
    running.shutdown();

    let edges = sim.rising_edges(TIMER_LED_GPIO);
    settle(40);
    assert_eq!(sim.rising_edges(TIMER_LED_GPIO), edges, "timer fired after shutdown");
}
