//! Full system on the simulated GPIO bank.

use std::sync::Arc;

use pico_tasks::adapters::sim_io::{PinMode, SimulatedIo};
use pico_tasks::app::system::{self, BUTTON_MONITOR, BUZZER, CONSUMER, HEARTBEAT, PRODUCER, RGB_ANIMATOR, STATUS};
use pico_tasks::pins::{BUTTON_A_GPIO, BUTTON_B_GPIO, BUZZER_GPIO, RGB_LINES, RX_LED_GPIO};
use pico_tasks::registry::LifecycleState;

use crate::mock_io::{RecordingConsole, fast_config, settle, wait_until};

fn rgb_all_off(sim: &SimulatedIo) -> bool {
    RGB_LINES.iter().all(|&p| !sim.level(p))
}

/// Press and release one button, each held for a few sample periods.
fn click(sim: &SimulatedIo, pin: u8) {
    sim.press(pin);
    settle(25);
    sim.release(pin);
    settle(25);
}

#[test]
fn every_worker_makes_progress() {
    let sim = Arc::new(SimulatedIo::new());
    let system = system::build(&fast_config(), sim.clone(), RecordingConsole::new()).unwrap();
    let running = system.scheduler.start().unwrap();

    for name in [RGB_ANIMATOR, BUZZER, HEARTBEAT, PRODUCER, CONSUMER, STATUS] {
        let h = running.lookup(name).unwrap();
        wait_until(name, || h.control().iterations() >= 2);
    }
    wait_until("rx pulses", || sim.rising_edges(RX_LED_GPIO) >= 2);
    running.shutdown();
}

#[test]
fn button_a_suspends_and_resumes_animator() {
    let sim = Arc::new(SimulatedIo::new());
    let system = system::build(&fast_config(), sim.clone(), RecordingConsole::new()).unwrap();
    let [flag_a, flag_b] = system.flags.clone();
    let running = system.scheduler.start().unwrap();
    let rgb = running.lookup(RGB_ANIMATOR).unwrap();

    wait_until("button inputs configured", || {
        sim.mode(BUTTON_A_GPIO) == PinMode::InputPullUp
    });
    let monitor = running.lookup(BUTTON_MONITOR).unwrap();
    wait_until("button baseline sampled", || monitor.control().iterations() >= 1);
    wait_until("animator running", || rgb.control().iterations() >= 3);

    sim.press(BUTTON_A_GPIO);
    wait_until("flag A set", || flag_a.is_suspended());
    assert_eq!(rgb.state(), LifecycleState::Suspended);
    settle(30);

    assert!(rgb_all_off(&sim), "RGB lines left on after suspend");
    let frozen = rgb.control().iterations();
    settle(60);
    assert_eq!(rgb.control().iterations(), frozen);
    assert!(rgb_all_off(&sim));
    // Holding the button is not another edge.
    assert!(flag_a.is_suspended());
    assert!(!flag_b.is_suspended());

    sim.release(BUTTON_A_GPIO);
    settle(25);
    sim.press(BUTTON_A_GPIO);
    wait_until("flag A cleared", || !flag_a.is_suspended());
    wait_until("animator resumed", || rgb.control().iterations() > frozen);
    assert_eq!(rgb.state(), LifecycleState::Runnable);

    running.shutdown();
}

#[test]
fn button_b_silences_buzzer() {
    let sim = Arc::new(SimulatedIo::new());
    let system = system::build(&fast_config(), sim.clone(), RecordingConsole::new()).unwrap();
    let [_, flag_b] = system.flags.clone();
    let running = system.scheduler.start().unwrap();
    let buzzer = running.lookup(BUZZER).unwrap();

    wait_until("button inputs configured", || {
        sim.mode(BUTTON_B_GPIO) == PinMode::InputPullUp
    });
    let monitor = running.lookup(BUTTON_MONITOR).unwrap();
    wait_until("button baseline sampled", || monitor.control().iterations() >= 1);
    wait_until("buzzer bursting", || sim.rising_edges(BUZZER_GPIO) >= 3);

    click(&sim, BUTTON_B_GPIO);
    assert!(flag_b.is_suspended());
    assert_eq!(buzzer.state(), LifecycleState::Suspended);
    settle(20);

    let edges = sim.rising_edges(BUZZER_GPIO);
    settle(60);
    assert_eq!(sim.rising_edges(BUZZER_GPIO), edges);
    assert!(!sim.level(BUZZER_GPIO));

    click(&sim, BUTTON_B_GPIO);
    assert!(!flag_b.is_suspended());
    wait_until("buzzer bursting again", || sim.rising_edges(BUZZER_GPIO) > edges);

    running.shutdown();
}

#[test]
fn status_reports_repeat_without_presses() {
    let sim = Arc::new(SimulatedIo::new());
    let console = RecordingConsole::new();
    let system = system::build(&fast_config(), sim, console.clone()).unwrap();
    let running = system.scheduler.start().unwrap();

    wait_until("two status reports", || console.reports().len() >= 2);
    running.shutdown();

    let reports = console.reports();
    assert_eq!(reports[0], reports[1]);
    assert!(reports[0].iter().any(|l| l == "rgb-animator: RUNNING"));
    assert!(reports[0].iter().any(|l| l == "buzzer: RUNNING"));
}

#[test]
fn status_reflects_suspended_worker() {
    let sim = Arc::new(SimulatedIo::new());
    let console = RecordingConsole::new();
    let system = system::build(&fast_config(), sim.clone(), console.clone()).unwrap();
    let [flag_a, _] = system.flags.clone();
    let running = system.scheduler.start().unwrap();

    wait_until("button inputs configured", || {
        sim.mode(BUTTON_A_GPIO) == PinMode::InputPullUp
    });
    let monitor = running.lookup(BUTTON_MONITOR).unwrap();
    wait_until("button baseline sampled", || monitor.control().iterations() >= 1);
    sim.press(BUTTON_A_GPIO);
    wait_until("flag A set", || flag_a.is_suspended());

    let seen_before = console.reports().len();
    wait_until("fresh report", || console.reports().len() >= seen_before + 2);
    running.shutdown();

    let last = console.reports().pop().unwrap();
    assert!(last.iter().any(|l| l == "rgb-animator: SUSPENDED"));
    assert!(last.iter().any(|l| l == "buzzer: RUNNING"));
}
