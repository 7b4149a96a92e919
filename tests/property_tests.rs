//! Property tests for the channel, the button monitor and the animator.
//!
//! Runs on host only; proptest is not available for ESP32 targets.

#![cfg(not(target_os = "espidf"))]

use std::collections::VecDeque;

use embassy_time::Duration;
use pico_tasks::adapters::sim_io::SimulatedIo;
use pico_tasks::channel::BoundedChannel;
use pico_tasks::error::Error;
use pico_tasks::registry::{LifecycleState, WorkerControl, WorkerRegistry};
use pico_tasks::worker::{Worker, WorkerContext};
use pico_tasks::workers::animator::Animator;
use pico_tasks::workers::button_monitor::ButtonMonitor;
use proptest::prelude::*;

const NO_WAIT: Duration = Duration::from_ticks(0);

// ── Channel: FIFO and occupancy ───────────────────────────────

#[derive(Debug, Clone)]
enum QueueOp {
    Send(u32),
    Receive,
}

fn arb_queue_op() -> impl Strategy<Value = QueueOp> {
    prop_oneof![any::<u32>().prop_map(QueueOp::Send), Just(QueueOp::Receive)]
}

proptest! {
    /// The channel behaves exactly like a capped FIFO: full sends fail
    /// without overwriting, receives return values in send order.
    #[test]
    fn channel_matches_capped_fifo(ops in proptest::collection::vec(arb_queue_op(), 0..64)) {
        const CAP: usize = 4;
        let ch = BoundedChannel::<u32, CAP>::new().unwrap();
        let mut model = VecDeque::new();

        for op in ops {
            match op {
                QueueOp::Send(v) => {
                    let res = ch.send(v, NO_WAIT);
                    if model.len() < CAP {
                        prop_assert_eq!(res, Ok(()));
                        model.push_back(v);
                    } else {
                        prop_assert_eq!(res, Err(Error::TimedOut));
                    }
                }
                QueueOp::Receive => {
                    let res = ch.receive(NO_WAIT);
                    match model.pop_front() {
                        Some(v) => prop_assert_eq!(res, Ok(v)),
                        None => prop_assert_eq!(res, Err(Error::TimedOut)),
                    }
                }
            }
            prop_assert!(ch.len() <= CAP);
            prop_assert_eq!(ch.len(), model.len());
        }
    }
}

// ── Button monitor: one toggle per pressed edge ───────────────

proptest! {
    /// For any sampled press/release sequence, the target toggles once per
    /// released → pressed transition and never otherwise.  The flag always
    /// matches the lifecycle state.
    #[test]
    fn one_toggle_per_pressed_edge(samples in proptest::collection::vec(any::<bool>(), 0..64)) {
        let io = SimulatedIo::new();
        let mut reg = WorkerRegistry::new();
        let target = reg.register("target", 1, &[13]).unwrap();
        let mut monitor = ButtonMonitor::new();
        let flag = monitor.bind(5, target.clone()).unwrap();
        monitor.configure(&io);

        let mut previous = false;
        let mut expected_toggles = 0u32;
        for pressed in samples {
            io.drive_input(5, !pressed);
            let toggled = monitor.poll(&io);
            let edge = pressed && !previous;
            prop_assert_eq!(toggled, usize::from(edge));
            expected_toggles += u32::from(edge);
            previous = pressed;

            let suspended = expected_toggles % 2 == 1;
            prop_assert_eq!(flag.is_suspended(), suspended);
            prop_assert_eq!(target.state() == LifecycleState::Suspended, suspended);
            if suspended {
                prop_assert!(!io.level(13));
            }
        }
        prop_assert_eq!(monitor.toggles(), expected_toggles);
    }

    /// Repeated suspend/resume calls settle on the last requested state.
    #[test]
    fn suspend_resume_idempotent(ops in proptest::collection::vec(any::<bool>(), 1..32)) {
        let control = WorkerControl::new("w", 1, &[]).unwrap();
        for &suspend in &ops {
            if suspend { control.suspend(); } else { control.resume(); }
        }
        let want = if ops[ops.len() - 1] { LifecycleState::Suspended } else { LifecycleState::Runnable };
        prop_assert_eq!(control.state(), want);
    }
}

// ── Animator: order, wrap, one-hot ────────────────────────────

proptest! {
    #[test]
    fn rgb_cycle_one_hot_in_order(steps in 1usize..50) {
        const RGB: [u8; 3] = [13, 11, 12];
        let io = SimulatedIo::new();
        let control = WorkerControl::new("rgb", 1, &RGB).unwrap();
        let mut anim = Animator::rgb_cycle(RGB);
        anim.configure(&io);

        for step in 0..steps {
            let mut cx = WorkerContext::new(&io, &control);
            anim.step(&mut cx);
            let lit: Vec<usize> = (0..3).filter(|&i| io.level(RGB[i])).collect();
            prop_assert_eq!(lit, vec![step % 3]);
        }
    }
}
