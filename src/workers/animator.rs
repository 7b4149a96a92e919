//! Frame animator: cycles a set of output lines through fixed frames.
//!
//! Each frame is a bitmask over the animator's lines (bit *i* drives
//! line *i*).  One frame is shown per iteration; the cycle wraps from
//! the last frame back to the first and starts at frame 0.  Nothing but
//! time moves it forward.
//!
//! | Preset        | Lines   | Frames                     |
//! |---------------|---------|----------------------------|
//! | `rgb_cycle`   | R, G, B | `001`, `010`, `100`        |
//! | `blinker`     | 1 LED   | off, on                    |

use heapless::Vec;

use crate::app::ports::DigitalIo;
use crate::error::{Resource, Result};
use crate::pins::PinId;
use crate::registry::MAX_OWNED_OUTPUTS;
use crate::worker::{Worker, WorkerContext};

pub const MAX_FRAMES: usize = 8;

/// Bitmask of lines that are HIGH in one frame.
pub type Frame = u8;

pub struct Animator {
    lines: Vec<PinId, MAX_OWNED_OUTPUTS>,
    frames: Vec<Frame, MAX_FRAMES>,
    /// Frame shown by the next iteration.
    next: usize,
}

impl Animator {
    pub fn new(lines: &[PinId], frames: &[Frame]) -> Result<Self> {
        if frames.is_empty() {
            return Err(Resource::Worker.into());
        }
        Ok(Self {
            lines: Vec::from_slice(lines).map_err(|()| Resource::Worker)?,
            frames: Vec::from_slice(frames).map_err(|()| Resource::Worker)?,
            next: 0,
        })
    }

    /// One colour at a time: red, green, blue.
    pub fn rgb_cycle(lines: [PinId; 3]) -> Self {
        Self {
            lines: lines.into_iter().collect(),
            frames: [0b001, 0b010, 0b100].into_iter().collect(),
            next: 0,
        }
    }

    /// Single LED alternating off/on.
    pub fn blinker(pin: PinId) -> Self {
        Self {
            lines: core::iter::once(pin).collect(),
            frames: [0b0, 0b1].into_iter().collect(),
            next: 0,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Index of the frame the next iteration will show.
    pub fn next_frame(&self) -> usize {
        self.next
    }

    /// Drive every line to its level in frame `index`.  LOW lines are
    /// written first so two frames never overlap on the wire.
    fn show(&self, io: &dyn DigitalIo, index: usize) {
        let frame = self.frames[index];
        let lit = |bit: usize| frame & (1 << bit) != 0;
        for (bit, &pin) in self.lines.iter().enumerate() {
            if !lit(bit) {
                io.set_output(pin, false);
            }
        }
        for (bit, &pin) in self.lines.iter().enumerate() {
            if lit(bit) {
                io.set_output(pin, true);
            }
        }
    }
}

impl Worker for Animator {
    fn configure(&mut self, io: &dyn DigitalIo) {
        for &pin in &self.lines {
            io.configure_output(pin);
        }
    }

    fn step(&mut self, cx: &mut WorkerContext<'_>) {
        self.show(cx.io(), self.next);
        self.next = (self.next + 1) % self.frames.len();
    }

    fn owned_outputs(&self) -> &[PinId] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sim_io::SimulatedIo;
    use crate::registry::WorkerControl;

    const RGB: [PinId; 3] = [13, 11, 12];

    fn lit(io: &SimulatedIo) -> [bool; 3] {
        [io.level(RGB[0]), io.level(RGB[1]), io.level(RGB[2])]
    }

    #[test]
    fn rgb_cycle_is_one_hot_and_wraps() {
        let io = SimulatedIo::new();
        let control = WorkerControl::new("rgb", 1, &RGB).unwrap();
        let mut anim = Animator::rgb_cycle(RGB);
        anim.configure(&io);
        assert_eq!(lit(&io), [false, false, false]);

        let expected = [
            [true, false, false],
            [false, true, false],
            [false, false, true],
            [true, false, false],
        ];
        for want in expected {
            let mut cx = WorkerContext::new(&io, &control);
            anim.step(&mut cx);
            assert_eq!(lit(&io), want);
            assert_eq!(lit(&io).iter().filter(|&&on| on).count(), 1);
        }
        assert_eq!(anim.next_frame(), 1);
    }

    /// Tracks the most RGB lines ever HIGH at once, write by write.
    struct OverlapMeter {
        inner: SimulatedIo,
        peak: core::sync::atomic::AtomicUsize,
    }

    impl DigitalIo for OverlapMeter {
        fn configure_output(&self, pin: PinId) {
            self.inner.configure_output(pin);
        }

        fn configure_input_with_pullup(&self, pin: PinId) {
            self.inner.configure_input_with_pullup(pin);
        }

        fn set_output(&self, pin: PinId, level: bool) {
            self.inner.set_output(pin, level);
            let on = lit(&self.inner).iter().filter(|&&l| l).count();
            self.peak.fetch_max(on, core::sync::atomic::Ordering::SeqCst);
        }

        fn read_input(&self, pin: PinId) -> bool {
            self.inner.read_input(pin)
        }
    }

    #[test]
    fn colours_never_overlap_between_writes() {
        let io = OverlapMeter {
            inner: SimulatedIo::new(),
            peak: core::sync::atomic::AtomicUsize::new(0),
        };
        let control = WorkerControl::new("rgb", 1, &RGB).unwrap();
        let mut anim = Animator::rgb_cycle(RGB);
        anim.configure(&io);

        for _ in 0..7 {
            let mut cx = WorkerContext::new(&io, &control);
            anim.step(&mut cx);
        }
        assert_eq!(io.peak.load(core::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn blinker_alternates_starting_off() {
        let io = SimulatedIo::new();
        let control = WorkerControl::new("hb", 1, &[14]).unwrap();
        let mut anim = Animator::blinker(14);
        let mut cx = WorkerContext::new(&io, &control);

        anim.step(&mut cx);
        assert!(!io.level(14));
        anim.step(&mut cx);
        assert!(io.level(14));
        anim.step(&mut cx);
        assert!(!io.level(14));
    }

    #[test]
    fn empty_frame_list_rejected() {
        assert!(Animator::new(&RGB, &[]).is_err());
    }

    #[test]
    fn owned_outputs_are_the_lines() {
        let anim = Animator::rgb_cycle(RGB);
        assert_eq!(anim.owned_outputs(), &RGB);
        assert_eq!(anim.frame_count(), 3);
    }
}
