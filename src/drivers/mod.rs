//! Peripheral helpers: sampled buttons and task spawning.

pub mod button;
pub mod task_pin;
