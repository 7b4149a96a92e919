//! Worker bodies and timer callbacks.
//!
//! | Module           | Role                                          |
//! |------------------|-----------------------------------------------|
//! | `animator`       | RGB colour cycle and heartbeat LED            |
//! | `pulse`          | buzzer bursts                                 |
//! | `queue`          | producer and consumer around the channel      |
//! | `button_monitor` | push-buttons suspend/resume target workers    |
//! | `status`         | periodic console report of the suspend flags  |
//! | `blink_timer`    | timer callback toggling the timer LED         |

pub mod animator;
pub mod blink_timer;
pub mod button_monitor;
pub mod pulse;
pub mod queue;
pub mod status;
