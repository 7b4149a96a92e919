//! GPIO pin assignments for the controller board.
//!
//! Single source of truth: every worker references this module rather than
//! hard-coding pin numbers.  Each output line has exactly one owning worker.

/// Board-level pin identifier (GPIO number).
pub type PinId = u8;

// ---------------------------------------------------------------------------
// RGB LED (discrete R/G/B, active HIGH), driven by the colour animator
// ---------------------------------------------------------------------------

pub const RGB_RED_GPIO: PinId = 13;
pub const RGB_GREEN_GPIO: PinId = 11;
pub const RGB_BLUE_GPIO: PinId = 12;

/// Animator frame order: red, green, blue.
pub const RGB_LINES: [PinId; 3] = [RGB_RED_GPIO, RGB_GREEN_GPIO, RGB_BLUE_GPIO];

// ---------------------------------------------------------------------------
// Single-colour indicator LEDs
// ---------------------------------------------------------------------------

/// Heartbeat LED, slow blink independent of everything else.
pub const HEARTBEAT_LED_GPIO: PinId = 14;
/// Flashes once per value received from the queue.
pub const RX_LED_GPIO: PinId = 15;
/// Toggled by the repeating software timer.
pub const TIMER_LED_GPIO: PinId = 16;

// ---------------------------------------------------------------------------
// Buzzer (passive piezo, toggled in software)
// ---------------------------------------------------------------------------

pub const BUZZER_GPIO: PinId = 21;

// ---------------------------------------------------------------------------
// Push-buttons (active LOW, internal pull-up)
// ---------------------------------------------------------------------------

/// Suspends/resumes the colour animator.
pub const BUTTON_A_GPIO: PinId = 5;
/// Suspends/resumes the buzzer.
pub const BUTTON_B_GPIO: PinId = 6;
