//! pico-tasks: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  HalIo / SimulatedIo (DigitalIo)      LogConsole (Console)   │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │ workers · bounded queue · button monitor · status  │      │
//! │  └────────────────────────────────────────────────────┘      │
//! │                                                              │
//! │  Scheduler (one task per worker) · timer service task        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Startup order: logger, config, GPIO backend, system assembly,
//! scheduler start.  Any resource-creation failure enters the terminal
//! fault state.

#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::info;

use pico_tasks::adapters::log_sink::LogConsole;
use pico_tasks::app::system;
use pico_tasks::config::SystemConfig;
use pico_tasks::fault;
use pico_tasks::scheduler::SharedIo;

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    init_logging()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  pico-tasks v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config()?;

    // ── 3. GPIO backend ───────────────────────────────────────
    let io = board_io()?;

    // ── 4. Assembly + start ───────────────────────────────────
    let system = match system::build(&config, io, LogConsole::new()) {
        Ok(s) => s,
        Err(e) => fault::halt(e),
    };
    let running = match system.scheduler.start() {
        Ok(r) => r,
        Err(e) => fault::halt(e),
    };

    info!("System ready.");
    running.run_forever()
}

#[cfg(target_os = "espidf")]
fn init_logging() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("logger init failed: {e}"))
}

/// Defaults, or the JSON file named by the first argument (host only).
fn load_config() -> Result<SystemConfig> {
    let Some(path) = std::env::args().nth(1) else {
        info!("Config: defaults");
        return Ok(SystemConfig::default());
    };
    let text =
        std::fs::read_to_string(&path).with_context(|| format!("reading config '{path}'"))?;
    let config =
        SystemConfig::from_json(&text).with_context(|| format!("parsing config '{path}'"))?;
    info!("Config: loaded from {}", path);
    Ok(config)
}

#[cfg(not(target_os = "espidf"))]
fn board_io() -> Result<SharedIo> {
    use pico_tasks::adapters::sim_io::SimulatedIo;
    info!("GPIO: simulated");
    Ok(std::sync::Arc::new(SimulatedIo::new()))
}

#[cfg(target_os = "espidf")]
fn board_io() -> Result<SharedIo> {
    use esp_idf_hal::gpio::{AnyIOPin, Input, Output, PinDriver, Pull};
    use pico_tasks::adapters::hal_io::HalIo;
    use pico_tasks::pins;

    type Out = PinDriver<'static, AnyIOPin, Output>;
    type In = PinDriver<'static, AnyIOPin, Input>;

    const OUTPUTS: [pins::PinId; 7] = [
        pins::RGB_RED_GPIO,
        pins::RGB_GREEN_GPIO,
        pins::RGB_BLUE_GPIO,
        pins::HEARTBEAT_LED_GPIO,
        pins::RX_LED_GPIO,
        pins::TIMER_LED_GPIO,
        pins::BUZZER_GPIO,
    ];
    const INPUTS: [pins::PinId; 2] = [pins::BUTTON_A_GPIO, pins::BUTTON_B_GPIO];

    let mut io = HalIo::<Out, In>::new();
    for id in OUTPUTS {
        // SAFETY: every GPIO number in `pins` is claimed exactly once, here.
        let pin = unsafe { AnyIOPin::new(i32::from(id)) };
        let driver = PinDriver::output(pin).with_context(|| format!("GPIO {id} as output"))?;
        anyhow::ensure!(io.add_output(id, driver), "output table full at GPIO {id}");
    }
    for id in INPUTS {
        // SAFETY: as above.
        let pin = unsafe { AnyIOPin::new(i32::from(id)) };
        let mut driver = PinDriver::input(pin).with_context(|| format!("GPIO {id} as input"))?;
        driver.set_pull(Pull::Up)?;
        anyhow::ensure!(io.add_input(id, driver), "input table full at GPIO {id}");
    }
    info!("GPIO: {} outputs, {} inputs", OUTPUTS.len(), INPUTS.len());
    Ok(std::sync::Arc::new(io))
}
