//! Named task spawning with priority and stack size.
//!
//! On ESP-IDF, `std::thread` is implemented via pthreads, which are thin
//! wrappers around FreeRTOS tasks. `esp_pthread_set_cfg()` sets
//! thread-local configuration that applies to the *next*
//! `pthread_create()` call from the calling thread, so the config→spawn
//! pair must not be interleaved with other thread creation on the same
//! thread.  The scheduler spawns all tasks from one thread.
//!
//! On non-ESP targets priority is only logged; the host OS scheduler
//! decides interleaving.

use std::io;
use std::thread::JoinHandle;

/// Spawn a FreeRTOS task with explicit priority and stack.
///
/// The `name` must not contain NUL bytes; a terminator is appended here.
#[cfg(target_os = "espidf")]
pub fn spawn_task(
    name: &'static str,
    priority: u8,
    stack_kb: usize,
    f: impl FnOnce() + Send + 'static,
) -> io::Result<JoinHandle<()>> {
    let c_name = std::ffi::CString::new(name)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "task name contains NUL"))?;

    unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        // FreeRTOS priority 0 is the idle task; keep workers above it.
        cfg.prio = i32::from(priority) + 1;
        cfg.stack_size = (stack_kb * 1024) as i32;
        cfg.thread_name = c_name.as_ptr();
        let ret = esp_idf_sys::esp_pthread_set_cfg(&cfg);
        if ret != esp_idf_sys::ESP_OK as i32 {
            return Err(io::Error::other(format!("esp_pthread_set_cfg failed: {ret}")));
        }
    }

    log::info!(
        "Spawning '{}' (pri={}, stack={}KB)",
        name,
        priority,
        stack_kb
    );

    std::thread::Builder::new().name(name.into()).spawn(f)
}

/// Simulation fallback: priority is advisory only.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_task(
    name: &'static str,
    priority: u8,
    stack_kb: usize,
    f: impl FnOnce() + Send + 'static,
) -> io::Result<JoinHandle<()>> {
    log::info!(
        "Spawning '{}' (sim, pri={} advisory, stack={}KB)",
        name,
        priority,
        stack_kb
    );

    // Host threads need more headroom than FreeRTOS tasks for std + logging.
    std::thread::Builder::new()
        .name(name.into())
        .stack_size((stack_kb * 1024).max(64 * 1024))
        .spawn(f)
}
