// Formatting and console helpers shared by the game modules.

use std::cell::Cell;

thread_local! {
    static DEBUG_LOGGING: Cell<bool> = const { Cell::new(true) };
}

pub fn set_debug_logging(enabled: bool) {
    DEBUG_LOGGING.with(|flag| flag.set(enabled));
}

fn debug_enabled() -> bool {
    DEBUG_LOGGING.with(|flag| flag.get())
}

/// Formats seconds as `MM:SS.sss`; anything non-finite or negative shows as zero.
pub fn format_time(total_secs: f64) -> String {
    if !total_secs.is_finite() || total_secs < 0.0 {
        return "00:00.000".to_string();
    }
    let minutes = (total_secs / 60.0).floor() as u64;
    let seconds = total_secs % 60.0;
    format!("{:02}:{:06.3}", minutes, seconds)
}

/// `MM:SS` form used by the live timer.
pub fn format_time_short(total_secs: f64) -> String {
    let full = format_time(total_secs);
    match full.split_once('.') {
        Some((head, _)) => head.to_string(),
        None => full,
    }
}

pub fn clog(msg: &str) {
    if !debug_enabled() {
        return;
    }
    #[cfg(target_arch = "wasm32")]
    gloo::console::log!(format!("[{}] {}", crate::config::APP_NAME, msg));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = msg;
}

pub fn cinfo(msg: &str) {
    if !debug_enabled() {
        return;
    }
    #[cfg(target_arch = "wasm32")]
    gloo::console::info!(format!("[{}] {}", crate::config::APP_NAME, msg));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = msg;
}

pub fn cdebug(msg: &str) {
    if !debug_enabled() {
        return;
    }
    #[cfg(target_arch = "wasm32")]
    gloo::console::debug!(format!("[{}] {}", crate::config::APP_NAME, msg));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = msg;
}

pub fn cwarn(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    gloo::console::warn!(format!("[{}] {}", crate::config::APP_NAME, msg));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = msg;
}

pub fn cerror(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    gloo::console::error!(format!("[{}] {}", crate::config::APP_NAME, msg));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = msg;
}
