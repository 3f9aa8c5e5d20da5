//! Progress bar helpers.
//!
//! Provides the resolver's progress bar, with support for log-only mode where
//! the bar is hidden for tail-friendly output. The active bar is registered so
//! the log writer can suspend it while a line is printed.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Global flag for log-only mode (set from args in main)
pub static LOG_ONLY: AtomicBool = AtomicBool::new(false);

static ACTIVE_BAR: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// Set log-only mode globally
pub fn set_log_only(value: bool) {
    LOG_ONLY.store(value, Ordering::Relaxed);
}

/// Check if log-only mode is enabled
pub fn is_log_only() -> bool {
    LOG_ONLY.load(Ordering::Relaxed)
}

/// Create a progress bar counting files.
/// In log-only mode, the progress bar is hidden.
pub fn create_progress_bar(len: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if is_log_only() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    } else if let Ok(style) = ProgressStyle::default_bar()
        .template("{msg} {percent:>3}%|{bar:40.cyan/blue}| {pos}/{len} [{elapsed} eta. {eta}, {per_sec}]")
    {
        pb.set_style(style.progress_chars("=> "));
    }
    pb.set_message(msg.to_string());
    pb
}

/// Make `pb` the bar that log output is interleaved with.
pub fn register_bar(pb: &ProgressBar) {
    if let Ok(mut active) = ACTIVE_BAR.lock() {
        *active = Some(pb.clone());
    }
}

pub fn unregister_bar() {
    if let Ok(mut active) = ACTIVE_BAR.lock() {
        *active = None;
    }
}

/// Run `f` with the active bar (if any) cleared from the terminal.
pub fn suspend<R>(f: impl FnOnce() -> R) -> R {
    let bar = ACTIVE_BAR.lock().ok().and_then(|active| active.clone());
    match bar {
        Some(pb) => pb.suspend(f),
        None => f(),
    }
}
