/// One-shot diagnostic flag.
///
/// Formatting runs on every render of long candidate lists, so a broken
/// pattern or option would otherwise flood the log. A `WarnOnce` lets the
/// first failure through and silences the rest.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

static PROCESS_NOTIFIER: OnceLock<Arc<WarnOnce>> = OnceLock::new();

/// Tracks whether a diagnostic has already been emitted.
#[derive(Debug, Default)]
pub struct WarnOnce {
    warned: AtomicBool,
}

impl WarnOnce {
    pub const fn new() -> Self {
        Self {
            warned: AtomicBool::new(false),
        }
    }

    pub fn has_warned(&self) -> bool {
        self.warned.load(Ordering::Relaxed)
    }

    /// Set the flag. Returns `true` only for the call that set it.
    pub fn mark_warned(&self) -> bool {
        !self.warned.swap(true, Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.warned.store(false, Ordering::Relaxed);
    }
}

/// Notifier shared by every formatter that was not given its own.
///
/// Library code never resets it; it stays set for the rest of the process.
pub fn process_notifier() -> Arc<WarnOnce> {
    PROCESS_NOTIFIER
        .get_or_init(|| Arc::new(WarnOnce::new()))
        .clone()
}
