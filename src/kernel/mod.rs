pub mod cancel;
pub mod config;
pub mod dwell;
pub mod host;
pub mod instrument;
pub mod scroll;
pub mod telemetry;
pub mod time;

use std::sync::{Mutex, MutexGuard};

// Poisoning is ignored: guarded data is updated in single statements.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
