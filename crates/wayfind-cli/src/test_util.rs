//! Shared helpers for CLI unit tests.

use std::sync::{Mutex, MutexGuard};

// Config tests mutate process-wide env vars; serialize them.
static ENV_LOCK: Mutex<()> = Mutex::new(());

pub fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
