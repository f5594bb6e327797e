//! Process-wide lock serializing every engine operation
//!
//! One lock covers all versioned files: load, chain work and save for a call all run
//! while it is held. Unrelated files contend on it too.

use parking_lot::{const_mutex, Mutex, MutexGuard};
use std::time::Instant;

static ENGINE_LOCK: Mutex<()> = const_mutex(());

/// Held for the full duration of one engine operation
pub struct EngineGuard {
    _inner: MutexGuard<'static, ()>,
}

/// Block until the engine lock is free
pub fn lock() -> EngineGuard {
    let start = Instant::now();
    let inner = ENGINE_LOCK.lock();
    let waited = start.elapsed();
    if waited.as_millis() > 0 {
        tracing::trace!(waited_ms = waited.as_millis() as u64, "acquired engine lock");
    }
    EngineGuard { _inner: inner }
}
