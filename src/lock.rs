//! Process-wide serialization of native calls.
//!
//! libspotify is not thread-safe. Every invocation of the native surface
//! runs inside [`with_native_lock`], which holds a single re-entrant mutex.
//! A thread that already holds the lock (for example a callback fired by the
//! library during a call made on that thread) re-acquires it immediately.

use parking_lot::ReentrantMutex;
use std::cell::Cell;

static NATIVE_LOCK: ReentrantMutex<()> = parking_lot::const_reentrant_mutex(());

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Decrements the per-thread depth on every exit path, including unwinding.
struct DepthGuard;

impl DepthGuard {
    fn enter() -> Self {
        DEPTH.with(|d| d.set(d.get() + 1));
        DepthGuard
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

/// Run `body` while holding the native lock.
///
/// Blocks until the lock is available unless the current thread already
/// holds it. The lock is released when `body` returns or panics.
pub fn with_native_lock<T>(body: impl FnOnce() -> T) -> T {
    let _lock = NATIVE_LOCK.lock();
    let _depth = DepthGuard::enter();
    if depth() == 1 {
        tracing::trace!("native lock acquired");
    }
    body()
}

/// Whether the current thread is inside [`with_native_lock`].
pub fn is_held_by_current_thread() -> bool {
    depth() > 0
}

/// Nesting depth of [`with_native_lock`] on the current thread.
pub fn depth() -> usize {
    DEPTH.with(Cell::get)
}
