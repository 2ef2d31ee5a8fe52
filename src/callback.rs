//! Guard for callbacks invoked by the native library.
//!
//! libspotify calls back into the application from inside native calls
//! (during `sp_session_process_events`, for example) and from its own
//! threads. A callback body must take the native lock before touching the
//! surface, and must never unwind into C.

use crate::lock::with_native_lock;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Run a callback body under the native lock, converting a panic into
/// `fallback`.
///
/// When the callback fires on a thread already inside a native call the lock
/// is re-entered rather than waited on.
pub fn guard<T>(name: &str, fallback: T, body: impl FnOnce() -> T) -> T {
    with_native_lock(|| {
        catch_unwind(AssertUnwindSafe(body)).unwrap_or_else(|_| {
            tracing::error!(callback = name, "panic in native callback");
            fallback
        })
    })
}
