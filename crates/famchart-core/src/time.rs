//! Clock access for duplicate-branch toggle timestamps.
//!
//! Toggle values encode recency as a Unix millisecond timestamp, which
//! would make layouts that force a toggle state nondeterministic under
//! test. `with_fixed_now_millis` pins "now" for the current thread so
//! fixtures produce stable toggle values.

use std::cell::Cell;

thread_local! {
    static FIXED_NOW_MILLIS: Cell<Option<i64>> = const { Cell::new(None) };
}

/// Runs `f` with a fixed "now" (in Unix milliseconds) for this thread.
/// `None` restores the system clock.
pub fn with_fixed_now_millis<R>(now: Option<i64>, f: impl FnOnce() -> R) -> R {
    FIXED_NOW_MILLIS.with(|cell| {
        let prev = cell.replace(now);
        let out = f();
        cell.set(prev);
        out
    })
}

/// Current Unix time in milliseconds, honoring the thread-local override.
pub fn now_millis() -> i64 {
    FIXED_NOW_MILLIS
        .with(|cell| cell.get())
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis())
}
