//! Journey progress: percentage of elapsed time between departure and ETA.
//!
//! Algorithm:
//! 1. `total = arrival - departure`, `elapsed = now - departure`
//! 2. A window with `total <= 0` is malformed and reports [`PROGRESS_MAX`]
//! 3. Otherwise `elapsed / total * 100`, clamped into `[0, 100]`
//!
//! The output is never NaN and never leaves `[0, 100]`, so a vessel simulated
//! far past its ETA reports 100 rather than an extrapolated overshoot.

use crate::constants::{PROGRESS_MAX, PROGRESS_MIN};

/// Progress in percent for integer millisecond timestamps.
///
/// Callers must skip vessels that lack either timestamp; this function has no
/// notion of a missing value.
pub fn compute_progress(departure_ms: i64, arrival_ms: i64, now_ms: i64) -> f64 {
    let total = arrival_ms.saturating_sub(departure_ms);
    let elapsed = now_ms.saturating_sub(departure_ms);
    percent_of_window(total as f64, elapsed as f64)
}

/// Float variant for callers that carry timestamps as `f64` milliseconds
/// (the C ABI).
pub fn compute_progress_f64(departure_ms: f64, arrival_ms: f64, now_ms: f64) -> f64 {
    percent_of_window(arrival_ms - departure_ms, now_ms - departure_ms)
}

/// Map `elapsed` within a window of length `total` onto `[0, 100]`.
pub fn percent_of_window(total: f64, elapsed: f64) -> f64 {
    if total.is_nan() || elapsed.is_nan() {
        return PROGRESS_MIN;
    }
    if total <= 0.0 {
        return PROGRESS_MAX;
    }
    let raw = elapsed / total * 100.0;
    if raw.is_nan() {
        // inf / inf
        return PROGRESS_MIN;
    }
    raw.clamp(PROGRESS_MIN, PROGRESS_MAX)
}

/// Clamp an externally supplied progress value into range.
pub fn clamp_progress(value: f64) -> f64 {
    if value.is_nan() {
        PROGRESS_MIN
    } else {
        value.clamp(PROGRESS_MIN, PROGRESS_MAX)
    }
}

/// Whether a progress value means the vessel has reached its ETA.
pub fn is_complete(progress: f64) -> bool {
    progress >= PROGRESS_MAX
}
