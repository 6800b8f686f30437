//! Time and interpolation helpers for snap animations
//!
//! All functions take the current instant explicitly so a render pass uses a
//! single clock reading throughout.

use std::time::Duration;

use tokio::time::Instant;

/// Animation progress (0.0 to 1.0) at `now` for an animation started at `start`
#[inline]
pub fn progress(start: Instant, now: Instant, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

/// Check if an animation started at `start` is complete at `now`
#[inline]
pub fn is_complete(start: Instant, now: Instant, duration: Duration) -> bool {
    now.saturating_duration_since(start) >= duration
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Clamp a ratio into [0, 1]; NaN collapses to 0
#[inline]
pub fn clamp_ratio(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Nearest endpoint of the ratio range
#[inline]
pub fn nearest_endpoint(ratio: f64) -> f64 {
    if clamp_ratio(ratio) >= 0.5 {
        1.0
    } else {
        0.0
    }
}
