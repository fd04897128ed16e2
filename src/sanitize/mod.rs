//! Numeric hygiene helpers shared by the statistics and pacing modules.
//!
//! Caller-supplied timings are untrusted: NaN, infinities and negatives are
//! folded into safe values here rather than propagated as errors.

use crate::types::{MAX_TIME_SECONDS, MIN_TIME_SECONDS, TIME_STEP_SECONDS};

/// Clamp into [0, 1], mapping NaN to 0
pub fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Replace non-finite or negative durations with zero
pub fn sanitize_seconds(x: f64) -> f64 {
    if x.is_finite() && x > 0.0 {
        x
    } else {
        0.0
    }
}

/// Clamp a configuration value, falling back to `default` when non-finite
pub fn sanitize_param(x: f64, lo: f64, hi: f64, default: f64) -> f64 {
    if x.is_finite() {
        x.clamp(lo, hi)
    } else {
        default
    }
}

/// Standard exponential moving average step
pub fn ema(previous: f64, sample: f64, alpha: f64) -> f64 {
    previous + alpha * (sample - previous)
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * clamp01(t)
}

/// Round to the nearest multiple of `step`
pub fn quantize(x: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return x;
    }
    (x / step).round() * step
}

/// Hard clamp to the allowed solve-time window, then quantize
pub fn finalize_time_budget(x: f64) -> f64 {
    let x = if x.is_finite() { x } else { MIN_TIME_SECONDS };
    quantize(x.clamp(MIN_TIME_SECONDS, MAX_TIME_SECONDS), TIME_STEP_SECONDS)
}

/// Round to three decimal places (fraction answers)
pub fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
