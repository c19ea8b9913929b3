//! Easing and interpolation
//!
//! Pure numeric helpers. Every progress argument is clamped to [0, 1]
//! before use, so drift upstream can never push a visual out of range.

use hero_core::{Curve, Point};

/// Restrict `value` to `[lo, hi]`. NaN collapses to `lo`.
#[inline]
pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        return lo;
    }
    value.max(lo).min(hi)
}

#[inline]
pub fn clamp01(value: f64) -> f64 {
    clamp(value, 0.0, 1.0)
}

/// Quadratic ease-in-out
///
/// `2t²` below the midpoint, `1 - 2(1-t)²` above it. Symmetric about 0.5
/// with fixed points at 0, 0.5 and 1.
pub fn ease_in_out_quad(t: f64) -> f64 {
    let t = clamp01(t);
    if t < 0.5 {
        2.0 * t * t
    } else {
        let u = 1.0 - t;
        1.0 - 2.0 * u * u
    }
}

/// Point on a quadratic Bézier curve
///
/// Returns `curve.start` at 0 and `curve.end` at 1 exactly.
pub fn point_on_curve(curve: &Curve, progress: f64) -> Point {
    let t = clamp01(progress);
    if t <= 0.0 {
        return curve.start;
    }
    if t >= 1.0 {
        return curve.end;
    }

    let u = 1.0 - t;
    let a = u * u;
    let b = 2.0 * u * t;
    let c = t * t;
    Point {
        x: a * curve.start.x + b * curve.control.x + c * curve.end.x,
        y: a * curve.start.y + b * curve.control.y + c * curve.end.y,
    }
}

/// Triangle wave over `[start, start + duration]`
///
/// Zero outside the window, rising linearly to 1 at the midpoint and back
/// to 0 at the end.
pub fn pulse(time: f64, start: f64, duration: f64) -> f64 {
    if !(duration > 0.0) || time < start || time > start + duration {
        return 0.0;
    }
    let progress = (time - start) / duration;
    if progress < 0.5 {
        progress * 2.0
    } else {
        (1.0 - progress) * 2.0
    }
}

/// Linear fade-in: 0 before `start`, 1 after `start + span`
#[inline]
pub fn ramp(value: f64, start: f64, span: f64) -> f64 {
    if !(span > 0.0) {
        return if value >= start { 1.0 } else { 0.0 };
    }
    clamp01((value - start) / span)
}
