use crate::{RkError, RkResult};
use std::f64::consts::PI;

/// Floating point type used throughout system
pub type Real = f64;

/// Relative tolerance used for "did this value actually change" checks.
pub const EPSILON: Real = 1e-8;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Setter-level equality: relative [`EPSILON`] around `b`, absolute near zero.
pub fn approx_eq(a: Real, b: Real) -> bool {
    let abs_b = b.abs();
    if abs_b < EPSILON / 2.0 {
        return a.abs() < EPSILON / 2.0;
    }
    (a - b).abs() < EPSILON * abs_b
}

#[inline]
pub fn pow2(x: Real) -> Real {
    x * x
}

#[inline]
pub fn pow3(x: Real) -> Real {
    x * x * x
}

/// `sqrt(x² + y²)` without the overflow guards of [`f64::hypot`].
#[inline]
pub fn hypot(x: Real, y: Real) -> Real {
    (x * x + y * y).sqrt()
}

/// Clamp `x` into `[min, max]`. Unlike [`f64::clamp`] this never panics when
/// `min > max`; `min` wins.
pub fn clamp(x: Real, min: Real, max: Real) -> Real {
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}

/// Minimum that ignores a NaN `y`.
pub fn min(x: Real, y: Real) -> Real {
    if y.is_nan() {
        return x;
    }
    if x < y { x } else { y }
}

/// Maximum that ignores a NaN `x`.
pub fn max(x: Real, y: Real) -> Real {
    if x.is_nan() {
        return y;
    }
    if x < y { y } else { x }
}

/// Linearly map `value` from `[from_min, from_max]` onto `[to_min, to_max]`.
///
/// A singular destination always yields `to_min`. A singular source with a
/// non-singular destination has no answer and is rejected.
pub fn map_range(
    value: Real,
    from_min: Real,
    from_max: Real,
    to_min: Real,
    to_max: Real,
) -> RkResult<Real> {
    if approx_eq(to_min, to_max) {
        return Ok(to_min);
    }
    if approx_eq(from_min, from_max) {
        return Err(RkError::InvalidArg {
            what: "source range is singular but destination range is not",
        });
    }
    Ok((value - from_min) / (from_max - from_min) * (to_max - to_min) + to_min)
}

/// Reduce an angle into `[0, 2π)`.
pub fn reduce_360(x: Real) -> Real {
    let d = (x / (2.0 * PI)).floor();
    let r = x - d * 2.0 * PI;
    if r >= 2.0 * PI { r - 2.0 * PI } else { r }
}

/// Reduce an angle into `(-π, π]`.
pub fn reduce_180(x: Real) -> Real {
    let d = (x / (2.0 * PI)).round();
    let r = x - d * 2.0 * PI;
    if r <= -PI {
        r + 2.0 * PI
    } else if r > PI {
        r - 2.0 * PI
    } else {
        r
    }
}
