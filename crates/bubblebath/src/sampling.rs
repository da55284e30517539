//! Uniform random draws over axis-aligned intervals.
use rand::RngCore;

use crate::geometry::Point;

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f64 {
    // 53 random mantissa bits.
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Draw uniformly from `[lo, hi)`. Returns `lo` for an empty or reversed interval.
#[inline]
pub(crate) fn uniform_in(rng: &mut dyn RngCore, lo: f64, hi: f64) -> f64 {
    if hi <= lo {
        return lo;
    }
    let x = lo + rand01(rng) * (hi - lo);
    // Rounding can land exactly on `hi`; keep the upper bound strict.
    x.clamp(lo, hi.next_down())
}

/// Draw a point uniformly from `[margin, extent[i] - margin)` on every axis.
#[inline]
pub(crate) fn uniform_point<P: Point>(rng: &mut dyn RngCore, margin: f64, extent: P) -> P {
    P::from_fn(|i| uniform_in(rng, margin, extent.axis(i) - margin))
}
