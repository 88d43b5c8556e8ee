//! Saturating clip helpers.
//!
//! Out-of-range intermediate values are a normal occurrence in the
//! dynamics and the control laws. Clipping saturates, it never fails.
//! `NaN` inputs collapse to the lower bound so they cannot propagate
//! into the state.

/// Clip `x` to `[lo, hi]`.
pub fn clip(x: f64, lo: f64, hi: f64) -> f64 {
    if x.is_nan() || x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}

/// Clip `x` to the unit interval `[0, 1]`.
pub fn clip01(x: f64) -> f64 {
    clip(x, 0.0, 1.0)
}

/// Clip a reward signal to `[-1, 1]`.
pub fn clip_reward(x: f64) -> f64 {
    clip(x, -1.0, 1.0)
}
