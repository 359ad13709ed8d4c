//! Type definitions and constants.
use std::ops::{Sub, Add, Mul};

pub type Float = f64;

pub mod consts {
    use super::Float;
    pub use std::f64::consts::*;
    pub const TWO_PI: Float = 2.0 * PI;
    /// Below this a rotation axis or half-angle sine is treated as zero.
    pub const AXIS_EPSILON: Float = 1e-20;
    /// Default tolerance for unit-length and node-coincidence tests in SLERP.
    pub const SLERP_TOLERANCE: Float = 1e-12;
    /// Default elementwise tolerance when comparing a matrix against the identity.
    pub const IDENTITY_TOLERANCE: Float = 1e-5;
}

/// Linearly interpolate between two values.
#[inline]
pub fn lerp<S, T>(t: S, a: T, b: T) -> T
where
S: num::One + Sub<S, Output = S> + Copy,
T: Add<T, Output=T> + Mul<S, Output=T>
{
    a * (S::one() - t) + b * t
}

/// Convert an angle from degrees into radians.
pub fn radians(deg: Float) -> Float {
    deg * consts::PI / 180.0
}

/// Convert an angle from radians into degrees.
pub fn degrees(rad: Float) -> Float {
    rad * 180.0 / consts::PI
}

/// Binary search over `size` ordered entries for the last index where
/// `predicate` holds, clamped so that `index + 1` is always a valid entry.
pub fn find_interval<T>(size: usize, predicate: T) -> usize
where
T: Fn(usize) -> bool
{
    let mut first = 0;
    let mut len = size;
    while len > 0 {
        let half = len >> 1;
        let middle = first + half;
        // Bisect range based on value of _pred_ at _middle_
        if predicate(middle) {
            first = middle + 1;
            len -= half + 1;
        } else {
            len = half;
        }
    }
    num::clamp(first.saturating_sub(1), 0, size.saturating_sub(2))
}

/// Index of the first entry that breaks non-decreasing order, if any.
/// NaN entries count as out of order.
pub fn first_unordered(values: &[Float]) -> Option<usize> {
    for (i, v) in values.iter().enumerate() {
        if v.is_nan() || (i > 0 && *v < values[i - 1]) {
            return Some(i);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_interval() {
        let nodes = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(find_interval(nodes.len(), |i| nodes[i] <= 0.5), 0);
        assert_eq!(find_interval(nodes.len(), |i| nodes[i] <= 2.0), 2);
        assert_eq!(find_interval(nodes.len(), |i| nodes[i] <= 3.0), 2);
        assert_eq!(find_interval(nodes.len(), |i| nodes[i] <= -1.0), 0);
    }

    #[test]
    fn test_first_unordered() {
        assert_eq!(first_unordered(&[0.0, 0.0, 1.0, 2.0]), None);
        assert_eq!(first_unordered(&[0.0, 2.0, 1.0]), Some(2));
        assert_eq!(first_unordered(&[0.0, Float::NAN]), Some(1));
        assert_eq!(first_unordered(&[]), None);
    }

    #[test]
    fn test_lerp_and_angles() {
        assert_eq!(lerp(0.25, 0.0, 8.0), 2.0);
        assert!((radians(180.0) - consts::PI).abs() < 1e-15);
        assert!((degrees(consts::FRAC_PI_2) - 90.0).abs() < 1e-12);
    }
}
