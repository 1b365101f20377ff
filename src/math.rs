//! Numeric utilities
//!
//! Power-of-two classification and rounding, tolerance-based float
//! comparison, and small vector helpers used by the texel transforms.

use crate::error::{Result, TextureError};

/// Default comparison tolerance for float texel data
pub const DEFAULT_EPSILON: f32 = 1.0e-5;

/// True iff `n` is a positive integer with exactly one set bit.
pub fn is_power_of_two(n: u32) -> bool {
    n != 0 && (n & (n - 1)) == 0
}

/// Smallest power of two strictly greater than `n`.
///
/// Or-shifts `n` right by 1, 2, 4, 8 and 16, then increments. Wraps to 0
/// when the result does not fit in 32 bits.
pub fn next_power_of_two(n: u32) -> u32 {
    let mut x = n;
    x |= x >> 1;
    x |= x >> 2;
    x |= x >> 4;
    x |= x >> 8;
    x |= x >> 16;
    x.wrapping_add(1)
}

/// 64-bit variant of [`next_power_of_two`].
pub fn next_power_of_two_u64(n: u64) -> u64 {
    let mut x = n;
    x |= x >> 1;
    x |= x >> 2;
    x |= x >> 4;
    x |= x >> 8;
    x |= x >> 16;
    x |= x >> 32;
    x.wrapping_add(1)
}

/// Smallest power of two `>= n`; powers of two are returned unchanged.
///
/// `0` rounds up to `1`.
pub fn round_up_to_power_of_two(n: u32) -> u32 {
    next_power_of_two(n.saturating_sub(1))
}

/// `(n + 3) & !3`
pub fn round_to_multiple_of_four(n: u32) -> u32 {
    (n + 3) & !3
}

/// True if `a == b` (catches matching infinities) or `|a - b| < epsilon`.
///
/// Fails with `InvalidArgument` when `epsilon` is not positive.
pub fn approximately_equal(a: f32, b: f32, epsilon: f32) -> Result<bool> {
    Ok(Tolerance::new(epsilon)?.equal(a, b))
}

/// `|v| < epsilon`
pub fn approximately_zero(v: f32, epsilon: f32) -> bool {
    v.abs() < epsilon
}

/// Comparison tolerance captured once per pipeline run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance(f32);

impl Tolerance {
    pub fn new(epsilon: f32) -> Result<Self> {
        if epsilon > 0.0 {
            Ok(Self(epsilon))
        } else {
            Err(TextureError::InvalidArgument(format!(
                "epsilon must be positive, got {epsilon}"
            )))
        }
    }

    pub fn equal(&self, a: f32, b: f32) -> bool {
        a == b || (a - b).abs() < self.0
    }

    pub fn is_zero(&self, v: f32) -> bool {
        approximately_zero(v, self.0)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self(DEFAULT_EPSILON)
    }
}

/// Clamp every component of `v` into `[lo, hi]`.
pub fn clamp_vec<const N: usize>(v: [f32; N], lo: f32, hi: f32) -> [f32; N] {
    v.map(|c| c.clamp(lo, hi))
}

/// Scale a 3-vector to unit length; near-zero vectors are returned as-is.
pub fn normalize3(v: [f32; 3], tolerance: Tolerance) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if tolerance.is_zero(len) {
        return v;
    }
    [v[0] / len, v[1] / len, v[2] / len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_is_power_of_two() {
        assert!(is_power_of_two(1));
        assert!(is_power_of_two(2));
        assert!(is_power_of_two(1024));
        assert!(!is_power_of_two(0));
        assert!(!is_power_of_two(3));
        assert!(!is_power_of_two(1023));
    }

    #[test]
    fn test_next_power_of_two_is_strictly_greater() {
        assert_eq!(next_power_of_two(0), 1);
        assert_eq!(next_power_of_two(1), 2);
        assert_eq!(next_power_of_two(7), 8);
        assert_eq!(next_power_of_two(8), 16);
        assert_eq!(next_power_of_two(u32::MAX), 0);
        assert_eq!(next_power_of_two_u64(1 << 40), 1 << 41);
    }

    #[test]
    fn test_round_up_to_power_of_two() {
        assert_eq!(round_up_to_power_of_two(7), 8);
        assert_eq!(round_up_to_power_of_two(8), 8);
        assert_eq!(round_up_to_power_of_two(9), 16);
        assert_eq!(round_up_to_power_of_two(1), 1);
        assert_eq!(round_up_to_power_of_two(5), 8);
        assert_eq!(round_up_to_power_of_two(0), 1);
    }

    #[test]
    fn test_round_to_multiple_of_four() {
        assert_eq!(round_to_multiple_of_four(5), 8);
        assert_eq!(round_to_multiple_of_four(8), 8);
        assert_eq!(round_to_multiple_of_four(0), 0);
        assert_eq!(round_to_multiple_of_four(1), 4);
    }

    #[test]
    fn test_approximately_equal() {
        assert!(approximately_equal(1.0, 1.0 + 1e-7, 1e-5).unwrap());
        assert!(!approximately_equal(1.0, 1.1, 1e-5).unwrap());
        assert!(approximately_equal(f32::INFINITY, f32::INFINITY, 1e-5).unwrap());
        assert!(!approximately_equal(f32::INFINITY, f32::NEG_INFINITY, 1e-5).unwrap());
    }

    #[test]
    fn test_approximately_equal_rejects_bad_epsilon() {
        assert!(matches!(
            approximately_equal(1.0, 1.0, 0.0),
            Err(TextureError::InvalidArgument(_))
        ));
        assert!(matches!(
            approximately_equal(1.0, 1.0, -1.0),
            Err(TextureError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_approximately_zero() {
        assert!(approximately_zero(1e-7, 1e-5));
        assert!(approximately_zero(-1e-7, 1e-5));
        assert!(!approximately_zero(0.1, 1e-5));
    }

    #[test]
    fn test_normalize3() {
        let n = normalize3([3.0, 0.0, 4.0], Tolerance::default());
        assert!((n[0] - 0.6).abs() < 1e-6);
        assert!((n[2] - 0.8).abs() < 1e-6);
        assert_eq!(normalize3([0.0; 3], Tolerance::default()), [0.0; 3]);
    }

    #[test]
    fn test_clamp_vec() {
        assert_eq!(clamp_vec([-2.0, 0.5, 3.0], -1.0, 1.0), [-1.0, 0.5, 1.0]);
    }

    proptest! {
        #[test]
        fn prop_round_up_is_power_of_two_and_not_smaller(n in 1u32..=(1 << 31)) {
            let r = round_up_to_power_of_two(n);
            prop_assert!(is_power_of_two(r));
            prop_assert!(r >= n);
            if is_power_of_two(n) {
                prop_assert_eq!(r, n);
            }
        }

        #[test]
        fn prop_round_to_multiple_of_four(n in 0u32..(u32::MAX - 3)) {
            let r = round_to_multiple_of_four(n);
            prop_assert_eq!(r % 4, 0);
            prop_assert!(r >= n);
            prop_assert!(r - n < 4);
        }
    }
}
