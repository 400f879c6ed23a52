//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Add a delta to a score and clamp the result into `[min, max]`.
///
/// The sum is computed in `i64` so oversized deltas saturate at the bounds
/// instead of wrapping.
#[must_use]
pub fn clamped_add(value: i32, delta: i64, min: i32, max: i32) -> i32 {
    let sum = i64::from(value).saturating_add(delta);
    let clamped = sum.clamp(i64::from(min), i64::from(max));
    cast::<i64, i32>(clamped).unwrap_or(min)
}

/// Convert a collection length to f64 for averaging.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Truncate toward zero; NaN and out-of-range values become 0.
#[must_use]
pub fn f64_to_i64(value: f64) -> i64 {
    cast::<f64, i64>(value.trunc()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_add_respects_bounds() {
        assert_eq!(clamped_add(95, 20, 0, 100), 100);
        assert_eq!(clamped_add(5, -20, 0, 100), 0);
        assert_eq!(clamped_add(-90, -50, -100, 100), -100);
        assert_eq!(clamped_add(50, 7, 0, 100), 57);
    }

    #[test]
    fn clamped_add_saturates_extreme_deltas() {
        assert_eq!(clamped_add(50, i64::MAX, 0, 100), 100);
        assert_eq!(clamped_add(50, i64::MIN, 0, 100), 0);
    }

    #[test]
    fn conversions_cover_ranges() {
        assert!((usize_to_f64(8) - 8.0).abs() < f64::EPSILON);
        assert_eq!(f64_to_i64(186.25), 186);
        assert_eq!(f64_to_i64(-2.9), -2);
        assert_eq!(f64_to_i64(f64::NAN), 0);
    }
}
