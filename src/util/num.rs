/// Largest integer an `f32` represents exactly (`2^24`).
pub const MAX_EXACT_F32_INT: i32 = 16_777_216;

/// Narrows an integer literal to `i32`.
///
/// ## Errors
/// Returns `Err(error)` if the value exceeds `i32::MAX`.
///
/// ## Example
/// ```
/// use fhll::util::num::u64_to_i32_checked;
///
/// assert_eq!(u64_to_i32_checked(42, "too big"), Ok(42));
/// assert_eq!(u64_to_i32_checked(1 << 31, "too big"), Err("too big"));
/// ```
pub fn u64_to_i32_checked<E>(value: u64, error: E) -> Result<i32, E> {
    i32::try_from(value).map_err(|_| error)
}

/// Converts an `i32` to the nearest `f32`.
///
/// Values beyond [`MAX_EXACT_F32_INT`] in magnitude round to the nearest
/// representable float.
///
/// ## Example
/// ```
/// use fhll::util::num::i32_to_f32;
///
/// assert_eq!(i32_to_f32(-7), -7.0);
/// ```
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn i32_to_f32(value: i32) -> f32 {
    value as f32
}

/// Converts an `f32` to `i32`, truncating toward zero.
///
/// Out-of-range values saturate at `i32::MIN`/`i32::MAX` and NaN becomes `0`.
///
/// ## Example
/// ```
/// use fhll::util::num::f32_to_i32_saturating;
///
/// assert_eq!(f32_to_i32_saturating(-2.9), -2);
/// assert_eq!(f32_to_i32_saturating(1e20), i32::MAX);
/// assert_eq!(f32_to_i32_saturating(f32::NAN), 0);
/// ```
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub const fn f32_to_i32_saturating(value: f32) -> i32 {
    value as i32
}

/// Converts a floating literal to `f32`, rounding to nearest.
///
/// ## Example
/// ```
/// use fhll::util::num::f64_to_f32;
///
/// assert_eq!(f64_to_f32(0.5), 0.5);
/// ```
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub const fn f64_to_f32(value: f64) -> f32 {
    value as f32
}

/// A repetition count: non-positive counts repeat nothing.
///
/// ## Example
/// ```
/// use fhll::util::num::repetitions;
///
/// assert_eq!(repetitions(3), 3);
/// assert_eq!(repetitions(-1), 0);
/// ```
#[must_use]
pub fn repetitions(count: i32) -> usize {
    usize::try_from(count).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{MAX_EXACT_F32_INT, f32_to_i32_saturating, i32_to_f32, u64_to_i32_checked};

    #[test]
    fn exact_integers_survive_a_round_trip() {
        for value in [0, 1, -1, MAX_EXACT_F32_INT, -MAX_EXACT_F32_INT] {
            assert_eq!(f32_to_i32_saturating(i32_to_f32(value)), value);
        }
    }

    #[test]
    fn literal_boundary() {
        assert_eq!(u64_to_i32_checked(2_147_483_647, ()), Ok(i32::MAX));
        assert_eq!(u64_to_i32_checked(2_147_483_648, ()), Err(()));
    }
}
