//! Utility functions.

/// Round a non-negative value to the nearest integer, with halves rounded away from zero.
///
/// Negative and NaN values saturate to zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn round_to_u32(value: f64) -> u32 {
    value.round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0)]
    #[case(27.5, 28)]
    #[case(14.58, 15)]
    #[case(10.4999, 10)]
    #[case(-3.0, 0)]
    fn test_round_to_u32(#[case] value: f64, #[case] expected: u32) {
        assert_eq!(round_to_u32(value), expected);
    }
}
