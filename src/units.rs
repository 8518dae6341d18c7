#![allow(missing_docs)]

//! This module defines the unit types used for floor and room dimensions.
use std::iter::Sum;

macro_rules! unit_struct {
    ($name:ident) => {
        /// Represents a type of quantity.
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, derive_more::Add, derive_more::Sub)]
        pub struct $name(pub f64);

        impl $name {
            /// Returns the value of the unit type as a f64.
            pub fn value(self) -> f64 {
                self.0
            }

            /// Whether the value is neither infinite nor NaN
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// Round to two decimal places, the precision of save files
            pub fn round_to_two_places(self) -> Self {
                Self((self.0 * 100.0).round() / 100.0)
            }
        }

        impl std::fmt::Display for $name {
            /// Format with exactly two decimal places, as used in save files
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.2}", self.0)
            }
        }

        impl Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold($name(0.0), |acc, x| acc + x)
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::from(self.0 * rhs.0)
            }
        }
    };
}

unit_struct!(Metres);
unit_struct!(SquareMetres);

impl From<f64> for SquareMetres {
    fn from(val: f64) -> Self {
        Self(val)
    }
}

impl_mul!(Metres, Metres, SquareMetres);

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[test]
    fn test_metres_mul() {
        assert_approx_eq!(f64, (Metres(8.5) * Metres(40.0)).value(), 340.0);
    }

    #[test]
    fn test_square_metres_sum() {
        let total: SquareMetres = [SquareMetres(20.0), SquareMetres(15.5), SquareMetres(4.5)]
            .into_iter()
            .sum();
        assert_approx_eq!(f64, total.value(), 40.0);
    }

    #[rstest]
    #[case(15.786, 15.79)]
    #[case(10.004, 10.0)]
    #[case(8.326, 8.33)]
    #[case(5.0, 5.0)]
    fn test_round_to_two_places(#[case] value: f64, #[case] expected: f64) {
        let rounded = Metres(value).round_to_two_places();
        assert_eq!(rounded, Metres(expected));

        // The rounded value is exactly what reading back its display gives
        assert_eq!(Metres(rounded.to_string().parse().unwrap()), rounded);
    }

    #[test]
    fn test_round_to_two_places_not_finite() {
        assert!(!SquareMetres(f64::NAN).round_to_two_places().is_finite());
        assert!(!SquareMetres(f64::INFINITY).round_to_two_places().is_finite());
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Metres(10.0).to_string(), "10.00");
        assert_eq!(SquareMetres(23.8).to_string(), "23.80");
        assert_eq!(SquareMetres(15.786).to_string(), "15.79");
    }
}
