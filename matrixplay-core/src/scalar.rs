//! Exact rational scalars
//!
//! A `Scalar` is a numerator/denominator pair of arbitrary precision
//! integers. Arithmetic never overflows and never rounds: every result
//! is an exact fraction returned in lowest terms.

use dashu_int::{ops::Gcd, IBig};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error type for scalar construction, parsing and arithmetic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScalarError {
    #[error("Invalid scalar: {0}")]
    InvalidScalar(String),

    #[error("Invalid number format: {0}")]
    InvalidNumberFormat(String),

    #[error("Invalid fraction format: {0}")]
    InvalidFractionFormat(String),

    #[error("Division by zero")]
    DivisionByZero,
}

/// Exact rational number
///
/// Values built with [`Scalar::new`] keep the pair they were given;
/// every arithmetic method returns the simplified form (gcd 1, positive
/// denominator).
#[derive(Debug, Clone)]
pub struct Scalar {
    numerator: IBig,
    denominator: IBig,
}

impl Scalar {
    // ========== Construction ==========

    /// Create from a numerator/denominator pair, keeping it unreduced
    pub fn new(numerator: impl Into<IBig>, denominator: impl Into<IBig>) -> Result<Self, ScalarError> {
        let numerator = numerator.into();
        let denominator = denominator.into();
        if denominator == IBig::ZERO {
            return Err(ScalarError::InvalidScalar(format!(
                "{}/{}: denominator cannot be zero",
                numerator, denominator
            )));
        }
        Ok(Self { numerator, denominator })
    }

    /// Create a whole number (denominator 1)
    pub fn integer(n: impl Into<IBig>) -> Self {
        Self { numerator: n.into(), denominator: IBig::ONE }
    }

    /// Create from i64
    pub fn from_i64(n: i64) -> Self {
        Self::integer(n)
    }

    pub fn zero() -> Self {
        Self::integer(IBig::ZERO)
    }

    pub fn one() -> Self {
        Self::integer(IBig::ONE)
    }

    /// Build from parts already known to have a nonzero denominator,
    /// returning the reduced form
    fn reduced(numerator: IBig, denominator: IBig) -> Self {
        Self { numerator, denominator }.simplify()
    }

    // ========== Accessors ==========

    pub fn numerator(&self) -> &IBig {
        &self.numerator
    }

    pub fn denominator(&self) -> &IBig {
        &self.denominator
    }

    // ========== Predicates ==========

    pub fn is_zero(&self) -> bool {
        self.numerator == IBig::ZERO
    }

    pub fn is_negative(&self) -> bool {
        (self.numerator < IBig::ZERO) != (self.denominator < IBig::ZERO) && !self.is_zero()
    }

    /// True when the value is a whole number (checked on the reduced form)
    pub fn is_integer(&self) -> bool {
        self.simplify().denominator == IBig::ONE
    }

    // ========== Normalisation ==========

    /// Reduce to lowest terms with the sign carried by the numerator
    pub fn simplify(&self) -> Self {
        if self.numerator == IBig::ZERO {
            return Self::zero();
        }

        // Denominator is nonzero, so the gcd is at least 1
        let divisor = IBig::from((&self.numerator).gcd(&self.denominator));
        let mut numerator = &self.numerator / &divisor;
        let mut denominator = &self.denominator / &divisor;

        if denominator < IBig::ZERO {
            numerator = -numerator;
            denominator = -denominator;
        }

        Self { numerator, denominator }
    }

    // ========== Arithmetic ==========

    /// Addition by cross-multiplication
    pub fn add(&self, other: &Self) -> Self {
        Self::reduced(
            &self.numerator * &other.denominator + &other.numerator * &self.denominator,
            &self.denominator * &other.denominator,
        )
    }

    /// Subtraction: `self + (-other)`
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self::reduced(
            &self.numerator * &other.numerator,
            &self.denominator * &other.denominator,
        )
    }

    /// Safe division (returns Result, never panics)
    pub fn checked_div(&self, other: &Self) -> Result<Self, ScalarError> {
        Ok(self.mul(&other.inverse()?))
    }

    /// Multiplicative inverse
    pub fn inverse(&self) -> Result<Self, ScalarError> {
        if self.is_zero() {
            return Err(ScalarError::DivisionByZero);
        }
        Ok(Self::reduced(self.denominator.clone(), self.numerator.clone()))
    }

    pub fn neg(&self) -> Self {
        Self::reduced(-self.numerator.clone(), self.denominator.clone())
    }

    /// Exact equality of the reduced forms
    pub fn equals(&self, other: &Self) -> bool {
        let a = self.simplify();
        let b = other.simplify();
        a.numerator == b.numerator && a.denominator == b.denominator
    }

    // ========== Conversion ==========

    /// Whole-number value, if the scalar is an integer
    pub fn to_integer(&self) -> Option<IBig> {
        let reduced = self.simplify();
        if reduced.denominator == IBig::ONE {
            Some(reduced.numerator)
        } else {
            None
        }
    }

    /// Try to convert to i64
    pub fn to_i64(&self) -> Option<i64> {
        self.to_integer()?.try_into().ok()
    }
}

// ========== Trait Implementations ==========

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Self::from_i64(n)
    }
}

impl From<IBig> for Scalar {
    fn from(n: IBig) -> Self {
        Self::integer(n)
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.denominator == IBig::ONE {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

impl std::str::FromStr for Scalar {
    type Err = ScalarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse::parse_scalar(s)
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.simplify().to_string())
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        crate::parse::parse_scalar(&s).map_err(serde::de::Error::custom)
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Scalar {}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(n: i64, d: i64) -> Scalar {
        Scalar::new(n, d).unwrap()
    }

    #[test]
    fn test_zero_denominator_rejected() {
        assert!(matches!(Scalar::new(1, 0), Err(ScalarError::InvalidScalar(_))));
    }

    #[test]
    fn test_new_keeps_raw_parts() {
        let x = s(2, 4);
        assert_eq!(x.numerator(), &IBig::from(2));
        assert_eq!(x.denominator(), &IBig::from(4));
        assert_eq!(x.to_string(), "2/4");
    }

    #[test]
    fn test_simplify_moves_sign_to_numerator() {
        let x = s(3, -6).simplify();
        assert_eq!(x.numerator(), &IBig::from(-1));
        assert_eq!(x.denominator(), &IBig::from(2));
    }

    #[test]
    fn test_simplify_zero() {
        let x = s(0, -7).simplify();
        assert_eq!(x.numerator(), &IBig::ZERO);
        assert_eq!(x.denominator(), &IBig::ONE);
    }

    #[test]
    fn test_simplify_beyond_i64() {
        let big = IBig::from(2).pow(70);
        let x = Scalar::new(&big * IBig::from(3), &big * IBig::from(-9)).unwrap().simplify();
        assert_eq!(x.numerator(), &IBig::from(-1));
        assert_eq!(x.denominator(), &IBig::from(3));
    }

    #[test]
    fn test_simplify_idempotent() {
        for (n, d) in [(6, 8), (-10, 4), (7, -21), (0, 5), (13, 1), (-9, -12)] {
            let once = s(n, d).simplify();
            let twice = once.simplify();
            assert_eq!(once.numerator(), twice.numerator());
            assert_eq!(once.denominator(), twice.denominator());
            assert!(*once.denominator() > IBig::ZERO);
        }
    }

    #[test]
    fn test_add_cross_multiplies() {
        // 1/2 + 1/3 = 5/6
        let sum = s(1, 2).add(&s(1, 3));
        assert_eq!(sum.numerator(), &IBig::from(5));
        assert_eq!(sum.denominator(), &IBig::from(6));

        // 3/4 + 1/4 = 1
        let sum = s(3, 4).add(&s(1, 4));
        assert_eq!(sum.to_string(), "1");
    }

    #[test]
    fn test_add_matches_manual_reduction() {
        for (a, b, c, d) in [(1, 2, 1, 2), (-3, 5, 2, 7), (4, -6, 9, 3), (0, 1, -5, 10)] {
            let got = s(a, b).add(&s(c, d));
            let expected = s(a * d + c * b, b * d).simplify();
            assert_eq!(got.numerator(), expected.numerator());
            assert_eq!(got.denominator(), expected.denominator());
        }
    }

    #[test]
    fn test_sub() {
        assert_eq!(s(1, 2).sub(&s(1, 3)), s(1, 6));
        assert_eq!(Scalar::from(5).sub(&Scalar::from(8)), Scalar::from(-3));
    }

    #[test]
    fn test_mul() {
        let p = s(2, 3).mul(&s(9, 4));
        assert_eq!(p.to_string(), "3/2");
    }

    #[test]
    fn test_checked_div() {
        assert_eq!(s(1, 2).checked_div(&s(1, 4)).unwrap(), Scalar::from(2));
        assert_eq!(
            Scalar::from(1).checked_div(&Scalar::zero()),
            Err(ScalarError::DivisionByZero)
        );
    }

    #[test]
    fn test_inverse() {
        assert_eq!(s(-2, 3).inverse().unwrap().to_string(), "-3/2");
        assert_eq!(Scalar::zero().inverse(), Err(ScalarError::DivisionByZero));
    }

    #[test]
    fn test_equals_properties() {
        let a = s(3, 7);
        assert!(a.equals(&a));
        let b = s(-6, -14);
        assert!(a.equals(&b) && b.equals(&a));
        for k in [2, -3, 11] {
            assert!(a.equals(&s(3 * k, 7 * k)));
        }
        assert!(!a.equals(&s(3, 8)));
    }

    #[test]
    fn test_is_integer_and_to_i64() {
        assert!(s(8, 4).is_integer());
        assert_eq!(s(8, 4).to_i64(), Some(2));
        assert!(!s(1, 3).is_integer());
        assert_eq!(s(1, 3).to_i64(), None);
    }

    #[test]
    fn test_is_negative() {
        assert!(s(1, -2).is_negative());
        assert!(!s(-1, -2).is_negative());
        assert!(!Scalar::zero().is_negative());
    }

    #[test]
    fn test_display() {
        assert_eq!(Scalar::from(-4).to_string(), "-4");
        assert_eq!(s(3, 4).to_string(), "3/4");
    }

    #[test]
    fn test_large_values_stay_exact() {
        let big = Scalar::from(i64::MAX);
        let square = big.mul(&big);
        let back = square.checked_div(&big).unwrap();
        assert_eq!(back, big);
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&s(6, 8)).unwrap();
        assert_eq!(json, "\"3/4\"");
        let back: Scalar = serde_json::from_str("\"-1.5\"").unwrap();
        assert_eq!(back, s(-3, 2));
    }
}
