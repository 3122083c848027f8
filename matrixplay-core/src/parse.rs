//! Text to Scalar conversion
//!
//! The only boundary where user text becomes a number. Accepted forms,
//! checked in this order:
//! - decimal: "1.25", "-.5", "3.", "1.5e3"
//! - fraction: "3/4", "-2 / 6"
//! - integer: "42", "-7", "3e2", "5e-1"

use dashu_int::IBig;
use crate::scalar::{Scalar, ScalarError};

/// Largest decimal exponent accepted in "<number>e<exp>" form
const MAX_EXPONENT: u32 = 4096;

/// Parse user text into a simplified Scalar
pub fn parse_scalar(text: &str) -> Result<Scalar, ScalarError> {
    let s = text.trim();

    if s.is_empty() {
        return Err(ScalarError::InvalidNumberFormat(text.to_string()));
    }

    if s.contains('.') {
        return parse_decimal(s);
    }

    if s.contains('/') {
        return parse_fraction(s);
    }

    parse_plain(s)
}

/// "[-+]digits.digits" with at least one digit overall, optionally
/// followed by "e<exp>"
fn parse_decimal(s: &str) -> Result<Scalar, ScalarError> {
    let invalid = || ScalarError::InvalidNumberFormat(s.to_string());

    let (mantissa, exponent) = split_exponent(s);
    let (negative, body) = split_sign(mantissa);
    let (int_part, frac_part) = body.split_once('.').ok_or_else(invalid)?;

    let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) || int_part.len() + frac_part.len() == 0 {
        return Err(invalid());
    }

    let digits = format!("{}{}", int_part, frac_part);
    let magnitude = digits.parse::<IBig>().map_err(|_| invalid())?;
    let numerator = if negative { -magnitude } else { magnitude };
    let denominator = IBig::from(10).pow(frac_part.len());

    match exponent {
        Some(exponent) => {
            let exponent = parse_exponent(exponent).ok_or_else(invalid)?;
            scaled(numerator, denominator, exponent)
        }
        None => Ok(Scalar::new(numerator, denominator)?.simplify()),
    }
}

/// "a/b" with exactly two integer parts
fn parse_fraction(s: &str) -> Result<Scalar, ScalarError> {
    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() != 2 {
        return Err(ScalarError::InvalidFractionFormat(s.to_string()));
    }

    let numerator = parse_integer(parts[0].trim())
        .ok_or_else(|| ScalarError::InvalidScalar(format!("{}: numerator is not an integer", s)))?;
    let denominator = parse_integer(parts[1].trim())
        .ok_or_else(|| ScalarError::InvalidScalar(format!("{}: denominator is not an integer", s)))?;

    Ok(Scalar::new(numerator, denominator)?.simplify())
}

/// Integer, optionally in "<mantissa>e<exponent>" form
fn parse_plain(s: &str) -> Result<Scalar, ScalarError> {
    let invalid = || ScalarError::InvalidNumberFormat(s.to_string());

    let (mantissa, exponent) = split_exponent(s);
    let mantissa = parse_integer(mantissa).ok_or_else(invalid)?;
    match exponent {
        Some(exponent) => {
            let exponent = parse_exponent(exponent).ok_or_else(invalid)?;
            scaled(mantissa, IBig::ONE, exponent)
        }
        None => Ok(Scalar::integer(mantissa)),
    }
}

/// Split "<mantissa>e<exponent>" at the first `e` or `E`
fn split_exponent(s: &str) -> (&str, Option<&str>) {
    match s.find(|c: char| c == 'e' || c == 'E') {
        Some(at) => (&s[..at], Some(&s[at + 1..])),
        None => (s, None),
    }
}

/// Signed integer exponent within `MAX_EXPONENT`
fn parse_exponent(text: &str) -> Option<i64> {
    let exponent: i64 = text.parse().ok()?;
    (exponent.unsigned_abs() <= MAX_EXPONENT as u64).then_some(exponent)
}

/// numerator / denominator × 10^exponent, exactly
fn scaled(numerator: IBig, denominator: IBig, exponent: i64) -> Result<Scalar, ScalarError> {
    let scale = IBig::from(10).pow(exponent.unsigned_abs() as usize);
    let result = if exponent >= 0 {
        Scalar::new(numerator * scale, denominator)?
    } else {
        Scalar::new(numerator, denominator * scale)?
    };
    Ok(result.simplify())
}

/// Optionally signed run of ASCII digits
fn parse_integer(s: &str) -> Option<IBig> {
    let (negative, digits) = split_sign(s);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let magnitude: IBig = digits.parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn split_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(n: i64, d: i64) -> Scalar {
        Scalar::new(n, d).unwrap()
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_scalar("1.25").unwrap(), s(5, 4));
        assert_eq!(parse_scalar("-0.5").unwrap(), s(-1, 2));
        assert_eq!(parse_scalar(".5").unwrap(), s(1, 2));
        assert_eq!(parse_scalar("3.").unwrap(), Scalar::from(3));
        assert_eq!(parse_scalar("  2.50 ").unwrap(), s(5, 2));
    }

    #[test]
    fn test_parse_decimal_is_reduced() {
        let x = parse_scalar("1.25").unwrap();
        assert_eq!(x.numerator(), &IBig::from(5));
        assert_eq!(x.denominator(), &IBig::from(4));
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        for bad in ["1.2.3", ".", "-.", "1.x", "a.5", "1.5e", "1.5e0.5", "1.5e3e1", ".e2"] {
            assert!(
                matches!(parse_scalar(bad), Err(ScalarError::InvalidNumberFormat(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_decimal_with_exponent() {
        assert_eq!(parse_scalar("1.5e3").unwrap(), Scalar::from(1500));
        assert_eq!(parse_scalar("2.5E-1").unwrap(), s(1, 4));
        assert_eq!(parse_scalar("-.5e+2").unwrap(), Scalar::from(-50));
        assert_eq!(parse_scalar("1.25e-3").unwrap(), s(1, 800));
        assert!(matches!(parse_scalar("1.5e99999"), Err(ScalarError::InvalidNumberFormat(_))));
    }

    #[test]
    fn test_parse_fraction() {
        let x = parse_scalar("3/4").unwrap();
        assert_eq!(x.numerator(), &IBig::from(3));
        assert_eq!(x.denominator(), &IBig::from(4));
        assert_eq!(parse_scalar("2/-6").unwrap().to_string(), "-1/3");
        assert_eq!(parse_scalar(" 10 / 5 ").unwrap().to_string(), "2");
    }

    #[test]
    fn test_parse_fraction_errors() {
        assert!(matches!(parse_scalar("1/2/3"), Err(ScalarError::InvalidFractionFormat(_))));
        assert!(matches!(parse_scalar("a/2"), Err(ScalarError::InvalidScalar(_))));
        assert!(matches!(parse_scalar("1/"), Err(ScalarError::InvalidScalar(_))));
        assert!(matches!(parse_scalar("1/0"), Err(ScalarError::InvalidScalar(_))));
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_scalar("42").unwrap(), Scalar::from(42));
        assert_eq!(parse_scalar("-7").unwrap(), Scalar::from(-7));
        assert_eq!(parse_scalar("+3").unwrap(), Scalar::from(3));
    }

    #[test]
    fn test_parse_scientific_integer_mantissa() {
        assert_eq!(parse_scalar("3e2").unwrap(), Scalar::from(300));
        assert_eq!(parse_scalar("5E-1").unwrap(), s(1, 2));
        assert!(parse_scalar("1e99999").is_err());
    }

    #[test]
    fn test_parse_rejects_words() {
        assert!(matches!(parse_scalar("abc"), Err(ScalarError::InvalidNumberFormat(_))));
        assert!(matches!(parse_scalar(""), Err(ScalarError::InvalidNumberFormat(_))));
        assert!(matches!(parse_scalar("   "), Err(ScalarError::InvalidNumberFormat(_))));
        assert!(matches!(parse_scalar("--1"), Err(ScalarError::InvalidNumberFormat(_))));
    }

    #[test]
    fn test_round_trip_through_display() {
        for x in [s(5, 4), s(-1, 3), Scalar::from(0), Scalar::from(-12), s(22, 7)] {
            let x = x.simplify();
            assert_eq!(parse_scalar(&x.to_string()).unwrap(), x);
        }
    }
}
