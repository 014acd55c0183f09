use core::str::FromStr;

use super::BigDecimal;
use super::rounding::do_round;
use crate::bigint::from_ascii_digits;
use crate::context::MathContext;
use crate::error::{Error, FormatError};

/// Exponents with more significant digits than this cannot fit a scale.
const MAX_EXPONENT_DIGITS: usize = 10;

/// Parses the digits after an exponent mark: an optional sign and up to
/// ten significant decimal digits.
fn parse_exponent(bytes: &[u8]) -> Result<i64, FormatError> {
    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };
    if digits.is_empty() {
        return Err(FormatError::MissingExponentDigits);
    }

    let significant = match digits.iter().position(|&c| c != b'0') {
        Some(start) => &digits[start..],
        None => &digits[digits.len() - 1..],
    };
    if significant.len() > MAX_EXPONENT_DIGITS {
        return Err(FormatError::TooManyExponentDigits);
    }
    let mut exp = 0i64;
    for &c in significant {
        if !c.is_ascii_digit() {
            return Err(FormatError::InvalidDigit);
        }
        exp = exp * 10 + i64::from(c - b'0');
    }
    Ok(if negative { -exp } else { exp })
}

/// Parses `[sign] digits [. digits] [e|E [sign] digits]`.
fn parse_decimal(s: &str) -> Result<BigDecimal, FormatError> {
    let bytes = s.as_bytes();
    let (negative, rest) = match bytes.first() {
        None => return Err(FormatError::Empty),
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        Some(_) => (false, bytes),
    };

    let mut digits = Vec::with_capacity(rest.len());
    let mut dot = false;
    let mut scale = 0i64;
    let mut exp = 0i64;
    for (i, &c) in rest.iter().enumerate() {
        match c {
            b'0'..=b'9' => {
                digits.push(c);
                if dot {
                    scale += 1;
                }
            }
            b'.' => {
                if dot {
                    return Err(FormatError::MultipleDecimalPoints);
                }
                dot = true;
            }
            b'e' | b'E' => {
                exp = parse_exponent(&rest[i + 1..])?;
                if i32::try_from(exp).is_err() {
                    return Err(FormatError::TooLarge);
                }
                break;
            }
            b'+' | b'-' => return Err(FormatError::EmbeddedSign),
            _ => return Err(FormatError::InvalidDigit),
        }
    }
    if digits.is_empty() {
        return Err(FormatError::NoDigits);
    }

    let scale = i32::try_from(scale - exp).map_err(|_| FormatError::ScaleOutOfRange)?;
    // Leading zeros do not count toward the precision.
    let precision = match digits.iter().position(|&c| c != b'0') {
        Some(start) => digits.len() - start,
        None => 1,
    };
    let magnitude = from_ascii_digits(&digits);
    let int_val = if negative { -magnitude } else { magnitude };
    Ok(BigDecimal::from_parts_with_precision(
        int_val,
        scale,
        u32::try_from(precision).map_err(|_| FormatError::TooLarge)?,
    ))
}

impl FromStr for BigDecimal {
    type Err = FormatError;

    /// Parses the form written by `Display`, such as `-1.23E+5`, as well as
    /// plain and lowercase-exponent forms.
    fn from_str(s: &str) -> Result<BigDecimal, FormatError> {
        parse_decimal(s)
    }
}

impl BigDecimal {
    /// Parses `s` and rounds the result to `mc`.
    pub fn from_str_with_context(s: &str, mc: &MathContext) -> Result<BigDecimal, Error> {
        let value = parse_decimal(s)?;
        Ok(do_round(value, mc)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigint::BigInt;
    use crate::context::RoundingMode;
    use crate::error::ArithmeticError;

    fn parts(s: &str) -> (BigInt, i32, u32) {
        let v = BigDecimal::from_str(s).unwrap();
        (v.unscaled_value().clone(), v.scale(), v.precision())
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(parts("0.00"), (BigInt::from(0), 2, 1));
        assert_eq!(parts("-1.23E-10"), (BigInt::from(-123), 12, 3));
        assert_eq!(parts("1e+5"), (BigInt::from(1), -5, 1));
        assert_eq!(parts("1E5"), (BigInt::from(1), -5, 1));
        assert_eq!(parts("+.5"), (BigInt::from(5), 1, 1));
        assert_eq!(parts("5."), (BigInt::from(5), 0, 1));
        assert_eq!(parts("007.50"), (BigInt::from(750), 2, 3));
        assert_eq!(parts("1e0000000000001"), (BigInt::from(1), -1, 1));
        assert_eq!(parts("1E-2147483647"), (BigInt::from(1), i32::MAX, 1));
    }

    #[test]
    fn test_parse_errors() {
        let cases = [
            ("", FormatError::Empty),
            ("-", FormatError::NoDigits),
            (".", FormatError::NoDigits),
            ("e5", FormatError::NoDigits),
            ("1.2.3", FormatError::MultipleDecimalPoints),
            ("1e", FormatError::MissingExponentDigits),
            ("1e+", FormatError::MissingExponentDigits),
            ("1e12345678901", FormatError::TooManyExponentDigits),
            ("1e2147483648", FormatError::TooLarge),
            ("1E-2147483648", FormatError::ScaleOutOfRange),
            ("0.1E-2147483647", FormatError::ScaleOutOfRange),
            ("1-2", FormatError::EmbeddedSign),
            ("--1", FormatError::EmbeddedSign),
            ("1x", FormatError::InvalidDigit),
            ("1e1x", FormatError::InvalidDigit),
            (" 1", FormatError::InvalidDigit),
        ];
        for (input, err) in cases {
            assert_eq!(BigDecimal::from_str(input), Err(err), "{:?}", input);
        }
    }

    #[test]
    fn test_parse_with_context() {
        let v = BigDecimal::from_str_with_context("123.456", &MathContext::new(4)).unwrap();
        assert_eq!(v.to_string(), "123.5");
        let mc = MathContext::with_rounding(3, RoundingMode::Floor);
        let v = BigDecimal::from_str_with_context("1234567", &mc).unwrap();
        assert_eq!(v.to_string(), "1.23E+6");
        let mc = MathContext::with_rounding(2, RoundingMode::Unnecessary);
        assert_eq!(
            BigDecimal::from_str_with_context("1.25", &mc),
            Err(Error::Arithmetic(ArithmeticError::RoundingNecessary))
        );
        assert_eq!(
            BigDecimal::from_str_with_context("1..2", &mc),
            Err(Error::Format(FormatError::MultipleDecimalPoints))
        );
    }
}
