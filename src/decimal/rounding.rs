//! The rounding core shared by every context-bearing decimal operation.

use core::cmp::Ordering::{self, Greater, Less};

use num_integer::Integer;
use num_traits::Zero;

use super::BigDecimal;
use super::tens::{big_digit_length, big_ten_to_the};
use crate::bigint::BigInt;
use crate::context::{MathContext, RoundingMode};
use crate::error::ArithmeticError;

/// Narrows a computed scale to `i32`. Zero values saturate instead of
/// failing.
pub(crate) fn check_scale(int_val: &BigInt, val: i64) -> Result<i32, ArithmeticError> {
    match i32::try_from(val) {
        Ok(scale) => Ok(scale),
        Err(_) if int_val.is_zero() => Ok(if val > 0 { i32::MAX } else { i32::MIN }),
        Err(_) => Err(scale_error(val)),
    }
}

/// Narrows a computed scale of a value known to be non-zero.
pub(crate) fn check_scale_non_zero(val: i64) -> Result<i32, ArithmeticError> {
    i32::try_from(val).map_err(|_| scale_error(val))
}

fn scale_error(val: i64) -> ArithmeticError {
    if val > 0 {
        ArithmeticError::Underflow
    } else {
        ArithmeticError::Overflow
    }
}

/// Whether a truncated quotient must move one unit away from zero.
///
/// `frac_half` compares the discarded fraction against one half.
pub(crate) fn need_increment(
    mode: RoundingMode,
    qsign: i32,
    frac_half: Ordering,
    odd_quotient: bool,
) -> Result<bool, ArithmeticError> {
    Ok(match mode {
        RoundingMode::Unnecessary => return Err(ArithmeticError::RoundingNecessary),
        RoundingMode::Up => true,
        RoundingMode::Down => false,
        RoundingMode::Ceiling => qsign > 0,
        RoundingMode::Floor => qsign < 0,
        RoundingMode::HalfUp | RoundingMode::HalfDown | RoundingMode::HalfEven => match frac_half {
            Less => false,
            Greater => true,
            Ordering::Equal => match mode {
                RoundingMode::HalfUp => true,
                RoundingMode::HalfDown => false,
                _ => odd_quotient,
            },
        },
    })
}

/// `dividend / divisor` rounded to an integer by `mode`. The divisor must
/// be non-zero.
pub(crate) fn divide_and_round(
    dividend: &BigInt,
    divisor: &BigInt,
    mode: RoundingMode,
) -> Result<BigInt, ArithmeticError> {
    let (q, r) = dividend.divide_and_remainder(divisor)?;
    if r.is_zero() {
        return Ok(q);
    }
    let qsign = if dividend.sign() == divisor.sign() { 1 } else { -1 };
    let frac_half = (r.magnitude_value() << 1usize).cmp_magnitude(divisor);
    if need_increment(mode, qsign, frac_half, q.is_odd())? {
        Ok(if qsign > 0 { q + 1u32 } else { q - 1u32 })
    } else {
        Ok(q)
    }
}

/// `dividend / divisor` rounded to an integer and placed at `scale`. An
/// exact quotient sheds trailing zeros toward `preferred_scale`.
pub(crate) fn divide_and_round_to_scale(
    dividend: &BigInt,
    divisor: &BigInt,
    scale: i32,
    mode: RoundingMode,
    preferred_scale: i32,
) -> Result<BigDecimal, ArithmeticError> {
    let (q, r) = dividend.divide_and_remainder(divisor)?;
    if !r.is_zero() {
        let qsign = if dividend.sign() == divisor.sign() { 1 } else { -1 };
        let frac_half = (r.magnitude_value() << 1usize).cmp_magnitude(divisor);
        let q = if need_increment(mode, qsign, frac_half, q.is_odd())? {
            if qsign > 0 { q + 1u32 } else { q - 1u32 }
        } else {
            q
        };
        return Ok(BigDecimal::new(q, scale));
    }
    if preferred_scale != scale {
        create_and_strip_zeros_to_match_scale(q, scale, i64::from(preferred_scale))
    } else {
        Ok(BigDecimal::new(q, scale))
    }
}

/// Removes trailing decimal zeros while the scale stays above
/// `preferred_scale`.
pub(crate) fn create_and_strip_zeros_to_match_scale(
    mut int_val: BigInt,
    mut scale: i32,
    preferred_scale: i64,
) -> Result<BigDecimal, ArithmeticError> {
    let ten = BigInt::ten();
    while int_val.cmp_magnitude(&ten) != Less && i64::from(scale) > preferred_scale {
        if int_val.is_odd() {
            break;
        }
        let (q, r) = int_val.div_rem(&ten);
        if !r.is_zero() {
            break;
        }
        int_val = q;
        scale = check_scale(&int_val, i64::from(scale) - 1)?;
    }
    Ok(BigDecimal::new(int_val, scale))
}

/// Rounds `val` to the precision of `mc`.
///
/// One carry can add a digit back, so the loop runs until the digit count
/// fits: `999.9` to three digits becomes `1.00E+3`.
pub(crate) fn do_round(val: BigDecimal, mc: &MathContext) -> Result<BigDecimal, ArithmeticError> {
    let mcp = i64::from(mc.precision());
    if mcp == 0 {
        return Ok(val);
    }
    let mut prec = i64::from(val.precision());
    let mut drop = prec - mcp;
    if drop <= 0 {
        return Ok(val);
    }

    let (mut int_val, mut scale) = val.into_parts();
    while drop > 0 {
        scale = check_scale_non_zero(i64::from(scale) - drop)?;
        int_val = divide_and_round(&int_val, &big_ten_to_the(drop as u32), mc.rounding_mode())?;
        prec = i64::from(big_digit_length(&int_val));
        drop = prec - mcp;
    }
    Ok(BigDecimal::from_parts_with_precision(int_val, scale, prec as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RoundingMode::*;
    use core::str::FromStr;

    fn round_int(n: i64, d: i64, mode: RoundingMode) -> Result<i64, ArithmeticError> {
        divide_and_round(&BigInt::from(n), &BigInt::from(d), mode).map(|q| q.to_i64_exact().unwrap())
    }

    #[test]
    fn test_rounding_table() {
        // Values x / 10 for x in 55, 25, 16, 11, 10, -10, -11, -16, -25, -55.
        let inputs = [55, 25, 16, 11, 10, -10, -11, -16, -25, -55];
        let table: [(RoundingMode, [i64; 10]); 7] = [
            (Up, [6, 3, 2, 2, 1, -1, -2, -2, -3, -6]),
            (Down, [5, 2, 1, 1, 1, -1, -1, -1, -2, -5]),
            (Ceiling, [6, 3, 2, 2, 1, -1, -1, -1, -2, -5]),
            (Floor, [5, 2, 1, 1, 1, -1, -2, -2, -3, -6]),
            (HalfUp, [6, 3, 2, 1, 1, -1, -1, -2, -3, -6]),
            (HalfDown, [5, 2, 2, 1, 1, -1, -1, -2, -2, -5]),
            (HalfEven, [6, 2, 2, 1, 1, -1, -1, -2, -2, -6]),
        ];
        for (mode, expected) in table {
            for (x, want) in inputs.iter().zip(expected) {
                assert_eq!(round_int(*x, 10, mode), Ok(want), "{} / 10 {:?}", x, mode);
            }
        }
    }

    #[test]
    fn test_unnecessary() {
        assert_eq!(round_int(20, 10, Unnecessary), Ok(2));
        assert_eq!(round_int(21, 10, Unnecessary), Err(ArithmeticError::RoundingNecessary));
    }

    #[test]
    fn test_check_scale() {
        let one = BigInt::from(1);
        let zero = BigInt::zero();
        assert_eq!(check_scale(&one, 5), Ok(5));
        assert_eq!(check_scale(&one, i64::from(i32::MAX) + 1), Err(ArithmeticError::Underflow));
        assert_eq!(check_scale(&one, i64::from(i32::MIN) - 1), Err(ArithmeticError::Overflow));
        assert_eq!(check_scale(&zero, i64::from(i32::MAX) + 1), Ok(i32::MAX));
        assert_eq!(check_scale(&zero, i64::from(i32::MIN) - 1), Ok(i32::MIN));
    }

    #[test]
    fn test_do_round_carry() {
        let v = BigDecimal::from_str("999.9").unwrap();
        let r = do_round(v, &MathContext::new(3)).unwrap();
        assert_eq!(r.unscaled_value(), &BigInt::from(100));
        assert_eq!(r.scale(), -1);
        assert_eq!(r.to_string(), "1.00E+3");
    }

    #[test]
    fn test_strip_zeros_to_scale() {
        let v = create_and_strip_zeros_to_match_scale(BigInt::from(12000), 5, 3).unwrap();
        assert_eq!((v.unscaled_value().clone(), v.scale()), (BigInt::from(120), 3));
        let v = create_and_strip_zeros_to_match_scale(BigInt::from(12000), 5, i64::MIN).unwrap();
        assert_eq!((v.unscaled_value().clone(), v.scale()), (BigInt::from(12), 2));
    }
}
