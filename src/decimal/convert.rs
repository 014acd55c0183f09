use num_traits::{ToPrimitive, Zero};

use super::BigDecimal;
use super::rounding::do_round;
use crate::bigint::BigInt;
use crate::context::{MathContext, RoundingMode};
use crate::error::{ArithmeticError, Error, FormatError};

impl From<i64> for BigDecimal {
    #[inline]
    fn from(n: i64) -> BigDecimal {
        BigDecimal::new(BigInt::from(n), 0)
    }
}

impl From<i32> for BigDecimal {
    #[inline]
    fn from(n: i32) -> BigDecimal {
        BigDecimal::new(BigInt::from(n), 0)
    }
}

impl From<BigInt> for BigDecimal {
    #[inline]
    fn from(n: BigInt) -> BigDecimal {
        BigDecimal::new(n, 0)
    }
}

impl BigDecimal {
    /// `n` rounded to `mc`.
    pub fn from_i64_with_context(n: i64, mc: &MathContext) -> Result<BigDecimal, ArithmeticError> {
        do_round(BigDecimal::from(n), mc)
    }

    /// `n` rounded to `mc`.
    pub fn from_bigint_with_context(
        n: BigInt,
        mc: &MathContext,
    ) -> Result<BigDecimal, ArithmeticError> {
        do_round(BigDecimal::from(n), mc)
    }

    /// The value of the shortest decimal string that reads back as `v`, so
    /// `from_f64(0.1)` is exactly `0.1`.
    pub fn from_f64(v: f64) -> Result<BigDecimal, FormatError> {
        if !v.is_finite() {
            return Err(FormatError::NonFinite);
        }
        format!("{:?}", v).parse()
    }

    /// The value of the shortest decimal string that reads back as `v`.
    pub fn from_f32(v: f32) -> Result<BigDecimal, FormatError> {
        if !v.is_finite() {
            return Err(FormatError::NonFinite);
        }
        format!("{:?}", v).parse()
    }

    /// The exact value of the binary fraction `v`:
    /// `from_f64_exact(0.1)` has 55 digits.
    pub fn from_f64_exact(v: f64) -> Result<BigDecimal, FormatError> {
        if !v.is_finite() {
            return Err(FormatError::NonFinite);
        }
        Ok(BigDecimal::from_finite_f64(v))
    }

    /// The exact value of `v`, rounded to `mc`.
    pub fn from_f64_exact_with_context(v: f64, mc: &MathContext) -> Result<BigDecimal, Error> {
        let exact = BigDecimal::from_f64_exact(v)?;
        Ok(do_round(exact, mc)?)
    }

    /// Expands a finite `v` as `significand × 2^exponent`, written over a
    /// power of ten when the exponent is negative.
    pub(crate) fn from_finite_f64(v: f64) -> BigDecimal {
        debug_assert!(v.is_finite());
        let bits = v.to_bits();
        let negative = bits >> 63 != 0;
        let biased = ((bits >> 52) & 0x7ff) as i32;
        let fraction = bits & ((1u64 << 52) - 1);
        let mut significand = if biased == 0 {
            fraction << 1
        } else {
            fraction | (1u64 << 52)
        };
        if significand == 0 {
            return BigDecimal::zero();
        }
        let mut exponent = biased - 1075;
        let twos = significand.trailing_zeros();
        significand >>= twos;
        exponent += twos as i32;

        let mut int_val = BigInt::from(significand);
        let scale = if exponent < 0 {
            let k = exponent.unsigned_abs();
            int_val = int_val * BigInt::from(5u32).pow(k);
            k as i32
        } else {
            int_val = int_val << exponent as u32;
            0
        };
        if negative {
            int_val = -int_val;
        }
        BigDecimal::new(int_val, scale)
    }

    /// The integer part, truncated toward zero.
    pub fn to_bigint(&self) -> BigInt {
        if self.scale <= 0 {
            return self.to_bigint_unchecked();
        }
        if i64::from(self.precision()) - i64::from(self.scale) <= 0 {
            return BigInt::zero();
        }
        self.set_scale(0, RoundingMode::Down)
            .map(BigDecimal::into_parts)
            .map_or_else(|_| BigInt::zero(), |(int_val, _)| int_val)
    }

    /// The value as an integer, or [`ArithmeticError::RoundingNecessary`]
    /// if it has a non-zero fractional part.
    pub fn to_bigint_exact(&self) -> Result<BigInt, ArithmeticError> {
        if self.scale <= 0 {
            return Ok(self.to_bigint_unchecked());
        }
        let (int_val, _) = self.set_scale(0, RoundingMode::Unnecessary)?.into_parts();
        Ok(int_val)
    }

    /// Appends the zeros of a non-positive scale.
    fn to_bigint_unchecked(&self) -> BigInt {
        debug_assert!(self.scale <= 0);
        super::tens::multiply_power_ten(&self.int_val, -self.scale)
    }

    /// The integral value, provided it has at most `digits` digits.
    fn to_integral_exact(&self, digits: i64, target: &'static str) -> Result<BigInt, ArithmeticError> {
        if self.is_zero() {
            return Ok(BigInt::zero());
        }
        let adjusted = i64::from(self.precision()) - i64::from(self.scale);
        if adjusted <= 0 {
            return Err(ArithmeticError::RoundingNecessary);
        }
        if adjusted > digits {
            return Err(ArithmeticError::OutOfRange(target));
        }
        self.to_bigint_exact()
    }

    /// Converts to `i64`, failing on a fractional part or overflow.
    pub fn to_i64_exact(&self) -> Result<i64, ArithmeticError> {
        self.to_integral_exact(19, "i64")?.to_i64_exact()
    }

    /// Converts to `i32`, failing on a fractional part or overflow.
    pub fn to_i32_exact(&self) -> Result<i32, ArithmeticError> {
        self.to_integral_exact(10, "i32")?.to_i32_exact()
    }

    /// Converts to `i16`, failing on a fractional part or overflow.
    pub fn to_i16_exact(&self) -> Result<i16, ArithmeticError> {
        self.to_integral_exact(5, "i16")?.to_i16_exact()
    }

    /// Converts to `i8`, failing on a fractional part or overflow.
    pub fn to_i8_exact(&self) -> Result<i8, ArithmeticError> {
        self.to_integral_exact(3, "i8")?.to_i8_exact()
    }

    /// The truncated integer part, if it has at most `digits` digits.
    fn bounded_integer_part(&self, digits: i64) -> Option<BigInt> {
        let adjusted = i64::from(self.precision()) - i64::from(self.scale);
        if adjusted > digits {
            None
        } else {
            Some(self.to_bigint())
        }
    }

    fn exponent_string(&self) -> String {
        format!("{}e{}", self.int_val, -i64::from(self.scale))
    }
}

/// Integer conversions truncate toward zero; float conversions round to
/// nearest and overflow to infinity.
impl ToPrimitive for BigDecimal {
    fn to_i64(&self) -> Option<i64> {
        self.bounded_integer_part(20)?.to_i64()
    }

    fn to_u64(&self) -> Option<u64> {
        self.bounded_integer_part(20)?.to_u64()
    }

    fn to_i128(&self) -> Option<i128> {
        self.bounded_integer_part(40)?.to_i128()
    }

    fn to_u128(&self) -> Option<u128> {
        self.bounded_integer_part(40)?.to_u128()
    }

    fn to_f32(&self) -> Option<f32> {
        self.exponent_string().parse().ok()
    }

    fn to_f64(&self) -> Option<f64> {
        self.exponent_string().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_from_integers() {
        assert_eq!(BigDecimal::from(-42i64).to_string(), "-42");
        assert_eq!(BigDecimal::from(7i32), dec("7"));
        assert_eq!(BigDecimal::from(BigInt::from(10)).precision(), 2);
        let mc = MathContext::new(2);
        assert_eq!(BigDecimal::from_i64_with_context(12345, &mc).unwrap().to_string(), "1.2E+4");
        assert_eq!(
            BigDecimal::from_bigint_with_context(BigInt::from(-155), &mc).unwrap().to_string(),
            "-1.6E+2"
        );
    }

    #[test]
    fn test_from_f64_shortest() {
        assert_eq!(BigDecimal::from_f64(0.1).unwrap(), BigDecimal::one_tenth());
        assert_eq!(BigDecimal::from_f64(100.0).unwrap().to_string(), "100.0");
        assert_eq!(BigDecimal::from_f64(1e20).unwrap().to_string(), "1E+20");
        assert_eq!(BigDecimal::from_f64(-2.5e-8).unwrap().to_string(), "-2.5E-8");
        assert_eq!(BigDecimal::from_f64(-0.0).unwrap().signum(), 0);
        assert_eq!(BigDecimal::from_f32(0.1).unwrap().to_string(), "0.1");
        assert_eq!(BigDecimal::from_f64(f64::NAN), Err(FormatError::NonFinite));
        assert_eq!(BigDecimal::from_f32(f32::INFINITY), Err(FormatError::NonFinite));
    }

    #[test]
    fn test_from_f64_exact() {
        assert_eq!(
            BigDecimal::from_f64_exact(0.1).unwrap().to_string(),
            "0.1000000000000000055511151231257827021181583404541015625"
        );
        assert_eq!(BigDecimal::from_f64_exact(0.5).unwrap().to_string(), "0.5");
        assert_eq!(BigDecimal::from_f64_exact(-8.0).unwrap().to_string(), "-8");
        assert_eq!(
            BigDecimal::from_f64_exact(1e20).unwrap().to_string(),
            "100000000000000000000"
        );
        assert_eq!(BigDecimal::from_f64_exact(0.0).unwrap(), BigDecimal::zero());
        let tiny = BigDecimal::from_f64_exact(f64::from_bits(1)).unwrap();
        assert_eq!(tiny.scale(), 1074);
        assert_eq!(BigDecimal::from_f64_exact(f64::NEG_INFINITY), Err(FormatError::NonFinite));
        let rounded = BigDecimal::from_f64_exact_with_context(0.1, &MathContext::DECIMAL32).unwrap();
        assert_eq!(rounded.to_string(), "0.1000000");
    }

    #[test]
    fn test_to_bigint() {
        assert_eq!(dec("-12.99").to_bigint(), BigInt::from(-12));
        assert_eq!(dec("1.2E+3").to_bigint(), BigInt::from(1200));
        assert_eq!(dec("1E-1000000000").to_bigint(), BigInt::zero());
        assert_eq!(dec("120.00").to_bigint_exact(), Ok(BigInt::from(120)));
        assert_eq!(dec("12.5").to_bigint_exact(), Err(ArithmeticError::RoundingNecessary));
    }

    #[test]
    fn test_exact_integer_conversions() {
        assert_eq!(dec("2147483647").to_i32_exact(), Ok(i32::MAX));
        assert_eq!(dec("2147483648").to_i32_exact(), Err(ArithmeticError::OutOfRange("i32")));
        assert_eq!(dec("1E+30").to_i64_exact(), Err(ArithmeticError::OutOfRange("i64")));
        assert_eq!(dec("-9223372036854775808").to_i64_exact(), Ok(i64::MIN));
        assert_eq!(dec("-128.000").to_i8_exact(), Ok(-128));
        assert_eq!(dec("128").to_i8_exact(), Err(ArithmeticError::OutOfRange("i8")));
        assert_eq!(dec("0.5").to_i16_exact(), Err(ArithmeticError::RoundingNecessary));
        assert_eq!(dec("1E-1000000000").to_i64_exact(), Err(ArithmeticError::RoundingNecessary));
        assert_eq!(dec("0.000").to_i64_exact(), Ok(0));
    }

    #[test]
    fn test_to_primitive() {
        assert_eq!(dec("123.456").to_f64(), Some(123.456));
        assert_eq!(dec("1E+400").to_f64(), Some(f64::INFINITY));
        assert_eq!(dec("-1E-400").to_f64(), Some(-0.0));
        assert_eq!(dec("-0.1").to_f32(), Some(-0.1f32));
        assert_eq!(dec("-7.9").to_i64(), Some(-7));
        assert_eq!(dec("1E+25").to_i64(), None);
        assert_eq!(dec("-1").to_u64(), None);
        assert_eq!(dec("18446744073709551615.9").to_u64(), Some(u64::MAX));
    }
}
