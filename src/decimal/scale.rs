use num_traits::{One, Zero};

use super::BigDecimal;
use super::rounding::{check_scale, create_and_strip_zeros_to_match_scale, divide_and_round_to_scale, do_round};
use super::tens::{big_ten_to_the, multiply_power_ten};
use crate::bigint::BigInt;
use crate::context::{MathContext, RoundingMode};
use crate::error::ArithmeticError;

impl BigDecimal {
    /// The value rounded to `mc`. Unlimited precision returns the value
    /// unchanged.
    pub fn round(&self, mc: &MathContext) -> Result<BigDecimal, ArithmeticError> {
        self.plus_with_context(mc)
    }

    /// Same as [`BigDecimal::round`].
    pub fn plus_with_context(&self, mc: &MathContext) -> Result<BigDecimal, ArithmeticError> {
        if mc.precision() == 0 {
            return Ok(self.clone());
        }
        do_round(self.clone(), mc)
    }

    /// The absolute value, at the same scale.
    pub fn abs(&self) -> BigDecimal {
        if self.signum() < 0 { -self } else { self.clone() }
    }

    /// The absolute value rounded to `mc`.
    pub fn abs_with_context(&self, mc: &MathContext) -> Result<BigDecimal, ArithmeticError> {
        if self.signum() < 0 {
            self.negate_with_context(mc)
        } else {
            self.plus_with_context(mc)
        }
    }

    /// The negated value rounded to `mc`.
    pub fn negate_with_context(&self, mc: &MathContext) -> Result<BigDecimal, ArithmeticError> {
        (-self).plus_with_context(mc)
    }

    /// The same value at `new_scale`. Raising the scale appends zeros;
    /// lowering it divides with `mode`, so [`RoundingMode::Unnecessary`]
    /// fails unless only zeros are dropped.
    pub fn set_scale(
        &self,
        new_scale: i32,
        mode: RoundingMode,
    ) -> Result<BigDecimal, ArithmeticError> {
        let old_scale = self.scale;
        if new_scale == old_scale {
            return Ok(self.clone());
        }
        if self.is_zero() {
            return Ok(BigDecimal::zero_value_of(new_scale));
        }

        if new_scale > old_scale {
            let raise = check_scale(&self.int_val, i64::from(new_scale) - i64::from(old_scale))?;
            let precision = self.precision.get().map_or(0, |p| p + raise as u32);
            Ok(BigDecimal::from_parts_with_precision(
                multiply_power_ten(&self.int_val, raise),
                new_scale,
                precision,
            ))
        } else {
            let drop = check_scale(&self.int_val, i64::from(old_scale) - i64::from(new_scale))?;
            divide_and_round_to_scale(
                &self.int_val,
                &big_ten_to_the(drop as u32),
                new_scale,
                mode,
                new_scale,
            )
        }
    }

    /// Moves the decimal point `n` places to the left. The result scale is
    /// `max(scale + n, 0)`.
    pub fn move_point_left(&self, n: i32) -> Result<BigDecimal, ArithmeticError> {
        self.moved_point(i64::from(self.scale) + i64::from(n))
    }

    /// Moves the decimal point `n` places to the right. The result scale is
    /// `max(scale - n, 0)`.
    pub fn move_point_right(&self, n: i32) -> Result<BigDecimal, ArithmeticError> {
        self.moved_point(i64::from(self.scale) - i64::from(n))
    }

    fn moved_point(&self, new_scale: i64) -> Result<BigDecimal, ArithmeticError> {
        let new_scale = check_scale(&self.int_val, new_scale)?;
        let num = BigDecimal::new(self.int_val.clone(), new_scale);
        if num.scale < 0 {
            num.set_scale(0, RoundingMode::Unnecessary)
        } else {
            Ok(num)
        }
    }

    /// `self × 10^n`, computed by adjusting the scale alone.
    pub fn scale_by_power_of_ten(&self, n: i32) -> Result<BigDecimal, ArithmeticError> {
        let scale = check_scale(&self.int_val, i64::from(self.scale) - i64::from(n))?;
        let precision = self.precision.get().copied().unwrap_or(0);
        Ok(BigDecimal::from_parts_with_precision(
            self.int_val.clone(),
            scale,
            precision,
        ))
    }

    /// The numerically equal value with every trailing zero removed from
    /// the unscaled value. Zero becomes `0` at scale 0.
    pub fn strip_trailing_zeros(&self) -> Result<BigDecimal, ArithmeticError> {
        if self.is_zero() {
            return Ok(BigDecimal::zero());
        }
        create_and_strip_zeros_to_match_scale(self.int_val.clone(), self.scale, i64::MIN)
    }

    /// The size of one unit in the last place: `1 × 10^-scale`.
    pub fn ulp(&self) -> BigDecimal {
        BigDecimal::from_parts_with_precision(BigInt::one(), self.scale, 1)
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
    fn test_set_scale_half_even_ties() {
        assert_eq!(dec("2.5").set_scale(0, RoundingMode::HalfEven).unwrap(), dec("2"));
        assert_eq!(dec("3.5").set_scale(0, RoundingMode::HalfEven).unwrap(), dec("4"));
        assert_eq!(dec("-2.5").set_scale(0, RoundingMode::HalfEven).unwrap(), dec("-2"));
    }

    #[test]
    fn test_set_scale() {
        assert_eq!(dec("1.5").set_scale(3, RoundingMode::Unnecessary).unwrap().to_string(), "1.500");
        assert_eq!(dec("1.500").set_scale(1, RoundingMode::Unnecessary).unwrap().to_string(), "1.5");
        assert_eq!(
            dec("1.55").set_scale(1, RoundingMode::Unnecessary),
            Err(ArithmeticError::RoundingNecessary)
        );
        assert_eq!(dec("1.55").set_scale(1, RoundingMode::Floor).unwrap().to_string(), "1.5");
        assert_eq!(dec("123").set_scale(-2, RoundingMode::HalfUp).unwrap().to_string(), "1E+2");
        assert_eq!(dec("0.00").set_scale(5, RoundingMode::Unnecessary).unwrap().scale(), 5);
    }

    #[test]
    fn test_round() {
        let mc = MathContext::with_rounding(2, RoundingMode::Ceiling);
        assert_eq!(dec("1.234").round(&mc).unwrap().to_string(), "1.3");
        assert_eq!(dec("-1.234").round(&mc).unwrap().to_string(), "-1.2");
        assert_eq!(dec("1.234").round(&MathContext::UNLIMITED).unwrap(), dec("1.234"));
        assert_eq!(dec("-1.26").abs_with_context(&mc).unwrap().to_string(), "1.3");
        assert_eq!(dec("1.26").negate_with_context(&mc).unwrap().to_string(), "-1.2");
    }

    #[test]
    fn test_move_point() {
        assert_eq!(dec("123.45").move_point_left(3).unwrap().to_string(), "0.12345");
        assert_eq!(dec("123.45").move_point_right(1).unwrap().to_string(), "1234.5");
        // The scale never goes negative.
        let moved = dec("123.45").move_point_right(4).unwrap();
        assert_eq!(moved.scale(), 0);
        assert_eq!(moved.to_string(), "1234500");
        assert_eq!(dec("1").move_point_left(-2).unwrap().to_string(), "100");
    }

    #[test]
    fn test_scale_by_power_of_ten() {
        let v = dec("1.25").scale_by_power_of_ten(3).unwrap();
        assert_eq!((v.unscaled_value().clone(), v.scale()), (BigInt::from(125), -1));
        assert_eq!(v.to_string(), "1.25E+3");
        assert_eq!(
            dec("1E-2147483647").scale_by_power_of_ten(-2),
            Err(ArithmeticError::Underflow)
        );
    }

    #[test]
    fn test_strip_trailing_zeros() {
        assert_eq!(dec("1.2300").strip_trailing_zeros().unwrap().to_string(), "1.23");
        assert_eq!(dec("1200").strip_trailing_zeros().unwrap().to_string(), "1.2E+3");
        let zero = dec("0.000").strip_trailing_zeros().unwrap();
        assert_eq!((zero.scale(), zero.to_string()), (0, "0".to_string()));
    }

    #[test]
    fn test_ulp() {
        assert_eq!(dec("123.45").ulp().to_string(), "0.01");
        assert_eq!(dec("5E+3").ulp().to_string(), "1E+3");
        assert_eq!(dec("0").ulp(), dec("1"));
    }
}
