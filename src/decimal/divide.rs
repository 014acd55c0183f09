use core::cmp::Ordering::{self, Greater, Less};

use num_traits::Zero;

use super::BigDecimal;
use super::rounding::{
    check_scale, check_scale_non_zero, create_and_strip_zeros_to_match_scale,
    divide_and_round_to_scale, do_round,
};
use super::tens::multiply_power_ten;
use crate::bigint::BigInt;
use crate::context::{MathContext, RoundingMode};
use crate::error::ArithmeticError;

fn saturate_scale(scale: i64) -> i32 {
    scale.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Compares `xs × 10^-xscale` with `ys × 10^-yscale` by magnitude, where
/// the scales differ by at most a digit count.
fn compare_magnitude_normalized(xs: &BigInt, xscale: i64, ys: &BigInt, yscale: i64) -> Ordering {
    let sdiff = xscale - yscale;
    if sdiff < 0 {
        multiply_power_ten(xs, (-sdiff) as i32).cmp_magnitude(ys)
    } else {
        xs.cmp_magnitude(&multiply_power_ten(ys, sdiff as i32))
    }
}

impl BigDecimal {
    fn check_divisor(&self, divisor: &BigDecimal) -> Result<(), ArithmeticError> {
        if !divisor.is_zero() {
            Ok(())
        } else if self.is_zero() {
            Err(ArithmeticError::DivisionUndefined)
        } else {
            Err(ArithmeticError::DivisionByZero)
        }
    }

    /// The exact quotient, at the preferred scale `self.scale − divisor.scale`
    /// when that scale can hold it.
    ///
    /// Fails with [`ArithmeticError::NonTerminating`] when the quotient has
    /// no finite decimal expansion, such as `1 / 3`.
    pub fn divide(&self, divisor: &BigDecimal) -> Result<BigDecimal, ArithmeticError> {
        self.check_divisor(divisor)?;
        let preferred_scale = saturate_scale(i64::from(self.scale) - i64::from(divisor.scale));
        if self.is_zero() {
            return Ok(BigDecimal::zero_value_of(preferred_scale));
        }

        // A terminating quotient never needs more digits than this.
        let digits = u64::from(self.precision()) + (10 * u64::from(divisor.precision())).div_ceil(3);
        let mc = MathContext::with_rounding(
            digits.min(i32::MAX as u64) as u32,
            RoundingMode::Unnecessary,
        );
        let quotient = self.divide_with_context(divisor, &mc).map_err(|err| match err {
            ArithmeticError::RoundingNecessary => ArithmeticError::NonTerminating,
            other => other,
        })?;

        if preferred_scale > quotient.scale {
            quotient.set_scale(preferred_scale, RoundingMode::Unnecessary)
        } else {
            Ok(quotient)
        }
    }

    /// The quotient rounded to `mc`.
    ///
    /// The result is as close as the precision allows to the preferred
    /// scale `self.scale − divisor.scale`: `19 / 100` to three digits is
    /// `0.19`, while the inexact `21 / 110` is `0.190`.
    pub fn divide_with_context(
        &self,
        divisor: &BigDecimal,
        mc: &MathContext,
    ) -> Result<BigDecimal, ArithmeticError> {
        if mc.precision() == 0 {
            return self.divide(divisor);
        }
        self.check_divisor(divisor)?;
        let preferred_scale = i64::from(self.scale) - i64::from(divisor.scale);
        if self.is_zero() {
            return Ok(BigDecimal::zero_value_of(saturate_scale(preferred_scale)));
        }

        // Both operands are normalised into [0.1, 1); the divisor is scaled
        // up by ten when that keeps the quotient in the same range.
        let xscale = i64::from(self.precision());
        let mut yscale = i64::from(divisor.precision());
        if compare_magnitude_normalized(&self.int_val, xscale, &divisor.int_val, yscale) == Greater {
            yscale -= 1;
        }

        let mcp = i64::from(mc.precision());
        let mode = mc.rounding_mode();
        let scl = check_scale_non_zero(preferred_scale + yscale - xscale + mcp)?;
        let preferred = check_scale_non_zero(preferred_scale)?;
        let quotient = if check_scale_non_zero(mcp + yscale - xscale)? > 0 {
            let raise = check_scale_non_zero(mcp + yscale - xscale)?;
            let scaled = multiply_power_ten(&self.int_val, raise);
            divide_and_round_to_scale(&scaled, &divisor.int_val, scl, mode, preferred)?
        } else {
            let new_scale = check_scale_non_zero(xscale - mcp)?;
            let raise = check_scale_non_zero(i64::from(new_scale) - yscale)?;
            let scaled = multiply_power_ten(&divisor.int_val, raise);
            divide_and_round_to_scale(&self.int_val, &scaled, scl, mode, preferred)?
        };
        // A rounding carry may have added a digit.
        do_round(quotient, mc)
    }

    /// The quotient at `scale`, rounded by `mode`.
    pub fn divide_with_scale(
        &self,
        divisor: &BigDecimal,
        scale: i32,
        mode: RoundingMode,
    ) -> Result<BigDecimal, ArithmeticError> {
        self.check_divisor(divisor)?;
        if self.is_zero() {
            return Ok(BigDecimal::zero_value_of(scale));
        }

        let dividend_scale = i64::from(self.scale);
        let divisor_scale = i64::from(divisor.scale);
        let target = i64::from(scale);
        if i64::from(check_scale(&self.int_val, target + divisor_scale)?) > dividend_scale {
            let raise = check_scale_non_zero(target + divisor_scale - dividend_scale)?;
            let scaled = multiply_power_ten(&self.int_val, raise);
            divide_and_round_to_scale(&scaled, &divisor.int_val, scale, mode, scale)
        } else {
            let new_scale = check_scale(&divisor.int_val, dividend_scale - target)?;
            let raise = check_scale_non_zero(i64::from(new_scale) - divisor_scale)?;
            let scaled = multiply_power_ten(&divisor.int_val, raise);
            divide_and_round_to_scale(&self.int_val, &scaled, scale, mode, scale)
        }
    }

    /// The quotient at the scale of `self`, rounded by `mode`.
    pub fn divide_with_rounding(
        &self,
        divisor: &BigDecimal,
        mode: RoundingMode,
    ) -> Result<BigDecimal, ArithmeticError> {
        self.divide_with_scale(divisor, self.scale, mode)
    }

    /// The integer part of the exact quotient, at the preferred scale
    /// `self.scale − divisor.scale` when that scale can hold it.
    pub fn divide_to_integral_value(
        &self,
        divisor: &BigDecimal,
    ) -> Result<BigDecimal, ArithmeticError> {
        self.check_divisor(divisor)?;
        let preferred_scale = saturate_scale(i64::from(self.scale) - i64::from(divisor.scale));
        if self.compare_magnitude(divisor) == Less {
            return Ok(BigDecimal::zero_value_of(preferred_scale));
        }

        let max_digits = u64::from(self.precision())
            + (10 * u64::from(divisor.precision())).div_ceil(3)
            + (i64::from(self.scale) - i64::from(divisor.scale)).unsigned_abs()
            + 2;
        let mc = MathContext::with_rounding(
            max_digits.min(i32::MAX as u64) as u32,
            RoundingMode::Down,
        );
        let mut quotient = self.divide_with_context(divisor, &mc)?;
        if quotient.scale > 0 {
            let (int_val, scale) = quotient.set_scale(0, RoundingMode::Down)?.into_parts();
            quotient =
                create_and_strip_zeros_to_match_scale(int_val, scale, i64::from(preferred_scale))?;
        }
        if quotient.scale < preferred_scale {
            quotient = quotient.set_scale(preferred_scale, RoundingMode::Unnecessary)?;
        }
        Ok(quotient)
    }

    /// The integer part of the quotient, which must fit in the precision of
    /// `mc` or the division fails with
    /// [`ArithmeticError::DivisionImpossible`].
    pub fn divide_to_integral_value_with_context(
        &self,
        divisor: &BigDecimal,
        mc: &MathContext,
    ) -> Result<BigDecimal, ArithmeticError> {
        self.check_divisor(divisor)?;
        if mc.precision() == 0 || self.compare_magnitude(divisor) == Less {
            return self.divide_to_integral_value(divisor);
        }

        let preferred_scale = saturate_scale(i64::from(self.scale) - i64::from(divisor.scale));
        let truncating = MathContext::with_rounding(mc.precision(), RoundingMode::Down);
        let mut result = self.divide_with_context(divisor, &truncating)?;
        if result.scale < 0 {
            // Digits were dropped from the integer part unless the
            // remainder is already smaller than the divisor.
            let product = result.try_mul(divisor)?;
            if self.try_sub(&product)?.compare_magnitude(divisor) != Less {
                return Err(ArithmeticError::DivisionImpossible);
            }
        } else if result.scale > 0 {
            result = result.set_scale(0, RoundingMode::Down)?;
        }

        if preferred_scale > result.scale {
            let precision_diff = i64::from(mc.precision()) - i64::from(result.precision());
            if precision_diff > 0 {
                let room = precision_diff.min(i64::from(preferred_scale) - i64::from(result.scale));
                let scale = check_scale_non_zero(i64::from(result.scale) + room)?;
                return result.set_scale(scale, RoundingMode::Unnecessary);
            }
        }
        let (int_val, scale) = result.into_parts();
        create_and_strip_zeros_to_match_scale(int_val, scale, i64::from(preferred_scale))
    }

    /// The integral quotient and the remainder `self − q × divisor`.
    pub fn divide_and_remainder(
        &self,
        divisor: &BigDecimal,
    ) -> Result<(BigDecimal, BigDecimal), ArithmeticError> {
        let quotient = self.divide_to_integral_value(divisor)?;
        let remainder = self.try_sub(&quotient.try_mul(divisor)?)?;
        Ok((quotient, remainder))
    }

    /// Like [`BigDecimal::divide_and_remainder`], with the integral quotient
    /// limited to the precision of `mc`.
    pub fn divide_and_remainder_with_context(
        &self,
        divisor: &BigDecimal,
        mc: &MathContext,
    ) -> Result<(BigDecimal, BigDecimal), ArithmeticError> {
        let quotient = self.divide_to_integral_value_with_context(divisor, mc)?;
        let remainder = self.try_sub(&quotient.try_mul(divisor)?)?;
        Ok((quotient, remainder))
    }

    /// `self − divisor × trunc(self / divisor)`, with the sign of `self`.
    pub fn remainder(&self, divisor: &BigDecimal) -> Result<BigDecimal, ArithmeticError> {
        self.divide_and_remainder(divisor).map(|(_, r)| r)
    }

    /// The remainder, failing when the integral quotient does not fit the
    /// precision of `mc`.
    pub fn remainder_with_context(
        &self,
        divisor: &BigDecimal,
        mc: &MathContext,
    ) -> Result<BigDecimal, ArithmeticError> {
        self.divide_and_remainder_with_context(divisor, mc)
            .map(|(_, r)| r)
    }
}
