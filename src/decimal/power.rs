use core::cmp::max;
use core::cmp::Ordering::{Equal, Greater, Less};

use num_traits::{One, ToPrimitive};

use super::BigDecimal;
use super::rounding::{check_scale, check_scale_non_zero, do_round};
use super::tens::is_power_of_ten;
use crate::bigint::BigInt;
use crate::context::{MathContext, RoundingMode};
use crate::error::ArithmeticError;

/// Largest exponent magnitude accepted by the power operations.
const MAX_EXPONENT: i32 = 999_999_999;

impl BigDecimal {
    /// `self^n`, exactly, with scale `scale × n`. `n` must lie in
    /// `0..=999999999`.
    pub fn pow(&self, n: i32) -> Result<BigDecimal, ArithmeticError> {
        if !(0..=MAX_EXPONENT).contains(&n) {
            return Err(ArithmeticError::InvalidOperation);
        }
        let scale = check_scale(&self.int_val, i64::from(self.scale) * i64::from(n))?;
        Ok(BigDecimal::new(self.int_val.pow(n as u32), scale))
    }

    /// `self^n` rounded to `mc`, by left-to-right binary powering at a few
    /// guard digits past the requested precision. A negative `n` takes the
    /// reciprocal of the positive power.
    pub fn pow_with_context(&self, n: i32, mc: &MathContext) -> Result<BigDecimal, ArithmeticError> {
        if mc.precision() == 0 {
            return self.pow(n);
        }
        if !(-MAX_EXPONENT..=MAX_EXPONENT).contains(&n) {
            return Err(ArithmeticError::InvalidOperation);
        }
        if n == 0 {
            return Ok(BigDecimal::one());
        }

        let mag = n.unsigned_abs();
        let elength = mag.ilog10() + 1;
        if elength > mc.precision() {
            return Err(ArithmeticError::InvalidOperation);
        }
        let workmc =
            MathContext::with_rounding(mc.precision() + elength + 1, mc.rounding_mode());

        let mut acc = BigDecimal::one();
        let mut seen_bit = false;
        for bit in (0..31).rev() {
            if seen_bit {
                acc = acc.mul_with_context(&acc, &workmc)?;
            }
            if (mag >> bit) & 1 == 1 {
                seen_bit = true;
                acc = acc.mul_with_context(self, &workmc)?;
            }
        }
        if n < 0 {
            acc = BigDecimal::one().divide_with_context(&acc, &workmc)?;
        }
        do_round(acc, mc)
    }

    /// The square root rounded to `mc`.
    ///
    /// Unlimited precision, or [`RoundingMode::Unnecessary`], asks for the
    /// exact root and fails with [`ArithmeticError::InexactSqrt`] when none
    /// exists. The result is at scale `self.scale / 2` when the precision
    /// allows.
    pub fn sqrt(&self, mc: &MathContext) -> Result<BigDecimal, ArithmeticError> {
        match self.signum() {
            -1 => return Err(ArithmeticError::NegativeSqrt),
            0 => return Ok(BigDecimal::zero_value_of(self.scale / 2)),
            _ => {}
        }

        let preferred_scale = self.scale / 2;
        let zero_with_final_preferred_scale = BigDecimal::zero_value_of(preferred_scale);

        let stripped = self.strip_trailing_zeros()?;
        let stripped_scale = stripped.scale;
        if is_power_of_ten(&stripped.int_val) && stripped_scale % 2 == 0 {
            let mut result = BigDecimal::new(BigInt::one(), stripped_scale / 2);
            if result.scale != preferred_scale {
                result = result.add_with_context(&zero_with_final_preferred_scale, mc)?;
            }
            return Ok(result);
        }

        // Bring the operand into [0.1, 10) by an even power of ten so the
        // root only shifts by half of it.
        let scale = i64::from(stripped.scale) - i64::from(stripped.precision()) + 1;
        let scale_adjust = check_scale_non_zero(if scale % 2 == 0 { scale } else { scale - 1 })?;
        let working = stripped.scale_by_power_of_ten(scale_adjust)?;
        debug_assert!(
            working.compare_to(&BigDecimal::one_tenth()) != Less
                && working.compare_to(&BigDecimal::ten()) == Less
        );

        let seed = working.to_f64().unwrap_or(1.0).sqrt();
        let mut approx = BigDecimal::from_finite_f64(seed);

        let original_precision = mc.precision();
        let target_rm = mc.rounding_mode();
        let target_precision = if original_precision == 0 {
            stripped.precision() / 2 + 1
        } else {
            match target_rm {
                RoundingMode::HalfUp | RoundingMode::HalfDown | RoundingMode::HalfEven => {
                    original_precision.saturating_mul(2).min(i32::MAX as u32 - 2)
                }
                _ => original_precision,
            }
        };

        // Each Newton step roughly doubles the number of correct digits.
        let working_precision = working.precision();
        let one_half = BigDecimal::one_half();
        let mut guess_precision = 15u32;
        loop {
            let tmp_precision = max(
                max(guess_precision, target_precision + 2),
                working_precision,
            );
            let mc_tmp = MathContext::with_rounding(tmp_precision, RoundingMode::HalfEven);
            let quotient = working.divide_with_context(&approx, &mc_tmp)?;
            approx = one_half.try_mul(&approx.add_with_context(&quotient, &mc_tmp)?)?;
            guess_precision = guess_precision.saturating_mul(2);
            if guess_precision >= target_precision + 2 {
                break;
            }
        }

        let unscaled_root = approx.scale_by_power_of_ten(-scale_adjust / 2)?;
        let mut result = if target_rm == RoundingMode::Unnecessary || original_precision == 0 {
            let tmp_rm = if target_rm == RoundingMode::Unnecessary {
                RoundingMode::Down
            } else {
                target_rm
            };
            let mc_tmp = MathContext::with_rounding(target_precision, tmp_rm);
            let result = unscaled_root.round(&mc_tmp)?;
            if self.try_sub(&result.try_mul(&result)?)?.signum() != 0 {
                return Err(ArithmeticError::InexactSqrt);
            }
            result
        } else {
            let mut result = unscaled_root.round(mc)?;
            match target_rm {
                RoundingMode::Down | RoundingMode::Floor => {
                    if result.try_mul(&result)?.compare_to(self) == Greater {
                        // Below a power of ten the next smaller value is
                        // only a tenth of an ulp away.
                        let mut ulp = result.ulp();
                        if approx.compare_to(&BigDecimal::one()) == Equal {
                            ulp = ulp.try_mul(&BigDecimal::one_tenth())?;
                        }
                        result = result.try_sub(&ulp)?;
                    }
                }
                RoundingMode::Up | RoundingMode::Ceiling => {
                    if result.try_mul(&result)?.compare_to(self) == Less {
                        result = result.try_add(&result.ulp())?;
                    }
                }
                _ => {}
            }
            result
        };

        if result.scale != preferred_scale {
            result = result.strip_trailing_zeros()?.add_with_context(
                &zero_with_final_preferred_scale,
                &MathContext::with_rounding(original_precision, RoundingMode::Unnecessary),
            )?;
        }
        Ok(result)
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
    fn test_pow() {
        assert_eq!(dec("1.5").pow(3).unwrap().to_string(), "3.375");
        assert_eq!(dec("-0.2").pow(2).unwrap().to_string(), "0.04");
        assert_eq!(dec("7.0").pow(0).unwrap().to_string(), "1");
        assert_eq!(dec("2").pow(-1), Err(ArithmeticError::InvalidOperation));
        assert_eq!(dec("2").pow(1_000_000_000), Err(ArithmeticError::InvalidOperation));
    }

    #[test]
    fn test_pow_with_context() {
        let mc = MathContext::new(3);
        assert_eq!(dec("2").pow_with_context(10, &mc).unwrap().to_string(), "1.02E+3");
        let r = dec("1.1").pow_with_context(-2, &MathContext::new(5)).unwrap();
        assert_eq!(r.to_string(), "0.82645");
        assert_eq!(dec("9").pow_with_context(0, &mc).unwrap(), BigDecimal::one());
        assert_eq!(
            dec("1.5").pow_with_context(1234, &mc),
            Err(ArithmeticError::InvalidOperation)
        );
        assert_eq!(
            dec("1.5").pow_with_context(3, &MathContext::UNLIMITED).unwrap(),
            dec("3.375")
        );
    }

    #[test]
    fn test_sqrt_exact_cases() {
        assert_eq!(dec("4").sqrt(&MathContext::DECIMAL64).unwrap().to_string(), "2");
        assert_eq!(dec("0.25").sqrt(&MathContext::UNLIMITED).unwrap().to_string(), "0.5");
        assert_eq!(dec("100").sqrt(&MathContext::DECIMAL64).unwrap().to_string(), "10");
        assert_eq!(dec("1.44").sqrt(&MathContext::UNLIMITED).unwrap().to_string(), "1.2");
        assert_eq!(dec("2").sqrt(&MathContext::UNLIMITED), Err(ArithmeticError::InexactSqrt));
        assert_eq!(
            dec("2").sqrt(&MathContext::with_rounding(5, RoundingMode::Unnecessary)),
            Err(ArithmeticError::InexactSqrt)
        );
    }

    #[test]
    fn test_sqrt_rounded() {
        assert_eq!(dec("2").sqrt(&MathContext::DECIMAL32).unwrap().to_string(), "1.414214");
        let floor = MathContext::with_rounding(5, RoundingMode::Floor);
        assert_eq!(dec("2").sqrt(&floor).unwrap().to_string(), "1.4142");
        let up = MathContext::with_rounding(5, RoundingMode::Up);
        assert_eq!(dec("2").sqrt(&up).unwrap().to_string(), "1.4143");
        assert_eq!(dec("1E+3").sqrt(&MathContext::new(4)).unwrap().to_string(), "31.62");
    }

    #[test]
    fn test_sqrt_zero_and_negative() {
        let zero = dec("0.000").sqrt(&MathContext::DECIMAL32).unwrap();
        assert_eq!(zero.scale(), 1);
        assert_eq!(dec("-4").sqrt(&MathContext::DECIMAL32), Err(ArithmeticError::NegativeSqrt));
    }

    #[test]
    fn test_sqrt_within_ulp() {
        let mc = MathContext::with_rounding(30, RoundingMode::HalfEven);
        for s in ["3", "0.07", "12345.6789", "9.99E+40", "1.000001"] {
            let x = dec(s);
            let r = x.sqrt(&mc).unwrap();
            let ulp = r.ulp();
            let lo = (&r - &ulp) * (&r - &ulp);
            let hi = (&r + &ulp) * (&r + &ulp);
            assert_eq!(lo.compare_to(&x), Less, "{}", s);
            assert_eq!(hi.compare_to(&x), Greater, "{}", s);
        }
    }
}
