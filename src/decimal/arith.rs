use core::cmp::max;
use core::iter::{Product, Sum};
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_traits::{CheckedAdd, CheckedMul, CheckedSub, Zero};

use super::BigDecimal;
use super::rounding::{
    check_scale, check_scale_non_zero, create_and_strip_zeros_to_match_scale, do_round,
};
use super::tens::multiply_power_ten;
use crate::bigint::BigInt;
use crate::context::{MathContext, RoundingMode};
use crate::error::ArithmeticError;

/// Panics on the scale overflow that only the operator forms cannot report.
fn or_panic(result: Result<BigDecimal, ArithmeticError>) -> BigDecimal {
    match result {
        Ok(value) => value,
        Err(err) => panic!("decimal scale out of range: {}", err),
    }
}

impl BigDecimal {
    /// The exact sum. The result scale is the larger of the two scales.
    pub fn try_add(&self, augend: &BigDecimal) -> Result<BigDecimal, ArithmeticError> {
        let sdiff = i64::from(self.scale) - i64::from(augend.scale);
        if sdiff == 0 {
            return Ok(BigDecimal::new(&self.int_val + &augend.int_val, self.scale));
        }
        if sdiff < 0 {
            let raise = check_scale(&self.int_val, -sdiff)?;
            let scaled = multiply_power_ten(&self.int_val, raise);
            Ok(BigDecimal::new(scaled + &augend.int_val, augend.scale))
        } else {
            let raise = check_scale(&augend.int_val, sdiff)?;
            let scaled = multiply_power_ten(&augend.int_val, raise);
            Ok(BigDecimal::new(&self.int_val + scaled, self.scale))
        }
    }

    /// The exact difference.
    pub fn try_sub(&self, subtrahend: &BigDecimal) -> Result<BigDecimal, ArithmeticError> {
        self.try_add(&-subtrahend)
    }

    /// The exact product. The result scale is the sum of the two scales.
    pub fn try_mul(&self, multiplicand: &BigDecimal) -> Result<BigDecimal, ArithmeticError> {
        let product = &self.int_val * &multiplicand.int_val;
        let scale = check_scale(
            &product,
            i64::from(self.scale) + i64::from(multiplicand.scale),
        )?;
        Ok(BigDecimal::new(product, scale))
    }

    /// The sum rounded to `mc`.
    ///
    /// When one operand is zero the other is rounded and then moved as close
    /// as the precision allows to the larger of the two scales.
    pub fn add_with_context(
        &self,
        augend: &BigDecimal,
        mc: &MathContext,
    ) -> Result<BigDecimal, ArithmeticError> {
        if mc.precision() == 0 {
            return self.try_add(augend);
        }

        let lhs_is_zero = self.is_zero();
        let augend_is_zero = augend.is_zero();
        if lhs_is_zero || augend_is_zero {
            let preferred_scale = max(self.scale, augend.scale);
            if lhs_is_zero && augend_is_zero {
                return Ok(BigDecimal::zero_value_of(preferred_scale));
            }
            let result = if lhs_is_zero {
                do_round(augend.clone(), mc)?
            } else {
                do_round(self.clone(), mc)?
            };

            return if result.scale == preferred_scale {
                Ok(result)
            } else if result.scale > preferred_scale {
                let (int_val, scale) = result.into_parts();
                create_and_strip_zeros_to_match_scale(int_val, scale, i64::from(preferred_scale))
            } else {
                let precision_diff = i64::from(mc.precision()) - i64::from(result.precision());
                let scale_diff = i64::from(preferred_scale) - i64::from(result.scale);
                if precision_diff >= scale_diff {
                    result.set_scale(preferred_scale, RoundingMode::Unnecessary)
                } else {
                    let scale = check_scale_non_zero(i64::from(result.scale) + precision_diff)?;
                    result.set_scale(scale, RoundingMode::Unnecessary)
                }
            };
        }

        let padding = i64::from(self.scale) - i64::from(augend.scale);
        let sum = if padding != 0 {
            let (big, small) = pre_align(self, augend, padding, mc)?;
            big.try_add(&small)?
        } else {
            self.try_add(augend)?
        };
        do_round(sum, mc)
    }

    /// The difference rounded to `mc`.
    pub fn sub_with_context(
        &self,
        subtrahend: &BigDecimal,
        mc: &MathContext,
    ) -> Result<BigDecimal, ArithmeticError> {
        self.add_with_context(&-subtrahend, mc)
    }

    /// The product rounded to `mc`.
    pub fn mul_with_context(
        &self,
        multiplicand: &BigDecimal,
        mc: &MathContext,
    ) -> Result<BigDecimal, ArithmeticError> {
        do_round(self.try_mul(multiplicand)?, mc)
    }
}

/// Shrinks an operand whose digits all sit well below the rounding
/// position of the sum to a single unit at a scale just past that position.
/// Both operands are non-zero and their scales differ.
fn pre_align(
    lhs: &BigDecimal,
    augend: &BigDecimal,
    padding: i64,
    mc: &MathContext,
) -> Result<(BigDecimal, BigDecimal), ArithmeticError> {
    let (big, small) = if padding < 0 {
        (lhs, augend)
    } else {
        (augend, lhs)
    };

    let est_result_ulp_scale =
        i64::from(big.scale) - i64::from(big.precision()) + i64::from(mc.precision());
    let small_high_digit_pos = i64::from(small.scale) - i64::from(small.precision()) + 1;
    if small_high_digit_pos > i64::from(big.scale) + 2
        && small_high_digit_pos > est_result_ulp_scale + 2
    {
        let scale = check_scale_non_zero(max(i64::from(big.scale), est_result_ulp_scale) + 3)?;
        let condensed = BigDecimal::new(BigInt::from(small.signum()), scale);
        return Ok((big.clone(), condensed));
    }
    Ok((big.clone(), small.clone()))
}

impl Add<&BigDecimal> for &BigDecimal {
    type Output = BigDecimal;

    #[inline]
    fn add(self, other: &BigDecimal) -> BigDecimal {
        or_panic(self.try_add(other))
    }
}

impl Sub<&BigDecimal> for &BigDecimal {
    type Output = BigDecimal;

    #[inline]
    fn sub(self, other: &BigDecimal) -> BigDecimal {
        or_panic(self.try_sub(other))
    }
}

impl Mul<&BigDecimal> for &BigDecimal {
    type Output = BigDecimal;

    #[inline]
    fn mul(self, other: &BigDecimal) -> BigDecimal {
        or_panic(self.try_mul(other))
    }
}

forward_all_binop_to_ref_ref!(impl Add for BigDecimal, add);
forward_all_binop_to_ref_ref!(impl Sub for BigDecimal, sub);
forward_all_binop_to_ref_ref!(impl Mul for BigDecimal, mul);
forward_assignop_to_binop!(impl AddAssign for BigDecimal, add_assign, +);
forward_assignop_to_binop!(impl SubAssign for BigDecimal, sub_assign, -);
forward_assignop_to_binop!(impl MulAssign for BigDecimal, mul_assign, *);

impl Neg for BigDecimal {
    type Output = BigDecimal;

    #[inline]
    fn neg(self) -> BigDecimal {
        let precision = self.precision.get().copied().unwrap_or(0);
        let (int_val, scale) = self.into_parts();
        BigDecimal::from_parts_with_precision(-int_val, scale, precision)
    }
}

impl Neg for &BigDecimal {
    type Output = BigDecimal;

    #[inline]
    fn neg(self) -> BigDecimal {
        -self.clone()
    }
}

impl CheckedAdd for BigDecimal {
    #[inline]
    fn checked_add(&self, v: &BigDecimal) -> Option<BigDecimal> {
        self.try_add(v).ok()
    }
}

impl CheckedSub for BigDecimal {
    #[inline]
    fn checked_sub(&self, v: &BigDecimal) -> Option<BigDecimal> {
        self.try_sub(v).ok()
    }
}

impl CheckedMul for BigDecimal {
    #[inline]
    fn checked_mul(&self, v: &BigDecimal) -> Option<BigDecimal> {
        self.try_mul(v).ok()
    }
}

impl<T> Sum<T> for BigDecimal
where
    BigDecimal: Add<T, Output = BigDecimal>,
{
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = T>,
    {
        iter.fold(BigDecimal::zero(), |a, b| a + b)
    }
}

impl<T> Product<T> for BigDecimal
where
    BigDecimal: Mul<T, Output = BigDecimal>,
{
    fn product<I>(iter: I) -> Self
    where
        I: Iterator<Item = T>,
    {
        iter.fold(num_traits::One::one(), |a, b| a * b)
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
    fn test_add_aligns_scales() {
        let sum = dec("1.5") + dec("0.025");
        assert_eq!(sum, dec("1.525"));
        assert_eq!(sum.scale(), 3);
        assert_eq!(dec("1E+3") + dec("1"), dec("1001"));
        assert_eq!((dec("1E+3") - dec("0.1")).to_string(), "999.9");
    }

    #[test]
    fn test_mul_adds_scales() {
        let product = dec("1.25") * dec("-0.4");
        assert_eq!(product.to_string(), "-0.500");
        assert_eq!(product.scale(), 3);
        assert_eq!((dec("2E+5") * dec("3E+4")).to_string(), "6E+9");
    }

    #[test]
    fn test_add_with_context_rounds() {
        let mc = MathContext::new(5);
        let sum = dec("123.456").add_with_context(&dec("0.0049"), &mc).unwrap();
        assert_eq!(sum.to_string(), "123.46");
        let diff = dec("1000").sub_with_context(&dec("0.1"), &MathContext::new(3)).unwrap();
        assert_eq!(diff.to_string(), "1.00E+3");
    }

    #[test]
    fn test_add_with_context_pre_aligns() {
        // The tiny operand only nudges the rounding direction.
        let mc = MathContext::with_rounding(3, RoundingMode::Up);
        let sum = dec("1.00").add_with_context(&dec("1E-40"), &mc).unwrap();
        assert_eq!(sum.to_string(), "1.01");
        let mc = MathContext::with_rounding(3, RoundingMode::Down);
        let sum = dec("1.00").add_with_context(&dec("-1E-40"), &mc).unwrap();
        assert_eq!(sum.to_string(), "0.999");
        let mc = MathContext::new(3);
        let sum = dec("1.00").add_with_context(&dec("1E-40"), &mc).unwrap();
        assert_eq!(sum.to_string(), "1.00");
    }

    #[test]
    fn test_add_with_context_zero_operands() {
        let mc = MathContext::new(3);
        let r = dec("0.000").add_with_context(&dec("0.0"), &mc).unwrap();
        assert_eq!(r.scale(), 3);
        // Rounded operand keeps the preferred scale when precision allows.
        let r = dec("12").add_with_context(&dec("0.00"), &mc).unwrap();
        assert_eq!(r.to_string(), "12.0");
        let r = dec("1.2300").add_with_context(&dec("0E-2"), &mc).unwrap();
        assert_eq!(r.to_string(), "1.23");
        let r = dec("123456").add_with_context(&BigDecimal::zero(), &mc).unwrap();
        assert_eq!(r.to_string(), "1.23E+5");
    }

    #[test]
    fn test_mul_with_context() {
        let mc = MathContext::new(4);
        let r = dec("1.2345").mul_with_context(&dec("2"), &mc).unwrap();
        assert_eq!(r.to_string(), "2.469");
    }

    #[test]
    fn test_scale_overflow() {
        let tiny = BigDecimal::new(BigInt::from(1), i32::MAX);
        assert_eq!(tiny.try_mul(&tiny), Err(ArithmeticError::Underflow));
        let huge = BigDecimal::new(BigInt::from(1), i32::MIN);
        assert_eq!(huge.try_mul(&huge), Err(ArithmeticError::Overflow));
        let zero = BigDecimal::new(BigInt::zero(), i32::MAX);
        assert_eq!(zero.try_mul(&zero).unwrap().scale(), i32::MAX);
    }

    #[test]
    fn test_neg_and_sum() {
        assert_eq!(-dec("1.50"), dec("-1.50"));
        let total: BigDecimal = ["0.1", "0.2", "0.3"].iter().map(|s| dec(s)).sum();
        assert_eq!(total, dec("0.6"));
        let product: BigDecimal = ["1.5", "2", "-0.1"].iter().map(|s| dec(s)).product();
        assert_eq!(product, dec("-0.30"));
    }
}
