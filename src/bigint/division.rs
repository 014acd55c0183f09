use core::ops::{Div, DivAssign, Rem, RemAssign};

use num_integer::Integer;
use num_traits::{CheckedDiv, CheckedRem, Signed, Zero};

use super::BigInt;
use super::Sign::{Minus, Plus};
use crate::error::ArithmeticError;
use crate::mutable::{MutableBigInt, BURNIKEL_ZIEGLER_OFFSET, BURNIKEL_ZIEGLER_THRESHOLD};

/// Truncating division by Knuth's Algorithm D. The remainder takes the sign
/// of the dividend.
pub fn div_rem_knuth(a: &BigInt, b: &BigInt) -> Result<(BigInt, BigInt), ArithmeticError> {
    if b.is_zero() {
        return Err(ArithmeticError::DivisionByZero);
    }
    let (q, r) = MutableBigInt::from_words(&a.mag).divide_knuth(&MutableBigInt::from_words(&b.mag));
    Ok((q.into_bigint(a.sign.product(b.sign)), r.into_bigint(a.sign)))
}

/// Truncating division by the recursive Burnikel-Ziegler algorithm. The
/// remainder takes the sign of the dividend.
pub fn div_rem_burnikel_ziegler(
    a: &BigInt,
    b: &BigInt,
) -> Result<(BigInt, BigInt), ArithmeticError> {
    if b.is_zero() {
        return Err(ArithmeticError::DivisionByZero);
    }
    let (q, r) = MutableBigInt::from_words(&a.mag)
        .divide_burnikel_ziegler(&MutableBigInt::from_words(&b.mag));
    Ok((q.into_bigint(a.sign.product(b.sign)), r.into_bigint(a.sign)))
}

impl BigInt {
    /// Quotient and remainder, truncating toward zero.
    pub fn divide_and_remainder(&self, val: &BigInt) -> Result<(BigInt, BigInt), ArithmeticError> {
        if val.mag.len() < BURNIKEL_ZIEGLER_THRESHOLD
            || self.mag.len() < val.mag.len() + BURNIKEL_ZIEGLER_OFFSET
        {
            div_rem_knuth(self, val)
        } else {
            div_rem_burnikel_ziegler(self, val)
        }
    }

    /// Quotient truncated toward zero.
    pub fn divide(&self, val: &BigInt) -> Result<BigInt, ArithmeticError> {
        self.divide_and_remainder(val).map(|(q, _)| q)
    }

    /// Remainder with the sign of the dividend.
    pub fn remainder(&self, val: &BigInt) -> Result<BigInt, ArithmeticError> {
        self.divide_and_remainder(val).map(|(_, r)| r)
    }

    /// Non-negative residue modulo a positive `m`.
    pub fn modulo(&self, m: &BigInt) -> Result<BigInt, ArithmeticError> {
        if m.sign != Plus {
            return Err(ArithmeticError::NonPositiveModulus);
        }
        let r = self.remainder(m)?;
        Ok(if r.sign == Minus { r + m } else { r })
    }

    fn div_rem_or_panic(&self, other: &BigInt) -> (BigInt, BigInt) {
        match self.divide_and_remainder(other) {
            Ok(qr) => qr,
            Err(_) => panic!("attempt to divide by zero"),
        }
    }
}

impl Div<&BigInt> for &BigInt {
    type Output = BigInt;

    #[inline]
    fn div(self, other: &BigInt) -> BigInt {
        self.div_rem_or_panic(other).0
    }
}

impl Rem<&BigInt> for &BigInt {
    type Output = BigInt;

    #[inline]
    fn rem(self, other: &BigInt) -> BigInt {
        self.div_rem_or_panic(other).1
    }
}

forward_all_binop_to_ref_ref!(impl Div for BigInt, div);
forward_all_binop_to_ref_ref!(impl Rem for BigInt, rem);
forward_assignop_to_binop!(impl DivAssign for BigInt, div_assign, /);
forward_assignop_to_binop!(impl RemAssign for BigInt, rem_assign, %);

forward_scalar_binop!(impl Div<u32> for BigInt, div);
forward_scalar_binop!(impl Div<u64> for BigInt, div);
forward_scalar_binop!(impl Div<i32> for BigInt, div);
forward_scalar_binop!(impl Div<i64> for BigInt, div);
forward_scalar_binop!(impl Rem<u32> for BigInt, rem);
forward_scalar_binop!(impl Rem<u64> for BigInt, rem);
forward_scalar_binop!(impl Rem<i32> for BigInt, rem);
forward_scalar_binop!(impl Rem<i64> for BigInt, rem);

impl CheckedDiv for BigInt {
    #[inline]
    fn checked_div(&self, v: &BigInt) -> Option<BigInt> {
        self.divide(v).ok()
    }
}

impl CheckedRem for BigInt {
    #[inline]
    fn checked_rem(&self, v: &BigInt) -> Option<BigInt> {
        self.remainder(v).ok()
    }
}

impl Integer for BigInt {
    #[inline]
    fn div_rem(&self, other: &BigInt) -> (BigInt, BigInt) {
        self.div_rem_or_panic(other)
    }

    #[inline]
    fn div_floor(&self, other: &BigInt) -> BigInt {
        self.div_mod_floor(other).0
    }

    #[inline]
    fn mod_floor(&self, other: &BigInt) -> BigInt {
        self.div_mod_floor(other).1
    }

    fn div_mod_floor(&self, other: &BigInt) -> (BigInt, BigInt) {
        let (d, m) = self.div_rem_or_panic(other);
        if !m.is_zero() && m.sign != other.sign {
            (d - 1u32, m + other)
        } else {
            (d, m)
        }
    }

    /// Greatest common divisor, always non-negative.
    fn gcd(&self, other: &BigInt) -> BigInt {
        crate::algorithms::xgcd(self, other, false).0
    }

    /// Least common multiple, always non-negative.
    fn lcm(&self, other: &BigInt) -> BigInt {
        if self.is_zero() || other.is_zero() {
            return BigInt::zero();
        }
        let gcd = self.gcd(other);
        (self * &(other / &gcd)).abs()
    }

    #[inline]
    fn is_multiple_of(&self, other: &BigInt) -> bool {
        if other.is_zero() {
            return self.is_zero();
        }
        (self % other).is_zero()
    }

    #[inline]
    fn is_even(&self) -> bool {
        self.mag.last().is_none_or(|w| w & 1 == 0)
    }

    #[inline]
    fn is_odd(&self) -> bool {
        !self.is_even()
    }
}

impl BigInt {
    /// `self` reduced into `[0, m)`, or `self` itself when already there.
    pub(crate) fn reduced(&self, m: &BigInt) -> BigInt {
        if self.sign == Minus || self.cmp_magnitude(m).is_ge() {
            self.mod_positive(m)
        } else {
            self.clone()
        }
    }
}
