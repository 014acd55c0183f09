use core::cmp::Ordering::{Equal, Greater, Less};
use core::ops::{Sub, SubAssign};

use num_traits::{CheckedSub, Zero};

use super::{strip_leading_zeros, BigInt};

/// Subtracts `little` from `big`; `big` must not be the smaller magnitude.
pub(crate) fn sub_mag(big: &[u32], little: &[u32]) -> Vec<u32> {
    let mut result = vec![0u32; big.len()];
    let mut bi = big.len();
    let mut li = little.len();
    let mut borrow = 0i64;

    while li > 0 {
        bi -= 1;
        li -= 1;
        let diff = i64::from(big[bi]) - i64::from(little[li]) + borrow;
        result[bi] = diff as u32;
        borrow = diff >> 32;
    }
    while bi > 0 {
        bi -= 1;
        let diff = i64::from(big[bi]) + borrow;
        result[bi] = diff as u32;
        borrow = diff >> 32;
    }
    debug_assert!(borrow == 0, "magnitude underflow");

    strip_leading_zeros(result)
}

impl Sub<&BigInt> for &BigInt {
    type Output = BigInt;

    fn sub(self, other: &BigInt) -> BigInt {
        if other.is_zero() {
            return self.clone();
        }
        if self.is_zero() {
            return -other;
        }
        if self.sign != other.sign {
            return BigInt::from_mag(self.sign, super::add_mag(&self.mag, &other.mag));
        }

        match self.cmp_magnitude(other) {
            Equal => BigInt::zero(),
            Greater => BigInt::from_mag(self.sign, sub_mag(&self.mag, &other.mag)),
            Less => BigInt::from_mag(-self.sign, sub_mag(&other.mag, &self.mag)),
        }
    }
}

forward_all_binop_to_ref_ref!(impl Sub for BigInt, sub);
forward_assignop_to_binop!(impl SubAssign for BigInt, sub_assign, -);

forward_scalar_binop!(impl Sub<u32> for BigInt, sub);
forward_scalar_binop!(impl Sub<u64> for BigInt, sub);
forward_scalar_binop!(impl Sub<i32> for BigInt, sub);
forward_scalar_binop!(impl Sub<i64> for BigInt, sub);
forward_scalar_assignop!(impl SubAssign<u32> for BigInt, sub_assign, -);
forward_scalar_assignop!(impl SubAssign<u64> for BigInt, sub_assign, -);
forward_scalar_assignop!(impl SubAssign<i32> for BigInt, sub_assign, -);
forward_scalar_assignop!(impl SubAssign<i64> for BigInt, sub_assign, -);

impl CheckedSub for BigInt {
    #[inline]
    fn checked_sub(&self, v: &BigInt) -> Option<BigInt> {
        Some(self - v)
    }
}
