use core::cmp::Ordering::{Equal, Greater, Less};
use core::iter::Sum;
use core::ops::{Add, AddAssign};

use num_traits::{CheckedAdd, Zero};

use super::BigInt;

/// Adds two magnitudes, growing by one word on carry out.
pub(crate) fn add_mag(x: &[u32], y: &[u32]) -> Vec<u32> {
    let (x, y) = if x.len() < y.len() { (y, x) } else { (x, y) };
    let mut result = vec![0u32; x.len()];
    let mut xi = x.len();
    let mut yi = y.len();
    let mut carry = 0u64;

    while yi > 0 {
        xi -= 1;
        yi -= 1;
        let sum = u64::from(x[xi]) + u64::from(y[yi]) + carry;
        result[xi] = sum as u32;
        carry = sum >> 32;
    }
    while xi > 0 {
        xi -= 1;
        let sum = u64::from(x[xi]) + carry;
        result[xi] = sum as u32;
        carry = sum >> 32;
    }

    if carry != 0 {
        result.insert(0, 1);
    }
    result
}

impl Add<&BigInt> for &BigInt {
    type Output = BigInt;

    fn add(self, other: &BigInt) -> BigInt {
        if other.is_zero() {
            return self.clone();
        }
        if self.is_zero() {
            return other.clone();
        }
        if self.sign == other.sign {
            return BigInt::from_mag(self.sign, add_mag(&self.mag, &other.mag));
        }

        match self.cmp_magnitude(other) {
            Equal => BigInt::zero(),
            Greater => BigInt::from_mag(self.sign, super::sub_mag(&self.mag, &other.mag)),
            Less => BigInt::from_mag(other.sign, super::sub_mag(&other.mag, &self.mag)),
        }
    }
}

forward_all_binop_to_ref_ref!(impl Add for BigInt, add);
forward_assignop_to_binop!(impl AddAssign for BigInt, add_assign, +);

forward_scalar_binop!(impl Add<u32> for BigInt, add);
forward_scalar_binop!(impl Add<u64> for BigInt, add);
forward_scalar_binop!(impl Add<i32> for BigInt, add);
forward_scalar_binop!(impl Add<i64> for BigInt, add);
forward_scalar_assignop!(impl AddAssign<u32> for BigInt, add_assign, +);
forward_scalar_assignop!(impl AddAssign<u64> for BigInt, add_assign, +);
forward_scalar_assignop!(impl AddAssign<i32> for BigInt, add_assign, +);
forward_scalar_assignop!(impl AddAssign<i64> for BigInt, add_assign, +);

impl CheckedAdd for BigInt {
    #[inline]
    fn checked_add(&self, v: &BigInt) -> Option<BigInt> {
        Some(self + v)
    }
}

impl<T> Sum<T> for BigInt
where
    BigInt: Add<T, Output = BigInt>,
{
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = T>,
    {
        iter.fold(Zero::zero(), |acc, x| acc + x)
    }
}
