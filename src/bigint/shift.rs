use core::ops::{Shl, ShlAssign, Shr, ShrAssign};

use num_traits::{One, Zero};

use super::Sign::Minus;
use super::{increment_mag, BigInt};

/// Shifts a magnitude left by `n` bits.
pub(crate) fn shift_left_mag(mag: &[u32], n: usize) -> Vec<u32> {
    let mag_len = mag.len();
    if mag_len == 0 {
        return Vec::new();
    }

    let n_ints = n >> 5;
    let n_bits = (n & 0x1f) as u32;

    if n_bits == 0 {
        let mut v = Vec::with_capacity(mag_len + n_ints);
        v.extend_from_slice(mag);
        v.resize(mag_len + n_ints, 0);
        return v;
    }

    let n_bits2 = 32 - n_bits;
    let high_bits = mag[0] >> n_bits2;
    let mut v = Vec::with_capacity(mag_len + n_ints + 1);
    if high_bits != 0 {
        v.push(high_bits);
    }
    for j in 0..mag_len - 1 {
        v.push((mag[j] << n_bits) | (mag[j + 1] >> n_bits2));
    }
    v.push(mag[mag_len - 1] << n_bits);
    v.resize(v.len() + n_ints, 0);
    v
}

/// Shifts a magnitude right by `n` bits, discarding the bits shifted out.
pub(crate) fn shift_right_mag(mag: &[u32], n: usize) -> Vec<u32> {
    let len = mag.len();
    let n_ints = n >> 5;
    let n_bits = (n & 0x1f) as u32;
    if n_ints >= len {
        return Vec::new();
    }

    if n_bits == 0 {
        return mag[..len - n_ints].to_vec();
    }

    let n_bits2 = 32 - n_bits;
    let mut v = Vec::with_capacity(len - n_ints);
    let high_bits = mag[0] >> n_bits;
    if high_bits != 0 {
        v.push(high_bits);
    }
    for j in 0..len - n_ints - 1 {
        v.push((mag[j] << n_bits2) | (mag[j + 1] >> n_bits));
    }
    v
}

impl BigInt {
    fn shl_bits(&self, n: usize) -> BigInt {
        if self.is_zero() || n == 0 {
            return self.clone();
        }
        BigInt::from_mag(self.sign, shift_left_mag(&self.mag, n))
    }

    /// Arithmetic shift: negative values round toward negative infinity.
    fn shr_bits(&self, n: usize) -> BigInt {
        if self.is_zero() || n == 0 {
            return self.clone();
        }

        let mag_len = self.mag.len();
        let n_ints = n >> 5;
        let n_bits = n & 0x1f;
        if n_ints >= mag_len {
            return if self.sign == Minus {
                -BigInt::one()
            } else {
                BigInt::zero()
            };
        }

        let mut new_mag = shift_right_mag(&self.mag, n);

        if self.sign == Minus {
            let mut ones_lost = self.mag[mag_len - n_ints..].iter().any(|&w| w != 0);
            if !ones_lost && n_bits != 0 {
                ones_lost = self.mag[mag_len - n_ints - 1] << (32 - n_bits) != 0;
            }
            if ones_lost {
                new_mag = increment_mag(new_mag);
            }
        }

        BigInt::from_mag(self.sign, new_mag)
    }

    /// Returns `self << n`; a negative `n` shifts right.
    pub fn shift_left(&self, n: i32) -> BigInt {
        if n >= 0 {
            self.shl_bits(n as usize)
        } else {
            self.shr_bits(n.unsigned_abs() as usize)
        }
    }

    /// Returns `self >> n` with sign extension; a negative `n` shifts left.
    pub fn shift_right(&self, n: i32) -> BigInt {
        if n >= 0 {
            self.shr_bits(n as usize)
        } else {
            self.shl_bits(n.unsigned_abs() as usize)
        }
    }
}

macro_rules! impl_shift_unsigned {
    ($($t:ty),*) => {$(
        impl Shl<$t> for BigInt {
            type Output = BigInt;

            #[inline]
            fn shl(self, rhs: $t) -> BigInt {
                self.shl_bits(rhs as usize)
            }
        }

        impl Shl<$t> for &BigInt {
            type Output = BigInt;

            #[inline]
            fn shl(self, rhs: $t) -> BigInt {
                self.shl_bits(rhs as usize)
            }
        }

        impl Shr<$t> for BigInt {
            type Output = BigInt;

            #[inline]
            fn shr(self, rhs: $t) -> BigInt {
                self.shr_bits(rhs as usize)
            }
        }

        impl Shr<$t> for &BigInt {
            type Output = BigInt;

            #[inline]
            fn shr(self, rhs: $t) -> BigInt {
                self.shr_bits(rhs as usize)
            }
        }

        impl ShlAssign<$t> for BigInt {
            #[inline]
            fn shl_assign(&mut self, rhs: $t) {
                *self = self.shl_bits(rhs as usize);
            }
        }

        impl ShrAssign<$t> for BigInt {
            #[inline]
            fn shr_assign(&mut self, rhs: $t) {
                *self = self.shr_bits(rhs as usize);
            }
        }
    )*};
}

impl_shift_unsigned!(usize, u32, u64);

impl Shl<i32> for &BigInt {
    type Output = BigInt;

    #[inline]
    fn shl(self, rhs: i32) -> BigInt {
        self.shift_left(rhs)
    }
}

impl Shl<i32> for BigInt {
    type Output = BigInt;

    #[inline]
    fn shl(self, rhs: i32) -> BigInt {
        self.shift_left(rhs)
    }
}

impl Shr<i32> for &BigInt {
    type Output = BigInt;

    #[inline]
    fn shr(self, rhs: i32) -> BigInt {
        self.shift_right(rhs)
    }
}

impl Shr<i32> for BigInt {
    type Output = BigInt;

    #[inline]
    fn shr(self, rhs: i32) -> BigInt {
        self.shift_right(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    #[test]
    fn test_shift_left() {
        let one = BigInt::one();
        assert_eq!((&one << 100usize).to_string(), "1267650600228229401496703205376");
        assert_eq!(BigInt::from(-3) << 33u32, BigInt::from(-3i64 << 33));
        assert_eq!(BigInt::from(5).shift_left(-1), BigInt::from(2));
    }

    #[test]
    fn test_shift_right_floors_negatives() {
        assert_eq!(BigInt::from(-1) >> 1usize, BigInt::from(-1));
        assert_eq!(BigInt::from(-5) >> 1usize, BigInt::from(-3));
        assert_eq!(BigInt::from(-4) >> 1usize, BigInt::from(-2));
        assert_eq!(BigInt::from(-4) >> 100usize, BigInt::from(-1));
        assert_eq!(BigInt::from(7) >> 100usize, BigInt::zero());

        let big = BigInt::from_str("-340282366920938463463374607431768211456").unwrap();
        assert_eq!(&big >> 64usize, BigInt::from_str("-18446744073709551616").unwrap());
        assert_eq!((&big - 1u32) >> 64usize, BigInt::from_str("-18446744073709551617").unwrap());
    }

    #[test]
    fn test_shift_right_negative_count() {
        assert_eq!(BigInt::from(3).shift_right(-4), BigInt::from(48));
        assert_eq!(BigInt::from(3) >> -4, BigInt::from(48));
        assert_eq!(BigInt::from(48) << -4, BigInt::from(3));
    }

    #[test]
    fn test_shift_mag_helpers() {
        assert_eq!(shift_left_mag(&[1], 32), vec![1, 0]);
        assert_eq!(shift_left_mag(&[0x8000_0000], 1), vec![1, 0]);
        assert_eq!(shift_right_mag(&[1, 0], 1), vec![0x8000_0000]);
        assert_eq!(shift_right_mag(&[1, 0], 64), Vec::<u32>::new());
    }
}
