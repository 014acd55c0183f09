use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use num_traits::Zero;

use super::Sign::{Minus, Plus};
use super::{increment_mag, strip_leading_zeros, BigInt};

impl BigInt {
    /// Number of bits in the minimal two's complement form, excluding the
    /// sign bit.
    pub fn bit_length(&self) -> u64 {
        *self.cache.bit_length.get_or_init(|| {
            let len = self.mag.len();
            if len == 0 {
                return 0;
            }

            let mag_bit_length = (len as u64 - 1) * 32 + u64::from(32 - self.mag[0].leading_zeros());
            if self.sign == Minus {
                // A negative power of two needs one bit less.
                let pow2 = self.mag[0].is_power_of_two() && self.mag[1..].iter().all(|&w| w == 0);
                if pow2 {
                    return mag_bit_length - 1;
                }
            }
            mag_bit_length
        })
    }

    /// Number of bits in the two's complement form that differ from the
    /// sign bit.
    pub fn bit_count(&self) -> u64 {
        *self.cache.bit_count.get_or_init(|| {
            let mut bc: u64 = self.mag.iter().map(|w| u64::from(w.count_ones())).sum();
            if self.sign == Minus {
                let mut mag_trailing_zeros = 0u64;
                for &w in self.mag.iter().rev() {
                    if w == 0 {
                        mag_trailing_zeros += 32;
                    } else {
                        mag_trailing_zeros += u64::from(w.trailing_zeros());
                        break;
                    }
                }
                // bc >= 1 for a non-zero magnitude.
                bc = bc + mag_trailing_zeros - 1;
            }
            bc
        })
    }

    /// Index of the rightmost one bit, or `None` for zero.
    pub fn lowest_set_bit(&self) -> Option<u64> {
        *self.cache.lowest_set_bit.get_or_init(|| {
            if self.is_zero() {
                return None;
            }
            let mut i = 0;
            while self.get_int(i) == 0 {
                i += 1;
            }
            Some(((i as u64) << 5) + u64::from(self.get_int(i).trailing_zeros()))
        })
    }

    /// Number of words needed for the two's complement form, sign included.
    pub(crate) fn int_length(&self) -> usize {
        (self.bit_length() >> 5) as usize + 1
    }

    fn sign_int(&self) -> u32 {
        if self.sign == Minus { u32::MAX } else { 0 }
    }

    /// Index from the least significant end of the lowest nonzero word.
    fn first_nonzero_int_num(&self) -> usize {
        *self.cache.first_nonzero_word.get_or_init(|| {
            match self.mag.iter().rposition(|&w| w != 0) {
                Some(i) => self.mag.len() - i - 1,
                None => 0,
            }
        })
    }

    /// Word `n` of the infinite two's complement form, counted from the
    /// least significant end.
    pub(crate) fn get_int(&self, n: usize) -> u32 {
        let len = self.mag.len();
        if n >= len {
            return self.sign_int();
        }

        let mag_int = self.mag[len - n - 1];
        if self.sign != Minus {
            mag_int
        } else if n <= self.first_nonzero_int_num() {
            mag_int.wrapping_neg()
        } else {
            !mag_int
        }
    }

    /// Builds a value from big-endian two's complement words.
    pub(crate) fn from_twos_complement(words: Vec<u32>) -> BigInt {
        if words.first().is_some_and(|&w| (w as i32) < 0) {
            BigInt::from_mag(Minus, make_positive(&words))
        } else {
            BigInt::from_mag(Plus, words)
        }
    }

    fn bitwise(&self, other: &BigInt, op: impl Fn(u32, u32) -> u32) -> BigInt {
        let len = self.int_length().max(other.int_length());
        let words = (0..len)
            .map(|i| op(self.get_int(len - i - 1), other.get_int(len - i - 1)))
            .collect();
        BigInt::from_twos_complement(words)
    }

    /// Returns `self & !other`.
    pub fn and_not(&self, other: &BigInt) -> BigInt {
        self.bitwise(other, |a, b| a & !b)
    }

    /// Whether bit `n` of the two's complement form is set.
    pub fn test_bit(&self, n: u64) -> bool {
        let word = self.get_int((n >> 5) as usize);
        word & (1 << (n & 0x1f)) != 0
    }

    fn with_bit(&self, n: u64, op: impl Fn(u32, u32) -> u32) -> BigInt {
        let int_num = (n >> 5) as usize;
        let len = self.int_length().max(int_num + 2);
        let mut words: Vec<u32> = (0..len).map(|i| self.get_int(len - i - 1)).collect();
        let idx = len - int_num - 1;
        words[idx] = op(words[idx], 1 << (n & 0x1f));
        BigInt::from_twos_complement(words)
    }

    /// Returns a copy with bit `n` set.
    pub fn set_bit(&self, n: u64) -> BigInt {
        self.with_bit(n, |w, m| w | m)
    }

    /// Returns a copy with bit `n` cleared.
    pub fn clear_bit(&self, n: u64) -> BigInt {
        self.with_bit(n, |w, m| w & !m)
    }

    /// Returns a copy with bit `n` flipped.
    pub fn flip_bit(&self, n: u64) -> BigInt {
        self.with_bit(n, |w, m| w ^ m)
    }
}

/// Magnitude of a negative two's complement word array.
pub(crate) fn make_positive(words: &[u32]) -> Vec<u32> {
    let inverted = words.iter().map(|w| !w).collect();
    increment_mag(strip_leading_zeros(inverted))
}

impl BitAnd<&BigInt> for &BigInt {
    type Output = BigInt;

    fn bitand(self, other: &BigInt) -> BigInt {
        self.bitwise(other, |a, b| a & b)
    }
}

impl BitOr<&BigInt> for &BigInt {
    type Output = BigInt;

    fn bitor(self, other: &BigInt) -> BigInt {
        self.bitwise(other, |a, b| a | b)
    }
}

impl BitXor<&BigInt> for &BigInt {
    type Output = BigInt;

    fn bitxor(self, other: &BigInt) -> BigInt {
        self.bitwise(other, |a, b| a ^ b)
    }
}

forward_all_binop_to_ref_ref!(impl BitAnd for BigInt, bitand);
forward_all_binop_to_ref_ref!(impl BitOr for BigInt, bitor);
forward_all_binop_to_ref_ref!(impl BitXor for BigInt, bitxor);
forward_assignop_to_binop!(impl BitAndAssign for BigInt, bitand_assign, &);
forward_assignop_to_binop!(impl BitOrAssign for BigInt, bitor_assign, |);
forward_assignop_to_binop!(impl BitXorAssign for BigInt, bitxor_assign, ^);

impl Not for &BigInt {
    type Output = BigInt;

    fn not(self) -> BigInt {
        let len = self.int_length();
        let words = (0..len).map(|i| !self.get_int(len - i - 1)).collect();
        BigInt::from_twos_complement(words)
    }
}

impl Not for BigInt {
    type Output = BigInt;

    #[inline]
    fn not(self) -> BigInt {
        !&self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;
    use num_traits::One;

    #[test]
    fn test_bit_length() {
        let cases: [(i64, u64); 9] = [
            (0, 0),
            (1, 1),
            (-1, 0),
            (255, 8),
            (256, 9),
            (-256, 8),
            (-257, 9),
            (i64::MIN, 63),
            (i64::MAX, 63),
        ];
        for (v, bits) in cases {
            assert_eq!(BigInt::from(v).bit_length(), bits, "{}", v);
        }
        let big = BigInt::one() << 1000usize;
        assert_eq!(big.bit_length(), 1001);
        assert_eq!((-big).bit_length(), 1000);
    }

    #[test]
    fn test_bit_count() {
        assert_eq!(BigInt::from(0).bit_count(), 0);
        assert_eq!(BigInt::from(7).bit_count(), 3);
        assert_eq!(BigInt::from(-1).bit_count(), 0);
        assert_eq!(BigInt::from(-3).bit_count(), 1);
        assert_eq!(BigInt::from(-13).bit_count(), 2);
        assert_eq!(BigInt::from(-4294967295i64).bit_count(), 31);
        assert_eq!(BigInt::from(-8).bit_count(), 3);
        assert_eq!(BigInt::from(i64::MIN).bit_count(), 63);
    }

    #[test]
    fn test_lowest_set_bit() {
        assert_eq!(BigInt::zero().lowest_set_bit(), None);
        assert_eq!(BigInt::from(12).lowest_set_bit(), Some(2));
        assert_eq!(BigInt::from(-12).lowest_set_bit(), Some(2));
        assert_eq!((BigInt::one() << 77usize).lowest_set_bit(), Some(77));
    }

    #[test]
    fn test_bit_ops() {
        assert!(BigInt::from(-1).test_bit(1000));
        assert!(!BigInt::from(5).test_bit(1));
        assert_eq!(BigInt::from(0).set_bit(64), BigInt::one() << 64usize);
        assert_eq!(BigInt::from(-1).clear_bit(0), BigInt::from(-2));
        assert_eq!(BigInt::from(-2).flip_bit(0), BigInt::from(-1));
        assert_eq!(BigInt::from(6).flip_bit(70).flip_bit(70), BigInt::from(6));
    }

    #[test]
    fn test_bitwise_twos_complement() {
        let a = BigInt::from(-12);
        let b = BigInt::from(10);
        assert_eq!(&a & &b, BigInt::from(-12i64 & 10));
        assert_eq!(&a | &b, BigInt::from(-12i64 | 10));
        assert_eq!(&a ^ &b, BigInt::from(-12i64 ^ 10));
        assert_eq!(a.and_not(&b), BigInt::from(-12i64 & !10));
        assert_eq!(!&a, BigInt::from(11));
        assert_eq!(!BigInt::zero(), BigInt::from(-1));

        let x = BigInt::from_str("-79228162514264337593543950336").unwrap();
        let y = BigInt::from_str("18446744073709551615").unwrap();
        assert_eq!(&x & &y, BigInt::zero());
        assert_eq!(&x | &y, BigInt::from_str("-79228162495817593519834398721").unwrap());
    }
}
