use num_traits::{FromPrimitive, ToPrimitive, Zero};

use super::Sign::{self, Minus, NoSign, Plus};
use super::{strip_leading_zeros, BigInt};
use crate::error::{ArithmeticError, FormatError};

fn mag_from_u64(n: u64) -> Vec<u32> {
    let hi = (n >> 32) as u32;
    let lo = n as u32;
    if hi != 0 {
        vec![hi, lo]
    } else if lo != 0 {
        vec![lo]
    } else {
        Vec::new()
    }
}

fn mag_from_u128(n: u128) -> Vec<u32> {
    let words = vec![(n >> 96) as u32, (n >> 64) as u32, (n >> 32) as u32, n as u32];
    strip_leading_zeros(words)
}

impl From<i64> for BigInt {
    #[inline]
    fn from(n: i64) -> Self {
        if n < 0 {
            BigInt::from_mag(Minus, mag_from_u64(n.unsigned_abs()))
        } else {
            BigInt::from_mag(Plus, mag_from_u64(n as u64))
        }
    }
}

impl From<u64> for BigInt {
    #[inline]
    fn from(n: u64) -> Self {
        BigInt::from_mag(Plus, mag_from_u64(n))
    }
}

impl From<i128> for BigInt {
    #[inline]
    fn from(n: i128) -> Self {
        if n < 0 {
            BigInt::from_mag(Minus, mag_from_u128(n.unsigned_abs()))
        } else {
            BigInt::from_mag(Plus, mag_from_u128(n as u128))
        }
    }
}

impl From<u128> for BigInt {
    #[inline]
    fn from(n: u128) -> Self {
        BigInt::from_mag(Plus, mag_from_u128(n))
    }
}

macro_rules! impl_bigint_from_int {
    ($via:ty; $($t:ty),*) => {$(
        impl From<$t> for BigInt {
            #[inline]
            fn from(n: $t) -> Self {
                BigInt::from(n as $via)
            }
        }
    )*};
}

impl_bigint_from_int!(i64; i8, i16, i32, isize);
impl_bigint_from_int!(u64; u8, u16, u32, usize);

impl FromPrimitive for BigInt {
    #[inline]
    fn from_i64(n: i64) -> Option<BigInt> {
        Some(BigInt::from(n))
    }

    #[inline]
    fn from_u64(n: u64) -> Option<BigInt> {
        Some(BigInt::from(n))
    }

    #[inline]
    fn from_i128(n: i128) -> Option<BigInt> {
        Some(BigInt::from(n))
    }

    #[inline]
    fn from_u128(n: u128) -> Option<BigInt> {
        Some(BigInt::from(n))
    }

    /// Truncates toward zero; non-finite values have no integer form.
    fn from_f64(n: f64) -> Option<BigInt> {
        if !n.is_finite() {
            return None;
        }
        let n = n.trunc();
        if n == 0.0 {
            return Some(BigInt::zero());
        }

        let bits = n.to_bits();
        let exponent = ((bits >> 52) & 0x7ff) as i64;
        let mantissa = if exponent == 0 {
            (bits & ((1 << 52) - 1)) << 1
        } else {
            (bits & ((1 << 52) - 1)) | (1 << 52)
        };
        let exponent = exponent - 1075;

        let magnitude = if exponent >= 0 {
            BigInt::from(mantissa) << exponent as usize
        } else {
            BigInt::from(mantissa) >> exponent.unsigned_abs() as usize
        };
        Some(if n.is_sign_negative() { -magnitude } else { magnitude })
    }
}

impl BigInt {
    /// The top 64 bits of the magnitude, with the lowest bit forced on when
    /// any bit below them is set, and the count of bits dropped.
    fn top_bits_with_sticky(&self) -> (u64, u64) {
        let len = self.mag.len();
        let mag_bits = (len as u64 - 1) * 32 + u64::from(32 - self.mag[0].leading_zeros());
        if mag_bits <= 64 {
            let v = self.mag.iter().fold(0u64, |acc, &w| (acc << 32) | u64::from(w));
            return (v, 0);
        }

        let shift = mag_bits - 64;
        let top = super::shift_right_mag(&self.mag, shift as usize)
            .iter()
            .fold(0u64, |acc, &w| (acc << 32) | u64::from(w));

        let whole_words = (shift / 32) as usize;
        let partial = (shift % 32) as u32;
        let mut sticky = self.mag[len - whole_words..].iter().any(|&w| w != 0);
        if !sticky && partial != 0 {
            sticky = self.mag[len - whole_words - 1] << (32 - partial) != 0;
        }
        (if sticky { top | 1 } else { top }, shift)
    }

    fn magnitude_to_f64(&self) -> f64 {
        let (top, mut shift) = self.top_bits_with_sticky();
        let mut result = top as f64;
        while shift > 0 && result.is_finite() {
            let step = shift.min(1000);
            result *= 2f64.powi(step as i32);
            shift -= step;
        }
        result
    }

    fn magnitude_to_f32(&self) -> f32 {
        let (top, mut shift) = self.top_bits_with_sticky();
        let mut result = top as f32;
        while shift > 0 && result.is_finite() {
            let step = shift.min(100);
            result *= 2f32.powi(step as i32);
            shift -= step;
        }
        result
    }

    /// Converts to `i64`, or fails if the value does not fit.
    pub fn to_i64_exact(&self) -> Result<i64, ArithmeticError> {
        self.to_i64().ok_or(ArithmeticError::OutOfRange("i64"))
    }

    /// Converts to `i32`, or fails if the value does not fit.
    pub fn to_i32_exact(&self) -> Result<i32, ArithmeticError> {
        self.to_i32().ok_or(ArithmeticError::OutOfRange("i32"))
    }

    /// Converts to `i16`, or fails if the value does not fit.
    pub fn to_i16_exact(&self) -> Result<i16, ArithmeticError> {
        self.to_i16().ok_or(ArithmeticError::OutOfRange("i16"))
    }

    /// Converts to `i8`, or fails if the value does not fit.
    pub fn to_i8_exact(&self) -> Result<i8, ArithmeticError> {
        self.to_i8().ok_or(ArithmeticError::OutOfRange("i8"))
    }

    /// The low 64 bits of the two's complement form.
    pub fn to_i64_wrapping(&self) -> i64 {
        ((u64::from(self.get_int(1)) << 32) | u64::from(self.get_int(0))) as i64
    }

    /// The low 32 bits of the two's complement form.
    pub fn to_i32_wrapping(&self) -> i32 {
        self.get_int(0) as i32
    }

    /// Creates a value from big-endian two's complement bytes.
    pub fn from_signed_bytes_be(bytes: &[u8]) -> Result<BigInt, FormatError> {
        let Some(&first) = bytes.first() else {
            return Err(FormatError::ZeroLengthBytes);
        };

        if (first as i8) < 0 {
            let inverted: Vec<u8> = bytes.iter().map(|b| !b).collect();
            let mag = super::increment_mag(bytes_to_words(&inverted));
            Ok(BigInt::from_mag(Minus, mag))
        } else {
            Ok(BigInt::from_mag(Plus, bytes_to_words(bytes)))
        }
    }

    /// Creates a value from a sign and big-endian magnitude bytes.
    pub fn from_bytes_be(sign: Sign, bytes: &[u8]) -> Result<BigInt, FormatError> {
        let mag = bytes_to_words(bytes);
        if mag.is_empty() {
            return Ok(BigInt::zero());
        }
        if sign == NoSign {
            return Err(FormatError::SignMagnitudeMismatch);
        }
        Ok(BigInt::from_mag(sign, mag))
    }

    /// Minimal big-endian two's complement bytes, at least one byte long.
    pub fn to_signed_bytes_be(&self) -> Vec<u8> {
        let byte_len = (self.bit_length() / 8 + 1) as usize;
        let mut bytes = vec![0u8; byte_len];

        let mut bytes_copied = 4;
        let mut next_int = 0u32;
        let mut int_index = 0;
        for i in (0..byte_len).rev() {
            if bytes_copied == 4 {
                next_int = self.get_int(int_index);
                int_index += 1;
                bytes_copied = 1;
            } else {
                next_int >>= 8;
                bytes_copied += 1;
            }
            bytes[i] = next_int as u8;
        }
        bytes
    }

    /// The sign and big-endian magnitude bytes; zero is a single zero byte.
    pub fn to_bytes_be(&self) -> (Sign, Vec<u8>) {
        let mut bytes: Vec<u8> = self.mag.iter().flat_map(|w| w.to_be_bytes()).collect();
        let keep = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        bytes.drain(..keep);
        if bytes.is_empty() {
            bytes.push(0);
        }
        (self.sign, bytes)
    }
}

/// Packs big-endian bytes into minimal big-endian words.
fn bytes_to_words(bytes: &[u8]) -> Vec<u32> {
    let keep = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    let bytes = &bytes[keep..];
    bytes
        .rchunks(4)
        .rev()
        .map(|chunk| chunk.iter().fold(0u32, |w, &b| (w << 8) | u32::from(b)))
        .collect()
}

impl ToPrimitive for BigInt {
    fn to_i64(&self) -> Option<i64> {
        if self.mag.len() <= 2 && self.bit_length() <= 63 {
            Some(self.to_i64_wrapping())
        } else {
            None
        }
    }

    fn to_u64(&self) -> Option<u64> {
        if self.sign == Minus || self.mag.len() > 2 {
            return None;
        }
        Some(self.mag.iter().fold(0u64, |acc, &w| (acc << 32) | u64::from(w)))
    }

    fn to_i128(&self) -> Option<i128> {
        if self.mag.len() > 4 || self.bit_length() > 127 {
            return None;
        }
        let v = self.mag.iter().fold(0u128, |acc, &w| (acc << 32) | u128::from(w));
        Some(if self.sign == Minus {
            (v as i128).wrapping_neg()
        } else {
            v as i128
        })
    }

    fn to_u128(&self) -> Option<u128> {
        if self.sign == Minus || self.mag.len() > 4 {
            return None;
        }
        Some(self.mag.iter().fold(0u128, |acc, &w| (acc << 32) | u128::from(w)))
    }

    fn to_f32(&self) -> Option<f32> {
        if self.is_zero() {
            return Some(0.0);
        }
        let mag = self.magnitude_to_f32();
        Some(if self.sign == Minus { -mag } else { mag })
    }

    fn to_f64(&self) -> Option<f64> {
        if self.is_zero() {
            return Some(0.0);
        }
        let mag = self.magnitude_to_f64();
        Some(if self.sign == Minus { -mag } else { mag })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;
    use num_traits::One;

    #[test]
    fn test_from_primitives() {
        assert_eq!(BigInt::from(i64::MIN).to_string(), "-9223372036854775808");
        assert_eq!(BigInt::from(u64::MAX).to_string(), "18446744073709551615");
        assert_eq!(BigInt::from(i128::MIN).to_string(), "-170141183460469231731687303715884105728");
        assert_eq!(BigInt::from(0u8), BigInt::zero());
        assert_eq!(BigInt::from(-1i8), -BigInt::one());
    }

    #[test]
    fn test_to_primitives() {
        assert_eq!(BigInt::from(i64::MIN).to_i64(), Some(i64::MIN));
        assert_eq!(BigInt::from(i64::MAX).to_i64(), Some(i64::MAX));
        assert_eq!((BigInt::from(i64::MAX) + 1u32).to_i64(), None);
        assert_eq!(BigInt::from(u64::MAX).to_u64(), Some(u64::MAX));
        assert_eq!(BigInt::from(-1).to_u64(), None);
        assert_eq!(BigInt::from(i128::MIN).to_i128(), Some(i128::MIN));
        assert_eq!(BigInt::from(300).to_i8_exact(), Err(ArithmeticError::OutOfRange("i8")));
        assert_eq!(BigInt::from(-128).to_i8_exact(), Ok(-128));
        assert_eq!(BigInt::from(40000).to_i16_exact(), Err(ArithmeticError::OutOfRange("i16")));
        assert_eq!(BigInt::from(-2147483648i64).to_i32_exact(), Ok(i32::MIN));
    }

    #[test]
    fn test_wrapping() {
        let v = (BigInt::one() << 64usize) + 5u32;
        assert_eq!(v.to_i64_wrapping(), 5);
        assert_eq!(BigInt::from(-1).to_i64_wrapping(), -1);
        assert_eq!(BigInt::from(u32::MAX).to_i32_wrapping(), -1);
    }

    #[test]
    fn test_to_f64_rounding() {
        assert_eq!(BigInt::from(1u64 << 53).to_f64(), Some(9007199254740992.0));
        // 2^53 + 1 is a tie that rounds to even.
        assert_eq!(BigInt::from((1u64 << 53) + 1).to_f64(), Some(9007199254740992.0));
        // A set bit far below the tie breaks it upward.
        let above_tie = (BigInt::from((1u64 << 53) + 1) << 100usize) + 1u32;
        assert_eq!(above_tie.to_f64(), Some(9007199254740994.0 * 2f64.powi(100)));
        let huge = BigInt::one() << 1100usize;
        assert_eq!(huge.to_f64(), Some(f64::INFINITY));
        assert_eq!((-huge).to_f64(), Some(f64::NEG_INFINITY));
        assert_eq!(BigInt::from(-3).to_f32(), Some(-3.0));
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(BigInt::from_f64(-2.9), Some(BigInt::from(-2)));
        assert_eq!(BigInt::from_f64(1e20), Some(BigInt::from_str("100000000000000000000").unwrap()));
        assert_eq!(BigInt::from_f64(f64::NAN), None);
        assert_eq!(BigInt::from_f64(0.5), Some(BigInt::zero()));
    }

    #[test]
    fn test_signed_bytes() {
        let cases: [(i64, &[u8]); 7] = [
            (0, &[0]),
            (1, &[1]),
            (-1, &[0xff]),
            (127, &[0x7f]),
            (128, &[0x00, 0x80]),
            (-128, &[0x80]),
            (-129, &[0xff, 0x7f]),
        ];
        for (v, bytes) in cases {
            let n = BigInt::from(v);
            assert_eq!(n.to_signed_bytes_be(), bytes, "{}", v);
            assert_eq!(BigInt::from_signed_bytes_be(bytes).unwrap(), n);
        }
        assert_eq!(BigInt::from_signed_bytes_be(&[0xff, 0xff, 0x00]).unwrap(), BigInt::from(-256));
        assert_eq!(BigInt::from_signed_bytes_be(&[]), Err(FormatError::ZeroLengthBytes));
    }

    #[test]
    fn test_unsigned_bytes() {
        let n = BigInt::from(-0x0102_0304_05i64);
        assert_eq!(n.to_bytes_be(), (Minus, vec![1, 2, 3, 4, 5]));
        assert_eq!(BigInt::from_bytes_be(Minus, &[0, 1, 2, 3, 4, 5]).unwrap(), n);
        assert_eq!(BigInt::zero().to_bytes_be(), (NoSign, vec![0]));
        assert_eq!(BigInt::from_bytes_be(NoSign, &[0, 0]).unwrap(), BigInt::zero());
        assert_eq!(
            BigInt::from_bytes_be(NoSign, &[1]),
            Err(FormatError::SignMagnitudeMismatch)
        );
    }
}
