//! Arbitrary precision signed integers.

use core::cmp::Ordering::{self, Equal};
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::Neg;
use std::sync::OnceLock;

use num_traits::{One, Signed, Zero};

use self::Sign::{Minus, NoSign, Plus};

mod addition;
mod bits;
mod convert;
mod division;
mod monty;
mod multiplication;
mod power;
mod radix;
mod shift;
mod subtraction;

#[cfg(feature = "zeroize")]
mod zeroize;

pub(crate) use self::addition::add_mag;
pub(crate) use self::multiplication::{mul_add, add_one, multiply_to_len, square_to_len};
pub(crate) use self::radix::from_ascii_digits;
pub(crate) use self::shift::{shift_left_mag, shift_right_mag};
pub(crate) use self::subtraction::sub_mag;

pub use self::division::{div_rem_burnikel_ziegler, div_rem_knuth};
pub use self::multiplication::{
    multiply_karatsuba, multiply_schoolbook, multiply_toom_cook3, square_karatsuba,
    square_schoolbook, square_toom_cook3,
};

/// A `Sign` is a [`BigInt`]'s composing element.
#[derive(PartialEq, PartialOrd, Eq, Ord, Copy, Clone, Debug, Hash)]
pub enum Sign {
    Minus,
    NoSign,
    Plus,
}

impl Neg for Sign {
    type Output = Sign;

    /// Negate `Sign` value.
    #[inline]
    fn neg(self) -> Sign {
        match self {
            Minus => Plus,
            NoSign => NoSign,
            Plus => Minus,
        }
    }
}

impl Sign {
    /// The sign of a product of values carrying `self` and `other`.
    #[inline]
    pub(crate) fn product(self, other: Sign) -> Sign {
        if self == NoSign || other == NoSign {
            NoSign
        } else if self == other {
            Plus
        } else {
            Minus
        }
    }
}

#[derive(Clone, Default)]
struct Cache {
    bit_length: OnceLock<u64>,
    bit_count: OnceLock<u64>,
    lowest_set_bit: OnceLock<Option<u64>>,
    first_nonzero_word: OnceLock<usize>,
}

/// An immutable arbitrary precision signed integer.
///
/// The magnitude is a big-endian sequence of 32-bit words without leading
/// zeros, so every value has exactly one representation. Derived attributes
/// such as the bit length are computed on first use and then frozen.
#[derive(Clone)]
pub struct BigInt {
    sign: Sign,
    mag: Vec<u32>,
    cache: Cache,
}

/// Drops leading zero words.
pub(crate) fn strip_leading_zeros(mut mag: Vec<u32>) -> Vec<u32> {
    let keep = mag.iter().position(|&w| w != 0).unwrap_or(mag.len());
    if keep > 0 {
        mag.drain(..keep);
    }
    mag
}

/// Compares two minimal magnitudes.
pub(crate) fn compare_magnitude(a: &[u32], b: &[u32]) -> Ordering {
    match a.len().cmp(&b.len()) {
        Equal => a.cmp(b),
        other => other,
    }
}

/// Adds one to a magnitude.
pub(crate) fn increment_mag(mut mag: Vec<u32>) -> Vec<u32> {
    for w in mag.iter_mut().rev() {
        let (sum, overflow) = w.overflowing_add(1);
        *w = sum;
        if !overflow {
            return mag;
        }
    }
    mag.insert(0, 1);
    mag
}

impl BigInt {
    /// Builds a value from a sign and a big-endian magnitude that may carry
    /// leading zero words.
    pub(crate) fn from_mag(sign: Sign, mag: Vec<u32>) -> BigInt {
        let mag = strip_leading_zeros(mag);
        let sign = if mag.is_empty() {
            NoSign
        } else if sign == NoSign {
            Plus
        } else {
            sign
        };
        BigInt {
            sign,
            mag,
            cache: Cache::default(),
        }
    }

    /// Returns the sign of the `BigInt` as a [`Sign`].
    #[inline]
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// -1, 0 or 1 as the value is negative, zero or positive.
    #[inline]
    pub(crate) fn signum_i32(&self) -> i32 {
        match self.sign {
            Minus => -1,
            NoSign => 0,
            Plus => 1,
        }
    }

    /// The big-endian magnitude words.
    #[inline]
    pub(crate) fn mag(&self) -> &[u32] {
        &self.mag
    }

    /// The constant two.
    pub fn two() -> BigInt {
        BigInt::from(2u32)
    }

    /// The constant ten.
    pub fn ten() -> BigInt {
        BigInt::from(10u32)
    }

    /// Compares absolute values.
    #[inline]
    pub fn cmp_magnitude(&self, other: &BigInt) -> Ordering {
        compare_magnitude(&self.mag, &other.mag)
    }

    /// The value with a non-negative sign.
    pub(crate) fn magnitude_value(&self) -> BigInt {
        if self.sign == Minus {
            -self
        } else {
            self.clone()
        }
    }

    /// Reduces a value into `[0, m)` for a modulus known to be positive.
    pub(crate) fn mod_positive(&self, m: &BigInt) -> BigInt {
        let r = self % m;
        if r.sign == Minus { r + m } else { r }
    }
}

impl Default for BigInt {
    #[inline]
    fn default() -> BigInt {
        BigInt::zero()
    }
}

impl PartialEq for BigInt {
    #[inline]
    fn eq(&self, other: &BigInt) -> bool {
        self.sign == other.sign && self.mag == other.mag
    }
}

impl Eq for BigInt {}

impl Hash for BigInt {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sign.hash(state);
        self.mag.hash(state);
    }
}

impl PartialOrd for BigInt {
    #[inline]
    fn partial_cmp(&self, other: &BigInt) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &BigInt) -> Ordering {
        let scmp = self.sign.cmp(&other.sign);
        if scmp != Equal {
            return scmp;
        }

        match self.sign {
            NoSign => Equal,
            Plus => compare_magnitude(&self.mag, &other.mag),
            Minus => compare_magnitude(&other.mag, &self.mag),
        }
    }
}

impl fmt::Debug for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Zero for BigInt {
    #[inline]
    fn zero() -> BigInt {
        BigInt {
            sign: NoSign,
            mag: Vec::new(),
            cache: Cache::default(),
        }
    }

    #[inline]
    fn set_zero(&mut self) {
        *self = BigInt::zero();
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.sign == NoSign
    }
}

impl One for BigInt {
    #[inline]
    fn one() -> BigInt {
        BigInt::from_mag(Plus, vec![1])
    }

    #[inline]
    fn is_one(&self) -> bool {
        self.sign == Plus && self.mag.len() == 1 && self.mag[0] == 1
    }
}

impl Signed for BigInt {
    #[inline]
    fn abs(&self) -> BigInt {
        self.magnitude_value()
    }

    #[inline]
    fn abs_sub(&self, other: &BigInt) -> BigInt {
        if *self <= *other {
            BigInt::zero()
        } else {
            self - other
        }
    }

    #[inline]
    fn signum(&self) -> BigInt {
        match self.sign {
            Plus => BigInt::one(),
            Minus => -BigInt::one(),
            NoSign => BigInt::zero(),
        }
    }

    #[inline]
    fn is_positive(&self) -> bool {
        self.sign == Plus
    }

    #[inline]
    fn is_negative(&self) -> bool {
        self.sign == Minus
    }
}

impl Neg for BigInt {
    type Output = BigInt;

    #[inline]
    fn neg(mut self) -> BigInt {
        self.sign = -self.sign;
        // Bit views of a negated value differ.
        self.cache = Cache::default();
        self
    }
}

impl Neg for &BigInt {
    type Output = BigInt;

    #[inline]
    fn neg(self) -> BigInt {
        -self.clone()
    }
}
