//! Arbitrary precision signed decimals.
//!
//! A [`BigDecimal`] is an unscaled [`BigInt`] together with a 32-bit scale:
//! the value is `unscaled × 10^-scale`. Arithmetic is exact unless a
//! [`MathContext`] asks for rounding.

use core::cmp::Ordering::{self, Equal, Greater, Less};
use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::OnceLock;

use num_traits::{One, Zero};

use crate::bigint::{BigInt, Sign, from_ascii_digits};
use crate::context::MathContext;
use crate::error::ArithmeticError;

use self::rounding::do_round;
use self::tens::{big_digit_length, multiply_power_ten};

mod arith;
mod convert;
mod divide;
mod format;
mod parse;
mod power;
mod rounding;
mod scale;
mod tens;

const PI_DIGITS: &str = "3141592653589793238462643383279502884197169399375105820974944592307816406286208998628034825342117067982148086513282306647093844609550582231725359408128481117450284102701938521105559644622948954930381964428810975665933446128475648233786783165271201909145648";
const E_DIGITS: &str = "2718281828459045235360287471352662497757247093699959574966967627724076630353547594571382178525166427427466391932003059921817413596629043572900334295260595630738132328627943490763233829880753195251019011573834187930702154089149934884167509244761460668082264";

/// An immutable arbitrary precision signed decimal.
///
/// Equality and hashing see the scale, so `2.0 != 2.00`; use
/// [`BigDecimal::compare_to`] for numeric comparison.
#[derive(Clone)]
pub struct BigDecimal {
    int_val: BigInt,
    scale: i32,
    precision: OnceLock<u32>,
    string_cache: OnceLock<String>,
}

impl BigDecimal {
    /// `unscaled × 10^-scale`.
    pub fn new(unscaled: BigInt, scale: i32) -> BigDecimal {
        BigDecimal {
            int_val: unscaled,
            scale,
            precision: OnceLock::new(),
            string_cache: OnceLock::new(),
        }
    }

    /// Like [`BigDecimal::new`], with the digit count of `unscaled` already
    /// known. A `precision` of zero means unknown.
    pub fn from_parts_with_precision(unscaled: BigInt, scale: i32, precision: u32) -> BigDecimal {
        debug_assert!(precision == 0 || precision == big_digit_length(&unscaled));
        let value = BigDecimal::new(unscaled, scale);
        if precision > 0 {
            let _ = value.precision.set(precision);
        }
        value
    }

    /// `unscaled × 10^-scale`, rounded to `mc`.
    pub fn with_context(
        unscaled: BigInt,
        scale: i32,
        mc: &MathContext,
    ) -> Result<BigDecimal, ArithmeticError> {
        do_round(BigDecimal::new(unscaled, scale), mc)
    }

    /// Zero at the given scale.
    pub(crate) fn zero_value_of(scale: i32) -> BigDecimal {
        BigDecimal::from_parts_with_precision(BigInt::zero(), scale, 1)
    }

    /// The unscaled value.
    #[inline]
    pub fn unscaled_value(&self) -> &BigInt {
        &self.int_val
    }

    #[inline]
    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// The number of digits in the unscaled value. Zero has precision 1.
    pub fn precision(&self) -> u32 {
        *self.precision.get_or_init(|| big_digit_length(&self.int_val))
    }

    /// -1, 0 or 1 as the value is negative, zero or positive.
    #[inline]
    pub fn signum(&self) -> i32 {
        self.int_val.signum_i32()
    }

    #[inline]
    pub fn sign(&self) -> Sign {
        self.int_val.sign()
    }

    pub(crate) fn into_parts(self) -> (BigInt, i32) {
        (self.int_val, self.scale)
    }

    /// The constant two.
    pub fn two() -> BigDecimal {
        BigDecimal::from_parts_with_precision(BigInt::two(), 0, 1)
    }

    /// The constant ten.
    pub fn ten() -> BigDecimal {
        BigDecimal::from_parts_with_precision(BigInt::ten(), 0, 2)
    }

    /// The constant `0.1`.
    pub fn one_tenth() -> BigDecimal {
        BigDecimal::from_parts_with_precision(BigInt::one(), 1, 1)
    }

    /// The constant `0.5`.
    pub fn one_half() -> BigDecimal {
        BigDecimal::from_parts_with_precision(BigInt::from(5u32), 1, 1)
    }

    /// π to 255 decimal places.
    pub fn pi() -> BigDecimal {
        digits_constant(PI_DIGITS)
    }

    /// Euler's number to 255 decimal places.
    pub fn e() -> BigDecimal {
        digits_constant(E_DIGITS)
    }

    /// Numeric comparison, ignoring scale: `2.0` and `2.00` compare equal.
    pub fn compare_to(&self, other: &BigDecimal) -> Ordering {
        if self.scale == other.scale {
            return self.int_val.cmp(&other.int_val);
        }
        let xsign = self.signum();
        let ysign = other.signum();
        if xsign != ysign {
            return xsign.cmp(&ysign);
        }
        if xsign == 0 {
            return Equal;
        }
        let cmp = self.compare_magnitude(other);
        if xsign > 0 { cmp } else { cmp.reverse() }
    }

    /// Compares absolute values of two non-zero decimals.
    pub(crate) fn compare_magnitude(&self, other: &BigDecimal) -> Ordering {
        if self.int_val.is_zero() {
            return if other.int_val.is_zero() { Equal } else { Less };
        }
        if other.int_val.is_zero() {
            return Greater;
        }
        let sdiff = i64::from(self.scale) - i64::from(other.scale);
        if sdiff != 0 {
            // Adjusted exponents, each off by one.
            let xae = i64::from(self.precision()) - i64::from(self.scale);
            let yae = i64::from(other.precision()) - i64::from(other.scale);
            match xae.cmp(&yae) {
                Equal => {}
                unequal => return unequal,
            }
            // Equal adjusted exponents bound the scale gap by a digit count.
            return if sdiff < 0 {
                multiply_power_ten(&self.int_val, (-sdiff) as i32).cmp_magnitude(&other.int_val)
            } else {
                self.int_val
                    .cmp_magnitude(&multiply_power_ten(&other.int_val, sdiff as i32))
            };
        }
        self.int_val.cmp_magnitude(&other.int_val)
    }

    /// The numerically smaller value; `self` on a tie.
    pub fn min(&self, other: &BigDecimal) -> BigDecimal {
        if self.compare_to(other) != Greater {
            self.clone()
        } else {
            other.clone()
        }
    }

    /// The numerically larger value; `self` on a tie.
    pub fn max(&self, other: &BigDecimal) -> BigDecimal {
        if self.compare_to(other) != Less {
            self.clone()
        } else {
            other.clone()
        }
    }
}

fn digits_constant(digits: &str) -> BigDecimal {
    let precision = digits.len() as u32;
    BigDecimal::from_parts_with_precision(
        from_ascii_digits(digits.as_bytes()),
        precision as i32 - 1,
        precision,
    )
}

impl Default for BigDecimal {
    #[inline]
    fn default() -> BigDecimal {
        BigDecimal::zero()
    }
}

impl Zero for BigDecimal {
    #[inline]
    fn zero() -> BigDecimal {
        BigDecimal::zero_value_of(0)
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.int_val.is_zero()
    }
}

impl One for BigDecimal {
    #[inline]
    fn one() -> BigDecimal {
        BigDecimal::from_parts_with_precision(BigInt::one(), 0, 1)
    }
}

/// Scale-sensitive: `2.0 != 2.00`.
impl PartialEq for BigDecimal {
    #[inline]
    fn eq(&self, other: &BigDecimal) -> bool {
        self.scale == other.scale && self.int_val == other.int_val
    }
}

impl Eq for BigDecimal {}

impl Hash for BigDecimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.int_val.hash(state);
        self.scale.hash(state);
    }
}

impl fmt::Debug for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
