use core::fmt;
use core::str::FromStr;
use std::f64::consts::LN_2;
use std::sync::{Arc, LazyLock};

use num_traits::{Num, Signed, Zero};
use parking_lot::RwLock;
use tracing::debug;

use super::BigInt;
use super::Sign::{Minus, Plus};
use crate::error::FormatError;
use crate::mutable::MutableBigInt;

/// `log2(radix) * 1024`, rounded up, indexed by radix.
const BITS_PER_DIGIT: [u64; 37] = [
    0, 0, 1024, 1624, 2048, 2378, 2648, 2875, 3072, 3247, 3402, 3543, 3672, 3790, 3899, 4001,
    4096, 4186, 4271, 4350, 4426, 4498, 4567, 4633, 4696, 4756, 4814, 4870, 4923, 4975, 5025,
    5074, 5120, 5166, 5210, 5253, 5295,
];

/// Magnitudes up to this many words are converted to text by repeated
/// single word division.
const SCHOENHAGE_BASE_CONVERSION_THRESHOLD: usize = 20;

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// The largest power of `radix` that fits a word, and its exponent.
const fn word_radix(radix: u32) -> (u32, usize) {
    let radix = radix as u64;
    let mut power = radix;
    let mut digits = 1;
    while power * radix <= u32::MAX as u64 {
        power *= radix;
        digits += 1;
    }
    (power as u32, digits)
}

/// Cached `radix^(2^k)` per radix. Lines only ever grow.
static RADIX_POWERS: LazyLock<RwLock<Vec<Arc<Vec<BigInt>>>>> = LazyLock::new(|| {
    RwLock::new(
        (0..=36u32)
            .map(|radix| Arc::new(vec![BigInt::from(radix)]))
            .collect(),
    )
});

/// `radix^(2^exponent)`.
fn radix_conversion_power(radix: u32, exponent: usize) -> BigInt {
    let line = Arc::clone(&RADIX_POWERS.read()[radix as usize]);
    if exponent < line.len() {
        return line[exponent].clone();
    }

    let mut extended = Vec::with_capacity(exponent + 1);
    extended.extend(line.iter().cloned());
    for i in line.len()..=exponent {
        let next = extended[i - 1].square();
        extended.push(next);
    }
    let result = extended[exponent].clone();

    let mut cache = RADIX_POWERS.write();
    if cache[radix as usize].len() < extended.len() {
        debug!(radix, len = extended.len(), "radix power cache extended");
        cache[radix as usize] = Arc::new(extended);
    }
    result
}

/// `x = x * y + z`, in place.
fn destructive_mul_add(x: &mut [u32], y: u32, z: u32) {
    let y = u64::from(y);
    let len = x.len();

    let mut carry = 0u64;
    for i in (0..len).rev() {
        let product = y * u64::from(x[i]) + carry;
        x[i] = product as u32;
        carry = product >> 32;
    }

    let mut sum = u64::from(x[len - 1]) + u64::from(z);
    x[len - 1] = sum as u32;
    carry = sum >> 32;
    for i in (0..len - 1).rev() {
        sum = u64::from(x[i]) + carry;
        x[i] = sum as u32;
        carry = sum >> 32;
    }
}

fn parse_group(digits: &[u8], radix: u32) -> Result<u32, FormatError> {
    digits.iter().try_fold(0u32, |acc, &c| {
        let d = (c as char).to_digit(radix).ok_or(FormatError::InvalidDigit)?;
        Ok(acc * radix + d)
    })
}

/// Builds a magnitude from a run of ASCII decimal digits already checked
/// by the caller.
pub(crate) fn from_ascii_digits(digits: &[u8]) -> BigInt {
    let start = digits.iter().position(|&c| c != b'0').unwrap_or(digits.len());
    let digits = &digits[start..];
    if digits.is_empty() {
        return BigInt::zero();
    }

    let (super_radix, digits_per_word) = word_radix(10);
    let num_bits = ((digits.len() as u64 * BITS_PER_DIGIT[10]) >> 10) + 1;
    let mut magnitude = vec![0u32; num_bits.div_ceil(32) as usize];

    let group_value = |group: &[u8]| {
        group
            .iter()
            .fold(0u32, |acc, &c| acc * 10 + u32::from(c.wrapping_sub(b'0')))
    };

    let mut first = digits.len() % digits_per_word;
    if first == 0 {
        first = digits_per_word;
    }
    let last = magnitude.len() - 1;
    magnitude[last] = group_value(&digits[..first]);
    for group in digits[first..].chunks(digits_per_word) {
        destructive_mul_add(&mut magnitude, super_radix, group_value(group));
    }
    BigInt::from_mag(Plus, magnitude)
}

fn parse_radix(s: &str, radix: u32) -> Result<BigInt, FormatError> {
    if !(2..=36).contains(&radix) {
        return Err(FormatError::RadixOutOfRange(radix));
    }

    let bytes = s.as_bytes();
    let len = bytes.len();
    if len == 0 {
        return Err(FormatError::Empty);
    }

    let mut sign = Plus;
    let mut cursor = 0;
    let minus = s.rfind('-');
    let plus = s.rfind('+');
    if let Some(i) = minus {
        if i != 0 || plus.is_some() {
            return Err(FormatError::EmbeddedSign);
        }
        sign = Minus;
        cursor = 1;
    } else if let Some(i) = plus {
        if i != 0 {
            return Err(FormatError::EmbeddedSign);
        }
        cursor = 1;
    }
    if cursor == len {
        return Err(FormatError::Empty);
    }

    while cursor < len && (bytes[cursor] as char).to_digit(radix) == Some(0) {
        cursor += 1;
    }
    if cursor == len {
        return Ok(BigInt::zero());
    }

    let num_digits = len - cursor;
    let num_bits = ((num_digits as u64 * BITS_PER_DIGIT[radix as usize]) >> 10) + 1;
    let num_words = num_bits.div_ceil(32) as usize;
    let mut magnitude = vec![0u32; num_words];

    let (super_radix, digits_per_word) = word_radix(radix);
    let mut first_group_len = num_digits % digits_per_word;
    if first_group_len == 0 {
        first_group_len = digits_per_word;
    }

    magnitude[num_words - 1] = parse_group(&bytes[cursor..cursor + first_group_len], radix)?;
    cursor += first_group_len;

    while cursor < len {
        let group = parse_group(&bytes[cursor..cursor + digits_per_word], radix)?;
        cursor += digits_per_word;
        destructive_mul_add(&mut magnitude, super_radix, group);
    }

    Ok(BigInt::from_mag(sign, magnitude))
}

fn pad_with_zeros(buf: &mut String, n: usize) {
    buf.extend(core::iter::repeat_n('0', n));
}

fn format_word(mut w: u32, radix: u32, out: &mut Vec<u8>) {
    out.clear();
    loop {
        out.push(DIGITS[(w % radix) as usize]);
        w /= radix;
        if w == 0 {
            break;
        }
    }
    out.reverse();
}

/// Writes a non-negative value by repeated single word division, padding
/// on the left to at least `digits` characters.
fn small_to_string(u: &BigInt, radix: u32, buf: &mut String, digits: usize) {
    if u.is_zero() {
        pad_with_zeros(buf, digits);
        return;
    }

    let (d, digits_per_word) = word_radix(radix);
    let mut groups = Vec::new();
    let mut tmp = MutableBigInt::from_words(&u.mag);
    while !tmp.is_zero() {
        let (q, r) = tmp.divide_one_word(d);
        groups.push(r);
        tmp = q;
    }

    let mut scratch = Vec::with_capacity(32);
    let mut groups = groups.into_iter().rev();
    if let Some(top) = groups.next() {
        format_word(top, radix, &mut scratch);
        let total = scratch.len() + groups.len() * digits_per_word;
        pad_with_zeros(buf, digits.saturating_sub(total));
        buf.extend(scratch.iter().map(|&c| c as char));
    }
    for g in groups {
        format_word(g, radix, &mut scratch);
        pad_with_zeros(buf, digits_per_word - scratch.len());
        buf.extend(scratch.iter().map(|&c| c as char));
    }
}

/// Schoenhage recursive conversion: split by a cached power of the radix
/// and convert both halves.
fn write_radix(u: &BigInt, buf: &mut String, radix: u32, digits: usize) {
    if u.mag.len() <= SCHOENHAGE_BASE_CONVERSION_THRESHOLD {
        small_to_string(u, radix, buf, digits);
        return;
    }

    let b = u.bit_length() as f64;
    let n = ((b * LN_2 / f64::from(radix).ln()).ln() / LN_2 - 1.0).round() as usize;
    let v = radix_conversion_power(radix, n);
    let (q, r) = match u.divide_and_remainder(&v) {
        Ok(qr) => qr,
        Err(_) => return small_to_string(u, radix, buf, digits),
    };

    let expected_digits = 1usize << n;
    write_radix(&q, buf, radix, digits.saturating_sub(expected_digits));
    write_radix(&r, buf, radix, expected_digits);
}

impl BigInt {
    /// Parses a string of digits in the given radix, with an optional
    /// leading sign.
    pub fn parse_bytes(buf: &[u8], radix: u32) -> Option<BigInt> {
        let s = core::str::from_utf8(buf).ok()?;
        parse_radix(s, radix).ok()
    }

    /// Lowercase digits in the given radix; out of range radixes fall back
    /// to ten.
    pub fn to_str_radix(&self, radix: u32) -> String {
        let radix = if (2..=36).contains(&radix) { radix } else { 10 };
        if self.is_zero() {
            return "0".to_string();
        }

        let mut buf = String::new();
        if self.sign == Minus {
            buf.push('-');
        }
        write_radix(&self.abs(), &mut buf, radix, 0);
        buf
    }

    pub(crate) fn magnitude_str(&self, radix: u32) -> String {
        let mut buf = String::new();
        if self.is_zero() {
            buf.push('0');
        } else {
            write_radix(&self.abs(), &mut buf, radix, 0);
        }
        buf
    }
}

impl FromStr for BigInt {
    type Err = FormatError;

    #[inline]
    fn from_str(s: &str) -> Result<BigInt, FormatError> {
        parse_radix(s, 10)
    }
}

impl Num for BigInt {
    type FromStrRadixErr = FormatError;

    #[inline]
    fn from_str_radix(s: &str, radix: u32) -> Result<BigInt, FormatError> {
        parse_radix(s, radix)
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(self.sign != Minus, "", &self.magnitude_str(10))
    }
}

impl fmt::LowerHex for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(self.sign != Minus, "0x", &self.magnitude_str(16))
    }
}

impl fmt::UpperHex for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.magnitude_str(16).to_ascii_uppercase();
        f.pad_integral(self.sign != Minus, "0x", &s)
    }
}

impl fmt::Octal for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(self.sign != Minus, "0o", &self.magnitude_str(8))
    }
}

impl fmt::Binary for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(self.sign != Minus, "0b", &self.magnitude_str(2))
    }
}
