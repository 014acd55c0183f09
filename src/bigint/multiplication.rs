use core::iter::Product;
use core::ops::{Mul, MulAssign};
use core::ptr;

use num_traits::{CheckedMul, One, Signed, Zero};
use tracing::trace;

use super::Sign::{self, Plus};
use super::{shift_left_mag, BigInt};

/// Operands below this word length are multiplied by the schoolbook loop.
pub(crate) const KARATSUBA_THRESHOLD: usize = 80;

/// Operands at or above this word length use three-way Toom-Cook.
pub(crate) const TOOM_COOK_THRESHOLD: usize = 240;

pub(crate) const KARATSUBA_SQUARE_THRESHOLD: usize = 128;
pub(crate) const TOOM_COOK_SQUARE_THRESHOLD: usize = 216;

/// Self products longer than this are routed to the squaring code.
pub(crate) const MULTIPLY_SQUARE_THRESHOLD: usize = 20;

impl BigInt {
    fn multiply(&self, other: &BigInt) -> BigInt {
        if self.is_zero() || other.is_zero() {
            return BigInt::zero();
        }

        let xlen = self.mag.len();
        if ptr::eq(self, other) && xlen > MULTIPLY_SQUARE_THRESHOLD {
            return self.square();
        }

        let ylen = other.mag.len();
        if xlen < KARATSUBA_THRESHOLD || ylen < KARATSUBA_THRESHOLD {
            multiply_schoolbook(self, other)
        } else if xlen < TOOM_COOK_THRESHOLD && ylen < TOOM_COOK_THRESHOLD {
            trace!(xlen, ylen, "karatsuba multiply");
            multiply_karatsuba(self, other)
        } else {
            trace!(xlen, ylen, "toom-cook multiply");
            multiply_toom_cook3(self, other)
        }
    }

    /// Returns `self * self`, which is always non-negative.
    pub fn square(&self) -> BigInt {
        if self.is_zero() {
            return BigInt::zero();
        }

        let len = self.mag.len();
        if len < KARATSUBA_SQUARE_THRESHOLD {
            square_schoolbook(self)
        } else if len < TOOM_COOK_SQUARE_THRESHOLD {
            trace!(len, "karatsuba square");
            square_karatsuba(self)
        } else {
            trace!(len, "toom-cook square");
            square_toom_cook3(self)
        }
    }

    /// The low `n` words of the magnitude as a non-negative value.
    fn lower_words(&self, n: usize) -> BigInt {
        let len = self.mag.len();
        if len <= n {
            return self.abs();
        }
        BigInt::from_mag(Plus, self.mag[len - n..].to_vec())
    }

    /// The magnitude without its low `n` words, as a non-negative value.
    fn upper_words(&self, n: usize) -> BigInt {
        let len = self.mag.len();
        if len <= n {
            return BigInt::zero();
        }
        BigInt::from_mag(Plus, self.mag[..len - n].to_vec())
    }

    /// One of the three slices of the magnitude used by Toom-Cook, with the
    /// value padded on the left to `full_size` words. Slice 0 is the most
    /// significant and holds `upper_size` words; slices 1 and 2 hold
    /// `lower_size` words each.
    fn toom_slice(
        &self,
        lower_size: usize,
        upper_size: usize,
        slice: usize,
        full_size: usize,
    ) -> BigInt {
        let len = self.mag.len() as isize;
        let offset = full_size as isize - len;
        let (mut start, end) = if slice == 0 {
            (-offset, upper_size as isize - 1 - offset)
        } else {
            let start =
                upper_size as isize + (slice as isize - 1) * lower_size as isize - offset;
            (start, start + lower_size as isize - 1)
        };

        if start < 0 {
            start = 0;
        }
        if end < 0 {
            return BigInt::zero();
        }

        let slice_size = end - start + 1;
        if slice_size <= 0 {
            return BigInt::zero();
        }
        if start == 0 && slice_size >= len {
            return self.abs();
        }

        let start = start as usize;
        BigInt::from_mag(Plus, self.mag[start..start + slice_size as usize].to_vec())
    }

    /// Divides by three a value known to be a multiple of three.
    fn exact_divide_by_3(&self) -> BigInt {
        let mut result = vec![0u32; self.mag.len()];
        let mut borrow = 0u32;

        for i in (0..self.mag.len()).rev() {
            let (w, underflow) = self.mag[i].overflowing_sub(borrow);
            borrow = u32::from(underflow);

            // 0xAAAAAAAB is the inverse of 3 modulo 2^32.
            let q = w.wrapping_mul(0xAAAA_AAAB);
            result[i] = q;

            if q >= 0x5555_5556 {
                borrow += 1;
                if q >= 0xAAAA_AAAB {
                    borrow += 1;
                }
            }
        }

        BigInt::from_mag(self.sign, result)
    }
}

/// Multiplies by a single word.
fn multiply_by_word(x: &[u32], y: u32, sign: Sign) -> BigInt {
    if y.is_power_of_two() {
        return BigInt::from_mag(sign, shift_left_mag(x, y.trailing_zeros() as usize));
    }

    let y = u64::from(y);
    let mut rmag = vec![0u32; x.len() + 1];
    let mut carry = 0u64;
    for (i, &xi) in x.iter().enumerate().rev() {
        let product = u64::from(xi) * y + carry;
        rmag[i + 1] = product as u32;
        carry = product >> 32;
    }
    rmag[0] = carry as u32;

    BigInt::from_mag(sign, rmag)
}

/// Full product of two magnitudes, `x.len() + y.len()` words long.
pub(crate) fn multiply_to_len(x: &[u32], y: &[u32]) -> Vec<u32> {
    let xlen = x.len();
    let ylen = y.len();
    let mut z = vec![0u32; xlen + ylen];
    if xlen == 0 || ylen == 0 {
        return z;
    }

    for i in (0..xlen).rev() {
        let xi = u64::from(x[i]);
        let mut carry = 0u64;
        for j in (0..ylen).rev() {
            let k = i + j + 1;
            let product = u64::from(y[j]) * xi + u64::from(z[k]) + carry;
            z[k] = product as u32;
            carry = product >> 32;
        }
        z[i] = carry as u32;
    }
    z
}

/// Multiplies `input[..len]` by `k` and adds it into `out`, with the least
/// significant word landing `offset` words above the end of `out`. Returns
/// the carry out of the top word.
pub(crate) fn mul_add(out: &mut [u32], input: &[u32], offset: usize, len: usize, k: u32) -> u32 {
    let k = u64::from(k);
    let base = out.len() - offset - len;
    let mut carry = 0u64;

    for j in (0..len).rev() {
        let idx = base + j;
        let product = u64::from(input[j]) * k + u64::from(out[idx]) + carry;
        out[idx] = product as u32;
        carry = product >> 32;
    }
    carry as u32
}

/// Adds `carry` into `a` just above a `mlen` word window at `offset`, and
/// ripples it upward. Returns 1 if the carry falls off the top of `a`.
pub(crate) fn add_one(a: &mut [u32], offset: usize, mlen: usize, carry: u32) -> u32 {
    let mut o = a.len() - 1 - mlen - offset;
    let t = u64::from(a[o]) + u64::from(carry);
    a[o] = t as u32;
    if t >> 32 == 0 {
        return 0;
    }

    for _ in 0..mlen {
        if o == 0 {
            return 1;
        }
        o -= 1;
        a[o] = a[o].wrapping_add(1);
        if a[o] != 0 {
            return 0;
        }
    }
    1
}

/// Shifts the whole array left by `n` bits, `0 < n < 32`, dropping the bits
/// shifted out of the first word.
fn primitive_left_shift(a: &mut [u32], n: u32) {
    if a.is_empty() || n == 0 {
        return;
    }
    let n2 = 32 - n;
    for i in 0..a.len() - 1 {
        a[i] = (a[i] << n) | (a[i + 1] >> n2);
    }
    let last = a.len() - 1;
    a[last] <<= n;
}

/// Square of a magnitude, `2 * x.len()` words long.
///
/// The diagonal squares are laid down first, shifted right by one bit; the
/// cross products are then accumulated once each and the whole array is
/// doubled back.
pub(crate) fn square_to_len(x: &[u32]) -> Vec<u32> {
    let len = x.len();
    let zlen = 2 * len;
    let mut z = vec![0u32; zlen];
    if len == 0 {
        return z;
    }

    let mut last_product_low_word = 0u32;
    let mut i = 0;
    for &piece in x {
        let product = u64::from(piece) * u64::from(piece);
        z[i] = (last_product_low_word << 31) | (product >> 33) as u32;
        z[i + 1] = (product >> 1) as u32;
        last_product_low_word = product as u32;
        i += 2;
    }

    let mut offset = 1;
    for i in (1..=len).rev() {
        let t = x[i - 1];
        let carry = mul_add(&mut z, x, offset, i - 1, t);
        add_one(&mut z, offset - 1, i, carry);
        offset += 2;
    }

    primitive_left_shift(&mut z, 1);
    z[zlen - 1] |= x[len - 1] & 1;
    z
}

/// Quadratic multiplication. Always correct, fastest on short operands.
pub fn multiply_schoolbook(x: &BigInt, y: &BigInt) -> BigInt {
    if x.is_zero() || y.is_zero() {
        return BigInt::zero();
    }

    let sign = x.sign.product(y.sign);
    if y.mag.len() == 1 {
        return multiply_by_word(&x.mag, y.mag[0], sign);
    }
    if x.mag.len() == 1 {
        return multiply_by_word(&y.mag, x.mag[0], sign);
    }
    BigInt::from_mag(sign, multiply_to_len(&x.mag, &y.mag))
}

/// Karatsuba multiplication: three half size products instead of four.
pub fn multiply_karatsuba(x: &BigInt, y: &BigInt) -> BigInt {
    let half = (x.mag.len().max(y.mag.len()) + 1) / 2;

    let xl = x.lower_words(half);
    let xh = x.upper_words(half);
    let yl = y.lower_words(half);
    let yh = y.upper_words(half);

    let p1 = &xh * &yh;
    let p2 = &xl * &yl;
    let p3 = (&xh + &xl) * (&yh + &yl);

    let shift = 32 * half;
    let middle = p3 - &p1 - &p2;
    let result = (((p1 << shift) + middle) << shift) + p2;

    if x.sign.product(y.sign) == Sign::Minus {
        -result
    } else {
        result
    }
}

/// Three-way Toom-Cook multiplication, evaluating at 0, 1, -1, 2 and
/// infinity.
pub fn multiply_toom_cook3(a: &BigInt, b: &BigInt) -> BigInt {
    let largest = a.mag.len().max(b.mag.len());
    let k = largest.div_ceil(3);
    let r = largest - 2 * k;

    let a2 = a.toom_slice(k, r, 0, largest);
    let a1 = a.toom_slice(k, r, 1, largest);
    let a0 = a.toom_slice(k, r, 2, largest);
    let b2 = b.toom_slice(k, r, 0, largest);
    let b1 = b.toom_slice(k, r, 1, largest);
    let b0 = b.toom_slice(k, r, 2, largest);

    let v0 = &a0 * &b0;
    let mut da1 = &a2 + &a0;
    let mut db1 = &b2 + &b0;
    let vm1 = (&da1 - &a1) * (&db1 - &b1);
    da1 += &a1;
    db1 += &b1;
    let v1 = &da1 * &db1;
    let v2 = (((da1 + &a2) << 1usize) - &a0) * (((db1 + &b2) << 1usize) - &b0);
    let vinf = &a2 * &b2;

    let result = toom_interpolate(v0, v1, v2, vm1, vinf, k);
    if a.sign.product(b.sign) == Sign::Minus {
        -result
    } else {
        result
    }
}

/// Recombines the five Toom-Cook point values into the product.
fn toom_interpolate(
    v0: BigInt,
    v1: BigInt,
    v2: BigInt,
    vm1: BigInt,
    vinf: BigInt,
    k: usize,
) -> BigInt {
    let mut t2 = (&v2 - &vm1).exact_divide_by_3();
    let mut tm1 = (&v1 - &vm1) >> 1usize;
    let mut t1 = &v1 - &v0;
    t2 = (t2 - &t1) >> 1usize;
    t1 = t1 - &tm1 - &vinf;
    t2 -= &vinf << 1usize;
    tm1 -= &t2;

    let ss = k * 32;
    let mut result = vinf << ss;
    result = (result + t2) << ss;
    result = (result + t1) << ss;
    result = (result + tm1) << ss;
    result + v0
}

/// Quadratic squaring over the magnitude.
pub fn square_schoolbook(x: &BigInt) -> BigInt {
    BigInt::from_mag(Plus, square_to_len(&x.mag))
}

/// Karatsuba squaring.
pub fn square_karatsuba(x: &BigInt) -> BigInt {
    let half = (x.mag.len() + 1) / 2;
    let xl = x.lower_words(half);
    let xh = x.upper_words(half);

    let xhs = xh.square();
    let xls = xl.square();
    let middle = (&xl + &xh).square() - (&xhs + &xls);

    let shift = half * 32;
    (((xhs << shift) + middle) << shift) + xls
}

/// Three-way Toom-Cook squaring.
pub fn square_toom_cook3(a: &BigInt) -> BigInt {
    let len = a.mag.len();
    let k = len.div_ceil(3);
    let r = len - 2 * k;

    let a2 = a.toom_slice(k, r, 0, len);
    let a1 = a.toom_slice(k, r, 1, len);
    let a0 = a.toom_slice(k, r, 2, len);

    let v0 = a0.square();
    let mut da1 = &a2 + &a0;
    let vm1 = (&da1 - &a1).square();
    da1 += &a1;
    let v1 = da1.square();
    let vinf = a2.square();
    let v2 = (((da1 + &a2) << 1usize) - &a0).square();

    toom_interpolate(v0, v1, v2, vm1, vinf, k)
}

impl Mul<&BigInt> for &BigInt {
    type Output = BigInt;

    #[inline]
    fn mul(self, other: &BigInt) -> BigInt {
        self.multiply(other)
    }
}

forward_all_binop_to_ref_ref!(impl Mul for BigInt, mul);
forward_assignop_to_binop!(impl MulAssign for BigInt, mul_assign, *);

forward_scalar_binop!(impl Mul<u32> for BigInt, mul);
forward_scalar_binop!(impl Mul<u64> for BigInt, mul);
forward_scalar_binop!(impl Mul<i32> for BigInt, mul);
forward_scalar_binop!(impl Mul<i64> for BigInt, mul);

impl CheckedMul for BigInt {
    #[inline]
    fn checked_mul(&self, v: &BigInt) -> Option<BigInt> {
        Some(self * v)
    }
}

impl<T> Product<T> for BigInt
where
    BigInt: Mul<T, Output = BigInt>,
{
    fn product<I>(iter: I) -> Self
    where
        I: Iterator<Item = T>,
    {
        iter.fold(One::one(), |acc, x| acc * x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use crate::bigrand::RandBigInt;

    fn random_pair(rng: &mut XorShiftRng, words: u64) -> (BigInt, BigInt) {
        let a = rng.gen_bigint(words * 32);
        let b = rng.gen_bigint(words * 32 - 7);
        (a, b)
    }

    #[test]
    fn test_multiply_to_len() {
        assert_eq!(
            multiply_to_len(&[u32::MAX], &[u32::MAX]),
            vec![u32::MAX - 1, 1]
        );
        assert_eq!(multiply_to_len(&[1, 0], &[2]), vec![0, 2, 0]);
    }

    #[test]
    fn test_square_to_len_matches_product() {
        let x = [0xdead_beef, 0x1234_5678, u32::MAX, 7];
        assert_eq!(square_to_len(&x), multiply_to_len(&x, &x));
    }

    #[test]
    fn test_strategies_agree() {
        let mut rng = XorShiftRng::from_seed([3u8; 16]);
        for &words in &[90u64, 150, 260, 400] {
            let (a, b) = random_pair(&mut rng, words);
            let expected = multiply_schoolbook(&a, &b);
            assert_eq!(multiply_karatsuba(&a, &b), expected);
            assert_eq!(multiply_toom_cook3(&a, &b), expected);
            assert_eq!(&a * &b, expected);

            let sq = multiply_schoolbook(&a, &a);
            assert_eq!(square_schoolbook(&a), sq);
            assert_eq!(square_karatsuba(&a), sq);
            assert_eq!(square_toom_cook3(&a), sq);
            assert_eq!(&a * &a, sq);
        }
    }

    #[test]
    fn test_exact_divide_by_3() {
        let mut rng = XorShiftRng::from_seed([9u8; 16]);
        for _ in 0..20 {
            let x = rng.gen_bigint(500);
            let tripled = &x * 3u32;
            assert_eq!(tripled.exact_divide_by_3(), x);
        }
    }

    #[test]
    fn test_product() {
        let fact: BigInt = (1..=25u32).map(BigInt::from).product();
        assert_eq!(fact.to_string(), "15511210043330985984000000");
    }

    #[test]
    fn test_multiply_signs() {
        let a = BigInt::from(-6);
        let b = BigInt::from(7);
        assert_eq!(&a * &b, BigInt::from(-42));
        assert_eq!(&a * &a, BigInt::from(36));
        assert_eq!(&a * BigInt::zero(), BigInt::zero());
        assert_eq!(a.square(), BigInt::from(36));
    }
}
