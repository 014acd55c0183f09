use core::cmp::Ordering::Less;

use num_integer::Integer;
use num_traits::{One, Zero};
use tracing::trace;

use super::Sign::{Minus, Plus};
use super::{compare_magnitude, mul_add, add_one, multiply_to_len, shift_left_mag, square_to_len};
use super::BigInt;
use crate::algorithms::xgcd;
use crate::error::ArithmeticError;
use crate::mutable::MutableBigInt;

/// Exponent bit lengths above which the sliding window grows by one bit.
const EXP_MOD_THRESHOLDS: [u64; 7] = [7, 25, 81, 241, 673, 1793, u64::MAX];

impl BigInt {
    /// Returns `self ^ exponent mod modulus`, always in `[0, modulus)`.
    ///
    /// A negative exponent computes the power of the modular inverse, which
    /// fails with [`ArithmeticError::NotInvertible`] when `self` and
    /// `modulus` share a factor.
    pub fn mod_pow(&self, exponent: &BigInt, modulus: &BigInt) -> Result<BigInt, ArithmeticError> {
        if modulus.sign != Plus {
            return Err(ArithmeticError::NonPositiveModulus);
        }

        let result = self.mod_pow_nonneg(&exponent.magnitude_value(), modulus);
        if exponent.sign == Minus {
            result.mod_inverse(modulus)
        } else {
            Ok(result)
        }
    }

    /// `mod_pow` for a non-negative exponent and a positive modulus.
    pub(crate) fn mod_pow_nonneg(&self, exponent: &BigInt, m: &BigInt) -> BigInt {
        let trivial = || {
            if m.is_one() {
                BigInt::zero()
            } else {
                BigInt::one()
            }
        };
        if exponent.is_zero() || self.is_one() {
            return trivial();
        }
        if self.is_zero() {
            return BigInt::zero();
        }
        if self.sign == Minus && self.mag == [1] && exponent.is_even() {
            return trivial();
        }

        let base = self.reduced(m);
        if m.is_odd() {
            return base.odd_mod_pow(exponent, m);
        }

        // m = m1 * 2^p with m1 odd; combine both residues by the CRT.
        let p = m.lowest_set_bit().unwrap_or(0);
        let m1 = m >> p as usize;
        let m2 = BigInt::one() << p as usize;

        let base2 = self.reduced(&m1);
        let a1 = if m1.is_one() {
            BigInt::zero()
        } else {
            base2.odd_mod_pow(exponent, &m1)
        };
        let a2 = base.mod_pow2(exponent, p);

        let y1 = inverse_coprime(&m2, &m1);
        let y2 = inverse_coprime(&m1, &m2);

        trace!(modulus_bits = m.bit_length(), two_power = p, "even modulus split");
        (a1 * &m2 * y1 + a2 * &m1 * y2).mod_positive(m)
    }

    /// Montgomery exponentiation with a sliding window. `self` must lie in
    /// `[0, m)`, `m` must be odd and `exponent` positive.
    fn odd_mod_pow(&self, exponent: &BigInt, m: &BigInt) -> BigInt {
        if exponent.is_one() {
            return self.clone();
        }

        let modulus = m.mag.as_slice();
        let mod_len = modulus.len();
        let exp = exponent.mag.as_slice();
        let ebits = exponent.bit_length();

        let mut wbits = 0;
        if ebits != 17 || exp[0] != 65537 {
            while ebits > EXP_MOD_THRESHOLDS[wbits] {
                wbits += 1;
            }
        }
        let table_len = 1usize << wbits;
        trace!(exponent_bits = ebits, window = wbits + 1, mod_len, "montgomery mod_pow");

        let inv = inverse_mod32(modulus[mod_len - 1]).wrapping_neg();

        // Base in Montgomery form: base * 2^(32 * mod_len) mod m.
        let shifted = MutableBigInt::from_vec(shift_left_mag(&self.mag, mod_len * 32));
        let (_, r) = shifted.divide(&MutableBigInt::from_words(modulus));

        // table[i] holds base^(2i + 1).
        let mut table = Vec::with_capacity(table_len);
        table.push(pad_words(r.words(), mod_len));
        let base_squared = montgomery_square(&table[0], modulus, inv);
        for i in 1..table_len {
            let next = montgomery_multiply(&base_squared, &table[i - 1], modulus, inv);
            table.push(next);
        }

        let bit = |i: u64| -> u32 {
            let word = exp[exp.len() - 1 - (i / 32) as usize];
            (word >> (i % 32)) & 1
        };

        let mut acc: Option<Vec<u32>> = None;
        let mut i = ebits as i64 - 1;
        while i >= 0 {
            if bit(i as u64) == 0 {
                if let Some(a) = acc.as_mut() {
                    *a = montgomery_square(a, modulus, inv);
                }
                i -= 1;
                continue;
            }

            // The longest window of at most wbits + 1 bits that ends in a one.
            let mut j = (i - wbits as i64).max(0);
            while bit(j as u64) == 0 {
                j += 1;
            }
            let mut window = 0usize;
            for l in (j..=i).rev() {
                window = (window << 1) | bit(l as u64) as usize;
            }

            let mult = &table[window >> 1];
            acc = Some(match acc.take() {
                None => mult.clone(),
                Some(mut a) => {
                    for _ in j..=i {
                        a = montgomery_square(&a, modulus, inv);
                    }
                    montgomery_multiply(&a, mult, modulus, inv)
                }
            });
            i = j - 1;
        }

        // Leave Montgomery form.
        let mut wide = vec![0u32; mod_len];
        wide.extend_from_slice(acc.as_deref().unwrap_or(table[0].as_slice()));
        BigInt::from_mag(Plus, mont_reduce(wide, modulus, inv))
    }

    /// `self ^ exponent mod 2^p` for a non-negative `self`.
    fn mod_pow2(&self, exponent: &BigInt, p: u64) -> BigInt {
        let mut result = BigInt::one();
        let mut base_to_pow2 = self.mod2(p);
        let mut limit = exponent.bit_length();

        // Odd units mod 2^p have order dividing 2^(p - 1).
        if self.is_odd() {
            limit = limit.min(p.saturating_sub(1));
        }

        let mut exp_offset = 0;
        while exp_offset < limit {
            if exponent.test_bit(exp_offset) {
                result = (&result * &base_to_pow2).mod2(p);
            }
            exp_offset += 1;
            if exp_offset < limit {
                base_to_pow2 = base_to_pow2.square().mod2(p);
            }
        }
        result
    }

    /// The low `p` bits of a non-negative value.
    fn mod2(&self, p: u64) -> BigInt {
        if self.bit_length() <= p {
            return self.clone();
        }

        let num_words = p.div_ceil(32) as usize;
        let mut mag = self.mag[self.mag.len() - num_words..].to_vec();
        let excess_bits = (num_words as u64 * 32) - p;
        mag[0] &= u32::MAX >> excess_bits;
        BigInt::from_mag(Plus, mag)
    }

    /// Returns `self^-1 mod m`.
    pub fn mod_inverse(&self, m: &BigInt) -> Result<BigInt, ArithmeticError> {
        if m.sign != Plus {
            return Err(ArithmeticError::NonPositiveModulus);
        }
        if m.is_one() {
            return Ok(BigInt::zero());
        }

        let value = self.reduced(m);
        if value.is_one() {
            return Ok(value);
        }

        let (gcd, x, _) = xgcd(&value, m, true);
        if !gcd.is_one() {
            return Err(ArithmeticError::NotInvertible);
        }
        Ok(x.unwrap_or_default().mod_positive(m))
    }
}

/// Inverse of `a` modulo `m` where the two are known to be coprime.
fn inverse_coprime(a: &BigInt, m: &BigInt) -> BigInt {
    let (_, x, _) = xgcd(a, m, true);
    x.unwrap_or_default().mod_positive(m)
}

fn pad_words(words: &[u32], len: usize) -> Vec<u32> {
    let mut out = vec![0u32; len - words.len()];
    out.extend_from_slice(words);
    out
}

/// Inverse of an odd `val` modulo 2^32, by Newton iteration.
pub(crate) fn inverse_mod32(val: u32) -> u32 {
    let mut t = val;
    for _ in 0..4 {
        t = t.wrapping_mul(2u32.wrapping_sub(val.wrapping_mul(t)));
    }
    t
}

fn montgomery_multiply(a: &[u32], b: &[u32], modulus: &[u32], inv: u32) -> Vec<u32> {
    mont_reduce(multiply_to_len(a, b), modulus, inv)
}

fn montgomery_square(a: &[u32], modulus: &[u32], inv: u32) -> Vec<u32> {
    mont_reduce(square_to_len(a), modulus, inv)
}

/// Montgomery reduction of a `2 * mlen` word value. Returns `mlen` words.
fn mont_reduce(mut n: Vec<u32>, modulus: &[u32], inv: u32) -> Vec<u32> {
    let mlen = modulus.len();
    let mut c: i32 = 0;

    for offset in 0..mlen {
        let n_end = n[n.len() - 1 - offset];
        let carry = mul_add(&mut n, modulus, offset, mlen, inv.wrapping_mul(n_end));
        c += add_one(&mut n, offset, mlen, carry) as i32;
    }

    while c > 0 {
        c += sub_n(&mut n, modulus, mlen);
    }
    while compare_magnitude(&n[..mlen], modulus) != Less {
        sub_n(&mut n, modulus, mlen);
    }

    n.truncate(mlen);
    n
}

/// Subtracts `b` from the first `len` words of `a` in place. Returns -1 on
/// a borrow out of the top word, 0 otherwise.
fn sub_n(a: &mut [u32], b: &[u32], len: usize) -> i32 {
    let mut borrow = 0i64;
    for i in (0..len).rev() {
        let diff = i64::from(a[i]) - i64::from(b[i]) + borrow;
        a[i] = diff as u32;
        borrow = diff >> 32;
    }
    borrow as i32
}
