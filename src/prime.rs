//! Probabilistic primality testing and prime generation.

use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use rand::Rng;
use tracing::trace;

use crate::algorithms::jacobi;
use crate::bigint::BigInt;
use crate::bigint::Sign::Plus;
use crate::bigrand::RandBigInt;
use crate::error::ArithmeticError;
use crate::sieve::BitSieve;

/// Bit lengths below this use the direct small prime generator.
pub(crate) const SMALL_PRIME_THRESHOLD: u64 = 95;

/// Certainty used when none is given.
pub const DEFAULT_PRIME_CERTAINTY: i32 = 100;

/// The product of the odd primes from 3 through 41.
const SMALL_PRIME_PRODUCT: u64 = 3 * 5 * 7 * 11 * 13 * 17 * 19 * 23 * 29 * 31 * 37 * 41;

const SMALL_PRIMES: [u64; 12] = [3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41];

/// True when the residue modulo `SMALL_PRIME_PRODUCT` shows a small factor.
fn has_small_factor(n: &BigInt) -> bool {
    let r = n
        .mod_positive(&BigInt::from(SMALL_PRIME_PRODUCT))
        .to_u64()
        .unwrap_or(0);
    SMALL_PRIMES.iter().any(|p| r % p == 0)
}

/// Odd candidates sieved per search window for a value of this size.
fn prime_search_len(bit_length: u64) -> usize {
    (bit_length / 20 * 64) as usize
}

impl BigInt {
    /// Returns `true` if `self` is probably prime, with a probability of a
    /// false positive below `2^-certainty`. A non-positive certainty always
    /// answers `true`. Signs are ignored.
    pub fn is_probable_prime(&self, certainty: i32) -> bool {
        self.is_probable_prime_with_rng(certainty, &mut rand::rng())
    }

    /// [`is_probable_prime`](BigInt::is_probable_prime) drawing Miller-Rabin
    /// bases from the given generator.
    pub fn is_probable_prime_with_rng<R: Rng + ?Sized>(&self, certainty: i32, rng: &mut R) -> bool {
        if certainty <= 0 {
            return true;
        }
        let w = self.abs();
        if w.mag() == [2] {
            return true;
        }
        if w.is_even() || w.is_one() {
            return false;
        }
        w.prime_to_certainty(certainty, rng)
    }

    /// Primality test for an odd value greater than two.
    pub(crate) fn prime_to_certainty<R: Rng + ?Sized>(&self, certainty: i32, rng: &mut R) -> bool {
        let n = (certainty.min(i32::MAX - 1) + 1) / 2;
        let size_in_bits = self.bit_length();

        if size_in_bits < 100 {
            return self.passes_miller_rabin(n.min(50), rng);
        }

        let rounds = match size_in_bits {
            0..256 => 27,
            256..512 => 15,
            512..768 => 8,
            768..1024 => 4,
            _ => 2,
        };
        self.passes_miller_rabin(n.min(rounds), rng) && self.passes_lucas_lehmer()
    }

    /// Miller-Rabin with random bases in `(1, self)`.
    fn passes_miller_rabin<R: Rng + ?Sized>(&self, iterations: i32, rng: &mut R) -> bool {
        let this_minus_one = self - 1u32;
        let a = this_minus_one.lowest_set_bit().unwrap_or(0);
        let m = &this_minus_one >> a as usize;
        let bits = self.bit_length();

        for _ in 0..iterations {
            let b = loop {
                let b = rng.gen_bigint_bits(bits);
                if b > BigInt::one() && b < *self {
                    break b;
                }
            };

            let mut j = 0;
            let mut z = b.mod_pow_nonneg(&m, self);
            while !((j == 0 && z.is_one()) || z == this_minus_one) {
                if j > 0 && z.is_one() {
                    return false;
                }
                j += 1;
                if j == a {
                    return false;
                }
                z = z.square().mod_positive(self);
            }
        }
        true
    }

    /// The strong Lucas probable prime test with Selfridge's parameters.
    fn passes_lucas_lehmer(&self) -> bool {
        // No d with (d / n) = -1 exists for a perfect square.
        if let Ok(root) = self.sqrt()
            && root.square() == *self
        {
            return false;
        }

        let this_plus_one = self + 1u32;
        let mut d: i64 = 5;
        while jacobi(d, self) != -1 {
            d = if d < 0 { d.abs() + 2 } else { -(d + 2) };
        }

        let u = lucas_lehmer_sequence(d, &this_plus_one, self);
        u.mod_positive(self).is_zero()
    }

    /// The smallest probable prime greater than `self`.
    pub fn next_probable_prime(&self) -> Result<BigInt, ArithmeticError> {
        if self.is_negative() {
            return Err(ArithmeticError::NegativeValue);
        }
        if self.is_zero() || self.is_one() {
            return Ok(BigInt::two());
        }

        let mut rng = rand::rng();
        let mut result = self + 1u32;

        if result.bit_length() < SMALL_PRIME_THRESHOLD {
            if result.is_even() {
                result += 1u32;
            }
            loop {
                if result.bit_length() > 6 && has_small_factor(&result) {
                    result += 2u32;
                    continue;
                }
                if result.bit_length() < 4 {
                    return Ok(result);
                }
                if result.prime_to_certainty(DEFAULT_PRIME_CERTAINTY, &mut rng) {
                    return Ok(result);
                }
                result += 2u32;
            }
        }

        if result.is_odd() {
            result -= 1u32;
        }
        let search_len = prime_search_len(result.bit_length());
        loop {
            trace!(bits = result.bit_length(), search_len, "sieving for next prime");
            let sieve = BitSieve::new(&result, search_len);
            if let Some(candidate) = sieve.retrieve(&result, DEFAULT_PRIME_CERTAINTY, &mut rng) {
                return Ok(candidate);
            }
            result += BigInt::from(2 * search_len as u64);
        }
    }

    /// A random probable prime of exactly `bit_length` bits, prime with
    /// certainty [`DEFAULT_PRIME_CERTAINTY`].
    pub fn probable_prime<R: Rng + ?Sized>(
        bit_length: u64,
        rng: &mut R,
    ) -> Result<BigInt, ArithmeticError> {
        Self::probable_prime_with_certainty(bit_length, DEFAULT_PRIME_CERTAINTY, rng)
    }

    /// A random probable prime of exactly `bit_length` bits.
    pub fn probable_prime_with_certainty<R: Rng + ?Sized>(
        bit_length: u64,
        certainty: i32,
        rng: &mut R,
    ) -> Result<BigInt, ArithmeticError> {
        if bit_length < 2 {
            return Err(ArithmeticError::BitLengthTooSmall);
        }
        Ok(if bit_length < SMALL_PRIME_THRESHOLD {
            small_prime(bit_length, certainty, rng)
        } else {
            large_prime(bit_length, certainty, rng)
        })
    }
}

/// Draws full-length odd candidates directly until one passes.
fn small_prime<R: Rng + ?Sized>(bit_length: u64, certainty: i32, rng: &mut R) -> BigInt {
    let mag_len = bit_length.div_ceil(32) as usize;
    let high_bit = 1u32 << ((bit_length - 1) % 32);
    let high_mask = (high_bit << 1).wrapping_sub(1);
    let mut words = vec![0u32; mag_len];

    loop {
        rng.fill(words.as_mut_slice());
        words[0] = (words[0] & high_mask) | high_bit;
        if bit_length > 2 {
            words[mag_len - 1] |= 1;
        }

        let p = BigInt::from_mag(Plus, words.clone());
        if bit_length > 6 && has_small_factor(&p) {
            continue;
        }
        if bit_length < 4 {
            return p;
        }
        if p.prime_to_certainty(certainty, rng) {
            return p;
        }
    }
}

/// A random even starting point with the top bit set.
fn large_prime_base<R: Rng + ?Sized>(bit_length: u64, rng: &mut R) -> BigInt {
    rng.gen_bigint_bits(bit_length)
        .set_bit(bit_length - 1)
        .clear_bit(0)
}

/// Sieves windows above a random even base until a candidate of the right
/// length survives.
fn large_prime<R: Rng + ?Sized>(bit_length: u64, certainty: i32, rng: &mut R) -> BigInt {
    let search_len = prime_search_len(bit_length);
    let mut p = large_prime_base(bit_length, rng);

    loop {
        let sieve = BitSieve::new(&p, search_len);
        if let Some(candidate) = sieve.retrieve(&p, certainty, rng)
            && candidate.bit_length() == bit_length
        {
            return candidate;
        }

        p += BigInt::from(2 * search_len as u64);
        if p.bit_length() != bit_length {
            p = large_prime_base(bit_length, rng);
        }
        trace!(bits = bit_length, "prime search window exhausted");
    }
}

/// The Lucas sequence `U_k mod n` for `P = 1`, `Q = (1 - d) / 4`.
fn lucas_lehmer_sequence(d: i64, k: &BigInt, n: &BigInt) -> BigInt {
    let d = BigInt::from(d);
    let mut u = BigInt::one();
    let mut v = BigInt::one();

    let halve_mod = |x: BigInt| -> BigInt {
        let x = if x.is_odd() { x - n } else { x };
        x >> 1usize
    };

    for i in (0..k.bit_length().saturating_sub(1)).rev() {
        let u2 = (&u * &v).mod_positive(n);
        let v2 = halve_mod((v.square() + &d * u.square()).mod_positive(n));
        u = u2;
        v = v2;

        if k.test_bit(i) {
            let u2 = halve_mod((&u + &v).mod_positive(n));
            let v2 = halve_mod((&v + &d * &u).mod_positive(n));
            u = u2;
            v = v2;
        }
    }
    u
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn sieve_of_eratosthenes(limit: usize) -> Vec<bool> {
        let mut is_prime = vec![true; limit];
        is_prime[0] = false;
        is_prime[1] = false;
        let mut i = 2;
        while i * i < limit {
            if is_prime[i] {
                let mut j = i * i;
                while j < limit {
                    is_prime[j] = false;
                    j += i;
                }
            }
            i += 1;
        }
        is_prime
    }

    #[test]
    fn test_small_values() {
        let table = sieve_of_eratosthenes(2000);
        let mut rng = XorShiftRng::from_seed([4u8; 16]);
        for (n, &expected) in table.iter().enumerate() {
            let v = BigInt::from(n as u64);
            assert_eq!(v.is_probable_prime_with_rng(50, &mut rng), expected, "{}", n);
            assert_eq!((-v).is_probable_prime_with_rng(50, &mut rng), expected, "-{}", n);
        }
    }

    #[test]
    fn test_certainty_zero_is_always_true() {
        assert!(BigInt::from(15).is_probable_prime(0));
        assert!(BigInt::from(15).is_probable_prime(-3));
    }

    #[test]
    fn test_large_primes_and_composites() {
        let mersenne_127 = (BigInt::one() << 127usize) - 1u32;
        assert!(mersenne_127.is_probable_prime(100));

        let mersenne_128 = (BigInt::one() << 128usize) - 1u32;
        assert!(!mersenne_128.is_probable_prime(100));

        // A Carmichael number fools Fermat but not Miller-Rabin.
        assert!(!BigInt::from(561).is_probable_prime(100));

        let p = BigInt::from_str("170141183460469231731687303715884105727").unwrap();
        let q = BigInt::from_str("618970019642690137449562111").unwrap();
        assert!(!(&p * &q).is_probable_prime(100));
        assert!(!(&p * &p).is_probable_prime(100));
    }

    #[test]
    fn test_lucas_lehmer_on_known_values() {
        let p = (BigInt::one() << 107usize) - 1u32;
        assert!(p.passes_lucas_lehmer());
        let c = &p * BigInt::from(1_000_003);
        assert!(!c.passes_lucas_lehmer());
    }

    #[test]
    fn test_next_probable_prime() {
        let cases = [(0, 2), (1, 2), (2, 3), (3, 5), (13, 17), (89, 97), (1000, 1009)];
        for (n, p) in cases {
            assert_eq!(BigInt::from(n).next_probable_prime(), Ok(BigInt::from(p)));
        }
        assert_eq!(
            BigInt::from(-1).next_probable_prime(),
            Err(ArithmeticError::NegativeValue)
        );

        // 2^127 - 1 is prime, so the search from just below it lands on it.
        let m127 = (BigInt::one() << 127usize) - 1u32;
        assert_eq!((&m127 - 2u32).next_probable_prime(), Ok(m127));
    }

    #[test]
    fn test_probable_prime_lengths() {
        let mut rng = XorShiftRng::from_seed([11u8; 16]);
        for bits in [2u64, 3, 5, 31, 32, 33, 94, 95, 160] {
            let p = BigInt::probable_prime(bits, &mut rng).unwrap();
            assert_eq!(p.bit_length(), bits);
            assert!(p.is_probable_prime_with_rng(50, &mut rng));
        }
        assert_eq!(
            BigInt::probable_prime(1, &mut rng),
            Err(ArithmeticError::BitLengthTooSmall)
        );
    }
}
