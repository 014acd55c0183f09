//! Randomization of big integers

use rand::distr::uniform::{Error, SampleBorrow, SampleUniform, UniformSampler};
use rand::prelude::*;

use crate::bigint::BigInt;
use crate::bigint::Sign::{self, Minus, NoSign, Plus};
use crate::error::ArithmeticError;

use num_traits::{Signed, Zero};

/// A trait for sampling random big integers.
pub trait RandBigInt {
    /// Generate a uniformly distributed non-negative [`BigInt`] in
    /// `[0, 2^bit_size)`.
    fn gen_bigint_bits(&mut self, bit_size: u64) -> BigInt;

    /// Generate a random [`BigInt`] of the given bit size with a random sign.
    fn gen_bigint(&mut self, bit_size: u64) -> BigInt;

    /// Generate a random non-negative [`BigInt`] less than the given bound.
    /// Panics when the bound is not positive.
    fn gen_bigint_below(&mut self, bound: &BigInt) -> BigInt;

    /// Generate a random [`BigInt`] within the given range. The lower
    /// bound is inclusive; the upper bound is exclusive. Panics when
    /// the upper bound is not greater than the lower bound.
    fn gen_bigint_range(&mut self, lbound: &BigInt, ubound: &BigInt) -> BigInt;
}

fn gen_bits<R: Rng + ?Sized>(rng: &mut R, data: &mut [u32], rem: u64) {
    // `fill` is faster than many `random::<u32>` calls
    rng.fill(data);
    if rem > 0 {
        data[0] >>= 32 - rem;
    }
}

fn random_magnitude<R: Rng + ?Sized>(rng: &mut R, bit_size: u64, sign: Sign) -> BigInt {
    let len = usize::try_from(bit_size.div_ceil(32)).unwrap_or(usize::MAX);
    let mut data = vec![0u32; len];
    gen_bits(rng, &mut data, bit_size % 32);
    BigInt::from_mag(sign, data)
}

impl<R: Rng + ?Sized> RandBigInt for R {
    fn gen_bigint_bits(&mut self, bit_size: u64) -> BigInt {
        random_magnitude(self, bit_size, Plus)
    }

    fn gen_bigint(&mut self, bit_size: u64) -> BigInt {
        loop {
            let magnitude = self.gen_bigint_bits(bit_size);
            // Zero has one representation but two signs to land on, so
            // retry half the time to keep it as likely as any other value.
            let sign = if magnitude.is_zero() {
                if self.random() {
                    continue;
                } else {
                    NoSign
                }
            } else if self.random() {
                Plus
            } else {
                Minus
            };
            return BigInt::from_mag(sign, magnitude.mag().to_vec());
        }
    }

    fn gen_bigint_below(&mut self, bound: &BigInt) -> BigInt {
        assert!(bound.is_positive());
        let bits = bound.bit_length();
        loop {
            let n = self.gen_bigint_bits(bits);
            if n < *bound {
                return n;
            }
        }
    }

    fn gen_bigint_range(&mut self, lbound: &BigInt, ubound: &BigInt) -> BigInt {
        assert!(*lbound < *ubound);
        if lbound.is_zero() {
            self.gen_bigint_below(ubound)
        } else {
            lbound + self.gen_bigint_below(&(ubound - lbound))
        }
    }
}

/// The back-end implementing rand's [`UniformSampler`] for [`BigInt`].
#[derive(Clone, Debug)]
pub struct UniformBigInt {
    base: BigInt,
    len: BigInt,
}

impl UniformSampler for UniformBigInt {
    type X = BigInt;

    #[inline]
    fn new<B1, B2>(low_b: B1, high_b: B2) -> Result<Self, Error>
    where
        B1: SampleBorrow<Self::X> + Sized,
        B2: SampleBorrow<Self::X> + Sized,
    {
        let low = low_b.borrow();
        let high = high_b.borrow();
        if low >= high {
            return Err(Error::EmptyRange);
        }
        Ok(UniformBigInt {
            len: high - low,
            base: low.clone(),
        })
    }

    #[inline]
    fn new_inclusive<B1, B2>(low_b: B1, high_b: B2) -> Result<Self, Error>
    where
        B1: SampleBorrow<Self::X> + Sized,
        B2: SampleBorrow<Self::X> + Sized,
    {
        let low = low_b.borrow();
        let high = high_b.borrow();
        if low > high {
            return Err(Error::EmptyRange);
        }
        Self::new(low, high + 1u32)
    }

    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::X {
        &self.base + rng.gen_bigint_below(&self.len)
    }

    #[inline]
    fn sample_single<R: Rng + ?Sized, B1, B2>(
        low: B1,
        high: B2,
        rng: &mut R,
    ) -> Result<Self::X, Error>
    where
        B1: SampleBorrow<Self::X> + Sized,
        B2: SampleBorrow<Self::X> + Sized,
    {
        let low = low.borrow();
        let high = high.borrow();
        if low >= high {
            return Err(Error::EmptyRange);
        }
        Ok(rng.gen_bigint_range(low, high))
    }
}

impl SampleUniform for BigInt {
    type Sampler = UniformBigInt;
}

/// A random distribution for non-negative [`BigInt`] values of a particular
/// bit size.
#[derive(Clone, Copy, Debug)]
pub struct RandomBits {
    bits: u64,
}

impl RandomBits {
    #[inline]
    pub fn new(bits: u64) -> RandomBits {
        RandomBits { bits }
    }
}

impl Distribution<BigInt> for RandomBits {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BigInt {
        rng.gen_bigint_bits(self.bits)
    }
}

/// A generic trait for generating random primes.
///
/// *Warning*: This is highly dependent on the provided random number generator,
/// to provide actually random primes.
///
/// # Example
/// ```
/// use num_bigmath::RandPrime;
///
/// let mut rng = rand::rng();
/// let p = rng.gen_prime(256).unwrap();
/// assert_eq!(p.bit_length(), 256);
/// ```
pub trait RandPrime {
    /// Generate a random probable prime with exactly `bits` bits.
    fn gen_prime(&mut self, bits: u64) -> Result<BigInt, ArithmeticError>;
}

impl<R: Rng + ?Sized> RandPrime for R {
    fn gen_prime(&mut self, bits: u64) -> Result<BigInt, ArithmeticError> {
        BigInt::probable_prime(bits, self)
    }
}
