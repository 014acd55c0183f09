//! A bit sieve of odd candidates used to speed up prime searches.

use std::sync::LazyLock;

use rand::Rng;

use crate::bigint::BigInt;
use crate::mutable::MutableBigInt;

/// Bits in the small sieve. Bit `i` stands for the odd number `2i + 1`.
const SMALL_SIEVE_LEN: usize = 150 * 64;

/// Odd numbers below `2 * SMALL_SIEVE_LEN`, with the composites set.
static SMALL_SIEVE: LazyLock<BitSieve> = LazyLock::new(BitSieve::small);

/// A set bit marks a composite candidate.
#[derive(Clone, Debug)]
pub(crate) struct BitSieve {
    bits: Vec<u64>,
    length: usize,
}

impl BitSieve {
    fn with_len(length: usize) -> Self {
        BitSieve {
            bits: vec![0; unit_index(length.saturating_sub(1)) + 1],
            length,
        }
    }

    fn small() -> Self {
        let mut sieve = BitSieve::with_len(SMALL_SIEVE_LEN);
        // 1 is not prime
        sieve.set(0);

        let mut next_index = 1;
        let mut next_prime = 3;
        loop {
            sieve.sieve_single(SMALL_SIEVE_LEN, next_index + next_prime, next_prime);
            match sieve.sieve_search(SMALL_SIEVE_LEN, next_index + 1) {
                Some(index) => {
                    next_index = index;
                    next_prime = 2 * index + 1;
                }
                None => break,
            }
            if next_prime >= SMALL_SIEVE_LEN {
                break;
            }
        }
        sieve
    }

    /// Sieves `search_len` odd candidates `base + 1, base + 3, ...` against
    /// every prime in the small sieve. `base` must be even.
    pub(crate) fn new(base: &BigInt, search_len: usize) -> Self {
        let mut sieve = BitSieve::with_len(search_len);
        let small = &*SMALL_SIEVE;
        let b = MutableBigInt::from_words(base.mag());

        let mut step = small.sieve_search(small.length, 0);
        while let Some(s) = step {
            let converted_step = 2 * s + 1;
            let (_, rem) = b.divide_one_word(converted_step as u32);
            let mut start = converted_step - rem as usize;
            if start % 2 == 0 {
                start += converted_step;
            }
            sieve.sieve_single(search_len, (start - 1) / 2, converted_step);
            step = small.sieve_search(small.length, s + 1);
        }
        sieve
    }

    #[inline]
    fn get(&self, bit_index: usize) -> bool {
        self.bits[unit_index(bit_index)] & bit(bit_index) != 0
    }

    #[inline]
    fn set(&mut self, bit_index: usize) {
        self.bits[unit_index(bit_index)] |= bit(bit_index);
    }

    /// The first clear bit at or after `start`, stopping short of
    /// `limit - 1`.
    fn sieve_search(&self, limit: usize, start: usize) -> Option<usize> {
        if start >= limit {
            return None;
        }
        let mut index = start;
        loop {
            if !self.get(index) {
                return Some(index);
            }
            index += 1;
            if index >= limit - 1 {
                return None;
            }
        }
    }

    /// Marks every `step`th bit from `start` up to `limit`.
    fn sieve_single(&mut self, limit: usize, mut start: usize, step: usize) {
        while start < limit {
            self.set(start);
            start += step;
        }
    }

    /// The first surviving candidate above `init` that passes the
    /// probabilistic primality tests.
    pub(crate) fn retrieve<R: Rng + ?Sized>(
        &self,
        init: &BigInt,
        certainty: i32,
        rng: &mut R,
    ) -> Option<BigInt> {
        let mut offset = 1u64;
        for &unit in &self.bits {
            let mut next = !unit;
            for _ in 0..64 {
                if next & 1 == 1 {
                    let candidate = init + BigInt::from(offset);
                    if candidate.prime_to_certainty(certainty, rng) {
                        return Some(candidate);
                    }
                }
                next >>= 1;
                offset += 2;
            }
        }
        None
    }
}

#[inline]
fn unit_index(bit_index: usize) -> usize {
    bit_index >> 6
}

#[inline]
fn bit(bit_index: usize) -> u64 {
    1 << (bit_index & 63)
}
