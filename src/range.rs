//! Iteration over consecutive integers.

use core::iter::FusedIterator;

use num_traits::One;

use crate::bigint::BigInt;

/// An iterator over `start..=end`, stepping by one.
///
/// Created by [`BigInt::range_inclusive`].
#[derive(Clone, Debug)]
pub struct BigIntRange {
    current: BigInt,
    end: BigInt,
}

impl BigInt {
    /// Every integer from `start` up to and including `end`. Empty when
    /// `start > end`.
    pub fn range_inclusive(start: BigInt, end: BigInt) -> BigIntRange {
        BigIntRange {
            current: start,
            end,
        }
    }
}

impl BigIntRange {
    /// The next value the iterator would yield.
    pub fn start(&self) -> &BigInt {
        &self.current
    }

    /// The inclusive upper bound.
    pub fn end(&self) -> &BigInt {
        &self.end
    }

    /// Whether `value` lies within the remaining range.
    pub fn contains(&self, value: &BigInt) -> bool {
        self.current <= *value && *value <= self.end
    }
}

impl Iterator for BigIntRange {
    type Item = BigInt;

    fn next(&mut self) -> Option<BigInt> {
        if self.current > self.end {
            return None;
        }
        let next = &self.current + BigInt::one();
        Some(core::mem::replace(&mut self.current, next))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        use num_traits::ToPrimitive;

        if self.current > self.end {
            return (0, Some(0));
        }
        match (&self.end - &self.current + 1u32).to_usize() {
            Some(n) => (n, Some(n)),
            None => (usize::MAX, None),
        }
    }
}

impl FusedIterator for BigIntRange {}
