use num_traits::{One, Pow, Zero};

use super::BigInt;
use super::Sign::{Minus, Plus};
use crate::error::ArithmeticError;
use crate::mutable::MutableBigInt;

impl BigInt {
    /// Returns `self ^ exponent`.
    pub fn pow(&self, exponent: u32) -> BigInt {
        if exponent == 0 {
            return BigInt::one();
        }
        if self.is_zero() {
            return BigInt::zero();
        }

        let mut part_to_square = self.abs_magnitude();

        // Factor out powers of two from the base, shift them back in at the
        // end.
        let powers_of_two = part_to_square.lowest_set_bit().unwrap_or(0);
        let bits_to_shift = powers_of_two * u64::from(exponent);
        if powers_of_two > 0 {
            part_to_square = &part_to_square >> powers_of_two as usize;
        }

        let remaining_bits = part_to_square.bit_length();
        if remaining_bits == 1 {
            // Nothing but a power of two.
            let result = BigInt::one() << bits_to_shift as usize;
            return self.apply_pow_sign(result, exponent);
        }

        let scale_factor = remaining_bits * u64::from(exponent);
        if part_to_square.mag.len() == 1 && scale_factor <= 62 {
            let mut result: u64 = 1;
            let mut base_to_pow2 = u64::from(part_to_square.mag[0]);
            let mut working_exponent = exponent;
            while working_exponent != 0 {
                if working_exponent & 1 == 1 {
                    result *= base_to_pow2;
                }
                working_exponent >>= 1;
                if working_exponent != 0 {
                    base_to_pow2 *= base_to_pow2;
                }
            }

            let result = BigInt::from(result) << bits_to_shift as usize;
            return self.apply_pow_sign(result, exponent);
        }

        let mut answer = BigInt::one();
        let mut working_exponent = exponent;
        while working_exponent != 0 {
            if working_exponent & 1 == 1 {
                answer = &answer * &part_to_square;
            }
            working_exponent >>= 1;
            if working_exponent != 0 {
                part_to_square = part_to_square.square();
            }
        }

        if bits_to_shift > 0 {
            answer = answer << bits_to_shift as usize;
        }
        self.apply_pow_sign(answer, exponent)
    }

    fn abs_magnitude(&self) -> BigInt {
        BigInt::from_mag(Plus, self.mag.clone())
    }

    fn apply_pow_sign(&self, magnitude: BigInt, exponent: u32) -> BigInt {
        if self.sign == Minus && exponent & 1 == 1 {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Floor of the square root.
    pub fn sqrt(&self) -> Result<BigInt, ArithmeticError> {
        if self.sign == Minus {
            return Err(ArithmeticError::NegativeSqrt);
        }
        Ok(MutableBigInt::from_words(&self.mag).sqrt().into_bigint(Plus))
    }

    /// Floor of the square root and `self - root^2`.
    pub fn sqrt_and_remainder(&self) -> Result<(BigInt, BigInt), ArithmeticError> {
        let s = self.sqrt()?;
        let r = self - s.square();
        Ok((s, r))
    }
}

impl Pow<u32> for &BigInt {
    type Output = BigInt;

    #[inline]
    fn pow(self, exponent: u32) -> BigInt {
        BigInt::pow(self, exponent)
    }
}

impl Pow<u32> for BigInt {
    type Output = BigInt;

    #[inline]
    fn pow(self, exponent: u32) -> BigInt {
        BigInt::pow(&self, exponent)
    }
}
