use num_traits::Signed;

use crate::algorithms::xgcd;
use crate::bigint::BigInt;
use crate::error::ArithmeticError;

/// Generic trait for modular multiplicative inverse.
///
/// Computes the [modular multiplicative inverse](https://en.wikipedia.org/wiki/Modular_multiplicative_inverse)
/// of an integer *a* modulo *m*.
///
/// Fails with [`ArithmeticError::NotInvertible`] if the inverse does not
/// exist (i.e., `gcd(a, m) != 1`), and with
/// [`ArithmeticError::NonPositiveModulus`] unless `m > 0`.
pub trait ModInverse<R: Sized>: Sized {
    /// The output type of the modular inverse.
    type Output: Sized;

    /// Returns the modular inverse of `self` modulo `m`.
    fn mod_inverse(self, m: R) -> Result<Self::Output, ArithmeticError>;
}

/// Generic trait for the extended Euclidean algorithm.
///
/// Computes the [extended GCD](https://en.wikipedia.org/wiki/Extended_Euclidean_algorithm),
/// returning `(gcd, x, y)` such that `self * x + other * y = gcd`.
pub trait ExtendedGcd<R: Sized>: Sized {
    /// Returns `(gcd, x, y)` such that `self * x + other * y = gcd`.
    fn extended_gcd(self, other: R) -> (BigInt, BigInt, BigInt);
}

impl ModInverse<&BigInt> for &BigInt {
    type Output = BigInt;

    fn mod_inverse(self, m: &BigInt) -> Result<BigInt, ArithmeticError> {
        BigInt::mod_inverse(self, m)
    }
}

impl ModInverse<&BigInt> for BigInt {
    type Output = BigInt;

    fn mod_inverse(self, m: &BigInt) -> Result<BigInt, ArithmeticError> {
        BigInt::mod_inverse(&self, m)
    }
}

impl ModInverse<BigInt> for BigInt {
    type Output = BigInt;

    fn mod_inverse(self, m: BigInt) -> Result<BigInt, ArithmeticError> {
        BigInt::mod_inverse(&self, &m)
    }
}

impl ExtendedGcd<&BigInt> for &BigInt {
    fn extended_gcd(self, other: &BigInt) -> (BigInt, BigInt, BigInt) {
        let (gcd, x, y) = xgcd(self, other, true);
        (gcd, x.unwrap_or_default(), y.unwrap_or_default())
    }
}

impl ExtendedGcd<&BigInt> for BigInt {
    fn extended_gcd(self, other: &BigInt) -> (BigInt, BigInt, BigInt) {
        ExtendedGcd::extended_gcd(&self, other)
    }
}

impl ExtendedGcd<BigInt> for BigInt {
    fn extended_gcd(self, other: BigInt) -> (BigInt, BigInt, BigInt) {
        ExtendedGcd::extended_gcd(&self, &other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    #[test]
    fn test_mod_inverse_trait() {
        let m = BigInt::from(97);
        let inv = BigInt::from(-5).mod_inverse(&m).unwrap();
        assert!(!inv.is_negative());
        assert_eq!((BigInt::from(-5) * inv).modulo(&m), Ok(BigInt::one()));
        assert_eq!(
            BigInt::from(10).mod_inverse(BigInt::from(15)),
            Err(ArithmeticError::NotInvertible)
        );
    }

    #[test]
    fn test_extended_gcd_trait() {
        let a = BigInt::from(240);
        let b = BigInt::from(46);
        let (g, x, y) = ExtendedGcd::extended_gcd(&a, &b);
        assert_eq!(g, BigInt::from(2));
        assert_eq!(&a * &x + &b * &y, g);
    }

    #[test]
    fn test_extended_gcd_with_integer_in_scope() {
        use num_integer::Integer;

        let a = BigInt::from(-84);
        let b = BigInt::from(36);
        let (g, x, y) = ExtendedGcd::extended_gcd(&a, &b);
        assert_eq!(g, Integer::gcd(&a, &b));
        assert_eq!(&a * &x + &b * &y, g);
    }
}
