use std::sync::{Arc, LazyLock};

use num_traits::Zero;
use parking_lot::RwLock;
use tracing::debug;

use crate::bigint::BigInt;

/// Powers of ten at or past this exponent are computed on demand rather
/// than cached.
const TEN_POWERS_TABLE_MAX: usize = 16 * 19;

/// Initial cache size, every power of ten below 2^64.
const TEN_POWERS_TABLE_INITIAL: usize = 20;

/// `10^n` for a growing prefix of `n`. Snapshots only ever get longer.
static TEN_POWERS: LazyLock<RwLock<Arc<Vec<BigInt>>>> = LazyLock::new(|| {
    let mut table = Vec::with_capacity(TEN_POWERS_TABLE_INITIAL);
    let mut power = 1u64;
    for _ in 0..TEN_POWERS_TABLE_INITIAL {
        table.push(BigInt::from(power));
        power = power.wrapping_mul(10);
    }
    RwLock::new(Arc::new(table))
});

/// `10^n`.
pub(crate) fn big_ten_to_the(n: u32) -> BigInt {
    let index = n as usize;
    if index >= TEN_POWERS_TABLE_MAX {
        return BigInt::ten().pow(n);
    }

    let table = Arc::clone(&TEN_POWERS.read());
    if index < table.len() {
        return table[index].clone();
    }
    expand_ten_powers(&table, index)
}

fn expand_ten_powers(current: &[BigInt], index: usize) -> BigInt {
    let mut new_len = current.len() << 1;
    while new_len <= index {
        new_len <<= 1;
    }
    let new_len = new_len.min(TEN_POWERS_TABLE_MAX);

    let mut extended = Vec::with_capacity(new_len);
    extended.extend(current.iter().cloned());
    for i in current.len()..new_len {
        let next = &extended[i - 1] * 10u32;
        extended.push(next);
    }
    let result = extended[index].clone();

    let mut cache = TEN_POWERS.write();
    if cache.len() < extended.len() {
        debug!(len = extended.len(), "ten power cache extended");
        *cache = Arc::new(extended);
    }
    result
}

/// `value * 10^n`, or `value` itself when `n` is not positive.
pub(crate) fn multiply_power_ten(value: &BigInt, n: i32) -> BigInt {
    if n <= 0 || value.is_zero() {
        return value.clone();
    }
    value * big_ten_to_the(n as u32)
}

/// The number of decimal digits in `|value|`, with zero counting as one
/// digit.
pub(crate) fn big_digit_length(value: &BigInt) -> u32 {
    if value.is_zero() {
        return 1;
    }
    // 646456993 / 2^31 slightly exceeds log10(2).
    let r = ((value.bit_length() + 1) * 646_456_993) >> 31;
    let r = r as u32;
    if value.cmp_magnitude(&big_ten_to_the(r)).is_lt() {
        r
    } else {
        r + 1
    }
}

/// `true` when `value` is `±10^k` for some `k >= 0`.
pub(crate) fn is_power_of_ten(value: &BigInt) -> bool {
    !value.is_zero() && value.magnitude_value() == big_ten_to_the(big_digit_length(value) - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;
    use num_traits::One;

    #[test]
    fn test_ten_powers() {
        assert_eq!(big_ten_to_the(0), BigInt::one());
        assert_eq!(big_ten_to_the(19), BigInt::from(10_000_000_000_000_000_000u64));
        let p = big_ten_to_the(45);
        assert_eq!(p.to_string(), format!("1{}", "0".repeat(45)));
        // Growth leaves earlier entries intact.
        assert_eq!(big_ten_to_the(20), BigInt::from(10u128.pow(20)));
        let huge = big_ten_to_the(400);
        assert_eq!(huge.to_string().len(), 401);
    }

    #[test]
    fn test_digit_length() {
        assert_eq!(big_digit_length(&BigInt::zero()), 1);
        assert_eq!(big_digit_length(&BigInt::from(9)), 1);
        assert_eq!(big_digit_length(&BigInt::from(-10)), 2);
        assert_eq!(big_digit_length(&BigInt::from(999_999_999_999u64)), 12);
        assert_eq!(big_digit_length(&BigInt::from(1_000_000_000_000u64)), 13);
        let n = BigInt::from_str(&"9".repeat(120)).unwrap();
        assert_eq!(big_digit_length(&n), 120);
        assert_eq!(big_digit_length(&(n + 1u32)), 121);
    }

    #[test]
    fn test_multiply_power_ten() {
        let v = BigInt::from(-12);
        assert_eq!(multiply_power_ten(&v, 3), BigInt::from(-12000));
        assert_eq!(multiply_power_ten(&v, 0), v);
        assert_eq!(multiply_power_ten(&v, -4), v);
    }

    #[test]
    fn test_is_power_of_ten() {
        assert!(is_power_of_ten(&BigInt::from(1)));
        assert!(is_power_of_ten(&BigInt::from(-1000)));
        assert!(!is_power_of_ten(&BigInt::from(1001)));
        assert!(!is_power_of_ten(&BigInt::from(20)));
    }
}
