use super::{BigInt, Cache, Sign};

impl zeroize::Zeroize for BigInt {
    fn zeroize(&mut self) {
        self.mag.zeroize();
        self.sign = Sign::NoSign;
        self.cache = Cache::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;
    use zeroize::Zeroize;

    #[test]
    fn test_zeroize_leaves_zero() {
        let mut v = BigInt::from(-123_456_789_012_345i64);
        let _ = v.bit_length();
        v.zeroize();
        assert!(v.is_zero());
        assert_eq!(v.bit_length(), 0);
    }
}
