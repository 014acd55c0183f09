//! A mutable working magnitude used inside division and square root.
//!
//! Values are big-endian words in `value[offset..offset + int_len]`, kept
//! without leading zeros after every operation. Nothing here is signed;
//! callers attach signs when converting back to [`BigInt`].

use core::cmp::Ordering::{self, Equal, Greater, Less};

use tracing::trace;

use crate::bigint::{
    add_mag, compare_magnitude, multiply_to_len, shift_left_mag, shift_right_mag, sub_mag,
    BigInt, Sign,
};

/// Divisors shorter than this many words always use Knuth's algorithm.
pub(crate) const BURNIKEL_ZIEGLER_THRESHOLD: usize = 80;

/// Burnikel-Ziegler is used only when the dividend is at least this many
/// words longer than the divisor.
pub(crate) const BURNIKEL_ZIEGLER_OFFSET: usize = 40;

/// Dividends at least this long have common trailing zero words cancelled
/// before a Knuth division.
const KNUTH_POW2_THRESH_LEN: usize = 6;

/// Minimum number of common trailing zero words worth cancelling.
const KNUTH_POW2_THRESH_ZEROS: u64 = 3;

#[derive(Clone, Debug, Default)]
pub(crate) struct MutableBigInt {
    value: Vec<u32>,
    offset: usize,
    int_len: usize,
}

impl MutableBigInt {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_words(words: &[u32]) -> Self {
        Self::from_vec(words.to_vec())
    }

    pub(crate) fn from_vec(value: Vec<u32>) -> Self {
        let int_len = value.len();
        let mut m = MutableBigInt {
            value,
            offset: 0,
            int_len,
        };
        m.normalize();
        m
    }

    pub(crate) fn from_u64(v: u64) -> Self {
        Self::from_vec(vec![(v >> 32) as u32, v as u32])
    }

    /// A value of `n` words, all ones.
    fn ones(n: usize) -> Self {
        Self::from_vec(vec![u32::MAX; n])
    }

    #[inline]
    pub(crate) fn words(&self) -> &[u32] {
        &self.value[self.offset..self.offset + self.int_len]
    }

    #[inline]
    pub(crate) fn is_zero(&self) -> bool {
        self.int_len == 0
    }

    fn set(&mut self, value: Vec<u32>) {
        self.int_len = value.len();
        self.value = value;
        self.offset = 0;
        self.normalize();
    }

    fn clear(&mut self) {
        self.value.clear();
        self.offset = 0;
        self.int_len = 0;
    }

    /// Drops leading zero words.
    fn normalize(&mut self) {
        match self.words().iter().position(|&w| w != 0) {
            Some(k) => {
                self.offset += k;
                self.int_len -= k;
            }
            None => {
                self.offset = 0;
                self.int_len = 0;
            }
        }
    }

    pub(crate) fn into_bigint(self, sign: Sign) -> BigInt {
        let words = if self.offset == 0 && self.value.len() == self.int_len {
            self.value
        } else {
            self.words().to_vec()
        };
        BigInt::from_mag(sign, words)
    }

    fn compare(&self, b: &MutableBigInt) -> Ordering {
        compare_magnitude(self.words(), b.words())
    }

    fn bit_length(&self) -> u64 {
        if self.is_zero() {
            return 0;
        }
        (self.int_len as u64 - 1) * 32 + u64::from(32 - self.words()[0].leading_zeros())
    }

    fn lowest_set_bit(&self) -> u64 {
        let mut bits = 0;
        for &w in self.words().iter().rev() {
            if w == 0 {
                bits += 32;
            } else {
                return bits + u64::from(w.trailing_zeros());
            }
        }
        bits
    }

    fn to_u64(&self) -> u64 {
        self.words()
            .iter()
            .fold(0u64, |acc, &w| (acc << 32) | u64::from(w))
    }

    pub(crate) fn left_shift(&mut self, n: u64) {
        if self.is_zero() || n == 0 {
            return;
        }
        let v = shift_left_mag(self.words(), n as usize);
        self.set(v);
    }

    pub(crate) fn right_shift(&mut self, n: u64) {
        if self.is_zero() || n == 0 {
            return;
        }
        let v = shift_right_mag(self.words(), n as usize);
        self.set(v);
    }

    fn add(&mut self, other: &MutableBigInt) {
        let v = add_mag(self.words(), other.words());
        self.set(v);
    }

    /// Replaces `self` with `|self - b|` and reports which side was larger.
    fn subtract(&mut self, b: &MutableBigInt) -> Ordering {
        match self.compare(b) {
            Equal => {
                self.clear();
                Equal
            }
            Greater => {
                let v = sub_mag(self.words(), b.words());
                self.set(v);
                Greater
            }
            Less => {
                let v = sub_mag(b.words(), self.words());
                self.set(v);
                Less
            }
        }
    }

    fn multiply(&self, y: &MutableBigInt) -> MutableBigInt {
        if self.is_zero() || y.is_zero() {
            return MutableBigInt::new();
        }
        MutableBigInt::from_vec(multiply_to_len(self.words(), y.words()))
    }

    /// Keeps only the low `n` words.
    fn keep_lower(&mut self, n: usize) {
        if self.int_len >= n {
            self.offset += self.int_len - n;
            self.int_len = n;
            self.normalize();
        }
    }

    fn lower(&self, n: usize) -> MutableBigInt {
        let mut copy = self.clone();
        copy.keep_lower(n);
        copy
    }

    /// Block `index` of `num_blocks` blocks of `block_length` words, counted
    /// from the least significant end. The top block takes any excess.
    fn block(&self, index: usize, num_blocks: usize, block_length: usize) -> MutableBigInt {
        let block_start = index * block_length;
        if block_start >= self.int_len {
            return MutableBigInt::new();
        }

        let block_end = if index == num_blocks - 1 {
            self.int_len
        } else {
            (index + 1) * block_length
        };
        if block_end > self.int_len {
            return MutableBigInt::new();
        }

        let top = self.offset + self.int_len;
        MutableBigInt::from_words(&self.value[top - block_end..top - block_start])
    }

    /// `self += addend << (32 * n)`.
    fn add_shifted(&mut self, addend: &MutableBigInt, n: usize) {
        if addend.is_zero() {
            return;
        }
        let shifted = shift_left_mag(addend.words(), 32 * n);
        let v = add_mag(self.words(), &shifted);
        self.set(v);
    }

    /// `self = (addend << (32 * n)) | self` for `self` shorter than `n` words.
    fn add_disjoint(&mut self, addend: &MutableBigInt, n: usize) {
        if addend.is_zero() {
            return;
        }
        let low = self.words();
        let total = addend.int_len + n;
        let mut v = Vec::with_capacity(total);
        v.extend_from_slice(addend.words());
        v.resize(total - low.len(), 0);
        v.extend_from_slice(low);
        self.set(v);
    }

    /// `self += addend mod 2^(32 * n)`.
    fn add_lower(&mut self, addend: &MutableBigInt, n: usize) {
        let lower = addend.lower(n);
        self.add(&lower);
    }

    /// Divides by a single word, returning the quotient and remainder.
    pub(crate) fn divide_one_word(&self, divisor: u32) -> (MutableBigInt, u32) {
        let d = u64::from(divisor);
        let mut q = vec![0u32; self.int_len];
        let mut rem = 0u64;
        for (i, &w) in self.words().iter().enumerate() {
            let dividend = (rem << 32) | u64::from(w);
            q[i] = (dividend / d) as u32;
            rem = dividend % d;
        }
        (MutableBigInt::from_vec(q), rem as u32)
    }

    /// Quotient and remainder, picking Knuth or Burnikel-Ziegler by size.
    /// The divisor must be nonzero.
    pub(crate) fn divide(&self, b: &MutableBigInt) -> (MutableBigInt, MutableBigInt) {
        if b.int_len < BURNIKEL_ZIEGLER_THRESHOLD
            || self.int_len < b.int_len + BURNIKEL_ZIEGLER_OFFSET
        {
            self.divide_knuth(b)
        } else {
            self.divide_burnikel_ziegler(b)
        }
    }

    /// Knuth's Algorithm D. The divisor must be nonzero.
    pub(crate) fn divide_knuth(&self, b: &MutableBigInt) -> (MutableBigInt, MutableBigInt) {
        debug_assert!(!b.is_zero());
        if self.is_zero() {
            return (MutableBigInt::new(), MutableBigInt::new());
        }

        match self.compare(b) {
            Less => return (MutableBigInt::new(), self.clone()),
            Equal => return (MutableBigInt::from_vec(vec![1]), MutableBigInt::new()),
            Greater => {}
        }

        if b.int_len == 1 {
            let (q, r) = self.divide_one_word(b.words()[0]);
            return (q, MutableBigInt::from_vec(vec![r]));
        }

        if self.int_len >= KNUTH_POW2_THRESH_LEN {
            let trailing = self.lowest_set_bit().min(b.lowest_set_bit());
            if trailing >= KNUTH_POW2_THRESH_ZEROS * 32 {
                let mut a = self.clone();
                let mut bb = b.clone();
                a.right_shift(trailing);
                bb.right_shift(trailing);
                let (q, mut r) = a.divide_knuth(&bb);
                r.left_shift(trailing);
                return (q, r);
            }
        }

        self.divide_magnitude(b)
    }

    /// Long division of a dividend longer than a divisor of two or more
    /// words.
    fn divide_magnitude(&self, div: &MutableBigInt) -> (MutableBigInt, MutableBigInt) {
        let dlen = div.int_len;
        let nlen = self.int_len;
        let shift = div.words()[0].leading_zeros();

        let divisor = shift_left_mag(div.words(), shift as usize);

        // The normalized dividend gets one extra word on top.
        let n = self.words();
        let mut rem = vec![0u32; nlen + 1];
        if shift > 0 {
            rem[0] = n[0] >> (32 - shift);
            for i in 0..nlen {
                let next = if i + 1 < nlen { n[i + 1] >> (32 - shift) } else { 0 };
                rem[i + 1] = (n[i] << shift) | next;
            }
        } else {
            rem[1..].copy_from_slice(n);
        }

        let limit = nlen - dlen + 1;
        let mut q = vec![0u32; limit];
        let dh = u64::from(divisor[0]);
        let dl = u64::from(divisor[1]);

        for j in 0..limit {
            let num = (u64::from(rem[j]) << 32) | u64::from(rem[j + 1]);
            let mut qhat = num / dh;
            let mut rhat = num % dh;

            while qhat > u64::from(u32::MAX)
                || qhat * dl > ((rhat << 32) | u64::from(rem[j + 2]))
            {
                qhat -= 1;
                rhat += dh;
                if rhat > u64::from(u32::MAX) {
                    break;
                }
            }

            // Multiply and subtract.
            let mut borrow = 0i64;
            let mut carry = 0u64;
            for i in (0..dlen).rev() {
                let p = qhat * u64::from(divisor[i]) + carry;
                carry = p >> 32;
                let t = i64::from(rem[j + 1 + i]) - (p & 0xffff_ffff) as i64 + borrow;
                rem[j + 1 + i] = t as u32;
                borrow = t >> 32;
            }
            let t = i64::from(rem[j]) - carry as i64 + borrow;
            rem[j] = t as u32;

            if t < 0 {
                // Add back.
                qhat -= 1;
                let mut c = 0u64;
                for i in (0..dlen).rev() {
                    let s = u64::from(rem[j + 1 + i]) + u64::from(divisor[i]) + c;
                    rem[j + 1 + i] = s as u32;
                    c = s >> 32;
                }
                rem[j] = rem[j].wrapping_add(c as u32);
            }

            q[j] = qhat as u32;
        }

        let r = &rem[limit..];
        let r = if shift > 0 {
            shift_right_mag(r, shift as usize)
        } else {
            r.to_vec()
        };

        (MutableBigInt::from_vec(q), MutableBigInt::from_vec(r))
    }

    /// Recursive division of Burnikel and Ziegler. The divisor must be
    /// nonzero.
    pub(crate) fn divide_burnikel_ziegler(
        &self,
        b: &MutableBigInt,
    ) -> (MutableBigInt, MutableBigInt) {
        let r = self.int_len;
        let s = b.int_len;
        if r < s {
            return (MutableBigInt::new(), self.clone());
        }

        // Block size: a power of two times j, at least as long as b.
        let m = 1usize << (usize::BITS - (s / BURNIKEL_ZIEGLER_THRESHOLD).leading_zeros());
        let j = s.div_ceil(m);
        let n = j * m;
        let n32 = 32 * n as u64;
        let sigma = n32.saturating_sub(b.bit_length());

        let mut b_shifted = b.clone();
        b_shifted.left_shift(sigma);
        let mut a_shifted = self.clone();
        a_shifted.left_shift(sigma);

        let t = (((a_shifted.bit_length() + n32) / n32) as usize).max(2);
        trace!(dividend_words = r, divisor_words = s, blocks = t, "burnikel-ziegler divide");

        let a1 = a_shifted.block(t - 1, t, n);
        let mut z = a_shifted.block(t - 2, t, n);
        z.add_disjoint(&a1, n);

        let mut quotient = MutableBigInt::new();
        for i in (1..=t - 2).rev() {
            let (qi, ri) = z.divide_2n1n(&b_shifted);
            z = a_shifted.block(i - 1, t, n);
            z.add_disjoint(&ri, n);
            quotient.add_shifted(&qi, i * n);
        }

        let (qi, mut ri) = z.divide_2n1n(&b_shifted);
        quotient.add(&qi);
        ri.right_shift(sigma);
        (quotient, ri)
    }

    /// Divides a value of up to `2n` words by an `n` word divisor with the
    /// top bit set, provided the quotient fits `n` words.
    fn divide_2n1n(&self, b: &MutableBigInt) -> (MutableBigInt, MutableBigInt) {
        let n = b.int_len;
        if n % 2 != 0 || n < BURNIKEL_ZIEGLER_THRESHOLD {
            return self.divide_knuth(b);
        }
        let half = n / 2;

        // View self as [a1, a2, a3, a4] with n/2 word pieces.
        let mut a123 = self.clone();
        a123.right_shift(32 * half as u64);
        let mut a4 = self.clone();
        a4.keep_lower(half);

        let (q1, r1) = a123.divide_3n2n(b);

        a4.add_disjoint(&r1, half);
        let (mut q2, r2) = a4.divide_3n2n(b);

        q2.add_disjoint(&q1, half);
        (q2, r2)
    }

    /// Divides a `3n` word value by a `2n` word divisor with the top bit
    /// set, provided the quotient fits `n` words.
    fn divide_3n2n(&self, b: &MutableBigInt) -> (MutableBigInt, MutableBigInt) {
        let n = b.int_len / 2;

        // View self as [a1, a2, a3] and b as [b1, b2] with n word pieces.
        let mut a12 = self.clone();
        a12.right_shift(32 * n as u64);
        let mut a1 = self.clone();
        a1.right_shift(64 * n as u64);
        let mut b1 = b.clone();
        b1.right_shift(32 * n as u64);
        let b2 = b.lower(n);

        let mut quotient;
        let mut r;
        let d;
        if a1.compare(&b1) == Less {
            let (q, rr) = a12.divide_2n1n(&b1);
            d = q.multiply(&b2);
            quotient = q;
            r = rr;
        } else {
            // The quotient is at least beta^n - 1.
            quotient = MutableBigInt::ones(n);
            a12.add(&b1);
            let mut b1_shifted = b1.clone();
            b1_shifted.left_shift(32 * n as u64);
            a12.subtract(&b1_shifted);
            r = a12;

            let mut dd = b2.clone();
            dd.left_shift(32 * n as u64);
            dd.subtract(&b2);
            d = dd;
        }

        // r = r * beta^n + a3, keeping d aside until r is large enough.
        r.left_shift(32 * n as u64);
        r.add_lower(self, n);

        let one = MutableBigInt::from_vec(vec![1]);
        while r.compare(&d) == Less {
            r.add(b);
            quotient.subtract(&one);
        }
        r.subtract(&d);

        (quotient, r)
    }

    /// Floor of the square root, by Newton iteration from above.
    pub(crate) fn sqrt(&self) -> MutableBigInt {
        if self.is_zero() {
            return MutableBigInt::new();
        }

        let bit_length = self.bit_length();
        if bit_length <= 63 {
            return MutableBigInt::from_u64(self.to_u64().isqrt());
        }

        let mut shift = bit_length - 63;
        if shift % 2 == 1 {
            shift += 1;
        }

        let mut top = self.clone();
        top.right_shift(shift);
        let estimate = (top.to_u64() as f64).sqrt().ceil() as u64 + 1;

        let mut xk = MutableBigInt::from_u64(estimate);
        xk.left_shift(shift / 2);

        loop {
            let (mut xk1, _) = self.divide(&xk);
            xk1.add(&xk);
            xk1.right_shift(1);

            if xk1.compare(&xk) != Less {
                return xk;
            }
            xk = xk1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use crate::bigrand::RandBigInt;

    fn mutable(v: &BigInt) -> MutableBigInt {
        MutableBigInt::from_words(v.mag())
    }

    fn check_division(a: &BigInt, b: &BigInt, q: MutableBigInt, r: MutableBigInt) {
        let q = q.into_bigint(Sign::Plus);
        let r = r.into_bigint(Sign::Plus);
        assert!(r < *b, "remainder {} not below divisor {}", r, b);
        assert_eq!(&q * b + &r, *a);
    }

    #[test]
    fn test_divide_one_word() {
        let a = MutableBigInt::from_vec(vec![1, 0, 7]);
        let (q, r) = a.divide_one_word(10);
        let expected = BigInt::from_mag(Sign::Plus, vec![1, 0, 7]);
        assert_eq!(BigInt::from(r), &expected % BigInt::from(10));
        assert_eq!(q.into_bigint(Sign::Plus), expected / BigInt::from(10));
    }

    #[test]
    fn test_knuth_near_power_of_two() {
        let a = BigInt::from_mag(Sign::Plus, vec![0x8000_0000, 0, 0, 0]);
        let b = BigInt::from_mag(Sign::Plus, vec![0x8000_0000, 0, 1]);
        let (q, r) = mutable(&a).divide_knuth(&mutable(&b));
        check_division(&a, &b, q, r);
    }

    #[test]
    fn test_knuth_random() {
        let mut rng = XorShiftRng::from_seed([5u8; 16]);
        for i in 1..60u64 {
            let a = rng.gen_bigint_bits(i * 40 + 64);
            let b = rng.gen_bigint_bits(i * 17 + 33);
            let (q, r) = mutable(&a).divide_knuth(&mutable(&b));
            check_division(&a, &b, q, r);
        }
    }

    #[test]
    fn test_knuth_trailing_zero_cancel() {
        let a = BigInt::from_mag(Sign::Plus, vec![7, 9, 11, 13, 0, 0, 0, 0]);
        let b = BigInt::from_mag(Sign::Plus, vec![3, 5, 0, 0, 0]);
        let (q, r) = mutable(&a).divide_knuth(&mutable(&b));
        check_division(&a, &b, q, r);
    }

    #[test]
    fn test_burnikel_ziegler_matches_knuth() {
        let mut rng = XorShiftRng::from_seed([11u8; 16]);
        for &(abits, bbits) in &[(9000u64, 3000u64), (20000, 2700), (16000, 8000), (5200, 2600)] {
            let a = rng.gen_bigint_bits(abits);
            let b = rng.gen_bigint_bits(bbits);
            let (q1, r1) = mutable(&a).divide_knuth(&mutable(&b));
            let (q2, r2) = mutable(&a).divide_burnikel_ziegler(&mutable(&b));
            assert_eq!(q1.words(), q2.words());
            assert_eq!(r1.words(), r2.words());
            check_division(&a, &b, q2, r2);
        }
    }

    #[test]
    fn test_sqrt() {
        let mut rng = XorShiftRng::from_seed([13u8; 16]);
        for bits in [1u64, 10, 63, 64, 65, 127, 128, 500, 3000] {
            let n = rng.gen_bigint_bits(bits);
            let s = mutable(&n).sqrt().into_bigint(Sign::Plus);
            assert!(&s * &s <= n);
            let s1 = &s + 1u32;
            assert!(&s1 * &s1 > n);
        }
        let perfect = BigInt::from(u64::MAX) * BigInt::from(u64::MAX);
        assert_eq!(mutable(&perfect).sqrt().into_bigint(Sign::Plus), BigInt::from(u64::MAX));
    }
}
