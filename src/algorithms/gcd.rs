use crate::bigint::BigInt;
use crate::bigint::Sign::{self, Minus, Plus};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

/// XGCD sets z to the greatest common divisor of a and b and returns z.
/// If extended is true, XGCD returns their value such that z = a*x + b*y.
///
/// Allow the inputs a and b to be zero or negative to GCD
/// with the following definitions.
///
/// If x or y are not nil, GCD sets their value such that z = a*x + b*y.
/// Regardless of the signs of a and b, z is always >= 0.
/// If a == b == 0, GCD sets z = x = y = 0.
/// If a == 0 and b != 0, GCD sets z = |b|, x = 0, y = sign(b) * 1.
/// If a != 0 and b == 0, GCD sets z = |a|, x = sign(a) * 1, y = 0.
pub fn xgcd(
    a_in: &BigInt,
    b_in: &BigInt,
    extended: bool,
) -> (BigInt, Option<BigInt>, Option<BigInt>) {
    if a_in.is_zero() && b_in.is_zero() {
        if extended {
            return (0.into(), Some(0.into()), Some(0.into()));
        } else {
            return (0.into(), None, None);
        }
    }

    if a_in.is_zero() {
        if extended {
            return (b_in.abs(), Some(0.into()), Some(b_in.signum()));
        } else {
            return (b_in.abs(), None, None);
        }
    }

    if b_in.is_zero() {
        if extended {
            return (a_in.abs(), Some(a_in.signum()), Some(0.into()));
        } else {
            return (a_in.abs(), None, None);
        }
    }
    lehmer_gcd(a_in, b_in, extended)
}

fn single_word(word: u32, sign: Sign) -> BigInt {
    BigInt::from_mag(sign, vec![word])
}

/// Lehmer GCD sets z to the greatest common divisor of a and b,
/// which both must be != 0, and returns z.
/// If x or y are not nil, their values are set such that z = a*x + b*y.
/// See Knuth, The Art of Computer Programming, Vol. 2, Section 4.5.2, Algorithm L.
fn lehmer_gcd(
    a_in: &BigInt,
    b_in: &BigInt,
    extended: bool,
) -> (BigInt, Option<BigInt>, Option<BigInt>) {
    let mut a = a_in.abs();
    let mut b = b_in.abs();

    let mut ua = if extended { Some(BigInt::one()) } else { None };
    let mut ub = if extended { Some(BigInt::zero()) } else { None };

    if a < b {
        core::mem::swap(&mut a, &mut b);
        core::mem::swap(&mut ua, &mut ub);
    }

    while b.mag().len() > 1 {
        let (u0, u1, v0, v1, even) = lehmer_simulate(&a, &b);

        if v0 != 0 {
            lehmer_update(&mut a, &mut b, u0, u1, v0, v1, even);
            if let (Some(ua), Some(ub)) = (ua.as_mut(), ub.as_mut()) {
                lehmer_update(ua, ub, u0, u1, v0, v1, even);
            }
        } else {
            euclid_update(&mut a, &mut b, &mut ua, &mut ub);
        }
    }

    if !b.is_zero() {
        if a.mag().len() > 1 {
            euclid_update(&mut a, &mut b, &mut ua, &mut ub);
        }

        if !b.is_zero() {
            let mut a_word = a.mag()[0];
            let mut b_word = b.mag()[0];

            if let (Some(ua), Some(ub)) = (ua.as_mut(), ub.as_ref()) {
                let mut ua_word: u32 = 1;
                let mut ub_word: u32 = 0;
                let mut va: u32 = 0;
                let mut vb: u32 = 1;
                let mut even = true;

                while b_word != 0 {
                    let q = a_word / b_word;
                    let r = a_word % b_word;
                    a_word = b_word;
                    b_word = r;

                    let k = ua_word.wrapping_add(q.wrapping_mul(ub_word));
                    ua_word = ub_word;
                    ub_word = k;

                    let k = va.wrapping_add(q.wrapping_mul(vb));
                    va = vb;
                    vb = k;
                    even = !even;
                }

                let t = single_word(ua_word, if even { Plus } else { Minus }) * &*ua;
                let s = single_word(va, if even { Minus } else { Plus }) * ub;
                *ua = t + s;
            } else {
                while b_word != 0 {
                    let quotient = a_word % b_word;
                    a_word = b_word;
                    b_word = quotient;
                }
            }
            a = BigInt::from(a_word);
        }
    }

    let y = ua.as_mut().map(|ua| {
        let mut tmp = a_in * &*ua;
        if a_in.is_negative() {
            tmp = -tmp;
            *ua = -ua.clone();
        }
        (&a - &tmp) / b_in
    });

    (a.abs(), ua, y)
}

/// Runs Euclid's algorithm on the leading words of `a` and `b`, returning
/// the cosequence coefficients valid for the full values.
#[inline]
fn lehmer_simulate(a: &BigInt, b: &BigInt) -> (u32, u32, u32, u32, bool) {
    let am = a.mag();
    let bm = b.mag();
    let n = am.len();
    let m = bm.len();

    let h = am[0].leading_zeros();
    let top = |hi: u32, lo: u32| -> u32 {
        if h == 0 { hi } else { (hi << h) | (lo >> (32 - h)) }
    };

    let mut a1 = top(am[0], am[1]);
    let mut a2 = if n == m {
        top(bm[0], bm[1])
    } else if n == m + 1 {
        top(0, bm[0])
    } else {
        0
    };

    let mut even = false;

    let mut u0 = 0;
    let mut u1 = 1;
    let mut u2 = 0;

    let mut v0 = 0;
    let mut v1 = 0;
    let mut v2 = 1;

    while a2 >= v2 && a1.wrapping_sub(a2) >= v1 + v2 {
        let q = a1 / a2;
        let r = a1 % a2;

        a1 = a2;
        a2 = r;

        let k = u1 + q * u2;
        u0 = u1;
        u1 = u2;
        u2 = k;

        let k = v1 + q * v2;
        v0 = v1;
        v1 = v2;
        v2 = k;

        even = !even;
    }

    (u0, u1, v0, v1, even)
}

fn lehmer_update(a: &mut BigInt, b: &mut BigInt, u0: u32, u1: u32, v0: u32, v1: u32, even: bool) {
    let t = single_word(u0, if even { Plus } else { Minus }) * &*a;
    let s = single_word(v0, if even { Minus } else { Plus }) * &*b;
    let r = single_word(u1, if even { Minus } else { Plus }) * &*a;
    let q = single_word(v1, if even { Plus } else { Minus }) * &*b;

    *a = t + s;
    *b = r + q;
}

fn euclid_update(
    a: &mut BigInt,
    b: &mut BigInt,
    ua: &mut Option<BigInt>,
    ub: &mut Option<BigInt>,
) {
    let (q, r) = a.div_rem(b);

    core::mem::swap(a, b);
    *b = r;

    if let (Some(ua), Some(ub)) = (ua.as_mut(), ub.as_mut()) {
        let next = &*ua - &*ub * &q;
        *ua = core::mem::replace(ub, next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    use crate::bigrand::RandBigInt;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn extended_gcd_euclid(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
        if a.is_zero() && b.is_zero() {
            return (0.into(), 0.into(), 0.into());
        }

        let (mut s, mut old_s) = (BigInt::zero(), BigInt::one());
        let (mut t, mut old_t) = (BigInt::one(), BigInt::zero());
        let (mut r, mut old_r) = (b.clone(), a.clone());

        while !r.is_zero() {
            let quotient = &old_r / &r;
            old_r -= &quotient * &r;
            core::mem::swap(&mut old_r, &mut r);
            old_s -= &quotient * &s;
            core::mem::swap(&mut old_s, &mut s);
            old_t -= quotient * &t;
            core::mem::swap(&mut old_t, &mut t);
        }

        (old_r, old_s, old_t)
    }

    #[test]
    fn test_extended_gcd_example() {
        let (q, s_k, t_k) = xgcd(&BigInt::from(240), &BigInt::from(46), true);

        assert_eq!(q, BigInt::from(2));
        assert_eq!(s_k.unwrap(), BigInt::from(-9));
        assert_eq!(t_k.unwrap(), BigInt::from(47));
    }

    #[test]
    fn test_extended_gcd_example_not_extended() {
        let (q, s_k, t_k) = xgcd(&BigInt::from(240), &BigInt::from(46), false);

        assert_eq!(q, BigInt::from(2));
        assert_eq!(s_k, None);
        assert_eq!(t_k, None);
    }

    #[test]
    fn test_extended_gcd_example_wolfram() {
        let a = BigInt::from_str("-565721958").unwrap();
        let b = BigInt::from_str("4486780496").unwrap();

        let (q, s_k, t_k) = xgcd(&a, &b, true);

        assert_eq!(q, BigInt::from(2));
        assert_eq!(s_k, Some(BigInt::from(-1_090_996_795i64)));
        assert_eq!(t_k, Some(BigInt::from(-137_559_848i64)));
    }

    #[test]
    fn test_golang_bignum_negative() {
        let gcd_test_cases = [
            ["0", "0", "0", "0", "0"],
            ["7", "0", "1", "0", "7"],
            ["7", "0", "-1", "0", "-7"],
            ["11", "1", "0", "11", "0"],
            ["7", "-1", "-2", "-77", "35"],
            ["935", "-3", "8", "64515", "24310"],
            ["935", "-3", "-8", "64515", "-24310"],
            ["935", "3", "-8", "-64515", "-24310"],
            ["1", "-9", "47", "120", "23"],
            ["7", "1", "-2", "77", "35"],
            ["935", "-3", "8", "64515", "24310"],
            [
                "935000000000000000",
                "-3",
                "8",
                "64515000000000000000",
                "24310000000000000000",
            ],
            [
                "1",
                "-221",
                "22059940471369027483332068679400581064239780177629666810348940098015901108344",
                "98920366548084643601728869055592650835572950932266967461790948584315647051443",
                "991",
            ],
        ];

        for case in &gcd_test_cases {
            let d_case = BigInt::from_str(case[0]).unwrap();
            let x_case = BigInt::from_str(case[1]).unwrap();
            let y_case = BigInt::from_str(case[2]).unwrap();
            let a_case = BigInt::from_str(case[3]).unwrap();
            let b_case = BigInt::from_str(case[4]).unwrap();

            let (d, x, y) = xgcd(&a_case, &b_case, false);
            assert_eq!(d, d_case);
            assert_eq!(x, None);
            assert_eq!(y, None);

            let (d, x, y) = xgcd(&a_case, &b_case, true);
            assert_eq!(d, d_case);
            assert_eq!(x.unwrap(), x_case);
            assert_eq!(y.unwrap(), y_case);
        }
    }

    #[test]
    fn test_extended_gcd_assumptions() {
        let mut rng = XorShiftRng::from_seed([1u8; 16]);

        for i in 1u64..100 {
            for j in &[1u64, 64, 128] {
                let a = rng.gen_bigint(i * j);
                let b = rng.gen_bigint(i * j);
                let (q, s_k, t_k) = xgcd(&a, &b, true);

                let lhs = &a * &s_k.unwrap();
                let rhs = &b * &t_k.unwrap();

                assert_eq!(q.clone(), &lhs + &rhs, "{} = {} + {}", q, lhs, rhs);
            }
        }
    }

    #[test]
    fn test_gcd_lehmer_euclid_extended() {
        let mut rng = XorShiftRng::from_seed([1u8; 16]);

        for i in 1u64..80 {
            for j in &[1u64, 16, 24, 64, 128] {
                let a = rng.gen_bigint_bits(i * j);
                let b = rng.gen_bigint_bits(i * j);
                let (q, s_k, t_k) = xgcd(&a, &b, true);

                let expected = extended_gcd_euclid(&a, &b);
                assert_eq!(q, expected.0);
                assert_eq!(s_k.unwrap(), expected.1);
                assert_eq!(t_k.unwrap(), expected.2);
            }
        }
    }

    #[test]
    fn test_gcd_lehmer_euclid_not_extended() {
        let mut rng = XorShiftRng::from_seed([1u8; 16]);

        for i in 1u64..80 {
            for j in &[1u64, 16, 24, 64, 128] {
                let a = rng.gen_bigint_bits(i * j);
                let b = rng.gen_bigint_bits(i * j);
                let (q, s_k, t_k) = xgcd(&a, &b, false);

                let expected = extended_gcd_euclid(&a, &b);
                assert_eq!(q, expected.0, "gcd({}, {}) = {} != {}", &a, &b, &q, expected.0);
                assert_eq!(s_k, None);
                assert_eq!(t_k, None);
            }
        }
    }
}
