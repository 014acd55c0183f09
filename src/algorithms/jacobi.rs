use num_traits::ToPrimitive;

use crate::bigint::BigInt;

/// Jacobi symbol `(p / n)` for an odd positive `n`.
pub fn jacobi(p: i64, n: &BigInt) -> i32 {
    if p == 0 {
        return 0;
    }

    let mut j = 1;
    let mut u = n.mag().last().copied().unwrap_or(0);

    // (-1 / n) = -1 when n = 3 mod 4; combined with the (2 / n) rule below
    // this reads the low three bits of n.
    let mut p = if p < 0 {
        let n8 = u & 7;
        if n8 == 3 || n8 == 7 {
            j = -j;
        }
        p.unsigned_abs()
    } else {
        p as u64
    };

    while p & 3 == 0 {
        p >>= 2;
    }
    if p & 1 == 0 {
        p >>= 1;
        if (u ^ (u >> 1)) & 2 != 0 {
            j = -j;
        }
    }
    if p == 1 {
        return j;
    }

    // Quadratic reciprocity, then fall back to machine words.
    if p & u64::from(u) & 2 != 0 {
        j = -j;
    }
    let mut u = n.mod_positive(&BigInt::from(p)).to_u64().unwrap_or(0);
    while u != 0 {
        while u & 3 == 0 {
            u >>= 2;
        }
        if u & 1 == 0 {
            u >>= 1;
            if (p ^ (p >> 1)) & 2 != 0 {
                j = -j;
            }
        }
        if u == 1 {
            return j;
        }
        debug_assert!(u < p);
        core::mem::swap(&mut u, &mut p);
        if u & p & 2 != 0 {
            j = -j;
        }
        u %= p;
    }
    0
}
