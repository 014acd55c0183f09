//! Low-level algorithms for big integer arithmetic.
//!
//! The multiplication and division strategies are exposed individually so
//! callers can pick one directly or check them against each other.

#![allow(clippy::many_single_char_names)]

// --- multiplication ---
pub use crate::bigint::{
    multiply_karatsuba, multiply_schoolbook, multiply_toom_cook3, square_karatsuba,
    square_schoolbook, square_toom_cook3,
};

// --- division ---
pub use crate::bigint::{div_rem_burnikel_ziegler, div_rem_knuth};

// --- number theory ---
mod gcd;
mod jacobi;

pub use self::gcd::*;
pub use self::jacobi::*;
