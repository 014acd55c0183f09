//! Arbitrary precision integers and decimals.
//!
//! [`BigInt`] is a signed integer of unbounded size with the usual operator
//! overloads, modular arithmetic, primality testing and radix conversion.
//! [`BigDecimal`] pairs a `BigInt` with a 32-bit scale and rounds under a
//! [`MathContext`] when asked to.
//!
//! ## Example
//!
//! ```rust
//! use core::str::FromStr;
//! use num_bigmath::{BigDecimal, BigInt, MathContext};
//!
//! let a = BigInt::from_str("123456789012345678901234567890").unwrap();
//! let b = &a * &a;
//! assert_eq!(b.to_string(), "15241578753238836750495351562536198787501905199875019052100");
//!
//! let third = BigDecimal::from(1)
//!     .divide_with_context(&BigDecimal::from(3), &MathContext::DECIMAL32)
//!     .unwrap();
//! assert_eq!(third.to_string(), "0.3333333");
//! ```
//!
//! Random values come from any [`rand::Rng`] through [`RandBigInt`]:
//!
//! ```rust
//! use num_bigmath::{BigInt, RandBigInt};
//!
//! let mut rng = rand::rng();
//! let a = rng.gen_bigint(1000);
//! let low = BigInt::from(-10000);
//! let high = BigInt::from(10000);
//! let b = rng.gen_bigint_range(&low, &high);
//! assert!(a.bit_length() <= 1000);
//! assert!(low <= b && b < high);
//! ```

#![warn(rust_2018_idioms)]

#[macro_use]
mod macros;

mod bigint;
mod bigrand;
mod context;
mod decimal;
mod error;
mod mutable;
mod prime;
mod range;
mod sieve;
mod traits;

pub mod algorithms;

pub use crate::bigint::{BigInt, Sign};
pub use crate::bigrand::{RandBigInt, RandPrime, RandomBits, UniformBigInt};
pub use crate::context::{MathContext, RoundingMode};
pub use crate::decimal::BigDecimal;
pub use crate::error::{ArithmeticError, Error, FormatError};
pub use crate::prime::DEFAULT_PRIME_CERTAINTY;
pub use crate::range::BigIntRange;
pub use crate::traits::{ExtendedGcd, ModInverse};
