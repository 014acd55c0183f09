//! Error types shared by the integer and decimal layers.

use thiserror::Error;

/// A malformed numeric string or byte input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum FormatError {
    #[error("cannot parse number from empty string")]
    Empty,
    #[error("illegal embedded sign character")]
    EmbeddedSign,
    #[error("invalid digit found in string")]
    InvalidDigit,
    #[error("radix {0} is out of range 2..=36")]
    RadixOutOfRange(u32),
    #[error("number too large")]
    TooLarge,
    #[error("character array contains more than one decimal point")]
    MultipleDecimalPoints,
    #[error("no digits found")]
    NoDigits,
    #[error("no exponent digits")]
    MissingExponentDigits,
    #[error("too many nonzero exponent digits")]
    TooManyExponentDigits,
    #[error("scale out of range")]
    ScaleOutOfRange,
    #[error("zero length byte array")]
    ZeroLengthBytes,
    #[error("signum-magnitude mismatch")]
    SignMagnitudeMismatch,
    #[error("infinite or NaN")]
    NonFinite,
    #[error("bad MathContext string format")]
    BadMathContext,
    #[error("unknown rounding mode")]
    BadRoundingMode,
}

/// An arithmetic operation without a representable result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("division undefined")]
    DivisionUndefined,
    #[error("division impossible")]
    DivisionImpossible,
    #[error("square root of a negative value")]
    NegativeSqrt,
    #[error("computed square root not exact")]
    InexactSqrt,
    #[error("invalid operation")]
    InvalidOperation,
    #[error("overflow")]
    Overflow,
    #[error("underflow")]
    Underflow,
    #[error("rounding necessary")]
    RoundingNecessary,
    #[error("non-terminating decimal expansion; no exact representable decimal result")]
    NonTerminating,
    #[error("modulus not positive")]
    NonPositiveModulus,
    #[error("value not invertible")]
    NotInvertible,
    #[error("value out of {0} range")]
    OutOfRange(&'static str),
    #[error("value must not be negative")]
    NegativeValue,
    #[error("bit length must be at least 2")]
    BitLengthTooSmall,
}

/// Either kind of failure, for operations that parse and then compute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}
