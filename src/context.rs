//! Rounding behaviour for decimal arithmetic.

use core::fmt;
use core::str::FromStr;

use crate::error::FormatError;

/// How to discard digits when a result has more precision than allowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundingMode {
    /// Away from zero.
    Up,
    /// Toward zero.
    Down,
    /// Toward positive infinity.
    Ceiling,
    /// Toward negative infinity.
    Floor,
    /// To the nearest neighbor, ties away from zero.
    HalfUp,
    /// To the nearest neighbor, ties toward zero.
    HalfDown,
    /// To the nearest neighbor, ties to the even neighbor.
    HalfEven,
    /// Assert that no rounding is needed; an inexact result is an error.
    Unnecessary,
}

impl RoundingMode {
    const ALL: [RoundingMode; 8] = [
        RoundingMode::Up,
        RoundingMode::Down,
        RoundingMode::Ceiling,
        RoundingMode::Floor,
        RoundingMode::HalfUp,
        RoundingMode::HalfDown,
        RoundingMode::HalfEven,
        RoundingMode::Unnecessary,
    ];

    /// The mode for one of the integer codes `0..=7` (`UP` through
    /// `UNNECESSARY`).
    pub fn from_legacy(code: i32) -> Option<RoundingMode> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    /// The integer code of this mode.
    pub fn legacy(self) -> i32 {
        self as i32
    }

    fn name(self) -> &'static str {
        match self {
            RoundingMode::Up => "UP",
            RoundingMode::Down => "DOWN",
            RoundingMode::Ceiling => "CEILING",
            RoundingMode::Floor => "FLOOR",
            RoundingMode::HalfUp => "HALF_UP",
            RoundingMode::HalfDown => "HALF_DOWN",
            RoundingMode::HalfEven => "HALF_EVEN",
            RoundingMode::Unnecessary => "UNNECESSARY",
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RoundingMode {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|mode| mode.name() == s)
            .ok_or(FormatError::BadRoundingMode)
    }
}

/// A precision, in decimal digits, and a rounding mode.
///
/// Precision 0 means unlimited: operations return exact results or fail when
/// none exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MathContext {
    precision: u32,
    rounding_mode: RoundingMode,
}

impl MathContext {
    /// Exact arithmetic.
    pub const UNLIMITED: MathContext = MathContext::with_rounding(0, RoundingMode::HalfUp);
    /// IEEE 754R decimal32: seven digits, half-even.
    pub const DECIMAL32: MathContext = MathContext::with_rounding(7, RoundingMode::HalfEven);
    /// IEEE 754R decimal64: sixteen digits, half-even.
    pub const DECIMAL64: MathContext = MathContext::with_rounding(16, RoundingMode::HalfEven);
    /// IEEE 754R decimal128: thirty-four digits, half-even.
    pub const DECIMAL128: MathContext = MathContext::with_rounding(34, RoundingMode::HalfEven);

    /// `precision` digits, rounding half-up.
    pub const fn new(precision: u32) -> MathContext {
        MathContext::with_rounding(precision, RoundingMode::HalfUp)
    }

    pub const fn with_rounding(precision: u32, rounding_mode: RoundingMode) -> MathContext {
        MathContext {
            precision,
            rounding_mode,
        }
    }

    #[inline]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    #[inline]
    pub fn rounding_mode(&self) -> RoundingMode {
        self.rounding_mode
    }
}

impl Default for MathContext {
    fn default() -> Self {
        MathContext::new(9)
    }
}

impl fmt::Display for MathContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "precision={} roundingMode={}",
            self.precision, self.rounding_mode
        )
    }
}

impl FromStr for MathContext {
    type Err = FormatError;

    /// Parses the form written by `Display`, such as
    /// `precision=34 roundingMode=HALF_EVEN`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix("precision=")
            .ok_or(FormatError::BadMathContext)?;
        let (digits, mode) = rest.split_once(' ').ok_or(FormatError::BadMathContext)?;
        let precision = digits.parse().map_err(|_| FormatError::BadMathContext)?;
        let mode = mode
            .strip_prefix("roundingMode=")
            .ok_or(FormatError::BadMathContext)?;
        Ok(MathContext::with_rounding(precision, mode.parse()?))
    }
}
