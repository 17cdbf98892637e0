//! Numeric value types produced by the number scanner.
//!
//! The scanner never converts through `f64` on its own. It hands the finished
//! lexeme to [`NumberLexeme`], which decides between the integral and the
//! decimal category; decimals are kept exactly as an unscaled big integer and
//! a scale, the representation used by arbitrary precision decimal types.

use core::{fmt, str::FromStr};

use num_bigint::{BigInt, Sign};
use num_traits::Zero;

use crate::{error::ErrorReason, value::JsonValue};

/// Expansions of `10^n` beyond this many digits are refused when converting a
/// decimal to an integer.
const MAX_EXPANSION_DIGITS: u32 = 10_000;

/// Lexical category of a completed number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberLexeme<'a> {
    /// No `.` and no exponent.
    Integer(&'a str),
    /// Has `.` or exponent.
    Decimal(&'a str),
}

impl<'a> NumberLexeme<'a> {
    pub(crate) fn classify(lexeme: &'a str) -> Self {
        if lexeme.bytes().any(|b| matches!(b, b'.' | b'e' | b'E')) {
            Self::Decimal(lexeme)
        } else {
            Self::Integer(lexeme)
        }
    }

    pub(crate) fn as_str(&self) -> &'a str {
        match self {
            Self::Integer(s) | Self::Decimal(s) => s,
        }
    }

    /// Build the generic value: canonical zero, `Int`, `Long`, `BigInteger`
    /// or `Decimal`.
    pub(crate) fn to_value(self) -> Result<JsonValue, ErrorReason> {
        match self {
            Self::Integer("0") => Ok(JsonValue::Int(0)),
            Self::Integer(s) => {
                if let Ok(i) = s.parse::<i32>() {
                    Ok(JsonValue::Int(i))
                } else if let Ok(l) = s.parse::<i64>() {
                    Ok(JsonValue::Long(l))
                } else {
                    s.parse::<BigInt>()
                        .map(JsonValue::BigInteger)
                        .map_err(|_| ErrorReason::IllegalNumber)
                }
            }
            Self::Decimal(s) => s.parse::<Decimal>().map(JsonValue::Decimal),
        }
    }
}

/// An exact decimal number: `unscaled × 10^-scale`.
///
/// Equality is representation-sensitive, so `1.0` and `1.00` differ (they
/// carry different scales) while `1.50` and `15.0e-1` are equal.
///
/// ```rust
/// use jsonstep::Decimal;
///
/// let d: Decimal = "-12.50".parse().unwrap();
/// assert_eq!(d.scale(), 2);
/// assert_eq!(d.to_string(), "-12.50");
/// assert_eq!(d.to_f64(), -12.5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    unscaled: BigInt,
    scale: i64,
}

impl Decimal {
    /// Create a decimal from its unscaled value and scale.
    #[must_use]
    pub fn new(unscaled: BigInt, scale: i64) -> Self {
        Self { unscaled, scale }
    }

    /// The digits of the number without the decimal point.
    #[must_use]
    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    /// Number of digits after the decimal point; negative for exponents that
    /// move the point right.
    #[must_use]
    pub fn scale(&self) -> i64 {
        self.scale
    }

    /// Returns `true` if the value is zero, whatever its scale.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.unscaled.is_zero()
    }

    /// Nearest `f64`; infinite when out of range.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        // Rust float parsing is correctly rounded, so going through the
        // scientific form rounds once.
        format!("{}e{}", self.unscaled, -i128::from(self.scale))
            .parse()
            .unwrap_or(f64::NAN)
    }

    /// Nearest `f32`; infinite when out of range.
    #[must_use]
    pub fn to_f32(&self) -> f32 {
        format!("{}e{}", self.unscaled, -i128::from(self.scale))
            .parse()
            .unwrap_or(f32::NAN)
    }

    /// The value as an integer, if it has no fractional part.
    #[must_use]
    pub fn to_big_int(&self) -> Option<BigInt> {
        if self.unscaled.is_zero() {
            return Some(BigInt::zero());
        }
        if self.scale <= 0 {
            let exponent = u32::try_from(self.scale.unsigned_abs()).ok()?;
            if exponent > MAX_EXPANSION_DIGITS {
                return None;
            }
            return Some(&self.unscaled * BigInt::from(10u32).pow(exponent));
        }
        let digits = self.unscaled.magnitude().to_string().len();
        let scale = usize::try_from(self.scale).ok()?;
        if scale >= digits {
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        let divisor = BigInt::from(10u32).pow(scale as u32);
        let remainder = &self.unscaled % &divisor;
        remainder.is_zero().then(|| &self.unscaled / &divisor)
    }
}

impl From<BigInt> for Decimal {
    fn from(unscaled: BigInt) -> Self {
        Self { unscaled, scale: 0 }
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self::from(BigInt::from(value))
    }
}

impl FromStr for Decimal {
    type Err = ErrorReason;

    /// Parse a JSON number lexeme (`-?digits[.digits][(e|E)[+-]digits]`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (mantissa, exponent) = match s.find(['e', 'E']) {
            Some(at) => {
                let exponent = s[at + 1..]
                    .parse::<i64>()
                    .map_err(|_| ErrorReason::IllegalNumber)?;
                (&s[..at], exponent)
            }
            None => (s, 0),
        };
        let (negative, mantissa) = match mantissa.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, mantissa),
        };
        let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if integer.is_empty() || !integer.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(ErrorReason::IllegalNumber);
        }
        let mut digits = String::with_capacity(integer.len() + fraction.len());
        digits.push_str(integer);
        digits.push_str(fraction);
        let magnitude = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or(ErrorReason::IllegalNumber)?;
        let unscaled = if negative { -magnitude } else { magnitude };
        let fraction_len = i64::try_from(fraction.len()).map_err(|_| ErrorReason::IllegalNumber)?;
        let scale = fraction_len
            .checked_sub(exponent)
            .ok_or(ErrorReason::IllegalNumber)?;
        Ok(Self { unscaled, scale })
    }
}

impl fmt::Display for Decimal {
    /// Plain notation when the scale is positive, `<unscaled>e<exponent>`
    /// otherwise; either form parses back to an equal `Decimal`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale <= 0 {
            return write!(f, "{}e{}", self.unscaled, -i128::from(self.scale));
        }
        let digits = self.unscaled.magnitude().to_string();
        #[allow(clippy::cast_possible_truncation)]
        let scale = self.scale as usize;
        if self.unscaled.sign() == Sign::Minus {
            f.write_str("-")?;
        }
        if digits.len() > scale {
            let (integer, fraction) = digits.split_at(digits.len() - scale);
            write!(f, "{integer}.{fraction}")
        } else {
            f.write_str("0.")?;
            for _ in digits.len()..scale {
                f.write_str("0")?;
            }
            f.write_str(&digits)
        }
    }
}
