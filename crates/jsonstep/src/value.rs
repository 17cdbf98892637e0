//! JSON value types and utilities.
//!
//! This module defines the [`JsonValue`] enum, the generic output of the
//! parser, and the escaping helpers used by its `Display` implementation.

use indexmap::IndexMap;
use num_bigint::BigInt;

use crate::number::Decimal;

/// A JSON object: keys are unique and keep their insertion order.
pub type Map = IndexMap<String, JsonValue>;

/// A parsed JSON value as defined by [RFC 8259].
///
/// Numbers keep the category of their lexeme: integral lexemes become
/// [`Int`](JsonValue::Int), [`Long`](JsonValue::Long) or
/// [`BigInteger`](JsonValue::BigInteger) depending on magnitude, and lexemes
/// with a fraction or exponent become an exact [`Decimal`].
///
/// # Examples
///
/// ```
/// use jsonstep::{JsonValue, Map};
///
/// let mut map = Map::new();
/// map.insert("key".to_string(), JsonValue::String("value".into()));
/// map.insert("n".to_string(), JsonValue::Int(1));
/// let v = JsonValue::Object(map);
/// assert_eq!(v.to_string(), r#"{"key":"value","n":1}"#);
/// ```
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum JsonValue {
    /// `null`
    #[default]
    Null,
    /// `true` or `false`
    Bool(bool),
    /// An integral number that fits in 32 bits.
    Int(i32),
    /// An integral number that fits in 64 bits but not in 32.
    Long(i64),
    /// An integral number wider than 64 bits.
    BigInteger(BigInt),
    /// A number with a fraction or an exponent.
    Decimal(Decimal),
    /// A string.
    String(String),
    /// An array.
    Array(Vec<JsonValue>),
    /// An object.
    Object(Map),
}

impl From<bool> for JsonValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for JsonValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for JsonValue {
    /// Picks the narrowest integral category, like the number scanner does.
    fn from(v: i64) -> Self {
        match i32::try_from(v) {
            Ok(i) => Self::Int(i),
            Err(_) => Self::Long(v),
        }
    }
}

impl From<BigInt> for JsonValue {
    /// Picks the narrowest integral category, like the number scanner does.
    fn from(v: BigInt) -> Self {
        match i64::try_from(&v) {
            Ok(l) => Self::from(l),
            Err(_) => Self::BigInteger(v),
        }
    }
}

impl From<Decimal> for JsonValue {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<String> for JsonValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for JsonValue {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(v: Vec<JsonValue>) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for JsonValue {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl JsonValue {
    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: JsonValue::Null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for any of the numeric variants.
    ///
    /// ```
    /// use jsonstep::JsonValue;
    ///
    /// assert!(JsonValue::Int(42).is_number());
    /// assert!(!JsonValue::Null.is_number());
    /// ```
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Self::Int(..) | Self::Long(..) | Self::BigInteger(..) | Self::Decimal(..)
        )
    }

    /// The boolean, if this is [`Bool`](JsonValue::Bool).
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer, if this is an `Int` or a `Long`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(i64::from(*i)),
            Self::Long(l) => Some(*l),
            _ => None,
        }
    }

    /// The string slice, if this is a [`String`](JsonValue::String).
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The elements, if this is an [`Array`](JsonValue::Array).
    #[must_use]
    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// The members, if this is an [`Object`](JsonValue::Object).
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Look up an object member.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.as_object()?.get(key)
    }

    /// Short description used in conversion errors: scalars render as JSON,
    /// containers by kind.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Array(_) => "array".into(),
            Self::Object(_) => "object".into(),
            other => other.to_string(),
        }
    }
}

/// Escapes control characters in a string for inclusion in a JSON string literal.
///
/// This function writes to the provided formatter, replacing characters such as
/// quotes, backslashes, control characters (<= U+001F), and Unicode line separators
/// with their JSON escape sequences.
pub(crate) fn write_escaped_string<W: core::fmt::Write>(src: &str, f: &mut W) -> core::fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            // Escape Unicode line separators which pre-2019 JSON parsers may not handle correctly
            '\u{2028}' | '\u{2029}' => {
                write!(f, "\\u{:04X}", c as u32)?;
            }
            // Remaining control characters are all inside the BMP, so the
            // four-digit form suffices.
            c if c.is_control() => {
                write!(f, "\\u{:04X}", c as u32)?;
            }
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

impl core::fmt::Display for JsonValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            JsonValue::Null => f.write_str("null"),
            JsonValue::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            JsonValue::Int(i) => write!(f, "{i}"),
            JsonValue::Long(l) => write!(f, "{l}"),
            JsonValue::BigInteger(b) => write!(f, "{b}"),
            JsonValue::Decimal(d) => write!(f, "{d}"),
            JsonValue::String(s) => {
                f.write_str("\"")?;
                write_escaped_string(s, f)?;
                f.write_str("\"")
            }
            JsonValue::Array(arr) => {
                f.write_str("[")?;
                let mut first = true;
                for v in arr {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            JsonValue::Object(map) => {
                f.write_str("{")?;
                let mut first = true;
                for (k, v) in map {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    f.write_str("\"")?;
                    write_escaped_string(k, f)?;
                    write!(f, "\":{v}")?;
                }
                f.write_str("}")
            }
        }
    }
}
