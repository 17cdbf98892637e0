//! Target types: what a parse should produce.
//!
//! A [`Target`] is handed to every parse node when it is created. Scalar
//! nodes convert their finished value through it, containers use it to pick
//! the target of each child, and object nodes hand their members to the
//! materializer when the target is a schema-described type.
//!
//! Types opt in by implementing [`FromJson`]. Implementations are provided for
//! the primitive types, [`String`], [`BigInt`], [`Decimal`], [`Option`],
//! [`Vec`], [`IndexMap`] with string keys, and [`JsonValue`] (any JSON).

pub(crate) mod object;

use core::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use num_bigint::BigInt;
use num_traits::ToPrimitive;

pub use object::{Arguments, MemberInfo, ObjectSchema, Parameter, ParameterKind, SchemaBuilder};

use crate::{
    error::ErrorReason,
    materialize,
    number::{Decimal, NumberLexeme},
    options::ParserOptions,
    typed::{Instance, Typed},
    value::JsonValue,
};

/// The shape a parsed value is converted to.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub enum Target {
    /// Any JSON; produces a [`JsonValue`].
    Any,
    Bool,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    BigInt,
    Decimal,
    /// A string of exactly one character.
    Char,
    String,
    /// `null` or the inner target.
    Nullable(Box<Target>),
    /// A JSON array of the inner target.
    List(Box<Target>),
    /// A JSON object used as a keyed map of the inner target.
    Map(Box<Target>),
    /// A JSON object materialized through a schema.
    Object(Arc<ObjectSchema>),
    /// A scalar turned into a user type; see [`Target::parsed`].
    Parsed(Arc<ParsedTarget>),
}

type Parse = Box<dyn Fn(Typed) -> Result<Instance, ErrorReason> + Send + Sync>;

/// A scalar target whose converted value is handed to a user function.
pub struct ParsedTarget {
    name: &'static str,
    inner: Target,
    parse: Parse,
}

impl ParsedTarget {
    /// The type name used in messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The scalar target parsed before `parse` runs.
    #[must_use]
    pub fn inner(&self) -> &Target {
        &self.inner
    }

    fn apply(&self, value: Typed) -> Result<Typed, ErrorReason> {
        (self.parse)(value).map(Typed::Instance)
    }
}

impl fmt::Debug for ParsedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsedTarget")
            .field("name", &self.name)
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("JsonValue"),
            Self::Bool => f.write_str("bool"),
            Self::I8 => f.write_str("i8"),
            Self::I16 => f.write_str("i16"),
            Self::I32 => f.write_str("i32"),
            Self::I64 => f.write_str("i64"),
            Self::F32 => f.write_str("f32"),
            Self::F64 => f.write_str("f64"),
            Self::BigInt => f.write_str("BigInt"),
            Self::Decimal => f.write_str("Decimal"),
            Self::Char => f.write_str("char"),
            Self::String => f.write_str("String"),
            Self::Nullable(inner) => write!(f, "Option<{inner}>"),
            Self::List(inner) => write!(f, "Vec<{inner}>"),
            Self::Map(inner) => write!(f, "IndexMap<String, {inner}>"),
            Self::Object(schema) => f.write_str(schema.name()),
            Self::Parsed(parsed) => f.write_str(parsed.name),
        }
    }
}

/// Integral value of a number, if its category is integral.
fn integral(value: &JsonValue) -> Option<BigInt> {
    match value {
        JsonValue::Int(i) => Some(BigInt::from(*i)),
        JsonValue::Long(l) => Some(BigInt::from(*l)),
        JsonValue::BigInteger(b) => Some(b.clone()),
        _ => None,
    }
}

macro_rules! narrow {
    ($value:expr, $target:expr, $ty:ty, $variant:ident) => {
        integral(&$value)
            .and_then(|b| <$ty>::try_from(b).ok())
            .map(Typed::$variant)
            .ok_or_else(|| ErrorReason::cannot_deserialize($value.describe(), $target))
    };
}

impl Target {
    /// Whether a missing value may be treated as `null`.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Any | Self::Nullable(_))
    }

    /// A target for values written as a `V` scalar and built by `parse`,
    /// such as an enum named by a string. Failures from `parse` are reported
    /// at the value's path; use [`ErrorReason::Invalid`] for them.
    ///
    /// Arrays and objects never match a parsed target.
    #[must_use]
    pub fn parsed<T, V, F>(name: &'static str, parse: F) -> Self
    where
        T: 'static,
        V: FromJson,
        F: Fn(V) -> Result<T, ErrorReason> + Send + Sync + 'static,
    {
        Self::Parsed(Arc::new(ParsedTarget {
            name,
            inner: V::target(),
            parse: Box::new(move |typed| parse(V::from_typed(typed)?).map(|value| Instance::new(name, value))),
        }))
    }

    /// The target with any [`Nullable`](Target::Nullable) layers removed.
    pub(crate) fn non_null(&self) -> &Target {
        match self {
            Self::Nullable(inner) => inner.non_null(),
            other => other,
        }
    }

    /// Convert a finished number lexeme.
    pub(crate) fn convert_number(
        &self,
        lexeme: NumberLexeme<'_>,
        options: &ParserOptions,
    ) -> Result<Typed, ErrorReason> {
        match self.non_null() {
            Self::Parsed(parsed) => parsed.apply(parsed.inner.convert_number(lexeme, options)?),
            // Parse floats from the lexeme itself so rounding happens once.
            Self::F64 => lexeme
                .as_str()
                .parse()
                .map(Typed::F64)
                .map_err(|_| ErrorReason::IllegalNumber),
            Self::F32 => lexeme
                .as_str()
                .parse()
                .map(Typed::F32)
                .map_err(|_| ErrorReason::IllegalNumber),
            _ => self.convert(lexeme.to_value()?, options),
        }
    }

    /// Convert a generic value, failing on any shape or range mismatch.
    pub(crate) fn convert(&self, value: JsonValue, options: &ParserOptions) -> Result<Typed, ErrorReason> {
        match self {
            Self::Any => return Ok(Typed::Json(value)),
            Self::Parsed(parsed) => return parsed.apply(parsed.inner.convert(value, options)?),
            Self::Nullable(_) if value.is_null() => return Ok(Typed::Null),
            Self::Nullable(inner) => return inner.convert(value, options),
            _ => {}
        }
        let mismatch = || ErrorReason::cannot_deserialize(value.describe(), self);
        match self {
            Self::Bool => value.as_bool().map(Typed::Bool).ok_or_else(mismatch),
            Self::I8 => narrow!(value, self, i8, I8),
            Self::I16 => narrow!(value, self, i16, I16),
            Self::I32 => narrow!(value, self, i32, I32),
            Self::I64 => narrow!(value, self, i64, I64),
            Self::F32 | Self::F64 => {
                let wide = match &value {
                    JsonValue::Int(i) => Some(f64::from(*i)),
                    #[allow(clippy::cast_precision_loss)]
                    JsonValue::Long(l) => Some(*l as f64),
                    JsonValue::BigInteger(b) => b.to_f64(),
                    JsonValue::Decimal(d) if matches!(self, Self::F32) => {
                        return Ok(Typed::F32(d.to_f32()));
                    }
                    JsonValue::Decimal(d) => Some(d.to_f64()),
                    _ => None,
                }
                .ok_or_else(mismatch)?;
                #[allow(clippy::cast_possible_truncation)]
                let typed = if matches!(self, Self::F32) {
                    Typed::F32(wide as f32)
                } else {
                    Typed::F64(wide)
                };
                Ok(typed)
            }
            Self::BigInt => match &value {
                JsonValue::Decimal(d) => d.to_big_int().map(Typed::BigInt).ok_or_else(mismatch),
                other => integral(other).map(Typed::BigInt).ok_or_else(mismatch),
            },
            Self::Decimal => match &value {
                JsonValue::Decimal(d) => Ok(Typed::Decimal(d.clone())),
                other => integral(other)
                    .map(|b| Typed::Decimal(Decimal::from(b)))
                    .ok_or_else(mismatch),
            },
            Self::Char => {
                let mut chars = value.as_str().ok_or_else(mismatch)?.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Typed::Char(c)),
                    _ => Err(mismatch()),
                }
            }
            Self::String => match value {
                JsonValue::String(s) => Ok(Typed::String(s)),
                other => Err(ErrorReason::cannot_deserialize(other.describe(), self)),
            },
            Self::List(inner) => match value {
                JsonValue::Array(items) => items
                    .into_iter()
                    .map(|item| inner.convert(item, options))
                    .collect::<Result<_, _>>()
                    .map(Typed::List),
                other => Err(ErrorReason::cannot_deserialize(other.describe(), self)),
            },
            Self::Map(inner) => match value {
                JsonValue::Object(members) => members
                    .into_iter()
                    .map(|(k, v)| Ok((k, inner.convert(v, options)?)))
                    .collect::<Result<_, ErrorReason>>()
                    .map(Typed::Map),
                other => Err(ErrorReason::cannot_deserialize(other.describe(), self)),
            },
            Self::Object(schema) => match value {
                JsonValue::Object(members) => {
                    let entries = members
                        .into_iter()
                        .map(|(k, v)| {
                            let target = schema.value_target(&k);
                            Ok((k, target.convert(v, options)?))
                        })
                        .collect::<Result<IndexMap<_, _>, ErrorReason>>()?;
                    materialize::materialize(schema, entries, options).map(Typed::Instance)
                }
                other => Err(ErrorReason::cannot_deserialize(other.describe(), self)),
            },
            Self::Any | Self::Nullable(_) | Self::Parsed(_) => Ok(Typed::Json(value)),
        }
    }
}

/// Reshape a generic value into `target` so the typed variant can be matched.
fn reshape(value: Typed, target: &Target) -> Result<Typed, ErrorReason> {
    match value {
        Typed::Json(json) if !matches!(target, Target::Any) => {
            target.convert(json, &ParserOptions::default())
        }
        other => Ok(other),
    }
}

/// A type that can be produced by the parser.
///
/// `target` describes the expected JSON shape; `from_typed` takes the value
/// the parse nodes built for that target. Types described by an
/// [`ObjectSchema`] only need `target`:
///
/// ```rust
/// use std::sync::{Arc, OnceLock};
///
/// use jsonstep::{FromJson, ObjectSchema, Parameter, SchemaBuilder, Target};
///
/// #[derive(Debug, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl FromJson for Point {
///     fn target() -> Target {
///         static SCHEMA: OnceLock<Arc<ObjectSchema>> = OnceLock::new();
///         Target::Object(
///             SCHEMA
///                 .get_or_init(|| {
///                     SchemaBuilder::<Point>::new("Point")
///                         .constructor(
///                             [Parameter::new::<i32>("x"), Parameter::new::<i32>("y")],
///                             |args| Ok(Point { x: args.take("x")?, y: args.take("y")? }),
///                         )
///                         .build()
///                 })
///                 .clone(),
///         )
///     }
/// }
///
/// let point: Point = jsonstep::parse_str_as(r#"{"y": 2, "x": 1}"#).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// Types written as a scalar, such as enums named by strings, wrap the
/// scalar's target with [`Target::parsed`]:
///
/// ```rust
/// use jsonstep::{ErrorReason, FromJson, Target};
///
/// #[derive(Debug, PartialEq)]
/// enum Level {
///     Info,
///     Warn,
/// }
///
/// impl FromJson for Level {
///     fn target() -> Target {
///         Target::parsed("Level", |name: String| match name.as_str() {
///             "info" => Ok(Level::Info),
///             "warn" => Ok(Level::Warn),
///             _ => Err(ErrorReason::Invalid(format!("unknown level {name:?}"))),
///         })
///     }
/// }
///
/// let levels: Vec<Level> = jsonstep::parse_str_as(r#"["warn", "info"]"#).unwrap();
/// assert_eq!(levels, [Level::Warn, Level::Info]);
/// let err = jsonstep::parse_str_as::<Vec<Level>>(r#"["debug"]"#).unwrap_err();
/// assert_eq!(err.to_string(), r#"[0]: unknown level "debug" at 1:8"#);
/// ```
pub trait FromJson: Sized + 'static {
    /// The expected JSON shape.
    fn target() -> Target;

    /// Take the value built for [`target`](FromJson::target).
    ///
    /// # Errors
    ///
    /// Fails when the value does not have the expected shape.
    fn from_typed(value: Typed) -> Result<Self, ErrorReason> {
        let target = Self::target();
        match reshape(value, &target)? {
            Typed::Instance(instance) => instance
                .downcast::<Self>()
                .map_err(|i| ErrorReason::cannot_deserialize(i.type_name(), &target)),
            other => Err(ErrorReason::cannot_deserialize(other.describe(), &target)),
        }
    }
}

macro_rules! scalar_from_json {
    ($($ty:ty => $variant:ident),+ $(,)?) => {$(
        impl FromJson for $ty {
            fn target() -> Target {
                Target::$variant
            }

            fn from_typed(value: Typed) -> Result<Self, ErrorReason> {
                match reshape(value, &Target::$variant)? {
                    Typed::$variant(v) => Ok(v),
                    other => Err(ErrorReason::cannot_deserialize(other.describe(), Target::$variant)),
                }
            }
        }
    )+};
}

scalar_from_json! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    BigInt => BigInt,
    Decimal => Decimal,
    char => Char,
    String => String,
}

impl FromJson for JsonValue {
    fn target() -> Target {
        Target::Any
    }

    fn from_typed(value: Typed) -> Result<Self, ErrorReason> {
        value.into_json()
    }
}

impl<T: FromJson> FromJson for Option<T> {
    fn target() -> Target {
        match T::target() {
            nullable if nullable.is_nullable() => nullable,
            inner => Target::Nullable(Box::new(inner)),
        }
    }

    fn from_typed(value: Typed) -> Result<Self, ErrorReason> {
        match value {
            Typed::Null | Typed::Json(JsonValue::Null) => Ok(None),
            other => T::from_typed(other).map(Some),
        }
    }
}

impl<T: FromJson> FromJson for Vec<T> {
    fn target() -> Target {
        Target::List(Box::new(T::target()))
    }

    fn from_typed(value: Typed) -> Result<Self, ErrorReason> {
        let target = Self::target();
        match reshape(value, &target)? {
            Typed::List(items) => items.into_iter().map(T::from_typed).collect(),
            other => Err(ErrorReason::cannot_deserialize(other.describe(), target)),
        }
    }
}

impl<T: FromJson> FromJson for IndexMap<String, T> {
    fn target() -> Target {
        Target::Map(Box::new(T::target()))
    }

    fn from_typed(value: Typed) -> Result<Self, ErrorReason> {
        let target = Self::target();
        match reshape(value, &target)? {
            Typed::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Ok((k, T::from_typed(v)?)))
                .collect(),
            other => Err(ErrorReason::cannot_deserialize(other.describe(), target)),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn convert(target: &Target, json: &str) -> Result<Typed, ErrorReason> {
        let value = crate::parse_str(json).unwrap();
        target.convert(value, &ParserOptions::default())
    }

    #[rstest]
    #[case(Target::I8, "127")]
    #[case(Target::I16, "-32768")]
    #[case(Target::I64, "9223372036854775807")]
    #[case(Target::BigInt, "1e3")]
    #[case(Target::Decimal, "12")]
    #[case(Target::F32, "1.5")]
    #[case(Target::Char, r#""x""#)]
    #[case(Target::Nullable(Box::new(Target::I32)), "null")]
    fn converts_in_range(#[case] target: Target, #[case] json: &str) {
        assert!(convert(&target, json).is_ok(), "{json} as {target}");
    }

    #[rstest]
    #[case(Target::I8, "128", "cannot deserialize 128 as i8")]
    #[case(Target::I32, "1.5", "cannot deserialize 1.5 as i32")]
    #[case(Target::I32, "null", "cannot deserialize null as i32")]
    #[case(Target::BigInt, "1.5", "cannot deserialize 1.5 as BigInt")]
    #[case(Target::Char, r#""xy""#, r#"cannot deserialize "xy" as char"#)]
    #[case(Target::String, "[]", "cannot deserialize array as String")]
    #[case(
        Target::List(Box::new(Target::Bool)),
        "[true, 0]",
        "cannot deserialize 0 as bool"
    )]
    fn rejects_mismatches(#[case] target: Target, #[case] json: &str, #[case] message: &str) {
        assert_eq!(convert(&target, json).unwrap_err().to_string(), message);
    }

    #[test]
    fn target_names() {
        assert_eq!(<Option<Vec<i32>>>::target().to_string(), "Option<Vec<i32>>");
        assert_eq!(
            <IndexMap<String, char>>::target().to_string(),
            "IndexMap<String, char>"
        );
        assert_eq!(<Option<JsonValue>>::target().to_string(), "JsonValue");
    }

    #[test]
    fn from_typed_reshapes_generic_values() {
        let json = crate::parse_str("[1, 2, 3]").unwrap();
        let list = <Vec<i64>>::from_typed(Typed::Json(json)).unwrap();
        assert_eq!(list, [1, 2, 3]);
        assert_eq!(<Option<String>>::from_typed(Typed::Null).unwrap(), None);
    }
}
