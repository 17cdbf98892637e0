//! Values produced under a [`Target`](crate::Target).
//!
//! A parse node hands its parent a [`Typed`] value already shaped by the
//! target it was created with, so materialization never has to re-inspect a
//! generic tree.

use core::{any::Any, fmt};

use indexmap::IndexMap;
use num_bigint::BigInt;

use crate::{
    error::ErrorReason,
    number::Decimal,
    value::{JsonValue, Map},
};

/// A constructed instance of a schema-described type.
pub struct Instance {
    type_name: &'static str,
    value: Box<dyn Any>,
}

impl Instance {
    /// Wrap a constructed value.
    pub fn new<T: 'static>(type_name: &'static str, value: T) -> Self {
        Self {
            type_name,
            value: Box::new(value),
        }
    }

    /// Name of the schema that produced the instance.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn as_any(&self) -> &dyn Any {
        self.value.as_ref()
    }

    pub(crate) fn as_any_mut(&mut self) -> &mut dyn Any {
        self.value.as_mut()
    }

    /// Recover the concrete value.
    ///
    /// # Errors
    ///
    /// Returns the instance unchanged when it holds some other type.
    pub fn downcast<T: 'static>(self) -> Result<T, Self> {
        match self.value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(value) => Err(Self {
                type_name: self.type_name,
                value,
            }),
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// A value converted to the shape of its target.
#[allow(missing_docs)]
#[derive(Debug)]
pub enum Typed {
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    BigInt(BigInt),
    Decimal(Decimal),
    Char(char),
    String(String),
    List(Vec<Typed>),
    Map(IndexMap<String, Typed>),
    /// Parsed without a specific target.
    Json(JsonValue),
    Instance(Instance),
}

impl Typed {
    /// Short description for error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Null => "null".into(),
            Self::Bool(b) => b.to_string(),
            Self::I8(v) => v.to_string(),
            Self::I16(v) => v.to_string(),
            Self::I32(v) => v.to_string(),
            Self::I64(v) => v.to_string(),
            Self::F32(v) => v.to_string(),
            Self::F64(v) => v.to_string(),
            Self::BigInt(v) => v.to_string(),
            Self::Decimal(v) => v.to_string(),
            Self::Char(c) => JsonValue::String(c.to_string()).to_string(),
            Self::String(s) => JsonValue::String(s.clone()).to_string(),
            Self::List(_) => "array".into(),
            Self::Map(_) => "object".into(),
            Self::Json(v) => v.describe(),
            Self::Instance(i) => i.type_name().into(),
        }
    }

    /// Back to the generic tree. Instances have no generic form.
    ///
    /// # Errors
    ///
    /// Fails when the value contains a constructed instance.
    pub fn into_json(self) -> Result<JsonValue, ErrorReason> {
        Ok(match self {
            Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(b),
            Self::I8(v) => JsonValue::Int(v.into()),
            Self::I16(v) => JsonValue::Int(v.into()),
            Self::I32(v) => JsonValue::Int(v),
            Self::I64(v) => JsonValue::from(v),
            // Floats have no exact decimal form here; go through their
            // shortest round-trip rendering.
            Self::F32(v) => float_to_json(v.to_string(), "f32")?,
            Self::F64(v) => float_to_json(v.to_string(), "f64")?,
            Self::BigInt(v) => JsonValue::from(v),
            Self::Decimal(v) => JsonValue::Decimal(v),
            Self::Char(c) => JsonValue::String(c.to_string()),
            Self::String(s) => JsonValue::String(s),
            Self::List(items) => JsonValue::Array(
                items
                    .into_iter()
                    .map(Typed::into_json)
                    .collect::<Result<_, _>>()?,
            ),
            Self::Map(entries) => JsonValue::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| Ok((k, v.into_json()?)))
                    .collect::<Result<Map, ErrorReason>>()?,
            ),
            Self::Json(v) => v,
            Self::Instance(i) => return Err(ErrorReason::cannot_deserialize(i.type_name(), "JsonValue")),
        })
    }
}

fn float_to_json(rendered: String, kind: &str) -> Result<JsonValue, ErrorReason> {
    if rendered.contains(['.', 'e', 'E']) {
        rendered.parse::<Decimal>().map(JsonValue::Decimal)
    } else {
        // Whole floats render without a point; keep them decimal.
        format!("{rendered}.0")
            .parse::<Decimal>()
            .map(JsonValue::Decimal)
            .map_err(|_| ErrorReason::cannot_deserialize(rendered, kind))
    }
}
