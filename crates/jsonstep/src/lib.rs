//! An incremental JSON parser that consumes one Unicode code point at a time.
//!
//! Input never has to be resident as a whole: feed characters as they arrive
//! from a socket, a chunked decoder or any other source, and collect either a
//! generic [`JsonValue`] or, guided by a [`Target`], a typed structure built
//! directly from the parse.
//!
//! ```rust
//! use jsonstep::{JsonStream, JsonValue};
//!
//! let mut stream = JsonStream::<Vec<i32>>::new();
//! for chunk in ["[1, ", "2, 3", "]"] {
//!     stream.feed(chunk).unwrap();
//! }
//! assert_eq!(stream.finish().unwrap(), [1, 2, 3]);
//!
//! let value: JsonValue = jsonstep::parse_str(r#"{"a": 0.50}"#).unwrap();
//! assert_eq!(value.to_string(), r#"{"a":0.50}"#);
//! ```

mod error;
mod materialize;
mod node;
mod number;
mod options;
mod path;
mod schema;
mod stream;
mod typed;
mod value;

#[cfg(test)]
mod tests;

pub use error::{ErrorReason, ParseError, Position};
pub use num_bigint::BigInt;
pub use number::Decimal;
pub use options::{ParserOptions, SurrogateMode};
pub use path::{Path, PathItem, PathItemFrom};
pub use schema::{
    Arguments, FromJson, MemberInfo, ObjectSchema, Parameter, ParameterKind, ParsedTarget, SchemaBuilder, Target,
};
pub use stream::{ArrayStream, JsonStream};
pub use typed::{Instance, Typed};
pub use value::{JsonValue, Map};

/// Parse a complete document into a generic value.
///
/// # Errors
///
/// Returns the first error in the document.
pub fn parse_str(input: &str) -> Result<JsonValue, ParseError> {
    parse_str_as(input)
}

/// Parse a complete document into `T`.
///
/// # Errors
///
/// Returns the first error in the document, including values that do not fit
/// `T`.
pub fn parse_str_as<T: FromJson>(input: &str) -> Result<T, ParseError> {
    let mut stream = JsonStream::<T>::new();
    stream.feed(input)?;
    stream.finish()
}

/// Convert an already parsed value into `T`.
///
/// # Errors
///
/// Fails when the value does not fit `T`.
pub fn from_value<T: FromJson>(value: JsonValue) -> Result<T, ParseError> {
    T::from_typed(Typed::Json(value)).map_err(|reason| ParseError::new(reason, &Path::root()))
}
