use core::fmt;

use thiserror::Error;

use crate::path::Path;

/// Location of the code point that triggered a failure.
///
/// `offset` counts code points from the start of the document (0-based, the
/// byte-order mark included); `line` and `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Number of code points accepted before the offending one.
    pub offset: usize,
    /// Line of the offending code point.
    pub line: usize,
    /// Column of the offending code point.
    pub column: usize,
}

impl Position {
    pub(crate) fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    pub(crate) fn advance(&mut self, ch: char) {
        self.offset += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

/// Why a document was rejected.
#[allow(missing_docs)]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorReason {
    #[error("illegal syntax in JSON")]
    IllegalSyntax,
    #[error("illegal character in JSON string")]
    IllegalStringCharacter,
    #[error("illegal escape sequence in JSON string")]
    IllegalEscape,
    #[error("illegal Unicode sequence in JSON string")]
    IllegalUnicode,
    #[error("illegal JSON number")]
    IllegalNumber,
    #[error("illegal character in JSON keyword")]
    IllegalKeyword,
    #[error("illegal syntax in JSON array")]
    IllegalArraySyntax,
    #[error("illegal syntax in JSON object")]
    IllegalObjectSyntax,
    #[error("duplicate key {0:?} in JSON object")]
    DuplicateKey(String),
    #[error("unexpected end of data")]
    UnexpectedEnd,
    #[error("unexpected end of data in JSON array")]
    UnexpectedEndInArray,
    #[error("unexpected end of data in JSON object")]
    UnexpectedEndInObject,
    #[error("JSON nesting too deep")]
    NestingTooDeep,
    #[error("unexpected characters at end of JSON")]
    TrailingCharacters,
    #[error("pipeline must contain array")]
    ExpectedArray,
    #[error("JSON not complete")]
    NotComplete,
    #[error("cannot deserialize {found} as {target}")]
    CannotDeserialize { found: String, target: String },
    #[error("cannot construct target type {0}")]
    CannotConstruct(String),
    #[error("missing argument {0}")]
    MissingArgument(String),
    #[error("cannot set property {property} in {target}")]
    CannotSetProperty { property: String, target: String },
    #[error("cannot find property {property} in {target}")]
    CannotFindProperty { property: String, target: String },
    #[error("{0}")]
    Invalid(String),
}

impl ErrorReason {
    pub(crate) fn cannot_deserialize(found: impl Into<String>, target: impl fmt::Display) -> Self {
        Self::CannotDeserialize {
            found: found.into(),
            target: target.to_string(),
        }
    }

    /// Returns `true` for the "unexpected end of data" family.
    #[must_use]
    pub fn is_end_of_data(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedEnd | Self::UnexpectedEndInArray | Self::UnexpectedEndInObject
        )
    }
}

/// The single "malformed input" error.
///
/// Carries the [`ErrorReason`], the structural [`Path`] of the construct that
/// was being parsed and, once the error has passed through a root stream, the
/// [`Position`] of the code point that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    reason: ErrorReason,
    path: Path,
    position: Option<Position>,
}

impl ParseError {
    pub(crate) fn new(reason: ErrorReason, path: &Path) -> Self {
        Self {
            reason,
            path: path.clone(),
            position: None,
        }
    }

    /// Attach the position unless an inner layer already did.
    pub(crate) fn at(mut self, position: Position) -> Self {
        self.position.get_or_insert(position);
        self
    }

    /// The failure category.
    #[must_use]
    pub fn reason(&self) -> &ErrorReason {
        &self.reason
    }

    /// The structural location, e.g. `field1.field2[3]`.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The position of the offending code point, if known.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.position
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.path.is_empty() {
            write!(f, "{}: ", self.path)?;
        }
        self.reason.fmt(f)?;
        if let Some(position) = self.position {
            write!(f, " at {}:{}", position.line, position.column)?;
        }
        Ok(())
    }
}

impl core::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;

    #[test]
    fn display_includes_path_and_position() {
        let err = ParseError::new(ErrorReason::IllegalNumber, &path!["field1", "field2", 3]).at(
            Position {
                offset: 10,
                line: 2,
                column: 4,
            },
        );
        assert_eq!(err.to_string(), "field1.field2[3]: illegal JSON number at 2:4");
    }

    #[test]
    fn first_position_wins() {
        let first = Position::start();
        let mut second = first;
        second.advance('x');
        let err = ParseError::new(ErrorReason::UnexpectedEnd, &Path::root())
            .at(first)
            .at(second);
        assert_eq!(err.position(), Some(first));
        assert_eq!(err.to_string(), "unexpected end of data at 1:1");
    }

    #[test]
    fn newline_advances_line() {
        let mut position = Position::start();
        for ch in "ab\nc".chars() {
            position.advance(ch);
        }
        assert_eq!(
            position,
            Position {
                offset: 4,
                line: 2,
                column: 2
            }
        );
    }
}
