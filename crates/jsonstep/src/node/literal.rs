use crate::{
    error::{ErrorReason, ParseError},
    path::Path,
    value::JsonValue,
};

/// Matches `true`, `false` or `null` one character at a time.
///
/// Created by the value dispatcher after it has seen the first character, so
/// only the remaining bytes of the literal are tracked.
#[derive(Debug)]
pub(crate) struct KeywordNode {
    remaining: &'static [u8],
    value: JsonValue,
}

impl KeywordNode {
    /// Start matching after the dispatch character (`n`, `t` or `f`).
    pub(crate) fn new(first: char) -> Option<Self> {
        let (remaining, value): (&'static [u8], _) = match first {
            'n' => (b"ull", JsonValue::Null),
            't' => (b"rue", JsonValue::Bool(true)),
            'f' => (b"alse", JsonValue::Bool(false)),
            _ => return None,
        };
        Some(Self { remaining, value })
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Always consumes while incomplete; a complete keyword never does.
    pub(crate) fn accept(&mut self, ch: char, path: &Path) -> Result<bool, ParseError> {
        let Some((expected, rest)) = self.remaining.split_first() else {
            return Ok(false);
        };
        if char::from(*expected) != ch {
            return Err(ParseError::new(ErrorReason::IllegalKeyword, path));
        }
        self.remaining = rest;
        Ok(true)
    }

    pub(crate) fn finish(&self, path: &Path) -> Result<(), ParseError> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(ParseError::new(ErrorReason::UnexpectedEnd, path))
        }
    }

    pub(crate) fn into_value(self) -> JsonValue {
        self.value
    }
}
