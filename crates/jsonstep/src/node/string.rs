use super::escape_buffer::UnicodeEscapeBuffer;
use crate::{
    error::{ErrorReason, ParseError},
    options::SurrogateMode,
    path::Path,
};

#[derive(Debug)]
enum State {
    Normal,
    Backslash,
    Unicode(UnicodeEscapeBuffer),
    Complete,
}

/// Scans a JSON string after its opening quote.
#[derive(Debug)]
pub(crate) struct StringNode {
    state: State,
    buffer: String,
    /// High surrogate from a `\u` escape, waiting for its low half.
    pending_high: Option<u16>,
    surrogates: SurrogateMode,
}

fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..0xDC00).contains(&unit)
}

fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..0xE000).contains(&unit)
}

impl StringNode {
    pub(crate) fn new(surrogates: SurrogateMode) -> Self {
        Self {
            state: State::Normal,
            buffer: String::new(),
            pending_high: None,
            surrogates,
        }
    }

    pub(crate) fn is_complete(&self) -> bool {
        matches!(self.state, State::Complete)
    }

    pub(crate) fn accept(&mut self, ch: char, path: &Path) -> Result<bool, ParseError> {
        let fail = |reason| ParseError::new(reason, path);
        match &mut self.state {
            State::Normal => match ch {
                '"' => {
                    self.flush_pending().map_err(fail)?;
                    self.state = State::Complete;
                }
                '\\' => self.state = State::Backslash,
                c if u32::from(c) <= 0x1F => return Err(fail(ErrorReason::IllegalStringCharacter)),
                c => {
                    self.flush_pending().map_err(fail)?;
                    self.buffer.push(c);
                }
            },
            State::Backslash => {
                let unescaped = match ch {
                    '"' => '"',
                    '\\' => '\\',
                    '/' => '/',
                    'b' => '\u{0008}',
                    'f' => '\u{000C}',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'u' => {
                        self.state = State::Unicode(UnicodeEscapeBuffer::new());
                        return Ok(true);
                    }
                    _ => return Err(fail(ErrorReason::IllegalEscape)),
                };
                self.flush_pending().map_err(fail)?;
                self.buffer.push(unescaped);
                self.state = State::Normal;
            }
            State::Unicode(escape) => {
                if let Some(unit) = escape.feed(ch).map_err(fail)? {
                    self.state = State::Normal;
                    self.code_unit(unit).map_err(fail)?;
                }
            }
            State::Complete => return Ok(false),
        }
        Ok(true)
    }

    /// Finalizing an unterminated string.
    pub(crate) fn finish(&self, path: &Path) -> Result<(), ParseError> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(ParseError::new(ErrorReason::UnexpectedEnd, path))
        }
    }

    pub(crate) fn into_string(self) -> String {
        self.buffer
    }

    /// Append one UTF-16 code unit from a `\u` escape.
    fn code_unit(&mut self, unit: u16) -> Result<(), ErrorReason> {
        if is_low_surrogate(unit) {
            if let Some(high) = self.pending_high.take() {
                let code = 0x1_0000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00);
                let ch = char::from_u32(code).ok_or(ErrorReason::IllegalUnicode)?;
                self.buffer.push(ch);
                return Ok(());
            }
            return self.lone_surrogate();
        }
        self.flush_pending()?;
        if is_high_surrogate(unit) {
            self.pending_high = Some(unit);
            return Ok(());
        }
        let ch = char::from_u32(u32::from(unit)).ok_or(ErrorReason::IllegalUnicode)?;
        self.buffer.push(ch);
        Ok(())
    }

    /// Anything other than a low surrogate escape ends a pending high half.
    fn flush_pending(&mut self) -> Result<(), ErrorReason> {
        match self.pending_high.take() {
            Some(_) => self.lone_surrogate(),
            None => Ok(()),
        }
    }

    fn lone_surrogate(&mut self) -> Result<(), ErrorReason> {
        match self.surrogates {
            SurrogateMode::Strict => Err(ErrorReason::IllegalUnicode),
            SurrogateMode::Replace => {
                self.buffer.push(char::REPLACEMENT_CHARACTER);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn scan(body: &str, mode: SurrogateMode) -> Result<String, ParseError> {
        let path = Path::root();
        let mut node = StringNode::new(mode);
        for ch in body.chars() {
            if !node.accept(ch, &path)? {
                break;
            }
        }
        node.finish(&path)?;
        Ok(node.into_string())
    }

    #[rstest]
    #[case(r#"""#, "")]
    #[case(r#"abc""#, "abc")]
    #[case(r#"\"\\\/\b\f\n\r\t""#, "\"\\/\u{8}\u{c}\n\r\t")]
    #[case(r#"\u0041\u00e9""#, "A\u{e9}")]
    #[case(r#"\uD83D\uDE02""#, "\u{1F602}")]
    #[case(r#"\ud83d\ude02""#, "\u{1F602}")]
    fn decodes(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(scan(body, SurrogateMode::Strict).unwrap(), expected);
    }

    #[rstest]
    #[case("a\u{1}\"", ErrorReason::IllegalStringCharacter)]
    #[case(r#"\x""#, ErrorReason::IllegalEscape)]
    #[case(r#"\u00G0""#, ErrorReason::IllegalUnicode)]
    #[case(r#"\uD83D""#, ErrorReason::IllegalUnicode)]
    #[case(r#"\uDE02""#, ErrorReason::IllegalUnicode)]
    #[case(r#"\uD83Dx""#, ErrorReason::IllegalUnicode)]
    #[case("abc", ErrorReason::UnexpectedEnd)]
    fn rejects(#[case] body: &str, #[case] reason: ErrorReason) {
        assert_eq!(scan(body, SurrogateMode::Strict).unwrap_err().reason(), &reason);
    }

    #[test]
    fn replaces_lone_surrogates() {
        assert_eq!(
            scan(r#"\uD83Dx\uDE02\uD83D\uDE02""#, SurrogateMode::Replace).unwrap(),
            "\u{FFFD}x\u{FFFD}😂"
        );
    }

    #[test]
    fn complete_string_does_not_consume() {
        let path = Path::root();
        let mut node = StringNode::new(SurrogateMode::Strict);
        assert!(node.accept('"', &path).unwrap());
        assert!(node.is_complete());
        assert!(!node.accept(',', &path).unwrap());
    }
}
