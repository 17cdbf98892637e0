use crate::{
    error::{ErrorReason, ParseError},
    number::NumberLexeme,
    path::Path,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    MinusSeen,
    ZeroSeen,
    Integer,
    DotSeen,
    Fraction,
    ESeen,
    ESignSeen,
    Exponent,
    Complete,
}

/// Scans a JSON number. Completes on the first character that cannot extend
/// it, leaving that character unconsumed.
#[derive(Debug)]
pub(crate) struct NumberNode {
    state: State,
    lexeme: String,
}

impl NumberNode {
    /// Seeded with the dispatch character, `-` or a digit.
    pub(crate) fn new(first: char) -> Self {
        let state = match first {
            '-' => State::MinusSeen,
            '0' => State::ZeroSeen,
            _ => State::Integer,
        };
        Self {
            state,
            lexeme: String::from(first),
        }
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.state == State::Complete
    }

    pub(crate) fn accept(&mut self, ch: char, path: &Path) -> Result<bool, ParseError> {
        let illegal = || ParseError::new(ErrorReason::IllegalNumber, path);
        let digit = ch.is_ascii_digit();
        self.state = match (self.state, ch) {
            (State::MinusSeen, '0') => State::ZeroSeen,
            (State::MinusSeen, _) if digit => State::Integer,
            (State::MinusSeen | State::DotSeen | State::ESignSeen, _) if !digit => return Err(illegal()),
            (State::ZeroSeen | State::Integer, '.') => State::DotSeen,
            (State::ZeroSeen | State::Integer | State::Fraction, 'e' | 'E') => State::ESeen,
            (State::Integer, _) if digit => State::Integer,
            (State::DotSeen | State::Fraction, _) if digit => State::Fraction,
            (State::ESeen, '+' | '-') => State::ESignSeen,
            (State::ESeen | State::ESignSeen | State::Exponent, _) if digit => State::Exponent,
            (State::ESeen, _) => return Err(illegal()),
            _ => {
                self.state = State::Complete;
                return Ok(false);
            }
        };
        self.lexeme.push(ch);
        Ok(true)
    }

    /// End of input completes the number unless it is missing digits.
    pub(crate) fn finish(&mut self, path: &Path) -> Result<(), ParseError> {
        match self.state {
            State::MinusSeen | State::DotSeen | State::ESeen | State::ESignSeen => {
                Err(ParseError::new(ErrorReason::IllegalNumber, path))
            }
            _ => {
                self.state = State::Complete;
                Ok(())
            }
        }
    }

    pub(crate) fn lexeme(&self) -> NumberLexeme<'_> {
        NumberLexeme::classify(&self.lexeme)
    }
}
