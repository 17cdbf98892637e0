use core::mem;

use super::{
    array::{ArrayNode, Collect},
    is_whitespace,
    literal::KeywordNode,
    number::NumberNode,
    object::{ObjectNode, ObjectTarget},
    string::StringNode,
};
use crate::{
    error::{ErrorReason, ParseError},
    options::ParserOptions,
    path::Path,
    schema::Target,
    typed::Typed,
    value::JsonValue,
};

#[derive(Debug)]
enum State {
    /// Skipping whitespace before the first significant character.
    Initial,
    String(StringNode),
    Number(NumberNode),
    Keyword(KeywordNode),
    Array(Box<ArrayNode>, bool),
    Object(Box<ObjectNode>),
    /// Converted to the target; never changes again.
    Complete(Typed),
}

/// Dispatches on the first significant character and delegates everything
/// after it to the node for that construct.
#[derive(Debug)]
pub(crate) struct ValueNode {
    path: Path,
    target: Target,
    options: ParserOptions,
    state: State,
}

impl ValueNode {
    pub(crate) fn new(path: Path, target: Target, options: ParserOptions) -> Self {
        Self {
            path,
            target,
            options,
            state: State::Initial,
        }
    }

    pub(crate) fn is_complete(&self) -> bool {
        matches!(self.state, State::Complete(_))
    }

    pub(crate) fn accept(&mut self, ch: char) -> Result<bool, ParseError> {
        let consumed = match &mut self.state {
            State::Initial if is_whitespace(ch) => return Ok(true),
            State::Initial => {
                self.state = self.dispatch(ch)?;
                true
            }
            State::String(node) => node.accept(ch, &self.path)?,
            State::Number(node) => node.accept(ch, &self.path)?,
            State::Keyword(node) => node.accept(ch, &self.path)?,
            State::Array(node, _) => node.accept(ch)?,
            State::Object(node) => node.accept(ch)?,
            State::Complete(_) => return Ok(false),
        };
        self.settle()?;
        Ok(consumed)
    }

    /// End of input.
    pub(crate) fn finish(&mut self) -> Result<(), ParseError> {
        match &mut self.state {
            State::Initial => return Err(self.error(ErrorReason::UnexpectedEnd)),
            State::String(node) => node.finish(&self.path)?,
            State::Number(node) => node.finish(&self.path)?,
            State::Keyword(node) => node.finish(&self.path)?,
            State::Array(node, _) => node.finish()?,
            State::Object(node) => node.finish()?,
            State::Complete(_) => {}
        }
        self.settle()
    }

    /// The finished value.
    pub(crate) fn into_typed(self) -> Result<Typed, ParseError> {
        match self.state {
            State::Complete(value) => Ok(value),
            _ => Err(ParseError::new(ErrorReason::NotComplete, &self.path)),
        }
    }

    fn error(&self, reason: ErrorReason) -> ParseError {
        ParseError::new(reason, &self.path)
    }

    fn dispatch(&self, ch: char) -> Result<State, ParseError> {
        if matches!(ch, '{' | '[') && self.path.items().len() >= self.options.max_depth {
            return Err(self.error(ErrorReason::NestingTooDeep));
        }
        let state = match ch {
            '{' => {
                let target = ObjectTarget::for_target(&self.target).ok_or_else(|| {
                    self.error(ErrorReason::cannot_deserialize("object", &self.target))
                })?;
                State::Object(Box::new(ObjectNode::new(self.path.clone(), target, self.options)))
            }
            '[' => {
                let (element, generic) = match self.target.non_null() {
                    Target::Any => (Target::Any, true),
                    Target::List(inner) => ((**inner).clone(), false),
                    _ => {
                        return Err(self.error(ErrorReason::cannot_deserialize("array", &self.target)));
                    }
                };
                let node = ArrayNode::new(self.path.clone(), element, self.options, Collect::default(), true);
                State::Array(Box::new(node), generic)
            }
            '"' => State::String(StringNode::new(self.options.surrogates)),
            '-' | '0'..='9' => State::Number(NumberNode::new(ch)),
            _ => State::Keyword(KeywordNode::new(ch).ok_or_else(|| self.error(ErrorReason::IllegalSyntax))?),
        };
        Ok(state)
    }

    /// Convert the delegate's result once it is complete.
    fn settle(&mut self) -> Result<(), ParseError> {
        let done = match &self.state {
            State::String(node) => node.is_complete(),
            State::Number(node) => node.is_complete(),
            State::Keyword(node) => node.is_complete(),
            State::Array(node, _) => node.is_complete(),
            State::Object(node) => node.is_complete(),
            State::Initial | State::Complete(_) => false,
        };
        if !done {
            return Ok(());
        }
        let converted = match mem::replace(&mut self.state, State::Initial) {
            State::String(node) => self
                .target
                .convert(JsonValue::String(node.into_string()), &self.options),
            State::Number(node) => self.target.convert_number(node.lexeme(), &self.options),
            State::Keyword(node) => self.target.convert(node.into_value(), &self.options),
            State::Array(node, generic) => node.into_typed(generic),
            State::Object(node) => node.into_typed(),
            State::Initial | State::Complete(_) => return Ok(()),
        };
        let value = converted.map_err(|reason| self.error(reason))?;
        self.state = State::Complete(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn parse(input: &str, target: Target) -> Result<Typed, ParseError> {
        let mut node = ValueNode::new(Path::root(), target, ParserOptions::default());
        for ch in input.chars() {
            if !node.accept(ch)? {
                break;
            }
        }
        node.finish()?;
        node.into_typed()
    }

    #[rstest]
    #[case(" null", "null")]
    #[case("true", "true")]
    #[case("\t\r\n-12", "-12")]
    #[case(r#""x""#, r#""x""#)]
    #[case(r#"[1,{"a":[]}]"#, r#"[1,{"a":[]}]"#)]
    fn generic_values(#[case] input: &str, #[case] expected: &str) {
        let value = parse(input, Target::Any).unwrap().into_json().unwrap();
        assert_eq!(value.to_string(), expected);
    }

    #[rstest]
    #[case("abc", ErrorReason::IllegalSyntax)]
    #[case("", ErrorReason::UnexpectedEnd)]
    #[case("   ", ErrorReason::UnexpectedEnd)]
    #[case("[", ErrorReason::UnexpectedEndInArray)]
    fn dispatch_errors(#[case] input: &str, #[case] reason: ErrorReason) {
        assert_eq!(parse(input, Target::Any).unwrap_err().reason(), &reason);
    }

    #[test]
    fn container_shape_is_checked_on_open() {
        let err = parse("[1]", Target::I32).unwrap_err();
        assert_eq!(err.to_string(), "cannot deserialize array as i32");
        let err = parse("{}", Target::List(Box::new(Target::I32))).unwrap_err();
        assert_eq!(err.to_string(), "cannot deserialize object as Vec<i32>");
    }

    #[test]
    fn null_needs_nullable_target() {
        assert!(matches!(
            parse("null", Target::Nullable(Box::new(Target::I32))).unwrap(),
            Typed::Null
        ));
        let err = parse("null", Target::I32).unwrap_err();
        assert_eq!(err.to_string(), "cannot deserialize null as i32");
    }

    #[test]
    fn result_before_completion_fails() {
        let mut node = ValueNode::new(Path::root(), Target::Any, ParserOptions::default());
        node.accept('1').unwrap();
        assert!(!node.is_complete());
        assert_eq!(node.into_typed().unwrap_err().reason(), &ErrorReason::NotComplete);
    }
}
