use super::{is_whitespace, value::ValueNode};
use crate::{
    error::{ErrorReason, ParseError},
    options::ParserOptions,
    path::Path,
    schema::Target,
    typed::Typed,
    value::JsonValue,
};

/// Receives each array element as soon as it completes.
pub(crate) trait ElementSink {
    fn element(&mut self, value: Typed) -> Result<(), ErrorReason>;
}

/// Keeps every element, for arrays nested in a document.
#[derive(Debug, Default)]
pub(crate) struct Collect(Vec<Typed>);

impl ElementSink for Collect {
    fn element(&mut self, value: Typed) -> Result<(), ErrorReason> {
        self.0.push(value);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Expecting `[`.
    Initial,
    /// Expecting `]` or the first element.
    First,
    Entry,
    /// Expecting `,` or `]`.
    Comma,
    Complete,
}

/// Assembles a JSON array from a sequence of value nodes.
#[derive(Debug)]
pub(crate) struct ArrayNode<S = Collect> {
    path: Path,
    element: Target,
    options: ParserOptions,
    state: State,
    child: Option<ValueNode>,
    count: usize,
    sink: S,
}

impl<S: ElementSink> ArrayNode<S> {
    pub(crate) fn new(path: Path, element: Target, options: ParserOptions, sink: S, opening_seen: bool) -> Self {
        Self {
            path,
            element,
            options,
            state: if opening_seen { State::First } else { State::Initial },
            child: None,
            count: 0,
            sink,
        }
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.state == State::Complete
    }

    /// Number of elements delivered so far.
    pub(crate) fn count(&self) -> usize {
        self.count
    }

    pub(crate) fn into_sink(self) -> S {
        self.sink
    }

    pub(crate) fn accept(&mut self, ch: char) -> Result<bool, ParseError> {
        match self.state {
            State::Initial if is_whitespace(ch) => Ok(true),
            State::Initial if ch == '[' => {
                self.state = State::First;
                Ok(true)
            }
            State::Initial => Err(self.error(ErrorReason::ExpectedArray)),
            State::First if is_whitespace(ch) => Ok(true),
            State::First if ch == ']' => {
                self.state = State::Complete;
                Ok(true)
            }
            State::First => {
                self.start_element();
                self.feed_element(ch)
            }
            State::Entry => self.feed_element(ch),
            State::Comma => self.expect_comma(ch),
            State::Complete => Ok(false),
        }
    }

    pub(crate) fn finish(&self) -> Result<(), ParseError> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(self.error(ErrorReason::UnexpectedEndInArray))
        }
    }

    fn error(&self, reason: ErrorReason) -> ParseError {
        ParseError::new(reason, &self.path)
    }

    fn start_element(&mut self) {
        let path = self.path.index(self.count);
        self.child = Some(ValueNode::new(path, self.element.clone(), self.options));
        self.state = State::Entry;
    }

    fn feed_element(&mut self, ch: char) -> Result<bool, ParseError> {
        let Some(child) = self.child.as_mut() else {
            return self.expect_comma(ch);
        };
        let consumed = child.accept(ch)?;
        if child.is_complete() {
            self.deliver()?;
        }
        if consumed { Ok(true) } else { self.expect_comma(ch) }
    }

    fn deliver(&mut self) -> Result<(), ParseError> {
        self.state = State::Comma;
        let Some(child) = self.child.take() else {
            return Ok(());
        };
        let path = self.path.index(self.count);
        let value = child.into_typed()?;
        self.sink
            .element(value)
            .map_err(|reason| ParseError::new(reason, &path))?;
        self.count += 1;
        Ok(())
    }

    fn expect_comma(&mut self, ch: char) -> Result<bool, ParseError> {
        match ch {
            c if is_whitespace(c) => {}
            ',' => self.start_element(),
            ']' => self.state = State::Complete,
            _ => return Err(self.error(ErrorReason::IllegalArraySyntax)),
        }
        Ok(true)
    }
}

impl ArrayNode<Collect> {
    /// The finished array under its target: a list, or a generic array when
    /// the elements are untyped.
    pub(crate) fn into_typed(self, generic: bool) -> Result<Typed, ErrorReason> {
        if !self.is_complete() {
            return Err(ErrorReason::NotComplete);
        }
        let Collect(items) = self.sink;
        if generic {
            items
                .into_iter()
                .map(Typed::into_json)
                .collect::<Result<Vec<_>, _>>()
                .map(|items| Typed::Json(JsonValue::Array(items)))
        } else {
            Ok(Typed::List(items))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str) -> Result<Vec<String>, ParseError> {
        let mut node = ArrayNode::new(Path::root(), Target::Any, ParserOptions::default(), Collect::default(), false);
        for ch in input.chars() {
            if !node.accept(ch)? {
                break;
            }
        }
        node.finish()?;
        let Collect(items) = node.into_sink();
        Ok(items
            .into_iter()
            .map(|item| item.into_json().unwrap().to_string())
            .collect())
    }

    #[test]
    fn collects_elements() {
        assert_eq!(collect(" [ 1 ,\"a\", [ ] , {}, 2.5e1 ] ").unwrap(), ["1", "\"a\"", "[]", "{}", "25e0"]);
        assert!(collect("[]").unwrap().is_empty());
    }

    #[test]
    fn element_paths_are_indexed() {
        let err = collect("[1, 2, tru*e]").unwrap_err();
        assert_eq!(err.to_string(), "[2]: illegal character in JSON keyword");
    }

    #[test]
    fn syntax_errors() {
        assert_eq!(collect("{}").unwrap_err().reason(), &ErrorReason::ExpectedArray);
        assert_eq!(collect("[{}0]").unwrap_err().reason(), &ErrorReason::IllegalArraySyntax);
        assert_eq!(collect("[1,]").unwrap_err().reason(), &ErrorReason::IllegalSyntax);
        assert_eq!(collect("[1").unwrap_err().reason(), &ErrorReason::UnexpectedEndInArray);
    }
}
