//! Root drivers: feed a whole document one code point at a time.

use core::marker::PhantomData;

use log::trace;

use crate::{
    error::{ErrorReason, ParseError, Position},
    node::{is_whitespace, ArrayNode, ElementSink, ValueNode},
    options::ParserOptions,
    path::Path,
    schema::FromJson,
    typed::Typed,
    value::JsonValue,
};

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Input bookkeeping shared by the root drivers.
#[derive(Debug)]
struct Cursor {
    options: ParserOptions,
    started: bool,
    position: Position,
    failed: Option<ParseError>,
}

impl Cursor {
    fn new(options: ParserOptions) -> Self {
        Self {
            options,
            started: false,
            position: Position::start(),
            failed: None,
        }
    }

    /// Run `step` for one code point. A leading byte-order mark is skipped;
    /// the first failure is latched and returned for all later input.
    fn advance(&mut self, ch: char, step: impl FnOnce(char) -> Result<(), ParseError>) -> Result<(), ParseError> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        let position = self.position;
        self.position.advance(ch);
        if !self.started {
            self.started = true;
            if ch == BYTE_ORDER_MARK && self.options.allow_byte_order_mark {
                return Ok(());
            }
        }
        step(ch).map_err(|err| self.fail(err, position))
    }

    /// Finalize at the current position.
    fn finish<R>(&mut self, step: impl FnOnce() -> Result<R, ParseError>) -> Result<R, ParseError> {
        if let Some(err) = self.failed.take() {
            return Err(err);
        }
        let position = self.position;
        step().map_err(|err| self.fail(err, position))
    }

    fn fail(&mut self, err: ParseError, position: Position) -> ParseError {
        let err = err.at(position);
        self.failed = Some(err.clone());
        err
    }
}

fn trailing(ch: char) -> Result<(), ParseError> {
    if is_whitespace(ch) {
        Ok(())
    } else {
        Err(ParseError::new(ErrorReason::TrailingCharacters, &Path::root()))
    }
}

/// Parses one JSON document into `T`, one code point at a time.
///
/// ```rust
/// use jsonstep::{JsonStream, JsonValue};
///
/// let mut stream = JsonStream::<JsonValue>::new();
/// stream.feed(r#"{"id": 7, "tags": ["#).unwrap();
/// assert!(!stream.is_complete());
/// stream.feed(r#""a", "b"]} "#).unwrap();
/// assert!(stream.is_complete());
/// assert_eq!(stream.result().unwrap().to_string(), r#"{"id":7,"tags":["a","b"]}"#);
/// ```
#[derive(Debug)]
pub struct JsonStream<T: FromJson = JsonValue> {
    cursor: Cursor,
    root: Option<ValueNode>,
    result: Option<T>,
}

impl<T: FromJson> Default for JsonStream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FromJson> JsonStream<T> {
    /// A stream with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ParserOptions::default())
    }

    /// A stream with the given options.
    #[must_use]
    pub fn with_options(options: ParserOptions) -> Self {
        Self {
            cursor: Cursor::new(options),
            root: Some(ValueNode::new(Path::root(), T::target(), options)),
            result: None,
        }
    }

    /// Accept one code point.
    ///
    /// # Errors
    ///
    /// Returns the first error of the document; once an error has been
    /// returned every later call returns it again.
    pub fn accept(&mut self, ch: char) -> Result<(), ParseError> {
        let Self { cursor, root, result } = self;
        cursor.advance(ch, |ch| {
            let Some(node) = root.as_mut() else {
                return trailing(ch);
            };
            let consumed = node.accept(ch)?;
            if node.is_complete() {
                *result = Some(Self::complete(root.take())?);
            }
            if consumed { Ok(()) } else { trailing(ch) }
        })
    }

    /// Accept every code point of `chunk`.
    ///
    /// # Errors
    ///
    /// See [`accept`](Self::accept).
    pub fn feed(&mut self, chunk: &str) -> Result<(), ParseError> {
        chunk.chars().try_for_each(|ch| self.accept(ch))
    }

    /// Whether the document value has been completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// The completed value.
    ///
    /// # Errors
    ///
    /// Fails with "JSON not complete" before completion, or with the error
    /// that stopped the parse.
    pub fn result(&self) -> Result<&T, ParseError> {
        if let Some(err) = &self.cursor.failed {
            return Err(err.clone());
        }
        self.result
            .as_ref()
            .ok_or_else(|| ParseError::new(ErrorReason::NotComplete, &Path::root()))
    }

    /// Signal end of input and take the value.
    ///
    /// A number at the end of the input completes here.
    ///
    /// # Errors
    ///
    /// Fails when the document is incomplete or already failed.
    pub fn finish(mut self) -> Result<T, ParseError> {
        let Self { cursor, root, result } = &mut self;
        cursor.finish(|| {
            if let Some(node) = root.as_mut() {
                node.finish()?;
                *result = Some(Self::complete(root.take())?);
            }
            result
                .take()
                .ok_or_else(|| ParseError::new(ErrorReason::NotComplete, &Path::root()))
        })
    }

    fn complete(root: Option<ValueNode>) -> Result<T, ParseError> {
        let Some(root) = root else {
            return Err(ParseError::new(ErrorReason::NotComplete, &Path::root()));
        };
        let value = T::from_typed(root.into_typed()?).map_err(|reason| ParseError::new(reason, &Path::root()))?;
        trace!("JSON document complete");
        Ok(value)
    }
}

/// Hands each element to the consumer as soon as it is complete.
struct Deliver<T, F> {
    consumer: F,
    _marker: PhantomData<fn(T)>,
}

impl<T: FromJson, F: FnMut(T)> ElementSink for Deliver<T, F> {
    fn element(&mut self, value: Typed) -> Result<(), ErrorReason> {
        (self.consumer)(T::from_typed(value)?);
        Ok(())
    }
}

/// Streams the elements of a top-level JSON array without retaining them.
///
/// ```rust
/// use jsonstep::ArrayStream;
///
/// let mut totals = Vec::new();
/// let mut stream = ArrayStream::new(|n: i64| totals.push(n * 10));
/// stream.feed("[1, 2,").unwrap();
/// assert_eq!(stream.count(), 2);
/// stream.feed(" 3]").unwrap();
/// stream.finish().unwrap();
/// assert_eq!(totals, [10, 20, 30]);
/// ```
pub struct ArrayStream<T: FromJson, F: FnMut(T)> {
    cursor: Cursor,
    node: ArrayNode<Deliver<T, F>>,
}

impl<T: FromJson, F: FnMut(T)> ArrayStream<T, F> {
    /// A stream with default options.
    pub fn new(consumer: F) -> Self {
        Self::with_options(ParserOptions::default(), consumer)
    }

    /// A stream with the given options.
    pub fn with_options(options: ParserOptions, consumer: F) -> Self {
        let sink = Deliver {
            consumer,
            _marker: PhantomData,
        };
        Self {
            cursor: Cursor::new(options),
            node: ArrayNode::new(Path::root(), T::target(), options, sink, false),
        }
    }

    /// Accept one code point.
    ///
    /// # Errors
    ///
    /// Fails with "pipeline must contain array" when the input does not start
    /// with `[`, or with the first error of any element.
    pub fn accept(&mut self, ch: char) -> Result<(), ParseError> {
        let Self { cursor, node } = self;
        cursor.advance(ch, |ch| {
            let complete = node.is_complete();
            if node.accept(ch)? {
                if !complete && node.is_complete() {
                    trace!("JSON array complete with {} elements", node.count());
                }
                Ok(())
            } else {
                trailing(ch)
            }
        })
    }

    /// Accept every code point of `chunk`.
    ///
    /// # Errors
    ///
    /// See [`accept`](Self::accept).
    pub fn feed(&mut self, chunk: &str) -> Result<(), ParseError> {
        chunk.chars().try_for_each(|ch| self.accept(ch))
    }

    /// Whether the closing `]` has been seen.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.node.is_complete()
    }

    /// Number of elements delivered so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.node.count()
    }

    /// Signal end of input and get the consumer back.
    ///
    /// # Errors
    ///
    /// Fails when the array is incomplete or the stream already failed.
    pub fn finish(mut self) -> Result<F, ParseError> {
        let Self { cursor, node } = &mut self;
        cursor.finish(|| node.finish())?;
        Ok(self.node.into_sink().consumer)
    }
}
