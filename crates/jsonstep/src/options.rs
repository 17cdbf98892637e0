/// How unpaired UTF-16 surrogates produced by `\uXXXX` escapes are handled.
///
/// A high surrogate escape followed by a low surrogate escape is always
/// reassembled into a single code point; this only governs escapes that do not
/// form such a pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SurrogateMode {
    /// Reject the string with an "illegal Unicode sequence" error.
    ///
    /// This refuses some grammatically valid JSON: `"\uD800"` is a legal
    /// string, but a Rust [`String`] cannot hold an unpaired surrogate.
    #[default]
    Strict,
    /// Substitute U+FFFD REPLACEMENT CHARACTER for each unpaired surrogate.
    Replace,
}

/// Configuration options for the incremental parser.
///
/// # Examples
///
/// ```rust
/// use jsonstep::{JsonStream, JsonValue, ParserOptions};
///
/// let mut stream: JsonStream<JsonValue> = JsonStream::with_options(ParserOptions {
///     allow_extra_properties: true,
///     ..Default::default()
/// });
/// stream.feed("{}").unwrap();
/// assert!(stream.is_complete());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    /// Whether unknown object members are accepted for every target schema.
    ///
    /// Schemas may also opt in individually; see
    /// [`SchemaBuilder::allow_extra`](crate::SchemaBuilder::allow_extra).
    ///
    /// # Default
    ///
    /// `false`
    pub allow_extra_properties: bool,

    /// Treatment of unpaired surrogate escapes inside strings.
    ///
    /// # Default
    ///
    /// [`SurrogateMode::Strict`]
    pub surrogates: SurrogateMode,

    /// Whether a U+FEFF byte-order mark is skipped when it is the very first
    /// code point of the input.
    ///
    /// When `false` a leading byte-order mark is an illegal-syntax error.
    ///
    /// # Default
    ///
    /// `true`
    pub allow_byte_order_mark: bool,

    /// How many arrays and objects may be open at once.
    ///
    /// Opening one more fails with "JSON nesting too deep". Nodes handle
    /// each character recursively, so this bounds stack use.
    ///
    /// # Default
    ///
    /// `128`
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            allow_extra_properties: false,
            surrogates: SurrogateMode::Strict,
            allow_byte_order_mark: true,
            max_depth: 128,
        }
    }
}
