//! Parse nodes: one state machine per JSON construct.
//!
//! Every node accepts one character at a time and answers whether it
//! consumed it. A node only declines a character once it is complete; the
//! caller must then offer the same character to the enclosing construct.
//! Numbers are the only construct that learns it is finished this way, but
//! composites rely on the same answer to replay a child's terminator against
//! their own `,`/`]`/`}` expectations.

mod array;
mod escape_buffer;
mod literal;
mod number;
mod object;
mod string;
mod value;

pub(crate) use array::{ArrayNode, ElementSink};
pub(crate) use value::ValueNode;

/// JSON insignificant whitespace.
#[inline]
pub(crate) fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}
