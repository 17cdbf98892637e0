use core::mem;
use std::sync::Arc;

use indexmap::IndexMap;

use super::{is_whitespace, string::StringNode, value::ValueNode};
use crate::{
    error::{ErrorReason, ParseError},
    materialize::materialize,
    options::ParserOptions,
    path::Path,
    schema::{ObjectSchema, Target},
    typed::Typed,
    value::{JsonValue, Map},
};

/// What a completed object turns into.
#[derive(Debug, Clone)]
pub(crate) enum ObjectTarget {
    Any,
    /// Keyed map; every member has the same target.
    Map(Target),
    Schema(Arc<ObjectSchema>),
}

impl ObjectTarget {
    /// `None` when `target` cannot be built from an object.
    pub(crate) fn for_target(target: &Target) -> Option<Self> {
        match target.non_null() {
            Target::Any => Some(Self::Any),
            Target::Map(inner) => Some(Self::Map((**inner).clone())),
            Target::Object(schema) => Some(Self::Schema(Arc::clone(schema))),
            _ => None,
        }
    }

    fn member(&self, key: &str) -> Target {
        match self {
            Self::Any => Target::Any,
            Self::Map(inner) => inner.clone(),
            Self::Schema(schema) => schema.value_target(key),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// After `{`: expecting `}` or the first name.
    First,
    Name,
    Colon,
    Value,
    /// Expecting `,` or `}`.
    Comma,
    /// After `,`: expecting a name.
    Next,
    Complete,
}

/// Assembles a JSON object: string keys, `:`, value nodes.
#[derive(Debug)]
pub(crate) struct ObjectNode {
    path: Path,
    target: ObjectTarget,
    options: ParserOptions,
    state: State,
    key: StringNode,
    name: String,
    child: Option<ValueNode>,
    entries: IndexMap<String, Typed>,
    result: Option<Typed>,
}

impl ObjectNode {
    /// Created by the value dispatcher after it consumed `{`.
    pub(crate) fn new(path: Path, target: ObjectTarget, options: ParserOptions) -> Self {
        Self {
            path,
            target,
            options,
            state: State::First,
            key: StringNode::new(options.surrogates),
            name: String::new(),
            child: None,
            entries: IndexMap::new(),
            result: None,
        }
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.state == State::Complete
    }

    pub(crate) fn accept(&mut self, ch: char) -> Result<bool, ParseError> {
        match self.state {
            State::First | State::Next if is_whitespace(ch) => {}
            State::First if ch == '}' => self.complete()?,
            State::First | State::Next if ch == '"' => {
                self.key = StringNode::new(self.options.surrogates);
                self.state = State::Name;
            }
            State::First | State::Next => return Err(self.error(ErrorReason::IllegalObjectSyntax)),
            State::Name => {
                self.key.accept(ch, &self.path)?;
                if self.key.is_complete() {
                    let key = mem::replace(&mut self.key, StringNode::new(self.options.surrogates));
                    let name = key.into_string();
                    if self.entries.contains_key(&name) {
                        return Err(self.error(ErrorReason::DuplicateKey(name)));
                    }
                    self.name = name;
                    self.state = State::Colon;
                }
            }
            State::Colon if is_whitespace(ch) => {}
            State::Colon if ch == ':' => {
                let target = self.target.member(&self.name);
                let path = self.path.key(&self.name);
                self.child = Some(ValueNode::new(path, target, self.options));
                self.state = State::Value;
            }
            State::Colon => return Err(self.error(ErrorReason::IllegalObjectSyntax)),
            State::Value => return self.feed_value(ch),
            State::Comma => return self.expect_comma(ch),
            State::Complete => return Ok(false),
        }
        Ok(true)
    }

    pub(crate) fn finish(&self) -> Result<(), ParseError> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(self.error(ErrorReason::UnexpectedEndInObject))
        }
    }

    pub(crate) fn into_typed(self) -> Result<Typed, ErrorReason> {
        self.result.ok_or(ErrorReason::NotComplete)
    }

    fn error(&self, reason: ErrorReason) -> ParseError {
        ParseError::new(reason, &self.path)
    }

    fn feed_value(&mut self, ch: char) -> Result<bool, ParseError> {
        let Some(child) = self.child.as_mut() else {
            return self.expect_comma(ch);
        };
        let consumed = child.accept(ch)?;
        if child.is_complete() {
            self.state = State::Comma;
            if let Some(child) = self.child.take() {
                let value = child.into_typed()?;
                self.entries.insert(mem::take(&mut self.name), value);
            }
        }
        if consumed { Ok(true) } else { self.expect_comma(ch) }
    }

    fn expect_comma(&mut self, ch: char) -> Result<bool, ParseError> {
        match ch {
            c if is_whitespace(c) => {}
            ',' => self.state = State::Next,
            '}' => self.complete()?,
            _ => return Err(self.error(ErrorReason::IllegalObjectSyntax)),
        }
        Ok(true)
    }

    /// Close the object and build its value.
    fn complete(&mut self) -> Result<(), ParseError> {
        self.state = State::Complete;
        let entries = mem::take(&mut self.entries);
        let result = match &self.target {
            ObjectTarget::Any => entries
                .into_iter()
                .map(|(k, v)| Ok((k, v.into_json()?)))
                .collect::<Result<Map, ErrorReason>>()
                .map(|members| Typed::Json(JsonValue::Object(members))),
            ObjectTarget::Map(_) => Ok(Typed::Map(entries)),
            ObjectTarget::Schema(schema) => materialize(schema, entries, &self.options).map(Typed::Instance),
        };
        self.result = Some(result.map_err(|reason| self.error(reason))?);
        Ok(())
    }
}
