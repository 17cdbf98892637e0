//! Building schema-described instances from completed objects.

use indexmap::IndexMap;
use log::debug;

use crate::{
    error::ErrorReason,
    options::ParserOptions,
    schema::{
        object::{Access, Constructor},
        Arguments, ObjectSchema, ParameterKind,
    },
    typed::{Instance, Typed},
};

/// Number of parameters satisfied by `entries`, or `None` when the
/// constructor cannot be used.
fn matched_parameters(constructor: &Constructor, entries: &IndexMap<String, Typed>) -> Option<usize> {
    let mut matched = 0;
    for parameter in &constructor.parameters {
        if parameter.name().is_none() || parameter.kind() != ParameterKind::Value {
            return None;
        }
        if entries.keys().any(|k| parameter.answers_to(k)) {
            matched += 1;
        } else if !parameter.may_be_absent() {
            return None;
        }
    }
    Some(matched)
}

/// The constructor with the most matched parameters; the first registered
/// wins a tie.
fn best_constructor<'a>(
    schema: &'a ObjectSchema,
    entries: &IndexMap<String, Typed>,
) -> Option<(usize, &'a Constructor)> {
    let mut best: Option<(usize, &Constructor)> = None;
    for constructor in &schema.constructors {
        if let Some(n) = matched_parameters(constructor, entries) {
            if best.is_none_or(|(count, _)| n > count) {
                best = Some((n, constructor));
            }
        }
    }
    best
}

/// Construct an instance of `schema` from the members of a completed object.
pub(crate) fn materialize(
    schema: &ObjectSchema,
    mut entries: IndexMap<String, Typed>,
    options: &ParserOptions,
) -> Result<Instance, ErrorReason> {
    let Some((matched, constructor)) = best_constructor(schema, &entries) else {
        return Err(ErrorReason::CannotConstruct(schema.name().into()));
    };
    debug!(
        "constructing {} with {} of {} parameters matched",
        schema.name(),
        matched,
        constructor.parameters.len()
    );

    let mut arguments = Arguments::default();
    for parameter in &constructor.parameters {
        let Some(index) = entries.keys().position(|k| parameter.answers_to(k)) else {
            continue;
        };
        let Some((_, value)) = entries.shift_remove_index(index) else {
            continue;
        };
        if let (Some(name), false) = (parameter.name(), parameter.is_ignored()) {
            arguments.insert(name, value);
        }
    }
    let mut instance = (constructor.build)(&mut arguments)?;

    for (key, value) in entries {
        match schema.property(&key).map(|p| &p.access) {
            Some(Access::Mutable(set)) => set(instance.as_any_mut(), value)?,
            Some(Access::ReadOnly(check)) => {
                if !check(instance.as_any(), value)? {
                    return Err(ErrorReason::CannotSetProperty {
                        property: key,
                        target: schema.name().into(),
                    });
                }
            }
            Some(Access::Ignored) => {}
            None if schema.allows_extra() || options.allow_extra_properties => {
                debug!("skipping extra property {key:?} of {}", schema.name());
            }
            None => {
                return Err(ErrorReason::CannotFindProperty {
                    property: key,
                    target: schema.name().into(),
                });
            }
        }
    }
    Ok(instance)
}
