use core::{any::Any, fmt, marker::PhantomData};
use std::sync::Arc;

use indexmap::IndexMap;

use super::{FromJson, Target};
use crate::{
    error::ErrorReason,
    typed::{Instance, Typed},
};

type Build = Box<dyn Fn(&mut Arguments) -> Result<Instance, ErrorReason> + Send + Sync>;
type Setter = Box<dyn Fn(&mut dyn Any, Typed) -> Result<(), ErrorReason> + Send + Sync>;
type Check = Box<dyn Fn(&dyn Any, Typed) -> Result<bool, ErrorReason> + Send + Sync>;

/// How a constructor parameter receives its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// Bound from a JSON member.
    Value,
    /// Supplied by the caller (a receiver or context value); constructors
    /// with such parameters are never used for materialization.
    Receiver,
}

/// One parameter of a registered constructor.
#[derive(Debug, Clone)]
pub struct Parameter {
    name: Option<&'static str>,
    aliases: Vec<&'static str>,
    kind: ParameterKind,
    target: fn() -> Target,
    optional: bool,
    ignored: bool,
}

impl Parameter {
    /// A named value parameter of type `T`.
    #[must_use]
    pub fn new<T: FromJson>(name: &'static str) -> Self {
        Self {
            name: Some(name),
            ..Self::unnamed::<T>()
        }
    }

    /// A parameter without a JSON name.
    #[must_use]
    pub fn unnamed<T: FromJson>() -> Self {
        Self {
            name: None,
            aliases: Vec::new(),
            kind: ParameterKind::Value,
            target: T::target,
            optional: false,
            ignored: false,
        }
    }

    /// A receiver parameter.
    #[must_use]
    pub fn receiver() -> Self {
        Self {
            kind: ParameterKind::Receiver,
            ..Self::unnamed::<crate::JsonValue>()
        }
    }

    /// Another JSON member name that binds to this parameter.
    #[must_use]
    pub fn alias(mut self, alias: &'static str) -> Self {
        self.aliases.push(alias);
        self
    }

    /// The constructor supplies a default when the member is absent.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// The member is consumed but never bound.
    #[must_use]
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// The canonical name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// The expected type.
    #[must_use]
    pub fn target(&self) -> Target {
        (self.target)()
    }

    pub(crate) fn kind(&self) -> ParameterKind {
        self.kind
    }

    pub(crate) fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// May be left unmatched.
    pub(crate) fn may_be_absent(&self) -> bool {
        self.optional || self.target().is_nullable()
    }

    pub(crate) fn answers_to(&self, key: &str) -> bool {
        self.name == Some(key) || self.aliases.contains(&key)
    }
}

pub(crate) struct Constructor {
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) build: Build,
}

pub(crate) enum Access {
    Mutable(Setter),
    ReadOnly(Check),
    Ignored,
}

pub(crate) struct Property {
    name: &'static str,
    aliases: Vec<&'static str>,
    target: fn() -> Target,
    pub(crate) access: Access,
}

impl Property {
    fn answers_to(&self, key: &str) -> bool {
        self.name == key || self.aliases.contains(&key)
    }
}

/// What a schema knows about one JSON member name.
#[derive(Debug, Clone)]
pub struct MemberInfo {
    /// The canonical name the member binds to.
    pub name: &'static str,
    /// The type its value is parsed as.
    pub target: Target,
    /// The member is consumed without effect.
    pub ignored: bool,
}

/// Description of a type materialized from JSON objects.
///
/// Built once per type with [`SchemaBuilder`].
pub struct ObjectSchema {
    name: &'static str,
    pub(crate) constructors: Vec<Constructor>,
    properties: Vec<Property>,
    allow_extra: bool,
}

impl ObjectSchema {
    /// The type name used in messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether unknown members are accepted.
    #[must_use]
    pub fn allows_extra(&self) -> bool {
        self.allow_extra
    }

    /// Resolve a JSON member name: constructor parameters first, in
    /// declaration order, then properties.
    #[must_use]
    pub fn member(&self, key: &str) -> Option<MemberInfo> {
        let parameter = self
            .constructors
            .iter()
            .flat_map(|c| &c.parameters)
            .filter(|p| p.kind == ParameterKind::Value)
            .find(|p| p.answers_to(key));
        if let Some(p) = parameter {
            return Some(MemberInfo {
                name: p.name.unwrap_or_default(),
                target: p.target(),
                ignored: p.ignored,
            });
        }
        self.property(key).map(|p| MemberInfo {
            name: p.name,
            target: (p.target)(),
            ignored: matches!(p.access, Access::Ignored),
        })
    }

    /// The target a member's value is parsed as. Unknown and ignored
    /// members are parsed generically.
    pub(crate) fn value_target(&self, key: &str) -> Target {
        self.member(key)
            .filter(|m| !m.ignored)
            .map_or(Target::Any, |m| m.target)
    }

    pub(crate) fn property(&self, key: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.answers_to(key))
    }
}

impl fmt::Debug for ObjectSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectSchema")
            .field("name", &self.name)
            .field("constructors", &self.constructors.len())
            .field("properties", &self.properties.len())
            .field("allow_extra", &self.allow_extra)
            .finish()
    }
}

/// Registers the constructors and properties of `T`.
///
/// ```rust
/// use jsonstep::{Parameter, SchemaBuilder};
///
/// #[derive(Default)]
/// struct Settings {
///     name: String,
///     retries: i32,
/// }
///
/// let schema = SchemaBuilder::<Settings>::new("Settings")
///     .constructor([Parameter::new::<String>("name")], |args| {
///         Ok(Settings { name: args.take("name")?, ..Settings::default() })
///     })
///     .property("retries", |s: &mut Settings, v: i32| s.retries = v)
///     .alias("retry_count")
///     .build();
/// assert_eq!(schema.member("retry_count").unwrap().name, "retries");
/// ```
pub struct SchemaBuilder<T> {
    schema: ObjectSchema,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> SchemaBuilder<T> {
    /// Start a schema for the type called `name`.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            schema: ObjectSchema {
                name,
                constructors: Vec::new(),
                properties: Vec::new(),
                allow_extra: false,
            },
            _marker: PhantomData,
        }
    }

    /// Register a constructor. Constructors are tried in registration order.
    #[must_use]
    pub fn constructor<F>(mut self, parameters: impl IntoIterator<Item = Parameter>, build: F) -> Self
    where
        F: Fn(&mut Arguments) -> Result<T, ErrorReason> + Send + Sync + 'static,
    {
        let name = self.schema.name;
        self.schema.constructors.push(Constructor {
            parameters: parameters.into_iter().collect(),
            build: Box::new(move |args| build(args).map(|value| Instance::new(name, value))),
        });
        self
    }

    /// Register a property assigned after construction.
    #[must_use]
    pub fn property<V, F>(self, name: &'static str, set: F) -> Self
    where
        V: FromJson,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let type_name = self.schema.name;
        let setter: Setter = Box::new(move |instance, value| {
            let instance = instance
                .downcast_mut::<T>()
                .ok_or_else(|| ErrorReason::CannotSetProperty {
                    property: name.into(),
                    target: type_name.into(),
                })?;
            set(instance, V::from_typed(value)?);
            Ok(())
        });
        self.push(name, V::target, Access::Mutable(setter))
    }

    /// Register a property that cannot be assigned; a supplied value must
    /// equal what the constructed instance already holds.
    #[must_use]
    pub fn read_only<V, F>(self, name: &'static str, get: F) -> Self
    where
        V: FromJson + PartialEq,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        let check: Check = Box::new(move |instance, value| {
            let supplied = V::from_typed(value)?;
            Ok(instance.downcast_ref::<T>().is_some_and(|i| get(i) == supplied))
        });
        self.push(name, V::target, Access::ReadOnly(check))
    }

    /// Register a member name that is consumed without effect.
    #[must_use]
    pub fn ignore(self, name: &'static str) -> Self {
        self.push(name, <crate::JsonValue as FromJson>::target, Access::Ignored)
    }

    /// Add a JSON name for the most recently registered property.
    #[must_use]
    pub fn alias(mut self, alias: &'static str) -> Self {
        if let Some(property) = self.schema.properties.last_mut() {
            property.aliases.push(alias);
        }
        self
    }

    /// Accept unknown members instead of failing.
    #[must_use]
    pub fn allow_extra(mut self) -> Self {
        self.schema.allow_extra = true;
        self
    }

    /// Finish the schema.
    #[must_use]
    pub fn build(self) -> Arc<ObjectSchema> {
        Arc::new(self.schema)
    }

    fn push(mut self, name: &'static str, target: fn() -> Target, access: Access) -> Self {
        self.schema.properties.push(Property {
            name,
            aliases: Vec::new(),
            target,
            access,
        });
        self
    }
}

/// Values bound to the parameters of the selected constructor.
#[derive(Debug, Default)]
pub struct Arguments {
    values: IndexMap<&'static str, Typed>,
}

impl Arguments {
    pub(crate) fn insert(&mut self, name: &'static str, value: Typed) {
        self.values.insert(name, value);
    }

    /// Whether the named parameter was supplied.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Take the named argument. An absent nullable argument is `null`.
    ///
    /// # Errors
    ///
    /// Fails when the argument is absent and not nullable, or has the wrong
    /// shape.
    pub fn take<T: FromJson>(&mut self, name: &str) -> Result<T, ErrorReason> {
        match self.values.shift_remove(name) {
            Some(value) => T::from_typed(value),
            None if T::target().is_nullable() => T::from_typed(Typed::Null),
            None => Err(ErrorReason::MissingArgument(name.into())),
        }
    }

    /// Take the named argument, or `default` when absent.
    ///
    /// # Errors
    ///
    /// Fails when the argument has the wrong shape.
    pub fn take_or<T: FromJson>(&mut self, name: &str, default: T) -> Result<T, ErrorReason> {
        self.take_or_else(name, || default)
    }

    /// Take the named argument, or compute a default when absent.
    ///
    /// # Errors
    ///
    /// Fails when the argument has the wrong shape.
    pub fn take_or_else<T: FromJson>(&mut self, name: &str, default: impl FnOnce() -> T) -> Result<T, ErrorReason> {
        match self.values.shift_remove(name) {
            Some(value) => T::from_typed(value),
            None => Ok(default()),
        }
    }
}
