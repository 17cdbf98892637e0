use core::fmt;
use std::sync::Arc;

/// One step into a JSON document.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathItem {
    /// A member of a JSON object.
    Key(Arc<str>),
    /// An element of a JSON array.
    Index(usize),
}

/// The structural location of a node, rendered as `field1.field2[3]`.
///
/// Every parse node owns the path it was created at; children extend their
/// parent's path by one item.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<PathItem>);

impl Path {
    /// The document root.
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns `true` at the document root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The individual steps, outermost first.
    #[must_use]
    pub fn items(&self) -> &[PathItem] {
        &self.0
    }

    pub(crate) fn key(&self, key: &str) -> Self {
        let mut items = Vec::with_capacity(self.0.len() + 1);
        items.extend(self.0.iter().cloned());
        items.push(PathItem::Key(key.into()));
        Self(items)
    }

    pub(crate) fn index(&self, index: usize) -> Self {
        let mut items = Vec::with_capacity(self.0.len() + 1);
        items.extend(self.0.iter().cloned());
        items.push(PathItem::Index(index));
        Self(items)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.0.iter().enumerate() {
            match item {
                PathItem::Key(key) if i == 0 => f.write_str(key)?,
                PathItem::Key(key) => write!(f, ".{key}")?,
                PathItem::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl FromIterator<PathItem> for Path {
    fn from_iter<I: IntoIterator<Item = PathItem>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<&str> for PathItem {
    fn from(s: &str) -> Self {
        Self::Key(s.into())
    }
}

impl From<usize> for PathItem {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

#[doc(hidden)]
pub trait PathItemFrom<T> {
    fn from_path_component(value: T) -> PathItem;
}

macro_rules! impl_unsigned_as_path_component {
    ($($t:ty),+) => {
        $(
            impl PathItemFrom<$t> for PathItem {
                fn from_path_component(value: $t) -> Self {
                    #[allow(clippy::cast_possible_truncation)]
                    PathItem::Index(value as usize)
                }
            }
        )+
    };
}
impl_unsigned_as_path_component!(u8, u16, u32, u64, usize);

macro_rules! impl_signed_as_path_component {
    ($($t:ty),+) => {
        $(
            impl PathItemFrom<$t> for PathItem {
                fn from_path_component(value: $t) -> Self {
                    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
                    PathItem::Index(value.max(0) as usize)
                }
            }
        )+
    };
}
impl_signed_as_path_component!(i8, i16, i32, i64, isize);

impl PathItemFrom<&str> for PathItem {
    fn from_path_component(value: &str) -> Self {
        PathItem::Key(value.into())
    }
}

/// Build a [`Path`] from a heterogeneous list of keys and indices.
///
/// ```rust
/// use jsonstep::path;
///
/// let p = path!["orders", 3, "total"];
/// assert_eq!(p.to_string(), "orders[3].total");
/// ```
#[macro_export]
macro_rules! path {
    ( $( $elem:expr ),* $(,)? ) => {{
        use $crate::PathItemFrom;
        [$($crate::PathItem::from_path_component($elem)),*]
            .into_iter()
            .collect::<$crate::Path>()
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_item_from() {
        assert_eq!(PathItem::from_path_component("test"), PathItem::Key("test".into()));
        assert_eq!(PathItem::from_path_component(8u8), PathItem::Index(8));
        assert_eq!(PathItem::from_path_component(-1i32), PathItem::Index(0));
    }

    #[test]
    fn test_path_item_macro() {
        let p: Path = crate::path![0, "foo", 2];
        assert_eq!(
            p.items(),
            &[
                PathItem::Index(0),
                PathItem::Key("foo".into()),
                PathItem::Index(2)
            ]
        );
    }

    #[test]
    fn renders_dotted_and_indexed() {
        assert_eq!(Path::root().to_string(), "");
        assert_eq!(Path::root().index(0).key("a").to_string(), "[0].a");
        assert_eq!(
            Path::root().key("field1").key("field2").index(3).to_string(),
            "field1.field2[3]"
        );
    }
}
