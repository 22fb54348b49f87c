use std::any::type_name;
use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};

/// Formatter dispatch key for a concrete value type.
///
/// Derived keys use the fully qualified Rust type name
/// (e.g. `"alloc::string::String"`, `"my_app::money::Money"`), which is
/// unique per concrete type and stable for a given build. Explicit keys can
/// be created from any string to register formatters under a custom id.
///
/// # Example
///
/// ```
/// use mloc::TypeKey;
///
/// assert_eq!(TypeKey::of::<i64>().as_str(), "i64");
/// assert_eq!(TypeKey::named("money").as_str(), "money");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(Cow<'static, str>);

impl TypeKey {
    /// The dispatch key for values of type `T`.
    pub fn of<T: ?Sized>() -> Self {
        TypeKey(Cow::Borrowed(type_name::<T>()))
    }

    /// An explicit dispatch key.
    pub fn named(key: impl Into<String>) -> Self {
        TypeKey(Cow::Owned(key.into()))
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TypeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TypeKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
