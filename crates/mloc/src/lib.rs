pub mod catalog;
pub mod error;
#[cfg(feature = "global-locale")]
pub mod global;
pub mod interpolate;
pub mod locale;
pub mod ops;
pub mod plugin;
pub mod proxy;
pub mod types;

pub use catalog::{Catalog, LocaleDefinition};
pub use error::{ChainError, LocaleError, compute_suggestions};
#[cfg(feature = "global-locale")]
pub use global::{GlobalLocale, current_locale, set_locale, with_locale};
pub use interpolate::InterpolateError;
pub use locale::{Locale, MAX_CHAIN_DEPTH};
pub use ops::LocaleOps;
pub use plugin::{Formattable, Formatter, LocalizedFormat, NamedArgs, Rule};
pub use proxy::{LocaleProxy, LocaleResolver, SharedLocale};
pub use types::{Config, TypeKey, Value};

/// Creates a [`Config`] from key-value pairs.
///
/// Values are converted via `Into<Value>`, so integers, floats, strings and
/// vectors can be passed directly.
///
/// # Example
///
/// ```
/// use mloc::{Value, config};
///
/// let c = config! { "greeting" => vec!["Hello %s"], "max_items" => 3 };
/// assert_eq!(c.len(), 2);
/// assert_eq!(c["max_items"], Value::Int(3));
/// ```
#[macro_export]
macro_rules! config {
    {} => {
        $crate::Config::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = $crate::Config::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            map
        }
    };
}
