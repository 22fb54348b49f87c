//! Rule and formatter plugin types.
//!
//! Rules transform a resolved configuration value; formatters render an
//! arbitrary value to text for a locale. Both are stored as cheap cloneable
//! handles so lookups can release registry locks before invoking them.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt::{self, Debug, Display};
use std::sync::Arc;

use crate::locale::Locale;
use crate::types::{TypeKey, Value};

/// Keyword arguments passed to a rule alongside its positional ones.
pub type NamedArgs = BTreeMap<String, Value>;

type RuleFn = dyn Fn(Option<Value>, &[Value], &NamedArgs) -> Value + Send + Sync;
type FormatterFn = dyn Fn(&dyn Formattable, &Locale, Option<&str>) -> String + Send + Sync;

/// A registered transformation of a resolved configuration value.
///
/// The first argument is the configuration value resolved through the
/// fallback chain (`None` when no locale defines it), followed by the
/// caller's extra positional arguments. Rules built with
/// [`with_named`](Self::with_named) also see keyword arguments.
///
/// # Example
///
/// ```
/// use mloc::{Rule, Value};
///
/// let suffix = Rule::new(|base, args| {
///     let base = base.map(|v| v.to_string()).unwrap_or_default();
///     Value::from(format!("{base}{}", args.len()))
/// });
/// assert_eq!(suffix.call(Some("n".into()), &[1.into()]), Value::from("n1"));
/// ```
#[derive(Clone)]
pub struct Rule(Arc<RuleFn>);

impl Rule {
    /// Wrap a closure that takes positional arguments only.
    pub fn new(f: impl Fn(Option<Value>, &[Value]) -> Value + Send + Sync + 'static) -> Self {
        Rule(Arc::new(
            move |resolved: Option<Value>, args: &[Value], _named: &NamedArgs| f(resolved, args),
        ))
    }

    /// Wrap a closure that also takes keyword arguments.
    ///
    /// # Example
    ///
    /// ```
    /// use mloc::{NamedArgs, Rule, Value};
    ///
    /// let pad = Rule::with_named(|base, _, named| {
    ///     let width = named.get("width").and_then(Value::as_int).unwrap_or(0);
    ///     let text = base.map(|v| v.to_string()).unwrap_or_default();
    ///     Value::from(format!("{text:>width$}", width = width as usize))
    /// });
    /// let named = NamedArgs::from([("width".to_string(), Value::from(4))]);
    /// assert_eq!(pad.call_with_named(Some("ab".into()), &[], &named), Value::from("  ab"));
    /// ```
    pub fn with_named(
        f: impl Fn(Option<Value>, &[Value], &NamedArgs) -> Value + Send + Sync + 'static,
    ) -> Self {
        Rule(Arc::new(f))
    }

    /// Invoke the rule without keyword arguments.
    pub fn call(&self, resolved: Option<Value>, args: &[Value]) -> Value {
        self.call_with_named(resolved, args, &NamedArgs::new())
    }

    /// Invoke the rule.
    pub fn call_with_named(
        &self,
        resolved: Option<Value>,
        args: &[Value],
        named: &NamedArgs,
    ) -> Value {
        (self.0)(resolved, args, named)
    }

    /// Whether two handles refer to the same registered function.
    pub fn ptr_eq(&self, other: &Rule) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Rule(..)")
    }
}

/// A registered renderer from a value to locale-specific text.
#[derive(Clone)]
pub struct Formatter(Arc<FormatterFn>);

impl Formatter {
    /// Wrap a closure that accepts any formattable value.
    pub fn new(
        f: impl Fn(&dyn Formattable, &Locale, Option<&str>) -> String + Send + Sync + 'static,
    ) -> Self {
        Formatter(Arc::new(f))
    }

    /// Wrap a closure for one concrete type.
    ///
    /// If the formatter is later invoked with a value of another type (for
    /// example through an explicit formatter id), the value's `Display`
    /// output is returned instead.
    ///
    /// # Example
    ///
    /// ```
    /// use mloc::{Formatter, Locale, LocaleOps};
    ///
    /// let locale = Locale::builder().name("de").build().unwrap();
    /// locale.register_formatter_for::<f64>(Formatter::typed(|n: &f64, _, _| {
    ///     format!("{n:.2}").replace('.', ",")
    /// }));
    /// assert_eq!(locale.format(&3.5_f64, None, None, None), "3,50");
    /// ```
    pub fn typed<T: Formattable>(
        f: impl Fn(&T, &Locale, Option<&str>) -> String + Send + Sync + 'static,
    ) -> Self {
        Formatter::new(move |value, locale, fmt| match value.as_any().downcast_ref::<T>() {
            Some(typed) => f(typed, locale, fmt),
            None => value.to_string(),
        })
    }

    /// Invoke the formatter.
    pub fn call(&self, value: &dyn Formattable, locale: &Locale, fmt: Option<&str>) -> String {
        (self.0)(value, locale, fmt)
    }

    /// Whether two handles refer to the same registered function.
    pub fn ptr_eq(&self, other: &Formatter) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Formatter(..)")
    }
}

/// A value that can be passed to [`LocaleOps::format`](crate::LocaleOps::format).
///
/// `Display` is the last-resort rendering. Types that know how to render
/// themselves for a locale override [`as_localized`](Self::as_localized).
///
/// # Example
///
/// ```
/// use std::any::Any;
/// use std::fmt;
///
/// use mloc::{Formattable, Locale, LocaleOps, LocalizedFormat};
///
/// struct Distance(f64);
///
/// impl fmt::Display for Distance {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "{} m", self.0)
///     }
/// }
///
/// impl LocalizedFormat for Distance {
///     fn localized_format(&self, locale: &Locale, _fmt: Option<&str>) -> String {
///         let unit = locale.get_str("unit.meter").unwrap_or_else(|| "m".to_string());
///         format!("{} {unit}", self.0)
///     }
/// }
///
/// impl Formattable for Distance {
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
///
///     fn as_localized(&self) -> Option<&dyn LocalizedFormat> {
///         Some(self)
///     }
/// }
///
/// let locale = Locale::builder()
///     .name("fr")
///     .config(mloc::config! { "unit.meter" => "mètres" })
///     .build()
///     .unwrap();
/// assert_eq!(locale.format(&Distance(4.0), None, None, None), "4 mètres");
/// ```
pub trait Formattable: Display + 'static {
    /// Upcast for downcasting inside typed formatters.
    fn as_any(&self) -> &dyn Any;

    /// Dispatch key used when no explicit formatter id is supplied.
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<Self>()
    }

    /// The value's self-formatting capability, if it has one.
    fn as_localized(&self) -> Option<&dyn LocalizedFormat> {
        None
    }
}

/// Self-formatting capability: the value renders itself for a locale.
pub trait LocalizedFormat {
    fn localized_format(&self, locale: &Locale, fmt: Option<&str>) -> String;
}

macro_rules! plain_formattable {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Formattable for $ty {
                fn as_any(&self) -> &dyn Any {
                    self
                }
            }
        )+
    };
}

plain_formattable!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String, &'static str, TypeKey,
);

/// Configuration values dispatch on the type they hold, so a formatter
/// registered for `f64` also renders a resolved `Value::Float`, and
/// [`Formatter::typed`] closures receive the inner value.
impl Formattable for Value {
    fn as_any(&self) -> &dyn Any {
        match self {
            Value::Null => self,
            Value::Bool(b) => b,
            Value::Int(n) => n,
            Value::Float(n) => n,
            Value::String(s) => s,
            Value::List(items) => items,
            Value::Map(entries) => entries,
        }
    }

    fn type_key(&self) -> TypeKey {
        match self {
            Value::Null => TypeKey::of::<Value>(),
            Value::Bool(_) => TypeKey::of::<bool>(),
            Value::Int(_) => TypeKey::of::<i64>(),
            Value::Float(_) => TypeKey::of::<f64>(),
            Value::String(_) => TypeKey::of::<String>(),
            Value::List(_) => TypeKey::of::<Vec<Value>>(),
            Value::Map(_) => TypeKey::of::<BTreeMap<String, Value>>(),
        }
    }
}
