//! A stable handle that forwards to whichever locale is current.

use std::sync::{Arc, RwLock};

use crate::error::LocaleError;
use crate::locale::Locale;
use crate::ops::LocaleOps;
use crate::plugin::{Formattable, Formatter, NamedArgs, Rule};
use crate::types::Value;

/// Produces the locale a [`LocaleProxy`] should forward to right now.
pub trait LocaleResolver {
    fn resolve_locale(&self) -> Arc<Locale>;
}

impl<F> LocaleResolver for F
where
    F: Fn() -> Arc<Locale>,
{
    fn resolve_locale(&self) -> Arc<Locale> {
        self()
    }
}

/// A swappable slot holding the current locale.
///
/// Clones share the same slot, so a server can hand clones to request
/// handlers and switch the locale for all of them at once.
#[derive(Debug, Clone)]
pub struct SharedLocale {
    current: Arc<RwLock<Arc<Locale>>>,
}

impl SharedLocale {
    pub fn new(locale: Arc<Locale>) -> Self {
        SharedLocale {
            current: Arc::new(RwLock::new(locale)),
        }
    }

    /// Replace the current locale.
    pub fn set(&self, locale: Arc<Locale>) {
        *self.current.write().expect("shared locale lock poisoned") = locale;
    }

    /// The current locale.
    pub fn current(&self) -> Arc<Locale> {
        Arc::clone(&self.current.read().expect("shared locale lock poisoned"))
    }
}

impl LocaleResolver for SharedLocale {
    fn resolve_locale(&self) -> Arc<Locale> {
        self.current()
    }
}

/// Forwards every [`LocaleOps`] call to the locale its resolver returns.
///
/// The locale is resolved again on every call and never cached, so
/// switching the resolver's locale takes effect immediately for every
/// holder of the proxy.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use mloc::{Locale, LocaleOps, LocaleProxy, SharedLocale, Value, config};
///
/// let en = Arc::new(Locale::builder().name("en").config(config! { "yes" => "yes" }).build().unwrap());
/// let de = Arc::new(Locale::builder().name("de").config(config! { "yes" => "ja" }).build().unwrap());
///
/// let current = SharedLocale::new(en);
/// let proxy = LocaleProxy::new(current.clone());
/// assert_eq!(proxy.get("yes", None), Some(Value::from("yes")));
///
/// current.set(de);
/// assert_eq!(proxy.get("yes", None), Some(Value::from("ja")));
/// ```
#[derive(Debug, Clone)]
pub struct LocaleProxy<R> {
    resolver: R,
}

impl<R: LocaleResolver> LocaleProxy<R> {
    pub fn new(resolver: R) -> Self {
        LocaleProxy { resolver }
    }

    /// The locale the proxy currently forwards to.
    pub fn resolve_locale(&self) -> Arc<Locale> {
        self.resolver.resolve_locale()
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }
}

impl<R: LocaleResolver> LocaleOps for LocaleProxy<R> {
    fn get(&self, key: &str, default: Option<Value>) -> Option<Value> {
        self.resolve_locale().get(key, default)
    }

    fn get_rule(&self, rule_id: &str, default: Option<Rule>) -> Option<Rule> {
        self.resolve_locale().get_rule(rule_id, default)
    }

    fn get_formatter(&self, formatter_id: &str, default: Option<Formatter>) -> Option<Formatter> {
        self.resolve_locale().get_formatter(formatter_id, default)
    }

    fn format(
        &self,
        value: &dyn Formattable,
        fmt: Option<&str>,
        default_formatter: Option<&Formatter>,
        formatter_id: Option<&str>,
    ) -> String {
        self.resolve_locale()
            .format(value, fmt, default_formatter, formatter_id)
    }

    fn apply_rule_named(
        &self,
        config_key: &str,
        rule_id: &str,
        args: &[Value],
        named: &NamedArgs,
    ) -> Result<Value, LocaleError> {
        self.resolve_locale()
            .apply_rule_named(config_key, rule_id, args, named)
    }

    fn get_text(
        &self,
        text_key: &str,
        default: Option<Value>,
        args: &[Value],
    ) -> Result<String, LocaleError> {
        self.resolve_locale().get_text(text_key, default, args)
    }

    fn register_rule(&self, rule_id: &str, rule: Rule) {
        self.resolve_locale().register_rule(rule_id, rule);
    }

    fn register_formatter(&self, formatter_id: &str, formatter: Formatter) {
        self.resolve_locale()
            .register_formatter(formatter_id, formatter);
    }
}
