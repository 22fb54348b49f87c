//! The resolution contract shared by [`Locale`](crate::Locale) and
//! [`LocaleProxy`](crate::LocaleProxy).

use std::sync::Arc;

use crate::error::LocaleError;
use crate::plugin::{Formattable, Formatter, NamedArgs, Rule};
use crate::types::{TypeKey, Value};

/// Resolution operations over a locale and its fallback chain.
///
/// Every lookup checks the locale itself first and on a miss asks its
/// fallback, ending at a locale without fallback which yields the supplied
/// default. Registration always targets a single locale.
pub trait LocaleOps {
    /// Resolve a configuration value.
    ///
    /// Falsy entries (`null`, `false`, `0`, `""`, empty collections) count as
    /// misses, so a child cannot override a parent with an empty value.
    fn get(&self, key: &str, default: Option<Value>) -> Option<Value>;

    /// Resolve a rule by id.
    fn get_rule(&self, rule_id: &str, default: Option<Rule>) -> Option<Rule>;

    /// Resolve a formatter by id.
    fn get_formatter(&self, formatter_id: &str, default: Option<Formatter>) -> Option<Formatter>;

    /// Render `value` as text.
    ///
    /// Dispatch order: the formatter registered under `formatter_id` (or the
    /// value's [`TypeKey`] when no id is given), then `default_formatter`,
    /// then the value's own [`LocalizedFormat`](crate::LocalizedFormat)
    /// capability, then its `Display` output. Never fails.
    fn format(
        &self,
        value: &dyn Formattable,
        fmt: Option<&str>,
        default_formatter: Option<&Formatter>,
        formatter_id: Option<&str>,
    ) -> String;

    /// Apply the rule `rule_id` to the configuration value `config_key`.
    ///
    /// Fails with [`LocaleError::RuleNotFound`] when no locale in the chain
    /// registers the rule. A missing configuration value is passed to the
    /// rule as `None`.
    fn apply_rule(
        &self,
        config_key: &str,
        rule_id: &str,
        args: &[Value],
    ) -> Result<Value, LocaleError> {
        self.apply_rule_named(config_key, rule_id, args, &NamedArgs::new())
    }

    /// [`apply_rule`](Self::apply_rule) with keyword arguments for the rule.
    fn apply_rule_named(
        &self,
        config_key: &str,
        rule_id: &str,
        args: &[Value],
        named: &NamedArgs,
    ) -> Result<Value, LocaleError>;

    /// Resolve a text and interpolate printf-style `args` into it.
    ///
    /// An unresolved key renders as the key itself unless a truthy `default`
    /// is supplied. A non-empty list resolves to its first element.
    fn get_text(
        &self,
        text_key: &str,
        default: Option<Value>,
        args: &[Value],
    ) -> Result<String, LocaleError>;

    /// Register a rule on this locale only.
    fn register_rule(&self, rule_id: &str, rule: Rule);

    /// Register a formatter on this locale only.
    fn register_formatter(&self, formatter_id: &str, formatter: Formatter);

    /// Register a formatter for every value of type `T`.
    fn register_formatter_for<T: Formattable>(&self, formatter: Formatter)
    where
        Self: Sized,
    {
        self.register_formatter(TypeKey::of::<T>().as_str(), formatter);
    }

    /// Resolve a configuration value and render it with `Display`.
    fn get_str(&self, key: &str) -> Option<String> {
        self.get(key, None).as_ref().map(ToString::to_string)
    }

    /// Whether any locale in the chain has a truthy entry for `key`.
    fn has_key(&self, key: &str) -> bool {
        self.get(key, None).is_some()
    }
}

impl<T: LocaleOps + ?Sized> LocaleOps for Arc<T> {
    fn get(&self, key: &str, default: Option<Value>) -> Option<Value> {
        (**self).get(key, default)
    }

    fn get_rule(&self, rule_id: &str, default: Option<Rule>) -> Option<Rule> {
        (**self).get_rule(rule_id, default)
    }

    fn get_formatter(&self, formatter_id: &str, default: Option<Formatter>) -> Option<Formatter> {
        (**self).get_formatter(formatter_id, default)
    }

    fn format(
        &self,
        value: &dyn Formattable,
        fmt: Option<&str>,
        default_formatter: Option<&Formatter>,
        formatter_id: Option<&str>,
    ) -> String {
        (**self).format(value, fmt, default_formatter, formatter_id)
    }

    fn apply_rule_named(
        &self,
        config_key: &str,
        rule_id: &str,
        args: &[Value],
        named: &NamedArgs,
    ) -> Result<Value, LocaleError> {
        (**self).apply_rule_named(config_key, rule_id, args, named)
    }

    fn get_text(
        &self,
        text_key: &str,
        default: Option<Value>,
        args: &[Value],
    ) -> Result<String, LocaleError> {
        (**self).get_text(text_key, default, args)
    }

    fn register_rule(&self, rule_id: &str, rule: Rule) {
        (**self).register_rule(rule_id, rule);
    }

    fn register_formatter(&self, formatter_id: &str, formatter: Formatter) {
        (**self).register_formatter(formatter_id, formatter);
    }
}
