//! Locales and their fallback chains.
//!
//! A [`Locale`] owns a read-only configuration map plus two registries
//! (rules and formatters) that grow at runtime. Each locale may point at a
//! shared fallback locale; every lookup that misses locally is delegated to
//! the fallback's same operation, so a chain such as `en-GB -> en -> root`
//! resolves most-specific first.

use std::collections::{BTreeSet, HashMap};
use std::fmt::{self, Debug};
use std::iter::successors;
use std::sync::{Arc, RwLock};

use bon::bon;
use tracing::{debug, trace};

use crate::error::{ChainError, LocaleError, compute_suggestions};
use crate::interpolate::interpolate;
use crate::ops::LocaleOps;
use crate::plugin::{Formattable, Formatter, NamedArgs, Rule};
use crate::types::{Config, TypeKey, Value};

/// Maximum number of locales in one fallback chain, the locale included.
pub const MAX_CHAIN_DEPTH: usize = 64;

/// A resolvable locale: configuration, rules, formatters and an optional
/// fallback.
///
/// Registries are guarded by per-locale read-write locks, so a locale can be
/// shared across threads behind an `Arc` and still accept registrations.
/// Lookups clone the registered handle and release the lock before invoking
/// it, which lets rules and formatters call back into the locale.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use mloc::{Locale, LocaleOps, Value, config};
///
/// let en = Arc::new(
///     Locale::builder()
///         .name("en")
///         .config(config! { "greeting" => vec!["Hello %s"], "currency" => "USD" })
///         .build()
///         .unwrap(),
/// );
/// let en_gb = Locale::builder()
///     .name("en-GB")
///     .config(config! { "currency" => "GBP" })
///     .fallback(en)
///     .build()
///     .unwrap();
///
/// assert_eq!(en_gb.get("currency", None), Some(Value::from("GBP")));
/// assert_eq!(en_gb.get_text("greeting", None, &["World".into()]).unwrap(), "Hello World");
/// ```
pub struct Locale {
    name: String,
    config: Config,
    rules: RwLock<HashMap<String, Rule>>,
    formatters: RwLock<HashMap<String, Formatter>>,
    fallback: Option<Arc<Locale>>,
}

#[bon]
impl Locale {
    /// Build a locale, validating its fallback chain.
    ///
    /// Fails if the chain already contains a locale with the same name or
    /// would exceed [`MAX_CHAIN_DEPTH`] locales.
    #[builder]
    pub fn new(
        #[builder(into)] name: String,
        #[builder(default)] config: Config,
        fallback: Option<Arc<Locale>>,
    ) -> Result<Self, ChainError> {
        check_chain(&name, fallback.as_deref())?;
        Ok(Locale {
            name,
            config,
            rules: RwLock::default(),
            formatters: RwLock::default(),
            fallback,
        })
    }
}

impl Locale {
    /// An empty locale with no fallback.
    pub fn root(name: impl Into<String>) -> Self {
        Locale {
            name: name.into(),
            config: Config::new(),
            rules: RwLock::default(),
            formatters: RwLock::default(),
            fallback: None,
        }
    }

    /// The locale's name, e.g. `"en-GB"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// This locale's own configuration, without fallback.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The raw local entry for `key`, including falsy values.
    pub fn local(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }

    /// The fallback locale, if any.
    pub fn fallback(&self) -> Option<&Arc<Locale>> {
        self.fallback.as_ref()
    }

    /// This locale followed by each of its ancestors.
    pub fn chain(&self) -> impl Iterator<Item = &Locale> {
        successors(Some(self), |locale| locale.fallback.as_deref())
    }

    /// Number of locales in the chain, this one included.
    pub fn depth(&self) -> usize {
        self.chain().count()
    }

    /// Rule ids visible from this locale, sorted and deduplicated.
    pub fn rule_ids(&self) -> Vec<String> {
        let ids: BTreeSet<String> = self
            .chain()
            .flat_map(|locale| {
                let rules = locale.rules.read().expect("rule registry lock poisoned");
                rules.keys().cloned().collect::<Vec<_>>()
            })
            .collect();
        ids.into_iter().collect()
    }

    /// Formatter ids visible from this locale, sorted and deduplicated.
    pub fn formatter_ids(&self) -> Vec<String> {
        let ids: BTreeSet<String> = self
            .chain()
            .flat_map(|locale| {
                let formatters = locale
                    .formatters
                    .read()
                    .expect("formatter registry lock poisoned");
                formatters.keys().cloned().collect::<Vec<_>>()
            })
            .collect();
        ids.into_iter().collect()
    }

    fn local_rule(&self, rule_id: &str) -> Option<Rule> {
        self.rules
            .read()
            .expect("rule registry lock poisoned")
            .get(rule_id)
            .cloned()
    }

    fn local_formatter(&self, formatter_id: &str) -> Option<Formatter> {
        self.formatters
            .read()
            .expect("formatter registry lock poisoned")
            .get(formatter_id)
            .cloned()
    }
}

/// Walk the prospective fallback chain of a locale named `name`.
fn check_chain(name: &str, fallback: Option<&Locale>) -> Result<(), ChainError> {
    let mut chain = vec![name.to_string()];
    let mut next = fallback;
    while let Some(ancestor) = next {
        chain.push(ancestor.name.clone());
        if ancestor.name == name {
            return Err(ChainError::Cycle { chain });
        }
        if chain.len() > MAX_CHAIN_DEPTH {
            return Err(ChainError::TooDeep {
                locale: name.to_string(),
                max: MAX_CHAIN_DEPTH,
            });
        }
        next = ancestor.fallback.as_deref();
    }
    Ok(())
}

impl LocaleOps for Locale {
    fn get(&self, key: &str, default: Option<Value>) -> Option<Value> {
        if let Some(value) = self.config.get(key).filter(|value| value.is_truthy()) {
            return Some(value.clone());
        }
        match &self.fallback {
            Some(fallback) => {
                trace!(locale = %self.name, fallback = %fallback.name, key, "config miss");
                fallback.get(key, default)
            }
            None => default,
        }
    }

    fn get_rule(&self, rule_id: &str, default: Option<Rule>) -> Option<Rule> {
        if let Some(rule) = self.local_rule(rule_id) {
            return Some(rule);
        }
        match &self.fallback {
            Some(fallback) => {
                trace!(locale = %self.name, fallback = %fallback.name, rule_id, "rule miss");
                fallback.get_rule(rule_id, default)
            }
            None => default,
        }
    }

    fn get_formatter(&self, formatter_id: &str, default: Option<Formatter>) -> Option<Formatter> {
        if let Some(formatter) = self.local_formatter(formatter_id) {
            return Some(formatter);
        }
        match &self.fallback {
            Some(fallback) => {
                trace!(
                    locale = %self.name,
                    fallback = %fallback.name,
                    formatter_id,
                    "formatter miss"
                );
                fallback.get_formatter(formatter_id, default)
            }
            None => default,
        }
    }

    fn format(
        &self,
        value: &dyn Formattable,
        fmt: Option<&str>,
        default_formatter: Option<&Formatter>,
        formatter_id: Option<&str>,
    ) -> String {
        let dispatch_key = match formatter_id.filter(|id| !id.is_empty()) {
            Some(id) => TypeKey::named(id),
            None => value.type_key(),
        };

        if let Some(formatter) = self.get_formatter(dispatch_key.as_str(), default_formatter.cloned())
        {
            debug!(locale = %self.name, %dispatch_key, "formatting with registered formatter");
            return formatter.call(value, self, fmt);
        }
        if let Some(localized) = value.as_localized() {
            debug!(locale = %self.name, %dispatch_key, "formatting with localized format");
            return localized.localized_format(self, fmt);
        }
        value.to_string()
    }

    fn apply_rule_named(
        &self,
        config_key: &str,
        rule_id: &str,
        args: &[Value],
        named: &NamedArgs,
    ) -> Result<Value, LocaleError> {
        let Some(rule) = self.get_rule(rule_id, None) else {
            return Err(LocaleError::RuleNotFound {
                rule_id: rule_id.to_string(),
                locale: self.name.clone(),
                suggestions: compute_suggestions(rule_id, &self.rule_ids()),
            });
        };
        let resolved = self.get(config_key, None);
        Ok(rule.call_with_named(resolved, args, named))
    }

    fn get_text(
        &self,
        text_key: &str,
        default: Option<Value>,
        args: &[Value],
    ) -> Result<String, LocaleError> {
        let default = default
            .filter(Value::is_truthy)
            .unwrap_or_else(|| Value::from(text_key));
        let resolved = self.get(text_key, Some(default)).unwrap_or_default();

        let text = match resolved.as_list().and_then(<[Value]>::first) {
            Some(first) => first.to_string(),
            None => resolved.to_string(),
        };

        if args.is_empty() {
            return Ok(text);
        }
        interpolate(&text, args).map_err(|source| LocaleError::FormatMismatch {
            key: text_key.to_string(),
            source,
        })
    }

    fn register_rule(&self, rule_id: &str, rule: Rule) {
        self.rules
            .write()
            .expect("rule registry lock poisoned")
            .insert(rule_id.to_string(), rule);
        debug!(locale = %self.name, rule_id, "registered rule");
    }

    fn register_formatter(&self, formatter_id: &str, formatter: Formatter) {
        self.formatters
            .write()
            .expect("formatter registry lock poisoned")
            .insert(formatter_id.to_string(), formatter);
        debug!(locale = %self.name, formatter_id, "registered formatter");
    }
}

impl Debug for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locale")
            .field("name", &self.name)
            .field("config_keys", &self.config.len())
            .field("fallback", &self.fallback.as_ref().map(|locale| &locale.name))
            .finish_non_exhaustive()
    }
}
