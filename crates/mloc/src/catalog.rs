//! Building fallback chains from locale definitions.
//!
//! A configuration provider describes each locale by name, its own
//! configuration and the name of its fallback. [`Catalog`] validates that
//! description (unknown fallbacks, cycles, excessive depth) before building
//! any locale, then constructs every locale exactly once so locales that
//! share a fallback share the same `Arc`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::error::ChainError;
use crate::locale::{Locale, MAX_CHAIN_DEPTH};
use crate::types::{Config, Value};

/// Description of one locale as supplied by a configuration provider.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
///
/// use mloc::{Catalog, LocaleDefinition, LocaleOps, Value};
///
/// let definitions: BTreeMap<String, LocaleDefinition> = serde_json::from_str(r#"{
///     "en": { "config": { "color": "color", "yes": "yes" } },
///     "en-GB": { "fallback": "en", "config": { "color": "colour" } }
/// }"#).unwrap();
///
/// let catalog = Catalog::from_definitions(definitions).unwrap();
/// let en_gb = catalog.get("en-GB").unwrap();
/// assert_eq!(en_gb.get("color", None), Some(Value::from("colour")));
/// assert_eq!(en_gb.get("yes", None), Some(Value::from("yes")));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocaleDefinition {
    /// Name of the locale consulted on a miss.
    #[serde(default)]
    pub fallback: Option<String>,

    /// The locale's own configuration.
    #[serde(default)]
    pub config: Config,
}

/// A named set of locales wired into fallback chains.
#[derive(Debug, Default)]
pub struct Catalog {
    locales: BTreeMap<String, Arc<Locale>>,
}

impl Catalog {
    /// Build every defined locale.
    pub fn from_definitions(
        definitions: BTreeMap<String, LocaleDefinition>,
    ) -> Result<Self, ChainError> {
        validate(&definitions)?;

        let mut pending = definitions;
        let mut locales: BTreeMap<String, Arc<Locale>> = BTreeMap::new();
        let names: Vec<String> = pending.keys().cloned().collect();

        for name in names {
            // Collect the not-yet-built prefix of the chain, most specific first.
            let mut unbuilt = Vec::new();
            let mut cursor = Some(name);
            while let Some(current) = cursor {
                if locales.contains_key(&current) {
                    break;
                }
                cursor = pending
                    .get(&current)
                    .and_then(|definition| definition.fallback.clone());
                unbuilt.push(current);
            }

            for current in unbuilt.into_iter().rev() {
                let Some(definition) = pending.remove(&current) else {
                    continue;
                };
                let fallback = definition
                    .fallback
                    .as_ref()
                    .and_then(|fallback| locales.get(fallback))
                    .cloned();
                let locale = Locale::builder()
                    .name(current.clone())
                    .config(definition.config)
                    .maybe_fallback(fallback)
                    .build()?;
                debug!(locale = %current, depth = locale.depth(), "built locale");
                locales.insert(current, Arc::new(locale));
            }
        }

        Ok(Catalog { locales })
    }

    /// Look up a locale by name.
    pub fn get(&self, name: &str) -> Option<Arc<Locale>> {
        self.locales.get(name).cloned()
    }

    /// Locale names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.locales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    /// Keys that `name` resolves only through its fallback chain.
    ///
    /// A key counts as inherited when some ancestor has a truthy entry for
    /// it and the locale itself has none (or only a falsy one). Returns
    /// `None` for an unknown locale.
    pub fn inherited_keys(&self, name: &str) -> Option<Vec<String>> {
        let locale = self.locales.get(name)?;
        let inherited: BTreeSet<String> = locale
            .chain()
            .skip(1)
            .flat_map(|ancestor| {
                ancestor
                    .config()
                    .iter()
                    .filter(|(_, value)| value.is_truthy())
                    .map(|(key, _)| key.clone())
                    .collect::<Vec<_>>()
            })
            .filter(|key| !locale.local(key).is_some_and(Value::is_truthy))
            .collect();
        Some(inherited.into_iter().collect())
    }
}

/// Reject unknown fallbacks, cycles and over-deep chains.
fn validate(definitions: &BTreeMap<String, LocaleDefinition>) -> Result<(), ChainError> {
    for (name, definition) in definitions {
        if let Some(fallback) = &definition.fallback {
            if !definitions.contains_key(fallback) {
                return Err(ChainError::UnknownFallback {
                    locale: name.clone(),
                    fallback: fallback.clone(),
                });
            }
        }
    }

    for name in definitions.keys() {
        let mut chain = vec![name.clone()];
        let mut cursor = definitions[name].fallback.as_ref();
        while let Some(next) = cursor {
            let seen = chain.contains(next);
            chain.push(next.clone());
            if seen {
                return Err(ChainError::Cycle { chain });
            }
            if chain.len() > MAX_CHAIN_DEPTH {
                return Err(ChainError::TooDeep {
                    locale: name.clone(),
                    max: MAX_CHAIN_DEPTH,
                });
            }
            cursor = definitions[next].fallback.as_ref();
        }
    }
    Ok(())
}
