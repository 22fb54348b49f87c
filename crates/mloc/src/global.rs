//! Process-wide current locale for the `global-locale` feature.
//!
//! Provides thread-safe access to a shared current `Locale`, removing the
//! need to thread a locale handle through every call site. The slot starts
//! out holding an empty root locale named `"root"`.

use std::sync::{Arc, LazyLock, RwLock};

use tracing::debug;

use crate::locale::Locale;
use crate::proxy::{LocaleProxy, LocaleResolver};

static GLOBAL_LOCALE: LazyLock<RwLock<Arc<Locale>>> =
    LazyLock::new(|| RwLock::new(Arc::new(Locale::root("root"))));

/// Replace the global current locale.
pub fn set_locale(locale: Arc<Locale>) {
    debug!(locale = locale.name(), "switching global locale");
    *GLOBAL_LOCALE.write().expect("global locale lock poisoned") = locale;
}

/// The global current locale.
pub fn current_locale() -> Arc<Locale> {
    Arc::clone(&GLOBAL_LOCALE.read().expect("global locale lock poisoned"))
}

/// Provides read access to the global current locale.
pub fn with_locale<T>(f: impl FnOnce(&Locale) -> T) -> T {
    f(&current_locale())
}

/// Resolver that always yields the global current locale.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalLocale;

impl LocaleResolver for GlobalLocale {
    fn resolve_locale(&self) -> Arc<Locale> {
        current_locale()
    }
}

impl LocaleProxy<GlobalLocale> {
    /// A proxy over the global current locale.
    pub fn global() -> Self {
        LocaleProxy::new(GlobalLocale)
    }
}
