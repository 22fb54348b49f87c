//! CLI command implementations.

mod check;
mod coverage;
mod get;
mod text;

use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::path::Path;
use std::sync::Arc;

use mloc::{Catalog, Locale, LocaleDefinition, Value};
use tracing::info;

use crate::output::CatalogDiagnostic;

pub use check::{CheckArgs, run_check};
pub use coverage::{CoverageArgs, run_coverage};
pub use get::{GetArgs, run_get};
pub use text::{TextArgs, run_text};

/// Read and build the catalog at `path`.
///
/// JSON errors are reported as diagnostics pointing into the file.
fn load_catalog(path: &Path) -> miette::Result<Catalog> {
    let content = read_to_string(path)
        .map_err(|e| miette::miette!("Cannot read catalog file {}: {}", path.display(), e))?;

    let definitions: BTreeMap<String, LocaleDefinition> = serde_json::from_str(&content)
        .map_err(|e| CatalogDiagnostic::from_json_error(path, &content, &e))?;

    let catalog = Catalog::from_definitions(definitions)
        .map_err(|e| miette::miette!("Invalid catalog {}: {}", path.display(), e))?;
    info!(path = %path.display(), locales = catalog.len(), "loaded catalog");
    Ok(catalog)
}

/// Look up the locale to resolve against.
fn select_locale(catalog: &Catalog, name: &str) -> miette::Result<Arc<Locale>> {
    catalog.get(name).ok_or_else(|| {
        let known: Vec<&str> = catalog.names().collect();
        miette::miette!(
            "Unknown locale '{}', catalog defines: {}",
            name,
            known.join(", ")
        )
    })
}

/// Interpret a command-line argument: integer, then float, then string.
fn parse_value(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        Value::from(n)
    } else if let Ok(f) = raw.parse::<f64>() {
        Value::from(f)
    } else {
        Value::from(raw)
    }
}
