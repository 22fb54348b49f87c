//! Implementation of the `mloc get` command.

use std::path::Path;

use mloc::{LocaleOps, Value};
use serde::Serialize;

use super::{load_catalog, select_locale};

/// Arguments for the get command.
#[derive(Debug, clap::Args)]
pub struct GetArgs {
    /// Configuration key to resolve
    pub key: String,

    /// Value printed when no locale in the chain defines the key
    #[arg(long)]
    pub default: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for get results.
#[derive(Serialize)]
pub struct GetResult<'a> {
    pub locale: &'a str,
    pub key: &'a str,
    pub value: Option<String>,
    pub kind: Option<&'static str>,
}

/// Run the get command.
pub fn run_get(catalog_path: &Path, locale_name: &str, args: GetArgs) -> miette::Result<i32> {
    let catalog = load_catalog(catalog_path)?;
    let locale = select_locale(&catalog, locale_name)?;

    let resolved = locale.get(&args.key, args.default.map(Value::from));

    if args.json {
        let output = GetResult {
            locale: locale.name(),
            key: &args.key,
            value: resolved.as_ref().map(Value::to_string),
            kind: resolved.as_ref().map(Value::kind),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&output).expect("JSON serialization should not fail")
        );
    }

    match resolved {
        Some(value) => {
            if !args.json {
                println!("{}", value);
            }
            Ok(exitcode::OK)
        }
        None => {
            if !args.json {
                eprintln!("Key '{}' not found in locale '{}'", args.key, locale.name());
            }
            Ok(exitcode::DATAERR)
        }
    }
}
