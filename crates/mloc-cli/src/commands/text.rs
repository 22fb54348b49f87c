//! Implementation of the `mloc text` command.

use std::path::Path;

use mloc::{LocaleOps, Value};
use serde::Serialize;

use super::{load_catalog, parse_value, select_locale};

/// Arguments for the text command.
#[derive(Debug, clap::Args)]
pub struct TextArgs {
    /// Text key to resolve
    pub key: String,

    /// Interpolation arguments, in placeholder order
    pub args: Vec<String>,

    /// Text used when no locale in the chain defines the key
    #[arg(long)]
    pub default: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for text results.
#[derive(Serialize)]
pub struct TextResult {
    pub result: String,
}

/// Run the text command.
pub fn run_text(catalog_path: &Path, locale_name: &str, args: TextArgs) -> miette::Result<i32> {
    let catalog = load_catalog(catalog_path)?;
    let locale = select_locale(&catalog, locale_name)?;

    let values: Vec<Value> = args.args.iter().map(|raw| parse_value(raw)).collect();

    match locale.get_text(&args.key, args.default.map(Value::from), &values) {
        Ok(result) => {
            if args.json {
                let output = TextResult { result };
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output)
                        .expect("JSON serialization should not fail")
                );
            } else {
                println!("{}", result);
            }
            Ok(exitcode::OK)
        }
        Err(e) => {
            if args.json {
                let output = serde_json::json!({
                    "error": e.to_string()
                });
                eprintln!(
                    "{}",
                    serde_json::to_string_pretty(&output)
                        .expect("JSON serialization should not fail")
                );
            } else {
                eprintln!("Text error: {}", e);
            }
            Ok(exitcode::DATAERR)
        }
    }
}
