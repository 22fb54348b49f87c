//! Coverage command implementation.

use std::path::Path;

use clap::Args;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use super::load_catalog;
use crate::output::table::{LocaleCoverage, format_coverage_table};

/// Arguments for the coverage command.
#[derive(Debug, Args)]
pub struct CoverageArgs {
    /// Locales to report on (comma-separated). Defaults to every locale.
    #[arg(long = "only", value_delimiter = ',')]
    pub locales: Vec<String>,

    /// List the inherited keys of each locale.
    #[arg(long)]
    pub keys: bool,

    /// Output results as JSON.
    #[arg(long)]
    pub json: bool,
}

/// JSON output format for coverage data.
#[derive(Debug, Serialize)]
struct CoverageJson {
    locale: String,
    fallback: Option<String>,
    local: usize,
    inherited: Vec<String>,
}

/// Run the coverage command.
pub fn run_coverage(catalog_path: &Path, args: CoverageArgs) -> Result<i32> {
    let catalog = load_catalog(catalog_path)?;

    let names: Vec<String> = if args.locales.is_empty() {
        catalog.names().map(str::to_string).collect()
    } else {
        args.locales.clone()
    };

    let mut coverage_data: Vec<LocaleCoverage> = Vec::new();
    for name in &names {
        let (Some(locale), Some(inherited)) = (catalog.get(name), catalog.inherited_keys(name))
        else {
            eprintln!("Unknown locale '{}'", name);
            return Ok(exitcode::DATAERR);
        };

        coverage_data.push(LocaleCoverage {
            locale: name.clone(),
            fallback: locale.fallback().map(|f| f.name().to_string()),
            local: locale
                .config()
                .values()
                .filter(|value| value.is_truthy())
                .count(),
            inherited,
        });
    }

    if args.json {
        let json_data: Vec<CoverageJson> = coverage_data
            .into_iter()
            .map(|c| CoverageJson {
                locale: c.locale,
                fallback: c.fallback,
                local: c.local,
                inherited: c.inherited,
            })
            .collect();

        let json_output = serde_json::to_string_pretty(&json_data).into_diagnostic()?;
        println!("{}", json_output);
    } else {
        let table = format_coverage_table(&coverage_data);
        println!("{}", table);

        if args.keys {
            for coverage in &coverage_data {
                if !coverage.inherited.is_empty() {
                    println!("\nInherited by {}:", coverage.locale);
                    for key in &coverage.inherited {
                        println!("  - {}", key);
                    }
                }
            }
        }
    }

    Ok(exitcode::OK)
}
