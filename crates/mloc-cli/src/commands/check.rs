//! Implementation of the `mloc check` command.

use std::path::Path;

use mloc::interpolate::placeholder_count;
use mloc::{Catalog, Value};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::load_catalog;

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Also verify that every text value is a well-formed template
    #[arg(long)]
    pub strict: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// A template that failed to parse.
#[derive(Debug, Serialize)]
struct TemplateProblem {
    locale: String,
    key: String,
    error: String,
}

/// JSON output for check results.
#[derive(Debug, Serialize)]
struct CheckJson {
    locales: usize,
    problems: Vec<TemplateProblem>,
}

/// Run the check command.
pub fn run_check(catalog_path: &Path, args: CheckArgs) -> miette::Result<i32> {
    let catalog = load_catalog(catalog_path)?;

    let problems = if args.strict {
        template_problems(&catalog)
    } else {
        Vec::new()
    };

    if args.json {
        let output = CheckJson {
            locales: catalog.len(),
            problems,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&output).expect("JSON serialization should not fail")
        );
        return Ok(if output.problems.is_empty() {
            exitcode::OK
        } else {
            exitcode::DATAERR
        });
    }

    for problem in &problems {
        eprintln!(
            "{} {}: {}: {}",
            "error:".red().bold(),
            problem.locale,
            problem.key.cyan(),
            problem.error
        );
    }

    if problems.is_empty() {
        println!(
            "{} {} ({} locales)",
            "ok:".green().bold(),
            catalog_path.display(),
            catalog.len()
        );
        Ok(exitcode::OK)
    } else {
        Ok(exitcode::DATAERR)
    }
}

/// Every string entry (or string list element) that does not parse as a
/// printf-style template.
fn template_problems(catalog: &Catalog) -> Vec<TemplateProblem> {
    let mut problems = Vec::new();
    for name in catalog.names() {
        let Some(locale) = catalog.get(name) else {
            continue;
        };
        let mut keys: Vec<&String> = locale.config().keys().collect();
        keys.sort();
        for key in keys {
            let templates: Vec<&str> = match &locale.config()[key] {
                Value::String(text) => vec![text.as_str()],
                Value::List(items) => items.iter().filter_map(Value::as_str).collect(),
                _ => continue,
            };
            for template in templates {
                if let Err(e) = placeholder_count(template) {
                    problems.push(TemplateProblem {
                        locale: name.to_string(),
                        key: key.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
    }
    problems
}
