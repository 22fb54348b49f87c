//! mloc CLI entry point.
//!
//! Command-line tools for inspecting locale catalogs:
//! - `mloc get` - Resolve a configuration value through the fallback chain
//! - `mloc text` - Resolve and interpolate a text
//! - `mloc check` - Validate a catalog file
//! - `mloc coverage` - Report which keys each locale inherits

mod commands;
mod output;

use std::io::stderr;
use std::path::PathBuf;
use std::process::exit;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use commands::{
    CheckArgs, CoverageArgs, GetArgs, TextArgs, run_check, run_coverage, run_get, run_text,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Locale catalog tools.
#[derive(Debug, Parser)]
#[command(name = "mloc")]
#[command(about = "Locale catalog tools", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Catalog file with locale definitions (JSON)
    #[arg(long, env = "MLOC_CATALOG", global = true, default_value = "locales.json")]
    pub catalog: PathBuf,

    /// Locale used for resolution
    #[arg(short, long, env = "MLOC_LOCALE", global = true, default_value = "en")]
    pub locale: String,

    /// Color output control
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto, global = true)]
    pub color: ColorWhen,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// When to use colored output.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve a configuration value
    Get(GetArgs),
    /// Resolve a text and interpolate arguments into it
    Text(TextArgs),
    /// Validate the catalog file
    Check(CheckArgs),
    /// Report keys each locale resolves through fallback
    Coverage(CoverageArgs),
}

/// Set up color output based on user preference.
fn setup_colors(color_when: ColorWhen) {
    match color_when {
        ColorWhen::Auto => {
            // owo-colors automatically checks TTY, NO_COLOR, FORCE_COLOR
        }
        ColorWhen::Always => {
            owo_colors::set_override(true);
        }
        ColorWhen::Never => {
            owo_colors::set_override(false);
        }
    }
}

/// Install a stderr subscriber. `RUST_LOG` wins over `-v` when set.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(stderr)
                .with_target(verbose >= 2),
        )
        .init();
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    setup_colors(cli.color);
    init_tracing(cli.verbose);

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))?;

    let result = match cli.command {
        Commands::Get(args) => run_get(&cli.catalog, &cli.locale, args),
        Commands::Text(args) => run_text(&cli.catalog, &cli.locale, args),
        Commands::Check(args) => run_check(&cli.catalog, args),
        Commands::Coverage(args) => run_coverage(&cli.catalog, args),
    };

    match result {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("{:?}", e);
            exit(exitcode::SOFTWARE);
        }
    }
}
