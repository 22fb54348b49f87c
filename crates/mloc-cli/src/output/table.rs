//! Table formatting utilities for CLI output.

use comfy_table::{presets, ContentArrangement, Table};

/// How much of a locale's configuration is its own.
pub struct LocaleCoverage {
    /// Locale name (e.g., "en-GB").
    pub locale: String,
    /// Name of the direct fallback, if any.
    pub fallback: Option<String>,
    /// Number of truthy entries defined by the locale itself.
    pub local: usize,
    /// Keys resolved only through the fallback chain.
    pub inherited: Vec<String>,
}

/// Format coverage data as an ASCII table.
pub fn format_coverage_table(coverage: &[LocaleCoverage]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Locale", "Fallback", "Local", "Inherited"]);

    for row in coverage {
        table.add_row(vec![
            row.locale.clone(),
            row.fallback.clone().unwrap_or_else(|| "-".to_string()),
            row.local.to_string(),
            row.inherited.len().to_string(),
        ]);
    }

    table
}
