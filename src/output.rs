//! Output Formatting - Table and JSON output
//!
//! This module provides consistent output formatting across all resource
//! commands. Tables pick a fixed set of fields out of each JSON record.

use std::io;

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resources::Column;

/// Output format options
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed table format (default for interactive use)
    #[default]
    Table,
    /// The server's JSON response, pretty-printed
    Json,
}

/// Output writer that handles formatting based on configuration
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_table(&self) -> bool {
        self.format == OutputFormat::Table
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green().bold(), message);
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", style("⚠").yellow().bold(), message);
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").cyan().bold(), message);
    }

    /// Print a header/title with styled formatting
    pub fn header(&self, title: &str) {
        println!("{}", style(title).bold().cyan());
    }

    /// Print raw output
    pub fn print(&self, message: &str) {
        println!("{}", message);
    }

    /// Print JSON output
    pub fn json<T: Serialize + ?Sized>(&self, data: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        println!("{}", json);
        Ok(())
    }

    /// Print a table
    pub fn table(&self, table: &Table) {
        println!("{}", table);
    }

    /// Create a new styled table
    pub fn create_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table
    }

    /// Create a table with headers
    pub fn create_table_with_headers(&self, headers: &[&str]) -> Table {
        let mut table = self.create_table();
        table.set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
        table
    }

    /// Build a table of `columns` picked out of each record
    pub fn records_table(&self, records: &[Value], columns: &[Column]) -> Table {
        let headers: Vec<&str> = columns.iter().map(|c| c.field).collect();
        let mut table = self.create_table_with_headers(&headers);

        for record in records {
            table.add_row(
                columns
                    .iter()
                    .map(|c| Cell::new(cell_text(record.get(c.field))).fg(c.color))
                    .collect::<Vec<_>>(),
            );
        }

        table
    }

    /// Print records as a table
    pub fn records(&self, records: &[Value], columns: &[Column]) {
        self.table(&self.records_table(records, columns));
    }
}

/// Render one JSON field for a table cell. Strings print without quotes and
/// missing or null fields print empty.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| cell_text(Some(v)))
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
    }
}

/// Spinner shown while a request is in flight
pub struct ProgressIndicator {
    bar: indicatif::ProgressBar,
}

impl ProgressIndicator {
    /// Create a new spinner on stderr; hidden when stderr is not a terminal
    pub fn spinner(message: &str) -> Self {
        let bar = indicatif::ProgressBar::new_spinner();
        if let Ok(template) = indicatif::ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            bar.set_style(template);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { bar }
    }

    /// Finish and clear
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}
