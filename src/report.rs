//! Report rendering.
//!
//! Text layout per file:
//!
//! ```text
//! ==================================================
//! FILE: patients.csv
//! ==================================================
//! Rows: 3 | Columns: 1
//! Column names: a
//! Missing cells: 0 of 3 (0.00%)
//!
//! Null values
//!   a: 0 (0.00%)
//! Unique values
//!   a: 2
//! Most frequent values
//!   a: "1" (2), "2" (1)
//! Maximum value length
//!   a: 1
//! ```
//!
//! Cell values are quoted and escaped, and column and file names escaped, so
//! every column stays on one line whatever the data holds.

use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::column_statistics::{ColumnStatistics, ValueCount, characterize_columns, percentage};
use crate::config::{OutputFormat, ReportConfig};
use crate::dataset::Dataset;

const BANNER_WIDTH: usize = 50;

const ANSI_CYAN: &str = "\x1b[36m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_RESET: &str = "\x1b[0m";

/// Statistics for one analyzed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// File name without directories
    pub file: String,
    pub path: String,
    pub rows: usize,
    pub columns: Vec<ColumnStatistics>,
}

impl FileReport {
    pub fn new(path: &Path, dataset: &Dataset) -> Self {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Self {
            file,
            path: path.to_string_lossy().into_owned(),
            rows: dataset.row_count(),
            columns: characterize_columns(dataset),
        }
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    /// Rows times columns.
    pub fn cell_count(&self) -> u64 {
        self.rows as u64 * self.columns.len() as u64
    }

    /// Null cells across all columns.
    pub fn missing_cells(&self) -> u64 {
        self.columns.iter().map(|column| column.nulls).sum()
    }

    /// Share of null cells in the whole file, in percent.
    pub fn missing_percentage(&self) -> f64 {
        percentage(self.missing_cells(), self.cell_count())
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file: &'a str,
    path: &'a str,
    rows: usize,
    column_names: Vec<&'a str>,
    missing_cells: u64,
    missing_percentage: f64,
    columns: Vec<JsonColumn<'a>>,
}

#[derive(Serialize)]
struct JsonColumn<'a> {
    name: &'a str,
    nulls: u64,
    null_percentage: f64,
    unique: u64,
    frequencies: &'a [ValueCount],
    max_length: usize,
}

/// Writes `report` in the configured format.
pub fn render<W: Write + ?Sized>(
    report: &FileReport,
    config: &ReportConfig,
    out: &mut W,
) -> io::Result<()> {
    match config.format {
        OutputFormat::Text => render_text(report, config, out),
        OutputFormat::Json => render_json(report, config, out),
    }
}

/// Writes the human-readable sections for one file.
pub fn render_text<W: Write + ?Sized>(
    report: &FileReport,
    config: &ReportConfig,
    out: &mut W,
) -> io::Result<()> {
    let paint = |text: &str, color: &str| {
        if config.color {
            format!("{color}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    };

    let rule = "=".repeat(BANNER_WIDTH);
    writeln!(out, "{}", paint(&rule, ANSI_CYAN))?;
    writeln!(
        out,
        "{}",
        paint(&format!("FILE: {}", report.file.escape_debug()), ANSI_CYAN)
    )?;
    writeln!(out, "{}", paint(&rule, ANSI_CYAN))?;
    writeln!(out, "Rows: {} | Columns: {}", report.rows, report.columns.len())?;
    writeln!(
        out,
        "Column names: {}",
        report
            .column_names()
            .map(|name| name.escape_debug().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    )?;
    writeln!(
        out,
        "Missing cells: {} of {} ({:.2}%)",
        report.missing_cells(),
        report.cell_count(),
        report.missing_percentage()
    )?;
    writeln!(out)?;

    writeln!(out, "{}", paint("Null values", ANSI_YELLOW))?;
    for column in &report.columns {
        writeln!(
            out,
            "  {}: {} ({:.2}%)",
            column.name.escape_debug(),
            column.nulls,
            column.null_percentage()
        )?;
    }

    writeln!(out, "{}", paint("Unique values", ANSI_YELLOW))?;
    for column in &report.columns {
        writeln!(out, "  {}: {}", column.name.escape_debug(), column.unique)?;
    }

    writeln!(out, "{}", paint("Most frequent values", ANSI_YELLOW))?;
    for column in &report.columns {
        let entries = shown_frequencies(column, config.top_k)
            .iter()
            .map(|entry| format!("{:?} ({})", entry.value, entry.count))
            .collect::<Vec<_>>()
            .join(", ");

        if entries.is_empty() {
            writeln!(out, "  {}:", column.name.escape_debug())?;
        } else {
            writeln!(out, "  {}: {}", column.name.escape_debug(), entries)?;
        }
    }

    writeln!(out, "{}", paint("Maximum value length", ANSI_YELLOW))?;
    for column in &report.columns {
        writeln!(out, "  {}: {}", column.name.escape_debug(), column.max_length)?;
    }

    writeln!(out)?;
    Ok(())
}

/// Writes one JSON object followed by a newline.
pub fn render_json<W: Write + ?Sized>(
    report: &FileReport,
    config: &ReportConfig,
    out: &mut W,
) -> io::Result<()> {
    let json = JsonReport {
        file: &report.file,
        path: &report.path,
        rows: report.rows,
        column_names: report.column_names().collect(),
        missing_cells: report.missing_cells(),
        missing_percentage: report.missing_percentage(),
        columns: report
            .columns
            .iter()
            .map(|column| JsonColumn {
                name: &column.name,
                nulls: column.nulls,
                null_percentage: column.null_percentage(),
                unique: column.unique,
                frequencies: shown_frequencies(column, config.top_k),
                max_length: column.max_length,
            })
            .collect(),
    };

    serde_json::to_writer(&mut *out, &json).map_err(io::Error::other)?;
    writeln!(out)
}

fn shown_frequencies(column: &ColumnStatistics, top_k: Option<usize>) -> &[ValueCount] {
    let shown = top_k.map_or(column.frequencies.len(), |k| k.min(column.frequencies.len()));
    &column.frequencies[..shown]
}
