//! Command line surface and the explicit report configuration.
//!
//! Every setting the reporter needs travels in a [`ReportConfig`] handed to
//! it at call time. Environment variables are only consulted through
//! `clap`'s `env` attribute while parsing [`Cli`].

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::error::{CharacterizeError, Result};

pub const DEFAULT_SOURCE_DIR: &str = "data/original";
pub const DEFAULT_CLEAN_DATA: &str = "data/clean/clean_data.csv";

/// Report rendering format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable sections per file
    #[default]
    Text,
    /// One JSON object per file, one per line
    Json,
}

/// Print per-column null counts, unique counts, frequency tables and
/// maximum value lengths for CSV files.
#[derive(Parser, Debug)]
#[command(name = "characterize")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:\n  \
    # Characterize every CSV file in a directory\n  \
    characterize data/original\n\n  \
    # Characterize one file, showing the five most frequent values\n  \
    characterize data/clean/clean_data.csv --top 5\n\n  \
    # Source directory followed by the clean data file\n  \
    characterize --pipeline --report-dir reports")]
pub struct Cli {
    /// CSV file or directory of CSV files to characterize
    #[arg(env = "CHARACTERIZE_PATH")]
    pub path: Option<PathBuf>,

    /// Directory holding the original data, used by --pipeline
    #[arg(long, env = "CHARACTERIZE_SOURCE_DIR", default_value = DEFAULT_SOURCE_DIR)]
    pub source_dir: PathBuf,

    /// Clean data file, used by --pipeline
    #[arg(long, env = "CHARACTERIZE_CLEAN_DATA", default_value = DEFAULT_CLEAN_DATA)]
    pub clean_data: PathBuf,

    /// Characterize the source directory, then the clean data file
    /// (takes priority over PATH)
    #[arg(long)]
    pub pipeline: bool,

    /// Also save each text report under this directory
    #[arg(long, env = "CHARACTERIZE_REPORT_DIR")]
    pub report_dir: Option<PathBuf>,

    /// Show at most this many frequent values per column
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Field delimiter (single ASCII character)
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Colour section headings with ANSI escapes
    #[arg(long)]
    pub color: bool,

    /// Increase diagnostic logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// What to characterize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A single file or a directory of CSV files
    Path(PathBuf),
    /// The source directory followed by the clean data file
    Pipeline {
        source_dir: PathBuf,
        clean_data: PathBuf,
    },
}

/// Settings that shape a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Maximum frequency entries rendered per column; `None` renders all
    pub top_k: Option<usize>,
    pub delimiter: u8,
    pub format: OutputFormat,
    pub color: bool,
    /// Where text reports are saved in addition to the sink
    pub report_dir: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_k: None,
            delimiter: b',',
            format: OutputFormat::Text,
            color: false,
            report_dir: None,
        }
    }
}

impl ReportConfig {
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = Some(dir.into());
        self
    }
}

impl Cli {
    /// Resolves what the invocation asks to characterize.
    ///
    /// `--pipeline` wins over a path, so an exported `CHARACTERIZE_PATH`
    /// does not get in its way.
    ///
    /// # Errors
    ///
    /// `Usage` when neither a path nor `--pipeline` was given.
    pub fn target(&self) -> Result<Target> {
        if self.pipeline {
            return Ok(Target::Pipeline {
                source_dir: self.source_dir.clone(),
                clean_data: self.clean_data.clone(),
            });
        }
        match &self.path {
            Some(path) => Ok(Target::Path(path.clone())),
            None => Err(CharacterizeError::usage(
                "missing input: pass a CSV file or directory, or use --pipeline",
            )),
        }
    }

    /// Builds the report configuration.
    ///
    /// # Errors
    ///
    /// `Usage` when the delimiter is not a single ASCII character.
    pub fn report_config(&self) -> Result<ReportConfig> {
        if !self.delimiter.is_ascii() {
            return Err(CharacterizeError::usage(format!(
                "delimiter must be an ASCII character, got {:?}",
                self.delimiter
            )));
        }

        Ok(ReportConfig {
            top_k: self.top,
            delimiter: self.delimiter as u8,
            format: self.format,
            color: self.color,
            report_dir: self.report_dir.clone(),
        })
    }
}
