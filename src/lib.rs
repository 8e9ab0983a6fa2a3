//! # CSV Dataset Characterizer
//!
//! Computes per-column descriptive statistics for a CSV file or a directory
//! of CSV files and prints them as a readable report.
//!
//! ## Features
//!
//! - Null counts, unique value counts, frequency tables and maximum value
//!   length for every column
//! - Deterministic file order (lexicographic by file name) and byte-identical
//!   output across runs
//! - Per-file failure isolation: missing or malformed files produce a warning
//!   and the batch continues
//! - Text or JSON-lines output, optional saved text reports
//!
//! ## Usage
//!
//! ### As a library
//!
//! ```rust,no_run
//! use std::path::Path;
//! use csv_characterizer_rust::{ReportConfig, StatisticsReporter};
//!
//! let reporter = StatisticsReporter::new(ReportConfig::default().with_top_k(5));
//! let outcome = reporter
//!     .characterize(Path::new("data/original"), &mut std::io::stdout())
//!     .unwrap();
//! std::process::exit(i32::from(outcome.exit_code()));
//! ```
//!
//! ### From command line
//!
//! ```bash
//! # Characterize every CSV file in a directory
//! $ characterize data/original
//!
//! # Characterize a single file, saving the report as well
//! $ characterize data/clean/clean_data.csv --report-dir reports
//!
//! # Source directory, then clean data file
//! $ characterize --pipeline
//! ```
//!
//! ## Exit codes
//!
//! 0. every targeted file was analyzed
//! 1. at least one file was missing, unreadable or malformed
//! 2. usage error

pub mod column_statistics;
pub mod config;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod report;
pub mod reporter;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};

pub use column_statistics::{ColumnStatistics, ValueCount, characterize_columns};
pub use config::{Cli, OutputFormat, ReportConfig, Target};
pub use dataset::Dataset;
pub use error::{CharacterizeError, Result};
pub use report::FileReport;
pub use reporter::{
    BatchOutcome, EXIT_FAILURE, EXIT_USAGE, FileFailure, FileOutcome, StatisticsReporter,
    analyze_file,
};

/// Main entry point for the `characterize` binary.
///
/// Parses the command line, sets up logging, resolves the target and runs
/// the batch with the report on stdout and warnings on stderr.
///
/// # Command Line Arguments
///
/// * Path mode: `characterize <file-or-directory> [options]`
/// * Pipeline mode: `characterize --pipeline [--source-dir DIR] [--clean-data FILE]`
///
/// # Workflow
///
/// 1. Parse arguments (clap exits with code 2 on malformed flags)
/// 2. Resolve the target and report configuration
/// 3. Characterize each file in order, streaming its section to stdout
/// 4. Map the batch outcome to the process exit code
pub fn csv_characterizer_main() -> ExitCode {
    let cli = Cli::parse();

    let logging = logging::LoggingConfig::from_verbosity(cli.verbose);
    if let Err(e) = logging::init_logging(&logging) {
        eprintln!("warning: logging disabled: {e}");
    }

    let (target, config) = match cli.target().and_then(|t| Ok((t, cli.report_config()?))) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("{}", Cli::command().render_usage());
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let reporter = StatisticsReporter::new(config);
    let mut out = io::stdout().lock();
    let mut warnings = io::stderr().lock();

    let result = reporter.characterize_target(&target, &mut out, &mut warnings);
    ExitCode::from(finish(result, &mut out, &mut warnings))
}

/// Flushes the report sink and maps the batch result to an exit code.
///
/// A failed final flush counts as a sink failure.
fn finish<W, E>(result: Result<BatchOutcome>, out: &mut W, warnings: &mut E) -> u8
where
    W: Write + ?Sized,
    E: Write + ?Sized,
{
    let outcome = match result.and_then(|outcome| {
        out.flush()?;
        Ok(outcome)
    }) {
        Ok(outcome) => outcome,
        Err(e) => {
            let _ = writeln!(warnings, "error: {e}");
            return EXIT_FAILURE;
        }
    };
    outcome.exit_code()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UnflushableSink;

    impl Write for UnflushableSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"))
        }
    }

    #[test]
    fn test_finish_passes_through_outcome() {
        let mut warnings = Vec::new();
        let code = finish(Ok(BatchOutcome::default()), &mut Vec::new(), &mut warnings);
        assert_eq!(code, 0);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_failed_final_flush_is_a_failure() {
        let mut warnings = Vec::new();
        let code = finish(Ok(BatchOutcome::default()), &mut UnflushableSink, &mut warnings);

        assert_eq!(code, EXIT_FAILURE);
        let warnings = String::from_utf8(warnings).unwrap();
        assert!(warnings.starts_with("error:"));
        assert!(warnings.contains("reader went away"));
    }

    #[test]
    fn test_batch_error_is_a_failure() {
        let mut warnings = Vec::new();
        let result = Err(CharacterizeError::Output(io::Error::other("disk full")));
        assert_eq!(finish(result, &mut Vec::new(), &mut warnings), EXIT_FAILURE);
    }
}
