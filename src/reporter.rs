//! Batch characterization of CSV files.
//!
//! Files are analyzed one at a time in a deterministic order and each file's
//! section is flushed to the sink as soon as it is ready, so an interrupted
//! run keeps every report already printed. A file that is missing, unreadable
//! or malformed produces a `warning:` line and the batch moves on.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{ReportConfig, Target};
use crate::dataset::Dataset;
use crate::error::{CharacterizeError, Result};
use crate::report::{FileReport, render, render_text};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

const REPORT_SUFFIX: &str = "_characterization.txt";

/// Result of characterizing a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Analyzed,
    Failed,
}

/// A file that could not be characterized.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: CharacterizeError,
}

/// Summary of a batch run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub analyzed: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
    /// Text reports written under the report directory
    pub saved_reports: Vec<PathBuf>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// `0` when every targeted file was analyzed, `1` otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() { EXIT_SUCCESS } else { EXIT_FAILURE }
    }
}

/// Report text and warnings; warnings share the report sink unless a
/// separate one is given.
struct Sinks<'a> {
    out: &'a mut dyn Write,
    warnings: Option<&'a mut dyn Write>,
}

impl Sinks<'_> {
    fn report(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    fn warning(&mut self) -> &mut dyn Write {
        match self.warnings.as_deref_mut() {
            Some(warnings) => warnings,
            None => &mut *self.out,
        }
    }
}

/// Computes and prints per-column statistics for CSV files.
#[derive(Debug, Clone, Default)]
pub struct StatisticsReporter {
    config: ReportConfig,
}

impl StatisticsReporter {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Characterizes a file, or every CSV file in a directory, writing both
    /// the report and any warnings to `sink`.
    ///
    /// # Errors
    ///
    /// Only fatal errors are returned (the sink failing). Per-file problems
    /// are reported in the returned [`BatchOutcome`].
    pub fn characterize<W: Write>(&self, target: &Path, sink: &mut W) -> Result<BatchOutcome> {
        let mut sinks = Sinks {
            out: sink,
            warnings: None,
        };
        self.run(&[target.to_path_buf()], &mut sinks)
    }

    /// Same as [`characterize`](Self::characterize) with warnings written to
    /// a separate sink.
    pub fn characterize_with_warnings<W: Write, E: Write>(
        &self,
        target: &Path,
        out: &mut W,
        warnings: &mut E,
    ) -> Result<BatchOutcome> {
        let mut sinks = Sinks {
            out,
            warnings: Some(warnings as &mut dyn Write),
        };
        self.run(&[target.to_path_buf()], &mut sinks)
    }

    /// Characterizes an explicit, ordered list of files or directories as
    /// one batch.
    pub fn characterize_files<W: Write, E: Write>(
        &self,
        paths: &[PathBuf],
        out: &mut W,
        warnings: &mut E,
    ) -> Result<BatchOutcome> {
        let mut sinks = Sinks {
            out,
            warnings: Some(warnings as &mut dyn Write),
        };
        self.run(paths, &mut sinks)
    }

    /// Characterizes a resolved command line [`Target`].
    pub fn characterize_target<W: Write, E: Write>(
        &self,
        target: &Target,
        out: &mut W,
        warnings: &mut E,
    ) -> Result<BatchOutcome> {
        match target {
            Target::Path(path) => self.characterize_with_warnings(path, out, warnings),
            Target::Pipeline {
                source_dir,
                clean_data,
            } => self.characterize_files(
                &[source_dir.clone(), clean_data.clone()],
                out,
                warnings,
            ),
        }
    }

    fn run(&self, paths: &[PathBuf], sinks: &mut Sinks<'_>) -> Result<BatchOutcome> {
        let mut outcome = BatchOutcome::default();

        for path in paths {
            for file in self.expand(path, sinks, &mut outcome)? {
                self.characterize_file(&file, sinks, &mut outcome)?;
            }
        }

        info!(
            analyzed = outcome.analyzed.len(),
            failed = outcome.failures.len(),
            "characterization finished"
        );
        Ok(outcome)
    }

    /// Turns a target path into the list of files to analyze.
    ///
    /// Directories expand to their CSV files. Anything else, including paths
    /// that do not exist, is passed through so the per-file step reports it.
    fn expand(
        &self,
        path: &Path,
        sinks: &mut Sinks<'_>,
        outcome: &mut BatchOutcome,
    ) -> Result<Vec<PathBuf>> {
        let is_dir = fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false);
        if !is_dir {
            return Ok(vec![path.to_path_buf()]);
        }

        match list_csv_files(path) {
            Ok(files) => {
                if files.is_empty() {
                    writeln!(
                        sinks.warning(),
                        "warning: no CSV files found in {}",
                        path.display()
                    )?;
                }
                info!(directory = %path.display(), files = files.len(), "scanned directory");
                Ok(files)
            }
            Err(e) => {
                self.fail(path, CharacterizeError::from_open(path, e), sinks, outcome)?;
                Ok(Vec::new())
            }
        }
    }

    fn characterize_file(
        &self,
        path: &Path,
        sinks: &mut Sinks<'_>,
        outcome: &mut BatchOutcome,
    ) -> Result<FileOutcome> {
        info!(path = %path.display(), "processing CSV file");

        let report = match analyze_file(path, &self.config) {
            Ok(report) => report,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                self.fail(path, e, sinks, outcome)?;
                return Ok(FileOutcome::Failed);
            }
        };

        render(&report, &self.config, sinks.report())?;
        sinks.report().flush()?;

        if let Some(report_dir) = &self.config.report_dir {
            let saved = save_report(
                report_dir,
                path,
                &report,
                &self.config,
                &outcome.saved_reports,
            );
            match saved {
                Ok(saved) => outcome.saved_reports.push(saved),
                Err(e) => {
                    self.fail(path, e, sinks, outcome)?;
                    return Ok(FileOutcome::Failed);
                }
            }
        }

        outcome.analyzed.push(path.to_path_buf());
        Ok(FileOutcome::Analyzed)
    }

    fn fail(
        &self,
        path: &Path,
        error: CharacterizeError,
        sinks: &mut Sinks<'_>,
        outcome: &mut BatchOutcome,
    ) -> Result<()> {
        debug!(path = %path.display(), error = ?error, "skipping file");

        let warnings = sinks.warning();
        writeln!(warnings, "warning: {error}")?;
        warnings.flush()?;

        outcome.failures.push(FileFailure {
            path: path.to_path_buf(),
            error,
        });
        Ok(())
    }
}

/// Loads one file and computes its statistics.
///
/// # Arguments
///
/// * `path` - CSV file to analyze
/// * `config` - Report configuration (only the delimiter is used here)
///
/// # Returns
///
/// * `Result<FileReport>` - The statistics, or a per-file error
pub fn analyze_file(path: &Path, config: &ReportConfig) -> Result<FileReport> {
    let dataset = Dataset::load(path, config.delimiter)?;
    Ok(FileReport::new(path, &dataset))
}

/// Lists the CSV files directly inside `directory`, sorted by file name.
///
/// The extension check is case-insensitive. Sub-directories are skipped;
/// other entries (including dangling symlinks) are kept so that a broken
/// entry surfaces as a warning instead of vanishing.
pub fn list_csv_files(directory: impl AsRef<Path>) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            continue;
        }

        let is_csv = path
            .extension()
            .is_some_and(|extension| extension.to_string_lossy().eq_ignore_ascii_case("csv"));
        if is_csv {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Extracts the basename from a file path, without its final extension.
///
/// # Arguments
///
/// * `file_path` - The file path to extract basename from
///
/// # Returns
///
/// * `Result<String, io::Error>` - The file stem (`sales.2023` for
///   `sales.2023.csv`), or an error when the path has no file name
pub fn extract_basename(file_path: impl AsRef<Path>) -> io::Result<String> {
    let path_ref = file_path.as_ref();

    let stem = path_ref.file_stem().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Invalid file path: {path_ref:?}"),
        )
    })?;

    Ok(stem.to_string_lossy().into_owned())
}

/// Saves the plain text report for `source` under `report_dir`.
///
/// A report path already written earlier in the batch is refused rather
/// than overwritten.
fn save_report(
    report_dir: &Path,
    source: &Path,
    report: &FileReport,
    config: &ReportConfig,
    already_saved: &[PathBuf],
) -> Result<PathBuf> {
    let report_path = extract_basename(source)
        .map(|basename| report_dir.join(format!("{basename}{REPORT_SUFFIX}")))
        .map_err(|source| CharacterizeError::SaveReport {
            path: report_dir.to_path_buf(),
            source,
        })?;

    if already_saved.contains(&report_path) {
        return Err(CharacterizeError::SaveReport {
            path: report_path,
            source: io::Error::new(
                io::ErrorKind::AlreadyExists,
                "an earlier file in this batch saved a report under the same name",
            ),
        });
    }

    let write = || -> io::Result<()> {
        fs::create_dir_all(report_dir)?;
        let mut writer = BufWriter::new(File::create(&report_path)?);
        let plain = ReportConfig {
            color: false,
            ..config.clone()
        };
        render_text(report, &plain, &mut writer)?;
        writer.flush()
    };

    write().map_err(|source| CharacterizeError::SaveReport {
        path: report_path.clone(),
        source,
    })?;

    debug!(path = %report_path.display(), "saved report");
    Ok(report_path)
}
