//! Error types for dataset characterization.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, CharacterizeError>;

/// Errors that can occur while characterizing tabular files.
///
/// `FileNotFound`, `Unreadable`, `Parse` and `SaveReport` are per-file: the batch logs a
/// warning and moves on to the next file. `Usage` and `Output` abort.
#[derive(Error, Debug)]
pub enum CharacterizeError {
    /// The target path does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The target exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid delimited text.
    #[error("cannot parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// The text report could not be saved to the report directory.
    #[error("cannot save report to {}: {source}", path.display())]
    SaveReport {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Invalid invocation, e.g. no input path.
    #[error("usage error: {0}")]
    Usage(String),

    /// Writing to the report sink failed.
    #[error("failed to write report: {0}")]
    Output(#[from] io::Error),
}

impl CharacterizeError {
    /// Creates a parse error for the given file.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a usage error with the given message.
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Maps an I/O error raised while opening or reading `path`.
    ///
    /// `NotFound` becomes [`CharacterizeError::FileNotFound`], anything else
    /// is [`CharacterizeError::Unreadable`].
    pub fn from_open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::Unreadable { path, source }
        }
    }

    /// Whether the error aborts the whole batch rather than a single file.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Usage(_) | Self::Output(_))
    }
}
