//! CSV ingestion.
//!
//! A [`Dataset`] is the whole content of one delimited text file: the header
//! row naming the columns and every following row, each aligned to the
//! header. Ragged rows, invalid UTF-8 and repeated column names are rejected
//! so that every downstream statistic can index cells by column position.

use std::collections::HashSet;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use tracing::debug;

use crate::error::{CharacterizeError, Result};

/// An immutable, fully loaded tabular file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Loads a dataset from a file on disk.
    ///
    /// # Errors
    ///
    /// * `FileNotFound` if nothing exists at `path`
    /// * `Unreadable` if `path` is a directory or cannot be opened
    /// * `Parse` if the content is not valid delimited text
    pub fn load(path: impl AsRef<Path>, delimiter: u8) -> Result<Self> {
        let path = path.as_ref();

        let metadata =
            fs::metadata(path).map_err(|e| CharacterizeError::from_open(path, e))?;
        if metadata.is_dir() {
            return Err(CharacterizeError::Unreadable {
                path: path.to_path_buf(),
                source: io::Error::other("is a directory"),
            });
        }

        let file = fs::File::open(path).map_err(|e| CharacterizeError::from_open(path, e))?;
        let dataset = Self::from_reader(file, delimiter, path)?;

        debug!(
            path = %path.display(),
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    /// Parses a dataset from any reader. `origin` is only used in error messages.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8, origin: &Path) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(|e| csv_error(origin, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut seen = HashSet::with_capacity(headers.len());
        for name in &headers {
            if !seen.insert(name.as_str()) {
                return Err(CharacterizeError::parse(
                    origin,
                    format!("duplicate column name {name:?} in header"),
                ));
            }
        }

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record.map_err(|e| csv_error(origin, e))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Column names in header order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Iterates the values of one column, top to bottom.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or(""))
    }
}

fn csv_error(origin: &Path, err: csv::Error) -> CharacterizeError {
    let line = err.position().map(|p| p.line());
    match err.into_kind() {
        csv::ErrorKind::Io(source) => CharacterizeError::from_open(origin, source),
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => CharacterizeError::parse(
            origin,
            format!(
                "line {}: found {len} fields, expected {expected_len}",
                line.unwrap_or_default()
            ),
        ),
        csv::ErrorKind::Utf8 { .. } => CharacterizeError::parse(
            origin,
            format!("line {}: invalid UTF-8", line.unwrap_or_default()),
        ),
        other => CharacterizeError::parse(origin, format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<Dataset> {
        Dataset::from_reader(content.as_bytes(), b',', Path::new("test.csv"))
    }

    #[test]
    fn test_parses_header_and_rows() {
        let dataset = parse("a,b\n1,\n1,x\n2,x\n").unwrap();
        assert_eq!(dataset.headers(), ["a", "b"]);
        assert_eq!(dataset.row_count(), 3);
        assert_eq!(dataset.column_values(1).collect::<Vec<_>>(), ["", "x", "x"]);
    }

    #[test]
    fn test_header_only_file_has_zero_rows() {
        let dataset = parse("a,b\n").unwrap();
        assert_eq!(dataset.column_count(), 2);
        assert_eq!(dataset.row_count(), 0);
    }

    #[test]
    fn test_empty_input_has_no_columns() {
        let dataset = parse("").unwrap();
        assert_eq!(dataset.column_count(), 0);
        assert_eq!(dataset.row_count(), 0);
    }

    #[test]
    fn test_quoted_fields_keep_delimiters_and_newlines() {
        let dataset = parse("name,notes\n\"Smith, J\",\"line one\nline two\"\n").unwrap();
        assert_eq!(dataset.column_values(0).next(), Some("Smith, J"));
        assert_eq!(dataset.column_values(1).next(), Some("line one\nline two"));
    }

    #[test]
    fn test_ragged_row_is_parse_error() {
        let err = parse("a,b\n1,2\n3\n").unwrap_err();
        match err {
            CharacterizeError::Parse { message, .. } => {
                assert!(message.contains("found 1 fields, expected 2"), "{message}");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_header_is_parse_error() {
        let err = parse("a,a\n1,2\n").unwrap_err();
        assert!(matches!(err, CharacterizeError::Parse { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let bytes: &[u8] = b"a\n\xff\xfe\n";
        let err = Dataset::from_reader(bytes, b',', Path::new("bin.csv")).unwrap_err();
        assert!(matches!(err, CharacterizeError::Parse { .. }));
    }

    #[test]
    fn test_custom_delimiter() {
        let dataset =
            Dataset::from_reader("a;b\n1;2\n".as_bytes(), b';', Path::new("semi.csv")).unwrap();
        assert_eq!(dataset.headers(), ["a", "b"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Dataset::load(dir.path().join("nope.csv"), b',').unwrap_err();
        assert!(matches!(err, CharacterizeError::FileNotFound { .. }));
    }

    #[test]
    fn test_load_directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = Dataset::load(dir.path(), b',').unwrap_err();
        assert!(matches!(err, CharacterizeError::Unreadable { .. }));
    }
}
