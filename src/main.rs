//! CSV Dataset Characterizer - Main Application
//!
//! Entry point for the `characterize` binary.
//!
//! # Usage
//!
//! ```bash
//! # Characterize all CSV files in a directory
//! $ cargo run --release -- data/original
//!
//! # Characterize one file with the five most frequent values per column
//! $ cargo run --release -- data/clean/clean_data.csv --top 5
//! ```

use std::process::ExitCode;

use csv_characterizer_rust::csv_characterizer_main;

/// call from library
fn main() -> ExitCode {
    csv_characterizer_main()
}
