//! Per-column descriptive statistics.
//!
//! Statistics are a pure function of a [`Dataset`]: nothing is cached and
//! nothing is shared between datasets.
//!
//! Conventions:
//! - a null is an empty cell;
//! - the empty string still counts as a value in the unique count and the
//!   frequency table, so frequency counts always sum to the row count;
//! - lengths are measured in Unicode scalar values.

use std::collections::HashMap;

use serde::Serialize;

use crate::dataset::Dataset;

/// One entry of a frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: u64,
}

/// Descriptive statistics for a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnStatistics {
    pub name: String,
    pub nulls: u64,
    pub unique: u64,
    /// Descending by count, ties in first-seen order.
    pub frequencies: Vec<ValueCount>,
    pub max_length: usize,
}

impl ColumnStatistics {
    /// Computes statistics over a sequence of raw cell values.
    pub fn from_values<'a>(name: &str, values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut nulls = 0u64;
        let mut max_length = 0usize;

        // value -> (count, first row seen)
        let mut value_counts: HashMap<&'a str, (u64, usize)> = HashMap::new();

        for (row_index, value) in values.into_iter().enumerate() {
            if value.is_empty() {
                nulls += 1;
            }

            max_length = max_length.max(value.chars().count());

            value_counts
                .entry(value)
                .and_modify(|(count, _)| *count += 1)
                .or_insert((1, row_index));
        }

        let mut ranked: Vec<(&str, u64, usize)> = value_counts
            .into_iter()
            .map(|(value, (count, first_seen))| (value, count, first_seen))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        Self {
            name: name.to_string(),
            nulls,
            unique: ranked.len() as u64,
            frequencies: ranked
                .into_iter()
                .map(|(value, count, _)| ValueCount {
                    value: value.to_string(),
                    count,
                })
                .collect(),
            max_length,
        }
    }

    /// Number of rows contributing to the frequency table.
    pub fn total(&self) -> u64 {
        self.frequencies.iter().map(|entry| entry.count).sum()
    }

    /// Share of null cells, in percent. `0.0` for a column with no rows.
    pub fn null_percentage(&self) -> f64 {
        percentage(self.nulls, self.total())
    }
}

/// `part / whole * 100`, or `0.0` when `whole` is zero.
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Computes statistics for every column of `dataset`, in header order.
pub fn characterize_columns(dataset: &Dataset) -> Vec<ColumnStatistics> {
    dataset
        .headers()
        .iter()
        .enumerate()
        .map(|(index, name)| ColumnStatistics::from_values(name, dataset.column_values(index)))
        .collect()
}
