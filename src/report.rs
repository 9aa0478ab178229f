//! Post-export dataset summary written to the log.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::export::Flatten;

/// Column coverage of a set of flattened records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetReport {
    pub rows: usize,
    /// Missing (absent or blank) values per column, for every column seen.
    pub missing: BTreeMap<String, usize>,
}

impl DatasetReport {
    pub fn from_records<T: Flatten>(records: &[T]) -> Self {
        let rows: Vec<_> = records.iter().map(|record| record.flatten()).collect();
        Self::from_rows(&rows)
    }

    /// Summarise already flattened rows, e.g. those returned by
    /// [`written_rows`](crate::export::written_rows).
    pub fn from_rows(rows: &[BTreeMap<String, String>]) -> Self {
        let mut missing: BTreeMap<String, usize> = rows
            .iter()
            .flat_map(|row| row.keys().cloned())
            .map(|column| (column, 0))
            .collect();

        for row in rows {
            for (column, count) in missing.iter_mut() {
                let blank = row.get(column).is_none_or(|value| value.trim().is_empty());
                if blank {
                    *count += 1;
                }
            }
        }

        Self {
            rows: rows.len(),
            missing,
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.missing.keys().map(String::as_str)
    }

    pub fn total_missing(&self) -> usize {
        self.missing.values().sum()
    }

    /// Log the summary, then the incomplete columns from worst to best.
    pub fn log(&self) {
        info!(
            rows = self.rows,
            columns = self.missing.len(),
            "dataset summary: {}",
            self.columns().collect::<Vec<_>>().join(", ")
        );

        let total = self.total_missing();
        if total == 0 {
            info!("all columns are fully populated");
            return;
        }

        warn!(total, "found missing values across the dataset");
        let mut incomplete: Vec<_> = self.missing.iter().filter(|(_, n)| **n > 0).collect();
        incomplete.sort_by(|a, b| b.1.cmp(a.1));
        for (column, count) in incomplete {
            warn!(column = column.as_str(), missing = count, "column has missing values");
        }
    }
}
