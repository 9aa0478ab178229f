//! Writing extracted records out as tabular files.
//!
//! Every exporter works on flattened rows: a sorted string map per record.
//! Columns are the union of all keys; rows whose values are all empty (or
//! the `"0"` placeholder) are dropped with a warning.

pub mod csv;
pub mod errors;
pub mod json;

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use tracing::{info, warn};

pub use errors::ExportError;

/// A value that can be exported as one row.
pub trait Flatten {
    fn flatten(&self) -> BTreeMap<String, String>;
}

impl<T: Flatten + ?Sized> Flatten for &T {
    fn flatten(&self) -> BTreeMap<String, String> {
        (**self).flatten()
    }
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// `.json` files get JSON, anything else CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

const PLACEHOLDER: &str = "0";

/// Flatten and clean every record: newlines become spaces, values are trimmed.
pub(crate) fn clean_rows<T: Flatten>(records: &[T]) -> Vec<BTreeMap<String, String>> {
    records
        .iter()
        .map(|record| {
            record
                .flatten()
                .into_iter()
                .map(|(key, value)| (key, value.replace(['\r', '\n'], " ").trim().to_string()))
                .collect()
        })
        .collect()
}

/// Sorted union of keys across rows.
pub(crate) fn columns(rows: &[BTreeMap<String, String>]) -> Vec<String> {
    rows.iter()
        .flat_map(|row| row.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// True when the row carries nothing worth writing.
pub(crate) fn is_blank(row: &BTreeMap<String, String>) -> bool {
    row.values().all(|v| v.is_empty() || v == PLACEHOLDER)
}

/// The cleaned rows an exporter writes for `records`, blank ones left out.
pub fn written_rows<T: Flatten>(records: &[T]) -> Vec<BTreeMap<String, String>> {
    clean_rows(records)
        .into_iter()
        .filter(|row| !is_blank(row))
        .collect()
}

pub(crate) fn warn_skipped(row: &BTreeMap<String, String>) {
    warn!(row = ?row, "row skipped, almost empty");
}

/// Write `records` to `path`, creating parent directories as needed.
///
/// Returns the number of rows written.
pub fn write_records<T: Flatten>(records: &[T], path: &Path) -> Result<usize, ExportError> {
    if records.is_empty() {
        warn!("empty record list, nothing to write");
        return Ok(0);
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let writer = BufWriter::new(File::create(path)?);
    let written = match ExportFormat::from_path(path) {
        ExportFormat::Csv => csv::write_csv(records, writer)?,
        ExportFormat::Json => json::write_json(records, writer)?,
    };

    info!(written, path = %path.display(), "records exported");
    Ok(written)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub struct Row(pub Vec<(&'static str, &'static str)>);

    impl Flatten for Row {
        fn flatten(&self) -> BTreeMap<String, String> {
            self.0
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::Row;
    use super::*;
    use std::env;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("out/a.JSON")), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("out/a.csv")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("out/a")), ExportFormat::Csv);
    }

    #[test]
    fn test_blank_rows_include_placeholder_zero() {
        let rows = clean_rows(&[Row(vec![("a", " "), ("b", "0"), ("c", "\n")])]);
        assert!(is_blank(&rows[0]));
        let rows = clean_rows(&[Row(vec![("a", "0"), ("b", "x")])]);
        assert!(!is_blank(&rows[0]));
    }

    #[test]
    fn test_written_rows_drop_blank_rows() {
        let rows = written_rows(&[
            Row(vec![("Nº", "0"), ("Nome", " ")]),
            Row(vec![("Nº", "025"), ("Nome", "Pikachu\n")]),
        ]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Nome"], "Pikachu");
    }

    #[test]
    fn test_columns_are_sorted_union() {
        let rows = clean_rows(&[Row(vec![("b", "1"), ("a", "2")]), Row(vec![("c", "3")])]);
        assert_eq!(columns(&rows), ["a", "b", "c"]);
    }

    #[test]
    fn test_write_records_creates_parent_dirs() {
        let dir = env::temp_dir().join(format!("dexharvest-export-{}", std::process::id()));
        let path = dir.join("nested").join("records.csv");

        let written = write_records(&[Row(vec![("Nº", "001")])], &path).unwrap();

        assert_eq!(written, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "Nº\n001\n");
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_write_records_with_nothing_writes_no_file() {
        let path = env::temp_dir().join("dexharvest-never-created.csv");
        let records: Vec<Row> = Vec::new();
        assert_eq!(write_records(&records, &path).unwrap(), 0);
        assert!(!path.exists());
    }
}
