use std::io::Write;

use csv::WriterBuilder;

use crate::export::{ExportError, Flatten, clean_rows, columns, is_blank, warn_skipped};

/// Write a header plus one line per non-blank record.
///
/// Missing keys are written as empty fields. Returns the number of data rows.
pub fn write_csv<T: Flatten, W: Write>(records: &[T], writer: W) -> Result<usize, ExportError> {
    let rows = clean_rows(records);
    let header = columns(&rows);

    let mut out = WriterBuilder::new().from_writer(writer);
    out.write_record(&header)?;

    let mut written = 0;
    for row in &rows {
        if is_blank(row) {
            warn_skipped(row);
            continue;
        }
        out.write_record(
            header
                .iter()
                .map(|column| row.get(column).map(String::as_str).unwrap_or("")),
        )?;
        written += 1;
    }

    out.flush()?;
    Ok(written)
}
