use std::io::Write;

use crate::export::{ExportError, Flatten, clean_rows, is_blank, warn_skipped};

/// Write non-blank records as a pretty-printed JSON array of objects.
pub fn write_json<T: Flatten, W: Write>(records: &[T], mut writer: W) -> Result<usize, ExportError> {
    let rows: Vec<_> = clean_rows(records)
        .into_iter()
        .filter(|row| {
            let blank = is_blank(row);
            if blank {
                warn_skipped(row);
            }
            !blank
        })
        .collect();

    serde_json::to_writer_pretty(&mut writer, &rows)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(rows.len())
}
