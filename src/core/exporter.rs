use crate::domain::model::ProjectedRow;
use crate::utils::error::{ExportError, Result};
use std::path::Path;

/// Write `header` followed by `rows` as CSV to `destination`.
///
/// The data goes to a temporary file next to the destination and is renamed
/// into place once complete, so a failed export never leaves a truncated
/// file behind. Rows must have exactly as many fields as the header.
pub fn export_table(rows: &[ProjectedRow], header: &[String], destination: &Path) -> Result<usize> {
    let failure = |message: String| ExportError::ExportIoFailure {
        path: destination.to_path_buf(),
        message,
    };

    let dir = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let tmp = tempfile::Builder::new()
        .prefix(".export-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| failure(e.to_string()))?;

    let mut writer = csv::Writer::from_writer(tmp);
    writer
        .write_record(header)
        .map_err(|e| failure(e.to_string()))?;
    for (index, row) in rows.iter().enumerate() {
        writer
            .write_record(row)
            .map_err(|e| failure(format!("row {}: {}", index + 1, e)))?;
    }

    let tmp = writer
        .into_inner()
        .map_err(|e| failure(e.error().to_string()))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| failure(e.to_string()))?;
    tmp.persist_noclobber(destination)
        .map_err(|e| failure(e.error.to_string()))?;

    tracing::debug!("Wrote {} rows to {}", rows.len(), destination.display());
    Ok(rows.len())
}
