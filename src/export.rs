//! CSV and JSON export of log records.
//!
//! Columns follow [`EXPORT_COLUMNS`]. Missing grade or curvature values are
//! written as empty cells (CSV) or `null` (JSON).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;

use crate::error::{Result, TrackerError};
use crate::record::{ExportRow, LogRecord};

/// Export column order.
pub const EXPORT_COLUMNS: [&str; 12] = [
    "index",
    "timestamp",
    "latitude",
    "longitude",
    "speed_kmh",
    "altitude_m",
    "segment_distance_m",
    "elevation_delta_m",
    "grade_percent",
    "curvature_percent",
    "curve_radius_m",
    "total_distance_m",
];

/// Write `records` as CSV with a header row, even when `records` is empty.
pub fn write_csv<W: Write>(writer: W, records: &[LogRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(EXPORT_COLUMNS)?;
    for record in records {
        writer.serialize(ExportRow::from(record))?;
    }
    writer.flush()?;
    Ok(())
}

/// CSV export into a `String`.
pub fn to_csv_string(records: &[LogRecord]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, records)?;
    String::from_utf8(buffer).map_err(|e| TrackerError::ExportError {
        message: e.to_string(),
    })
}

/// CSV export to a file, replacing it if it exists.
pub fn write_csv_file(path: &Path, records: &[LogRecord]) -> Result<()> {
    let file = File::create(path)?;
    write_csv(file, records)?;
    info!(
        "[Export] Wrote {} records to {}",
        records.len(),
        path.display()
    );
    Ok(())
}

/// JSON array of rows in export order.
pub fn to_json(records: &[LogRecord]) -> Result<String> {
    let rows: Vec<ExportRow> = records.iter().map(ExportRow::from).collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}
