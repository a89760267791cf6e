//! CSV serialization of ledger snapshots.
//!
//! # Responsibility
//! - Write a snapshot as a flat CSV table with a fixed column order.
//! - Refuse empty snapshots before any output is produced.
//!
//! # Invariants
//! - Header order is `ID, Type, Description, Quantity, Entry Time,
//!   Exit Time`; rows follow snapshot order.
//! - Timestamps are rendered `YYYY-MM-DD HH:MM:SS` (UTC); absent
//!   timestamps render as empty cells.

use crate::model::record::StockRecord;
use chrono::DateTime;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::Path;

/// Column headers in contract order.
pub const CSV_HEADER: [&str; 6] = [
    "ID",
    "Type",
    "Description",
    "Quantity",
    "Entry Time",
    "Exit Time",
];

pub type ExportResult<T> = Result<T, ExportError>;

/// Export-layer error.
#[derive(Debug)]
pub enum ExportError {
    /// The snapshot is empty; nothing is written and no file is created.
    NothingToExport,
    /// CSV encoding or underlying I/O failure.
    Csv(csv::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NothingToExport => write!(f, "nothing to export"),
            Self::Csv(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NothingToExport => None,
            Self::Csv(err) => Some(err),
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Writes the snapshot as CSV into the provided writer.
///
/// Fails with `NothingToExport` on an empty snapshot before any byte is
/// written.
pub fn write_snapshot<W: Write>(records: &[StockRecord], out: W) -> ExportResult<()> {
    if records.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CSV_HEADER)?;

    for record in records {
        writer.write_record(&[
            record.id.to_string(),
            record.item_type.clone(),
            record.description.clone(),
            record.quantity.to_string(),
            format_epoch_ms(record.last_entry_at),
            format_epoch_ms(record.last_exit_at),
        ])?;
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Writes the snapshot as a CSV file at `path`.
///
/// The empty-snapshot check runs before the file is created, so a refused
/// export leaves no file behind.
pub fn export_to_path(records: &[StockRecord], path: impl AsRef<Path>) -> ExportResult<()> {
    if records.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(csv::Error::from)?;
    write_snapshot(records, file)?;

    info!(
        "event=export_written module=export status=ok rows={} path={}",
        records.len(),
        path.display()
    );
    Ok(())
}

/// Renders an epoch-millisecond timestamp for display/export.
///
/// Absent or unrepresentable values render as an empty string.
pub fn format_epoch_ms(epoch_ms: Option<i64>) -> String {
    epoch_ms
        .and_then(DateTime::from_timestamp_millis)
        .map(|timestamp| timestamp.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}
