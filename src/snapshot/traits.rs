//! Snapshot store trait and error types

use crate::registry::CompanyRegistry;
use thiserror::Error;

/// Errors that can occur while reading or writing a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to open workbook {path}: {source}")]
    Open {
        path: String,
        source: calamine::XlsxError,
    },

    #[error("Failed to read sheet '{sheet}': {source}")]
    Read {
        sheet: String,
        source: calamine::XlsxError,
    },

    #[error("Failed to write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error("Invalid sheet name '{name}': {source}")]
    InvalidSheetName {
        name: String,
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for snapshot operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Outcome of a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    /// Name of the sheet that was added
    pub sheet_name: String,

    /// Data rows written below the header
    pub rows_written: usize,
}

/// Persistent company state consumed by a crawl run
pub trait SnapshotStore {
    /// Reads every known company, each marked as loaded from the snapshot
    fn load(&self) -> SnapshotResult<CompanyRegistry>;

    /// Appends the exportable companies of `registry` as a new table
    ///
    /// Earlier tables are preserved.
    fn save(&self, registry: &CompanyRegistry) -> SnapshotResult<SaveReport>;
}
