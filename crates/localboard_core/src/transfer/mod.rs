//! Import/export gateway.
//!
//! # Responsibility
//! - Serialize a record collection into a portable export document.
//! - Parse and sanitize externally supplied documents before they reach the
//!   store.
//!
//! # Invariants
//! - Import never touches the store; callers apply the sanitized result with
//!   `RecordStore::replace_all`.
//! - Sanitized imports hold only valid records with unique ids.

pub mod export;
pub mod import;

pub use export::{export_records, ExportError, ExportFile};
pub use import::{import_records, ImportError, ImportReport, Sanitize};

/// Document layout shared by export and import for one app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferFormat {
    /// Object field holding the record array (`apps` for the tracker).
    pub wrapper_field: &'static str,
    /// Fixed download file name.
    pub file_name: &'static str,
}

/// Job tracker document layout.
pub const TRACKER_TRANSFER: TransferFormat = TransferFormat {
    wrapper_field: "apps",
    file_name: "job-tracker-export.json",
};
