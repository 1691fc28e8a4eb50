//! Consultation Record Storage
//!
//! Information Hiding:
//! - SQL and schema migration details hidden behind `RecordStore`
//! - Callers see typed `Record` values, never raw rows

pub mod records;

pub use records::{Record, RecordStore, TIMESTAMP_FORMAT};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid timestamp '{value}': {source}")]
    Timestamp {
        value: String,
        source: chrono::ParseError,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;
