//! SQLite Record Store
//!
//! Information Hiding:
//! - Table layout and timestamp text format hidden behind `Record`
//! - Each call opens and closes its own connection; nothing is cached
//! - Not coordinated for concurrent writers (single-user log)

use super::{Result, StoreError};
use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Text format of the `ts` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// One persisted consultation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub timestamp: NaiveDateTime,
    pub symptom: String,
    /// Empty when no memo was written (or the row predates the memo column).
    pub memo: String,
}

impl Record {
    pub fn timestamp_text(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn has_memo(&self) -> bool {
        !self.memo.is_empty()
    }
}

/// Append-only log of symptom reports in a SQLite file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Handle for the given file. Does not touch the disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the parent directory and brings the schema up to date.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(path);
        if let Some(parent) = store.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        store.ensure_schema()?;
        store.migrate_schema()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.path)?)
    }

    /// Creates the `records` table if it does not exist.
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS records (ts TEXT, symptom TEXT, memo TEXT)",
            [],
        )?;
        Ok(())
    }

    /// Adds the `memo` column to tables created before it existed.
    ///
    /// Returns `true` when a column was added.
    pub fn migrate_schema(&self) -> Result<bool> {
        let conn = self.connect()?;
        let columns = table_columns(&conn, "records")?;

        if columns.iter().any(|c| c == "memo") {
            tracing::debug!("[RecordStore] Migration not needed: memo column exists");
            return Ok(false);
        }

        conn.execute("ALTER TABLE records ADD COLUMN memo TEXT", [])?;
        tracing::info!("[RecordStore] Added memo column to records");
        Ok(true)
    }

    /// Writes one record stamped with the current local time.
    pub fn append(&self, symptom: &str, memo: &str) -> Result<Record> {
        let record = Record {
            timestamp: now_to_second(),
            symptom: symptom.to_string(),
            memo: memo.to_string(),
        };

        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO records (ts, symptom, memo) VALUES (?1, ?2, ?3)",
            params![record.timestamp_text(), record.symptom, record.memo],
        )?;

        tracing::info!(
            "[RecordStore] Saved record at {} ({} chars memo)",
            record.timestamp_text(),
            record.memo.chars().count()
        );
        Ok(record)
    }

    /// Records for today, or all records. Both are newest first.
    pub fn list(&self, today_only: bool) -> Result<Vec<Record>> {
        if today_only {
            return self.list_on(Local::now().date_naive());
        }

        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT ts, symptom, memo FROM records ORDER BY ts DESC, rowid DESC")?;
        let rows = stmt.query_map([], read_row)?;
        collect_records(rows)
    }

    /// Records whose timestamp falls on `date`, newest first.
    pub fn list_on(&self, date: NaiveDate) -> Result<Vec<Record>> {
        let prefix = format!("{}%", date.format(DATE_FORMAT));

        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT ts, symptom, memo FROM records WHERE ts LIKE ?1 ORDER BY ts DESC, rowid DESC",
        )?;
        let rows = stmt.query_map([prefix], read_row)?;
        collect_records(rows)
    }
}

fn now_to_second() -> NaiveDateTime {
    let now = Local::now().naive_local();
    // Second precision, matching the stored text.
    now.with_nanosecond(0).unwrap_or(now)
}

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut columns = Vec::new();
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let mut rows = stmt.query([])?;

    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        columns.push(name);
    }

    Ok(columns)
}

type RawRow = (String, String, Option<String>);

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((
        row.get(0)?,
        row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        row.get(2)?,
    ))
}

fn collect_records(
    rows: impl Iterator<Item = rusqlite::Result<RawRow>>,
) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for row in rows {
        let (ts, symptom, memo) = row?;
        let timestamp = NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT)
            .map_err(|source| StoreError::Timestamp { value: ts, source })?;
        records.push(Record {
            timestamp,
            symptom,
            memo: memo.unwrap_or_default(),
        });
    }
    Ok(records)
}
