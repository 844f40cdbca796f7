//! Report persistence: one JSON document per run, retrievable by id or as the
//! most recent.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::utils::time::now_utc_timestamp;

pub const STORE_SCHEMA_VERSION: &str = "schemalens.store.v1";
pub const REPORTS_TABLE: &str = "schemalens_reports";
pub const STORE_META_TABLE: &str = "schemalens_store_meta";

const CREATE_STORE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schemalens_reports (
    load_id TEXT NOT NULL,
    load_datetime TEXT NOT NULL,
    clean_json TEXT
);
CREATE INDEX IF NOT EXISTS idx_schemalens_reports_load_id
    ON schemalens_reports (load_id);
CREATE INDEX IF NOT EXISTS idx_schemalens_reports_load_datetime
    ON schemalens_reports (load_datetime);
CREATE TABLE IF NOT EXISTS schemalens_store_meta (
    schema_version TEXT NOT NULL PRIMARY KEY,
    applied_at_utc TEXT NOT NULL
);
"#;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredReport {
    pub load_id: String,
    pub load_datetime: String,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub load_id: String,
    pub load_datetime: String,
}

pub trait ReportStore {
    fn insert(
        &self,
        load_id: &str,
        load_datetime: &str,
        document: &Value,
    ) -> Result<(), StoreError>;

    fn latest(&self) -> Result<Option<StoredReport>, StoreError>;

    fn by_run_id(&self, load_id: &str) -> Result<Option<StoredReport>, StoreError>;

    /// Newest first; ties on timestamp keep the later insert first.
    fn list_runs(&self) -> Result<Vec<RunSummary>, StoreError>;
}

#[derive(Debug)]
pub struct SqliteReportStore {
    connection: Connection,
}

impl SqliteReportStore {
    /// Opens or creates the store, creating parent directories as needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!(
                    "failed to create report store parent directory: {}",
                    parent.display()
                )
            })?;
        }

        let connection = Connection::open(path)
            .with_context(|| format!("failed to open report store: {}", path.display()))?;
        Self::from_connection(connection)
    }

    pub fn from_connection(connection: Connection) -> Result<Self> {
        ensure_store_schema(&connection)?;
        Ok(Self { connection })
    }

    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    fn fetch_one(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Option<StoredReport>, StoreError> {
        let row = self
            .connection
            .query_row(sql, params, |row| {
                Ok((
                    row.get::<usize, String>(0)?,
                    row.get::<usize, String>(1)?,
                    row.get::<usize, Option<String>>(2)?,
                ))
            })
            .optional()?;

        Ok(row.map(|(load_id, load_datetime, document)| StoredReport {
            load_id,
            load_datetime,
            data: decode_document(document.as_deref()),
        }))
    }
}

pub fn ensure_store_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(CREATE_STORE_SQL)
        .context("failed to create report store schema")?;

    connection
        .execute(
            &format!(
                "INSERT OR IGNORE INTO {STORE_META_TABLE} (schema_version, applied_at_utc) VALUES (?1, ?2)"
            ),
            params![STORE_SCHEMA_VERSION, now_utc_timestamp()],
        )
        .context("failed to write report store meta row")?;

    Ok(())
}

impl ReportStore for SqliteReportStore {
    fn insert(
        &self,
        load_id: &str,
        load_datetime: &str,
        document: &Value,
    ) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(document)?;
        self.connection.execute(
            &format!(
                "INSERT INTO {REPORTS_TABLE} (load_id, load_datetime, clean_json) VALUES (?1, ?2, ?3)"
            ),
            params![load_id, load_datetime, encoded],
        )?;
        Ok(())
    }

    fn latest(&self) -> Result<Option<StoredReport>, StoreError> {
        self.fetch_one(
            &format!(
                "SELECT load_id, load_datetime, clean_json FROM {REPORTS_TABLE}
                 ORDER BY load_datetime DESC, rowid DESC LIMIT 1"
            ),
            &[],
        )
    }

    fn by_run_id(&self, load_id: &str) -> Result<Option<StoredReport>, StoreError> {
        self.fetch_one(
            &format!(
                "SELECT load_id, load_datetime, clean_json FROM {REPORTS_TABLE}
                 WHERE load_id = ?1
                 ORDER BY load_datetime DESC, rowid DESC LIMIT 1"
            ),
            &[&load_id],
        )
    }

    fn list_runs(&self) -> Result<Vec<RunSummary>, StoreError> {
        let mut statement = self.connection.prepare(&format!(
            "SELECT load_id, load_datetime FROM {REPORTS_TABLE}
             ORDER BY load_datetime DESC, rowid DESC"
        ))?;
        let rows = statement.query_map([], |row| {
            Ok(RunSummary {
                load_id: row.get::<usize, String>(0)?,
                load_datetime: row.get::<usize, String>(1)?,
            })
        })?;

        let mut runs = Vec::new();
        for row in rows {
            runs.push(row?);
        }
        Ok(runs)
    }
}

/// Decodes a stored document that may be a JSON object or a string-encoded
/// JSON document (possibly encoded more than once). Anything else is `{}`.
#[must_use]
pub fn decode_document(raw: Option<&str>) -> Value {
    let Some(raw) = raw else {
        return empty_document();
    };

    let mut value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(_) => return empty_document(),
    };
    while let Value::String(inner) = value {
        value = match serde_json::from_str::<Value>(&inner) {
            Ok(decoded) => decoded,
            Err(_) => return empty_document(),
        };
    }

    match value {
        Value::Object(_) => value,
        _ => empty_document(),
    }
}

fn empty_document() -> Value {
    Value::Object(Map::new())
}

#[cfg(test)]
mod tests {
    use rusqlite::{Connection, params};
    use serde_json::json;

    use super::{
        REPORTS_TABLE, ReportStore, STORE_META_TABLE, SqliteReportStore, decode_document,
        ensure_store_schema,
    };

    fn store() -> SqliteReportStore {
        let connection = Connection::open_in_memory().expect("in-memory sqlite should open");
        SqliteReportStore::from_connection(connection).expect("store should initialize")
    }

    #[test]
    fn schema_is_idempotent() {
        let store = store();
        ensure_store_schema(store.connection()).expect("second ensure should succeed");
        let count = store
            .connection()
            .query_row(&format!("SELECT COUNT(*) FROM {STORE_META_TABLE}"), [], |row| {
                row.get::<usize, i64>(0)
            })
            .expect("meta count should succeed");
        assert_eq!(count, 1);
    }

    #[test]
    fn latest_breaks_timestamp_ties_by_insertion_order() {
        let store = store();
        let at = "2026-01-01T00:00:00.000Z";
        store.insert("A", at, &json!({"n": 1})).expect("insert A");
        store.insert("B", at, &json!({"n": 2})).expect("insert B");

        let latest = store.latest().expect("latest").expect("a report exists");
        assert_eq!(latest.load_id, "B");

        let runs = store.list_runs().expect("runs");
        let ids = runs.iter().map(|run| run.load_id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn by_run_id_returns_newest_duplicate() {
        let store = store();
        store
            .insert("R1", "2026-01-01T00:00:00.000Z", &json!({"version": 1}))
            .expect("first insert");
        store
            .insert("R1", "2026-01-02T00:00:00.000Z", &json!({"version": 2}))
            .expect("second insert");

        let stored = store.by_run_id("R1").expect("lookup").expect("row exists");
        assert_eq!(stored.data, json!({"version": 2}));
    }

    #[test]
    fn string_encoded_and_missing_documents_decode() {
        let store = store();
        let inner = serde_json::to_string(&json!({"meta": {"load_id": "S"}})).expect("encode");
        let double = serde_json::to_string(&inner).expect("encode twice");
        store
            .connection()
            .execute(
                &format!("INSERT INTO {REPORTS_TABLE} VALUES (?1, ?2, ?3), (?4, ?5, NULL)"),
                params!["S", "2026-01-01T00:00:00.000Z", double, "N", "2026-01-02T00:00:00.000Z"],
            )
            .expect("raw insert");

        let stored = store.by_run_id("S").expect("lookup").expect("row exists");
        assert_eq!(stored.data, json!({"meta": {"load_id": "S"}}));

        let stored = store.by_run_id("N").expect("lookup").expect("row exists");
        assert_eq!(stored.data, json!({}));
        assert!(store.by_run_id("missing").expect("lookup").is_none());
    }

    #[test]
    fn decode_document_rejects_non_objects() {
        assert_eq!(decode_document(Some("[1,2]")), json!({}));
        assert_eq!(decode_document(Some("not json")), json!({}));
        assert_eq!(decode_document(None), json!({}));
    }
}
