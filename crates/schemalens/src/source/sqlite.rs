use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OpenFlags};

use super::{CatalogColumn, DataSource, RowSet, is_internal_table};
use crate::error::SourceError;
use crate::models::{DataRow, DataValue};
use crate::utils::sql::{quote_identifier, single_quoted};
use crate::utils::time::{parse_iso_date, parse_iso_datetime};

pub const DEFAULT_SCHEMA: &str = "main";

/// SQLite-backed data source. Column declared types drive the typed scalar
/// mapping (DECIMAL/NUMERIC, DATE, DATETIME/TIMESTAMP, BOOL).
#[derive(Debug)]
pub struct SqliteSource {
    connection: Connection,
    schema: String,
}

impl SqliteSource {
    /// Opens an existing database read-only.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            anyhow::bail!("data source database does not exist: {}", path.display());
        }
        let connection = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("failed to open data source database: {}", path.display()))?;
        Ok(Self::from_connection(connection))
    }

    #[must_use]
    pub fn from_connection(connection: Connection) -> Self {
        Self {
            connection,
            schema: DEFAULT_SCHEMA.to_string(),
        }
    }

    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    fn schema_table(&self) -> String {
        format!("{}.sqlite_schema", quote_identifier(&self.schema))
    }
}

impl DataSource for SqliteSource {
    fn schema_name(&self) -> Option<String> {
        Some(self.schema.clone())
    }

    fn catalog_columns(&self) -> Result<Vec<CatalogColumn>, SourceError> {
        let sql = format!(
            "SELECT m.name, p.name, COALESCE(p.type, '')
             FROM {} AS m
             JOIN pragma_table_info(m.name, {}) AS p
             WHERE m.type IN ('table', 'view')
             ORDER BY m.name ASC, p.cid ASC",
            self.schema_table(),
            single_quoted(&self.schema)
        );
        let mut statement = self
            .connection
            .prepare(&sql)
            .map_err(SourceError::Prepare)?;
        let rows = statement
            .query_map([], |row| {
                Ok(CatalogColumn {
                    table: row.get::<usize, String>(0)?,
                    column: row.get::<usize, String>(1)?,
                    data_type: row.get::<usize, String>(2)?,
                })
            })
            .map_err(SourceError::Execute)?;

        let mut columns = Vec::new();
        for row in rows {
            let column = row.map_err(SourceError::Decode)?;
            if !is_internal_table(&column.table) {
                columns.push(column);
            }
        }
        Ok(columns)
    }

    fn list_tables(&self) -> Result<Vec<String>, SourceError> {
        let sql = format!(
            "SELECT name FROM {} WHERE type IN ('table', 'view') ORDER BY name ASC",
            self.schema_table()
        );
        let mut statement = self
            .connection
            .prepare(&sql)
            .map_err(SourceError::Prepare)?;
        let rows = statement
            .query_map([], |row| row.get::<usize, String>(0))
            .map_err(SourceError::Execute)?;

        let mut tables = Vec::new();
        for row in rows {
            let name = row.map_err(SourceError::Decode)?;
            if !is_internal_table(&name) {
                tables.push(name);
            }
        }
        Ok(tables)
    }

    fn query_rows(&self, sql: &str, row_cap: Option<usize>) -> Result<RowSet, SourceError> {
        let mut statement = self.connection.prepare(sql).map_err(SourceError::Prepare)?;
        if !statement.readonly() {
            return Err(SourceError::Guardrail(
                "statement would modify the database".to_string(),
            ));
        }

        let declared_types = statement
            .columns()
            .iter()
            .map(|column| column.decl_type().map(str::to_ascii_uppercase))
            .collect::<Vec<_>>();
        let names = unique_column_names(statement.column_names());
        let columns = names.into_iter().zip(declared_types).collect::<Vec<_>>();

        let mut rows = statement.query([]).map_err(SourceError::Execute)?;
        let mut result_rows = Vec::new();
        while let Some(row) = rows.next().map_err(SourceError::Execute)? {
            if let Some(cap) = row_cap
                && result_rows.len() >= cap
            {
                break;
            }

            let mut record = DataRow::with_capacity(columns.len());
            for (index, (name, declared_type)) in columns.iter().enumerate() {
                let raw = row
                    .get::<usize, SqlValue>(index)
                    .map_err(SourceError::Decode)?;
                record.insert(name.clone(), typed_value(raw, declared_type.as_deref()));
            }
            result_rows.push(record);
        }

        Ok(RowSet {
            columns: columns.into_iter().map(|(name, _)| name).collect(),
            rows: result_rows,
        })
    }
}

/// Repeated result column names (`SELECT a, a`) get a numeric suffix so no
/// cell is lost: `a`, `a_2`, `a_3`.
fn unique_column_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for name in names {
        let mut candidate = name.to_string();
        let mut suffix = 2;
        while unique.contains(&candidate) {
            candidate = format!("{name}_{suffix}");
            suffix += 1;
        }
        unique.push(candidate);
    }
    unique
}

fn typed_value(raw: SqlValue, declared_type: Option<&str>) -> DataValue {
    let declared = declared_type.unwrap_or("");

    if declared.contains("DECIMAL") || declared.contains("NUMERIC") {
        match &raw {
            SqlValue::Real(value) => return DataValue::Decimal(value.to_string()),
            SqlValue::Text(text) if text.trim().parse::<f64>().is_ok() => {
                return DataValue::Decimal(text.trim().to_string());
            }
            _ => {}
        }
    }

    if let SqlValue::Text(text) = &raw {
        if declared.contains("DATETIME") || declared.contains("TIMESTAMP") {
            if let Some(value) = parse_iso_datetime(text) {
                return DataValue::DateTime(value);
            }
            if let Some(date) = parse_iso_date(text) {
                return DataValue::Date(date);
            }
        } else if declared.contains("DATE") {
            if let Some(date) = parse_iso_date(text) {
                return DataValue::Date(date);
            }
            if let Some(value) = parse_iso_datetime(text) {
                return DataValue::DateTime(value);
            }
        }
    }

    if declared.contains("BOOL")
        && let SqlValue::Integer(flag @ (0 | 1)) = raw
    {
        return DataValue::Bool(flag == 1);
    }

    match raw {
        SqlValue::Null => DataValue::Null,
        SqlValue::Integer(value) => DataValue::Integer(value),
        SqlValue::Real(value) => DataValue::Float(value),
        SqlValue::Text(text) => DataValue::Text(text),
        SqlValue::Blob(bytes) => DataValue::Bytes(bytes),
    }
}
