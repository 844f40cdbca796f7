//! Data-source collaborator: catalog reads and capped row execution.

pub mod guard;
pub mod sqlite;

use crate::error::SourceError;
use crate::models::{DataRow, DataValue};

pub use self::sqlite::SqliteSource;

/// Table-name prefixes never surfaced as analyzable tables.
pub const INTERNAL_TABLE_PREFIXES: &[&str] = &["sqlite_", "schemalens_"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogColumn {
    pub table: String,
    pub column: String,
    pub data_type: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<DataRow>,
}

impl RowSet {
    /// First column of the first row.
    #[must_use]
    pub fn first_scalar(&self) -> Option<&DataValue> {
        let column = self.columns.first()?;
        self.rows.first()?.get(column)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Every call is attempted once; a failure is reported as a single
/// [`SourceError`] and never retried by callers.
pub trait DataSource {
    /// Name of the active schema, when the source has one.
    fn schema_name(&self) -> Option<String>;

    /// `(table, column, type)` triples for the active schema, ordered by table
    /// then column position.
    fn catalog_columns(&self) -> Result<Vec<CatalogColumn>, SourceError>;

    fn list_tables(&self) -> Result<Vec<String>, SourceError>;

    /// Runs one read-only statement, fetching at most `row_cap` rows when set.
    fn query_rows(&self, sql: &str, row_cap: Option<usize>) -> Result<RowSet, SourceError>;

    /// SQL expression for the source's notion of "now".
    fn current_timestamp_expr(&self) -> &str {
        "CURRENT_TIMESTAMP"
    }
}

#[must_use]
pub fn is_internal_table(name: &str) -> bool {
    let lowered = name.to_ascii_lowercase();
    INTERNAL_TABLE_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
}
