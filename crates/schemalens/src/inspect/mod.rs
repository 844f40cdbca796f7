//! Schema inspection and row profiling.

pub mod profiler;

use crate::error::SourceError;
use crate::models::{ColumnInfo, Metadata};
use crate::source::DataSource;

pub use self::profiler::{MAX_PROFILED_TABLES, profile_tables};

/// Reads column metadata for the active schema, optionally restricted to
/// `selected` tables (matched ASCII case-insensitively). A catalog failure
/// yields empty metadata.
#[must_use]
pub fn read_metadata(source: &dyn DataSource, selected: Option<&[String]>) -> Metadata {
    let columns = match source.catalog_columns() {
        Ok(columns) => columns,
        Err(error) => {
            tracing::warn!(%error, "catalog read failed; continuing with empty metadata");
            return Metadata::new();
        }
    };

    let selected = selected.filter(|tables| !tables.is_empty());
    let mut metadata = Metadata::new();
    for column in columns {
        if let Some(tables) = selected
            && !tables
                .iter()
                .any(|table| table.trim().eq_ignore_ascii_case(&column.table))
        {
            continue;
        }

        metadata
            .entry(column.table)
            .or_default()
            .push(ColumnInfo::new(column.column, column.data_type));
    }

    tracing::info!(tables = metadata.len(), "schema metadata read");
    metadata
}

/// Sorted table names of the active schema.
pub fn list_tables(source: &dyn DataSource) -> Result<Vec<String>, SourceError> {
    let mut tables = source.list_tables()?;
    tables.sort();
    tables.dedup();
    Ok(tables)
}

/// Canonical metadata entry for `name`, exact match first, then ASCII
/// case-insensitive.
#[must_use]
pub fn lookup_table<'a>(
    metadata: &'a Metadata,
    name: &str,
) -> Option<(&'a String, &'a Vec<ColumnInfo>)> {
    let name = name.trim();
    metadata.get_key_value(name).or_else(|| {
        metadata
            .iter()
            .find(|(table, _)| table.eq_ignore_ascii_case(name))
    })
}

#[must_use]
pub fn lookup_column<'a>(columns: &'a [ColumnInfo], name: &str) -> Option<&'a ColumnInfo> {
    let name = name.trim();
    columns
        .iter()
        .find(|column| column.column == name)
        .or_else(|| {
            columns
                .iter()
                .find(|column| column.column.eq_ignore_ascii_case(name))
        })
}

#[cfg(test)]
mod tests {
    use super::{lookup_column, lookup_table};
    use crate::models::{ColumnInfo, Metadata};

    #[test]
    fn lookups_prefer_exact_then_case_insensitive_matches() {
        let mut metadata = Metadata::new();
        metadata.insert(
            "ORDERS".to_string(),
            vec![ColumnInfo::new("ORDER_DATE", "DATE")],
        );

        let (table, columns) = lookup_table(&metadata, "orders").expect("table should resolve");
        assert_eq!(table, "ORDERS");
        assert_eq!(
            lookup_column(columns, " order_date ").map(|column| column.column.as_str()),
            Some("ORDER_DATE")
        );
        assert!(lookup_table(&metadata, "customers").is_none());
        assert!(lookup_column(columns, "amount").is_none());
    }
}
