use crate::models::{Profile, TableProfile};
use crate::source::DataSource;
use crate::utils::sql::quote_identifier;

pub const MAX_PROFILED_TABLES: usize = 15;

/// Counts rows for at most [`MAX_PROFILED_TABLES`] tables. A failed count is
/// recorded as `row_count: None`.
pub fn profile_tables<'a, I>(source: &dyn DataSource, tables: I) -> Profile
where
    I: IntoIterator<Item = &'a String>,
{
    let mut profile = Profile::new();
    for table in tables.into_iter().take(MAX_PROFILED_TABLES) {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table));
        let row_count = match source.query_rows(&sql, Some(1)) {
            Ok(rows) => rows.first_scalar().and_then(|value| value.as_i64()),
            Err(error) => {
                tracing::debug!(table = %table, %error, "row count failed");
                None
            }
        };
        profile.insert(table.clone(), TableProfile { row_count });
    }

    tracing::info!(
        tables = profile.len(),
        counted = profile.values().filter(|entry| entry.row_count.is_some()).count(),
        "row profile complete"
    );
    profile
}
