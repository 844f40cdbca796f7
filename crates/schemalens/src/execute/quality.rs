use crate::models::{CheckKind, Metadata, Signal};
use crate::plan::{CheckCandidate, Plan};
use crate::source::DataSource;
use crate::utils::sql::quote_identifier;

/// SQL computing the violation count for one check.
#[must_use]
pub fn check_sql(check: &CheckCandidate, current_timestamp: &str) -> String {
    let table = quote_identifier(&check.table);
    let column = quote_identifier(&check.column);
    match check.kind {
        CheckKind::MissingValues => {
            format!("SELECT SUM(CASE WHEN {column} IS NULL THEN 1 ELSE 0 END) FROM {table}")
        }
        CheckKind::Duplicates => {
            format!("SELECT COUNT(*) - COUNT(DISTINCT {column}) FROM {table}")
        }
        CheckKind::InvalidDates => {
            format!("SELECT COUNT(*) FROM {table} WHERE {column} > {current_timestamp}")
        }
    }
}

/// Runs every check in the plan and keeps positive counts. Entries naming an
/// unknown check type, table or column never reach the source.
pub fn collect_signals(source: &dyn DataSource, plan: &Plan, metadata: &Metadata) -> Vec<Signal> {
    let mut signals = Vec::new();
    for entry in &plan.entries {
        let check = match CheckCandidate::validate(entry, metadata) {
            Ok(check) => check,
            Err(rejection) => {
                tracing::debug!(%rejection, "quality check rejected");
                continue;
            }
        };

        let sql = check_sql(&check, source.current_timestamp_expr());
        let count = match source.query_rows(&sql, Some(1)) {
            Ok(rows) => rows
                .first_scalar()
                .and_then(|value| value.as_i64())
                .unwrap_or(0),
            Err(error) => {
                tracing::debug!(
                    table = %check.table,
                    column = %check.column,
                    check = check.kind.as_str(),
                    %error,
                    "quality check failed"
                );
                continue;
            }
        };

        if count > 0 {
            signals.push(Signal {
                table: check.table,
                column: check.column,
                kind: check.kind,
                count,
            });
        }
    }

    tracing::info!(signals = signals.len(), checks = plan.len(), "quality signals collected");
    signals
}

#[cfg(test)]
mod tests {
    use super::check_sql;
    use crate::models::CheckKind;
    use crate::plan::CheckCandidate;

    #[test]
    fn builds_check_queries_with_quoted_identifiers() {
        let check = |kind| CheckCandidate {
            table: "USERS".to_string(),
            column: "sign up".to_string(),
            kind,
        };

        assert_eq!(
            check_sql(&check(CheckKind::MissingValues), "CURRENT_TIMESTAMP"),
            r#"SELECT SUM(CASE WHEN "sign up" IS NULL THEN 1 ELSE 0 END) FROM USERS"#
        );
        assert_eq!(
            check_sql(&check(CheckKind::Duplicates), "CURRENT_TIMESTAMP"),
            r#"SELECT COUNT(*) - COUNT(DISTINCT "sign up") FROM USERS"#
        );
        assert_eq!(
            check_sql(&check(CheckKind::InvalidDates), "CURRENT_TIMESTAMP"),
            r#"SELECT COUNT(*) FROM USERS WHERE "sign up" > CURRENT_TIMESTAMP"#
        );
    }
}
