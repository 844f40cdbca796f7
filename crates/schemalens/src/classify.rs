//! Name/type heuristics used to pick chart dimensions and metrics.

use crate::models::ColumnInfo;

const DIMENSION_MARKERS: &[&str] = &["DATE", "DAY", "MONTH", "DEVICE", "CHANNEL"];
const TEMPORAL_MARKERS: &[&str] = &["DATE", "DAY", "MONTH"];
const METRIC_TYPE_MARKERS: &[&str] = &[
    "NUMBER", "INT", "FLOAT", "DECIMAL", "NUMERIC", "REAL", "DOUBLE",
];

fn contains_any(haystack: &str, markers: &[&str]) -> bool {
    let upper = haystack.to_ascii_uppercase();
    markers.iter().any(|marker| upper.contains(marker))
}

/// Column name suggests a grouping dimension (date, day, month, device, channel).
#[must_use]
pub fn is_dimension_like(column_name: &str) -> bool {
    contains_any(column_name, DIMENSION_MARKERS)
}

/// Column name suggests a date-like dimension (date, day, month).
#[must_use]
pub fn is_temporal_dimension(column_name: &str) -> bool {
    contains_any(column_name, TEMPORAL_MARKERS)
}

/// Declared type is numeric.
#[must_use]
pub fn is_metric_like(data_type: &str) -> bool {
    contains_any(data_type, METRIC_TYPE_MARKERS)
}

#[must_use]
pub fn first_dimension(columns: &[ColumnInfo]) -> Option<&ColumnInfo> {
    columns.iter().find(|column| is_dimension_like(&column.column))
}

#[must_use]
pub fn first_temporal_dimension(columns: &[ColumnInfo]) -> Option<&ColumnInfo> {
    columns
        .iter()
        .find(|column| is_temporal_dimension(&column.column))
}

#[must_use]
pub fn first_metric(columns: &[ColumnInfo]) -> Option<&ColumnInfo> {
    columns.iter().find(|column| is_metric_like(&column.data_type))
}

#[cfg(test)]
mod tests {
    use super::{
        first_dimension, first_metric, first_temporal_dimension, is_dimension_like,
        is_metric_like, is_temporal_dimension,
    };
    use crate::models::ColumnInfo;

    #[test]
    fn dimension_and_metric_predicates() {
        assert!(is_dimension_like("order_date"));
        assert!(is_dimension_like("DEVICE_TYPE"));
        assert!(is_dimension_like("Channel"));
        assert!(!is_dimension_like("customer_id"));

        assert!(is_temporal_dimension("signup_month"));
        assert!(!is_temporal_dimension("device_type"));

        assert!(is_metric_like("INTEGER"));
        assert!(is_metric_like("NUMBER(38,0)"));
        assert!(is_metric_like("decimal(10,2)"));
        assert!(is_metric_like("REAL"));
        assert!(!is_metric_like("TEXT"));
        assert!(!is_metric_like("DATE"));
    }

    #[test]
    fn picks_first_matching_columns_in_declared_order() {
        let columns = vec![
            ColumnInfo::new("ID", "INTEGER"),
            ColumnInfo::new("DEVICE_TYPE", "TEXT"),
            ColumnInfo::new("ORDER_DATE", "DATE"),
            ColumnInfo::new("AMOUNT", "REAL"),
        ];

        assert_eq!(
            first_dimension(&columns).map(|column| column.column.as_str()),
            Some("DEVICE_TYPE")
        );
        assert_eq!(
            first_temporal_dimension(&columns).map(|column| column.column.as_str()),
            Some("ORDER_DATE")
        );
        assert_eq!(
            first_metric(&columns).map(|column| column.column.as_str()),
            Some("ID")
        );
    }
}
