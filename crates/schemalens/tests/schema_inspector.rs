mod common;

use rusqlite::Connection;
use schemalens::inspect::{MAX_PROFILED_TABLES, list_tables, profile_tables, read_metadata};
use schemalens::models::ColumnInfo;
use schemalens::source::{DataSource, SqliteSource};

use common::{SHOP_SQL, open_source, seed_database};

#[test]
fn reads_columns_in_declared_order_for_all_tables() {
    let path = seed_database("inspect-all", SHOP_SQL);
    let source = open_source(&path);

    let metadata = read_metadata(&source, None);

    assert_eq!(
        metadata.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["ORDERS", "USERS"]
    );
    assert_eq!(
        metadata["ORDERS"],
        vec![
            ColumnInfo::new("ORDER_ID", "INTEGER"),
            ColumnInfo::new("ORDER_DATE", "DATE"),
            ColumnInfo::new("AMOUNT", "DECIMAL(10,2)"),
            ColumnInfo::new("CHANNEL", "TEXT"),
        ]
    );
}

#[test]
fn restricts_to_selected_tables_case_insensitively() {
    let path = seed_database("inspect-selected", SHOP_SQL);
    let source = open_source(&path);

    let metadata = read_metadata(&source, Some(&["users".to_string()]));
    assert_eq!(metadata.keys().collect::<Vec<_>>(), vec!["USERS"]);

    let metadata = read_metadata(&source, Some(&["NOPE".to_string()]));
    assert!(metadata.is_empty());

    let metadata = read_metadata(&source, Some(&[]));
    assert_eq!(metadata.len(), 2);
}

#[test]
fn internal_and_store_tables_are_hidden() {
    let path = seed_database(
        "inspect-internal",
        &format!(
            "{SHOP_SQL}
             CREATE TABLE schemalens_reports (load_id TEXT, load_datetime TEXT, clean_json TEXT);
             CREATE VIEW WEB_ORDERS AS SELECT ORDER_ID, AMOUNT FROM ORDERS WHERE CHANNEL = 'web';"
        ),
    );
    let source = open_source(&path);

    let tables = list_tables(&source).expect("tables should list");
    assert_eq!(tables, vec!["ORDERS", "USERS", "WEB_ORDERS"]);

    let metadata = read_metadata(&source, None);
    assert!(!metadata.contains_key("schemalens_reports"));
    assert_eq!(metadata["WEB_ORDERS"].len(), 2);
}

#[test]
fn catalog_failure_degrades_to_empty_metadata() {
    let connection = Connection::open_in_memory().expect("in-memory sqlite should open");
    connection
        .execute_batch(SHOP_SQL)
        .expect("seed sql should execute");
    let source = SqliteSource::from_connection(connection).with_schema("not_attached");

    assert!(source.catalog_columns().is_err());
    assert!(read_metadata(&source, None).is_empty());
    assert!(list_tables(&source).is_err());
}

#[test]
fn profiles_row_counts_and_records_failures_as_null() {
    let path = seed_database("profile", SHOP_SQL);
    let source = open_source(&path);

    let tables = vec!["ORDERS".to_string(), "MISSING".to_string()];
    let profile = profile_tables(&source, &tables);

    assert_eq!(profile["ORDERS"].row_count, Some(4));
    assert_eq!(profile["MISSING"].row_count, None);
}

#[test]
fn profiling_is_capped() {
    let mut sql = String::new();
    for index in 0..(MAX_PROFILED_TABLES + 2) {
        sql.push_str(&format!("CREATE TABLE T{index:02} (ID INTEGER);"));
    }
    let path = seed_database("profile-cap", &sql);
    let source = open_source(&path);

    let metadata = read_metadata(&source, None);
    assert_eq!(metadata.len(), MAX_PROFILED_TABLES + 2);

    let profile = profile_tables(&source, metadata.keys());
    assert_eq!(profile.len(), MAX_PROFILED_TABLES);
    assert!(profile.values().all(|entry| entry.row_count == Some(0)));
}
