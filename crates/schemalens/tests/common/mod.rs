#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::Connection;
use schemalens::error::GenerationError;
use schemalens::generation::TextGenerator;
use schemalens::source::SqliteSource;

pub fn temp_db_path(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "schemalens-{label}-{}-{nanos}.sqlite",
        std::process::id()
    ))
}

/// Creates a database file from a SQL batch and returns its path.
pub fn seed_database(label: &str, sql: &str) -> PathBuf {
    let path = temp_db_path(label);
    let connection = Connection::open(&path).expect("seed database should open");
    connection
        .execute_batch(sql)
        .expect("seed sql should execute");
    path
}

pub fn open_source(path: &Path) -> SqliteSource {
    SqliteSource::open(path).expect("seeded database should open read-only")
}

/// Two analytic tables: `ORDERS` (date + numeric) and `USERS` (duplicate emails).
pub const SHOP_SQL: &str = r#"
CREATE TABLE ORDERS (
    ORDER_ID INTEGER PRIMARY KEY,
    ORDER_DATE DATE NOT NULL,
    AMOUNT DECIMAL(10,2),
    CHANNEL TEXT
);
INSERT INTO ORDERS (ORDER_ID, ORDER_DATE, AMOUNT, CHANNEL) VALUES
    (1, '2024-01-01', 10.5, 'web'),
    (2, '2024-01-01', 4.5, 'store'),
    (3, '2024-01-02', NULL, 'web'),
    (4, '2024-01-03', 20, 'web');

CREATE TABLE USERS (
    USER_ID INTEGER PRIMARY KEY,
    EMAIL TEXT,
    SIGNUP_TS TIMESTAMP
);
INSERT INTO USERS (USER_ID, EMAIL, SIGNUP_TS) VALUES
    (1, 'a@example.com', '2024-01-01 08:00:00'),
    (2, 'a@example.com', '2024-01-02 09:00:00'),
    (3, 'a@example.com', '2999-01-01 00:00:00'),
    (4, NULL, '2024-01-04 10:00:00');
"#;

/// Generator that replays canned responses in call order and records prompts.
/// Once the script is exhausted every call fails as disabled.
#[derive(Default)]
pub struct ScriptedGenerator {
    responses: RefCell<VecDeque<String>>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: RefCell::new(responses.into_iter().map(Into::into).collect()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or(GenerationError::Disabled)
    }
}
