use std::sync::OnceLock;

use regex::Regex;

const RESERVED_WORDS: &[&str] = &[
    "all", "and", "as", "by", "case", "check", "column", "create", "default", "delete", "desc",
    "distinct", "drop", "else", "from", "group", "having", "in", "index", "insert", "into", "is",
    "join", "key", "limit", "not", "null", "on", "or", "order", "select", "set", "table", "then",
    "to", "union", "update", "user", "values", "when", "where",
];

fn plain_identifier_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*$").expect("plain identifier regex should compile")
    })
}

/// Renders a catalog identifier for inclusion in generated SQL. Plain words are
/// emitted as-is; anything else is double-quoted with embedded quotes doubled.
#[must_use]
pub fn quote_identifier(identifier: &str) -> String {
    let lowered = identifier.to_ascii_lowercase();
    if plain_identifier_regex().is_match(identifier) && !RESERVED_WORDS.contains(&lowered.as_str())
    {
        identifier.to_string()
    } else {
        format!("\"{}\"", identifier.replace('"', "\"\""))
    }
}

#[must_use]
pub fn single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
