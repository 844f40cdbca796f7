//! Read-only guardrail applied to SQL proposed by the text generator.
//!
//! Only the statement shape is checked here. Whether a statement writes is
//! decided by the data source when it prepares it.

use crate::error::SourceError;

/// Returns the statement with trailing semicolons removed, or a guardrail
/// rejection when it is empty, has several statements, or does not start
/// with `SELECT`/`WITH`.
pub fn check_read_only(raw_sql: &str) -> Result<&str, SourceError> {
    let candidate = strip_trailing_semicolons(raw_sql);
    if candidate.is_empty() {
        return Err(SourceError::Guardrail("statement is empty".to_string()));
    }

    if has_unquoted_semicolon(candidate) {
        return Err(SourceError::Guardrail(
            "multi-statement SQL is not allowed".to_string(),
        ));
    }

    let leading = leading_keyword(candidate).to_ascii_lowercase();
    if leading != "select" && leading != "with" {
        return Err(SourceError::Guardrail(format!(
            "only SELECT and WITH ... SELECT statements are allowed, got `{leading}`"
        )));
    }

    Ok(candidate)
}

fn strip_trailing_semicolons(raw_sql: &str) -> &str {
    let mut candidate = raw_sql.trim();
    while let Some(stripped) = candidate.strip_suffix(';') {
        candidate = stripped.trim_end();
    }
    candidate
}

/// Semicolons inside string literals or quoted identifiers do not count.
fn has_unquoted_semicolon(sql: &str) -> bool {
    let mut open_quote: Option<char> = None;
    for ch in sql.chars() {
        match open_quote {
            Some(quote) if ch == quote => open_quote = None,
            Some(_) => {}
            None if matches!(ch, '\'' | '"' | '`') => open_quote = Some(ch),
            None if ch == ';' => return true,
            None => {}
        }
    }
    false
}

fn leading_keyword(sql: &str) -> &str {
    sql.split(|ch: char| !ch.is_ascii_alphanumeric() && ch != '_')
        .find(|token| !token.is_empty())
        .unwrap_or("unknown")
}
