use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

fn code_fence_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?i)```(?:json)?").expect("code fence regex should compile"))
}

/// Lossy JSON extraction from free text.
///
/// Code fences are removed, then the whole text is parsed; failing that, the
/// span from the first `{` to the last `}` is parsed. Anything else yields an
/// empty object.
#[must_use]
pub fn extract_json(text: &str) -> Value {
    let cleaned = code_fence_regex().replace_all(text, "");
    let cleaned = cleaned.trim();

    if let Ok(value) = serde_json::from_str::<Value>(cleaned) {
        return value;
    }

    if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}'))
        && start < end
        && let Ok(value) = serde_json::from_str::<Value>(&cleaned[start..=end])
    {
        return value;
    }

    Value::Object(Map::new())
}

/// Like [`extract_json`], but a non-object result is an empty mapping.
#[must_use]
pub fn extract_object(text: &str) -> Map<String, Value> {
    match extract_json(text) {
        Value::Object(object) => object,
        _ => Map::new(),
    }
}
