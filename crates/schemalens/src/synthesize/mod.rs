//! Quality and narrative synthesis from verified stage outputs.

pub mod narrative;
pub mod quality;

pub use self::narrative::{FALLBACK_SUMMARY, narrate};
pub use self::quality::assess_quality;

use serde_json::Value;

/// String form of a loosely-typed response field; null is empty.
pub(crate) fn lenient_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
