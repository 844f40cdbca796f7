use serde_json::{Map, Value};

use super::lenient_text;
use crate::generation::{TextGenerator, complete_object};
use crate::models::{Kpi, Narrative, QualityAssessment};
use crate::plan::prompts;

pub const FALLBACK_SUMMARY: &str = "The dataset spans multiple business domains with a moderate to high data quality score. Key operational and marketing tables enable KPI reporting and trend analysis. Data quality issues are primarily related to inconsistent data types.";

pub fn narrate(
    generator: &dyn TextGenerator,
    tables: &[String],
    kpis: &[Kpi],
    quality: &QualityAssessment,
) -> Narrative {
    let response = complete_object(
        generator,
        "narrative",
        &prompts::narrative(tables, kpis, quality),
    );
    let narrative = parse_narrative(response);
    tracing::info!(key_points = narrative.key_points.len(), "narrative synthesized");
    narrative
}

/// An empty mapping yields the fixed fallback summary.
#[must_use]
pub fn parse_narrative(response: Map<String, Value>) -> Narrative {
    if response.is_empty() {
        tracing::warn!("narrative response unusable; using fallback summary");
        return fallback();
    }

    let key_points = match response.get("key_points") {
        Some(Value::Array(points)) => points
            .iter()
            .filter(|point| !point.is_null())
            .map(|point| lenient_text(Some(point)))
            .collect(),
        _ => Vec::new(),
    };

    Narrative {
        summary: lenient_text(response.get("summary")),
        key_points,
    }
}

#[must_use]
pub fn fallback() -> Narrative {
    Narrative {
        summary: FALLBACK_SUMMARY.to_string(),
        key_points: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, json};

    use super::{FALLBACK_SUMMARY, parse_narrative};

    #[test]
    fn empty_response_uses_fallback() {
        let narrative = parse_narrative(Map::new());
        assert_eq!(narrative.summary, FALLBACK_SUMMARY);
        assert!(narrative.key_points.is_empty());
    }

    #[test]
    fn non_string_key_points_are_stringified() {
        let response = json!({"summary": "Sales grew.", "key_points": ["4 tables", 92, {"a": 1}]});
        let narrative =
            parse_narrative(response.as_object().cloned().expect("object literal"));

        assert_eq!(narrative.summary, "Sales grew.");
        assert_eq!(narrative.key_points, vec!["4 tables", "92", r#"{"a":1}"#]);
    }
}
