use serde_json::{Map, Value};

use super::lenient_text;
use crate::generation::{TextGenerator, complete_object};
use crate::models::{Issue, Metadata, QualityAssessment, Signal};
use crate::plan::prompts;

pub fn assess_quality(
    generator: &dyn TextGenerator,
    metadata: &Metadata,
    signals: &[Signal],
) -> QualityAssessment {
    let response = complete_object(
        generator,
        "quality_assessment",
        &prompts::quality_assessment(metadata, signals),
    );
    let assessment = parse_assessment(&response);

    tracing::info!(
        issues = assessment.issues.len(),
        score = ?assessment.overall_score,
        "quality assessed"
    );
    assessment
}

/// Score accepted as a finite number or numeric string; issues parsed
/// leniently with non-object entries skipped.
#[must_use]
pub fn parse_assessment(response: &Map<String, Value>) -> QualityAssessment {
    let overall_score = match response.get("overall_score") {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|score| score.is_finite());

    let issues = response
        .get("issues")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_object)
                .map(|entry| Issue {
                    table: lenient_text(entry.get("table")),
                    column: lenient_text(entry.get("column")),
                    issue: lenient_text(entry.get("issue")),
                    suggested_fix: lenient_text(entry.get("suggested_fix")),
                })
                .collect()
        })
        .unwrap_or_default();

    QualityAssessment {
        overall_score,
        issues,
    }
}
