//! Instruction templates for each generated plan and synthesis step.

use serde::Serialize;
use serde_json::Value;

use crate::models::{Kpi, Metadata, QualityAssessment, Signal};

pub(crate) fn compact_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

pub fn relationships(schema: &Metadata) -> String {
    format!(
        r#"Return STRICT JSON ONLY.

Infer relationships using *_ID columns.

Schema:
{schema}

Format:
{{ "relationships": [{{ "table1":"", "table2":"", "relationship":"" }}] }}
"#,
        schema = compact_json(schema)
    )
}

pub fn kpis(schema: &Metadata) -> String {
    format!(
        r#"Return STRICT JSON ONLY.

Generate EXACTLY 4 KPIs.

Rules:
- COUNT, SUM, AVG only
- ONE table per KPI
- NO joins
- Use real columns only

Schema:
{schema}

Format:
{{ "kpis": [{{ "name":"", "description":"", "sql":"" }}] }}
"#,
        schema = compact_json(schema)
    )
}

pub fn charts(schema: &Metadata) -> String {
    format!(
        r#"Return STRICT JSON ONLY.

Generate EXACTLY 4 charts.

Rules:
- ONE table per chart
- NO joins
- Group ONLY by DATE, DEVICE_TYPE, CHANNEL
- NEVER group by *_ID columns
- LIMIT output to <= 20 rows

Each chart MUST include:
- name
- description
- chart_type
- sql
- x_axis
- y_axis
- table

Schema:
{schema}

Format:
{{ "charts": [{{ "table":"", "name":"", "description":"", "chart_type":"", "sql":"", "x_axis":"", "y_axis":"" }}] }}
"#,
        schema = compact_json(schema)
    )
}

pub fn quality_scope(schema: &Metadata) -> String {
    format!(
        r#"Return STRICT JSON ONLY.

You are a senior Data Quality architect.

Using the catalog metadata below,
select columns that should be checked for:

1. Missing values
2. Duplicate records
3. Invalid or future dates

Rules:
- Missing values: any business metric or descriptive column
- Duplicates: *_ID, *_KEY, EMAIL, USER, CUSTOMER columns
- Dates: DATE, TIME, TS, CREATED, UPDATED columns

Metadata:
{schema}

Output format:
{{
  "checks": [
    {{
      "table": "",
      "column": "",
      "check_type": "missing_values | duplicates | invalid_dates"
    }}
  ]
}}
"#,
        schema = compact_json(schema)
    )
}

pub fn quality_assessment(schema: &Metadata, signals: &[Signal]) -> String {
    format!(
        r#"Return STRICT JSON ONLY.

You are a senior Data Quality architect.

Based on the verified SQL signals below,
identify true data quality issues and fixes.

Issue types allowed:
- Missing values
- Duplicates
- Invalid dates

Signals (from SQL execution):
{signals}

Metadata:
{schema}

Output format:
{{
  "overall_score": 0-100,
  "issues": [
    {{
      "table": "",
      "column": "",
      "issue": "",
      "suggested_fix": ""
    }}
  ]
}}
"#,
        signals = compact_json(signals),
        schema = compact_json(schema)
    )
}

pub fn narrative(tables: &[String], kpis: &[Kpi], quality: &QualityAssessment) -> String {
    let context = serde_json::json!({
        "understanding": { "tables": tables },
        "kpis": serde_json::to_value(kpis).unwrap_or(Value::Null),
        "quality": serde_json::to_value(quality).unwrap_or(Value::Null),
        "transformations": serde_json::to_value(&quality.issues).unwrap_or(Value::Null),
    });

    format!(
        r#"Return STRICT JSON ONLY.

Write executive insights covering:
- main data domains
- key tables
- total tables
- data quality %
- transformation summary

Context:
{context}

Format:
{{ "summary":"", "key_points":[] }}
"#
    )
}

pub fn chat(question: &str, report: &Value) -> String {
    format!(
        r#"You are a polite, professional data insights assistant.

Rules:
- Answer ONLY using the provided context
- If the answer is not found, say:
  "{refusal}"
- Be concise, business-friendly, and clear
- Do NOT invent metrics or tables

Latest Insights Context:
{context}

User Question:
{question}

Return STRICT JSON ONLY.

Format:
{{ "answer": "" }}
"#,
        refusal = crate::chat::REFUSAL_SENTENCE,
        context = compact_json(report)
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{chat, charts, kpis};
    use crate::models::{ColumnInfo, Metadata};

    fn metadata() -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert(
            "ORDERS".to_string(),
            vec![ColumnInfo::new("ORDER_DATE", "DATE")],
        );
        metadata
    }

    #[test]
    fn plan_prompts_embed_schema_and_format() {
        let prompt = kpis(&metadata());
        assert!(prompt.contains("EXACTLY 4 KPIs"));
        assert!(prompt.contains(r#"{"ORDERS":[{"column":"ORDER_DATE","type":"DATE"}]}"#));
        assert!(prompt.contains(r#"{ "kpis": [{ "name":"", "description":"", "sql":"" }] }"#));

        assert!(charts(&metadata()).contains("NEVER group by *_ID columns"));
    }

    #[test]
    fn chat_prompt_carries_refusal_and_question() {
        let prompt = chat("How many orders?", &json!({"kpis": []}));
        assert!(prompt.contains(
            "Based on the latest insights, there is not enough data to answer this question."
        ));
        assert!(prompt.contains("How many orders?"));
        assert!(prompt.contains(r#"{"kpis":[]}"#));
    }
}
