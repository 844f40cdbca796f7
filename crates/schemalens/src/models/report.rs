use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::value::{DataRow, DataValue, normalize_row};

pub const REPORT_SCHEMA_VERSION: &str = "schemalens.report.v1";

/// Table name -> ordered `{column, type}` pairs.
pub type Metadata = BTreeMap<String, Vec<ColumnInfo>>;

/// Table name -> row count result.
pub type Profile = BTreeMap<String, TableProfile>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnInfo {
    pub column: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

impl ColumnInfo {
    #[must_use]
    pub fn new(column: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            data_type: data_type.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TableProfile {
    /// `None` when the count query failed.
    pub row_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Relationship {
    pub table1: String,
    pub table2: String,
    pub relationship: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Kpi {
    pub name: String,
    pub description: String,
    pub sql: String,
    #[schemars(with = "Value")]
    pub value: DataValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Chart {
    pub name: String,
    pub description: String,
    pub chart_type: String,
    pub x_axis: String,
    pub y_axis: String,
    pub sql: String,
    #[schemars(with = "Vec<BTreeMap<String, Value>>")]
    pub sample_data: Vec<DataRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    MissingValues,
    Duplicates,
    InvalidDates,
}

impl CheckKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingValues => "missing_values",
            Self::Duplicates => "duplicates",
            Self::InvalidDates => "invalid_dates",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "missing_values" => Some(Self::MissingValues),
            "duplicates" => Some(Self::Duplicates),
            "invalid_dates" => Some(Self::InvalidDates),
            _ => None,
        }
    }
}

/// Verified, SQL-computed data-quality measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Signal {
    pub table: String,
    pub column: String,
    #[serde(rename = "signal")]
    pub kind: CheckKind,
    pub count: i64,
}

/// Narrative data-quality conclusion; not verified against the source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Issue {
    pub table: String,
    pub column: String,
    pub issue: String,
    pub suggested_fix: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, JsonSchema)]
pub struct QualityAssessment {
    pub overall_score: Option<f64>,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Narrative {
    pub summary: String,
    pub key_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ReportMeta {
    pub load_id: String,
    pub generated_at: String,
    pub schema_analyzed: Option<String>,
    pub schema_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ReportSummary {
    pub tables_count: usize,
    pub kpis_count: usize,
    pub charts_count: usize,
    pub quality_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct TableSummary {
    pub table: String,
    pub columns: usize,
    pub rows: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Understanding {
    pub total_tables: usize,
    pub tables: Vec<TableSummary>,
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Transformation {
    pub table: String,
    pub column: String,
    pub issue: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Report {
    pub meta: ReportMeta,
    pub summary: ReportSummary,
    pub understanding: Understanding,
    pub kpis: Vec<Kpi>,
    pub charts: Vec<Chart>,
    pub data_quality: QualityAssessment,
    pub transformations: Vec<Transformation>,
    pub insights: Narrative,
}

impl Report {
    /// Applies the JSON-safety normalization to every typed value in the tree.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            kpis: self
                .kpis
                .into_iter()
                .map(|kpi| Kpi {
                    value: kpi.value.normalized(),
                    ..kpi
                })
                .collect(),
            charts: self
                .charts
                .into_iter()
                .map(|chart| Chart {
                    sample_data: chart.sample_data.iter().map(normalize_row).collect(),
                    ..chart
                })
                .collect(),
            ..self
        }
    }

    pub fn to_document(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

#[must_use]
pub fn json_schema() -> Value {
    let schema = schemars::schema_for!(Report);
    match serde_json::to_value(schema) {
        Ok(value) => value,
        Err(error) => {
            panic!("failed to serialize generated report schema: {error}");
        }
    }
}
