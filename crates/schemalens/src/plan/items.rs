//! Typed candidates for untrusted plan entries.
//!
//! Each candidate is built from one raw plan entry through an explicit
//! validation function that yields either a safe item or a [`PlanRejection`].

use serde_json::{Map, Value};

use crate::error::PlanRejection;
use crate::inspect::{lookup_column, lookup_table};
use crate::models::{CheckKind, Metadata, Relationship};
use crate::source::guard::check_read_only;

fn as_object(entry: &Value) -> Result<&Map<String, Value>, PlanRejection> {
    entry.as_object().ok_or(PlanRejection::NotAnObject)
}

/// Trimmed, non-empty string field.
fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn required_text(
    object: &Map<String, Value>,
    key: &'static str,
) -> Result<String, PlanRejection> {
    text_field(object, key).ok_or(PlanRejection::MissingField(key))
}

fn safe_sql(raw_sql: &str) -> Result<String, PlanRejection> {
    check_read_only(raw_sql)
        .map(str::to_string)
        .map_err(|error| PlanRejection::UnsafeSql(error.to_string()))
}

pub fn validate_relationship(entry: &Value) -> Result<Relationship, PlanRejection> {
    let object = as_object(entry)?;
    Ok(Relationship {
        table1: required_text(object, "table1")?,
        table2: required_text(object, "table2")?,
        relationship: text_field(object, "relationship").unwrap_or_default(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiCandidate {
    pub name: String,
    pub description: String,
    pub sql: String,
}

impl KpiCandidate {
    pub fn validate(entry: &Value) -> Result<Self, PlanRejection> {
        let object = as_object(entry)?;
        let name = required_text(object, "name")?;
        let sql = safe_sql(&required_text(object, "sql")?)?;
        Ok(Self {
            name,
            description: text_field(object, "description").unwrap_or_default(),
            sql,
        })
    }
}

/// Chart entry as proposed; every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartDraft {
    pub table: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub chart_type: Option<String>,
    pub sql: Option<String>,
    pub x_axis: Option<String>,
    pub y_axis: Option<String>,
}

/// Chart ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub name: String,
    pub description: String,
    pub chart_type: String,
    pub x_axis: String,
    pub y_axis: String,
    pub sql: String,
}

impl ChartDraft {
    /// A non-object entry becomes an empty draft, which can still be repaired.
    #[must_use]
    pub fn from_entry(entry: &Value) -> Self {
        let Some(object) = entry.as_object() else {
            return Self::default();
        };
        Self {
            table: text_field(object, "table"),
            name: text_field(object, "name"),
            description: text_field(object, "description"),
            chart_type: text_field(object, "chart_type"),
            sql: text_field(object, "sql"),
            x_axis: text_field(object, "x_axis"),
            y_axis: text_field(object, "y_axis"),
        }
    }

    pub fn validate(&self) -> Result<ChartSpec, PlanRejection> {
        let sql = self.sql.as_deref().ok_or(PlanRejection::MissingField("sql"))?;
        let sql = safe_sql(sql)?;
        let field = |value: &Option<String>, key: &'static str| {
            value.clone().ok_or(PlanRejection::MissingField(key))
        };
        Ok(ChartSpec {
            name: field(&self.name, "name")?,
            description: field(&self.description, "description")?,
            chart_type: field(&self.chart_type, "chart_type")?,
            x_axis: field(&self.x_axis, "x_axis")?,
            y_axis: field(&self.y_axis, "y_axis")?,
            sql,
        })
    }
}

/// Data-quality check resolved against metadata; names are canonical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckCandidate {
    pub table: String,
    pub column: String,
    pub kind: CheckKind,
}

impl CheckCandidate {
    pub fn validate(entry: &Value, metadata: &Metadata) -> Result<Self, PlanRejection> {
        let object = as_object(entry)?;
        let raw_kind = required_text(object, "check_type")?;
        let kind =
            CheckKind::parse(&raw_kind).ok_or(PlanRejection::UnknownCheckType(raw_kind))?;
        let table = required_text(object, "table")?;
        let column = required_text(object, "column")?;

        let (table_name, columns) =
            lookup_table(metadata, &table).ok_or(PlanRejection::UnknownTable(table.clone()))?;
        let column_info = lookup_column(columns, &column)
            .ok_or(PlanRejection::UnknownColumn { table, column })?;

        Ok(Self {
            table: table_name.clone(),
            column: column_info.column.clone(),
            kind,
        })
    }
}
