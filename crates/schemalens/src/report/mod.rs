//! Report assembly: a pure merge of stage outputs followed by one
//! JSON-safety normalization.

use uuid::Uuid;

use crate::inspect::lookup_table;
use crate::models::report::{
    REPORT_SCHEMA_VERSION, ReportMeta, ReportSummary, TableSummary, Transformation, Understanding,
};
use crate::models::{
    Chart, Kpi, Metadata, Narrative, Profile, QualityAssessment, Relationship, Report,
};

/// Everything the pipeline produced for one run.
#[derive(Debug, Clone, Default)]
pub struct StageOutputs {
    pub schema_analyzed: Option<String>,
    pub metadata: Metadata,
    pub profile: Profile,
    pub relationships: Vec<Relationship>,
    pub kpis: Vec<Kpi>,
    pub charts: Vec<Chart>,
    pub quality: QualityAssessment,
    pub insights: Option<Narrative>,
}

#[must_use]
pub fn new_load_id() -> String {
    Uuid::new_v4().to_string()
}

#[must_use]
pub fn assemble_report(load_id: String, generated_at: String, outputs: StageOutputs) -> Report {
    let StageOutputs {
        schema_analyzed,
        metadata,
        profile,
        relationships,
        kpis,
        charts,
        quality,
        insights,
    } = outputs;

    let tables = metadata
        .iter()
        .map(|(table, columns)| TableSummary {
            table: table.clone(),
            columns: columns.len(),
            rows: profile.get(table).and_then(|entry| entry.row_count),
        })
        .collect::<Vec<_>>();

    let relationships = relationships
        .into_iter()
        .filter_map(|relationship| canonical_relationship(&metadata, relationship))
        .collect();

    let transformations = quality
        .issues
        .iter()
        .map(|issue| Transformation {
            table: issue.table.clone(),
            column: issue.column.clone(),
            issue: issue.issue.clone(),
            action: issue.suggested_fix.clone(),
        })
        .collect();

    let report = Report {
        meta: ReportMeta {
            load_id,
            generated_at,
            schema_analyzed,
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
        },
        summary: ReportSummary {
            tables_count: metadata.len(),
            kpis_count: kpis.len(),
            charts_count: charts.len(),
            quality_score: quality.overall_score,
        },
        understanding: Understanding {
            total_tables: metadata.len(),
            tables,
            relationships,
        },
        kpis,
        charts,
        data_quality: quality,
        transformations,
        insights: insights.unwrap_or_else(crate::synthesize::narrative::fallback),
    };

    report.normalized()
}

/// Drops relationships naming a table absent from metadata; known names are
/// rewritten to their catalog spelling.
fn canonical_relationship(metadata: &Metadata, relationship: Relationship) -> Option<Relationship> {
    let Some((table1, _)) = lookup_table(metadata, &relationship.table1) else {
        tracing::debug!(table = %relationship.table1, "relationship names unknown table; dropped");
        return None;
    };
    let Some((table2, _)) = lookup_table(metadata, &relationship.table2) else {
        tracing::debug!(table = %relationship.table2, "relationship names unknown table; dropped");
        return None;
    };

    Some(Relationship {
        table1: table1.clone(),
        table2: table2.clone(),
        relationship: relationship.relationship,
    })
}

#[cfg(test)]
mod tests {
    use super::{StageOutputs, assemble_report, new_load_id};
    use crate::models::{
        ColumnInfo, Issue, Metadata, Profile, QualityAssessment, Relationship, TableProfile,
    };
    use crate::synthesize::FALLBACK_SUMMARY;

    #[test]
    fn assembles_summary_understanding_and_transformations() {
        let mut metadata = Metadata::new();
        metadata.insert(
            "ORDERS".to_string(),
            vec![
                ColumnInfo::new("ORDER_ID", "INTEGER"),
                ColumnInfo::new("USER_ID", "INTEGER"),
            ],
        );
        metadata.insert("USERS".to_string(), vec![ColumnInfo::new("USER_ID", "INTEGER")]);
        let mut profile = Profile::new();
        profile.insert("ORDERS".to_string(), TableProfile { row_count: Some(12) });
        profile.insert("USERS".to_string(), TableProfile { row_count: None });

        let outputs = StageOutputs {
            schema_analyzed: Some("main".to_string()),
            metadata,
            profile,
            relationships: vec![
                Relationship {
                    table1: "orders".to_string(),
                    table2: "USERS".to_string(),
                    relationship: "many-to-one".to_string(),
                },
                Relationship {
                    table1: "ORDERS".to_string(),
                    table2: "PAYMENTS".to_string(),
                    relationship: "one-to-many".to_string(),
                },
            ],
            quality: QualityAssessment {
                overall_score: Some(90.0),
                issues: vec![Issue {
                    table: "USERS".to_string(),
                    column: "EMAIL".to_string(),
                    issue: "Duplicates".to_string(),
                    suggested_fix: "Deduplicate".to_string(),
                }],
            },
            ..StageOutputs::default()
        };

        let report = assemble_report(
            "R1".to_string(),
            "2026-01-01T00:00:00.000Z".to_string(),
            outputs,
        );

        assert_eq!(report.summary.tables_count, 2);
        assert_eq!(report.summary.quality_score, Some(90.0));
        assert_eq!(report.understanding.tables[0].rows, Some(12));
        assert_eq!(report.understanding.tables[1].rows, None);
        assert_eq!(report.understanding.relationships.len(), 1);
        assert_eq!(report.understanding.relationships[0].table1, "ORDERS");
        assert_eq!(report.transformations[0].action, "Deduplicate");
        assert_eq!(report.insights.summary, FALLBACK_SUMMARY);
    }

    #[test]
    fn load_ids_are_unique_uuids() {
        let first = new_load_id();
        let second = new_load_id();
        assert_ne!(first, second);
        assert_eq!(first.len(), 36);
    }
}
