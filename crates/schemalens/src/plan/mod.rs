//! Plan generation: ask the text generator for a structured plan and keep the
//! raw entries for the executors to validate.

pub mod items;
pub mod prompts;

use serde_json::{Map, Value};

use crate::generation::{TextGenerator, complete_object};
use crate::models::{Metadata, Relationship};

pub use self::items::{ChartDraft, ChartSpec, CheckCandidate, KpiCandidate, validate_relationship};

/// Relationship inference sees only this many tables.
pub const RELATIONSHIP_TABLE_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    Relationships,
    Kpis,
    Charts,
    Checks,
}

impl PlanKind {
    /// Key of the entry list inside the generated mapping.
    #[must_use]
    pub const fn list_key(self) -> &'static str {
        match self {
            Self::Relationships => "relationships",
            Self::Kpis => "kpis",
            Self::Charts => "charts",
            Self::Checks => "checks",
        }
    }

    #[must_use]
    pub const fn stage(self) -> &'static str {
        match self {
            Self::Relationships => "relationship_plan",
            Self::Kpis => "kpi_plan",
            Self::Charts => "chart_plan",
            Self::Checks => "quality_scope_plan",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub kind: PlanKind,
    pub entries: Vec<Value>,
}

impl Plan {
    #[must_use]
    pub fn empty(kind: PlanKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    /// Takes the designated list out of a generated mapping; a missing or
    /// non-list value is an empty plan.
    #[must_use]
    pub fn from_object(kind: PlanKind, mut object: Map<String, Value>) -> Self {
        let entries = match object.remove(kind.list_key()) {
            Some(Value::Array(entries)) => entries,
            _ => Vec::new(),
        };
        Self { kind, entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn generate_plan(generator: &dyn TextGenerator, kind: PlanKind, metadata: &Metadata) -> Plan {
    let prompt = match kind {
        PlanKind::Relationships => {
            let head = metadata
                .iter()
                .take(RELATIONSHIP_TABLE_LIMIT)
                .map(|(table, columns)| (table.clone(), columns.clone()))
                .collect::<Metadata>();
            prompts::relationships(&head)
        }
        PlanKind::Kpis => prompts::kpis(metadata),
        PlanKind::Charts => prompts::charts(metadata),
        PlanKind::Checks => prompts::quality_scope(metadata),
    };

    let plan = Plan::from_object(kind, complete_object(generator, kind.stage(), &prompt));
    tracing::info!(stage = kind.stage(), entries = plan.len(), "plan generated");
    plan
}

/// Relationship plan, validated; rejected entries are dropped.
pub fn infer_relationships(generator: &dyn TextGenerator, metadata: &Metadata) -> Vec<Relationship> {
    let plan = generate_plan(generator, PlanKind::Relationships, metadata);
    plan.entries
        .iter()
        .filter_map(|entry| match validate_relationship(entry) {
            Ok(relationship) => Some(relationship),
            Err(rejection) => {
                tracing::debug!(%rejection, "relationship entry dropped");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Plan, PlanKind};

    #[test]
    fn plan_takes_designated_list_only() {
        let object = json!({"kpis": [{"name": "a"}, {"name": "b"}], "charts": [{}]});
        let plan = Plan::from_object(
            PlanKind::Kpis,
            object.as_object().cloned().expect("object literal"),
        );
        assert_eq!(plan.len(), 2);

        let object = json!({"kpis": "not a list"});
        let plan = Plan::from_object(
            PlanKind::Kpis,
            object.as_object().cloned().expect("object literal"),
        );
        assert!(plan.is_empty());
    }
}
