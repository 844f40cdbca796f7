use crate::error::SourceError;
use crate::models::Kpi;
use crate::plan::{KpiCandidate, Plan};
use crate::source::DataSource;

pub const MAX_KPIS: usize = 4;

/// Executes the first [`MAX_KPIS`] plan entries; the first column of the
/// first row is the KPI value.
pub fn execute_kpis(source: &dyn DataSource, plan: &Plan) -> Vec<Kpi> {
    let mut kpis = Vec::new();
    for (index, entry) in plan.entries.iter().take(MAX_KPIS).enumerate() {
        let candidate = match KpiCandidate::validate(entry) {
            Ok(candidate) => candidate,
            Err(rejection) => {
                tracing::debug!(index, %rejection, "kpi entry rejected");
                continue;
            }
        };

        match execute_one(source, &candidate) {
            Ok(kpi) => kpis.push(kpi),
            Err(error) => tracing::debug!(kpi = %candidate.name, %error, "kpi dropped"),
        }
    }

    tracing::info!(kpis = kpis.len(), planned = plan.len(), "kpis executed");
    kpis
}

fn execute_one(source: &dyn DataSource, candidate: &KpiCandidate) -> Result<Kpi, SourceError> {
    let rows = source.query_rows(&candidate.sql, Some(1))?;
    let value = rows.first_scalar().ok_or(SourceError::Empty)?;
    Ok(Kpi {
        name: candidate.name.clone(),
        description: candidate.description.clone(),
        sql: candidate.sql.clone(),
        value: value.normalized(),
    })
}
