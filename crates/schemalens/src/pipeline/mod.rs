//! One analysis run: inspect, profile, plan, execute, synthesize, assemble
//! and persist, strictly in that order.

use anyhow::{Context, Result};

use crate::execute::{collect_signals, execute_charts, execute_kpis};
use crate::generation::TextGenerator;
use crate::inspect::{profile_tables, read_metadata};
use crate::models::Report;
use crate::plan::{PlanKind, generate_plan, infer_relationships};
use crate::report::{StageOutputs, assemble_report, new_load_id};
use crate::source::DataSource;
use crate::store::ReportStore;
use crate::synthesize::{assess_quality, narrate};
use crate::utils::time::now_utc_timestamp;

/// Data-access context for one run. An owned source is released when the
/// session is dropped; a borrowed one stays with its caller.
pub enum SourceSession<'a> {
    Owned(Box<dyn DataSource + 'a>),
    Borrowed(&'a dyn DataSource),
}

impl<'a> SourceSession<'a> {
    #[must_use]
    pub fn owned(source: Box<dyn DataSource + 'a>) -> Self {
        Self::Owned(source)
    }

    #[must_use]
    pub fn borrowed(source: &'a dyn DataSource) -> Self {
        Self::Borrowed(source)
    }

    #[must_use]
    pub fn source(&self) -> &dyn DataSource {
        match self {
            Self::Owned(source) => source.as_ref(),
            Self::Borrowed(source) => *source,
        }
    }

    #[must_use]
    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }
}

impl Drop for SourceSession<'_> {
    fn drop(&mut self) {
        if self.is_owned() {
            tracing::debug!("data source session released");
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Restrict analysis to these tables; `None` or empty means all tables.
    pub tables: Option<Vec<String>>,
}

/// Runs the full pipeline and persists the report. Only a persistence
/// failure fails the run.
pub fn run_pipeline(
    session: SourceSession<'_>,
    generator: &dyn TextGenerator,
    store: &dyn ReportStore,
    options: &RunOptions,
) -> Result<Report> {
    let load_id = new_load_id();
    let span = tracing::info_span!("pipeline", load_id = %load_id);
    let _entered = span.enter();

    let source = session.source();
    match options.tables.as_deref() {
        Some(tables) if !tables.is_empty() => {
            tracing::info!(tables = %tables.join(","), "analyzing selected tables");
        }
        _ => tracing::info!("analyzing all tables"),
    }

    let metadata = read_metadata(source, options.tables.as_deref());
    let profile = profile_tables(source, metadata.keys());
    let relationships = infer_relationships(generator, &metadata);

    let kpi_plan = generate_plan(generator, PlanKind::Kpis, &metadata);
    let kpis = execute_kpis(source, &kpi_plan);

    let chart_plan = generate_plan(generator, PlanKind::Charts, &metadata);
    let charts = execute_charts(source, &chart_plan, &metadata);

    let check_plan = generate_plan(generator, PlanKind::Checks, &metadata);
    let signals = collect_signals(source, &check_plan, &metadata);

    let quality = assess_quality(generator, &metadata, &signals);
    let tables = metadata.keys().cloned().collect::<Vec<_>>();
    let insights = narrate(generator, &tables, &kpis, &quality);

    let report = assemble_report(
        load_id,
        now_utc_timestamp(),
        StageOutputs {
            schema_analyzed: source.schema_name(),
            metadata,
            profile,
            relationships,
            kpis,
            charts,
            quality,
            insights: Some(insights),
        },
    );

    let document = report
        .to_document()
        .context("failed to encode report document")?;
    store
        .insert(&report.meta.load_id, &report.meta.generated_at, &document)
        .with_context(|| format!("failed to persist report {}", report.meta.load_id))?;

    tracing::info!(
        tables = report.summary.tables_count,
        kpis = report.summary.kpis_count,
        charts = report.summary.charts_count,
        "report persisted"
    );
    Ok(report)
}
