use crate::classify::{first_dimension, first_metric, first_temporal_dimension};
use crate::error::SourceError;
use crate::inspect::lookup_table;
use crate::models::{Chart, ColumnInfo, DataRow, DataValue, Metadata};
use crate::plan::{ChartDraft, ChartSpec, Plan};
use crate::source::DataSource;
use crate::utils::sql::quote_identifier;

pub const MAX_CHARTS: usize = 4;
pub const SAMPLE_ROW_LIMIT: usize = 20;
pub const VALUE_AXIS: &str = "VALUE";

/// Bounded chart accumulator that stops accepting at its target.
#[derive(Debug, Clone)]
pub struct ChartSet {
    charts: Vec<Chart>,
    target: usize,
}

impl ChartSet {
    #[must_use]
    pub fn new(target: usize) -> Self {
        Self {
            charts: Vec::with_capacity(target),
            target,
        }
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.charts.len() >= self.target
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.charts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    /// Returns `false` when the set is already full.
    pub fn push(&mut self, chart: Chart) -> bool {
        if self.is_full() {
            return false;
        }
        self.charts.push(chart);
        true
    }

    #[must_use]
    pub fn into_charts(self) -> Vec<Chart> {
        self.charts
    }
}

/// Generated charts first, then the fallback pass fills up to [`MAX_CHARTS`].
pub fn execute_charts(source: &dyn DataSource, plan: &Plan, metadata: &Metadata) -> Vec<Chart> {
    let mut charts = ChartSet::new(MAX_CHARTS);
    plan_pass(source, plan, metadata, &mut charts);
    let from_plan = charts.len();
    fallback_pass(source, metadata, &mut charts);

    tracing::info!(
        charts = charts.len(),
        from_plan,
        from_fallback = charts.len() - from_plan,
        "charts executed"
    );
    charts.into_charts()
}

/// First [`MAX_CHARTS`] plan entries. An incomplete, unsafe or failing entry
/// is replaced by its metadata-derived repair when one exists.
pub fn plan_pass(source: &dyn DataSource, plan: &Plan, metadata: &Metadata, charts: &mut ChartSet) {
    for (index, entry) in plan.entries.iter().take(MAX_CHARTS).enumerate() {
        if charts.is_full() {
            return;
        }

        let draft = ChartDraft::from_entry(entry);
        let attempt = match draft.validate() {
            Ok(spec) => fetch_chart(source, spec).map_err(|error| error.to_string()),
            Err(rejection) => Err(rejection.to_string()),
        };

        let chart = match attempt {
            Ok(chart) => chart,
            Err(reason) => {
                tracing::debug!(index, %reason, "chart entry needs repair");
                let Some(spec) = repair_chart(&draft, metadata) else {
                    tracing::debug!(index, "chart entry has no repair; dropped");
                    continue;
                };
                match fetch_chart(source, spec) {
                    Ok(chart) => chart,
                    Err(error) => {
                        tracing::debug!(index, %error, "repaired chart failed; dropped");
                        continue;
                    }
                }
            }
        };
        charts.push(chart);
    }
}

/// Walks metadata tables in order and adds a date-dimension trend chart for
/// each table with a date-like column and a numeric column.
pub fn fallback_pass(source: &dyn DataSource, metadata: &Metadata, charts: &mut ChartSet) {
    for (table, columns) in metadata {
        if charts.is_full() {
            return;
        }

        let (Some(dimension), Some(metric)) =
            (first_temporal_dimension(columns), first_metric(columns))
        else {
            continue;
        };

        let spec = ChartSpec {
            name: format!("{table} Trend"),
            description: format!("{} aggregated by {}", metric.column, dimension.column),
            chart_type: "line".to_string(),
            x_axis: dimension.column.clone(),
            y_axis: VALUE_AXIS.to_string(),
            sql: aggregate_sql(table, dimension, metric),
        };
        match fetch_chart(source, spec) {
            Ok(chart) => {
                charts.push(chart);
            }
            Err(error) => tracing::debug!(table = %table, %error, "fallback chart failed"),
        }
    }
}

/// Safe replacement for a chart entry: the entry's table when known, else the
/// first table; first dimension-like column grouped against the first
/// metric-like column. Supplied name, description and chart type are kept.
#[must_use]
pub fn repair_chart(draft: &ChartDraft, metadata: &Metadata) -> Option<ChartSpec> {
    let (table, columns) = draft
        .table
        .as_deref()
        .and_then(|table| lookup_table(metadata, table))
        .or_else(|| metadata.iter().next())?;

    let dimension = first_dimension(columns)?;
    let metric = first_metric(columns)?;

    Some(ChartSpec {
        name: draft
            .name
            .clone()
            .unwrap_or_else(|| format!("{table} Chart")),
        description: draft
            .description
            .clone()
            .unwrap_or_else(|| format!("Auto-generated chart for {table}")),
        chart_type: draft.chart_type.clone().unwrap_or_else(|| "bar".to_string()),
        x_axis: dimension.column.clone(),
        y_axis: VALUE_AXIS.to_string(),
        sql: aggregate_sql(table, dimension, metric),
    })
}

fn aggregate_sql(table: &str, dimension: &ColumnInfo, metric: &ColumnInfo) -> String {
    let dimension = quote_identifier(&dimension.column);
    format!(
        "SELECT {dimension}, SUM({metric}) AS {VALUE_AXIS} FROM {table} GROUP BY {dimension} ORDER BY {dimension}",
        metric = quote_identifier(&metric.column),
        table = quote_identifier(table),
    )
}

fn fetch_chart(source: &dyn DataSource, spec: ChartSpec) -> Result<Chart, SourceError> {
    let rows = source.query_rows(&spec.sql, Some(SAMPLE_ROW_LIMIT))?;
    let sample_data = rows.rows.iter().map(sample_row).collect();

    Ok(Chart {
        name: spec.name,
        description: spec.description,
        chart_type: spec.chart_type,
        x_axis: spec.x_axis,
        y_axis: spec.y_axis,
        sql: spec.sql,
        sample_data,
    })
}

/// Nulls become integer zero; everything else is JSON-normalized.
fn sample_row(row: &DataRow) -> DataRow {
    row.map_values(|value| {
        if value.is_null() {
            DataValue::Integer(0)
        } else {
            value.normalized()
        }
    })
}
