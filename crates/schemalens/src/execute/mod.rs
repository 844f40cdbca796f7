//! Plan executors: KPIs, charts (with repair and fallback) and data-quality
//! signals. Every item that errors is dropped; the stage itself never fails.

pub mod chart;
pub mod kpi;
pub mod quality;

pub use self::chart::{ChartSet, MAX_CHARTS, SAMPLE_ROW_LIMIT, execute_charts};
pub use self::kpi::{MAX_KPIS, execute_kpis};
pub use self::quality::collect_signals;
