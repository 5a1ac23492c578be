pub mod compare;
pub mod insights;
pub mod model;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use compare::{combine, compare, top_dropped, top_improved, Comparison, TOP_K};
pub use insights::{
    classify_drop, classify_improvement, describe_drop, describe_improvement, drop_insights,
    improvement_insights, InsightKind, PageInsight,
};
pub use model::{CombinedRow, DateRange, MetricRow, Period};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub site: String,
    pub generated_at: DateTime<Utc>,
    pub baseline: DateRange,
    pub current: DateRange,
    pub comparison: Comparison,
    pub improved_insights: Vec<PageInsight>,
    pub dropped_insights: Vec<PageInsight>,
}

impl WeeklyReport {
    pub fn build(
        site: impl Into<String>,
        baseline: DateRange,
        current: DateRange,
        baseline_rows: &[MetricRow],
        current_rows: &[MetricRow],
    ) -> Self {
        let comparison = compare(baseline_rows, current_rows);
        let improved_insights = improvement_insights(&comparison.top_improved);
        let dropped_insights = drop_insights(&comparison.top_dropped);
        Self {
            site: site.into(),
            generated_at: Utc::now(),
            baseline,
            current,
            comparison,
            improved_insights,
            dropped_insights,
        }
    }
}
