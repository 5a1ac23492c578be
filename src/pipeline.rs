use tracing::info;

use crate::error::ReportError;
use crate::report::model::{DateRange, Period};
use crate::report::WeeklyReport;
use crate::search_console::{fetch_metrics, SearchAnalytics};

#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub site: String,
    pub baseline: DateRange,
    pub current: DateRange,
    pub dimension: String,
}

impl ReportRequest {
    pub fn validate(&self) -> Result<(), ReportError> {
        self.baseline.validate(Period::Baseline)?;
        self.current.validate(Period::Current)
    }
}

/// One fetch-and-compare cycle. Any failure ends the cycle without a
/// partial comparison.
pub async fn run_report(
    client: &dyn SearchAnalytics,
    request: &ReportRequest,
) -> Result<WeeklyReport, ReportError> {
    request.validate()?;
    info!(
        "comparing {} against {} for {}",
        request.current, request.baseline, request.site
    );

    let (baseline, current) = tokio::join!(
        fetch_metrics(client, &request.baseline, &request.site, &request.dimension),
        fetch_metrics(client, &request.current, &request.site, &request.dimension),
    );
    let baseline_rows = baseline.into_rows(Period::Baseline)?;
    let current_rows = current.into_rows(Period::Current)?;

    if baseline_rows.is_empty() && current_rows.is_empty() {
        return Err(ReportError::NoData);
    }

    Ok(WeeklyReport::build(
        request.site.clone(),
        request.baseline,
        request.current,
        &baseline_rows,
        &current_rows,
    ))
}
