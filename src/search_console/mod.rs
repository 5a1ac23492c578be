pub mod client;
pub mod types;

use std::collections::BTreeSet;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::ReportError;
use crate::report::model::{DateRange, MetricRow, Period};
pub use crate::search_console::client::SearchConsoleClient;
use crate::search_console::types::{ApiRow, QueryResponse, SearchAnalyticsQuery};

pub const DEFAULT_DIMENSION: &str = "page";
pub const ROW_LIMIT: u32 = 1000;

#[async_trait]
pub trait SearchAnalytics: Send + Sync {
    async fn query(&self, site: &str, request: &SearchAnalyticsQuery) -> Result<QueryResponse>;
}

/// Rows from one fetch. A failed fetch carries its error and no rows.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub rows: Vec<MetricRow>,
    pub error: Option<String>,
}

impl FetchOutcome {
    pub fn into_rows(self, period: Period) -> Result<Vec<MetricRow>, ReportError> {
        match self.error {
            Some(message) => Err(ReportError::Fetch { period, message }),
            None => Ok(self.rows),
        }
    }
}

pub fn build_query(range: &DateRange, dimension: &str) -> SearchAnalyticsQuery {
    SearchAnalyticsQuery {
        start_date: range.start,
        end_date: range.end,
        dimensions: vec![dimension.to_string()],
        row_limit: ROW_LIMIT,
    }
}

pub async fn fetch_metrics(
    client: &dyn SearchAnalytics,
    range: &DateRange,
    site: &str,
    dimension: &str,
) -> FetchOutcome {
    let request = build_query(range, dimension);
    match client.query(site, &request).await {
        Ok(response) => {
            let rows = metric_rows(response.rows);
            info!("fetched {} rows for {site} ({range})", rows.len());
            FetchOutcome { rows, error: None }
        }
        Err(err) => {
            warn!("error fetching data for {site} ({range}): {err:#}");
            FetchOutcome {
                rows: Vec::new(),
                error: Some(format!("{err:#}")),
            }
        }
    }
}

pub fn metric_rows(api_rows: Vec<ApiRow>) -> Vec<MetricRow> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(api_rows.len());
    for row in api_rows {
        let Some(page) = row.keys.into_iter().next() else {
            debug!("skipping response row without keys");
            continue;
        };
        if !seen.insert(page.clone()) {
            continue;
        }
        out.push(MetricRow {
            page,
            clicks: row.clicks.unwrap_or(0.0).max(0.0).round() as u64,
            avg_position: row.position.unwrap_or(0.0).max(0.0),
        });
    }
    out
}
