use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchAnalyticsQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub dimensions: Vec<String>,
    pub row_limit: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(default)]
    pub rows: Vec<ApiRow>,
    #[serde(default)]
    pub response_aggregation_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiRow {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub clicks: Option<f64>,
    #[serde(default)]
    pub impressions: Option<f64>,
    #[serde(default)]
    pub ctr: Option<f64>,
    #[serde(default)]
    pub position: Option<f64>,
}
