use thiserror::Error;

use crate::report::model::Period;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("fetching {period} data failed: {message}")]
    Fetch { period: Period, message: String },
    #[error("no data available for the specified dates and site")]
    NoData,
    #[error("{period} start date {start} must be earlier than end date {end}")]
    InvalidRange {
        period: Period,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}

impl ReportError {
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::NoData)
    }
}
