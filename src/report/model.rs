use std::fmt::{Display, Formatter};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Baseline,
    Current,
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Baseline => "previous week",
            Self::Current => "current week",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Seven days ending on `end`, inclusive. `None` past the calendar's lower bound.
    pub fn week_ending(end: NaiveDate) -> Option<Self> {
        let start = end.checked_sub_signed(Duration::days(6))?;
        Some(Self { start, end })
    }

    pub fn preceding_week(&self) -> Option<Self> {
        Self::week_ending(self.start.checked_sub_signed(Duration::days(1))?)
    }

    pub fn validate(&self, period: Period) -> Result<(), ReportError> {
        if self.start >= self.end {
            return Err(ReportError::InvalidRange {
                period,
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricRow {
    pub page: String,
    pub clicks: u64,
    pub avg_position: f64,
}

impl MetricRow {
    pub fn new(page: impl Into<String>, clicks: u64, avg_position: f64) -> Self {
        Self {
            page: page.into(),
            clicks,
            avg_position,
        }
    }
}

/// One page after the outer join. Fields missing on a side are zero; the
/// presence flags record which side actually reported the page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CombinedRow {
    pub page: String,
    pub clicks_old: u64,
    pub clicks_new: u64,
    pub position_old: f64,
    pub position_new: f64,
    pub click_change: i64,
    pub pos_change: f64,
    pub in_baseline: bool,
    pub in_current: bool,
}

impl CombinedRow {
    pub fn join(page: &str, old: Option<&MetricRow>, new: Option<&MetricRow>) -> Self {
        let clicks_old = old.map(|r| r.clicks).unwrap_or(0);
        let clicks_new = new.map(|r| r.clicks).unwrap_or(0);
        let position_old = old.map(|r| r.avg_position).unwrap_or(0.0);
        let position_new = new.map(|r| r.avg_position).unwrap_or(0.0);
        Self {
            page: page.to_string(),
            clicks_old,
            clicks_new,
            position_old,
            position_new,
            click_change: clicks_new as i64 - clicks_old as i64,
            pos_change: position_new - position_old,
            in_baseline: old.is_some(),
            in_current: new.is_some(),
        }
    }
}
