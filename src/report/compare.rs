use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::report::model::{CombinedRow, MetricRow};

pub const TOP_K: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comparison {
    pub combined: Vec<CombinedRow>,
    pub top_improved: Vec<CombinedRow>,
    pub top_dropped: Vec<CombinedRow>,
}

pub fn compare(baseline: &[MetricRow], current: &[MetricRow]) -> Comparison {
    let combined = combine(baseline, current);
    for row in &combined {
        debug!(
            page = %row.page,
            clicks_old = row.clicks_old,
            clicks_new = row.clicks_new,
            position_old = row.position_old,
            position_new = row.position_new,
            "combined row"
        );
    }
    let top_improved = top_improved(&combined, TOP_K);
    let top_dropped = top_dropped(&combined, TOP_K);
    Comparison {
        combined,
        top_improved,
        top_dropped,
    }
}

pub fn combine(baseline: &[MetricRow], current: &[MetricRow]) -> Vec<CombinedRow> {
    let old_map = index_by_page(baseline);
    let new_map = index_by_page(current);

    let mut pages = BTreeSet::new();
    pages.extend(old_map.keys().copied());
    pages.extend(new_map.keys().copied());

    pages
        .into_iter()
        .map(|page| {
            CombinedRow::join(
                page,
                old_map.get(page).copied(),
                new_map.get(page).copied(),
            )
        })
        .collect()
}

/// Largest click gains first. Equal changes keep combined-table order.
pub fn top_improved(combined: &[CombinedRow], k: usize) -> Vec<CombinedRow> {
    let mut ranked = combined.to_vec();
    ranked.sort_by(|a, b| b.click_change.cmp(&a.click_change));
    ranked.truncate(k);
    ranked
}

pub fn top_dropped(combined: &[CombinedRow], k: usize) -> Vec<CombinedRow> {
    let mut ranked = combined.to_vec();
    ranked.sort_by(|a, b| a.click_change.cmp(&b.click_change));
    ranked.truncate(k);
    ranked
}

fn index_by_page(rows: &[MetricRow]) -> BTreeMap<&str, &MetricRow> {
    let mut map = BTreeMap::new();
    for row in rows {
        map.entry(row.page.as_str()).or_insert(row);
    }
    map
}
