use serde::{Deserialize, Serialize};

use crate::report::model::CombinedRow;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    NewlyRanking,
    PositionImproved,
    PositionDeclined,
    Fluctuation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageInsight {
    pub page: String,
    pub kind: InsightKind,
    pub text: String,
}

pub fn classify_improvement(row: &CombinedRow) -> InsightKind {
    if row.clicks_old == 0 && row.click_change > 0 {
        InsightKind::NewlyRanking
    } else if row.click_change > 0 && row.pos_change < 0.0 {
        InsightKind::PositionImproved
    } else {
        InsightKind::Fluctuation
    }
}

pub fn classify_drop(row: &CombinedRow) -> InsightKind {
    if row.click_change < 0 && row.pos_change > 0.0 {
        InsightKind::PositionDeclined
    } else {
        InsightKind::Fluctuation
    }
}

pub fn describe_improvement(row: &CombinedRow) -> String {
    render(row, classify_improvement(row))
}

pub fn describe_drop(row: &CombinedRow) -> String {
    render(row, classify_drop(row))
}

pub fn improvement_insights(rows: &[CombinedRow]) -> Vec<PageInsight> {
    rows.iter()
        .map(|row| insight(row, classify_improvement(row)))
        .collect()
}

pub fn drop_insights(rows: &[CombinedRow]) -> Vec<PageInsight> {
    rows.iter()
        .map(|row| insight(row, classify_drop(row)))
        .collect()
}

fn insight(row: &CombinedRow, kind: InsightKind) -> PageInsight {
    PageInsight {
        page: row.page.clone(),
        kind,
        text: render(row, kind),
    }
}

fn render(row: &CombinedRow, kind: InsightKind) -> String {
    let page = &row.page;
    let change = row.click_change;
    match kind {
        InsightKind::NewlyRanking => format!(
            "{page} ({change:+}) started ranking on SERP with avg position {:.1}.",
            row.position_new
        ),
        InsightKind::PositionImproved => format!(
            "{page} ({change:+}) avg position improved from {:.1} to {:.1}.",
            row.position_old, row.position_new
        ),
        InsightKind::PositionDeclined => format!(
            "{page} ({change:+}) avg position decreased from {:.1} to {:.1}.",
            row.position_old, row.position_new
        ),
        InsightKind::Fluctuation => format!("{page} ({change:+}) general fluctuation observed."),
    }
}

#[cfg(test)]
mod tests {
    use crate::report::insights::{
        classify_drop, classify_improvement, describe_drop, describe_improvement,
        drop_insights, InsightKind,
    };
    use crate::report::model::{CombinedRow, MetricRow};

    fn joined(old: Option<(u64, f64)>, new: Option<(u64, f64)>) -> CombinedRow {
        let old = old.map(|(c, p)| MetricRow::new("/blog/post", c, p));
        let new = new.map(|(c, p)| MetricRow::new("/blog/post", c, p));
        CombinedRow::join("/blog/post", old.as_ref(), new.as_ref())
    }

    #[test]
    fn newly_ranking_page_reports_current_position() {
        let row = joined(None, Some((5, 8.0)));
        assert_eq!(classify_improvement(&row), InsightKind::NewlyRanking);
        assert_eq!(
            describe_improvement(&row),
            "/blog/post (+5) started ranking on SERP with avg position 8.0."
        );
    }

    #[test]
    fn zero_click_baseline_counts_as_newly_ranking() {
        let row = joined(Some((0, 42.0)), Some((3, 12.26)));
        assert_eq!(classify_improvement(&row), InsightKind::NewlyRanking);
        assert!(describe_improvement(&row).ends_with("avg position 12.3."));
    }

    #[test]
    fn gain_with_better_rank_reports_both_positions() {
        let row = joined(Some((10, 5.0)), Some((20, 3.0)));
        assert_eq!(classify_improvement(&row), InsightKind::PositionImproved);
        assert_eq!(
            describe_improvement(&row),
            "/blog/post (+10) avg position improved from 5.0 to 3.0."
        );
    }

    #[test]
    fn gain_with_worse_rank_is_fluctuation() {
        let row = joined(Some((10, 3.0)), Some((12, 4.0)));
        assert_eq!(
            describe_improvement(&row),
            "/blog/post (+2) general fluctuation observed."
        );
    }

    #[test]
    fn non_positive_change_in_improved_set_is_fluctuation() {
        let row = joined(Some((7, 3.0)), Some((7, 2.0)));
        assert_eq!(
            describe_improvement(&row),
            "/blog/post (+0) general fluctuation observed."
        );
    }

    #[test]
    fn loss_with_worse_rank_reports_both_positions() {
        let row = joined(Some((30, 2.04)), Some((11, 6.56)));
        assert_eq!(classify_drop(&row), InsightKind::PositionDeclined);
        assert_eq!(
            describe_drop(&row),
            "/blog/post (-19) avg position decreased from 2.0 to 6.6."
        );
    }

    #[test]
    fn page_missing_from_current_is_fluctuation() {
        let row = joined(Some((9, 4.0)), None);
        assert_eq!(classify_drop(&row), InsightKind::Fluctuation);
        assert_eq!(
            describe_drop(&row),
            "/blog/post (-9) general fluctuation observed."
        );
    }

    #[test]
    fn insights_preserve_row_order() {
        let rows = vec![
            CombinedRow::join("/x", Some(&MetricRow::new("/x", 10, 1.0)), None),
            CombinedRow::join(
                "/y",
                Some(&MetricRow::new("/y", 10, 1.0)),
                Some(&MetricRow::new("/y", 2, 3.0)),
            ),
        ];
        let insights = drop_insights(&rows);
        let pages: Vec<&str> = insights.iter().map(|i| i.page.as_str()).collect();
        assert_eq!(pages, vec!["/x", "/y"]);
        assert_eq!(insights[1].kind, InsightKind::PositionDeclined);
    }
}
