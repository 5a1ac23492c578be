use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::report::{CombinedRow, PageInsight, WeeklyReport};

pub fn render_ranked_table(rows: &[CombinedRow]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Page",
        "Click Change",
        "Position (old)",
        "Position (new)",
        "Avg Pos Change",
    ]);

    for r in rows {
        table.add_row(Row::from(vec![
            Cell::new(&r.page),
            click_cell(r.click_change),
            Cell::new(format!("{:.1}", r.position_old)),
            Cell::new(format!("{:.1}", r.position_new)),
            Cell::new(format!("{:+.1}", r.pos_change)),
        ]));
    }
    table.to_string()
}

pub fn render_combined_table(rows: &[CombinedRow]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Page",
        "Clicks (old)",
        "Clicks (new)",
        "Position (old)",
        "Position (new)",
        "Click Change",
        "Avg Pos Change",
    ]);
    for r in rows {
        table.add_row(vec![
            r.page.clone(),
            presence_label(r.clicks_old, r.in_baseline),
            presence_label(r.clicks_new, r.in_current),
            format!("{:.1}", r.position_old),
            format!("{:.1}", r.position_new),
            format!("{:+}", r.click_change),
            format!("{:+.1}", r.pos_change),
        ]);
    }
    table.to_string()
}

pub fn render_insights(insights: &[PageInsight]) -> String {
    if insights.is_empty() {
        return "- No pages to report.".to_string();
    }
    insights
        .iter()
        .map(|insight| format!("- {}", insight.text))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_report(report: &WeeklyReport, show_combined: bool) -> String {
    let mut out = format!(
        "Top pages report for {}\nPrevious week: {}\nCurrent week: {}\n",
        report.site, report.baseline, report.current
    );
    if show_combined {
        out.push_str("\nMerged data\n");
        out.push_str(&render_combined_table(&report.comparison.combined));
        out.push('\n');
    }
    out.push_str("\nTop pages with click improvement\n");
    out.push_str(&render_ranked_table(&report.comparison.top_improved));
    out.push_str("\n\nTop pages with click drop\n");
    out.push_str(&render_ranked_table(&report.comparison.top_dropped));
    out.push_str("\n\nInsights for improved pages\n");
    out.push_str(&render_insights(&report.improved_insights));
    out.push_str("\n\nInsights for dropped pages\n");
    out.push_str(&render_insights(&report.dropped_insights));
    out
}

fn click_cell(change: i64) -> Cell {
    let cell = Cell::new(format!("{change:+}"));
    match change {
        c if c > 0 => cell.fg(Color::Green),
        c if c < 0 => cell.fg(Color::Red),
        _ => cell,
    }
}

fn presence_label(clicks: u64, present: bool) -> String {
    if present {
        clicks.to_string()
    } else {
        "-".to_string()
    }
}
