use anyhow::Result;

use crate::report::{CombinedRow, WeeklyReport};

pub fn ranked_to_csv(report: &WeeklyReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "set",
        "rank",
        "page",
        "click_change",
        "position_old",
        "position_new",
        "pos_change",
        "in_baseline",
        "in_current",
    ])?;
    write_ranked(&mut writer, "improved", &report.comparison.top_improved)?;
    write_ranked(&mut writer, "dropped", &report.comparison.top_dropped)?;
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

fn write_ranked(
    writer: &mut csv::Writer<Vec<u8>>,
    set: &str,
    rows: &[CombinedRow],
) -> Result<()> {
    for (idx, row) in rows.iter().enumerate() {
        writer.write_record([
            set.to_string(),
            (idx + 1).to_string(),
            row.page.clone(),
            row.click_change.to_string(),
            format!("{:.1}", row.position_old),
            format!("{:.1}", row.position_new),
            format!("{:.1}", row.pos_change),
            row.in_baseline.to_string(),
            row.in_current.to_string(),
        ])?;
    }
    Ok(())
}
