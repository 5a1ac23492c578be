use anyhow::Result;
use serde::Serialize;

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use crate::output::json::render_json;
    use crate::report::model::MetricRow;

    #[test]
    fn renders_pretty_json() {
        let rendered = render_json(&[MetricRow::new("/a", 3, 1.5)]).expect("json");
        assert!(rendered.contains("\"avg_position\": 1.5"));
    }
}
