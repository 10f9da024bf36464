use super::{format_number, scalar_text};
use serde_json::Value;

/// `{value, unit}` as CSS text (`16px`, `1.5rem`)
pub fn format_dimension(value: &Value) -> Option<String> {
    let amount = value.get("value")?.as_f64()?;
    let unit = value.get("unit")?.as_str()?;
    Some(format!("{}{}", format_number(amount), unit))
}

/// Dimension objects become `<value><unit>`; strings (keywords, references) pass through
pub fn convert_dimension(raw: &Value) -> String {
    format_dimension(raw).unwrap_or_else(|| scalar_text(raw))
}

pub fn convert_duration(raw: &Value) -> String {
    convert_dimension(raw)
}

pub fn convert_number(raw: &Value) -> String {
    scalar_text(raw)
}

/// `[x1, y1, x2, y2]` → `cubic-bezier(x1, y1, x2, y2)`; timing keywords pass through
pub fn convert_cubic_bezier(raw: &Value) -> String {
    match raw {
        Value::Array(points) => {
            let points: Vec<String> = points.iter().map(scalar_text).collect();
            format!("cubic-bezier({})", points.join(", "))
        }
        other => scalar_text(other),
    }
}
