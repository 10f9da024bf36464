use super::scalar_text;
use serde_json::Value;

/// Keywords pass through; object strokes (`{dashArray, lineCap}`) have no
/// `border-style` equivalent and render as `dashed`
pub fn convert(raw: &Value) -> String {
    match raw {
        Value::Object(_) => "dashed".to_string(),
        other => scalar_text(other),
    }
}
