use crate::rules::{number, Issue, LintRule};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use tokenweave_tokens::TokenType;

/// `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`
pub fn is_hex_color(value: &str) -> bool {
    static HEX: OnceLock<Option<Regex>> = OnceLock::new();
    HEX.get_or_init(|| {
        Regex::new(r"^#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").ok()
    })
    .as_ref()
    .is_some_and(|re| re.is_match(value))
}

/// Hex syntax, structured color shape and component ranges
pub struct ColorRule;

impl LintRule for ColorRule {
    fn name(&self) -> &'static str {
        "valid-color"
    }

    fn description(&self) -> &'static str {
        "Colors must be hex strings or color objects with in-range components"
    }

    fn applies_to(&self, token_type: &TokenType) -> bool {
        *token_type == TokenType::Color
    }

    fn check_value(&self, _token_type: &TokenType, value: &Value) -> Vec<Issue> {
        check_color(value)
    }
}

pub(crate) fn check_color(value: &Value) -> Vec<Issue> {
    match value {
        Value::String(text) if text.starts_with('#') => {
            if is_hex_color(text) {
                Vec::new()
            } else {
                vec![Issue::error(format!("'{}' is not a valid hex color", text))
                    .with_suggestion("Use #rgb, #rgba, #rrggbb or #rrggbbaa")]
            }
        }
        Value::String(text) => vec![Issue::warning(format!(
            "'{}' is not a hex color or color object and is passed through as-is",
            text
        ))],
        Value::Object(map) => check_color_object(map),
        _ => vec![Issue::error("Color must be a hex string or a color object")],
    }
}

fn check_color_object(map: &Map<String, Value>) -> Vec<Issue> {
    let mut issues = Vec::new();

    let Some(space) = map.get("colorSpace").and_then(Value::as_str) else {
        return vec![Issue::error("Color object needs a 'colorSpace' string").at("colorSpace")];
    };

    match map.get("components").and_then(Value::as_array) {
        Some(components) if components.len() == 3 => {
            let values: Option<Vec<f64>> = components.iter().map(number).collect();
            match values {
                Some(values) => {
                    if let Some(message) = component_range_error(space, &values) {
                        issues.push(Issue::error(message).at("components"));
                    }
                }
                None => issues.push(Issue::error("Color components must be numbers").at("components")),
            }
        }
        _ => issues.push(Issue::error("Color needs exactly three 'components'").at("components")),
    }

    if let Some(alpha) = map.get("alpha") {
        match number(alpha) {
            Some(a) if (0.0..=1.0).contains(&a) => {}
            _ => issues.push(Issue::error("Alpha must be a number between 0 and 1").at("alpha")),
        }
    }

    if let Some(hex) = map.get("hex") {
        let valid = hex.as_str().is_some_and(is_hex_color);
        if !valid {
            issues.push(Issue::error("Fallback 'hex' must be a hex color string").at("hex"));
        }
    }

    issues
}

fn component_range_error(space: &str, c: &[f64]) -> Option<String> {
    let unit = |v: f64| (0.0..=1.0).contains(&v);
    let hue = |v: f64| (0.0..360.0).contains(&v);
    let percent = |v: f64| (0.0..=100.0).contains(&v);

    match space {
        "srgb" | "display-p3" => (!c.iter().all(|v| unit(*v)))
            .then(|| format!("{} components must be between 0 and 1", space)),
        "oklch" => {
            if !unit(c[0]) {
                Some("oklch lightness must be between 0 and 1".to_string())
            } else if c[1] < 0.0 {
                Some("oklch chroma must not be negative".to_string())
            } else if !hue(c[2]) {
                Some("oklch hue must be in [0, 360)".to_string())
            } else {
                None
            }
        }
        "hsl" => {
            if !hue(c[0]) {
                Some("hsl hue must be in [0, 360)".to_string())
            } else if !percent(c[1]) || !percent(c[2]) {
                Some("hsl saturation and lightness must be between 0 and 100".to_string())
            } else {
                None
            }
        }
        // Unsupported spaces fail at conversion
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticLevel;
    use serde_json::json;

    #[test]
    fn test_hex_syntax() {
        assert!(is_hex_color("#fff"));
        assert!(is_hex_color("#FF00FF80"));
        assert!(!is_hex_color("#ff00f"));
        assert!(!is_hex_color("ff00ff"));

        let issues = check_color(&json!("#zzzzzz"));
        assert_eq!(issues[0].level, DiagnosticLevel::Error);
    }

    #[test]
    fn test_named_colors_only_warn() {
        let issues = check_color(&json!("rebeccapurple"));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].level, DiagnosticLevel::Warning);
    }

    #[test]
    fn test_component_ranges() {
        let ok = json!({ "colorSpace": "oklch", "components": [0.7016, 0.3225, 328.363], "alpha": 0.8 });
        assert!(check_color(&ok).is_empty());

        let bad_hue = json!({ "colorSpace": "hsl", "components": [360, 50, 50] });
        assert_eq!(check_color(&bad_hue)[0].property.as_deref(), Some("components"));

        let bad_srgb = json!({ "colorSpace": "srgb", "components": [1.2, 0, 0] });
        assert_eq!(check_color(&bad_srgb).len(), 1);
    }

    #[test]
    fn test_alpha_and_hex_fallback() {
        let value = json!({
            "colorSpace": "display-p3",
            "components": [1, 0, 1],
            "alpha": 2,
            "hex": "magenta"
        });
        let properties: Vec<_> = check_color(&value)
            .into_iter()
            .filter_map(|issue| issue.property)
            .collect();
        assert_eq!(properties, vec!["alpha", "hex"]);
    }
}
