use crate::rules::{number, Issue, LintRule};
use serde_json::Value;
use tokenweave_tokens::TokenType;

/// `{ value: number >= 0, unit: "ms" | "s" }`
pub struct DurationRule;

impl LintRule for DurationRule {
    fn name(&self) -> &'static str {
        "valid-duration"
    }

    fn description(&self) -> &'static str {
        "Durations must be non-negative { value, unit } objects in ms or s"
    }

    fn applies_to(&self, token_type: &TokenType) -> bool {
        *token_type == TokenType::Duration
    }

    fn check_value(&self, _token_type: &TokenType, value: &Value) -> Vec<Issue> {
        check_duration(value)
    }
}

pub(crate) fn check_duration(value: &Value) -> Vec<Issue> {
    let Some(map) = value.as_object() else {
        return vec![Issue::error("Duration must be an object with 'value' and 'unit'")
            .with_suggestion("Write { \"value\": 200, \"unit\": \"ms\" }")];
    };

    let mut issues = Vec::new();
    match map.get("value").and_then(number) {
        Some(v) if v >= 0.0 => {}
        Some(_) => issues.push(Issue::error("Duration must not be negative").at("value")),
        None => issues.push(Issue::error("Duration 'value' must be a number").at("value")),
    }
    match map.get("unit").and_then(Value::as_str) {
        Some("ms" | "s") => {}
        _ => issues.push(
            Issue::error("Duration 'unit' must be 'ms' or 's'")
                .at("unit"),
        ),
    }
    issues
}
