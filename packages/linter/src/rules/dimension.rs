use crate::rules::{number, Issue, LintRule};
use serde_json::Value;
use tokenweave_tokens::TokenType;

pub(crate) const DIMENSION_UNITS: [&str; 2] = ["px", "rem"];

/// `{ value: number, unit: "px" | "rem" }`
pub struct DimensionRule;

impl LintRule for DimensionRule {
    fn name(&self) -> &'static str {
        "valid-dimension"
    }

    fn description(&self) -> &'static str {
        "Dimensions must be { value, unit } objects with a px or rem unit"
    }

    fn applies_to(&self, token_type: &TokenType) -> bool {
        *token_type == TokenType::Dimension
    }

    fn check_value(&self, _token_type: &TokenType, value: &Value) -> Vec<Issue> {
        check_dimension(value)
    }
}

pub(crate) fn check_dimension(value: &Value) -> Vec<Issue> {
    let Some(map) = value.as_object() else {
        return vec![Issue::error("Dimension must be an object with 'value' and 'unit'")
            .with_suggestion("Write { \"value\": 16, \"unit\": \"px\" }")];
    };

    let mut issues = Vec::new();
    if map.get("value").and_then(number).is_none() {
        issues.push(Issue::error("Dimension 'value' must be a number").at("value"));
    }
    match map.get("unit").and_then(Value::as_str) {
        Some(unit) if DIMENSION_UNITS.contains(&unit) => {}
        Some(unit) => issues.push(
            Issue::error(format!("Unsupported dimension unit '{}'", unit))
                .at("unit")
                .with_suggestion("Use px or rem"),
        ),
        None => issues.push(Issue::error("Dimension 'unit' must be a string").at("unit")),
    }
    issues
}
