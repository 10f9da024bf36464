use crate::rules::dimension::check_dimension;
use crate::rules::{nested, Issue, LintRule};
use serde_json::Value;
use tokenweave_tokens::TokenType;

/// `{ min: dimension, max: dimension }`
pub struct FluidDimensionRule;

impl LintRule for FluidDimensionRule {
    fn name(&self) -> &'static str {
        "valid-fluid-dimension"
    }

    fn description(&self) -> &'static str {
        "Fluid dimensions need valid 'min' and 'max' dimensions"
    }

    fn applies_to(&self, token_type: &TokenType) -> bool {
        *token_type == TokenType::FluidDimension
    }

    fn check_value(&self, _token_type: &TokenType, value: &Value) -> Vec<Issue> {
        check_fluid_dimension(value)
    }
}

pub(crate) fn check_fluid_dimension(value: &Value) -> Vec<Issue> {
    let Some(map) = value.as_object() else {
        return vec![Issue::error("Fluid dimension must be an object with 'min' and 'max'")];
    };

    let mut issues = Vec::new();
    for bound in ["min", "max"] {
        match map.get(bound) {
            Some(dimension) => issues.extend(nested(check_dimension(dimension), bound)),
            None => issues.push(Issue::error(format!("Fluid dimension is missing '{}'", bound)).at(bound)),
        }
    }
    issues
}

/// A value usable where a size is expected: a dimension or a fluid dimension
pub(crate) fn check_size(value: &Value) -> Vec<Issue> {
    let is_fluid = value
        .as_object()
        .is_some_and(|map| map.contains_key("min") || map.contains_key("max"));
    if is_fluid {
        check_fluid_dimension(value)
    } else {
        check_dimension(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fluid_bounds() {
        let ok = json!({
            "min": { "value": 16, "unit": "px" },
            "max": { "value": 2, "unit": "rem" }
        });
        assert!(check_fluid_dimension(&ok).is_empty());

        let issues = check_fluid_dimension(&json!({ "min": { "value": 16, "unit": "pt" } }));
        let properties: Vec<_> = issues.iter().filter_map(|i| i.property.as_deref()).collect();
        assert_eq!(properties, vec!["min.unit", "max"]);
    }
}
