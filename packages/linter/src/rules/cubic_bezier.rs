use crate::rules::{number, Issue, LintRule};
use serde_json::Value;
use tokenweave_tokens::TokenType;

pub(crate) const TIMING_KEYWORDS: [&str; 5] = ["ease", "linear", "ease-in", "ease-out", "ease-in-out"];

/// `[x1, y1, x2, y2]` with both x in [0, 1], or a timing keyword
pub struct CubicBezierRule;

impl LintRule for CubicBezierRule {
    fn name(&self) -> &'static str {
        "valid-cubic-bezier"
    }

    fn description(&self) -> &'static str {
        "Cubic beziers must be four numbers with x1 and x2 between 0 and 1"
    }

    fn applies_to(&self, token_type: &TokenType) -> bool {
        *token_type == TokenType::CubicBezier
    }

    fn check_value(&self, _token_type: &TokenType, value: &Value) -> Vec<Issue> {
        check_cubic_bezier(value)
    }
}

pub(crate) fn check_cubic_bezier(value: &Value) -> Vec<Issue> {
    if let Some(keyword) = value.as_str() {
        return if TIMING_KEYWORDS.contains(&keyword) {
            Vec::new()
        } else {
            vec![Issue::error(format!("Unknown timing function '{}'", keyword))]
        };
    }

    let points: Option<Vec<f64>> = value
        .as_array()
        .filter(|items| items.len() == 4)
        .and_then(|items| items.iter().map(number).collect());

    match points {
        Some(p) if (0.0..=1.0).contains(&p[0]) && (0.0..=1.0).contains(&p[2]) => Vec::new(),
        Some(_) => vec![Issue::error("Cubic bezier x1 and x2 must be between 0 and 1")],
        None => vec![Issue::error("Cubic bezier must be an array of four numbers")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cubic_bezier() {
        assert!(check_cubic_bezier(&json!([0.4, 0, 0.2, 1])).is_empty());
        assert!(check_cubic_bezier(&json!([0.68, -0.55, 0.27, 1.55])).is_empty());
        assert!(check_cubic_bezier(&json!("ease-in-out")).is_empty());
        assert_eq!(check_cubic_bezier(&json!([1.5, 0, 0.2, 1])).len(), 1);
        assert_eq!(check_cubic_bezier(&json!([0.4, 0, 0.2])).len(), 1);
    }
}
