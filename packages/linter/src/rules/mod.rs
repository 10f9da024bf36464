mod color;
mod composite;
mod cubic_bezier;
mod dimension;
mod duration;
mod fluid;
mod font_weight;

pub use color::{is_hex_color, ColorRule};
pub use composite::CompositeRule;
pub use cubic_bezier::CubicBezierRule;
pub use dimension::DimensionRule;
pub use duration::DurationRule;
pub use fluid::FluidDimensionRule;
pub use font_weight::FontWeightRule;

use crate::diagnostic::{Diagnostic, DiagnosticLevel};
use serde_json::Value;
use tokenweave_evaluator::ResolvedToken;
use tokenweave_tokens::TokenType;

/// A problem found in a value, before it is tied to a token
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub level: DiagnosticLevel,
    /// Dot path of the offending property inside the value, if any
    pub property: Option<String>,
    pub message: String,
    pub suggestion: Option<String>,
}

impl Issue {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            property: None,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            ..Self::error(message)
        }
    }

    /// Nest the issue under `property` (`components` under `color` is `color.components`)
    pub fn at(mut self, property: &str) -> Self {
        self.property = Some(match self.property {
            Some(inner) => format!("{}.{}", property, inner),
            None => property.to_string(),
        });
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn into_diagnostic(self, rule: &str, token: &ResolvedToken) -> Diagnostic {
        let mut diagnostic = Diagnostic::for_token(self.level, rule, self.message, token);
        if let Some(property) = &self.property {
            diagnostic = diagnostic.at_property(property);
        }
        diagnostic.suggestion = self.suggestion;
        diagnostic
    }
}

/// Nest every issue under `property`
pub(crate) fn nested(issues: Vec<Issue>, property: &str) -> Vec<Issue> {
    issues.into_iter().map(|issue| issue.at(property)).collect()
}

/// Trait for implementing lint rules
pub trait LintRule: Send + Sync {
    /// Unique identifier for this rule
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Whether tokens of this type are checked
    fn applies_to(&self, token_type: &TokenType) -> bool;

    /// Check a resolved value of `token_type`
    fn check_value(&self, token_type: &TokenType, value: &Value) -> Vec<Issue>;

    /// Check a token whose type this rule applies to
    fn check_token(&self, token: &ResolvedToken) -> Vec<Diagnostic> {
        let Some(token_type) = token.token_type() else {
            return Vec::new();
        };
        self.check_value(token_type, &token.resolved_value)
            .into_iter()
            .map(|issue| issue.into_diagnostic(self.name(), token))
            .collect()
    }
}

/// Registry of all available lint rules
pub struct RuleRegistry {
    rules: Vec<Box<dyn LintRule>>,
}

impl RuleRegistry {
    /// Create a new registry with all built-in rules
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(ColorRule),
                Box::new(DimensionRule),
                Box::new(FluidDimensionRule),
                Box::new(DurationRule),
                Box::new(CubicBezierRule),
                Box::new(FontWeightRule),
                Box::new(CompositeRule),
            ],
        }
    }

    /// Get all registered rules
    pub fn rules(&self) -> &[Box<dyn LintRule>] {
        &self.rules
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a custom rule to the registry
    pub fn add_rule(&mut self, rule: Box<dyn LintRule>) {
        self.rules.push(rule);
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &format!("{} rules", self.rules.len()))
            .finish()
    }
}

/// Numeric value of a JSON number
pub(crate) fn number(value: &Value) -> Option<f64> {
    value.as_f64()
}
