use crate::diagnostic::Diagnostic;
use crate::rules::RuleRegistry;
use tokenweave_evaluator::{ResolutionOutput, ResolvedToken};
use tracing::{debug, info, instrument};

/// Options for configuring the linter
#[derive(Debug, Default)]
pub struct LintOptions {
    /// Custom rule registry (uses default if None)
    pub registry: Option<RuleRegistry>,
}

/// Validate every resolved token of every context
#[instrument(skip(output, options), fields(tokens = output.token_count()))]
pub fn lint_tokens(output: &ResolutionOutput, options: LintOptions) -> Vec<Diagnostic> {
    let registry = options.registry.unwrap_or_default();
    let mut diagnostics = Vec::new();

    for resolved in output.contexts.values() {
        for token in resolved.iter() {
            diagnostics.extend(lint_token(token, &registry));
        }
    }

    info!(
        diagnostics = diagnostics.len(),
        errors = diagnostics.iter().filter(|d| d.is_error()).count(),
        "Validation complete"
    );
    diagnostics
}

/// Run every applicable rule on one token. Untyped tokens are not checked.
pub fn lint_token(token: &ResolvedToken, registry: &RuleRegistry) -> Vec<Diagnostic> {
    let Some(token_type) = token.token_type() else {
        debug!(path = token.path(), "Skipping untyped token");
        return Vec::new();
    };

    registry
        .rules()
        .iter()
        .filter(|rule| rule.applies_to(token_type))
        .flat_map(|rule| rule.check_token(token))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticLevel;
    use crate::rules::{Issue, LintRule};
    use serde_json::{json, Value};
    use std::path::Path;
    use tokenweave_evaluator::resolve_references;
    use tokenweave_tokens::{flatten_trees, parse_token_document, TokenContext, TokenTree, TokenType};

    fn lint(source: &str, options: LintOptions) -> Vec<Diagnostic> {
        let group = parse_token_document(source, Path::new("tokens.json")).unwrap();
        let trees = [TokenTree::new(TokenContext::Base, group, "tokens.json")];
        lint_tokens(&resolve_references(&flatten_trees(&trees)), options)
    }

    #[test]
    fn test_reports_property_level_paths() {
        let diagnostics = lint(
            r#"{
                "typography": {
                    "$type": "typography",
                    "body": { "$value": { "fontFamily": "Inter", "fontSize": { "value": 16, "unit": "em" } } }
                }
            }"#,
            LintOptions::default(),
        );

        assert_eq!(diagnostics.len(), 1);
        let diagnostic = &diagnostics[0];
        assert_eq!(diagnostic.rule, "composite-fields");
        assert_eq!(diagnostic.path, "typography.body.fontSize.unit");
        assert!(diagnostic.covers("typography.body"));
        assert_eq!(diagnostic.source, Path::new("tokens.json"));
    }

    #[test]
    fn test_checks_resolved_values() {
        let diagnostics = lint(
            r##"{
                "color": {
                    "$type": "color",
                    "raw": { "$value": "#12345" },
                    "alias": { "$value": "{color.raw}" }
                }
            }"##,
            LintOptions::default(),
        );

        let paths: Vec<_> = diagnostics.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["color.raw", "color.alias"]);
        assert!(diagnostics.iter().all(|d| d.level == DiagnosticLevel::Error));
    }

    #[test]
    fn test_untyped_tokens_are_skipped() {
        let diagnostics = lint(r#"{ "x": { "$value": "anything" } }"#, LintOptions::default());
        assert!(diagnostics.is_empty());
    }

    struct NoZeroRule;

    impl LintRule for NoZeroRule {
        fn name(&self) -> &'static str {
            "no-zero"
        }

        fn description(&self) -> &'static str {
            "Numbers must not be zero"
        }

        fn applies_to(&self, token_type: &TokenType) -> bool {
            *token_type == TokenType::Number
        }

        fn check_value(&self, _token_type: &TokenType, value: &Value) -> Vec<Issue> {
            if *value == json!(0) {
                vec![Issue::warning("zero")]
            } else {
                Vec::new()
            }
        }
    }

    #[test]
    fn test_custom_registry() {
        let mut registry = RuleRegistry::empty();
        registry.add_rule(Box::new(NoZeroRule));

        let diagnostics = lint(
            r#"{ "n": { "$type": "number", "zero": { "$value": 0 }, "one": { "$value": 1 } } }"#,
            LintOptions {
                registry: Some(registry),
            },
        );

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule, "no-zero");
        assert_eq!(diagnostics[0].path, "n.zero");
    }
}
