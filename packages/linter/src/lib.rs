mod diagnostic;
mod linter;
mod rules;

pub use diagnostic::{Diagnostic, DiagnosticLevel};
pub use linter::{lint_token, lint_tokens, LintOptions};
pub use rules::{is_hex_color, Issue, LintRule, RuleRegistry};
