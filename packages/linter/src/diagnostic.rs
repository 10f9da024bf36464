use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tokenweave_evaluator::ResolvedToken;
use tokenweave_tokens::TokenContext;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Info,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Warning => "warning",
            DiagnosticLevel::Info => "info",
        })
    }
}

/// A diagnostic about one token (or one property of it)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level
    pub level: DiagnosticLevel,

    /// The rule that generated this diagnostic
    pub rule: String,

    /// Human-readable message
    pub message: String,

    /// Token path, extended with the property for sub-property issues
    /// (`typography.body.fontSize`)
    pub path: String,

    pub context: TokenContext,

    /// File the token was declared in
    pub source: PathBuf,

    /// Optional suggestion for fixing the issue
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(
        level: DiagnosticLevel,
        rule: impl Into<String>,
        message: impl Into<String>,
        path: impl Into<String>,
        context: TokenContext,
        source: impl Into<PathBuf>,
    ) -> Self {
        Self {
            level,
            rule: rule.into(),
            message: message.into(),
            path: path.into(),
            context,
            source: source.into(),
            suggestion: None,
        }
    }

    /// Diagnostic located at `token`
    pub fn for_token(
        level: DiagnosticLevel,
        rule: impl Into<String>,
        message: impl Into<String>,
        token: &ResolvedToken,
    ) -> Self {
        Self::new(
            level,
            rule,
            message,
            token.path(),
            token.token.source.context.clone(),
            token.token.source.path.clone(),
        )
    }

    pub fn error(rule: impl Into<String>, message: impl Into<String>, token: &ResolvedToken) -> Self {
        Self::for_token(DiagnosticLevel::Error, rule, message, token)
    }

    pub fn warning(
        rule: impl Into<String>,
        message: impl Into<String>,
        token: &ResolvedToken,
    ) -> Self {
        Self::for_token(DiagnosticLevel::Warning, rule, message, token)
    }

    /// Narrow the location to a property of the token
    pub fn at_property(mut self, property: &str) -> Self {
        self.path = format!("{}.{}", self.path, property);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == DiagnosticLevel::Error
    }

    /// True when this diagnostic is about the token at `path` or one of its properties
    pub fn covers(&self, path: &str) -> bool {
        self.path == path
            || (self.path.starts_with(path) && self.path[path.len()..].starts_with('.'))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {} ({}, {})",
            self.level,
            self.rule,
            self.path,
            self.message,
            self.source.display(),
            self.context
        )?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " - {}", suggestion)?;
        }
        Ok(())
    }
}
