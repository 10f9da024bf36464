use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tokenweave_tokens::{FlattenedToken, TokenSource, TokenType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionErrorKind {
    Circular,
    Missing,
    TypeMismatch,
}

impl ResolutionErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionErrorKind::Circular => "circular",
            ResolutionErrorKind::Missing => "missing",
            ResolutionErrorKind::TypeMismatch => "type-mismatch",
        }
    }
}

impl fmt::Display for ResolutionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token whose value could not be resolved.
///
/// `path` is always the failing token; `origin` is where that token was
/// declared. When a token fails because something it references failed,
/// the nested details (chain, missing path, types) are kept.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionError {
    #[error("Circular reference at '{path}' ({origin}): {}", chain.join(" → "))]
    Circular {
        path: String,
        chain: Vec<String>,
        origin: TokenSource,
    },

    #[error("'{path}' references missing token '{reference}' ({origin})")]
    Missing {
        path: String,
        reference: String,
        property: Option<String>,
        origin: TokenSource,
    },

    #[error(
        "'{path}' expects {expected}{} but '{reference}' is {found} ({origin})",
        property.as_ref().map(|p| format!(" for '{}'", p)).unwrap_or_default()
    )]
    TypeMismatch {
        path: String,
        reference: String,
        property: Option<String>,
        expected: TokenType,
        found: TokenType,
        origin: TokenSource,
    },
}

impl ResolutionError {
    pub fn kind(&self) -> ResolutionErrorKind {
        match self {
            ResolutionError::Circular { .. } => ResolutionErrorKind::Circular,
            ResolutionError::Missing { .. } => ResolutionErrorKind::Missing,
            ResolutionError::TypeMismatch { .. } => ResolutionErrorKind::TypeMismatch,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            ResolutionError::Circular { path, .. }
            | ResolutionError::Missing { path, .. }
            | ResolutionError::TypeMismatch { path, .. } => path,
        }
    }

    pub fn origin(&self) -> &TokenSource {
        match self {
            ResolutionError::Circular { origin, .. }
            | ResolutionError::Missing { origin, .. }
            | ResolutionError::TypeMismatch { origin, .. } => origin,
        }
    }

    /// Re-attribute a dependency's failure to the token that referenced it
    pub(crate) fn for_token(mut self, token: &FlattenedToken) -> Self {
        match &mut self {
            ResolutionError::Circular { path, origin, .. }
            | ResolutionError::Missing { path, origin, .. }
            | ResolutionError::TypeMismatch { path, origin, .. } => {
                *path = token.path.clone();
                *origin = token.source.clone();
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokenweave_tokens::TokenContext;

    #[test]
    fn test_kind_names() {
        assert_eq!(ResolutionErrorKind::TypeMismatch.to_string(), "type-mismatch");
        assert_eq!(
            serde_json::to_string(&ResolutionErrorKind::Circular).unwrap(),
            "\"circular\""
        );
    }

    #[test]
    fn test_display_mentions_origin() {
        let err = ResolutionError::TypeMismatch {
            path: "border.default".to_string(),
            reference: "spacing.small".to_string(),
            property: Some("color".to_string()),
            expected: TokenType::Color,
            found: TokenType::Dimension,
            origin: TokenSource::new("border.json", TokenContext::named("dark")),
        };
        let msg = err.to_string();
        assert!(msg.contains("expects color for 'color'"));
        assert!(msg.contains("border.json (dark)"));
        assert_eq!(err.kind(), ResolutionErrorKind::TypeMismatch);
    }
}
