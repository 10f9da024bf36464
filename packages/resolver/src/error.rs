use std::path::PathBuf;
use thiserror::Error;
use tokenweave_common::CommonError;
use tokenweave_tokens::TokenParseError;

pub type ResolverResult<T> = Result<T, ResolverError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolverError {
    #[error("Invalid resolver JSON in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported resolver version '{version}' in {}, expected '{expected}'", path.display())]
    UnsupportedVersion {
        path: PathBuf,
        version: String,
        expected: String,
    },

    #[error("Invalid {kind} name '{name}': {reason}")]
    InvalidName {
        kind: &'static str,
        name: String,
        reason: String,
    },

    #[error("Modifier '{modifier}' must declare at least one context")]
    EmptyModifier { modifier: String },

    #[error("Modifier '{modifier}' has no context named '{context}'")]
    UnknownContext { modifier: String, context: String },

    #[error("Modifier '{modifier}' has no default context and no selection was given")]
    MissingSelection { modifier: String },

    #[error("Set '{name}' not found (referenced as '{reference}')")]
    SetNotFound { name: String, reference: String },

    #[error("Modifier '{name}' not found (referenced as '{reference}')")]
    ModifierNotFound { name: String, reference: String },

    #[error("Unsupported reference '{reference}': {reason}")]
    UnsupportedReference { reference: String, reason: String },

    #[error("Circular set reference: {chain}")]
    CircularSet { chain: String },

    #[error("Failed to read {}: {message}", path.display())]
    FileRead { path: PathBuf, message: String },

    #[error("JSON pointer '{pointer}' does not exist in {}", path.display())]
    PointerNotFound { path: PathBuf, pointer: String },

    #[error(transparent)]
    Tokens(#[from] TokenParseError),

    #[error("Background load task failed: {message}")]
    Task { message: String },
}

impl ResolverError {
    /// Errors that mean a document could not be read as JSON at all
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            ResolverError::Parse { .. } | ResolverError::Tokens(TokenParseError::Json { .. })
        )
    }

    /// Attach the file being loaded to a [`CommonError`]
    pub fn from_common(error: CommonError, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match error {
            CommonError::Parse(err) => ResolverError::Tokens(err),
            CommonError::Io(err) => ResolverError::FileRead {
                path,
                message: err.to_string(),
            },
            CommonError::PointerNotFound { pointer, path } => {
                ResolverError::PointerNotFound { path, pointer }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_errors_are_classified() {
        let parse = ResolverError::Parse {
            path: PathBuf::from("tokens.resolver.json"),
            message: "expected value".to_string(),
        };
        let missing = ResolverError::SetNotFound {
            name: "core".to_string(),
            reference: "#/sets/core".to_string(),
        };
        assert!(parse.is_parse_error());
        assert!(!missing.is_parse_error());
        assert!(parse.to_string().contains("tokens.resolver.json"));
    }

    #[test]
    fn test_io_errors_carry_the_file() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ResolverError::from_common(CommonError::Io(io), "/tokens/base.json");
        assert!(matches!(err, ResolverError::FileRead { .. }));
        assert!(err.to_string().contains("/tokens/base.json"));
    }
}
