use crate::types::TokenType;
use std::path::PathBuf;
use thiserror::Error;

pub type TokenParseResult<T> = Result<T, TokenParseError>;

/// Errors raised while turning a JSON token document into a [`TokenGroup`](crate::TokenGroup)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenParseError {
    #[error("Invalid JSON in {}: {message}", source_path.display())]
    Json {
        source_path: PathBuf,
        message: String,
    },

    #[error("Expected an object at '{path}' in {}", source_path.display())]
    NotAnObject { path: String, source_path: PathBuf },

    #[error("Invalid token name '{name}' at '{path}' in {}: {reason}", source_path.display())]
    InvalidName {
        name: String,
        path: String,
        source_path: PathBuf,
        reason: String,
    },

    #[error("Invalid node at '{path}' in {}: {message}", source_path.display())]
    InvalidNode {
        path: String,
        source_path: PathBuf,
        message: String,
    },
}

impl TokenParseError {
    pub fn json(source_path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Json {
            source_path: source_path.into(),
            message: message.into(),
        }
    }

    pub fn invalid_node(
        path: impl Into<String>,
        source_path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidNode {
            path: path.into(),
            source_path: source_path.into(),
            message: message.into(),
        }
    }
}

/// Conflicts detected while merging trees of the same context
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlattenError {
    #[error(
        "'{path}' is a token in {} but a group in {}",
        token_source.display(),
        group_source.display()
    )]
    TokenGroupConflict {
        path: String,
        token_source: PathBuf,
        group_source: PathBuf,
    },

    #[error(
        "'{path}' is declared as {existing} in {} but as {incoming} in {}",
        existing_source.display(),
        incoming_source.display()
    )]
    TypeConflict {
        path: String,
        existing: TokenType,
        incoming: TokenType,
        existing_source: PathBuf,
        incoming_source: PathBuf,
    },
}

impl FlattenError {
    pub fn path(&self) -> &str {
        match self {
            FlattenError::TokenGroupConflict { path, .. } => path,
            FlattenError::TypeConflict { path, .. } => path,
        }
    }
}
