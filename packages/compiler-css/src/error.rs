use std::path::PathBuf;
use thiserror::Error;
use tokenweave_resolver::ResolverError;

pub type CssResult<T> = Result<T, CssError>;

#[derive(Error, Debug)]
pub enum CssError {
    #[error("Unsupported color space '{space}' at '{path}'")]
    UnsupportedColorSpace { path: String, space: String },

    #[error("Color '{path}' uses {space}, which needs a 'hex' fallback with the polyfill strategy")]
    MissingHexFallback { path: String, space: String },

    #[error("Cannot convert {token_type} '{path}': {message}")]
    InvalidValue {
        path: String,
        token_type: String,
        message: String,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error(
        "Failed to load {}: {}",
        path.display(),
        errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    )]
    Load {
        path: PathBuf,
        errors: Vec<ResolverError>,
    },
}

impl CssError {
    pub(crate) fn invalid(path: &str, token_type: &str, message: impl Into<String>) -> Self {
        CssError::InvalidValue {
            path: path.to_string(),
            token_type: token_type.to_string(),
            message: message.into(),
        }
    }
}
