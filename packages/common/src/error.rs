use thiserror::Error;
use tokenweave_tokens::TokenParseError;

pub type CommonResult<T> = Result<T, CommonError>;

/// Errors raised while loading token documents from a [`FileSystem`](crate::FileSystem)
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("Parse error: {0}")]
    Parse(#[from] TokenParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON pointer '{pointer}' does not exist in {}", path.display())]
    PointerNotFound {
        pointer: String,
        path: std::path::PathBuf,
    },
}
