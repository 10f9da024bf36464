use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use crate::error::{CommonError, CommonResult};
use serde_json::Value;
use tokenweave_tokens::{parse_token_value, TokenGroup, TokenParseError};

/// File system abstraction for document loading and testing
pub trait FileSystem {
    /// Read a whole file as UTF-8 text
    fn read_to_string(&self, path: &Path) -> Result<String, io::Error>;
}

/// Real file system implementation
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, io::Error> {
        std::fs::read_to_string(path)
    }
}

/// In-memory file system, used by tests and by pre-loaded (async) loads
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: HashMap<PathBuf, String>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(normalize_path(&path.into()), content.into());
    }

    /// Builder form of [`add_file`](Self::add_file)
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.add_file(path, content);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, io::Error> {
        self.files.get(&normalize_path(path)).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )
        })
    }
}

/// Normalize a path by removing `.` and resolving `..` lexically
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Read and parse a DTCG token file, optionally scoped to a JSON pointer
/// (`/color/brand`) inside it
pub fn load_token_file(
    fs: &dyn FileSystem,
    path: &Path,
    pointer: Option<&str>,
) -> CommonResult<TokenGroup> {
    let content = fs.read_to_string(path)?;
    let document: Value = serde_json::from_str(&content)
        .map_err(|e| TokenParseError::json(path, e.to_string()))?;

    let scoped = match pointer {
        Some(pointer) if !pointer.is_empty() => {
            document
                .pointer(pointer)
                .ok_or_else(|| CommonError::PointerNotFound {
                    pointer: pointer.to_string(),
                    path: path.to_path_buf(),
                })?
        }
        _ => &document,
    };

    Ok(parse_token_value(scoped, path)?)
}
