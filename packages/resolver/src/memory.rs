/// In-memory token loading
///
/// Each entry is one token document with an optional context label; there is
/// no resolver document and no modifier metadata.
use crate::error::ResolverError;
use crate::processor::LoadResult;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokenweave_tokens::{parse_token_document, TokenContext, TokenTree};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMemoryEntry {
    /// `None` or `"default"` loads into the base context
    #[serde(default)]
    pub context: Option<String>,
    pub content: String,
}

impl TokenMemoryEntry {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            context: None,
            content: content.into(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Source path -> document
pub type TokenMemoryData = IndexMap<String, TokenMemoryEntry>;

/// Parse every entry into its own tree; failures are collected per file
#[instrument(skip(data), fields(files = data.len()))]
pub fn load_from_memory(data: &TokenMemoryData) -> LoadResult {
    let mut result = LoadResult::default();

    for (path, entry) in data {
        match parse_token_document(&entry.content, Path::new(path)) {
            Ok(tokens) => {
                let context = TokenContext::from_label(entry.context.as_deref());
                result.trees.push(TokenTree::new(context, tokens, path));
            }
            Err(err) => {
                warn!(file = %path, error = %err, "Failed to parse token document");
                result.errors.push(ResolverError::Tokens(err));
            }
        }
    }

    info!(
        trees = result.trees.len(),
        errors = result.errors.len(),
        "Loaded tokens from memory"
    );
    result
}
