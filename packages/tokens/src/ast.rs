//! # Token Tree Model
//!
//! Typed representation of DTCG token documents.
//!
//! A document is a [`TokenGroup`] whose children are either nested groups or
//! [`Token`] leaves. The leaf/namespace distinction is structural: a JSON
//! object carrying `$value` parses into [`TokenNode::Token`], anything else
//! into [`TokenNode::Group`].
//!
//! One [`TokenTree`] exists per context. The base tree uses
//! [`TokenContext::Base`]; modifier contexts and context-labelled loads use
//! [`TokenContext::Variant`].

use crate::types::TokenType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

/// Label used by in-memory loads and configs for the base context.
pub const DEFAULT_CONTEXT: &str = "default";

/// Identity of a token context
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenContext {
    /// The base/default tree (rendered under `:root`)
    Base,
    /// A named overlay, optionally owned by a resolver modifier
    Variant {
        modifier: Option<String>,
        name: String,
    },
}

impl TokenContext {
    /// Context declared by a resolver modifier
    pub fn modifier(modifier: impl Into<String>, name: impl Into<String>) -> Self {
        TokenContext::Variant {
            modifier: Some(modifier.into()),
            name: name.into(),
        }
    }

    /// Context with only a name (e.g. assigned by an in-memory load)
    pub fn named(name: impl Into<String>) -> Self {
        TokenContext::Variant {
            modifier: None,
            name: name.into(),
        }
    }

    /// Map an optional context label to a context; `None` and `"default"` are the base.
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            None => TokenContext::Base,
            Some(DEFAULT_CONTEXT) => TokenContext::Base,
            Some(name) => TokenContext::named(name),
        }
    }

    pub fn is_base(&self) -> bool {
        matches!(self, TokenContext::Base)
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            TokenContext::Base => None,
            TokenContext::Variant { name, .. } => Some(name),
        }
    }

    pub fn modifier_name(&self) -> Option<&str> {
        match self {
            TokenContext::Base => None,
            TokenContext::Variant { modifier, .. } => modifier.as_deref(),
        }
    }
}

impl fmt::Display for TokenContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenContext::Base => f.write_str("base"),
            TokenContext::Variant {
                modifier: Some(modifier),
                name,
            } => write!(f, "{}:{}", modifier, name),
            TokenContext::Variant {
                modifier: None,
                name,
            } => f.write_str(name),
        }
    }
}

/// Where a token came from: originating file plus context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSource {
    pub path: PathBuf,
    pub context: TokenContext,
}

impl TokenSource {
    pub fn new(path: impl Into<PathBuf>, context: TokenContext) -> Self {
        Self {
            path: path.into(),
            context,
        }
    }
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path.display(), self.context)
    }
}

/// A token leaf (`{ $value, $type?, $description?, $extensions? }`)
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub value: Value,
    pub token_type: Option<TokenType>,
    pub description: Option<String>,
    pub extensions: Option<Value>,
    /// File the token was parsed from, when known
    pub source: Option<PathBuf>,
}

impl Token {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            token_type: None,
            description: None,
            extensions: None,
            source: None,
        }
    }

    pub fn with_type(mut self, token_type: TokenType) -> Self {
        self.token_type = Some(token_type);
        self
    }
}

/// A child of a token group
#[derive(Debug, Clone, PartialEq)]
pub enum TokenNode {
    Token(Token),
    Group(TokenGroup),
}

/// A namespace node: named children plus inheritable `$type` and metadata
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenGroup {
    pub token_type: Option<TokenType>,
    pub description: Option<String>,
    pub extensions: Option<Value>,
    /// Other `$`-prefixed keys, kept verbatim
    pub metadata: IndexMap<String, Value>,
    pub children: IndexMap<String, TokenNode>,
}

impl TokenGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, token_type: TokenType) -> Self {
        self.token_type = Some(token_type);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, node: TokenNode) {
        self.children.insert(name.into(), node);
    }

    /// Builder form of [`insert`](Self::insert) for tokens
    pub fn token(mut self, name: impl Into<String>, token: Token) -> Self {
        self.insert(name, TokenNode::Token(token));
        self
    }

    /// Builder form of [`insert`](Self::insert) for groups
    pub fn group(mut self, name: impl Into<String>, group: TokenGroup) -> Self {
        self.insert(name, TokenNode::Group(group));
        self
    }

    pub fn get(&self, name: &str) -> Option<&TokenNode> {
        self.children.get(name)
    }

    /// Number of token leaves in this group and all nested groups
    pub fn token_count(&self) -> usize {
        self.children
            .values()
            .map(|node| match node {
                TokenNode::Token(_) => 1,
                TokenNode::Group(group) => group.token_count(),
            })
            .sum()
    }

    /// True when the group holds no tokens at any depth (metadata-only groups count as empty)
    pub fn has_tokens(&self) -> bool {
        self.token_count() > 0
    }
}

/// One token tree per context
#[derive(Debug, Clone, PartialEq)]
pub struct TokenTree {
    pub context: TokenContext,
    pub tokens: TokenGroup,
    pub source_path: PathBuf,
}

impl TokenTree {
    pub fn new(context: TokenContext, tokens: TokenGroup, source_path: impl Into<PathBuf>) -> Self {
        Self {
            context,
            tokens,
            source_path: source_path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_from_label() {
        assert_eq!(TokenContext::from_label(None), TokenContext::Base);
        assert_eq!(TokenContext::from_label(Some("default")), TokenContext::Base);
        assert_eq!(
            TokenContext::from_label(Some("dark")),
            TokenContext::named("dark")
        );
    }

    #[test]
    fn test_context_display() {
        assert_eq!(TokenContext::Base.to_string(), "base");
        assert_eq!(TokenContext::modifier("theme", "dark").to_string(), "theme:dark");
        assert_eq!(TokenContext::named("dark").to_string(), "dark");
    }

    #[test]
    fn test_metadata_only_group_has_no_tokens() {
        let mut group = TokenGroup::new();
        group.description = Some("Only docs".to_string());
        group.insert("nested", TokenNode::Group(TokenGroup::new()));
        assert!(!group.has_tokens());
    }
}
