//! # Flatten / Merge
//!
//! Collapses the nested token groups of one or more [`TokenTree`]s into a
//! single dot-path keyed map per context.
//!
//! ## Merge policy
//!
//! Trees are merged in the order given ("last wins") with conflict
//! detection:
//!
//! - token vs. group at the same path is always a conflict; the path is
//!   dropped from the output
//! - token vs. token where both sides declare a `$type` and the types differ
//!   is a conflict; the path is dropped
//! - if only one side declares a `$type`, that type is inherited by the result
//!
//! Group metadata (`$description`, `$extensions`, ...) is merged into the
//! [`PathIndex`] without conflict checks.

use crate::ast::{TokenContext, TokenGroup, TokenNode, TokenSource, TokenTree};
use crate::error::FlattenError;
use crate::types::TokenType;
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, instrument, warn};

/// A token rewritten with its resolved dot path and origin
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedToken {
    /// Dot-joined path, e.g. `color.primary`
    pub path: String,
    /// Path segments as written in the source document
    pub original_path: Vec<String>,
    pub value: Value,
    /// Explicit or inherited `$type`
    pub token_type: Option<TokenType>,
    pub description: Option<String>,
    pub extensions: Option<Value>,
    pub source: TokenSource,
}

/// Metadata recorded for a group path
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupMeta {
    pub token_type: Option<TokenType>,
    pub description: Option<String>,
    pub extensions: Option<Value>,
    pub source: PathBuf,
}

/// Index of every group path seen while flattening
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathIndex {
    groups: IndexMap<String, GroupMeta>,
}

impl PathIndex {
    pub fn is_group(&self, path: &str) -> bool {
        self.groups.contains_key(path)
    }

    pub fn group(&self, path: &str) -> Option<&GroupMeta> {
        self.groups.get(path)
    }
}

/// Flattened tokens of one context
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedTokens {
    pub context: TokenContext,
    pub tokens: IndexMap<String, FlattenedToken>,
    pub index: PathIndex,
    pub errors: Vec<FlattenError>,
}

impl FlattenedTokens {
    pub fn new(context: TokenContext) -> Self {
        Self {
            context,
            tokens: IndexMap::new(),
            index: PathIndex::default(),
            errors: Vec::new(),
        }
    }

    pub fn get(&self, path: &str) -> Option<&FlattenedToken> {
        self.tokens.get(path)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Flattened tokens for every context, base first
pub type NormalizedTokens = IndexMap<TokenContext, FlattenedTokens>;

/// Group trees by context and flatten each group.
///
/// The base context is always present in the result (possibly empty) and
/// comes first; other contexts follow in first-seen order.
#[instrument(skip(trees), fields(trees = trees.len()))]
pub fn flatten_trees(trees: &[TokenTree]) -> NormalizedTokens {
    let mut by_context: IndexMap<TokenContext, Vec<&TokenTree>> = IndexMap::new();
    by_context.insert(TokenContext::Base, Vec::new());
    for tree in trees {
        by_context.entry(tree.context.clone()).or_default().push(tree);
    }

    by_context
        .into_iter()
        .map(|(context, trees)| {
            let flattened = flatten_context(context.clone(), &trees);
            (context, flattened)
        })
        .collect()
}

/// Flatten trees that share `context`, merging them in order
pub fn flatten_context(context: TokenContext, trees: &[&TokenTree]) -> FlattenedTokens {
    let mut state = FlattenState {
        output: FlattenedTokens::new(context),
        conflicted: IndexSet::new(),
    };

    for tree in trees {
        state.walk(&tree.tokens, &[], None, tree);
    }

    for path in &state.conflicted {
        state.output.tokens.shift_remove(path);
    }

    debug!(
        context = %state.output.context,
        tokens = state.output.tokens.len(),
        conflicts = state.output.errors.len(),
        "Flattened context"
    );
    state.output
}

struct FlattenState {
    output: FlattenedTokens,
    conflicted: IndexSet<String>,
}

impl FlattenState {
    fn walk(
        &mut self,
        group: &TokenGroup,
        prefix: &[String],
        inherited_type: Option<&TokenType>,
        tree: &TokenTree,
    ) {
        for (name, node) in &group.children {
            let mut segments = prefix.to_vec();
            segments.push(name.clone());
            let path = segments.join(".");

            match node {
                TokenNode::Group(child) => {
                    self.record_group(&path, child, tree);
                    let child_type = child.token_type.as_ref().or(inherited_type);
                    self.walk(child, &segments, child_type, tree);
                }
                TokenNode::Token(token) => {
                    let source_path = token
                        .source
                        .clone()
                        .unwrap_or_else(|| tree.source_path.clone());
                    let declared = token.token_type.clone().or_else(|| inherited_type.cloned());

                    let incoming = FlattenedToken {
                        path: path.clone(),
                        original_path: segments,
                        value: token.value.clone(),
                        token_type: declared,
                        description: token.description.clone(),
                        extensions: token.extensions.clone(),
                        source: TokenSource::new(source_path, tree.context.clone()),
                    };
                    self.record_token(incoming);
                }
            }
        }
    }

    fn record_group(&mut self, path: &str, group: &TokenGroup, tree: &TokenTree) {
        let existing_token = self
            .output
            .tokens
            .get(path)
            .filter(|_| !self.conflicted.contains(path));
        if let Some(token) = existing_token {
            let token_source = token.source.path.clone();
            self.conflict(FlattenError::TokenGroupConflict {
                path: path.to_string(),
                token_source,
                group_source: group_source(group, tree),
            });
        }

        let meta = self
            .output
            .index
            .groups
            .entry(path.to_string())
            .or_insert_with(|| GroupMeta {
                source: tree.source_path.clone(),
                ..GroupMeta::default()
            });
        if group.token_type.is_some() {
            meta.token_type = group.token_type.clone();
        }
        if group.description.is_some() {
            meta.description = group.description.clone();
        }
        if group.extensions.is_some() {
            meta.extensions = group.extensions.clone();
        }
    }

    fn record_token(&mut self, mut incoming: FlattenedToken) {
        let path = incoming.path.clone();

        if self.conflicted.contains(&path) {
            debug!(path = %path, "Ignoring token at previously conflicting path");
            return;
        }

        if let Some(group) = self.output.index.group(&path) {
            let group_source = group.source.clone();
            self.conflict(FlattenError::TokenGroupConflict {
                path,
                token_source: incoming.source.path.clone(),
                group_source,
            });
            return;
        }

        if let Some(existing) = self.output.tokens.get(&path) {
            let existing_type = existing.token_type.clone();
            let existing_source = existing.source.path.clone();
            match (existing_type, incoming.token_type.clone()) {
                (Some(existing_type), Some(incoming_type)) if existing_type != incoming_type => {
                    let error = FlattenError::TypeConflict {
                        path,
                        existing: existing_type,
                        incoming: incoming_type,
                        existing_source,
                        incoming_source: incoming.source.path.clone(),
                    };
                    self.conflict(error);
                    return;
                }
                (Some(existing_type), None) => {
                    incoming.token_type = Some(existing_type);
                }
                _ => {}
            }
            debug!(path = %path, from = %incoming.source, "Later tree overrides token");
        }

        self.output.tokens.insert(path, incoming);
    }

    fn conflict(&mut self, error: FlattenError) {
        warn!(error = %error, "Merge conflict");
        self.conflicted.insert(error.path().to_string());
        self.output.errors.push(error);
    }
}

fn group_source(group: &TokenGroup, tree: &TokenTree) -> PathBuf {
    first_token_source(group).unwrap_or_else(|| tree.source_path.clone())
}

fn first_token_source(group: &TokenGroup) -> Option<PathBuf> {
    group.children.values().find_map(|node| match node {
        TokenNode::Token(token) => token.source.clone(),
        TokenNode::Group(child) => first_token_source(child),
    })
}
