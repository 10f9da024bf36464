//! # Reference Resolution
//!
//! Replaces every `{path}` reference in the flattened tokens of each context
//! with its final value.
//!
//! - A context only owns the tokens it declares. Lookups inside it try the
//!   context first and then the base context, and a whole reference chain is
//!   resolved as seen from the requesting context.
//! - References may appear inside composite values (a border's `color`,
//!   a gradient stop, ...); these are resolved too and type-checked against
//!   the composite's sub-property type when it is known.
//! - Failures (`circular`, `missing`, `type-mismatch`) are collected per
//!   token. A failing token is left out of the output; the rest of the tree
//!   still resolves.

use crate::error::ResolutionError;
use crate::graph::ReferenceWalker;
use indexmap::IndexMap;
use serde_json::Value;
use tokenweave_tokens::{is_reference, FlattenedToken, NormalizedTokens, TokenContext, TokenType};
use tracing::{debug, info, instrument, warn};

/// A flattened token plus its fully substituted value
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedToken {
    /// The token as flattened; `token_type` includes a type inherited through an alias
    pub token: FlattenedToken,
    /// `value` with every reference replaced; never contains reference strings
    pub resolved_value: Value,
}

impl ResolvedToken {
    pub fn path(&self) -> &str {
        &self.token.path
    }

    pub fn token_type(&self) -> Option<&TokenType> {
        self.token.token_type.as_ref()
    }

    /// The raw value as written (references intact)
    pub fn value(&self) -> &Value {
        &self.token.value
    }

    /// True when the whole raw value is a single reference
    pub fn is_alias(&self) -> bool {
        is_reference(&self.token.value)
    }
}

/// Resolved tokens declared by one context
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTokens {
    pub context: TokenContext,
    pub tokens: IndexMap<String, ResolvedToken>,
}

impl ResolvedTokens {
    pub fn new(context: TokenContext) -> Self {
        Self {
            context,
            tokens: IndexMap::new(),
        }
    }

    pub fn get(&self, path: &str) -> Option<&ResolvedToken> {
        self.tokens.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedToken> {
        self.tokens.values()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolutionOutput {
    /// Same contexts, same order as the input
    pub contexts: IndexMap<TokenContext, ResolvedTokens>,
    pub errors: Vec<ResolutionError>,
}

impl ResolutionOutput {
    pub fn context(&self, context: &TokenContext) -> Option<&ResolvedTokens> {
        self.contexts.get(context)
    }

    pub fn base(&self) -> Option<&ResolvedTokens> {
        self.context(&TokenContext::Base)
    }

    pub fn token_count(&self) -> usize {
        self.contexts.values().map(ResolvedTokens::len).sum()
    }
}

#[instrument(skip(normalized), fields(contexts = normalized.len()))]
pub fn resolve_references(normalized: &NormalizedTokens) -> ResolutionOutput {
    let mut walker = ReferenceWalker::new(normalized);
    let mut output = ResolutionOutput::default();

    for (context, flattened) in normalized {
        let mut resolved = ResolvedTokens::new(context.clone());

        for token in flattened.tokens.values() {
            match walker.resolve(context, token) {
                Ok(result) => {
                    let mut token = token.clone();
                    token.token_type = result.token_type;
                    resolved.tokens.insert(
                        token.path.clone(),
                        ResolvedToken {
                            token,
                            resolved_value: result.value,
                        },
                    );
                }
                Err(err) => {
                    warn!(error = %err, kind = %err.kind(), "Unresolvable token");
                    output.errors.push(err);
                }
            }
        }

        debug!(context = %context, tokens = resolved.len(), "Resolved context");
        output.contexts.insert(context.clone(), resolved);
    }

    info!(
        tokens = output.token_count(),
        errors = output.errors.len(),
        "Reference resolution complete"
    );
    output
}
