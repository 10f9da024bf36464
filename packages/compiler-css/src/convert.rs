use crate::config::TransformsConfig;
use crate::converters::{convert_value, ConvertInput, CssProperties};
use crate::error::CssResult;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tokenweave_evaluator::{ResolutionOutput, ResolvedToken, ResolvedTokens};
use tokenweave_linter::Diagnostic;
use tokenweave_tokens::{collect_references, TokenContext, TokenSource, TokenType};
use tracing::{debug, info, instrument, warn};

/// A token in CSS form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertedToken {
    pub path: String,
    pub token_type: TokenType,
    pub source: TokenSource,
    pub css: CssProperties,
}

/// Converted tokens of one context, in declaration order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertedTokens {
    pub context: TokenContext,
    pub tokens: IndexMap<String, ConvertedToken>,
}

impl ConvertedTokens {
    pub fn new(context: TokenContext) -> Self {
        Self {
            context,
            tokens: IndexMap::new(),
        }
    }

    pub fn get(&self, path: &str) -> Option<&ConvertedToken> {
        self.tokens.get(path)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

pub type ConvertedContexts = IndexMap<TokenContext, ConvertedTokens>;

/// Convert every resolved token to CSS.
///
/// Tokens with an error-level diagnostic on their path (or one of their
/// properties) in the same context are skipped. Untyped tokens and unknown
/// types are dropped with a warning.
///
/// A reference is only kept as `var(--...)` when its target is emitted in
/// the same context or, for paths the context does not declare, in the base
/// context. Otherwise the token's resolved value is written instead.
#[instrument(skip_all, fields(tokens = resolution.token_count()))]
pub fn convert_tokens(
    resolution: &ResolutionOutput,
    diagnostics: &[Diagnostic],
    transforms: &TransformsConfig,
) -> CssResult<ConvertedContexts> {
    let mut converted = ConvertedContexts::new();

    let invalid_in = |context: &TokenContext| -> Vec<&Diagnostic> {
        diagnostics
            .iter()
            .filter(|d| d.is_error() && d.context == *context)
            .collect()
    };
    let base_emitted = resolution
        .base()
        .map(|base| emitted_paths(base, &invalid_in(&base.context)))
        .unwrap_or_default();

    for (context, resolved) in &resolution.contexts {
        let invalid = invalid_in(context);
        let mut available = emitted_paths(resolved, &invalid);
        if !context.is_base() {
            available.extend(
                base_emitted
                    .iter()
                    .filter(|path| resolved.get(path.as_str()).is_none())
                    .cloned(),
            );
        }
        converted.insert(
            context.clone(),
            convert_context(resolved, &invalid, &available, transforms)?,
        );
    }

    info!(
        contexts = converted.len(),
        tokens = converted.values().map(ConvertedTokens::len).sum::<usize>(),
        "Conversion complete"
    );
    Ok(converted)
}

/// Paths of `resolved` that will produce a declaration
fn emitted_paths(resolved: &ResolvedTokens, invalid: &[&Diagnostic]) -> IndexSet<String> {
    resolved
        .iter()
        .filter(|token| is_emitted(token, invalid))
        .map(|token| token.path().to_string())
        .collect()
}

fn is_emitted(token: &ResolvedToken, invalid: &[&Diagnostic]) -> bool {
    let path = token.path();
    !invalid.iter().any(|d| d.covers(path))
        && matches!(token.token_type(), Some(t) if !matches!(t, TokenType::Unknown(_)))
}

fn convert_context(
    resolved: &ResolvedTokens,
    invalid: &[&Diagnostic],
    available: &IndexSet<String>,
    transforms: &TransformsConfig,
) -> CssResult<ConvertedTokens> {
    let mut converted = ConvertedTokens::new(resolved.context.clone());

    for token in resolved.iter() {
        let path = token.path();
        if invalid.iter().any(|d| d.covers(path)) {
            debug!(path, "Skipping token with validation errors");
            continue;
        }

        let Some(token_type) = token.token_type() else {
            warn!(path, "Dropping token without $type");
            continue;
        };

        let dangling = collect_references(token.value())
            .into_iter()
            .find(|reference| !available.contains(reference.path()));
        let raw = match dangling {
            Some(reference) => {
                warn!(path, target = reference.path(), "Reference target is not emitted; inlining resolved value");
                &token.resolved_value
            }
            None => token.value(),
        };

        let input = ConvertInput {
            path,
            raw,
            resolved: &token.resolved_value,
            transforms,
        };
        match convert_value(token_type, input)? {
            Some(css) => {
                converted.tokens.insert(
                    path.to_string(),
                    ConvertedToken {
                        path: path.to_string(),
                        token_type: token_type.clone(),
                        source: token.token.source.clone(),
                        css,
                    },
                );
            }
            None => warn!(path, token_type = %token_type, "Dropping token of unsupported type"),
        }
    }

    Ok(converted)
}
