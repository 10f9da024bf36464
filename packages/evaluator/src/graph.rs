/// Reference graph walk
///
/// Tokens are nodes keyed by dot path and `{path}` strings are edges. The
/// walk is a depth-first search with an explicit on-stack set: reaching a
/// path that is already on the stack is a cycle, whatever the chain length.
/// Results are memoized per (viewing context, path).
use crate::error::ResolutionError;
use indexmap::IndexSet;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokenweave_tokens::{FlattenedToken, NormalizedTokens, Reference, TokenContext, TokenType};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Resolved {
    pub value: Value,
    pub token_type: Option<TokenType>,
}

type ResolveResult = Result<Resolved, ResolutionError>;

pub(crate) struct ReferenceWalker<'a> {
    normalized: &'a NormalizedTokens,
    memo: HashMap<(TokenContext, String), ResolveResult>,
    /// Paths on the active resolution stack, in visit order
    visiting: IndexSet<String>,
}

impl<'a> ReferenceWalker<'a> {
    pub fn new(normalized: &'a NormalizedTokens) -> Self {
        Self {
            normalized,
            memo: HashMap::new(),
            visiting: IndexSet::new(),
        }
    }

    /// Find `path` as seen from `view`: the view's own tokens, then the base
    fn lookup(&self, view: &TokenContext, path: &str) -> Option<&'a FlattenedToken> {
        let normalized = self.normalized;
        if let Some(token) = normalized.get(view).and_then(|tokens| tokens.get(path)) {
            return Some(token);
        }
        if view.is_base() {
            return None;
        }

        let fallback = normalized
            .get(&TokenContext::Base)
            .and_then(|tokens| tokens.get(path));
        if fallback.is_some() {
            debug!(context = %view, path, "Reference falls back to base context");
        }
        fallback
    }

    /// Resolve one token as seen from `view`
    pub fn resolve(&mut self, view: &TokenContext, token: &'a FlattenedToken) -> ResolveResult {
        let key = (view.clone(), token.path.clone());
        if let Some(done) = self.memo.get(&key) {
            return done.clone();
        }

        self.visiting.insert(token.path.clone());
        let result = match Reference::from_value(&token.value) {
            // Whole-value alias: an untyped alias takes the referenced type
            Some(reference) => self
                .resolve_reference(view, token, &reference, None)
                .map(|target| Resolved {
                    value: target.value,
                    token_type: token.token_type.clone().or(target.token_type),
                }),
            None => self
                .resolve_value(view, token, &token.value, None)
                .map(|value| Resolved {
                    value,
                    token_type: token.token_type.clone(),
                }),
        };
        self.visiting.shift_remove(&token.path);

        self.memo.insert(key, result.clone());
        result
    }

    /// Substitute references anywhere inside `value`.
    ///
    /// `property` is the innermost object key above `value`, used to look up
    /// the expected type of composite sub-properties.
    fn resolve_value(
        &mut self,
        view: &TokenContext,
        token: &'a FlattenedToken,
        value: &Value,
        property: Option<&str>,
    ) -> Result<Value, ResolutionError> {
        match value {
            Value::String(_) => match Reference::from_value(value) {
                Some(reference) => self
                    .resolve_reference(view, token, &reference, property)
                    .map(|target| target.value),
                None => Ok(value.clone()),
            },
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve_value(view, token, item, property))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(map) => {
                let mut resolved = Map::with_capacity(map.len());
                for (key, item) in map {
                    let item = self.resolve_value(view, token, item, Some(key.as_str()))?;
                    resolved.insert(key.clone(), item);
                }
                Ok(Value::Object(resolved))
            }
            _ => Ok(value.clone()),
        }
    }

    fn resolve_reference(
        &mut self,
        view: &TokenContext,
        token: &'a FlattenedToken,
        reference: &Reference,
        property: Option<&str>,
    ) -> ResolveResult {
        let target = self
            .lookup(view, reference.path())
            .ok_or_else(|| ResolutionError::Missing {
                path: token.path.clone(),
                reference: reference.path().to_string(),
                property: property.map(str::to_string),
                origin: token.source.clone(),
            })?;

        if let Some(start) = self.visiting.get_index_of(&target.path) {
            let mut chain: Vec<String> = self.visiting.iter().skip(start).cloned().collect();
            chain.push(target.path.clone());
            return Err(ResolutionError::Circular {
                path: token.path.clone(),
                chain,
                origin: token.source.clone(),
            });
        }

        let resolved = self
            .resolve(view, target)
            .map_err(|err| err.for_token(token))?;

        let expected = match property {
            Some(property) => token
                .token_type
                .as_ref()
                .and_then(|ty| ty.sub_property_type(property)),
            None => token.token_type.clone(),
        };
        if let (Some(expected), Some(found)) = (expected, resolved.token_type.as_ref()) {
            if !found.is_compatible_with(&expected) {
                return Err(ResolutionError::TypeMismatch {
                    path: token.path.clone(),
                    reference: reference.path().to_string(),
                    property: property.map(str::to_string),
                    expected,
                    found: found.clone(),
                    origin: token.source.clone(),
                });
            }
        }

        Ok(resolved)
    }
}
