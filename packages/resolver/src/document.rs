//! # Resolver Document
//!
//! Serde model of a `2025.10` resolver document:
//!
//! ```json
//! {
//!   "version": "2025.10",
//!   "sets": { "core": { "sources": [{ "$ref": "core.json" }] } },
//!   "modifiers": {
//!     "theme": {
//!       "contexts": { "light": [], "dark": [{ "$ref": "dark.json" }] },
//!       "default": "light"
//!     }
//!   },
//!   "resolutionOrder": [{ "$ref": "#/sets/core" }, { "$ref": "#/modifiers/theme" }]
//! }
//! ```
//!
//! Parsing only checks the JSON shape; [`ResolverDocument::validate`] checks
//! the version tag and naming rules.

use crate::error::{ResolverError, ResolverResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

pub const RESOLVER_VERSION: &str = "2025.10";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverDocument {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub sets: IndexMap<String, SetDefinition>,
    #[serde(default)]
    pub modifiers: IndexMap<String, ModifierDefinition>,
    pub resolution_order: Vec<ResolutionItem>,
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(rename = "$extensions", default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
    #[serde(rename = "$defs", default, skip_serializing_if = "Option::is_none")]
    pub defs: Option<Value>,
}

/// A reusable bundle of token sources, merged additively in order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SetDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// An axis of variation whose contexts are independent token overlays
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModifierDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub contexts: IndexMap<String, Vec<Source>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// `{ "$ref": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefObject {
    #[serde(rename = "$ref")]
    pub reference: String,
}

/// A set or modifier-context source: a reference or an inline token group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    Reference(RefObject),
    Inline(Map<String, Value>),
}

/// An entry of `resolutionOrder`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolutionItem {
    Reference(RefObject),
    Inline(InlineItem),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InlineItem {
    Set(InlineSet),
    Modifier(InlineModifier),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineSet {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl InlineSet {
    pub fn definition(&self) -> SetDefinition {
        SetDefinition {
            description: self.description.clone(),
            sources: self.sources.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineModifier {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub contexts: IndexMap<String, Vec<Source>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl InlineModifier {
    pub fn definition(&self) -> ModifierDefinition {
        ModifierDefinition {
            description: self.description.clone(),
            contexts: self.contexts.clone(),
            default: self.default.clone(),
        }
    }
}

impl ResolverDocument {
    /// Parse JSON text without validating names or version
    pub fn parse(source: &str, path: &Path) -> ResolverResult<Self> {
        serde_json::from_str(source).map_err(|e| ResolverError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Every shape/naming problem in the document
    pub fn validate(&self, path: &Path) -> Vec<ResolverError> {
        let mut errors = Vec::new();

        if self.version != RESOLVER_VERSION {
            errors.push(ResolverError::UnsupportedVersion {
                path: path.to_path_buf(),
                version: self.version.clone(),
                expected: RESOLVER_VERSION.to_string(),
            });
        }

        for name in self.sets.keys() {
            check_name("set", name, &mut errors);
        }
        for (name, modifier) in &self.modifiers {
            check_name("modifier", name, &mut errors);
            check_modifier(name, modifier, &mut errors);
        }

        for item in &self.resolution_order {
            match item {
                ResolutionItem::Reference(_) => {}
                ResolutionItem::Inline(InlineItem::Set(set)) => {
                    check_name("set", &set.name, &mut errors);
                }
                ResolutionItem::Inline(InlineItem::Modifier(modifier)) => {
                    check_name("modifier", &modifier.name, &mut errors);
                    check_modifier(&modifier.name, &modifier.definition(), &mut errors);
                }
            }
        }

        errors
    }
}

fn check_name(kind: &'static str, name: &str, errors: &mut Vec<ResolverError>) {
    let reason = if name.is_empty() {
        Some("must not be empty")
    } else if name.starts_with('$') {
        Some("must not start with '$'")
    } else if name.contains(['{', '}']) {
        Some("must not contain '{' or '}'")
    } else if name.contains('.') {
        Some("must not contain '.'")
    } else {
        None
    };

    if let Some(reason) = reason {
        errors.push(ResolverError::InvalidName {
            kind,
            name: name.to_string(),
            reason: reason.to_string(),
        });
    }
}

fn check_modifier(name: &str, modifier: &ModifierDefinition, errors: &mut Vec<ResolverError>) {
    if modifier.contexts.is_empty() {
        errors.push(ResolverError::EmptyModifier {
            modifier: name.to_string(),
        });
    }
    for context in modifier.contexts.keys() {
        check_name("context", context, errors);
    }
    if let Some(default) = &modifier.default {
        if !modifier.contexts.contains_key(default) {
            errors.push(ResolverError::UnknownContext {
                modifier: name.to_string(),
                context: default.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ResolverDocument {
        ResolverDocument::parse(source, Path::new("tokens.resolver.json")).expect("Failed to parse")
    }

    #[test]
    fn test_parse_references_and_inline_items() {
        let doc = parse(
            r##"{
                "version": "2025.10",
                "sets": { "core": { "sources": [{ "$ref": "core.json" }, { "x": { "$value": 1 } }] } },
                "resolutionOrder": [
                    { "$ref": "#/sets/core" },
                    { "type": "set", "name": "extra", "sources": [] },
                    { "type": "modifier", "name": "density", "contexts": { "compact": [] }, "default": "compact" }
                ]
            }"##,
        );

        let core = &doc.sets["core"];
        assert!(matches!(&core.sources[0], Source::Reference(r) if r.reference == "core.json"));
        assert!(matches!(&core.sources[1], Source::Inline(map) if map.contains_key("x")));
        assert!(matches!(&doc.resolution_order[0], ResolutionItem::Reference(_)));
        assert!(matches!(
            &doc.resolution_order[1],
            ResolutionItem::Inline(InlineItem::Set(set)) if set.name == "extra"
        ));
        assert!(matches!(
            &doc.resolution_order[2],
            ResolutionItem::Inline(InlineItem::Modifier(m)) if m.default.as_deref() == Some("compact")
        ));
        assert!(doc.validate(Path::new("r.json")).is_empty());
    }

    #[test]
    fn test_metadata_fields() {
        let doc = parse(
            r#"{
                "$schema": "https://example.com/resolver.json",
                "version": "2025.10",
                "name": "Brand",
                "$defs": {},
                "resolutionOrder": []
            }"#,
        );
        assert_eq!(doc.name.as_deref(), Some("Brand"));
        assert!(doc.schema.is_some());
        assert!(doc.defs.is_some());
    }

    #[test]
    fn test_malformed_shape_is_parse_error() {
        let err = ResolverDocument::parse(r#"{ "version": "2025.10" }"#, Path::new("r.json"))
            .unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_validate_version_and_names() {
        let doc = parse(
            r#"{
                "version": "1.0",
                "sets": { "$core": { "sources": [] }, "a.b": { "sources": [] } },
                "modifiers": { "theme": { "contexts": {}, "default": "light" } },
                "resolutionOrder": []
            }"#,
        );

        let errors = doc.validate(Path::new("r.json"));
        assert!(matches!(errors[0], ResolverError::UnsupportedVersion { .. }));
        let invalid_names = errors
            .iter()
            .filter(|e| matches!(e, ResolverError::InvalidName { .. }))
            .count();
        assert_eq!(invalid_names, 2);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ResolverError::EmptyModifier { .. })));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ResolverError::UnknownContext { .. })));
    }
}
