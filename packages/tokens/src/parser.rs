use crate::ast::{Token, TokenGroup, TokenNode};
use crate::error::{TokenParseError, TokenParseResult};
use crate::types::TokenType;
use serde_json::{Map, Value};
use std::path::Path;

const VALUE_KEY: &str = "$value";
const TYPE_KEY: &str = "$type";
const DESCRIPTION_KEY: &str = "$description";
const EXTENSIONS_KEY: &str = "$extensions";

/// Parse a DTCG token document from JSON text
pub fn parse_token_document(source: &str, source_path: &Path) -> TokenParseResult<TokenGroup> {
    let value: Value = serde_json::from_str(source)
        .map_err(|e| TokenParseError::json(source_path, e.to_string()))?;
    parse_token_value(&value, source_path)
}

/// Parse an already-decoded JSON value as a token group.
///
/// Every parsed token is tagged with `source_path`.
pub fn parse_token_value(value: &Value, source_path: &Path) -> TokenParseResult<TokenGroup> {
    let map = value.as_object().ok_or_else(|| TokenParseError::NotAnObject {
        path: String::new(),
        source_path: source_path.to_path_buf(),
    })?;
    parse_group(map, "", source_path)
}

fn parse_group(map: &Map<String, Value>, path: &str, source_path: &Path) -> TokenParseResult<TokenGroup> {
    let mut group = TokenGroup::new();

    for (key, child) in map {
        if key.starts_with('$') {
            match key.as_str() {
                TYPE_KEY => group.token_type = Some(parse_type(child, path, source_path)?),
                DESCRIPTION_KEY => group.description = child.as_str().map(str::to_string),
                EXTENSIONS_KEY => group.extensions = Some(child.clone()),
                _ => {
                    group.metadata.insert(key.clone(), child.clone());
                }
            }
            continue;
        }

        let child_path = join_path(path, key);
        validate_name(key, &child_path, source_path)?;

        let child_map = child.as_object().ok_or_else(|| TokenParseError::NotAnObject {
            path: child_path.clone(),
            source_path: source_path.to_path_buf(),
        })?;

        let node = if child_map.contains_key(VALUE_KEY) {
            TokenNode::Token(parse_token(child_map, &child_path, source_path)?)
        } else {
            TokenNode::Group(parse_group(child_map, &child_path, source_path)?)
        };
        group.insert(key.clone(), node);
    }

    Ok(group)
}

fn parse_token(map: &Map<String, Value>, path: &str, source_path: &Path) -> TokenParseResult<Token> {
    let value = map.get(VALUE_KEY).cloned().unwrap_or(Value::Null);
    if value.is_null() {
        return Err(TokenParseError::invalid_node(path, source_path, "$value must not be null"));
    }

    let token_type = map
        .get(TYPE_KEY)
        .map(|ty| parse_type(ty, path, source_path))
        .transpose()?;

    Ok(Token {
        value,
        token_type,
        description: map
            .get(DESCRIPTION_KEY)
            .and_then(Value::as_str)
            .map(str::to_string),
        extensions: map.get(EXTENSIONS_KEY).cloned(),
        source: Some(source_path.to_path_buf()),
    })
}

fn parse_type(value: &Value, path: &str, source_path: &Path) -> TokenParseResult<TokenType> {
    value
        .as_str()
        .map(TokenType::from_name)
        .ok_or_else(|| TokenParseError::invalid_node(path, source_path, "$type must be a string"))
}

fn validate_name(name: &str, path: &str, source_path: &Path) -> TokenParseResult<()> {
    let reason = if name.is_empty() {
        Some("name must not be empty")
    } else if name.contains(['{', '}']) {
        Some("name must not contain '{' or '}'")
    } else if name.contains('.') {
        Some("name must not contain '.'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(TokenParseError::InvalidName {
            name: name.to_string(),
            path: path.to_string(),
            source_path: source_path.to_path_buf(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_groups_and_tokens() {
        let source = r##"{
            "color": {
                "$type": "color",
                "primary": { "$value": "#ff00ff", "$description": "Brand" },
                "surface": { "base": { "$value": "#ffffff" } }
            }
        }"##;

        let group = parse_token_document(source, Path::new("tokens.json")).unwrap();
        let Some(TokenNode::Group(color)) = group.get("color") else {
            panic!("Expected color group");
        };
        assert_eq!(color.token_type, Some(TokenType::Color));

        let Some(TokenNode::Token(primary)) = color.get("primary") else {
            panic!("Expected primary token");
        };
        assert_eq!(primary.description.as_deref(), Some("Brand"));
        assert_eq!(primary.source.as_deref(), Some(Path::new("tokens.json")));
        assert_eq!(group.token_count(), 2);
    }

    #[test]
    fn test_invalid_json_reports_file() {
        let err = parse_token_document("{ nope", Path::new("broken.json")).unwrap_err();
        assert!(matches!(err, TokenParseError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_rejects_dotted_names() {
        let source = r#"{ "a.b": { "$value": 1 } }"#;
        let err = parse_token_document(source, Path::new("t.json")).unwrap_err();
        assert!(matches!(err, TokenParseError::InvalidName { .. }));
    }

    #[test]
    fn test_rejects_scalar_children() {
        let source = r#"{ "spacing": 4 }"#;
        let err = parse_token_document(source, Path::new("t.json")).unwrap_err();
        assert!(matches!(err, TokenParseError::NotAnObject { ref path, .. } if path == "spacing"));
    }

    #[test]
    fn test_unknown_group_metadata_is_kept() {
        let source = r#"{ "$deprecated": true, "x": { "$value": 1, "$type": "number" } }"#;
        let group = parse_token_document(source, Path::new("t.json")).unwrap();
        assert_eq!(group.metadata.get("$deprecated"), Some(&Value::Bool(true)));
    }
}
