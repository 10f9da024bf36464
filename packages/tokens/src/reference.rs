/// Reference syntax
///
/// A reference is a string that is exactly `{dot.separated.path}`; partial or
/// interpolated references (`"1px solid {color.border}"`) are plain strings.
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    path: String,
}

impl Reference {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Parse a reference string, returning `None` for anything that is not exactly `{path}`
    pub fn parse(value: &str) -> Option<Self> {
        if !(value.starts_with('{') && value.ends_with('}')) || value.len() < 3 {
            return None;
        }

        let inner = &value[1..value.len() - 1];
        let valid = !inner.contains(['{', '}'])
            && !inner.chars().any(char::is_whitespace)
            && inner.split('.').all(|segment| !segment.is_empty());

        valid.then(|| Self::new(inner))
    }

    /// Parse a JSON value as a reference (only strings can be references)
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_str().and_then(Self::parse)
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.path)
    }
}

pub fn is_reference(value: &Value) -> bool {
    Reference::from_value(value).is_some()
}

/// Every reference inside `value`, descending into objects and arrays
pub fn collect_references(value: &Value) -> Vec<Reference> {
    let mut references = Vec::new();
    collect_into(value, &mut references);
    references
}

fn collect_into(value: &Value, references: &mut Vec<Reference>) {
    match value {
        Value::String(_) => {
            if let Some(reference) = Reference::from_value(value) {
                references.push(reference);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_into(item, references);
            }
        }
        Value::Object(map) => {
            for item in map.values() {
                collect_into(item, references);
            }
        }
        _ => {}
    }
}
