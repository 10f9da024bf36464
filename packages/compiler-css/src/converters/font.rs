use super::scalar_text;
use serde_json::Value;
use tokenweave_tokens::font_weight_keyword;

/// Family keywords that must stay unquoted
const GENERIC_FAMILIES: &[&str] = &[
    "serif",
    "sans-serif",
    "monospace",
    "cursive",
    "fantasy",
    "system-ui",
    "ui-serif",
    "ui-sans-serif",
    "ui-monospace",
    "ui-rounded",
    "emoji",
    "math",
    "fangsong",
    "inherit",
    "initial",
    "unset",
];

/// Quote a family name when it contains whitespace or characters outside an identifier
pub fn quote_font_family(name: &str) -> String {
    let name = name.trim();
    if name.starts_with('"') || name.starts_with('\'') {
        return name.to_string();
    }
    if GENERIC_FAMILIES.contains(&name.to_ascii_lowercase().as_str()) {
        return name.to_string();
    }

    let needs_quotes = name
        .chars()
        .any(|ch| !(ch.is_alphanumeric() || ch == '-' || ch == '_'))
        || name.starts_with(|ch: char| ch.is_ascii_digit());

    if needs_quotes {
        format!("\"{}\"", name.replace('"', "\\\""))
    } else {
        name.to_string()
    }
}

/// A family name or list of names as a comma-separated `font-family` value
pub fn convert_font_family(raw: &Value) -> String {
    match raw {
        Value::Array(names) => names
            .iter()
            .map(|name| match name.as_str() {
                Some(name) => quote_font_family(name),
                None => scalar_text(name),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Value::String(name) if name.starts_with('{') => name.clone(),
        Value::String(name) => quote_font_family(name),
        other => scalar_text(other),
    }
}

/// Numeric weights pass through; known keywords map to their weight
pub fn convert_font_weight(raw: &Value) -> String {
    match raw {
        Value::String(keyword) => font_weight_keyword(keyword)
            .map(|weight| weight.to_string())
            .unwrap_or_else(|| keyword.clone()),
        other => scalar_text(other),
    }
}
