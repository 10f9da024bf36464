use super::{format_number, ConvertInput, CssProperties};
use crate::config::ColorFallbackStrategy;
use crate::error::{CssError, CssResult};
use serde_json::Value;
use tokenweave_linter::is_hex_color;
use tokenweave_tokens::Reference;
use tracing::warn;

/// Color spaces without universal browser support, with their feature query
fn feature_query(space: &str) -> Option<&'static str> {
    match space {
        "oklch" => Some("@supports (color: oklch(0 0 0))"),
        "display-p3" => Some("@supports (color: color(display-p3 0 0 0))"),
        _ => None,
    }
}

pub fn convert_color(input: ConvertInput<'_>) -> CssResult<CssProperties> {
    if let Value::String(text) = input.raw {
        return Ok(CssProperties::single(color_string(input.path, text)));
    }

    let value = input.resolved;
    let space = color_space(input.path, value)?;
    let native = format_color(input.path, value)?;

    match (input.transforms.color_fallback_strategy, feature_query(space)) {
        (ColorFallbackStrategy::Polyfill, Some(query)) => {
            let hex = hex_fallback(input.path, space, value)?;
            Ok(CssProperties::single(hex).with_feature(query, native))
        }
        _ => Ok(CssProperties::single(native)),
    }
}

/// A color used inside a composite value. No feature query is possible
/// there, so the polyfill strategy falls back to the hex value alone.
pub(crate) fn color_text(input: ConvertInput<'_>) -> CssResult<String> {
    if let Value::String(text) = input.raw {
        return Ok(color_string(input.path, text));
    }

    let value = input.resolved;
    let space = color_space(input.path, value)?;
    let native = format_color(input.path, value)?;

    match (input.transforms.color_fallback_strategy, feature_query(space)) {
        (ColorFallbackStrategy::Polyfill, Some(_)) => hex_fallback(input.path, space, value),
        _ => Ok(native),
    }
}

fn color_string(path: &str, text: &str) -> String {
    if !is_hex_color(text) && Reference::parse(text).is_none() {
        warn!(path, value = text, "Color is not hex, passing through unchanged");
    }
    text.to_string()
}

fn color_space<'v>(path: &str, value: &'v Value) -> CssResult<&'v str> {
    value
        .get("colorSpace")
        .and_then(Value::as_str)
        .ok_or_else(|| CssError::invalid(path, "color", "missing 'colorSpace'"))
}

fn hex_fallback(path: &str, space: &str, value: &Value) -> CssResult<String> {
    value
        .get("hex")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| CssError::MissingHexFallback {
            path: path.to_string(),
            space: space.to_string(),
        })
}

/// Native CSS syntax for a structured color `{colorSpace, components, alpha?}`
pub fn format_color(path: &str, value: &Value) -> CssResult<String> {
    let space = color_space(path, value)?;
    let components: Vec<f64> = value
        .get("components")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_f64).collect())
        .unwrap_or_default();
    let [a, b, c] = components[..] else {
        return Err(CssError::invalid(path, "color", "expected three numeric components"));
    };

    let alpha = match value.get("alpha").and_then(Value::as_f64) {
        Some(alpha) if alpha != 1.0 => format!(" / {}", format_number(alpha)),
        _ => String::new(),
    };

    let channel = |v: f64| format!("{}", (v * 255.0).round() as i64);

    let css = match space {
        "srgb" => format!("rgb({} {} {}{})", channel(a), channel(b), channel(c), alpha),
        "display-p3" => format!(
            "color(display-p3 {} {} {}{})",
            format_number(a),
            format_number(b),
            format_number(c),
            alpha
        ),
        "oklch" => format!(
            "oklch({} {} {}{})",
            format_number(a),
            format_number(b),
            format_number(c),
            alpha
        ),
        "hsl" => format!(
            "hsl({} {}% {}%{})",
            format_number(a),
            format_number(b),
            format_number(c),
            alpha
        ),
        other => {
            return Err(CssError::UnsupportedColorSpace {
                path: path.to_string(),
                space: other.to_string(),
            })
        }
    };
    Ok(css)
}
