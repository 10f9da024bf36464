/// Value converters
///
/// One converter per token type. Converters work on the token's raw value so
/// that any `{reference}` can be carried through untouched; the generator
/// later turns it into a `var(--...)` indirection.
mod border;
mod color;
mod dimension;
mod fluid;
mod font;
mod gradient;
mod shadow;
mod stroke;
mod transition;
mod typography;

pub use color::{convert_color, format_color};
pub use dimension::{
    convert_cubic_bezier, convert_dimension, convert_duration, convert_number, format_dimension,
};
pub use fluid::{convert_fluid, to_rem};
pub use font::{convert_font_family, convert_font_weight, quote_font_family};

use crate::config::TransformsConfig;
use crate::error::CssResult;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokenweave_tokens::{is_reference, TokenType};

/// A converted CSS value: one declaration, or one per sub-property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CssValue {
    Single(String),
    Map(IndexMap<String, String>),
}

/// An alternative value guarded by a feature query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureValue {
    /// Full at-rule prelude, e.g. `@supports (color: oklch(0 0 0))`
    pub query: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CssProperties {
    pub value: CssValue,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feature_values: Vec<FeatureValue>,
}

impl CssProperties {
    pub fn single(value: impl Into<String>) -> Self {
        Self {
            value: CssValue::Single(value.into()),
            feature_values: Vec::new(),
        }
    }

    pub fn map(entries: IndexMap<String, String>) -> Self {
        Self {
            value: CssValue::Map(entries),
            feature_values: Vec::new(),
        }
    }

    pub fn with_feature(mut self, query: impl Into<String>, value: impl Into<String>) -> Self {
        self.feature_values.push(FeatureValue {
            query: query.into(),
            value: value.into(),
        });
        self
    }

    pub fn as_single(&self) -> Option<&str> {
        match &self.value {
            CssValue::Single(value) => Some(value),
            CssValue::Map(_) => None,
        }
    }
}

/// What a converter sees of one token
#[derive(Debug, Clone, Copy)]
pub struct ConvertInput<'a> {
    pub path: &'a str,
    /// `$value` as written, references intact
    pub raw: &'a Value,
    /// `$value` with every reference substituted
    pub resolved: &'a Value,
    pub transforms: &'a TransformsConfig,
}

impl<'a> ConvertInput<'a> {
    /// The same token narrowed to one property of its value
    pub(crate) fn property(&self, key: &str) -> Option<ConvertInput<'a>> {
        let raw = self.raw.get(key)?;
        Some(ConvertInput {
            path: self.path,
            raw,
            resolved: self.resolved.get(key).unwrap_or(raw),
            transforms: self.transforms,
        })
    }

    pub(crate) fn index(&self, index: usize) -> Option<ConvertInput<'a>> {
        let raw = self.raw.get(index)?;
        Some(ConvertInput {
            path: self.path,
            raw,
            resolved: self.resolved.get(index).unwrap_or(raw),
            transforms: self.transforms,
        })
    }
}

/// Convert one token value by its type. `None` means the type has no CSS form.
pub fn convert_value(token_type: &TokenType, input: ConvertInput<'_>) -> CssResult<Option<CssProperties>> {
    // Whole-token aliases stay references; typography keeps its decomposition
    if let Some(reference) = input.raw.as_str().filter(|_| is_reference(input.raw)) {
        return Ok(Some(match token_type {
            TokenType::Typography => typography::alias(reference, input.resolved),
            _ => CssProperties::single(reference),
        }));
    }

    let converted = match token_type {
        TokenType::Color => convert_color(input)?,
        TokenType::Dimension => CssProperties::single(convert_dimension(input.raw)),
        TokenType::FluidDimension => convert_fluid(input)?,
        TokenType::Duration => CssProperties::single(convert_duration(input.raw)),
        TokenType::CubicBezier => CssProperties::single(convert_cubic_bezier(input.raw)),
        TokenType::Number => CssProperties::single(convert_number(input.raw)),
        TokenType::FontFamily => CssProperties::single(convert_font_family(input.raw)),
        TokenType::FontWeight => CssProperties::single(convert_font_weight(input.raw)),
        TokenType::Typography => typography::convert(input)?,
        TokenType::Shadow => CssProperties::single(shadow::convert(input)?),
        TokenType::Border => CssProperties::single(border::convert(input)?),
        TokenType::Transition => CssProperties::single(transition::convert(input)),
        TokenType::Gradient => CssProperties::single(gradient::convert(input)?),
        TokenType::StrokeStyle => CssProperties::single(stroke::convert(input.raw)),
        TokenType::Unknown(_) => return Ok(None),
    };
    Ok(Some(converted))
}

/// Shortest decimal text for a number (`16`, `0.5`, `328.363`)
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    format!("{}", value)
}

/// Round to `places` decimals, then format
pub fn format_rounded(value: f64, places: i32) -> String {
    let factor = 10f64.powi(places);
    format_number((value * factor).round() / factor)
}

/// A JSON scalar as CSS text; references and strings pass through
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.as_f64().map(format_number).unwrap_or_default(),
        Value::Bool(flag) => flag.to_string(),
        other => other.to_string(),
    }
}
