//! Required fields and sub-property values of composite tokens.
//!
//! Sub-property issues are nested under the property name, so a bad
//! `fontSize` in `typography.body` is reported at `typography.body.fontSize`.

use crate::rules::color::check_color;
use crate::rules::cubic_bezier::check_cubic_bezier;
use crate::rules::dimension::check_dimension;
use crate::rules::duration::check_duration;
use crate::rules::fluid::check_size;
use crate::rules::font_weight::check_font_weight;
use crate::rules::{nested, number, Issue, LintRule};
use serde_json::{Map, Value};
use tokenweave_tokens::TokenType;

type PropertyCheck = fn(&Value) -> Vec<Issue>;

const BORDER: &[(&str, bool, PropertyCheck)] = &[
    ("color", true, check_color),
    ("width", true, check_dimension),
    ("style", true, check_stroke_style),
];

const SHADOW: &[(&str, bool, PropertyCheck)] = &[
    ("color", true, check_color),
    ("offsetX", true, check_dimension),
    ("offsetY", true, check_dimension),
    ("blur", true, check_dimension),
    ("spread", false, check_dimension),
    ("inset", false, check_bool),
];

const TRANSITION: &[(&str, bool, PropertyCheck)] = &[
    ("duration", true, check_duration),
    ("delay", false, check_duration),
    ("timingFunction", true, check_cubic_bezier),
];

const TYPOGRAPHY: &[(&str, bool, PropertyCheck)] = &[
    ("fontFamily", true, check_font_family),
    ("fontSize", true, check_size),
    ("fontWeight", false, check_font_weight),
    ("letterSpacing", false, check_dimension),
    ("lineHeight", false, check_line_height),
];

const GRADIENT_STOP: &[(&str, bool, PropertyCheck)] = &[
    ("color", true, check_color),
    ("position", true, check_position),
];

const STROKE_KEYWORDS: [&str; 8] = [
    "solid", "dashed", "dotted", "double", "groove", "ridge", "outset", "inset",
];

pub struct CompositeRule;

impl LintRule for CompositeRule {
    fn name(&self) -> &'static str {
        "composite-fields"
    }

    fn description(&self) -> &'static str {
        "Composite tokens must carry their required fields with valid values"
    }

    fn applies_to(&self, token_type: &TokenType) -> bool {
        matches!(
            token_type,
            TokenType::Border
                | TokenType::Shadow
                | TokenType::Transition
                | TokenType::Typography
                | TokenType::Gradient
        )
    }

    fn check_value(&self, token_type: &TokenType, value: &Value) -> Vec<Issue> {
        match token_type {
            TokenType::Border => check_fields("Border", value, BORDER),
            TokenType::Shadow => check_shadow(value),
            TokenType::Transition => check_fields("Transition", value, TRANSITION),
            TokenType::Typography => check_fields("Typography", value, TYPOGRAPHY),
            TokenType::Gradient => check_gradient(value),
            _ => Vec::new(),
        }
    }
}

fn check_fields(kind: &str, value: &Value, fields: &[(&str, bool, PropertyCheck)]) -> Vec<Issue> {
    let Some(map) = value.as_object() else {
        return vec![Issue::error(format!("{} value must be an object", kind))];
    };
    check_map(kind, map, fields)
}

fn check_map(kind: &str, map: &Map<String, Value>, fields: &[(&str, bool, PropertyCheck)]) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (name, required, check) in fields {
        match map.get(*name) {
            Some(property) => issues.extend(nested(check(property), name)),
            None if *required => {
                issues.push(Issue::error(format!("{} is missing '{}'", kind, name)).at(name))
            }
            None => {}
        }
    }
    issues
}

fn check_shadow(value: &Value) -> Vec<Issue> {
    match value {
        Value::Array(layers) if !layers.is_empty() => layers
            .iter()
            .enumerate()
            .flat_map(|(index, layer)| {
                nested(check_fields("Shadow", layer, SHADOW), &index.to_string())
            })
            .collect(),
        Value::Array(_) => vec![Issue::error("Shadow list must not be empty")],
        _ => check_fields("Shadow", value, SHADOW),
    }
}

fn check_gradient(value: &Value) -> Vec<Issue> {
    match value {
        Value::Array(stops) => check_stops(stops),
        Value::Object(map) => match map.get("stops").and_then(Value::as_array) {
            Some(stops) => nested(check_stops(stops), "stops"),
            None => vec![Issue::error("Gradient is missing 'stops'").at("stops")],
        },
        _ => vec![Issue::error("Gradient must be a list of stops or an object with 'stops'")],
    }
}

fn check_stops(stops: &[Value]) -> Vec<Issue> {
    if stops.len() < 2 {
        return vec![Issue::error("Gradient needs at least two stops")];
    }
    stops
        .iter()
        .enumerate()
        .flat_map(|(index, stop)| {
            nested(check_fields("Gradient stop", stop, GRADIENT_STOP), &index.to_string())
        })
        .collect()
}

fn check_stroke_style(value: &Value) -> Vec<Issue> {
    match value {
        Value::String(keyword) if STROKE_KEYWORDS.contains(&keyword.as_str()) => Vec::new(),
        Value::String(keyword) => vec![Issue::error(format!("Unknown stroke style '{}'", keyword))],
        Value::Object(map) if map.contains_key("dashArray") => Vec::new(),
        _ => vec![Issue::error("Stroke style must be a keyword or an object with 'dashArray'")],
    }
}

fn check_font_family(value: &Value) -> Vec<Issue> {
    let valid = match value {
        Value::String(name) => !name.trim().is_empty(),
        Value::Array(names) => !names.is_empty() && names.iter().all(Value::is_string),
        _ => false,
    };
    if valid {
        Vec::new()
    } else {
        vec![Issue::error("Font family must be a name or a list of names")]
    }
}

fn check_line_height(value: &Value) -> Vec<Issue> {
    if number(value).is_some() {
        Vec::new()
    } else {
        check_dimension(value)
    }
}

fn check_position(value: &Value) -> Vec<Issue> {
    match number(value) {
        Some(p) if (0.0..=1.0).contains(&p) => Vec::new(),
        _ => vec![Issue::error("Gradient stop position must be a number between 0 and 1")],
    }
}

fn check_bool(value: &Value) -> Vec<Issue> {
    if value.is_boolean() {
        Vec::new()
    } else {
        vec![Issue::error("Expected true or false")]
    }
}
