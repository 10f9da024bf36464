use super::color::color_text;
use super::{format_number, scalar_text, ConvertInput};
use crate::error::CssResult;
use serde_json::Value;

/// A stop list (`[{color, position}]`) or `{type, angle, stops}` as a CSS gradient
pub fn convert(input: ConvertInput<'_>) -> CssResult<String> {
    let (kind, angle, stops) = match input.raw {
        Value::Array(_) => ("linear", None, input),
        _ => {
            let kind = input
                .resolved
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("linear");
            let Some(stops) = input.property("stops") else {
                return Ok(format!("{}-gradient()", kind));
            };
            (kind, input.property("angle").map(|angle| angle_text(angle.raw)), stops)
        }
    };

    let count = stops.raw.as_array().map_or(0, Vec::len);
    let mut parts = Vec::with_capacity(count + 1);
    if let Some(angle) = angle {
        parts.push(match kind {
            "conic" => format!("from {}", angle),
            _ => angle,
        });
    }
    for index in 0..count {
        if let Some(stop) = stops.index(index) {
            parts.push(stop_text(stop)?);
        }
    }

    Ok(format!("{}-gradient({})", kind, parts.join(", ")))
}

fn angle_text(raw: &Value) -> String {
    match raw {
        Value::Number(_) => format!("{}deg", scalar_text(raw)),
        other => scalar_text(other),
    }
}

/// `color position%`; positions are fractions of the gradient line
fn stop_text(stop: ConvertInput<'_>) -> CssResult<String> {
    let color = match stop.property("color") {
        Some(color) => color_text(color)?,
        None => "transparent".to_string(),
    };

    let position = stop.property("position").map(|position| match position.raw {
        Value::Number(number) => {
            format!("{}%", format_number(number.as_f64().unwrap_or_default() * 100.0))
        }
        Value::String(reference) => format!("calc({} * 100%)", reference),
        other => scalar_text(other),
    });

    Ok(match position {
        Some(position) => format!("{} {}", color, position),
        None => color,
    })
}
