use super::color::color_text;
use super::{convert_dimension, ConvertInput};
use crate::error::CssResult;
use serde_json::Value;

/// One shadow or a layered list, as a `box-shadow` value
pub fn convert(input: ConvertInput<'_>) -> CssResult<String> {
    match input.raw {
        Value::Array(layers) => {
            let mut shadows = Vec::with_capacity(layers.len());
            for index in 0..layers.len() {
                if let Some(layer) = input.index(index) {
                    shadows.push(convert_layer(layer)?);
                }
            }
            Ok(shadows.join(", "))
        }
        _ => convert_layer(input),
    }
}

fn convert_layer(input: ConvertInput<'_>) -> CssResult<String> {
    if let Value::String(reference) = input.raw {
        return Ok(reference.clone());
    }

    let mut parts = Vec::with_capacity(6);
    if input.resolved.get("inset").and_then(Value::as_bool) == Some(true) {
        parts.push("inset".to_string());
    }

    for key in ["offsetX", "offsetY", "blur"] {
        let length = input
            .property(key)
            .map(|dimension| convert_dimension(dimension.raw))
            .unwrap_or_else(|| "0".to_string());
        parts.push(length);
    }
    if let Some(spread) = input.property("spread") {
        parts.push(convert_dimension(spread.raw));
    }
    if let Some(color) = input.property("color") {
        parts.push(color_text(color)?);
    }

    Ok(parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransformsConfig;
    use serde_json::json;

    fn shadow(raw: Value) -> String {
        let transforms = TransformsConfig::default();
        convert(ConvertInput {
            path: "shadow.card",
            raw: &raw,
            resolved: &raw,
            transforms: &transforms,
        })
        .unwrap()
    }

    #[test]
    fn test_single_shadow() {
        let raw = json!({
            "offsetX": { "value": 0, "unit": "px" },
            "offsetY": { "value": 2, "unit": "px" },
            "blur": { "value": 4, "unit": "px" },
            "spread": { "value": 0, "unit": "px" },
            "color": "#00000033"
        });
        assert_eq!(shadow(raw), "0px 2px 4px 0px #00000033");
    }

    #[test]
    fn test_layered_inset_shadow() {
        let raw = json!([
            {
                "offsetX": { "value": 0, "unit": "px" },
                "offsetY": { "value": 1, "unit": "px" },
                "blur": { "value": 2, "unit": "px" },
                "color": "{color.shadow}"
            },
            {
                "inset": true,
                "offsetX": { "value": 0, "unit": "px" },
                "offsetY": { "value": 0, "unit": "px" },
                "blur": { "value": 1, "unit": "px" },
                "color": "#ffffff"
            }
        ]);
        assert_eq!(
            shadow(raw),
            "0px 1px 2px {color.shadow}, inset 0px 0px 1px #ffffff"
        );
    }
}
