use super::{
    convert_dimension, convert_fluid, convert_font_family, convert_font_weight, ConvertInput,
    CssProperties,
};
use crate::error::CssResult;
use indexmap::IndexMap;
use serde_json::Value;
use tokenweave_tokens::Reference;
use tracing::debug;

/// Typography sub-properties and the CSS property each one decomposes to
const PROPERTIES: &[(&str, &str)] = &[
    ("fontFamily", "font-family"),
    ("fontSize", "font-size"),
    ("fontWeight", "font-weight"),
    ("letterSpacing", "letter-spacing"),
    ("lineHeight", "line-height"),
];

/// One entry per sub-property, emitted as `--<path>-<property>`
pub fn convert(input: ConvertInput<'_>) -> CssResult<CssProperties> {
    let mut entries = IndexMap::new();

    for (key, property) in PROPERTIES {
        let Some(sub) = input.property(key) else {
            continue;
        };
        let css = match *key {
            "fontFamily" => convert_font_family(sub.raw),
            "fontWeight" => convert_font_weight(sub.raw),
            "fontSize" if is_fluid(sub) => {
                let fluid = convert_fluid(sub)?;
                fluid.as_single().unwrap_or_default().to_string()
            }
            _ => convert_dimension(sub.raw),
        };
        entries.insert(property.to_string(), css);
    }

    if let Some(map) = input.raw.as_object() {
        let known = |key: &str| PROPERTIES.iter().any(|(k, _)| *k == key);
        for key in map.keys().filter(|key| !known(key.as_str())) {
            debug!(path = input.path, property = %key, "Skipping unknown typography property");
        }
    }

    Ok(CssProperties::map(entries))
}

/// A typography alias points each sub-property at the referenced token's own
/// decomposed declarations
pub fn alias(reference: &str, resolved: &Value) -> CssProperties {
    let Some(target) = Reference::parse(reference) else {
        return CssProperties::single(reference);
    };

    let entries = PROPERTIES
        .iter()
        .filter(|(key, _)| resolved.get(key).is_some())
        .map(|(_, property)| {
            (
                property.to_string(),
                format!("{{{}.{}}}", target.path(), property),
            )
        })
        .collect();
    CssProperties::map(entries)
}

fn is_fluid(input: ConvertInput<'_>) -> bool {
    !input.raw.is_string()
        && input.resolved.get("min").is_some()
        && input.resolved.get("max").is_some()
}
