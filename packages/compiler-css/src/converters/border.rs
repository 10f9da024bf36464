use super::color::color_text;
use super::{convert_dimension, stroke, ConvertInput};
use crate::error::CssResult;

/// `width style color`
pub fn convert(input: ConvertInput<'_>) -> CssResult<String> {
    let mut parts = Vec::with_capacity(3);

    if let Some(width) = input.property("width") {
        parts.push(convert_dimension(width.raw));
    }
    if let Some(style) = input.property("style") {
        parts.push(stroke::convert(style.raw));
    }
    if let Some(color) = input.property("color") {
        parts.push(color_text(color)?);
    }

    Ok(parts.join(" "))
}
