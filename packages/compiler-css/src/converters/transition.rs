use super::{convert_cubic_bezier, convert_duration, ConvertInput};

/// `duration timing delay`, skipping absent parts
pub fn convert(input: ConvertInput<'_>) -> String {
    let mut parts = Vec::with_capacity(3);

    if let Some(duration) = input.property("duration") {
        parts.push(convert_duration(duration.raw));
    }
    if let Some(timing) = input.property("timingFunction") {
        parts.push(convert_cubic_bezier(timing.raw));
    }
    if let Some(delay) = input.property("delay") {
        parts.push(convert_duration(delay.raw));
    }

    parts.join(" ")
}
