use super::{format_rounded, ConvertInput, CssProperties};
use crate::error::{CssError, CssResult};
use serde_json::Value;

/// Root font size used to normalize px to rem
pub const ROOT_FONT_SIZE: f64 = 16.0;

/// A `{value, unit}` dimension in rem, for the units that have a fixed rem ratio
pub fn to_rem(dimension: &Value) -> Option<f64> {
    let value = dimension.get("value")?.as_f64()?;
    match dimension.get("unit")?.as_str()? {
        "px" => Some(value / ROOT_FONT_SIZE),
        "rem" | "em" => Some(value),
        _ => None,
    }
}

/// `{min, max}` interpolated across the configured viewport range.
///
/// Equal bounds give a static rem value; otherwise
/// `clamp(<min>rem, <intercept>rem + <slope*100>vw, <max>rem)`.
pub fn convert_fluid(input: ConvertInput<'_>) -> CssResult<CssProperties> {
    let bound = |key: &str| {
        input
            .resolved
            .get(key)
            .and_then(to_rem)
            .ok_or_else(|| {
                CssError::invalid(
                    input.path,
                    "fluidDimension",
                    format!("'{}' must be a px, rem or em dimension", key),
                )
            })
    };
    let min = bound("min")?;
    let max = bound("max")?;

    if (max - min).abs() < f64::EPSILON {
        return Ok(CssProperties::single(format!("{}rem", format_rounded(min, 4))));
    }

    let fluid = input.transforms.fluid;
    let viewport_min = fluid.min / ROOT_FONT_SIZE;
    let viewport_max = fluid.max / ROOT_FONT_SIZE;

    let slope = (max - min) / (viewport_max - viewport_min);
    let intercept = min - slope * viewport_min;
    let (lower, upper) = if min <= max { (min, max) } else { (max, min) };

    Ok(CssProperties::single(format!(
        "clamp({}rem, {}rem + {}vw, {}rem)",
        format_rounded(lower, 4),
        format_rounded(intercept, 2),
        format_rounded(slope * 100.0, 2),
        format_rounded(upper, 4)
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FluidConfig, TransformsConfig};
    use serde_json::json;

    fn convert(value: Value, fluid: FluidConfig) -> CssResult<CssProperties> {
        let transforms = TransformsConfig {
            fluid,
            ..TransformsConfig::default()
        };
        convert_fluid(ConvertInput {
            path: "size.heading",
            raw: &value,
            resolved: &value,
            transforms: &transforms,
        })
    }

    #[test]
    fn test_equal_bounds_are_static() {
        let value = json!({
            "min": { "value": 16, "unit": "px" },
            "max": { "value": 16, "unit": "px" }
        });
        let css = convert(value, FluidConfig::default()).unwrap();
        assert_eq!(css.as_single(), Some("1rem"));
    }

    #[test]
    fn test_clamp_expression() {
        let value = json!({
            "min": { "value": 16, "unit": "px" },
            "max": { "value": 32, "unit": "px" }
        });
        let css = convert(value, FluidConfig { min: 320.0, max: 1200.0 }).unwrap();
        assert_eq!(css.as_single(), Some("clamp(1rem, 0.64rem + 1.82vw, 2rem)"));
    }

    #[test]
    fn test_slope_matches_viewport_range() {
        let slope = (2.0 - 1.0) / ((1200.0 - 320.0) / ROOT_FONT_SIZE);
        let value = json!({
            "min": { "value": 1, "unit": "rem" },
            "max": { "value": 2, "unit": "rem" }
        });
        let css = convert(value, FluidConfig::default()).unwrap();
        let expected = format!("+ {}vw", format_rounded(slope * 100.0, 2));
        assert!(css.as_single().unwrap().contains(&expected));
    }

    #[test]
    fn test_shrinking_range_keeps_clamp_order() {
        let value = json!({
            "min": { "value": 2, "unit": "rem" },
            "max": { "value": 1, "unit": "rem" }
        });
        let css = convert(value, FluidConfig::default()).unwrap();
        let text = css.as_single().unwrap();
        assert!(text.starts_with("clamp(1rem, "));
        assert!(text.ends_with(", 2rem)"));
        assert!(text.contains("-1.82vw"));
    }

    #[test]
    fn test_unsupported_unit_is_an_error() {
        let value = json!({
            "min": { "value": 10, "unit": "vh" },
            "max": { "value": 20, "unit": "vh" }
        });
        assert!(matches!(
            convert(value, FluidConfig::default()),
            Err(CssError::InvalidValue { .. })
        ));
    }
}
