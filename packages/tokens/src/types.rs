use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The `$type` of a token.
///
/// Every known type has a converter in the CSS compiler; anything else is
/// kept as `Unknown` so forward-compatible token files still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenType {
    Color,
    Dimension,
    FluidDimension,
    Duration,
    CubicBezier,
    Number,
    FontFamily,
    FontWeight,
    Typography,
    Shadow,
    Border,
    Transition,
    Gradient,
    StrokeStyle,
    Unknown(String),
}

impl TokenType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "color" => TokenType::Color,
            "dimension" => TokenType::Dimension,
            "fluidDimension" => TokenType::FluidDimension,
            "duration" => TokenType::Duration,
            "cubicBezier" => TokenType::CubicBezier,
            "number" => TokenType::Number,
            "fontFamily" => TokenType::FontFamily,
            "fontWeight" => TokenType::FontWeight,
            "typography" => TokenType::Typography,
            "shadow" => TokenType::Shadow,
            "border" => TokenType::Border,
            "transition" => TokenType::Transition,
            "gradient" => TokenType::Gradient,
            "strokeStyle" => TokenType::StrokeStyle,
            other => TokenType::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TokenType::Color => "color",
            TokenType::Dimension => "dimension",
            TokenType::FluidDimension => "fluidDimension",
            TokenType::Duration => "duration",
            TokenType::CubicBezier => "cubicBezier",
            TokenType::Number => "number",
            TokenType::FontFamily => "fontFamily",
            TokenType::FontWeight => "fontWeight",
            TokenType::Typography => "typography",
            TokenType::Shadow => "shadow",
            TokenType::Border => "border",
            TokenType::Transition => "transition",
            TokenType::Gradient => "gradient",
            TokenType::StrokeStyle => "strokeStyle",
            TokenType::Unknown(name) => name,
        }
    }

    /// Whether a value of type `self` may stand where `expected` is required.
    ///
    /// Static dimensions and fluid dimensions are interchangeable.
    pub fn is_compatible_with(&self, expected: &TokenType) -> bool {
        match (self, expected) {
            (a, b) if a == b => true,
            (TokenType::Dimension, TokenType::FluidDimension)
            | (TokenType::FluidDimension, TokenType::Dimension) => true,
            _ => false,
        }
    }

    /// Expected type of a composite sub-property, where it is statically known.
    pub fn sub_property_type(&self, property: &str) -> Option<TokenType> {
        let ty = match (self, property) {
            (TokenType::Border, "color") => TokenType::Color,
            (TokenType::Border, "width") => TokenType::Dimension,
            (TokenType::Border, "style") => TokenType::StrokeStyle,
            (TokenType::Shadow, "color") => TokenType::Color,
            (TokenType::Shadow, "offsetX" | "offsetY" | "blur" | "spread") => {
                TokenType::Dimension
            }
            (TokenType::Transition, "duration" | "delay") => TokenType::Duration,
            (TokenType::Transition, "timingFunction") => TokenType::CubicBezier,
            (TokenType::Typography, "fontFamily") => TokenType::FontFamily,
            (TokenType::Typography, "fontSize" | "letterSpacing") => TokenType::Dimension,
            (TokenType::Typography, "fontWeight") => TokenType::FontWeight,
            (TokenType::Typography, "lineHeight") => TokenType::Number,
            (TokenType::Gradient, "color") => TokenType::Color,
            (TokenType::Gradient, "position") => TokenType::Number,
            (TokenType::StrokeStyle, "dashArray") => TokenType::Dimension,
            (TokenType::FluidDimension, "min" | "max") => TokenType::Dimension,
            _ => return None,
        };
        Some(ty)
    }
}

/// Numeric weight for a font-weight keyword (case-insensitive)
pub fn font_weight_keyword(keyword: &str) -> Option<u16> {
    let weight = match keyword.to_ascii_lowercase().as_str() {
        "thin" | "hairline" => 100,
        "extra-light" | "ultra-light" => 200,
        "light" => 300,
        "normal" | "regular" | "book" => 400,
        "medium" => 500,
        "semi-bold" | "demi-bold" => 600,
        "bold" => 700,
        "extra-bold" | "ultra-bold" => 800,
        "black" | "heavy" => 900,
        "extra-black" | "ultra-black" => 950,
        _ => return None,
    };
    Some(weight)
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TokenType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TokenType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(TokenType::from_name(&name))
    }
}
