use crate::error::{CssError, CssResult};
use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "tokens.config.json";

/// Token compiler configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenConfig {
    /// Resolver document, relative to the config directory
    #[serde(default = "default_resolver")]
    pub resolver: String,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub transforms: TransformsConfig,

    /// Explicit context selections (modifier -> context)
    #[serde(default)]
    pub modifiers: IndexMap<String, String>,
}

fn default_resolver() -> String {
    "tokens.resolver.json".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    /// Output directory for generated stylesheets
    #[serde(default = "default_css_dir")]
    pub css: String,

    #[serde(default = "default_variables_file")]
    pub variables_file: String,

    /// Emit one stylesheet per source file instead of a single one
    #[serde(default)]
    pub separate: bool,

    /// Attribute for contexts that belong to no declared modifier
    #[serde(default = "default_theme_attribute")]
    pub theme_attribute: String,
}

fn default_css_dir() -> String {
    "src/styles/tokens".to_string()
}

fn default_variables_file() -> String {
    "tokens.variables.css".to_string()
}

fn default_theme_attribute() -> String {
    "data-theme".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            css: default_css_dir(),
            variables_file: default_variables_file(),
            separate: false,
            theme_attribute: default_theme_attribute(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformsConfig {
    #[serde(default)]
    pub fluid: FluidConfig,

    #[serde(default)]
    pub color_fallback_strategy: ColorFallbackStrategy,
}

/// Viewport range in px over which fluid dimensions interpolate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluidConfig {
    #[serde(default = "default_fluid_min")]
    pub min: f64,

    #[serde(default = "default_fluid_max")]
    pub max: f64,
}

fn default_fluid_min() -> f64 {
    320.0
}

fn default_fluid_max() -> f64 {
    1200.0
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            min: default_fluid_min(),
            max: default_fluid_max(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFallbackStrategy {
    #[default]
    Native,
    /// Hex primary value plus an `@supports` enhancement
    Polyfill,
}

impl TokenConfig {
    /// Load config from a directory
    pub fn load(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if !config_path.exists() {
            return Ok(TokenConfig::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: TokenConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CssResult<()> {
        let FluidConfig { min, max } = self.transforms.fluid;
        if !(min > 0.0 && max > 0.0) {
            return Err(CssError::InvalidConfig {
                message: format!("fluid viewport bounds must be positive (min {}, max {})", min, max),
            });
        }
        if min >= max {
            return Err(CssError::InvalidConfig {
                message: format!("fluid.min ({}) must be less than fluid.max ({})", min, max),
            });
        }
        Ok(())
    }

    pub fn resolver_path(&self, dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join(&self.resolver)
    }
}

impl OutputConfig {
    pub fn variables_path(&self) -> PathBuf {
        Path::new(&self.css).join(&self.variables_file)
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            resolver: default_resolver(),
            output: OutputConfig::default(),
            transforms: TransformsConfig::default(),
            modifiers: IndexMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "resolver": "design/tokens.resolver.json",
            "output": { "css": "dist", "separate": true },
            "transforms": {
                "fluid": { "min": 360, "max": 1440 },
                "colorFallbackStrategy": "polyfill"
            },
            "modifiers": { "theme": "dark" }
        }"#;

        let config: TokenConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.resolver, "design/tokens.resolver.json");
        assert_eq!(config.output.css, "dist");
        assert!(config.output.separate);
        assert_eq!(config.output.variables_file, "tokens.variables.css");
        assert_eq!(config.output.theme_attribute, "data-theme");
        assert_eq!(config.transforms.fluid.min, 360.0);
        assert_eq!(
            config.transforms.color_fallback_strategy,
            ColorFallbackStrategy::Polyfill
        );
        assert_eq!(config.modifiers.get("theme").map(String::as_str), Some("dark"));
    }

    #[test]
    fn test_default_config() {
        let config = TokenConfig::default();
        assert_eq!(config.resolver, "tokens.resolver.json");
        assert_eq!(config.transforms.fluid, FluidConfig { min: 320.0, max: 1200.0 });
        assert_eq!(
            config.transforms.color_fallback_strategy,
            ColorFallbackStrategy::Native
        );
        assert_eq!(
            config.output.variables_path(),
            Path::new("src/styles/tokens/tokens.variables.css")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_uses_default() {
        let dir = TempDir::new().unwrap();
        let config = TokenConfig::load(dir.path()).unwrap();
        assert_eq!(config, TokenConfig::default());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "output": { "themeAttribute": "data-mode" } }"#,
        )
        .unwrap();

        let config = TokenConfig::load(dir.path()).unwrap();
        assert_eq!(config.output.theme_attribute, "data-mode");
        assert_eq!(
            config.resolver_path(dir.path()),
            dir.path().join("tokens.resolver.json")
        );
    }

    #[test]
    fn test_load_rejects_inverted_viewport() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "transforms": { "fluid": { "min": 1200, "max": 320 } } }"#,
        )
        .unwrap();

        let err = TokenConfig::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("fluid.min"));
    }

    #[test]
    fn test_validate_rejects_non_positive_bounds() {
        let mut config = TokenConfig::default();
        config.transforms.fluid.min = 0.0;
        assert!(matches!(config.validate(), Err(CssError::InvalidConfig { .. })));
    }
}
