//! Design tokens to CSS custom properties.
//!
//! The pipeline runs flatten, reference resolution, validation, conversion
//! and generation over token trees loaded by `tokenweave-resolver`.

pub mod config;
pub mod convert;
pub mod converters;
pub mod error;
pub mod generator;
pub mod pipeline;

pub use config::{
    ColorFallbackStrategy, FluidConfig, OutputConfig, TokenConfig, TransformsConfig,
    DEFAULT_CONFIG_NAME,
};
pub use convert::{convert_tokens, ConvertedContexts, ConvertedToken, ConvertedTokens};
pub use converters::{CssProperties, CssValue, FeatureValue};
pub use error::{CssError, CssResult};
pub use generator::{generate_css, selector_for, CssFile, CssRule, StyleSheet};
pub use pipeline::{compile_memory, compile_project, compile_resolver, compile_trees, CompileOutput};

#[cfg(feature = "async")]
pub use pipeline::compile_resolver_async;
