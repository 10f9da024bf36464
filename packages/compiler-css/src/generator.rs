use crate::config::OutputConfig;
use crate::convert::{ConvertedContexts, ConvertedToken};
use crate::converters::CssValue;
use indexmap::IndexMap;
use regex::{Captures, Regex};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tokenweave_resolver::ModifierMeta;
use tokenweave_tokens::{css_variable_name, KebabCache, Reference, TokenContext};
use tracing::{debug, info, instrument, warn};

/// A generated stylesheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CssFile {
    pub path: PathBuf,
    pub css: String,
}

/// A selector block of declarations, optionally behind a feature query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssRule {
    pub selector: String,
    pub properties: Vec<(String, String)>,
    pub feature_query: Option<String>,
}

/// In-memory stylesheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSheet {
    pub rules: Vec<CssRule>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule(&mut self, rule: CssRule) {
        self.rules.push(rule);
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn to_css(&self) -> String {
        let mut css = String::new();

        for rule in &self.rules {
            let indent = match &rule.feature_query {
                Some(query) => {
                    css.push_str(query);
                    css.push_str(" {\n  ");
                    "    "
                }
                None => "  ",
            };

            css.push_str(&rule.selector);
            css.push_str(" {\n");

            for (key, value) in &rule.properties {
                css.push_str(indent);
                css.push_str(key);
                css.push_str(": ");
                css.push_str(value);
                css.push_str(";\n");
            }

            if rule.feature_query.is_some() {
                css.push_str("  }\n");
            }
            css.push_str("}\n\n");
        }

        css
    }
}

/// Selector for a context: `:root` for the base, an attribute selector otherwise
pub fn selector_for(context: &TokenContext, modifiers: &[ModifierMeta], theme_attribute: &str) -> String {
    match context {
        TokenContext::Base => ":root".to_string(),
        TokenContext::Variant {
            modifier: Some(modifier),
            name,
        } => {
            let attribute = modifiers
                .iter()
                .find(|meta| &meta.name == modifier)
                .map(|meta| meta.attribute.clone())
                .unwrap_or_else(|| ModifierMeta::attribute_for(modifier));
            format!("[{}=\"{}\"]", attribute, name)
        }
        TokenContext::Variant {
            modifier: None,
            name,
        } => format!("[{}=\"{}\"]", theme_attribute, name),
    }
}

/// Render converted tokens as stylesheets.
///
/// Each context becomes one selector block followed by one `@supports`
/// block per feature query its tokens use. Contexts without tokens emit
/// nothing. With `output.separate`, tokens are split by their source file.
#[instrument(skip_all, fields(contexts = converted.len(), separate = output.separate))]
pub fn generate_css(
    converted: &ConvertedContexts,
    modifiers: &[ModifierMeta],
    output: &OutputConfig,
    cache: &mut KebabCache,
) -> Vec<CssFile> {
    let mut sheets: IndexMap<PathBuf, StyleSheet> = IndexMap::new();

    for (context, tokens) in converted {
        if tokens.is_empty() {
            warn!(context = %context, "Dropping context with no tokens");
            continue;
        }

        let selector = selector_for(context, modifiers, &output.theme_attribute);
        debug!(context = %context, selector = %selector, tokens = tokens.len(), "Emitting context");

        let mut groups: IndexMap<PathBuf, Vec<&ConvertedToken>> = IndexMap::new();
        for token in tokens.tokens.values() {
            let target = if output.separate {
                separate_path(output, &token.source.path, cache)
            } else {
                output.variables_path()
            };
            groups.entry(target).or_default().push(token);
        }

        for (target, group) in groups {
            let sheet = sheets.entry(target).or_default();
            for rule in context_rules(&selector, &group, cache) {
                sheet.add_rule(rule);
            }
        }
    }

    let files: Vec<CssFile> = sheets
        .into_iter()
        .map(|(path, sheet)| CssFile {
            path,
            css: sheet.to_css(),
        })
        .collect();

    info!(files = files.len(), "CSS generation complete");
    files
}

/// The selector block for `tokens`, then its feature-query blocks
fn context_rules(selector: &str, tokens: &[&ConvertedToken], cache: &mut KebabCache) -> Vec<CssRule> {
    let mut properties = Vec::new();
    let mut features: IndexMap<String, Vec<(String, String)>> = IndexMap::new();

    for token in tokens {
        let name = css_variable_name(&token.path, cache);

        match &token.css.value {
            CssValue::Single(value) => {
                properties.push((name.clone(), render_value(value, cache)));
            }
            CssValue::Map(entries) => {
                for (key, value) in entries {
                    let property = format!("{}-{}", name, cache.kebab(key));
                    properties.push((property, render_value(value, cache)));
                }
            }
        }

        for feature in &token.css.feature_values {
            let value = render_value(&feature.value, cache);
            features
                .entry(feature.query.clone())
                .or_default()
                .push((name.clone(), value));
        }
    }

    let mut rules = vec![CssRule {
        selector: selector.to_string(),
        properties,
        feature_query: None,
    }];
    rules.extend(features.into_iter().map(|(query, properties)| CssRule {
        selector: selector.to_string(),
        properties,
        feature_query: Some(query),
    }));
    rules
}

/// Replace every `{path}` in a value with `var(--path)`
pub fn render_value(value: &str, cache: &mut KebabCache) -> String {
    static REFERENCE: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(pattern) = REFERENCE
        .get_or_init(|| Regex::new(r"\{[^{}\s]+\}").ok())
        .as_ref()
    else {
        return value.to_string();
    };

    pattern
        .replace_all(value, |caps: &Captures<'_>| match Reference::parse(&caps[0]) {
            Some(reference) => format!("var({})", css_variable_name(reference.path(), cache)),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// `<css>/<kebab(stem)>.variables.css` for a token source file
fn separate_path(output: &OutputConfig, source: &Path, cache: &mut KebabCache) -> PathBuf {
    let stem = source
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("tokens");
    let stem = stem.strip_suffix(".tokens").unwrap_or(stem);
    Path::new(&output.css).join(format!("{}.variables.css", cache.kebab(stem)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ConvertedTokens;
    use crate::converters::CssProperties;
    use tokenweave_tokens::{TokenSource, TokenType};

    fn token(path: &str, css: CssProperties, context: &TokenContext, file: &str) -> ConvertedToken {
        ConvertedToken {
            path: path.to_string(),
            token_type: TokenType::Color,
            source: TokenSource::new(file, context.clone()),
            css,
        }
    }

    fn contexts(entries: Vec<(TokenContext, Vec<ConvertedToken>)>) -> ConvertedContexts {
        entries
            .into_iter()
            .map(|(context, tokens)| {
                let mut converted = ConvertedTokens::new(context.clone());
                for token in tokens {
                    converted.tokens.insert(token.path.clone(), token);
                }
                (context, converted)
            })
            .collect()
    }

    #[test]
    fn test_style_sheet_to_css() {
        let mut sheet = StyleSheet::new();
        sheet.add_rule(CssRule {
            selector: ":root".to_string(),
            properties: vec![("--gap".to_string(), "4px".to_string())],
            feature_query: None,
        });
        sheet.add_rule(CssRule {
            selector: ":root".to_string(),
            properties: vec![("--ink".to_string(), "oklch(0.5 0.1 200)".to_string())],
            feature_query: Some("@supports (color: oklch(0 0 0))".to_string()),
        });

        assert_eq!(
            sheet.to_css(),
            ":root {\n  --gap: 4px;\n}\n\n\
             @supports (color: oklch(0 0 0)) {\n  :root {\n    --ink: oklch(0.5 0.1 200);\n  }\n}\n\n"
        );
    }

    #[test]
    fn test_render_value_references() {
        let mut cache = KebabCache::new();
        assert_eq!(
            render_value("1px solid {color.lineStrong}", &mut cache),
            "1px solid var(--color-line-strong)"
        );
        assert_eq!(render_value("#ffffff", &mut cache), "#ffffff");
    }

    #[test]
    fn test_context_emission() {
        let dark = TokenContext::named("dark");
        let converted = contexts(vec![
            (
                TokenContext::Base,
                vec![token("color.bg", CssProperties::single("#ffffff"), &TokenContext::Base, "base.json")],
            ),
            (
                dark.clone(),
                vec![token("color.bg", CssProperties::single("#000000"), &dark, "dark.json")],
            ),
            (TokenContext::named("empty"), Vec::new()),
        ]);

        let files = generate_css(&converted, &[], &OutputConfig::default(), &mut KebabCache::new());
        assert_eq!(files.len(), 1);
        let css = &files[0].css;
        assert_eq!(css.matches(":root {").count(), 1);
        assert_eq!(css.matches("[data-theme=\"dark\"] {").count(), 1);
        assert!(!css.contains("empty"));
        assert!(css.contains("  --color-bg: #000000;\n"));
    }

    #[test]
    fn test_modifier_contexts_use_modifier_attribute() {
        let modifiers = vec![ModifierMeta {
            name: "colorScheme".to_string(),
            attribute: "data-color-scheme".to_string(),
            default_context: Some("light".to_string()),
            selected_context: "light".to_string(),
            contexts: vec!["dark".to_string()],
        }];

        assert_eq!(
            selector_for(&TokenContext::modifier("colorScheme", "dark"), &modifiers, "data-theme"),
            "[data-color-scheme=\"dark\"]"
        );
        assert_eq!(
            selector_for(&TokenContext::modifier("density", "compact"), &modifiers, "data-theme"),
            "[data-density=\"compact\"]"
        );
    }

    #[test]
    fn test_decomposed_and_feature_values() {
        let mut entries = IndexMap::new();
        entries.insert("font-family".to_string(), "{font.body}".to_string());
        entries.insert("font-size".to_string(), "1rem".to_string());

        let converted = contexts(vec![(
            TokenContext::Base,
            vec![
                token("type.body", CssProperties::map(entries), &TokenContext::Base, "t.json"),
                token(
                    "color.brand",
                    CssProperties::single("#ff00ff")
                        .with_feature("@supports (color: oklch(0 0 0))", "oklch(0.7 0.3 328)"),
                    &TokenContext::Base,
                    "t.json",
                ),
            ],
        )]);

        let files = generate_css(&converted, &[], &OutputConfig::default(), &mut KebabCache::new());
        let css = &files[0].css;
        assert!(css.contains("  --type-body-font-family: var(--font-body);\n"));
        assert!(css.contains("  --type-body-font-size: 1rem;\n"));
        assert!(css.contains("  --color-brand: #ff00ff;\n"));
        assert!(css.contains(
            "@supports (color: oklch(0 0 0)) {\n  :root {\n    --color-brand: oklch(0.7 0.3 328);\n  }\n}"
        ));
    }

    #[test]
    fn test_separate_output_per_source_file() {
        let output = OutputConfig {
            separate: true,
            css: "dist".to_string(),
            ..OutputConfig::default()
        };
        let converted = contexts(vec![(
            TokenContext::Base,
            vec![
                token("color.bg", CssProperties::single("#fff"), &TokenContext::Base, "tokens/baseColors.json"),
                token("space.sm", CssProperties::single("4px"), &TokenContext::Base, "tokens/spacing.tokens.json"),
            ],
        )]);

        let files = generate_css(&converted, &[], &output, &mut KebabCache::new());
        let paths: Vec<_> = files.iter().map(|file| file.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("dist/base-colors.variables.css"),
                PathBuf::from("dist/spacing.variables.css"),
            ]
        );
        assert!(files[1].css.contains("--space-sm: 4px;"));
    }
}
