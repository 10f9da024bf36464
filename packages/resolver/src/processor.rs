//! # Resolver Processor
//!
//! Turns a validated [`ResolverDocument`] into token trees.
//!
//! Every source becomes its own [`TokenTree`], emitted in `resolutionOrder`
//! order, so merging (last wins, inherited `$type`, conflict detection) is
//! left to the flatten pass. A set expands to the trees of its sources. A
//! modifier contributes its selected (or default) context to the base
//! context at its position in the order; each other context keeps its own
//! sources as overlay trees, so contexts never leak into the base or into
//! each other. Overlays without tokens are dropped.
//!
//! Any load error aborts the whole load: the result then carries the errors
//! and no trees.

use crate::document::{
    InlineItem, ModifierDefinition, ResolutionItem, ResolverDocument, SetDefinition, Source,
};
use crate::error::{ResolverError, ResolverResult};
use crate::reference::RefTarget;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokenweave_common::{load_token_file, FileSystem};
use tokenweave_tokens::{parse_token_value, to_kebab_case, TokenContext, TokenTree};
use tracing::{debug, info, instrument, warn};

/// Per-modifier facts the CSS generator needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierMeta {
    pub name: String,
    /// Attribute used in selectors, e.g. `data-color-scheme`
    pub attribute: String,
    /// The modifier's declared `default`
    pub default_context: Option<String>,
    /// Context merged into the base (the caller's selection or the default)
    pub selected_context: String,
    /// Other contexts that produced a non-empty overlay tree
    pub contexts: Vec<String>,
}

impl ModifierMeta {
    pub fn attribute_for(modifier: &str) -> String {
        format!("data-{}", to_kebab_case(modifier))
    }
}

/// Caller choices for a resolver load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverInput {
    /// modifier name -> context name
    #[serde(default)]
    pub selections: IndexMap<String, String>,
}

impl ResolverInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, modifier: impl Into<String>, context: impl Into<String>) -> Self {
        self.selections.insert(modifier.into(), context.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadResult {
    pub trees: Vec<TokenTree>,
    pub modifiers: Vec<ModifierMeta>,
    pub errors: Vec<ResolverError>,
}

impl LoadResult {
    pub fn failed(errors: Vec<ResolverError>) -> Self {
        Self {
            errors,
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Read, parse and process the resolver document at `path`
#[instrument(skip(fs, input), fields(path = %path.display()))]
pub fn load_resolver(path: &Path, fs: &dyn FileSystem, input: &ResolverInput) -> LoadResult {
    let source = match fs.read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            return LoadResult::failed(vec![ResolverError::FileRead {
                path: path.to_path_buf(),
                message: e.to_string(),
            }])
        }
    };

    match ResolverDocument::parse(&source, path) {
        Ok(document) => process_resolver(&document, path, fs, input),
        Err(err) => {
            warn!(error = %err, "Resolver document failed to parse");
            LoadResult::failed(vec![err])
        }
    }
}

/// Process an already-parsed resolver document located at `resolver_path`
#[instrument(skip_all, fields(path = %resolver_path.display()))]
pub fn process_resolver(
    document: &ResolverDocument,
    resolver_path: &Path,
    fs: &dyn FileSystem,
    input: &ResolverInput,
) -> LoadResult {
    let errors = document.validate(resolver_path);
    if !errors.is_empty() {
        warn!(errors = errors.len(), "Resolver document is invalid");
        return LoadResult::failed(errors);
    }

    let mut processor = Processor {
        document,
        resolver_path,
        base_dir: base_dir(resolver_path),
        fs,
        input,
        base: Vec::new(),
        overlays: Vec::new(),
        modifiers: Vec::new(),
        set_stack: Vec::new(),
    };

    for item in &document.resolution_order {
        if let Err(err) = processor.apply_item(item) {
            warn!(error = %err, "Resolver load aborted");
            return LoadResult::failed(vec![err]);
        }
    }

    let mut trees = processor.base;
    trees.extend(processor.overlays);

    info!(
        trees = trees.len(),
        modifiers = processor.modifiers.len(),
        "Processed resolver document"
    );

    LoadResult {
        trees,
        modifiers: processor.modifiers,
        errors: Vec::new(),
    }
}

/// Every external file the document references, deduplicated, in document order
pub fn external_files(document: &ResolverDocument, resolver_path: &Path) -> Vec<PathBuf> {
    let base_dir = base_dir(resolver_path);
    let mut files = IndexSet::new();

    for set in document.sets.values() {
        collect_files(&set.sources, &base_dir, &mut files);
    }
    for modifier in document.modifiers.values() {
        for sources in modifier.contexts.values() {
            collect_files(sources, &base_dir, &mut files);
        }
    }
    for item in &document.resolution_order {
        match item {
            ResolutionItem::Reference(r) => {
                collect_files(&[Source::Reference(r.clone())], &base_dir, &mut files);
            }
            ResolutionItem::Inline(InlineItem::Set(set)) => {
                collect_files(&set.sources, &base_dir, &mut files);
            }
            ResolutionItem::Inline(InlineItem::Modifier(modifier)) => {
                for sources in modifier.contexts.values() {
                    collect_files(sources, &base_dir, &mut files);
                }
            }
        }
    }

    files.into_iter().collect()
}

fn collect_files(sources: &[Source], base_dir: &Path, files: &mut IndexSet<PathBuf>) {
    for source in sources {
        if let Source::Reference(r) = source {
            if let Ok(RefTarget::File { path, .. }) = RefTarget::parse(&r.reference, base_dir) {
                files.insert(path);
            }
        }
    }
}

fn base_dir(resolver_path: &Path) -> PathBuf {
    resolver_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

struct Processor<'a> {
    document: &'a ResolverDocument,
    resolver_path: &'a Path,
    base_dir: PathBuf,
    fs: &'a dyn FileSystem,
    input: &'a ResolverInput,
    /// Base-context trees, one per source
    base: Vec<TokenTree>,
    overlays: Vec<TokenTree>,
    modifiers: Vec<ModifierMeta>,
    /// Sets currently being expanded, for cycle detection
    set_stack: Vec<String>,
}

impl<'a> Processor<'a> {
    fn apply_item(&mut self, item: &ResolutionItem) -> ResolverResult<()> {
        match item {
            ResolutionItem::Reference(r) => match RefTarget::parse(&r.reference, &self.base_dir)? {
                RefTarget::Set(name) => {
                    let set = self.lookup_set(&name, &r.reference)?;
                    let trees = self.expand_set(&name, set)?;
                    self.base.extend(trees);
                }
                RefTarget::Modifier(name) => {
                    let document = self.document;
                    let modifier = document.modifiers.get(&name).ok_or_else(|| {
                        ResolverError::ModifierNotFound {
                            name: name.clone(),
                            reference: r.reference.clone(),
                        }
                    })?;
                    self.apply_modifier(&name, modifier)?;
                }
                RefTarget::File { path, pointer } => {
                    let tree = self.load_file(&path, pointer.as_deref())?;
                    self.base.push(tree);
                }
            },
            ResolutionItem::Inline(InlineItem::Set(set)) => {
                let trees = self.expand_set(&set.name, &set.definition())?;
                self.base.extend(trees);
            }
            ResolutionItem::Inline(InlineItem::Modifier(modifier)) => {
                self.apply_modifier(&modifier.name, &modifier.definition())?;
            }
        }
        Ok(())
    }

    fn lookup_set(&self, name: &str, reference: &str) -> ResolverResult<&'a SetDefinition> {
        self.document
            .sets
            .get(name)
            .ok_or_else(|| ResolverError::SetNotFound {
                name: name.to_string(),
                reference: reference.to_string(),
            })
    }

    fn expand_set(&mut self, name: &str, set: &SetDefinition) -> ResolverResult<Vec<TokenTree>> {
        if self.set_stack.iter().any(|s| s == name) {
            let mut chain = self.set_stack.clone();
            chain.push(name.to_string());
            return Err(ResolverError::CircularSet {
                chain: chain.join(" -> "),
            });
        }

        self.set_stack.push(name.to_string());
        let trees = self.load_sources(&set.sources);
        self.set_stack.pop();

        debug!(set = name, "Expanded set");
        trees
    }

    fn apply_modifier(&mut self, name: &str, modifier: &ModifierDefinition) -> ResolverResult<()> {
        let selected = self
            .input
            .selections
            .get(name)
            .or(modifier.default.as_ref())
            .cloned()
            .ok_or_else(|| ResolverError::MissingSelection {
                modifier: name.to_string(),
            })?;
        if !modifier.contexts.contains_key(&selected) {
            return Err(ResolverError::UnknownContext {
                modifier: name.to_string(),
                context: selected,
            });
        }

        let mut contexts = Vec::new();
        for (context, sources) in &modifier.contexts {
            let trees = self.load_sources(sources)?;
            if *context == selected {
                self.base.extend(trees);
            } else if trees.iter().any(|tree| tree.tokens.has_tokens()) {
                let overlay = TokenContext::modifier(name, context.as_str());
                self.overlays.extend(trees.into_iter().map(|mut tree| {
                    tree.context = overlay.clone();
                    tree
                }));
                contexts.push(context.clone());
            } else {
                debug!(modifier = name, context = %context, "Dropping empty context");
            }
        }

        self.modifiers.push(ModifierMeta {
            name: name.to_string(),
            attribute: ModifierMeta::attribute_for(name),
            default_context: modifier.default.clone(),
            selected_context: selected,
            contexts,
        });
        Ok(())
    }

    fn load_sources(&mut self, sources: &[Source]) -> ResolverResult<Vec<TokenTree>> {
        let mut trees = Vec::new();
        for source in sources {
            trees.extend(self.load_source(source)?);
        }
        Ok(trees)
    }

    fn load_source(&mut self, source: &Source) -> ResolverResult<Vec<TokenTree>> {
        match source {
            Source::Inline(map) => {
                let group = parse_token_value(&Value::Object(map.clone()), self.resolver_path)?;
                Ok(vec![TokenTree::new(TokenContext::Base, group, self.resolver_path)])
            }
            Source::Reference(r) => match RefTarget::parse(&r.reference, &self.base_dir)? {
                RefTarget::Set(name) => {
                    let set = self.lookup_set(&name, &r.reference)?;
                    self.expand_set(&name, set)
                }
                RefTarget::Modifier(_) => Err(ResolverError::UnsupportedReference {
                    reference: r.reference.clone(),
                    reason: "a modifier cannot be used as a source".to_string(),
                }),
                RefTarget::File { path, pointer } => {
                    Ok(vec![self.load_file(&path, pointer.as_deref())?])
                }
            },
        }
    }

    fn load_file(&self, path: &Path, pointer: Option<&str>) -> ResolverResult<TokenTree> {
        debug!(file = %path.display(), pointer = ?pointer, "Loading token file");
        let group = load_token_file(self.fs, path, pointer)
            .map_err(|e| ResolverError::from_common(e, path))?;
        Ok(TokenTree::new(TokenContext::Base, group, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokenweave_common::MemoryFileSystem;
    use tokenweave_tokens::{flatten_trees, FlattenError, NormalizedTokens, TokenType};

    const RESOLVER: &str = "/tokens/tokens.resolver.json";

    fn load(fs: &MemoryFileSystem, input: &ResolverInput) -> LoadResult {
        load_resolver(Path::new(RESOLVER), fs, input)
    }

    fn token_value<'t>(
        normalized: &'t NormalizedTokens,
        context: &TokenContext,
        path: &str,
    ) -> Option<&'t Value> {
        normalized.get(context)?.get(path).map(|token| &token.value)
    }

    fn two_sets(first: &str, second: &str) -> MemoryFileSystem {
        MemoryFileSystem::new()
            .with_file(
                RESOLVER,
                r##"{
                    "version": "2025.10",
                    "sets": {
                        "s1": { "sources": [{ "$ref": "one.json" }] },
                        "s2": { "sources": [{ "$ref": "two.json" }] }
                    },
                    "resolutionOrder": [{ "$ref": "#/sets/s1" }, { "$ref": "#/sets/s2" }]
                }"##,
            )
            .with_file("/tokens/one.json", first)
            .with_file("/tokens/two.json", second)
    }

    fn theme_fs() -> MemoryFileSystem {
        MemoryFileSystem::new()
            .with_file(
                RESOLVER,
                r##"{
                    "version": "2025.10",
                    "sets": {
                        "core": { "sources": [{ "$ref": "core.json" }, { "$ref": "spacing.json" }] }
                    },
                    "modifiers": {
                        "colorScheme": {
                            "contexts": {
                                "light": [{ "$ref": "light.json" }],
                                "dark": [{ "$ref": "dark.json" }],
                                "dim": []
                            },
                            "default": "light"
                        }
                    },
                    "resolutionOrder": [{ "$ref": "#/sets/core" }, { "$ref": "#/modifiers/colorScheme" }]
                }"##,
            )
            .with_file(
                "/tokens/core.json",
                r##"{ "color": { "$type": "color", "primary": { "$value": "#000000" } } }"##,
            )
            .with_file(
                "/tokens/spacing.json",
                r#"{ "spacing": { "small": { "$value": { "value": 4, "unit": "px" }, "$type": "dimension" } } }"#,
            )
            .with_file(
                "/tokens/light.json",
                r##"{ "color": { "surface": { "$value": "#ffffff", "$type": "color" } } }"##,
            )
            .with_file(
                "/tokens/dark.json",
                r##"{ "color": { "surface": { "$value": "#111111", "$type": "color" } } }"##,
            )
    }

    #[test]
    fn test_default_context_joins_base() {
        let result = load(&theme_fs(), &ResolverInput::new());
        assert!(result.is_ok(), "{:?}", result.errors);

        let normalized = flatten_trees(&result.trees);
        let base = TokenContext::Base;
        assert_eq!(token_value(&normalized, &base, "color.primary"), Some(&json!("#000000")));
        assert_eq!(token_value(&normalized, &base, "color.surface"), Some(&json!("#ffffff")));
        assert!(token_value(&normalized, &base, "spacing.small").is_some());
    }

    #[test]
    fn test_each_source_is_its_own_tree() {
        let result = load(&theme_fs(), &ResolverInput::new());

        let sources: Vec<_> = result
            .trees
            .iter()
            .filter(|tree| tree.context.is_base())
            .map(|tree| tree.source_path.clone())
            .collect();
        assert_eq!(
            sources,
            vec![
                PathBuf::from("/tokens/core.json"),
                PathBuf::from("/tokens/spacing.json"),
                PathBuf::from("/tokens/light.json"),
            ]
        );
    }

    #[test]
    fn test_other_contexts_become_isolated_overlays() {
        let result = load(&theme_fs(), &ResolverInput::new());

        assert_eq!(result.trees.len(), 4);
        let dark = TokenContext::modifier("colorScheme", "dark");
        assert_eq!(result.trees[3].context, dark);

        let normalized = flatten_trees(&result.trees);
        assert_eq!(token_value(&normalized, &dark, "color.surface"), Some(&json!("#111111")));
        assert!(token_value(&normalized, &dark, "color.primary").is_none());

        let meta = &result.modifiers[0];
        assert_eq!(meta.attribute, "data-color-scheme");
        assert_eq!(meta.default_context.as_deref(), Some("light"));
        assert_eq!(meta.selected_context, "light");
        assert_eq!(meta.contexts, vec!["dark"]);
    }

    #[test]
    fn test_selection_overrides_default() {
        let input = ResolverInput::new().select("colorScheme", "dark");
        let result = load(&theme_fs(), &input);

        let normalized = flatten_trees(&result.trees);
        assert_eq!(
            token_value(&normalized, &TokenContext::Base, "color.surface"),
            Some(&json!("#111111"))
        );
        assert!(normalized.contains_key(&TokenContext::modifier("colorScheme", "light")));

        let meta = &result.modifiers[0];
        assert_eq!(meta.default_context.as_deref(), Some("light"));
        assert_eq!(meta.selected_context, "dark");
    }

    #[test]
    fn test_later_sources_override_earlier() {
        let fs = MemoryFileSystem::new().with_file(
            RESOLVER,
            r##"{
                "version": "2025.10",
                "sets": {
                    "s1": { "sources": [{ "x": { "$value": 1 } }] },
                    "s2": { "sources": [{ "x": { "$value": 2 } }] }
                },
                "resolutionOrder": [{ "$ref": "#/sets/s1" }, { "$ref": "#/sets/s2" }]
            }"##,
        );

        let result = load(&fs, &ResolverInput::new());
        let normalized = flatten_trees(&result.trees);
        assert_eq!(token_value(&normalized, &TokenContext::Base, "x"), Some(&json!(2)));
    }

    #[test]
    fn test_token_group_conflict_across_sets() {
        let fs = two_sets(
            r#"{ "a": { "b": { "c": { "$value": 1, "$type": "number" } } } }"#,
            r#"{ "a": { "b": { "$value": 2, "$type": "number" } } }"#,
        );

        let result = load(&fs, &ResolverInput::new());
        let normalized = flatten_trees(&result.trees);
        let base = &normalized[&TokenContext::Base];

        assert!(base.get("a.b").is_none());
        assert!(matches!(
            &base.errors[..],
            [FlattenError::TokenGroupConflict { path, token_source, .. }]
                if path == "a.b" && token_source == Path::new("/tokens/two.json")
        ));
    }

    #[test]
    fn test_type_conflict_across_sets() {
        let fs = two_sets(
            r##"{ "x": { "$value": "#ffffff", "$type": "color" } }"##,
            r#"{ "x": { "$value": { "value": 4, "unit": "px" }, "$type": "dimension" } }"#,
        );

        let result = load(&fs, &ResolverInput::new());
        let normalized = flatten_trees(&result.trees);
        let base = &normalized[&TokenContext::Base];

        assert!(base.get("x").is_none());
        assert!(matches!(&base.errors[..], [FlattenError::TypeConflict { .. }]));
    }

    #[test]
    fn test_one_sided_type_is_inherited_across_sets() {
        let fs = two_sets(
            r##"{ "x": { "$value": "#ffffff", "$type": "color" } }"##,
            r##"{ "x": { "$value": "#000000" } }"##,
        );

        let result = load(&fs, &ResolverInput::new());
        let normalized = flatten_trees(&result.trees);
        let x = normalized[&TokenContext::Base].get("x").unwrap();

        assert_eq!(x.value, json!("#000000"));
        assert_eq!(x.token_type, Some(TokenType::Color));
        assert_eq!(x.source.path, Path::new("/tokens/two.json"));
    }

    #[test]
    fn test_missing_set_aborts_load() {
        let fs = MemoryFileSystem::new().with_file(
            RESOLVER,
            r##"{ "version": "2025.10", "resolutionOrder": [{ "$ref": "#/sets/nope" }] }"##,
        );

        let result = load(&fs, &ResolverInput::new());
        assert!(result.trees.is_empty());
        assert!(matches!(result.errors[0], ResolverError::SetNotFound { .. }));
    }

    #[test]
    fn test_missing_selection_is_an_error() {
        let fs = MemoryFileSystem::new().with_file(
            RESOLVER,
            r##"{
                "version": "2025.10",
                "modifiers": { "density": { "contexts": { "compact": [], "comfy": [] } } },
                "resolutionOrder": [{ "$ref": "#/modifiers/density" }]
            }"##,
        );

        let result = load(&fs, &ResolverInput::new());
        assert!(matches!(
            result.errors[0],
            ResolverError::MissingSelection { ref modifier } if modifier == "density"
        ));

        let result = load(&fs, &ResolverInput::new().select("density", "comfy"));
        assert!(result.is_ok());
        assert_eq!(result.modifiers[0].default_context, None);
        assert_eq!(result.modifiers[0].selected_context, "comfy");
    }

    #[test]
    fn test_malformed_external_file_aborts_load() {
        let fs = MemoryFileSystem::new()
            .with_file(
                RESOLVER,
                r##"{ "version": "2025.10", "resolutionOrder": [{ "type": "set", "name": "a", "sources": [{ "$ref": "broken.json" }] }] }"##,
            )
            .with_file("/tokens/broken.json", "{ not json");

        let result = load(&fs, &ResolverInput::new());
        assert!(result.trees.is_empty());
        assert!(result.errors[0].is_parse_error());
    }

    #[test]
    fn test_circular_set_sources_are_detected() {
        let fs = MemoryFileSystem::new().with_file(
            RESOLVER,
            r##"{
                "version": "2025.10",
                "sets": {
                    "a": { "sources": [{ "$ref": "#/sets/b" }] },
                    "b": { "sources": [{ "$ref": "#/sets/a" }] }
                },
                "resolutionOrder": [{ "$ref": "#/sets/a" }]
            }"##,
        );

        let result = load(&fs, &ResolverInput::new());
        assert!(matches!(
            &result.errors[0],
            ResolverError::CircularSet { chain } if chain == "a -> b -> a"
        ));
    }

    #[test]
    fn test_external_files_are_listed_once() {
        let fs = theme_fs();
        let source = fs.read_to_string(Path::new(RESOLVER)).unwrap();
        let document = ResolverDocument::parse(&source, Path::new(RESOLVER)).unwrap();

        let files = external_files(&document, Path::new(RESOLVER));
        assert_eq!(
            files,
            vec![
                PathBuf::from("/tokens/core.json"),
                PathBuf::from("/tokens/spacing.json"),
                PathBuf::from("/tokens/light.json"),
                PathBuf::from("/tokens/dark.json"),
            ]
        );
    }
}
