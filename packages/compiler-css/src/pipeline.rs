use crate::config::TokenConfig;
use crate::convert::{convert_tokens, ConvertedContexts};
use crate::error::{CssError, CssResult};
use crate::generator::{generate_css, CssFile};
use anyhow::Context;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokenweave_evaluator::{resolve_references, ResolutionError};
use tokenweave_linter::{lint_tokens, Diagnostic, DiagnosticLevel, LintOptions};
use tokenweave_resolver::{
    load_from_memory, load_resolver, FileSystem, LoadResult, ModifierMeta, RealFileSystem,
    ResolverInput, TokenMemoryData,
};
use tokenweave_tokens::{flatten_trees, FlattenError, KebabCache, NormalizedTokens, TokenContext, TokenTree};
use tracing::{info, instrument};

/// Result of one compiler run
#[derive(Debug, Clone, Serialize)]
pub struct CompileOutput {
    pub files: Vec<CssFile>,
    /// Merge conflicts, resolution errors and validation findings
    pub diagnostics: Vec<Diagnostic>,
    pub modifiers: Vec<ModifierMeta>,
    pub tokens: ConvertedContexts,
}

impl CompileOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<&CssFile> {
        self.files.iter().find(|file| file.path == path.as_ref())
    }
}

/// Compile already-loaded token trees
#[instrument(skip_all, fields(trees = trees.len()))]
pub fn compile_trees(
    trees: &[TokenTree],
    modifiers: &[ModifierMeta],
    config: &TokenConfig,
) -> CssResult<CompileOutput> {
    config.validate()?;

    let normalized = flatten_trees(trees);
    let mut diagnostics = flatten_diagnostics(&normalized);

    let resolution = resolve_references(&normalized);
    diagnostics.extend(resolution.errors.iter().map(resolution_diagnostic));
    diagnostics.extend(lint_tokens(&resolution, LintOptions::default()));

    let tokens = convert_tokens(&resolution, &diagnostics, &config.transforms)?;

    let mut cache = KebabCache::new();
    let files = generate_css(&tokens, modifiers, &config.output, &mut cache);

    info!(
        files = files.len(),
        diagnostics = diagnostics.len(),
        "Compilation complete"
    );
    Ok(CompileOutput {
        files,
        diagnostics,
        modifiers: modifiers.to_vec(),
        tokens,
    })
}

/// Load a resolver document through `fs` and compile it.
///
/// Selections in `input` override the config's `modifiers`.
#[instrument(skip(fs, input, config), fields(path = %path.display()))]
pub fn compile_resolver(
    path: &Path,
    fs: &dyn FileSystem,
    input: &ResolverInput,
    config: &TokenConfig,
) -> CssResult<CompileOutput> {
    let load = load_resolver(path, fs, &selections(config, input));
    compile_load(path, load, config)
}

/// Compile token files held in memory
#[instrument(skip_all, fields(files = data.len()))]
pub fn compile_memory(data: &TokenMemoryData, config: &TokenConfig) -> CssResult<CompileOutput> {
    let load = load_from_memory(data);
    compile_load(Path::new("in-memory tokens"), load, config)
}

/// Load a resolver with concurrent file reads, then compile it
#[cfg(feature = "async")]
#[instrument(skip(input, config), fields(path = %path.display()))]
pub async fn compile_resolver_async(
    path: PathBuf,
    input: ResolverInput,
    config: TokenConfig,
) -> CssResult<CompileOutput> {
    let load = tokenweave_resolver::load_resolver_async(path.clone(), selections(&config, &input)).await;
    compile_load(&path, load, &config)
}

/// Compile the project in `dir`: reads `tokens.config.json`, then the resolver it names
pub fn compile_project(dir: impl AsRef<Path>) -> anyhow::Result<CompileOutput> {
    let dir = dir.as_ref();
    let config = TokenConfig::load(dir)?;
    let resolver_path = config.resolver_path(dir);

    let output = compile_resolver(&resolver_path, &RealFileSystem, &ResolverInput::new(), &config)
        .with_context(|| format!("Failed to compile {}", resolver_path.display()))?;
    Ok(output)
}

fn compile_load(path: &Path, load: LoadResult, config: &TokenConfig) -> CssResult<CompileOutput> {
    if !load.is_ok() {
        return Err(CssError::Load {
            path: path.to_path_buf(),
            errors: load.errors,
        });
    }
    compile_trees(&load.trees, &load.modifiers, config)
}

fn selections(config: &TokenConfig, input: &ResolverInput) -> ResolverInput {
    let mut merged = ResolverInput {
        selections: config.modifiers.clone(),
    };
    merged.selections.extend(input.selections.clone());
    merged
}

fn flatten_diagnostics(normalized: &NormalizedTokens) -> Vec<Diagnostic> {
    normalized
        .iter()
        .flat_map(|(context, flattened)| {
            flattened
                .errors
                .iter()
                .map(move |error| flatten_diagnostic(context, error))
        })
        .collect()
}

fn flatten_diagnostic(context: &TokenContext, error: &FlattenError) -> Diagnostic {
    let (rule, source) = match error {
        FlattenError::TokenGroupConflict { token_source, .. } => ("token-group-conflict", token_source),
        FlattenError::TypeConflict {
            incoming_source, ..
        } => ("type-conflict", incoming_source),
    };
    Diagnostic::new(
        DiagnosticLevel::Error,
        rule,
        error.to_string(),
        error.path(),
        context.clone(),
        source.clone(),
    )
}

fn resolution_diagnostic(error: &ResolutionError) -> Diagnostic {
    let origin = error.origin();
    Diagnostic::new(
        DiagnosticLevel::Error,
        format!("{}-reference", error.kind()),
        error.to_string(),
        error.path(),
        origin.context.clone(),
        origin.path.clone(),
    )
}
