//! Async resolver loading (requires the `async` feature)
//!
//! External files are read concurrently into a [`MemoryFileSystem`], then
//! the synchronous processor runs over them on a blocking thread. Merge
//! order still comes from `resolutionOrder`, never from read completion.

use crate::document::ResolverDocument;
use crate::error::ResolverError;
use crate::processor::{external_files, process_resolver, LoadResult, ResolverInput};
use std::path::PathBuf;
use tokenweave_common::MemoryFileSystem;
use tracing::{debug, instrument, warn};

#[instrument(skip(input), fields(path = %path.display()))]
pub async fn load_resolver_async(path: PathBuf, input: ResolverInput) -> LoadResult {
    let source = match tokio::fs::read_to_string(&path).await {
        Ok(source) => source,
        Err(e) => {
            return LoadResult::failed(vec![ResolverError::FileRead {
                path,
                message: e.to_string(),
            }])
        }
    };

    let document = match ResolverDocument::parse(&source, &path) {
        Ok(document) => document,
        Err(err) => {
            warn!(error = %err, "Resolver document failed to parse");
            return LoadResult::failed(vec![err]);
        }
    };

    let fs = match preload_files(external_files(&document, &path)).await {
        Ok(fs) => fs,
        Err(err) => return LoadResult::failed(vec![err]),
    };

    tokio::task::spawn_blocking(move || process_resolver(&document, &path, &fs, &input))
        .await
        .unwrap_or_else(|e| {
            LoadResult::failed(vec![ResolverError::Task {
                message: e.to_string(),
            }])
        })
}

/// Read every file concurrently. Unreadable files are left out so the
/// processor reports them when (and only if) they are actually used.
async fn preload_files(files: Vec<PathBuf>) -> Result<MemoryFileSystem, ResolverError> {
    let handles: Vec<_> = files
        .into_iter()
        .map(|file| {
            tokio::spawn(async move {
                let content = tokio::fs::read_to_string(&file).await;
                (file, content)
            })
        })
        .collect();

    let mut fs = MemoryFileSystem::new();
    for handle in handles {
        let (file, content) = handle.await.map_err(|e| ResolverError::Task {
            message: e.to_string(),
        })?;
        match content {
            Ok(content) => fs.add_file(file, content),
            Err(e) => debug!(file = %file.display(), error = %e, "Skipping unreadable file"),
        }
    }

    debug!(files = fs.len(), "Preloaded external files");
    Ok(fs)
}
