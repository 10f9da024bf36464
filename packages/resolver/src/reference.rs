/// `$ref` targets
///
/// Same-document pointers name a set or modifier; anything else is a file
/// path relative to the resolver's directory, optionally followed by a
/// `#/json/pointer` fragment.
use crate::error::{ResolverError, ResolverResult};
use std::path::{Path, PathBuf};

const SETS_PREFIX: &str = "#/sets/";
const MODIFIERS_PREFIX: &str = "#/modifiers/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefTarget {
    Set(String),
    Modifier(String),
    File {
        path: PathBuf,
        pointer: Option<String>,
    },
}

impl RefTarget {
    pub fn parse(reference: &str, base_dir: &Path) -> ResolverResult<Self> {
        if let Some(name) = reference.strip_prefix(SETS_PREFIX) {
            return Ok(RefTarget::Set(decode_pointer_segment(name)));
        }
        if let Some(name) = reference.strip_prefix(MODIFIERS_PREFIX) {
            return Ok(RefTarget::Modifier(decode_pointer_segment(name)));
        }
        if reference.starts_with('#') {
            return Err(ResolverError::UnsupportedReference {
                reference: reference.to_string(),
                reason: "same-document references must point into #/sets or #/modifiers"
                    .to_string(),
            });
        }
        if reference.contains("://") {
            return Err(ResolverError::UnsupportedReference {
                reference: reference.to_string(),
                reason: "remote references are not loaded".to_string(),
            });
        }

        let (file, fragment) = match reference.split_once('#') {
            Some((file, fragment)) => (file, Some(fragment)),
            None => (reference, None),
        };
        if file.is_empty() {
            return Err(ResolverError::UnsupportedReference {
                reference: reference.to_string(),
                reason: "empty file path".to_string(),
            });
        }

        Ok(RefTarget::File {
            path: base_dir.join(file),
            pointer: fragment.filter(|f| !f.is_empty()).map(str::to_string),
        })
    }
}

/// Undo JSON pointer escaping (`~1` is `/`, `~0` is `~`)
fn decode_pointer_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}
