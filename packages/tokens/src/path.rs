/// Path and naming utilities shared by the compiler stages
///
/// Case conversion is memoized through [`KebabCache`], which callers create
/// once per pipeline run and pass down explicitly.
use std::collections::HashMap;

/// Convert a single name to kebab-case (`primaryDark` → `primary-dark`, `Font Size` → `font-size`)
pub fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;

    for ch in name.chars() {
        if ch == '_' || ch == ' ' || ch == '-' {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            prev = Some('-');
            continue;
        }

        if ch.is_uppercase() {
            let boundary = matches!(prev, Some(p) if p.is_lowercase() || p.is_ascii_digit());
            if boundary && !out.ends_with('-') {
                out.push('-');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
        prev = Some(ch);
    }

    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Memoized kebab-case conversion scoped to one pipeline invocation
#[derive(Debug, Default, Clone)]
pub struct KebabCache {
    entries: HashMap<String, String>,
}

impl KebabCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kebab(&mut self, name: &str) -> String {
        if let Some(cached) = self.entries.get(name) {
            return cached.clone();
        }
        let converted = to_kebab_case(name);
        self.entries.insert(name.to_string(), converted.clone());
        converted
    }

    /// Kebab-case every segment of a dot path and join with `-`
    pub fn kebab_path(&mut self, path: &str) -> String {
        path.split('.')
            .map(|segment| self.kebab(segment))
            .collect::<Vec<_>>()
            .join("-")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Custom property name for a dot path (`color.primaryDark` → `--color-primary-dark`)
pub fn css_variable_name(path: &str, cache: &mut KebabCache) -> String {
    format!("--{}", cache.kebab_path(path))
}
