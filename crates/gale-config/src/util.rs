use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use path_clean::PathClean;

/// Absolute form of `path` with `.` and `..` folded away. Relative paths are
/// taken from the current directory.
pub fn absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.clean();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path).clean(),
        Err(_) => path.clean(),
    }
}

/// `RouterLink` → `router-link`.
pub fn kebab_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    let mut prev_lower = false;
    for ch in value.chars() {
        if ch.is_ascii_uppercase() && prev_lower {
            out.push('-');
        }
        prev_lower = ch.is_ascii_lowercase();
        out.push(ch.to_ascii_lowercase());
    }
    out
}

/// Order-preserving concatenation of list sources, lowest precedence first.
pub fn merge_lists<'a, I>(sources: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    sources
        .into_iter()
        .flat_map(|source| source.iter().cloned())
        .collect()
}

/// Split every entry on whitespace and collect the words, first occurrence wins.
pub fn tokenize_entries<'a, I>(entries: I) -> IndexSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    entries
        .into_iter()
        .flat_map(|entry| entry.split_whitespace())
        .map(str::to_string)
        .collect()
}
