//! Lexical extraction of class and tag candidates from source text.
//!
//! Extractors only find *candidates*. Deciding what is new, blocked or already
//! compiled is the token detector's job.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

/// Looks like a utility class: `bg-white`, `sm:p-4`, `w-1/2`, `p-0.5`.
static CLASS_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z\-]+[a-z0-9:\-/\\]*\.?[a-z0-9]$").expect("valid class regex"));

static TAG_OPENING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<([A-Za-z][A-Za-z0-9\-]*)").expect("valid tag regex"));

static SVELTE_CLASS_DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"class:([\w:/\-.]+)").expect("valid directive regex"));

/// Candidates found in one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub classes: Vec<String>,
    /// Raw tag names as written, e.g. `RouterLink`
    pub tags: Vec<String>,
}

pub trait Extractor: Send + Sync {
    fn extract(&self, content: &str) -> Extracted;
}

/// Quoted-string and `<tag` scanning, used for every file without a dedicated
/// extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExtractor;

impl Extractor for DefaultExtractor {
    fn extract(&self, content: &str) -> Extracted {
        Extracted {
            classes: extract_class_candidates(content),
            tags: extract_tag_names(content),
        }
    }
}

/// Default extraction plus `class:name={cond}` directives.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvelteExtractor;

impl Extractor for SvelteExtractor {
    fn extract(&self, content: &str) -> Extracted {
        let mut extracted = DefaultExtractor.extract(content);
        extracted.classes.extend(
            SVELTE_CLASS_DIRECTIVE
                .captures_iter(content)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str())
                .filter(|candidate| is_class_candidate(candidate))
                .map(str::to_string),
        );
        extracted
    }
}

/// Binds an extractor to the file extensions it handles.
#[derive(Clone)]
pub struct ExtractorRule {
    pub extensions: Vec<String>,
    pub extractor: Arc<dyn Extractor>,
}

impl ExtractorRule {
    pub fn new<E>(extensions: impl IntoIterator<Item = impl Into<String>>, extractor: E) -> Self
    where
        E: Extractor + 'static,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
            extractor: Arc::new(extractor),
        }
    }

    pub fn matches(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

impl fmt::Debug for ExtractorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorRule")
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

pub fn default_extractors() -> Vec<ExtractorRule> {
    vec![ExtractorRule::new(["svelte"], SvelteExtractor)]
}

pub fn is_class_candidate(token: &str) -> bool {
    CLASS_SHAPE.is_match(token)
}

/// Whitespace-separated words of every quoted literal that look like classes.
pub fn extract_class_candidates(content: &str) -> Vec<String> {
    quoted_literals(content)
        .into_iter()
        .flat_map(str::split_whitespace)
        .filter(|token| is_class_candidate(token))
        .map(str::to_string)
        .collect()
}

pub fn extract_tag_names(content: &str) -> Vec<String> {
    TAG_OPENING
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Contents of `'…'`, `"…"` and `` `…` `` literals.
///
/// A backslash directly before the opening quote character does not close the
/// literal. Literals never span lines; an opening quote without a closing one on
/// the same line is skipped and scanning resumes right after it.
pub fn quoted_literals(content: &str) -> Vec<&str> {
    let bytes = content.as_bytes();
    let mut literals = Vec::new();
    let mut start = 0;

    while start < bytes.len() {
        let quote = bytes[start];
        if !matches!(quote, b'"' | b'\'' | b'`') {
            start += 1;
            continue;
        }

        let mut cursor = start + 1;
        let mut closed = None;
        while cursor < bytes.len() {
            match bytes[cursor] {
                b if b == quote => {
                    closed = Some(cursor);
                    break;
                }
                b'\\' if bytes.get(cursor + 1) == Some(&quote) => cursor += 2,
                b'\n' => break,
                _ => cursor += 1,
            }
        }

        match closed {
            Some(end) => {
                literals.push(&content[start + 1..end]);
                start = end + 1;
            }
            None => start += 1,
        }
    }

    literals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_literals_of_every_quote_kind() {
        let literals = quoted_literals(r#"a "one" b 'two' c `three`"#);
        assert_eq!(literals, vec!["one", "two", "three"]);
    }

    #[test]
    fn escaped_quote_does_not_close_literal() {
        let literals = quoted_literals(r#"x = "say \"hi\" p-4""#);
        assert_eq!(literals, vec![r#"say \"hi\" p-4"#]);
    }

    #[test]
    fn unterminated_quote_is_skipped() {
        let literals = quoted_literals("it's\nclass=\"m-2\"");
        assert_eq!(literals, vec!["m-2"]);
    }

    #[test]
    fn class_shape_rejects_paths_and_prose() {
        assert!(is_class_candidate("bg-white"));
        assert!(is_class_candidate("sm:hover:p-4"));
        assert!(is_class_candidate("w-1/2"));
        assert!(is_class_candidate("p-0.5"));
        assert!(!is_class_candidate("./index.ts"));
        assert!(!is_class_candidate("Hello"));
        assert!(!is_class_candidate("end."));
        assert!(!is_class_candidate("a"));
    }

    #[test]
    fn default_extractor_collects_classes_and_tags() {
        let extracted =
            DefaultExtractor.extract(r#"<div class="bg-white font-light"><RouterLink to="/x">"#);
        assert_eq!(extracted.classes, vec!["bg-white", "font-light"]);
        assert_eq!(extracted.tags, vec!["div", "RouterLink"]);
    }

    #[test]
    fn svelte_extractor_reads_class_directives() {
        let extracted = SvelteExtractor.extract(r#"<p class:text-red-500={error}>hi</p>"#);
        assert!(extracted.classes.contains(&"text-red-500".to_string()));
        assert_eq!(extracted.tags, vec!["p"]);
    }

    #[test]
    fn extractor_rule_matches_case_insensitively() {
        let rule = ExtractorRule::new(["svelte"], SvelteExtractor);
        assert!(rule.matches("SVELTE"));
        assert!(!rule.matches("vue"));
    }
}
