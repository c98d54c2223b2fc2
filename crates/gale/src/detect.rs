//! Token detection: source text in, newly pending classes and tags out.

use std::sync::Arc;

use gale_config::{kebab_case, ResolvedOptions};
use regex::{Regex, RegexBuilder};

use crate::groups::expand_variant_groups;
use crate::tokens::TokenStore;

/// What one detection pass queued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detection {
    pub classes: Vec<String>,
    pub tags: Vec<String>,
}

impl Detection {
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.tags.is_empty()
    }
}

/// Filters extractor output against the token store and resolved options.
#[derive(Debug, Clone)]
pub struct TokenDetector {
    options: Arc<ResolvedOptions>,
    /// `None` when no extensions are configured
    target: Option<Regex>,
}

impl TokenDetector {
    pub fn new(options: Arc<ResolvedOptions>) -> Self {
        let target = extension_pattern(&options.scan_options.file_extensions);
        Self { options, target }
    }

    pub fn options(&self) -> &Arc<ResolvedOptions> {
        &self.options
    }

    /// Fast reject by file extension, case-insensitive. A `?query` suffix is ignored.
    pub fn is_target(&self, id: &str) -> bool {
        let path = id.split('?').next().unwrap_or(id);
        self.target
            .as_ref()
            .is_some_and(|target| target.is_match(path))
    }

    /// Queue the classes and tags in `content` that are neither compiled,
    /// pending nor filtered out. Running it again on the same content is a no-op.
    pub fn detect(&self, tokens: &mut TokenStore, content: &str, id: &str) -> Detection {
        let options = &self.options;
        let content = if options.transform_groups {
            expand_variant_groups(content)
        } else {
            content.into()
        };

        let extracted = options.scan_options.extractor_for(id).extract(&content);
        let mut detection = Detection::default();

        for class in extracted.classes {
            if options.blocklist.contains(&class) {
                continue;
            }
            if tokens.add_class(&class) {
                detection.classes.push(class);
            }
        }

        if options.enable_preflight {
            let preflight = &options.preflight_options;
            for raw in extracted.tags {
                let lower = raw.to_ascii_lowercase();
                let tag = if tokens.is_tag_available(&lower) {
                    lower
                } else {
                    match preflight.alias_for(&kebab_case(&raw)) {
                        Some(alias) => alias.to_string(),
                        None => continue,
                    }
                };
                if preflight.blocklist.contains(&tag) {
                    continue;
                }
                if tokens.claim_tag(&tag) {
                    detection.tags.push(tag);
                }
            }
        }

        if !detection.is_empty() {
            tracing::trace!(
                "[gale:detect] {}: {} classes, {} tags",
                id,
                detection.classes.len(),
                detection.tags.len()
            );
        }

        detection
    }
}

fn extension_pattern(extensions: &[String]) -> Option<Regex> {
    if extensions.is_empty() {
        return None;
    }
    let alternatives = extensions
        .iter()
        .map(|ext| regex::escape(ext.trim_start_matches('.')))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&format!(r"\.(?:{})$", alternatives))
        .case_insensitive(true)
        .build()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gale_config::{resolve_options, PreflightConfig, UserOptions, UtilsOptions};

    fn detector(user: UserOptions) -> (TokenDetector, TokenStore) {
        let options = resolve_options(user.with_root("."), &UtilsOptions::default(), false);
        let mut store = TokenStore::new();
        store.reseed(&options);
        (TokenDetector::new(options), store)
    }

    #[test]
    fn targets_by_extension() {
        let (detector, _) = detector(UserOptions::new());
        assert!(detector.is_target("/src/App.vue"));
        assert!(detector.is_target("/src/Page.HTML"));
        assert!(detector.is_target("/src/App.vue?vue&type=template"));
        assert!(!detector.is_target("/src/main.ts"));
        assert!(!detector.is_target("/src/style.css"));
    }

    #[test]
    fn queues_classes_once() {
        let (detector, mut store) = detector(UserOptions::new());
        let content = r#"<div class="bg-white font-light">"#;

        let first = detector.detect(&mut store, content, "index.html");
        assert_eq!(first.classes, vec!["bg-white", "font-light"]);

        let second = detector.detect(&mut store, content, "index.html");
        assert!(second.is_empty());
    }

    #[test]
    fn skips_blocklisted_and_compiled() {
        let (detector, mut store) = detector(UserOptions::new().blocklist("hidden"));
        store.mark_compiled(&["p-1"]);

        let detection = detector.detect(&mut store, r#"'p-1 hidden m-2'"#, "a.vue");
        assert_eq!(detection.classes, vec!["m-2"]);
    }

    #[test]
    fn expands_groups_before_extraction() {
        let (detector, mut store) = detector(UserOptions::new());
        let detection =
            detector.detect(&mut store, r#"class="sm:hover:(p-1 m-2)""#, "a.html");
        assert_eq!(detection.classes, vec!["sm:hover:p-1", "sm:hover:m-2"]);

        let (detector, mut store) = detector_without_groups();
        let detection =
            detector.detect(&mut store, r#"class="sm:hover:(p-1 m-2)""#, "a.html");
        assert!(!detection.classes.contains(&"sm:hover:p-1".to_string()));
    }

    fn detector_without_groups() -> (TokenDetector, TokenStore) {
        detector(UserOptions::new().with_transform_groups(false))
    }

    #[test]
    fn claims_tags_and_resolves_aliases() {
        let (detector, mut store) = detector(UserOptions::new());
        let detection = detector.detect(
            &mut store,
            "<section><RouterLink to='/'/><H1>x</H1><my-widget/></section>",
            "App.vue",
        );
        assert_eq!(detection.tags, vec!["section", "a", "h1"]);

        let again = detector.detect(&mut store, "<section><a></a>", "App.vue");
        assert!(again.tags.is_empty());
        assert!(store.is_consistent());
    }

    #[test]
    fn preflight_tags_are_not_redetected() {
        let (detector, mut store) = detector(UserOptions::new());
        let detection = detector.detect(&mut store, "<html><body><div>", "index.html");
        assert!(detection.tags.is_empty());
    }

    #[test]
    fn no_tags_without_preflight() {
        let (detector, mut store) = detector(UserOptions::new().with_preflight(false));
        let detection = detector.detect(&mut store, "<section>", "index.html");
        assert!(detection.tags.is_empty());
        assert!(store.is_tag_available("section"));
    }

    #[test]
    fn blocklisted_alias_target_is_skipped() {
        let (detector, mut store) = detector(
            UserOptions::new().with_preflight(PreflightConfig::new().blocklist("a")),
        );
        let detection = detector.detect(&mut store, "<router-link>", "App.vue");
        assert!(detection.tags.is_empty());
    }
}
