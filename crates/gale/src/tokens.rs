//! Incremental token sets.
//!
//! A class is pending until the engine compiles it, then compiled until the next
//! reseed. A tag starts out available, is claimed into pending by detection and
//! becomes compiled once its preflight has been emitted.

use gale_config::ResolvedOptions;
use rustc_hash::FxHashSet;

use crate::tags::{HTML_TAGS, PREFLIGHT_TAGS};

#[derive(Debug, Clone)]
pub struct TokenStore {
    compiled_classes: FxHashSet<String>,
    pending_classes: FxHashSet<String>,
    compiled_tags: FxHashSet<String>,
    pending_tags: FxHashSet<String>,
    available_tags: FxHashSet<String>,
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore {
    /// Every known tag available, nothing pending.
    pub fn new() -> Self {
        Self {
            compiled_classes: FxHashSet::default(),
            pending_classes: FxHashSet::default(),
            compiled_tags: FxHashSet::default(),
            pending_tags: FxHashSet::default(),
            available_tags: HTML_TAGS.iter().map(|tag| tag.to_string()).collect(),
        }
    }

    /// Queue a class. No-op if it is already pending or compiled.
    pub fn add_class(&mut self, class: &str) -> bool {
        if self.compiled_classes.contains(class) || self.pending_classes.contains(class) {
            return false;
        }
        self.pending_classes.insert(class.to_string())
    }

    /// Move a tag from available to pending.
    pub fn claim_tag(&mut self, tag: &str) -> bool {
        if self.available_tags.remove(tag) {
            self.pending_tags.insert(tag.to_string());
            true
        } else {
            false
        }
    }

    pub fn is_tag_available(&self, tag: &str) -> bool {
        self.available_tags.contains(tag)
    }

    pub fn is_class_compiled(&self, class: &str) -> bool {
        self.compiled_classes.contains(class)
    }

    pub fn is_class_pending(&self, class: &str) -> bool {
        self.pending_classes.contains(class)
    }

    /// Pending classes in sorted order, so engine input is deterministic.
    pub fn pending_classes(&self) -> Vec<String> {
        sorted(&self.pending_classes)
    }

    pub fn pending_tags(&self) -> Vec<String> {
        sorted(&self.pending_tags)
    }

    pub fn has_pending_classes(&self) -> bool {
        !self.pending_classes.is_empty()
    }

    pub fn has_pending_tags(&self) -> bool {
        !self.pending_tags.is_empty()
    }

    /// Record the classes the engine compiled. Returns how many were newly
    /// compiled.
    pub fn mark_compiled<S: AsRef<str>>(&mut self, success: &[S]) -> usize {
        let mut count = 0;
        for class in success {
            let class = class.as_ref();
            self.pending_classes.remove(class);
            if self.compiled_classes.insert(class.to_string()) {
                count += 1;
            }
        }
        count
    }

    /// Drain pending tags into compiled, returning them sorted.
    pub fn take_pending_tags(&mut self) -> Vec<String> {
        let tags = sorted(&self.pending_tags);
        self.compiled_tags.extend(self.pending_tags.drain());
        tags
    }

    /// Re-queue everything compiled so far plus the configured seeds, then
    /// forget what was compiled. Used on init and on every config reload.
    pub fn reseed(&mut self, options: &ResolvedOptions) {
        let preflight = &options.preflight_options;

        let compiled_classes = std::mem::take(&mut self.compiled_classes);
        self.pending_classes.extend(compiled_classes);
        self.pending_classes.extend(options.safelist.iter().cloned());
        self.pending_classes
            .retain(|class| !options.blocklist.contains(class));

        let compiled_tags = std::mem::take(&mut self.compiled_tags);
        self.pending_tags.extend(compiled_tags);
        self.pending_tags
            .extend(PREFLIGHT_TAGS.iter().map(|tag| tag.to_string()));
        self.pending_tags.extend(preflight.safelist.iter().cloned());
        if preflight.include_all {
            self.pending_tags
                .extend(HTML_TAGS.iter().map(|tag| tag.to_string()));
        }
        self.pending_tags
            .retain(|tag| !preflight.blocklist.contains(tag));

        self.available_tags = HTML_TAGS
            .iter()
            .filter(|tag| !PREFLIGHT_TAGS.contains(*tag))
            .filter(|tag| !preflight.safelist.contains(**tag))
            .filter(|tag| !preflight.blocklist.contains(**tag))
            .filter(|tag| !self.pending_tags.contains(**tag))
            .map(|tag| tag.to_string())
            .collect();
    }

    /// Set invariants: a class is never both pending and compiled, a tag is in
    /// at most one of available, pending and compiled.
    pub fn is_consistent(&self) -> bool {
        self.compiled_classes.is_disjoint(&self.pending_classes)
            && self.available_tags.is_disjoint(&self.pending_tags)
            && self.available_tags.is_disjoint(&self.compiled_tags)
            && self.pending_tags.is_disjoint(&self.compiled_tags)
    }

    pub fn compiled_classes(&self) -> &FxHashSet<String> {
        &self.compiled_classes
    }

    pub fn compiled_tags(&self) -> &FxHashSet<String> {
        &self.compiled_tags
    }

    pub fn available_tags(&self) -> &FxHashSet<String> {
        &self.available_tags
    }
}

fn sorted(set: &FxHashSet<String>) -> Vec<String> {
    let mut items: Vec<String> = set.iter().cloned().collect();
    items.sort();
    items
}
