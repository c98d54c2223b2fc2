//! Running aggregate stylesheet with a per-layer serialization cache.

use rustc_hash::FxHashMap;

use crate::engine::StyleEngine;
use crate::stylesheet::{Layer, StyleSheet};

/// Owns the stylesheet of one session. Cached text is dropped only when rules
/// are added or the sheet is sorted.
#[derive(Debug, Default)]
pub struct StyleAccumulator {
    sheet: StyleSheet,
    /// `None` is the full build
    cache: FxHashMap<Option<Layer>, String>,
}

impl StyleAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if any rule was added.
    pub fn extend(&mut self, fragment: StyleSheet, is_preflight: bool) -> bool {
        let added = self.sheet.extend(fragment, is_preflight);
        if added > 0 {
            self.cache.clear();
        }
        added > 0
    }

    /// Apply the engine's rule order. Call once per pass, after every extend.
    pub fn sort(&mut self, engine: &dyn StyleEngine) {
        self.sheet.sort_by(|a, b| engine.compare_rules(a, b));
        self.cache.clear();
    }

    pub fn build(&mut self) -> String {
        self.cached(None)
    }

    pub fn build_layer(&mut self, layer: Layer) -> String {
        self.cached(Some(layer))
    }

    pub fn is_cached(&self, layer: Option<Layer>) -> bool {
        self.cache.contains_key(&layer)
    }

    fn cached(&mut self, layer: Option<Layer>) -> String {
        let sheet = &self.sheet;
        self.cache
            .entry(layer)
            .or_insert_with(|| match layer {
                Some(layer) => sheet.build_layer(layer),
                None => sheet.build(),
            })
            .clone()
    }
}
