//! Boundary to the external style engine.
//!
//! The session never inspects how a class becomes CSS. It hands the engine
//! batches of tokens and merges whatever comes back.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use gale_config::{PreflightOptions, StyleConfig};

use crate::error::EngineError;
use crate::stylesheet::{StyleRule, StyleSheet};

/// Result of interpreting a batch of class tokens.
#[derive(Debug, Clone, Default)]
pub struct Interpreted {
    /// Tokens that produced rules
    pub success: Vec<String>,
    /// Tokens the engine did not recognize
    pub ignored: Vec<String>,
    pub style_sheet: StyleSheet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreflightFlags {
    pub include_base: bool,
    pub include_global: bool,
    pub include_plugin: bool,
}

impl Default for PreflightFlags {
    fn default() -> Self {
        Self {
            include_base: true,
            include_global: true,
            include_plugin: true,
        }
    }
}

impl From<&PreflightOptions> for PreflightFlags {
    fn from(options: &PreflightOptions) -> Self {
        Self {
            include_base: options.include_base,
            include_global: options.include_global,
            include_plugin: options.include_plugin,
        }
    }
}

#[async_trait]
pub trait StyleEngine: Send + Sync {
    /// Compile space-separated class tokens.
    async fn interpret(&self, classes: &str) -> Interpreted;

    /// Base styles for the given tags, written as `<tag` tokens joined by spaces.
    async fn preflight(&self, tags: &str, flags: PreflightFlags) -> StyleSheet;

    /// Ordering used when utilities are sorted. Must be a total order; the
    /// sort itself is stable.
    fn compare_rules(&self, a: &StyleRule, b: &StyleRule) -> Ordering {
        default_rule_order(a, b)
    }

    /// Rewrite CSS source (`@apply`, `@layer`, theme functions).
    async fn convert_css(&self, css: &str) -> Result<String, EngineError>;
}

/// Layer order, preflight rules first within a layer.
pub fn default_rule_order(a: &StyleRule, b: &StyleRule) -> Ordering {
    a.layer
        .cmp(&b.layer)
        .then_with(|| b.preflight.cmp(&a.preflight))
}

/// `["html", "a"]` → `"<html <a"`.
pub fn tag_tokens<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(|tag| format!("<{}", tag.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds a fresh engine from configuration. Called on every reset.
pub trait EngineFactory: Send + Sync {
    fn create(&self, config: &StyleConfig) -> Result<Arc<dyn StyleEngine>, EngineError>;
}

impl<F> EngineFactory for F
where
    F: Fn(&StyleConfig) -> Result<Arc<dyn StyleEngine>, EngineError> + Send + Sync,
{
    fn create(&self, config: &StyleConfig) -> Result<Arc<dyn StyleEngine>, EngineError> {
        self(config)
    }
}
