//! Dev-server host adapter for gale
//!
//! Serves the generated stylesheet as virtual modules, feeds transformed source
//! files to the session and reacts to hot updates.
//!
//! ## Architecture
//!
//! ```text
//! config_resolved(root) ──► session reset
//! transform(code, id)   ──► detect tokens / convert CSS
//! load(virtual id)      ──► generate_css (full or one layer)
//! handle_hot_update     ──► detect or reset ──► modules to invalidate
//!                                  └──► HostEvent::FullReload (after reset)
//! ```
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use gale_plugin::GalePlugin;
//! use gale::UserOptions;
//!
//! let plugin = GalePlugin::new(UserOptions::new(), my_engine_factory);
//! plugin.config_resolved("/path/to/project").await?;
//! let css = plugin.load(&plugin.resolve_id("virtual:gale.css").unwrap()).await?;
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use gale::{expand_variant_groups, EngineFactory, FileUpdate, PluginOptions, StyleSession};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

mod modules;

pub use modules::{VirtualModule, RESOLVED_PREFIX, VIRTUAL_PREFIX};

static CSS_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(post)?css(?:$|\?)").expect("valid css id regex"));

/// Notifications the host should act on outside of a hook's return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Reload every connected client
    FullReload { reason: String },
}

/// A file change reported by the host.
#[derive(Debug, Clone, Default)]
pub struct HotUpdate {
    pub file: String,
    /// Host module ids affected by the change
    pub modules: Vec<String>,
}

/// Host plugin wrapping one [`StyleSession`].
pub struct GalePlugin {
    session: Arc<StyleSession>,
    events_tx: UnboundedSender<HostEvent>,
    events_rx: Mutex<Option<UnboundedReceiver<HostEvent>>>,
}

impl GalePlugin {
    pub fn new<F>(options: impl Into<PluginOptions>, factory: F) -> Self
    where
        F: EngineFactory + 'static,
    {
        Self::with_session(Arc::new(StyleSession::new(options, factory)))
    }

    pub fn with_session(session: Arc<StyleSession>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            session,
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
        }
    }

    pub fn name(&self) -> &str {
        self.session.name()
    }

    pub fn session(&self) -> &Arc<StyleSession> {
        &self.session
    }

    /// Receiver for deferred host events. Can be taken once.
    pub fn events(&self) -> Option<UnboundedReceiver<HostEvent>> {
        self.events_rx.lock().take()
    }

    /// The host's config is known; (re)initialize for `root`.
    pub async fn config_resolved(&self, root: impl Into<PathBuf>) -> Result<()> {
        let root = root.into();
        self.session
            .init(&root)
            .await
            .with_context(|| format!("failed to initialize {} for {}", self.name(), root.display()))
    }

    pub fn resolve_id(&self, id: &str) -> Option<String> {
        VirtualModule::from_request(id).map(|module| module.resolved_id().to_string())
    }

    /// Generated CSS for a resolved virtual id, `None` for any other id.
    pub async fn load(&self, id: &str) -> Result<Option<String>> {
        let Some(module) = VirtualModule::from_resolved(id) else {
            return Ok(None);
        };

        let css = match module.layer() {
            Some(layer) => self.session.generate_css_layer(layer).await,
            None => self.session.generate_css().await,
        }
        .with_context(|| format!("failed to generate {}", id))?;

        Ok(Some(css))
    }

    /// Files the host should add to its watcher.
    pub async fn watch_files(&self) -> Vec<PathBuf> {
        self.session.config_file_path().await.into_iter().collect()
    }

    /// Convert CSS sources and pick up tokens from detect targets.
    ///
    /// Returns the rewritten code, or `None` to leave the module untouched.
    pub async fn transform(&self, code: &str, id: &str) -> Result<Option<String>> {
        let options = self.session.options().await;

        if CSS_ID.is_match(id) {
            if !options.transform_css {
                return Ok(None);
            }
            debug!("[gale:css] {}", id);
            let css = self
                .session
                .convert_css(code)
                .await
                .with_context(|| format!("failed to transform {}", id))?;
            return Ok(Some(css));
        }

        if !self.session.is_detect_target(id).await {
            return Ok(None);
        }

        self.session.detect_file(code, id).await;

        if options.transform_groups {
            if let Cow::Owned(expanded) = expand_variant_groups(code) {
                return Ok(Some(expanded));
            }
        }
        Ok(None)
    }

    /// React to a changed file.
    ///
    /// Returns the module ids to invalidate, or `None` when the file is none of
    /// this plugin's business.
    pub async fn handle_hot_update<F, Fut>(
        &self,
        update: HotUpdate,
        read: F,
    ) -> Result<Option<Vec<String>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = io::Result<String>>,
    {
        let outcome = self
            .session
            .update_file(&update.file, read)
            .await
            .with_context(|| format!("failed to update {}", update.file))?;

        let mut affected: Vec<String> = VirtualModule::ALL
            .into_iter()
            .map(|module| module.resolved_id().to_string())
            .collect();

        match outcome {
            FileUpdate::ConfigReloaded => {
                debug!("[gale:hmr] config file changed: {}", update.file);
                self.schedule_reload("configure file changed, reloading");
                Ok(Some(affected))
            }
            FileUpdate::Detected { .. } => {
                debug!("[gale:hmr] refreshed by {}", update.file);
                if !is_html(&update.file) {
                    affected.extend(update.modules);
                }
                Ok(Some(affected))
            }
            FileUpdate::Ignored => Ok(None),
        }
    }

    fn schedule_reload(&self, reason: &str) {
        info!("[{}] {}", self.name(), reason);
        // Nobody listening is fine; the host may not serve clients
        let _ = self.events_tx.send(HostEvent::FullReload {
            reason: reason.to_string(),
        });
    }
}

fn is_html(id: &str) -> bool {
    let path = id.split('?').next().unwrap_or(id);
    path.to_ascii_lowercase().ends_with(".html")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_ids() {
        assert!(CSS_ID.is_match("src/main.css"));
        assert!(CSS_ID.is_match("src/main.postcss"));
        assert!(CSS_ID.is_match("src/App.vue?vue&type=style&index=0&lang.css"));
        assert!(CSS_ID.is_match("src/main.css?inline"));
        assert!(!CSS_ID.is_match("src/main.cssx"));
        assert!(!CSS_ID.is_match("src/App.vue"));
    }

    #[test]
    fn test_is_html() {
        assert!(is_html("/project/index.html"));
        assert!(is_html("/project/INDEX.HTML?raw"));
        assert!(!is_html("/project/src/App.vue"));
    }
}
