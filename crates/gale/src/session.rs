//! Per-project style session: reset/init, the initial scan, per-file updates and
//! compilation passes.
//!
//! ## Architecture
//!
//! ```text
//! init/reset ──► resolve options ──► new engine ──► reseed tokens
//!                                                        │
//! search() / update_file() ──► detector ──► pending sets ┘
//!                                               │
//! generate_css() ──► engine.interpret / preflight ──► accumulator ──► CSS
//! ```
//!
//! Everything that touches the token sets or the stylesheet runs under one
//! `tokio::sync::Mutex`, held across engine awaits, so a compilation pass and a
//! reset never interleave.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gale_config::{resolve_options, PluginOptions, ResolvedOptions, UtilsOptions};
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinSet;
use tracing::{debug, error, info, trace, warn};

use crate::accumulator::StyleAccumulator;
use crate::detect::TokenDetector;
use crate::engine::{tag_tokens, EngineFactory, PreflightFlags, StyleEngine};
use crate::error::Result;
use crate::scan::ProjectScanner;
use crate::stylesheet::Layer;
use crate::tokens::TokenStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Ready,
    Scanning,
    Resetting,
}

/// Outcome of [`StyleSession::update_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileUpdate {
    /// The config file changed and the session was reset
    ConfigReloaded,
    /// A detect target was re-read; `changed` if new tokens were queued
    Detected { changed: bool },
    /// Not a file this session cares about
    Ignored,
}

struct SessionState {
    options: Arc<ResolvedOptions>,
    engine: Option<Arc<dyn StyleEngine>>,
    tokens: TokenStore,
    styles: StyleAccumulator,
    detector: TokenDetector,
}

impl SessionState {
    fn new(options: Arc<ResolvedOptions>) -> Self {
        Self {
            detector: TokenDetector::new(Arc::clone(&options)),
            options,
            engine: None,
            tokens: TokenStore::new(),
            styles: StyleAccumulator::new(),
        }
    }

    fn apply_reset(&mut self, options: Arc<ResolvedOptions>, engine: Arc<dyn StyleEngine>) {
        self.tokens.reseed(&options);
        self.detector = TokenDetector::new(Arc::clone(&options));
        self.styles = StyleAccumulator::new();
        self.engine = Some(engine);
        self.options = options;
    }

    /// One compilation pass. Returns `true` if the stylesheet was extended.
    async fn compile(&mut self) -> bool {
        let Some(engine) = self.engine.clone() else {
            return false;
        };
        let mut changed = false;

        if self.tokens.has_pending_classes() {
            let pending = self.tokens.pending_classes();
            let result = engine.interpret(&pending.join(" ")).await;
            if !result.success.is_empty() {
                let count = self.tokens.mark_compiled(&result.success);
                debug!("[gale:compile] compiled {} classes", count);
                trace!("[gale:compile] {:?}", result.success);
                if !result.ignored.is_empty() {
                    trace!("[gale:compile] ignored {:?}", result.ignored);
                }
                self.styles.extend(result.style_sheet, false);
                changed = true;
            }
        }

        if self.options.enable_preflight && self.tokens.has_pending_tags() {
            let tags = self.tokens.take_pending_tags();
            let flags = PreflightFlags::from(&self.options.preflight_options);
            let sheet = engine.preflight(&tag_tokens(&tags), flags).await;
            debug!("[gale:compile] preflight for {} tags", tags.len());
            self.styles.extend(sheet, true);
            changed = true;
        }

        if changed && self.options.sort_utilities {
            self.styles.sort(engine.as_ref());
        }

        changed
    }
}

/// Incremental style state of one project.
///
/// # Example
///
/// ```rust,ignore
/// use gale::{StyleSession, UserOptions};
///
/// let session = StyleSession::new(UserOptions::new(), my_engine_factory);
/// session.init("/path/to/project").await?;
/// let css = session.generate_css().await?;
/// ```
pub struct StyleSession {
    options: PluginOptions,
    utils: UtilsOptions,
    factory: Arc<dyn EngineFactory>,
    /// Set by the host once its config is resolved
    root: RwLock<Option<PathBuf>>,
    phase: Mutex<SessionPhase>,
    /// Serializes resets with first-use initialization
    reset_lock: tokio::sync::Mutex<()>,
    state: tokio::sync::Mutex<SessionState>,
    /// Single in-flight initial scan, shared by concurrent callers
    scan: tokio::sync::OnceCell<usize>,
}

impl StyleSession {
    pub fn new<F>(options: impl Into<PluginOptions>, factory: F) -> Self
    where
        F: EngineFactory + 'static,
    {
        Self::with_utils(options, UtilsOptions::default(), factory)
    }

    pub fn with_utils<F>(options: impl Into<PluginOptions>, utils: UtilsOptions, factory: F) -> Self
    where
        F: EngineFactory + 'static,
    {
        let options = options.into();
        let initial = resolve_options(options.clone(), &utils, false);
        Self {
            options,
            utils,
            factory: Arc::new(factory),
            root: RwLock::new(None),
            phase: Mutex::new(SessionPhase::Uninitialized),
            reset_lock: tokio::sync::Mutex::new(()),
            state: tokio::sync::Mutex::new(SessionState::new(initial)),
            scan: tokio::sync::OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.utils.name
    }

    pub fn phase(&self) -> SessionPhase {
        *self.phase.lock()
    }

    fn set_phase(&self, phase: SessionPhase) {
        *self.phase.lock() = phase;
    }

    fn utils(&self) -> UtilsOptions {
        let mut utils = self.utils.clone();
        if let Some(root) = self.root.read().clone() {
            utils.root = Some(root);
        }
        utils
    }

    /// Set the project root and run a reset.
    pub async fn init(&self, root: impl Into<PathBuf>) -> Result<()> {
        *self.root.write() = Some(root.into());
        self.reset().await
    }

    /// Re-resolve options (loading the config file), build a new engine and
    /// start over with an empty stylesheet. Everything compiled so far is queued
    /// again. If the engine cannot be built the session is left as it was.
    pub async fn reset(&self) -> Result<()> {
        let _guard = self.reset_lock.lock().await;
        self.reset_locked().await
    }

    async fn reset_locked(&self) -> Result<()> {
        let previous = self.phase();
        self.set_phase(SessionPhase::Resetting);

        let options = resolve_options(self.options.clone(), &self.utils(), true);
        let engine = match self.factory.create(&options.config) {
            Ok(engine) => engine,
            Err(err) => {
                error!("[{}] failed to create style engine: {}", self.name(), err);
                self.set_phase(previous);
                return Err(err.into());
            }
        };

        let mut state = self.state.lock().await;
        state.apply_reset(options, engine);
        drop(state);

        self.set_phase(SessionPhase::Ready);
        debug!("[{}] session reset", self.name());
        Ok(())
    }

    async fn ensure_initialized(&self) -> Result<()> {
        let _guard = self.reset_lock.lock().await;
        if self.phase() == SessionPhase::Uninitialized {
            self.reset_locked().await?;
        }
        Ok(())
    }

    pub async fn options(&self) -> Arc<ResolvedOptions> {
        Arc::clone(&self.state.lock().await.options)
    }

    pub async fn config_file_path(&self) -> Option<PathBuf> {
        self.state.lock().await.options.config_file_path.clone()
    }

    pub async fn is_config_file(&self, id: &str) -> bool {
        self.state.lock().await.options.is_config_file(Path::new(id))
    }

    pub async fn is_detect_target(&self, id: &str) -> bool {
        self.state.lock().await.detector.is_target(id)
    }

    /// Copy of the current token sets.
    pub async fn tokens(&self) -> TokenStore {
        self.state.lock().await.tokens.clone()
    }

    /// Scan the project once. Concurrent and later callers share the first
    /// scan. Returns the number of files detected. A scan that cannot run is
    /// logged and counts as zero files.
    pub async fn search(&self) -> usize {
        *self.scan.get_or_init(|| self.run_scan()).await
    }

    async fn run_scan(&self) -> usize {
        let options = self.options().await;
        if !options.enable_scan || !options.scan_options.run_on_startup {
            debug!("[gale:scan] skipped");
            return 0;
        }

        let began_ready = {
            let mut phase = self.phase.lock();
            let ready = *phase == SessionPhase::Ready;
            if ready {
                *phase = SessionPhase::Scanning;
            }
            ready
        };
        let detected = match self.scan_files(&options).await {
            Ok(detected) => detected,
            Err(err) => {
                error!("[gale:scan] failed to scan {}: {}", options.root.display(), err);
                0
            }
        };

        // A reset that ran meanwhile owns the phase
        if began_ready {
            let mut phase = self.phase.lock();
            if *phase == SessionPhase::Scanning {
                *phase = SessionPhase::Ready;
            }
        }
        detected
    }

    async fn scan_files(&self, options: &ResolvedOptions) -> Result<usize> {
        let scanner = ProjectScanner::new(options.root.clone(), &options.scan_options)?;
        debug!("[gale:scan] include {:?}", options.scan_options.include);

        let files = tokio::task::spawn_blocking(move || scanner.collect_files()).await??;
        debug!("[gale:scan] {} files", files.len());

        let mut reads = JoinSet::new();
        for path in files {
            reads.spawn(async move {
                let content = tokio::fs::read_to_string(&path).await;
                (path, content)
            });
        }

        let mut detected = 0;
        while let Some(joined) = reads.join_next().await {
            let (path, content) = match joined {
                Ok(read) => read,
                Err(err) => {
                    warn!("[gale:scan] read task failed: {}", err);
                    continue;
                }
            };
            match content {
                Ok(content) => {
                    self.detect_file(&content, &path.to_string_lossy()).await;
                    detected += 1;
                }
                Err(err) => warn!("[gale:scan] failed to read {}: {}", path.display(), err),
            }
        }

        Ok(detected)
    }

    /// Detect tokens in one file. Returns `true` if anything new was queued.
    pub async fn detect_file(&self, content: &str, id: &str) -> bool {
        let mut state = self.state.lock().await;
        let SessionState {
            tokens, detector, ..
        } = &mut *state;

        if !detector.is_target(id) {
            return false;
        }
        !detector.detect(tokens, content, id).is_empty()
    }

    /// React to a changed file. The config file triggers a reset; other detect
    /// targets are read with `read` and detected; anything else is ignored
    /// without reading.
    pub async fn update_file<F, Fut>(&self, id: &str, read: F) -> Result<FileUpdate>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = io::Result<String>>,
    {
        if self.is_config_file(id).await {
            info!("[{}] config file changed: {}", self.name(), id);
            self.reset().await?;
            return Ok(FileUpdate::ConfigReloaded);
        }

        if !self.is_detect_target(id).await {
            return Ok(FileUpdate::Ignored);
        }

        let content = read().await?;
        let changed = self.detect_file(&content, id).await;
        Ok(FileUpdate::Detected { changed })
    }

    /// Full stylesheet for the project.
    pub async fn generate_css(&self) -> Result<String> {
        self.generate(None).await
    }

    /// Only the rules of one layer.
    pub async fn generate_css_layer(&self, layer: Layer) -> Result<String> {
        self.generate(Some(layer)).await
    }

    async fn generate(&self, layer: Option<Layer>) -> Result<String> {
        self.ensure_initialized().await?;
        self.search().await;

        let mut state = self.state.lock().await;
        if !state.compile().await && state.styles.is_cached(layer) {
            trace!("[gale:compile] serving cached css");
        }
        Ok(match layer {
            Some(layer) => state.styles.build_layer(layer),
            None => state.styles.build(),
        })
    }

    /// Rewrite CSS source through the current engine. Independent of the
    /// incremental cache.
    pub async fn convert_css(&self, css: &str) -> Result<String> {
        self.ensure_initialized().await?;
        let engine = self.state.lock().await.engine.clone();
        match engine {
            Some(engine) => Ok(engine.convert_css(css).await?),
            None => Ok(css.to_string()),
        }
    }
}
