//! User-facing and resolved option types.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::config::{PreflightSetting, StyleConfig};
use crate::extract::{DefaultExtractor, Extractor, ExtractorRule};
use crate::loader::{ConfigLoader, FileConfigLoader};
use crate::util::absolute_path;

/// May replace the loaded config file value wholesale.
pub type ConfigHook = Arc<dyn Fn(&StyleConfig, Option<&Path>) -> Option<StyleConfig> + Send + Sync>;

/// May replace the resolved options wholesale.
pub type OptionsHook = Arc<dyn Fn(&ResolvedOptions) -> Option<ResolvedOptions> + Send + Sync>;

/// Where the style engine configuration comes from.
#[derive(Debug, Clone, Default)]
pub enum ConfigSource {
    /// Probe the conventional file names under the root
    #[default]
    Discover,
    /// Explicit path, relative to the root
    Path(PathBuf),
    /// Configuration built in code, no file involved
    Inline(StyleConfig),
}

/// `scan = true | false | { ... }`
#[derive(Debug, Clone)]
pub enum ScanSetting {
    Enabled(bool),
    Options(ScanUserOptions),
}

impl From<bool> for ScanSetting {
    fn from(enabled: bool) -> Self {
        ScanSetting::Enabled(enabled)
    }
}

impl From<ScanUserOptions> for ScanSetting {
    fn from(options: ScanUserOptions) -> Self {
        ScanSetting::Options(options)
    }
}

/// Scan options as given by the user. `dirs` and `file_extensions` replace the
/// defaults; `include`, `exclude` and `extractors` extend them.
#[derive(Debug, Clone, Default)]
pub struct ScanUserOptions {
    pub dirs: Option<Vec<String>>,
    pub file_extensions: Option<Vec<String>>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub run_on_startup: Option<bool>,
    pub extractors: Vec<ExtractorRule>,
}

impl ScanUserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.dirs = Some(dirs.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_file_extensions(
        mut self,
        extensions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.file_extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }

    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include.push(pattern.into());
        self
    }

    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    pub fn with_run_on_startup(mut self, enabled: bool) -> Self {
        self.run_on_startup = Some(enabled);
        self
    }

    pub fn with_extractor(mut self, rule: ExtractorRule) -> Self {
        self.extractors.push(rule);
        self
    }
}

/// Options supplied by the plugin user.
///
/// Unset scalars fall back to the config file, then to the built-in defaults.
#[derive(Clone, Default)]
pub struct UserOptions {
    pub root: Option<PathBuf>,
    pub config: ConfigSource,
    pub scan: Option<ScanSetting>,
    pub preflight: Option<PreflightSetting>,
    pub transform_css: Option<bool>,
    pub transform_groups: Option<bool>,
    pub sort_utilities: Option<bool>,
    pub safelist: Vec<String>,
    pub blocklist: Vec<String>,
    pub on_config_resolved: Option<ConfigHook>,
    pub on_options_resolved: Option<OptionsHook>,
}

impl UserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config = ConfigSource::Path(path.into());
        self
    }

    pub fn with_config(mut self, config: StyleConfig) -> Self {
        self.config = ConfigSource::Inline(config);
        self
    }

    pub fn with_scan(mut self, scan: impl Into<ScanSetting>) -> Self {
        self.scan = Some(scan.into());
        self
    }

    pub fn with_preflight(mut self, preflight: impl Into<PreflightSetting>) -> Self {
        self.preflight = Some(preflight.into());
        self
    }

    pub fn with_transform_css(mut self, enabled: bool) -> Self {
        self.transform_css = Some(enabled);
        self
    }

    pub fn with_transform_groups(mut self, enabled: bool) -> Self {
        self.transform_groups = Some(enabled);
        self
    }

    pub fn with_sort_utilities(mut self, enabled: bool) -> Self {
        self.sort_utilities = Some(enabled);
        self
    }

    pub fn safelist(mut self, entry: impl Into<String>) -> Self {
        self.safelist.push(entry.into());
        self
    }

    pub fn blocklist(mut self, entry: impl Into<String>) -> Self {
        self.blocklist.push(entry.into());
        self
    }

    pub fn on_config_resolved<F>(mut self, hook: F) -> Self
    where
        F: Fn(&StyleConfig, Option<&Path>) -> Option<StyleConfig> + Send + Sync + 'static,
    {
        self.on_config_resolved = Some(Arc::new(hook));
        self
    }

    pub fn on_options_resolved<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ResolvedOptions) -> Option<ResolvedOptions> + Send + Sync + 'static,
    {
        self.on_options_resolved = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for UserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserOptions")
            .field("root", &self.root)
            .field("config", &self.config)
            .field("scan", &self.scan)
            .field("preflight", &self.preflight)
            .field("transform_css", &self.transform_css)
            .field("transform_groups", &self.transform_groups)
            .field("sort_utilities", &self.sort_utilities)
            .field("safelist", &self.safelist)
            .field("blocklist", &self.blocklist)
            .field("on_config_resolved", &self.on_config_resolved.is_some())
            .field("on_options_resolved", &self.on_options_resolved.is_some())
            .finish()
    }
}

/// Settings of the integration itself rather than of the user's project.
#[derive(Clone)]
pub struct UtilsOptions {
    /// Prefix used in log messages
    pub name: String,
    /// Root supplied by the host, used when the user gave none
    pub root: Option<PathBuf>,
    pub loader: Arc<dyn ConfigLoader>,
}

impl UtilsOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_loader<L: ConfigLoader + 'static>(mut self, loader: L) -> Self {
        self.loader = Arc::new(loader);
        self
    }
}

impl Default for UtilsOptions {
    fn default() -> Self {
        Self {
            name: "gale".to_string(),
            root: None,
            loader: Arc::new(FileConfigLoader),
        }
    }
}

impl fmt::Debug for UtilsOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UtilsOptions")
            .field("name", &self.name)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

/// Input to the resolver: raw user options, or a value that was already
/// resolved and must be passed through untouched.
#[derive(Debug, Clone)]
pub enum PluginOptions {
    User(UserOptions),
    Resolved(Arc<ResolvedOptions>),
}

impl Default for PluginOptions {
    fn default() -> Self {
        PluginOptions::User(UserOptions::default())
    }
}

impl From<UserOptions> for PluginOptions {
    fn from(options: UserOptions) -> Self {
        PluginOptions::User(options)
    }
}

impl From<Arc<ResolvedOptions>> for PluginOptions {
    fn from(options: Arc<ResolvedOptions>) -> Self {
        PluginOptions::Resolved(options)
    }
}

impl From<ResolvedOptions> for PluginOptions {
    fn from(options: ResolvedOptions) -> Self {
        PluginOptions::Resolved(Arc::new(options))
    }
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub dirs: Vec<String>,
    pub file_extensions: Vec<String>,
    /// Globs relative to the root, including the ones built from `dirs`
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub run_on_startup: bool,
    pub extractors: Vec<ExtractorRule>,
}

impl ScanOptions {
    /// Extractor for a file, picked by extension.
    pub fn extractor_for(&self, id: &str) -> &dyn Extractor {
        let extension = file_extension(id);
        self.extractors
            .iter()
            .find(|rule| rule.matches(extension))
            .map(|rule| rule.extractor.as_ref())
            .unwrap_or(&DefaultExtractor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightOptions {
    pub include_base: bool,
    pub include_global: bool,
    pub include_plugin: bool,
    pub include_all: bool,
    pub safelist: IndexSet<String>,
    pub blocklist: IndexSet<String>,
    /// Keys are kebab-case
    pub alias: IndexMap<String, String>,
}

impl PreflightOptions {
    pub fn alias_for(&self, kebab_name: &str) -> Option<&str> {
        self.alias.get(kebab_name).map(String::as_str)
    }
}

/// Fully merged options. Shared as `Arc<ResolvedOptions>` and never mutated.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub root: PathBuf,
    pub config: StyleConfig,
    pub config_file_path: Option<PathBuf>,
    pub enable_scan: bool,
    pub scan_options: ScanOptions,
    pub enable_preflight: bool,
    pub preflight_options: PreflightOptions,
    pub safelist: IndexSet<String>,
    pub blocklist: IndexSet<String>,
    pub transform_css: bool,
    pub transform_groups: bool,
    pub sort_utilities: bool,
}

impl ResolvedOptions {
    /// Both sides are compared in absolute, normalized form.
    pub fn is_config_file(&self, path: &Path) -> bool {
        self.config_file_path
            .as_deref()
            .is_some_and(|own| absolute_path(own) == absolute_path(path))
    }
}

/// Extension of a module id, ignoring any `?query` suffix.
pub(crate) fn file_extension(id: &str) -> &str {
    let path = id.split('?').next().unwrap_or(id);
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext,
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::SvelteExtractor;

    #[test]
    fn file_extension_ignores_query_and_dotfiles() {
        assert_eq!(file_extension("/src/App.vue"), "vue");
        assert_eq!(file_extension("/src/App.vue?vue&type=style"), "vue");
        assert_eq!(file_extension("/src/.hidden"), "");
        assert_eq!(file_extension("C:\\src\\page.HTML"), "HTML");
    }

    #[test]
    fn user_options_builder() {
        let options = UserOptions::new()
            .with_root("/project")
            .with_preflight(false)
            .safelist("p-1")
            .with_scan(ScanUserOptions::new().with_dirs(["app"]));

        assert_eq!(options.root, Some(PathBuf::from("/project")));
        assert_eq!(options.preflight, Some(PreflightSetting::Enabled(false)));
        assert_eq!(options.safelist, vec!["p-1"]);
        assert!(matches!(options.scan, Some(ScanSetting::Options(_))));
    }

    #[test]
    fn extractor_for_falls_back_to_default() {
        let scan = ScanOptions {
            dirs: vec![],
            file_extensions: vec![],
            include: vec![],
            exclude: vec![],
            run_on_startup: true,
            extractors: vec![ExtractorRule::new(["svelte"], SvelteExtractor)],
        };

        let svelte = scan.extractor_for("Button.svelte").extract("<b class:p-2={x}>");
        assert_eq!(svelte.classes, vec!["p-2"]);

        let html = scan.extractor_for("index.html").extract("<b class:p-2={x}>");
        assert!(html.classes.is_empty());
    }
}
