//! Option resolution: defaults ← config file ← user options.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::config::{PreflightConfig, PreflightSetting, StyleConfig};
use crate::discovery::ConfigDiscovery;
use crate::error::ConfigError;
use crate::extract::default_extractors;
use crate::options::{
    ConfigSource, PluginOptions, PreflightOptions, ResolvedOptions, ScanOptions, ScanSetting,
    ScanUserOptions, UserOptions, UtilsOptions,
};
use crate::util::{absolute_path, kebab_case, merge_lists, tokenize_entries};

pub const DEFAULT_FILE_EXTENSIONS: &[&str] =
    &["html", "vue", "md", "mdx", "pug", "jsx", "tsx", "svelte"];
pub const DEFAULT_DIRS: &[&str] = &["src"];
pub const DEFAULT_INCLUDE: &[&str] = &["index.html"];
pub const DEFAULT_EXCLUDE: &[&str] = &["node_modules", ".git"];
pub const DEFAULT_ALIAS: &[(&str, &str)] = &[("router-link", "a")];

/// Outcome of loading the config file.
#[derive(Debug, Default)]
pub struct LoadedConfig {
    pub resolved: StyleConfig,
    pub config_file_path: Option<PathBuf>,
    pub error: Option<ConfigError>,
}

/// Merge user options, the config file and defaults into [`ResolvedOptions`].
///
/// Already-resolved input is returned as is. Resolution never fails: config
/// problems are logged and the config file is treated as absent.
pub fn resolve_options(
    options: impl Into<PluginOptions>,
    utils: &UtilsOptions,
    load_config_file: bool,
) -> Arc<ResolvedOptions> {
    let options = match options.into() {
        PluginOptions::Resolved(resolved) => return resolved,
        PluginOptions::User(options) => options,
    };

    let LoadedConfig {
        resolved: config,
        config_file_path,
        ..
    } = if load_config_file {
        load_configuration(&options, utils)
    } else {
        LoadedConfig {
            resolved: inline_config(&options),
            ..LoadedConfig::default()
        }
    };

    let root = resolve_root(&options, utils);

    let (enable_scan, user_scan) = match &options.scan {
        None => (true, ScanUserOptions::default()),
        Some(ScanSetting::Enabled(enabled)) => (*enabled, ScanUserOptions::default()),
        Some(ScanSetting::Options(scan)) => (true, scan.clone()),
    };
    let scan_options = resolve_scan_options(&config, user_scan);

    let enable_preflight = options
        .preflight
        .as_ref()
        .or(config.preflight.as_ref())
        .map(PreflightSetting::is_enabled)
        .unwrap_or(true);
    let preflight_options = resolve_preflight_options(&config, options.preflight.as_ref());

    let safelist = tokenize_entries(&merge_lists([
        config.safelist.as_slice(),
        options.safelist.as_slice(),
    ]));
    let blocklist = tokenize_entries(&merge_lists([
        config.blocklist.as_slice(),
        options.blocklist.as_slice(),
    ]));

    let mut resolved = ResolvedOptions {
        root,
        enable_scan,
        scan_options,
        enable_preflight,
        preflight_options,
        safelist,
        blocklist,
        transform_css: options.transform_css.or(config.transform_css).unwrap_or(true),
        transform_groups: options
            .transform_groups
            .or(config.transform_groups)
            .unwrap_or(true),
        sort_utilities: options
            .sort_utilities
            .or(config.sort_utilities)
            .unwrap_or(true),
        config,
        config_file_path,
    };

    if let Some(hook) = &options.on_options_resolved {
        if let Some(modified) = hook(&resolved) {
            resolved = modified;
        }
    }

    Arc::new(resolved)
}

/// Locate and load the config file named by the user options.
///
/// An explicit path that does not exist is ignored with a warning; a file that
/// fails to load yields an empty config and no config path.
pub fn load_configuration(options: &UserOptions, utils: &UtilsOptions) -> LoadedConfig {
    let name = utils.name.as_str();
    let root = resolve_root(options, utils);
    let mut loaded = LoadedConfig::default();

    let candidate = match &options.config {
        ConfigSource::Inline(config) => {
            loaded.resolved = config.clone();
            None
        }
        ConfigSource::Discover => ConfigDiscovery::new(&root).find(),
        ConfigSource::Path(path) => {
            let full = absolute_path(&root.join(path));
            if full.is_file() {
                Some(full)
            } else {
                tracing::warn!(
                    "[{}] config file \"{}\" not found, ignored",
                    name,
                    path.display()
                );
                None
            }
        }
    };

    if let Some(path) = candidate {
        match utils.loader.load(&path) {
            Ok(config) => {
                loaded.resolved = config;
                loaded.config_file_path = Some(path);
            }
            Err(err) => {
                tracing::error!("[{}] failed to load config \"{}\"", name, path.display());
                tracing::error!("[{}] {}", name, err);
                loaded.error = Some(err);
            }
        }
    }

    if let Some(hook) = &options.on_config_resolved {
        if let Some(modified) = hook(&loaded.resolved, loaded.config_file_path.as_deref()) {
            loaded.resolved = modified;
        }
    }

    tracing::debug!("[{}:config] {:?}", name, loaded.resolved);

    loaded
}

fn inline_config(options: &UserOptions) -> StyleConfig {
    match &options.config {
        ConfigSource::Inline(config) => config.clone(),
        _ => StyleConfig::default(),
    }
}

fn resolve_root(options: &UserOptions, utils: &UtilsOptions) -> PathBuf {
    let root = options
        .root
        .as_deref()
        .or(utils.root.as_deref())
        .unwrap_or(Path::new("."));
    absolute_path(root)
}

fn resolve_scan_options(config: &StyleConfig, user: ScanUserOptions) -> ScanOptions {
    let dirs = user.dirs.unwrap_or_else(|| to_strings(DEFAULT_DIRS));
    let file_extensions = user
        .file_extensions
        .unwrap_or_else(|| to_strings(DEFAULT_FILE_EXTENSIONS));

    let exclude = merge_lists([
        to_strings(DEFAULT_EXCLUDE).as_slice(),
        config.extract.exclude.as_slice(),
        user.exclude.as_slice(),
    ]);
    let include = merge_lists([
        to_strings(DEFAULT_INCLUDE).as_slice(),
        config.extract.include.as_slice(),
        user.include.as_slice(),
        build_globs(&dirs, &file_extensions).as_slice(),
    ]);

    let mut extractors = default_extractors();
    extractors.extend(user.extractors);

    ScanOptions {
        dirs,
        file_extensions,
        include,
        exclude,
        run_on_startup: user.run_on_startup.unwrap_or(true),
        extractors,
    }
}

fn resolve_preflight_options(
    config: &StyleConfig,
    user: Option<&PreflightSetting>,
) -> PreflightOptions {
    let empty = PreflightConfig::default();
    let file = config.preflight_options().unwrap_or(&empty);
    let user = match user {
        Some(PreflightSetting::Options(options)) => options,
        _ => &empty,
    };

    let safelist = tokenize_entries(&merge_lists([
        file.safelist.as_slice(),
        user.safelist.as_slice(),
    ]))
    .into_iter()
    .map(|entry| rewrite_selector_entry(&entry))
    .collect();
    let blocklist = tokenize_entries(&merge_lists([
        file.blocklist.as_slice(),
        user.blocklist.as_slice(),
    ]));

    let mut alias: IndexMap<String, String> = DEFAULT_ALIAS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    for (name, tag) in file.alias.iter().chain(user.alias.iter()) {
        alias.insert(kebab_case(name), tag.clone());
    }
    alias.retain(|name, tag| !name.is_empty() && !tag.is_empty());

    PreflightOptions {
        include_base: user.include_base.or(file.include_base).unwrap_or(true),
        include_global: user.include_global.or(file.include_global).unwrap_or(true),
        include_plugin: user.include_plugin.or(file.include_plugin).unwrap_or(true),
        include_all: user.include_all.or(file.include_all).unwrap_or(false),
        safelist,
        blocklist,
        alias,
    }
}

/// `[data-theme]` → `div data-theme`, so raw selectors ride along with the
/// tag-based preflight safelist.
pub fn rewrite_selector_entry(entry: &str) -> String {
    match entry.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
        Some(selector) if !selector.is_empty() => format!("div {}", selector),
        _ => entry.to_string(),
    }
}

/// `src` + `[html, vue]` → `src/**/*.{html,vue}`.
pub fn build_globs(dirs: &[String], file_extensions: &[String]) -> Vec<String> {
    if file_extensions.is_empty() {
        return Vec::new();
    }

    let pattern = if file_extensions.len() > 1 {
        format!("**/*.{{{}}}", file_extensions.join(","))
    } else {
        format!("**/*.{}", file_extensions[0])
    };

    dirs.iter()
        .map(|dir| {
            let dir = dir.trim_start_matches("./").trim_end_matches('/');
            if dir.is_empty() || dir == "." {
                pattern.clone()
            } else {
                format!("{}/{}", dir, pattern)
            }
        })
        .collect()
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_entries_are_rewritten() {
        assert_eq!(rewrite_selector_entry("[data-foo]"), "div data-foo");
        assert_eq!(rewrite_selector_entry("h1"), "h1");
        assert_eq!(rewrite_selector_entry("[]"), "[]");
    }

    #[test]
    fn globs_for_one_or_many_extensions() {
        let dirs = vec!["src".to_string(), "./pages/".to_string()];
        assert_eq!(
            build_globs(&dirs, &["vue".to_string()]),
            vec!["src/**/*.vue", "pages/**/*.vue"]
        );
        assert_eq!(
            build_globs(&["src".to_string()], &["html".to_string(), "vue".to_string()]),
            vec!["src/**/*.{html,vue}"]
        );
        assert!(build_globs(&dirs, &[]).is_empty());
        assert_eq!(
            build_globs(&[".".to_string()], &["md".to_string()]),
            vec!["**/*.md"]
        );
    }
}
