//! Config file loading.
//!
//! Files are re-read on every call, so a watcher-triggered reload always sees the
//! current content.

use std::ffi::OsStr;
use std::path::Path;

use figment::providers::{Format, Json, Toml, Yaml};
use figment::Figment;

use crate::config::StyleConfig;
use crate::discovery::PACKAGE_JSON_FIELD;
use crate::error::{ConfigError, Result};

/// Turns a config file path into a [`StyleConfig`].
pub trait ConfigLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<StyleConfig>;
}

/// Loads TOML, JSON, YAML and `package.json` config files through figment.
///
/// A document whose top level is `{ default = { ... } }` is unwrapped to the
/// inner table.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileConfigLoader;

impl ConfigLoader for FileConfigLoader {
    fn load(&self, path: &Path) -> Result<StyleConfig> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        tracing::debug!("[gale:config] loading from {}", path.display());

        let mut figment = provider_for(path)?;
        if figment.contains("default") {
            figment = figment.focus("default");
        }

        figment
            .extract::<StyleConfig>()
            .map_err(|e| ConfigError::load_failed(path, e))
    }
}

fn provider_for(path: &Path) -> Result<Figment> {
    if path.file_name() == Some(OsStr::new("package.json")) {
        return Ok(Figment::from(Json::file_exact(path)).focus(PACKAGE_JSON_FIELD));
    }

    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "toml" => Ok(Figment::from(Toml::file_exact(path))),
        "json" => Ok(Figment::from(Json::file_exact(path))),
        "yaml" | "yml" => Ok(Figment::from(Yaml::file_exact(path))),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn loads_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gale.config.toml");
        fs::write(
            &path,
            r#"
safelist = ["p-1 p-2"]
transformCSS = false

[preflight]
includeBase = false
"#,
        )
        .unwrap();

        let config = FileConfigLoader.load(&path).unwrap();
        assert_eq!(config.safelist, vec!["p-1 p-2"]);
        assert_eq!(config.transform_css, Some(false));
        assert_eq!(
            config.preflight_options().and_then(|p| p.include_base),
            Some(false)
        );
    }

    #[test]
    fn unwraps_default_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gale.config.json");
        fs::write(&path, r#"{ "default": { "blocklist": ["hidden"] } }"#).unwrap();

        let config = FileConfigLoader.load(&path).unwrap();
        assert_eq!(config.blocklist, vec!["hidden"]);
    }

    #[test]
    fn loads_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gale.config.yaml");
        fs::write(&path, "preflight: false\nsortUtilities: false\n").unwrap();

        let config = FileConfigLoader.load(&path).unwrap();
        assert_eq!(config.sort_utilities, Some(false));
        assert!(!config.preflight.unwrap().is_enabled());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = FileConfigLoader.load(&dir.path().join("gale.config.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn malformed_file_is_load_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gale.config.toml");
        fs::write(&path, "safelist = [").unwrap();

        let result = FileConfigLoader.load(&path);
        assert!(matches!(result, Err(ConfigError::LoadFailed { .. })));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gale.config.js");
        fs::write(&path, "module.exports = {}").unwrap();

        let result = FileConfigLoader.load(&path);
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
