//! Config file schema.
//!
//! `StyleConfig` is what a `gale.config.*` file (or the `gale` field of
//! `package.json`) deserializes into. Keys are camelCase. Everything the option
//! resolver does not understand is kept in [`StyleConfig::extra`] and handed to
//! the style engine untouched.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, Result as ConfigResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
    /// `false` disables preflight, an object tunes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preflight: Option<PreflightSetting>,

    #[serde(default)]
    pub extract: ExtractConfig,

    #[serde(default, deserialize_with = "one_or_many")]
    pub safelist: Vec<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub blocklist: Vec<String>,

    #[serde(default, alias = "transformCSS", skip_serializing_if = "Option::is_none")]
    pub transform_css: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform_groups: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_utilities: Option<bool>,

    /// Theme customization, interpreted by the style engine
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub theme: Value,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub shortcuts: IndexMap<String, Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StyleConfig {
    /// Create from a JSON value (programmatic configs, tests).
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    /// Preflight options object from the file, if the file uses the object form.
    pub fn preflight_options(&self) -> Option<&PreflightConfig> {
        match &self.preflight {
            Some(PreflightSetting::Options(options)) => Some(options),
            _ => None,
        }
    }
}

/// Source-extraction section of a config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractConfig {
    #[serde(default, deserialize_with = "one_or_many")]
    pub include: Vec<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub exclude: Vec<String>,
}

/// `preflight = true | false | { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreflightSetting {
    Enabled(bool),
    Options(PreflightConfig),
}

impl PreflightSetting {
    pub fn is_enabled(&self) -> bool {
        match self {
            PreflightSetting::Enabled(enabled) => *enabled,
            PreflightSetting::Options(_) => true,
        }
    }
}

impl From<bool> for PreflightSetting {
    fn from(enabled: bool) -> Self {
        PreflightSetting::Enabled(enabled)
    }
}

impl From<PreflightConfig> for PreflightSetting {
    fn from(options: PreflightConfig) -> Self {
        PreflightSetting::Options(options)
    }
}

/// Partial preflight options, used by both config files and user options.
///
/// Unset fields fall back to the next source in precedence order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreflightConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_base: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_global: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_plugin: Option<bool>,

    /// Seed every known HTML tag instead of only the detected ones
    #[serde(default, alias = "enableAll", skip_serializing_if = "Option::is_none")]
    pub include_all: Option<bool>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub safelist: Vec<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub blocklist: Vec<String>,

    /// Component name to HTML tag, e.g. `router-link = "a"`
    #[serde(default)]
    pub alias: IndexMap<String, String>,
}

impl PreflightConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_include_base(mut self, enabled: bool) -> Self {
        self.include_base = Some(enabled);
        self
    }

    pub fn with_include_global(mut self, enabled: bool) -> Self {
        self.include_global = Some(enabled);
        self
    }

    pub fn with_include_plugin(mut self, enabled: bool) -> Self {
        self.include_plugin = Some(enabled);
        self
    }

    pub fn with_include_all(mut self, enabled: bool) -> Self {
        self.include_all = Some(enabled);
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

    pub fn alias(mut self, name: impl Into<String>, tag: impl Into<String>) -> Self {
        self.alias.insert(name.into(), tag.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Accept either `"a b"` or `["a", "b"]`.
pub(crate) fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}
