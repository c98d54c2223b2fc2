//! Configuration for the gale utility-CSS engine.
//!
//! Holds the config file schema, conventional file discovery, the pluggable
//! loader, the lexical extractors and the option resolver that merges
//! defaults, the config file and user options into [`ResolvedOptions`].

pub mod config;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod loader;
pub mod options;
pub mod resolve;
pub mod util;

// Re-export main types
pub use config::*;
pub use error::*;
pub use options::*;

pub use discovery::{ConfigDiscovery, CONFIG_FILES, PACKAGE_JSON_FIELD};
pub use extract::{
    default_extractors, DefaultExtractor, Extracted, Extractor, ExtractorRule, SvelteExtractor,
};
pub use loader::{ConfigLoader, FileConfigLoader};
pub use resolve::{load_configuration, resolve_options, LoadedConfig};
pub use util::{absolute_path, kebab_case};
