//! Incremental utility-class detection and stylesheet assembly.
//!
//! A [`StyleSession`] scans a project for utility classes and HTML tags, hands
//! only the newly seen ones to a [`StyleEngine`], and keeps the merged
//! stylesheet cached until something new turns up.
//!
//! ```text
//! source files ─► TokenDetector ─► TokenStore (pending) ─► StyleEngine
//!                                                              │
//!                  CSS ◄─ StyleAccumulator ◄─ StyleSheet ◄─────┘
//! ```

pub mod accumulator;
pub mod detect;
pub mod engine;
pub mod error;
pub mod groups;
pub mod scan;
pub mod session;
pub mod stylesheet;
pub mod tags;
pub mod tokens;

pub use accumulator::StyleAccumulator;
pub use detect::{Detection, TokenDetector};
pub use engine::{
    default_rule_order, tag_tokens, EngineFactory, Interpreted, PreflightFlags, StyleEngine,
};
pub use error::{EngineError, GaleError, Result};
pub use groups::expand_variant_groups;
pub use scan::ProjectScanner;
pub use session::{FileUpdate, SessionPhase, StyleSession};
pub use stylesheet::{Declaration, Layer, StyleRule, StyleSheet};
pub use tokens::TokenStore;

// Re-export configuration so hosts only need this crate
pub use gale_config::{
    PluginOptions, PreflightConfig, ResolvedOptions, ScanUserOptions, StyleConfig, UserOptions,
    UtilsOptions,
};
