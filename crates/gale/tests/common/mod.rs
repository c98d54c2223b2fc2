//! Recording style engine shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use gale::{
    EngineError, EngineFactory, Interpreted, Layer, PreflightFlags, StyleConfig, StyleEngine,
    StyleRule, StyleSheet,
};
use parking_lot::Mutex;

/// Compiles every class except the rejected ones into `.class { --utility: <marker><class> }`
/// and every tag into `tag { --preflight: <tag> }`. Records each call.
pub struct RecordingEngine {
    marker: String,
    reject: Vec<String>,
    pub interpret_calls: Mutex<Vec<String>>,
    pub preflight_calls: Mutex<Vec<String>>,
}

impl RecordingEngine {
    pub fn interpret_count(&self) -> usize {
        self.interpret_calls.lock().len()
    }

    pub fn preflight_count(&self) -> usize {
        self.preflight_calls.lock().len()
    }
}

pub fn selector(class: &str) -> String {
    let mut out = String::from(".");
    for ch in class.chars() {
        if matches!(ch, ':' | '/' | '.' | '!') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[async_trait]
impl StyleEngine for RecordingEngine {
    async fn interpret(&self, classes: &str) -> Interpreted {
        self.interpret_calls.lock().push(classes.to_string());

        let mut result = Interpreted::default();
        for class in classes.split_whitespace() {
            if self.reject.iter().any(|r| r == class) {
                result.ignored.push(class.to_string());
                continue;
            }
            result.style_sheet.add(
                StyleRule::utility(selector(class))
                    .declare("--utility", format!("{}{}", self.marker, class)),
            );
            result.success.push(class.to_string());
        }
        result
    }

    async fn preflight(&self, tags: &str, _flags: PreflightFlags) -> StyleSheet {
        self.preflight_calls.lock().push(tags.to_string());

        tags.split_whitespace()
            .filter_map(|token| token.strip_prefix('<'))
            .map(|tag| StyleRule::new(tag, Layer::Base).declare("--preflight", tag))
            .collect()
    }

    async fn convert_css(&self, css: &str) -> Result<String, EngineError> {
        if css.contains("@apply broken") {
            return Err(EngineError::convert_failed("unknown utility \"broken\""));
        }
        Ok(css.replace("@apply", "/* applied */"))
    }
}

/// Builds a new [`RecordingEngine`] per reset. The marker comes from the
/// `marker` key of the config.
#[derive(Clone, Default)]
pub struct RecordingFactory {
    pub engines: Arc<Mutex<Vec<Arc<RecordingEngine>>>>,
    pub fail: Arc<AtomicBool>,
    pub reject: Vec<String>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(classes: &[&str]) -> Self {
        Self {
            reject: classes.iter().map(|c| c.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn latest(&self) -> Arc<RecordingEngine> {
        Arc::clone(self.engines.lock().last().expect("an engine was created"))
    }

    pub fn created(&self) -> usize {
        self.engines.lock().len()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl EngineFactory for RecordingFactory {
    fn create(&self, config: &StyleConfig) -> Result<Arc<dyn StyleEngine>, EngineError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(EngineError::create_failed("factory configured to fail"));
        }
        let marker = config
            .extra
            .get("marker")
            .and_then(|value| value.as_str())
            .unwrap_or("")
            .to_string();
        let engine = Arc::new(RecordingEngine {
            marker,
            reject: self.reject.clone(),
            interpret_calls: Mutex::new(Vec::new()),
            preflight_calls: Mutex::new(Vec::new()),
        });
        self.engines.lock().push(Arc::clone(&engine));
        Ok(engine)
    }
}
