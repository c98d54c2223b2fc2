//! A session initialized with a relative root. Kept in its own test binary
//! because it changes the process working directory.

mod common;

use std::fs;
use std::future::ready;

use common::RecordingFactory;
use gale::{FileUpdate, StyleSession, UserOptions};
use tempfile::TempDir;

#[tokio::test]
async fn relative_root_still_recognizes_config_changes() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("gale.config.toml"), "marker = \"v1-\"\n").expect("write config");
    fs::create_dir_all(dir.path().join("src")).expect("mkdir");
    fs::write(dir.path().join("src/App.vue"), r#"<div class="p-1"></div>"#).expect("write app");
    let root = dir.path().canonicalize().expect("canonical root");
    std::env::set_current_dir(&root).expect("chdir");

    let factory = RecordingFactory::new();
    let session = StyleSession::new(UserOptions::new(), factory.clone());
    session.init(".").await.expect("init");

    let config_path = root.join("gale.config.toml");
    assert_eq!(session.config_file_path().await, Some(config_path.clone()));
    assert!(session.generate_css().await.expect("css").contains("v1-p-1"));

    fs::write(&config_path, "marker = \"v2-\"\n").expect("rewrite config");
    let outcome = session
        .update_file(&config_path.to_string_lossy(), || ready(Ok(String::new())))
        .await
        .expect("update");
    assert_eq!(outcome, FileUpdate::ConfigReloaded);
    assert_eq!(factory.created(), 2);
    assert!(session.generate_css().await.expect("css").contains("v2-p-1"));
}
