//! Tests for the reload manager.

use super::*;
use std::path::PathBuf;

#[tokio::test]
async fn start_with_nonexistent_path_uses_defaults() {
    let path = PathBuf::from("/tmp/nonexistent_appkit_reload_test.toml");
    let (config, _rx) = ReloadManager::start(path).await;
    assert_eq!(config, crate::AppConfig::default());
}

#[tokio::test]
async fn start_with_valid_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[runtime]
invoke_timeout_ms = 2000
"#,
    )
    .unwrap();

    let (config, rx) = ReloadManager::start(path).await;
    assert_eq!(config.runtime.invoke_timeout_ms, Some(2000));
    assert_eq!(rx.borrow().runtime.invoke_timeout_ms, Some(2000));
    assert_eq!(config.runtime.default_channel, "_top"); // default
}

#[tokio::test]
async fn start_with_invalid_values_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[runtime]\ndefault_channel = \"\"\n").unwrap();

    let (config, _rx) = ReloadManager::start(path).await;
    assert_eq!(config.runtime.default_channel, "_top");
}
