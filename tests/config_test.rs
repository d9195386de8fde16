//! 設定ファイルテスト
//!
//! 保存・読み込み・テーマ切り替えを一時ディレクトリで検証

use review_intel::config::{Config, SERVER_URL_ENV};
use review_intel::predictor::PredictorConfig;
use std::time::Duration;
use tempfile::tempdir;

/// 設定ファイルがなければ既定値
#[test]
fn test_load_missing_file_uses_defaults() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = Config::load_from(&dir.path().join("config.json")).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.server_url, "http://localhost:8000");
}

#[test]
fn test_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("config.json");

    let mut config = Config::default();
    config
        .set_server_url("https://reviews.example.com".into())
        .unwrap();
    config.predict_debounce_ms = 300;
    config.save_to(&path).expect("設定保存失敗");

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(
        PredictorConfig::from(&loaded).debounce,
        Duration::from_millis(300)
    );
}

/// テーマは切り替えのたびに書き戻される
#[test]
fn test_toggle_dark_mode_persists() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");

    let mut config = Config::default();
    assert!(config.toggle_dark_mode(&path).unwrap());
    assert!(Config::load_from(&path).unwrap().dark_mode);

    assert!(!config.toggle_dark_mode(&path).unwrap());
    assert!(!Config::load_from(&path).unwrap().dark_mode);
}

#[test]
fn test_broken_file_is_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(Config::load_from(&path).is_err());
}

#[test]
fn test_server_url_trims_trailing_slash() {
    // 環境変数が設定されている環境では比較できない
    if std::env::var(SERVER_URL_ENV).is_ok() {
        return;
    }
    let config = Config {
        server_url: "http://localhost:8000/".into(),
        ..Default::default()
    };
    assert_eq!(config.server_url(), "http://localhost:8000");
}
