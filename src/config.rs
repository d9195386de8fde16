use crate::error::{ReviewIntelError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const SERVER_URL_ENV: &str = "REVIEW_INTEL_SERVER_URL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub server_url: String,
    pub request_timeout_seconds: u64,
    /// これより短い入力では予測しない（文字数）
    pub predict_min_chars: usize,
    pub predict_debounce_ms: u64,
    /// テーマ設定。起動時に一度読み、切り替え時に書き戻す
    pub dark_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000".into(),
            request_timeout_seconds: 120,
            predict_min_chars: 10,
            predict_debounce_ms: 500,
            dark_mode: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ReviewIntelError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("review-intel").join("config.json"))
    }

    /// 解析サーバーのURL（環境変数を優先）
    pub fn server_url(&self) -> String {
        match std::env::var(SERVER_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
            _ => self.server_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn predict_debounce(&self) -> Duration {
        Duration::from_millis(self.predict_debounce_ms)
    }

    pub fn set_server_url(&mut self, url: String) -> Result<()> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ReviewIntelError::Config(format!(
                "URLは http:// または https:// で始めてください: {}",
                url
            )));
        }
        self.server_url = url;
        Ok(())
    }

    /// テーマを切り替えて保存先に書き戻す
    pub fn toggle_dark_mode(&mut self, path: &Path) -> Result<bool> {
        self.dark_mode = !self.dark_mode;
        self.save_to(path)?;
        Ok(self.dark_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.predict_min_chars, 10);
        assert_eq!(config.predict_debounce(), Duration::from_millis(500));
        assert!(!config.dark_mode);
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"dark_mode": true}"#).unwrap();
        assert!(config.dark_mode);
        assert_eq!(config.request_timeout_seconds, 120);
    }

    #[test]
    fn test_set_server_url_rejects_bare_host() {
        let mut config = Config::default();
        assert!(config.set_server_url("localhost:8000".into()).is_err());
        assert!(config.set_server_url("https://reviews.example.com".into()).is_ok());
        assert_eq!(config.server_url, "https://reviews.example.com");
    }
}
