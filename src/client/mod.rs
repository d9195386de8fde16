//! 解析サーバーとの境界
//!
//! セッション制御はこのトレイト越しにだけサーバーを呼ぶ。
//! 実装は HTTP 版（`HttpAnalysisClient`）とテスト用のモック

mod http;

pub use http::HttpAnalysisClient;

use async_trait::async_trait;
use review_intel_common::{AnalysisResult, PredictionResult, SampleDataset, UploadInfo};
use std::path::Path;
use thiserror::Error;

use crate::error::{ReviewIntelError, Result};

/// アップロードするデータセット（CSVのバイト列）
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl DatasetFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// ファイルを読み込む。存在しない・空のファイルは送信前に弾く
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ReviewIntelError::FileNotFound(path.display().to_string()));
        }
        let bytes = std::fs::read(path)?;
        if bytes.is_empty() {
            return Err(ReviewIntelError::EmptyFile(path.display().to_string()));
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "reviews.csv".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

/// サーバー呼び出しの失敗
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 2xx 以外の応答。`detail` はサーバーが返した説明文
    #[error("server returned {status}: {}", detail.as_deref().unwrap_or("no detail"))]
    Server { status: u16, detail: Option<String> },

    #[error("network error: {0}")]
    Network(String),

    /// 送信前のリクエスト組み立てに失敗した
    #[error("invalid request: {0}")]
    Request(String),

    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// 利用者に見せる一文
    ///
    /// サーバーの detail → 通信エラーの内容 → `fallback` の順に採用する
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Server {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ApiError::Server { status, detail: None } => {
                format!("Request failed with status code {}", status)
            }
            ApiError::Network(message) if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Server { status, .. } if *status < 500 => "rejected",
            ApiError::Server { .. } => "server",
            ApiError::Network(_) => "network",
            ApiError::Request(_) => "request",
            ApiError::Decode(_) => "decode",
        }
    }
}

impl From<review_intel_common::Error> for ApiError {
    fn from(err: review_intel_common::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// 解析サーバーの操作
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    async fn upload_dataset(&self, file: DatasetFile) -> ApiResult<UploadInfo>;

    async fn load_sample_dataset(&self, dataset_id: &str) -> ApiResult<UploadInfo>;

    async fn list_sample_datasets(&self) -> ApiResult<Vec<SampleDataset>>;

    async fn analyze(&self, file_id: &str) -> ApiResult<AnalysisResult>;

    async fn predict(&self, text: &str) -> ApiResult<PredictionResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_detail() {
        let err = ApiError::Server {
            status: 400,
            detail: Some("CSV must contain review_text and rating columns".into()),
        };
        assert_eq!(
            err.user_message("Upload failed"),
            "CSV must contain review_text and rating columns"
        );
        assert_eq!(err.kind(), "rejected");
    }

    #[test]
    fn test_user_message_without_detail() {
        let err = ApiError::Server {
            status: 502,
            detail: None,
        };
        assert_eq!(err.user_message("Upload failed"), "Request failed with status code 502");
        assert_eq!(err.kind(), "server");
    }

    #[test]
    fn test_user_message_fallback() {
        assert_eq!(
            ApiError::Network(String::new()).user_message("Failed to load sample data"),
            "Failed to load sample data"
        );
        assert_eq!(
            ApiError::Decode("missing field `overview`".into()).user_message("Upload failed"),
            "Upload failed"
        );
        assert_eq!(
            ApiError::Network("connection refused".into()).user_message("Upload failed"),
            "connection refused"
        );
    }

    #[test]
    fn test_request_error_kind_and_message() {
        let err = ApiError::Request("invalid mime type".into());
        assert_eq!(err.kind(), "request");
        assert_eq!(err.user_message("Upload failed"), "Upload failed");
    }
}
