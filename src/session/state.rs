use review_intel_common::{AnalysisResult, UploadInfo};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    #[default]
    Idle,
    Loading,
    Error,
    Analyzed,
}

/// 解析対象の出どころ
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    File { file_name: String },
    Sample { dataset_id: String },
}

impl DatasetSource {
    /// 失敗時にサーバーからの説明がない場合の文言
    pub fn fallback_message(&self) -> &'static str {
        match self {
            DatasetSource::File { .. } => "Upload failed",
            DatasetSource::Sample { .. } => "Failed to load sample data",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DatasetSource::File { file_name } => file_name,
            DatasetSource::Sample { dataset_id } => dataset_id,
        }
    }
}

/// 読み込み済みデータセットへの参照
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRef {
    pub file_id: String,
    pub file_name: String,
    pub total_rows: usize,
}

impl From<&UploadInfo> for DatasetRef {
    fn from(info: &UploadInfo) -> Self {
        Self {
            file_id: info.file_id.clone(),
            file_name: info.filename.clone(),
            total_rows: info.total_rows,
        }
    }
}

/// セッション状態
///
/// 各状態は自分に有効なフィールドだけを持つ。
/// 結果とエラーメッセージが同時に存在することはない
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Loading {
        source: DatasetSource,
        /// アップロード / サンプル読み込みが終わった時点で埋まる
        dataset: Option<DatasetRef>,
    },
    Analyzed {
        dataset: DatasetRef,
        result: Arc<AnalysisResult>,
    },
    Error {
        message: String,
    },
}

impl SessionState {
    pub fn status(&self) -> SessionStatus {
        match self {
            SessionState::Idle => SessionStatus::Idle,
            SessionState::Loading { .. } => SessionStatus::Loading,
            SessionState::Analyzed { .. } => SessionStatus::Analyzed,
            SessionState::Error { .. } => SessionStatus::Error,
        }
    }

    pub fn dataset(&self) -> Option<&DatasetRef> {
        match self {
            SessionState::Loading { dataset, .. } => dataset.as_ref(),
            SessionState::Analyzed { dataset, .. } => Some(dataset),
            SessionState::Idle | SessionState::Error { .. } => None,
        }
    }

    pub fn result(&self) -> Option<&Arc<AnalysisResult>> {
        match self {
            SessionState::Analyzed { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SessionState::Error { message } => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading { .. })
    }
}
