use crate::client::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewIntelError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("ファイルが空です: {0}")]
    EmptyFile(String),

    #[error("解析に失敗しました: {0}")]
    Analysis(String),

    #[error("サンプルデータセットがありません")]
    NoSampleDatasets,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReviewIntelError>;
