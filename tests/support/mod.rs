//! テスト用の解析サーバーモック
//!
//! データセットごとに応答と遅延を台本として登録する。
//! 遅延は tokio の時計で待つので `start_paused` と組み合わせて使う

#![allow(dead_code)]

use async_trait::async_trait;
use review_intel::client::{AnalysisApi, ApiError, ApiResult, DatasetFile};
use review_intel_common::{AnalysisResult, PredictionResult, SampleDataset, UploadInfo};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// 1データセット分の台本
#[derive(Clone)]
pub struct Script {
    pub load_delay: Duration,
    pub load: ApiResult<UploadInfo>,
    pub analyze_delay: Duration,
    pub analyze: ApiResult<AnalysisResult>,
}

impl Script {
    /// 読み込み・解析とも成功する（`total_reviews` で結果を見分ける）
    pub fn ok(key: &str, total_reviews: u64) -> Self {
        let mut result = AnalysisResult::default();
        result.overview.total_reviews = total_reviews;
        Self {
            load_delay: Duration::ZERO,
            load: Ok(UploadInfo {
                file_id: key.to_string(),
                filename: key.to_string(),
                total_rows: total_reviews as usize,
                ..Default::default()
            }),
            analyze_delay: Duration::ZERO,
            analyze: Ok(result),
        }
    }

    pub fn load_fails(err: ApiError) -> Self {
        Self {
            load: Err(err),
            ..Self::ok("unused", 0)
        }
    }

    pub fn analyze_fails(key: &str, err: ApiError) -> Self {
        Self {
            analyze: Err(err),
            ..Self::ok(key, 0)
        }
    }

    pub fn delayed(mut self, load_ms: u64, analyze_ms: u64) -> Self {
        self.load_delay = Duration::from_millis(load_ms);
        self.analyze_delay = Duration::from_millis(analyze_ms);
        self
    }
}

pub struct MockApi {
    datasets: Mutex<HashMap<String, Script>>,
    samples: ApiResult<Vec<SampleDataset>>,
    predict_delay: Duration,
    predict_fails: AtomicBool,
    pub analyze_calls: AtomicUsize,
    pub predict_calls: AtomicUsize,
    pub predicted_texts: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            datasets: Mutex::new(HashMap::new()),
            samples: Ok(Vec::new()),
            predict_delay: Duration::from_millis(200),
            predict_fails: AtomicBool::new(false),
            analyze_calls: AtomicUsize::new(0),
            predict_calls: AtomicUsize::new(0),
            predicted_texts: Mutex::new(Vec::new()),
        }
    }

    /// `key` はファイル名またはサンプルID（解析時の file_id も同じ値）
    pub fn with_dataset(self, key: &str, script: Script) -> Self {
        self.datasets
            .lock()
            .unwrap()
            .insert(key.to_string(), script);
        self
    }

    pub fn with_samples(mut self, samples: ApiResult<Vec<SampleDataset>>) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_predict_delay(mut self, ms: u64) -> Self {
        self.predict_delay = Duration::from_millis(ms);
        self
    }

    pub fn fail_predictions(&self, fail: bool) {
        self.predict_fails.store(fail, Ordering::SeqCst);
    }

    pub fn analyze_count(&self) -> usize {
        self.analyze_calls.load(Ordering::SeqCst)
    }

    pub fn predict_count(&self) -> usize {
        self.predict_calls.load(Ordering::SeqCst)
    }

    fn script(&self, key: &str) -> ApiResult<Script> {
        self.datasets
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| ApiError::Server {
                status: 404,
                detail: Some(format!("Dataset not found: {}", key)),
            })
    }

    async fn load(&self, key: &str) -> ApiResult<UploadInfo> {
        let script = self.script(key)?;
        tokio::time::sleep(script.load_delay).await;
        script.load
    }
}

#[async_trait]
impl AnalysisApi for MockApi {
    async fn upload_dataset(&self, file: DatasetFile) -> ApiResult<UploadInfo> {
        self.load(&file.file_name).await
    }

    async fn load_sample_dataset(&self, dataset_id: &str) -> ApiResult<UploadInfo> {
        self.load(dataset_id).await
    }

    async fn list_sample_datasets(&self) -> ApiResult<Vec<SampleDataset>> {
        self.samples.clone()
    }

    async fn analyze(&self, file_id: &str) -> ApiResult<AnalysisResult> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        let script = self.script(file_id)?;
        tokio::time::sleep(script.analyze_delay).await;
        script.analyze
    }

    async fn predict(&self, text: &str) -> ApiResult<PredictionResult> {
        self.predict_calls.fetch_add(1, Ordering::SeqCst);
        self.predicted_texts.lock().unwrap().push(text.to_string());
        tokio::time::sleep(self.predict_delay).await;

        if self.predict_fails.load(Ordering::SeqCst) {
            return Err(ApiError::Server {
                status: 500,
                detail: Some("model not loaded".into()),
            });
        }
        Ok(PredictionResult {
            predicted_rating: 4.0,
            // どの入力に対する応答か見分けるため本文を返す
            sentiment: text.to_string(),
            sentiment_score: 0.5,
            confidence: 0.8,
        })
    }
}

pub fn sample(id: &str, name: &str) -> SampleDataset {
    SampleDataset {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        review_count: 100,
    }
}
