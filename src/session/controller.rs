use std::sync::Arc;

use log::{debug, info, warn};
use review_intel_common::{AnalysisResult, SampleDataset, UploadInfo};
use tokio::sync::{watch, Mutex};

use crate::client::{AnalysisApi, ApiResult, DatasetFile};

use super::{DatasetRef, DatasetSource, SessionState, SessionStatus};

/// 投入の結末
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// この投入の結果が状態に反映された
    Applied(SessionStatus),
    /// 後続の投入か reset に追い越され、結果は捨てられた
    Superseded,
}

struct Shared {
    /// 投入・reset のたびに増える。一致する応答だけを反映する
    generation: u64,
    state: SessionState,
}

/// 解析セッションの唯一の書き手
///
/// 状態の読み出しは `state()`、変化の購読は `subscribe()`。
/// ロックはネットワーク待ちの間は保持しない
#[derive(Clone)]
pub struct SessionController {
    api: Arc<dyn AnalysisApi>,
    shared: Arc<Mutex<Shared>>,
    notifier: Arc<watch::Sender<SessionState>>,
}

impl SessionController {
    pub fn new(api: Arc<dyn AnalysisApi>) -> Self {
        let (notifier, _) = watch::channel(SessionState::Idle);
        Self {
            api,
            shared: Arc::new(Mutex::new(Shared {
                generation: 0,
                state: SessionState::Idle,
            })),
            notifier: Arc::new(notifier),
        }
    }

    pub async fn state(&self) -> SessionState {
        self.shared.lock().await.state.clone()
    }

    pub async fn status(&self) -> SessionStatus {
        self.shared.lock().await.state.status()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.notifier.subscribe()
    }

    /// CSVファイルをアップロードして解析する
    pub async fn submit_file(&self, file: DatasetFile) -> SubmitOutcome {
        let source = DatasetSource::File {
            file_name: file.file_name.clone(),
        };
        let generation = self.begin(source.clone()).await;
        let api = self.api.clone();
        self.run(generation, &source, async move { api.upload_dataset(file).await })
            .await
    }

    /// サンプルデータセットを読み込んで解析する
    pub async fn submit_sample_dataset(&self, dataset_id: &str) -> SubmitOutcome {
        let source = DatasetSource::Sample {
            dataset_id: dataset_id.to_string(),
        };
        let generation = self.begin(source.clone()).await;
        let api = self.api.clone();
        let id = dataset_id.to_string();
        self.run(generation, &source, async move { api.load_sample_dataset(&id).await })
            .await
    }

    /// どの状態からでも Idle に戻す。実行中の投入の結果は以後無視される
    pub async fn reset(&self) {
        let mut shared = self.shared.lock().await;
        shared.generation += 1;
        if shared.state.is_loading() {
            info!("reset during loading; generation {} abandoned", shared.generation - 1);
        }
        self.transition(&mut shared, SessionState::Idle);
    }

    /// サンプルデータセット一覧（失敗時は空）
    pub async fn list_sample_datasets(&self) -> Vec<SampleDataset> {
        match self.api.list_sample_datasets().await {
            Ok(samples) => samples,
            Err(e) => {
                warn!("failed to list sample datasets: {}", e);
                Vec::new()
            }
        }
    }

    async fn begin(&self, source: DatasetSource) -> u64 {
        let mut shared = self.shared.lock().await;
        shared.generation += 1;
        info!("submit #{}: {}", shared.generation, source.label());
        self.transition(
            &mut shared,
            SessionState::Loading {
                source,
                dataset: None,
            },
        );
        shared.generation
    }

    /// 読み込み → 解析 の2段階
    async fn run<F>(&self, generation: u64, source: &DatasetSource, load: F) -> SubmitOutcome
    where
        F: std::future::Future<Output = ApiResult<UploadInfo>>,
    {
        let info = match load.await {
            Ok(info) => info,
            Err(e) => return self.settle(generation, source, Err(e)).await,
        };

        let dataset = DatasetRef::from(&info);
        if !self.attach_dataset(generation, &dataset).await {
            // 追い越されたので解析は呼ばない
            debug!("submit #{} superseded before analyze", generation);
            return SubmitOutcome::Superseded;
        }

        let analyzed = self
            .api
            .analyze(&info.file_id)
            .await
            .map(|result| (dataset, result));
        self.settle(generation, source, analyzed).await
    }

    async fn attach_dataset(&self, generation: u64, dataset: &DatasetRef) -> bool {
        let mut shared = self.shared.lock().await;
        if shared.generation != generation {
            return false;
        }
        let source = match &shared.state {
            SessionState::Loading { source, .. } => source.clone(),
            _ => return true,
        };
        self.transition(
            &mut shared,
            SessionState::Loading {
                source,
                dataset: Some(dataset.clone()),
            },
        );
        true
    }

    async fn settle(
        &self,
        generation: u64,
        source: &DatasetSource,
        outcome: ApiResult<(DatasetRef, AnalysisResult)>,
    ) -> SubmitOutcome {
        let mut shared = self.shared.lock().await;
        if shared.generation != generation {
            debug!(
                "discarding stale response for submit #{} (current #{})",
                generation, shared.generation
            );
            return SubmitOutcome::Superseded;
        }

        let next = match outcome {
            Ok((dataset, result)) => {
                info!(
                    "submit #{} analyzed: {} reviews",
                    generation, result.overview.total_reviews
                );
                SessionState::Analyzed {
                    dataset,
                    result: Arc::new(result),
                }
            }
            Err(e) => {
                warn!("submit #{} failed ({}): {}", generation, e.kind(), e);
                SessionState::Error {
                    message: e.user_message(source.fallback_message()),
                }
            }
        };
        let status = next.status();
        self.transition(&mut shared, next);
        SubmitOutcome::Applied(status)
    }

    fn transition(&self, shared: &mut Shared, next: SessionState) {
        debug!("session {:?} -> {:?}", shared.state.status(), next.status());
        shared.state = next;
        self.notifier.send_replace(shared.state.clone());
    }
}
