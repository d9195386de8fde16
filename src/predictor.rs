//! 入力中レビューの評価予測
//!
//! キー入力ごとにタイマーを張り直し、入力が止まってから一度だけ予測を依頼する。
//! 表示するのは最新の入力に対する結果だけ。失敗は表示せず、結果なしに戻す

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use review_intel_common::PredictionResult;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::client::AnalysisApi;
use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictorConfig {
    /// これ未満の文字数では予測しない
    pub min_chars: usize,
    pub debounce: Duration,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            min_chars: 10,
            debounce: Duration::from_millis(500),
        }
    }
}

impl From<&Config> for PredictorConfig {
    fn from(config: &Config) -> Self {
        Self {
            min_chars: config.predict_min_chars,
            debounce: config.predict_debounce(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictorView {
    pub predicting: bool,
    pub result: Option<PredictionResult>,
}

/// 画面に出す内容
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PredictorDisplay<'a> {
    Empty,
    Predicting,
    Ready(&'a PredictionResult),
}

impl PredictorView {
    pub fn display(&self) -> PredictorDisplay<'_> {
        match (&self.result, self.predicting) {
            (_, true) => PredictorDisplay::Predicting,
            (Some(result), false) => PredictorDisplay::Ready(result),
            (None, false) => PredictorDisplay::Empty,
        }
    }
}

struct Inner {
    /// 入力のたびに増える。発行時と同じ値のときだけ応答を採用する
    generation: u64,
    /// 発火待ちのデバウンスタイマー
    pending: Option<JoinHandle<()>>,
    /// 応答待ちの依頼（発行時の世代）。空でない間は predicting のまま
    outstanding: HashSet<u64>,
    view: PredictorView,
}

impl Inner {
    fn in_flight(&self) -> bool {
        !self.outstanding.is_empty()
    }
}

#[derive(Clone)]
pub struct Predictor {
    api: Arc<dyn AnalysisApi>,
    config: PredictorConfig,
    inner: Arc<Mutex<Inner>>,
    notifier: Arc<watch::Sender<PredictorView>>,
}

impl Predictor {
    pub fn new(api: Arc<dyn AnalysisApi>, config: PredictorConfig) -> Self {
        let (notifier, _) = watch::channel(PredictorView::default());
        Self {
            api,
            config,
            inner: Arc::new(Mutex::new(Inner {
                generation: 0,
                pending: None,
                outstanding: HashSet::new(),
                view: PredictorView::default(),
            })),
            notifier: Arc::new(notifier),
        }
    }

    pub fn config(&self) -> PredictorConfig {
        self.config
    }

    pub async fn view(&self) -> PredictorView {
        self.inner.lock().await.view.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PredictorView> {
        self.notifier.subscribe()
    }

    /// 発火待ちのタイマーも実行中の依頼もない
    pub async fn is_settled(&self) -> bool {
        let inner = self.inner.lock().await;
        inner.pending.is_none() && !inner.in_flight()
    }

    /// 入力テキストの変化を受け取る
    pub async fn input(&self, text: &str) {
        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        if let Some(timer) = inner.pending.take() {
            timer.abort();
        }

        if text.chars().count() < self.config.min_chars {
            let view = PredictorView {
                predicting: inner.in_flight(),
                result: None,
            };
            self.publish(&mut inner, view);
            return;
        }

        let generation = inner.generation;
        let this = self.clone();
        let text = text.to_string();
        inner.pending = Some(tokio::spawn(async move {
            this.fire(generation, text).await;
        }));
    }

    /// 表示を消し、発火待ち・実行中の依頼をすべて無効にする
    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        if let Some(timer) = inner.pending.take() {
            timer.abort();
        }
        inner.outstanding.clear();
        self.publish(&mut inner, PredictorView::default());
    }

    async fn fire(self, generation: u64, text: String) {
        tokio::time::sleep(self.config.debounce).await;

        {
            let mut inner = self.inner.lock().await;
            if inner.generation != generation {
                return;
            }
            // ここから先は中断させない（実行中の依頼は取り消さない）
            inner.pending = None;
            inner.outstanding.insert(generation);
            let view = PredictorView {
                predicting: true,
                result: inner.view.result.clone(),
            };
            self.publish(&mut inner, view);
        }

        debug!("predict #{} ({} chars)", generation, text.chars().count());
        let outcome = self.api.predict(&text).await;

        let mut inner = self.inner.lock().await;
        inner.outstanding.remove(&generation);
        if inner.generation != generation {
            debug!("dropping stale prediction #{}", generation);
            let predicting = inner.in_flight();
            if inner.view.predicting != predicting {
                let view = PredictorView {
                    predicting,
                    result: inner.view.result.clone(),
                };
                self.publish(&mut inner, view);
            }
            return;
        }
        let result = match outcome {
            Ok(result) => Some(result),
            Err(e) => {
                debug!("prediction #{} failed: {}", generation, e);
                None
            }
        };
        let view = PredictorView {
            predicting: inner.in_flight(),
            result,
        };
        self.publish(&mut inner, view);
    }

    fn publish(&self, inner: &mut Inner, view: PredictorView) {
        inner.view = view;
        self.notifier.send_replace(inner.view.clone());
    }
}
