//! 評価セッション
//!
//! モデル選択ごとに評価データを非同期取得し、閾値変更のたびに
//! 取得済みデータから照合をやり直す。
//!
//! - 選択が変わったら前の取得を中断し、遅れて届いた応答は世代番号で破棄する
//! - 閾値変更は同期的な再計算のみ（通信しない）
//! - 破棄（shutdown / drop）時は実行中の取得を中断する

use crate::client::{fetch_evaluation_data_or_empty, EvaluationSource};
use match_review_common::{reconcile, EvaluatedItem, FetchStatus, Reconciliation, Thresholds};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// 取得タスクからの応答
#[derive(Debug)]
struct Fetched {
    generation: u64,
    model: String,
    items: Vec<EvaluatedItem>,
    status: FetchStatus,
}

/// 取得済みデータ（照合の入力、変更しない）
#[derive(Debug)]
struct Snapshot {
    model: String,
    items: Vec<EvaluatedItem>,
}

pub struct EvaluationSession<S: EvaluationSource> {
    source: Arc<S>,
    thresholds: Thresholds,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<Fetched>,
    rx: mpsc::UnboundedReceiver<Fetched>,
    snapshot: Option<Snapshot>,
    reconciliation: Option<Reconciliation>,
    status: FetchStatus,
}

impl<S: EvaluationSource> EvaluationSession<S> {
    pub fn new(source: Arc<S>, thresholds: Thresholds) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            thresholds,
            generation: 0,
            in_flight: None,
            tx,
            rx,
            snapshot: None,
            reconciliation: None,
            status: FetchStatus::Idle,
        }
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// 最後に照合した結果（初回取得前は `None`）
    pub fn reconciliation(&self) -> Option<&Reconciliation> {
        self.reconciliation.as_ref()
    }

    /// 照合結果が属するモデル
    pub fn loaded_model(&self) -> Option<&str> {
        self.snapshot.as_ref().map(|s| s.model.as_str())
    }

    pub fn items(&self) -> &[EvaluatedItem] {
        self.snapshot.as_ref().map(|s| s.items.as_slice()).unwrap_or(&[])
    }

    /// モデルを選択して取得を開始（tokioランタイム内で呼ぶ）
    ///
    /// 前の選択の取得は中断し、その応答は反映しない
    pub fn select_model(&mut self, model: impl Into<String>) {
        let model = model.into();
        self.cancel_in_flight();
        self.generation += 1;
        self.status = FetchStatus::Loading;

        let generation = self.generation;
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        tracing::debug!(model = %model, generation, "評価データ取得開始");

        self.in_flight = Some(tokio::spawn(async move {
            let (items, status) = fetch_evaluation_data_or_empty(source.as_ref(), &model).await;
            // 受信側が破棄済みなら何もしない
            let _ = tx.send(Fetched {
                generation,
                model,
                items,
                status,
            });
        }));
    }

    /// 閾値を変更して取得済みデータを再照合
    pub fn set_thresholds(&mut self, thresholds: Thresholds) {
        self.thresholds = thresholds;
        if let Some(snapshot) = &self.snapshot {
            self.reconciliation = Some(reconcile(&snapshot.items, &self.thresholds));
        }
    }

    /// 届いている応答を反映（待たない）
    ///
    /// # Returns
    /// 現在の選択の応答を反映した場合 `true`
    pub fn poll(&mut self) -> bool {
        let mut applied = false;
        while let Ok(fetched) = self.rx.try_recv() {
            applied |= self.accept(fetched);
        }
        applied
    }

    /// 現在の選択の取得完了まで待つ
    pub async fn wait_until_loaded(&mut self) -> &FetchStatus {
        while self.status.is_loading() {
            match self.rx.recv().await {
                Some(fetched) => {
                    self.accept(fetched);
                }
                None => break,
            }
        }
        &self.status
    }

    /// 実行中の取得を中断し、以降の応答をすべて破棄
    pub fn shutdown(&mut self) {
        self.cancel_in_flight();
        self.generation += 1;
        if self.status.is_loading() {
            self.status = FetchStatus::Idle;
        }
    }

    fn cancel_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }

    fn accept(&mut self, fetched: Fetched) -> bool {
        if fetched.generation != self.generation {
            tracing::debug!(
                model = %fetched.model,
                generation = fetched.generation,
                current = self.generation,
                "古い応答を破棄"
            );
            return false;
        }

        self.in_flight = None;
        self.status = fetched.status;
        self.reconciliation = Some(reconcile(&fetched.items, &self.thresholds));
        self.snapshot = Some(Snapshot {
            model: fetched.model,
            items: fetched.items,
        });
        true
    }
}

impl<S: EvaluationSource> Drop for EvaluationSession<S> {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}
