//! リモート連携（類似検索API・評価データストア）
//!
//! 取得境界で通信エラーを捕捉し、空の結果＋状態に落とす関数もここに置く。

pub mod search;
pub mod store;

pub use search::SimilarityClient;
pub use store::EvaluationStore;

use crate::config::Connection;
use crate::error::Result;
use match_review_common::{EvaluatedItem, FetchStatus, ParsedRows};
use std::future::Future;
use std::time::Duration;

/// 評価データの取得元
pub trait EvaluationSource: Send + Sync + 'static {
    fn list_models(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    fn fetch_evaluation_data(&self, model: &str) -> impl Future<Output = Result<ParsedRows>> + Send;
}

pub fn build_http_client(conn: &Connection) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(conn.timeout_seconds))
        .user_agent(concat!("match-review/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// 評価データを取得（失敗時は空＋Failed）
pub async fn fetch_evaluation_data_or_empty<S: EvaluationSource>(
    source: &S,
    model: &str,
) -> (Vec<EvaluatedItem>, FetchStatus) {
    match source.fetch_evaluation_data(model).await {
        Ok(parsed) => {
            for rejected in &parsed.rejected {
                tracing::warn!(
                    model,
                    index = rejected.index,
                    reason = %rejected.reason,
                    "評価データの不正な行を除外"
                );
            }
            let status = FetchStatus::Loaded {
                items: parsed.items.len(),
                rejected: parsed.rejected.len(),
            };
            tracing::debug!(model, %status, "評価データ取得");
            (parsed.items, status)
        }
        Err(e) => {
            tracing::warn!(model, error = %e, "評価データの取得に失敗");
            (
                Vec::new(),
                FetchStatus::Failed {
                    message: e.to_string(),
                },
            )
        }
    }
}

/// モデル一覧を取得（失敗時は空）
pub async fn list_models_or_empty<S: EvaluationSource>(source: &S) -> (Vec<String>, FetchStatus) {
    match source.list_models().await {
        Ok(models) => {
            let status = FetchStatus::Loaded {
                items: models.len(),
                rejected: 0,
            };
            (models, status)
        }
        Err(e) => {
            tracing::warn!(error = %e, "モデル一覧の取得に失敗");
            (
                Vec::new(),
                FetchStatus::Failed {
                    message: e.to_string(),
                },
            )
        }
    }
}
