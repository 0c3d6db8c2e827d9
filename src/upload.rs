//! アップロード（類似検索）フロー
//!
//! ready → uploading（画像最適化）→ searching（API呼び出し）→ done / error

use crate::client::SimilarityClient;
use crate::error::{MatchReviewError, Result};
use crate::optimizer::{optimize_image, OptimizedImage};
use match_review_common::{drop_self_match, MatchRecord, UploadStatus};
use std::path::Path;

/// 検索結果
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub image: OptimizedImage,
    pub matches: Vec<MatchRecord>,
    /// 自己一致を除外したか
    pub dropped_self: bool,
}

/// フロー実行時のオプション
#[derive(Debug, Clone, Copy, Default)]
pub struct UploadOptions {
    pub exclude_self: bool,
}

pub struct UploadFlow<'a> {
    client: &'a SimilarityClient,
    status: UploadStatus,
}

impl<'a> UploadFlow<'a> {
    pub fn new(client: &'a SimilarityClient) -> Self {
        Self {
            client,
            status: UploadStatus::Ready,
        }
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    /// 画像1枚で類似検索
    ///
    /// 状態が変わるたびに `on_status` を呼ぶ
    pub async fn run<F>(
        &mut self,
        path: &Path,
        options: UploadOptions,
        mut on_status: F,
    ) -> Result<UploadOutcome>
    where
        F: FnMut(UploadStatus),
    {
        let result = self.run_inner(path, options, &mut on_status).await;
        let final_status = if result.is_ok() {
            UploadStatus::Done
        } else {
            UploadStatus::Error
        };
        self.transition(final_status, &mut on_status);

        if let Err(e) = &result {
            tracing::warn!(path = %path.display(), error = %e, "類似検索に失敗");
        }
        result
    }

    async fn run_inner<F>(
        &mut self,
        path: &Path,
        options: UploadOptions,
        on_status: &mut F,
    ) -> Result<UploadOutcome>
    where
        F: FnMut(UploadStatus),
    {
        self.transition(UploadStatus::Uploading, on_status);
        let owned = path.to_path_buf();
        let image = tokio::task::spawn_blocking(move || optimize_image(&owned))
            .await
            .map_err(|e| MatchReviewError::ImageLoad(format!("画像処理タスク失敗: {}", e)))??;

        self.transition(UploadStatus::Searching, on_status);
        let mut matches = self.client.search(&image.data_url).await?;
        let dropped_self = options.exclude_self && drop_self_match(&mut matches);

        Ok(UploadOutcome {
            image,
            matches,
            dropped_self,
        })
    }

    fn transition<F>(&mut self, status: UploadStatus, on_status: &mut F)
    where
        F: FnMut(UploadStatus),
    {
        tracing::debug!(from = %self.status, to = %status, "アップロード状態");
        self.status = status;
        on_status(status);
    }
}
