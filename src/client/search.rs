//! 類似検索API
//!
//! `POST {api_url}/main/find-similar` に `{ "image_base64": ... }` を送り、
//! ランク順の候補を受け取る。

use crate::config::Connection;
use crate::error::{MatchReviewError, Result};
use match_review_common::{FindSimilarRequest, FindSimilarResponse, MatchRecord, FIND_SIMILAR_PATH};
use reqwest::Client;

const HEALTH_PATH: &str = "/health";

pub struct SimilarityClient {
    http: Client,
    base_url: String,
}

impl SimilarityClient {
    pub fn new(conn: &Connection) -> Result<Self> {
        Ok(Self::with_client(super::build_http_client(conn)?, &conn.api_url))
    }

    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn find_similar_url(&self) -> String {
        format!("{}{}", self.base_url, FIND_SIMILAR_PATH)
    }

    /// 画像（Data URLまたは素のBase64）で類似検索
    pub async fn search(&self, image_base64: &str) -> Result<Vec<MatchRecord>> {
        let request = FindSimilarRequest {
            image_base64: image_base64.to_string(),
        };

        let response = self
            .http
            .post(self.find_similar_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(MatchReviewError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: FindSimilarResponse = serde_json::from_str(&body)
            .map_err(|e| MatchReviewError::ApiParse(format!("find-similar: {}", e)))?;
        tracing::debug!(count = parsed.matches.len(), "類似検索レスポンス");
        Ok(parsed.matches)
    }

    /// ヘルスチェック
    pub async fn health(&self) -> Result<String> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, HEALTH_PATH))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(MatchReviewError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}
