//! 評価データストア（Supabase REST）
//!
//! - モデル一覧: `rpc/get_unique_models`
//! - 評価データ: `evals_actual` を `evals_expected` と内部結合、モデルで絞り込み

use super::EvaluationSource;
use crate::config::Connection;
use crate::error::{MatchReviewError, Result};
use match_review_common::{
    parse_model_list, parse_rows_str, ParsedRows, EVALS_ACTUAL_TABLE, EVALUATION_SELECT,
    UNIQUE_MODELS_RPC,
};
use reqwest::{Client, RequestBuilder};

pub struct EvaluationStore {
    http: Client,
    base_url: String,
    key: String,
}

impl EvaluationStore {
    pub fn new(conn: &Connection) -> Result<Self> {
        Ok(Self::with_client(
            super::build_http_client(conn)?,
            &conn.supabase_url,
            &conn.supabase_key,
        ))
    }

    pub fn with_client(http: Client, base_url: &str, key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            key: key.to_string(),
        }
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", &self.key).bearer_auth(&self.key)
    }

    async fn read_body(builder: RequestBuilder) -> Result<String> {
        let response = builder.send().await?;
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

    pub async fn list_models(&self) -> Result<Vec<String>> {
        let builder = self
            .authed(self.http.post(self.rest_url(&format!("rpc/{}", UNIQUE_MODELS_RPC))))
            .json(&serde_json::json!({}));
        let body = Self::read_body(builder).await?;
        parse_model_list(&body)
            .map_err(|e| MatchReviewError::ApiParse(format!("{}: {}", UNIQUE_MODELS_RPC, e)))
    }

    pub async fn fetch_evaluation_data(&self, model: &str) -> Result<ParsedRows> {
        let builder = self
            .authed(self.http.get(self.rest_url(EVALS_ACTUAL_TABLE)))
            .query(&[
                ("select", EVALUATION_SELECT.to_string()),
                ("model", format!("eq.{}", model)),
            ]);
        let body = Self::read_body(builder).await?;
        Ok(parse_rows_str(&body)?)
    }
}

impl EvaluationSource for EvaluationStore {
    async fn list_models(&self) -> Result<Vec<String>> {
        EvaluationStore::list_models(self).await
    }

    async fn fetch_evaluation_data(&self, model: &str) -> Result<ParsedRows> {
        EvaluationStore::fetch_evaluation_data(self, model).await
    }
}
