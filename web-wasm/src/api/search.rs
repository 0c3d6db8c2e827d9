//! 類似検索API

use super::send;
use crate::config::WebConfig;
use match_review_common::{FindSimilarRequest, FindSimilarResponse, MatchRecord, FIND_SIMILAR_PATH};

/// 画像（Data URL）で類似検索
pub async fn find_similar(config: &WebConfig, data_url: &str) -> Result<Vec<MatchRecord>, String> {
    let url = format!("{}{}", config.api_url, FIND_SIMILAR_PATH);
    let body = serde_json::to_string(&FindSimilarRequest {
        image_base64: data_url.to_string(),
    })
    .map_err(|e| e.to_string())?;

    let text = send(
        "POST",
        &url,
        &[("Content-Type", "application/json")],
        Some(&body),
        None,
    )
    .await
    .map_err(|e| e.to_string())?;

    let response: FindSimilarResponse =
        serde_json::from_str(&text).map_err(|e| format!("検索結果のパースに失敗: {}", e))?;
    Ok(response.matches)
}
