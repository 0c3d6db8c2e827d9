//! 評価データストア（Supabase REST）

use super::{send, ApiError};
use crate::config::WebConfig;
use gloo::console;
use match_review_common::{
    parse_model_list, parse_rows_str, EvaluatedItem, FetchStatus, ParsedRows,
    EVALS_ACTUAL_TABLE, EVALUATION_SELECT, UNIQUE_MODELS_RPC,
};
use web_sys::AbortSignal;

fn rest_url(config: &WebConfig, path: &str) -> String {
    format!("{}/rest/v1/{}", config.supabase_url, path)
}

fn evaluation_url(config: &WebConfig, model: &str) -> String {
    let select = String::from(js_sys::encode_uri_component(EVALUATION_SELECT));
    let model = String::from(js_sys::encode_uri_component(model));
    format!(
        "{}?select={}&model=eq.{}",
        rest_url(config, EVALS_ACTUAL_TABLE),
        select,
        model
    )
}

/// モデル一覧を取得
pub async fn list_models(
    config: &WebConfig,
    signal: Option<&AbortSignal>,
) -> Result<Vec<String>, ApiError> {
    let url = rest_url(config, &format!("rpc/{}", UNIQUE_MODELS_RPC));
    let bearer = format!("Bearer {}", config.supabase_key);
    let text = send(
        "POST",
        &url,
        &[
            ("apikey", config.supabase_key.as_str()),
            ("Authorization", bearer.as_str()),
            ("Content-Type", "application/json"),
        ],
        Some("{}"),
        signal,
    )
    .await?;
    parse_model_list(&text).map_err(|e| ApiError::Failed(format!("{}: {}", UNIQUE_MODELS_RPC, e)))
}

/// モデルの評価データを取得（行単位で検証済み）
pub async fn fetch_evaluation_data(
    config: &WebConfig,
    model: &str,
    signal: Option<&AbortSignal>,
) -> Result<ParsedRows, ApiError> {
    let bearer = format!("Bearer {}", config.supabase_key);
    let text = send(
        "GET",
        &evaluation_url(config, model),
        &[
            ("apikey", config.supabase_key.as_str()),
            ("Authorization", bearer.as_str()),
        ],
        None,
        signal,
    )
    .await?;
    parse_rows_str(&text).map_err(|e| ApiError::Failed(e.to_string()))
}

/// 評価データを取得し、失敗時は空の結果と Failed 状態を返す
///
/// 中断は失敗ではないので Idle を返す。
pub async fn fetch_evaluation_data_or_empty(
    config: &WebConfig,
    model: &str,
    signal: Option<&AbortSignal>,
) -> (Vec<EvaluatedItem>, FetchStatus) {
    match fetch_evaluation_data(config, model, signal).await {
        Ok(parsed) => {
            for row in &parsed.rejected {
                console::warn!(format!("不正な行を除外: #{} {}", row.index, row.reason));
            }
            let status = FetchStatus::Loaded {
                items: parsed.items.len(),
                rejected: parsed.rejected.len(),
            };
            (parsed.items, status)
        }
        Err(ApiError::Aborted) => {
            console::debug!(format!("評価データ取得を中断: {}", model));
            (Vec::new(), FetchStatus::Idle)
        }
        Err(ApiError::Failed(message)) => {
            console::error!(format!("評価データ取得エラー ({}): {}", model, message));
            (Vec::new(), FetchStatus::Failed { message })
        }
    }
}

/// モデル一覧を取得し、失敗時は空の一覧と Failed 状態を返す
pub async fn list_models_or_empty(
    config: &WebConfig,
    signal: Option<&AbortSignal>,
) -> (Vec<String>, FetchStatus) {
    match list_models(config, signal).await {
        Ok(models) => {
            let status = FetchStatus::Loaded {
                items: models.len(),
                rejected: 0,
            };
            (models, status)
        }
        Err(ApiError::Aborted) => {
            console::debug!("モデル一覧取得を中断");
            (Vec::new(), FetchStatus::Idle)
        }
        Err(ApiError::Failed(message)) => {
            console::error!(format!("モデル一覧取得エラー: {}", message));
            (Vec::new(), FetchStatus::Failed { message })
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;
    use web_sys::AbortController;

    wasm_bindgen_test_configure!(run_in_browser);

    fn config() -> WebConfig {
        WebConfig {
            api_url: "http://localhost:5000".to_string(),
            supabase_url: "https://proj.supabase.co".to_string(),
            supabase_key: "anon".to_string(),
        }
    }

    #[wasm_bindgen_test]
    fn test_evaluation_url_encodes_query() {
        let url = evaluation_url(&config(), "clip v2");
        assert!(url.starts_with("https://proj.supabase.co/rest/v1/evals_actual?select="));
        assert!(url.ends_with("&model=eq.clip%20v2"));
        assert!(url.contains("evals_expected!inner"));
    }

    #[wasm_bindgen_test]
    fn test_rest_url() {
        assert_eq!(
            rest_url(&config(), "rpc/get_unique_models"),
            "https://proj.supabase.co/rest/v1/rpc/get_unique_models"
        );
    }

    #[wasm_bindgen_test]
    async fn test_aborted_fetch_is_idle_not_failed() {
        let controller = AbortController::new().unwrap();
        controller.abort();
        let signal = controller.signal();

        let (items, status) =
            fetch_evaluation_data_or_empty(&config(), "clip", Some(&signal)).await;
        assert!(items.is_empty());
        assert_eq!(status, FetchStatus::Idle);

        let (models, status) = list_models_or_empty(&config(), Some(&signal)).await;
        assert!(models.is_empty());
        assert_eq!(status, FetchStatus::Idle);
    }
}
