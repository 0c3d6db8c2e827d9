//! API連携（類似検索API・評価データストア）
//!
//! fetch の失敗は `ApiError` で返す。AbortController による中断は
//! `ApiError::Aborted` として失敗と区別する。

mod search;
mod store;

pub use search::find_similar;
pub use store::{fetch_evaluation_data_or_empty, list_models_or_empty};

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortSignal, DomException, Request, RequestInit, RequestMode, Response};

/// API呼び出しのエラー
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// AbortController で中断された
    Aborted,
    Failed(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Aborted => write!(f, "リクエストが中断されました"),
            ApiError::Failed(message) => write!(f, "{}", message),
        }
    }
}

impl From<String> for ApiError {
    fn from(message: String) -> Self {
        ApiError::Failed(message)
    }
}

impl From<&str> for ApiError {
    fn from(message: &str) -> Self {
        ApiError::Failed(message.to_string())
    }
}

/// JsValueのエラーを文字列に
pub(crate) fn js_error(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// fetch が AbortError で reject されたか
fn is_abort_error(value: &JsValue) -> bool {
    value
        .dyn_ref::<DomException>()
        .is_some_and(|e| e.name() == "AbortError")
}

/// fetch の reject 値を分類
fn fetch_error(value: JsValue) -> ApiError {
    if is_abort_error(&value) {
        ApiError::Aborted
    } else {
        ApiError::Failed(js_error(value))
    }
}

/// リクエストを送信し、成功時は本文を返す
async fn send(
    method: &str,
    url: &str,
    headers: &[(&str, &str)],
    body: Option<&str>,
    signal: Option<&AbortSignal>,
) -> Result<String, ApiError> {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);
    if let Some(body) = body {
        opts.set_body(&JsValue::from_str(body));
    }
    if signal.is_some() {
        opts.set_signal(signal);
    }

    let request = Request::new_with_str_and_init(url, &opts).map_err(js_error)?;
    for (name, value) in headers {
        request.headers().set(name, value).map_err(js_error)?;
    }

    let window = web_sys::window().ok_or("windowが取得できません")?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(fetch_error)?;
    let resp: Response = resp_value.dyn_into().map_err(js_error)?;

    // 本文の読み込み中に中断されることもある
    let text = JsFuture::from(resp.text().map_err(js_error)?)
        .await
        .map_err(fetch_error)?
        .as_string()
        .unwrap_or_default();

    if !resp.ok() {
        return Err(format!("API error: HTTP {}: {}", resp.status(), text).into());
    }
    Ok(text)
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_abort_error_is_classified() {
        let abort =
            DomException::new_with_message_and_name("The user aborted a request.", "AbortError")
                .unwrap();
        assert_eq!(fetch_error(abort.into()), ApiError::Aborted);
    }

    #[wasm_bindgen_test]
    fn test_other_rejection_is_failure() {
        let network = DomException::new_with_message_and_name("offline", "NetworkError").unwrap();
        assert!(matches!(fetch_error(network.into()), ApiError::Failed(_)));

        let text = JsValue::from_str("Failed to fetch");
        assert_eq!(fetch_error(text), ApiError::Failed("Failed to fetch".to_string()));
    }
}
