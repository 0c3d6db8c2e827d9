//! モデル選択

use crate::api::list_models_or_empty;
use crate::config::WebConfig;
use leptos::prelude::*;
use match_review_common::FetchStatus;
use wasm_bindgen_futures::spawn_local;

/// モデル一覧を取得してセレクトボックスに並べる
///
/// 一覧の取得に失敗した場合は空の一覧とエラー表示になる。
#[component]
pub fn ModelSelector<F>(config: WebConfig, on_select: F) -> impl IntoView
where
    F: Fn(String) + 'static,
{
    let (models, set_models) = signal(Vec::<String>::new());
    let (status, set_status) = signal(FetchStatus::Loading);

    spawn_local(async move {
        let (fetched, fetch_status) = list_models_or_empty(&config, None).await;
        // 画面破棄後に届いた場合は捨てる
        set_models.try_set(fetched);
        set_status.try_set(fetch_status);
    });

    view! {
        <div class="model-selector">
            <label for="model-select">"Select Model"</label>
            <select
                id="model-select"
                on:change=move |ev| {
                    let value = event_target_value(&ev);
                    if !value.is_empty() {
                        on_select(value);
                    }
                }
            >
                <option value="" disabled selected>
                    {move || if status.get().is_loading() { "Loading models..." } else { "Select a model" }}
                </option>
                <For
                    each=move || models.get()
                    key=|model| model.clone()
                    children=move |model| view! { <option value=model.clone()>{model.clone()}</option> }
                />
            </select>
            {move || match status.get() {
                FetchStatus::Failed { message } => Some(view! {
                    <p class="text-error">{format!("モデル一覧を取得できません: {}", message)}</p>
                }),
                _ => None,
            }}
        </div>
    }
}
