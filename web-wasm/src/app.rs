//! メインアプリケーションコンポーネント

use crate::components::{
    dropzone::DropzonePage,
    evaluation_page::EvaluationPage,
    sidebar::{Page, Sidebar},
};
use crate::config::WebConfig;
use leptos::prelude::*;

/// メインアプリケーションコンポーネント
///
/// 接続設定が埋め込まれていなければ設定エラー画面を出す。
#[component]
pub fn App() -> impl IntoView {
    match WebConfig::from_build() {
        Ok(config) => view! { <Dashboard config=config /> }.into_any(),
        Err(missing) => view! { <ConfigError missing=missing /> }.into_any(),
    }
}

#[component]
fn Dashboard(config: WebConfig) -> impl IntoView {
    let (page, set_page) = signal(Page::default());
    let config = StoredValue::new(config);

    view! {
        <div class="layout">
            <Sidebar page=page set_page=set_page />
            <main class="content">
                {move || match page.get() {
                    Page::Dropzone => view! { <DropzonePage config=config.get_value() /> }.into_any(),
                    Page::Evaluation => {
                        view! { <EvaluationPage config=config.get_value() /> }.into_any()
                    }
                }}
            </main>
        </div>
    }
}

#[component]
fn ConfigError(missing: &'static str) -> impl IntoView {
    view! {
        <div class="container">
            <h1>"設定エラー"</h1>
            <p>{format!("ビルド時の環境変数 {} が設定されていません。", missing)}</p>
            <p class="text-muted">
                "MATCH_REVIEW_API_URL / MATCH_REVIEW_SUPABASE_URL / MATCH_REVIEW_SUPABASE_KEY を設定して再ビルドしてください"
            </p>
        </div>
    }
}
