//! 評価画面のサムネイル

use crate::components::percent_badge::PercentBadge;
use leptos::prelude::*;
use match_review_common::Thresholds;

/// 画像URLがない場合の代替画像
const NO_IMAGE_URL: &str =
    "https://ps.w.org/replace-broken-images/assets/icon-256x256.png?rev=2561727";

/// サムネイル（75px）
///
/// 類似度があればバッジ、警告があれば赤枠とツールチップを付ける。
/// クリックで拡大表示。
#[component]
pub fn EvaluationImage(
    image_url: Option<String>,
    filename: String,
    similarity: Option<f64>,
    thresholds: Signal<Thresholds>,
    warning: Option<&'static str>,
) -> impl IntoView {
    let (is_popup_open, set_is_popup_open) = signal(false);
    let src = image_url.clone().unwrap_or_else(|| NO_IMAGE_URL.to_string());
    let popup_name = filename.clone();

    view! {
        <div class="evaluation-image">
            <img
                src=src
                alt=filename
                title=warning.unwrap_or_default()
                width="75"
                height="75"
                on:click=move |_| set_is_popup_open.set(true)
            />

            {similarity.map(|similarity| view! {
                <PercentBadge
                    similarity=similarity
                    thresholds=Signal::derive(move || Some(thresholds.get()))
                    class="badge-overlay"
                />
            })}

            {warning.is_some().then(|| view! { <div class="warning-frame" /> })}

            {move || {
                let url = image_url.clone().filter(|_| is_popup_open.get())?;
                Some(view! {
                    <div
                        class="image-popup"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            set_is_popup_open.set(false);
                        }
                    >
                        <img src=url alt=popup_name.clone() width="250" height="250" />
                        <span class="badge badge-gray">{popup_name.clone()}</span>
                    </div>
                })
            }}
        </div>
    }
}
