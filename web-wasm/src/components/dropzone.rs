//! ドロップゾーン画面（画像をドロップして類似検索）

use crate::api::find_similar;
use crate::components::percent_badge::PercentBadge;
use crate::config::WebConfig;
use crate::image::{is_supported_file, optimize_image, ACCEPT_ATTR};
use gloo::console;
use leptos::html::Input;
use leptos::prelude::*;
use match_review_common::{top_matches, MatchRecord, Thresholds, UploadStatus};
use wasm_bindgen_futures::spawn_local;
use web_sys::{DragEvent, File, HtmlInputElement};

/// 表示する候補数（画面幅768px未満は3件）
const RESULT_LIMIT: usize = 5;
const RESULT_LIMIT_NARROW: usize = 3;
const NARROW_WIDTH: f64 = 768.0;

fn result_limit() -> usize {
    let width = web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|w| w.as_f64())
        .unwrap_or(NARROW_WIDTH);
    if width < NARROW_WIDTH {
        RESULT_LIMIT_NARROW
    } else {
        RESULT_LIMIT
    }
}

#[component]
pub fn DropzonePage(config: WebConfig) -> impl IntoView {
    let config = StoredValue::new(config);
    let (status, set_status) = signal(UploadStatus::Ready);
    let (preview, set_preview) = signal(None::<String>);
    let (results, set_results) = signal(Vec::<MatchRecord>::new());
    let (notice, set_notice) = signal(None::<String>);
    let (is_dragover, set_is_dragover) = signal(false);
    let input_ref: NodeRef<Input> = NodeRef::new();
    let thresholds = Signal::stored(Some(Thresholds::default()));

    let handle_file = move |file: File| {
        if status.get_untracked().is_busy() {
            return;
        }
        set_results.set(Vec::new());
        set_preview.set(None);
        set_notice.set(None);

        if !is_supported_file(&file) {
            set_notice.set(Some(format!("対応していない形式です: {}", file.name())));
            return;
        }

        set_status.set(UploadStatus::Uploading);
        let config = config.get_value();

        spawn_local(async move {
            let data_url = match optimize_image(&file).await {
                Ok(data_url) => data_url,
                Err(e) => {
                    console::error!(format!("画像の圧縮に失敗: {}", e));
                    set_notice.try_set(Some("画像の圧縮に失敗しました".to_string()));
                    set_status.try_set(UploadStatus::Error);
                    return;
                }
            };
            set_preview.try_set(Some(data_url.clone()));
            set_status.try_set(UploadStatus::Searching);

            match find_similar(&config, &data_url).await {
                Ok(matches) => {
                    set_results.try_set(matches);
                    set_status.try_set(UploadStatus::Done);
                }
                Err(e) => {
                    console::error!(format!("類似検索エラー: {}", e));
                    set_notice.try_set(Some("アップロードに失敗しました".to_string()));
                    set_status.try_set(UploadStatus::Error);
                }
            }
        });
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(false);
        let file = ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| files.get(0));
        if let Some(file) = file {
            handle_file(file);
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        if !status.get_untracked().is_busy() {
            set_is_dragover.set(true);
        }
    };

    let on_change = move |ev: leptos::ev::Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            handle_file(file);
        }
        // 同じファイルを続けて選べるように
        input.set_value("");
    };

    let on_click = move |_| {
        if status.get_untracked().is_busy() {
            return;
        }
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    view! {
        <div class="dropzone-page">
            <p class="upload-status">{move || status.get().as_str()}</p>

            <div
                class=move || {
                    let mut classes = vec!["dropzone"];
                    if is_dragover.get() {
                        classes.push("dragover");
                    }
                    if status.get().is_busy() {
                        classes.push("busy");
                    }
                    if preview.get().is_some() {
                        classes.push("has-preview");
                    }
                    classes.join(" ")
                }
                on:drop=on_drop
                on:dragover=on_dragover
                on:dragleave=move |_: DragEvent| set_is_dragover.set(false)
                on:click=on_click
            >
                <input
                    type="file"
                    accept=ACCEPT_ATTR
                    class="hidden"
                    node_ref=input_ref
                    on:change=on_change
                />
                <span class="dropzone-icon">"+"</span>
                {move || preview.get().map(|src| view! {
                    <img class="dropzone-preview" src=src alt="Preview" />
                })}
                <Show when=move || status.get().is_busy()>
                    <div class="dropzone-overlay">
                        <div class="spinner" />
                    </div>
                </Show>
            </div>

            {move || notice.get().map(|text| view! { <p class="text-error">{text}</p> })}

            <div class="search-results">
                {move || {
                    top_matches(&results.get(), result_limit())
                        .iter()
                        .map(|m| view! {
                            <div class="search-result">
                                <img src=m.image_url.clone() alt=m.filename.clone() width="100" height="100" />
                                <PercentBadge
                                    similarity=m.similarity
                                    thresholds=thresholds
                                    class="badge-overlay"
                                />
                            </div>
                        })
                        .collect_view()
                }}
            </div>
        </div>
    }
}
