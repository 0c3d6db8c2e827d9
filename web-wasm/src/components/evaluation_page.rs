//! 評価画面
//!
//! - モデル選択ごとに評価データを取得（前の取得は中断し、遅れた応答は世代番号で破棄）
//! - 閾値変更は取得済みデータの再照合のみ
//! - 画面破棄時は実行中の取得を中断

use crate::api::fetch_evaluation_data_or_empty;
use crate::components::evaluation_results::EvaluationResults;
use crate::components::model_selector::ModelSelector;
use crate::components::threshold_slider::ThresholdSlider;
use crate::config::WebConfig;
use gloo::console;
use leptos::prelude::*;
use match_review_common::{reconcile, EvaluatedItem, FetchStatus, Thresholds};
use send_wrapper::SendWrapper;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::AbortController;

/// 実行中の取得
#[derive(Default)]
struct InFlight {
    generation: u64,
    controller: Option<AbortController>,
}

impl InFlight {
    /// 前の取得を中断して次の世代を始める
    fn restart(&mut self) -> u64 {
        self.cancel();
        self.controller = AbortController::new().ok();
        self.generation
    }

    /// 中断し、以降の応答をすべて古いものにする
    fn cancel(&mut self) {
        self.generation += 1;
        if let Some(controller) = self.controller.take() {
            controller.abort();
        }
    }
}

#[component]
pub fn EvaluationPage(config: WebConfig) -> impl IntoView {
    let config = StoredValue::new(config);
    let defaults = Thresholds::default();
    let (selected, set_selected) = signal(None::<String>);
    let (high, set_high) = signal(defaults.high());
    let (low, set_low) = signal(defaults.low());
    let (items, set_items) = signal(Vec::<EvaluatedItem>::new());
    let (status, set_status) = signal(FetchStatus::Idle);

    // 低閾値が高閾値を超えたら高閾値に揃える
    let thresholds = Memo::new(move |_| {
        let high = high.get();
        Thresholds::new(high, low.get().min(high)).unwrap_or_default()
    });
    let reconciliation = Memo::new(move |_| {
        let thresholds = thresholds.get();
        items.with(|items| reconcile(items, &thresholds))
    });

    let in_flight = SendWrapper::new(Rc::new(RefCell::new(InFlight::default())));

    let on_select = {
        let in_flight = SendWrapper::new(Rc::clone(&*in_flight));
        move |model: String| {
            let (generation, signal) = {
                let mut state = in_flight.borrow_mut();
                let generation = state.restart();
                (generation, state.controller.as_ref().map(|c| c.signal()))
            };
            set_selected.set(Some(model.clone()));
            set_status.set(FetchStatus::Loading);

            let in_flight = SendWrapper::new(Rc::clone(&*in_flight));
            let config = config.get_value();
            spawn_local(async move {
                let (fetched, fetch_status) =
                    fetch_evaluation_data_or_empty(&config, &model, signal.as_ref()).await;
                {
                    let mut state = in_flight.borrow_mut();
                    if state.generation != generation {
                        console::debug!(format!("古い応答を破棄: {}", model));
                        return;
                    }
                    state.controller = None;
                }
                set_items.try_set(fetched);
                set_status.try_set(fetch_status);
            });
        }
    };

    on_cleanup(move || {
        in_flight.borrow_mut().cancel();
    });

    view! {
        <div class="evaluation-page">
            <ModelSelector config=config.get_value() on_select=on_select />

            <div class="threshold-row">
                <ThresholdSlider label="High confidence threshold" value=high set_value=set_high />
                <ThresholdSlider label="Low threshold" value=low set_value=set_low />
            </div>

            {move || {
                if selected.get().is_none() {
                    return view! { <p class="text-muted">"モデルを選択してください"</p> }.into_any();
                }
                match status.get() {
                    FetchStatus::Loading if items.with(|items| items.is_empty()) => {
                        view! { <p class="text-muted">"Loading..."</p> }.into_any()
                    }
                    status => {
                        let note = match &status {
                            FetchStatus::Loading => Some("更新中...".to_string()),
                            FetchStatus::Failed { message } => {
                                Some(format!("評価データを取得できません: {}", message))
                            }
                            FetchStatus::Loaded { rejected, .. } if *rejected > 0 => {
                                Some(format!("不正な行を{}件除外しました", rejected))
                            }
                            _ => None,
                        };
                        view! {
                            {note.map(|text| view! { <p class="fetch-note">{text}</p> })}
                            <EvaluationResults
                                reconciliation=reconciliation
                                thresholds=Signal::from(thresholds)
                            />
                        }
                        .into_any()
                    }
                }
            }}
        </div>
    }
}
