//! 閾値スライダー

use leptos::prelude::*;
use match_review_common::format_percent;

#[component]
pub fn ThresholdSlider(
    label: &'static str,
    value: ReadSignal<f64>,
    set_value: WriteSignal<f64>,
) -> impl IntoView {
    view! {
        <div class="threshold-slider">
            <span class="slider-label">{label}</span>
            <input
                type="range"
                min="0"
                max="1"
                step="0.01"
                prop:value=move || value.get().to_string()
                on:input=move |ev| {
                    if let Ok(v) = event_target_value(&ev).parse::<f64>() {
                        set_value.set(v);
                    }
                }
            />
            <span class="slider-value">{move || format_percent(value.get())}</span>
        </div>
    }
}
