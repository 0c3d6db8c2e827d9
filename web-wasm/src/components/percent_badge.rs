//! 類似度バッジ

use leptos::prelude::*;
use match_review_common::{classify_optional, format_percent, Thresholds};

/// バッジのクラス名（閾値がなければ段階なし）
fn badge_class(similarity: f64, thresholds: Option<Thresholds>) -> String {
    let tier = classify_optional(
        similarity,
        thresholds.map(|t| t.high()),
        thresholds.map(|t| t.low()),
    );
    match tier {
        Some(tier) => format!("badge badge-{}", tier.badge_color()),
        None => "badge badge-plain".to_string(),
    }
}

/// 類似度を％表示し、信頼度区分で色分けする（jade / bronze / gray）
#[component]
pub fn PercentBadge(
    similarity: f64,
    thresholds: Signal<Option<Thresholds>>,
    #[prop(optional)] class: &'static str,
) -> impl IntoView {
    view! {
        <span class=move || format!("{} {}", badge_class(similarity, thresholds.get()), class)>
            {format_percent(similarity)}
        </span>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_class_by_tier() {
        let t = Thresholds::default();
        assert_eq!(badge_class(0.95, Some(t)), "badge badge-jade");
        assert_eq!(badge_class(0.85, Some(t)), "badge badge-bronze");
        assert_eq!(badge_class(0.5, Some(t)), "badge badge-gray");
    }

    #[test]
    fn test_badge_class_without_thresholds() {
        assert_eq!(badge_class(0.95, None), "badge badge-plain");
    }
}
