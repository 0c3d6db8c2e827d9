//! 評価結果一覧

use crate::components::evaluation_image::EvaluationImage;
use leptos::prelude::*;
use match_review_common::{display_name, ReconciledItem, Reconciliation, Thresholds};

const UNEXPECTED_WARNING: &str = "Unexpected high-confidence match";
const MISSING_WARNING: &str = "Did not match with high confidence";

/// 集計行とプローブごとの照合結果
#[component]
pub fn EvaluationResults(
    reconciliation: Memo<Reconciliation>,
    thresholds: Signal<Thresholds>,
) -> impl IntoView {
    view! {
        <div class="evaluation-results">
            <p class="metrics">
                <span class="metric">
                    {move || reconciliation.with(|r| r.metrics.unexpected_summary())}
                </span>
                <span class="metric">
                    {move || reconciliation.with(|r| r.metrics.expected_summary())}
                </span>
            </p>
            <ul class="evaluation-list">
                // 閾値変更でフラグが変わるので行ごとに描き直す
                {move || {
                    reconciliation
                        .get()
                        .items
                        .into_iter()
                        .map(|item| view! { <ResultRow item=item thresholds=thresholds /> })
                        .collect_view()
                }}
            </ul>
        </div>
    }
}

#[component]
fn ResultRow(item: ReconciledItem, thresholds: Signal<Thresholds>) -> impl IntoView {
    let caption = display_name(&item.filename);
    let duplicates = (!item.duplicate_filenames.is_empty())
        .then(|| format!("重複候補: {}", item.duplicate_filenames.join(", ")));

    let matches = item
        .matches
        .into_iter()
        .map(|m| {
            view! {
                <EvaluationImage
                    image_url=Some(m.record.image_url)
                    filename=m.record.filename
                    similarity=Some(m.record.similarity)
                    thresholds=thresholds
                    warning=m.is_unexpected_strong_match.then_some(UNEXPECTED_WARNING)
                />
            }
        })
        .collect_view();

    let expected = (!item.expected.is_empty()).then(|| {
        let images = item
            .expected
            .into_iter()
            .map(|e| {
                view! {
                    <EvaluationImage
                        image_url=e.image_url
                        filename=e.filename
                        similarity=e.similarity
                        thresholds=thresholds
                        warning=e.has_no_strong_match.then_some(MISSING_WARNING)
                    />
                }
            })
            .collect_view();
        view! {
            <div class="image-group">
                <span class="group-label">"Expected"</span>
                <div class="image-row">{images}</div>
            </div>
        }
    });

    let potential = (!item.potential.is_empty()).then(|| {
        let images = item
            .potential
            .into_iter()
            .map(|p| {
                view! {
                    <EvaluationImage
                        image_url=p.image_url
                        filename=p.filename
                        similarity=p.similarity
                        thresholds=thresholds
                        warning=None
                    />
                }
            })
            .collect_view();
        view! {
            <div class="image-group">
                <span class="group-label">"Nice to have"</span>
                <div class="image-row">{images}</div>
            </div>
        }
    });

    view! {
        <li class="evaluation-item">
            <div class="probe">
                <img src=item.image_url alt=item.filename width="150" height="150" />
                <p class="probe-caption">{caption}</p>
            </div>
            <div class="probe-results">
                <div class="image-group">
                    <span class="group-label">"Matches"</span>
                    <div class="image-row">{matches}</div>
                </div>
                <div class="expected-row">
                    {expected}
                    {potential}
                </div>
                {duplicates.map(|text| view! { <p class="text-muted">{text}</p> })}
            </div>
        </li>
    }
}
