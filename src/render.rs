//! 端末表示
//!
//! 表示文字列を組み立てるだけで、出力は呼び出し側が行う。

use match_review_common::{
    classify_optional, display_name, format_percent, AggregateMetrics, MatchRecord,
    ReconciledItem, Thresholds,
};
use std::fmt::Write;

pub const UNEXPECTED_WARNING: &str = "Unexpected high-confidence match";
pub const MISSING_WARNING: &str = "Did not match with high confidence";

/// 信頼度バッジ（閾値なしなら段階を付けない）
pub fn badge(similarity: f64, thresholds: Option<&Thresholds>) -> String {
    let tier = classify_optional(
        similarity,
        thresholds.map(Thresholds::high),
        thresholds.map(Thresholds::low),
    );
    match tier {
        Some(tier) => format!("[{} {}]", format_percent(similarity), tier),
        None => format!("[{}]", format_percent(similarity)),
    }
}

fn optional_badge(similarity: Option<f64>, thresholds: &Thresholds) -> String {
    match similarity {
        Some(s) => badge(s, Some(thresholds)),
        None => "[--]".to_string(),
    }
}

/// 類似検索結果
pub fn render_search_results(
    matches: &[MatchRecord],
    thresholds: Option<&Thresholds>,
) -> String {
    if matches.is_empty() {
        return "一致する画像はありません\n".to_string();
    }

    let mut out = String::new();
    for (rank, m) in matches.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {:<32} {:<16} {}",
            rank + 1,
            m.filename,
            badge(m.similarity, thresholds),
            m.image_url
        );
    }
    out
}

/// 集計の2行
pub fn render_metrics(metrics: &AggregateMetrics) -> String {
    format!(
        "{}\n{}\n",
        metrics.unexpected_summary(),
        metrics.expected_summary()
    )
}

/// プローブ画像1件
pub fn render_item(item: &ReconciledItem, thresholds: &Thresholds) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "■ {} (#{})", display_name(&item.filename), item.id);

    let _ = writeln!(out, "  Matches");
    for m in &item.matches {
        let marker = if m.is_unexpected_strong_match { "!" } else { " " };
        let _ = write!(
            out,
            "   {} {:<32} {}",
            marker,
            m.record.filename,
            badge(m.record.similarity, Some(thresholds))
        );
        if m.is_unexpected_strong_match {
            let _ = write!(out, "  {}", UNEXPECTED_WARNING);
        }
        out.push('\n');
    }

    if !item.expected.is_empty() {
        let _ = writeln!(out, "  Expected");
        for e in &item.expected {
            let marker = if e.has_no_strong_match { "!" } else { " " };
            let _ = write!(
                out,
                "   {} {:<32} {}",
                marker,
                e.filename,
                optional_badge(e.similarity, thresholds)
            );
            if e.has_no_strong_match {
                let _ = write!(out, "  {}", MISSING_WARNING);
            }
            out.push('\n');
        }
    }

    if !item.potential.is_empty() {
        let _ = writeln!(out, "  Nice to have");
        for p in &item.potential {
            let _ = writeln!(
                out,
                "     {:<32} {}",
                p.filename,
                optional_badge(p.similarity, thresholds)
            );
        }
    }

    if !item.duplicate_filenames.is_empty() {
        let _ = writeln!(
            out,
            "  (重複ファイル名: {}、後の候補を採用)",
            item.duplicate_filenames.join(", ")
        );
    }

    out
}

/// 閾値スイープの表
pub fn render_sweep(rows: &[(f64, AggregateMetrics)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>6}  {:>12}  {:>10}", "high", "unexpected", "expected");
    for (high, metrics) in rows {
        let found = metrics
            .found_percent()
            .map(|p| format!("{}%", p))
            .unwrap_or_else(|| "N/A".to_string());
        let _ = writeln!(
            out,
            "{:>6}  {:>12}  {:>10}",
            format_percent(*high),
            metrics.unexpected_rate().to_string(),
            found
        );
    }
    out
}
