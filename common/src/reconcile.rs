//! 照合エンジン
//!
//! 評価データ（モデルの候補・期待ファイル・候補ファイル）を閾値で照合し、
//! 候補ごとのフラグと集計指標を求める。
//!
//! ## 処理フロー（プローブ画像ごと）
//! 1. 正規化ファイル名 → 候補 のルックアップを作る（重複は後勝ち）
//! 2. 期待 ∪ 候補ファイル名 を「既知」とする
//! 3. 各候補: 高信頼かつ既知でなければ「想定外の高信頼候補」
//! 4. 各期待ファイル: 見つからないか高閾値未満なら「高信頼候補なし」
//! 5. 各候補ファイル: ルックアップのみ（減点しない）
//!
//! 入力は変更せず、呼び出し間で状態を持たない。

use crate::filename::strip_extension;
use crate::metrics::AggregateMetrics;
use crate::threshold::Thresholds;
use crate::types::{EvaluatedItem, MatchRecord};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// フラグ付きの候補
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledMatch {
    #[serde(flatten)]
    pub record: MatchRecord,
    pub is_unexpected_strong_match: bool,
}

/// 期待ファイルの照合結果
///
/// `similarity` / `image_url` は候補に見つかった場合のみ `Some`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledExpectedMatch {
    pub filename: String,
    pub similarity: Option<f64>,
    pub image_url: Option<String>,
    pub has_no_strong_match: bool,
}

/// 候補（あれば良い）ファイルの照合結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledPotentialMatch {
    pub filename: String,
    pub similarity: Option<f64>,
    pub image_url: Option<String>,
}

/// プローブ画像1件の照合結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledItem {
    pub id: i64,
    pub image_url: String,
    pub filename: String,
    pub matches: Vec<ReconciledMatch>,
    pub expected: Vec<ReconciledExpectedMatch>,
    pub potential: Vec<ReconciledPotentialMatch>,
    /// 候補内で重複した正規化ファイル名（後勝ちで解決済み）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplicate_filenames: Vec<String>,
}

impl ReconciledItem {
    pub fn has_warnings(&self) -> bool {
        self.matches.iter().any(|m| m.is_unexpected_strong_match)
            || self.expected.iter().any(|e| e.has_no_strong_match)
    }
}

/// 照合パスの結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub items: Vec<ReconciledItem>,
    pub metrics: AggregateMetrics,
}

/// ルックアップの値
#[derive(Debug, Clone, Copy)]
struct Found<'a> {
    image_url: &'a str,
    similarity: f64,
}

/// 全件を照合
pub fn reconcile(items: &[EvaluatedItem], thresholds: &Thresholds) -> Reconciliation {
    let mut metrics = AggregateMetrics::default();
    let items = items
        .iter()
        .map(|item| reconcile_item(item, thresholds, &mut metrics))
        .collect();

    Reconciliation { items, metrics }
}

/// 1件を照合し、集計を `metrics` に加算
pub fn reconcile_item(
    item: &EvaluatedItem,
    thresholds: &Thresholds,
    metrics: &mut AggregateMetrics,
) -> ReconciledItem {
    // 1. ルックアップ（後勝ち）
    let mut lookup: HashMap<&str, Found> = HashMap::with_capacity(item.matches.len());
    let mut duplicate_filenames = Vec::new();
    for m in &item.matches {
        let key = strip_extension(&m.filename);
        let previous = lookup.insert(
            key,
            Found {
                image_url: &m.image_url,
                similarity: m.similarity,
            },
        );
        if previous.is_some() && !duplicate_filenames.iter().any(|d| d == key) {
            duplicate_filenames.push(key.to_string());
        }
    }

    // 2. 既知ファイル名
    let known: HashSet<&str> = item
        .expected_filenames
        .iter()
        .chain(item.potential_filenames.iter())
        .map(String::as_str)
        .collect();

    // 3. 候補のフラグ
    let matches = item
        .matches
        .iter()
        .map(|m| {
            let unexpected = thresholds.is_strong(m.similarity)
                && !known.contains(strip_extension(&m.filename));
            metrics.record_match(unexpected);
            ReconciledMatch {
                record: m.clone(),
                is_unexpected_strong_match: unexpected,
            }
        })
        .collect();

    // 4. 期待ファイル
    let expected = item
        .expected_filenames
        .iter()
        .map(|filename| {
            let found = lookup.get(filename.as_str());
            let missing = match found {
                Some(f) => !thresholds.is_strong(f.similarity),
                None => true,
            };
            metrics.record_expected(missing);
            ReconciledExpectedMatch {
                filename: filename.clone(),
                similarity: found.map(|f| f.similarity),
                image_url: found.map(|f| f.image_url.to_string()),
                has_no_strong_match: missing,
            }
        })
        .collect();

    // 5. 候補ファイル
    let potential = item
        .potential_filenames
        .iter()
        .map(|filename| {
            let found = lookup.get(filename.as_str());
            ReconciledPotentialMatch {
                filename: filename.clone(),
                similarity: found.map(|f| f.similarity),
                image_url: found.map(|f| f.image_url.to_string()),
            }
        })
        .collect();

    ReconciledItem {
        id: item.id,
        image_url: item.image_url.clone(),
        filename: item.filename.clone(),
        matches,
        expected,
        potential,
        duplicate_filenames,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, filename: &str, similarity: f64) -> MatchRecord {
        MatchRecord {
            id,
            filename: filename.to_string(),
            image_url: format!("https://store/{}", filename),
            similarity,
        }
    }

    fn item(matches: Vec<MatchRecord>, expected: &[&str], potential: &[&str]) -> EvaluatedItem {
        EvaluatedItem {
            id: 1,
            image_url: "https://store/probe.jpg".to_string(),
            filename: "probe.jpg".to_string(),
            matches,
            expected_filenames: expected.iter().map(|s| s.to_string()).collect(),
            potential_filenames: potential.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn thresholds(high: f64, low: f64) -> Thresholds {
        Thresholds::new(high, low).unwrap()
    }

    #[test]
    fn test_expected_found_with_strong_match() {
        let items = vec![item(vec![record(1, "cat.png", 0.95)], &["cat"], &[])];
        let result = reconcile(&items, &thresholds(0.9, 0.8));

        let reconciled = &result.items[0];
        assert!(!reconciled.matches[0].is_unexpected_strong_match);
        assert_eq!(reconciled.expected[0].similarity, Some(0.95));
        assert_eq!(
            reconciled.expected[0].image_url.as_deref(),
            Some("https://store/cat.png")
        );
        assert!(!reconciled.expected[0].has_no_strong_match);
        assert_eq!(result.metrics.num_missing_strong_matches, 0);
        assert_eq!(result.metrics.total_expected_strong_matches, 1);
    }

    #[test]
    fn test_unexpected_strong_match_with_empty_labels() {
        let items = vec![item(vec![record(1, "cat.png", 0.95)], &[], &[])];
        let result = reconcile(&items, &thresholds(0.9, 0.8));

        assert!(result.items[0].matches[0].is_unexpected_strong_match);
        assert_eq!(result.metrics.num_unexpected_strong_matches, 1);
        assert_eq!(result.metrics.total_matches_considered, 1);
    }

    #[test]
    fn test_missing_expected_has_absent_fields() {
        let items = vec![item(vec![record(1, "cat.png", 0.95)], &["dog"], &[])];
        let result = reconcile(&items, &thresholds(0.9, 0.8));

        let dog = &result.items[0].expected[0];
        assert!(dog.has_no_strong_match);
        assert_eq!(dog.similarity, None);
        assert_eq!(dog.image_url, None);
        assert_eq!(result.metrics.num_missing_strong_matches, 1);
    }

    #[test]
    fn test_no_expected_files_missing_rate_not_applicable() {
        let items = vec![
            item(vec![record(1, "cat.png", 0.95)], &[], &["cat"]),
            item(vec![], &[], &[]),
        ];
        let result = reconcile(&items, &thresholds(0.9, 0.8));

        assert_eq!(result.metrics.total_expected_strong_matches, 0);
        assert!(!result.metrics.missing_rate().is_applicable());
        assert_eq!(result.metrics.missing_rate().to_string(), "N/A");
    }

    #[test]
    fn test_duplicate_filenames_last_write_wins() {
        let items = vec![item(
            vec![record(1, "x.png", 0.5), record(2, "x.png", 0.95)],
            &["x"],
            &[],
        )];
        let result = reconcile(&items, &thresholds(0.9, 0.8));

        let x = &result.items[0].expected[0];
        assert_eq!(x.similarity, Some(0.95));
        assert!(!x.has_no_strong_match);
        assert_eq!(result.items[0].duplicate_filenames, vec!["x".to_string()]);
        // 全候補を数える
        assert_eq!(result.metrics.total_matches_considered, 2);
    }

    #[test]
    fn test_moderate_expected_counts_as_missing() {
        let items = vec![item(vec![record(1, "cat.png", 0.85)], &["cat"], &[])];
        let result = reconcile(&items, &thresholds(0.9, 0.8));

        assert!(result.items[0].expected[0].has_no_strong_match);
        assert_eq!(result.items[0].expected[0].similarity, Some(0.85));
    }

    #[test]
    fn test_zero_similarity_is_present_not_absent() {
        let items = vec![item(vec![record(1, "cat.png", 0.0)], &["cat"], &[])];
        let result = reconcile(&items, &thresholds(0.9, 0.8));

        assert_eq!(result.items[0].expected[0].similarity, Some(0.0));
        assert!(result.items[0].expected[0].has_no_strong_match);
    }

    #[test]
    fn test_potential_is_known_and_never_penalized() {
        let items = vec![item(
            vec![record(1, "bird.jpg", 0.97), record(2, "fish.jpg", 0.1)],
            &[],
            &["bird", "owl"],
        )];
        let result = reconcile(&items, &thresholds(0.9, 0.8));

        let reconciled = &result.items[0];
        assert!(!reconciled.matches[0].is_unexpected_strong_match);
        assert_eq!(reconciled.potential[0].similarity, Some(0.97));
        assert_eq!(reconciled.potential[1].similarity, None);
        assert_eq!(result.metrics.total_expected_strong_matches, 0);
        assert_eq!(result.metrics.num_unexpected_strong_matches, 0);
        assert!(!reconciled.has_warnings());
    }

    #[test]
    fn test_weak_unknown_match_not_flagged() {
        let items = vec![item(vec![record(1, "tree.jpg", 0.4)], &[], &[])];
        let result = reconcile(&items, &thresholds(0.9, 0.8));

        assert!(!result.items[0].matches[0].is_unexpected_strong_match);
        assert_eq!(result.metrics.total_matches_considered, 1);
        assert_eq!(result.metrics.unexpected_rate().percent(), Some(0));
    }

    #[test]
    fn test_aggregate_across_items() {
        let items = vec![
            item(
                vec![record(1, "a.png", 0.95), record(2, "b.png", 0.92)],
                &["a"],
                &[],
            ),
            item(vec![record(3, "c.png", 0.7)], &["c", "d"], &[]),
        ];
        let result = reconcile(&items, &thresholds(0.9, 0.8));

        assert_eq!(result.metrics.total_matches_considered, 3);
        assert_eq!(result.metrics.num_unexpected_strong_matches, 1);
        assert_eq!(result.metrics.total_expected_strong_matches, 3);
        assert_eq!(result.metrics.num_missing_strong_matches, 2);
        assert_eq!(result.metrics.unexpected_rate().percent(), Some(33));
        assert_eq!(result.metrics.missing_rate().percent(), Some(67));
    }

    #[test]
    fn test_input_is_not_mutated_and_pass_is_idempotent() {
        let items = vec![
            item(vec![record(1, "a.png", 0.95), record(2, "a.jpg", 0.3)], &["a"], &["z"]),
            item(vec![record(3, "q.png", 0.99)], &["r"], &[]),
        ];
        let snapshot = items.clone();
        let t = thresholds(0.9, 0.8);

        let first = reconcile(&items, &t);
        let second = reconcile(&items, &t);
        assert_eq!(first, second);
        assert_eq!(items, snapshot);
    }

    #[test]
    fn test_counter_bounds_and_monotonic_threshold_effect() {
        let items = vec![
            item(
                vec![
                    record(1, "a.png", 0.99),
                    record(2, "b.png", 0.91),
                    record(3, "c.png", 0.83),
                    record(4, "d.png", 0.5),
                ],
                &["a", "c", "e"],
                &["b"],
            ),
            item(
                vec![record(5, "f.png", 0.97), record(6, "g.png", 0.88)],
                &["g"],
                &[],
            ),
            item(vec![], &["h"], &[]),
        ];

        let mut previous: Option<AggregateMetrics> = None;
        for step in 0..=20 {
            let high = 0.5 + step as f64 * 0.025;
            let metrics = reconcile(&items, &thresholds(high, 0.5)).metrics;

            assert!(metrics.num_unexpected_strong_matches <= metrics.total_matches_considered);
            assert!(metrics.num_missing_strong_matches <= metrics.total_expected_strong_matches);

            if let Some(prev) = previous {
                assert!(metrics.num_missing_strong_matches >= prev.num_missing_strong_matches);
                assert!(
                    metrics.num_unexpected_strong_matches <= prev.num_unexpected_strong_matches
                );
            }
            previous = Some(metrics);
        }
    }

    #[test]
    fn test_expected_filenames_compared_without_normalizing() {
        // 期待ファイル名側は拡張子なしの前提（正規化しない）
        let items = vec![item(vec![record(1, "cat.png", 0.95)], &["cat.png"], &[])];
        let result = reconcile(&items, &thresholds(0.9, 0.8));

        assert!(result.items[0].expected[0].has_no_strong_match);
        assert!(result.items[0].matches[0].is_unexpected_strong_match);
    }
}
