//! 評価レポート（JSON出力・閾値スイープ）

use crate::error::Result;
use match_review_common::{
    reconcile, AggregateMetrics, EvaluatedItem, FetchStatus, Rate, Reconciliation, Thresholds,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// スイープの開始・終了・刻み（スライダーの範囲）
pub const SWEEP_START: f64 = 0.5;
pub const SWEEP_END: f64 = 1.0;
pub const SWEEP_STEP: f64 = 0.05;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub model: String,
    pub generated_at: String,
    pub thresholds: Thresholds,
    pub status: FetchStatus,
    pub metrics: AggregateMetrics,
    pub unexpected_rate: Rate,
    pub missing_rate: Rate,
    pub items: Vec<match_review_common::ReconciledItem>,
}

impl EvaluationReport {
    pub fn new(
        model: &str,
        thresholds: Thresholds,
        status: FetchStatus,
        reconciliation: &Reconciliation,
    ) -> Self {
        Self {
            model: model.to_string(),
            generated_at: chrono::Local::now().to_rfc3339(),
            thresholds,
            status,
            metrics: reconciliation.metrics,
            unexpected_rate: reconciliation.metrics.unexpected_rate(),
            missing_rate: reconciliation.metrics.missing_rate(),
            items: reconciliation.items.clone(),
        }
    }
}

pub fn write_report(path: &Path, report: &EvaluationReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

/// 高閾値を変えながら集計だけを求める
///
/// 低閾値は高閾値を超えないように切り詰める
pub fn threshold_sweep(items: &[EvaluatedItem], low: f64) -> Vec<(f64, AggregateMetrics)> {
    let steps = ((SWEEP_END - SWEEP_START) / SWEEP_STEP).round() as usize;
    (0..=steps)
        .filter_map(|i| {
            let high = SWEEP_START + i as f64 * SWEEP_STEP;
            let thresholds = Thresholds::new(high, low.min(high)).ok()?;
            Some((high, reconcile(items, &thresholds).metrics))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use match_review_common::MatchRecord;

    fn items() -> Vec<EvaluatedItem> {
        vec![EvaluatedItem {
            id: 1,
            image_url: String::new(),
            filename: "probe.jpg".to_string(),
            matches: vec![
                MatchRecord {
                    id: 1,
                    filename: "a.png".to_string(),
                    image_url: String::new(),
                    similarity: 0.93,
                },
                MatchRecord {
                    id: 2,
                    filename: "b.png".to_string(),
                    image_url: String::new(),
                    similarity: 0.72,
                },
            ],
            expected_filenames: vec!["a".to_string()],
            potential_filenames: vec![],
        }]
    }

    #[test]
    fn test_sweep_covers_slider_range() {
        let rows = threshold_sweep(&items(), 0.8);
        assert_eq!(rows.len(), 11);
        assert!((rows[0].0 - 0.5).abs() < 1e-9);
        assert!((rows[10].0 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sweep_is_monotonic() {
        let rows = threshold_sweep(&items(), 0.8);
        for pair in rows.windows(2) {
            let (prev, next) = (&pair[0].1, &pair[1].1);
            assert!(next.num_missing_strong_matches >= prev.num_missing_strong_matches);
            assert!(next.num_unexpected_strong_matches <= prev.num_unexpected_strong_matches);
        }
    }

    #[test]
    fn test_write_report_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.json");
        let thresholds = Thresholds::default();
        let reconciliation = reconcile(&items(), &thresholds);
        let report = EvaluationReport::new(
            "cohere_v1",
            thresholds,
            FetchStatus::Loaded { items: 1, rejected: 0 },
            &reconciliation,
        );

        write_report(&path, &report).unwrap();
        let loaded: EvaluationReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.model, "cohere_v1");
        assert_eq!(loaded.metrics, reconciliation.metrics);
        assert_eq!(loaded.items.len(), 1);
    }
}
