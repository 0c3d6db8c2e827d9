//! 集計指標
//!
//! 照合パスごとにゼロから再計算する。割合は分母0のとき `Rate::NotApplicable`。

use serde::{Deserialize, Serialize};

/// 分数として保持する割合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rate {
    Defined { numerator: usize, denominator: usize },
    NotApplicable,
}

impl Rate {
    pub fn of(numerator: usize, denominator: usize) -> Self {
        if denominator == 0 {
            Rate::NotApplicable
        } else {
            Rate::Defined {
                numerator,
                denominator,
            }
        }
    }

    pub fn ratio(&self) -> Option<f64> {
        match *self {
            Rate::Defined {
                numerator,
                denominator,
            } => Some(numerator as f64 / denominator as f64),
            Rate::NotApplicable => None,
        }
    }

    /// 整数パーセント（四捨五入）
    pub fn percent(&self) -> Option<u32> {
        self.ratio().map(|r| (r * 100.0).round() as u32)
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Rate::Defined { .. })
    }
}

impl std::fmt::Display for Rate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.percent() {
            Some(p) => write!(f, "{}%", p),
            None => write!(f, "N/A"),
        }
    }
}

/// データセット全体の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    /// 考慮した候補の総数（段階に関係なく全候補を数える）
    pub total_matches_considered: usize,
    pub num_unexpected_strong_matches: usize,
    pub total_expected_strong_matches: usize,
    pub num_missing_strong_matches: usize,
}

impl AggregateMetrics {
    pub fn record_match(&mut self, unexpected_strong: bool) {
        self.total_matches_considered += 1;
        if unexpected_strong {
            self.num_unexpected_strong_matches += 1;
        }
    }

    pub fn record_expected(&mut self, missing_strong: bool) {
        self.total_expected_strong_matches += 1;
        if missing_strong {
            self.num_missing_strong_matches += 1;
        }
    }

    pub fn unexpected_rate(&self) -> Rate {
        Rate::of(
            self.num_unexpected_strong_matches,
            self.total_matches_considered,
        )
    }

    pub fn missing_rate(&self) -> Rate {
        Rate::of(
            self.num_missing_strong_matches,
            self.total_expected_strong_matches,
        )
    }

    /// 高信頼で見つかった期待ファイル数
    pub fn found_expected(&self) -> usize {
        self.total_expected_strong_matches - self.num_missing_strong_matches
    }

    /// 発見率（%）
    ///
    /// 既存の表示と数値を揃えるため `100 - 欠落率%` で求める
    pub fn found_percent(&self) -> Option<u32> {
        self.missing_rate().percent().map(|p| 100 - p)
    }

    /// 「想定外の高信頼候補」の表示行
    pub fn unexpected_summary(&self) -> String {
        format!(
            "Unexpected high-confidence matches: {}/{} ({})",
            self.num_unexpected_strong_matches,
            self.total_matches_considered,
            self.unexpected_rate()
        )
    }

    /// 「期待どおりの高信頼候補」の表示行
    pub fn expected_summary(&self) -> String {
        let percent = self
            .found_percent()
            .map(|p| format!("{}%", p))
            .unwrap_or_else(|| "N/A".to_string());
        format!(
            "Expected high-confidence matches: {}/{} ({})",
            self.found_expected(),
            self.total_expected_strong_matches,
            percent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_zero_denominator() {
        let rate = Rate::of(0, 0);
        assert_eq!(rate, Rate::NotApplicable);
        assert_eq!(rate.percent(), None);
        assert_eq!(rate.to_string(), "N/A");
        assert!(!rate.is_applicable());
    }

    #[test]
    fn test_rate_rounding() {
        assert_eq!(Rate::of(1, 3).percent(), Some(33));
        assert_eq!(Rate::of(2, 3).percent(), Some(67));
        assert_eq!(Rate::of(1, 8).percent(), Some(13));
        assert_eq!(Rate::of(0, 5).to_string(), "0%");
    }

    #[test]
    fn test_record_counters() {
        let mut m = AggregateMetrics::default();
        m.record_match(false);
        m.record_match(true);
        m.record_expected(true);
        m.record_expected(false);
        m.record_expected(false);

        assert_eq!(m.total_matches_considered, 2);
        assert_eq!(m.num_unexpected_strong_matches, 1);
        assert_eq!(m.total_expected_strong_matches, 3);
        assert_eq!(m.num_missing_strong_matches, 1);
        assert_eq!(m.found_expected(), 2);
        assert_eq!(m.unexpected_rate().percent(), Some(50));
        assert_eq!(m.found_percent(), Some(67));
    }

    #[test]
    fn test_summary_lines() {
        let m = AggregateMetrics {
            total_matches_considered: 8,
            num_unexpected_strong_matches: 1,
            total_expected_strong_matches: 8,
            num_missing_strong_matches: 1,
        };
        assert_eq!(
            m.unexpected_summary(),
            "Unexpected high-confidence matches: 1/8 (13%)"
        );
        assert_eq!(
            m.expected_summary(),
            "Expected high-confidence matches: 7/8 (87%)"
        );
    }

    #[test]
    fn test_summary_lines_not_applicable() {
        let m = AggregateMetrics::default();
        assert!(m.unexpected_summary().ends_with("0/0 (N/A)"));
        assert!(m.expected_summary().ends_with("0/0 (N/A)"));
    }
}
