//! 類似度の信頼度判定
//!
//! 2つの閾値で類似度を3段階に分類する。閾値ちょうどは上の段階に属する。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 高信頼閾値のデフォルト
pub const DEFAULT_HIGH_THRESHOLD: f64 = 0.9;
/// 低閾値のデフォルト
pub const DEFAULT_LOW_THRESHOLD: f64 = 0.8;

/// 信頼度の段階
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    Weak,
    Moderate,
    Strong,
}

impl ConfidenceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::Strong => "strong",
            ConfidenceTier::Moderate => "moderate",
            ConfidenceTier::Weak => "weak",
        }
    }

    /// バッジの色名
    pub fn badge_color(&self) -> &'static str {
        match self {
            ConfidenceTier::Strong => "jade",
            ConfidenceTier::Moderate => "bronze",
            ConfidenceTier::Weak => "gray",
        }
    }
}

impl std::fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 閾値ペア（検証済み）
///
/// デシリアライズも `Thresholds::new` を通る。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawThresholds")]
pub struct Thresholds {
    high: f64,
    low: f64,
}

#[derive(Deserialize)]
struct RawThresholds {
    high: f64,
    low: f64,
}

impl TryFrom<RawThresholds> for Thresholds {
    type Error = Error;

    fn try_from(raw: RawThresholds) -> Result<Self> {
        Thresholds::new(raw.high, raw.low)
    }
}

impl Thresholds {
    /// 閾値ペアを作成
    ///
    /// # Returns
    /// * `Err(InvalidThresholds)` - NaN/無限大、または `high < low`
    pub fn new(high: f64, low: f64) -> Result<Self> {
        if !high.is_finite() || !low.is_finite() || high < low {
            return Err(Error::InvalidThresholds { high, low });
        }
        Ok(Self { high, low })
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn classify(&self, similarity: f64) -> ConfidenceTier {
        classify(similarity, self.high, self.low)
    }

    /// 高信頼（`similarity >= high`）か
    pub fn is_strong(&self, similarity: f64) -> bool {
        similarity >= self.high
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high: DEFAULT_HIGH_THRESHOLD,
            low: DEFAULT_LOW_THRESHOLD,
        }
    }
}

/// 類似度を分類
///
/// # Examples
/// ```
/// use match_review_common::{classify, ConfidenceTier};
///
/// assert_eq!(classify(0.9, 0.9, 0.8), ConfidenceTier::Strong);
/// assert_eq!(classify(0.85, 0.9, 0.8), ConfidenceTier::Moderate);
/// assert_eq!(classify(0.5, 0.9, 0.8), ConfidenceTier::Weak);
/// ```
pub fn classify(similarity: f64, high: f64, low: f64) -> ConfidenceTier {
    if similarity >= high {
        ConfidenceTier::Strong
    } else if similarity >= low {
        ConfidenceTier::Moderate
    } else {
        ConfidenceTier::Weak
    }
}

/// 閾値が片方でも未設定なら分類しない
pub fn classify_optional(
    similarity: f64,
    high: Option<f64>,
    low: Option<f64>,
) -> Option<ConfidenceTier> {
    match (high, low) {
        (Some(high), Some(low)) => Some(classify(similarity, high, low)),
        _ => None,
    }
}

/// 類似度をパーセント表記に（0.953 → "95%"）
pub fn format_percent(similarity: f64) -> String {
    format!("{}%", (similarity * 100.0).round() as i64)
}
