//! 類似検索・評価データの型定義
//!
//! - MatchRecord: モデルが返した候補1件
//! - EvaluatedItem: 評価対象のプローブ画像1件（検証済み）
//! - EvaluationRow: データストアの行（ワイヤ形式）

use serde::{Deserialize, Serialize};

/// 類似検索の候補1件
///
/// `similarity` は慣例的に [0,1] だがクランプしない
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: i64,
    pub filename: String,
    pub image_url: String,
    pub similarity: f64,
}

/// 評価対象のプローブ画像
///
/// `matches` の順序はランク順（照合には無関係、表示には使う）。
/// 期待・候補ファイル名は拡張子なしの前提。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedItem {
    pub id: i64,
    pub image_url: String,
    pub filename: String,
    pub matches: Vec<MatchRecord>,
    pub expected_filenames: Vec<String>,
    pub potential_filenames: Vec<String>,
}

/// `evals_expected` テーブルのラベル（結合結果）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedLabels {
    pub matches_expected: Vec<String>,
    pub matches_potential: Vec<String>,
}

/// `evals_actual` の1行（`evals_expected` 結合済み）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRow {
    pub id: i64,
    pub image_url: String,
    pub filename: String,
    pub matches: Vec<MatchRecord>,
    pub evals_expected: ExpectedLabels,
}

impl From<EvaluationRow> for EvaluatedItem {
    fn from(row: EvaluationRow) -> Self {
        Self {
            id: row.id,
            image_url: row.image_url,
            filename: row.filename,
            matches: row.matches,
            expected_filenames: row.evals_expected.matches_expected,
            potential_filenames: row.evals_expected.matches_potential,
        }
    }
}

/// 類似検索リクエスト（`POST /main/find-similar`）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindSimilarRequest {
    pub image_base64: String,
}

/// 類似検索レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindSimilarResponse {
    pub matches: Vec<MatchRecord>,
}
