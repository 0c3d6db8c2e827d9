//! データストア応答の検証
//!
//! 行単位で型検証し、不正な行は部分的なオブジェクトにせず除外する。
//! 未知のフィールド（`model`, `expected_id` など）は無視する。

use crate::error::{Error, Result};
use crate::types::{EvaluatedItem, EvaluationRow};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 評価結果テーブル
pub const EVALS_ACTUAL_TABLE: &str = "evals_actual";
/// モデル一覧RPC
pub const UNIQUE_MODELS_RPC: &str = "get_unique_models";
/// 期待ラベルを内部結合する select 句
pub const EVALUATION_SELECT: &str =
    "*,evals_expected!inner(filename,matches_expected,matches_potential)";

/// RPCの戻り値（`setof text` / `table(model text)` の両方を受ける）
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ModelEntry {
    Name(String),
    Row { model: String },
}

impl ModelEntry {
    fn into_name(self) -> String {
        match self {
            ModelEntry::Name(name) => name,
            ModelEntry::Row { model } => model,
        }
    }
}

/// 除外された行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRow {
    /// 応答配列内の位置
    pub index: usize,
    pub reason: String,
}

/// 検証結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedRows {
    pub items: Vec<EvaluatedItem>,
    pub rejected: Vec<RejectedRow>,
}

impl ParsedRows {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

impl EvaluationRow {
    /// serdeで表現できない制約を検証
    pub fn validate(&self) -> Result<()> {
        if let Some(m) = self.matches.iter().find(|m| !m.similarity.is_finite()) {
            return Err(Error::Validation(format!(
                "match {} ({}) has non-finite similarity",
                m.id, m.filename
            )));
        }
        Ok(())
    }
}

/// 1行を検証して EvaluatedItem に変換
pub fn parse_row(value: Value) -> Result<EvaluatedItem> {
    let row: EvaluationRow =
        serde_json::from_value(value).map_err(|e| Error::Validation(e.to_string()))?;
    row.validate()?;
    Ok(row.into())
}

/// 行配列を検証（不正行は `rejected` へ）
pub fn parse_rows(values: Vec<Value>) -> ParsedRows {
    let mut parsed = ParsedRows::default();

    for (index, value) in values.into_iter().enumerate() {
        match parse_row(value) {
            Ok(item) => parsed.items.push(item),
            Err(e) => parsed.rejected.push(RejectedRow {
                index,
                reason: e.to_string(),
            }),
        }
    }

    parsed
}

/// モデル一覧RPCの応答本文をパース
pub fn parse_model_list(body: &str) -> Result<Vec<String>> {
    let entries: Vec<ModelEntry> = serde_json::from_str(body)?;
    Ok(entries.into_iter().map(ModelEntry::into_name).collect())
}

/// 応答本文をパース
///
/// # Returns
/// * `Ok(ParsedRows)` - 本文がJSON配列
/// * `Err` - 本文が配列でない（応答全体が不正）
pub fn parse_rows_str(body: &str) -> Result<ParsedRows> {
    let value: Value = serde_json::from_str(body)?;
    match value {
        Value::Array(values) => Ok(parse_rows(values)),
        other => Err(Error::Validation(format!(
            "expected an array of rows, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
