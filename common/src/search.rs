//! 類似検索結果の後処理

use crate::types::MatchRecord;

/// 類似検索エンドポイント（APIベースURLからの相対パス）
pub const FIND_SIMILAR_PATH: &str = "/main/find-similar";

/// 自己一致とみなす類似度
pub const SELF_MATCH_SIMILARITY: f64 = 1.0;

/// 先頭が自己一致（類似度ちょうど1.0）なら取り除く
///
/// # Returns
/// 取り除いた場合 `true`
pub fn drop_self_match(matches: &mut Vec<MatchRecord>) -> bool {
    if matches
        .first()
        .is_some_and(|m| m.similarity == SELF_MATCH_SIMILARITY)
    {
        matches.remove(0);
        true
    } else {
        false
    }
}

/// 上位 `limit` 件
pub fn top_matches(matches: &[MatchRecord], limit: usize) -> &[MatchRecord] {
    &matches[..matches.len().min(limit)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(filename: &str, similarity: f64) -> MatchRecord {
        MatchRecord {
            id: 0,
            filename: filename.to_string(),
            image_url: String::new(),
            similarity,
        }
    }

    #[test]
    fn test_drop_self_match() {
        let mut matches = vec![record("self.jpg", 1.0), record("b.jpg", 0.9)];
        assert!(drop_self_match(&mut matches));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].filename, "b.jpg");
    }

    #[test]
    fn test_keep_when_not_exact() {
        let mut matches = vec![record("a.jpg", 0.999), record("b.jpg", 1.0)];
        assert!(!drop_self_match(&mut matches));
        assert_eq!(matches.len(), 2);

        let mut empty: Vec<MatchRecord> = vec![];
        assert!(!drop_self_match(&mut empty));
    }

    #[test]
    fn test_top_matches() {
        let matches: Vec<_> = (0..7).map(|i| record(&format!("{}.jpg", i), 0.5)).collect();
        assert_eq!(top_matches(&matches, 5).len(), 5);
        assert_eq!(top_matches(&matches, 10).len(), 7);
        assert_eq!(top_matches(&matches, 0).len(), 0);
    }
}
