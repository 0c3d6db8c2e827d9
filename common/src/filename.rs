//! ファイル名の正規化

/// 最後の `.<拡張子>` を取り除く
///
/// ドットを含まない（空文字列を含む）場合はそのまま返す。
/// 複数ドットの場合は最後の区切りだけを拡張子とみなす。
///
/// # Examples
/// ```
/// use match_review_common::strip_extension;
///
/// assert_eq!(strip_extension("a.png"), "a");
/// assert_eq!(strip_extension("a.b.png"), "a.b");
/// assert_eq!(strip_extension("noext"), "noext");
/// ```
pub fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(pos) => &filename[..pos],
        None => filename,
    }
}

/// 一覧表示用のプローブ名（拡張子なし、先頭の `x_` を空白に）
pub fn display_name(filename: &str) -> String {
    strip_extension(filename).replacen("x_", " ", 1)
}
