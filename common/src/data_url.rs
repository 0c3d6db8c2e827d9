//! Data URL ユーティリティ

/// Data URLを組み立てる
pub fn to_data_url(mime_type: &str, base64_data: &str) -> String {
    format!("data:{};base64,{}", mime_type, base64_data)
}
