//! ビルド時に埋め込む接続設定
//!
//! `MATCH_REVIEW_API_URL` / `MATCH_REVIEW_SUPABASE_URL` / `MATCH_REVIEW_SUPABASE_KEY`
//! をビルド時の環境変数から読む。

#[derive(Debug, Clone, PartialEq)]
pub struct WebConfig {
    pub api_url: String,
    pub supabase_url: String,
    pub supabase_key: String,
}

impl WebConfig {
    /// ビルド時の設定を確定
    ///
    /// # Returns
    /// * `Err(name)` - 未設定の環境変数名
    pub fn from_build() -> Result<Self, &'static str> {
        Self::from_values(
            option_env!("MATCH_REVIEW_API_URL"),
            option_env!("MATCH_REVIEW_SUPABASE_URL"),
            option_env!("MATCH_REVIEW_SUPABASE_KEY"),
        )
    }

    fn from_values(
        api_url: Option<&str>,
        supabase_url: Option<&str>,
        supabase_key: Option<&str>,
    ) -> Result<Self, &'static str> {
        fn require(value: Option<&str>, name: &'static str) -> Result<String, &'static str> {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| v.trim_end_matches('/').to_string())
                .ok_or(name)
        }

        Ok(Self {
            api_url: require(api_url, "MATCH_REVIEW_API_URL")?,
            supabase_url: require(supabase_url, "MATCH_REVIEW_SUPABASE_URL")?,
            supabase_key: require(supabase_key, "MATCH_REVIEW_SUPABASE_KEY")?,
        })
    }
}
