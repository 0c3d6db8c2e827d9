use crate::error::{MatchReviewError, Result};
use match_review_common::threshold::{DEFAULT_HIGH_THRESHOLD, DEFAULT_LOW_THRESHOLD};
use match_review_common::Thresholds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_API_URL: &str = "MATCH_REVIEW_API_URL";
pub const ENV_SUPABASE_URL: &str = "MATCH_REVIEW_SUPABASE_URL";
pub const ENV_SUPABASE_KEY: &str = "MATCH_REVIEW_SUPABASE_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub high_threshold: f64,
    pub low_threshold: f64,
    pub timeout_seconds: u64,
    pub result_limit: usize,
}

/// 接続設定（すべて必須、起動時に確定）
#[derive(Debug, Clone)]
pub struct Connection {
    pub api_url: String,
    pub supabase_url: String,
    pub supabase_key: String,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            supabase_url: None,
            supabase_key: None,
            high_threshold: DEFAULT_HIGH_THRESHOLD,
            low_threshold: DEFAULT_LOW_THRESHOLD,
            timeout_seconds: 30,
            result_limit: 5,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MatchReviewError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("match-review").join("config.json"))
    }

    /// 接続設定を確定（環境変数を優先）
    ///
    /// 1つでも欠けていれば `MissingSetting`
    pub fn connection(&self) -> Result<Connection> {
        self.connection_with(|name| std::env::var(name).ok())
    }

    pub fn connection_with<F>(&self, env: F) -> Result<Connection>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |name: &'static str, stored: &Option<String>| -> Result<String> {
            env(name)
                .or_else(|| stored.clone())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(MatchReviewError::MissingSetting(name))
        };

        Ok(Connection {
            api_url: pick(ENV_API_URL, &self.api_url)?
                .trim_end_matches('/')
                .to_string(),
            supabase_url: pick(ENV_SUPABASE_URL, &self.supabase_url)?
                .trim_end_matches('/')
                .to_string(),
            supabase_key: pick(ENV_SUPABASE_KEY, &self.supabase_key)?,
            timeout_seconds: self.timeout_seconds,
        })
    }

    pub fn thresholds(&self) -> Result<Thresholds> {
        Ok(Thresholds::new(self.high_threshold, self.low_threshold)?)
    }

    /// コマンドライン指定で閾値を上書き
    ///
    /// `low` 未指定なら設定値の低閾値を `high` 以下に丸める。
    /// 両方指定して矛盾する場合だけ `InvalidThresholds`。
    pub fn thresholds_with(&self, high: Option<f64>, low: Option<f64>) -> Result<Thresholds> {
        let high = high.unwrap_or(self.high_threshold);
        let low = match low {
            Some(low) => low,
            None => self.low_threshold.min(high),
        };
        Ok(Thresholds::new(high, low)?)
    }

    /// キー名で値を設定
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parse_f64 = |v: &str| {
            v.parse::<f64>()
                .map_err(|_| MatchReviewError::Config(format!("数値ではありません: {}", v)))
        };

        let mut next = self.clone();
        match key {
            "api_url" => next.api_url = Some(value.to_string()),
            "supabase_url" => next.supabase_url = Some(value.to_string()),
            "supabase_key" => next.supabase_key = Some(value.to_string()),
            "high_threshold" => next.high_threshold = parse_f64(value)?,
            "low_threshold" => next.low_threshold = parse_f64(value)?,
            "timeout_seconds" => {
                next.timeout_seconds = value
                    .parse()
                    .map_err(|_| MatchReviewError::Config(format!("整数ではありません: {}", value)))?
            }
            "result_limit" => {
                next.result_limit = value
                    .parse()
                    .map_err(|_| MatchReviewError::Config(format!("整数ではありません: {}", value)))?
            }
            _ => return Err(MatchReviewError::Config(format!("不明な設定キー: {}", key))),
        }

        // 閾値の組み合わせは保存前に検証
        next.thresholds()?;
        *self = next;
        Ok(())
    }
}

/// キーの先頭だけ表示
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(6).collect();
    if secret.chars().count() > 6 {
        format!("{}…", visible)
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> Config {
        Config {
            api_url: Some("http://localhost:5000/".to_string()),
            supabase_url: Some("https://proj.supabase.co".to_string()),
            supabase_key: Some("anon-key".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_connection_from_file_values() {
        let conn = full_config().connection_with(|_| None).unwrap();
        assert_eq!(conn.api_url, "http://localhost:5000");
        assert_eq!(conn.supabase_url, "https://proj.supabase.co");
        assert_eq!(conn.supabase_key, "anon-key");
    }

    #[test]
    fn test_env_overrides_file() {
        let conn = full_config()
            .connection_with(|name| (name == ENV_API_URL).then(|| "https://api.example".to_string()))
            .unwrap();
        assert_eq!(conn.api_url, "https://api.example");
    }

    #[test]
    fn test_missing_setting_fails_fast() {
        let config = Config {
            supabase_key: None,
            ..full_config()
        };
        let err = config.connection_with(|_| None).unwrap_err();
        assert!(matches!(err, MatchReviewError::MissingSetting(ENV_SUPABASE_KEY)));
    }

    #[test]
    fn test_blank_setting_is_missing() {
        let config = Config {
            api_url: Some("   ".to_string()),
            ..full_config()
        };
        assert!(config.connection_with(|_| None).is_err());
    }

    #[test]
    fn test_set_values() {
        let mut config = Config::default();
        config.set("api_url", "http://x").unwrap();
        config.set("high_threshold", "0.95").unwrap();
        assert_eq!(config.api_url.as_deref(), Some("http://x"));
        assert_eq!(config.high_threshold, 0.95);

        assert!(config.set("unknown", "1").is_err());
        assert!(config.set("low_threshold", "abc").is_err());
        assert!(config.set("low_threshold", "0.99").is_err());
    }

    #[test]
    fn test_high_override_clamps_configured_low() {
        let config = Config::default();
        let t = config.thresholds_with(Some(0.7), None).unwrap();
        assert_eq!(t.high(), 0.7);
        assert_eq!(t.low(), 0.7);

        // 丸めが不要なら設定値のまま
        let t = config.thresholds_with(Some(0.95), None).unwrap();
        assert_eq!(t.low(), 0.8);
    }

    #[test]
    fn test_explicit_conflicting_pair_rejected() {
        let config = Config::default();
        assert!(config.thresholds_with(Some(0.7), Some(0.8)).is_err());
        assert!(config.thresholds_with(None, Some(0.95)).is_err());
        let t = config.thresholds_with(None, None).unwrap();
        assert_eq!(t, Thresholds::default());
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("eyJhbGciOiJIUzI1NiJ9"), "eyJhbG…");
        assert_eq!(mask_secret("short"), "***");
    }
}
