//! 画面状態の列挙

use serde::{Deserialize, Serialize};

/// アップロード（類似検索）フローの状態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    #[default]
    Ready,
    Uploading,
    Searching,
    Done,
    Error,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Ready => "ready",
            UploadStatus::Uploading => "uploading",
            UploadStatus::Searching => "searching",
            UploadStatus::Done => "done",
            UploadStatus::Error => "error",
        }
    }

    /// 処理中（ドロップを受け付けない）か
    pub fn is_busy(&self) -> bool {
        matches!(self, UploadStatus::Uploading | UploadStatus::Searching)
    }
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 評価データ取得の状態
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Loaded { items: usize, rejected: usize },
    Failed { message: String },
}

impl FetchStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchStatus::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchStatus::Failed { .. })
    }
}

impl std::fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStatus::Idle => write!(f, "idle"),
            FetchStatus::Loading => write!(f, "loading"),
            FetchStatus::Loaded { items, rejected: 0 } => write!(f, "loaded {} items", items),
            FetchStatus::Loaded { items, rejected } => {
                write!(f, "loaded {} items ({} rejected)", items, rejected)
            }
            FetchStatus::Failed { message } => write!(f, "failed: {}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_status_busy() {
        assert!(!UploadStatus::Ready.is_busy());
        assert!(UploadStatus::Uploading.is_busy());
        assert!(UploadStatus::Searching.is_busy());
        assert!(!UploadStatus::Done.is_busy());
        assert!(!UploadStatus::Error.is_busy());
        assert_eq!(UploadStatus::default(), UploadStatus::Ready);
    }

    #[test]
    fn test_upload_status_serde() {
        let json = serde_json::to_string(&UploadStatus::Searching).unwrap();
        assert_eq!(json, "\"searching\"");
    }

    #[test]
    fn test_fetch_status_display() {
        assert_eq!(
            FetchStatus::Loaded { items: 3, rejected: 0 }.to_string(),
            "loaded 3 items"
        );
        assert_eq!(
            FetchStatus::Loaded { items: 3, rejected: 1 }.to_string(),
            "loaded 3 items (1 rejected)"
        );
        let failed = FetchStatus::Failed {
            message: "HTTP 500".to_string(),
        };
        assert!(failed.is_failed());
        assert_eq!(failed.to_string(), "failed: HTTP 500");
    }
}
