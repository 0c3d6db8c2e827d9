use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchReviewError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("必須の設定 {0} がありません。環境変数を設定するか `match-review config --set` で設定してください")]
    MissingSetting(&'static str),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("対応していない画像形式です: {0}（PNG/JPEG/WebPのみ）")]
    UnsupportedImage(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("通信エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API呼び出しエラー: HTTP {status}: {body}")]
    ApiStatus { status: u16, body: String },

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("モデルが選択されていません")]
    NoModelSelected,

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] match_review_common::Error),
}

pub type Result<T> = std::result::Result<T, MatchReviewError>;
