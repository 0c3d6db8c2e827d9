//! 画像類似検索の結果確認・モデル評価

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod optimizer;
pub mod render;
pub mod report;
pub mod session;
pub mod upload;
