use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "match-review")]
#[command(about = "画像類似検索の結果確認・モデル評価ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像をアップロードして類似画像を検索
    Search {
        /// 画像ファイル（PNG/JPEG/WebP）
        #[arg(required = true)]
        image: PathBuf,

        /// 表示件数（デフォルト: 設定の result_limit）
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// 先頭の自己一致（類似度1.0）を除外
        #[arg(long)]
        exclude_self: bool,
    },

    /// 評価済みモデルの一覧
    Models,

    /// モデルの評価結果を期待ラベルと照合
    Evaluate {
        /// モデル名（省略時は一覧から選択）
        #[arg(short, long)]
        model: Option<String>,

        /// 高信頼閾値（0.0-1.0）
        #[arg(long)]
        high: Option<f64>,

        /// 低閾値（0.0-1.0）
        #[arg(long)]
        low: Option<f64>,

        /// 画像ごとの照合結果を表示
        #[arg(long)]
        items: bool,

        /// 警告のある画像だけ表示（--items と併用）
        #[arg(long)]
        warnings_only: bool,

        /// 高閾値を0.50〜1.00で変えた集計を表示
        #[arg(long)]
        sweep: bool,

        /// 照合結果をJSONで保存
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 類似検索APIのヘルスチェック
    Health,

    /// 設定を表示/編集
    Config {
        /// 設定値を保存（例: --set api_url http://localhost:5000）
        #[arg(long, num_args = 2, value_names = ["KEY", "VALUE"])]
        set: Option<Vec<String>>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
