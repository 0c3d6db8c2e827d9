//! Match Review Common Library
//!
//! CLIとWeb(WASM)で共有される型・照合エンジン・集計

pub mod types;
pub mod error;
pub mod schema;
pub mod filename;
pub mod threshold;
pub mod metrics;
pub mod reconcile;
pub mod status;
pub mod data_url;
pub mod search;
pub mod resize;

pub use types::{EvaluatedItem, EvaluationRow, ExpectedLabels, FindSimilarRequest, FindSimilarResponse, MatchRecord};
pub use error::{Error, Result};
pub use schema::{
    parse_model_list, parse_row, parse_rows, parse_rows_str, ParsedRows, RejectedRow,
    EVALS_ACTUAL_TABLE, EVALUATION_SELECT, UNIQUE_MODELS_RPC,
};
pub use filename::{display_name, strip_extension};
pub use threshold::{classify, classify_optional, format_percent, ConfidenceTier, Thresholds};
pub use metrics::{AggregateMetrics, Rate};
pub use reconcile::{
    reconcile, reconcile_item, ReconciledExpectedMatch, ReconciledItem, ReconciledMatch,
    ReconciledPotentialMatch, Reconciliation,
};
pub use status::{FetchStatus, UploadStatus};
pub use data_url::to_data_url;
pub use search::{drop_self_match, top_matches, FIND_SIMILAR_PATH};
pub use resize::{target_size, JPEG_QUALITY_PERCENT, TARGET_SHORT_SIDE};
