//! 実APIとの結合テスト（MATCH_REVIEW_API_URL 未設定ならスキップ）

use image::{Rgb, RgbImage};
use match_review::client::SimilarityClient;
use match_review::upload::{UploadFlow, UploadOptions};
use match_review_common::UploadStatus;

#[tokio::test]
async fn live_find_similar() {
    let api_url = match std::env::var("MATCH_REVIEW_API_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => {
            eprintln!("MATCH_REVIEW_API_URL not set; skipping live test");
            return;
        }
    };

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("probe.png");
    RgbImage::from_pixel(320, 320, Rgb([200, 120, 40]))
        .save(&path)
        .expect("failed to write probe image");

    let client = SimilarityClient::with_client(reqwest::Client::new(), &api_url);
    let mut flow = UploadFlow::new(&client);
    let mut seen = Vec::new();
    let outcome = flow
        .run(&path, UploadOptions::default(), |status| seen.push(status))
        .await
        .expect("search failed");

    assert_eq!(
        seen,
        vec![UploadStatus::Uploading, UploadStatus::Searching, UploadStatus::Done]
    );
    for pair in outcome.matches.windows(2) {
        assert!(pair[0].similarity >= pair[1].similarity);
    }
}
