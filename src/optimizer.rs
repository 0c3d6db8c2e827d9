//! アップロード前の画像最適化
//!
//! - 対応形式: PNG / JPEG / WebP
//! - EXIFの向きを補正
//! - 短辺を244pxに縮小（アスペクト比維持、拡大はしない）
//! - JPEG品質80で再エンコードし、Data URLで返す

use crate::error::{MatchReviewError, Result};
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use match_review_common::{to_data_url, JPEG_QUALITY_PERCENT};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub use match_review_common::{target_size, TARGET_SHORT_SIDE};

const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// 最適化済み画像
#[derive(Debug, Clone)]
pub struct OptimizedImage {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
    pub original_size: u64,
    pub compressed_size: u64,
}

impl OptimizedImage {
    pub fn compression_ratio(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        self.compressed_size as f64 / self.original_size as f64
    }
}

/// 拡張子が対応形式か
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// 画像ファイルを読み込み最適化
pub fn optimize_image(path: &Path) -> Result<OptimizedImage> {
    if !path.exists() {
        return Err(MatchReviewError::FileNotFound(path.display().to_string()));
    }
    if !is_supported_image(path) {
        return Err(MatchReviewError::UnsupportedImage(path.display().to_string()));
    }

    let original_size = std::fs::metadata(path)?.len();
    let image = image::open(path)
        .map_err(|e| MatchReviewError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    let orientation = read_orientation(path).unwrap_or(1);
    let image = apply_orientation(image, orientation);

    let (width, height) = target_size(image.width(), image.height());
    let image = if (width, height) != (image.width(), image.height()) {
        image.resize_exact(width, height, FilterType::Lanczos3)
    } else {
        image
    };

    let jpeg = encode_jpeg(&image)?;
    let compressed_size = jpeg.len() as u64;
    let encoded = base64::engine::general_purpose::STANDARD.encode(&jpeg);

    tracing::debug!(
        original_kb = original_size as f64 / 1024.0,
        compressed_kb = compressed_size as f64 / 1024.0,
        width,
        height,
        "画像を最適化"
    );

    Ok(OptimizedImage {
        data_url: to_data_url("image/jpeg", &encoded),
        width,
        height,
        original_size,
        compressed_size,
    })
}

fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY_PERCENT);
    image
        .to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| MatchReviewError::ImageLoad(format!("JPEGエンコード失敗: {}", e)))?;
    Ok(buffer)
}

/// EXIFのOrientation（1-8）を読む
fn read_orientation(path: &Path) -> Option<u32> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;
    let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    field.value.get_uint(0)
}

/// Orientationに従って回転・反転
pub fn apply_orientation(image: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.flipv(),
        5 => image.rotate90().fliph(),
        6 => image.rotate90(),
        7 => image.rotate270().fliph(),
        8 => image.rotate270(),
        _ => image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("a.JPG")));
        assert!(is_supported_image(Path::new("a.webp")));
        assert!(!is_supported_image(Path::new("a.gif")));
        assert!(!is_supported_image(Path::new("noext")));
    }

    #[test]
    fn test_apply_orientation_rotates() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(4, 2));
        let rotated = apply_orientation(image.clone(), 6);
        assert_eq!((rotated.width(), rotated.height()), (2, 4));
        let same = apply_orientation(image, 1);
        assert_eq!((same.width(), same.height()), (4, 2));
    }

    #[test]
    fn test_optimize_png_to_jpeg_data_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.png");
        RgbImage::from_pixel(600, 300, Rgb([40, 160, 90])).save(&path).unwrap();

        let optimized = optimize_image(&path).unwrap();
        assert!(optimized.data_url.starts_with("data:image/jpeg;base64,"));
        assert_eq!((optimized.width, optimized.height), (488, 244));
        assert!(optimized.compressed_size > 0);
        let ratio = optimized.compression_ratio();
        assert!(ratio > 0.0);
        assert_eq!(
            ratio,
            optimized.compressed_size as f64 / optimized.original_size as f64
        );
    }

    #[test]
    fn test_optimize_rejects_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let err = optimize_image(&path).unwrap_err();
        assert!(matches!(err, MatchReviewError::UnsupportedImage(_)));
    }

    #[test]
    fn test_optimize_missing_file() {
        let err = optimize_image(Path::new("/nonexistent/probe.png")).unwrap_err();
        assert!(matches!(err, MatchReviewError::FileNotFound(_)));
    }
}
