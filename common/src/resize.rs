//! アップロード画像の縮小サイズ計算（CLI・Web共通）

/// 短辺の目標サイズ
pub const TARGET_SHORT_SIDE: u32 = 244;
/// 再エンコード時のJPEG品質（%）
pub const JPEG_QUALITY_PERCENT: u8 = 80;

/// 短辺を TARGET_SHORT_SIDE に合わせた出力サイズ（拡大しない）
///
/// ```
/// use match_review_common::target_size;
/// assert_eq!(target_size(1000, 500), (488, 244));
/// ```
pub fn target_size(width: u32, height: u32) -> (u32, u32) {
    let short = width.min(height);
    if short <= TARGET_SHORT_SIDE || short == 0 {
        return (width, height);
    }

    let scale = TARGET_SHORT_SIDE as f64 / short as f64;
    if width < height {
        let h = (height as f64 * scale).round().max(1.0) as u32;
        (TARGET_SHORT_SIDE, h)
    } else {
        let w = (width as f64 * scale).round().max(1.0) as u32;
        (w, TARGET_SHORT_SIDE)
    }
}
