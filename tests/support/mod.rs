//! テスト用の検出器と画像

#![allow(dead_code)]

use image::{Rgb, RgbImage};
use std::path::Path;
use text_fix::editor::{CornerPixel, Replacer};
use text_fix::error::{Result, TextFixError};
use text_fix::font::TextFont;
use text_fix::TextDetector;
use text_fix_common::{DetectionRecord, Quad};

pub const BACKGROUND: Rgb<u8> = Rgb([230, 230, 230]);
pub const GLYPH: Rgb<u8> = Rgb([200, 0, 0]);

/// 固定の検出結果を返す検出器
pub struct FixedDetector(pub Vec<DetectionRecord>);

impl TextDetector for FixedDetector {
    fn detect(&self, image: &Path) -> Result<Vec<DetectionRecord>> {
        if !image.exists() {
            return Err(TextFixError::FileNotFound(image.display().to_string()));
        }
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// 常に失敗する検出器
pub struct FailingDetector;

impl TextDetector for FailingDetector {
    fn detect(&self, _image: &Path) -> Result<Vec<DetectionRecord>> {
        Err(TextFixError::Engine("model not loaded".into()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

pub fn record(x0: f64, y0: f64, x1: f64, y1: f64, text: &str) -> DetectionRecord {
    DetectionRecord::new(Quad::from_rect(x0, y0, x1, y1), text, 0.8)
}

/// 明るい背景に、各矩形の内側へ赤い横線（元の文字の代わり）を描いた画像
pub fn image_with_glyphs(width: u32, height: u32, regions: &[(u32, u32, u32, u32)]) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    for &(x0, y0, x1, y1) in regions {
        let mid = (y0 + y1) / 2;
        for y in mid.saturating_sub(2)..=mid + 2 {
            for x in (x0 + 5)..(x1 - 5) {
                img.put_pixel(x, y, GLYPH);
            }
        }
    }
    img
}

pub fn replacer() -> Replacer {
    Replacer::new(TextFont::Blocks, 100.0, 20, Box::new(CornerPixel))
}

/// 矩形内（境界含む）に赤い画素が残っているか
pub fn has_glyph_pixels(img: &RgbImage, x0: u32, y0: u32, x1: u32, y1: u32) -> bool {
    (x0..=x1).any(|x| (y0..=y1).any(|y| *img.get_pixel(x, y) == GLYPH))
}
