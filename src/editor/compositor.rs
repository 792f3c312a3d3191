//! 描画したテキストを外接矩形いっぱいに引き伸ばして貼り付ける

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage, RgbaImage};
use text_fix_common::BoundingBox;

use crate::error::{Result, TextFixError};

/// 縦横比を無視して `bbox` の大きさ (W, H) ちょうどに拡縮する
///
/// 幅か高さが0以下の矩形はエラー（呼び出し側でスキップする）。
pub fn stretch_to_box(text: &RgbaImage, bbox: &BoundingBox) -> Result<RgbaImage> {
    let (width, height) = (bbox.width(), bbox.height());
    let degenerate = || TextFixError::DegenerateRegion { width, height };

    let w = u32::try_from(width).ok().filter(|w| *w > 0).ok_or_else(degenerate)?;
    let h = u32::try_from(height).ok().filter(|h| *h > 0).ok_or_else(degenerate)?;
    if text.width() == 0 || text.height() == 0 {
        return Err(degenerate());
    }
    Ok(imageops::resize(text, w, h, FilterType::Lanczos3))
}

/// `overlay` のアルファで `canvas` の `(x, y)` に合成する（はみ出しは切り捨て）
pub fn paste_alpha(canvas: &mut RgbImage, overlay: &RgbaImage, x: i64, y: i64) {
    let (cw, ch) = (i64::from(canvas.width()), i64::from(canvas.height()));
    for (ox, oy, src) in overlay.enumerate_pixels() {
        let (tx, ty) = (x + i64::from(ox), y + i64::from(oy));
        if tx < 0 || ty < 0 || tx >= cw || ty >= ch {
            continue;
        }
        let alpha = src.0[3];
        if alpha == 0 {
            continue;
        }
        let dst = canvas.get_pixel_mut(tx as u32, ty as u32);
        *dst = blend(*dst, [src.0[0], src.0[1], src.0[2]], alpha);
    }
}

fn blend(dst: Rgb<u8>, src: [u8; 3], alpha: u8) -> Rgb<u8> {
    let a = f32::from(alpha) / 255.0;
    let mut out = [0u8; 3];
    for i in 0..3 {
        let v = f32::from(src[i]) * a + f32::from(dst.0[i]) * (1.0 - a);
        out[i] = v.round().clamp(0.0, 255.0) as u8;
    }
    Rgb(out)
}
