//! 置換テキストを透明背景のRGBA画像に描画する

use image::{Rgba, RgbaImage};
use text_fix_common::TextColor;

use crate::font::TextFont;

/// `text` を `size` px で描画する
///
/// 画像の大きさは実測した文字列の幅 × (高さ + `padding`)。
/// 色は単色で、アルファだけがグリフの被覆率を表す。
pub fn render_text(
    font: &TextFont,
    text: &str,
    size: f32,
    padding: u32,
    color: TextColor,
) -> RgbaImage {
    let (text_w, text_h) = font.measure(text, size);
    let width = text_w.max(1);
    let height = text_h.saturating_add(padding).max(1);

    let mut canvas = RgbaImage::new(width, height);
    let [r, g, b] = color.rgb();
    font.draw(&mut canvas, Rgba([r, g, b, 255]), text, size);

    // 透明画素との加重平均で縁の色が暗くなるので、色成分を揃え直す
    for pixel in canvas.pixels_mut() {
        pixel.0[..3].copy_from_slice(&[r, g, b]);
    }
    canvas
}
