//! 背景色から文字色を決める

/// この値を超える輝度の背景には黒文字を使う（128ちょうどは白）
pub const LUMINANCE_THRESHOLD: f64 = 128.0;

/// 置換テキストの描画色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    Black,
    White,
}

impl TextColor {
    pub fn rgb(self) -> [u8; 3] {
        match self {
            TextColor::Black => [0, 0, 0],
            TextColor::White => [255, 255, 255],
        }
    }
}

/// 知覚輝度 `Y = 0.299R + 0.587G + 0.114B`
pub fn luminance(rgb: [u8; 3]) -> f64 {
    let [r, g, b] = rgb.map(u32::from);
    f64::from(r * 299 + g * 587 + b * 114) / 1000.0
}

/// 背景輝度が閾値を超えれば黒、それ以外は白
pub fn text_color_for(background: [u8; 3]) -> TextColor {
    if luminance(background) > LUMINANCE_THRESHOLD {
        TextColor::Black
    } else {
        TextColor::White
    }
}
