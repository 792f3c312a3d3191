//! 検出領域のテキスト置換
//!
//! 外接矩形 → 背景色推定 → 塗りつぶし → テキスト描画 → 引き伸ばし合成 の順に処理する。
//! 失敗する処理（サイズ判定・描画・拡縮）はすべて塗りつぶしの前に済ませるので、
//! エラー時のキャンバスは変更されない。

mod background;
mod compositor;
mod eraser;
mod render;

pub use background::{BackgroundSampler, BackgroundStrategy, BorderRing, CornerPixel};
pub use compositor::{paste_alpha, stretch_to_box};
pub use eraser::fill_quad;
pub use render::render_text;

use image::{Rgb, RgbImage};
use text_fix_common::{text_color_for, BoundingBox, Quad, TextColor};
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, TextFixError};
use crate::font::{load_font, TextFont};

/// 1領域の置換結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplaceOutcome {
    pub bbox: BoundingBox,
    pub background: Rgb<u8>,
    pub text_color: TextColor,
}

pub struct Replacer {
    font: TextFont,
    font_size: f32,
    padding: u32,
    sampler: Box<dyn BackgroundSampler>,
}

impl Replacer {
    pub fn new(font: TextFont, font_size: f32, padding: u32, sampler: Box<dyn BackgroundSampler>) -> Self {
        Self {
            font,
            font_size,
            padding,
            sampler,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            load_font(config.font_path.as_deref()),
            config.font_size,
            config.padding,
            config.background.sampler(),
        )
    }

    pub fn font(&self) -> &TextFont {
        &self.font
    }

    /// `quad` の領域を背景色で塗りつぶし、`text` を描画して貼り付ける
    pub fn replace(&self, canvas: &mut RgbImage, quad: &Quad, text: &str) -> Result<ReplaceOutcome> {
        let bbox = BoundingBox::from_quad(quad);
        if bbox.is_degenerate() {
            return Err(TextFixError::DegenerateRegion {
                width: bbox.width(),
                height: bbox.height(),
            });
        }

        let background = self.sampler.sample(canvas, &bbox);
        let text_color = text_color_for(background.0);
        let rendered = render_text(&self.font, text, self.font_size, self.padding, text_color);
        let stretched = stretch_to_box(&rendered, &bbox)?;

        debug!(
            ?bbox,
            background = ?background.0,
            ?text_color,
            rendered = ?rendered.dimensions(),
            "領域を置換"
        );

        fill_quad(canvas, quad, background);
        paste_alpha(canvas, &stretched, i64::from(bbox.x_min), i64::from(bbox.y_min));

        Ok(ReplaceOutcome {
            bbox,
            background,
            text_color,
        })
    }
}

impl std::fmt::Debug for Replacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Replacer")
            .field("font", &self.font)
            .field("font_size", &self.font_size)
            .field("padding", &self.padding)
            .finish_non_exhaustive()
    }
}
