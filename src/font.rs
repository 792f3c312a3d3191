//! フォント読み込み
//!
//! 指定フォント → OS標準の韓国語フォント → OS標準の欧文フォント → 豆腐（四角）描画
//! の順にフォールバックする。
//! どの段階で失敗しても処理は止めない。

use ab_glyph::{Font, FontVec, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// ハングルを含むフォント
pub const KOREAN_FONT_CANDIDATES: &[&str] = &[
    "malgun.ttf",
    r"C:\Windows\Fonts\malgun.ttf",
    "/System/Library/Fonts/AppleSDGothicNeo.ttc",
    "/System/Library/Fonts/Supplemental/AppleGothic.ttf",
    "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
];

/// OS標準の欧文フォント。ハングルは描けないが英数字は読める形で残る
pub const LATIN_FONT_CANDIDATES: &[&str] = &[
    r"C:\Windows\Fonts\arial.ttf",
    r"C:\Windows\Fonts\segoeui.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
];

/// 豆腐の1文字あたりの送り幅（フォントサイズ比）
const BLOCK_ADVANCE: f32 = 0.6;

pub enum TextFont {
    Glyphs { font: FontVec, source: PathBuf },
    /// フォントが1つも読めなかったときの代替。各文字を枠だけの四角で描く
    Blocks,
}

impl std::fmt::Debug for TextFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextFont::Glyphs { source, .. } => f.debug_tuple("Glyphs").field(source).finish(),
            TextFont::Blocks => f.write_str("Blocks"),
        }
    }
}

impl TextFont {
    pub fn is_fallback(&self) -> bool {
        matches!(self, TextFont::Blocks)
    }

    pub fn source(&self) -> Option<&Path> {
        match self {
            TextFont::Glyphs { source, .. } => Some(source),
            TextFont::Blocks => None,
        }
    }

    /// `text` の空白以外の文字がすべてグリフを持つか
    pub fn supports(&self, text: &str) -> bool {
        match self {
            TextFont::Glyphs { font, .. } => text
                .chars()
                .filter(|ch| !ch.is_whitespace())
                .all(|ch| font.glyph_id(ch).0 != 0),
            TextFont::Blocks => false,
        }
    }

    /// 描画時の文字列の大きさ (幅, 高さ)
    pub fn measure(&self, text: &str, size: f32) -> (u32, u32) {
        match self {
            TextFont::Glyphs { font, .. } => text_size(PxScale::from(size), font, text),
            TextFont::Blocks => {
                let count = text.chars().count() as f32;
                ((count * size * BLOCK_ADVANCE).round() as u32, size.round() as u32)
            }
        }
    }

    /// `canvas` の左上から描画する
    pub fn draw(&self, canvas: &mut RgbaImage, color: Rgba<u8>, text: &str, size: f32) {
        match self {
            TextFont::Glyphs { font, .. } => {
                draw_text_mut(canvas, color, 0, 0, PxScale::from(size), font, text);
            }
            TextFont::Blocks => draw_blocks(canvas, color, text, size),
        }
    }
}

pub fn load_font(preferred: Option<&Path>) -> TextFont {
    if let Some(path) = preferred {
        if let Some(font) = try_load(path) {
            return font;
        }
        warn!(path = %path.display(), "指定フォントを読み込めません。システムフォントを探します");
    }

    if let Some(font) = first_loadable(KOREAN_FONT_CANDIDATES.iter().map(Path::new)) {
        return font;
    }

    if let Some(font) = first_loadable(LATIN_FONT_CANDIDATES.iter().map(Path::new)) {
        if let Some(source) = font.source() {
            warn!(path = %source.display(), "韓国語フォントが見つかりません。欧文フォントで代用します");
        }
        return font;
    }

    warn!("使えるフォントが見つかりません。文字は四角で描画されます");
    TextFont::Blocks
}

/// 候補を順に試し、最初に読めたフォントを返す
pub fn first_loadable<'a>(candidates: impl IntoIterator<Item = &'a Path>) -> Option<TextFont> {
    candidates.into_iter().find_map(try_load)
}

fn try_load(path: &Path) -> Option<TextFont> {
    let data = std::fs::read(path).ok()?;
    match FontVec::try_from_vec(data) {
        Ok(font) => {
            debug!(path = %path.display(), "フォント読み込み");
            Some(TextFont::Glyphs {
                font,
                source: path.to_path_buf(),
            })
        }
        Err(err) => {
            debug!(path = %path.display(), %err, "フォント形式が不正");
            None
        }
    }
}

fn draw_blocks(canvas: &mut RgbaImage, color: Rgba<u8>, text: &str, size: f32) {
    let advance = size * BLOCK_ADVANCE;
    let inset = (size * 0.08).round() as i32;
    let stroke = ((size / 12.0).round() as u32).max(1);
    let box_w = (advance.round() as i32 - inset * 2).max(1) as u32;
    let box_h = (size.round() as i32 - inset * 2).max(1) as u32;

    for (i, ch) in text.chars().enumerate() {
        if ch.is_whitespace() {
            continue;
        }
        let x = (i as f32 * advance).round() as i32 + inset;
        let y = inset;
        let edges = [
            Rect::at(x, y).of_size(box_w, stroke.min(box_h)),
            Rect::at(x, y + box_h as i32 - stroke.min(box_h) as i32).of_size(box_w, stroke.min(box_h)),
            Rect::at(x, y).of_size(stroke.min(box_w), box_h),
            Rect::at(x + box_w as i32 - stroke.min(box_w) as i32, y).of_size(stroke.min(box_w), box_h),
        ];
        for edge in edges {
            draw_filled_rect_mut(canvas, edge, color);
        }
    }
}
