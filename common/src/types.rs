//! 検出結果の型定義
//!
//! - Point: 画像座標（OCRエンジンは小数を返すことがある）
//! - Quad: 左上・右上・右下・左下の順に並んだ4点
//! - DetectionRecord: OCRエンジンの1検出（四角形・テキスト・信頼度）

use serde::{Deserialize, Serialize};

/// 画像上の1点。JSONでは `[x, y]` 配列として表現する
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// テキスト領域を囲む四角形
///
/// 点の順序（左上→右上→右下→左下）は検証しない。
/// 順序が異なる場合、外接矩形は正しく計算されない。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quad(pub [Point; 4]);

impl Quad {
    pub fn new(points: [Point; 4]) -> Self {
        Self(points)
    }

    /// 軸平行な矩形 `(x0, y0)-(x1, y1)` から四角形を作る
    pub fn from_rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self([
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ])
    }

    pub fn points(&self) -> &[Point; 4] {
        &self.0
    }
}

/// OCRエンジンの1検出結果
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectionRecord {
    #[serde(rename = "box", alias = "bbox", alias = "points")]
    pub quad: Quad,

    pub text: String,

    /// 0.0〜1.0。本ツールでは閾値処理しない
    #[serde(default, alias = "prob", alias = "score")]
    pub confidence: f32,
}

impl DetectionRecord {
    pub fn new(quad: Quad, text: impl Into<String>, confidence: f32) -> Self {
        Self {
            quad,
            text: text.into(),
            confidence,
        }
    }
}
