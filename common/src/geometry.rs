//! 外接矩形の計算とクリック判定

use serde::{Deserialize, Serialize};

use crate::types::{DetectionRecord, Quad};

/// 軸平行な外接矩形（整数座標）
///
/// 正しい順序の四角形なら `x_min <= x_max` かつ `y_min <= y_max` となる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl BoundingBox {
    /// 四角形から外接矩形を求める
    ///
    /// `x_min = min(p0.x, p3.x)`, `x_max = max(p1.x, p2.x)`,
    /// `y_min = min(p0.y, p1.y)`, `y_max = max(p2.y, p3.y)`。
    /// 小数部は切り捨てる（0方向）。
    pub fn from_quad(quad: &Quad) -> Self {
        let [p0, p1, p2, p3] = quad.0;
        Self {
            x_min: p0.x.min(p3.x) as i32,
            y_min: p0.y.min(p1.y) as i32,
            x_max: p1.x.max(p2.x) as i32,
            y_max: p2.y.max(p3.y) as i32,
        }
    }

    pub fn width(&self) -> i64 {
        i64::from(self.x_max) - i64::from(self.x_min)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.y_max) - i64::from(self.y_min)
    }

    /// 幅または高さが0以下
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// 面積（退化した矩形は0）
    pub fn area(&self) -> i64 {
        if self.is_degenerate() {
            0
        } else {
            self.width() * self.height()
        }
    }

    /// 境界を含む包含判定
    pub fn contains(&self, x: f64, y: f64) -> bool {
        f64::from(self.x_min) <= x
            && x <= f64::from(self.x_max)
            && f64::from(self.y_min) <= y
            && y <= f64::from(self.y_max)
    }
}

/// 重なった領域をクリックしたときの選択方針
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionPolicy {
    /// 検出順で最初に当たった領域
    #[default]
    FirstMatch,
    /// 当たった領域のうち面積最小のもの（同面積なら検出順）
    SmallestArea,
}

/// クリック座標を含む検出結果のインデックスを返す
pub fn find_region_at(
    records: &[DetectionRecord],
    x: f64,
    y: f64,
    policy: SelectionPolicy,
) -> Option<usize> {
    let mut hits = records
        .iter()
        .enumerate()
        .map(|(i, r)| (i, BoundingBox::from_quad(&r.quad)))
        .filter(|(_, b)| b.contains(x, y));

    match policy {
        SelectionPolicy::FirstMatch => hits.next().map(|(i, _)| i),
        SelectionPolicy::SmallestArea => hits.min_by_key(|(i, b)| (b.area(), *i)).map(|(i, _)| i),
    }
}
