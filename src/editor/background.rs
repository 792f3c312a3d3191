//! 背景色の推定
//!
//! 既定は外接矩形左上の1画素。枠の外周をリング状に取って中央値を使う方式も選べる。

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use text_fix_common::BoundingBox;

/// 設定ファイルで選ぶ推定方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BackgroundStrategy {
    #[default]
    CornerPixel,
    /// 外接矩形から `margin` 画素外側の枠線上の画素の、チャンネルごとの中央値
    BorderRing { margin: u32 },
}

impl BackgroundStrategy {
    pub fn sampler(&self) -> Box<dyn BackgroundSampler> {
        match *self {
            BackgroundStrategy::CornerPixel => Box::new(CornerPixel),
            BackgroundStrategy::BorderRing { margin } => Box::new(BorderRing { margin }),
        }
    }
}

pub trait BackgroundSampler: Send + Sync {
    /// 同じ画像と矩形に対して常に同じ色を返すこと
    fn sample(&self, image: &RgbImage, bbox: &BoundingBox) -> Rgb<u8>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CornerPixel;

impl BackgroundSampler for CornerPixel {
    fn sample(&self, image: &RgbImage, bbox: &BoundingBox) -> Rgb<u8> {
        if image.width() == 0 || image.height() == 0 {
            return Rgb([0, 0, 0]);
        }
        let x = clamp_coord(i64::from(bbox.x_min), image.width());
        let y = clamp_coord(i64::from(bbox.y_min), image.height());
        *image.get_pixel(x, y)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BorderRing {
    pub margin: u32,
}

impl BackgroundSampler for BorderRing {
    fn sample(&self, image: &RgbImage, bbox: &BoundingBox) -> Rgb<u8> {
        let m = i64::from(self.margin);
        let (x0, y0) = (i64::from(bbox.x_min) - m, i64::from(bbox.y_min) - m);
        let (x1, y1) = (i64::from(bbox.x_max) + m, i64::from(bbox.y_max) + m);

        let (w, h) = (i64::from(image.width()), i64::from(image.height()));
        let inside = |x: i64, y: i64| x >= 0 && y >= 0 && x < w && y < h;

        let mut samples: [Vec<u8>; 3] = Default::default();
        let mut push = |x: i64, y: i64| {
            if inside(x, y) {
                let p = image.get_pixel(x as u32, y as u32);
                for (channel, value) in samples.iter_mut().zip(p.0) {
                    channel.push(value);
                }
            }
        };

        for x in x0..=x1 {
            push(x, y0);
            if y1 != y0 {
                push(x, y1);
            }
        }
        for y in (y0 + 1)..y1 {
            push(x0, y);
            if x1 != x0 {
                push(x1, y);
            }
        }

        if samples[0].is_empty() {
            return CornerPixel.sample(image, bbox);
        }
        Rgb(samples.map(|mut channel| {
            channel.sort_unstable();
            channel[channel.len() / 2]
        }))
    }
}

fn clamp_coord(value: i64, size: u32) -> u32 {
    value.clamp(0, i64::from(size) - 1) as u32
}
