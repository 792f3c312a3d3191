//! 元テキストの塗りつぶし（単色。内容を考慮した補完は行わない）

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;
use text_fix_common::Quad;

/// 四角形の内部を `color` で塗りつぶす。元の画素は復元できない
///
/// 丸めた頂点が3点未満に潰れる場合は何もせず `false` を返す。
pub fn fill_quad(canvas: &mut RgbImage, quad: &Quad, color: Rgb<u8>) -> bool {
    let mut poly: Vec<Point<i32>> = Vec::with_capacity(4);
    for p in quad.points() {
        let point = Point::new(p.x.round() as i32, p.y.round() as i32);
        if poly.last() != Some(&point) {
            poly.push(point);
        }
    }
    // draw_polygon_mut は始点と終点が同じ多角形を受け付けない
    while poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }
    if poly.len() < 3 {
        return false;
    }
    draw_polygon_mut(canvas, &poly, color);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use text_fix_common::Point as QuadPoint;

    #[test]
    fn test_fill_rect_quad() {
        let mut img = RgbImage::from_pixel(30, 30, Rgb([255, 255, 255]));
        let filled = fill_quad(&mut img, &Quad::from_rect(5.0, 5.0, 20.0, 15.0), Rgb([1, 2, 3]));
        assert!(filled);
        assert_eq!(*img.get_pixel(10, 10), Rgb([1, 2, 3]));
        assert_eq!(*img.get_pixel(5, 5), Rgb([1, 2, 3]));
        assert_eq!(*img.get_pixel(25, 25), Rgb([255, 255, 255]));
        assert_eq!(*img.get_pixel(10, 18), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_collapsed_quad_is_skipped() {
        let mut img = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
        let quad = Quad::new([QuadPoint::new(3.0, 3.0); 4]);
        assert!(!fill_quad(&mut img, &quad, Rgb([0, 0, 0])));
        assert!(img.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn test_quad_partially_outside_canvas() {
        let mut img = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
        assert!(fill_quad(&mut img, &Quad::from_rect(-5.0, -5.0, 4.0, 4.0), Rgb([0, 0, 0])));
        assert_eq!(*img.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(8, 8), Rgb([255, 255, 255]));
    }
}
