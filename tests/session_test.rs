//! 対話編集セッションの統合テスト
//!
//! 画像読み込み → 検出 → クリック選択 → 置換 → 保存 の流れを検証

mod support;

use support::{has_glyph_pixels, image_with_glyphs, record, replacer, FailingDetector, FixedDetector};
use text_fix::error::TextFixError;
use text_fix::{EditSession, SessionState};
use text_fix_common::SelectionPolicy;
use tempfile::tempdir;

const REGIONS: [(u32, u32, u32, u32); 3] = [(10, 10, 90, 40), (10, 60, 150, 100), (110, 10, 190, 40)];

fn analyzed_session(dir: &std::path::Path) -> EditSession {
    let path = dir.join("photo.png");
    image_with_glyphs(200, 120, &REGIONS).save(&path).unwrap();

    let detector = FixedDetector(
        REGIONS
            .iter()
            .enumerate()
            .map(|(i, &(x0, y0, x1, y1))| {
                record(x0 as f64, y0 as f64, x1 as f64, y1 as f64, &format!("text {}", i + 1))
            })
            .collect(),
    );

    let mut session = EditSession::new();
    session.open_image(&path).unwrap();
    assert_eq!(session.state(), SessionState::ImageLoaded);
    assert_eq!(session.analyze(&detector).unwrap(), 3);
    assert_eq!(session.state(), SessionState::Analyzed);
    session
}

/// 領域2を選んで置換すると、領域2だけが書き換わる
#[test]
fn test_edit_second_region_only() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = analyzed_session(dir.path());
    let before = session.canvas().unwrap().clone();

    assert_eq!(session.select_at(80.0, 80.0, SelectionPolicy::FirstMatch), Some(1));
    assert_eq!(session.state(), SessionState::RegionSelected);
    assert_eq!(session.selected_record().unwrap().text, "text 2");

    session.apply_edit("새 텍스트", &replacer()).unwrap();
    let after = session.canvas().unwrap();

    let (x0, y0, x1, y1) = REGIONS[1];
    assert!(!has_glyph_pixels(after, x0, y0, x1, y1), "領域2に元の文字が残っている");

    // 領域2の外側は1画素も変わらない
    for (x, y, pixel) in before.enumerate_pixels() {
        let inside = (x0..=x1).contains(&x) && (y0..=y1).contains(&y);
        if !inside {
            assert_eq!(after.get_pixel(x, y), pixel, "({}, {}) が変化した", x, y);
        }
    }
    assert!(has_glyph_pixels(after, 10, 10, 90, 40));
    assert!(has_glyph_pixels(after, 110, 10, 190, 40));

    assert_eq!(session.detections()[1].text, "새 텍스트");
    assert_eq!(session.selected(), Some(1));
}

/// 編集結果を保存して読み戻せる
#[test]
fn test_save_edited_image() {
    let dir = tempdir().unwrap();
    let mut session = analyzed_session(dir.path());
    session.select_at(50.0, 20.0, SelectionPolicy::FirstMatch);
    session.apply_edit("OK", &replacer()).unwrap();

    let out = dir.path().join("edited.png");
    session.save(&out).unwrap();
    let saved = image::open(&out).unwrap().to_rgb8();
    assert_eq!(&saved, session.canvas().unwrap());
}

/// 検出失敗時は ImageLoaded のまま
#[test]
fn test_analyze_failure_keeps_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("photo.png");
    image_with_glyphs(50, 50, &[]).save(&path).unwrap();

    let mut session = EditSession::new();
    session.open_image(&path).unwrap();
    let result = session.analyze(&FailingDetector);
    assert!(matches!(result, Err(TextFixError::Engine(_))));
    assert_eq!(session.state(), SessionState::ImageLoaded);
}

/// 読み込めないファイルを開いても直前の状態を保つ
#[test]
fn test_open_invalid_image_keeps_previous() {
    let dir = tempdir().unwrap();
    let mut session = analyzed_session(dir.path());

    let broken = dir.path().join("broken.png");
    std::fs::write(&broken, b"xx").unwrap();
    assert!(matches!(session.open_image(&broken), Err(TextFixError::ImageLoad(_))));
    assert!(matches!(
        session.open_image(&dir.path().join("none.png")),
        Err(TextFixError::FileNotFound(_))
    ));
    assert_eq!(session.state(), SessionState::Analyzed);
    assert_eq!(session.detections().len(), 3);
}

/// 画像を開き直すと検出結果と選択が消える
#[test]
fn test_reopen_clears_detections() {
    let dir = tempdir().unwrap();
    let mut session = analyzed_session(dir.path());
    session.select_at(50.0, 20.0, SelectionPolicy::FirstMatch);

    let path = session.source_path().unwrap().to_path_buf();
    session.open_image(&path).unwrap();
    assert_eq!(session.state(), SessionState::ImageLoaded);
    assert!(session.detections().is_empty());
    assert!(session.selected_record().is_none());
}
