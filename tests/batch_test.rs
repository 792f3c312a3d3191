//! 一括修正の統合テスト
//!
//! 対象テキストの検出 → 置換 → 保存 の流れと、保存しないケースを検証

mod support;

use support::{has_glyph_pixels, image_with_glyphs, record, replacer, FailingDetector, FixedDetector};
use text_fix::auto_fix_image;
use text_fix::error::TextFixError;
use text_fix_common::BatchRule;
use tempfile::tempdir;

/// 対象テキストがあれば置換して保存する
#[test]
fn test_fix_matching_region_and_save() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("sample.png");
    let output = dir.path().join("sample_fixed.png");
    image_with_glyphs(200, 120, &[(10, 20, 110, 60), (20, 80, 150, 110)])
        .save(&input)
        .unwrap();

    let detector = FixedDetector(vec![
        record(10.0, 20.0, 110.0, 60.0, "대한안민국"),
        record(20.0, 80.0, 150.0, 110.0, "Hello"),
    ]);
    let report = auto_fix_image(&input, &output, &detector, &replacer(), &BatchRule::default()).unwrap();

    assert_eq!(report.detected, 2);
    assert_eq!(report.matched, 1);
    assert_eq!(report.replaced, 1);
    assert_eq!(report.saved.as_deref(), Some(output.as_path()));
    assert!(output.exists(), "出力ファイルが作成されていない");

    let fixed = image::open(&output).unwrap().to_rgb8();
    assert!(!has_glyph_pixels(&fixed, 10, 20, 110, 60), "元の文字が残っている");
    // 対象外の領域はそのまま
    assert!(has_glyph_pixels(&fixed, 20, 80, 150, 110));
    // 置換後の文字は灰色系（黒文字を明るい背景に合成）
    let drawn = (10..110u32)
        .flat_map(|x| (20..60u32).map(move |y| (x, y)))
        .filter(|&(x, y)| fixed.get_pixel(x, y).0[0] < 200)
        .count();
    assert!(drawn > 0, "置換テキストが描画されていない");
}

/// 空白を挟んだテキストも一致する
#[test]
fn test_fix_matches_text_with_spaces() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");
    image_with_glyphs(100, 60, &[(10, 10, 90, 50)]).save(&input).unwrap();

    let detector = FixedDetector(vec![record(10.0, 10.0, 90.0, 50.0, "대한 안민국")]);
    let report = auto_fix_image(&input, &output, &detector, &replacer(), &BatchRule::default()).unwrap();
    assert_eq!(report.replaced, 1);
    assert!(output.exists());
}

/// 一致がなければ出力しない
#[test]
fn test_no_match_writes_nothing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");
    image_with_glyphs(100, 60, &[(10, 10, 90, 50)]).save(&input).unwrap();

    let detector = FixedDetector(vec![record(10.0, 10.0, 90.0, 50.0, "대한민국")]);
    let report = auto_fix_image(&input, &output, &detector, &replacer(), &BatchRule::default()).unwrap();

    assert_eq!(report.matched, 0);
    assert!(report.saved.is_none());
    assert!(!output.exists(), "一致なしなのに出力された");
}

/// 修正済み画像を再処理しても置換文字列は再一致しない
#[test]
fn test_rerun_on_fixed_image_does_not_rematch() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    let fixed = dir.path().join("fixed.png");
    let again = dir.path().join("again.png");
    image_with_glyphs(100, 60, &[(10, 10, 90, 50)]).save(&input).unwrap();

    let rule = BatchRule::default();
    let first = FixedDetector(vec![record(10.0, 10.0, 90.0, 50.0, "대한안민국")]);
    auto_fix_image(&input, &fixed, &first, &replacer(), &rule).unwrap();
    assert!(fixed.exists());

    // 修正後はOCRが置換文字列を読む
    let second = FixedDetector(vec![record(10.0, 10.0, 90.0, 50.0, &rule.replacement)]);
    let report = auto_fix_image(&fixed, &again, &second, &replacer(), &rule).unwrap();
    assert_eq!(report.matched, 0);
    assert!(!again.exists());
}

/// サイズ不正の領域はスキップし、他の一致は処理する
#[test]
fn test_degenerate_region_is_skipped() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");
    image_with_glyphs(200, 100, &[(10, 10, 90, 50)]).save(&input).unwrap();

    let detector = FixedDetector(vec![
        record(120.0, 30.0, 180.0, 30.0, "안민"),
        record(10.0, 10.0, 90.0, 50.0, "대한안민국"),
    ]);
    let report = auto_fix_image(&input, &output, &detector, &replacer(), &BatchRule::default()).unwrap();

    assert_eq!(report.matched, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.replaced, 1);
    assert!(output.exists());
}

/// 入力画像がなければエラーで、何も書き出さない
#[test]
fn test_missing_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("missing.png");
    let output = dir.path().join("out.png");

    let detector = FixedDetector(vec![]);
    let result = auto_fix_image(&input, &output, &detector, &replacer(), &BatchRule::default());
    assert!(matches!(result, Err(TextFixError::FileNotFound(_))));
    assert!(!output.exists());
}

/// 画像として読めないファイル
#[test]
fn test_unreadable_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.png");
    let output = dir.path().join("out.png");
    std::fs::write(&input, b"not an image").unwrap();

    let result = auto_fix_image(&input, &output, &FixedDetector(vec![]), &replacer(), &BatchRule::default());
    assert!(matches!(result, Err(TextFixError::ImageLoad(_))));
    assert!(!output.exists());
}

/// OCRエンジンの失敗はそのまま返す
#[test]
fn test_engine_failure() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");
    image_with_glyphs(50, 50, &[]).save(&input).unwrap();

    let result = auto_fix_image(&input, &output, &FailingDetector, &replacer(), &BatchRule::default());
    assert!(matches!(result, Err(TextFixError::Engine(_))));
    assert!(!output.exists());
}

/// カスタムルール
#[test]
fn test_custom_rule() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");
    image_with_glyphs(100, 60, &[(10, 10, 90, 50)]).save(&input).unwrap();

    let rule = BatchRule::new(vec!["Seoul".to_string()], "서울").unwrap();
    let detector = FixedDetector(vec![record(10.0, 10.0, 90.0, 50.0, "Seoul City")]);
    let report = auto_fix_image(&input, &output, &detector, &replacer(), &rule).unwrap();
    assert_eq!(report.replaced, 1);
}
