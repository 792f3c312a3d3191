//! 一括修正
//!
//! 検出テキストが対象に一致した領域をすべて置換し、1件でも一致があれば保存する。

use std::path::{Path, PathBuf};
use text_fix_common::BatchRule;
use tracing::{debug, warn};

use crate::detector::TextDetector;
use crate::editor::Replacer;
use crate::error::{Result, TextFixError};

/// 一括修正の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// 検出された領域数
    pub detected: usize,
    /// 対象に一致した領域数
    pub matched: usize,
    /// 実際に置換した領域数
    pub replaced: usize,
    /// サイズ不正でスキップした領域数
    pub skipped: usize,
    /// 保存先（一致がなければ None）
    pub saved: Option<PathBuf>,
}

pub fn auto_fix_image(
    input: &Path,
    output: &Path,
    detector: &dyn TextDetector,
    replacer: &Replacer,
    rule: &BatchRule,
) -> Result<BatchReport> {
    println!("[1/3] 画像を読み込み中: {}", input.display());
    if !input.exists() {
        return Err(TextFixError::FileNotFound(input.display().to_string()));
    }
    let mut canvas = image::open(input)
        .map_err(|e| TextFixError::ImageLoad(format!("{}: {}", input.display(), e)))?
        .to_rgb8();
    println!("✔ {}x{}\n", canvas.width(), canvas.height());

    println!("[2/3] テキスト検出中... ({})", detector.name());
    let records = detector.detect(input)?;
    println!("✔ {}件のテキスト領域を検出\n", records.len());

    let mut report = BatchReport {
        detected: records.len(),
        ..Default::default()
    };

    println!("[3/3] 置換中...");
    for record in &records {
        println!("  - '{}' {:?}", record.text, record.quad.0.map(|p| [p.x, p.y]));
        if !rule.matches(&record.text) {
            continue;
        }
        report.matched += 1;
        println!("    ✔ '{}' → '{}'", record.text, rule.replacement);

        match replacer.replace(&mut canvas, &record.quad, &rule.replacement) {
            Ok(outcome) => {
                debug!(?outcome, "置換完了");
                report.replaced += 1;
            }
            Err(err) if err.is_recoverable() => {
                warn!(text = %record.text, %err, "領域をスキップ");
                report.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    if report.matched > 0 {
        canvas
            .save(output)
            .map_err(|e| TextFixError::ImageSave(format!("{}: {}", output.display(), e)))?;
        println!("\n✅ 保存しました: {}", output.display());
        report.saved = Some(output.to_path_buf());
    } else {
        let targets = rule.targets.first().map(String::as_str).unwrap_or_default();
        println!("\n対象テキスト '{}' は見つかりませんでした", targets);
    }

    Ok(report)
}
