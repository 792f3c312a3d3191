//! 対話編集のセッション状態
//!
//! 作業中の画像・検出結果・選択中の領域をまとめて保持する。
//! 状態遷移: NoImage → ImageLoaded → Analyzed ⇄ RegionSelected

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use std::path::{Path, PathBuf};
use text_fix_common::{find_region_at, DetectionRecord, SelectionPolicy};
use tracing::{info, warn};

use crate::detector::TextDetector;
use crate::editor::{ReplaceOutcome, Replacer};
use crate::error::{Result, TextFixError};

const OUTLINE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const SELECTED_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoImage,
    ImageLoaded,
    Analyzed,
    RegionSelected,
}

#[derive(Debug, Default)]
pub struct EditSession {
    canvas: Option<RgbImage>,
    source_path: Option<PathBuf>,
    detections: Vec<DetectionRecord>,
    analyzed: bool,
    selected: Option<usize>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        match (&self.canvas, self.analyzed, self.selected) {
            (None, _, _) => SessionState::NoImage,
            (Some(_), false, _) => SessionState::ImageLoaded,
            (Some(_), true, None) => SessionState::Analyzed,
            (Some(_), true, Some(_)) => SessionState::RegionSelected,
        }
    }

    /// 画像ファイルを開く。失敗時は現在の状態を保つ
    pub fn open_image(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(TextFixError::FileNotFound(path.display().to_string()));
        }
        let image = image::open(path)
            .map_err(|e| TextFixError::ImageLoad(format!("{}: {}", path.display(), e)))?
            .to_rgb8();
        info!(path = %path.display(), width = image.width(), height = image.height(), "画像読み込み");
        self.load_image(image, Some(path.to_path_buf()));
        Ok(())
    }

    /// メモリ上の画像を作業画像にする。検出結果と選択は破棄される
    pub fn load_image(&mut self, image: RgbImage, source: Option<PathBuf>) {
        self.canvas = Some(image);
        self.source_path = source;
        self.detections.clear();
        self.analyzed = false;
        self.selected = None;
    }

    pub fn canvas(&self) -> Option<&RgbImage> {
        self.canvas.as_ref()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn detections(&self) -> &[DetectionRecord] {
        &self.detections
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&DetectionRecord> {
        self.selected.and_then(|i| self.detections.get(i))
    }

    /// 検出結果を設定する（解析完了）。選択は解除される
    pub fn set_detections(&mut self, records: Vec<DetectionRecord>) -> Result<()> {
        if self.canvas.is_none() {
            return Err(TextFixError::NoImage);
        }
        self.detections = records;
        self.analyzed = true;
        self.selected = None;
        Ok(())
    }

    /// 元画像ファイルに対して同期的に検出を実行する
    ///
    /// 失敗時は検出前の状態のまま。
    pub fn analyze(&mut self, detector: &dyn TextDetector) -> Result<usize> {
        if self.canvas.is_none() {
            return Err(TextFixError::NoImage);
        }
        let path = self.source_path.clone().ok_or(TextFixError::NoImage)?;
        let records = detector.detect(&path)?;
        let count = records.len();
        self.set_detections(records)?;
        Ok(count)
    }

    /// クリック位置の領域を選択する。どの領域にも当たらなければ選択は変えない
    pub fn select_at(&mut self, x: f64, y: f64, policy: SelectionPolicy) -> Option<usize> {
        let hit = find_region_at(&self.detections, x, y, policy)?;
        self.selected = Some(hit);
        Some(hit)
    }

    /// 選択中の領域を `text` に置き換える。成功後も選択は保持する
    pub fn apply_edit(&mut self, text: &str, replacer: &Replacer) -> Result<ReplaceOutcome> {
        let index = self.selected.ok_or(TextFixError::NoSelection)?;
        if text.is_empty() {
            return Err(TextFixError::EmptyReplacement);
        }
        let canvas = self.canvas.as_mut().ok_or(TextFixError::NoImage)?;
        let record = self
            .detections
            .get_mut(index)
            .ok_or(TextFixError::NoSelection)?;

        let outcome = match replacer.replace(canvas, &record.quad, text) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(index, %err, "置換できません");
                return Err(err);
            }
        };
        info!(index, from = %record.text, to = %text, "テキスト置換");
        record.text = text.to_string();
        record.confidence = 1.0;
        Ok(outcome)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let canvas = self.canvas.as_ref().ok_or(TextFixError::NoImage)?;
        canvas
            .save(path)
            .map_err(|e| TextFixError::ImageSave(format!("{}: {}", path.display(), e)))?;
        info!(path = %path.display(), "画像保存");
        Ok(())
    }

    /// 表示用に、検出領域の枠線を描いた作業画像のコピーを返す
    pub fn overlay(&self) -> Option<RgbImage> {
        let mut image = self.canvas.clone()?;
        for (i, record) in self.detections.iter().enumerate() {
            let (color, width) = if Some(i) == self.selected {
                (SELECTED_COLOR, 4)
            } else {
                (OUTLINE_COLOR, 2)
            };
            let pts = record.quad.points();
            for k in 0..pts.len() {
                let (a, b) = (pts[k], pts[(k + 1) % pts.len()]);
                for offset in 0..width {
                    let d = offset as f32 - (width as f32 - 1.0) / 2.0;
                    draw_line_segment_mut(&mut image, (a.x as f32 + d, a.y as f32), (b.x as f32 + d, b.y as f32), color);
                    draw_line_segment_mut(&mut image, (a.x as f32, a.y as f32 + d), (b.x as f32, b.y as f32 + d), color);
                }
            }
        }
        Some(image)
    }
}
