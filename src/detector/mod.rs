//! OCRエンジン連携
//!
//! エンジン本体は外部プロセス（またはJSONファイル）として扱い、
//! 検出結果をエンジンの出力順のまま返す。信頼度での絞り込みはしない。

mod command;
mod json_file;

pub use command::CommandDetector;
pub use json_file::{save_detections, JsonDetector};

use crate::config::OcrConfig;
use crate::error::Result;
use std::path::Path;
use text_fix_common::DetectionRecord;

pub trait TextDetector: Send + Sync {
    fn detect(&self, image: &Path) -> Result<Vec<DetectionRecord>>;

    fn name(&self) -> &str;
}

/// 検出器を初期化する
///
/// `detections` が指定されていればそのJSONファイルを使い、
/// なければ外部OCRコマンドの起動確認をしてから返す。
pub fn initialize_detector(
    config: &OcrConfig,
    detections: Option<&Path>,
) -> Result<Box<dyn TextDetector>> {
    match detections {
        Some(path) => Ok(Box::new(JsonDetector::open(path)?)),
        None => Ok(Box::new(CommandDetector::initialize(config.clone())?)),
    }
}
