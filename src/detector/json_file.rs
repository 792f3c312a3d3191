use crate::error::{Result, TextFixError};
use std::path::{Path, PathBuf};
use text_fix_common::{parse_detections, DetectionRecord};

use super::TextDetector;

/// 保存済みの検出結果JSONを返す検出器（`text-fix detect --output` の出力を再利用する）
#[derive(Debug, Clone)]
pub struct JsonDetector {
    path: PathBuf,
}

impl JsonDetector {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TextFixError::FileNotFound(path.display().to_string()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

impl TextDetector for JsonDetector {
    fn detect(&self, _image: &Path) -> Result<Vec<DetectionRecord>> {
        let content = std::fs::read_to_string(&self.path)?;
        parse_detections(&content).map_err(|e| TextFixError::EngineOutput(e.to_string()))
    }

    fn name(&self) -> &str {
        "json"
    }
}

pub fn save_detections(path: &Path, records: &[DetectionRecord]) -> Result<()> {
    let content = serde_json::to_string_pretty(records)?;
    std::fs::write(path, content)?;
    Ok(())
}
