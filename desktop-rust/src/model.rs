use std::sync::Arc;

use text_fix::TextDetector;
use text_fix_common::DetectionRecord;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum EngineStatus {
    #[default]
    Initializing,
    Ready,
    Failed(String),
}

impl EngineStatus {
    /// 初期化に失敗していればその理由
    pub fn failure(&self) -> Option<&str> {
        match self {
            EngineStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// ワーカースレッドからUIスレッドへの通知
pub enum UiMessage {
    EngineReady(Result<Arc<dyn TextDetector>, String>),
    AnalyzeDone {
        /// 開始時の画像世代。画像を開き直していたら結果は捨てる
        generation: u64,
        result: Result<Vec<DetectionRecord>, String>,
    },
}
