use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextFixError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("画像保存エラー: {0}")]
    ImageSave(String),

    #[error("OCRエンジンエラー: {0}")]
    Engine(String),

    #[error("OCR出力の解析に失敗: {0}")]
    EngineOutput(String),

    #[error("領域のサイズが不正です ({width}x{height})")]
    DegenerateRegion { width: i64, height: i64 },

    #[error("テキスト領域が選択されていません")]
    NoSelection,

    #[error("置換テキストが空です")]
    EmptyReplacement,

    #[error("画像が読み込まれていません")]
    NoImage,

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] text_fix_common::Error),
}

impl TextFixError {
    /// 入力起因で、処理をスキップ・拒否すれば続行できるエラー
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TextFixError::DegenerateRegion { .. }
                | TextFixError::NoSelection
                | TextFixError::EmptyReplacement
        )
    }
}

pub type Result<T> = std::result::Result<T, TextFixError>;
