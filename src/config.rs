use crate::editor::BackgroundStrategy;
use crate::error::{Result, TextFixError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use text_fix_common::{BatchRule, SelectionPolicy};

/// 置換テキストを描画する基準フォントサイズ（px）
pub const DEFAULT_FONT_SIZE: f32 = 100.0;

/// 描画テキストの下に足す余白（px）
pub const DEFAULT_PADDING: u32 = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// 韓国語を含むフォント。未指定・読み込み失敗時はシステムフォントを探す
    pub font_path: Option<PathBuf>,
    pub font_size: f32,
    pub padding: u32,
    pub background: BackgroundStrategy,
    pub selection: SelectionPolicy,
    pub ocr: OcrConfig,
    pub batch: BatchRule,
}

/// 外部OCRコマンドの出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OcrEngine {
    /// `tesseract <image> stdout -l <langs> tsv`。行単位にまとめて検出結果にする
    #[default]
    Tesseract,
    /// 任意のコマンド。検出結果のJSON配列を標準出力に書き出すこと
    Command,
}

/// 外部OCRコマンドの設定
///
/// `engine = command` のとき、`args` 中の `{image}` は画像パス、
/// `{langs}` はカンマ区切りの言語コードに置換される。
/// `probeArgs` は初期化時の起動確認に使う引数。空なら起動確認をしない。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OcrConfig {
    pub engine: OcrEngine,
    pub program: String,
    pub args: Vec<String>,
    pub languages: Vec<String>,
    pub probe_args: Vec<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine: OcrEngine::Tesseract,
            program: "tesseract".into(),
            args: vec![],
            languages: vec!["ko".into(), "en".into()],
            probe_args: vec!["--version".into()],
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font_path: None,
            font_size: DEFAULT_FONT_SIZE,
            padding: DEFAULT_PADDING,
            background: BackgroundStrategy::default(),
            selection: SelectionPolicy::default(),
            ocr: OcrConfig::default(),
            batch: BatchRule::default(),
        }
    }
}

impl Config {
    /// 既定の場所から読み込む（ファイルがなければ既定値）
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// 既存ファイルの中身は読まずに既定値で上書きする（壊れた設定の作り直し用）
    pub fn init(path: &Path) -> Result<Self> {
        let config = Self::default();
        config.save_to(path)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| TextFixError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("text-fix").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(TextFixError::Config(format!(
                "fontSize は正の数を指定してください: {}",
                self.font_size
            )));
        }
        if self.ocr.program.trim().is_empty() {
            return Err(TextFixError::Config("ocr.program が空です".into()));
        }
        self.batch.validate()?;
        Ok(())
    }
}
