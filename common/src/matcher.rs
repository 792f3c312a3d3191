//! 一括修正の対象判定
//!
//! 空白を除いた検出テキストに対象文字列のいずれかが含まれていれば置換対象とする。

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 既定の検出対象（誤記「대한안민국」とその一部）
pub const DEFAULT_TARGETS: &[&str] = &["대한안민국", "안민"];

/// 既定の置換文字列
pub const DEFAULT_REPLACEMENT: &str = "대한민국";

/// 一括修正ルール
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchRule {
    pub targets: Vec<String>,
    pub replacement: String,
}

impl Default for BatchRule {
    fn default() -> Self {
        Self {
            targets: DEFAULT_TARGETS.iter().map(|s| s.to_string()).collect(),
            replacement: DEFAULT_REPLACEMENT.to_string(),
        }
    }
}

impl BatchRule {
    pub fn new(targets: Vec<String>, replacement: impl Into<String>) -> Result<Self> {
        let rule = Self {
            targets,
            replacement: replacement.into(),
        };
        rule.validate()?;
        Ok(rule)
    }

    /// 検出テキストが対象かどうか（半角スペースは無視）
    pub fn matches(&self, text: &str) -> bool {
        let clean = text.replace(' ', "");
        self.targets
            .iter()
            .any(|t| !t.is_empty() && clean.contains(t.as_str()))
    }

    /// ルールの整合性チェック
    ///
    /// 置換後の文字列が再び対象に一致すると、修正済み画像を再処理したときに
    /// 同じ領域を書き換え続けるため拒否する。
    pub fn validate(&self) -> Result<()> {
        if self.targets.iter().all(|t| t.trim().is_empty()) {
            return Err(Error::Config("検出対象の文字列が空です".into()));
        }
        if self.replacement.is_empty() {
            return Err(Error::Config("置換文字列が空です".into()));
        }
        if self.matches(&self.replacement) {
            return Err(Error::Config(format!(
                "置換文字列 '{}' が検出対象に一致します",
                self.replacement
            )));
        }
        Ok(())
    }
}
