//! OCRエンジン出力パーサー
//!
//! 外部OCRコマンドの標準出力からJSONを抽出し、検出結果に変換する

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::{DetectionRecord, Quad};

/// OCRコマンドの出力から検出結果のJSON配列を切り出す
///
/// モデル読み込みなどのログ行が前後に混ざることがあるので、
/// ```json フェンス → 1行で完結した `[...]` 行（最後のもの）→ 最初の `[` から最後の `]`
/// の順に探す。
///
/// # Examples
/// ```
/// use text_fix_common::extract_json;
///
/// let output = "[INFO] loading model\n[[[[0,0],[1,0],[1,1],[0,1]], \"a\", 0.9]]";
/// let json = extract_json(output).unwrap();
/// assert!(json.starts_with("[[[["));
/// ```
pub fn extract_json(output: &str) -> Result<&str> {
    let fenced = output
        .split_once("```json")
        .and_then(|(_, rest)| rest.split_once("```"))
        .map(|(body, _)| body.trim());
    if let Some(body) = fenced {
        return Ok(body);
    }

    let single_line = output
        .lines()
        .rev()
        .map(str::trim_end)
        .find(|line| line.starts_with('[') && line.ends_with(']'));
    if let Some(line) = single_line {
        return Ok(line);
    }

    match (output.find('['), output.rfind(']')) {
        (Some(open), Some(close)) if open < close => Ok(&output[open..=close]),
        _ => Err(Error::Parse("出力に検出結果のJSON配列がありません".into())),
    }
}

/// 1検出の受理形式
///
/// - オブジェクト: `{"box": [[x,y]x4], "text": "...", "confidence": 0.9}`
/// - タプル: `[[[x,y]x4], "...", 0.9]`（readtext の素の形）
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDetection {
    Object(DetectionRecord),
    Tuple(Quad, String, f32),
}

impl From<RawDetection> for DetectionRecord {
    fn from(raw: RawDetection) -> Self {
        match raw {
            RawDetection::Object(record) => record,
            RawDetection::Tuple(quad, text, confidence) => DetectionRecord {
                quad,
                text,
                confidence,
            },
        }
    }
}

/// 検出結果をパース（順序はエンジンの出力順のまま）
pub fn parse_detections(output: &str) -> Result<Vec<DetectionRecord>> {
    let json_str = extract_json(output)?;
    let raw: Vec<RawDetection> = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("検出結果のJSONパースエラー: {}", e)))?;
    Ok(raw.into_iter().map(DetectionRecord::from).collect())
}

/// tesseract TSV の単語行
struct TsvWord {
    line: (u32, u32, u32, u32),
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
    conf: f64,
    text: String,
}

impl TsvWord {
    /// 単語以外の行や空の単語は `None`
    fn parse(row: &str) -> std::result::Result<Option<Self>, String> {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 12 {
            return Err(format!("列数が足りません ({}列)", cols.len()));
        }
        if number::<u32>(cols[0])? != 5 {
            return Ok(None);
        }
        let text = cols[11].trim();
        let conf = number::<f64>(cols[10])?;
        if text.is_empty() || conf < 0.0 {
            return Ok(None);
        }

        let left = number::<f64>(cols[6])?;
        let top = number::<f64>(cols[7])?;
        Ok(Some(Self {
            line: (number(cols[1])?, number(cols[2])?, number(cols[3])?, number(cols[4])?),
            left,
            top,
            right: left + number::<f64>(cols[8])?,
            bottom: top + number::<f64>(cols[9])?,
            conf,
            text: text.to_string(),
        }))
    }
}

fn number<T: std::str::FromStr>(col: &str) -> std::result::Result<T, String> {
    col.trim().parse().map_err(|_| format!("数値ではありません: {:?}", col))
}

/// 同じ行に属する単語をまとめたもの
struct TsvLine {
    line: (u32, u32, u32, u32),
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
    conf_sum: f64,
    words: Vec<String>,
}

impl TsvLine {
    fn new(word: TsvWord) -> Self {
        Self {
            line: word.line,
            left: word.left,
            top: word.top,
            right: word.right,
            bottom: word.bottom,
            conf_sum: word.conf,
            words: vec![word.text],
        }
    }

    fn push(&mut self, word: TsvWord) {
        self.left = self.left.min(word.left);
        self.top = self.top.min(word.top);
        self.right = self.right.max(word.right);
        self.bottom = self.bottom.max(word.bottom);
        self.conf_sum += word.conf;
        self.words.push(word.text);
    }

    fn into_record(self) -> DetectionRecord {
        let confidence = self.conf_sum / self.words.len() as f64 / 100.0;
        DetectionRecord {
            quad: Quad::from_rect(self.left, self.top, self.right, self.bottom),
            text: self.words.join(" "),
            confidence: confidence as f32,
        }
    }
}

/// `tesseract <image> stdout tsv` の出力を行単位の検出結果にする
///
/// 単語（level 5）を page/block/par/line ごとにまとめ、外接矩形を四角形に、
/// 単語を空白で連結したものをテキストに、単語 conf の平均 / 100 を信頼度にする。
/// 順序は tesseract の読み順のまま。
pub fn parse_tesseract_tsv(output: &str) -> Result<Vec<DetectionRecord>> {
    let mut rows = output.lines().map(|row| row.trim_end_matches('\r')).enumerate();
    if !rows.by_ref().any(|(_, row)| row.starts_with("level\t")) {
        return Err(Error::Parse("tesseract のTSVヘッダーがありません".into()));
    }

    let mut lines: Vec<TsvLine> = Vec::new();
    for (index, row) in rows {
        if row.trim().is_empty() {
            continue;
        }
        let word = TsvWord::parse(row).map_err(|e| Error::Parse(format!("TSV {}行目: {}", index + 1, e)))?;
        let Some(word) = word else {
            continue;
        };
        match lines.last_mut() {
            Some(line) if line.line == word.line => line.push(word),
            _ => lines.push(TsvLine::new(word)),
        }
    }

    Ok(lines.into_iter().map(TsvLine::into_record).collect())
}
