use crate::config::{OcrConfig, OcrEngine};
use crate::error::{Result, TextFixError};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use text_fix_common::{parse_detections, parse_tesseract_tsv, DetectionRecord};
use tracing::{debug, info, warn};

use super::TextDetector;

/// 外部OCRコマンドを呼び出す検出器
#[derive(Debug, Clone)]
pub struct CommandDetector {
    config: OcrConfig,
}

impl CommandDetector {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// `probe_args` 付きでコマンドを起動できることを確認してから返す
    ///
    /// 起動できなければエラー。終了コードが0以外でも、そのフラグを知らない
    /// ラッパーかもしれないので警告だけにする。
    pub fn initialize(config: OcrConfig) -> Result<Self> {
        info!(program = %config.program, engine = ?config.engine, "OCRエンジン初期化");
        if config.probe_args.is_empty() {
            debug!("起動確認を省略");
            return Ok(Self::new(config));
        }

        let output = run(&config.program, &config.probe_args)?;
        if !output.status.success() {
            warn!(
                program = %config.program,
                args = ?config.probe_args,
                code = ?output.status.code(),
                "起動確認が0以外で終了しました。続行します"
            );
        }
        Ok(Self::new(config))
    }

    /// エンジンに渡す引数
    ///
    /// - tesseract: `<image> stdout [-l kor+eng] <args...> tsv`
    /// - command: `args` の `{image}` と `{langs}` を置換したもの
    pub fn build_args(&self, image: &Path) -> Vec<String> {
        let image = image.display().to_string();
        match self.config.engine {
            OcrEngine::Tesseract => {
                let mut args = vec![image, "stdout".to_string()];
                if !self.config.languages.is_empty() {
                    let langs: Vec<&str> = self.config.languages.iter().map(|l| tesseract_language(l)).collect();
                    args.push("-l".to_string());
                    args.push(langs.join("+"));
                }
                args.extend(self.config.args.iter().cloned());
                args.push("tsv".to_string());
                args
            }
            OcrEngine::Command => {
                let langs = self.config.languages.join(",");
                self.config
                    .args
                    .iter()
                    .map(|arg| arg.replace("{image}", &image).replace("{langs}", &langs))
                    .collect()
            }
        }
    }

    fn parse_output(&self, stdout: &str) -> Result<Vec<DetectionRecord>> {
        let parsed = match self.config.engine {
            OcrEngine::Tesseract => parse_tesseract_tsv(stdout),
            OcrEngine::Command => parse_detections(stdout),
        };
        parsed.map_err(|e| TextFixError::EngineOutput(e.to_string()))
    }
}

/// 2文字の言語コードを tesseract の traineddata 名に寄せる
fn tesseract_language(code: &str) -> &str {
    match code {
        "ko" => "kor",
        "en" => "eng",
        "ja" => "jpn",
        "zh" | "ch_sim" => "chi_sim",
        "ch_tra" => "chi_tra",
        other => other,
    }
}

impl TextDetector for CommandDetector {
    fn detect(&self, image: &Path) -> Result<Vec<DetectionRecord>> {
        if !image.exists() {
            return Err(TextFixError::FileNotFound(image.display().to_string()));
        }

        let args = self.build_args(image);
        debug!(program = %self.config.program, ?args, "OCR実行");
        let output = run(&self.config.program, &args)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TextFixError::Engine(format!(
                "{} failed (code {:?}): {}",
                self.config.program,
                output.status.code(),
                stderr.trim()
            )));
        }

        let records = self.parse_output(&String::from_utf8_lossy(&output.stdout))?;
        debug!(count = records.len(), "OCR完了");
        Ok(records)
    }

    fn name(&self) -> &str {
        &self.config.program
    }
}

fn run(program: &str, args: &[String]) -> Result<Output> {
    // Windowsではスクリプト形式のコマンドもあるので cmd /c 経由
    #[cfg(windows)]
    let mut command = {
        let mut command = Command::new("cmd");
        command.arg("/c").arg(program);
        command
    };

    #[cfg(not(windows))]
    let mut command = Command::new(program);

    command
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| TextFixError::Engine(format!("{} を実行できません: {}", program, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn command_config(program: &str, args: &[&str]) -> OcrConfig {
        OcrConfig {
            engine: OcrEngine::Command,
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            languages: vec![],
            probe_args: vec![],
        }
    }

    #[test]
    fn test_build_args_substitutes_placeholders() {
        let detector = CommandDetector::new(OcrConfig {
            languages: vec!["ko".into(), "en".into()],
            ..command_config("ocr", &["-l", "{langs}", "--input={image}"])
        });
        let args = detector.build_args(&PathBuf::from("/tmp/a.png"));
        assert_eq!(args, vec!["-l", "ko,en", "--input=/tmp/a.png"]);
    }

    #[test]
    fn test_build_args_for_tesseract() {
        let detector = CommandDetector::new(OcrConfig::default());
        let args = detector.build_args(&PathBuf::from("/tmp/a.png"));
        assert_eq!(args, vec!["/tmp/a.png", "stdout", "-l", "kor+eng", "tsv"]);

        let detector = CommandDetector::new(OcrConfig {
            args: vec!["--psm".into(), "6".into()],
            languages: vec!["jpn".into()],
            ..OcrConfig::default()
        });
        let args = detector.build_args(&PathBuf::from("a.png"));
        assert_eq!(args, vec!["a.png", "stdout", "-l", "jpn", "--psm", "6", "tsv"]);
    }

    #[test]
    fn test_tesseract_output_is_parsed_as_tsv() {
        let detector = CommandDetector::new(OcrConfig::default());
        let stdout = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
5\t1\t1\t1\t1\t1\t4\t6\t40\t20\t88\t안민\n";
        let records = detector.parse_output(stdout).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "안민");

        assert!(matches!(detector.parse_output("[]"), Err(TextFixError::EngineOutput(_))));
    }

    #[test]
    fn test_initialize_missing_program() {
        let result = CommandDetector::initialize(OcrConfig {
            program: "text-fix-no-such-ocr-binary".into(),
            ..OcrConfig::default()
        });
        assert!(matches!(result, Err(TextFixError::Engine(_))));
    }

    #[test]
    fn test_initialize_without_probe_args_skips_check() {
        let result = CommandDetector::initialize(command_config("text-fix-no-such-ocr-binary", &[]));
        assert!(result.is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_initialize_tolerates_failing_probe() {
        // --version を知らないラッパーの代わり
        let config = OcrConfig {
            probe_args: vec!["-c".into(), "exit 2".into()],
            ..command_config("sh", &[])
        };
        let detector = CommandDetector::initialize(config).unwrap();
        assert_eq!(detector.name(), "sh");
    }

    #[test]
    fn test_detect_missing_image() {
        let detector = CommandDetector::new(OcrConfig::default());
        let result = detector.detect(Path::new("/nonexistent/image.png"));
        assert!(matches!(result, Err(TextFixError::FileNotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_detect_parses_command_output() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("in.png");
        std::fs::write(&image, b"").unwrap();

        // sh -c で固定のJSONを出力させる
        let detector = CommandDetector::new(command_config(
            "sh",
            &["-c", r#"echo 'model ready'; echo '[[[[1,2],[30,2],[30,12],[1,12]], "안민", 0.5]]'"#],
        ));
        let records = detector.detect(&image).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "안민");
    }

    #[cfg(unix)]
    #[test]
    fn test_detect_nonzero_exit_is_engine_error() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("in.png");
        std::fs::write(&image, b"").unwrap();

        let detector = CommandDetector::new(command_config("sh", &["-c", "echo boom >&2; exit 3"]));
        match detector.detect(&image) {
            Err(TextFixError::Engine(msg)) => assert!(msg.contains("boom")),
            other => panic!("unexpected: {:?}", other.map(|r| r.len())),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_detect_garbage_output() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("in.png");
        std::fs::write(&image, b"").unwrap();

        let detector = CommandDetector::new(command_config("sh", &["-c", "echo nothing useful"]));
        assert!(matches!(detector.detect(&image), Err(TextFixError::EngineOutput(_))));
    }
}
