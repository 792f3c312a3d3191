use anyhow::Context;
use clap::Parser;
use text_fix::{batch, cli, config, detector, editor, logging};
use cli::{Cli, Commands};
use config::Config;
use text_fix_common::BatchRule;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    // --init は既存の設定を読まずに作り直す
    if let Commands::Config { show, init: true } = cli.command {
        let path = match &cli.config {
            Some(path) => path.clone(),
            None => Config::config_path()?,
        };
        let config = Config::init(&path)?;
        println!("✔ 設定ファイルを作成しました: {}", path.display());
        if show {
            println!("設定:");
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("設定の読み込みに失敗しました")?;

    match cli.command {
        Commands::Fix { input, output, target, replacement, detections, font } => {
            println!("🔧 text-fix - 一括修正\n");

            let rule = if target.is_empty() && replacement.is_none() {
                config.batch.clone()
            } else {
                let targets = if target.is_empty() { config.batch.targets.clone() } else { target };
                let replacement = replacement.unwrap_or_else(|| config.batch.replacement.clone());
                BatchRule::new(targets, replacement)?
            };

            let mut config = config;
            if font.is_some() {
                config.font_path = font;
            }

            let detector = detector::initialize_detector(&config.ocr, detections.as_deref())
                .context("OCRエンジンの初期化に失敗しました")?;
            let replacer = editor::Replacer::from_config(&config);
            let font = replacer.font();
            match font.source() {
                None => println!("⚠ フォントが見つからないため、文字は四角で描画されます"),
                Some(path) if !font.supports(&rule.replacement) => {
                    println!("⚠ {} には「{}」の一部の文字がありません", path.display(), rule.replacement)
                }
                Some(path) => println!("フォント: {}", path.display()),
            }

            let report = batch::auto_fix_image(&input, &output, detector.as_ref(), &replacer, &rule)?;
            if report.skipped > 0 {
                println!("⚠ {}件の領域はサイズ不正のためスキップしました", report.skipped);
            }
        }

        Commands::Detect { image, output } => {
            let detector = detector::initialize_detector(&config.ocr, None)
                .context("OCRエンジンの初期化に失敗しました")?;
            let records = detector.detect(&image)?;

            match output {
                Some(path) => {
                    detector::save_detections(&path, &records)?;
                    println!("✔ {}件の検出結果を保存: {}", records.len(), path.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&records)?),
            }
        }

        Commands::Config { .. } => {
            println!("設定:");
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
