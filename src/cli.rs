use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "text-fix")]
#[command(about = "画像中のテキストをOCRで検出して置換するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 設定ファイル（デフォルト: ~/.config/text-fix/config.json）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 対象テキストを含む領域をすべて置換して保存
    Fix {
        /// 入力画像
        #[arg(required = true)]
        input: PathBuf,

        /// 出力画像（一致がなければ書き出さない）
        #[arg(required = true)]
        output: PathBuf,

        /// 検出対象の文字列（複数指定可。省略時は設定ファイルの値）
        #[arg(short, long)]
        target: Vec<String>,

        /// 置換後の文字列
        #[arg(short, long)]
        replacement: Option<String>,

        /// OCRを実行せず、保存済みの検出結果JSONを使う
        #[arg(short, long)]
        detections: Option<PathBuf>,

        /// 描画に使うフォント
        #[arg(long)]
        font: Option<PathBuf>,
    },

    /// テキストを検出して結果をJSONで出力
    Detect {
        /// 入力画像
        #[arg(required = true)]
        image: PathBuf,

        /// 出力JSONファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/初期化
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定値で設定ファイルを書き出す
        #[arg(long)]
        init: bool,
    },
}
