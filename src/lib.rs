//! text-fix
//!
//! 画像中のテキストをOCRで検出し、選んだ領域を背景色で塗りつぶして
//! 新しいテキストを引き伸ばして貼り付ける。

pub mod batch;
pub mod cli;
pub mod config;
pub mod detector;
pub mod editor;
pub mod error;
pub mod font;
pub mod logging;
pub mod session;

pub use batch::{auto_fix_image, BatchReport};
pub use config::Config;
pub use detector::{initialize_detector, TextDetector};
pub use editor::{ReplaceOutcome, Replacer};
pub use error::{Result, TextFixError};
pub use session::{EditSession, SessionState};
