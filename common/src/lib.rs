//! text-fix Common Library
//!
//! CLIとデスクトップで共有される型と純粋ロジック（画像処理を含まない）

pub mod types;
pub mod geometry;
pub mod color;
pub mod matcher;
pub mod error;
pub mod parser;

pub use types::{DetectionRecord, Point, Quad};
pub use geometry::{BoundingBox, SelectionPolicy, find_region_at};
pub use color::{luminance, text_color_for, TextColor, LUMINANCE_THRESHOLD};
pub use matcher::{BatchRule, DEFAULT_REPLACEMENT, DEFAULT_TARGETS};
pub use error::{Error, Result};
pub use parser::{extract_json, parse_detections, parse_tesseract_tsv};
