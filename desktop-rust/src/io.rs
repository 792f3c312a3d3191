use anyhow::{Context, Result};
use eframe::egui;
use image::RgbImage;
use std::path::{Path, PathBuf};

use text_fix::EditSession;

const OPEN_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

pub fn pick_image() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Image files", OPEN_EXTENSIONS)
        .pick_file()
}

pub fn pick_save_path(source: Option<&Path>) -> Option<PathBuf> {
    let default_name = source
        .and_then(|p| p.file_stem())
        .and_then(|s| s.to_str())
        .map(|stem| format!("{stem}_edited.png"))
        .unwrap_or_else(|| "edited.png".to_string());

    rfd::FileDialog::new()
        .add_filter("PNG files", &["png"])
        .add_filter("JPEG files", &["jpg", "jpeg"])
        .set_file_name(default_name)
        .save_file()
        .map(with_default_extension)
}

/// 拡張子がなければ .png を付ける
pub fn with_default_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension("png")
    }
}

pub fn save_session(session: &EditSession, path: &Path) -> Result<()> {
    session
        .save(path)
        .with_context(|| format!("save {}", path.display()))
}

pub fn to_color_image(image: &RgbImage) -> egui::ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    egui::ColorImage::from_rgb(size, image.as_raw())
}

pub fn warn_dialog(title: &str, message: &str) {
    let _ = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title(title)
        .set_description(message)
        .show();
}

pub fn info_dialog(title: &str, message: &str) {
    let _ = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Info)
        .set_title(title)
        .set_description(message)
        .show();
}
