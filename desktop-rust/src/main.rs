mod app;
mod io;
mod model;

use app::{DesktopApp, configure_fonts};
use eframe::egui;
use text_fix::Config;

fn main() -> eframe::Result<()> {
    text_fix::logging::init_logging(false);
    let config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(%err, "設定を読み込めません。既定値を使います");
        Config::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "OCR Text Replacer",
        options,
        Box::new(move |cc| {
            configure_fonts(&cc.egui_ctx, config.font_path.as_deref());
            Box::new(DesktopApp::new(cc, config))
        }),
    )
}
