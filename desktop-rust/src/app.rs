use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui::{self, Color32, RichText};
use eframe::egui::{FontData, FontDefinitions, FontFamily};
use text_fix::error::TextFixError;
use text_fix::font::KOREAN_FONT_CANDIDATES;
use text_fix::{Config, EditSession, Replacer, SessionState, TextDetector, initialize_detector};

use crate::io::{info_dialog, pick_image, pick_save_path, save_session, to_color_image, warn_dialog};
use crate::model::{EngineStatus, UiMessage};

const UI_FONT: &str = "text_fix_ui";

pub struct DesktopApp {
    session: EditSession,
    config: Config,
    replacer: Replacer,
    detector: Option<Arc<dyn TextDetector>>,
    engine: EngineStatus,
    analyzing: bool,
    generation: u64,
    status: String,
    detected_text: String,
    replacement_text: String,
    texture: Option<egui::TextureHandle>,
    texture_dirty: bool,
    rx: Receiver<UiMessage>,
    tx: Sender<UiMessage>,
}

impl DesktopApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let (tx, rx) = mpsc::channel();
        let replacer = Replacer::from_config(&config);
        let mut app = Self {
            session: EditSession::new(),
            config,
            replacer,
            detector: None,
            engine: EngineStatus::Initializing,
            analyzing: false,
            generation: 0,
            status: "Initializing OCR engine...".to_string(),
            detected_text: String::new(),
            replacement_text: String::new(),
            texture: None,
            texture_dirty: false,
            rx,
            tx,
        };
        app.spawn_engine_init(cc.egui_ctx.clone());
        app
    }

    fn spawn_engine_init(&mut self, ctx: egui::Context) {
        let sender = self.tx.clone();
        let ocr = self.config.ocr.clone();
        std::thread::spawn(move || {
            let result = initialize_detector(&ocr, None)
                .map(Arc::<dyn TextDetector>::from)
                .map_err(|err| err.to_string());
            let _ = sender.send(UiMessage::EngineReady(result));
            ctx.request_repaint();
        });
    }

    fn open_image(&mut self) {
        let Some(path) = pick_image() else {
            return;
        };
        match self.session.open_image(&path) {
            Ok(_) => {
                // 実行中の解析結果は古い画像のものになる
                self.generation += 1;
                self.analyzing = false;
                self.detected_text.clear();
                self.replacement_text.clear();
                self.texture_dirty = true;
                self.status = "Image loaded. Run OCR analysis.".to_string();
            }
            Err(err) => self.status = format!("Load failed: {err}"),
        }
    }

    fn run_analyze(&mut self, ctx: &egui::Context) {
        let Some(detector) = self.detector.clone() else {
            self.status = "OCR engine is not ready".to_string();
            return;
        };
        let Some(path) = self.session.source_path().map(PathBuf::from) else {
            self.status = "No image loaded".to_string();
            return;
        };

        let sender = self.tx.clone();
        let generation = self.generation;
        let ctx = ctx.clone();
        self.analyzing = true;
        self.status = "Running OCR analysis...".to_string();

        std::thread::spawn(move || {
            let result = detector.detect(&path).map_err(|err| err.to_string());
            let _ = sender.send(UiMessage::AnalyzeDone { generation, result });
            ctx.request_repaint();
        });
    }

    fn save_image(&mut self) {
        if self.session.canvas().is_none() {
            return;
        }
        let Some(path) = pick_save_path(self.session.source_path()) else {
            return;
        };
        match save_session(&self.session, &path) {
            Ok(_) => {
                self.status = format!("Saved {}", path.display());
                info_dialog("Saved", &format!("Image saved: {}", path.display()));
            }
            Err(err) => self.status = format!("Save failed: {err:#}"),
        }
    }

    fn select_at(&mut self, x: f64, y: f64) {
        if self.session.select_at(x, y, self.config.selection).is_none() {
            return;
        }
        if let Some(record) = self.session.selected_record() {
            self.detected_text = record.text.clone();
            self.replacement_text = record.text.clone();
        }
        self.texture_dirty = true;
    }

    fn apply_edit(&mut self) {
        match self.session.apply_edit(&self.replacement_text, &self.replacer) {
            Ok(_) => {
                self.detected_text = self.replacement_text.clone();
                self.texture_dirty = true;
                self.status = "Text replaced".to_string();
            }
            Err(TextFixError::NoSelection) => {
                warn_dialog("Warning", "Select a text region first.");
            }
            Err(TextFixError::EmptyReplacement) => {
                warn_dialog("Warning", "Enter the replacement text.");
            }
            Err(err) => {
                self.status = format!("Replace failed: {err}");
                if err.is_recoverable() {
                    warn_dialog("Warning", &err.to_string());
                }
            }
        }
    }

    fn poll_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::EngineReady(Ok(detector)) => {
                    self.status = format!("OCR engine ready ({})", detector.name());
                    self.detector = Some(detector);
                    self.engine = EngineStatus::Ready;
                }
                UiMessage::EngineReady(Err(message)) => {
                    self.status = format!("OCR init failed: {message}");
                    self.engine = EngineStatus::Failed(message);
                }
                UiMessage::AnalyzeDone { generation, result } => {
                    if generation != self.generation {
                        continue;
                    }
                    self.analyzing = false;
                    match result {
                        Ok(records) => {
                            let count = records.len();
                            match self.session.set_detections(records) {
                                Ok(_) => {
                                    self.status = format!("Analysis complete: {count} text regions");
                                    self.detected_text.clear();
                                    self.replacement_text.clear();
                                    self.texture_dirty = true;
                                }
                                Err(err) => self.status = format!("Analysis failed: {err}"),
                            }
                        }
                        Err(message) => self.status = format!("OCR error: {message}"),
                    }
                }
            }
        }
    }

    fn refresh_texture(&mut self, ctx: &egui::Context) {
        if !self.texture_dirty {
            return;
        }
        self.texture_dirty = false;
        self.texture = self
            .session
            .overlay()
            .map(|image| ctx.load_texture("canvas", to_color_image(&image), egui::TextureOptions::NEAREST));
    }

    fn render_canvas(&mut self, ui: &mut egui::Ui) {
        let Some(texture) = &self.texture else {
            ui.centered_and_justified(|ui| {
                ui.label("Open an image to start.");
            });
            return;
        };
        let texture_size = texture.size_vec2();

        let clicked = egui::ScrollArea::both()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let response = ui.add(
                    egui::Image::new(texture)
                        .fit_to_original_size(1.0)
                        .sense(egui::Sense::click()),
                );
                if !response.clicked() {
                    return None;
                }
                let pos = response.interact_pointer_pos()?;
                let rect = response.rect;
                let x = (pos.x - rect.min.x) * texture_size.x / rect.width();
                let y = (pos.y - rect.min.y) * texture_size.y / rect.height();
                Some((f64::from(x), f64::from(y)))
            })
            .inner;

        if let Some((x, y)) = clicked {
            self.select_at(x, y);
        }
    }

    fn render_editor(&mut self, ui: &mut egui::Ui) {
        ui.heading("Text Edit");
        ui.add_space(8.0);

        ui.label("Detected text:");
        let mut detected = self.detected_text.as_str();
        ui.add(egui::TextEdit::singleline(&mut detected).desired_width(f32::INFINITY));

        ui.label("Replacement text:");
        ui.add(egui::TextEdit::singleline(&mut self.replacement_text).desired_width(f32::INFINITY));

        ui.add_space(16.0);
        let button = egui::Button::new(RichText::new("Apply (Stretch)").color(Color32::WHITE))
            .fill(Color32::from_rgb(76, 175, 80));
        let enabled = self.session.state() != SessionState::NoImage;
        if ui.add_enabled(enabled, button).clicked() {
            self.apply_edit();
        }

        ui.add_space(16.0);
        if let Some(record) = self.session.selected_record() {
            ui.label(RichText::new(format!("Confidence: {:.2}", record.confidence)).color(Color32::from_gray(120)));
        }
        let font = self.replacer.font();
        let notice = match font.source() {
            None => Some("No font found; text is drawn as boxes.".to_string()),
            Some(path) if !font.supports(&self.replacement_text) => Some(format!(
                "{} lacks some of these characters.",
                path.file_name().unwrap_or(path.as_os_str()).to_string_lossy()
            )),
            Some(_) => None,
        };
        if let Some(notice) = notice {
            ui.label(RichText::new(notice).color(Color32::from_rgb(200, 120, 0)));
        }
    }
}

/// 置換テキストと同じフォントをUIにも使い、ハングルを表示できるようにする
pub fn configure_fonts(ctx: &egui::Context, preferred: Option<&Path>) {
    let mut candidates = preferred
        .into_iter()
        .chain(KOREAN_FONT_CANDIDATES.iter().map(Path::new));
    let Some((path, data)) = candidates.find_map(|path| std::fs::read(path).ok().map(|data| (path, data)))
    else {
        tracing::warn!("UI用の韓国語フォントが見つかりません");
        return;
    };

    tracing::debug!(path = %path.display(), "UIフォント");
    let mut fonts = FontDefinitions::default();
    fonts.font_data.insert(UI_FONT.to_string(), FontData::from_owned(data));
    for family in [FontFamily::Proportional, FontFamily::Monospace] {
        fonts.families.entry(family).or_default().insert(0, UI_FONT.to_string());
    }
    ctx.set_fonts(fonts);
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_messages();
        self.refresh_texture(ctx);

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open Image").clicked() {
                    self.open_image();
                }
                let can_analyze = self.engine == EngineStatus::Ready
                    && self.session.state() != SessionState::NoImage
                    && !self.analyzing;
                if ui.add_enabled(can_analyze, egui::Button::new("Run OCR")).clicked() {
                    self.run_analyze(ctx);
                }
                let can_save = self.session.canvas().is_some();
                if ui.add_enabled(can_save, egui::Button::new("Save Image")).clicked() {
                    self.save_image();
                }

                ui.separator();
                let failure = self.engine.failure();
                let color = match failure {
                    Some(_) => Color32::from_rgb(220, 80, 80),
                    None => Color32::from_rgb(90, 140, 230),
                };
                let status = ui.label(RichText::new(&self.status).color(color));
                if let Some(message) = failure {
                    status.on_hover_text(format!("OCR engine: {message}\nCheck ocr.program in the config file."));
                }
                if self.analyzing {
                    ui.spinner();
                }
            });
        });

        egui::SidePanel::right("editor")
            .exact_width(300.0)
            .resizable(false)
            .show(ctx, |ui| {
                self.render_editor(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_canvas(ui);
        });
    }
}
