use eframe::egui;
use log::{info, warn};
use std::path::PathBuf;

use crate::camera::NativeCamera;
use crate::canvas::ImageView;
use crate::error::{EditorError, Result};
use crate::i18n;
use crate::io::FileHandler;
use crate::ops::Channel;
use crate::processor::ImageProcessor;
use crate::settings::EditorSettings;
use crate::t;

const CONTROL_PANEL_WIDTH: f32 = 300.0;
const FIELD_WIDTH: f32 = 48.0;

// ============================================================================
// USER ACTIONS — collected while drawing, executed after the panels close
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
enum Action {
    Open,
    Capture,
    Save,
    Reset,
    ShowChannel(Channel),
    Crop,
    Rotate,
    Circle,
    SetLanguage(&'static str),
    Exit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MessageKind {
    Error,
    Warning,
}

/// A message window waiting for the user's OK.
struct UserMessage {
    kind: MessageKind,
    text: String,
}

/// Parse every entry field as a whole number.
fn parse_fields<const N: usize>(fields: &[String; N]) -> Result<[i64; N]> {
    let mut out = [0i64; N];
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = field
            .trim()
            .parse()
            .map_err(|_| EditorError::InvalidNumber(field.clone()))?;
    }
    Ok(out)
}

/// Localized text for an error.
fn user_message(err: &EditorError) -> String {
    match err {
        EditorError::NoImage => t!("error.no_image"),
        EditorError::FileNotFound(path) => t!("error.file_not_found", path = path.display()),
        EditorError::EmptyFile(path) => t!("error.empty_file", path = path.display()),
        EditorError::Decode { source, .. } => t!("error.decode", detail = source),
        EditorError::UnsupportedFormat(ext) => t!("error.unsupported_format", ext = ext),
        EditorError::Encode { source, .. } => t!("error.encode", detail = source),
        EditorError::CameraUnavailable(reason) => t!("error.camera", detail = reason),
        EditorError::CropOutOfBounds {
            x1,
            y1,
            x2,
            y2,
            width,
            height,
        } => t!(
            "error.crop_bounds",
            x1 = x1,
            y1 = y1,
            x2 = x2,
            y2 = y2,
            w = width,
            h = height
        ),
        EditorError::EmptyCropRegion { .. } => t!("error.crop_empty"),
        EditorError::NonPositiveRadius(r) => t!("error.radius", r = r),
        EditorError::CircleOutOfBounds {
            x,
            y,
            width,
            height,
        } => t!("error.circle_bounds", x = x, y = y, w = width, h = height),
        EditorError::InvalidAngle(_) => t!("error.angle"),
        EditorError::InvalidNumber(_) => t!("error.crop_input"),
    }
}

pub struct ImageEditorApp {
    processor: ImageProcessor,
    image_view: ImageView,
    file_handler: FileHandler,
    settings: EditorSettings,

    // Entry fields
    crop_fields: [String; 4],
    circle_fields: [String; 3],
    rotation: f64,

    message: Option<UserMessage>,
    pending_startup_file: Option<PathBuf>,
    window_title: String,
}

impl ImageEditorApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: EditorSettings,
        startup_file: Option<PathBuf>,
    ) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());

        let language = if settings.language.is_empty() {
            i18n::detect_system_language()
        } else {
            settings.language.clone()
        };
        i18n::set_language(&language);
        info!("ui language {}", i18n::current_language());

        let mut file_handler = FileHandler::new();
        file_handler.last_directory = settings.last_directory.clone();

        Self {
            processor: ImageProcessor::new().with_circle_style(settings.circle_style()),
            image_view: ImageView::new(),
            file_handler,
            settings,
            crop_fields: Default::default(),
            circle_fields: Default::default(),
            rotation: 0.0,
            message: None,
            pending_startup_file: startup_file,
            window_title: String::new(),
        }
    }

    // ========================================================================
    // HANDLERS
    // ========================================================================

    fn report(&mut self, err: EditorError) {
        let kind = if err.is_warning() {
            MessageKind::Warning
        } else {
            MessageKind::Error
        };
        warn!("{}", err);
        self.message = Some(UserMessage {
            kind,
            text: user_message(&err),
        });
    }

    fn warn_user(&mut self, text: String) {
        self.message = Some(UserMessage {
            kind: MessageKind::Warning,
            text,
        });
    }

    /// Controls that mirror the processor go back to their neutral state.
    fn reset_controls(&mut self) {
        self.rotation = 0.0;
    }

    fn open_image(&mut self) {
        let picked = self
            .file_handler
            .pick_open_path(&t!("dialog.images"), &t!("dialog.all_files"));
        if let Some(path) = picked {
            self.remember_directory();
            self.open_path(path);
        }
    }

    fn open_path(&mut self, path: PathBuf) {
        match self.processor.load_image(&path).map(|_| ()) {
            Ok(_) => self.reset_controls(),
            Err(e) => self.report(e),
        }
    }

    fn capture_from_camera(&mut self) {
        let mut camera = NativeCamera::new(self.settings.camera_index);
        match self.processor.capture_from_camera(&mut camera).map(|_| ()) {
            Ok(_) => self.reset_controls(),
            Err(e) => self.report(e),
        }
    }

    fn save_image(&mut self) {
        let Some(source) = self.processor.source() else {
            self.warn_user(t!("error.no_image_to_save"));
            return;
        };
        let stem = source.suggested_stem();
        let Some(path) = self.file_handler.pick_save_path(&stem) else {
            return;
        };
        self.remember_directory();
        match self.processor.save_image(&path, self.settings.jpeg_quality) {
            Ok(written) => self.file_handler.last_saved = Some(written),
            Err(e) => self.report(e),
        }
    }

    fn reset_image(&mut self) {
        match self.processor.reset_image().map(|_| ()) {
            Ok(_) => self.reset_controls(),
            Err(e) => self.report(e),
        }
    }

    fn update_channel(&mut self, channel: Channel) {
        if let Err(e) = self.processor.show_channel(channel).map(|_| ()) {
            self.report(e);
        }
    }

    fn apply_crop(&mut self) {
        let result = parse_fields(&self.crop_fields)
            .and_then(|[x1, y1, x2, y2]| self.processor.apply_crop(x1, y1, x2, y2).map(|_| ()));
        match result {
            Err(EditorError::InvalidNumber(_)) => self.warn_user(t!("error.crop_input")),
            Err(e) => self.report(e),
            Ok(()) => {}
        }
    }

    fn apply_rotation(&mut self) {
        if let Err(e) = self.processor.apply_rotation(self.rotation).map(|_| ()) {
            self.report(e);
        }
    }

    fn draw_circle(&mut self) {
        let result = parse_fields(&self.circle_fields)
            .and_then(|[x, y, r]| self.processor.draw_circle(x, y, r).map(|_| ()));
        match result {
            Err(EditorError::InvalidNumber(_)) => self.warn_user(t!("error.circle_input")),
            Err(e) => self.report(e),
            Ok(()) => {}
        }
    }

    fn set_language(&mut self, code: &str) {
        i18n::set_language(code);
        self.settings.language = code.to_string();
        self.settings.save();
    }

    fn remember_directory(&mut self) {
        if self.settings.last_directory != self.file_handler.last_directory {
            self.settings.last_directory = self.file_handler.last_directory.clone();
            self.settings.save();
        }
    }

    fn run(&mut self, action: Action, ctx: &egui::Context) {
        match action {
            Action::Open => self.open_image(),
            Action::Capture => self.capture_from_camera(),
            Action::Save => self.save_image(),
            Action::Reset => self.reset_image(),
            Action::ShowChannel(channel) => self.update_channel(channel),
            Action::Crop => self.apply_crop(),
            Action::Rotate => self.apply_rotation(),
            Action::Circle => self.draw_circle(),
            Action::SetLanguage(code) => self.set_language(code),
            Action::Exit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }
    }

    // ========================================================================
    // LAYOUT
    // ========================================================================

    fn menu_bar(&self, ui: &mut egui::Ui, action: &mut Option<Action>) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button(t!("menu.file"), |ui| {
                let mut item = |ui: &mut egui::Ui, label: String, a: Action| {
                    if ui.button(label).clicked() {
                        *action = Some(a);
                        ui.close_menu();
                    }
                };
                item(ui, t!("menu.open"), Action::Open);
                item(ui, t!("menu.capture"), Action::Capture);
                item(ui, t!("menu.save"), Action::Save);
                ui.separator();
                item(ui, t!("menu.exit"), Action::Exit);
            });
        });
    }

    fn control_panel(&mut self, ui: &mut egui::Ui, action: &mut Option<Action>) {
        let has_image = self.processor.has_image();

        ui.add_space(4.0);
        ui.group(|ui| {
            ui.strong(t!("panel.operations"));
            let full = egui::vec2(ui.available_width(), 0.0);
            if ui.add_sized(full, egui::Button::new(t!("button.open"))).clicked() {
                *action = Some(Action::Open);
            }
            if ui.add_sized(full, egui::Button::new(t!("button.camera"))).clicked() {
                *action = Some(Action::Capture);
            }
            if ui.add_sized(full, egui::Button::new(t!("button.save"))).clicked() {
                *action = Some(Action::Save);
            }
            let reset = ui.add_enabled(has_image, egui::Button::new(t!("button.reset")).min_size(full));
            if reset.clicked() {
                *action = Some(Action::Reset);
            }
        });

        ui.add_space(6.0);
        ui.group(|ui| {
            ui.set_width(ui.available_width());
            ui.strong(t!("panel.channels"));
            ui.add_enabled_ui(has_image, |ui| {
                let mut selected = self.processor.channel();
                for channel in Channel::ALL {
                    if ui
                        .radio_value(&mut selected, channel, t!(channel.label_key()))
                        .clicked()
                    {
                        *action = Some(Action::ShowChannel(channel));
                    }
                }
            });
        });

        ui.add_space(6.0);
        ui.group(|ui| {
            ui.set_width(ui.available_width());
            ui.strong(t!("panel.editing"));
            ui.add_enabled_ui(has_image, |ui| {
                ui.label(t!("crop.label"));
                ui.horizontal(|ui| {
                    for field in self.crop_fields.iter_mut() {
                        ui.add(egui::TextEdit::singleline(field).desired_width(FIELD_WIDTH));
                    }
                });
                if ui.button(t!("crop.apply")).clicked() {
                    *action = Some(Action::Crop);
                }

                ui.add_space(6.0);
                ui.label(t!("rotate.label"));
                let slider = egui::Slider::new(&mut self.rotation, -180.0..=180.0).suffix("°");
                if ui.add(slider).changed() {
                    *action = Some(Action::Rotate);
                }

                ui.add_space(6.0);
                ui.label(t!("circle.label"));
                ui.horizontal(|ui| {
                    for field in self.circle_fields.iter_mut() {
                        ui.add(egui::TextEdit::singleline(field).desired_width(FIELD_WIDTH));
                    }
                });
                if ui.button(t!("circle.apply")).clicked() {
                    *action = Some(Action::Circle);
                }
            });
        });

        ui.add_space(6.0);
        ui.group(|ui| {
            ui.set_width(ui.available_width());
            ui.strong(t!("panel.view"));
            ui.horizontal(|ui| {
                ui.label(t!("language.label"));
                let current = i18n::current_language();
                let current_name = i18n::LANGUAGES
                    .iter()
                    .find(|(code, _)| *code == current)
                    .map(|(_, name)| *name)
                    .unwrap_or("English");
                egui::ComboBox::from_id_source("language")
                    .selected_text(current_name)
                    .show_ui(ui, |ui| {
                        for (code, name) in i18n::LANGUAGES {
                            if ui.selectable_label(*code == current, *name).clicked() {
                                *action = Some(Action::SetLanguage(*code));
                            }
                        }
                    });
            });
        });

        ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
            match self.processor.dimensions() {
                Some((w, h)) => {
                    let channel = t!(self.processor.channel().label_key());
                    ui.label(t!("status.channel", channel = channel));
                    ui.label(t!("status.size", w = w, h = h));
                }
                None => {
                    ui.label(t!("status.empty"));
                }
            }
        });
    }

    fn message_window(&mut self, ctx: &egui::Context) {
        let Some(message) = &self.message else { return };
        let title = match message.kind {
            MessageKind::Error => t!("dialog.error"),
            MessageKind::Warning => t!("dialog.warning"),
        };
        let mut close = false;
        egui::Window::new(title)
            .id(egui::Id::new("message_window"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .min_width(320.0)
            .show(ctx, |ui| {
                ui.label(&message.text);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button(t!("dialog.ok")).clicked() {
                        close = true;
                    }
                });
            });
        if close || ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
            self.message = None;
        }
    }

    fn sync_title(&mut self, ctx: &egui::Context) {
        let title = match self.processor.source() {
            Some(source) => format!("{} - {}", t!("app.title"), source.display_name()),
            None => t!("app.title"),
        };
        if title != self.window_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.window_title = title;
        }
    }
}

impl eframe::App for ImageEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(path) = self.pending_startup_file.take() {
            self.open_path(path);
        }
        self.sync_title(ctx);

        let mut action = None;
        // the message window is modal: the rest of the UI is inert while it shows
        let interactive = self.message.is_none();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.set_enabled(interactive);
            self.menu_bar(ui, &mut action);
        });

        egui::SidePanel::right("controls")
            .exact_width(CONTROL_PANEL_WIDTH)
            .resizable(false)
            .show(ctx, |ui| {
                ui.set_enabled(interactive);
                self.control_panel(ui, &mut action);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().inner_margin(10.0))
            .show(ctx, |ui| {
                self.image_view.show(ui, &self.processor);
            });

        self.message_window(ctx);

        if let Some(action) = action {
            self.run(action, ctx);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.settings.save();
        info!("session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields<const N: usize>(values: [&str; N]) -> [String; N] {
        values.map(str::to_string)
    }

    #[test]
    fn fields_parse_as_whole_numbers() {
        assert_eq!(parse_fields(&fields(["0", " 10", "-3 ", "42"])).unwrap(), [0, 10, -3, 42]);
    }

    #[test]
    fn bad_field_is_reported_verbatim() {
        let err = parse_fields(&fields(["1", "2.5", "3"])).unwrap_err();
        assert!(matches!(err, EditorError::InvalidNumber(ref s) if s == "2.5"));
        assert!(parse_fields(&fields([""])).is_err());
    }

    #[test]
    fn every_error_has_a_message() {
        let errors = [
            EditorError::NoImage,
            EditorError::FileNotFound("a.png".into()),
            EditorError::EmptyFile("a.png".into()),
            EditorError::UnsupportedFormat("gif".into()),
            EditorError::CameraUnavailable("busy".into()),
            EditorError::EmptyCropRegion { x1: 1, y1: 1, x2: 1, y2: 1 },
            EditorError::NonPositiveRadius(0),
            EditorError::InvalidAngle(f64::NAN),
            EditorError::InvalidNumber("x".into()),
        ];
        for err in &errors {
            assert!(!user_message(err).is_empty());
        }
    }
}
