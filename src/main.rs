use clap::Parser;
use eframe::egui;
use log::info;

use image_editor::app::ImageEditorApp;
use image_editor::cli::CliArgs;
use image_editor::settings::EditorSettings;
use image_editor::{i18n, logger};

fn main() -> Result<(), eframe::Error> {
    let args = CliArgs::parse();

    // Initialize session log (overwrites previous session log)
    logger::init();

    // Initialize the internationalization system
    i18n::init();

    let settings = EditorSettings::load();
    info!("settings: {:?}", settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Image Editor"),
        ..Default::default()
    };

    eframe::run_native(
        "image-editor",
        options,
        Box::new(move |cc| Box::new(ImageEditorApp::new(cc, settings, args.file))),
    )
}
