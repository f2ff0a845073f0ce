#![warn(clippy::all, rust_2018_idioms)]

use pixsketch::PaintApp;
use pixsketch::config::EditorConfig;

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    // PIXSKETCH_CONFIG points at a JSON file of editor defaults
    let config = std::env::var_os("PIXSKETCH_CONFIG").and_then(|path| match std::fs::read_to_string(&path) {
        Ok(json) => Some(EditorConfig::from_json(&json)),
        Err(err) => {
            log::warn!("Could not read config {}: {err}", path.to_string_lossy());
            None
        }
    });

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "pixsketch",
        native_options,
        Box::new(|cc| Ok(Box::new(PaintApp::new(cc, config)))),
    )
}
