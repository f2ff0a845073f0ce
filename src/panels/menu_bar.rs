use crate::PaintApp;
use crate::command::Command;
use crate::state::EditorMode;

pub fn menu_bar(app: &mut PaintApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("New project").clicked() {
                    let (width, height) = match app.editor.mode() {
                        EditorMode::Pixel => (app.editor.config().grid_width as u32, app.editor.config().grid_height as u32),
                        EditorMode::Sketch => (app.editor.config().sketch_width, app.editor.config().sketch_height),
                    };
                    app.run_command(Command::NewProject { width, height });
                    ui.close_menu();
                }
                if ui.button("Save").clicked() {
                    app.save_project();
                    ui.close_menu();
                }
                if ui.button("Open").clicked() {
                    app.open_project();
                    ui.close_menu();
                }
                ui.separator();
                for scale in [1, 4, 8] {
                    if ui.button(format!("Export PNG ×{scale}")).clicked() {
                        app.export_png(scale);
                        ui.close_menu();
                    }
                }
            });
            ui.menu_button("Canvas", |ui| {
                for (label, command) in [
                    ("Rotate 90°", Command::RotateClockwise),
                    ("Flip horizontal", Command::FlipHorizontal),
                    ("Flip vertical", Command::FlipVertical),
                    ("Clear", Command::Clear),
                ] {
                    if ui.button(label).clicked() {
                        app.run_command(command);
                        ui.close_menu();
                    }
                }
                ui.separator();
                ui.horizontal(|ui| {
                    ui.add(egui::DragValue::new(&mut app.resize_to.0).range(1..=1024));
                    ui.label("×");
                    ui.add(egui::DragValue::new(&mut app.resize_to.1).range(1..=1024));
                    if ui.button("Resize").clicked() {
                        let (width, height) = app.resize_to;
                        app.run_command(Command::Resize { width, height });
                        ui.close_menu();
                    }
                });
            });

            ui.separator();
            if let Some(status) = &app.status {
                ui.label(status);
            }
        });
    });
}
