use crate::PaintApp;
use crate::blend::BlendMode;
use crate::command::Command;
use crate::state::EditorMode;

pub fn layers_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::right("layers_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| match app.editor.mode() {
            EditorMode::Pixel => sprites(app, ui),
            EditorMode::Sketch => layers(app, ui),
        });
}

fn sprites(app: &mut PaintApp, ui: &mut egui::Ui) {
    ui.heading("Sprites");
    let sheet = &app.editor.state().sprites;
    let current = sheet.current_index();
    let names: Vec<String> = sheet.sprites().iter().map(|s| s.name.clone()).collect();

    for (index, name) in names.iter().enumerate() {
        if ui.selectable_label(index == current, name).clicked() && index != current {
            if let Err(err) = app.editor.switch_sprite(index) {
                app.status = Some(err.to_string());
            }
        }
    }

    let mut name = names.get(current).cloned().unwrap_or_default();
    let response = ui.text_edit_singleline(&mut name);
    if response.lost_focus() && Some(&name) != names.get(current) {
        app.run_command(Command::RenameSprite { index: current, name });
    }

    ui.horizontal(|ui| {
        if ui.button("Add").clicked() {
            let name = format!("Sprite {}", names.len() + 1);
            app.run_command(Command::AddSprite { name });
        }
        if ui.button("Duplicate").clicked() {
            app.run_command(Command::DuplicateSprite(current));
        }
        if ui.add_enabled(names.len() > 1, egui::Button::new("Delete")).clicked() {
            app.run_command(Command::DeleteSprite(current));
        }
    });
}

fn layers(app: &mut PaintApp, ui: &mut egui::Ui) {
    ui.heading("Layers");
    let stack = &app.editor.state().layers;
    let current = stack.current_index();
    let count = stack.len();
    let rows: Vec<(String, bool)> = stack.layers().iter().map(|l| (l.name.clone(), l.visible)).collect();
    let (opacity, blend_mode) = (stack.current().opacity, stack.current().blend_mode);

    // topmost layer first
    for (index, (name, visible)) in rows.iter().enumerate().rev() {
        ui.horizontal(|ui| {
            let mut shown = *visible;
            if ui.checkbox(&mut shown, "").changed() {
                app.run_command(Command::SetLayerVisibility { index, visible: shown });
            }
            if ui.selectable_label(index == current, name).clicked() && index != current {
                if let Err(err) = app.editor.select_layer(index) {
                    app.status = Some(err.to_string());
                }
            }
        });
    }

    let mut name = rows.get(current).map(|(name, _)| name.clone()).unwrap_or_default();
    let response = ui.text_edit_singleline(&mut name);
    if response.lost_focus() && Some(&name) != rows.get(current).map(|(name, _)| name) {
        app.run_command(Command::RenameLayer { index: current, name });
    }

    // one history entry per slider drag, not one per frame
    let mut draft = app.opacity_draft.unwrap_or(opacity);
    let slider = ui.add(egui::Slider::new(&mut draft, 0.0..=1.0).text("Opacity"));
    if slider.dragged() {
        app.opacity_draft = Some(draft);
    } else if slider.drag_stopped() || slider.changed() {
        app.opacity_draft = None;
        if draft != opacity {
            app.run_command(Command::SetLayerOpacity { index: current, opacity: draft });
        }
    }

    let mut mode = blend_mode;
    egui::ComboBox::from_label("Blend")
        .selected_text(blend_mode.name())
        .show_ui(ui, |ui| {
            for candidate in BlendMode::all() {
                ui.selectable_value(&mut mode, *candidate, candidate.name());
            }
        });
    if mode != blend_mode {
        app.run_command(Command::SetLayerBlendMode { index: current, mode });
    }

    ui.horizontal(|ui| {
        if ui.button("Add").clicked() {
            app.run_command(Command::AddLayer);
        }
        if ui.add_enabled(count > 1, egui::Button::new("Delete")).clicked() {
            app.run_command(Command::DeleteLayer(current));
        }
        if ui.add_enabled(current + 1 < count, egui::Button::new("Up")).clicked() {
            app.run_command(Command::MoveLayer { from: current, to: current + 1 });
        }
        if ui.add_enabled(current > 0, egui::Button::new("Down")).clicked() {
            app.run_command(Command::MoveLayer { from: current, to: current - 1 });
        }
    });
}
