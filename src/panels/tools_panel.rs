use egui::color_picker::{Alpha, color_edit_button_srgba};

use crate::PaintApp;
use crate::state::EditorMode;
use crate::symmetry::SymmetryMode;
use crate::tools::Tool;

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                for (mode, label) in [(EditorMode::Pixel, "Pixel"), (EditorMode::Sketch, "Sketch")] {
                    if ui.selectable_label(app.editor.mode() == mode, label).clicked() {
                        app.editor.set_mode(mode);
                    }
                }
            });
            ui.separator();

            ui.heading("Tools");
            let active = app.editor.tool();
            for tool in Tool::for_mode(app.editor.mode()) {
                if ui.selectable_label(active == tool, tool.name()).clicked() && active != tool {
                    log::info!("Tool selected from UI: {}", tool.name());
                    if let Err(err) = app.editor.set_tool(tool) {
                        app.status = Some(err.to_string());
                    }
                }
            }
            ui.separator();

            let state = app.editor.state();
            let (mut primary, mut secondary) = (state.primary_color, state.secondary_color);
            ui.horizontal(|ui| {
                ui.label("Colors:");
                if color_edit_button_srgba(ui, &mut primary, Alpha::Opaque).changed() {
                    app.editor.set_primary_color(primary);
                }
                if color_edit_button_srgba(ui, &mut secondary, Alpha::Opaque).changed() {
                    app.editor.set_secondary_color(secondary);
                }
                if ui.small_button("⇄").on_hover_text("Swap colors").clicked() {
                    app.editor.swap_colors();
                }
            });

            match app.editor.mode() {
                EditorMode::Pixel => {
                    let current = app.editor.state().symmetry;
                    let mut symmetry = current;
                    egui::ComboBox::from_label("Symmetry")
                        .selected_text(format!("{current:?}"))
                        .show_ui(ui, |ui| {
                            for mode in SymmetryMode::all() {
                                ui.selectable_value(&mut symmetry, *mode, format!("{mode:?}"));
                            }
                        });
                    if symmetry != current {
                        app.editor.set_symmetry(symmetry);
                    }
                    let mut show_grid = app.editor.state().show_grid;
                    if ui.checkbox(&mut show_grid, "Grid lines").changed() {
                        app.editor.toggle_grid();
                    }
                }
                EditorMode::Sketch => {
                    let max_size = app.editor.config().max_brush_size;
                    let mut brush = app.editor.state().brush;
                    let mut changed = false;
                    changed |= ui.add(egui::Slider::new(&mut brush.size, 1.0..=max_size).text("Size")).changed();
                    changed |= ui.add(egui::Slider::new(&mut brush.opacity, 0.0..=1.0).text("Opacity")).changed();
                    changed |= ui.add(egui::Slider::new(&mut brush.hardness, 0.0..=1.0).text("Hardness")).changed();
                    changed |= ui.add(egui::Slider::new(&mut brush.flow, 0.0..=1.0).text("Flow")).changed();
                    if changed {
                        app.editor.set_brush_settings(brush);
                    }
                    if app.editor.state().selection.is_some() && ui.button("Deselect").clicked() {
                        app.editor.clear_selection();
                    }
                }
            }
            ui.separator();

            // Undo/Redo section
            ui.horizontal(|ui| {
                let history = app.editor.history();
                let undo_hint = history.undo_description().map(|label| format!("Undo {label}"));
                let redo_hint = history.redo_description().map(|label| format!("Redo {label}"));
                let mut undo = ui.add_enabled(app.editor.can_undo(), egui::Button::new("Undo"));
                if let Some(hint) = undo_hint {
                    undo = undo.on_hover_text(hint);
                }
                if undo.clicked() {
                    app.editor.undo();
                }
                let mut redo = ui.add_enabled(app.editor.can_redo(), egui::Button::new("Redo"));
                if let Some(hint) = redo_hint {
                    redo = redo.on_hover_text(hint);
                }
                if redo.clicked() {
                    app.editor.redo();
                }
            });

            let history = app.editor.history();
            ui.horizontal(|ui| {
                ui.label(format!("Undo stack size: {}", history.undo_count()));
                ui.label(format!("Redo stack size: {}", history.redo_count()));
            });
            egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
                egui::Grid::new("command_history_grid")
                    .num_columns(1)
                    .striped(true)
                    .show(ui, |ui| {
                        // newest first
                        for entry in history.entries().collect::<Vec<_>>().into_iter().rev() {
                            ui.label(&entry.label);
                            ui.end_row();
                        }
                    });
            });
        });
}
