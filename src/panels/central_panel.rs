use crate::PaintApp;
use crate::renderer::fit_canvas;

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let available = ui.available_rect_before_wrap();
        let (canvas_rect, scale) = fit_canvas(available, app.editor.state().canvas_size(), app.editor.mode());
        let response = ui.allocate_rect(available, egui::Sense::drag());
        app.input.set_canvas(canvas_rect, scale);

        // Handle input; a running gesture keeps receiving events after the
        // pointer leaves the canvas so it can still be released
        if app.pending_confirmation().is_none() && (response.hovered() || app.editor.is_gesture_active()) {
            for event in app.input.process_input(ctx) {
                app.editor.handle_pointer(event);
            }
        }

        // Render the canvas
        app.renderer.paint(ctx, ui.painter(), canvas_rect, &app.editor);
    });
}
