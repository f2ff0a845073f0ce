use egui::{Color32, ColorImage, Painter, Pos2, Rect, Stroke, TextureHandle, TextureOptions, Vec2};

use crate::state::{EditorContext, EditorMode};

const CHECKER_LIGHT: Color32 = Color32::from_gray(204);
const CHECKER_DARK: Color32 = Color32::from_gray(160);
const GRID_LINE: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 60);
const SELECTION_STROKE: Color32 = Color32::from_rgb(33, 150, 243);

/// The image of the active canvas, one texel per cell or canvas pixel.
/// Empty cells and transparent pixels stay transparent; the checkerboard
/// behind them is drawn by [`Renderer::paint`].
pub fn frame_image(editor: &EditorContext) -> ColorImage {
    let state = editor.state();
    match state.mode {
        EditorMode::Pixel => {
            let grid = &state.grid;
            let mut image = ColorImage::new([grid.width(), grid.height()], Color32::TRANSPARENT);
            for (y, row) in grid.rows().iter().enumerate() {
                for (x, cell) in row.iter().enumerate() {
                    if let Some(color) = cell {
                        image[(x, y)] = *color;
                    }
                }
            }
            image
        }
        EditorMode::Sketch => {
            let flat = state.layers.composite();
            let size = [flat.width() as usize, flat.height() as usize];
            ColorImage::from_rgba_unmultiplied(size, flat.as_raw())
        }
    }
}

/// Fits a `canvas` sized image into `available`, centred. Pixel canvases
/// get a whole number of screen points per cell so cells stay square.
pub fn fit_canvas(available: Rect, canvas: (u32, u32), mode: EditorMode) -> (Rect, f32) {
    let (w, h) = (canvas.0.max(1) as f32, canvas.1.max(1) as f32);
    let mut scale = (available.width() / w).min(available.height() / h);
    if mode == EditorMode::Pixel && scale >= 1.0 {
        scale = scale.floor();
    }
    let scale = scale.max(f32::EPSILON);
    let rect = Rect::from_center_size(available.center(), Vec2::new(w * scale, h * scale));
    (rect, scale)
}

/// Keeps the canvas texture in step with the editor.
///
/// The texture is rebuilt only when [`EditorContext::revision`] moves, so
/// an idle editor costs one textured quad per frame.
#[derive(Default)]
pub struct Renderer {
    texture: Option<TextureHandle>,
    synced_revision: Option<u64>,
    synced_mode: Option<EditorMode>,
    rebuilds: usize,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("synced_revision", &self.synced_revision)
            .field("rebuilds", &self.rebuilds)
            .finish()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the texture has been rebuilt.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    pub fn is_stale(&self, editor: &EditorContext) -> bool {
        self.synced_revision != Some(editor.revision()) || self.synced_mode != Some(editor.mode())
    }

    /// Uploads a fresh frame if the editor changed since the last sync.
    pub fn sync(&mut self, ctx: &egui::Context, editor: &EditorContext) -> &TextureHandle {
        let stale = self.is_stale(editor);
        let options = match editor.mode() {
            EditorMode::Pixel => TextureOptions::NEAREST,
            EditorMode::Sketch => TextureOptions::LINEAR,
        };
        if stale {
            self.rebuilds += 1;
            self.synced_revision = Some(editor.revision());
            self.synced_mode = Some(editor.mode());
        }
        let mut fresh = false;
        let texture = self.texture.get_or_insert_with(|| {
            fresh = true;
            ctx.load_texture("canvas", frame_image(editor), options)
        });
        if stale && !fresh {
            texture.set(frame_image(editor), options);
        }
        texture
    }

    /// Draws the canvas into `rect`: checkerboard, the frame, grid lines in
    /// pixel mode and the selection outline in sketch mode.
    pub fn paint(&mut self, ctx: &egui::Context, painter: &Painter, rect: Rect, editor: &EditorContext) {
        let (w, h) = editor.state().canvas_size();
        let scale = rect.width() / w.max(1) as f32;

        paint_checkerboard(painter, rect, scale.max(8.0));
        let texture = self.sync(ctx, editor);
        painter.image(
            texture.id(),
            rect,
            Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
            Color32::WHITE,
        );

        let state = editor.state();
        if state.mode == EditorMode::Pixel && state.show_grid && scale >= 4.0 {
            let stroke = Stroke::new(1.0, GRID_LINE);
            for x in 0..=w {
                let sx = rect.min.x + x as f32 * scale;
                painter.line_segment([Pos2::new(sx, rect.min.y), Pos2::new(sx, rect.max.y)], stroke);
            }
            for y in 0..=h {
                let sy = rect.min.y + y as f32 * scale;
                painter.line_segment([Pos2::new(rect.min.x, sy), Pos2::new(rect.max.x, sy)], stroke);
            }
        }

        let to_screen = |canvas: Rect| {
            Rect::from_min_max(
                rect.min + canvas.min.to_vec2() * scale,
                rect.min + canvas.max.to_vec2() * scale,
            )
        };
        let stroke = Stroke::new(1.5, SELECTION_STROKE);
        if let Some(selection) = &state.selection {
            painter.rect_stroke(to_screen(selection.rect.to_rect()), 0.0, stroke);
        }
        if let Some((start, current)) = editor.interaction().pending_selection() {
            painter.rect_stroke(to_screen(Rect::from_two_pos(start, current)), 0.0, stroke);
        }
    }
}

fn paint_checkerboard(painter: &Painter, rect: Rect, tile: f32) {
    painter.rect_filled(rect, 0.0, CHECKER_LIGHT);
    let cols = (rect.width() / tile).ceil() as usize;
    let rows = (rect.height() / tile).ceil() as usize;
    for row in 0..rows {
        for col in (row % 2..cols).step_by(2) {
            let min = rect.min + Vec2::new(col as f32 * tile, row as f32 * tile);
            let cell = Rect::from_min_size(min, Vec2::splat(tile)).intersect(rect);
            painter.rect_filled(cell, 0.0, CHECKER_DARK);
        }
    }
}
