//! The controller that owns the editor state and coordinates every change.
//!
//! The `EditorContext` is the single entry point for callers: pointer
//! events, commands, undo/redo, tool and color changes, export and project
//! load/save all go through it. Each mutation bumps [`EditorContext::revision`]
//! so a renderer can tell when its cached frame is stale.
//!
//! # Gestures
//!
//! Pointer input arrives as `press → move* → release | cancel`. A gesture
//! takes at most one history snapshot, before its first change; pixel
//! strokes that change nothing take none. A release extends the gesture to
//! the release position. Cancelling ends it at the last known position.
//!
//! # Example
//!
//! ```rust
//! use egui::Pos2;
//! use pixsketch::input::PointerEvent;
//! use pixsketch::state::EditorContext;
//!
//! let mut editor = EditorContext::new();
//! editor.handle_pointer(PointerEvent::press(Pos2::new(1.5, 1.5)));
//! editor.handle_pointer(PointerEvent::release(Pos2::new(1.5, 1.5)));
//! assert!(editor.state().grid.get(1, 1).is_some());
//! assert!(editor.undo());
//! assert!(editor.state().grid.get(1, 1).is_none());
//! ```

use std::io::Cursor;

use egui::{Color32, Pos2};
use image::{ImageFormat, RgbaImage, imageops};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::editor_state::{EditorMode, EditorState};
use super::interaction::Interaction;
use super::persistence::{self, ProjectFile};
use crate::brush::{self, BrushSettings};
use crate::command::{Command, CommandResult, HistoryManager};
use crate::config::EditorConfig;
use crate::error::{EditorError, EditorResult};
use crate::grid::Cell;
use crate::input::{PointerEvent, PointerPhase, PointerTracker, Route, route};
use crate::raster;
use crate::selection::{MoveDrag, Selection, SelectionRect};
use crate::shape::ShapeController;
use crate::symmetry::SymmetryMode;
use crate::tools::Tool;

fn cell_at(pos: Pos2) -> (i32, i32) {
    (pos.x.floor() as i32, pos.y.floor() as i32)
}

#[derive(Debug)]
pub struct EditorContext {
    config: EditorConfig,
    state: EditorState,
    history: HistoryManager,
    tracker: PointerTracker,
    interaction: Interaction,
    shapes: ShapeController,
    rng: StdRng,
    revision: u64,
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorContext {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            state: EditorState::new(&config),
            history: HistoryManager::new(config.history_capacity),
            tracker: PointerTracker::new(),
            interaction: Interaction::Idle,
            shapes: ShapeController::new(),
            rng: StdRng::from_entropy(),
            revision: 0,
            config,
        }
    }

    /// Replaces the brush randomness with a fixed seed.
    pub fn seed_brushes(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn mode(&self) -> EditorMode {
        self.state.mode
    }

    pub fn tool(&self) -> Tool {
        self.state.tool
    }

    /// Bumped by every change to what is displayed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    // ---- modes and tools ------------------------------------------------

    /// Switches between pixel and sketch mode. Any gesture is finished, the
    /// selection is dropped and history is cleared, since entries of one
    /// mode cannot be applied in the other.
    pub fn set_mode(&mut self, mode: EditorMode) {
        if self.state.mode == mode {
            return;
        }
        self.finish_gesture();
        self.state.mode = mode;
        self.state.selection = None;
        if !self.state.tool.available_in(mode) {
            self.state.tool = Tool::default_for(mode);
        }
        self.history.clear();
        self.shapes.reset();
        log::info!("Switched to {mode:?} mode");
        self.bump();
    }

    pub fn set_tool(&mut self, tool: Tool) -> EditorResult<()> {
        if !tool.available_in(self.state.mode) {
            let expected = if self.state.mode == EditorMode::Pixel {
                EditorMode::Sketch
            } else {
                EditorMode::Pixel
            };
            log::warn!("{} is not available in {:?} mode", tool.name(), self.state.mode);
            return Err(EditorError::WrongMode {
                expected,
                actual: self.state.mode,
            });
        }
        self.finish_gesture();
        log::debug!("Tool changed: {} -> {}", self.state.tool.name(), tool.name());
        self.state.tool = tool;
        Ok(())
    }

    pub fn set_primary_color(&mut self, color: Color32) {
        self.state.primary_color = color;
    }

    pub fn set_secondary_color(&mut self, color: Color32) {
        self.state.secondary_color = color;
    }

    pub fn swap_colors(&mut self) {
        std::mem::swap(&mut self.state.primary_color, &mut self.state.secondary_color);
    }

    pub fn set_symmetry(&mut self, symmetry: SymmetryMode) {
        self.state.symmetry = symmetry;
        self.bump();
    }

    pub fn cycle_symmetry(&mut self) {
        self.set_symmetry(self.state.symmetry.next());
    }

    pub fn set_brush_settings(&mut self, settings: BrushSettings) {
        self.state.brush = settings.sanitized(self.config.max_brush_size);
    }

    pub fn toggle_grid(&mut self) {
        self.state.show_grid = !self.state.show_grid;
        self.bump();
    }

    pub fn select_layer(&mut self, index: usize) -> EditorResult<()> {
        self.state.require_mode(EditorMode::Sketch)?;
        self.finish_gesture();
        self.state.layers.select(index)?;
        self.state.selection = None;
        self.bump();
        Ok(())
    }

    /// Stores the live grid into the current sprite and loads `index`.
    pub fn switch_sprite(&mut self, index: usize) -> EditorResult<()> {
        self.state.require_mode(EditorMode::Pixel)?;
        self.finish_gesture();
        self.state.sprites.switch_to(index, &mut self.state.grid)?;
        self.bump();
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        if self.state.selection.take().is_some() {
            self.bump();
        }
    }

    // ---- commands and history ----------------------------------------------

    /// Whether `command` would throw away drawn content.
    pub fn would_discard_data(&self, command: &Command) -> bool {
        command.destructive_action().is_some() && command.would_discard_data(&self.state)
    }

    /// Executes a command, refusing destructive ones that would lose
    /// content until they are confirmed through [`Self::execute_confirmed`].
    pub fn execute(&mut self, command: Command) -> CommandResult {
        if self.would_discard_data(&command) {
            if let Some(action) = command.destructive_action() {
                log::warn!("{} needs confirmation", command.label());
                return Err(EditorError::ConfirmationRequired(action));
            }
        }
        self.run(command)
    }

    /// Executes a command the user has already confirmed.
    pub fn execute_confirmed(&mut self, command: Command) -> CommandResult {
        self.run(command)
    }

    fn run(&mut self, command: Command) -> CommandResult {
        self.finish_gesture();
        if let Err(err) = command.validate(&self.state) {
            log::warn!("Rejected {}: {err}", command.label());
            return Err(err);
        }
        if command.is_recorded() {
            self.history.snapshot(command.label(), &self.state);
        }
        command.apply(&mut self.state)?;
        if !command.is_recorded() {
            self.history.clear();
            self.shapes.reset();
        }
        log::debug!("Executed {}", command.label());
        self.bump();
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Returns false when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.finish_gesture();
        let undone = self.history.undo(&mut self.state).is_some();
        if undone {
            self.bump();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        self.finish_gesture();
        let redone = self.history.redo(&mut self.state).is_some();
        if redone {
            self.bump();
        }
        redone
    }

    // ---- pointer input ----------------------------------------------------------

    pub fn is_gesture_active(&self) -> bool {
        self.tracker.is_active()
    }

    /// Feeds one pointer event. Returns false when the event was ignored,
    /// e.g. a second pointer while another is down.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let Some(event) = self.tracker.accept(event) else {
            return false;
        };
        match event.phase {
            PointerPhase::Press => self.pointer_down(event),
            PointerPhase::Move => self.pointer_move(event.pos),
            PointerPhase::Release => {
                self.pointer_move(event.pos);
                self.finish_gesture();
            }
            PointerPhase::Cancel => self.finish_gesture(),
        }
        true
    }

    fn pointer_down(&mut self, event: PointerEvent) {
        let secondary = crate::input::uses_secondary(event.button);
        let pos = event.pos;
        let route = route(self.state.mode, self.state.tool);
        let label = self.state.tool.name();
        match route {
            Route::GridPaint { erase } => {
                // the snapshot waits for the first cell that actually changes
                self.interaction = Interaction::Drawing {
                    route,
                    secondary,
                    last: pos,
                    recorded: false,
                };
                let cell = self.state.paint_cell(secondary, erase);
                let at = cell_at(pos);
                self.paint_grid_segment(at, at, cell);
            }
            Route::GridFill => {
                let cell = self.state.paint_cell(secondary, false);
                self.fill(cell_at(pos), cell);
            }
            Route::GridShape(kind) => {
                self.history.snapshot(label, &self.state);
                let cell = self.state.paint_cell(secondary, false);
                let symmetry = self.state.symmetry;
                self.shapes
                    .begin(&mut self.state.grid, kind, cell_at(pos), cell, symmetry);
                self.interaction = Interaction::Shaping;
            }
            Route::Pick => self.pick_color(pos, secondary),
            Route::LayerBrush(_) | Route::LayerErase => {
                self.history.snapshot(label, &self.state);
                self.brush_segment(route, secondary, None, pos);
                self.interaction = Interaction::Drawing {
                    route,
                    secondary,
                    last: pos,
                    recorded: true,
                };
            }
            Route::Select => {
                self.state.selection = None;
                self.interaction = Interaction::Selecting {
                    start: pos,
                    current: pos,
                };
            }
            Route::Move => {
                self.history.snapshot(label, &self.state);
                let drag = MoveDrag::begin(
                    &mut self.state.layers.current_mut().surface,
                    self.state.selection.as_mut(),
                    pos,
                );
                self.interaction = Interaction::Moving(drag);
            }
            Route::Ignored => {
                log::debug!("{label} does nothing in {:?} mode", self.state.mode);
                return;
            }
        }
        self.bump();
    }

    fn pointer_move(&mut self, pos: Pos2) {
        match &mut self.interaction {
            Interaction::Idle => return,
            Interaction::Drawing {
                route,
                secondary,
                last,
                ..
            } => {
                let (route, secondary, from) = (*route, *secondary, *last);
                if pos == from {
                    return;
                }
                *last = pos;
                match route {
                    Route::GridPaint { erase } => {
                        let cell = self.state.paint_cell(secondary, erase);
                        self.paint_grid_segment(cell_at(from), cell_at(pos), cell);
                    }
                    _ => self.brush_segment(route, secondary, Some(from), pos),
                }
            }
            Interaction::Shaping => self.shapes.update(&mut self.state.grid, cell_at(pos)),
            Interaction::Selecting { current, .. } => *current = pos,
            Interaction::Moving(drag) => drag.update(&mut self.state.layers.current_mut().surface, pos),
        }
        self.bump();
    }

    /// Ends the current gesture at its last known position, exactly as a
    /// release would.
    fn finish_gesture(&mut self) {
        self.tracker.reset();
        match std::mem::take(&mut self.interaction) {
            Interaction::Idle | Interaction::Drawing { .. } => {}
            Interaction::Shaping => {
                self.shapes.end(&self.state.grid);
            }
            Interaction::Selecting { start, current } => {
                self.state.selection =
                    SelectionRect::from_drag(start, current, self.config.selection_min_size).map(Selection::new);
                self.bump();
            }
            Interaction::Moving(drag) => {
                let (dx, dy) = drag.finish(self.state.selection.as_mut());
                log::debug!("Moved by ({dx}, {dy})");
            }
        }
    }

    /// Mirroring for the active tool: none unless the tool is symmetric.
    fn tool_symmetry(&self) -> SymmetryMode {
        if self.state.tool.is_symmetric() {
            self.state.symmetry
        } else {
            SymmetryMode::None
        }
    }

    /// Paints a grid segment plus its mirror images. The stroke's history
    /// entry is taken just before its first visible change.
    fn paint_grid_segment(&mut self, from: (i32, i32), to: (i32, i32), cell: Cell) {
        let mut painted = self.state.grid.clone();
        raster::draw_line(&mut painted, from.0, from.1, to.0, to.1, cell);
        let (w, h) = (painted.width(), painted.height());
        for reflection in self.tool_symmetry().reflections() {
            let a = reflection.apply(from.0, from.1, w, h);
            let b = reflection.apply(to.0, to.1, w, h);
            raster::draw_line(&mut painted, a.0, a.1, b.0, b.1, cell);
        }
        if painted == self.state.grid {
            return;
        }
        if let Interaction::Drawing { recorded, .. } = &mut self.interaction {
            if !*recorded {
                *recorded = true;
                self.history.snapshot(self.state.tool.name(), &self.state);
            }
        }
        self.state.grid = painted;
    }

    /// Flood fills from the seed and every mirrored seed independently.
    /// Takes no snapshot when nothing would change.
    fn fill(&mut self, seed: (i32, i32), cell: Cell) {
        let symmetry = self.tool_symmetry();
        let grid = &self.state.grid;
        let mut seeds = vec![seed];
        seeds.extend(symmetry.positions_for(seed.0, seed.1, grid.width(), grid.height()));
        let changes = seeds
            .iter()
            .any(|&(x, y)| grid.contains(x, y) && grid.get(x, y) != cell);
        if !changes {
            return;
        }
        self.history.snapshot("Fill", &self.state);
        let filled: usize = seeds
            .into_iter()
            .map(|(x, y)| raster::flood_fill(&mut self.state.grid, x, y, cell))
            .sum();
        log::debug!("Filled {filled} cells");
    }

    fn brush_segment(&mut self, route: Route, secondary: bool, from: Option<Pos2>, to: Pos2) {
        let settings = self.state.brush;
        let color = self.state.paint_color(secondary);
        let surface = &mut self.state.layers.current_mut().surface;
        match route {
            Route::LayerBrush(kind) => brush::paint(surface, kind, from, to, color, &settings, &mut self.rng),
            Route::LayerErase => brush::erase(surface, from, to, &settings),
            _ => {}
        }
    }

    fn pick_color(&mut self, pos: Pos2, secondary: bool) {
        let (x, y) = cell_at(pos);
        let picked = match self.state.mode {
            EditorMode::Pixel => self.state.grid.get(x, y),
            EditorMode::Sketch if x >= 0 && y >= 0 => self
                .state
                .layers
                .composite_pixel(x as u32, y as u32)
                .filter(|px| px[3] > 0)
                .map(|px| Color32::from_rgb(px[0], px[1], px[2])),
            EditorMode::Sketch => None,
        };
        if let Some(color) = picked {
            if secondary {
                self.state.secondary_color = color;
            } else {
                self.state.primary_color = color;
            }
        }
    }

    // ---- export and projects ----------------------------------------------

    /// The flattened image of the active canvas, each canvas pixel drawn as
    /// a `scale × scale` block.
    pub fn export_image(&self, scale: u32) -> RgbaImage {
        let scale = scale.max(1);
        match self.state.mode {
            EditorMode::Pixel => self.state.grid.to_image(scale),
            EditorMode::Sketch => {
                let flat = self.state.layers.composite();
                if scale == 1 {
                    flat
                } else {
                    imageops::resize(
                        &flat,
                        flat.width() * scale,
                        flat.height() * scale,
                        imageops::FilterType::Nearest,
                    )
                }
            }
        }
    }

    /// PNG bytes of [`Self::export_image`].
    pub fn export_png(&self, scale: u32) -> EditorResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.export_image(scale)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|err| EditorError::Encode(err.to_string()))?;
        log::info!("Exported {} byte PNG", bytes.len());
        Ok(bytes)
    }

    /// Serializes the whole project.
    pub fn save_project(&self) -> EditorResult<String> {
        Ok(ProjectFile::from_state(&self.state)?.to_json()?)
    }

    /// Loads a saved project. Every layer is decoded before the new state is
    /// swapped in; on any failure the editor is left untouched.
    pub async fn load_project(&mut self, json: &str) -> EditorResult<()> {
        let loaded = persistence::load_state(json, &self.state).await.map_err(|err| {
            log::error!("Project load failed: {err}");
            EditorError::CorruptProjectFile(err.to_string())
        })?;
        self.finish_gesture();
        self.state = loaded;
        self.history.clear();
        self.shapes.reset();
        log::info!("Loaded {:?} project", self.state.mode);
        self.bump();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::PointerButton;

    fn drag(editor: &mut EditorContext, points: &[(f32, f32)]) {
        let (first, rest) = points.split_first().unwrap();
        editor.handle_pointer(PointerEvent::press(Pos2::new(first.0, first.1)));
        for &(x, y) in rest {
            editor.handle_pointer(PointerEvent::moved(Pos2::new(x, y)));
        }
        let (x, y) = *points.last().unwrap();
        editor.handle_pointer(PointerEvent::release(Pos2::new(x, y)));
    }

    #[test]
    fn a_drag_is_one_history_entry() {
        let mut editor = EditorContext::new();
        drag(&mut editor, &[(0.5, 0.5), (3.5, 0.5), (6.5, 0.5)]);
        assert_eq!(editor.history().undo_count(), 1);
        // interpolated, so no gaps
        for x in 0..=6 {
            assert_eq!(editor.state().grid.get(x, 0), Some(Color32::BLACK));
        }
    }

    #[test]
    fn secondary_button_paints_secondary_color() {
        let mut editor = EditorContext::new();
        editor.set_secondary_color(Color32::RED);
        editor.handle_pointer(PointerEvent::press(Pos2::new(2.0, 2.0)).with_button(PointerButton::Secondary));
        editor.handle_pointer(PointerEvent::release(Pos2::new(2.0, 2.0)).with_button(PointerButton::Secondary));
        assert_eq!(editor.state().grid.get(2, 2), Some(Color32::RED));
    }

    #[test]
    fn symmetric_pencil_mirrors() {
        let mut editor = EditorContext::new();
        editor.set_symmetry(SymmetryMode::Both);
        drag(&mut editor, &[(1.0, 2.0)]);
        let grid = &editor.state().grid;
        for (x, y) in [(1, 2), (14, 2), (1, 13), (14, 13)] {
            assert!(grid.get(x, y).is_some(), "({x}, {y})");
        }
    }

    #[test]
    fn fill_without_change_takes_no_snapshot() {
        let mut editor = EditorContext::new();
        editor.set_tool(Tool::Fill).unwrap();
        editor.set_primary_color(Color32::GREEN);
        drag(&mut editor, &[(0.0, 0.0)]);
        assert_eq!(editor.history().undo_count(), 1);
        drag(&mut editor, &[(5.0, 5.0)]);
        assert_eq!(editor.history().undo_count(), 1);
        assert_eq!(editor.state().grid.get(15, 15), Some(Color32::GREEN));
    }

    #[test]
    fn cancelled_shape_commits_last_preview() {
        let mut editor = EditorContext::new();
        editor.set_tool(Tool::Line).unwrap();
        editor.handle_pointer(PointerEvent::press(Pos2::new(0.0, 0.0)));
        editor.handle_pointer(PointerEvent::moved(Pos2::new(5.0, 5.0)));
        editor.handle_pointer(PointerEvent::moved(Pos2::new(5.0, 0.0)));
        editor.handle_pointer(PointerEvent::cancel(Pos2::new(5.0, 0.0)));
        let grid = &editor.state().grid;
        assert!(grid.get(3, 0).is_some());
        // earlier preview frames do not linger
        assert!(grid.get(3, 3).is_none());
        assert!(!editor.is_gesture_active());
    }

    #[test]
    fn symmetric_fill_seeds_fill_independently() {
        let mut editor = EditorContext::new();
        // an enclosed box on the left, nothing at its mirror image
        raster::draw_rect(&mut editor.state.grid, 1, 1, 4, 4, Some(Color32::BLACK), false);
        editor.set_symmetry(SymmetryMode::Vertical);
        editor.set_tool(Tool::Fill).unwrap();
        editor.set_primary_color(Color32::GREEN);
        drag(&mut editor, &[(2.0, 2.0)]);

        let grid = &editor.state().grid;
        assert_eq!(grid.get(2, 2), Some(Color32::GREEN));
        assert_eq!(grid.get(13, 2), Some(Color32::GREEN));
        // the open right side floods around the box as well
        assert_eq!(grid.get(0, 0), Some(Color32::GREEN));
        assert_eq!(grid.get(1, 1), Some(Color32::BLACK));
        assert_eq!(grid.get(14, 1), Some(Color32::GREEN));
        assert_eq!(editor.history().undo_count(), 1);
    }

    #[test]
    fn symmetric_eraser_clears_all_mirrors() {
        let mut editor = EditorContext::new();
        editor.set_tool(Tool::Fill).unwrap();
        drag(&mut editor, &[(0.0, 0.0)]);
        editor.set_tool(Tool::Eraser).unwrap();
        editor.set_symmetry(SymmetryMode::Both);
        drag(&mut editor, &[(1.0, 2.0), (3.0, 2.0)]);

        let grid = &editor.state().grid;
        for (xs, y) in [(1..=3, 2), (12..=14, 2), (1..=3, 13), (12..=14, 13)] {
            for x in xs {
                assert_eq!(grid.get(x, y), None, "({x}, {y})");
            }
        }
        assert_eq!(grid.get(5, 2), Some(Color32::BLACK));
        assert_eq!(grid.get(1, 3), Some(Color32::BLACK));
        assert_eq!(editor.history().undo_count(), 2);
    }

    #[test]
    fn stroke_without_change_takes_no_snapshot() {
        let mut editor = EditorContext::new();
        editor.set_tool(Tool::Eraser).unwrap();
        drag(&mut editor, &[(1.0, 1.0), (8.0, 1.0)]);
        assert_eq!(editor.history().undo_count(), 0);

        editor.set_tool(Tool::Pencil).unwrap();
        drag(&mut editor, &[(1.0, 1.0)]);
        drag(&mut editor, &[(1.0, 1.0)]);
        assert_eq!(editor.history().undo_count(), 1);
    }

    #[test]
    fn release_extends_the_stroke() {
        let mut editor = EditorContext::new();
        editor.handle_pointer(PointerEvent::press(Pos2::new(1.0, 1.0)));
        editor.handle_pointer(PointerEvent::moved(Pos2::new(3.0, 1.0)));
        editor.handle_pointer(PointerEvent::release(Pos2::new(6.0, 1.0)));
        for x in 1..=6 {
            assert!(editor.state().grid.get(x, 1).is_some(), "{x}");
        }
    }

    #[test]
    fn cancelled_selection_ends_at_last_position() {
        let mut editor = EditorContext::new();
        editor.set_mode(EditorMode::Sketch);
        editor.set_tool(Tool::Select).unwrap();
        editor.handle_pointer(PointerEvent::press(Pos2::new(10.0, 10.0)));
        editor.handle_pointer(PointerEvent::moved(Pos2::new(40.0, 30.0)));
        editor.handle_pointer(PointerEvent::cancel(Pos2::new(90.0, 90.0)));
        let rect = editor.state().selection.as_ref().map(|s| s.rect);
        assert_eq!(
            rect,
            Some(SelectionRect {
                x: 10,
                y: 10,
                width: 30,
                height: 20
            })
        );
        assert!(!editor.is_gesture_active());
    }

    #[test]
    fn cancelled_move_ends_at_last_position() {
        let red = image::Rgba([255, 0, 0, 255]);
        let mut editor = EditorContext::new();
        editor.set_mode(EditorMode::Sketch);
        editor.state.layers.current_mut().surface.put_pixel(20, 20, red);
        editor.set_tool(Tool::Select).unwrap();
        drag(&mut editor, &[(10.0, 10.0), (40.0, 30.0)]);

        editor.set_tool(Tool::Move).unwrap();
        editor.handle_pointer(PointerEvent::press(Pos2::new(15.0, 15.0)));
        editor.handle_pointer(PointerEvent::moved(Pos2::new(25.0, 15.0)));
        editor.handle_pointer(PointerEvent::cancel(Pos2::new(60.0, 60.0)));

        let rect = editor.state().selection.as_ref().map(|s| s.rect);
        assert_eq!(rect.map(|r| (r.x, r.y)), Some((20, 10)));
        let surface = &editor.state().layers.current().surface;
        assert_eq!(*surface.get_pixel(30, 20), red);
        assert_eq!(surface.get_pixel(20, 20)[3], 0);
        assert_eq!(editor.history().undo_count(), 1);
        assert!(!editor.is_gesture_active());
    }

    #[test]
    fn second_pointer_is_ignored() {
        let mut editor = EditorContext::new();
        assert!(editor.handle_pointer(PointerEvent::press(Pos2::new(0.0, 0.0))));
        assert!(!editor.handle_pointer(PointerEvent::press(Pos2::new(9.0, 9.0)).with_id(3)));
        assert!(!editor.handle_pointer(PointerEvent::release(Pos2::new(9.0, 9.0)).with_id(3)));
        assert!(editor.state().grid.get(9, 9).is_none());
    }

    #[test]
    fn eyedropper_picks_grid_color() {
        let mut editor = EditorContext::new();
        editor.set_primary_color(Color32::BLUE);
        drag(&mut editor, &[(4.0, 4.0)]);
        editor.set_primary_color(Color32::BLACK);
        editor.set_tool(Tool::Eyedropper).unwrap();
        drag(&mut editor, &[(4.0, 4.0)]);
        assert_eq!(editor.state().primary_color, Color32::BLUE);
        assert_eq!(editor.history().undo_count(), 1);
    }

    #[test]
    fn destructive_command_needs_confirmation_only_with_content() {
        let mut editor = EditorContext::new();
        assert!(editor.execute(Command::Clear).is_ok());
        drag(&mut editor, &[(1.0, 1.0)]);
        let before = editor.state().grid.clone();
        assert!(matches!(
            editor.execute(Command::Clear),
            Err(EditorError::ConfirmationRequired(_))
        ));
        assert_eq!(editor.state().grid, before);
        editor.execute_confirmed(Command::Clear).unwrap();
        assert!(editor.state().grid.is_blank());
    }

    #[test]
    fn mode_switch_clears_history_and_selection() {
        let mut editor = EditorContext::new();
        drag(&mut editor, &[(1.0, 1.0)]);
        editor.set_mode(EditorMode::Sketch);
        assert!(!editor.can_undo());
        assert_eq!(editor.tool(), Tool::Brush(crate::brush::BrushKind::Soft));
        editor.set_tool(Tool::Select).unwrap();
        drag(&mut editor, &[(10.0, 10.0), (40.0, 30.0)]);
        assert!(editor.state().selection.is_some());
        editor.set_mode(EditorMode::Pixel);
        assert!(editor.state().selection.is_none());
        // the pixel grid survived the round trip
        assert!(editor.state().grid.get(1, 1).is_some());
    }

    #[test]
    fn tiny_selection_is_discarded() {
        let mut editor = EditorContext::new();
        editor.set_mode(EditorMode::Sketch);
        editor.set_tool(Tool::Select).unwrap();
        drag(&mut editor, &[(10.0, 10.0), (14.0, 30.0)]);
        assert!(editor.state().selection.is_none());
    }

    #[test]
    fn unavailable_tool_is_refused() {
        let mut editor = EditorContext::new();
        assert!(editor.set_tool(Tool::Move).is_err());
        assert_eq!(editor.tool(), Tool::Pencil);
    }

    #[test]
    fn revision_tracks_changes() {
        let mut editor = EditorContext::new();
        let r0 = editor.revision();
        drag(&mut editor, &[(1.0, 1.0)]);
        assert!(editor.revision() > r0);
        let r1 = editor.revision();
        editor.set_primary_color(Color32::RED);
        assert_eq!(editor.revision(), r1);
    }

    #[test]
    fn export_scales_pixels() {
        let mut editor = EditorContext::new();
        drag(&mut editor, &[(0.0, 0.0)]);
        let image = editor.export_image(4);
        assert_eq!(image.dimensions(), (64, 64));
        assert_eq!(image.get_pixel(3, 3)[3], 255);
        assert_eq!(image.get_pixel(4, 4)[3], 0);
        assert!(editor.export_png(1).unwrap().starts_with(&[0x89, b'P', b'N', b'G']));
    }
}
