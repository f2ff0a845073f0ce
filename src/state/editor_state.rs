//! The editor's document and settings as one plain value.
//!
//! Everything a command or a history snapshot touches lives here. The
//! controller in [`super::EditorContext`] owns one `EditorState` and hands
//! out `&mut` access to the parts each operation needs.

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::brush::BrushSettings;
use crate::config::EditorConfig;
use crate::error::{EditorError, EditorResult};
use crate::grid::{Cell, RasterGrid};
use crate::layer::LayerStack;
use crate::selection::Selection;
use crate::sprite::SpriteSheet;
use crate::symmetry::SymmetryMode;
use crate::tools::Tool;

/// The two drawing paradigms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    /// Discrete cell grid with sprites
    #[default]
    Pixel,
    /// Continuous layered canvas
    Sketch,
}

#[derive(Debug, Clone)]
pub struct EditorState {
    pub mode: EditorMode,
    pub tool: Tool,
    pub primary_color: Color32,
    pub secondary_color: Color32,
    pub symmetry: SymmetryMode,
    pub show_grid: bool,
    /// The live grid of the current sprite
    pub grid: RasterGrid,
    pub sprites: SpriteSheet,
    pub layers: LayerStack,
    pub selection: Option<Selection>,
    pub brush: BrushSettings,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl EditorState {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            mode: EditorMode::Pixel,
            tool: Tool::default_for(EditorMode::Pixel),
            primary_color: Color32::BLACK,
            secondary_color: Color32::WHITE,
            symmetry: SymmetryMode::None,
            show_grid: true,
            grid: RasterGrid::new(config.grid_width, config.grid_height),
            sprites: SpriteSheet::new(),
            layers: LayerStack::new(config.sketch_width, config.sketch_height),
            selection: None,
            brush: BrushSettings::default(),
        }
    }

    /// Fails with [`EditorError::WrongMode`] unless the editor is in `expected`.
    pub fn require_mode(&self, expected: EditorMode) -> EditorResult<()> {
        if self.mode == expected {
            Ok(())
        } else {
            Err(EditorError::WrongMode {
                expected,
                actual: self.mode,
            })
        }
    }

    /// The color a button paints with.
    pub fn paint_color(&self, secondary: bool) -> Color32 {
        if secondary {
            self.secondary_color
        } else {
            self.primary_color
        }
    }

    /// The grid cell a button paints, `None` for erasing.
    pub fn paint_cell(&self, secondary: bool, erase: bool) -> Cell {
        if erase {
            None
        } else {
            Some(self.paint_color(secondary))
        }
    }

    /// Canvas size of the active mode.
    pub fn canvas_size(&self) -> (u32, u32) {
        match self.mode {
            EditorMode::Pixel => (self.grid.width() as u32, self.grid.height() as u32),
            EditorMode::Sketch => (self.layers.width(), self.layers.height()),
        }
    }

    /// True when the active canvas holds anything a clear would lose.
    pub fn canvas_has_content(&self) -> bool {
        match self.mode {
            EditorMode::Pixel => !self.grid.is_blank(),
            EditorMode::Sketch => self.layers.current().has_content(),
        }
    }

    /// True when anything in the project, in either mode, would be lost by
    /// starting over.
    pub fn project_has_content(&self) -> bool {
        let sprite_content = (0..self.sprites.len()).any(|i| self.sprites.has_content(i, &self.grid));
        sprite_content || self.layers.layers().iter().any(|l| l.has_content())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_config() {
        let config = EditorConfig {
            grid_width: 8,
            grid_height: 4,
            ..EditorConfig::default()
        };
        let state = EditorState::new(&config);
        assert_eq!(state.canvas_size(), (8, 4));
        assert_eq!(state.layers.len(), 1);
        assert_eq!(state.layers.current().name, "Layer 1");
        assert!(!state.project_has_content());
    }

    #[test]
    fn wrong_mode_is_reported() {
        let state = EditorState::default();
        assert!(state.require_mode(EditorMode::Pixel).is_ok());
        assert!(matches!(
            state.require_mode(EditorMode::Sketch),
            Err(EditorError::WrongMode {
                expected: EditorMode::Sketch,
                actual: EditorMode::Pixel
            })
        ));
    }

    #[test]
    fn secondary_button_and_eraser_cells() {
        let mut state = EditorState::default();
        state.secondary_color = Color32::RED;
        assert_eq!(state.paint_cell(true, false), Some(Color32::RED));
        assert_eq!(state.paint_cell(false, true), None);
    }
}
