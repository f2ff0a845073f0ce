use serde::{Deserialize, Serialize};

use super::{CommandError, CommandResult};
use crate::blend::BlendMode;
use crate::config::MAX_CANVAS_SIDE;
use crate::error::DestructiveAction;
use crate::grid::RasterGrid;
use crate::layer::LayerStack;
use crate::sprite::SpriteSheet;
use crate::state::{EditorMode, EditorState};

fn canvas_size_allowed(width: u32, height: u32) -> bool {
    (1..=MAX_CANVAS_SIDE).contains(&width) && (1..=MAX_CANVAS_SIDE).contains(&height)
}

/// Every discrete editing action the user can take outside a pointer drag.
///
/// Commands are executed through [`crate::state::EditorContext::execute`],
/// which snapshots history once before applying a recorded command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Empties the grid, or the current layer in sketch mode
    Clear,
    /// Resizes the active canvas, anchored at the top-left corner
    Resize { width: u32, height: u32 },
    RotateClockwise,
    FlipHorizontal,
    FlipVertical,

    AddLayer,
    DeleteLayer(usize),
    MoveLayer { from: usize, to: usize },
    SetLayerVisibility { index: usize, visible: bool },
    SetLayerOpacity { index: usize, opacity: f32 },
    SetLayerBlendMode { index: usize, mode: BlendMode },
    RenameLayer { index: usize, name: String },

    AddSprite { name: String },
    DeleteSprite(usize),
    DuplicateSprite(usize),
    RenameSprite { index: usize, name: String },

    /// Starts over with a blank project; the active canvas gets the given size
    NewProject { width: u32, height: u32 },
}

impl Command {
    /// Short description used for history entries
    pub fn label(&self) -> &'static str {
        match self {
            Command::Clear => "Clear",
            Command::Resize { .. } => "Resize",
            Command::RotateClockwise => "Rotate",
            Command::FlipHorizontal => "Flip horizontal",
            Command::FlipVertical => "Flip vertical",
            Command::AddLayer => "Add layer",
            Command::DeleteLayer(_) => "Delete layer",
            Command::MoveLayer { .. } => "Move layer",
            Command::SetLayerVisibility { .. } => "Layer visibility",
            Command::SetLayerOpacity { .. } => "Layer opacity",
            Command::SetLayerBlendMode { .. } => "Layer blend mode",
            Command::RenameLayer { .. } => "Rename layer",
            Command::AddSprite { .. } => "Add sprite",
            Command::DeleteSprite(_) => "Delete sprite",
            Command::DuplicateSprite(_) => "Duplicate sprite",
            Command::RenameSprite { .. } => "Rename sprite",
            Command::NewProject { .. } => "New project",
        }
    }

    /// The mode a command is restricted to, if any.
    pub fn required_mode(&self) -> Option<EditorMode> {
        match self {
            Command::AddLayer
            | Command::DeleteLayer(_)
            | Command::MoveLayer { .. }
            | Command::SetLayerVisibility { .. }
            | Command::SetLayerOpacity { .. }
            | Command::SetLayerBlendMode { .. }
            | Command::RenameLayer { .. } => Some(EditorMode::Sketch),
            Command::AddSprite { .. }
            | Command::DeleteSprite(_)
            | Command::DuplicateSprite(_)
            | Command::RenameSprite { .. } => Some(EditorMode::Pixel),
            Command::Clear
            | Command::Resize { .. }
            | Command::RotateClockwise
            | Command::FlipHorizontal
            | Command::FlipVertical
            | Command::NewProject { .. } => None,
        }
    }

    /// Returns true if the command leaves an undo entry. Starting a new
    /// project wipes history instead.
    pub fn is_recorded(&self) -> bool {
        !matches!(self, Command::NewProject { .. })
    }

    /// Commands that may throw away user content.
    pub fn destructive_action(&self) -> Option<DestructiveAction> {
        match self {
            Command::Clear => Some(DestructiveAction::ClearCanvas),
            Command::NewProject { .. } => Some(DestructiveAction::NewProject),
            Command::DeleteSprite(_) => Some(DestructiveAction::DeleteSprite),
            Command::DeleteLayer(_) => Some(DestructiveAction::DeleteLayer),
            _ => None,
        }
    }

    /// Whether applying the command to `state` would lose drawn content.
    pub fn would_discard_data(&self, state: &EditorState) -> bool {
        match self {
            Command::Clear => state.canvas_has_content(),
            Command::NewProject { .. } => state.project_has_content(),
            Command::DeleteSprite(index) => state.sprites.has_content(*index, &state.grid),
            Command::DeleteLayer(index) => state
                .layers
                .get(*index)
                .is_ok_and(|layer| layer.has_content()),
            _ => false,
        }
    }

    /// Checks that the command can run against `state` without changing it.
    pub fn validate(&self, state: &EditorState) -> CommandResult {
        if let Some(mode) = self.required_mode() {
            state.require_mode(mode)?;
        }
        match self {
            Command::DeleteLayer(index) => {
                if state.layers.len() <= 1 {
                    return Err(CommandError::LastLayer);
                }
                state.layers.get(*index)?;
            }
            Command::MoveLayer { from, to } => {
                state.layers.get(*from)?;
                state.layers.get(*to)?;
            }
            Command::SetLayerVisibility { index, .. }
            | Command::SetLayerOpacity { index, .. }
            | Command::SetLayerBlendMode { index, .. }
            | Command::RenameLayer { index, .. } => {
                state.layers.get(*index)?;
            }
            Command::DeleteSprite(index) => {
                if *index >= state.sprites.len() {
                    return Err(CommandError::NoSuchSprite(*index));
                }
                if state.sprites.len() <= 1 {
                    return Err(CommandError::LastSprite);
                }
            }
            Command::DuplicateSprite(index) | Command::RenameSprite { index, .. } => {
                if *index >= state.sprites.len() {
                    return Err(CommandError::NoSuchSprite(*index));
                }
            }
            Command::Resize { width, height } | Command::NewProject { width, height } => {
                if !canvas_size_allowed(*width, *height) {
                    return Err(CommandError::InvalidCanvasSize {
                        width: *width,
                        height: *height,
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Applies the command. Callers validate first; a failing `apply`
    /// leaves `state` untouched.
    pub fn apply(&self, state: &mut EditorState) -> CommandResult {
        self.validate(state)?;
        match self {
            Command::Clear => match state.mode {
                EditorMode::Pixel => state.grid.clear(),
                EditorMode::Sketch => {
                    state.layers.clear_current();
                    state.selection = None;
                }
            },

            Command::Resize { width, height } => match state.mode {
                EditorMode::Pixel => state.grid.resize(*width as usize, *height as usize),
                EditorMode::Sketch => {
                    state.layers.resize(*width, *height);
                    state.selection = None;
                }
            },

            Command::RotateClockwise => match state.mode {
                EditorMode::Pixel => state.grid.rotate_clockwise(),
                EditorMode::Sketch => {
                    state.layers.rotate_clockwise();
                    state.selection = None;
                }
            },

            Command::FlipHorizontal => match state.mode {
                EditorMode::Pixel => state.grid.flip_horizontal(),
                EditorMode::Sketch => {
                    state.layers.flip_horizontal();
                    state.selection = None;
                }
            },

            Command::FlipVertical => match state.mode {
                EditorMode::Pixel => state.grid.flip_vertical(),
                EditorMode::Sketch => {
                    state.layers.flip_vertical();
                    state.selection = None;
                }
            },

            Command::AddLayer => {
                state.layers.add_layer();
            }

            Command::DeleteLayer(index) => {
                state.layers.delete_layer(*index)?;
                state.selection = None;
            }

            Command::MoveLayer { from, to } => state.layers.move_layer(*from, *to)?,

            Command::SetLayerVisibility { index, visible } => {
                state.layers.set_visibility(*index, *visible)?
            }

            Command::SetLayerOpacity { index, opacity } => state.layers.set_opacity(*index, *opacity)?,

            Command::SetLayerBlendMode { index, mode } => state.layers.set_blend_mode(*index, *mode)?,

            Command::RenameLayer { index, name } => state.layers.get_mut(*index)?.set_name(name.clone()),

            Command::AddSprite { name } => {
                state.sprites.add(name, &mut state.grid);
            }

            Command::DeleteSprite(index) => {
                state.sprites.delete(*index, &mut state.grid)?;
            }

            Command::DuplicateSprite(index) => {
                state.sprites.duplicate(*index, &mut state.grid)?;
            }

            Command::RenameSprite { index, name } => state.sprites.rename(*index, name.clone())?,

            Command::NewProject { width, height } => {
                let (grid_w, grid_h, sketch_w, sketch_h) = match state.mode {
                    EditorMode::Pixel => (
                        *width as usize,
                        *height as usize,
                        state.layers.width(),
                        state.layers.height(),
                    ),
                    EditorMode::Sketch => (state.grid.width(), state.grid.height(), *width, *height),
                };
                state.grid = RasterGrid::new(grid_w, grid_h);
                state.sprites = SpriteSheet::new();
                state.layers = LayerStack::new(sketch_w, sketch_h);
                state.selection = None;
            }
        }
        Ok(())
    }
}
