use std::fmt;
use thiserror::Error;

use crate::state::{EditorMode, PersistenceError};

/// Operations that throw away user content and therefore need an explicit
/// go-ahead from the caller before they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestructiveAction {
    ClearCanvas,
    NewProject,
    DeleteSprite,
    DeleteLayer,
}

impl fmt::Display for DestructiveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ClearCanvas => "clear the canvas",
            Self::NewProject => "start a new project",
            Self::DeleteSprite => "delete the sprite",
            Self::DeleteLayer => "delete the layer",
        };
        f.write_str(label)
    }
}

/// Errors surfaced by the editor core.
///
/// Out-of-bounds coordinates are deliberately absent: drawing outside the
/// canvas is a silent no-op and never interrupts a gesture.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("corrupt project file: {0}")]
    CorruptProjectFile(String),

    #[error("confirmation required to {0}")]
    ConfirmationRequired(DestructiveAction),

    #[error("cannot delete the only layer")]
    LastLayer,

    #[error("cannot delete the only sprite")]
    LastSprite,

    #[error("no layer at index {0}")]
    NoSuchLayer(usize),

    #[error("no sprite at index {0}")]
    NoSuchSprite(usize),

    #[error("a {width}x{height} canvas is not allowed")]
    InvalidCanvasSize { width: u32, height: u32 },

    #[error("operation needs {expected:?} mode but the editor is in {actual:?} mode")]
    WrongMode {
        expected: EditorMode,
        actual: EditorMode,
    },

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub type EditorResult<T> = Result<T, EditorError>;
