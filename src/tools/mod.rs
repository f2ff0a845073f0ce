use serde::{Deserialize, Serialize};

use crate::brush::BrushKind;
use crate::shape::ShapeKind;
use crate::state::EditorMode;

/// Every tool the editor offers.
///
/// A closed enumeration rather than `Box<dyn Tool>`: the pointer handlers
/// match on it exhaustively, so adding a tool is checked at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Pencil,
    Eraser,
    Fill,
    Eyedropper,
    Line,
    Rect { filled: bool },
    Circle { filled: bool },
    Select,
    Move,
    Brush(BrushKind),
}

impl Default for Tool {
    fn default() -> Self {
        Self::Pencil
    }
}

impl Tool {
    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pencil => "Pencil",
            Self::Eraser => "Eraser",
            Self::Fill => "Fill",
            Self::Eyedropper => "Eyedropper",
            Self::Line => "Line",
            Self::Rect { filled: false } => "Rectangle",
            Self::Rect { filled: true } => "Filled rectangle",
            Self::Circle { filled: false } => "Circle",
            Self::Circle { filled: true } => "Filled circle",
            Self::Select => "Select",
            Self::Move => "Move",
            Self::Brush(kind) => kind.name(),
        }
    }

    /// Tools that write once per mirrored position when symmetry is on.
    pub fn is_symmetric(&self) -> bool {
        matches!(self, Self::Pencil | Self::Eraser | Self::Fill)
    }

    /// The shape this tool drags out, if it is a shape tool.
    pub fn shape(&self) -> Option<ShapeKind> {
        match *self {
            Self::Line => Some(ShapeKind::Line),
            Self::Rect { filled } => Some(ShapeKind::Rect { filled }),
            Self::Circle { filled } => Some(ShapeKind::Circle { filled }),
            _ => None,
        }
    }

    pub fn available_in(&self, mode: EditorMode) -> bool {
        match self {
            Self::Eraser | Self::Eyedropper => true,
            Self::Pencil | Self::Fill | Self::Line | Self::Rect { .. } | Self::Circle { .. } => {
                mode == EditorMode::Pixel
            }
            Self::Select | Self::Move | Self::Brush(_) => mode == EditorMode::Sketch,
        }
    }

    /// The tool selected when switching into `mode`.
    pub fn default_for(mode: EditorMode) -> Self {
        match mode {
            EditorMode::Pixel => Self::Pencil,
            EditorMode::Sketch => Self::Brush(BrushKind::Soft),
        }
    }

    /// Every tool, in toolbar order.
    pub fn all() -> Vec<Tool> {
        let mut tools = vec![
            Self::Pencil,
            Self::Eraser,
            Self::Fill,
            Self::Eyedropper,
            Self::Line,
            Self::Rect { filled: false },
            Self::Rect { filled: true },
            Self::Circle { filled: false },
            Self::Circle { filled: true },
            Self::Select,
            Self::Move,
        ];
        tools.extend(BrushKind::all().iter().copied().map(Self::Brush));
        tools
    }

    /// Tools offered in `mode`, in toolbar order.
    pub fn for_mode(mode: EditorMode) -> Vec<Tool> {
        Self::all()
            .into_iter()
            .filter(|tool| tool.available_in(mode))
            .collect()
    }
}
