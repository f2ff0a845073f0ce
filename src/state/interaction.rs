use egui::Pos2;

use crate::input::Route;
use crate::selection::MoveDrag;

/// The gesture in progress between a pointer press and its release.
///
/// ```text
///            press                      release / cancel
///   Idle ────────────► Drawing   ───────────────────────► Idle
///        ────────────► Shaping   ───────────────────────►
///        ────────────► Selecting ───────────────────────►
///        ────────────► Moving    ───────────────────────►
/// ```
///
/// One-shot tools (fill, eyedropper) act on press and stay `Idle`.
#[derive(Debug, Clone, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// Freehand painting on the grid or the current layer
    Drawing {
        route: Route,
        secondary: bool,
        last: Pos2,
        /// Whether this stroke has pushed its history entry yet
        recorded: bool,
    },
    /// A shape drag; the draft lives in the shape controller
    Shaping,
    Selecting {
        start: Pos2,
        current: Pos2,
    },
    Moving(MoveDrag),
}

impl Interaction {
    /// The selection rectangle being dragged out, for display.
    pub fn pending_selection(&self) -> Option<(Pos2, Pos2)> {
        match self {
            Interaction::Selecting { start, current } => Some((*start, *current)),
            _ => None,
        }
    }
}
