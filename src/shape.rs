//! Draft/commit handling for shapes dragged out on the pixel grid.
//!
//! ```text
//!   Idle ──begin──► Dragging ──update──► Dragging
//!                      │
//!                 end / cancel
//!                      ▼
//!                    Idle   (last preview stays in the grid)
//! ```

use serde::{Deserialize, Serialize};

use crate::grid::{Cell, RasterGrid};
use crate::raster;
use crate::symmetry::SymmetryMode;

/// The shapes the grid tools can drag out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Line,
    Rect { filled: bool },
    Circle { filled: bool },
}

impl ShapeKind {
    /// Rasterizes the shape from `start` to `end`.
    pub fn rasterize(self, grid: &mut RasterGrid, start: (i32, i32), end: (i32, i32), cell: Cell) {
        let ((x0, y0), (x1, y1)) = (start, end);
        match self {
            Self::Line => raster::draw_line(grid, x0, y0, x1, y1, cell),
            Self::Rect { filled } => raster::draw_rect(grid, x0, y0, x1, y1, cell, filled),
            Self::Circle { filled } => raster::draw_circle(grid, x0, y0, x1, y1, cell, filled),
        }
    }

    /// Rasterizes the shape plus one mirrored copy per symmetry reflection.
    pub fn rasterize_symmetric(
        self,
        grid: &mut RasterGrid,
        start: (i32, i32),
        end: (i32, i32),
        cell: Cell,
        symmetry: SymmetryMode,
    ) {
        self.rasterize(grid, start, end, cell);
        let (w, h) = (grid.width(), grid.height());
        for reflection in symmetry.reflections() {
            let s = reflection.apply(start.0, start.1, w, h);
            let e = reflection.apply(end.0, end.1, w, h);
            self.rasterize(grid, s, e, cell);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeState {
    Idle,
    Dragging {
        kind: ShapeKind,
        start: (i32, i32),
        end: (i32, i32),
        cell: Cell,
        symmetry: SymmetryMode,
        /// The grid as it was when the drag began.
        draft: RasterGrid,
    },
}

/// Owns the shape draft while a shape is being dragged.
#[derive(Debug, Clone)]
pub struct ShapeController {
    state: ShapeState,
    last_committed: Option<RasterGrid>,
}

impl Default for ShapeController {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeController {
    pub fn new() -> Self {
        Self {
            state: ShapeState::Idle,
            last_committed: None,
        }
    }

    pub fn state(&self) -> &ShapeState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, ShapeState::Dragging { .. })
    }

    /// The grid as it stood after the most recent commit.
    pub fn last_committed(&self) -> Option<&RasterGrid> {
        self.last_committed.as_ref()
    }

    /// Captures the draft and renders the single-point preview, so a drag
    /// that never moves still leaves a shape behind.
    pub fn begin(
        &mut self,
        grid: &mut RasterGrid,
        kind: ShapeKind,
        start: (i32, i32),
        cell: Cell,
        symmetry: SymmetryMode,
    ) {
        if self.is_dragging() {
            log::warn!("Shape drag started while another was active; committing the old one");
            self.end(grid);
        }
        self.state = ShapeState::Dragging {
            kind,
            start,
            end: start,
            cell,
            symmetry,
            draft: grid.clone(),
        };
        self.redraw(grid);
    }

    /// Restores the draft and draws the shape to `end` on top of it.
    pub fn update(&mut self, grid: &mut RasterGrid, end: (i32, i32)) {
        if let ShapeState::Dragging { end: current, .. } = &mut self.state {
            *current = end;
        } else {
            return;
        }
        self.redraw(grid);
    }

    /// Finishes the drag. The live grid already holds the final preview.
    /// Returns false when no drag was in progress.
    pub fn end(&mut self, grid: &RasterGrid) -> bool {
        match std::mem::replace(&mut self.state, ShapeState::Idle) {
            ShapeState::Dragging { kind, start, end, .. } => {
                log::debug!("Committed {kind:?} from {start:?} to {end:?}");
                self.last_committed = Some(grid.clone());
                true
            }
            ShapeState::Idle => false,
        }
    }

    /// An interrupted drag commits exactly like a release.
    pub fn cancel(&mut self, grid: &RasterGrid) -> bool {
        self.end(grid)
    }

    /// Drops the draft without committing and without touching the grid.
    /// Used when the grid is replaced wholesale underneath a drag.
    pub fn reset(&mut self) {
        self.state = ShapeState::Idle;
    }

    fn redraw(&self, grid: &mut RasterGrid) {
        if let ShapeState::Dragging {
            kind,
            start,
            end,
            cell,
            symmetry,
            draft,
        } = &self.state
        {
            grid.clone_from(draft);
            kind.rasterize_symmetric(grid, *start, *end, *cell, *symmetry);
        }
    }
}
