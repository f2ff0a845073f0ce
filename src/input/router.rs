use egui::PointerButton;

use crate::brush::BrushKind;
use crate::shape::ShapeKind;
use crate::state::EditorMode;
use crate::tools::Tool;

/// Which drawing path a gesture takes, decided once when it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Pencil or eraser on the grid; `erase` writes empty cells
    GridPaint { erase: bool },
    GridFill,
    GridShape(ShapeKind),
    /// Eyedropper on whichever surface is showing
    Pick,
    LayerBrush(BrushKind),
    LayerErase,
    Select,
    Move,
    /// The tool does not work in this mode
    Ignored,
}

/// Routes a tool to the grid path in pixel mode or the layer path in
/// sketch mode.
pub fn route(mode: EditorMode, tool: Tool) -> Route {
    match (mode, tool) {
        (_, Tool::Eyedropper) => Route::Pick,
        (EditorMode::Pixel, Tool::Pencil) => Route::GridPaint { erase: false },
        (EditorMode::Pixel, Tool::Eraser) => Route::GridPaint { erase: true },
        (EditorMode::Pixel, Tool::Fill) => Route::GridFill,
        (EditorMode::Pixel, Tool::Line | Tool::Rect { .. } | Tool::Circle { .. }) => {
            tool.shape().map_or(Route::Ignored, Route::GridShape)
        }
        (EditorMode::Sketch, Tool::Brush(kind)) => Route::LayerBrush(kind),
        (EditorMode::Sketch, Tool::Eraser) => Route::LayerErase,
        (EditorMode::Sketch, Tool::Select) => Route::Select,
        (EditorMode::Sketch, Tool::Move) => Route::Move,
        _ => Route::Ignored,
    }
}

/// Whether a button paints with the secondary color.
pub(crate) fn uses_secondary(button: PointerButton) -> bool {
    button == PointerButton::Secondary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_follow_mode() {
        assert_eq!(route(EditorMode::Pixel, Tool::Eraser), Route::GridPaint { erase: true });
        assert_eq!(route(EditorMode::Sketch, Tool::Eraser), Route::LayerErase);
        assert_eq!(route(EditorMode::Sketch, Tool::Pencil), Route::Ignored);
        assert_eq!(route(EditorMode::Pixel, Tool::Brush(BrushKind::Soft)), Route::Ignored);
        assert_eq!(
            route(EditorMode::Pixel, Tool::Rect { filled: true }),
            Route::GridShape(ShapeKind::Rect { filled: true })
        );
    }

    #[test]
    fn routes_agree_with_tool_availability() {
        for mode in [EditorMode::Pixel, EditorMode::Sketch] {
            for tool in Tool::all() {
                assert_eq!(route(mode, tool) != Route::Ignored, tool.available_in(mode), "{tool:?}");
            }
        }
    }
}
