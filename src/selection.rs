use egui::{Pos2, Rect};
use image::{Rgba, RgbaImage, imageops};

/// Axis-aligned selection rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl SelectionRect {
    /// Normalizes a drag into a rectangle. Drags that do not exceed
    /// `min_size` on both axes produce no selection.
    pub fn from_drag(start: Pos2, end: Pos2, min_size: f32) -> Option<Self> {
        let (dx, dy) = ((end.x - start.x).abs(), (end.y - start.y).abs());
        if dx <= min_size || dy <= min_size {
            return None;
        }
        let x = start.x.min(end.x).floor() as i32;
        let y = start.y.min(end.y).floor() as i32;
        let right = start.x.max(end.x).ceil() as i32;
        let bottom = start.y.max(end.y).ceil() as i32;
        Some(Self {
            x,
            y,
            width: (right - x) as u32,
            height: (bottom - y) as u32,
        })
    }

    pub fn contains(&self, pos: Pos2) -> bool {
        self.to_rect().contains(pos)
    }

    pub fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn to_rect(self) -> Rect {
        Rect::from_min_size(
            Pos2::new(self.x as f32, self.y as f32),
            egui::vec2(self.width as f32, self.height as f32),
        )
    }
}

/// A selection plus the pixels it carries while being moved.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub rect: SelectionRect,
    pub data: Option<RgbaImage>,
}

impl Selection {
    pub fn new(rect: SelectionRect) -> Self {
        Self { rect, data: None }
    }

    /// Copies the pixels under the rectangle. Parts outside the surface
    /// come out transparent.
    pub fn capture(&mut self, surface: &RgbaImage) {
        let mut data = RgbaImage::new(self.rect.width.max(1), self.rect.height.max(1));
        imageops::replace(&mut data, surface, -i64::from(self.rect.x), -i64::from(self.rect.y));
        self.data = Some(data);
    }

    /// Captures the pixels and clears them from the surface.
    pub fn lift(&mut self, surface: &mut RgbaImage) {
        self.capture(surface);
        let hole = RgbaImage::from_pixel(self.rect.width.max(1), self.rect.height.max(1), Rgba([0, 0, 0, 0]));
        imageops::replace(surface, &hole, i64::from(self.rect.x), i64::from(self.rect.y));
    }

    /// Composites the captured pixels back at the rectangle's position.
    pub fn paste(&self, surface: &mut RgbaImage) {
        if let Some(data) = &self.data {
            imageops::overlay(surface, data, i64::from(self.rect.x), i64::from(self.rect.y));
        }
    }
}

/// An in-progress move drag on one layer surface.
///
/// The surface under the moving pixels is kept as `base`; every update
/// restores it and pastes the floating pixels at the new offset, so
/// intermediate positions never smear.
#[derive(Debug, Clone)]
pub struct MoveDrag {
    base: RgbaImage,
    floating: RgbaImage,
    origin: (i32, i32),
    start: Pos2,
    offset: (i32, i32),
}

impl MoveDrag {
    /// Lifts the selection's pixels, or the whole surface when there is no
    /// selection.
    pub fn begin(surface: &mut RgbaImage, selection: Option<&mut Selection>, start: Pos2) -> Self {
        match selection {
            Some(selection) => {
                selection.lift(surface);
                let floating = selection
                    .data
                    .clone()
                    .unwrap_or_else(|| RgbaImage::new(1, 1));
                Self {
                    base: surface.clone(),
                    floating,
                    origin: (selection.rect.x, selection.rect.y),
                    start,
                    offset: (0, 0),
                }
            }
            None => {
                let floating = surface.clone();
                Self {
                    base: RgbaImage::new(surface.width(), surface.height()),
                    floating,
                    origin: (0, 0),
                    start,
                    offset: (0, 0),
                }
            }
        }
    }

    pub fn update(&mut self, surface: &mut RgbaImage, pos: Pos2) {
        let delta = pos - self.start;
        self.offset = (delta.x.round() as i32, delta.y.round() as i32);
        surface.clone_from(&self.base);
        imageops::overlay(
            surface,
            &self.floating,
            i64::from(self.origin.0 + self.offset.0),
            i64::from(self.origin.1 + self.offset.1),
        );
    }

    pub fn offset(&self) -> (i32, i32) {
        self.offset
    }

    /// Re-homes the selection rectangle at the final offset. The captured
    /// pixels travel with it and are lifted again by the next drag.
    pub fn finish(self, selection: Option<&mut Selection>) -> (i32, i32) {
        if let Some(selection) = selection {
            selection.rect = selection.rect.translated(self.offset.0, self.offset.1);
        }
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    #[test]
    fn small_drags_make_no_selection() {
        let start = Pos2::new(10.0, 10.0);
        assert!(SelectionRect::from_drag(start, Pos2::new(15.0, 30.0), 5.0).is_none());
        assert!(SelectionRect::from_drag(start, Pos2::new(30.0, 14.0), 5.0).is_none());
        let rect = SelectionRect::from_drag(Pos2::new(30.0, 20.0), start, 5.0).unwrap();
        assert_eq!(
            rect,
            SelectionRect {
                x: 10,
                y: 10,
                width: 20,
                height: 10
            }
        );
    }

    #[test]
    fn lift_clears_and_paste_restores() {
        let mut surface = RgbaImage::new(10, 10);
        surface.put_pixel(2, 2, RED);
        let mut selection = Selection::new(SelectionRect {
            x: 1,
            y: 1,
            width: 3,
            height: 3,
        });
        selection.lift(&mut surface);
        assert_eq!(surface.get_pixel(2, 2)[3], 0);
        assert_eq!(*selection.data.as_ref().unwrap().get_pixel(1, 1), RED);
        selection.paste(&mut surface);
        assert_eq!(*surface.get_pixel(2, 2), RED);
    }

    #[test]
    fn capture_past_the_edge_is_transparent() {
        let surface = RgbaImage::from_pixel(4, 4, RED);
        let mut selection = Selection::new(SelectionRect {
            x: -2,
            y: 2,
            width: 4,
            height: 4,
        });
        selection.capture(&surface);
        let data = selection.data.unwrap();
        assert_eq!(data.get_pixel(0, 0)[3], 0);
        assert_eq!(*data.get_pixel(2, 0), RED);
        assert_eq!(data.get_pixel(2, 3)[3], 0);
    }

    #[test]
    fn move_drag_does_not_smear() {
        let mut surface = RgbaImage::new(10, 10);
        surface.put_pixel(2, 2, RED);
        let mut selection = Selection::new(SelectionRect {
            x: 2,
            y: 2,
            width: 1,
            height: 1,
        });
        let mut drag = MoveDrag::begin(&mut surface, Some(&mut selection), Pos2::new(2.5, 2.5));
        drag.update(&mut surface, Pos2::new(4.5, 2.5));
        drag.update(&mut surface, Pos2::new(6.5, 3.5));
        assert_eq!(surface.pixels().filter(|p| p[3] != 0).count(), 1);
        assert_eq!(*surface.get_pixel(6, 3), RED);
        assert_eq!(drag.finish(Some(&mut selection)), (4, 1));
        assert_eq!((selection.rect.x, selection.rect.y), (6, 3));
    }

    #[test]
    fn move_without_selection_moves_everything() {
        let mut surface = RgbaImage::new(5, 5);
        surface.put_pixel(0, 0, RED);
        let mut drag = MoveDrag::begin(&mut surface, None, Pos2::ZERO);
        drag.update(&mut surface, Pos2::new(1.0, 1.0));
        assert_eq!(surface.get_pixel(0, 0)[3], 0);
        assert_eq!(*surface.get_pixel(1, 1), RED);
    }
}
