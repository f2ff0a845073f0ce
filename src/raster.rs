//! Integer rasterization of primitives onto a [`RasterGrid`].
//!
//! Every primitive funnels through [`set_pixel`], so bounds checking lives in
//! exactly one place and callers may pass coordinates that fall off the grid.

use crate::grid::{Cell, RasterGrid};

/// Bounds-checked single cell write. Returns whether the cell changed.
pub fn set_pixel(grid: &mut RasterGrid, x: i32, y: i32, cell: Cell) -> bool {
    grid.set(x, y, cell)
}

/// Bresenham line, inclusive of both endpoints.
pub fn draw_line(grid: &mut RasterGrid, mut x0: i32, mut y0: i32, x1: i32, y1: i32, cell: Cell) {
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        set_pixel(grid, x0, y0, cell);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Axis-aligned rectangle between two corners in any order.
/// The outline writes the four border edges only.
pub fn draw_rect(grid: &mut RasterGrid, x0: i32, y0: i32, x1: i32, y1: i32, cell: Cell, filled: bool) {
    let (min_x, max_x) = (x0.min(x1), x0.max(x1));
    let (min_y, max_y) = (y0.min(y1), y0.max(y1));

    if filled {
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                set_pixel(grid, x, y, cell);
            }
        }
        return;
    }

    for x in min_x..=max_x {
        set_pixel(grid, x, min_y, cell);
        set_pixel(grid, x, max_y, cell);
    }
    for y in min_y..=max_y {
        set_pixel(grid, min_x, y, cell);
        set_pixel(grid, max_x, y, cell);
    }
}

/// Circle centred on `(x0, y0)` whose radius is the floored distance to
/// `(x1, y1)`.
pub fn draw_circle(grid: &mut RasterGrid, x0: i32, y0: i32, x1: i32, y1: i32, cell: Cell, filled: bool) {
    let dx = f64::from(x1 - x0);
    let dy = f64::from(y1 - y0);
    let radius = (dx * dx + dy * dy).sqrt().floor() as i32;

    if filled {
        let r2 = radius * radius;
        for y in -radius..=radius {
            for x in -radius..=radius {
                if x * x + y * y <= r2 {
                    set_pixel(grid, x0 + x, y0 + y, cell);
                }
            }
        }
        return;
    }

    // Midpoint circle: walk one octant, emit all eight.
    let mut x = radius;
    let mut y = 0;
    let mut err = 0;
    while x >= y {
        for (px, py) in [
            (x, y),
            (y, x),
            (-y, x),
            (-x, y),
            (-x, -y),
            (-y, -x),
            (y, -x),
            (x, -y),
        ] {
            set_pixel(grid, x0 + px, y0 + py, cell);
        }
        if err <= 0 {
            y += 1;
            err += 2 * y + 1;
        }
        if err > 0 {
            x -= 1;
            err -= 2 * x + 1;
        }
    }
}

/// 4-connected flood fill from `(x, y)`.
///
/// Returns the number of cells recolored. Filling with the seed's own
/// color, or seeding outside the grid, does nothing.
pub fn flood_fill(grid: &mut RasterGrid, x: i32, y: i32, fill: Cell) -> usize {
    if !grid.contains(x, y) {
        return 0;
    }
    let target = grid.get(x, y);
    if target == fill {
        return 0;
    }

    let mut filled = 0;
    let mut stack = vec![(x, y)];
    while let Some((cx, cy)) = stack.pop() {
        // Neighbours off the edge get pushed and dropped here.
        if !grid.contains(cx, cy) || grid.get(cx, cy) != target {
            continue;
        }
        grid.set(cx, cy, fill);
        filled += 1;
        stack.push((cx + 1, cy));
        stack.push((cx - 1, cy));
        stack.push((cx, cy + 1));
        stack.push((cx, cy - 1));
    }
    filled
}
