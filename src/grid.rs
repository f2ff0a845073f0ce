use egui::Color32;
use image::{Rgba, RgbaImage};

use crate::color;

/// One grid cell. `None` is the empty (transparent) cell.
pub type Cell = Option<Color32>;

/// The discrete `width × height` cell array behind pixel mode.
///
/// Rows are stored top to bottom, every row exactly `width` long. Cloning
/// produces a fully independent copy, so a clone can be kept as a history
/// or sprite snapshot without aliasing live state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterGrid {
    width: usize,
    height: usize,
    cells: Vec<Vec<Cell>>,
}

impl RasterGrid {
    /// Creates an empty grid. Zero dimensions are bumped to one.
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![vec![None; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Reads a cell; anything outside the grid reads as empty.
    pub fn get(&self, x: i32, y: i32) -> Cell {
        if self.contains(x, y) {
            self.cells[y as usize][x as usize]
        } else {
            None
        }
    }

    /// Writes a cell. Out-of-range coordinates are ignored.
    /// Returns whether the cell actually changed.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        let slot = &mut self.cells[y as usize][x as usize];
        let changed = *slot != cell;
        *slot = cell;
        changed
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    /// True when no cell holds a color.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_none)
    }

    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(None);
        }
    }

    /// Resizes to `new_width × new_height`, keeping the overlapping top-left
    /// region and filling new cells with empty.
    pub fn resize(&mut self, new_width: usize, new_height: usize) {
        let new_width = new_width.max(1);
        let new_height = new_height.max(1);
        let mut cells = vec![vec![None; new_width]; new_height];
        for (y, row) in cells.iter_mut().enumerate().take(self.height) {
            let keep = new_width.min(self.width);
            row[..keep].copy_from_slice(&self.cells[y][..keep]);
        }
        self.width = new_width;
        self.height = new_height;
        self.cells = cells;
    }

    /// Rotates a quarter turn clockwise; width and height swap.
    pub fn rotate_clockwise(&mut self) {
        let (old_w, old_h) = (self.width, self.height);
        let mut cells = vec![vec![None; old_h]; old_w];
        for (y, row) in self.cells.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                cells[x][old_h - 1 - y] = *cell;
            }
        }
        self.width = old_h;
        self.height = old_w;
        self.cells = cells;
    }

    /// Mirrors left to right.
    pub fn flip_horizontal(&mut self) {
        for row in &mut self.cells {
            row.reverse();
        }
    }

    /// Mirrors top to bottom.
    pub fn flip_vertical(&mut self) {
        self.cells.reverse();
    }

    /// Row-major color strings as stored in project files.
    pub fn to_strings(&self) -> Vec<Vec<String>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| color::cell_to_string(*c)).collect())
            .collect()
    }

    /// Rebuilds a grid from project-file rows. Ragged rows, empty input and
    /// unparseable colors are rejected with a description of the problem.
    pub fn from_strings(rows: &[Vec<String>]) -> Result<Self, String> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err("grid has no cells".to_owned());
        }
        let mut cells = Vec::with_capacity(height);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(format!(
                    "grid row {y} has {} cells, expected {width}",
                    row.len()
                ));
            }
            let parsed = row
                .iter()
                .enumerate()
                .map(|(x, text)| {
                    color::cell_from_str(text)
                        .ok_or_else(|| format!("bad color {text:?} at ({x}, {y})"))
                })
                .collect::<Result<Vec<_>, _>>()?;
            cells.push(parsed);
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Flattens to an image, each cell a `scale × scale` block, transparent
    /// where the cell is empty.
    pub fn to_image(&self, scale: u32) -> RgbaImage {
        let scale = scale.max(1);
        let mut image = RgbaImage::new(self.width as u32 * scale, self.height as u32 * scale);
        for (y, row) in self.cells.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let Some(color) = cell else { continue };
                let pixel: Rgba<u8> = color::to_rgba(*color);
                for dy in 0..scale {
                    for dx in 0..scale {
                        image.put_pixel(x as u32 * scale + dx, y as u32 * scale + dy, pixel);
                    }
                }
            }
        }
        image
    }
}
