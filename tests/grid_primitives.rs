use egui::Color32;
use pixsketch::color::parse_hex;
use pixsketch::grid::RasterGrid;
use pixsketch::raster::{draw_line, draw_rect, flood_fill, set_pixel};
use pixsketch::symmetry::SymmetryMode;

fn painted(grid: &RasterGrid) -> Vec<(i32, i32)> {
    let mut cells = Vec::new();
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            if grid.get(x, y).is_some() {
                cells.push((x, y));
            }
        }
    }
    cells
}

#[test]
fn pixel_and_rect_outline_scenario() {
    let red = parse_hex("#FF0000");
    let green = parse_hex("#00FF00");
    let mut grid = RasterGrid::new(16, 16);

    set_pixel(&mut grid, 0, 0, red);
    draw_rect(&mut grid, 2, 2, 5, 5, green, false);

    assert_eq!(grid.get(0, 0), Some(Color32::RED));
    for i in 2..=5 {
        for (x, y) in [(i, 2), (i, 5), (2, i), (5, i)] {
            assert_eq!(grid.get(x, y), Some(Color32::GREEN), "border cell ({x}, {y})");
        }
    }
    assert_eq!(grid.get(3, 3), None);
    assert_eq!(grid.get(4, 4), None);
    assert_eq!(painted(&grid).len(), 1 + 12);
}

#[test]
fn horizontal_line_paints_exactly_its_cells() {
    let mut grid = RasterGrid::new(16, 16);
    draw_line(&mut grid, 0, 5, 5, 5, Some(Color32::BLACK));
    let expected: Vec<(i32, i32)> = (0..=5).map(|x| (x, 5)).collect();
    assert_eq!(painted(&grid), expected);
}

#[test]
fn lines_include_both_endpoints() {
    for &(x0, y0, x1, y1) in &[(0, 0, 15, 7), (15, 15, 0, 3), (3, 12, 4, 0), (7, 7, 7, 7), (-4, 2, 9, 9)] {
        let mut grid = RasterGrid::new(16, 16);
        draw_line(&mut grid, x0, y0, x1, y1, Some(Color32::BLACK));
        if grid.contains(x0, y0) {
            assert!(grid.get(x0, y0).is_some(), "start of {x0},{y0} -> {x1},{y1}");
        }
        assert!(grid.get(x1, y1).is_some(), "end of {x0},{y0} -> {x1},{y1}");
    }
}

#[test]
fn flood_fill_stays_inside_border() {
    let mut grid = RasterGrid::new(16, 16);
    // 7x7 outline enclosing a 5x5 region
    draw_rect(&mut grid, 1, 1, 7, 7, Some(Color32::BLACK), false);

    let filled = flood_fill(&mut grid, 4, 4, Some(Color32::RED));

    assert_eq!(filled, 25);
    for y in 2..=6 {
        for x in 2..=6 {
            assert_eq!(grid.get(x, y), Some(Color32::RED));
        }
    }
    assert_eq!(grid.get(1, 4), Some(Color32::BLACK));
    assert_eq!(grid.get(0, 0), None);
    assert_eq!(grid.get(10, 10), None);
}

#[test]
fn flood_fill_of_open_canvas_covers_everything() {
    let mut grid = RasterGrid::new(9, 5);
    assert_eq!(flood_fill(&mut grid, 0, 0, Some(Color32::BLUE)), 45);
    assert_eq!(flood_fill(&mut grid, 0, 0, Some(Color32::BLUE)), 0);
    assert_eq!(flood_fill(&mut grid, 20, 0, None), 0);
}

#[test]
fn both_symmetry_yields_three_distinct_mirrors() {
    let (w, h) = (16, 16);
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            if x == w as i32 - 1 - x || y == h as i32 - 1 - y {
                continue;
            }
            let points = SymmetryMode::Both.positions_for(x, y, w, h);
            assert_eq!(points.len(), 3, "({x}, {y})");
            assert!(!points.contains(&(x, y)));
            assert!(points.contains(&(w as i32 - 1 - x, y)));
            assert!(points.contains(&(x, h as i32 - 1 - y)));
            assert!(points.contains(&(w as i32 - 1 - x, h as i32 - 1 - y)));
        }
    }
}

#[test]
fn odd_grid_midline_mirrors_onto_itself() {
    let points = SymmetryMode::Both.positions_for(2, 1, 5, 5);
    assert_eq!(points, vec![(2, 3)]);
}
