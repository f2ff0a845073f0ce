use std::f32::consts::TAU;

use egui::{Color32, Pos2};
use image::{Rgba, RgbaImage};
use rand::Rng;

use super::{BrushKind, BrushSettings};
use crate::blend::{BlendMode, blend_pixel};

/// Source-over of an opaque `color` at `alpha` onto one pixel.
/// Coordinates off the surface are ignored.
pub fn blend_over(surface: &mut RgbaImage, x: i32, y: i32, color: Color32, alpha: f32) {
    if alpha <= 0.0 || !in_bounds(surface, x, y) {
        return;
    }
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    let px = surface.get_pixel_mut(x as u32, y as u32);
    *px = blend_pixel(*px, Rgba([r, g, b, 255]), BlendMode::Normal, alpha.min(1.0));
}

/// Destination-out: removes `amount` of a pixel's coverage.
pub fn erase_at(surface: &mut RgbaImage, x: i32, y: i32, amount: f32) {
    if amount <= 0.0 || !in_bounds(surface, x, y) {
        return;
    }
    let px = surface.get_pixel_mut(x as u32, y as u32);
    let keep = 1.0 - amount.clamp(0.0, 1.0);
    px[3] = (f32::from(px[3]) * keep).round() as u8;
    if px[3] == 0 {
        *px = Rgba([0, 0, 0, 0]);
    }
}

pub(crate) fn in_bounds(surface: &RgbaImage, x: i32, y: i32) -> bool {
    x >= 0 && y >= 0 && (x as u32) < surface.width() && (y as u32) < surface.height()
}

/// Calls `f(x, y, distance)` for every pixel whose centre lies within
/// `radius` of `center`.
pub(crate) fn for_each_in_disc(center: Pos2, radius: f32, mut f: impl FnMut(i32, i32, f32)) {
    let min_x = (center.x - radius).floor() as i32;
    let max_x = (center.x + radius).ceil() as i32;
    let min_y = (center.y - radius).floor() as i32;
    let max_y = (center.y + radius).ceil() as i32;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let d = Pos2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
            if d <= radius + 0.5 {
                f(x, y, d);
            }
        }
    }
}

/// Falloff from 1 at the centre to 0 at the rim; `hardness` is the share
/// of the radius that stays solid.
fn falloff(t: f32, hardness: f32) -> f32 {
    if t >= 1.0 {
        0.0
    } else if t <= hardness || hardness >= 1.0 {
        1.0
    } else {
        1.0 - (t - hardness) / (1.0 - hardness)
    }
}

fn random_in_disc<R: Rng + ?Sized>(rng: &mut R, center: Pos2, radius: f32) -> (i32, i32) {
    let angle = rng.gen_range(0.0..TAU);
    let dist = radius * rng.r#gen::<f32>().sqrt();
    (
        (center.x + angle.cos() * dist).floor() as i32,
        (center.y + angle.sin() * dist).floor() as i32,
    )
}

/// How many particles one dab of a scatter brush emits.
pub fn particle_count(kind: BrushKind, settings: &BrushSettings) -> usize {
    let n = match kind {
        BrushKind::Pencil => settings.size * 2.0,
        BrushKind::Charcoal => settings.size * 3.0,
        BrushKind::Spray => settings.size * 2.0 * settings.flow,
        _ => 0.0,
    };
    (n.ceil() as usize).max(1)
}

pub(super) fn soft(surface: &mut RgbaImage, pos: Pos2, color: Color32, size: f32, hardness: f32, strength: f32) {
    let radius = (size / 2.0).max(0.5);
    for_each_in_disc(pos, radius, |x, y, d| {
        let alpha = strength * falloff(d / radius, hardness);
        blend_over(surface, x, y, color, alpha);
    });
}

pub(super) fn hard(surface: &mut RgbaImage, pos: Pos2, color: Color32, size: f32, strength: f32) {
    let radius = (size / 2.0).max(0.5);
    for_each_in_disc(pos, radius, |x, y, d| {
        // one pixel of antialiasing on the rim
        let coverage = (radius - d + 0.5).clamp(0.0, 1.0);
        blend_over(surface, x, y, color, strength * coverage);
    });
}

pub(super) fn marker(surface: &mut RgbaImage, pos: Pos2, color: Color32, settings: &BrushSettings) {
    let radius = (settings.size / 2.0).max(0.5);
    let alpha = settings.strength() * 0.25;
    for_each_in_disc(pos, radius, |x, y, d| {
        if d <= radius {
            blend_over(surface, x, y, color, alpha);
        }
    });
}

pub(super) fn pencil<R: Rng + ?Sized>(
    surface: &mut RgbaImage,
    pos: Pos2,
    color: Color32,
    settings: &BrushSettings,
    rng: &mut R,
) {
    let spread = (settings.size / 4.0).max(1.0);
    for _ in 0..particle_count(BrushKind::Pencil, settings) {
        let (x, y) = random_in_disc(rng, pos, spread);
        let alpha = settings.strength() * rng.gen_range(0.4..0.9);
        blend_over(surface, x, y, color, alpha);
    }
}

pub(super) fn charcoal<R: Rng + ?Sized>(
    surface: &mut RgbaImage,
    pos: Pos2,
    color: Color32,
    settings: &BrushSettings,
    rng: &mut R,
) {
    let spread = (settings.size / 2.0).max(1.0);
    for _ in 0..particle_count(BrushKind::Charcoal, settings) {
        let (x, y) = random_in_disc(rng, pos, spread);
        let alpha = settings.strength() * rng.gen_range(0.1..0.5);
        blend_over(surface, x, y, color, alpha);
    }
}

pub(super) fn spray<R: Rng + ?Sized>(
    surface: &mut RgbaImage,
    pos: Pos2,
    color: Color32,
    settings: &BrushSettings,
    rng: &mut R,
) {
    let spread = (settings.size / 2.0).max(1.0);
    for _ in 0..particle_count(BrushKind::Spray, settings) {
        let (x, y) = random_in_disc(rng, pos, spread);
        blend_over(surface, x, y, color, settings.opacity);
    }
}

pub(super) fn erase_round(surface: &mut RgbaImage, pos: Pos2, size: f32, hardness: f32, strength: f32) {
    let radius = (size / 2.0).max(0.5);
    for_each_in_disc(pos, radius, |x, y, d| {
        erase_at(surface, x, y, strength * falloff(d / radius, hardness));
    });
}

/// Reads a pixel as straight RGBA floats, or `None` off the surface.
pub(crate) fn sample(surface: &RgbaImage, x: i32, y: i32) -> Option<[f32; 4]> {
    if !in_bounds(surface, x, y) {
        return None;
    }
    Some(surface.get_pixel(x as u32, y as u32).0.map(f32::from))
}
