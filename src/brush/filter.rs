//! Brushes that rework pixels already on the surface.

use egui::Pos2;
use image::{Rgba, RgbaImage};

use super::BrushSettings;
use super::dab::{for_each_in_disc, in_bounds, sample};
use crate::blend::{BlendMode, blend_pixel};

const SMUDGE_COPIES: usize = 3;
const BLUR_KERNEL_RADIUS: i32 = 2;
const BLUR_SIGMA: f32 = 1.0;

/// Drags the pixels around `from` toward `to` by compositing shifted copies
/// of the captured disc with decaying alpha.
pub(super) fn smudge(surface: &mut RgbaImage, from: Pos2, to: Pos2, settings: &BrushSettings) {
    let delta = to - from;
    if delta.length_sq() < f32::EPSILON {
        return;
    }
    let radius = (settings.size / 2.0).max(1.0);
    let strength = settings.opacity * settings.flow;

    let mut captured: Vec<(i32, i32, Rgba<u8>)> = Vec::new();
    for_each_in_disc(from, radius, |x, y, d| {
        if d <= radius && in_bounds(surface, x, y) {
            captured.push((x, y, *surface.get_pixel(x as u32, y as u32)));
        }
    });

    for k in 1..=SMUDGE_COPIES {
        let frac = k as f32 / SMUDGE_COPIES as f32;
        let alpha = strength * (1.0 - k as f32 / (SMUDGE_COPIES + 1) as f32);
        let shift = delta * frac;
        let (sx, sy) = (shift.x.round() as i32, shift.y.round() as i32);
        for &(x, y, px) in &captured {
            let (tx, ty) = (x + sx, y + sy);
            if in_bounds(surface, tx, ty) {
                let dst = surface.get_pixel_mut(tx as u32, ty as u32);
                *dst = blend_pixel(*dst, px, BlendMode::Normal, alpha);
            }
        }
    }
}

fn gaussian_kernel() -> Vec<f32> {
    let weights: Vec<f32> = (-BLUR_KERNEL_RADIUS..=BLUR_KERNEL_RADIUS)
        .map(|i| (-((i * i) as f32) / (2.0 * BLUR_SIGMA * BLUR_SIGMA)).exp())
        .collect();
    let total: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

/// Separable Gaussian blur inside the brush disc, mixed in by strength.
pub(super) fn blur(surface: &mut RgbaImage, pos: Pos2, settings: &BrushSettings) {
    let radius = (settings.size / 2.0).max(1.0);
    let strength = (settings.opacity * settings.flow).clamp(0.0, 1.0);
    let pad = BLUR_KERNEL_RADIUS;

    let min_x = ((pos.x - radius).floor() as i32 - pad).max(0);
    let min_y = ((pos.y - radius).floor() as i32 - pad).max(0);
    let max_x = ((pos.x + radius).ceil() as i32 + pad).min(surface.width() as i32 - 1);
    let max_y = ((pos.y + radius).ceil() as i32 + pad).min(surface.height() as i32 - 1);
    if min_x > max_x || min_y > max_y {
        return;
    }
    let w = (max_x - min_x + 1) as usize;
    let h = (max_y - min_y + 1) as usize;

    // Premultiplied so transparent pixels do not darken edges.
    let mut region = vec![[0f32; 4]; w * h];
    for y in 0..h {
        for x in 0..w {
            if let Some([r, g, b, a]) = sample(surface, min_x + x as i32, min_y + y as i32) {
                let f = a / 255.0;
                region[y * w + x] = [r * f, g * f, b * f, a];
            }
        }
    }

    let kernel = gaussian_kernel();
    let pass = |src: &[[f32; 4]], horizontal: bool| -> Vec<[f32; 4]> {
        let mut dst = vec![[0f32; 4]; w * h];
        for y in 0..h {
            for x in 0..w {
                let mut acc = [0f32; 4];
                for (k, weight) in kernel.iter().enumerate() {
                    let offset = k as i32 - BLUR_KERNEL_RADIUS;
                    let (sx, sy) = if horizontal {
                        ((x as i32 + offset).clamp(0, w as i32 - 1) as usize, y)
                    } else {
                        (x, (y as i32 + offset).clamp(0, h as i32 - 1) as usize)
                    };
                    let p = src[sy * w + sx];
                    for c in 0..4 {
                        acc[c] += p[c] * weight;
                    }
                }
                dst[y * w + x] = acc;
            }
        }
        dst
    };
    let horizontal = pass(region.as_slice(), true);
    let blurred = pass(horizontal.as_slice(), false);

    for_each_in_disc(pos, radius, |x, y, d| {
        if d > radius || x < min_x || y < min_y || x > max_x || y > max_y {
            return;
        }
        let i = (y - min_y) as usize * w + (x - min_x) as usize;
        let mixed: Vec<f32> = (0..4)
            .map(|c| region[i][c] + (blurred[i][c] - region[i][c]) * strength)
            .collect();
        let alpha = mixed[3];
        let px = if alpha <= 0.0 {
            Rgba([0, 0, 0, 0])
        } else {
            let f = 255.0 / alpha;
            Rgba([
                (mixed[0] * f).round().clamp(0.0, 255.0) as u8,
                (mixed[1] * f).round().clamp(0.0, 255.0) as u8,
                (mixed[2] * f).round().clamp(0.0, 255.0) as u8,
                alpha.round().clamp(0.0, 255.0) as u8,
            ])
        };
        surface.put_pixel(x as u32, y as u32, px);
    });
}
