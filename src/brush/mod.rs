//! Procedural brushes for sketch mode.
//!
//! A stroke arrives as a stream of points. The first point stamps one dab;
//! each following point stamps `max(1, ceil(distance / spacing))` dabs
//! evenly along the segment from the previous point.

mod dab;
mod filter;

use egui::{Color32, Pos2};
use image::RgbaImage;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub use dab::{blend_over, erase_at, particle_count};

/// The brush textures available in sketch mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushKind {
    Soft,
    Hard,
    Pencil,
    Charcoal,
    Marker,
    Spray,
    Smudge,
    Blur,
}

impl BrushKind {
    pub fn all() -> &'static [BrushKind] {
        &[
            Self::Soft,
            Self::Hard,
            Self::Pencil,
            Self::Charcoal,
            Self::Marker,
            Self::Spray,
            Self::Smudge,
            Self::Blur,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Soft => "Soft",
            Self::Hard => "Hard",
            Self::Pencil => "Pencil",
            Self::Charcoal => "Charcoal",
            Self::Marker => "Marker",
            Self::Spray => "Spray",
            Self::Smudge => "Smudge",
            Self::Blur => "Blur",
        }
    }

    /// Distance between interpolated dabs. Textured brushes are denser.
    pub fn step_spacing(self, size: f32) -> f32 {
        let spacing = match self {
            Self::Soft | Self::Hard => size / 4.0,
            Self::Marker => size / 6.0,
            Self::Spray | Self::Blur => size / 2.0,
            Self::Pencil => 1.0,
            Self::Charcoal | Self::Smudge => 2.0,
        };
        spacing.max(1.0)
    }
}

/// Per-stroke brush parameters, all but `size` in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    /// Diameter in canvas pixels
    pub size: f32,
    pub opacity: f32,
    /// 1.0 is a crisp edge, 0.0 fades from the centre
    pub hardness: f32,
    /// Paint laid down per dab
    pub flow: f32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            size: 10.0,
            opacity: 1.0,
            hardness: 0.5,
            flow: 1.0,
        }
    }
}

impl BrushSettings {
    /// Clamps every field into range.
    pub fn sanitized(self, max_size: f32) -> Self {
        Self {
            size: self.size.clamp(1.0, max_size.max(1.0)),
            opacity: self.opacity.clamp(0.0, 1.0),
            hardness: self.hardness.clamp(0.0, 1.0),
            flow: self.flow.clamp(0.0, 1.0),
        }
    }

    fn strength(&self) -> f32 {
        self.opacity * self.flow
    }
}

/// Dab positions for one stroke event.
pub fn interpolate(kind: BrushKind, size: f32, previous: Option<Pos2>, current: Pos2) -> Vec<Pos2> {
    let Some(previous) = previous else {
        return vec![current];
    };
    let distance = previous.distance(current);
    let steps = ((distance / kind.step_spacing(size)).ceil() as usize).max(1);
    (1..=steps)
        .map(|i| previous.lerp(current, i as f32 / steps as f32))
        .collect()
}

/// Paints one stroke event onto `surface`.
pub fn paint<R: Rng + ?Sized>(
    surface: &mut RgbaImage,
    kind: BrushKind,
    previous: Option<Pos2>,
    current: Pos2,
    color: Color32,
    settings: &BrushSettings,
    rng: &mut R,
) {
    let mut last = previous.unwrap_or(current);
    for pos in interpolate(kind, settings.size, previous, current) {
        match kind {
            BrushKind::Soft => dab::soft(surface, pos, color, settings.size, settings.hardness, settings.strength()),
            BrushKind::Hard => dab::hard(surface, pos, color, settings.size, settings.strength()),
            BrushKind::Pencil => dab::pencil(surface, pos, color, settings, rng),
            BrushKind::Charcoal => dab::charcoal(surface, pos, color, settings, rng),
            BrushKind::Marker => dab::marker(surface, pos, color, settings),
            BrushKind::Spray => dab::spray(surface, pos, color, settings, rng),
            BrushKind::Smudge => filter::smudge(surface, last, pos, settings),
            BrushKind::Blur => filter::blur(surface, pos, settings),
        }
        last = pos;
    }
}

/// Erases along one stroke event with a soft round tip.
pub fn erase(surface: &mut RgbaImage, previous: Option<Pos2>, current: Pos2, settings: &BrushSettings) {
    for pos in interpolate(BrushKind::Soft, settings.size, previous, current) {
        dab::erase_round(surface, pos, settings.size, settings.hardness, settings.strength());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn first_point_is_a_single_dab() {
        assert_eq!(interpolate(BrushKind::Soft, 10.0, None, Pos2::new(3.0, 4.0)).len(), 1);
    }

    #[test]
    fn textured_brushes_interpolate_densely() {
        let a = Pos2::new(0.0, 0.0);
        let b = Pos2::new(40.0, 0.0);
        let soft = interpolate(BrushKind::Soft, 20.0, Some(a), b).len();
        let charcoal = interpolate(BrushKind::Charcoal, 20.0, Some(a), b).len();
        assert_eq!(soft, 8);
        assert_eq!(charcoal, 20);
        assert_eq!(interpolate(BrushKind::Soft, 20.0, Some(a), a).len(), 1);
    }

    #[test]
    fn segment_ends_on_current_point() {
        let dabs = interpolate(BrushKind::Hard, 4.0, Some(Pos2::ZERO), Pos2::new(7.0, 7.0));
        assert_eq!(*dabs.last().unwrap(), Pos2::new(7.0, 7.0));
    }

    #[test]
    fn hard_brush_paints_centre() {
        let mut surface = RgbaImage::new(20, 20);
        let mut rng = StdRng::seed_from_u64(1);
        paint(
            &mut surface,
            BrushKind::Hard,
            None,
            Pos2::new(10.0, 10.0),
            Color32::RED,
            &BrushSettings::default(),
            &mut rng,
        );
        assert_eq!(surface.get_pixel(10, 10).0, [255, 0, 0, 255]);
        assert_eq!(surface.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn eraser_clears_paint() {
        let mut surface = RgbaImage::from_pixel(20, 20, image::Rgba([0, 0, 0, 255]));
        let settings = BrushSettings {
            hardness: 1.0,
            ..BrushSettings::default()
        };
        erase(&mut surface, None, Pos2::new(10.0, 10.0), &settings);
        assert_eq!(surface.get_pixel(10, 10)[3], 0);
        assert_eq!(surface.get_pixel(0, 0)[3], 255);
    }
}
