use egui::{Color32, Pos2};
use image::RgbaImage;
use pixsketch::brush::{self, BrushKind, BrushSettings, particle_count};
use pixsketch::input::PointerEvent;
use pixsketch::state::{EditorContext, EditorMode};
use pixsketch::tools::Tool;
use rand::SeedableRng;
use rand::rngs::StdRng;

const CENTRE: Pos2 = Pos2::new(50.0, 50.0);

fn dab(kind: BrushKind, settings: &BrushSettings, seed: u64) -> RgbaImage {
    let mut surface = RgbaImage::new(100, 100);
    let mut rng = StdRng::seed_from_u64(seed);
    brush::paint(&mut surface, kind, None, CENTRE, Color32::RED, settings, &mut rng);
    surface
}

fn painted(surface: &RgbaImage) -> Vec<(u32, u32)> {
    surface
        .enumerate_pixels()
        .filter(|(_, _, px)| px[3] > 0)
        .map(|(x, y, _)| (x, y))
        .collect()
}

fn sized(size: f32) -> BrushSettings {
    BrushSettings {
        size,
        ..BrushSettings::default()
    }
}

#[test]
fn particle_count_grows_with_size() {
    for kind in [BrushKind::Pencil, BrushKind::Charcoal, BrushKind::Spray] {
        let small = particle_count(kind, &sized(4.0));
        let large = particle_count(kind, &sized(40.0));
        assert!(large > small, "{kind:?}: {small} vs {large}");
        assert!(small >= 1);
    }
}

#[test]
fn procedural_particles_stay_within_the_brush() {
    for kind in [BrushKind::Pencil, BrushKind::Charcoal, BrushKind::Spray] {
        for seed in 0..20 {
            let settings = sized(20.0);
            let surface = dab(kind, &settings, seed);
            let reach = settings.size / 2.0 + 1.5;
            for (x, y) in painted(&surface) {
                let d = Pos2::new(x as f32, y as f32).distance(CENTRE);
                assert!(d <= reach, "{kind:?} seed {seed}: ({x}, {y}) is {d} away");
                assert_eq!(&surface.get_pixel(x, y).0[..3], &[255, 0, 0]);
            }
        }
    }
}

#[test]
fn larger_spray_covers_more() {
    let small = painted(&dab(BrushKind::Spray, &sized(4.0), 9)).len();
    let large = painted(&dab(BrushKind::Spray, &sized(40.0), 9)).len();
    assert!(small <= 13, "{small}");
    assert!(large > 3 * small, "{small} vs {large}");
}

#[test]
fn zero_opacity_paints_nothing() {
    let settings = BrushSettings {
        opacity: 0.0,
        ..BrushSettings::default()
    };
    for kind in BrushKind::all() {
        assert!(painted(&dab(*kind, &settings, 1)).is_empty(), "{kind:?}");
    }
}

#[test]
fn procedural_output_depends_on_the_random_source() {
    let settings = sized(30.0);
    assert_eq!(
        dab(BrushKind::Spray, &settings, 4),
        dab(BrushKind::Spray, &settings, 4)
    );
    assert_ne!(
        dab(BrushKind::Spray, &settings, 4),
        dab(BrushKind::Spray, &settings, 5)
    );
}

#[test]
fn seeded_editors_paint_identically() {
    let paint = || {
        let mut editor = EditorContext::new();
        editor.seed_brushes(42);
        editor.set_mode(EditorMode::Sketch);
        editor.set_tool(Tool::Brush(BrushKind::Charcoal)).unwrap();
        editor.handle_pointer(PointerEvent::press(Pos2::new(100.0, 100.0)));
        editor.handle_pointer(PointerEvent::moved(Pos2::new(160.0, 120.0)));
        editor.handle_pointer(PointerEvent::release(Pos2::new(160.0, 120.0)));
        editor.state().layers.current().surface.clone()
    };
    let first = paint();
    assert!(first.pixels().any(|px| px[3] > 0));
    assert_eq!(first, paint());
}

#[test]
fn smudge_and_blur_only_move_existing_paint() {
    let settings = sized(12.0);
    let mut rng = StdRng::seed_from_u64(0);
    for kind in [BrushKind::Smudge, BrushKind::Blur] {
        let mut blank = RgbaImage::new(40, 40);
        brush::paint(
            &mut blank,
            kind,
            Some(Pos2::new(10.0, 20.0)),
            Pos2::new(30.0, 20.0),
            Color32::RED,
            &settings,
            &mut rng,
        );
        assert!(painted(&blank).is_empty(), "{kind:?} created paint from nothing");
    }
}
