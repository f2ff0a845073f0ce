use egui::{Color32, Pos2};
use futures::executor::block_on;
use pixsketch::command::Command;
use pixsketch::error::EditorError;
use pixsketch::input::PointerEvent;
use pixsketch::config::MAX_CANVAS_SIDE;
use pixsketch::state::{CanvasSize, EditorContext, EditorMode, ProjectFile};
use pixsketch::symmetry::SymmetryMode;
use pixsketch::tools::Tool;

fn dot(editor: &mut EditorContext, x: f32, y: f32) {
    editor.handle_pointer(PointerEvent::press(Pos2::new(x, y)));
    editor.handle_pointer(PointerEvent::release(Pos2::new(x, y)));
}

fn pixel_project() -> EditorContext {
    let mut editor = EditorContext::new();
    editor.set_primary_color(Color32::from_rgb(0x12, 0x34, 0x56));
    dot(&mut editor, 3.0, 4.0);
    editor.set_symmetry(SymmetryMode::Vertical);
    editor.execute(Command::AddSprite { name: "Walk".into() }).unwrap();
    dot(&mut editor, 1.0, 1.0);
    editor.execute(Command::Resize { width: 24, height: 8 }).unwrap();
    editor
}

#[test]
fn pixel_project_round_trips() {
    let editor = pixel_project();
    let saved = editor.save_project().unwrap();

    let mut loaded = EditorContext::new();
    block_on(loaded.load_project(&saved)).unwrap();

    assert_eq!(loaded.save_project().unwrap(), saved);
    assert_eq!(loaded.state().grid, editor.state().grid);
    let (a, b) = (&editor.state().sprites, &loaded.state().sprites);
    assert_eq!(b.len(), 2);
    assert_eq!(b.current_index(), a.current_index());
    assert_eq!(b.sprites()[0], a.sprites()[0]);
    assert_eq!(b.current().name, "Walk");
    assert_eq!(loaded.state().symmetry, SymmetryMode::Vertical);
    assert_eq!(loaded.export_png(2).unwrap(), editor.export_png(2).unwrap());
    // loading starts a fresh history
    assert!(!loaded.can_undo());
}

#[test]
fn sketch_layers_round_trip_bit_exact() {
    let mut editor = EditorContext::new();
    editor.seed_brushes(3);
    editor.set_mode(EditorMode::Sketch);
    editor.set_primary_color(Color32::from_rgb(200, 10, 90));
    dot(&mut editor, 40.0, 40.0);
    editor.execute(Command::AddLayer).unwrap();
    editor.set_tool(Tool::Brush(pixsketch::brush::BrushKind::Charcoal)).unwrap();
    dot(&mut editor, 45.0, 42.0);
    editor
        .execute(Command::SetLayerOpacity { index: 1, opacity: 0.25 })
        .unwrap();

    let saved = editor.save_project().unwrap();
    let mut loaded = EditorContext::new();
    block_on(loaded.load_project(&saved)).unwrap();

    assert_eq!(loaded.mode(), EditorMode::Sketch);
    let (a, b) = (&editor.state().layers, &loaded.state().layers);
    assert_eq!(a.len(), b.len());
    assert_eq!(a.current_index(), b.current_index());
    for (before, after) in a.layers().iter().zip(b.layers()) {
        assert_eq!(before.surface, after.surface);
        assert_eq!(before.name, after.name);
        assert_eq!(before.opacity, after.opacity);
    }
    assert_eq!(loaded.export_png(1).unwrap(), editor.export_png(1).unwrap());
}

#[test]
fn corrupt_file_leaves_editor_untouched() {
    let mut editor = pixel_project();
    let before = editor.save_project().unwrap();
    let revision = editor.revision();

    for bad in ["", "{", "[1, 2, 3]", "{\"version\": 2}"] {
        let result = block_on(editor.load_project(bad));
        assert!(matches!(result, Err(EditorError::CorruptProjectFile(_))), "{bad:?}");
    }

    // a single broken layer fails the whole load
    let mut file = ProjectFile::from_json(&before).unwrap();
    file.layers[0].data = "data:image/png;base64,AAAA".to_string();
    let broken = file.to_json().unwrap();
    assert!(block_on(editor.load_project(&broken)).is_err());

    let mut file = ProjectFile::from_json(&before).unwrap();
    file.version = 99;
    assert!(block_on(editor.load_project(&file.to_json().unwrap())).is_err());

    assert_eq!(editor.save_project().unwrap(), before);
    assert_eq!(editor.revision(), revision);
    assert!(editor.can_undo());
}

#[test]
fn oversized_canvas_is_rejected_without_change() {
    let mut editor = pixel_project();
    let before = editor.save_project().unwrap();
    let revision = editor.revision();

    for (width, height) in [(u32::MAX, u32::MAX), (60_000, 60_000), (MAX_CANVAS_SIDE + 1, 16)] {
        let mut file = ProjectFile::from_json(&before).unwrap();
        file.sketch_canvas = Some(CanvasSize { width, height });
        file.layers.clear();
        let result = block_on(editor.load_project(&file.to_json().unwrap()));
        assert!(matches!(result, Err(EditorError::CorruptProjectFile(_))), "{width}x{height}");
    }

    let mut file = ProjectFile::from_json(&before).unwrap();
    file.canvas_width = usize::MAX;
    let result = block_on(editor.load_project(&file.to_json().unwrap()));
    assert!(matches!(result, Err(EditorError::CorruptProjectFile(_))));

    assert_eq!(editor.save_project().unwrap(), before);
    assert_eq!(editor.revision(), revision);
}

#[test]
fn empty_cells_save_as_transparent() {
    let editor = EditorContext::new();
    let file = ProjectFile::from_json(&editor.save_project().unwrap()).unwrap();
    assert_eq!(file.version, 2);
    assert!(file.grid.iter().flatten().all(|cell| cell == "transparent"));
    assert_eq!(file.sprites.len(), 1);
    assert_eq!(file.layers.len(), 1);
}
