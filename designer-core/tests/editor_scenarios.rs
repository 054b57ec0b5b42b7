//! Editor Integration Tests
//!
//! Exercises the editing session end to end:
//! - Add, update, undo and redo
//! - Bounded history and redo invalidation
//! - Layer reordering
//! - Drag gestures under zoom
//! - Persistence round-trips

use designer_core::{
    Canvas, Editor, EditorConfig, ElementPatch, ElementType, GestureKind, InputEvent, Key,
    KeyModifiers, Point, ShapeKind,
};
use proptest::prelude::*;

/// Editor with a 1000x1000 canvas shown at fit zoom 1.0.
fn editor() -> Editor {
    let mut editor = Editor::new(EditorConfig {
        fit_margin: 0.0,
        ..EditorConfig::default()
    });
    editor.resize_canvas(Canvas::custom(1000, 1000));
    editor.set_viewport_size(1000.0, 1000.0);
    editor
}

fn x_of(editor: &Editor, id: designer_core::ElementId) -> f32 {
    editor.element(id).expect("element exists").transform.x
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[test]
fn test_add_update_undo_redo() {
    let mut editor = Editor::default();
    assert!(editor.document().is_empty());

    let id = editor.add_text(&ElementPatch::default());
    let element = editor.element(id).expect("text added");
    assert!((element.transform.x - 100.0).abs() < f32::EPSILON);
    assert!((element.transform.y - 100.0).abs() < f32::EPSILON);

    let patch = ElementPatch {
        x: Some(300.0),
        ..ElementPatch::default()
    };
    editor.update_element(id, &patch).expect("update");
    assert!((x_of(&editor, id) - 300.0).abs() < f32::EPSILON);

    assert!(editor.undo());
    assert!((x_of(&editor, id) - 100.0).abs() < f32::EPSILON);

    assert!(editor.redo());
    assert!((x_of(&editor, id) - 300.0).abs() < f32::EPSILON);
}

#[test]
fn test_history_keeps_last_thirty_frames() {
    let mut editor = Editor::default();
    let ids: Vec<_> = (0..35)
        .map(|_| editor.add_shape(ShapeKind::Rectangle, &ElementPatch::default()))
        .collect();

    let mut undone = 0;
    for _ in 0..35 {
        if editor.undo() {
            undone += 1;
        }
    }
    assert_eq!(undone, 30);
    assert_eq!(editor.document().ids(), ids[..5].to_vec());
}

#[test]
fn test_new_mutation_invalidates_redo() {
    let mut editor = Editor::default();
    let id = editor.add_text(&ElementPatch::default());
    editor
        .update_element(id, &ElementPatch::position(10.0, 10.0))
        .expect("update");
    assert!(editor.undo());
    assert!(editor.can_redo());

    editor.add_shape(ShapeKind::Circle, &ElementPatch::default());
    assert!(!editor.can_redo());
    assert!(!editor.redo());
}

#[test]
fn test_undo_on_empty_history_is_noop() {
    let mut editor = Editor::default();
    let before = editor.snapshot();
    assert!(!editor.undo());
    assert!(!editor.redo());
    assert_eq!(editor.snapshot(), before);
}

// ---------------------------------------------------------------------------
// Gestures
// ---------------------------------------------------------------------------

#[test]
fn test_drag_delta_divides_by_zoom() {
    let mut editor = editor();
    let id = editor.add_shape(ShapeKind::Rectangle, &ElementPatch::position(100.0, 100.0));

    editor.set_zoom(2.0);
    editor
        .begin_gesture(id, GestureKind::Drag, Point::new(300.0, 300.0))
        .expect("begin");
    editor.update_gesture(Point::new(340.0, 320.0));
    assert!(editor.end_gesture());
    let t = editor.element(id).expect("element").transform;
    assert!((t.x - 120.0).abs() < 1e-4);
    assert!((t.y - 110.0).abs() < 1e-4);

    editor.set_zoom(0.5);
    editor
        .begin_gesture(id, GestureKind::Drag, Point::new(60.0, 55.0))
        .expect("begin");
    editor.update_gesture(Point::new(70.0, 45.0));
    editor.update_gesture(Point::new(65.0, 50.0));
    assert!(editor.end_gesture());
    let t = editor.element(id).expect("element").transform;
    assert!((t.x - 130.0).abs() < 1e-4);
    assert!((t.y - 100.0).abs() < 1e-4);
}

#[test]
fn test_pointer_event_drag_commits_once() {
    let mut editor = editor();
    let id = editor.add_shape(ShapeKind::Rectangle, &ElementPatch::position(100.0, 100.0));
    let frames = editor.history().undo_count();

    let events = [
        InputEvent::pointer_down(150.0, 150.0),
        InputEvent::pointer_move(160.0, 150.0),
        InputEvent::pointer_move(170.0, 160.0),
        InputEvent::pointer_move(180.0, 170.0),
        InputEvent::pointer_up(180.0, 170.0),
    ];
    for event in &events {
        editor.handle_event(event).expect("event");
    }

    assert_eq!(editor.history().undo_count(), frames + 1);
    let t = editor.element(id).expect("element").transform;
    assert!((t.x - 130.0).abs() < 1e-4);
    assert!((t.y - 120.0).abs() < 1e-4);
}

#[test]
fn test_escape_cancels_drag() {
    let mut editor = editor();
    let id = editor.add_shape(ShapeKind::Rectangle, &ElementPatch::position(100.0, 100.0));
    let frames = editor.history().undo_count();

    editor
        .handle_event(&InputEvent::pointer_down(150.0, 150.0))
        .expect("down");
    editor
        .handle_event(&InputEvent::pointer_move(250.0, 250.0))
        .expect("move");
    editor
        .handle_event(&InputEvent::key(Key::Escape))
        .expect("escape");

    assert!((x_of(&editor, id) - 100.0).abs() < f32::EPSILON);
    assert_eq!(editor.history().undo_count(), frames);
    assert_eq!(editor.selection(), Some(id));
}

#[test]
fn test_zoom_shortcuts_clamp() {
    let mut editor = editor();
    for _ in 0..40 {
        editor
            .handle_event(&InputEvent::key(Key::Character('+')))
            .expect("zoom in");
    }
    assert!((editor.viewport().user_zoom() - 3.0).abs() < 1e-4);

    for _ in 0..40 {
        editor
            .handle_event(&InputEvent::key(Key::Character('-')))
            .expect("zoom out");
    }
    assert!((editor.viewport().user_zoom() - 0.25).abs() < 1e-4);

    editor
        .handle_event(&InputEvent::key_with(Key::Character('0'), KeyModifiers::CTRL))
        .expect("reset");
    assert!((editor.viewport().user_zoom() - 1.0).abs() < f32::EPSILON);
}

// ---------------------------------------------------------------------------
// Guides and selection
// ---------------------------------------------------------------------------

#[test]
fn test_guides_follow_selection() {
    let mut editor = editor();
    editor.add_shape(ShapeKind::Rectangle, &ElementPatch::position(100.0, 500.0));
    let moving = editor.add_shape(ShapeKind::Rectangle, &ElementPatch::position(102.0, 20.0));

    // Left edges (102 vs 100) and centers (177 vs 175) both match; the
    // center is checked last.
    let guides = editor.guides();
    assert_eq!(guides.vertical, Some(175.0));
    assert_eq!(guides.horizontal, None);

    editor
        .update_element(moving, &ElementPatch::position(300.0, 20.0))
        .expect("move");
    assert!(editor.guides().is_empty());

    editor.clear_selection();
    assert!(editor.guides().is_empty());
}

#[test]
fn test_layers_panel_lists_topmost_first() {
    let mut editor = Editor::default();
    let bottom = editor.add_element(
        ElementType::Shape,
        &ElementPatch {
            name: Some("Backdrop".into()),
            ..ElementPatch::default()
        },
    );
    let top = editor.add_text(&ElementPatch::default());

    let layers = editor.layers();
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[0].id, top);
    assert!(layers[0].selected);
    assert_eq!(layers[1].id, bottom);
    assert_eq!(layers[1].name, "Backdrop");
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn test_save_load_preserves_elements_not_session() {
    let mut editor = Editor::default();
    editor.add_text(&ElementPatch {
        text: Some("Grand Opening".into()),
        font_size: Some(48.0),
        ..ElementPatch::default()
    });
    editor.add_image("photo.jpg", &ElementPatch::default());
    let json = editor.save_design().expect("save");

    let restored = Editor::from_design(&json, EditorConfig::default()).expect("load");
    assert_eq!(restored.document(), editor.document());
    assert!(!restored.can_undo());
    assert_eq!(restored.selection(), None);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Op {
    AddText,
    AddShape,
    MoveLast(f32, f32),
    DeleteFirst,
    Reverse,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::AddText),
        Just(Op::AddShape),
        (-500.0f32..500.0f32, -500.0f32..500.0f32).prop_map(|(x, y)| Op::MoveLast(x, y)),
        Just(Op::DeleteFirst),
        Just(Op::Reverse),
    ]
}

/// Apply `op`, returning whether it mutated the document.
fn apply(editor: &mut Editor, op: &Op) -> bool {
    let ids = editor.document().ids();
    match op {
        Op::AddText => {
            editor.add_text(&ElementPatch::default());
            true
        }
        Op::AddShape => {
            editor.add_shape(ShapeKind::Circle, &ElementPatch::default());
            true
        }
        Op::MoveLast(x, y) => match ids.last() {
            Some(id) => editor
                .update_element(*id, &ElementPatch::position(*x, *y))
                .is_ok(),
            None => false,
        },
        Op::DeleteFirst => match ids.first() {
            Some(id) => editor.delete_element(*id).is_ok(),
            None => false,
        },
        Op::Reverse => {
            let reversed: Vec<_> = ids.into_iter().rev().collect();
            editor.reorder_elements(&reversed).is_ok()
        }
    }
}

proptest! {
    #[test]
    fn prop_undo_redo_inverse(ops in prop::collection::vec(arb_op(), 0..30)) {
        let mut editor = Editor::default();
        let initial = editor.elements().to_vec();

        let mut applied = 0;
        for op in &ops {
            if apply(&mut editor, op) {
                applied += 1;
            }
        }
        let after = editor.elements().to_vec();

        for _ in 0..applied {
            prop_assert!(editor.undo());
        }
        prop_assert_eq!(editor.elements().to_vec(), initial);
        prop_assert!(!editor.undo());

        for _ in 0..applied {
            prop_assert!(editor.redo());
        }
        prop_assert_eq!(editor.elements().to_vec(), after);
    }

    #[test]
    fn prop_reorder_preserves_elements(count in 1usize..12, rotate_by in 0usize..12) {
        let mut editor = Editor::default();
        for _ in 0..count {
            editor.add_text(&ElementPatch::default());
        }
        let before = editor.elements().to_vec();

        let mut order = editor.document().ids();
        order.rotate_left(rotate_by % count);
        editor.reorder_elements(&order).expect("permutation");

        prop_assert_eq!(editor.document().ids(), order);
        prop_assert_eq!(editor.document().len(), before.len());
        for element in &before {
            prop_assert_eq!(editor.element(element.id), Some(element));
        }
    }

    #[test]
    fn prop_drag_round_trip(
        zoom_steps in 0u32..25,
        dx in -200.0f32..200.0f32,
        dy in -200.0f32..200.0f32,
    ) {
        let mut editor = editor();
        let id = editor.add_text(&ElementPatch::position(400.0, 400.0));
        #[allow(clippy::cast_precision_loss)]
        let zoom = 0.5 + zoom_steps as f32 * 0.1;
        editor.set_zoom(zoom);
        let z = editor.viewport().total_zoom();

        let start = Point::new(500.0, 500.0);
        editor.begin_gesture(id, GestureKind::Drag, start).expect("begin");
        editor.update_gesture(Point::new(start.x + dx, start.y + dy));
        editor.end_gesture();

        let t = editor.element(id).expect("element").transform;
        prop_assert!((t.x - (400.0 + dx / z)).abs() < 1e-2);
        prop_assert!((t.y - (400.0 + dy / z)).abs() < 1e-2);
    }
}
