// Image move / resize / rotate gestures and export geometry

use lesson_editor_wasm::image::{export_size, DragAction, Handle, ImageTransformEngine, ImageTransformState};
use lesson_editor_wasm::{EditorConfig, EditorError, Point, Size};

fn ready_engine(rotation: f64) -> ImageTransformEngine {
    let mut engine = ImageTransformEngine::new(&EditorConfig::default());
    engine
        .load(Size::new(400.0, 400.0), Size::new(800.0, 600.0))
        .unwrap();
    engine
        .set_state(ImageTransformState {
            center_x: 200.0,
            center_y: 200.0,
            width: 100.0,
            height: 100.0,
            rotation_degrees: rotation,
        })
        .unwrap();
    engine
}

#[test]
fn test_width_never_drops_below_floor() {
    let mut engine = ready_engine(0.0);

    let action = engine.on_pointer_down(Point::new(150.0, 200.0)).unwrap();
    assert_eq!(action, Some(DragAction::Resize(Handle::West)));

    // Drag the west edge far past the east edge
    let state = engine.on_pointer_move(Point::new(350.0, 200.0)).unwrap().unwrap();
    assert_eq!(state.width, 20.0);
    assert_eq!(state.height, 100.0);

    let gesture = engine.on_pointer_up().unwrap();
    assert!(gesture.changed());
    assert!(!engine.is_dragging());
}

#[test]
fn test_east_resize_keeps_west_edge() {
    let mut engine = ready_engine(0.0);
    engine.on_pointer_down(Point::new(250.0, 200.0)).unwrap();
    let state = engine.on_pointer_move(Point::new(290.0, 200.0)).unwrap().unwrap();

    assert_eq!(state.width, 140.0);
    assert_eq!(state.center_x - state.width / 2.0, 150.0, "west edge is fixed");
}

#[test]
fn test_rotate_handle_follows_rotation() {
    let engine = ready_engine(45.0);

    let hit = engine.hit_test(Point::new(256.57, 143.43)).unwrap();
    assert_eq!(hit, Some(DragAction::Rotate));

    // The unrotated rotate-handle spot is empty space at 45°
    assert_eq!(engine.hit_test(Point::new(200.0, 120.0)).unwrap(), None);
}

#[test]
fn test_rotate_gesture_normalizes_angle() {
    let mut engine = ready_engine(0.0);
    assert_eq!(
        engine.on_pointer_down(Point::new(200.0, 120.0)).unwrap(),
        Some(DragAction::Rotate)
    );

    // Pointer straight to the left of center: -90°, reported as 270°
    let state = engine.on_pointer_move(Point::new(100.0, 200.0)).unwrap().unwrap();
    assert!((state.rotation_degrees - 270.0).abs() < 1e-9);
}

#[test]
fn test_body_drag_moves_center() {
    let mut engine = ready_engine(30.0);
    assert_eq!(
        engine.on_pointer_down(Point::new(200.0, 200.0)).unwrap(),
        Some(DragAction::Move)
    );
    engine.on_pointer_move(Point::new(210.0, 205.0)).unwrap();
    let state = engine.on_pointer_move(Point::new(230.0, 215.0)).unwrap().unwrap();
    assert_eq!((state.center_x, state.center_y), (230.0, 215.0));
    assert_eq!(state.rotation_degrees, 30.0);
}

#[test]
fn test_quarter_turn_export_swaps_dimensions() {
    let size = export_size(100.0, 50.0, 90.0);
    assert!((size.width - 50.0).abs() < 1e-9);
    assert!((size.height - 100.0).abs() < 1e-9);

    let diagonal = export_size(100.0, 100.0, 45.0);
    assert!((diagonal.width - 100.0 * 2f64.sqrt()).abs() < 1e-9);
}

#[test]
fn test_not_ready_until_loaded() {
    let mut engine = ImageTransformEngine::new(&EditorConfig::default());
    assert!(matches!(
        engine.on_pointer_down(Point::new(0.0, 0.0)),
        Err(EditorError::ImageNotReady)
    ));

    engine.mark_failed();
    assert!(matches!(engine.export_plan(), Err(EditorError::ImageNotReady)));
    assert!(engine
        .load(Size::new(0.0, 10.0), Size::new(100.0, 100.0))
        .is_err());
}
