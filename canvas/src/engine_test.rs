#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::clock::ManualClock;
use crate::doc::{ElementStore, MindMapNode};

// =============================================================
// Helpers
// =============================================================

fn core_at(start_ms: u64) -> (EngineCore, ManualClock) {
    let clock = ManualClock::new(start_ms);
    let core = EngineCore::with_parts(EngineConfig::default(), Box::new(clock.clone()), 42);
    (core, clock)
}

fn core() -> EngineCore {
    core_at(1_000).0
}

fn no_modifiers() -> Modifiers {
    Modifiers::default()
}

fn ctrl_modifier() -> Modifiers {
    Modifiers { ctrl: true, ..Default::default() }
}

fn shift_modifier() -> Modifiers {
    Modifiers { shift: true, ..Default::default() }
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn id(raw: &str) -> ElementId {
    ElementId::new(raw)
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

fn has_render_needed(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::RenderNeeded))
}

fn has_document_changed(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::DocumentChanged))
}

fn created_id(actions: &[Action]) -> ElementId {
    actions
        .iter()
        .find_map(|a| match a {
            Action::ElementCreated { id, .. } => Some(id.clone()),
            _ => None,
        })
        .unwrap()
}

fn add_text(core: &mut EngineCore, raw: &str, x: f64, y: f64) {
    core.board.texts.insert(TextElement {
        id: id(raw),
        x,
        y,
        width: 200.0,
        height: 40.0,
        rotation: 0.0,
        text: "Text".into(),
        font_size: 32.0,
        style: TextStyle::default(),
        gradient: GradientRef::new("Ocean"),
        color: None,
        is_editing: false,
    });
}

fn add_shape(core: &mut EngineCore, raw: &str, x: f64, y: f64) {
    core.board.shapes.insert(ShapeElement {
        id: id(raw),
        shape: ShapeKind::Rectangle,
        x,
        y,
        width: 100.0,
        height: 100.0,
        text: String::new(),
        style: TextStyle::default(),
        gradient: GradientRef::new("Gray"),
        text_color: None,
        is_editing: false,
    });
}

fn add_image(core: &mut EngineCore, raw: &str, x: f64, y: f64) {
    core.board.images.insert(ImageElement { id: id(raw), x, y, width: 200.0, height: 200.0, src: "data:,".into() });
}

fn click(core: &mut EngineCore, at: Point, modifiers: Modifiers) -> Vec<Action> {
    core.on_pointer_down(at, Button::Primary, modifiers);
    core.on_pointer_up(at, Button::Primary, modifiers)
}

fn drag(core: &mut EngineCore, from: Point, to: Point) -> Vec<Action> {
    core.on_pointer_down(from, Button::Primary, no_modifiers());
    core.on_pointer_move(to, no_modifiers());
    core.on_pointer_up(to, Button::Primary, no_modifiers())
}

fn shape_pos(core: &EngineCore, raw: &str) -> Point {
    core.board.store(ElementKind::Shape).position_of(&id(raw)).unwrap()
}

// =============================================================
// EngineCore: construction and defaults
// =============================================================

#[test]
fn core_starts_idle_with_identity_camera() {
    let core = core();
    assert_eq!(core.mode(), "idle");
    assert_eq!(core.camera(), Camera::default());
    assert_eq!(core.tool(), Tool::Text);
    assert!(core.board.is_empty());
}

#[test]
fn action_serializes_with_type_tag() {
    let value = serde_json::to_value(Action::SetCursor { cursor: "move" }).unwrap();
    assert_eq!(value, json!({ "type": "set_cursor", "cursor": "move" }));
    let value = serde_json::to_value(Action::ElementsDeleted { kind: ElementKind::MindMap, ids: vec![id("a")] }).unwrap();
    assert_eq!(value, json!({ "type": "elements_deleted", "kind": "mind_map", "ids": ["a"] }));
}

// =============================================================
// Mode exclusion
// =============================================================

#[test]
fn pointer_down_during_gesture_is_ignored() {
    let mut core = core();
    core.on_pointer_down(pt(10.0, 10.0), Button::Secondary, no_modifiers());
    let actions = core.on_pointer_down(pt(10.0, 10.0), Button::Primary, no_modifiers());
    assert!(actions.is_empty());
    assert_eq!(core.mode(), "panning");
}

#[test]
fn pointer_up_when_idle_is_noop() {
    let mut core = core();
    assert!(core.on_pointer_up(pt(0.0, 0.0), Button::Primary, no_modifiers()).is_empty());
}

#[test]
fn pointer_leave_closes_gesture_like_pointer_up() {
    let mut core = core();
    core.on_pointer_down(pt(500.0, 500.0), Button::Primary, no_modifiers());
    assert_eq!(core.mode(), "marquee");
    let actions = core.on_pointer_leave(pt(600.0, 600.0), no_modifiers());
    assert_eq!(core.mode(), "idle");
    assert!(has_render_needed(&actions));
}

// =============================================================
// Viewport
// =============================================================

#[test]
fn secondary_drag_pans_from_anywhere() {
    let mut core = core();
    add_shape(&mut core, "s", 0.0, 0.0);
    core.on_pointer_down(pt(50.0, 50.0), Button::Secondary, no_modifiers());
    core.on_pointer_move(pt(80.0, 40.0), no_modifiers());
    core.on_pointer_move(pt(90.0, 45.0), no_modifiers());
    core.on_pointer_up(pt(90.0, 45.0), Button::Secondary, no_modifiers());
    assert_eq!((core.camera.pan_x, core.camera.pan_y), (40.0, -5.0));
    assert_eq!(shape_pos(&core, "s"), pt(0.0, 0.0));
}

#[test]
fn middle_button_pans() {
    let mut core = core();
    core.on_pointer_down(pt(0.0, 0.0), Button::Middle, no_modifiers());
    assert_eq!(core.mode(), "panning");
}

#[test]
fn wheel_up_zooms_in_about_cursor() {
    let mut core = core();
    let actions = core.on_wheel(pt(100.0, 100.0), WheelDelta { dx: 0.0, dy: -1.0 }, no_modifiers());
    assert!(has_render_needed(&actions));
    assert!((core.camera.zoom - 1.1).abs() < 1e-9);
    assert!((core.camera.pan_x - -10.0).abs() < 1e-9);
    let world = core.camera.screen_to_world(pt(100.0, 100.0));
    assert!((world.x - 100.0).abs() < 1e-9 && (world.y - 100.0).abs() < 1e-9);
}

#[test]
fn wheel_down_zooms_out() {
    let mut core = core();
    core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 0.0, dy: 3.0 }, no_modifiers());
    assert!((core.camera.zoom - 0.9).abs() < 1e-9);
}

#[test]
fn ctrl_wheel_passes_through() {
    let mut core = core();
    let actions = core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 0.0, dy: -1.0 }, ctrl_modifier());
    assert!(actions.is_empty());
    assert_eq!(core.camera(), Camera::default());
}

#[test]
fn initial_zoom_respects_configured_range() {
    let config = EngineConfig { zoom_min: 2.0, zoom_max: 4.0, ..EngineConfig::default() };
    let mut core = EngineCore::with_parts(config, Box::new(ManualClock::new(0)), 1);
    assert_eq!(core.camera.zoom, 2.0);
    core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 0.0, dy: 1.0 }, no_modifiers());
    assert_eq!(core.camera.zoom, 2.0);
}

#[test]
fn wheel_zoom_stays_in_bounds() {
    let mut core = core();
    for _ in 0..100 {
        core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 0.0, dy: -1.0 }, no_modifiers());
    }
    assert_eq!(core.camera.zoom, 3.0);
    for _ in 0..100 {
        core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 0.0, dy: 1.0 }, no_modifiers());
    }
    assert_eq!(core.camera.zoom, 0.2);
}

// =============================================================
// Marquee
// =============================================================

#[test]
fn marquee_replaces_selection_and_clears_images_and_arrows() {
    let mut core = core();
    add_text(&mut core, "t", 0.0, 0.0);
    add_shape(&mut core, "s", 300.0, 0.0);
    add_shape(&mut core, "far", 2000.0, 2000.0);
    add_image(&mut core, "i", 0.0, 600.0);
    core.board.selection.replace(ElementKind::Shape, [id("far")]);
    core.board.selection.replace(ElementKind::Image, [id("i")]);

    core.on_pointer_down(pt(-10.0, -10.0), Button::Primary, no_modifiers());
    core.on_pointer_move(pt(200.0, 30.0), no_modifiers());
    assert_eq!(core.marquee(), Some(Rect::from_corners(pt(-10.0, -10.0), pt(200.0, 30.0))));
    core.on_pointer_move(pt(350.0, 50.0), no_modifiers());
    let actions = core.on_pointer_up(pt(350.0, 50.0), Button::Primary, no_modifiers());

    assert!(has_action(&actions, |a| matches!(a, Action::SelectionChanged)));
    assert_eq!(core.board.selection.ids(ElementKind::Text), vec![id("t")]);
    assert_eq!(core.board.selection.ids(ElementKind::Shape), vec![id("s")]);
    assert!(core.board.selection.image.is_empty());
    assert!(core.marquee().is_none());
}

#[test]
fn marquee_resolves_from_last_move_not_release_point() {
    let mut core = core();
    add_shape(&mut core, "near", 0.0, 0.0);
    add_shape(&mut core, "far", 900.0, 900.0);
    core.on_pointer_down(pt(-10.0, -10.0), Button::Primary, no_modifiers());
    core.on_pointer_move(pt(150.0, 150.0), no_modifiers());
    core.on_pointer_leave(pt(5000.0, 5000.0), no_modifiers());
    assert_eq!(core.board.selection.ids(ElementKind::Shape), vec![id("near")]);
}

#[test]
fn marquee_click_on_empty_canvas_clears_selection() {
    let mut core = core();
    add_shape(&mut core, "s", 0.0, 0.0);
    core.board.selection.replace(ElementKind::Shape, [id("s")]);
    core.board.selection.active_mind_map = Some(id("m"));
    core.on_pointer_down(pt(1000.0, 1000.0), Button::Primary, no_modifiers());
    core.on_pointer_up(pt(1002.0, 1001.0), Button::Primary, no_modifiers());
    assert!(core.board.selection.is_empty());
}

#[test]
fn ctrl_click_on_empty_canvas_keeps_selection() {
    let mut core = core();
    add_shape(&mut core, "s", 0.0, 0.0);
    core.board.selection.replace(ElementKind::Shape, [id("s")]);
    click(&mut core, pt(1000.0, 1000.0), ctrl_modifier());
    assert_eq!(core.board.selection.ids(ElementKind::Shape), vec![id("s")]);
}

// =============================================================
// Click selection
// =============================================================

#[test]
fn click_selects_only_that_element() {
    let mut core = core();
    add_text(&mut core, "t", 0.0, 500.0);
    add_shape(&mut core, "s", 0.0, 0.0);
    core.board.selection.replace(ElementKind::Text, [id("t")]);
    click(&mut core, pt(50.0, 50.0), no_modifiers());
    assert_eq!(core.board.selection.ids(ElementKind::Shape), vec![id("s")]);
    assert!(core.board.selection.text.is_empty());
}

#[test]
fn clicking_sole_selected_shape_deselects_it() {
    let mut core = core();
    add_shape(&mut core, "s", 0.0, 0.0);
    click(&mut core, pt(50.0, 50.0), no_modifiers());
    click(&mut core, pt(50.0, 50.0), no_modifiers());
    assert!(core.board.selection.is_empty());
}

#[test]
fn clicking_selected_text_keeps_it_selected() {
    let mut core = core();
    add_text(&mut core, "t", 300.0, 300.0);
    click(&mut core, pt(350.0, 320.0), no_modifiers());
    click(&mut core, pt(350.0, 320.0), no_modifiers());
    assert_eq!(core.board.selection.ids(ElementKind::Text), vec![id("t")]);
}

#[test]
fn ctrl_click_toggles_within_kind() {
    let mut core = core();
    add_shape(&mut core, "a", 0.0, 0.0);
    add_shape(&mut core, "b", 300.0, 0.0);
    click(&mut core, pt(50.0, 50.0), no_modifiers());
    click(&mut core, pt(350.0, 50.0), ctrl_modifier());
    assert_eq!(core.board.selection.ids(ElementKind::Shape), vec![id("a"), id("b")]);
    click(&mut core, pt(50.0, 50.0), ctrl_modifier());
    assert_eq!(core.board.selection.ids(ElementKind::Shape), vec![id("b")]);
}

#[test]
fn clicking_mind_map_node_makes_it_active() {
    let mut core = core();
    let added = mindmap::add_node(&mut core.board.mind_map, id("m"), "Node", None, pt(0.0, 0.0), GradientRef::new("Gold"));
    assert!(added.is_some());
    click(&mut core, pt(30.0, 20.0), no_modifiers());
    assert_eq!(core.board.selection.active_mind_map, Some(id("m")));
    assert!(core.board.selection.contains(ElementKind::MindMap, &id("m")));
}

#[test]
fn pointer_down_on_editing_element_does_nothing() {
    let mut core = core();
    add_shape(&mut core, "s", 0.0, 0.0);
    core.board.shapes.get_mut(&id("s")).unwrap().is_editing = true;
    let actions = core.on_pointer_down(pt(50.0, 50.0), Button::Primary, no_modifiers());
    assert!(actions.is_empty());
    assert_eq!(core.mode(), "idle");
}

// =============================================================
// Element drag
// =============================================================

#[test]
fn dragging_unselected_element_moves_only_it_and_selects_it() {
    let mut core = core();
    add_shape(&mut core, "a", 0.0, 0.0);
    add_shape(&mut core, "b", 300.0, 0.0);
    core.board.selection.replace(ElementKind::Shape, [id("b")]);
    let actions = drag(&mut core, pt(50.0, 50.0), pt(80.0, 60.0));
    assert_eq!(shape_pos(&core, "a"), pt(30.0, 10.0));
    assert_eq!(shape_pos(&core, "b"), pt(300.0, 0.0));
    assert_eq!(core.board.selection.ids(ElementKind::Shape), vec![id("a")]);
    assert!(has_document_changed(&actions));
}

#[test]
fn dragging_selected_element_moves_whole_selection() {
    let mut core = core();
    add_shape(&mut core, "a", 0.0, 0.0);
    add_shape(&mut core, "b", 300.0, 0.0);
    add_text(&mut core, "t", 0.0, 500.0);
    core.board.selection.replace(ElementKind::Shape, [id("a"), id("b")]);
    drag(&mut core, pt(50.0, 50.0), pt(60.0, 70.0));
    assert_eq!(shape_pos(&core, "a"), pt(10.0, 20.0));
    assert_eq!(shape_pos(&core, "b"), pt(310.0, 20.0));
    assert_eq!(core.board.store(ElementKind::Text).position_of(&id("t")), Some(pt(0.0, 500.0)));
    assert_eq!(core.board.selection.ids(ElementKind::Shape), vec![id("a"), id("b")]);
}

#[test]
fn tiny_drag_is_a_click() {
    let mut core = core();
    add_shape(&mut core, "a", 0.0, 0.0);
    let actions = drag(&mut core, pt(50.0, 50.0), pt(52.0, 53.0));
    assert!(!has_document_changed(&actions));
    assert_eq!(core.board.selection.ids(ElementKind::Shape), vec![id("a")]);
}

#[test]
fn drag_emits_update_per_moved_element() {
    let mut core = core();
    add_shape(&mut core, "a", 0.0, 0.0);
    add_shape(&mut core, "b", 300.0, 0.0);
    core.board.selection.replace(ElementKind::Shape, [id("a"), id("b")]);
    core.on_pointer_down(pt(50.0, 50.0), Button::Primary, no_modifiers());
    let actions = core.on_pointer_move(pt(90.0, 50.0), no_modifiers());
    let updates = actions.iter().filter(|a| matches!(a, Action::ElementUpdated { .. })).count();
    assert_eq!(updates, 2);
}

// =============================================================
// Resize / rotate
// =============================================================

#[test]
fn shape_resize_handle_resizes_with_floor() {
    let mut core = core();
    add_shape(&mut core, "s", 0.0, 0.0);
    core.on_pointer_down(pt(100.0, 100.0), Button::Primary, no_modifiers());
    assert_eq!(core.mode(), "resizing");
    core.on_pointer_move(pt(140.0, 60.0), no_modifiers());
    let s = core.board.shapes.get(&id("s")).unwrap();
    assert_eq!((s.width, s.height), (140.0, 60.0));
    core.on_pointer_move(pt(0.0, 0.0), no_modifiers());
    let s = core.board.shapes.get(&id("s")).unwrap();
    assert_eq!((s.width, s.height), (50.0, 50.0));
    let actions = core.on_pointer_up(pt(0.0, 0.0), Button::Primary, no_modifiers());
    assert!(has_document_changed(&actions));
}

#[test]
fn resize_uses_screen_pixels_regardless_of_zoom() {
    let mut core = core();
    add_shape(&mut core, "s", 0.0, 0.0);
    core.camera.zoom = 2.0;
    core.on_pointer_down(pt(200.0, 200.0), Button::Primary, no_modifiers());
    core.on_pointer_move(pt(220.0, 200.0), no_modifiers());
    assert_eq!(core.board.shapes.get(&id("s")).unwrap().width, 120.0);
}

#[test]
fn selected_text_rotates_about_center() {
    let mut core = core();
    add_text(&mut core, "t", 0.0, 0.0);
    core.board.selection.replace(ElementKind::Text, [id("t")]);
    core.on_pointer_down(pt(200.0, 0.0), Button::Primary, no_modifiers());
    assert_eq!(core.mode(), "rotating");
    core.on_pointer_move(pt(100.0, 120.0), no_modifiers());
    let t = core.board.texts.get(&id("t")).unwrap();
    let expected = 90.0 - (-20.0_f64).atan2(100.0).to_degrees();
    assert!((t.rotation - expected).abs() < 1e-9);
    assert_eq!((t.x, t.y, t.width, t.height), (0.0, 0.0, 200.0, 40.0));
}

// =============================================================
// Drawing
// =============================================================

#[test]
fn pen_draws_stroke_that_is_swept_after_lifetime() {
    let (mut core, clock) = core_at(1_000);
    core.set_tool(Tool::Pen);
    let down = core.on_pointer_down(pt(0.0, 0.0), Button::Primary, no_modifiers());
    assert!(!has_action(&down, |a| matches!(a, Action::ElementCreated { .. })));
    core.on_pointer_move(pt(10.0, 10.0), no_modifiers());
    core.on_pointer_move(pt(20.0, 5.0), no_modifiers());
    let up = core.on_pointer_up(pt(20.0, 5.0), Button::Primary, no_modifiers());
    assert!(has_document_changed(&up));
    let stroke_id = created_id(&up);

    let stroke = core.board.strokes.get(&stroke_id).unwrap();
    assert_eq!(stroke.points.len(), 3);
    assert_eq!(stroke.created_at, 1_000);
    assert_eq!(stroke.stroke_width, 2.0);

    clock.set(4_000);
    assert!(!has_action(&core.on_tick(), |a| matches!(a, Action::ElementsDeleted { .. })));
    assert_eq!(core.board.strokes.len(), 1);
    clock.set(5_000);
    let actions = core.on_tick();
    assert!(has_action(&actions, |a| matches!(a, Action::ElementsDeleted { kind: ElementKind::Stroke, .. })));
    assert!(core.board.strokes.is_empty());
}

#[test]
fn long_stroke_survives_ticks_while_drawing() {
    let (mut core, clock) = core_at(1_000);
    core.set_tool(Tool::Pen);
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary, no_modifiers());
    core.on_pointer_move(pt(10.0, 0.0), no_modifiers());
    assert!(core.board.strokes.is_empty());
    assert!(core.snapshot().stroke_elements.is_empty());

    clock.set(5_500);
    let tick = core.on_tick();
    assert!(!has_action(&tick, |a| matches!(a, Action::ElementsDeleted { .. })));
    core.on_pointer_move(pt(20.0, 0.0), no_modifiers());
    assert_eq!(core.drawing_stroke().unwrap().points.len(), 3);

    let up = core.on_pointer_up(pt(20.0, 0.0), Button::Primary, no_modifiers());
    let stroke = core.board.strokes.get(&created_id(&up)).unwrap();
    assert_eq!(stroke.points, vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(20.0, 0.0)]);
    assert_eq!(stroke.created_at, 5_500);
    assert!(core.drawing_stroke().is_none());
}

#[test]
fn stroke_opacity_fades_with_age() {
    let (mut core, clock) = core_at(1_000);
    core.set_tool(Tool::Pen);
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary, no_modifiers());
    let stroke_id = created_id(&core.on_pointer_up(pt(0.0, 0.0), Button::Primary, no_modifiers()));
    clock.set(2_000);
    assert_eq!(core.stroke_opacity(&stroke_id), Some(1.0));
    clock.set(4_500);
    assert!((core.stroke_opacity(&stroke_id).unwrap() - 0.5).abs() < 1e-9);
}

#[test]
fn shift_drag_on_empty_canvas_draws_arrow() {
    let mut core = core();
    core.on_pointer_down(pt(10.0, 10.0), Button::Primary, shift_modifier());
    assert_eq!(core.mode(), "drawing_arrow");
    core.on_pointer_move(pt(110.0, 60.0), no_modifiers());
    assert!(core.board.arrows.is_empty());
    assert!(core.snapshot().arrow_elements.is_empty());
    assert_eq!(core.drawing_arrow().map(|a| (a.end_x, a.end_y)), Some((110.0, 60.0)));

    let up = core.on_pointer_up(pt(110.0, 60.0), Button::Primary, no_modifiers());
    let arrow = core.board.arrows.get(&created_id(&up)).unwrap();
    assert_eq!((arrow.start_x, arrow.start_y, arrow.end_x, arrow.end_y), (10.0, 10.0, 110.0, 60.0));
    assert!(core.drawing_arrow().is_none());
}

#[test]
fn arrow_tool_draws_arrow_without_shift() {
    let mut core = core();
    core.set_tool(Tool::Arrow);
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary, no_modifiers());
    assert_eq!(core.mode(), "drawing_arrow");
}

#[test]
fn arrow_body_drag_moves_both_endpoints() {
    let mut core = core();
    core.set_tool(Tool::Arrow);
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary, no_modifiers());
    core.on_pointer_move(pt(100.0, 0.0), no_modifiers());
    let arrow_id = created_id(&core.on_pointer_up(pt(100.0, 0.0), Button::Primary, no_modifiers()));
    core.set_tool(Tool::Text);
    drag(&mut core, pt(50.0, 0.0), pt(60.0, 20.0));
    let arrow = core.board.arrows.get(&arrow_id).unwrap();
    assert_eq!((arrow.start_x, arrow.start_y, arrow.end_x, arrow.end_y), (10.0, 20.0, 110.0, 20.0));
}

// =============================================================
// Double click / text editing
// =============================================================

#[test]
fn double_click_text_enters_editing() {
    let mut core = core();
    add_text(&mut core, "t", 0.0, 0.0);
    core.board.selection.replace(ElementKind::Text, [id("t")]);
    let actions = core.on_double_click(pt(50.0, 20.0));
    assert!(has_action(&actions, |a| matches!(a, Action::EditTextRequested { text, .. } if text == "Text")));
    assert!(core.board.texts.get(&id("t")).unwrap().is_editing);
    assert!(core.board.selection.text.is_empty());
}

#[test]
fn double_click_empty_canvas_does_nothing() {
    let mut core = core();
    assert!(core.on_double_click(pt(50.0, 20.0)).is_empty());
}

#[test]
fn set_text_autosizes_text_box() {
    let mut core = core();
    add_text(&mut core, "t", 0.0, 0.0);
    let actions = core.set_text(ElementKind::Text, &id("t"), "a considerably longer line of text");
    assert!(has_document_changed(&actions));
    let t = core.board.texts.get(&id("t")).unwrap();
    assert_eq!(t.text, "a considerably longer line of text");
    assert!(t.width > 200.0);
    assert!(t.height >= 30.0);
}

#[test]
fn set_text_unchanged_is_noop() {
    let mut core = core();
    add_text(&mut core, "t", 0.0, 0.0);
    assert!(core.set_text(ElementKind::Text, &id("t"), "Text").is_empty());
    assert!(core.set_text(ElementKind::Text, &id("missing"), "x").is_empty());
}

#[test]
fn finish_editing_clears_flag_once() {
    let mut core = core();
    add_shape(&mut core, "s", 0.0, 0.0);
    core.board.shapes.get_mut(&id("s")).unwrap().is_editing = true;
    assert!(!core.finish_editing(ElementKind::Shape, &id("s")).is_empty());
    assert!(!core.board.shapes.get(&id("s")).unwrap().is_editing);
    assert!(core.finish_editing(ElementKind::Shape, &id("s")).is_empty());
}

#[test]
fn style_and_color_apply_to_selection() {
    let mut core = core();
    add_text(&mut core, "t", 0.0, 0.0);
    add_shape(&mut core, "s", 0.0, 300.0);
    add_text(&mut core, "other", 0.0, 600.0);
    core.board.selection.replace(ElementKind::Text, [id("t")]);
    core.board.selection.replace(ElementKind::Shape, [id("s")]);
    core.set_text_style(TextStyle { bold: true, ..TextStyle::default() });
    core.set_color(Some("#ff0000".into()));
    assert!(core.board.texts.get(&id("t")).unwrap().style.bold);
    assert_eq!(core.board.shapes.get(&id("s")).unwrap().text_color.as_deref(), Some("#ff0000"));
    assert!(!core.board.texts.get(&id("other")).unwrap().style.bold);
}

#[test]
fn change_gradient_picks_from_palette() {
    let mut core = core();
    add_shape(&mut core, "s", 0.0, 0.0);
    let actions = core.change_gradient(ElementKind::Shape, &id("s"));
    assert!(has_document_changed(&actions));
    let gradient = core.board.shapes.get(&id("s")).unwrap().gradient.clone();
    assert!(BuiltinPalette.resolve(&gradient).is_some());
    assert_ne!(gradient, BuiltinPalette.neutral());
    assert!(core.change_gradient(ElementKind::Image, &id("s")).is_empty());
}

// =============================================================
// Creation
// =============================================================

#[test]
fn create_text_box_at_last_mouse() {
    let mut core = core();
    let actions = core.create_text_box();
    let new_id = created_id(&actions);
    let t = core.board.texts.get(&new_id).unwrap();
    assert_eq!((t.x, t.y, t.width, t.height), (100.0, 180.0, 200.0, 40.0));
    assert_eq!((t.text.as_str(), t.font_size), ("Text", 32.0));
    assert!(core.board.selection.contains(ElementKind::Text, &new_id));
    assert!(has_document_changed(&actions));
}

#[test]
fn create_shape_is_neutral_and_editing() {
    let mut core = core();
    core.on_pointer_move(pt(500.0, 500.0), no_modifiers());
    let actions = core.create_shape(ShapeKind::Circle);
    let new_id = created_id(&actions);
    let s = core.board.shapes.get(&new_id).unwrap();
    assert_eq!((s.x, s.y, s.width, s.height), (450.0, 450.0, 100.0, 100.0));
    assert_eq!(s.shape, ShapeKind::Circle);
    assert_eq!(s.gradient, GradientRef::new("Gray"));
    assert!(s.is_editing);
    assert!(has_action(&actions, |a| matches!(a, Action::EditTextRequested { .. })));
}

#[test]
fn paste_image_centers_on_last_mouse() {
    let mut core = core();
    let new_id = created_id(&core.paste_image("data:image/png;base64,AAAA".into()));
    let i = core.board.images.get(&new_id).unwrap();
    assert_eq!((i.x, i.y, i.width, i.height), (100.0, 100.0, 200.0, 200.0));
}

#[test]
fn last_mouse_tracks_canvas_coordinates() {
    let mut core = core();
    core.camera = Camera { pan_x: 100.0, pan_y: 0.0, zoom: 2.0 };
    core.on_pointer_move(pt(300.0, 200.0), no_modifiers());
    assert_eq!(core.ui.last_mouse, pt(100.0, 100.0));
}

#[test]
fn generated_ids_are_unique() {
    let mut core = core();
    let a = created_id(&core.create_text_box());
    let b = created_id(&core.create_text_box());
    assert_ne!(a, b);
}

// =============================================================
// Delete / mind map
// =============================================================

#[test]
fn delete_selected_removes_mind_map_subtree() {
    let mut core = core();
    add_shape(&mut core, "s", 0.0, 0.0);
    core.board.mind_map = ElementStore::from_vec(vec![
        MindMapNode {
            id: id("root"),
            parent_id: None,
            children: vec![id("kid")],
            text: "root".into(),
            x: 500.0,
            y: 0.0,
            width: 120.0,
            height: 50.0,
            gradient: GradientRef::new("Ocean"),
            is_editing: false,
        },
        MindMapNode {
            id: id("kid"),
            parent_id: Some(id("root")),
            children: Vec::new(),
            text: "kid".into(),
            x: 500.0,
            y: 110.0,
            width: 120.0,
            height: 50.0,
            gradient: GradientRef::new("Ocean"),
            is_editing: false,
        },
    ])
    .unwrap();
    core.board.selection.replace(ElementKind::Shape, [id("s")]);
    core.board.selection.replace(ElementKind::MindMap, [id("root")]);
    let actions = core.delete_selected();
    assert!(has_action(&actions, |a| matches!(a, Action::ElementsDeleted { kind: ElementKind::MindMap, ids } if ids.len() == 2)));
    assert!(core.board.is_empty());
    assert!(core.board.selection.is_empty());
}

#[test]
fn delete_with_empty_selection_is_noop() {
    let mut core = core();
    add_shape(&mut core, "s", 0.0, 0.0);
    assert!(core.delete_selected().is_empty());
    assert_eq!(core.board.shapes.len(), 1);
}

#[test]
fn sibling_and_child_need_active_node() {
    let mut core = core();
    assert!(core.add_sibling_node().is_empty());
    assert!(core.add_child_node().is_empty());
}

#[test]
fn mind_map_growth_follows_active_node() {
    let mut core = core();
    let root = created_id(&core.add_mind_map_node("Node"));
    assert_eq!(core.board.selection.active_mind_map, Some(root.clone()));

    let child = created_id(&core.add_child_node());
    assert_eq!(core.board.selection.active_mind_map, Some(child.clone()));
    let sibling = created_id(&core.add_sibling_node());

    let root_node = core.board.mind_map.get(&root).unwrap();
    assert_eq!(root_node.children, vec![child.clone(), sibling.clone()]);
    let child_node = core.board.mind_map.get(&child).unwrap();
    assert_eq!(child_node.y, root_node.y + 50.0 + 60.0);
    assert_eq!(core.connectors().len(), 2);

    let actions = core.delete_mind_map_node(&root);
    assert!(has_action(&actions, |a| matches!(a, Action::ElementsDeleted { ids, .. } if ids.len() == 3)));
    assert!(core.board.selection.active_mind_map.is_none());
}

// =============================================================
// Snapshot / auto-save
// =============================================================

#[test]
fn load_snapshot_rejects_bad_json_and_keeps_board() {
    let mut core = core();
    add_shape(&mut core, "s", 0.0, 0.0);
    assert!(core.load_snapshot_json("{\"textElements\": []}").is_err());
    assert_eq!(core.board.shapes.len(), 1);
}

#[test]
fn load_snapshot_replaces_board_and_resets_gesture() {
    let mut source = core();
    add_text(&mut source, "t", 0.0, 0.0);
    let json = serde_json::to_string(&source.snapshot()).unwrap();

    let mut core = core();
    add_shape(&mut core, "s", 0.0, 0.0);
    core.board.selection.replace(ElementKind::Shape, [id("s")]);
    core.on_pointer_down(pt(900.0, 900.0), Button::Primary, no_modifiers());
    core.load_snapshot_json(&json).unwrap();
    assert_eq!(core.mode(), "idle");
    assert!(core.board.selection.is_empty());
    assert_eq!(core.snapshot(), source.snapshot());
}

#[test]
fn autosave_fires_after_debounce() {
    let (mut core, clock) = core_at(0);
    core.set_document_id(Some("doc".into()));
    core.create_text_box();
    clock.set(1_999);
    assert!(!has_action(&core.on_tick(), |a| matches!(a, Action::SaveRequested(_))));
    clock.set(2_000);
    let actions = core.on_tick();
    let request = actions
        .into_iter()
        .find_map(|a| match a {
            Action::SaveRequested(req) => Some(req),
            _ => None,
        })
        .unwrap();
    assert_eq!(request.document_id.as_deref(), Some("doc"));
    assert_eq!(request.snapshot.text_elements.len(), 1);
}

#[test]
fn autosave_skips_unchanged_document() {
    let (mut core, clock) = core_at(0);
    core.set_document_id(Some("doc".into()));
    add_shape(&mut core, "s", 0.0, 0.0);
    core.mark_saved(serde_json::to_string(&core.snapshot()).unwrap());

    core.on_pointer_down(pt(50.0, 50.0), Button::Primary, no_modifiers());
    core.on_pointer_move(pt(150.0, 50.0), no_modifiers());
    core.on_pointer_move(pt(50.0, 50.0), no_modifiers());
    let up = core.on_pointer_up(pt(50.0, 50.0), Button::Primary, no_modifiers());
    assert!(has_document_changed(&up));

    clock.set(10_000);
    assert!(!has_action(&core.on_tick(), |a| matches!(a, Action::SaveRequested(_))));
}

#[test]
fn new_board_emptied_before_debounce_is_not_saved() {
    let (mut core, clock) = core_at(0);
    core.create_text_box();
    core.delete_selected();
    clock.set(3_000);
    assert!(!has_action(&core.on_tick(), |a| matches!(a, Action::SaveRequested(_))));
}
