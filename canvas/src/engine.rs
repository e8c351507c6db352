use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::autosave::{AutoSave, SaveRequest};
use crate::camera::{Camera, Point};
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::consts::{
    IMAGE_DEFAULT_SIZE, MIND_MAP_DEFAULT_HEIGHT, MIND_MAP_DEFAULT_WIDTH, SHAPE_DEFAULT_SIZE, STROKE_WIDTH,
    TEXT_DEFAULT_FONT, TEXT_DEFAULT_HEIGHT, TEXT_DEFAULT_WIDTH, TEXT_MIN_HEIGHT, TEXT_MIN_WIDTH, TEXT_PADDING_X,
    TEXT_PADDING_Y,
};
use crate::doc::{
    ArrowElement, Board, ElementId, ElementKind, ImageElement, ShapeElement, ShapeKind, Snapshot, SnapshotError,
    StrokeElement, StrokeStyle, TextElement, TextStyle,
};
use crate::drag::DragSession;
use crate::hit::{HitPart, Rect, hit_test, resolve_marquee};
use crate::input::{Button, InputState, Modifiers, Tool, UiState, WheelDelta};
use crate::lifecycle::{StrokeSweeper, stroke_opacity};
use crate::measure::{ApproxMeasure, TextMeasure};
use crate::mindmap::{self, Connector};
use crate::palette::{BuiltinPalette, GradientRef, Palette};
use crate::resize::{ResizeSession, RotateSession};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Text given to freshly created mind-map nodes.
const MIND_MAP_DEFAULT_TEXT: &str = "Node";
const TEXT_DEFAULT_TEXT: &str = "Text";

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    RenderNeeded,
    SetCursor { cursor: &'static str },
    ElementCreated { kind: ElementKind, id: ElementId },
    ElementUpdated { kind: ElementKind, id: ElementId },
    ElementsDeleted { kind: ElementKind, ids: Vec<ElementId> },
    SelectionChanged,
    /// Open the host's text editor on an element.
    EditTextRequested { kind: ElementKind, id: ElementId, text: String },
    /// The document changed; the host may mirror the snapshot.
    DocumentChanged,
    SaveRequested(SaveRequest),
}

/// Core engine state: all logic that doesn't depend on the browser.
///
/// Separated from [`crate::web::WebBoard`] so it can be tested without
/// WASM/browser dependencies. Every handler takes `&mut self`, so at most one
/// event (or timer tick) is processed at a time.
pub struct EngineCore {
    pub board: Board,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    config: EngineConfig,
    sweeper: StrokeSweeper,
    autosave: AutoSave,
    palette: Box<dyn Palette>,
    measure: Box<dyn TextMeasure>,
    clock: Box<dyn Clock>,
    rng: StdRng,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineCore {
    /// Engine with default config on the system clock.
    #[must_use]
    pub fn new() -> Self {
        let clock = SystemClock;
        let seed = clock.now_ms();
        Self::with_parts(EngineConfig::default(), Box::new(clock), seed)
    }

    /// Engine over an explicit config, clock and random seed.
    #[must_use]
    pub fn with_parts(config: EngineConfig, clock: Box<dyn Clock>, seed: u64) -> Self {
        let mut camera = Camera::default();
        camera.clamp_zoom(config.zoom_min, config.zoom_max);
        Self {
            board: Board::new(),
            camera,
            ui: UiState::default(),
            input: InputState::default(),
            sweeper: StrokeSweeper::new(config.sweep_interval_ms),
            autosave: AutoSave::new(config.autosave_delay_ms, config.autosave_new_delay_ms),
            config,
            palette: Box::new(BuiltinPalette),
            measure: Box::new(ApproxMeasure::default()),
            clock,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Box<dyn Palette>) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn with_measure(mut self, measure: Box<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self
    }

    fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    fn fresh_id(&mut self, kind: ElementKind) -> ElementId {
        let now = self.now();
        self.board.fresh_id(kind, now, &mut self.rng)
    }

    fn fresh_gradient(&mut self) -> GradientRef {
        self.palette.pick(&mut self.rng)
    }

    fn enter(&mut self, next: InputState) {
        tracing::debug!(from = self.input.name(), to = next.name(), "interaction mode");
        self.input = next;
    }

    fn document_changed(&mut self, actions: &mut Vec<Action>) {
        let now = self.now();
        self.autosave.mark_changed(now);
        actions.push(Action::DocumentChanged);
    }

    // --- Pointer input ---

    /// Start a gesture. Ignored while another gesture is active.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if !self.input.is_idle() {
            tracing::trace!(mode = self.input.name(), "pointer down ignored: gesture active");
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen_pt);
        self.ui.last_mouse = world;

        if matches!(button, Button::Secondary | Button::Middle) {
            self.enter(InputState::Panning { last_screen: screen_pt });
            return vec![Action::SetCursor { cursor: "grabbing" }];
        }

        if let Some(hit) = hit_test(world, &self.board, &self.camera, self.config.handle_radius_px) {
            return match hit.part {
                HitPart::ResizeHandle => match ResizeSession::start(hit.kind, hit.id, screen_pt, &self.board) {
                    Some(session) => {
                        self.enter(InputState::Resizing(session));
                        vec![Action::SetCursor { cursor: "nwse-resize" }]
                    }
                    None => Vec::new(),
                },
                HitPart::RotateHandle => match RotateSession::start(hit.id, world, &self.board) {
                    Some(session) => {
                        self.enter(InputState::Rotating(session));
                        vec![Action::SetCursor { cursor: "grabbing" }]
                    }
                    None => Vec::new(),
                },
                HitPart::Body => {
                    if self.board.is_editing(hit.kind, &hit.id) {
                        return Vec::new();
                    }
                    let selected = self.board.selection.of(hit.kind).cloned().unwrap_or_default();
                    let session =
                        DragSession::start(hit.id, hit.kind, world, &selected, &self.board, self.config.drag_threshold);
                    self.enter(InputState::Dragging(session));
                    vec![Action::SetCursor { cursor: "move" }]
                }
            };
        }

        if self.ui.tool == Tool::Pen {
            return self.begin_stroke(world);
        }
        if self.ui.tool == Tool::Arrow || modifiers.shift {
            return self.begin_arrow(world);
        }
        self.enter(InputState::Marquee { start: world, current: world });
        vec![Action::RenderNeeded]
    }

    fn begin_stroke(&mut self, world: Point) -> Vec<Action> {
        let id = self.fresh_id(ElementKind::Stroke);
        let gradient = self.fresh_gradient();
        self.enter(InputState::DrawingStroke(StrokeElement {
            id,
            points: vec![world],
            stroke_width: STROKE_WIDTH,
            created_at: 0,
            gradient,
        }));
        vec![Action::SetCursor { cursor: "crosshair" }, Action::RenderNeeded]
    }

    fn begin_arrow(&mut self, world: Point) -> Vec<Action> {
        let id = self.fresh_id(ElementKind::Arrow);
        let gradient = self.fresh_gradient();
        self.enter(InputState::DrawingArrow(ArrowElement {
            id,
            start_x: world.x,
            start_y: world.y,
            end_x: world.x,
            end_y: world.y,
            gradient,
            stroke_style: StrokeStyle::Solid,
        }));
        vec![Action::SetCursor { cursor: "crosshair" }, Action::RenderNeeded]
    }

    /// Advance the active gesture. Only that mode's update runs.
    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        self.ui.last_mouse = world;

        match &mut self.input {
            InputState::Idle => Vec::new(),
            InputState::Panning { last_screen } => {
                let (dx, dy) = screen_pt.delta_from(*last_screen);
                self.camera.pan_by(dx, dy);
                *last_screen = screen_pt;
                vec![Action::RenderNeeded]
            }
            InputState::Marquee { current, .. } => {
                *current = world;
                vec![Action::RenderNeeded]
            }
            InputState::DrawingStroke(stroke) => {
                stroke.points.push(world);
                vec![Action::RenderNeeded]
            }
            InputState::DrawingArrow(arrow) => {
                arrow.end_x = world.x;
                arrow.end_y = world.y;
                vec![Action::RenderNeeded]
            }
            InputState::Dragging(session) => {
                let kind = session.kind();
                let moved = session.update(world, &mut self.board);
                if moved.is_empty() {
                    tracing::trace!(anchor = %session.anchor(), "drag update matched no elements");
                    return Vec::new();
                }
                let mut actions: Vec<Action> =
                    moved.into_iter().map(|id| Action::ElementUpdated { kind, id }).collect();
                actions.push(Action::RenderNeeded);
                actions
            }
            InputState::Resizing(session) => {
                if session.update(screen_pt, &mut self.board) {
                    vec![Action::ElementUpdated { kind: session.kind(), id: session.id().clone() }, Action::RenderNeeded]
                } else {
                    tracing::trace!(id = %session.id(), "resize target vanished");
                    Vec::new()
                }
            }
            InputState::Rotating(session) => {
                if session.update(world, &mut self.board) {
                    vec![Action::ElementUpdated { kind: ElementKind::Text, id: session.id().clone() }, Action::RenderNeeded]
                } else {
                    tracing::trace!(id = %session.id(), "rotate target vanished");
                    Vec::new()
                }
            }
        }
    }

    /// Close the active gesture.
    ///
    /// The gesture resolves from its last tracked position; the release point
    /// only updates the last known mouse position.
    pub fn on_pointer_up(&mut self, screen_pt: Point, _button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.ui.last_mouse = self.camera.screen_to_world(screen_pt);
        self.finish_gesture(modifiers)
    }

    /// Leaving the canvas ends a gesture exactly like releasing the button.
    /// The leave point may lie outside the canvas and is not used.
    pub fn on_pointer_leave(&mut self, _screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        self.finish_gesture(modifiers)
    }

    fn finish_gesture(&mut self, modifiers: Modifiers) -> Vec<Action> {
        let state = std::mem::take(&mut self.input);
        if state.is_idle() {
            return Vec::new();
        }
        tracing::debug!(from = state.name(), to = "idle", "interaction mode");
        let mut actions = Vec::new();

        match state {
            InputState::Idle | InputState::Panning { .. } => {}
            InputState::Marquee { start, current } => self.close_marquee(start, current, modifiers, &mut actions),
            InputState::DrawingStroke(mut stroke) => {
                stroke.created_at = self.now();
                let id = stroke.id.clone();
                self.board.strokes.insert(stroke);
                actions.push(Action::ElementCreated { kind: ElementKind::Stroke, id });
                self.document_changed(&mut actions);
            }
            InputState::DrawingArrow(arrow) => {
                let id = arrow.id.clone();
                self.board.arrows.insert(arrow);
                actions.push(Action::ElementCreated { kind: ElementKind::Arrow, id });
                self.document_changed(&mut actions);
            }
            InputState::Dragging(session) => {
                let kind = session.kind();
                let anchor = session.anchor().clone();
                let anchor_was_selected = session.anchor_was_selected();
                if session.end() {
                    if !anchor_was_selected {
                        self.board.selection.select_only(kind, &anchor);
                        actions.push(Action::SelectionChanged);
                    }
                    self.document_changed(&mut actions);
                } else {
                    self.click_select(kind, &anchor, modifiers);
                    actions.push(Action::SelectionChanged);
                }
            }
            InputState::Resizing(_) | InputState::Rotating(_) => self.document_changed(&mut actions),
        }

        actions.push(Action::SetCursor { cursor: "default" });
        actions.push(Action::RenderNeeded);
        actions
    }

    fn close_marquee(&mut self, start: Point, end: Point, modifiers: Modifiers, actions: &mut Vec<Action>) {
        let (dx, dy) = end.delta_from(start);
        let threshold = self.config.drag_threshold;
        if dx.abs() > threshold || dy.abs() > threshold {
            let found = resolve_marquee(&Rect::from_corners(start, end), &self.board);
            let selection = &mut self.board.selection;
            selection.replace(ElementKind::Text, found.text);
            selection.replace(ElementKind::Shape, found.shape);
            selection.replace(ElementKind::MindMap, found.mind_map);
            selection.image.clear();
            selection.arrow.clear();
        } else if !modifiers.toggles() {
            self.board.selection.clear_all();
        }
        actions.push(Action::SelectionChanged);
    }

    /// Selection effect of a click (press and release without dragging).
    fn click_select(&mut self, kind: ElementKind, id: &ElementId, modifiers: Modifiers) {
        let selection = &mut self.board.selection;
        if modifiers.toggles() {
            selection.toggle(kind, id);
            if kind == ElementKind::MindMap {
                if selection.contains(kind, id) {
                    selection.active_mind_map = Some(id.clone());
                } else if selection.active_mind_map.as_ref() == Some(id) {
                    selection.active_mind_map = None;
                }
            }
            return;
        }
        if matches!(kind, ElementKind::Shape | ElementKind::Arrow) && selection.is_only(kind, id) {
            selection.forget(kind, id);
        } else {
            selection.select_only(kind, id);
        }
    }

    /// Zoom about the cursor. Ctrl+wheel is left to the host (empty result).
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.ctrl {
            return Vec::new();
        }
        let factor = if delta.dy < 0.0 { self.config.zoom_in_factor } else { self.config.zoom_out_factor };
        self.camera.zoom_at(screen_pt, factor, self.config.zoom_min, self.config.zoom_max);
        vec![Action::RenderNeeded]
    }

    /// Enter text editing on a text box, shape or mind-map node.
    pub fn on_double_click(&mut self, screen_pt: Point) -> Vec<Action> {
        if !self.input.is_idle() {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen_pt);
        let Some(hit) = hit_test(world, &self.board, &self.camera, self.config.handle_radius_px) else {
            return Vec::new();
        };
        if hit.part != HitPart::Body {
            return Vec::new();
        }
        let text = match hit.kind {
            ElementKind::Text => self.board.texts.get_mut(&hit.id).map(|t| {
                t.is_editing = true;
                t.text.clone()
            }),
            ElementKind::Shape => self.board.shapes.get_mut(&hit.id).map(|s| {
                s.is_editing = true;
                s.text.clone()
            }),
            ElementKind::MindMap => self.board.mind_map.get_mut(&hit.id).map(|n| {
                n.is_editing = true;
                n.text.clone()
            }),
            ElementKind::Image | ElementKind::Arrow | ElementKind::Stroke => None,
        };
        let Some(text) = text else {
            return Vec::new();
        };
        self.board.selection.text.clear();
        vec![
            Action::EditTextRequested { kind: hit.kind, id: hit.id.clone(), text },
            Action::ElementUpdated { kind: hit.kind, id: hit.id },
            Action::SelectionChanged,
            Action::RenderNeeded,
        ]
    }

    // --- Timer ---

    /// Periodic housekeeping driven by the host's single recurring timer:
    /// sweeps expired strokes and polls the auto-save debounce.
    pub fn on_tick(&mut self) -> Vec<Action> {
        let now = self.now();
        let mut actions = Vec::new();
        if let Some(removed) = self.sweeper.run(now, &mut self.board.strokes, self.config.stroke_lifetime_ms) {
            if !removed.is_empty() {
                actions.push(Action::ElementsDeleted { kind: ElementKind::Stroke, ids: removed });
            }
        }
        if !actions.is_empty() || !self.board.strokes.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        if let Some(request) = self.autosave.poll(now, &self.board) {
            actions.push(Action::SaveRequested(request));
        }
        actions
    }

    // --- Tool / creation ---

    /// Set the active tool.
    pub fn set_tool(&mut self, tool: Tool) {
        self.ui.tool = tool;
    }

    fn created(&mut self, kind: ElementKind, id: ElementId) -> Vec<Action> {
        self.board.selection.select_only(kind, &id);
        let mut actions = vec![Action::ElementCreated { kind, id }, Action::SelectionChanged];
        self.document_changed(&mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// New text box centered-ish on the last pointer position.
    pub fn create_text_box(&mut self) -> Vec<Action> {
        let id = self.fresh_id(ElementKind::Text);
        let gradient = self.fresh_gradient();
        let at = self.ui.last_mouse.offset(-TEXT_DEFAULT_WIDTH / 2.0, -TEXT_DEFAULT_HEIGHT / 2.0);
        self.board.texts.insert(TextElement {
            id: id.clone(),
            x: at.x,
            y: at.y,
            width: TEXT_DEFAULT_WIDTH,
            height: TEXT_DEFAULT_HEIGHT,
            rotation: 0.0,
            text: TEXT_DEFAULT_TEXT.to_owned(),
            font_size: TEXT_DEFAULT_FONT,
            style: TextStyle::default(),
            gradient,
            color: None,
            is_editing: false,
        });
        self.created(ElementKind::Text, id)
    }

    /// New uncolored shape, opened for label editing.
    pub fn create_shape(&mut self, shape: ShapeKind) -> Vec<Action> {
        let id = self.fresh_id(ElementKind::Shape);
        let at = self.ui.last_mouse.offset(-SHAPE_DEFAULT_SIZE / 2.0, -SHAPE_DEFAULT_SIZE / 2.0);
        self.board.shapes.insert(ShapeElement {
            id: id.clone(),
            shape,
            x: at.x,
            y: at.y,
            width: SHAPE_DEFAULT_SIZE,
            height: SHAPE_DEFAULT_SIZE,
            text: String::new(),
            style: TextStyle::default(),
            gradient: self.palette.neutral(),
            text_color: None,
            is_editing: true,
        });
        let mut actions = self.created(ElementKind::Shape, id.clone());
        actions.push(Action::EditTextRequested { kind: ElementKind::Shape, id, text: String::new() });
        actions
    }

    /// Place a pasted image (data URI) at the last pointer position.
    pub fn paste_image(&mut self, src: String) -> Vec<Action> {
        let id = self.fresh_id(ElementKind::Image);
        let at = self.ui.last_mouse.offset(-IMAGE_DEFAULT_SIZE / 2.0, -IMAGE_DEFAULT_SIZE / 2.0);
        self.board.images.insert(ImageElement {
            id: id.clone(),
            x: at.x,
            y: at.y,
            width: IMAGE_DEFAULT_SIZE,
            height: IMAGE_DEFAULT_SIZE,
            src,
        });
        self.created(ElementKind::Image, id)
    }

    // --- Text editing ---

    /// Commit text from the host editor. Text boxes are re-sized to fit.
    pub fn set_text(&mut self, kind: ElementKind, id: &ElementId, text: &str) -> Vec<Action> {
        let changed = match kind {
            ElementKind::Text => match self.board.texts.get_mut(id) {
                Some(t) if t.text != text => {
                    let (w, h) = self.measure.measure(text, t.font_size, &t.style);
                    t.text = text.to_owned();
                    t.width = (w + 2.0 * TEXT_PADDING_X).max(TEXT_MIN_WIDTH);
                    t.height = (h + 2.0 * TEXT_PADDING_Y).max(TEXT_MIN_HEIGHT);
                    true
                }
                _ => false,
            },
            ElementKind::Shape => match self.board.shapes.get_mut(id) {
                Some(s) if s.text != text => {
                    s.text = text.to_owned();
                    true
                }
                _ => false,
            },
            ElementKind::MindMap => match self.board.mind_map.get_mut(id) {
                Some(n) if n.text != text => {
                    n.text = text.to_owned();
                    true
                }
                _ => false,
            },
            ElementKind::Image | ElementKind::Arrow | ElementKind::Stroke => false,
        };
        if !changed {
            return Vec::new();
        }
        let mut actions = vec![Action::ElementUpdated { kind, id: id.clone() }];
        self.document_changed(&mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Leave text-editing mode on an element.
    pub fn finish_editing(&mut self, kind: ElementKind, id: &ElementId) -> Vec<Action> {
        let flag = match kind {
            ElementKind::Text => self.board.texts.get_mut(id).map(|t| &mut t.is_editing),
            ElementKind::Shape => self.board.shapes.get_mut(id).map(|s| &mut s.is_editing),
            ElementKind::MindMap => self.board.mind_map.get_mut(id).map(|n| &mut n.is_editing),
            ElementKind::Image | ElementKind::Arrow | ElementKind::Stroke => None,
        };
        match flag {
            Some(editing) if *editing => {
                *editing = false;
                vec![Action::ElementUpdated { kind, id: id.clone() }, Action::RenderNeeded]
            }
            _ => Vec::new(),
        }
    }

    /// Apply text style flags to every selected text box and shape.
    pub fn set_text_style(&mut self, style: TextStyle) -> Vec<Action> {
        let mut actions = Vec::new();
        for id in self.board.selection.ids(ElementKind::Text) {
            if let Some(t) = self.board.texts.get_mut(&id) {
                t.style = style;
                actions.push(Action::ElementUpdated { kind: ElementKind::Text, id });
            }
        }
        for id in self.board.selection.ids(ElementKind::Shape) {
            if let Some(s) = self.board.shapes.get_mut(&id) {
                s.style = style;
                actions.push(Action::ElementUpdated { kind: ElementKind::Shape, id });
            }
        }
        self.finish_batch(actions)
    }

    /// Set (or clear) an explicit text color on every selected text box and shape.
    pub fn set_color(&mut self, color: Option<String>) -> Vec<Action> {
        let mut actions = Vec::new();
        for id in self.board.selection.ids(ElementKind::Text) {
            if let Some(t) = self.board.texts.get_mut(&id) {
                t.color.clone_from(&color);
                actions.push(Action::ElementUpdated { kind: ElementKind::Text, id });
            }
        }
        for id in self.board.selection.ids(ElementKind::Shape) {
            if let Some(s) = self.board.shapes.get_mut(&id) {
                s.text_color.clone_from(&color);
                actions.push(Action::ElementUpdated { kind: ElementKind::Shape, id });
            }
        }
        self.finish_batch(actions)
    }

    /// Give one element a freshly picked gradient.
    pub fn change_gradient(&mut self, kind: ElementKind, id: &ElementId) -> Vec<Action> {
        let gradient = self.fresh_gradient();
        let slot = match kind {
            ElementKind::Text => self.board.texts.get_mut(id).map(|e| &mut e.gradient),
            ElementKind::Shape => self.board.shapes.get_mut(id).map(|e| &mut e.gradient),
            ElementKind::Arrow => self.board.arrows.get_mut(id).map(|e| &mut e.gradient),
            ElementKind::Stroke => self.board.strokes.get_mut(id).map(|e| &mut e.gradient),
            ElementKind::MindMap => self.board.mind_map.get_mut(id).map(|e| &mut e.gradient),
            ElementKind::Image => None,
        };
        let Some(slot) = slot else {
            return Vec::new();
        };
        *slot = gradient;
        self.finish_batch(vec![Action::ElementUpdated { kind, id: id.clone() }])
    }

    fn finish_batch(&mut self, mut actions: Vec<Action>) -> Vec<Action> {
        if actions.is_empty() {
            return actions;
        }
        self.document_changed(&mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Delete every selected element; mind-map nodes take their subtrees.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        for kind in ElementKind::ALL {
            let mut ids = Vec::new();
            for id in self.board.selection.ids(kind) {
                ids.extend(self.board.remove(kind, &id));
            }
            if !ids.is_empty() {
                actions.push(Action::ElementsDeleted { kind, ids });
            }
        }
        if actions.is_empty() {
            return actions;
        }
        self.board.selection.clear_all();
        actions.push(Action::SelectionChanged);
        self.finish_batch(actions)
    }

    // --- Mind map ---

    fn mind_map_added(&mut self, added: Option<ElementId>) -> Vec<Action> {
        match added {
            Some(id) => self.created(ElementKind::MindMap, id),
            None => Vec::new(),
        }
    }

    /// New root node at the last pointer position.
    pub fn add_mind_map_node(&mut self, text: &str) -> Vec<Action> {
        let id = self.fresh_id(ElementKind::MindMap);
        let gradient = self.fresh_gradient();
        let at = self.ui.last_mouse.offset(-MIND_MAP_DEFAULT_WIDTH / 2.0, -MIND_MAP_DEFAULT_HEIGHT / 2.0);
        let added = mindmap::add_node(&mut self.board.mind_map, id, text, None, at, gradient);
        self.mind_map_added(added)
    }

    /// New sibling of the active node. No-op without an active node.
    pub fn add_sibling_node(&mut self) -> Vec<Action> {
        let Some(active) = self.board.selection.active_mind_map.clone() else {
            return Vec::new();
        };
        let id = self.fresh_id(ElementKind::MindMap);
        let gradient = self.fresh_gradient();
        let added = mindmap::add_sibling(&mut self.board.mind_map, &active, id, MIND_MAP_DEFAULT_TEXT, gradient);
        self.mind_map_added(added)
    }

    /// New child of the active node. No-op without an active node.
    pub fn add_child_node(&mut self) -> Vec<Action> {
        let Some(active) = self.board.selection.active_mind_map.clone() else {
            return Vec::new();
        };
        let id = self.fresh_id(ElementKind::MindMap);
        let gradient = self.fresh_gradient();
        let added = mindmap::add_child(&mut self.board.mind_map, &active, id, MIND_MAP_DEFAULT_TEXT, gradient);
        self.mind_map_added(added)
    }

    /// Delete a node and its whole subtree.
    pub fn delete_mind_map_node(&mut self, id: &ElementId) -> Vec<Action> {
        let ids = self.board.remove(ElementKind::MindMap, id);
        if ids.is_empty() {
            return Vec::new();
        }
        self.finish_batch(vec![Action::ElementsDeleted { kind: ElementKind::MindMap, ids }, Action::SelectionChanged])
    }

    // --- Snapshot / persistence ---

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.board.snapshot()
    }

    /// Replace the document. Any gesture in progress is abandoned.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] and leaves the board untouched when the
    /// snapshot is rejected.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) -> Result<Vec<Action>, SnapshotError> {
        let fingerprint = serde_json::to_string(&snapshot);
        if let Err(err) = self.board.load_snapshot(snapshot) {
            tracing::warn!(error = %err, "snapshot rejected");
            return Err(err);
        }
        self.enter(InputState::Idle);
        self.autosave.cancel();
        if let Ok(json) = fingerprint {
            self.autosave.mark_saved(json);
        }
        Ok(vec![Action::SelectionChanged, Action::RenderNeeded])
    }

    /// Parse and load a JSON snapshot.
    ///
    /// # Errors
    ///
    /// See [`EngineCore::load_snapshot`].
    pub fn load_snapshot_json(&mut self, json: &str) -> Result<Vec<Action>, SnapshotError> {
        match Snapshot::from_json(json) {
            Ok(snapshot) => self.load_snapshot(snapshot),
            Err(err) => {
                tracing::warn!(error = %err, "snapshot rejected");
                Err(err)
            }
        }
    }

    /// Attach the persisted document id (set after the first save of a new board).
    pub fn set_document_id(&mut self, document_id: Option<String>) {
        self.autosave.set_document_id(document_id);
    }

    /// Report a successful save of the given request fingerprint.
    pub fn mark_saved(&mut self, fingerprint: String) {
        self.autosave.mark_saved(fingerprint);
    }

    // --- Queries ---

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.ui.tool
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Name of the active interaction mode.
    #[must_use]
    pub fn mode(&self) -> &'static str {
        self.input.name()
    }

    /// Current marquee rectangle in canvas coordinates, if one is being drawn.
    #[must_use]
    pub fn marquee(&self) -> Option<Rect> {
        match &self.input {
            InputState::Marquee { start, current } => Some(Rect::from_corners(*start, *current)),
            _ => None,
        }
    }

    /// Stroke being drawn, not yet in the stroke store.
    #[must_use]
    pub fn drawing_stroke(&self) -> Option<&StrokeElement> {
        match &self.input {
            InputState::DrawingStroke(stroke) => Some(stroke),
            _ => None,
        }
    }

    /// Arrow being drawn, not yet in the arrow store.
    #[must_use]
    pub fn drawing_arrow(&self) -> Option<&ArrowElement> {
        match &self.input {
            InputState::DrawingArrow(arrow) => Some(arrow),
            _ => None,
        }
    }

    /// Parent-to-child connector segments for the mind map.
    #[must_use]
    pub fn connectors(&self) -> Vec<Connector> {
        mindmap::connectors(&self.board.mind_map)
    }

    /// Render opacity of a stroke at the current time.
    #[must_use]
    pub fn stroke_opacity(&self, id: &ElementId) -> Option<f64> {
        let stroke = self.board.strokes.get(id)?;
        let age = self.now().saturating_sub(stroke.created_at);
        Some(stroke_opacity(age, self.config.stroke_visible_ms, self.config.stroke_lifetime_ms))
    }
}
