//! Browser bindings.
//!
//! [`WebBoard`] is the only type exported to JavaScript. It takes primitive
//! arguments (screen coordinates, DOM button codes, a modifier bitmask) and
//! returns the engine's [`Action`]s as a JSON array string. All state lives in
//! the wrapped [`EngineCore`]; this layer only converts at the boundary and
//! supplies the browser's clock and text metrics.

#[cfg(test)]
#[path = "web_test.rs"]
mod web_test;

use serde::Serialize;
use serde_json::json;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

use crate::camera::Point;
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::doc::{ElementId, ElementKind, ShapeKind, TextAlign, TextStyle};
use crate::engine::{Action, EngineCore};
use crate::input::{Button, Modifiers, Tool, WheelDelta};
use crate::measure::{ApproxMeasure, LINE_HEIGHT, TextMeasure};

const MOD_SHIFT: u8 = 1;
const MOD_CTRL: u8 = 1 << 1;
const MOD_ALT: u8 = 1 << 2;
const MOD_META: u8 = 1 << 3;

/// `Date.now()` as a [`Clock`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DateClock;

impl Clock for DateClock {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn now_ms(&self) -> u64 {
        js_sys::Date::now().max(0.0) as u64
    }
}

/// Measures text with the canvas 2D context the host renders into.
pub struct CanvasTextMeasure {
    ctx: CanvasRenderingContext2d,
    fallback: ApproxMeasure,
}

impl CanvasTextMeasure {
    #[must_use]
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx, fallback: ApproxMeasure::default() }
    }
}

/// CSS font shorthand for a style at `font_size` pixels.
#[must_use]
pub fn css_font(font_size: f64, style: &TextStyle) -> String {
    let italic = if style.italic { "italic " } else { "" };
    let bold = if style.bold { "bold " } else { "" };
    format!("{italic}{bold}{font_size}px sans-serif")
}

impl TextMeasure for CanvasTextMeasure {
    #[allow(clippy::cast_precision_loss)]
    fn measure(&self, text: &str, font_size: f64, style: &TextStyle) -> (f64, f64) {
        self.ctx.set_font(&css_font(font_size, style));
        let mut widest: f64 = 0.0;
        let mut lines = 0_usize;
        for line in text.split('\n') {
            lines += 1;
            match self.ctx.measure_text(line) {
                Ok(metrics) => widest = widest.max(metrics.width()),
                Err(_) => {
                    tracing::debug!("measureText failed; using estimate");
                    return self.fallback.measure(text, font_size, style);
                }
            }
        }
        (widest, lines as f64 * font_size * LINE_HEIGHT)
    }
}

fn modifiers(mask: u8) -> Modifiers {
    Modifiers {
        shift: mask & MOD_SHIFT != 0,
        ctrl: mask & MOD_CTRL != 0,
        alt: mask & MOD_ALT != 0,
        meta: mask & MOD_META != 0,
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(err) => {
            tracing::warn!(error = %err, "serialization failed");
            fallback.to_owned()
        }
    }
}

fn actions_json(actions: &[Action]) -> String {
    to_json(actions, "[]")
}

fn parse_kind(name: &str) -> Result<ElementKind, JsError> {
    ElementKind::ALL
        .into_iter()
        .find(|kind| kind.name() == name)
        .ok_or_else(|| JsError::new(&format!("unknown element kind: {name}")))
}

fn parse_shape(name: &str) -> Result<ShapeKind, JsError> {
    match name {
        "rectangle" => Ok(ShapeKind::Rectangle),
        "circle" => Ok(ShapeKind::Circle),
        "diamond" => Ok(ShapeKind::Diamond),
        _ => Err(JsError::new(&format!("unknown shape: {name}"))),
    }
}

fn parse_align(name: &str) -> TextAlign {
    match name {
        "left" => TextAlign::Left,
        "right" => TextAlign::Right,
        _ => TextAlign::Center,
    }
}

/// The whiteboard engine as seen from JavaScript.
#[wasm_bindgen]
pub struct WebBoard {
    core: EngineCore,
}

#[wasm_bindgen]
impl WebBoard {
    /// Create an engine. `ctx` enables exact text metrics; `config_json`
    /// overrides tunables.
    ///
    /// # Errors
    ///
    /// Fails when `config_json` does not parse or holds invalid values.
    #[wasm_bindgen(constructor)]
    pub fn new(ctx: Option<CanvasRenderingContext2d>, config_json: Option<String>) -> Result<WebBoard, JsError> {
        let config = match config_json {
            Some(json) => EngineConfig::from_json(&json)?,
            None => EngineConfig::default(),
        };
        let clock = DateClock;
        let seed = clock.now_ms();
        let mut core = EngineCore::with_parts(config, Box::new(clock), seed);
        if let Some(ctx) = ctx {
            core = core.with_measure(Box::new(CanvasTextMeasure::new(ctx)));
        }
        Ok(Self { core })
    }

    // --- Pointer input ---

    pub fn pointer_down(&mut self, x: f64, y: f64, button: i16, mods: u8) -> String {
        actions_json(&self.core.on_pointer_down(Point::new(x, y), Button::from_dom(button), modifiers(mods)))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, mods: u8) -> String {
        actions_json(&self.core.on_pointer_move(Point::new(x, y), modifiers(mods)))
    }

    pub fn pointer_up(&mut self, x: f64, y: f64, button: i16, mods: u8) -> String {
        actions_json(&self.core.on_pointer_up(Point::new(x, y), Button::from_dom(button), modifiers(mods)))
    }

    pub fn pointer_leave(&mut self, x: f64, y: f64, mods: u8) -> String {
        actions_json(&self.core.on_pointer_leave(Point::new(x, y), modifiers(mods)))
    }

    pub fn wheel(&mut self, x: f64, y: f64, dx: f64, dy: f64, mods: u8) -> String {
        actions_json(&self.core.on_wheel(Point::new(x, y), WheelDelta { dx, dy }, modifiers(mods)))
    }

    pub fn double_click(&mut self, x: f64, y: f64) -> String {
        actions_json(&self.core.on_double_click(Point::new(x, y)))
    }

    /// Drive stroke fading and auto-save; call from one recurring timer.
    pub fn tick(&mut self) -> String {
        actions_json(&self.core.on_tick())
    }

    // --- Commands ---

    /// # Errors
    ///
    /// Fails on an unknown tool name.
    pub fn set_tool(&mut self, name: &str) -> Result<(), JsError> {
        let tool = Tool::from_name(name).ok_or_else(|| JsError::new(&format!("unknown tool: {name}")))?;
        self.core.set_tool(tool);
        Ok(())
    }

    pub fn create_text_box(&mut self) -> String {
        actions_json(&self.core.create_text_box())
    }

    /// # Errors
    ///
    /// Fails on an unknown shape name.
    pub fn create_shape(&mut self, shape: &str) -> Result<String, JsError> {
        Ok(actions_json(&self.core.create_shape(parse_shape(shape)?)))
    }

    pub fn paste_image(&mut self, src: String) -> String {
        actions_json(&self.core.paste_image(src))
    }

    /// # Errors
    ///
    /// Fails on an unknown element kind.
    pub fn set_text(&mut self, kind: &str, id: &str, text: &str) -> Result<String, JsError> {
        Ok(actions_json(&self.core.set_text(parse_kind(kind)?, &ElementId::new(id), text)))
    }

    /// # Errors
    ///
    /// Fails on an unknown element kind.
    pub fn finish_editing(&mut self, kind: &str, id: &str) -> Result<String, JsError> {
        Ok(actions_json(&self.core.finish_editing(parse_kind(kind)?, &ElementId::new(id))))
    }

    pub fn set_text_style(&mut self, bold: bool, italic: bool, underline: bool, align: &str) -> String {
        let style = TextStyle { bold, italic, underline, align: parse_align(align) };
        actions_json(&self.core.set_text_style(style))
    }

    pub fn set_color(&mut self, color: Option<String>) -> String {
        actions_json(&self.core.set_color(color))
    }

    /// # Errors
    ///
    /// Fails on an unknown element kind.
    pub fn change_gradient(&mut self, kind: &str, id: &str) -> Result<String, JsError> {
        Ok(actions_json(&self.core.change_gradient(parse_kind(kind)?, &ElementId::new(id))))
    }

    pub fn delete_selected(&mut self) -> String {
        actions_json(&self.core.delete_selected())
    }

    pub fn add_mind_map_node(&mut self, text: &str) -> String {
        actions_json(&self.core.add_mind_map_node(text))
    }

    pub fn add_sibling_node(&mut self) -> String {
        actions_json(&self.core.add_sibling_node())
    }

    pub fn add_child_node(&mut self) -> String {
        actions_json(&self.core.add_child_node())
    }

    pub fn delete_mind_map_node(&mut self, id: &str) -> String {
        actions_json(&self.core.delete_mind_map_node(&ElementId::new(id)))
    }

    // --- Persistence ---

    /// # Errors
    ///
    /// Fails when the snapshot is rejected; the board is unchanged.
    pub fn load_snapshot(&mut self, json: &str) -> Result<String, JsError> {
        Ok(actions_json(&self.core.load_snapshot_json(json)?))
    }

    pub fn snapshot(&self) -> String {
        to_json(&self.core.snapshot(), "null")
    }

    pub fn set_document_id(&mut self, id: Option<String>) {
        self.core.set_document_id(id);
    }

    /// Confirm a save using the request's `fingerprint`.
    pub fn mark_saved(&mut self, fingerprint: String) {
        self.core.mark_saved(fingerprint);
    }

    // --- Render queries ---

    pub fn camera(&self) -> String {
        let camera = self.core.camera();
        json!({ "panX": camera.pan_x, "panY": camera.pan_y, "zoom": camera.zoom }).to_string()
    }

    pub fn mode(&self) -> String {
        self.core.mode().to_owned()
    }

    /// Current marquee rectangle as `{x, y, width, height}`, or `null`.
    pub fn marquee(&self) -> String {
        match self.core.marquee() {
            Some(rect) => {
                json!({ "x": rect.min_x, "y": rect.min_y, "width": rect.width(), "height": rect.height() }).to_string()
            }
            None => "null".to_owned(),
        }
    }

    pub fn selection(&self) -> String {
        let selection = &self.core.board.selection;
        json!({
            "text": selection.ids(ElementKind::Text),
            "shape": selection.ids(ElementKind::Shape),
            "image": selection.ids(ElementKind::Image),
            "arrow": selection.ids(ElementKind::Arrow),
            "mindMap": selection.ids(ElementKind::MindMap),
            "activeMindMap": selection.active_mind_map,
        })
        .to_string()
    }

    /// Stroke being drawn as JSON, or `null`.
    pub fn drawing_stroke(&self) -> String {
        to_json(&self.core.drawing_stroke(), "null")
    }

    /// Arrow being drawn as JSON, or `null`.
    pub fn drawing_arrow(&self) -> String {
        to_json(&self.core.drawing_arrow(), "null")
    }

    pub fn connectors(&self) -> String {
        to_json(&self.core.connectors(), "[]")
    }

    /// Render opacity of a stroke; 0 once it is gone.
    pub fn stroke_opacity(&self, id: &str) -> f64 {
        self.core.stroke_opacity(&ElementId::new(id)).unwrap_or(0.0)
    }
}
