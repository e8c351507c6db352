//! JSONL gesture scripts replayed against an [`EngineCore`].
//!
//! One event per line, tagged by `event`:
//!
//! ```text
//! {"event": "tool", "tool": "pen"}
//! {"event": "pointer_down", "x": 10, "y": 10}
//! {"event": "pointer_move", "x": 40, "y": 25}
//! {"event": "pointer_up", "x": 40, "y": 25}
//! {"event": "tick", "advance_ms": 5000}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Coordinates are screen
//! pixels, exactly as a browser host would forward them.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use canvas::camera::Point;
use canvas::clock::ManualClock;
use canvas::doc::{ElementId, ElementKind, ShapeKind};
use canvas::engine::{Action, EngineCore};
use canvas::input::{Button, Modifiers, Tool, WheelDelta};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerLeave {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Wheel {
        x: f64,
        y: f64,
        #[serde(default)]
        dx: f64,
        dy: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    DoubleClick {
        x: f64,
        y: f64,
    },
    Tool {
        tool: Tool,
    },
    /// Advance the clock, then run the timer.
    Tick {
        #[serde(default)]
        advance_ms: u64,
    },
    CreateTextBox,
    CreateShape {
        shape: ShapeKind,
    },
    SetText {
        kind: ElementKind,
        id: ElementId,
        text: String,
    },
    FinishEditing {
        kind: ElementKind,
        id: ElementId,
    },
    DeleteSelected,
    AddMindMapNode {
        #[serde(default = "default_node_text")]
        text: String,
    },
    AddChildNode,
    AddSiblingNode,
}

fn default_node_text() -> String {
    "Node".to_owned()
}

/// Parse a whole script.
///
/// # Errors
///
/// Returns the first line that is not a valid event, 1-based.
pub fn parse_script(text: &str) -> Result<Vec<ScriptEvent>, ScriptError> {
    let mut events = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event = serde_json::from_str(line).map_err(|source| ScriptError::Parse { line: index + 1, source })?;
        events.push(event);
    }
    Ok(events)
}

/// Feed one event to the engine.
pub fn apply(core: &mut EngineCore, clock: &ManualClock, event: ScriptEvent) -> Vec<Action> {
    match event {
        ScriptEvent::PointerDown { x, y, button, modifiers } => core.on_pointer_down(Point::new(x, y), button, modifiers),
        ScriptEvent::PointerMove { x, y, modifiers } => core.on_pointer_move(Point::new(x, y), modifiers),
        ScriptEvent::PointerUp { x, y, button, modifiers } => core.on_pointer_up(Point::new(x, y), button, modifiers),
        ScriptEvent::PointerLeave { x, y, modifiers } => core.on_pointer_leave(Point::new(x, y), modifiers),
        ScriptEvent::Wheel { x, y, dx, dy, modifiers } => core.on_wheel(Point::new(x, y), WheelDelta { dx, dy }, modifiers),
        ScriptEvent::DoubleClick { x, y } => core.on_double_click(Point::new(x, y)),
        ScriptEvent::Tool { tool } => {
            core.set_tool(tool);
            Vec::new()
        }
        ScriptEvent::Tick { advance_ms } => {
            clock.advance(advance_ms);
            core.on_tick()
        }
        ScriptEvent::CreateTextBox => core.create_text_box(),
        ScriptEvent::CreateShape { shape } => core.create_shape(shape),
        ScriptEvent::SetText { kind, id, text } => core.set_text(kind, &id, &text),
        ScriptEvent::FinishEditing { kind, id } => core.finish_editing(kind, &id),
        ScriptEvent::DeleteSelected => core.delete_selected(),
        ScriptEvent::AddMindMapNode { text } => core.add_mind_map_node(&text),
        ScriptEvent::AddChildNode => core.add_child_node(),
        ScriptEvent::AddSiblingNode => core.add_sibling_node(),
    }
}

/// Replay every event in order, collecting all emitted actions.
pub fn replay(core: &mut EngineCore, clock: &ManualClock, events: Vec<ScriptEvent>) -> Vec<Action> {
    let mut actions = Vec::new();
    for event in events {
        tracing::trace!(?event, "replay");
        actions.extend(apply(core, clock, event));
    }
    tracing::debug!(actions = actions.len(), mode = core.mode(), "replay finished");
    actions
}
