//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `InputState` is the single active interaction mode between
//! pointer-down and pointer-up; being one enum, two modes can never run at
//! once.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::{INITIAL_MOUSE_X, INITIAL_MOUSE_Y};
use crate::doc::{ArrowElement, StrokeElement};
use crate::drag::DragSession;
use crate::resize::{ResizeSession, RotateSession};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Text tool; empty-canvas drags draw a marquee (default).
    #[default]
    Text,
    Rectangle,
    Circle,
    Diamond,
    /// Freehand pen.
    Pen,
    /// Straight arrow.
    Arrow,
}

impl Tool {
    /// Parse the host's tool name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(Self::Text),
            "rectangle" => Some(Self::Rectangle),
            "circle" => Some(Self::Circle),
            "diamond" => Some(Self::Diamond),
            "pen" => Some(Self::Pen),
            "arrow" => Some(Self::Arrow),
            _ => None,
        }
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl or Meta: toggles selection membership instead of replacing it.
    #[must_use]
    pub fn toggles(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    #[default]
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Persistent UI state outside any single gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    /// Currently active drawing tool.
    pub tool: Tool,
    /// Canvas position of the most recent pointer event; new elements land here.
    pub last_mouse: Point,
}

impl Default for UiState {
    fn default() -> Self {
        Self { tool: Tool::default(), last_mouse: Point::new(INITIAL_MOUSE_X, INITIAL_MOUSE_Y) }
    }
}

/// The active interaction mode.
///
/// Each active variant carries the context needed to compute updates and to
/// emit final actions on pointer-up.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Dragging the viewport with the secondary or middle button.
    Panning {
        /// Screen position of the previous pointer event.
        last_screen: Point,
    },
    /// Rubber-band selection in canvas coordinates.
    Marquee { start: Point, current: Point },
    /// Appending points to a stroke. It joins the stroke store on release.
    DrawingStroke(StrokeElement),
    /// Moving the end of an arrow. It joins the arrow store on release.
    DrawingArrow(ArrowElement),
    Dragging(DragSession),
    Resizing(ResizeSession),
    Rotating(RotateSession),
}

impl InputState {
    /// Lowercase mode name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Panning { .. } => "panning",
            Self::Marquee { .. } => "marquee",
            Self::DrawingStroke(_) => "drawing_stroke",
            Self::DrawingArrow(_) => "drawing_arrow",
            Self::Dragging(_) => "dragging",
            Self::Resizing(_) => "resizing",
            Self::Rotating(_) => "rotating",
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
