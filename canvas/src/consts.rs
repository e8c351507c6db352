//! Shared numeric constants for the canvas crate.

// ── Viewport ────────────────────────────────────────────────────

/// Smallest zoom factor the camera accepts.
pub const ZOOM_MIN: f64 = 0.2;

/// Largest zoom factor the camera accepts.
pub const ZOOM_MAX: f64 = 3.0;

/// Zoom multiplier for one wheel notch towards the user.
pub const ZOOM_IN_FACTOR: f64 = 1.1;

/// Zoom multiplier for one wheel notch away from the user.
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

// ── Gestures ────────────────────────────────────────────────────

/// Canvas-space movement a drag or marquee must exceed before it stops being a click.
pub const DRAG_THRESHOLD: f64 = 3.0;

/// Screen-space hit slop in pixels for handles and thin arrows.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

// ── Resize floors ───────────────────────────────────────────────

pub const TEXT_MIN_WIDTH: f64 = 100.0;
pub const TEXT_MIN_HEIGHT: f64 = 30.0;
pub const TEXT_MIN_FONT: f64 = 12.0;
pub const TEXT_MAX_FONT: f64 = 72.0;

pub const SHAPE_MIN_SIZE: f64 = 50.0;
pub const IMAGE_MIN_SIZE: f64 = 50.0;

pub const MIND_MAP_MIN_WIDTH: f64 = 40.0;
pub const MIND_MAP_MIN_HEIGHT: f64 = 20.0;

// ── Stroke lifecycle ────────────────────────────────────────────

/// Age in milliseconds until which a stroke renders at full opacity.
pub const STROKE_VISIBLE_MS: u64 = 3000;

/// Age in milliseconds at which a stroke is removed from the store.
pub const STROKE_LIFETIME_MS: u64 = 4000;

/// Minimum spacing between two stroke sweeps.
pub const STROKE_SWEEP_INTERVAL_MS: u64 = 500;

/// Pen width for freehand strokes, in canvas units.
pub const STROKE_WIDTH: f64 = 2.0;

// ── Auto-save ───────────────────────────────────────────────────

/// Debounce before saving a board that already has a document id.
pub const AUTOSAVE_DELAY_MS: u64 = 2000;

/// Debounce before the first save of a brand-new board.
pub const AUTOSAVE_NEW_DELAY_MS: u64 = 3000;

// ── Element defaults ────────────────────────────────────────────

pub const TEXT_DEFAULT_WIDTH: f64 = 200.0;
pub const TEXT_DEFAULT_HEIGHT: f64 = 40.0;
pub const TEXT_DEFAULT_FONT: f64 = 32.0;

pub const SHAPE_DEFAULT_SIZE: f64 = 100.0;
pub const IMAGE_DEFAULT_SIZE: f64 = 200.0;

pub const MIND_MAP_DEFAULT_WIDTH: f64 = 120.0;
pub const MIND_MAP_DEFAULT_HEIGHT: f64 = 50.0;

/// Horizontal gap between a mind-map node and a new sibling.
pub const MIND_MAP_SIBLING_GAP: f64 = 40.0;

/// Vertical gap between a mind-map node and a new child.
pub const MIND_MAP_CHILD_GAP: f64 = 60.0;

/// Padding added around measured text when auto-sizing a text box.
pub const TEXT_PADDING_X: f64 = 16.0;
pub const TEXT_PADDING_Y: f64 = 8.0;

/// Canvas position used for "last mouse position" before the pointer moves.
pub const INITIAL_MOUSE_X: f64 = 200.0;
pub const INITIAL_MOUSE_Y: f64 = 200.0;
