//! Resize and rotate modes.
//!
//! Resize deltas are raw screen pixels measured from the pointer-down origin,
//! not canvas units, so at zoom 2 a 10px drag grows an element by 10 canvas
//! units. Rotate works in canvas coordinates about the element center.

#[cfg(test)]
#[path = "resize_test.rs"]
mod resize_test;

use crate::camera::Point;
use crate::consts::{
    IMAGE_MIN_SIZE, MIND_MAP_MIN_HEIGHT, MIND_MAP_MIN_WIDTH, SHAPE_MIN_SIZE, TEXT_MAX_FONT, TEXT_MIN_FONT,
    TEXT_MIN_HEIGHT, TEXT_MIN_WIDTH,
};
use crate::doc::{Board, Element, ElementId, ElementKind};

/// Uniform text-box scale from a handle delta.
///
/// Returns `(width, height, font_size)`.
#[must_use]
pub fn text_resize(width0: f64, height0: f64, font0: f64, dx: f64, dy: f64) -> (f64, f64, f64) {
    let width = (width0 + dx).max(TEXT_MIN_WIDTH);
    let height = (height0 + dy).max(TEXT_MIN_HEIGHT);
    if width0 <= 0.0 || height0 <= 0.0 {
        return (width, height, font0.clamp(TEXT_MIN_FONT, TEXT_MAX_FONT));
    }
    let scale = (width / width0).max(height / height0);
    (width0 * scale, height0 * scale, (font0 * scale).clamp(TEXT_MIN_FONT, TEXT_MAX_FONT))
}

/// Independent per-axis resize with floors.
#[must_use]
pub fn box_resize(width0: f64, height0: f64, dx: f64, dy: f64, min_width: f64, min_height: f64) -> (f64, f64) {
    ((width0 + dx).max(min_width), (height0 + dy).max(min_height))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Origin {
    Text { width: f64, height: f64, font_size: f64 },
    Box { width: f64, height: f64 },
}

/// An in-progress resize of one text box, shape, image or mind-map node.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    kind: ElementKind,
    id: ElementId,
    start_screen: Point,
    origin: Origin,
}

impl ResizeSession {
    /// Capture the element's starting size. `None` for unknown ids and for
    /// kinds without a resize handle.
    #[must_use]
    pub fn start(kind: ElementKind, id: ElementId, start_screen: Point, board: &Board) -> Option<Self> {
        let origin = match kind {
            ElementKind::Text => {
                let t = board.texts.get(&id)?;
                Origin::Text { width: t.width, height: t.height, font_size: t.font_size }
            }
            ElementKind::Shape => {
                let s = board.shapes.get(&id)?;
                Origin::Box { width: s.width, height: s.height }
            }
            ElementKind::Image => {
                let i = board.images.get(&id)?;
                Origin::Box { width: i.width, height: i.height }
            }
            ElementKind::MindMap => {
                let n = board.mind_map.get(&id)?;
                Origin::Box { width: n.width, height: n.height }
            }
            ElementKind::Arrow | ElementKind::Stroke => return None,
        };
        Some(Self { kind, id, start_screen, origin })
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    #[must_use]
    pub fn id(&self) -> &ElementId {
        &self.id
    }

    /// Apply the size for the current pointer. `false` if the element is gone.
    pub fn update(&self, current_screen: Point, board: &mut Board) -> bool {
        let (dx, dy) = current_screen.delta_from(self.start_screen);
        match (self.kind, self.origin) {
            (ElementKind::Text, Origin::Text { width, height, font_size }) => {
                let Some(t) = board.texts.get_mut(&self.id) else {
                    return false;
                };
                (t.width, t.height, t.font_size) = text_resize(width, height, font_size, dx, dy);
                true
            }
            (ElementKind::Shape, Origin::Box { width, height }) => {
                let Some(s) = board.shapes.get_mut(&self.id) else {
                    return false;
                };
                (s.width, s.height) = box_resize(width, height, dx, dy, SHAPE_MIN_SIZE, SHAPE_MIN_SIZE);
                true
            }
            (ElementKind::Image, Origin::Box { width, height }) => {
                let Some(i) = board.images.get_mut(&self.id) else {
                    return false;
                };
                (i.width, i.height) = box_resize(width, height, dx, dy, IMAGE_MIN_SIZE, IMAGE_MIN_SIZE);
                true
            }
            (ElementKind::MindMap, Origin::Box { width, height }) => {
                let Some(n) = board.mind_map.get_mut(&self.id) else {
                    return false;
                };
                (n.width, n.height) = box_resize(width, height, dx, dy, MIND_MAP_MIN_WIDTH, MIND_MAP_MIN_HEIGHT);
                true
            }
            _ => false,
        }
    }
}

fn angle_deg(center: Point, p: Point) -> f64 {
    let (dx, dy) = p.delta_from(center);
    dy.atan2(dx).to_degrees()
}

/// An in-progress rotation of one text box.
#[derive(Debug, Clone, PartialEq)]
pub struct RotateSession {
    id: ElementId,
    center: Point,
    start_angle: f64,
    rotation0: f64,
}

impl RotateSession {
    /// Capture the pivot and starting angle. `None` if the text box is gone.
    #[must_use]
    pub fn start(id: ElementId, start_world: Point, board: &Board) -> Option<Self> {
        let text = board.texts.get(&id)?;
        let center = text.bounds().center();
        Some(Self { center, start_angle: angle_deg(center, start_world), rotation0: text.rotation, id })
    }

    #[must_use]
    pub fn id(&self) -> &ElementId {
        &self.id
    }

    /// Set rotation from the pointer angle. Geometry other than rotation is untouched.
    pub fn update(&self, current_world: Point, board: &mut Board) -> bool {
        let Some(text) = board.texts.get_mut(&self.id) else {
            return false;
        };
        text.rotation = self.rotation0 + (angle_deg(self.center, current_world) - self.start_angle);
        true
    }
}
