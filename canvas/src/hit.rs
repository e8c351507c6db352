//! Hit-testing against board elements and marquee resolution.
//!
//! Handles of selected (or active) elements are checked before any body so a
//! handle that overlaps a neighbouring element still wins. Bodies are checked
//! top-most first: mind-map nodes, text boxes, shapes, arrows, then images,
//! and within one kind the most recently added element first.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::doc::{Board, Element, ElementId, ElementKind, TextElement};

/// Axis-aligned rectangle with normalized corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    /// Rectangle spanning two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// Rectangle from a top-left corner and a size; negative sizes are normalized.
    #[must_use]
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_corners(Point::new(x, y), Point::new(x + width, y + height))
    }

    /// Smallest rectangle containing both `self` and `p`.
    #[must_use]
    pub fn expand_to(self, p: Point) -> Self {
        Self {
            min_x: self.min_x.min(p.x),
            min_y: self.min_y.min(p.y),
            max_x: self.max_x.max(p.x),
            max_y: self.max_y.max(p.y),
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    /// Inclusive point containment.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Strict overlap: rectangles that only share an edge do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min_x < other.max_x && self.max_x > other.min_x && self.min_y < other.max_y && self.max_y > other.min_y
    }
}

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    /// Bottom-right resize handle.
    ResizeHandle,
    /// Top-right rotate handle (text boxes only).
    RotateHandle,
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub kind: ElementKind,
    pub id: ElementId,
    pub part: HitPart,
}

impl Hit {
    fn new(kind: ElementKind, id: &ElementId, part: HitPart) -> Self {
        Self { kind, id: id.clone(), part }
    }
}

/// Ids captured by a marquee, per selectable kind it covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarqueeSelection {
    pub text: Vec<ElementId>,
    pub shape: Vec<ElementId>,
    pub mind_map: Vec<ElementId>,
}

/// Rotate `p` about `center` by `degrees` (clockwise in screen orientation).
#[must_use]
pub fn rotate_about(p: Point, center: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (dx, dy) = p.delta_from(center);
    Point::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
}

/// Shortest distance from `p` to the segment `a`–`b`.
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (abx, aby) = b.delta_from(a);
    let (apx, apy) = p.delta_from(a);
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq > 0.0 { ((apx * abx + apy * aby) / len_sq).clamp(0.0, 1.0) } else { 0.0 };
    let closest = Point::new(a.x + abx * t, a.y + aby * t);
    let (dx, dy) = p.delta_from(closest);
    dx.hypot(dy)
}

fn near(p: Point, target: Point, radius: f64) -> bool {
    let (dx, dy) = p.delta_from(target);
    dx.hypot(dy) <= radius
}

/// `world` expressed in the text box's unrotated frame.
fn text_local(text: &TextElement, world: Point) -> Point {
    if text.rotation.abs() < f64::EPSILON {
        return world;
    }
    rotate_about(world, text.bounds().center(), -text.rotation)
}

fn text_handle(text: &TextElement, world: Point, radius: f64) -> Option<HitPart> {
    let local = text_local(text, world);
    let b = text.bounds();
    if near(local, Point::new(b.max_x, b.max_y), radius) {
        return Some(HitPart::ResizeHandle);
    }
    if near(local, Point::new(b.max_x, b.min_y), radius) {
        return Some(HitPart::RotateHandle);
    }
    None
}

fn bottom_right(element: &impl Element) -> Point {
    let b = element.bounds();
    Point::new(b.max_x, b.max_y)
}

fn handle_hit(world: Point, board: &Board, radius: f64) -> Option<Hit> {
    for text in board.texts.iter().rev() {
        if !board.selection.contains(ElementKind::Text, &text.id) {
            continue;
        }
        if let Some(part) = text_handle(text, world, radius) {
            return Some(Hit::new(ElementKind::Text, &text.id, part));
        }
    }

    if let Some(active) = &board.selection.active_mind_map {
        if let Some(node) = board.mind_map.get(active) {
            if near(world, bottom_right(node), radius) {
                return Some(Hit::new(ElementKind::MindMap, &node.id, HitPart::ResizeHandle));
            }
        }
    }

    if let Some(shape) = board.shapes.iter().rev().find(|s| near(world, bottom_right(*s), radius)) {
        return Some(Hit::new(ElementKind::Shape, &shape.id, HitPart::ResizeHandle));
    }

    board
        .images
        .iter()
        .rev()
        .find(|i| near(world, bottom_right(*i), radius))
        .map(|image| Hit::new(ElementKind::Image, &image.id, HitPart::ResizeHandle))
}

fn body_hit(world: Point, board: &Board, radius: f64) -> Option<Hit> {
    if let Some(node) = board.mind_map.iter().rev().find(|n| n.bounds().contains(world)) {
        return Some(Hit::new(ElementKind::MindMap, &node.id, HitPart::Body));
    }
    if let Some(text) = board.texts.iter().rev().find(|t| t.bounds().contains(text_local(t, world))) {
        return Some(Hit::new(ElementKind::Text, &text.id, HitPart::Body));
    }
    if let Some(shape) = board.shapes.iter().rev().find(|s| s.bounds().contains(world)) {
        return Some(Hit::new(ElementKind::Shape, &shape.id, HitPart::Body));
    }
    if let Some(arrow) = board.arrows.iter().rev().find(|a| distance_to_segment(world, a.start(), a.end()) <= radius) {
        return Some(Hit::new(ElementKind::Arrow, &arrow.id, HitPart::Body));
    }
    board
        .images
        .iter()
        .rev()
        .find(|i| i.bounds().contains(world))
        .map(|image| Hit::new(ElementKind::Image, &image.id, HitPart::Body))
}

/// Find what lies under `world`. `radius_px` is the handle slop in screen pixels.
///
/// Strokes are never hit.
#[must_use]
pub fn hit_test(world: Point, board: &Board, camera: &Camera, radius_px: f64) -> Option<Hit> {
    let radius = camera.screen_dist_to_world(radius_px);
    handle_hit(world, board, radius).or_else(|| body_hit(world, board, radius))
}

/// Ids of text boxes, shapes and mind-map nodes whose bounds strictly
/// intersect `rect`. Images and strokes are never marquee-selected.
#[must_use]
pub fn resolve_marquee(rect: &Rect, board: &Board) -> MarqueeSelection {
    fn collect<'a, T: Element + 'a>(items: impl Iterator<Item = &'a T>, rect: &Rect) -> Vec<ElementId> {
        items.filter(|item| item.bounds().intersects(rect)).map(|item| item.id().clone()).collect()
    }

    MarqueeSelection {
        text: collect(board.texts.iter(), rect),
        shape: collect(board.shapes.iter(), rect),
        mind_map: collect(board.mind_map.iter(), rect),
    }
}
