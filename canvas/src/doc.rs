//! Document model: element types, per-kind stores, selections, and snapshots.
//!
//! Every position and size stored here is in canvas (world) coordinates. The
//! six element kinds each live in their own ordered [`ElementStore`]; the
//! [`Board`] owns all of them plus the per-kind [`Selections`]. Interaction
//! modes reach positions through the kind-tagged [`PositionStore`] accessor so
//! the drag machinery is written once for every kind.
//!
//! A [`Snapshot`] is the flat per-kind array shape handed to (and received
//! from) the persistence collaborator. Loading one is all-or-nothing.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::hit::Rect;
use crate::mindmap::{self, TopologyError};
use crate::palette::GradientRef;

// =============================================================
// Identifiers and kinds
// =============================================================

/// Unique identifier for an element within its kind's store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub String);

impl ElementId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Build an id from a millisecond timestamp plus a random base-36 suffix.
pub fn generate_id(now_ms: u64, rng: &mut dyn rand::RngCore) -> ElementId {
    let mut raw = now_ms.to_string();
    for _ in 0..ID_SUFFIX_LEN {
        raw.push(char::from(BASE36[rng.random_range(0..BASE36.len())]));
    }
    ElementId(raw)
}

/// The six element kinds, one store each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Text,
    Shape,
    Image,
    Arrow,
    Stroke,
    MindMap,
}

impl ElementKind {
    /// Every kind, in snapshot order.
    pub const ALL: [ElementKind; 6] = [Self::Text, Self::Shape, Self::Image, Self::Arrow, Self::Stroke, Self::MindMap];

    /// Lowercase name used in logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Shape => "shape",
            Self::Image => "image",
            Self::Arrow => "arrow",
            Self::Stroke => "stroke",
            Self::MindMap => "mind_map",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================
// Element records
// =============================================================

/// Geometric shape of a [`ShapeElement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Diamond,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Style flags shared by text boxes and shape labels.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    #[serde(rename = "isBold")]
    pub bold: bool,
    #[serde(rename = "isItalic")]
    pub italic: bool,
    #[serde(rename = "isUnderline")]
    pub underline: bool,
    #[serde(rename = "textAlign")]
    pub align: TextAlign,
}

/// Line style of an arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
}

/// A free-floating, rotatable text box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees about the box center.
    #[serde(default)]
    pub rotation: f64,
    pub text: String,
    pub font_size: f64,
    #[serde(flatten)]
    pub style: TextStyle,
    pub gradient: GradientRef,
    /// Explicit CSS color; when present it overrides the gradient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub is_editing: bool,
}

/// A rectangle, circle or diamond with an embedded label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeElement {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub shape: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub text: String,
    #[serde(flatten)]
    pub style: TextStyle,
    pub gradient: GradientRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default)]
    pub is_editing: bool,
}

/// A pasted image. `src` is a data URI and never changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub src: String,
}

/// A straight arrow between two free endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowElement {
    pub id: ElementId,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub gradient: GradientRef,
    #[serde(default)]
    pub stroke_style: StrokeStyle,
}

impl ArrowElement {
    #[must_use]
    pub fn start(&self) -> Point {
        Point::new(self.start_x, self.start_y)
    }

    #[must_use]
    pub fn end(&self) -> Point {
        Point::new(self.end_x, self.end_y)
    }
}

/// A freehand pen path. Points are only ever appended while drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeElement {
    pub id: ElementId,
    pub points: Vec<Point>,
    pub stroke_width: f64,
    /// Release time in milliseconds; drives the fade lifecycle.
    pub created_at: u64,
    pub gradient: GradientRef,
}

/// A box-shaped node in a mind-map forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMapNode {
    pub id: ElementId,
    pub parent_id: Option<ElementId>,
    #[serde(default)]
    pub children: Vec<ElementId>,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub gradient: GradientRef,
    #[serde(default)]
    pub is_editing: bool,
}

// =============================================================
// Element capability
// =============================================================

/// Capabilities shared by every element record.
pub trait Element {
    const KIND: ElementKind;

    fn id(&self) -> &ElementId;

    /// Top-left corner, or the start point for arrows and strokes.
    fn position(&self) -> Point;

    /// Move so that [`Element::position`] returns `pos`, keeping shape and size.
    fn set_position(&mut self, pos: Point);

    /// Axis-aligned bounding box in canvas coordinates.
    fn bounds(&self) -> Rect;

    fn is_editing(&self) -> bool {
        false
    }
}

impl Element for TextElement {
    const KIND: ElementKind = ElementKind::Text;

    fn id(&self) -> &ElementId {
        &self.id
    }

    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn set_position(&mut self, pos: Point) {
        self.x = pos.x;
        self.y = pos.y;
    }

    fn bounds(&self) -> Rect {
        Rect::from_xywh(self.x, self.y, self.width, self.height)
    }

    fn is_editing(&self) -> bool {
        self.is_editing
    }
}

impl Element for ShapeElement {
    const KIND: ElementKind = ElementKind::Shape;

    fn id(&self) -> &ElementId {
        &self.id
    }

    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn set_position(&mut self, pos: Point) {
        self.x = pos.x;
        self.y = pos.y;
    }

    fn bounds(&self) -> Rect {
        Rect::from_xywh(self.x, self.y, self.width, self.height)
    }

    fn is_editing(&self) -> bool {
        self.is_editing
    }
}

impl Element for ImageElement {
    const KIND: ElementKind = ElementKind::Image;

    fn id(&self) -> &ElementId {
        &self.id
    }

    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn set_position(&mut self, pos: Point) {
        self.x = pos.x;
        self.y = pos.y;
    }

    fn bounds(&self) -> Rect {
        Rect::from_xywh(self.x, self.y, self.width, self.height)
    }
}

impl Element for ArrowElement {
    const KIND: ElementKind = ElementKind::Arrow;

    fn id(&self) -> &ElementId {
        &self.id
    }

    fn position(&self) -> Point {
        self.start()
    }

    fn set_position(&mut self, pos: Point) {
        let (dx, dy) = pos.delta_from(self.start());
        self.start_x = pos.x;
        self.start_y = pos.y;
        self.end_x += dx;
        self.end_y += dy;
    }

    fn bounds(&self) -> Rect {
        Rect::from_corners(self.start(), self.end())
    }
}

impl Element for StrokeElement {
    const KIND: ElementKind = ElementKind::Stroke;

    fn id(&self) -> &ElementId {
        &self.id
    }

    fn position(&self) -> Point {
        self.points.first().copied().unwrap_or_default()
    }

    fn set_position(&mut self, pos: Point) {
        let (dx, dy) = pos.delta_from(self.position());
        for p in &mut self.points {
            *p = p.offset(dx, dy);
        }
    }

    fn bounds(&self) -> Rect {
        let mut iter = self.points.iter();
        let Some(first) = iter.next() else {
            return Rect::from_corners(Point::default(), Point::default());
        };
        iter.fold(Rect::from_corners(*first, *first), |rect, p| rect.expand_to(*p))
    }
}

impl Element for MindMapNode {
    const KIND: ElementKind = ElementKind::MindMap;

    fn id(&self) -> &ElementId {
        &self.id
    }

    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn set_position(&mut self, pos: Point) {
        self.x = pos.x;
        self.y = pos.y;
    }

    fn bounds(&self) -> Rect {
        Rect::from_xywh(self.x, self.y, self.width, self.height)
    }

    fn is_editing(&self) -> bool {
        self.is_editing
    }
}

// =============================================================
// Stores
// =============================================================

/// Ordered collection of one element kind. Later entries render on top.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementStore<T> {
    items: Vec<T>,
}

impl<T> Default for ElementStore<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Element> ElementStore<T> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a list, rejecting the first duplicated id.
    ///
    /// # Errors
    ///
    /// Returns the duplicated id.
    pub fn from_vec(items: Vec<T>) -> Result<Self, ElementId> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id().clone()) {
                return Err(item.id().clone());
            }
        }
        Ok(Self { items })
    }

    /// Append an element. Returns `false` (and drops nothing) if the id is taken.
    pub fn insert(&mut self, item: T) -> bool {
        if self.contains(item.id()) {
            return false;
        }
        self.items.push(item);
        true
    }

    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Remove an element by id, returning it if it was present.
    pub fn remove(&mut self, id: &ElementId) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    /// Keep only elements matching `keep`, preserving order.
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.items.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Number of elements currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the store contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Kind-erased position accessor used by the drag machinery.
pub trait PositionStore {
    fn position_of(&self, id: &ElementId) -> Option<Point>;

    /// Move an element. Returns `false` if the id is unknown.
    fn set_position(&mut self, id: &ElementId, pos: Point) -> bool;
}

impl<T: Element> PositionStore for ElementStore<T> {
    fn position_of(&self, id: &ElementId) -> Option<Point> {
        self.get(id).map(Element::position)
    }

    fn set_position(&mut self, id: &ElementId, pos: Point) -> bool {
        match self.get_mut(id) {
            Some(item) => {
                item.set_position(pos);
                true
            }
            None => false,
        }
    }
}

// =============================================================
// Selections
// =============================================================

/// Per-kind selection sets plus the mind-map node that owns keyboard focus.
///
/// Strokes are never selectable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections {
    pub text: BTreeSet<ElementId>,
    pub shape: BTreeSet<ElementId>,
    pub image: BTreeSet<ElementId>,
    pub arrow: BTreeSet<ElementId>,
    pub mind_map: BTreeSet<ElementId>,
    /// Mind-map node that sibling/child creation is relative to.
    pub active_mind_map: Option<ElementId>,
}

impl Selections {
    #[must_use]
    pub fn of(&self, kind: ElementKind) -> Option<&BTreeSet<ElementId>> {
        match kind {
            ElementKind::Text => Some(&self.text),
            ElementKind::Shape => Some(&self.shape),
            ElementKind::Image => Some(&self.image),
            ElementKind::Arrow => Some(&self.arrow),
            ElementKind::MindMap => Some(&self.mind_map),
            ElementKind::Stroke => None,
        }
    }

    pub fn of_mut(&mut self, kind: ElementKind) -> Option<&mut BTreeSet<ElementId>> {
        match kind {
            ElementKind::Text => Some(&mut self.text),
            ElementKind::Shape => Some(&mut self.shape),
            ElementKind::Image => Some(&mut self.image),
            ElementKind::Arrow => Some(&mut self.arrow),
            ElementKind::MindMap => Some(&mut self.mind_map),
            ElementKind::Stroke => None,
        }
    }

    #[must_use]
    pub fn contains(&self, kind: ElementKind, id: &ElementId) -> bool {
        self.of(kind).is_some_and(|set| set.contains(id))
    }

    /// Ids selected for `kind`, in sorted order.
    #[must_use]
    pub fn ids(&self, kind: ElementKind) -> Vec<ElementId> {
        self.of(kind).map(|set| set.iter().cloned().collect()).unwrap_or_default()
    }

    /// Clear every kind and the active mind-map node.
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
            && self.shape.is_empty()
            && self.image.is_empty()
            && self.arrow.is_empty()
            && self.mind_map.is_empty()
            && self.active_mind_map.is_none()
    }

    /// Whether `id` is the one and only selected element across every kind.
    #[must_use]
    pub fn is_only(&self, kind: ElementKind, id: &ElementId) -> bool {
        ElementKind::ALL.iter().all(|&k| match self.of(k) {
            Some(set) if k == kind => set.len() == 1 && set.contains(id),
            Some(set) => set.is_empty(),
            None => true,
        })
    }

    /// Replace one kind's selection wholesale.
    pub fn replace(&mut self, kind: ElementKind, ids: impl IntoIterator<Item = ElementId>) {
        if let Some(set) = self.of_mut(kind) {
            *set = ids.into_iter().collect();
        }
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, kind: ElementKind, id: &ElementId) {
        if let Some(set) = self.of_mut(kind) {
            if !set.remove(id) {
                set.insert(id.clone());
            }
        }
    }

    /// Select exactly `id`, clearing every other kind.
    pub fn select_only(&mut self, kind: ElementKind, id: &ElementId) {
        self.clear_all();
        if kind == ElementKind::MindMap {
            self.active_mind_map = Some(id.clone());
        }
        self.replace(kind, [id.clone()]);
    }

    /// Drop `id` from its kind's selection and from the active slot.
    pub fn forget(&mut self, kind: ElementKind, id: &ElementId) {
        if let Some(set) = self.of_mut(kind) {
            set.remove(id);
        }
        if kind == ElementKind::MindMap && self.active_mind_map.as_ref() == Some(id) {
            self.active_mind_map = None;
        }
    }
}

// =============================================================
// Snapshot
// =============================================================

/// Errors that reject a snapshot load. The board is unchanged when any occurs.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The payload is not a snapshot (bad JSON or a missing per-kind array).
    #[error("snapshot parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two elements of one kind share an id.
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: ElementKind, id: ElementId },

    /// Mind-map parent/child references disagree.
    #[error("mind map topology invalid: {0}")]
    Topology(#[from] TopologyError),
}

/// Flat per-kind arrays exchanged with the persistence collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub text_elements: Vec<TextElement>,
    pub shape_elements: Vec<ShapeElement>,
    pub image_elements: Vec<ImageElement>,
    pub arrow_elements: Vec<ArrowElement>,
    pub stroke_elements: Vec<StrokeElement>,
    pub mind_map_nodes: Vec<MindMapNode>,
}

impl Snapshot {
    /// Parse a snapshot; every per-kind array must be present.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Parse`] on malformed JSON or a missing array.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Total number of elements across all kinds.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.text_elements.len()
            + self.shape_elements.len()
            + self.image_elements.len()
            + self.arrow_elements.len()
            + self.stroke_elements.len()
            + self.mind_map_nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.element_count() == 0
    }
}

// =============================================================
// Board
// =============================================================

/// Every element store plus selections: the whole open document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    pub texts: ElementStore<TextElement>,
    pub shapes: ElementStore<ShapeElement>,
    pub images: ElementStore<ImageElement>,
    pub arrows: ElementStore<ArrowElement>,
    pub strokes: ElementStore<StrokeElement>,
    pub mind_map: ElementStore<MindMapNode>,
    pub selection: Selections,
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Kind-tagged read access to positions.
    #[must_use]
    pub fn store(&self, kind: ElementKind) -> &dyn PositionStore {
        match kind {
            ElementKind::Text => &self.texts,
            ElementKind::Shape => &self.shapes,
            ElementKind::Image => &self.images,
            ElementKind::Arrow => &self.arrows,
            ElementKind::Stroke => &self.strokes,
            ElementKind::MindMap => &self.mind_map,
        }
    }

    /// Kind-tagged write access to positions.
    pub fn store_mut(&mut self, kind: ElementKind) -> &mut dyn PositionStore {
        match kind {
            ElementKind::Text => &mut self.texts,
            ElementKind::Shape => &mut self.shapes,
            ElementKind::Image => &mut self.images,
            ElementKind::Arrow => &mut self.arrows,
            ElementKind::Stroke => &mut self.strokes,
            ElementKind::MindMap => &mut self.mind_map,
        }
    }

    #[must_use]
    pub fn contains(&self, kind: ElementKind, id: &ElementId) -> bool {
        self.store(kind).position_of(id).is_some()
    }

    /// Mint an id unused in `kind`'s store.
    pub fn fresh_id(&self, kind: ElementKind, now_ms: u64, rng: &mut dyn rand::RngCore) -> ElementId {
        loop {
            let id = generate_id(now_ms, rng);
            if !self.contains(kind, &id) {
                return id;
            }
        }
    }

    /// Remove an element and forget it in the selection.
    ///
    /// Mind-map nodes take their whole subtree with them. Returns every id
    /// removed (empty when `id` was unknown).
    pub fn remove(&mut self, kind: ElementKind, id: &ElementId) -> Vec<ElementId> {
        let removed = match kind {
            ElementKind::MindMap => mindmap::delete_node(&mut self.mind_map, id),
            ElementKind::Text => self.texts.remove(id).map(|e| vec![e.id]).unwrap_or_default(),
            ElementKind::Shape => self.shapes.remove(id).map(|e| vec![e.id]).unwrap_or_default(),
            ElementKind::Image => self.images.remove(id).map(|e| vec![e.id]).unwrap_or_default(),
            ElementKind::Arrow => self.arrows.remove(id).map(|e| vec![e.id]).unwrap_or_default(),
            ElementKind::Stroke => self.strokes.remove(id).map(|e| vec![e.id]).unwrap_or_default(),
        };
        for gone in &removed {
            self.selection.forget(kind, gone);
        }
        removed
    }

    /// Whether the element is currently being text-edited.
    #[must_use]
    pub fn is_editing(&self, kind: ElementKind, id: &ElementId) -> bool {
        match kind {
            ElementKind::Text => self.texts.get(id).is_some_and(Element::is_editing),
            ElementKind::Shape => self.shapes.get(id).is_some_and(Element::is_editing),
            ElementKind::MindMap => self.mind_map.get(id).is_some_and(Element::is_editing),
            ElementKind::Image | ElementKind::Arrow | ElementKind::Stroke => false,
        }
    }

    /// Copy every store into the flat persistence shape.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            text_elements: self.texts.as_slice().to_vec(),
            shape_elements: self.shapes.as_slice().to_vec(),
            image_elements: self.images.as_slice().to_vec(),
            arrow_elements: self.arrows.as_slice().to_vec(),
            stroke_elements: self.strokes.as_slice().to_vec(),
            mind_map_nodes: self.mind_map.as_slice().to_vec(),
        }
    }

    /// Replace every store and clear every selection.
    ///
    /// Validation runs to completion before anything is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] on duplicate ids or inconsistent mind-map
    /// topology; the board is left untouched.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) -> Result<(), SnapshotError> {
        mindmap::validate_topology(&snapshot.mind_map_nodes)?;
        let loaded = Board {
            texts: checked(ElementKind::Text, snapshot.text_elements)?,
            shapes: checked(ElementKind::Shape, snapshot.shape_elements)?,
            images: checked(ElementKind::Image, snapshot.image_elements)?,
            arrows: checked(ElementKind::Arrow, snapshot.arrow_elements)?,
            strokes: checked(ElementKind::Stroke, snapshot.stroke_elements)?,
            mind_map: checked(ElementKind::MindMap, snapshot.mind_map_nodes)?,
            selection: Selections::default(),
        };
        *self = loaded;
        Ok(())
    }

    /// Returns `true` if no store holds any element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
            && self.shapes.is_empty()
            && self.images.is_empty()
            && self.arrows.is_empty()
            && self.strokes.is_empty()
            && self.mind_map.is_empty()
    }
}

fn checked<T: Element>(kind: ElementKind, items: Vec<T>) -> Result<ElementStore<T>, SnapshotError> {
    ElementStore::from_vec(items).map_err(|id| SnapshotError::DuplicateId { kind, id })
}
