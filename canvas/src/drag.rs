//! Element-drag mode: move one element, or every selected element of its kind.
//!
//! Positions are recomputed from the originals captured at pointer-down, so
//! the relative offsets between dragged elements never accumulate error.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use std::collections::BTreeSet;

use crate::camera::Point;
use crate::doc::{Board, ElementId, ElementKind};

/// An in-progress drag over a single element kind.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    kind: ElementKind,
    anchor: ElementId,
    anchor_was_selected: bool,
    start_mouse: Point,
    originals: Vec<(ElementId, Point)>,
    threshold: f64,
    has_dragged: bool,
}

impl DragSession {
    /// Capture original positions of the ids this drag will move.
    ///
    /// When `anchor` is in `selected`, every selected id moves; otherwise only
    /// the anchor. Ids missing from the store are skipped.
    #[must_use]
    pub fn start(
        anchor: ElementId,
        kind: ElementKind,
        start_mouse: Point,
        selected: &BTreeSet<ElementId>,
        board: &Board,
        threshold: f64,
    ) -> Self {
        let anchor_was_selected = selected.contains(&anchor);
        let store = board.store(kind);
        let originals = if anchor_was_selected {
            selected.iter().filter_map(|id| store.position_of(id).map(|p| (id.clone(), p))).collect()
        } else {
            store.position_of(&anchor).map(|p| vec![(anchor.clone(), p)]).unwrap_or_default()
        };
        Self { kind, anchor, anchor_was_selected, start_mouse, originals, threshold, has_dragged: false }
    }

    /// Move every captured element to `original + (current - start)`.
    ///
    /// Returns the ids actually moved; ids deleted mid-drag are skipped.
    pub fn update(&mut self, current_mouse: Point, board: &mut Board) -> Vec<ElementId> {
        let (dx, dy) = current_mouse.delta_from(self.start_mouse);
        if dx.abs() > self.threshold || dy.abs() > self.threshold {
            self.has_dragged = true;
        }
        let store = board.store_mut(self.kind);
        let mut moved = Vec::with_capacity(self.originals.len());
        for (id, origin) in &self.originals {
            if store.set_position(id, origin.offset(dx, dy)) {
                moved.push(id.clone());
            }
        }
        moved
    }

    /// Finish the drag; `true` when the pointer moved past the click threshold.
    #[must_use]
    pub fn end(self) -> bool {
        self.has_dragged
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    #[must_use]
    pub fn anchor(&self) -> &ElementId {
        &self.anchor
    }

    #[must_use]
    pub fn anchor_was_selected(&self) -> bool {
        self.anchor_was_selected
    }

    /// Test-only: number of elements captured at pointer-down.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.originals.len()
    }
}
