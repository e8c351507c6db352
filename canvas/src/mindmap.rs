//! Mind-map topology: a forest of nodes linked by `parent_id` and `children`.
//!
//! Both directions of every link are kept in sync by the operations here.
//! Connector segments are derived from the store on demand and never stored.

#[cfg(test)]
#[path = "mindmap_test.rs"]
mod mindmap_test;

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::camera::Point;
use crate::consts::{MIND_MAP_CHILD_GAP, MIND_MAP_DEFAULT_HEIGHT, MIND_MAP_DEFAULT_WIDTH, MIND_MAP_SIBLING_GAP};
use crate::doc::{Element, ElementId, ElementStore, MindMapNode};
use crate::palette::GradientRef;

/// Inconsistent parent/child links found while validating a node list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("node {child} names missing parent {parent}")]
    MissingParent { child: ElementId, parent: ElementId },

    #[error("parent {parent} does not list child {child}")]
    ChildMismatch { parent: ElementId, child: ElementId },

    #[error("node {parent} lists missing or foreign child {child}")]
    MissingChild { parent: ElementId, child: ElementId },

    #[error("cycle through node {id}")]
    Cycle { id: ElementId },
}

/// A straight parent-to-child line between node centers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub parent: ElementId,
    pub child: ElementId,
    pub from: Point,
    pub to: Point,
}

/// Gradient a new child of `parent` inherits: its first existing sibling's, else `fresh`.
fn inherited_gradient(store: &ElementStore<MindMapNode>, parent: &MindMapNode, fresh: GradientRef) -> GradientRef {
    parent
        .children
        .iter()
        .find_map(|child| store.get(child))
        .map_or(fresh, |sibling| sibling.gradient.clone())
}

/// Insert a node at `position`, optionally under `parent`.
///
/// Returns `None` (and changes nothing) when the parent is missing or the id
/// is already taken.
pub fn add_node(
    store: &mut ElementStore<MindMapNode>,
    id: ElementId,
    text: &str,
    parent: Option<&ElementId>,
    position: Point,
    fresh_gradient: GradientRef,
) -> Option<ElementId> {
    if store.contains(&id) {
        return None;
    }
    let gradient = match parent {
        Some(parent_id) => inherited_gradient(store, store.get(parent_id)?, fresh_gradient),
        None => fresh_gradient,
    };
    let node = MindMapNode {
        id: id.clone(),
        parent_id: parent.cloned(),
        children: Vec::new(),
        text: text.to_owned(),
        x: position.x,
        y: position.y,
        width: MIND_MAP_DEFAULT_WIDTH,
        height: MIND_MAP_DEFAULT_HEIGHT,
        gradient,
        is_editing: false,
    };
    if let Some(parent_node) = parent.and_then(|p| store.get_mut(p)) {
        parent_node.children.push(id.clone());
    }
    store.insert(node);
    Some(id)
}

/// Remove `id` and all of its descendants. Returns every removed id,
/// the root of the deleted subtree first.
pub fn delete_node(store: &mut ElementStore<MindMapNode>, id: &ElementId) -> Vec<ElementId> {
    let Some(root) = store.get(id) else {
        return Vec::new();
    };
    let parent_id = root.parent_id.clone();

    let mut doomed = Vec::new();
    let mut seen = HashSet::new();
    let mut stack = vec![id.clone()];
    while let Some(current) = stack.pop() {
        if !seen.insert(current.clone()) {
            continue;
        }
        if let Some(node) = store.get(&current) {
            stack.extend(node.children.iter().rev().cloned());
            doomed.push(current);
        }
    }

    if let Some(parent) = parent_id.and_then(|p| store.get_mut(&p)) {
        parent.children.retain(|child| child != id);
    }
    store.retain(|node| !seen.contains(&node.id));
    doomed
}

/// Add a node to the right of `of`, under the same parent (a new root when
/// `of` is a root).
pub fn add_sibling(
    store: &mut ElementStore<MindMapNode>,
    of: &ElementId,
    new_id: ElementId,
    text: &str,
    fresh_gradient: GradientRef,
) -> Option<ElementId> {
    let anchor = store.get(of)?;
    let position = Point::new(anchor.x + anchor.width + MIND_MAP_SIBLING_GAP, anchor.y);
    let parent = anchor.parent_id.clone();
    add_node(store, new_id, text, parent.as_ref(), position, fresh_gradient)
}

/// Add a node below `of`, as its child.
pub fn add_child(
    store: &mut ElementStore<MindMapNode>,
    of: &ElementId,
    new_id: ElementId,
    text: &str,
    fresh_gradient: GradientRef,
) -> Option<ElementId> {
    let anchor = store.get(of)?;
    let position = Point::new(anchor.x, anchor.y + anchor.height + MIND_MAP_CHILD_GAP);
    add_node(store, new_id, text, Some(of), position, fresh_gradient)
}

/// Parent-center to child-center segments for every live link.
#[must_use]
pub fn connectors(store: &ElementStore<MindMapNode>) -> Vec<Connector> {
    store
        .iter()
        .flat_map(|parent| {
            parent.children.iter().filter_map(move |child_id| {
                let child = store.get(child_id)?;
                Some(Connector {
                    parent: parent.id.clone(),
                    child: child.id.clone(),
                    from: parent.bounds().center(),
                    to: child.bounds().center(),
                })
            })
        })
        .collect()
}

/// Check that every parent exists and lists its child, every listed child
/// exists and points back, and no node is its own ancestor.
///
/// # Errors
///
/// Returns the first inconsistency found.
pub fn validate_topology(nodes: &[MindMapNode]) -> Result<(), TopologyError> {
    let by_id: HashMap<&ElementId, &MindMapNode> = nodes.iter().map(|n| (&n.id, n)).collect();

    for node in nodes {
        if let Some(parent_id) = &node.parent_id {
            let Some(parent) = by_id.get(parent_id) else {
                return Err(TopologyError::MissingParent { child: node.id.clone(), parent: parent_id.clone() });
            };
            if !parent.children.contains(&node.id) {
                return Err(TopologyError::ChildMismatch { parent: parent_id.clone(), child: node.id.clone() });
            }
        }
        for child_id in &node.children {
            let points_back = by_id.get(child_id).is_some_and(|child| child.parent_id.as_ref() == Some(&node.id));
            if !points_back {
                return Err(TopologyError::MissingChild { parent: node.id.clone(), child: child_id.clone() });
            }
        }
    }

    for node in nodes {
        let mut seen = HashSet::new();
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if !seen.insert(&current.id) {
                return Err(TopologyError::Cycle { id: node.id.clone() });
            }
            cursor = current.parent_id.as_ref().and_then(|p| by_id.get(p).copied());
        }
    }
    Ok(())
}
