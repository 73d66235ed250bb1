//! The element area: the canvas viewport plus the visual nodes in paint
//! order (later = painted on top).

use crate::order::Reorder;
use ab_core::geometry::{Geometry, ResizeOptions};
use ab_core::id::SubContentId;
use ab_core::viewport::Viewport;
use serde::Serialize;

/// One element's visual handle as the host renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasNode {
    pub id: SubContentId,
    pub geometry: Geometry,
    pub visible: bool,
    pub focused: bool,
    pub resize: ResizeOptions,
}

impl CanvasNode {
    pub fn new(id: SubContentId, geometry: Geometry, resize: ResizeOptions) -> Self {
        Self {
            id,
            geometry,
            visible: true,
            focused: false,
            resize,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ElementArea {
    viewport: Viewport,
    nodes: Vec<CanvasNode>,
}

impl ElementArea {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            nodes: Vec::new(),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Nodes in paint order.
    pub fn nodes(&self) -> &[CanvasNode] {
        &self.nodes
    }

    pub fn ids(&self) -> Vec<SubContentId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    pub fn index_of(&self, id: SubContentId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    pub fn node(&self, id: SubContentId) -> Option<&CanvasNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: SubContentId) -> Option<&mut CanvasNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Add on top of the paint order.
    pub fn append(&mut self, node: CanvasNode) {
        self.nodes.push(node);
    }

    pub fn remove(&mut self, id: SubContentId) -> Option<CanvasNode> {
        let index = self.index_of(id)?;
        Some(self.nodes.remove(index))
    }

    pub fn apply(&mut self, reorder: Reorder) {
        reorder.apply(&mut self.nodes);
    }

    pub fn set_geometry(&mut self, id: SubContentId, geometry: Geometry) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.geometry = geometry;
                true
            }
            None => false,
        }
    }

    /// Mark exactly one node focused, or none.
    pub fn set_focus(&mut self, focus: Option<SubContentId>) {
        for node in &mut self.nodes {
            node.focused = Some(node.id) == focus;
        }
    }
}
