//! Drag/resize gesture adapter.
//!
//! The host's drag library reports element gestures by canvas index in
//! pixels relative to the canvas origin. The adapter resolves the index to
//! a stable id at event time and converts pixels to percent using the
//! viewport's current size, producing `GestureMutation`s the board applies.

use crate::canvas::ElementArea;
use crate::item::ItemUpdate;
use ab_core::geometry::clamp_percent;
use ab_core::id::SubContentId;
use serde::Deserialize;
use smallvec::{SmallVec, smallvec};

/// Gesture events as reported by the host's drag library.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GestureEvent {
    Moved { index: usize, x: f64, y: f64 },
    Resized {
        index: usize,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    },
    Released { index: usize },
    /// The drag library's focus moved; `None` when nothing is focused.
    FocusChanged { index: Option<usize> },
}

/// Board operations produced by a gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureMutation {
    Update { id: SubContentId, update: ItemUpdate },
    Edit { id: SubContentId },
    Focus { id: Option<SubContentId> },
}

pub type Mutations = SmallVec<[GestureMutation; 2]>;

#[derive(Debug, Clone, Default)]
pub struct GestureAdapter {
    /// Created from the toolbar and not yet released.
    fresh: Option<SubContentId>,
}

impl GestureAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember an element that was just created by dragging a content button.
    pub fn mark_fresh(&mut self, id: SubContentId) {
        self.fresh = Some(id);
    }

    pub fn forget(&mut self, id: SubContentId) {
        if self.fresh == Some(id) {
            self.fresh = None;
        }
    }

    /// Translate one gesture. Unknown indices and unusable canvas sizes
    /// yield nothing.
    pub fn handle(&mut self, event: &GestureEvent, area: &ElementArea) -> Mutations {
        let id_at = |index: usize| area.nodes().get(index).map(|n| n.id);
        let viewport = area.viewport();

        match *event {
            GestureEvent::Moved { index, x, y } => {
                let (Some(id), Some((x, y))) = (id_at(index), viewport.to_percent(x, y)) else {
                    return SmallVec::new();
                };
                smallvec![GestureMutation::Update {
                    id,
                    update: coarse_position(x, y),
                }]
            }
            GestureEvent::Resized {
                index,
                left,
                top,
                width,
                height,
            } => {
                let Some(id) = id_at(index) else {
                    return SmallVec::new();
                };
                let Some(g) = viewport.rect_to_percent(left, top, width, height) else {
                    return SmallVec::new();
                };
                // Size first so the position fit sees the new dimensions.
                smallvec![
                    GestureMutation::Update {
                        id,
                        update: ItemUpdate::size(g.width, g.height),
                    },
                    GestureMutation::Update {
                        id,
                        update: coarse_position(g.x, g.y),
                    },
                ]
            }
            GestureEvent::Released { index } => match id_at(index) {
                Some(id) if self.fresh == Some(id) => {
                    self.fresh = None;
                    smallvec![GestureMutation::Edit { id }]
                }
                _ => SmallVec::new(),
            },
            GestureEvent::FocusChanged { index } => {
                let id = index.and_then(id_at);
                if index.is_some() && id.is_none() {
                    log::warn!("focus reported for unknown canvas index {index:?}");
                    return SmallVec::new();
                }
                smallvec![GestureMutation::Focus { id }]
            }
        }
    }
}

/// Clamp at the controller level before the item's own fit runs.
fn coarse_position(x: f64, y: f64) -> ItemUpdate {
    ItemUpdate {
        x: clamp_percent(x),
        y: clamp_percent(y),
        ..Default::default()
    }
}
