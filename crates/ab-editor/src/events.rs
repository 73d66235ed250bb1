//! Notifications the board queues for its host.
//!
//! The host drains them with `Board::drain_events` after each call and
//! re-renders whatever they name.

use crate::host::ConfirmationRequest;
use crate::order::Reorder;
use ab_core::geometry::{Geometry, ResizeOptions};
use ab_core::id::{AnimationId, SubContentId};
use ab_core::model::{AnimationParams, BoardParams, ElementParams};
use serde::Serialize;

/// Which ordered sequence a reorder or row update concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Sequence {
    Elements,
    Animations,
}

/// What an edit dialog is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum DialogTarget {
    Element(SubContentId),
    Animation(AnimationId),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BoardEvent {
    /// The canonical params changed; carries the sequences that did.
    #[serde(rename_all = "camelCase")]
    Changed {
        #[serde(skip_serializing_if = "Option::is_none")]
        elements: Option<Vec<ElementParams>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        animations: Option<Vec<AnimationParams>>,
    },

    // ── Canvas ──
    #[serde(rename_all = "camelCase")]
    ElementAdded {
        id: SubContentId,
        geometry: Geometry,
        resize: ResizeOptions,
    },
    ElementRemoved { id: SubContentId },
    ElementMoved { id: SubContentId, geometry: Geometry },
    /// The content type switched the element's geometry policy.
    ResizeOptionsChanged { id: SubContentId, resize: ResizeOptions },
    VisibilityChanged { id: SubContentId, visible: bool },
    FocusChanged { id: Option<SubContentId> },

    // ── Lists ──
    AnimationAdded { id: AnimationId },
    AnimationRemoved { id: AnimationId },
    /// `active` marks a live drag preview.
    Reordered {
        sequence: Sequence,
        reorder: Reorder,
        active: bool,
    },
    /// Row titles, details or highlights changed.
    RowsUpdated { sequence: Sequence },
    AddAnimationEnabled { enabled: bool },
    ListViewToggled { open: bool },

    // ── View ──
    #[serde(rename_all = "camelCase")]
    ZoomLevelChanged {
        index: usize,
        can_zoom_in: bool,
        can_zoom_out: bool,
    },
    /// Debounced canvas size after a container resize.
    Resized { width: f64, height: f64 },
    BackgroundChanged,

    // ── Dialogs ──
    ConfirmationRequested(ConfirmationRequest),
    FormDialogOpened { headline: String, target: DialogTarget },
    FormDialogClosed,
    PreviewToggled { params: Box<BoardParams> },
}

impl BoardEvent {
    pub fn is_changed(&self) -> bool {
        matches!(self, BoardEvent::Changed { .. })
    }
}
