//! Item model: the in-memory view of one placed element.
//!
//! An `Item` does not own geometry. The canonical `ElementParams` live in
//! the board's params; the item holds the element's identity, its stored
//! index, its geometry policy and its rendered sub-form, and normalizes
//! the canonical params it is handed.

use crate::dictionary::Dictionary;
use crate::host::SubForm;
use ab_core::geometry::{Geometry, GeometryPolicy, MediaInfo, clamp_percent, natural_size};
use ab_core::id::SubContentId;
use ab_core::model::{ContentType, ElementParams};

/// A partial update of an element's params.
///
/// Positions are clamped to `[0, 100]`; sizes are only applied when
/// non-zero. Everything runs through fit-into-area afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub hidden: Option<bool>,
    pub content_type: Option<ContentType>,
}

impl ItemUpdate {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    pub fn content_type(content_type: ContentType) -> Self {
        Self {
            content_type: Some(content_type),
            ..Default::default()
        }
    }
}

/// Outcome of `Item::update_params`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemChange {
    pub geometry: Geometry,
    /// Set when the content type switched the geometry policy.
    pub policy_changed: bool,
}

pub struct Item {
    id: SubContentId,
    index: usize,
    policy: GeometryPolicy,
    form: Option<Box<dyn SubForm>>,
}

impl std::fmt::Debug for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Item")
            .field("id", &self.id)
            .field("index", &self.index)
            .field("policy", &self.policy)
            .field("has_form", &self.form.is_some())
            .finish()
    }
}

impl Item {
    /// Create the model for `params` and normalize them once.
    ///
    /// The content type is applied as if it had just been selected, so a
    /// circle arrives squared.
    pub fn new(
        id: SubContentId,
        index: usize,
        params: &mut ElementParams,
        board_aspect_ratio: f64,
    ) -> Self {
        let mut item = Self {
            id,
            index,
            policy: GeometryPolicy::FreeResize,
            form: None,
        };
        let previous = None;
        item.apply_policy(previous, params, board_aspect_ratio);
        item.update_params(params, ItemUpdate::default(), board_aspect_ratio);
        item
    }

    pub fn id(&self) -> SubContentId {
        self.id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn policy(&self) -> GeometryPolicy {
        self.policy
    }

    pub fn form_mut(&mut self) -> Option<&mut (dyn SubForm + 'static)> {
        self.form.as_deref_mut()
    }

    pub fn set_form(&mut self, form: Box<dyn SubForm>) {
        self.form = Some(form);
    }

    /// Merge `update` into `params`, then fit into the canvas.
    pub fn update_params(
        &mut self,
        params: &mut ElementParams,
        update: ItemUpdate,
        board_aspect_ratio: f64,
    ) -> ItemChange {
        let mut policy_changed = false;
        if let Some(mut content_type) = update.content_type {
            content_type.sub_content_id = Some(self.id);
            params.content_type = content_type;
            let previous = self.policy;
            self.apply_policy(Some(previous), params, board_aspect_ratio);
            policy_changed = previous != self.policy;
        }

        if let Some(x) = update.x.and_then(clamp_percent) {
            params.x = x;
        }
        if let Some(y) = update.y.and_then(clamp_percent) {
            params.y = y;
        }
        if let Some(width) = update.width.filter(|w| w.is_finite() && *w != 0.0) {
            params.width = width;
        }
        if let Some(height) = update.height.filter(|h| h.is_finite() && *h != 0.0) {
            params.height = height;
        }
        if let Some(hidden) = update.hidden {
            params.hidden = hidden;
        }

        let geometry = params.geometry().fit_into_area(board_aspect_ratio);
        params.set_geometry(geometry);
        log::trace!("{:?} geometry {geometry:?}", self.id);

        ItemChange {
            geometry,
            policy_changed,
        }
    }

    /// Rescale to the media's natural ratio once it is known.
    pub fn set_media_size(
        &mut self,
        params: &mut ElementParams,
        media: MediaInfo,
        board_aspect_ratio: f64,
    ) -> Option<ItemChange> {
        let (width, height) = natural_size(params.geometry(), media, board_aspect_ratio)?;
        Some(self.update_params(params, ItemUpdate::size(width, height), board_aspect_ratio))
    }

    fn apply_policy(
        &mut self,
        previous: Option<GeometryPolicy>,
        params: &mut ElementParams,
        board_aspect_ratio: f64,
    ) {
        let next = GeometryPolicy::for_content(&params.content_type);
        let geometry = next.transition_from(previous, params.geometry(), board_aspect_ratio);
        params.set_geometry(geometry);
        self.policy = next;
    }
}

// ─── Display strings ─────────────────────────────────────────────────────

/// Sidebar title of an element.
pub fn element_title(params: &ElementParams, dictionary: &Dictionary) -> String {
    if let Some(title) = params.content_type.title() {
        return title.to_string();
    }
    let name = params.content_type.type_name();
    match dictionary.lookup("core.untitled") {
        Some(template) => template.replace(":libraryTitle", name),
        None => format!("Untitled {name}"),
    }
}

/// Sidebar details of an element: its content-type name.
pub fn element_details(params: &ElementParams) -> String {
    params.content_type.type_name().to_string()
}
