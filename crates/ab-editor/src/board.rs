//! The board controller: single owner and writer of the canonical params.
//!
//! Every mutation runs synchronously and keeps the orderings identical:
//! `params.elements`, the item models, the canvas paint order and the
//! element list rows; likewise `params.animations`, the animation models
//! and the animation list rows. Everything is addressed by stable id.
//! Indices are a rendering handle only and are recomputed after each
//! structural change.
//!
//! The board never calls back into the host except through [`Host`]; all
//! other notifications are queued as [`BoardEvent`]s.

use crate::animation::{Animation, animation_details};
use crate::canvas::{CanvasNode, ElementArea};
use crate::config::BoardConfig;
use crate::events::{BoardEvent, DialogTarget, Sequence};
use crate::gestures::{GestureAdapter, GestureEvent, GestureMutation};
use crate::host::{ClipboardPayload, ConfirmationRequest, Host, validate_form};
use crate::item::{Item, ItemUpdate, element_details, element_title};
use crate::order::Reorder;
use crate::schedule::{DeferredQueue, DeferredTask, ResizeDebouncer};
use crate::shortcuts::{KeyContext, ShortcutAction, ShortcutMap};
use crate::sidebar::{DraggablesList, ListConfig, ListInput, ListIntent};
use crate::toolbar::{Toolbar, ToolbarAction};
use ab_core::aspect::AspectRatio;
use ab_core::error::CoreError;
use ab_core::geometry::{FULL, MediaInfo};
use ab_core::id::{AnimationId, SubContentId};
use ab_core::lint::{LintDiagnostic, lint_params, prune_orphaned_animations};
use ab_core::model::{AnimationParams, Background, BoardParams, ContentType, ElementParams, RawAspectRatio};
use ab_core::viewport::{Size, Viewport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::{Map, Value};

/// Bounds of the random offset applied to each axis of a pasted element.
pub const PASTE_OFFSET_MIN: f64 = 2.5;
pub const PASTE_OFFSET_MAX: f64 = 10.0;

/// Element fields an edit dialog never overwrites: geometry belongs to
/// the canvas gestures.
const GEOMETRY_KEYS: [&str; 4] = ["x", "y", "width", "height"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingRemoval {
    Element(SubContentId),
    Animation(AnimationId),
}

impl PendingRemoval {
    fn kind(&self) -> &'static str {
        match self {
            PendingRemoval::Element(_) => "RemoveElement",
            PendingRemoval::Animation(_) => "RemoveAnimation",
        }
    }
}

pub struct Board {
    config: BoardConfig,
    params: BoardParams,

    /// Parallel to `params.elements`.
    items: Vec<Item>,
    /// Parallel to `params.animations`.
    animations: Vec<Animation>,

    area: ElementArea,
    element_list: DraggablesList<SubContentId>,
    animation_list: DraggablesList<AnimationId>,
    toolbar: Toolbar,
    gestures: GestureAdapter,

    focus: Option<SubContentId>,
    list_view_open: bool,
    dialog: Option<DialogTarget>,
    pending: Vec<(u32, PendingRemoval)>,
    next_token: u32,

    deferred: DeferredQueue,
    resize: ResizeDebouncer,
    events: Vec<BoardEvent>,
    rng: StdRng,
    host: Box<dyn Host>,
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("elements", &self.element_ids())
            .field("animations", &self.animation_ids())
            .field("focus", &self.focus)
            .field("dialog", &self.dialog)
            .finish_non_exhaustive()
    }
}

impl Board {
    /// Build the board over persisted params.
    ///
    /// Loading fires a single elements `Changed` only when normalization
    /// (fresh ids, fitting, shape locks) altered what was stored.
    pub fn new(config: BoardConfig, mut params: BoardParams, host: Box<dyn Host>) -> Self {
        let mut viewport = Viewport::new(AspectRatio::from_raw(params.aspect_ratio.as_ref()));
        if let Some(background) = &params.background {
            viewport.apply_background(background, |path| host.resolve_path(path));
        }

        let dictionary = &config.dictionary;
        let element_list = DraggablesList::new(ListConfig {
            title: dictionary.get("l10n.elements"),
            reversed: true,
            can_toggle_visibility: true,
            add_button_label: None,
        });
        let animation_list = DraggablesList::new(ListConfig {
            title: dictionary.get("l10n.animations"),
            reversed: false,
            can_toggle_visibility: false,
            add_button_label: Some(dictionary.get("a11y.addAnimation")),
        });
        let toolbar = Toolbar::new(&config.content_options, dictionary);

        let elements = std::mem::take(&mut params.elements);
        let animations = std::mem::take(&mut params.animations);
        let stored = elements.clone();

        let mut board = Self {
            config,
            params,
            items: Vec::new(),
            animations: Vec::new(),
            area: ElementArea::new(viewport),
            element_list,
            animation_list,
            toolbar,
            gestures: GestureAdapter::new(),
            focus: None,
            list_view_open: false,
            dialog: None,
            pending: Vec::new(),
            next_token: 1,
            deferred: DeferredQueue::new(),
            resize: ResizeDebouncer::new(),
            events: Vec::new(),
            rng: StdRng::seed_from_u64(rand::rng().random()),
            host,
        };

        for element in elements {
            board.insert_element(element);
        }
        for animation in animations {
            board.insert_animation(animation);
        }
        log::debug!(
            "loaded board with {} elements and {} animations",
            board.items.len(),
            board.animations.len()
        );
        if board.params.elements != stored {
            log::debug!("stored elements were normalized on load");
            board.emit_changed(true, false);
        }
        board
    }

    /// Make paste offsets reproducible.
    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn params(&self) -> &BoardParams {
        &self.params
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    pub fn element_area(&self) -> &ElementArea {
        &self.area
    }

    pub fn viewport(&self) -> &Viewport {
        self.area.viewport()
    }

    pub fn element_list(&self) -> &DraggablesList<SubContentId> {
        &self.element_list
    }

    pub fn animation_list(&self) -> &DraggablesList<AnimationId> {
        &self.animation_list
    }

    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    pub fn focus(&self) -> Option<SubContentId> {
        self.focus
    }

    pub fn dialog(&self) -> Option<DialogTarget> {
        self.dialog
    }

    pub fn is_list_view_open(&self) -> bool {
        self.list_view_open
    }

    /// Element ids in z-order (back to front).
    pub fn element_ids(&self) -> Vec<SubContentId> {
        self.items.iter().map(Item::id).collect()
    }

    /// Animation ids in playback order.
    pub fn animation_ids(&self) -> Vec<AnimationId> {
        self.animations.iter().map(Animation::id).collect()
    }

    /// Params of one animation.
    pub fn animation_params(&self, id: AnimationId) -> Option<&AnimationParams> {
        self.animation_position(id).map(|pos| &self.params.animations[pos])
    }

    /// Take every queued notification.
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    fn item_position(&self, id: SubContentId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn animation_position(&self, id: AnimationId) -> Option<usize> {
        self.animations.iter().position(|a| a.id() == id)
    }

    fn aspect_ratio(&self) -> f64 {
        self.area.viewport().aspect_ratio().value()
    }

    fn animations_targeting(&self, id: SubContentId) -> Vec<AnimationId> {
        self.animations
            .iter()
            .zip(&self.params.animations)
            .filter(|(_, params)| params.sub_content_id == Some(id))
            .map(|(animation, _)| animation.id())
            .collect()
    }

    fn emit_changed(&mut self, elements: bool, animations: bool) {
        self.events.push(BoardEvent::Changed {
            elements: elements.then(|| self.params.elements.clone()),
            animations: animations.then(|| self.params.animations.clone()),
        });
    }

    fn reindex(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.set_index(index);
        }
        debug_assert!(
            self.items
                .iter()
                .zip(&self.params.elements)
                .all(|(item, params)| params.sub_content_id() == Some(item.id())),
            "item models out of step with params"
        );
    }

    // ─── Elements ────────────────────────────────────────────────────────

    fn insert_element(&mut self, mut element: ElementParams) -> SubContentId {
        let id = match element.sub_content_id() {
            Some(id) if !self.params.has_element(id) => id,
            Some(duplicate) => {
                log::warn!("duplicate subContentId {duplicate:?}; assigning a new one");
                SubContentId::generate()
            }
            None => SubContentId::generate(),
        };
        element.content_type.sub_content_id = Some(id);

        let index = self.params.elements.len();
        let aspect = self.aspect_ratio();
        let mut item = Item::new(id, index, &mut element, aspect);
        let form = self
            .host
            .render_form(&self.config.element_fields, &params_value(&element));
        item.set_form(form);

        let mut node = CanvasNode::new(id, element.geometry(), item.policy().resize_options());
        node.visible = !element.hidden;
        self.area.append(node);

        let dictionary = &self.config.dictionary;
        self.element_list
            .add(id, element_title(&element, dictionary), element_details(&element));
        if element.hidden {
            self.element_list.set_visibility(id, false);
        }

        self.params.elements.push(element);
        self.items.push(item);
        id
    }

    /// Append a new element on top of the z-order.
    pub fn create_element(&mut self, element: ElementParams) -> SubContentId {
        let id = self.insert_element(element);
        if let Some(node) = self.area.node(id) {
            self.events.push(BoardEvent::ElementAdded {
                id,
                geometry: node.geometry,
                resize: node.resize,
            });
        }
        log::debug!("created element {id:?}");
        self.emit_changed(true, false);
        id
    }

    /// Create an element from a toolbar content button.
    ///
    /// Keyboard activation opens the edit dialog at once; a dragged button
    /// opens it when the new element is released.
    pub fn create_from_toolbar(&mut self, button_id: &str, via_keyboard: bool) -> Option<SubContentId> {
        let params = self.toolbar.content_button(button_id)?.element_params();
        let id = self.create_element(params);
        if via_keyboard {
            self.edit_element(id);
        } else {
            self.gestures.mark_fresh(id);
        }
        Some(id)
    }

    /// Remove an element and every animation targeting it.
    ///
    /// Called once removal is confirmed; see [`Board::request_remove_element`].
    pub fn remove_element(&mut self, id: SubContentId) -> bool {
        if self.item_position(id).is_none() {
            return false;
        }

        self.element_list.remove(id);
        self.area.remove(id);
        self.items.retain(|item| item.id() != id);
        self.params
            .elements
            .retain(|element| element.sub_content_id() != Some(id));
        self.reindex();
        self.gestures.forget(id);
        self.events.push(BoardEvent::ElementRemoved { id });

        if self.dialog == Some(DialogTarget::Element(id)) {
            self.close_dialog();
        }
        self.set_focus(None);

        let dependent = self.animations_targeting(id);
        for animation in &dependent {
            self.detach_animation(*animation);
        }

        log::debug!("removed element {id:?} and {} animations", dependent.len());
        self.emit_changed(true, true);
        true
    }

    pub fn bring_to_front(&mut self, id: SubContentId) -> bool {
        match self.item_position(id) {
            Some(index) => self.reorder_elements(Reorder::ToFront { index }, false),
            None => false,
        }
    }

    pub fn send_to_back(&mut self, id: SubContentId) -> bool {
        match self.item_position(id) {
            Some(index) => self.reorder_elements(Reorder::ToBack { index }, false),
            None => false,
        }
    }

    /// Swap two elements in the z-order. Indices outside the element range
    /// are ignored. `active` marks a live drag preview.
    pub fn change_element_z_position(&mut self, source: i64, target: i64, active: bool) -> bool {
        match Reorder::swap_checked(source, target, self.params.elements.len()) {
            Some(reorder) => self.reorder_elements(reorder, active),
            None => {
                log::trace!("ignoring element swap {source} <-> {target}");
                false
            }
        }
    }

    fn reorder_elements(&mut self, reorder: Reorder, active: bool) -> bool {
        if !reorder.fits(self.params.elements.len()) {
            return false;
        }
        reorder.apply(&mut self.params.elements);
        reorder.apply(&mut self.items);
        self.area.apply(reorder);
        self.element_list.apply(reorder, active);
        self.reindex();

        log::debug!("elements reordered: {reorder:?}");
        self.events.push(BoardEvent::Reordered {
            sequence: Sequence::Elements,
            reorder,
            active,
        });
        self.emit_changed(true, false);
        true
    }

    /// Merge a partial update into an element's params and fit it.
    pub fn update_element(&mut self, id: SubContentId, update: ItemUpdate) -> bool {
        if !self.apply_item_update(id, update) {
            return false;
        }
        self.emit_changed(true, false);
        true
    }

    /// Set an element's position in percent. Non-numeric input is ignored.
    pub fn update_element_position(&mut self, id: SubContentId, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        self.update_element(id, ItemUpdate::position(x, y))
    }

    /// Set an element's size in percent.
    pub fn update_element_size(&mut self, id: SubContentId, width: f64, height: f64) -> bool {
        self.update_element(id, ItemUpdate::size(width, height))
    }

    fn apply_item_update(&mut self, id: SubContentId, update: ItemUpdate) -> bool {
        let Some(pos) = self.item_position(id) else {
            return false;
        };
        let aspect = self.aspect_ratio();
        let hidden = update.hidden;
        let change = self.items[pos].update_params(&mut self.params.elements[pos], update, aspect);
        let resize = self.items[pos].policy().resize_options();

        if let Some(node) = self.area.node_mut(id) {
            node.geometry = change.geometry;
            if change.policy_changed {
                node.resize = resize;
            }
            if let Some(hidden) = hidden {
                node.visible = !hidden;
            }
        }
        self.events.push(BoardEvent::ElementMoved {
            id,
            geometry: change.geometry,
        });
        if change.policy_changed {
            self.events
                .push(BoardEvent::ResizeOptionsChanged { id, resize });
        }
        if let Some(hidden) = hidden {
            self.element_list.set_visibility(id, !hidden);
            self.events.push(BoardEvent::VisibilityChanged {
                id,
                visible: !hidden,
            });
        }
        true
    }

    /// Rescale an element to its media's natural ratio. A late report for an
    /// element removed in the meantime is ignored.
    pub fn set_media_size(&mut self, id: SubContentId, media: MediaInfo) -> bool {
        let Some(pos) = self.item_position(id) else {
            log::debug!("media size for {id:?} arrived after removal");
            return false;
        };
        let aspect = self.aspect_ratio();
        let Some(change) = self.items[pos].set_media_size(&mut self.params.elements[pos], media, aspect)
        else {
            return false;
        };
        self.area.set_geometry(id, change.geometry);
        self.events.push(BoardEvent::ElementMoved {
            id,
            geometry: change.geometry,
        });
        self.emit_changed(true, false);
        true
    }

    /// Show or hide an element. `None` toggles.
    pub fn toggle_element_visibility(&mut self, id: SubContentId, state: Option<bool>) -> bool {
        let Some(pos) = self.item_position(id) else {
            return false;
        };
        let visible = !self.params.elements[pos].hidden;
        let hidden = !state.unwrap_or(!visible);
        self.apply_item_update(
            id,
            ItemUpdate {
                hidden: Some(hidden),
                ..Default::default()
            },
        );
        if !hidden {
            self.set_focus(Some(id));
        }
        self.emit_changed(true, false);
        true
    }

    /// Data for the host's clipboard.
    pub fn copy_element(&self, id: SubContentId) -> Option<ClipboardPayload> {
        let element = self.params.element(id)?.clone();
        Some(ClipboardPayload::SameOrigin { element })
    }

    /// Paste clipboard data as a new element.
    ///
    /// Same-origin data keeps its params under a new id, shifted by a random
    /// offset on each axis. Foreign data brings only its content type and
    /// size, capped to the canvas.
    pub fn paste(&mut self, payload: ClipboardPayload) -> Option<SubContentId> {
        if !self.host.can_paste(&payload) {
            log::debug!("host refused to paste {}", payload.library());
            return None;
        }

        let element = match payload {
            ClipboardPayload::SameOrigin { mut element } => {
                element.content_type.sub_content_id = None;
                element.x += self.paste_offset();
                element.y += self.paste_offset();
                element
            }
            ClipboardPayload::Foreign {
                library,
                params,
                width,
                height,
            } => {
                let mut content_type = ContentType::new(library);
                if params.is_object() {
                    content_type.params = params;
                }
                let mut element = ElementParams::new(content_type);
                let usable = |v: &f64| v.is_finite() && *v > 0.0;
                if let Some(width) = width.filter(usable) {
                    element.width = width.min(FULL);
                }
                if let Some(height) = height.filter(usable) {
                    element.height = height.min(FULL);
                }
                element
            }
        };
        Some(self.create_element(element))
    }

    fn paste_offset(&mut self) -> f64 {
        let magnitude = self.rng.random_range(PASTE_OFFSET_MIN..=PASTE_OFFSET_MAX);
        if self.rng.random_bool(0.5) {
            magnitude
        } else {
            -magnitude
        }
    }

    // ─── Animations ──────────────────────────────────────────────────────

    fn insert_animation(&mut self, params: AnimationParams) -> AnimationId {
        let mut animation = Animation::new();
        let form = self
            .host
            .render_form(&self.config.animation_fields, &params_value(&params));
        animation.set_form(form);

        let id = animation.id();
        let title = self.animation_title(&params);
        let details = animation_details(&params, &self.config.dictionary);
        self.animation_list.add(id, title, details);

        self.params.animations.push(params);
        self.animations.push(animation);
        id
    }

    fn animation_title(&self, params: &AnimationParams) -> String {
        let target = params.sub_content_id.and_then(|id| self.params.element(id));
        match (target, params.sub_content_id) {
            (Some(element), _) => element_title(element, &self.config.dictionary),
            (None, Some(id)) => id.to_string(),
            (None, None) => String::new(),
        }
    }

    /// Append an animation targeting an existing element.
    pub fn create_animation(&mut self, target: SubContentId) -> Option<AnimationId> {
        if !self.params.has_element(target) {
            return None;
        }
        let id = self.insert_animation(AnimationParams::targeting(target));
        self.events.push(BoardEvent::AnimationAdded { id });
        log::debug!("created animation {id:?} for {target:?}");
        self.emit_changed(false, true);
        Some(id)
    }

    fn detach_animation(&mut self, id: AnimationId) -> bool {
        let Some(pos) = self.animation_position(id) else {
            return false;
        };
        self.animations.remove(pos);
        self.params.animations.remove(pos);
        self.animation_list.remove(id);
        self.events.push(BoardEvent::AnimationRemoved { id });
        if self.dialog == Some(DialogTarget::Animation(id)) {
            self.close_dialog();
        }
        true
    }

    /// Remove one animation, addressed by its own id.
    pub fn remove_animation(&mut self, id: AnimationId) -> bool {
        if !self.detach_animation(id) {
            return false;
        }
        log::debug!("removed animation {id:?}");
        self.emit_changed(false, true);
        true
    }

    /// Swap two animations in the playback order.
    pub fn change_animation_order(&mut self, source: i64, target: i64, active: bool) -> bool {
        let Some(reorder) = Reorder::swap_checked(source, target, self.params.animations.len()) else {
            log::trace!("ignoring animation swap {source} <-> {target}");
            return false;
        };
        reorder.apply(&mut self.params.animations);
        reorder.apply(&mut self.animations);
        self.animation_list.apply(reorder, active);

        self.events.push(BoardEvent::Reordered {
            sequence: Sequence::Animations,
            reorder,
            active,
        });
        self.emit_changed(false, true);
        true
    }

    // ─── Confirmed removal ───────────────────────────────────────────────

    /// Ask the host to confirm removing an element. Returns the token to
    /// pass to [`Board::confirm`] or [`Board::cancel`].
    pub fn request_remove_element(&mut self, id: SubContentId) -> Option<u32> {
        self.params
            .has_element(id)
            .then(|| self.request_confirmation(PendingRemoval::Element(id)))
    }

    pub fn request_remove_animation(&mut self, id: AnimationId) -> Option<u32> {
        self.animation_position(id)
            .map(|_| self.request_confirmation(PendingRemoval::Animation(id)))
    }

    fn request_confirmation(&mut self, removal: PendingRemoval) -> u32 {
        let token = self.next_token;
        self.next_token = self.next_token.wrapping_add(1);
        self.pending.push((token, removal));
        let request = ConfirmationRequest::from_dictionary(token, removal.kind(), &self.config.dictionary);
        self.events.push(BoardEvent::ConfirmationRequested(request));
        token
    }

    fn take_pending(&mut self, token: u32) -> Option<PendingRemoval> {
        let pos = self.pending.iter().position(|(t, _)| *t == token)?;
        Some(self.pending.remove(pos).1)
    }

    pub fn confirm(&mut self, token: u32) -> bool {
        match self.take_pending(token) {
            Some(PendingRemoval::Element(id)) => self.remove_element(id),
            Some(PendingRemoval::Animation(id)) => self.remove_animation(id),
            None => false,
        }
    }

    /// Drop a pending removal; nothing else changes.
    pub fn cancel(&mut self, token: u32) -> bool {
        self.take_pending(token).is_some()
    }

    // ─── Edit dialog ─────────────────────────────────────────────────────

    pub fn edit_element(&mut self, id: SubContentId) -> bool {
        if !self.params.has_element(id) {
            return false;
        }
        self.open_dialog(DialogTarget::Element(id), "l10n.editElement");
        true
    }

    /// Edit an animation. Without a known id, a new animation bound to the
    /// focused element is created first; with nothing focused this is a no-op.
    pub fn edit_animation(&mut self, id: Option<AnimationId>) -> Option<AnimationId> {
        let existing = id.filter(|id| self.animation_position(*id).is_some());
        let id = match existing {
            Some(id) => id,
            None => {
                let target = self.focus?;
                self.create_animation(target)?
            }
        };
        self.open_dialog(DialogTarget::Animation(id), "l10n.editAnimation");
        Some(id)
    }

    fn open_dialog(&mut self, target: DialogTarget, headline_key: &str) {
        if self.dialog.is_some() {
            self.close_dialog();
        }
        self.dialog = Some(target);
        self.events.push(BoardEvent::FormDialogOpened {
            headline: self.config.dictionary.get(headline_key),
            target,
        });
        self.deferred.push(DeferredTask::BlurAll);
    }

    fn close_dialog(&mut self) {
        if self.dialog.take().is_some() {
            self.events.push(BoardEvent::FormDialogClosed);
            self.deferred.push(DeferredTask::BlurAll);
        }
    }

    /// The dialog's done button. Returns `false` and keeps the dialog open
    /// while the form does not validate.
    pub fn dialog_done(&mut self) -> bool {
        let Some(target) = self.dialog else {
            return false;
        };

        let dictionary = &self.config.dictionary;
        let form = match target {
            DialogTarget::Element(id) => self
                .items
                .iter_mut()
                .find(|item| item.id() == id)
                .and_then(|item| item.form_mut()),
            DialogTarget::Animation(id) => self
                .animations
                .iter_mut()
                .find(|a| a.id() == id)
                .and_then(|a| a.form_mut()),
        };
        if let Some(form) = form {
            if !validate_form(form, dictionary) {
                return false;
            }
        }

        match target {
            DialogTarget::Element(id) => self.commit_element_form(id),
            DialogTarget::Animation(id) => self.commit_animation_form(id),
        }
        self.close_dialog();
        true
    }

    /// The dialog's remove button: close and start the confirmed removal.
    pub fn dialog_remove(&mut self) -> Option<u32> {
        let target = self.dialog?;
        self.close_dialog();
        match target {
            DialogTarget::Element(id) => self.request_remove_element(id),
            DialogTarget::Animation(id) => self.request_remove_animation(id),
        }
    }

    fn commit_element_form(&mut self, id: SubContentId) {
        let Some(pos) = self.item_position(id) else {
            return;
        };

        let mut update = ItemUpdate::default();
        if let Some(values) = self.items[pos].form_mut().and_then(|form| form.values()) {
            match merge_element_values(&self.params.elements[pos], values) {
                Ok(merged) => {
                    self.params.elements[pos].extra = merged.extra;
                    update.content_type = Some(merged.content_type);
                }
                Err(err) => log::warn!("ignoring edited params of {id:?}: {err}"),
            }
        }
        self.apply_item_update(id, update);

        let element = &self.params.elements[pos];
        let title = element_title(element, &self.config.dictionary);
        let details = element_details(element);
        self.element_list
            .update(id, Some(title.clone()), Some(details));
        for animation in self.animations_targeting(id) {
            self.animation_list
                .update(animation, Some(title.clone()), None);
        }

        self.events.push(BoardEvent::RowsUpdated {
            sequence: Sequence::Elements,
        });
        self.events.push(BoardEvent::RowsUpdated {
            sequence: Sequence::Animations,
        });
        self.emit_changed(true, false);
    }

    fn commit_animation_form(&mut self, id: AnimationId) {
        let Some(pos) = self.animation_position(id) else {
            return;
        };

        if let Some(values) = self.animations[pos].form_mut().and_then(|form| form.values()) {
            match serde_json::from_value::<AnimationParams>(values) {
                Ok(mut edited) => {
                    let resolves = edited
                        .sub_content_id
                        .is_some_and(|target| self.params.has_element(target));
                    if !resolves {
                        log::warn!(
                            "animation {id:?} edited to target {:?}; keeping its previous target",
                            edited.sub_content_id
                        );
                        edited.sub_content_id = self.params.animations[pos].sub_content_id;
                    }
                    self.params.animations[pos] = edited;
                }
                Err(err) => log::warn!("ignoring edited params of {id:?}: {err}"),
            }
        }

        let params = &self.params.animations[pos];
        let title = self.animation_title(params);
        let details = animation_details(params, &self.config.dictionary);
        self.animation_list.update(id, Some(title), Some(details));
        self.events.push(BoardEvent::RowsUpdated {
            sequence: Sequence::Animations,
        });
        self.emit_changed(false, true);
    }

    // ─── Focus and highlight ─────────────────────────────────────────────

    /// Focus one element or none. Unknown ids are ignored.
    pub fn set_focus(&mut self, id: Option<SubContentId>) {
        if let Some(id) = id {
            if !self.params.has_element(id) {
                return;
            }
        }
        if self.focus != id {
            self.focus = id;
            self.area.set_focus(id);
            self.events.push(BoardEvent::FocusChanged { id });
        }
        self.refresh_add_animation();
    }

    pub fn blur_all(&mut self) {
        self.set_focus(None);
    }

    fn refresh_add_animation(&mut self) {
        let enabled = self.focus.is_some();
        if self.animation_list.set_add_button_enabled(enabled) {
            self.events
                .push(BoardEvent::AddAnimationEnabled { enabled });
        }
    }

    /// Highlight an element's row. With `animation`, that animation's row
    /// is highlighted alongside; otherwise every animation targeting the
    /// element is. Highlighting also focuses the element.
    pub fn toggle_highlight_element(
        &mut self,
        id: SubContentId,
        state: bool,
        animation: Option<AnimationId>,
    ) -> bool {
        if !self.params.has_element(id) {
            return false;
        }
        if state {
            self.set_focus(Some(id));
        }

        self.element_list.toggle_highlight(Some(id), state);
        match animation {
            Some(animation) => self.animation_list.toggle_highlight(Some(animation), state),
            None if state => {
                let targeting = self.animations_targeting(id);
                self.animation_list.set_highlights(&targeting);
            }
            None => {
                for animation in self.animations_targeting(id) {
                    self.animation_list.toggle_highlight(Some(animation), false);
                }
            }
        }
        self.events.push(BoardEvent::RowsUpdated {
            sequence: Sequence::Elements,
        });
        self.events.push(BoardEvent::RowsUpdated {
            sequence: Sequence::Animations,
        });
        true
    }

    /// A mouse-down anywhere in the document. Outside the sidebar every
    /// row highlight is cleared.
    pub fn handle_document_mouse_down(&mut self, inside_sidebar: bool) {
        if !inside_sidebar {
            self.element_list.toggle_highlight(None, false);
            self.animation_list.toggle_highlight(None, false);
            self.events.push(BoardEvent::RowsUpdated {
                sequence: Sequence::Elements,
            });
            self.events.push(BoardEvent::RowsUpdated {
                sequence: Sequence::Animations,
            });
        }
        self.deferred.push(DeferredTask::RefreshAddAnimation);
    }

    // ─── Sidebar lists ───────────────────────────────────────────────────

    pub fn element_list_input(&mut self, input: ListInput<SubContentId>) -> bool {
        let ends_drag = matches!(input, ListInput::DragEnd);
        let intent = self.element_list.handle(input);
        if ends_drag {
            self.events.push(BoardEvent::RowsUpdated {
                sequence: Sequence::Elements,
            });
        }
        match intent {
            Some(ListIntent::Edit(id)) => self.edit_element(id),
            Some(ListIntent::Move {
                source,
                target,
                active,
            }) => self.change_element_z_position(source, target, active),
            Some(ListIntent::Remove(id)) => self.request_remove_element(id).is_some(),
            Some(ListIntent::Highlight(id, state)) => self.toggle_highlight_element(id, state, None),
            Some(ListIntent::ToggleVisibility(id)) => self.toggle_element_visibility(id, None),
            Some(ListIntent::Add) | None => ends_drag,
        }
    }

    pub fn animation_list_input(&mut self, input: ListInput<AnimationId>) -> bool {
        let ends_drag = matches!(input, ListInput::DragEnd);
        let intent = self.animation_list.handle(input);
        if ends_drag {
            self.events.push(BoardEvent::RowsUpdated {
                sequence: Sequence::Animations,
            });
        }
        match intent {
            Some(ListIntent::Edit(id)) => self.edit_animation(Some(id)).is_some(),
            Some(ListIntent::Move {
                source,
                target,
                active,
            }) => self.change_animation_order(source, target, active),
            Some(ListIntent::Remove(id)) => self.request_remove_animation(id).is_some(),
            Some(ListIntent::Highlight(id, state)) => {
                let target = self.animation_params(id).and_then(|p| p.sub_content_id);
                match target {
                    Some(target) => self.toggle_highlight_element(target, state, Some(id)),
                    None => false,
                }
            }
            Some(ListIntent::Add) => self.edit_animation(None).is_some(),
            Some(ListIntent::ToggleVisibility(_)) | None => ends_drag,
        }
    }

    // ─── Gestures and keys ───────────────────────────────────────────────

    /// Apply one gesture from the host's drag library. A gesture touching
    /// geometry fires a single `Changed`.
    pub fn handle_gesture(&mut self, event: &GestureEvent) {
        let mutations = self.gestures.handle(event, &self.area);
        let mut changed = false;
        for mutation in mutations {
            match mutation {
                GestureMutation::Update { id, update } => {
                    changed |= self.apply_item_update(id, update);
                }
                GestureMutation::Edit { id } => {
                    self.edit_element(id);
                }
                GestureMutation::Focus { id } => self.set_focus(id),
            }
        }
        if changed {
            self.emit_changed(true, false);
        }
    }

    /// A key press. `target_tag` is the event target's tag name.
    pub fn handle_key(&mut self, key: &str, target_tag: Option<&str>) -> bool {
        let ctx = KeyContext {
            target_tag,
            dialog_open: self.dialog.is_some(),
        };
        match ShortcutMap::resolve(key, ctx) {
            Some(ShortcutAction::ZoomIn) => self.zoom_in(),
            Some(ShortcutAction::ZoomOut) => self.zoom_out(),
            Some(ShortcutAction::DismissDialog) => {
                self.dialog_remove();
                true
            }
            None => false,
        }
    }

    // ─── Toolbar and view ────────────────────────────────────────────────

    pub fn toolbar_action(&mut self, action: ToolbarAction) -> bool {
        match action {
            ToolbarAction::ListView => {
                self.toggle_list_view(None);
                true
            }
            ToolbarAction::ZoomIn => self.zoom_in(),
            ToolbarAction::ZoomOut => self.zoom_out(),
            ToolbarAction::Preview => {
                self.preview();
                true
            }
        }
    }

    pub fn zoom_in(&mut self) -> bool {
        let level = self.area.viewport_mut().zoom_in();
        self.zoom_changed(level)
    }

    pub fn zoom_out(&mut self) -> bool {
        let level = self.area.viewport_mut().zoom_out();
        self.zoom_changed(level)
    }

    /// Snap to the nearest zoom factor; out-of-range input is ignored.
    pub fn set_zoom_factor(&mut self, factor: f64) -> bool {
        let level = self.area.viewport_mut().set_zoom_factor(factor);
        self.zoom_changed(level)
    }

    /// Zoom one step around the cursor (container pixels).
    pub fn wheel_zoom(&mut self, delta_y: f64, mouse_x: f64, mouse_y: f64) -> bool {
        let level = self.area.viewport_mut().wheel_zoom(delta_y, mouse_x, mouse_y);
        self.zoom_changed(level)
    }

    fn zoom_changed(&mut self, level: Option<usize>) -> bool {
        let Some(index) = level else {
            return false;
        };
        self.toolbar.set_zoom_level(index);
        let viewport = self.area.viewport();
        self.events.push(BoardEvent::ZoomLevelChanged {
            index,
            can_zoom_in: viewport.can_zoom_in(),
            can_zoom_out: viewport.can_zoom_out(),
        });
        true
    }

    pub fn set_scroll(&mut self, left: f64, top: f64) {
        self.area.viewport_mut().set_scroll(left, top);
    }

    /// Open or close the sidebar. `None` toggles. Returns the new state.
    pub fn toggle_list_view(&mut self, state: Option<bool>) -> bool {
        let open = state.unwrap_or(!self.list_view_open);
        self.list_view_open = open;
        self.toolbar.set_list_view_active(open);
        self.events.push(BoardEvent::ListViewToggled { open });
        self.resize.request(self.area.viewport().container_size());
        open
    }

    /// Blur everything and hand the current params to the preview.
    pub fn preview(&mut self) {
        self.blur_all();
        self.events.push(BoardEvent::PreviewToggled {
            params: Box::new(self.persisted_params()),
        });
    }

    pub fn set_background(&mut self, background: Background) {
        let host = &self.host;
        self.area
            .viewport_mut()
            .apply_background(&background, |path| host.resolve_path(path));
        self.params.background = Some(background);
        self.events.push(BoardEvent::BackgroundChanged);
    }

    /// Change the canvas aspect ratio. Geometry is relative, so only a
    /// resize is requested.
    pub fn set_aspect_ratio(&mut self, raw: RawAspectRatio) {
        let aspect_ratio = AspectRatio::from_raw(Some(&raw));
        self.params.aspect_ratio = Some(raw);
        self.area.viewport_mut().set_aspect_ratio(aspect_ratio);
        self.resize.request(self.area.viewport().container_size());
    }

    // ─── Scheduling ──────────────────────────────────────────────────────

    /// The container was resized; applied on the next animation frame.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.resize.request(Size::new(width, height));
    }

    /// Apply the pending resize, if any.
    pub fn on_animation_frame(&mut self) -> bool {
        let Some(container) = self.resize.take() else {
            return false;
        };
        self.area
            .viewport_mut()
            .set_container_size(container.width, container.height);
        let size = self.area.viewport().size();
        self.events.push(BoardEvent::Resized {
            width: size.width,
            height: size.height,
        });
        true
    }

    /// Run the follow-ups queued during the previous turn.
    pub fn run_deferred(&mut self) -> usize {
        let tasks = self.deferred.drain();
        for task in &tasks {
            match task {
                DeferredTask::BlurAll => self.blur_all(),
                DeferredTask::RefreshAddAnimation => self.refresh_add_animation(),
            }
        }
        tasks.len()
    }

    pub fn has_deferred(&self) -> bool {
        !self.deferred.is_empty()
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Params for the host to store. Animations whose target no longer
    /// exists are dropped.
    pub fn persisted_params(&self) -> BoardParams {
        let mut params = self.params.clone();
        prune_orphaned_animations(&mut params);
        params
    }

    pub fn persisted_json(&self) -> Result<String, CoreError> {
        self.persisted_params().to_json()
    }

    pub fn lint(&self) -> Vec<LintDiagnostic> {
        lint_params(&self.params)
    }
}

fn params_value<T: Serialize>(params: &T) -> Value {
    serde_json::to_value(params).unwrap_or_else(|err| {
        log::warn!("params not representable as JSON: {err}");
        Value::Null
    })
}

/// Merge a dialog's values over the canonical element, keeping geometry.
fn merge_element_values(current: &ElementParams, values: Value) -> Result<ElementParams, CoreError> {
    let Value::Object(edited) = values else {
        return Err(CoreError::InvalidParams(
            "edited element params must be an object".into(),
        ));
    };
    let mut merged = match serde_json::to_value(current)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in edited {
        if !GEOMETRY_KEYS.contains(&key.as_str()) {
            merged.insert(key, value);
        }
    }
    Ok(serde_json::from_value(Value::Object(merged))?)
}
