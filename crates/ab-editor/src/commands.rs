//! Host-facing command surface.
//!
//! Each `BoardCommand` names one board operation. The wasm bridge
//! deserializes them from JSON and dispatches through `Board::apply`.

use crate::board::Board;
use crate::gestures::GestureEvent;
use crate::host::ClipboardPayload;
use crate::item::ItemUpdate;
use crate::sidebar::ListInput;
use crate::toolbar::ToolbarAction;
use ab_core::geometry::MediaInfo;
use ab_core::id::{AnimationId, SubContentId};
use ab_core::model::{Background, ElementParams, RawAspectRatio};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BoardCommand {
    // ── Elements ──
    CreateElement {
        element: Box<ElementParams>,
    },
    #[serde(rename_all = "camelCase")]
    CreateFromToolbar {
        button: String,
        #[serde(default)]
        via_keyboard: bool,
    },
    RemoveElement {
        id: SubContentId,
    },
    BringToFront {
        id: SubContentId,
    },
    SendToBack {
        id: SubContentId,
    },
    ChangeElementZPosition {
        source: i64,
        target: i64,
        #[serde(default)]
        active: bool,
    },
    UpdatePosition {
        id: SubContentId,
        x: f64,
        y: f64,
    },
    UpdateSize {
        id: SubContentId,
        width: f64,
        height: f64,
    },
    ToggleVisibility {
        id: SubContentId,
        #[serde(default)]
        state: Option<bool>,
    },
    MediaLoaded {
        id: SubContentId,
        media: MediaInfo,
    },
    Paste {
        payload: ClipboardPayload,
    },

    // ── Animations ──
    CreateAnimation {
        target: SubContentId,
    },
    RemoveAnimation {
        id: AnimationId,
    },
    ChangeAnimationOrder {
        source: i64,
        target: i64,
        #[serde(default)]
        active: bool,
    },

    // ── Confirmation and dialog ──
    Confirm {
        token: u32,
    },
    Cancel {
        token: u32,
    },
    EditElement {
        id: SubContentId,
    },
    EditAnimation {
        #[serde(default)]
        id: Option<AnimationId>,
    },
    DialogDone,
    DialogRemove,

    // ── Focus and input ──
    Focus {
        #[serde(default)]
        id: Option<SubContentId>,
    },
    BlurAll,
    #[serde(rename_all = "camelCase")]
    HighlightElement {
        id: SubContentId,
        state: bool,
        #[serde(default)]
        animation: Option<AnimationId>,
    },
    #[serde(rename_all = "camelCase")]
    DocumentMouseDown {
        inside_sidebar: bool,
    },
    ElementList {
        input: ListInput<SubContentId>,
    },
    AnimationList {
        input: ListInput<AnimationId>,
    },
    Gesture {
        event: GestureEvent,
    },
    #[serde(rename_all = "camelCase")]
    Key {
        key: String,
        #[serde(default)]
        target_tag: Option<String>,
    },

    // ── View ──
    Toolbar {
        action: ToolbarAction,
    },
    SetZoomFactor {
        factor: f64,
    },
    #[serde(rename_all = "camelCase")]
    Wheel {
        delta_y: f64,
        mouse_x: f64,
        mouse_y: f64,
    },
    Scroll {
        left: f64,
        top: f64,
    },
    ToggleListView {
        #[serde(default)]
        state: Option<bool>,
    },
    Resize {
        width: f64,
        height: f64,
    },
    AnimationFrame,
    RunDeferred,
    SetBackground {
        background: Background,
    },
    #[serde(rename_all = "camelCase")]
    SetAspectRatio {
        aspect_ratio: RawAspectRatio,
    },
    Preview,
}

impl Board {
    /// Dispatch one command. Returns whether anything happened.
    pub fn apply(&mut self, command: BoardCommand) -> bool {
        log::trace!("apply {command:?}");
        match command {
            BoardCommand::CreateElement { element } => {
                self.create_element(*element);
                true
            }
            BoardCommand::CreateFromToolbar {
                button,
                via_keyboard,
            } => self.create_from_toolbar(&button, via_keyboard).is_some(),
            BoardCommand::RemoveElement { id } => self.request_remove_element(id).is_some(),
            BoardCommand::BringToFront { id } => self.bring_to_front(id),
            BoardCommand::SendToBack { id } => self.send_to_back(id),
            BoardCommand::ChangeElementZPosition {
                source,
                target,
                active,
            } => self.change_element_z_position(source, target, active),
            BoardCommand::UpdatePosition { id, x, y } => self.update_element_position(id, x, y),
            BoardCommand::UpdateSize { id, width, height } => {
                self.update_element(id, ItemUpdate::size(width, height))
            }
            BoardCommand::ToggleVisibility { id, state } => self.toggle_element_visibility(id, state),
            BoardCommand::MediaLoaded { id, media } => self.set_media_size(id, media),
            BoardCommand::Paste { payload } => self.paste(payload).is_some(),

            BoardCommand::CreateAnimation { target } => self.create_animation(target).is_some(),
            BoardCommand::RemoveAnimation { id } => self.request_remove_animation(id).is_some(),
            BoardCommand::ChangeAnimationOrder {
                source,
                target,
                active,
            } => self.change_animation_order(source, target, active),

            BoardCommand::Confirm { token } => self.confirm(token),
            BoardCommand::Cancel { token } => self.cancel(token),
            BoardCommand::EditElement { id } => self.edit_element(id),
            BoardCommand::EditAnimation { id } => self.edit_animation(id).is_some(),
            BoardCommand::DialogDone => self.dialog_done(),
            BoardCommand::DialogRemove => self.dialog_remove().is_some(),

            BoardCommand::Focus { id } => {
                self.set_focus(id);
                true
            }
            BoardCommand::BlurAll => {
                self.blur_all();
                true
            }
            BoardCommand::HighlightElement {
                id,
                state,
                animation,
            } => self.toggle_highlight_element(id, state, animation),
            BoardCommand::DocumentMouseDown { inside_sidebar } => {
                self.handle_document_mouse_down(inside_sidebar);
                true
            }
            BoardCommand::ElementList { input } => self.element_list_input(input),
            BoardCommand::AnimationList { input } => self.animation_list_input(input),
            BoardCommand::Gesture { event } => {
                self.handle_gesture(&event);
                true
            }
            BoardCommand::Key { key, target_tag } => self.handle_key(&key, target_tag.as_deref()),

            BoardCommand::Toolbar { action } => self.toolbar_action(action),
            BoardCommand::SetZoomFactor { factor } => self.set_zoom_factor(factor),
            BoardCommand::Wheel {
                delta_y,
                mouse_x,
                mouse_y,
            } => self.wheel_zoom(delta_y, mouse_x, mouse_y),
            BoardCommand::Scroll { left, top } => {
                self.set_scroll(left, top);
                true
            }
            BoardCommand::ToggleListView { state } => {
                self.toggle_list_view(state);
                true
            }
            BoardCommand::Resize { width, height } => {
                self.resize(width, height);
                true
            }
            BoardCommand::AnimationFrame => self.on_animation_frame(),
            BoardCommand::RunDeferred => self.run_deferred() > 0,
            BoardCommand::SetBackground { background } => {
                self.set_background(background);
                true
            }
            BoardCommand::SetAspectRatio { aspect_ratio } => {
                self.set_aspect_ratio(aspect_ratio);
                true
            }
            BoardCommand::Preview => {
                self.preview();
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sidebar::MenuAction;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> BoardCommand {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_camel_case_commands() {
        assert_eq!(
            parse(json!({ "type": "changeElementZPosition", "source": 0, "target": 1 })),
            BoardCommand::ChangeElementZPosition {
                source: 0,
                target: 1,
                active: false,
            }
        );
        assert_eq!(
            parse(json!({ "type": "createFromToolbar", "button": "image", "viaKeyboard": true })),
            BoardCommand::CreateFromToolbar {
                button: "image".into(),
                via_keyboard: true,
            }
        );
        assert_eq!(
            parse(json!({ "type": "toolbar", "action": "zoom-in" })),
            BoardCommand::Toolbar {
                action: ToolbarAction::ZoomIn,
            }
        );
        assert_eq!(parse(json!({ "type": "dialogDone" })), BoardCommand::DialogDone);
    }

    #[test]
    fn parses_nested_inputs() {
        assert_eq!(
            parse(json!({
                "type": "elementList",
                "input": { "input": "menu", "id": ["el-1", "move-up"] }
            })),
            BoardCommand::ElementList {
                input: ListInput::Menu(SubContentId::intern("el-1"), MenuAction::MoveUp),
            }
        );
        assert_eq!(
            parse(json!({
                "type": "mediaLoaded",
                "id": "el-1",
                "media": { "kind": "video" }
            })),
            BoardCommand::MediaLoaded {
                id: SubContentId::intern("el-1"),
                media: MediaInfo::Video { aspect_ratio: None },
            }
        );
        assert_eq!(
            parse(json!({ "type": "setAspectRatio", "aspectRatio": "4/3" })),
            BoardCommand::SetAspectRatio {
                aspect_ratio: RawAspectRatio::Text("4/3".into()),
            }
        );
    }
}
