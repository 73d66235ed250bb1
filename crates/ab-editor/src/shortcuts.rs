//! Keyboard shortcut mapping.
//!
//! Maps `KeyboardEvent.key` values to semantic `ShortcutAction`s. The map
//! lives in Rust so the wasm bridge and native tests share it.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    ZoomIn,
    ZoomOut,
    /// Escape inside an open edit dialog: behaves like its remove button.
    DismissDialog,
}

/// Key bound to zooming in.
pub const KEY_ZOOM_IN: &str = "+";
/// Key bound to zooming out.
pub const KEY_ZOOM_OUT: &str = "-";

/// Where a key event happened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyContext<'a> {
    /// `tagName` of the event target, e.g. `"INPUT"`.
    pub target_tag: Option<&'a str>,
    pub dialog_open: bool,
}

impl KeyContext<'_> {
    fn in_text_field(&self) -> bool {
        matches!(self.target_tag, Some(tag) if tag.eq_ignore_ascii_case("input") || tag.eq_ignore_ascii_case("textarea"))
    }
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// Zoom keys are ignored while typing into a text field and while a
    /// dialog is open. Returns `None` if the key has no binding.
    pub fn resolve(key: &str, ctx: KeyContext<'_>) -> Option<ShortcutAction> {
        if ctx.dialog_open {
            return (key == "Escape").then_some(ShortcutAction::DismissDialog);
        }
        if ctx.in_text_field() {
            return None;
        }
        match key {
            KEY_ZOOM_IN => Some(ShortcutAction::ZoomIn),
            KEY_ZOOM_OUT => Some(ShortcutAction::ZoomOut),
            _ => None,
        }
    }
}
