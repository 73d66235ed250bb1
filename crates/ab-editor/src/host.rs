//! Contracts with the host authoring framework.
//!
//! The board never renders forms, shows dialogs or talks to the clipboard
//! itself. It calls these traits and reports everything else through
//! `BoardEvent`s.

use crate::dictionary::Dictionary;
use ab_core::model::ElementParams;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Value of the library selector when nothing is selected.
pub const NO_LIBRARY_SELECTED: &str = "-";

// ─── Sub-forms ───────────────────────────────────────────────────────────

/// One validatable widget of a rendered sub-form.
pub trait FormChild {
    /// `None` means the widget does not report validity and counts as valid.
    fn validate(&mut self) -> Option<bool>;

    /// Current select value when this child is the library selector.
    fn library_selection(&self) -> Option<String> {
        None
    }
}

/// An embedded form rendered by the host for one element or animation.
pub trait SubForm {
    fn child_count(&self) -> usize;

    fn child_mut(&mut self, index: usize) -> Option<&mut dyn FormChild>;

    /// The params as currently edited in the form.
    fn values(&self) -> Option<Value>;

    /// Put a message into the library selector's error slot.
    fn show_library_error(&mut self, message: &str);

    /// Erase the library selector's error slot.
    fn clear_library_error(&mut self) {}
}

/// Everything the board needs from its host.
pub trait Host {
    /// Render `schema` bound to `params` into an embedded form.
    fn render_form(&mut self, schema: &Value, params: &Value) -> Box<dyn SubForm>;

    /// Whether a clipboard payload may be pasted onto this board.
    fn can_paste(&self, _payload: &ClipboardPayload) -> bool {
        true
    }

    /// Resolve a content path (background image) into a URL.
    fn resolve_path(&self, path: &str) -> String {
        path.to_string()
    }
}

/// Validate every child of a form; all are visited so each shows its message.
///
/// A library selector that fails validation still passes when some library
/// is selected. With nothing selected the `l10n.contentRequired` message is
/// injected into the selector's error slot; once a library is selected the
/// slot is erased.
pub fn validate_form(form: &mut dyn SubForm, dictionary: &Dictionary) -> bool {
    let mut valid = true;
    let mut has_library = false;
    let mut library_missing = false;

    for index in 0..form.child_count() {
        let Some(child) = form.child_mut(index) else {
            continue;
        };
        let child_valid = match child.library_selection() {
            Some(selection) => {
                has_library = true;
                if child.validate().unwrap_or(true) || selection != NO_LIBRARY_SELECTED {
                    true
                } else {
                    library_missing = true;
                    false
                }
            }
            None => child.validate().unwrap_or(true),
        };
        valid &= child_valid;
    }

    if library_missing {
        form.show_library_error(&dictionary.get("l10n.contentRequired"));
    } else if has_library {
        form.clear_library_error();
    }
    valid
}

// ─── Clipboard ───────────────────────────────────────────────────────────

/// Data offered by the host's clipboard transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "from", rename_all = "camelCase")]
pub enum ClipboardPayload {
    /// Copied from an animator board: full element params.
    #[serde(rename_all = "camelCase")]
    SameOrigin { element: ElementParams },
    /// Generic content from elsewhere: content type and dimensions only.
    #[serde(rename_all = "camelCase")]
    Foreign {
        library: String,
        #[serde(default)]
        params: Value,
        #[serde(default)]
        width: Option<f64>,
        #[serde(default)]
        height: Option<f64>,
    },
}

impl ClipboardPayload {
    pub fn library(&self) -> &str {
        match self {
            ClipboardPayload::SameOrigin { element } => &element.content_type.library,
            ClipboardPayload::Foreign { library, .. } => library,
        }
    }
}

// ─── Confirmation ────────────────────────────────────────────────────────

/// Texts of a confirmation dialog the host should show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationRequest {
    /// Pass back to `Board::confirm` or `Board::cancel`.
    pub token: u32,
    pub header_text: String,
    pub dialog_text: String,
    pub confirm_text: String,
    pub cancel_text: String,
}

impl ConfirmationRequest {
    /// Build the texts from `l10n.confirmationDialog<Kind>{Header,Dialog,Confirm,Cancel}`.
    pub fn from_dictionary(token: u32, kind: &str, dictionary: &Dictionary) -> Self {
        let text = |part: &str| dictionary.get(&format!("l10n.confirmationDialog{kind}{part}"));
        Self {
            token,
            header_text: text("Header"),
            dialog_text: text("Dialog"),
            confirm_text: text("Confirm"),
            cancel_text: text("Cancel"),
        }
    }
}
