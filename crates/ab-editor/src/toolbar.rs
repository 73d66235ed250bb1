//! Toolbar state: content buttons that create elements and the action
//! buttons (list view, zoom, preview).

use crate::config::ContentOption;
use crate::dictionary::Dictionary;
use ab_core::model::{ContentType, ElementParams};
use ab_core::viewport::{ZOOM_LEVEL_MAX, ZOOM_LEVEL_MIN};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Content types that lead the toolbar, in this order.
const PREFERRED_ORDER: [&str; 4] = ["H5P.AdvancedText", "H5P.Image", "H5P.Video", "H5P.Shape"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentButton {
    /// Lowercased library title.
    pub id: String,
    pub label: String,
    pub uber_name: String,
}

impl ContentButton {
    /// Params of a new element created from this button.
    pub fn element_params(&self) -> ElementParams {
        ElementParams::new(ContentType::new(self.uber_name.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolbarAction {
    ListView,
    ZoomIn,
    ZoomOut,
    Preview,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionButton {
    pub action: ToolbarAction,
    pub tooltip: String,
    /// Toggle buttons stay pressed; the others pulse.
    pub toggle: bool,
    pub active: bool,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_shortcut: Option<&'static str>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toolbar {
    content_buttons: Vec<ContentButton>,
    action_buttons: Vec<ActionButton>,
}

impl Toolbar {
    pub fn new(options: &[ContentOption], dictionary: &Dictionary) -> Self {
        let mut visible: Vec<&ContentOption> = options.iter().filter(|o| !o.restricted).collect();
        visible.sort_by(|a, b| compare_options(a, b));

        let content_buttons = visible
            .into_iter()
            .map(|option| {
                let id = option.title.to_lowercase();
                ContentButton {
                    label: dictionary.get(&format!("l10n.toolbarButton-{id}")),
                    id,
                    uber_name: option.uber_name.clone(),
                }
            })
            .collect();

        let button = |action, key: &str, toggle, key_shortcut| ActionButton {
            action,
            tooltip: dictionary.get(key),
            toggle,
            active: false,
            enabled: true,
            key_shortcut,
        };
        let mut toolbar = Self {
            content_buttons,
            action_buttons: vec![
                button(ToolbarAction::ListView, "l10n.toolbarButtonListView", true, None),
                button(
                    ToolbarAction::ZoomIn,
                    "l10n.toolbarButtonZoomIn",
                    false,
                    Some(crate::shortcuts::KEY_ZOOM_IN),
                ),
                button(
                    ToolbarAction::ZoomOut,
                    "l10n.toolbarButtonZoomOut",
                    false,
                    Some(crate::shortcuts::KEY_ZOOM_OUT),
                ),
                button(ToolbarAction::Preview, "l10n.toolbarButtonPreview", false, None),
            ],
        };
        toolbar.set_zoom_level(ZOOM_LEVEL_MIN);
        toolbar
    }

    pub fn content_buttons(&self) -> &[ContentButton] {
        &self.content_buttons
    }

    pub fn content_button(&self, id: &str) -> Option<&ContentButton> {
        self.content_buttons.iter().find(|b| b.id == id)
    }

    pub fn action_buttons(&self) -> &[ActionButton] {
        &self.action_buttons
    }

    pub fn action_button(&self, action: ToolbarAction) -> Option<&ActionButton> {
        self.action_buttons.iter().find(|b| b.action == action)
    }

    fn action_button_mut(&mut self, action: ToolbarAction) -> Option<&mut ActionButton> {
        self.action_buttons.iter_mut().find(|b| b.action == action)
    }

    /// Disable zoom-out at the lowest level and zoom-in at the highest.
    pub fn set_zoom_level(&mut self, index: usize) {
        if let Some(b) = self.action_button_mut(ToolbarAction::ZoomIn) {
            b.enabled = index < ZOOM_LEVEL_MAX;
        }
        if let Some(b) = self.action_button_mut(ToolbarAction::ZoomOut) {
            b.enabled = index > ZOOM_LEVEL_MIN;
        }
    }

    pub fn set_list_view_active(&mut self, active: bool) {
        if let Some(b) = self.action_button_mut(ToolbarAction::ListView) {
            b.active = active;
        }
    }

    pub fn is_enabled(&self, action: ToolbarAction) -> bool {
        self.action_button(action).is_some_and(|b| b.enabled)
    }
}

fn compare_options(a: &ContentOption, b: &ContentOption) -> Ordering {
    let rank = |o: &ContentOption| {
        PREFERRED_ORDER
            .iter()
            .position(|name| *name == o.machine_name)
            .unwrap_or(PREFERRED_ORDER.len())
    };
    rank(a).cmp(&rank(b)).then_with(|| a.title.cmp(&b.title))
}
