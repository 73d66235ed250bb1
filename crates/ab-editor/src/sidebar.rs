//! Sidebar lists mirroring z-order and animation order.
//!
//! A `DraggablesList` tracks its rows in the same order as the sequence it
//! mirrors (index 0 = back-most element or first animation). The element
//! list is *displayed* reversed so the front-most element sits on top.
//!
//! List interactions never mutate board state directly: they return a
//! `ListIntent` the board dispatches, so reorders always go through the
//! board's single permutation path.

use crate::order::Reorder;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListConfig {
    pub title: String,
    /// Display the rows last-first.
    pub reversed: bool,
    pub can_toggle_visibility: bool,
    /// Label of the "add" button; `None` for lists without one.
    pub add_button_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRow<K> {
    pub id: K,
    pub title: String,
    pub details: String,
    pub highlighted: bool,
    pub visible: bool,
    /// Insertion marker shown during a live drag.
    pub drag_placeholder: bool,
}

/// Which row menu options are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub edit: bool,
    pub move_up: bool,
    pub move_down: bool,
    pub remove: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MenuAction {
    Edit,
    MoveUp,
    MoveDown,
    Remove,
}

/// What the board should do in response to a list interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListIntent<K> {
    Edit(K),
    /// Reorder; `active` marks a live drag swap.
    Move { source: i64, target: i64, active: bool },
    Remove(K),
    Highlight(K, bool),
    ToggleVisibility(K),
    Add,
}

/// Raw interactions with a list, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(tag = "input", content = "id", rename_all = "camelCase")]
pub enum ListInput<K> {
    MouseDown(K),
    Menu(K, MenuAction),
    ToggleVisibility(K),
    DragStart(K),
    DragEnter(K),
    DragLeave,
    DragEnd,
    AddButton,
}

#[derive(Debug, Clone)]
pub struct DraggablesList<K> {
    config: ListConfig,
    rows: Vec<ListRow<K>>,
    dragged: Option<K>,
    dropzone: Option<K>,
    add_button_enabled: bool,
}

impl<K: Copy + PartialEq + std::fmt::Debug> DraggablesList<K> {
    pub fn new(config: ListConfig) -> Self {
        Self {
            config,
            rows: Vec::new(),
            dragged: None,
            dropzone: None,
            add_button_enabled: false,
        }
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in tracking order.
    pub fn rows(&self) -> &[ListRow<K>] {
        &self.rows
    }

    /// Row ids in tracking order.
    pub fn ids(&self) -> Vec<K> {
        self.rows.iter().map(|r| r.id).collect()
    }

    /// Rows in display order.
    pub fn display_rows(&self) -> Vec<&ListRow<K>> {
        if self.config.reversed {
            self.rows.iter().rev().collect()
        } else {
            self.rows.iter().collect()
        }
    }

    pub fn index_of(&self, id: K) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }

    pub fn row(&self, id: K) -> Option<&ListRow<K>> {
        self.rows.iter().find(|r| r.id == id)
    }

    fn row_mut(&mut self, id: K) -> Option<&mut ListRow<K>> {
        self.rows.iter_mut().find(|r| r.id == id)
    }

    // ─── Rows ────────────────────────────────────────────────────────────

    pub fn add(&mut self, id: K, title: impl Into<String>, details: impl Into<String>) {
        self.rows.push(ListRow {
            id,
            title: title.into(),
            details: details.into(),
            highlighted: false,
            visible: true,
            drag_placeholder: false,
        });
    }

    pub fn remove(&mut self, id: K) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.rows.remove(index);
        if self.dragged == Some(id) {
            self.dragged = None;
        }
        if self.dropzone == Some(id) {
            self.dropzone = None;
        }
        true
    }

    pub fn update(&mut self, id: K, title: Option<String>, details: Option<String>) -> bool {
        let Some(row) = self.row_mut(id) else {
            return false;
        };
        if let Some(title) = title {
            row.title = title;
        }
        if let Some(details) = details {
            row.details = details;
        }
        true
    }

    /// Reorder rows. A live swap marks the moved row with the drag placeholder.
    pub fn apply(&mut self, reorder: Reorder, show_placeholder: bool) {
        reorder.apply(&mut self.rows);
        if let (Reorder::Swap { b, .. }, true) = (reorder, show_placeholder) {
            for (i, row) in self.rows.iter_mut().enumerate() {
                row.drag_placeholder = i == b;
            }
        }
    }

    /// Highlight one row exclusively, or clear it. `None` with `false`
    /// clears every row.
    pub fn toggle_highlight(&mut self, id: Option<K>, state: bool) {
        for row in &mut self.rows {
            match id {
                Some(id) if row.id == id => row.highlighted = state,
                Some(_) if state => row.highlighted = false,
                None if !state => row.highlighted = false,
                _ => {}
            }
        }
    }

    /// Highlight exactly the rows in `ids`.
    pub fn set_highlights(&mut self, ids: &[K]) {
        for row in &mut self.rows {
            row.highlighted = ids.contains(&row.id);
        }
    }

    pub fn set_visibility(&mut self, id: K, visible: bool) -> bool {
        let Some(row) = self.row_mut(id) else {
            return false;
        };
        row.visible = visible;
        true
    }

    // ─── Add button ──────────────────────────────────────────────────────

    pub fn has_add_button(&self) -> bool {
        self.config.add_button_label.is_some()
    }

    pub fn add_button_enabled(&self) -> bool {
        self.add_button_enabled
    }

    /// Returns `true` when the state changed.
    pub fn set_add_button_enabled(&mut self, enabled: bool) -> bool {
        if !self.has_add_button() || self.add_button_enabled == enabled {
            return false;
        }
        self.add_button_enabled = enabled;
        true
    }

    // ─── Menu ────────────────────────────────────────────────────────────

    /// Move-up is disabled for the last row, move-down for the first.
    pub fn capabilities(&self, id: K) -> Option<Capabilities> {
        let index = self.index_of(id)?;
        Some(Capabilities {
            edit: true,
            move_up: index + 1 < self.rows.len(),
            move_down: index > 0,
            remove: true,
        })
    }

    pub fn menu(&self, id: K, action: MenuAction) -> Option<ListIntent<K>> {
        let index = self.index_of(id)? as i64;
        let capabilities = self.capabilities(id)?;
        match action {
            MenuAction::Edit => Some(ListIntent::Edit(id)),
            MenuAction::MoveUp if capabilities.move_up => Some(ListIntent::Move {
                source: index,
                target: index + 1,
                active: false,
            }),
            MenuAction::MoveDown if capabilities.move_down => Some(ListIntent::Move {
                source: index,
                target: index - 1,
                active: false,
            }),
            MenuAction::Remove => Some(ListIntent::Remove(id)),
            MenuAction::MoveUp | MenuAction::MoveDown => None,
        }
    }

    pub fn mouse_down(&self, id: K) -> Option<ListIntent<K>> {
        self.index_of(id).map(|_| ListIntent::Highlight(id, true))
    }

    pub fn visibility_toggle(&self, id: K) -> Option<ListIntent<K>> {
        (self.config.can_toggle_visibility && self.index_of(id).is_some())
            .then_some(ListIntent::ToggleVisibility(id))
    }

    /// Update drag bookkeeping and translate `input` into an intent.
    pub fn handle(&mut self, input: ListInput<K>) -> Option<ListIntent<K>> {
        match input {
            ListInput::MouseDown(id) => self.mouse_down(id),
            ListInput::Menu(id, action) => self.menu(id, action),
            ListInput::ToggleVisibility(id) => self.visibility_toggle(id),
            ListInput::DragStart(id) => {
                self.drag_start(id);
                None
            }
            ListInput::DragEnter(id) => self.drag_enter(id),
            ListInput::DragLeave => {
                self.drag_leave();
                None
            }
            ListInput::DragEnd => {
                self.drag_end();
                None
            }
            ListInput::AddButton => self.add_button_enabled.then_some(ListIntent::Add),
        }
    }

    // ─── Drag and drop ───────────────────────────────────────────────────

    pub fn drag_start(&mut self, id: K) {
        if self.index_of(id).is_some() {
            self.dragged = Some(id);
            self.dropzone = None;
        }
    }

    /// Entering a row other than the last drop zone previews the reorder
    /// immediately.
    pub fn drag_enter(&mut self, id: K) -> Option<ListIntent<K>> {
        if self.dropzone == Some(id) {
            return None;
        }
        self.dropzone = Some(id);

        let dragged = self.dragged?;
        if dragged == id {
            return None;
        }
        let source = self.index_of(dragged)?;
        let target = self.index_of(id)?;
        log::trace!("drag {dragged:?} over {id:?}: {source} -> {target}");
        Some(ListIntent::Move {
            source: source as i64,
            target: target as i64,
            active: true,
        })
    }

    pub fn drag_leave(&mut self) {
        self.dropzone = None;
    }

    pub fn drag_end(&mut self) {
        self.dragged = None;
        self.dropzone = None;
        for row in &mut self.rows {
            row.drag_placeholder = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn list(n: u32) -> DraggablesList<u32> {
        let mut l = DraggablesList::new(ListConfig {
            title: "Elements".into(),
            reversed: true,
            can_toggle_visibility: true,
            add_button_label: None,
        });
        for i in 0..n {
            l.add(i, format!("row {i}"), "");
        }
        l
    }

    #[test]
    fn display_is_reversed() {
        let l = list(3);
        let shown: Vec<u32> = l.display_rows().iter().map(|r| r.id).collect();
        assert_eq!(shown, vec![2, 1, 0]);
        assert_eq!(l.ids(), vec![0, 1, 2]);
    }

    #[test]
    fn capabilities_at_boundaries() {
        let l = list(3);
        let first = l.capabilities(0).unwrap();
        assert!(first.move_up && !first.move_down);
        let last = l.capabilities(2).unwrap();
        assert!(!last.move_up && last.move_down);
        assert_eq!(l.menu(2, MenuAction::MoveUp), None);
        assert_eq!(
            l.menu(1, MenuAction::MoveUp),
            Some(ListIntent::Move {
                source: 1,
                target: 2,
                active: false
            })
        );
        assert_eq!(
            l.menu(1, MenuAction::MoveDown),
            Some(ListIntent::Move {
                source: 1,
                target: 0,
                active: false
            })
        );
    }

    #[test]
    fn drag_enter_fires_once_per_drop_zone() {
        let mut l = list(3);
        l.drag_start(0);
        assert_eq!(
            l.drag_enter(2),
            Some(ListIntent::Move {
                source: 0,
                target: 2,
                active: true
            })
        );
        assert_eq!(l.drag_enter(2), None);
        l.drag_leave();
        assert!(l.drag_enter(2).is_some());
        // Entering the dragged row itself never reorders.
        assert_eq!(l.drag_enter(0), None);
        l.drag_end();
        assert_eq!(l.drag_enter(1), None);
    }

    #[test]
    fn live_swap_marks_placeholder() {
        let mut l = list(3);
        l.apply(Reorder::Swap { a: 0, b: 2 }, true);
        assert_eq!(l.ids(), vec![2, 1, 0]);
        assert!(l.rows()[2].drag_placeholder);
        l.drag_end();
        assert!(l.rows().iter().all(|r| !r.drag_placeholder));

        l.apply(Reorder::Swap { a: 0, b: 1 }, false);
        assert!(l.rows().iter().all(|r| !r.drag_placeholder));
    }

    #[test]
    fn highlight_is_exclusive_and_clearable() {
        let mut l = list(3);
        l.toggle_highlight(Some(1), true);
        l.toggle_highlight(Some(2), true);
        let lit: Vec<u32> = l.rows().iter().filter(|r| r.highlighted).map(|r| r.id).collect();
        assert_eq!(lit, vec![2]);
        l.toggle_highlight(None, false);
        assert!(l.rows().iter().all(|r| !r.highlighted));
    }

    #[test]
    fn add_button_only_when_configured() {
        let mut l = list(1);
        assert!(!l.set_add_button_enabled(true));

        let mut anims: DraggablesList<u32> = DraggablesList::new(ListConfig {
            add_button_label: Some("Add animation".into()),
            ..Default::default()
        });
        assert!(anims.set_add_button_enabled(true));
        assert!(!anims.set_add_button_enabled(true));
        assert!(anims.add_button_enabled());
    }
}
