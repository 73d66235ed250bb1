//! Shared fixtures for the board integration tests.
#![allow(dead_code)]

use ab_core::model::BoardParams;
use ab_editor::board::Board;
use ab_editor::config::{BoardConfig, ContentOption};
use ab_editor::dictionary::Dictionary;
use ab_editor::events::BoardEvent;
use ab_editor::host::{ClipboardPayload, FormChild, Host, SubForm};
use serde_json::{Value, json};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// What a rendered stub form holds; tests reach in to set validity and values.
#[derive(Debug, Default)]
pub struct FormState {
    pub schema: Value,
    pub params: Value,
    pub valid: Option<bool>,
    pub values: Option<Value>,
    /// Library selector value; `None` renders no selector.
    pub library: Option<String>,
    pub library_error: Option<String>,
}

pub type SharedForm = Rc<RefCell<FormState>>;

/// A host that records every rendered form in render order.
#[derive(Clone, Default)]
pub struct StubHost {
    pub forms: Rc<RefCell<Vec<SharedForm>>>,
    pub refuse_paste: Rc<Cell<bool>>,
}

impl StubHost {
    pub fn form(&self, index: usize) -> SharedForm {
        Rc::clone(&self.forms.borrow()[index])
    }

    pub fn last_form(&self) -> SharedForm {
        let forms = self.forms.borrow();
        Rc::clone(forms.last().expect("no form rendered"))
    }

    pub fn form_count(&self) -> usize {
        self.forms.borrow().len()
    }
}

impl Host for StubHost {
    fn render_form(&mut self, schema: &Value, params: &Value) -> Box<dyn SubForm> {
        let state = Rc::new(RefCell::new(FormState {
            schema: schema.clone(),
            params: params.clone(),
            ..Default::default()
        }));
        self.forms.borrow_mut().push(Rc::clone(&state));
        Box::new(StubForm {
            child: StubChild { state },
        })
    }

    fn can_paste(&self, _payload: &ClipboardPayload) -> bool {
        !self.refuse_paste.get()
    }

    fn resolve_path(&self, path: &str) -> String {
        format!("https://cdn.test/{path}")
    }
}

struct StubChild {
    state: SharedForm,
}

impl FormChild for StubChild {
    fn validate(&mut self) -> Option<bool> {
        self.state.borrow().valid
    }

    fn library_selection(&self) -> Option<String> {
        self.state.borrow().library.clone()
    }
}

struct StubForm {
    child: StubChild,
}

impl SubForm for StubForm {
    fn child_count(&self) -> usize {
        1
    }

    fn child_mut(&mut self, index: usize) -> Option<&mut dyn FormChild> {
        (index == 0).then_some(&mut self.child as &mut dyn FormChild)
    }

    fn values(&self) -> Option<Value> {
        self.child.state.borrow().values.clone()
    }

    fn show_library_error(&mut self, message: &str) {
        self.child.state.borrow_mut().library_error = Some(message.to_string());
    }

    fn clear_library_error(&mut self) {
        self.child.state.borrow_mut().library_error = None;
    }
}

// ─── Board fixtures ──────────────────────────────────────────────────────

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn dictionary() -> Dictionary {
    let mut dictionary = Dictionary::new();
    for (key, text) in [
        ("l10n.elements", "Elements"),
        ("l10n.animations", "Animations"),
        ("a11y.addAnimation", "Add animation"),
        ("l10n.editElement", "Edit element"),
        ("l10n.editAnimation", "Edit animation"),
        ("l10n.contentRequired", "Select a content type"),
        ("l10n.confirmationDialogRemoveElementHeader", "Remove element?"),
        ("l10n.confirmationDialogRemoveElementDialog", "The element and its animations will be lost."),
        ("l10n.confirmationDialogRemoveElementConfirm", "Remove"),
        ("l10n.confirmationDialogRemoveElementCancel", "Keep"),
        ("l10n.confirmationDialogRemoveAnimationHeader", "Remove animation?"),
        ("l10n.animation.fadeIn", "Fade in"),
        ("l10n.animation.afterPrevious", "After previous"),
    ] {
        dictionary.insert(key, text);
    }
    dictionary
}

pub fn config() -> BoardConfig {
    let option = |machine: &str, title: &str| ContentOption {
        machine_name: machine.into(),
        uber_name: format!("{machine} 1.1"),
        title: title.into(),
        restricted: false,
    };
    BoardConfig {
        element_fields: json!({ "name": "element", "type": "group" }),
        animation_fields: json!({ "name": "animation", "type": "group" }),
        content_options: vec![
            option("H5P.AdvancedText", "Text"),
            option("H5P.Image", "Image"),
            option("H5P.Shape", "Shapes"),
        ],
        dictionary: dictionary(),
    }
}

pub fn fixture_params() -> BoardParams {
    BoardParams::from_json(include_str!("../fixtures/board.json")).unwrap()
}

pub fn board_with(params: BoardParams) -> (Board, StubHost) {
    init_logging();
    let host = StubHost::default();
    let board = Board::new(config(), params, Box::new(host.clone()));
    (board, host)
}

/// The fixture board: `txt-1`, `img-1`, `txt-2` (hidden) and three
/// animations targeting `txt-1`, `img-1`, `txt-1`.
pub fn fixture_board() -> (Board, StubHost) {
    board_with(fixture_params())
}

pub fn changed_count(events: &[BoardEvent]) -> usize {
    events.iter().filter(|e| e.is_changed()).count()
}

/// Every ordering the board keeps must agree on ids, and stored indices
/// must match positions.
pub fn assert_coherent(board: &Board) {
    let ids = board.element_ids();
    let param_ids: Vec<_> = board
        .params()
        .elements
        .iter()
        .map(|e| e.sub_content_id().expect("element without id"))
        .collect();
    assert_eq!(param_ids, ids, "params vs item models");
    assert_eq!(board.element_area().ids(), ids, "params vs canvas");
    assert_eq!(board.element_list().ids(), ids, "params vs element list");
    for (index, item) in board.items().iter().enumerate() {
        assert_eq!(item.index(), index, "stale index on {:?}", item.id());
    }

    let animation_ids = board.animation_ids();
    assert_eq!(board.params().animations.len(), animation_ids.len());
    assert_eq!(board.animation_list().ids(), animation_ids, "animation models vs list");

    for element in &board.params().elements {
        assert!(element.geometry().is_within_bounds(), "{element:?} out of bounds");
    }
}
