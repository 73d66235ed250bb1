//! WASM bridge for AB: exposes the animator board engine to JavaScript.
//!
//! Compiled via `wasm-pack build --target web` and loaded by the H5P editor
//! widget. Structured data crosses the boundary as JSON strings.

mod js_host;
mod logger;

use ab_core::id::{AnimationId, SubContentId};
use ab_core::lint::{LintDiagnostic, LintSeverity, LintTarget};
use ab_core::model::BoardParams;
use ab_editor::board::Board;
use ab_editor::commands::BoardCommand;
use ab_editor::config::BoardConfig;
use ab_editor::events::BoardEvent;
use js_host::JsHost;
use serde_json::json;
use wasm_bindgen::prelude::*;

/// The board controller as seen from the widget's JavaScript.
///
/// Every mutation goes through `apply` with a JSON command; the widget
/// then drains the queued events and re-renders what they name.
#[wasm_bindgen]
pub struct AnimatorBoard {
    board: Board,
}

#[wasm_bindgen]
impl AnimatorBoard {
    /// Build the board from the field config and persisted params.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, params_json: &str, host: JsValue) -> Result<AnimatorBoard, JsValue> {
        console_error_panic_hook_setup();

        let config: BoardConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Config parse error: {e}")))?;
        let params = parse_params(params_json).map_err(|e| JsValue::from_str(&e))?;
        Ok(Self {
            board: Board::new(config, params, Box::new(JsHost::new(host))),
        })
    }

    /// Apply one JSON command. Returns whether anything happened.
    pub fn apply(&mut self, command_json: &str) -> Result<bool, JsValue> {
        let command = parse_command(command_json).map_err(|e| JsValue::from_str(&e))?;
        Ok(self.board.apply(command))
    }

    /// Queued events as a JSON array.
    pub fn drain_events(&mut self) -> String {
        events_to_json(&self.board.drain_events())
    }

    /// Params to store, with orphaned animations removed.
    pub fn get_params(&self) -> Result<String, JsValue> {
        self.board
            .persisted_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn get_toolbar(&self) -> String {
        to_json(self.board.toolbar())
    }

    /// Element rows in display order (front-most first).
    pub fn get_element_rows(&self) -> String {
        to_json(&self.board.element_list().display_rows())
    }

    pub fn get_animation_rows(&self) -> String {
        to_json(&self.board.animation_list().display_rows())
    }

    pub fn get_canvas_nodes(&self) -> String {
        to_json(self.board.element_area().nodes())
    }

    /// Enabled menu entries of an element row, or `null`.
    pub fn get_element_capabilities(&self, id: &str) -> String {
        to_json(&self.board.element_list().capabilities(SubContentId::intern(id)))
    }

    /// Enabled menu entries of an animation row, or `null`.
    pub fn get_animation_capabilities(&self, id: &str) -> String {
        to_json(&self.board.animation_list().capabilities(AnimationId::intern(id)))
    }

    /// Clipboard payload for an element, or `null`.
    pub fn copy_element(&self, id: &str) -> String {
        to_json(&self.board.copy_element(SubContentId::intern(id)))
    }

    /// `{ width, height }` of the canvas in pixels.
    pub fn get_canvas_size(&self) -> String {
        to_json(&self.board.viewport().size())
    }

    pub fn zoom_factor(&self) -> f64 {
        self.board.viewport().zoom_factor()
    }

    pub fn add_animation_enabled(&self) -> bool {
        self.board.animation_list().add_button_enabled()
    }

    pub fn get_lint(&self) -> String {
        lint_to_json(&self.board.lint())
    }

    pub fn seed_random(&mut self, seed: u64) {
        self.board.seed_rng(seed);
    }
}

/// Install the console logger at the given level (`"warn"`, `"debug"`...).
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> bool {
    match logger::parse_level(level) {
        Some(filter) => {
            logger::init(filter);
            true
        }
        None => false,
    }
}

// ─── Standalone validation (no board needed) ─────────────────────────────

/// Lint persisted params. Returns JSON `{"ok":true,"diagnostics":[...]}`
/// or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_params(source: &str) -> String {
    match parse_params(source) {
        Ok(params) => {
            let diagnostics = ab_core::lint::lint_params(&params);
            format!(r#"{{"ok":true,"diagnostics":{}}}"#, lint_to_json(&diagnostics))
        }
        Err(e) => json!({ "ok": false, "error": e }).to_string(),
    }
}

// ─── JSON helpers ────────────────────────────────────────────────────────

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("serialization failed: {e}");
        "null".to_string()
    })
}

/// Empty input means a new, empty board.
fn parse_params(source: &str) -> Result<BoardParams, String> {
    if source.trim().is_empty() {
        return Ok(BoardParams::default());
    }
    BoardParams::from_json(source).map_err(|e| format!("Params parse error: {e}"))
}

fn parse_command(source: &str) -> Result<BoardCommand, String> {
    serde_json::from_str(source).map_err(|e| format!("Command parse error: {e}"))
}

fn events_to_json(events: &[BoardEvent]) -> String {
    serde_json::to_string(events).unwrap_or_else(|e| {
        log::error!("event serialization failed: {e}");
        "[]".to_string()
    })
}

fn lint_to_json(diagnostics: &[LintDiagnostic]) -> String {
    let items: Vec<serde_json::Value> = diagnostics
        .iter()
        .map(|d| {
            let (kind, index) = match d.target {
                LintTarget::Element(i) => ("element", i),
                LintTarget::Animation(i) => ("animation", i),
            };
            json!({
                "rule": d.rule,
                "message": d.message,
                "severity": match d.severity {
                    LintSeverity::Warning => "warning",
                    LintSeverity::Info => "info",
                },
                "target": { "kind": kind, "index": index },
            })
        })
        .collect();
    serde_json::Value::Array(items).to_string()
}

/// Set up a panic hook that logs to console.error.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("AB WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    #[test]
    fn empty_params_make_an_empty_board() {
        let params = parse_params("  ").unwrap();
        assert!(params.elements.is_empty());
        assert!(parse_params("{ not json").unwrap_err().starts_with("Params parse error"));
    }

    #[test]
    fn validate_reports_orphans() {
        let source = r#"{
            "elements": [{ "contentType": { "library": "H5P.Image 1.1", "subContentId": "a" } }],
            "animations": [{ "subContentId": "b" }]
        }"#;
        let result: Value = serde_json::from_str(&validate_params(source)).unwrap();
        assert_eq!(result["ok"], true);
        assert_eq!(result["diagnostics"][0]["rule"], "orphaned-animation");
        assert_eq!(
            result["diagnostics"][0]["target"],
            json!({ "kind": "animation", "index": 0 })
        );

        let broken: Value = serde_json::from_str(&validate_params("[1")).unwrap();
        assert_eq!(broken["ok"], false);
    }

    #[test]
    fn canvas_nodes_serialize_as_a_slice() {
        use ab_core::geometry::{Geometry, ResizeOptions};
        use ab_editor::canvas::CanvasNode;

        let nodes = [CanvasNode::new(
            SubContentId::intern("n-1"),
            Geometry::new(10.0, 20.0, 30.0, 40.0),
            ResizeOptions::default(),
        )];
        let value: Value = serde_json::from_str(&to_json(&nodes[..])).unwrap();
        assert_eq!(value[0]["id"], "n-1");
        assert_eq!(value[0]["geometry"]["width"], 30.0);
        assert_eq!(to_json::<[u8]>(&[]), "[]");
    }

    #[test]
    fn commands_and_events_cross_as_json() {
        assert!(matches!(
            parse_command(r#"{ "type": "zoomIn" }"#),
            Err(e) if e.starts_with("Command parse error")
        ));
        assert_eq!(
            parse_command(r#"{ "type": "toggleListView" }"#).unwrap(),
            BoardCommand::ToggleListView { state: None }
        );

        let json = events_to_json(&[BoardEvent::ListViewToggled { open: true }]);
        assert_eq!(json, r#"[{"type":"listViewToggled","open":true}]"#);
    }
}
