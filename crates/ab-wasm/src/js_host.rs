//! `Host` implementation backed by a JavaScript object.
//!
//! The host object passed to the constructor provides:
//!
//! - `renderForm(schemaJson, paramsJson)` → form handle (required)
//! - `canPaste(payloadJson)` → boolean (optional, defaults to `true`)
//! - `resolvePath(path)` → URL string (optional, defaults to identity)
//!
//! A form handle provides `childCount()`, `validate(index)`,
//! `librarySelection(index)`, `values()` (JSON string),
//! `showLibraryError(message)` and `clearLibraryError()`.

use ab_editor::host::{ClipboardPayload, FormChild, Host, SubForm};
use js_sys::{Array, Function, Reflect};
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};

/// Look up `name` on `target` and call it with `args`. Missing methods
/// yield `None`; thrown exceptions are logged and yield `None`.
fn call_method(target: &JsValue, name: &str, args: &[JsValue]) -> Option<JsValue> {
    let method = Reflect::get(target, &JsValue::from_str(name)).ok()?;
    let method = method.dyn_into::<Function>().ok()?;
    let args: Array = args.iter().collect();
    match method.apply(target, &args) {
        Ok(result) => Some(result),
        Err(err) => {
            log::error!("host method {name} threw: {err:?}");
            None
        }
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

pub struct JsHost {
    handle: JsValue,
}

impl JsHost {
    pub fn new(handle: JsValue) -> Self {
        Self { handle }
    }
}

impl Host for JsHost {
    fn render_form(&mut self, schema: &Value, params: &Value) -> Box<dyn SubForm> {
        let args = [
            JsValue::from_str(&to_json(schema)),
            JsValue::from_str(&to_json(params)),
        ];
        let form = call_method(&self.handle, "renderForm", &args).unwrap_or(JsValue::NULL);
        Box::new(JsSubForm::new(form))
    }

    fn can_paste(&self, payload: &ClipboardPayload) -> bool {
        call_method(&self.handle, "canPaste", &[JsValue::from_str(&to_json(payload))])
            .and_then(|v| v.as_bool())
            .unwrap_or(true)
    }

    fn resolve_path(&self, path: &str) -> String {
        call_method(&self.handle, "resolvePath", &[JsValue::from_str(path)])
            .and_then(|v| v.as_string())
            .unwrap_or_else(|| path.to_string())
    }
}

struct JsFormChild {
    form: JsValue,
    index: u32,
}

impl FormChild for JsFormChild {
    fn validate(&mut self) -> Option<bool> {
        call_method(&self.form, "validate", &[JsValue::from(self.index)]).and_then(|v| v.as_bool())
    }

    fn library_selection(&self) -> Option<String> {
        call_method(&self.form, "librarySelection", &[JsValue::from(self.index)])
            .and_then(|v| v.as_string())
    }
}

struct JsSubForm {
    form: JsValue,
    children: Vec<JsFormChild>,
}

impl JsSubForm {
    fn new(form: JsValue) -> Self {
        let count = call_method(&form, "childCount", &[])
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
            .max(0.0) as u32;
        let children = (0..count)
            .map(|index| JsFormChild {
                form: form.clone(),
                index,
            })
            .collect();
        Self { form, children }
    }
}

impl SubForm for JsSubForm {
    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child_mut(&mut self, index: usize) -> Option<&mut dyn FormChild> {
        self.children
            .get_mut(index)
            .map(|child| child as &mut dyn FormChild)
    }

    fn values(&self) -> Option<Value> {
        let json = call_method(&self.form, "values", &[])?.as_string()?;
        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("form values are not JSON: {err}");
                None
            }
        }
    }

    fn show_library_error(&mut self, message: &str) {
        call_method(&self.form, "showLibraryError", &[JsValue::from_str(message)]);
    }

    fn clear_library_error(&mut self) {
        call_method(&self.form, "clearLibraryError", &[]);
    }
}
