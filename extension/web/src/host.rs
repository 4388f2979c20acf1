//! DOM implementations of the session's host capabilities.

use std::rc::Rc;

use js_sys::{Array, Function, Object, Reflect};
use scorm::{HostApi, HostFrame};
use scorm_protocol::HostValue;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Window;

/// A browser window as seen by API discovery.
///
/// Property reads on cross-origin windows throw; those are treated as absent.
pub struct WindowFrame {
    window: Window,
}

impl WindowFrame {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

fn object_property(target: &JsValue, name: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .filter(|value| value.is_object())
}

fn api_object(value: JsValue) -> Rc<dyn HostApi> {
    Rc::new(JsHostApi::new(value))
}

impl HostFrame for WindowFrame {
    fn global(&self, name: &str) -> Option<Rc<dyn HostApi>> {
        object_property(&self.window, name).map(api_object)
    }

    fn document_global(&self, name: &str) -> Option<Rc<dyn HostApi>> {
        let document = self.window.document()?;
        object_property(&document, name).map(api_object)
    }

    fn parent(&self) -> Option<Rc<dyn HostFrame>> {
        let parent = self.window.parent().ok().flatten()?;
        // The top window is its own parent.
        if Object::is(&parent, &self.window) {
            return None;
        }
        Some(Rc::new(WindowFrame::new(parent)))
    }

    fn opener(&self) -> Option<Rc<dyn HostFrame>> {
        let opener = self.window.opener().ok().filter(|value| value.is_object())?;
        Some(Rc::new(WindowFrame::new(opener.unchecked_into::<Window>())))
    }
}

/// The LMS-injected API object.
pub struct JsHostApi {
    object: JsValue,
}

impl JsHostApi {
    pub fn new(object: JsValue) -> Self {
        Self { object }
    }
}

impl HostApi for JsHostApi {
    fn call(&self, method: &str, args: &[&str]) -> HostValue {
        let Some(function) = Reflect::get(&self.object, &JsValue::from_str(method))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
        else {
            return HostValue::Undefined;
        };

        let js_args: Array = args.iter().map(|arg| JsValue::from_str(arg)).collect();
        match function.apply(&self.object, &js_args) {
            Ok(value) => host_value(&value),
            // A throwing host method is a failed call.
            Err(_) => HostValue::Undefined,
        }
    }
}

/// Maps a loosely typed JS return value onto [`HostValue`].
pub fn host_value(value: &JsValue) -> HostValue {
    if value.is_undefined() {
        HostValue::Undefined
    } else if value.is_null() {
        HostValue::Null
    } else if let Some(flag) = value.as_bool() {
        HostValue::Bool(flag)
    } else if let Some(number) = value.as_f64() {
        HostValue::Number(number)
    } else if let Some(text) = value.as_string() {
        HostValue::Text(text)
    } else {
        HostValue::Text(String::from(Object::from(value.clone()).to_string()))
    }
}
