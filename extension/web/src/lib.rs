//! Browser bindings for the LMS session adapter.
//!
//! Exposes [`ScormSession`] to JavaScript. Discovery starts at the window the
//! module was loaded in and follows `window.parent`, `window.opener` and the
//! parent document just as content packages expect.
//!
//! ```js
//! import init, { ScormSession } from "./scorm_web.js";
//!
//! await init();
//! const session = new ScormSession({ handleExitMode: true });
//! if (session.initialize()) {
//!     session.set("cmi.core.score.raw", "92");
//!     session.status("set", "completed");
//!     session.terminate();
//! }
//! ```

mod console;
mod host;

use std::rc::Rc;

use scorm::{Session, SessionConfig, StatusReply};
use wasm_bindgen::prelude::*;

pub use host::{JsHostApi, WindowFrame, host_value};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console::init(tracing::Level::DEBUG);
}

/// One content session against the LMS hosting this page.
#[wasm_bindgen]
pub struct ScormSession {
    inner: Session,
}

#[wasm_bindgen]
impl ScormSession {
    /// Creates a session rooted at the current window.
    ///
    /// `config` is an optional object with the `SessionConfig` keys
    /// (`version`, `handleCompletionStatus`, `handleExitMode`, `trace`).
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ScormSession, JsValue> {
        let config: SessionConfig = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window in this context"))?;

        Ok(Self {
            inner: Session::new(Rc::new(WindowFrame::new(window)), config),
        })
    }

    #[wasm_bindgen(js_name = isAvailable)]
    pub fn is_available(&self) -> bool {
        self.inner.is_available()
    }

    #[wasm_bindgen(getter, js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    /// `"1.2"`, `"2004"`, `"AICC"`, or `undefined` before discovery.
    #[wasm_bindgen(getter)]
    pub fn version(&self) -> Option<String> {
        self.inner.version().map(|version| version.to_string())
    }

    pub fn initialize(&mut self) -> bool {
        self.inner.connection().initialize()
    }

    pub fn terminate(&mut self) -> bool {
        self.inner.connection().terminate()
    }

    /// Reads a data-model element; `"null"` on failure.
    pub fn get(&mut self, field: &str) -> String {
        self.inner.data().get(field)
    }

    pub fn set(&mut self, field: &str, value: &str) -> bool {
        self.inner.data().set(field, value)
    }

    pub fn save(&mut self) -> bool {
        self.inner.data().save()
    }

    /// `status("get")` returns the completion status string,
    /// `status("set", value)` returns whether the write succeeded.
    pub fn status(&mut self, action: &str, value: Option<String>) -> JsValue {
        match self.inner.status_str(action, value.as_deref()) {
            StatusReply::Value(value) => JsValue::from_str(&value),
            StatusReply::Written(ok) => JsValue::from_bool(ok),
        }
    }

    /// Last host error code; `-1` when the host answered with a non-integer.
    #[wasm_bindgen(js_name = getCode)]
    pub fn get_code(&mut self) -> f64 {
        self.inner.debug().get_code() as f64
    }

    #[wasm_bindgen(js_name = getInfo)]
    pub fn get_info(&mut self, code: i32) -> String {
        self.inner.debug().get_info(i64::from(code))
    }

    #[wasm_bindgen(js_name = getDiagnostic)]
    pub fn get_diagnostic(&mut self, code: i32) -> String {
        self.inner.debug().get_diagnostic(i64::from(code))
    }
}
