//! `tracing` output to the browser console.

use std::io;

use wasm_bindgen::JsValue;

/// Buffers one formatted event and logs it with `console.log` on drop.
#[derive(Default)]
pub struct ConsoleWriter {
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(line) = take_line(&mut self.buffer) {
            web_sys::console::log_1(&JsValue::from_str(&line));
        }
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

/// Drains the buffer into one line without its trailing newline.
fn take_line(buffer: &mut Vec<u8>) -> Option<String> {
    if buffer.is_empty() {
        return None;
    }
    let text = String::from_utf8_lossy(buffer).trim_end().to_string();
    buffer.clear();
    Some(text)
}

/// Installs a console subscriber for the session's `scorm` events.
///
/// Wall-clock timestamps are unavailable on `wasm32-unknown-unknown`, so
/// events are formatted without them. A second call is a no-op.
pub fn init(level: tracing::Level) {
    let _ = tracing_subscriber::fmt()
        .with_writer(ConsoleWriter::new)
        .with_max_level(level)
        .with_target(true)
        .without_time()
        .try_init();
}
