//! Routes `tracing` events to the browser console.

use std::io;
use std::sync::Once;
use tracing::{Level, Metadata};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;
use web_sys::console;

static INIT: Once = Once::new();

/// Installs the console subscriber; later calls do nothing.
pub fn init_logging() {
    INIT.call_once(|| {
        let installed = tracing_subscriber::fmt()
            .with_max_level(LevelFilter::INFO)
            .with_writer(ConsoleMakeWriter)
            .with_ansi(false)
            .without_time()
            .try_init();
        if installed.is_err() {
            console::warn_1(&JsValue::from_str("a tracing subscriber is already installed"));
        }
    });
}

/// Trims one formatted event down to the text the console should show.
pub fn console_message(buf: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(buf);
    let text = text.trim_end();
    (!text.is_empty()).then(|| text.to_string())
}

struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one event and hands it to the console method matching its level.
struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self { level, buf: Vec::new() }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(message) = console_message(&self.buf) {
            let value = JsValue::from_str(&message);
            match self.level {
                Level::ERROR => console::error_1(&value),
                Level::WARN => console::warn_1(&value),
                Level::INFO => console::info_1(&value),
                _ => console::debug_1(&value),
            }
        }
        self.buf.clear();
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}
