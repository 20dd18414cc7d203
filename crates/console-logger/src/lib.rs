//! Console Logger
//!
//! A `tracing` subscriber for the browser. Each formatted event is buffered
//! and handed to the matching `console.*` method when the writer drops, so
//! DevTools level filtering works. Off wasm the same lines go to stderr.

use std::fmt;
use std::io::{self, Write};

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;

pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Logger settings
#[derive(Debug, Clone, Copy)]
pub struct LoggerConfig {
    pub level: Level,
    /// Include the module path of the event
    pub with_target: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            with_target: false,
        }
    }
}

impl LoggerConfig {
    /// Parse a level name ("trace".."error"), falling back to INFO.
    pub fn with_level_name(mut self, name: &str) -> Self {
        self.level = parse_level(name).unwrap_or(Level::INFO);
        self
    }
}

pub fn parse_level(name: &str) -> Option<Level> {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Install the global subscriber. Fails if one is already set.
pub fn init(config: LoggerConfig) -> Result<(), InitError> {
    tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_timer(LocalClock)
        .with_max_level(config.level)
        .with_target(config.with_target)
        .try_init()
}

/// Wall-clock timestamps via chrono (SystemTime is unavailable on wasm32)
struct LocalClock;

impl FormatTime for LocalClock {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one event; emits on drop.
pub struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buf: Vec::with_capacity(256),
        }
    }

    fn line(&self) -> String {
        let text = String::from_utf8_lossy(&self.buf);
        text.trim_end_matches('\n').to_string()
    }
}

impl Write for ConsoleWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        emit(self.level, &self.line());
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::ERROR => web_sys::console::error_1(&value),
        Level::WARN => web_sys::console::warn_1(&value),
        Level::INFO => web_sys::console::info_1(&value),
        _ => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    let _ = writeln!(io::stderr(), "{}", line);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_level(" warning "), Some(Level::WARN));
        assert_eq!(parse_level("verbose"), None);
    }

    #[test]
    fn test_config_falls_back_to_info() {
        let config = LoggerConfig::default().with_level_name("nonsense");
        assert_eq!(config.level, Level::INFO);
        let config = LoggerConfig::default().with_level_name("error");
        assert_eq!(config.level, Level::ERROR);
    }

    #[test]
    fn test_writer_strips_trailing_newline() {
        let mut writer = ConsoleWriter::new(Level::INFO);
        writer.write_all(b"hello world\n").unwrap();
        assert_eq!(writer.line(), "hello world");
    }
}
