//! `io::Write` adapters over the global logger
//!
//! Handy for libraries that only accept a writer: each `write` call becomes
//! one record at the writer's level. Panic and Fatal writers keep their
//! terminal effect.

use super::global;
use super::log_level::LogLevel;
use super::logger::Logger;
use std::io;

/// Writer that logs every write at a fixed level on the active global logger.
#[derive(Debug, Clone, Copy)]
pub struct LevelWriter {
    level: LogLevel,
}

impl LevelWriter {
    pub fn new(level: LogLevel) -> Self {
        Self { level }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }
}

impl io::Write for LevelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let msg = text.strip_suffix('\n').unwrap_or(&text);
        let logger = global::global();
        if let Some(ce) = logger.backend().check(self.level, msg) {
            ce.write(&[]);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Logger::flush(&*global::global());
        Ok(())
    }
}

/// Writer logging at Info.
pub fn std_info_writer() -> LevelWriter {
    LevelWriter::new(LogLevel::Info)
}

/// Writer logging at Error.
pub fn std_error_writer() -> LevelWriter {
    LevelWriter::new(LogLevel::Error)
}
