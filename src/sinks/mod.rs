//! Sink implementations

pub mod console;
pub mod file;
pub mod memory;

pub use console::{ConsoleSink, ConsoleTarget};
pub use file::FileSink;
pub use memory::MemorySink;

pub use crate::core::Sink;

use crate::core::Result;

/// Open a sink from a configured target.
///
/// `stdout` and `stderr` select the console streams; anything else is a
/// file path, optionally written as a `file://` URL.
pub fn open(target: &str) -> Result<Box<dyn Sink>> {
    match target {
        "stdout" => Ok(Box::new(ConsoleSink::stdout())),
        "stderr" => Ok(Box::new(ConsoleSink::stderr())),
        path => {
            let path = path.strip_prefix("file://").unwrap_or(path);
            Ok(Box::new(FileSink::new(path)?))
        }
    }
}
