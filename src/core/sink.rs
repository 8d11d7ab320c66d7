//! Sink trait for log output destinations

use super::error::Result;

/// Destination for encoded records.
///
/// Each call to `write` receives one complete record including its line
/// ending; the backend serializes calls per sink.
pub trait Sink: Send {
    fn write(&mut self, record: &[u8]) -> Result<()>;
    fn sync(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
