//! Route records from the `log` crate facade into the global logger

use super::{
    error::{LoggerError, Result},
    field::Field,
    global,
    log_entry::Caller,
    log_level::{LogLevel, Severity},
};
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Severity for `log::Level::Trace`, one step more verbose than Debug.
const TRACE_SEVERITY: Severity = Severity(-2);

struct GlobalBridge;

fn severity_of(level: Level) -> Severity {
    match level {
        Level::Error => LogLevel::Error.severity(),
        Level::Warn => LogLevel::Warn.severity(),
        Level::Info => LogLevel::Info.severity(),
        Level::Debug => LogLevel::Debug.severity(),
        Level::Trace => TRACE_SEVERITY,
    }
}

impl Log for GlobalBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        global::global()
            .backend()
            .core()
            .enabled(severity_of(metadata.level()))
    }

    fn log(&self, record: &Record) {
        let logger = global::global();
        let backend = logger.backend();
        let severity = severity_of(record.level());
        if !backend.core().enabled(severity) {
            return;
        }

        let caller = match (record.file_static(), record.file(), record.line()) {
            (Some(file), _, Some(line)) => Some(Caller::new(file, line)),
            (None, Some(file), Some(line)) => Some(Caller::new(file.to_string(), line)),
            _ => None,
        };

        if let Some(ce) = backend.check_with_caller(severity, record.args().to_string(), caller) {
            ce.write(&[Field::string("target", record.target())]);
        }
    }

    fn flush(&self) {
        global::flush();
    }
}

/// Install the bridge as the `log` crate's logger.
///
/// Records are forwarded to whichever global logger is active when they are
/// emitted. Fails if the `log` crate already has a logger installed.
pub fn redirect_log_crate() -> Result<()> {
    log::set_boxed_logger(Box::new(GlobalBridge))
        .map_err(|e| LoggerError::config("log", e.to_string()))?;
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}
