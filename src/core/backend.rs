//! Encoder + sink pipeline behind every logger
//!
//! The logger layer only talks to the backend through a narrow surface:
//! [`Backend::check`] hands out a [`CheckedEntry`] when a record should be
//! written, [`Core::enabled`] answers the level gate, and [`Backend::named`] /
//! [`Backend::with`] produce scoped children. Everything a backend holds is
//! shared behind an `Arc`, so clones are cheap and independent.

use super::{
    encoder::{Encoder, OutputFormat},
    error::Result,
    field::Field,
    log_entry::{Caller, LogEntry},
    log_level::{LogLevel, Severity},
    metrics::BackendMetrics,
    sink::Sink,
};
use crate::sinks;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

pub type SharedSink = Arc<Mutex<Box<dyn Sink>>>;

/// What happens after a record has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminal {
    Continue,
    /// Unwind the calling thread with the record's message
    Panic,
    /// Exit the process with status 1
    Exit,
}

/// Shared state of a backend and all of its children.
pub struct Core {
    min_severity: Severity,
    encoder: Encoder,
    /// Receive every enabled record
    sinks: Vec<SharedSink>,
    /// Receive Error and above, excluding sinks already in `sinks`
    error_sinks: Vec<SharedSink>,
    add_caller: bool,
    stacktrace_at: Option<Severity>,
    development: bool,
    metrics: BackendMetrics,
}

impl Core {
    /// O(1), allocation-free level gate.
    #[inline]
    pub fn enabled(&self, severity: impl Into<Severity>) -> bool {
        severity.into().enabled_at(self.min_severity)
    }

    pub fn min_severity(&self) -> Severity {
        self.min_severity
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn is_development(&self) -> bool {
        self.development
    }

    pub fn metrics(&self) -> &BackendMetrics {
        &self.metrics
    }

    fn terminal_for(&self, severity: Severity) -> Terminal {
        match severity.level() {
            Some(LogLevel::Panic) => Terminal::Panic,
            Some(LogLevel::Fatal) => Terminal::Exit,
            Some(LogLevel::DPanic) if self.development => Terminal::Panic,
            _ => Terminal::Continue,
        }
    }

    fn write(&self, entry: &LogEntry) {
        let mut record = self.encoder.encode(entry);
        record.push('\n');

        let to_error_sinks = entry.severity >= LogLevel::Error.severity();
        let targets = self
            .sinks
            .iter()
            .chain(self.error_sinks.iter().filter(|_| to_error_sinks));

        for sink in targets {
            let mut sink = sink.lock();
            if let Err(e) = sink.write(record.as_bytes()) {
                let failures = self.metrics.record_write_error();
                // Alert on first failure and periodically thereafter
                if failures == 0 || (failures + 1) % 1000 == 0 {
                    eprintln!("[LOGGER ERROR] Sink '{}' failed: {}", sink.name(), e);
                }
            }
        }
        self.metrics.record_written();
    }

    fn sync(&self) -> Result<()> {
        let mut first_error = None;
        for sink in self.sinks.iter().chain(self.error_sinks.iter()) {
            let mut sink = sink.lock();
            if let Err(e) = sink.sync() {
                self.metrics.record_write_error();
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Core {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Core")
            .field("min_severity", &self.min_severity)
            .field("encoder", &self.encoder)
            .field("sinks", &self.sinks.len())
            .field("error_sinks", &self.error_sinks.len())
            .field("development", &self.development)
            .finish()
    }
}

/// Handle onto a backend core plus this handle's name and bound fields.
#[derive(Clone, Debug)]
pub struct Backend {
    core: Arc<Core>,
    name: Option<Arc<str>>,
    fields: Arc<[Field]>,
}

impl Backend {
    #[must_use]
    pub fn builder() -> BackendBuilder {
        BackendBuilder::new()
    }

    /// A backend with no sinks; records are accepted and dropped.
    pub fn discard() -> Self {
        BackendBuilder::new()
            .min_level(LogLevel::Fatal)
            .assemble(Vec::new(), Vec::new())
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Child whose name is this name joined with `name` by a dot.
    pub fn named(&self, name: &str) -> Backend {
        if name.is_empty() {
            return self.clone();
        }
        let name: Arc<str> = match self.name {
            Some(ref parent) => Arc::from(format!("{}.{}", parent, name)),
            None => Arc::from(name),
        };
        Backend {
            core: Arc::clone(&self.core),
            name: Some(name),
            fields: Arc::clone(&self.fields),
        }
    }

    /// Child that writes `fields` ahead of the call-site fields of every record.
    pub fn with(&self, fields: &[Field]) -> Backend {
        if fields.is_empty() {
            return self.clone();
        }
        let merged: Vec<Field> = self.fields.iter().chain(fields).cloned().collect();
        Backend {
            core: Arc::clone(&self.core),
            name: self.name.clone(),
            fields: Arc::from(merged),
        }
    }

    /// Returns a write token when a record at `severity` should be produced.
    ///
    /// Panic and Fatal always yield a token, even below the configured
    /// minimum, so their terminal effect is never skipped.
    #[track_caller]
    pub fn check(
        &self,
        severity: impl Into<Severity>,
        message: impl Into<String>,
    ) -> Option<CheckedEntry<'_>> {
        let caller = Caller::from(Location::caller());
        self.check_lazy(severity.into(), Some(caller), || message.into())
    }

    /// Like [`check`](Self::check), formatting the message only when needed.
    #[track_caller]
    pub fn check_fmt(
        &self,
        severity: impl Into<Severity>,
        args: fmt::Arguments<'_>,
    ) -> Option<CheckedEntry<'_>> {
        let caller = Caller::from(Location::caller());
        self.check_lazy(severity.into(), Some(caller), || fmt::format(args))
    }

    /// Like [`check`](Self::check) with an explicit call site.
    pub fn check_with_caller(
        &self,
        severity: impl Into<Severity>,
        message: impl Into<String>,
        caller: Option<Caller>,
    ) -> Option<CheckedEntry<'_>> {
        self.check_lazy(severity.into(), caller, || message.into())
    }

    fn check_lazy(
        &self,
        severity: Severity,
        caller: Option<Caller>,
        message: impl FnOnce() -> String,
    ) -> Option<CheckedEntry<'_>> {
        let enabled = self.core.enabled(severity);
        let terminal = self.core.terminal_for(severity);
        if !enabled && terminal == Terminal::Continue {
            return None;
        }

        let mut entry = LogEntry::new(severity, message())
            .with_name(self.name.clone())
            .with_caller(caller.filter(|_| self.core.add_caller));
        if self.core.stacktrace_at.is_some_and(|at| severity >= at) {
            entry = entry.with_stacktrace(std::backtrace::Backtrace::force_capture().to_string());
        }

        Some(CheckedEntry {
            backend: self,
            entry,
            write: enabled,
            terminal,
        })
    }

    /// Emit a DPanic diagnostic about logger misuse.
    #[track_caller]
    pub(crate) fn report_misuse(&self, message: &str, detail: Field) {
        self.core.metrics.record_misuse();
        if let Some(ce) = self.check(LogLevel::DPanic, message) {
            ce.write(&[detail]);
        }
    }

    /// Flush every sink; the first failure is returned after all were tried.
    pub fn sync(&self) -> Result<()> {
        self.core.sync()
    }
}

/// Write token for one record that passed the level gate.
#[must_use = "a checked entry does nothing until written"]
pub struct CheckedEntry<'a> {
    backend: &'a Backend,
    entry: LogEntry,
    write: bool,
    terminal: Terminal,
}

impl CheckedEntry<'_> {
    pub fn entry(&self) -> &LogEntry {
        &self.entry
    }

    /// Write the record with the backend's bound fields followed by `fields`.
    ///
    /// For Panic records this unwinds after the sinks are synced; for Fatal
    /// records the process exits.
    pub fn write(self, fields: &[Field]) {
        let CheckedEntry {
            backend,
            mut entry,
            write,
            terminal,
        } = self;

        if write {
            let mut all = Vec::with_capacity(backend.fields.len() + fields.len());
            all.extend_from_slice(&backend.fields);
            all.extend_from_slice(fields);
            entry.fields = all;
            backend.core.write(&entry);
        }

        match terminal {
            Terminal::Continue => {}
            Terminal::Panic => {
                let _ = backend.core.sync();
                panic!("{}", entry.message);
            }
            Terminal::Exit => {
                if let Err(e) = backend.core.sync() {
                    eprintln!("[LOGGER ERROR] Failed to sync before exit: {}", e);
                }
                std::process::exit(1);
            }
        }
    }
}

/// Builder for constructing a Backend with a fluent API
///
/// # Example
/// ```
/// use rust_structured_logger::core::{Backend, LogLevel, OutputFormat};
/// use rust_structured_logger::sinks::MemorySink;
///
/// let sink = MemorySink::new();
/// let backend = Backend::builder()
///     .min_level(LogLevel::Debug)
///     .format(OutputFormat::Json)
///     .sink(sink.clone())
///     .build()
///     .unwrap();
///
/// if let Some(ce) = backend.check(LogLevel::Info, "ready") {
///     ce.write(&[]);
/// }
/// assert_eq!(sink.lines().len(), 1);
/// ```
pub struct BackendBuilder {
    min_severity: Severity,
    format: OutputFormat,
    color: bool,
    name: Option<String>,
    add_caller: bool,
    stacktrace_at: Option<Severity>,
    development: bool,
    output_paths: Vec<String>,
    error_output_paths: Vec<String>,
    sinks: Vec<SharedSink>,
    error_sinks: Vec<SharedSink>,
}

impl BackendBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            min_severity: LogLevel::Info.severity(),
            format: OutputFormat::Console,
            color: false,
            name: None,
            add_caller: true,
            stacktrace_at: Some(LogLevel::Panic.severity()),
            development: false,
            output_paths: Vec::new(),
            error_output_paths: Vec::new(),
            sinks: Vec::new(),
            error_sinks: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_severity = level.severity();
        self
    }

    /// Set the minimum as a raw severity, e.g. `Severity::verbosity(3)`
    #[must_use = "builder methods return a new value"]
    pub fn min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Colored level names; ignored unless the format is console
    #[must_use = "builder methods return a new value"]
    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn add_caller(mut self, add_caller: bool) -> Self {
        self.add_caller = add_caller;
        self
    }

    /// Attach a backtrace to records at or above `level`; `None` disables it
    #[must_use = "builder methods return a new value"]
    pub fn stacktrace_at(mut self, level: Option<LogLevel>) -> Self {
        self.stacktrace_at = level.map(LogLevel::severity);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    /// Targets opened at build time for every record
    #[must_use = "builder methods return a new value"]
    pub fn output_paths<S: AsRef<str>>(mut self, paths: &[S]) -> Self {
        self.output_paths
            .extend(paths.iter().map(|p| p.as_ref().to_string()));
        self
    }

    /// Targets opened at build time for Error and above
    #[must_use = "builder methods return a new value"]
    pub fn error_output_paths<S: AsRef<str>>(mut self, paths: &[S]) -> Self {
        self.error_output_paths
            .extend(paths.iter().map(|p| p.as_ref().to_string()));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Arc::new(Mutex::new(Box::new(sink))));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.error_sinks.push(Arc::new(Mutex::new(Box::new(sink))));
        self
    }

    /// Open configured paths and build the Backend
    ///
    /// A target listed in both path lists is opened once.
    pub fn build(mut self) -> Result<Backend> {
        let mut opened: HashMap<String, SharedSink> = HashMap::new();
        let mut open = |path: &str| -> Result<SharedSink> {
            if let Some(sink) = opened.get(path) {
                return Ok(Arc::clone(sink));
            }
            let sink: SharedSink = Arc::new(Mutex::new(sinks::open(path)?));
            opened.insert(path.to_string(), Arc::clone(&sink));
            Ok(sink)
        };

        let mut sinks = std::mem::take(&mut self.sinks);
        for path in &self.output_paths {
            let sink = open(path)?;
            push_unique(&mut sinks, sink);
        }

        let mut error_sinks = Vec::new();
        for sink in std::mem::take(&mut self.error_sinks) {
            push_unique(&mut error_sinks, sink);
        }
        for path in &self.error_output_paths {
            let sink = open(path)?;
            push_unique(&mut error_sinks, sink);
        }
        error_sinks.retain(|e| !sinks.iter().any(|s| Arc::ptr_eq(s, e)));

        Ok(self.assemble(sinks, error_sinks))
    }

    fn assemble(self, sinks: Vec<SharedSink>, error_sinks: Vec<SharedSink>) -> Backend {
        let core = Core {
            min_severity: self.min_severity,
            encoder: Encoder::new(self.format, self.color),
            sinks,
            error_sinks,
            add_caller: self.add_caller,
            stacktrace_at: self.stacktrace_at,
            development: self.development,
            metrics: BackendMetrics::new(),
        };
        Backend {
            core: Arc::new(core),
            name: self.name.filter(|n| !n.is_empty()).map(Arc::from),
            fields: Arc::from(Vec::new()),
        }
    }
}

impl Default for BackendBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn push_unique(sinks: &mut Vec<SharedSink>, sink: SharedSink) {
    if !sinks.iter().any(|s| Arc::ptr_eq(s, &sink)) {
        sinks.push(sink);
    }
}
