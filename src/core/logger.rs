//! Logger capability traits and the backend-bound logger

use super::{
    backend::Backend,
    context::{Context, KEY_REQUEST_ID, KEY_USERNAME, KEY_WATCHER_NAME},
    encoder::OutputFormat,
    error::Result,
    field::Field,
    key_values::{normalize_key_values, Arg},
    log_level::{LogLevel, Severity},
    options::Options,
};
use once_cell::sync::Lazy;
use std::fmt;
use std::io;
use std::sync::Arc;

/// Shared handle to any logger; derived loggers are returned this way.
pub type SharedLogger = Arc<dyn Logger>;

/// The Info-only capability, as returned by [`Logger::v`].
pub trait InfoLogger: Send + Sync {
    #[track_caller]
    fn info(&self, msg: &str, fields: &[Field]);
    #[track_caller]
    fn infof(&self, args: fmt::Arguments<'_>);
    #[track_caller]
    fn infow(&self, msg: &str, key_values: &[Arg]);
    /// Whether records from this logger reach the backend
    fn enabled(&self) -> bool;
}

/// Full logging capability.
///
/// Every severity has three forms: typed fields (`x`), formatted message
/// (`xf`) and loose key-value pairs (`xw`). `panic*` unwinds after writing and
/// `fatal*` exits the process with status 1.
pub trait Logger: InfoLogger {
    #[track_caller]
    fn debug(&self, msg: &str, fields: &[Field]);
    #[track_caller]
    fn debugf(&self, args: fmt::Arguments<'_>);
    #[track_caller]
    fn debugw(&self, msg: &str, key_values: &[Arg]);

    #[track_caller]
    fn warn(&self, msg: &str, fields: &[Field]);
    #[track_caller]
    fn warnf(&self, args: fmt::Arguments<'_>);
    #[track_caller]
    fn warnw(&self, msg: &str, key_values: &[Arg]);

    #[track_caller]
    fn error(&self, msg: &str, fields: &[Field]);
    #[track_caller]
    fn errorf(&self, args: fmt::Arguments<'_>);
    #[track_caller]
    fn errorw(&self, msg: &str, key_values: &[Arg]);

    #[track_caller]
    fn panic(&self, msg: &str, fields: &[Field]);
    #[track_caller]
    fn panicf(&self, args: fmt::Arguments<'_>);
    #[track_caller]
    fn panicw(&self, msg: &str, key_values: &[Arg]);

    #[track_caller]
    fn fatal(&self, msg: &str, fields: &[Field]);
    #[track_caller]
    fn fatalf(&self, args: fmt::Arguments<'_>);
    #[track_caller]
    fn fatalw(&self, msg: &str, key_values: &[Arg]);

    /// Info logger at verbosity `level`, or a shared no-op when that
    /// verbosity is not enabled.
    fn v(&self, level: u32) -> Arc<dyn InfoLogger>;

    /// Log `p` as one Info record and report the full length as written.
    ///
    /// [`StructuredLogger`] also implements [`io::Write`], so with both traits
    /// in scope a plain `logger.write(..)` is ambiguous. Name the trait:
    ///
    /// ```
    /// use rust_structured_logger::prelude::*;
    /// use std::io::Write;
    ///
    /// let mut logger = StructuredLogger::disabled();
    /// assert_eq!(Logger::write(&logger, b"line\n").unwrap(), 5);
    /// assert_eq!(Write::write(&mut logger, b"line\n").unwrap(), 5);
    /// ```
    #[track_caller]
    fn write(&self, p: &[u8]) -> io::Result<usize>;

    /// New logger that prepends the given pairs to every record.
    #[track_caller]
    fn with_values(&self, key_values: &[Arg]) -> SharedLogger;

    /// New logger whose name is extended with `name`, joined by a dot.
    fn with_name(&self, name: &str) -> SharedLogger;

    /// Context carrying this logger, for [`from_context`](super::context::from_context).
    fn with_context(&self, ctx: &Context) -> Context;

    /// Copy of this logger enriched with the well-known values found in `ctx`.
    fn l(&self, ctx: &Context) -> SharedLogger;

    /// Sync all sinks; failures are reported to stderr.
    fn flush(&self);
}

/// Info logger for a closed verbosity level. Does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInfoLogger;

impl InfoLogger for NoopInfoLogger {
    #[inline]
    fn info(&self, _msg: &str, _fields: &[Field]) {}

    #[inline]
    fn infof(&self, _args: fmt::Arguments<'_>) {}

    #[inline]
    fn infow(&self, _msg: &str, _key_values: &[Arg]) {}

    #[inline]
    fn enabled(&self) -> bool {
        false
    }
}

static NOOP_INFO_LOGGER: Lazy<Arc<dyn InfoLogger>> = Lazy::new(|| Arc::new(NoopInfoLogger));

/// Formatted and loose key-value emission over a backend.
#[derive(Clone, Debug)]
struct SugaredBackend {
    base: Backend,
}

impl SugaredBackend {
    fn new(base: Backend) -> Self {
        Self { base }
    }

    #[track_caller]
    fn log(&self, severity: Severity, msg: &str, fields: &[Field]) {
        if let Some(ce) = self.base.check(severity, msg) {
            ce.write(fields);
        }
    }

    #[track_caller]
    fn logf(&self, severity: Severity, args: fmt::Arguments<'_>) {
        if let Some(ce) = self.base.check_fmt(severity, args) {
            ce.write(&[]);
        }
    }

    #[track_caller]
    fn logw(&self, severity: Severity, msg: &str, key_values: &[Arg]) {
        if let Some(ce) = self.base.check(severity, msg) {
            let fields = normalize_key_values(&self.base, key_values, Vec::new());
            ce.write(&fields);
        }
    }
}

/// Info logger bound to one verbosity severity.
#[derive(Clone, Debug)]
pub struct VerboseInfoLogger {
    sugar: SugaredBackend,
    severity: Severity,
}

impl VerboseInfoLogger {
    pub fn new(backend: Backend, severity: Severity) -> Self {
        Self {
            sugar: SugaredBackend::new(backend),
            severity,
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }
}

impl InfoLogger for VerboseInfoLogger {
    #[track_caller]
    fn info(&self, msg: &str, fields: &[Field]) {
        self.sugar.log(self.severity, msg, fields);
    }

    #[track_caller]
    fn infof(&self, args: fmt::Arguments<'_>) {
        self.sugar.logf(self.severity, args);
    }

    #[track_caller]
    fn infow(&self, msg: &str, key_values: &[Arg]) {
        self.sugar.logw(self.severity, msg, key_values);
    }

    #[inline]
    fn enabled(&self) -> bool {
        self.sugar.base.core().enabled(self.severity)
    }
}

/// Logger bound to a backend.
///
/// # Example
/// ```
/// use rust_structured_logger::prelude::*;
/// use rust_structured_logger::core::{Backend, OutputFormat};
/// use rust_structured_logger::sinks::MemorySink;
///
/// let sink = MemorySink::new();
/// let backend = Backend::builder()
///     .format(OutputFormat::Json)
///     .sink(sink.clone())
///     .build()
///     .unwrap();
/// let logger = StructuredLogger::from_backend(backend);
///
/// logger.info("started", &[Field::int32("workers", 4)]);
/// logger.infow("request", &kvs!["path", "/", "status", 200]);
///
/// let lines = sink.json_lines();
/// assert_eq!(lines[0]["workers"], 4);
/// assert_eq!(lines[1]["status"], 200);
/// ```
#[derive(Clone, Debug)]
pub struct StructuredLogger {
    backend: Backend,
    sugar: SugaredBackend,
    info_logger: VerboseInfoLogger,
}

impl StructuredLogger {
    /// Build a logger from options.
    ///
    /// An unparseable level falls back to Info; every other problem is an error.
    pub fn new(opts: &Options) -> Result<Self> {
        let level = opts.level.parse::<LogLevel>().unwrap_or(LogLevel::Info);
        let format: OutputFormat = opts.format.parse()?;

        let backend = Backend::builder()
            .min_level(level)
            .format(format)
            .color(opts.enable_color)
            .name(opts.name.clone())
            .add_caller(!opts.disable_caller)
            .stacktrace_at((!opts.disable_stacktrace).then_some(LogLevel::Panic))
            .development(opts.development)
            .output_paths(&opts.output_paths)
            .error_output_paths(&opts.error_output_paths)
            .build()?;

        Ok(Self::from_backend(backend))
    }

    pub fn from_backend(backend: Backend) -> Self {
        Self {
            sugar: SugaredBackend::new(backend.clone()),
            info_logger: VerboseInfoLogger::new(backend.clone(), LogLevel::Info.severity()),
            backend,
        }
    }

    /// Logger that drops everything except the terminal effects of panic and fatal.
    pub fn disabled() -> Self {
        Self::from_backend(Backend::discard())
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn name(&self) -> Option<&str> {
        self.backend.name()
    }

    fn derive(&self, backend: Backend) -> SharedLogger {
        Arc::new(Self::from_backend(backend))
    }

    /// Concrete form of [`Logger::l`].
    pub fn l_with(&self, ctx: &Context) -> StructuredLogger {
        let mut fields = Vec::new();
        for key in [KEY_REQUEST_ID, KEY_USERNAME, KEY_WATCHER_NAME] {
            if let Some(value) = ctx.value(key) {
                fields.push(Field::new(key, value.clone()));
            }
        }
        Self::from_backend(self.backend.with(&fields))
    }
}

impl InfoLogger for StructuredLogger {
    #[track_caller]
    fn info(&self, msg: &str, fields: &[Field]) {
        self.info_logger.info(msg, fields);
    }

    #[track_caller]
    fn infof(&self, args: fmt::Arguments<'_>) {
        self.info_logger.infof(args);
    }

    #[track_caller]
    fn infow(&self, msg: &str, key_values: &[Arg]) {
        self.info_logger.infow(msg, key_values);
    }

    #[inline]
    fn enabled(&self) -> bool {
        self.info_logger.enabled()
    }
}

impl Logger for StructuredLogger {
    #[track_caller]
    fn debug(&self, msg: &str, fields: &[Field]) {
        self.sugar.log(LogLevel::Debug.severity(), msg, fields);
    }

    #[track_caller]
    fn debugf(&self, args: fmt::Arguments<'_>) {
        self.sugar.logf(LogLevel::Debug.severity(), args);
    }

    #[track_caller]
    fn debugw(&self, msg: &str, key_values: &[Arg]) {
        self.sugar.logw(LogLevel::Debug.severity(), msg, key_values);
    }

    #[track_caller]
    fn warn(&self, msg: &str, fields: &[Field]) {
        self.sugar.log(LogLevel::Warn.severity(), msg, fields);
    }

    #[track_caller]
    fn warnf(&self, args: fmt::Arguments<'_>) {
        self.sugar.logf(LogLevel::Warn.severity(), args);
    }

    #[track_caller]
    fn warnw(&self, msg: &str, key_values: &[Arg]) {
        self.sugar.logw(LogLevel::Warn.severity(), msg, key_values);
    }

    #[track_caller]
    fn error(&self, msg: &str, fields: &[Field]) {
        self.sugar.log(LogLevel::Error.severity(), msg, fields);
    }

    #[track_caller]
    fn errorf(&self, args: fmt::Arguments<'_>) {
        self.sugar.logf(LogLevel::Error.severity(), args);
    }

    #[track_caller]
    fn errorw(&self, msg: &str, key_values: &[Arg]) {
        self.sugar.logw(LogLevel::Error.severity(), msg, key_values);
    }

    #[track_caller]
    fn panic(&self, msg: &str, fields: &[Field]) {
        self.sugar.log(LogLevel::Panic.severity(), msg, fields);
    }

    #[track_caller]
    fn panicf(&self, args: fmt::Arguments<'_>) {
        self.sugar.logf(LogLevel::Panic.severity(), args);
    }

    #[track_caller]
    fn panicw(&self, msg: &str, key_values: &[Arg]) {
        self.sugar.logw(LogLevel::Panic.severity(), msg, key_values);
    }

    #[track_caller]
    fn fatal(&self, msg: &str, fields: &[Field]) {
        self.sugar.log(LogLevel::Fatal.severity(), msg, fields);
    }

    #[track_caller]
    fn fatalf(&self, args: fmt::Arguments<'_>) {
        self.sugar.logf(LogLevel::Fatal.severity(), args);
    }

    #[track_caller]
    fn fatalw(&self, msg: &str, key_values: &[Arg]) {
        self.sugar.logw(LogLevel::Fatal.severity(), msg, key_values);
    }

    fn v(&self, level: u32) -> Arc<dyn InfoLogger> {
        let severity = Severity::verbosity(level);
        if !self.backend.core().enabled(severity) {
            return Arc::clone(&NOOP_INFO_LOGGER);
        }
        Arc::new(VerboseInfoLogger::new(self.backend.clone(), severity))
    }

    #[track_caller]
    fn write(&self, p: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(p);
        let msg = text.strip_suffix('\n').unwrap_or(&text);
        self.sugar.log(LogLevel::Info.severity(), msg, &[]);
        Ok(p.len())
    }

    #[track_caller]
    fn with_values(&self, key_values: &[Arg]) -> SharedLogger {
        let fields = normalize_key_values(&self.backend, key_values, Vec::new());
        self.derive(self.backend.with(&fields))
    }

    fn with_name(&self, name: &str) -> SharedLogger {
        self.derive(self.backend.named(name))
    }

    fn with_context(&self, ctx: &Context) -> Context {
        ctx.with_logger(Arc::new(self.clone()))
    }

    fn l(&self, ctx: &Context) -> SharedLogger {
        Arc::new(self.l_with(ctx))
    }

    fn flush(&self) {
        if let Err(e) = self.backend.sync() {
            eprintln!("[LOGGER ERROR] Failed to flush: {}", e);
        }
    }
}

impl io::Write for StructuredLogger {
    #[track_caller]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Logger::write(&*self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.backend.sync().map_err(io::Error::other)
    }
}
