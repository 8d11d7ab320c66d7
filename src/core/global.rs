//! Process-wide logger
//!
//! One [`StructuredLogger`] is active at a time. It is created lazily from
//! [`Options::default`] and replaced with [`init_global_logger`] or
//! [`replace`]. Readers never block: each call loads whichever instance is
//! active at that moment, so a call racing a replacement may still go to the
//! previous logger. Handles obtained earlier keep their own backend.

use super::{
    context::Context,
    error::Result,
    field::Field,
    key_values::Arg,
    logger::{InfoLogger, Logger, SharedLogger, StructuredLogger},
    options::Options,
};
use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::fmt;
use std::io;
use std::sync::Arc;

static GLOBAL_LOGGER: Lazy<ArcSwap<StructuredLogger>> = Lazy::new(|| {
    let logger = StructuredLogger::new(&Options::default()).unwrap_or_else(|e| {
        eprintln!("[LOGGER ERROR] Failed to build default logger: {}", e);
        StructuredLogger::disabled()
    });
    ArcSwap::from_pointee(logger)
});

/// Serializes replacements; readers never take it.
static INIT_LOCK: Mutex<()> = parking_lot::const_mutex(());

/// Build a logger from `opts` and make it the process-wide logger.
///
/// On error the active logger is left in place.
pub fn init_global_logger(opts: &Options) -> Result<()> {
    let _guard = INIT_LOCK.lock();
    let logger = StructuredLogger::new(opts)?;
    GLOBAL_LOGGER.store(Arc::new(logger));
    Ok(())
}

/// Install an already built logger as the process-wide logger.
pub fn replace(logger: StructuredLogger) {
    let _guard = INIT_LOCK.lock();
    GLOBAL_LOGGER.store(Arc::new(logger));
}

/// The active process-wide logger.
#[inline]
pub fn global() -> Arc<StructuredLogger> {
    GLOBAL_LOGGER.load_full()
}

macro_rules! forward_fields {
    ($($name:ident),* $(,)?) => {
        $(
            #[track_caller]
            pub fn $name(msg: &str, fields: &[Field]) {
                GLOBAL_LOGGER.load().$name(msg, fields);
            }
        )*
    };
}

macro_rules! forward_fmt {
    ($($name:ident),* $(,)?) => {
        $(
            #[track_caller]
            pub fn $name(args: fmt::Arguments<'_>) {
                GLOBAL_LOGGER.load().$name(args);
            }
        )*
    };
}

macro_rules! forward_pairs {
    ($($name:ident),* $(,)?) => {
        $(
            #[track_caller]
            pub fn $name(msg: &str, key_values: &[Arg]) {
                GLOBAL_LOGGER.load().$name(msg, key_values);
            }
        )*
    };
}

forward_fields!(debug, info, warn, error, panic, fatal);
forward_fmt!(debugf, infof, warnf, errorf, panicf, fatalf);
forward_pairs!(debugw, infow, warnw, errorw, panicw, fatalw);

pub fn v(level: u32) -> Arc<dyn InfoLogger> {
    GLOBAL_LOGGER.load().v(level)
}

#[track_caller]
pub fn with_values(key_values: &[Arg]) -> SharedLogger {
    GLOBAL_LOGGER.load().with_values(key_values)
}

pub fn with_name(name: &str) -> SharedLogger {
    GLOBAL_LOGGER.load().with_name(name)
}

pub fn with_context(ctx: &Context) -> Context {
    GLOBAL_LOGGER.load().with_context(ctx)
}

pub fn l(ctx: &Context) -> SharedLogger {
    GLOBAL_LOGGER.load().l(ctx)
}

pub fn flush() {
    GLOBAL_LOGGER.load().flush();
}

#[track_caller]
pub fn write(p: &[u8]) -> io::Result<usize> {
    Logger::write(&**GLOBAL_LOGGER.load(), p)
}
