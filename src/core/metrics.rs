//! Backend metrics for observability
//!
//! Counters for monitoring the logging pipeline itself: records written,
//! sink failures, and misuse diagnostics raised by loose key-value calls.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for backend observability
///
/// # Example
///
/// ```
/// use rust_structured_logger::core::BackendMetrics;
///
/// let metrics = BackendMetrics::new();
/// metrics.record_written();
/// metrics.record_write_error();
///
/// assert_eq!(metrics.records_written(), 1);
/// assert_eq!(metrics.write_errors(), 1);
/// ```
#[derive(Debug, Default)]
pub struct BackendMetrics {
    /// Records that reached the sink stage
    records_written: AtomicU64,

    /// Failed sink writes or syncs
    write_errors: AtomicU64,

    /// Loose key-value misuse reports
    misuse_reports: AtomicU64,
}

impl BackendMetrics {
    pub const fn new() -> Self {
        Self {
            records_written: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
            misuse_reports: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_errors(&self) -> u64 {
        self.write_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn misuse_reports(&self) -> u64 {
        self.misuse_reports.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) {
        self.records_written.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the previous error count
    #[inline]
    pub fn record_write_error(&self) -> u64 {
        self.write_errors.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_misuse(&self) {
        self.misuse_reports.fetch_add(1, Ordering::Relaxed);
    }
}
