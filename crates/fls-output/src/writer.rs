//! The `OutputWriter` trait implemented by all backend writers.

use fls_sim::SwarmReport;

use crate::{OutputResult, UnitTickRow};

/// Trait implemented by output backends.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored internally and retrieved with
/// [`SwarmOutputObserver::take_error`](crate::SwarmOutputObserver::take_error).
pub trait OutputWriter {
    /// Write a batch of per-tick rows.
    fn write_ticks(&mut self, rows: &[UnitTickRow]) -> OutputResult<()>;

    /// Write the end-of-run report.
    fn write_report(&mut self, report: &SwarmReport) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
