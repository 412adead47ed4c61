//! `SwarmOutputObserver<W>` — bridges `SwarmObserver` to an `OutputWriter`.

use fls_core::SegmentId;
use fls_motion::UnitStore;
use fls_sim::{SwarmObserver, SwarmReport, UnitTickRecord};

use crate::row::UnitTickRow;
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// Rows buffered before a batch is handed to the writer.
const BATCH_ROWS: usize = 4096;

/// A [`SwarmObserver`] that writes tick rows and the final report to any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SwarmObserver`
/// methods have no return value.  After `sim.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct SwarmOutputObserver<W: OutputWriter> {
    writer:     W,
    pending:    Vec<UnitTickRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SwarmOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, pending: Vec::with_capacity(BATCH_ROWS), last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let result = self.writer.write_ticks(&self.pending);
        self.pending.clear();
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SwarmObserver for SwarmOutputObserver<W> {
    fn on_tick(&mut self, record: &UnitTickRecord) {
        self.pending.push(UnitTickRow::from(record));
        if self.pending.len() >= BATCH_ROWS {
            self.flush_pending();
        }
    }

    fn on_segment_end(&mut self, _id: SegmentId, _units: &UnitStore) {
        self.flush_pending();
    }

    fn on_run_end(&mut self, report: &SwarmReport) {
        self.flush_pending();
        let result = self.writer.write_report(report);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
