//! Swarm observer trait for progress reporting and data collection.

use fls_core::SegmentId;
use fls_curve::CurveSegment;
use fls_motion::UnitStore;

use crate::{SwarmReport, UnitTickRecord};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] as the run proceeds.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — segment progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl SwarmObserver for Progress {
///     fn on_segment_start(&mut self, id: SegmentId, segment: &CurveSegment) {
///         println!("{id}: {} ({} frames)", segment.name(), segment.frame_count());
///     }
/// }
/// ```
pub trait SwarmObserver {
    /// Called on entry to each segment, before the placement tick.
    fn on_segment_start(&mut self, _id: SegmentId, _segment: &CurveSegment) {}

    /// Called for every unit on every emitted tick (every
    /// `config.output_interval_ticks` ticks), in ascending unit order.
    fn on_tick(&mut self, _record: &UnitTickRecord) {}

    /// Called after the last tick of each segment with the full unit state.
    fn on_segment_end(&mut self, _id: SegmentId, _units: &UnitStore) {}

    /// Called once with the finished report.
    fn on_run_end(&mut self, _report: &SwarmReport) {}
}

/// A [`SwarmObserver`] that does nothing.
pub struct NoopObserver;

impl SwarmObserver for NoopObserver {}
