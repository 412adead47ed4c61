//! The per-unit, per-tick output record.

use fls_core::{Frame, Position, SegmentId, UnitId};

/// One unit's result for one driver tick.
///
/// Passed to [`SwarmObserver::on_tick`](crate::SwarmObserver::on_tick);
/// output crates flatten it into their own row types.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitTickRecord {
    pub segment:        SegmentId,
    /// Tick index within the segment; 0 is the placement tick.
    pub tick:           u64,
    /// Nominal driver frame, `segment start + tick`.
    pub frame:          Frame,
    pub unit:           UnitId,
    /// The unit's logical clock after this tick's advance.
    pub local_clock:    f64,
    pub position:       Position,
    /// Arc length covered on the unit's own clock this tick.
    pub frame_length:   f64,
    /// Arc length a drift-free unit would have covered this tick.
    pub nominal_length: f64,
    /// Straight-line distance from the previous tick's position.
    pub displacement:   f64,
    /// `frame_length × frame_rate`.
    pub velocity:       f64,
}
