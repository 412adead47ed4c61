//! Per-unit run state.

use fls_core::{Frame, LogicalClock, Position, UnitId};

use crate::{Kinematics, MotionResult, OffsetTable};

/// Whether a unit has been placed in the current segment yet.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum UnitPhase {
    /// Entered the segment but not yet positioned.
    #[default]
    Uninitialized,
    /// Has a current position; subsequent updates integrate distance.
    Positioned,
}

/// What one [`UnitRunState::update_position`] call produced.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameStep {
    pub position:       Position,
    /// Distance covered on the unit's own clock this tick.
    pub frame_length:   f64,
    /// Distance a drift-free unit would have covered this tick.
    pub nominal_length: f64,
}

/// Everything the driver tracks for one unit.
///
/// The phase is derived from `current_position`: `None` means
/// [`UnitPhase::Uninitialized`].
#[derive(Clone, Debug, PartialEq)]
pub struct UnitRunState {
    pub unit:  UnitId,
    pub clock: LogicalClock,

    /// World position after the most recent update; `None` until the unit
    /// is placed in the current segment.
    pub current_position: Option<Position>,

    /// Distance accumulated along the nominal frame timeline, across all
    /// segments.
    pub total_distance: f64,

    /// Distance accumulated along the unit's logical clock, across all
    /// segments.
    pub total_distance_traveled: f64,
}

impl UnitRunState {
    pub fn new(unit: UnitId) -> Self {
        Self {
            unit,
            clock:                   LogicalClock::at(Frame(0)),
            current_position:        None,
            total_distance:          0.0,
            total_distance_traveled: 0.0,
        }
    }

    #[inline]
    pub fn phase(&self) -> UnitPhase {
        match self.current_position {
            Some(_) => UnitPhase::Positioned,
            None => UnitPhase::Uninitialized,
        }
    }

    /// Segment entry: park the clock at `start` and forget the position.
    /// Accumulated distances carry over.
    pub fn enter_segment(&mut self, start: Frame) {
        self.clock.reset(start);
        self.current_position = None;
    }

    /// Recompute the unit's position at its current clock value and
    /// accumulate the distance covered since the previous update.
    ///
    /// `nominal` is the driver's frame for this tick; it determines the
    /// drift-free step added to `total_distance`.
    ///
    /// # Errors
    ///
    /// [`MotionError::MissingOffset`](crate::MotionError::MissingOffset) if
    /// the table has no offset for this unit and segment; otherwise any
    /// curve or integration error.
    pub fn update_position(
        &mut self,
        kinematics:    &Kinematics<'_>,
        offsets:       &OffsetTable,
        segment_start: Frame,
        nominal:       Frame,
    ) -> MotionResult<FrameStep> {
        let offset = offsets.get(segment_start, self.unit)?;
        let t = self.clock.local;
        let position = kinematics.position(offset, t)?;

        let (frame_length, nominal_length) = match self.phase() {
            UnitPhase::Uninitialized => (0.0, 0.0),
            UnitPhase::Positioned => {
                let prev = self.clock.prev;
                let frame_length = if t == segment_start.as_param() {
                    0.0
                } else {
                    kinematics.arc_length(offset, prev, t)?
                };

                let (lo, hi) = ((nominal.0 - 1).max(segment_start.0), nominal.0);
                let nominal_length = if lo >= hi {
                    0.0
                } else if prev == lo as f64 && t == hi as f64 {
                    // Drift-free tick: same interval as above.
                    frame_length
                } else {
                    kinematics.arc_length(offset, lo as f64, hi as f64)?
                };
                (frame_length, nominal_length)
            }
        };

        self.total_distance_traveled += frame_length;
        self.total_distance += nominal_length;
        self.current_position = Some(position);

        Ok(FrameStep { position, frame_length, nominal_length })
    }
}
