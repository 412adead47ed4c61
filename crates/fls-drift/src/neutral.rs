//! The drift-free baseline.

use fls_core::{LogicalClock, UnitId};

use crate::DriftPolicy;

/// Every unit advances exactly one frame per tick, so logical clocks track
/// the nominal frame counter.
#[derive(Copy, Clone, Debug, Default)]
pub struct NeutralDrift;

impl DriftPolicy for NeutralDrift {
    #[inline]
    fn advance(&self, _unit: UnitId, clock: &mut LogicalClock) {
        clock.count_tick();
        clock.advance_by(1.0);
    }

    fn name(&self) -> &'static str {
        "neutral"
    }
}
