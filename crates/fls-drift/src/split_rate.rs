//! Error model 1: the swarm splits into a fast half and a slow half.

use fls_core::{LogicalClock, UnitId};

use crate::DriftPolicy;

/// Odd units advance two frames every tick.  Even units advance one frame
/// on every second tick and hold on the others.
///
/// After `N` ticks from frame `s`, odd clocks read `s + 2N` and even clocks
/// `s + floor(N / 2)`.
#[derive(Copy, Clone, Debug, Default)]
pub struct SplitRateDrift;

impl DriftPolicy for SplitRateDrift {
    #[inline]
    fn advance(&self, unit: UnitId, clock: &mut LogicalClock) {
        let ticks = clock.count_tick();
        if unit.is_odd() {
            clock.advance_by(2.0);
        } else if ticks % 2 == 0 {
            clock.advance_by(1.0);
        } else {
            clock.hold();
        }
    }

    fn name(&self) -> &'static str {
        "split_rate"
    }
}
