//! The `DriftPolicy` trait.

use fls_core::{DriftModel, LogicalClock, UnitId};

use crate::{NeutralDrift, SplitRateDrift};

/// A rule for advancing a unit's logical clock once per driver tick.
///
/// Implementations must refresh `clock.prev` on every call, including ticks
/// on which the clock does not move ([`LogicalClock::hold`]), so that
/// `[prev, local]` is always the interval the tick covered.
///
/// # Example
///
/// ```rust,ignore
/// /// Every unit runs 10% fast.
/// struct Fast;
///
/// impl DriftPolicy for Fast {
///     fn advance(&self, _unit: UnitId, clock: &mut LogicalClock) {
///         clock.count_tick();
///         clock.advance_by(1.1);
///     }
/// }
/// ```
pub trait DriftPolicy: Send + Sync + 'static {
    /// Advance `clock` by one driver tick.
    fn advance(&self, unit: UnitId, clock: &mut LogicalClock);

    /// Short name for logs and reports.
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<P: DriftPolicy + ?Sized> DriftPolicy for Box<P> {
    #[inline]
    fn advance(&self, unit: UnitId, clock: &mut LogicalClock) {
        (**self).advance(unit, clock)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// The built-in policy selected by `model`.
pub fn policy_for(model: DriftModel) -> Box<dyn DriftPolicy> {
    match model {
        DriftModel::Neutral => Box::new(NeutralDrift),
        DriftModel::SplitRate => Box::new(SplitRateDrift),
    }
}
