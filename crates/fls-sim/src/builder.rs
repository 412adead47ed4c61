//! Fluent builder for constructing a [`Sim`].

use fls_core::SwarmConfig;
use fls_curve::Timeline;
use fls_drift::{DriftPolicy, policy_for};
use fls_motion::{OffsetTable, UnitStore};

use crate::{ReportBuilder, Sim, SimError, SimResult};

/// Fluent builder for [`Sim<P>`].
///
/// # Required inputs
///
/// - [`SwarmConfig`] — frame rate, drift model, integrator tolerances, …
/// - [`Timeline`] — the keyframe segments, from [`fls_curve::load_timeline_json`]
/// - [`OffsetTable`] — per-segment base offsets, from
///   [`fls_motion::load_offsets_json`]
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                                       |
/// |---------------------|-----------------------------------------------|
/// | `.unit_count(n)`    | Largest layout in the offset table            |
/// | `.policy(p)`        | Built-in policy for `config.drift`            |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, timeline, offsets)
///     .unit_count(2)
///     .build()?;
/// let report = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<P: DriftPolicy = Box<dyn DriftPolicy>> {
    config:     SwarmConfig,
    timeline:   Timeline,
    offsets:    OffsetTable,
    unit_count: Option<usize>,
    policy:     P,
}

impl SimBuilder {
    /// Create a builder whose drift policy follows `config.drift`.
    pub fn new(config: SwarmConfig, timeline: Timeline, offsets: OffsetTable) -> Self {
        let policy = policy_for(config.drift);
        Self { config, timeline, offsets, unit_count: None, policy }
    }
}

impl<P: DriftPolicy> SimBuilder<P> {
    /// Replace the drift policy (e.g. with a custom error model).
    pub fn policy<Q: DriftPolicy>(self, policy: Q) -> SimBuilder<Q> {
        SimBuilder {
            config:     self.config,
            timeline:   self.timeline,
            offsets:    self.offsets,
            unit_count: self.unit_count,
            policy,
        }
    }

    /// Fix the swarm size instead of inferring it from the offset table.
    pub fn unit_count(mut self, n: usize) -> Self {
        self.unit_count = Some(n);
        self
    }

    /// Validate inputs and return a ready-to-run [`Sim`].
    ///
    /// # Errors
    ///
    /// - [`SimError::Core`] for an invalid configuration
    /// - [`SimError::EmptyTimeline`] / [`SimError::NoUnits`]
    /// - [`SimError::Offsets`] if any unit lacks an offset for any segment
    pub fn build(self) -> SimResult<Sim<P>> {
        self.config.validate()?;

        if self.timeline.is_empty() {
            return Err(SimError::EmptyTimeline);
        }
        let unit_count = self.unit_count.unwrap_or_else(|| self.offsets.max_unit_count());
        if unit_count == 0 {
            return Err(SimError::NoUnits);
        }

        let starts = self.timeline.segments().iter().map(|s| s.start_frame());
        self.offsets
            .check_complete(starts, unit_count)
            .map_err(SimError::Offsets)?;

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SimError::ThreadPool(e.to_string()))?,
            ),
            None => None,
        };

        Ok(Sim {
            config:   self.config,
            timeline: self.timeline,
            offsets:  self.offsets,
            units:    UnitStore::new(unit_count),
            policy:   self.policy,
            report:   ReportBuilder::new(unit_count),
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}
