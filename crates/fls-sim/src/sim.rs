//! The `Sim` struct and its segment loop.

use tracing::{debug, info, trace, warn};

use fls_core::{CoreError, Frame, SegmentId, SwarmConfig};
use fls_curve::Timeline;
use fls_drift::DriftPolicy;
use fls_motion::{FrameStep, Kinematics, MotionResult, OffsetTable, UnitRunState, UnitStore};

use crate::{ReportBuilder, SimError, SimResult, SwarmObserver, SwarmReport, UnitTickRecord};

// ── Per-unit tick outcome ─────────────────────────────────────────────────────

/// What one unit produced in the (potentially parallel) update phase.
struct UnitOutcome {
    step:            FrameStep,
    local_clock:     f64,
    displacement:    f64,
    /// The clock hit the segment end on this tick.
    newly_saturated: bool,
}

/// Everything the update phase reads, bundled so it can cross into worker
/// threads as one `Sync` borrow.
struct TickInputs<'a, P: DriftPolicy> {
    policy:     &'a P,
    kinematics: Kinematics<'a>,
    offsets:    &'a OffsetTable,
    start:      Frame,
    end:        Frame,
    nominal:    Frame,
    tick:       u64,
    #[cfg(feature = "parallel")]
    pool:       Option<&'a rayon::ThreadPool>,
}

impl<P: DriftPolicy> TickInputs<'_, P> {
    fn update(&self, state: &mut UnitRunState) -> MotionResult<UnitOutcome> {
        let mut newly_saturated = false;
        if self.tick > 0 {
            self.policy.advance(state.unit, &mut state.clock);
            let was_below = state.clock.prev < self.end.as_param();
            newly_saturated = state.clock.saturate_at(self.end) && was_below;
        }

        let previous = state.current_position;
        let step = state.update_position(&self.kinematics, self.offsets, self.start, self.nominal)?;
        let displacement = previous.map_or(0.0, |p| fls_core::geo::distance(&p, &step.position));

        Ok(UnitOutcome { step, local_clock: state.clock.local, displacement, newly_saturated })
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The swarm driver.
///
/// `Sim<P>` owns the timeline, the offsets, and the unit arena, and walks
/// every segment in ascending start-frame order:
///
/// 1. **Entry**: every clock is reset to the segment's start frame and every
///    position forgotten; accumulated distances carry over.
/// 2. **Placement** (tick 0): each unit is positioned with frame length 0.
/// 3. **Ticks** `1..=end − start`: each clock advances per the drift policy,
///    clamped to the segment end, then the unit's position and distances are
///    updated (optionally in parallel with the `parallel` feature).
/// 4. **Reduce** (sequential, ascending `UnitId`): velocity is
///    `frame_length × frame_rate`; per-unit and swarm maxima are updated and
///    the observer sees each record.
///
/// Any curve, integration, or offset error aborts the run.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<P: DriftPolicy> {
    pub config:   SwarmConfig,
    pub timeline: Timeline,
    pub offsets:  OffsetTable,

    /// Per-unit clocks, positions, and distances.
    pub units: UnitStore,

    /// Applied to every unit on every tick after placement.
    pub policy: P,

    /// Maxima accumulated so far.
    pub report: ReportBuilder,

    #[cfg(feature = "parallel")]
    pub(crate) pool: Option<rayon::ThreadPool>,
}

impl<P: DriftPolicy> Sim<P> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run every segment from scratch and return the report.
    ///
    /// Unit state and maxima are reset first, so repeated calls give the same
    /// result.
    pub fn run<O: SwarmObserver>(&mut self, observer: &mut O) -> SimResult<SwarmReport> {
        self.units = UnitStore::new(self.units.len());
        self.report = ReportBuilder::new(self.units.len());

        let ids: Vec<SegmentId> = self.timeline.iter().map(|(id, _)| id).collect();
        for id in ids {
            self.run_segment(id, observer)?;
        }

        let report = self.snapshot();
        info!(
            policy = %report.policy,
            segments = report.segments,
            ticks = report.ticks,
            units = report.units.len(),
            max_velocity = report.overall_max_velocity.map_or(0.0, |p| p.velocity),
            total_path_length = report.total_path_length,
            "swarm run complete"
        );
        observer.on_run_end(&report);
        Ok(report)
    }

    /// Process one segment, accumulating into the current run.
    ///
    /// Useful for tests and incremental stepping; [`run`](Self::run) calls
    /// this for every segment in order.
    pub fn run_segment<O: SwarmObserver>(
        &mut self,
        id:       SegmentId,
        observer: &mut O,
    ) -> SimResult<()> {
        let segment = self.timeline.get(id).ok_or(CoreError::SegmentNotFound(id))?;
        let (start, end) = (segment.start_frame(), segment.end_frame());
        let kinematics = Kinematics::from_config(segment, &self.config);
        let frame_rate = self.config.frame_rate;
        let interval = self.config.output_interval_ticks;

        debug!(
            segment = segment.name(),
            %start,
            %end,
            units = self.units.len(),
            policy = self.policy.name(),
            "entering segment"
        );
        observer.on_segment_start(id, segment);
        self.units.enter_segment(start);

        let mut saturated = 0usize;
        for tick in 0..=segment.frame_count() {
            let nominal = start + tick;
            let inputs = TickInputs {
                policy: &self.policy,
                kinematics,
                offsets: &self.offsets,
                start,
                end,
                nominal,
                tick,
                #[cfg(feature = "parallel")]
                pool: self.pool.as_ref(),
            };

            // ── Update phase ──────────────────────────────────────────────
            let outcomes = update_all(&inputs, self.units.states_mut()).map_err(
                |(unit, source)| SimError::Unit {
                    segment: segment.name().to_owned(),
                    frame: nominal,
                    unit,
                    source,
                },
            )?;

            // ── Reduce phase (ascending UnitId) ───────────────────────────
            let emit = interval > 0 && tick % interval == 0;
            for (state, outcome) in self.units.iter().zip(&outcomes) {
                let record = UnitTickRecord {
                    segment:        id,
                    tick,
                    frame:          nominal,
                    unit:           state.unit,
                    local_clock:    outcome.local_clock,
                    position:       outcome.step.position,
                    frame_length:   outcome.step.frame_length,
                    nominal_length: outcome.step.nominal_length,
                    displacement:   outcome.displacement,
                    velocity:       outcome.step.frame_length * frame_rate,
                };
                self.report.record(&record);
                if emit {
                    observer.on_tick(&record);
                }
                saturated += usize::from(outcome.newly_saturated);
            }
            self.report.tick_done();
            trace!(segment = segment.name(), tick, %nominal, "tick complete");
        }

        if saturated > 0 {
            warn!(
                segment = segment.name(),
                units = saturated,
                %end,
                "logical clocks reached the segment end early and were held there"
            );
        }
        self.report.segment_done();
        observer.on_segment_end(id, &self.units);
        Ok(())
    }

    /// The report as of the last processed segment.
    pub fn snapshot(&self) -> SwarmReport {
        self.report.finish(&self.units, self.policy.name(), self.config.frame_rate)
    }
}

// ── Update phase ──────────────────────────────────────────────────────────────

/// Update every unit for one tick.  On failure, reports the lowest failing
/// unit id so the error does not depend on thread scheduling.
#[cfg(not(feature = "parallel"))]
fn update_all<P: DriftPolicy>(
    inputs: &TickInputs<'_, P>,
    states: &mut [UnitRunState],
) -> Result<Vec<UnitOutcome>, (fls_core::UnitId, fls_motion::MotionError)> {
    states
        .iter_mut()
        .map(|state| {
            let unit = state.unit;
            inputs.update(state).map_err(|e| (unit, e))
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn update_all<P: DriftPolicy>(
    inputs: &TickInputs<'_, P>,
    states: &mut [UnitRunState],
) -> Result<Vec<UnitOutcome>, (fls_core::UnitId, fls_motion::MotionError)> {
    use rayon::prelude::*;

    let compute = |states: &mut [UnitRunState]| -> Vec<_> {
        states
            .par_iter_mut()
            .map(|state| {
                let unit = state.unit;
                inputs.update(state).map_err(|e| (unit, e))
            })
            .collect()
    };
    let results = match inputs.pool {
        Some(pool) => pool.install(|| compute(states)),
        None => compute(states),
    };
    // Sequential collect: the first error in id order wins.
    results.into_iter().collect()
}
