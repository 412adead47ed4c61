//! End-of-run aggregates.

use serde::Serialize;

use fls_core::{Frame, SegmentId, UnitId};
use fls_motion::UnitStore;

use crate::UnitTickRecord;

/// Where and by whom a velocity maximum was reached.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct VelocityPeak {
    pub velocity: f64,
    pub frame:    Frame,
    pub segment:  SegmentId,
    pub unit:     UnitId,
}

/// The largest straight-line jump between consecutive ticks.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct StepPeak {
    pub displacement: f64,
    pub frame:        Frame,
    pub segment:      SegmentId,
    pub unit:         UnitId,
}

/// Per-unit totals.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UnitSummary {
    pub unit: UnitId,
    /// `None` if the unit never moved.
    pub max_velocity: Option<VelocityPeak>,
    /// Distance along the nominal frame timeline.
    pub total_distance: f64,
    /// Distance along the unit's own logical clock.
    pub total_distance_traveled: f64,
}

/// The result of a complete run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SwarmReport {
    /// Name of the drift policy that drove the clocks.
    pub policy:               String,
    pub frame_rate:           f64,
    pub segments:             usize,
    /// Driver ticks processed, placement ticks included.
    pub ticks:                u64,
    pub overall_max_velocity: Option<VelocityPeak>,
    pub longest_step:         Option<StepPeak>,
    /// Sum of every unit's `total_distance_traveled`.
    pub total_path_length:    f64,
    pub units:                Vec<UnitSummary>,
}

impl SwarmReport {
    pub fn unit(&self, unit: UnitId) -> Option<&UnitSummary> {
        self.units.get(unit.index())
    }
}

/// Folds tick records into maxima.
///
/// Records must arrive in canonical (segment, tick, unit) order; a later
/// record only replaces a maximum if it is strictly larger, so ties keep the
/// earliest occurrence.  Zero-valued records (placement ticks, units that
/// never move) leave a maximum unset.
#[derive(Clone, Debug, Default)]
pub struct ReportBuilder {
    unit_peaks:   Vec<Option<VelocityPeak>>,
    overall:      Option<VelocityPeak>,
    longest_step: Option<StepPeak>,
    segments:     usize,
    ticks:        u64,
}

impl ReportBuilder {
    pub fn new(unit_count: usize) -> Self {
        Self { unit_peaks: vec![None; unit_count], ..Self::default() }
    }

    pub fn segment_done(&mut self) {
        self.segments += 1;
    }

    pub fn tick_done(&mut self) {
        self.ticks += 1;
    }

    pub fn record(&mut self, r: &UnitTickRecord) {
        let peak = VelocityPeak {
            velocity: r.velocity,
            frame:    r.frame,
            segment:  r.segment,
            unit:     r.unit,
        };
        if let Some(slot) = self.unit_peaks.get_mut(r.unit.index()) {
            raise(slot, peak, |p| p.velocity);
        }
        raise(&mut self.overall, peak, |p| p.velocity);

        let step = StepPeak {
            displacement: r.displacement,
            frame:        r.frame,
            segment:      r.segment,
            unit:         r.unit,
        };
        raise(&mut self.longest_step, step, |p| p.displacement);
    }

    /// Combine the maxima with the distances held in `units`.
    pub fn finish(&self, units: &UnitStore, policy: &str, frame_rate: f64) -> SwarmReport {
        let summaries: Vec<UnitSummary> = units
            .iter()
            .map(|s| UnitSummary {
                unit:                    s.unit,
                max_velocity:            self.unit_peaks.get(s.unit.index()).copied().flatten(),
                total_distance:          s.total_distance,
                total_distance_traveled: s.total_distance_traveled,
            })
            .collect();

        SwarmReport {
            policy:               policy.to_owned(),
            frame_rate,
            segments:             self.segments,
            ticks:                self.ticks,
            overall_max_velocity: self.overall,
            longest_step:         self.longest_step,
            total_path_length:    summaries.iter().map(|u| u.total_distance_traveled).sum(),
            units:                summaries,
        }
    }
}

/// Maxima start at zero: a record only lands in an empty slot if its key is
/// positive.
fn raise<T: Copy>(slot: &mut Option<T>, candidate: T, key: impl Fn(&T) -> f64) {
    let current = slot.as_ref().map_or(0.0, &key);
    if key(&candidate) > current {
        *slot = Some(candidate);
    }
}
