//! Integration tests for fls-sim.

use fls_core::{DriftModel, Frame, Position, SegmentId, SwarmConfig, UnitId};
use fls_curve::{CurveSegment, Timeline};
use fls_motion::{OffsetTable, UnitStore};

use crate::{NoopObserver, SimBuilder, SwarmObserver, SwarmReport, UnitTickRecord};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn config(drift: DriftModel) -> SwarmConfig {
    SwarmConfig { drift, num_threads: Some(1), ..SwarmConfig::default() }
}

/// `B_X = <x>` over `[start, end]`, identity rotation and scale.
fn line(name: &str, start: i64, end: i64, x: &str) -> CurveSegment {
    CurveSegment::compile(
        name,
        Frame(start),
        Frame(end),
        [[x, "0", "0"], ["0", "0", "0"], ["1", "1", "1"]],
    )
    .unwrap()
}

fn straight_timeline() -> Timeline {
    Timeline::new(vec![line("Keyframe 1 to Keyframe 2", 1, 42, "t")]).unwrap()
}

/// A quarter turn about z over `[1, 42]` with no translation: a unit at the
/// origin never moves, any other unit sweeps an arc.
fn spin_timeline() -> Timeline {
    let seg = CurveSegment::compile(
        "spin",
        Frame(1),
        Frame(42),
        [["0", "0", "0"], ["0", "0", "(t - 1) * 90 / 41"], ["1", "1", "1"]],
    )
    .unwrap();
    Timeline::new(vec![seg]).unwrap()
}

fn origins(n: usize) -> OffsetTable {
    OffsetTable::uniform(vec![Position::zeros(); n])
}

#[derive(Default)]
struct Recorder {
    records:        Vec<UnitTickRecord>,
    segment_starts: Vec<SegmentId>,
    segment_ends:   usize,
    run_ends:       usize,
}

impl SwarmObserver for Recorder {
    fn on_segment_start(&mut self, id: SegmentId, _segment: &CurveSegment) {
        self.segment_starts.push(id);
    }
    fn on_tick(&mut self, record: &UnitTickRecord) {
        self.records.push(record.clone());
    }
    fn on_segment_end(&mut self, _id: SegmentId, _units: &UnitStore) {
        self.segment_ends += 1;
    }
    fn on_run_end(&mut self, _report: &SwarmReport) {
        self.run_ends += 1;
    }
}

impl Recorder {
    fn at(&self, tick: u64, unit: UnitId) -> &UnitTickRecord {
        self.records
            .iter()
            .find(|r| r.tick == tick && r.unit == unit)
            .unwrap()
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::SimError;
    use fls_drift::DriftPolicy;
    use fls_motion::MotionError;

    #[test]
    fn infers_unit_count_from_offsets() {
        let sim = SimBuilder::new(config(DriftModel::Neutral), straight_timeline(), origins(3))
            .build()
            .unwrap();
        assert_eq!(sim.units.len(), 3);
        assert_eq!(sim.policy.name(), "neutral");
    }

    #[test]
    fn missing_offsets_rejected() {
        let err = SimBuilder::new(config(DriftModel::Neutral), straight_timeline(), origins(2))
            .unit_count(3)
            .build()
            .err()
            .unwrap();
        match err {
            SimError::Offsets(MotionError::MissingOffset { unit, segment_start }) => {
                assert_eq!(unit, UnitId(2));
                assert_eq!(segment_start, Frame(1));
            }
            other => panic!("expected Offsets, got {other:?}"),
        }
    }

    #[test]
    fn empty_timeline_rejected() {
        let timeline = Timeline::new(vec![]).unwrap();
        let err = SimBuilder::new(config(DriftModel::Neutral), timeline, origins(1))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::EmptyTimeline));
    }

    #[test]
    fn no_units_rejected() {
        let err = SimBuilder::new(config(DriftModel::Neutral), straight_timeline(), OffsetTable::new())
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::NoUnits));
    }

    #[test]
    fn invalid_config_rejected() {
        let bad = SwarmConfig { frame_rate: 0.0, ..SwarmConfig::default() };
        let err = SimBuilder::new(bad, straight_timeline(), origins(1))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::Core(_)));
    }
}

// ── Neutral policy ────────────────────────────────────────────────────────────

#[cfg(test)]
mod neutral_tests {
    use super::*;

    #[test]
    fn straight_line_velocity_and_distance() {
        let mut sim = SimBuilder::new(config(DriftModel::Neutral), straight_timeline(), origins(2))
            .build()
            .unwrap();
        let report = sim.run(&mut NoopObserver).unwrap();

        assert_eq!(report.segments, 1);
        assert_eq!(report.ticks, 42);
        let peak = report.overall_max_velocity.unwrap();
        assert!((peak.velocity - 24.0).abs() < 1e-5);
        for u in &report.units {
            assert!((u.total_distance_traveled - 41.0).abs() < 1e-5);
            assert_eq!(u.total_distance, u.total_distance_traveled);
        }
        assert!((report.total_path_length - 82.0).abs() < 1e-4);
    }

    #[test]
    fn clocks_track_nominal_frames() {
        let mut sim = SimBuilder::new(config(DriftModel::Neutral), straight_timeline(), origins(2))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        for r in &rec.records {
            assert_eq!(r.local_clock, r.frame.as_param());
        }
        assert_eq!(sim.units.get(UnitId(1)).unwrap().clock.local, 42.0);
    }

    #[test]
    fn placement_tick_has_zero_length() {
        let mut sim = SimBuilder::new(config(DriftModel::Neutral), straight_timeline(), origins(2))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        for unit in [UnitId(0), UnitId(1)] {
            let r = rec.at(0, unit);
            assert_eq!(r.frame, Frame(1));
            assert_eq!(r.frame_length, 0.0);
            assert_eq!(r.velocity, 0.0);
            assert_eq!(r.displacement, 0.0);
        }
        let r = rec.at(1, UnitId(0));
        assert!((r.displacement - 1.0).abs() < 1e-12);
    }

    #[test]
    fn stationary_units_have_no_peak() {
        let offsets = OffsetTable::uniform(vec![Position::zeros(), Position::new(0.0, 4.0, 0.0)]);
        let mut sim = SimBuilder::new(config(DriftModel::Neutral), spin_timeline(), offsets)
            .build()
            .unwrap();
        let report = sim.run(&mut NoopObserver).unwrap();

        let still = report.unit(UnitId(0)).unwrap();
        assert!(still.max_velocity.is_none());
        assert_eq!(still.total_distance_traveled, 0.0);

        let moving = report.unit(UnitId(1)).unwrap();
        let peak = moving.max_velocity.unwrap();
        assert!(peak.frame > Frame(1));
        assert_eq!(report.overall_max_velocity.unwrap().unit, UnitId(1));
        // Quarter circle of radius 4.
        let arc = std::f64::consts::FRAC_PI_2 * 4.0;
        assert!((moving.total_distance_traveled - arc).abs() < 1e-3);
    }

    #[test]
    fn motionless_swarm_reports_no_maxima() {
        let timeline = Timeline::new(vec![line("hold", 1, 10, "5")]).unwrap();
        let mut sim = SimBuilder::new(config(DriftModel::SplitRate), timeline, origins(2))
            .build()
            .unwrap();
        let report = sim.run(&mut NoopObserver).unwrap();

        assert!(report.overall_max_velocity.is_none());
        assert!(report.longest_step.is_none());
        assert!(report.units.iter().all(|u| u.max_velocity.is_none()));
        assert_eq!(report.total_path_length, 0.0);
    }

    #[test]
    fn repeated_runs_agree() {
        let mut sim = SimBuilder::new(config(DriftModel::Neutral), straight_timeline(), origins(2))
            .build()
            .unwrap();
        let a = sim.run(&mut NoopObserver).unwrap();
        let b = sim.run(&mut NoopObserver).unwrap();
        assert_eq!(a, b);
    }
}

// ── Split-rate drift ──────────────────────────────────────────────────────────

#[cfg(test)]
mod drift_tests {
    use super::*;

    #[test]
    fn two_unit_scenario() {
        let mut sim = SimBuilder::new(config(DriftModel::SplitRate), straight_timeline(), origins(2))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        let report = sim.run(&mut rec).unwrap();

        // After 10 ticks from frame 1.
        assert_eq!(rec.at(10, UnitId(0)).local_clock, 6.0);
        assert_eq!(rec.at(10, UnitId(1)).local_clock, 21.0);

        let slow = report.unit(UnitId(0)).unwrap();
        let fast = report.unit(UnitId(1)).unwrap();
        assert!((slow.total_distance_traveled - 20.0).abs() < 1e-5);
        assert!((fast.total_distance_traveled - 41.0).abs() < 1e-5);
        assert!(fast.total_distance_traveled > slow.total_distance_traveled);

        // Nominal distance ignores drift.
        assert!((slow.total_distance - 41.0).abs() < 1e-5);
        assert!((fast.total_distance - 41.0).abs() < 1e-5);
    }

    #[test]
    fn fast_clock_saturates_at_segment_end() {
        let mut sim = SimBuilder::new(config(DriftModel::SplitRate), straight_timeline(), origins(2))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        assert!(rec.records.iter().all(|r| r.local_clock <= 42.0));
        let after = rec.at(30, UnitId(1));
        assert_eq!(after.local_clock, 42.0);
        assert_eq!(after.frame_length, 0.0);
    }

    #[test]
    fn fast_unit_sets_the_swarm_peak() {
        let mut sim = SimBuilder::new(config(DriftModel::SplitRate), straight_timeline(), origins(2))
            .build()
            .unwrap();
        let report = sim.run(&mut NoopObserver).unwrap();

        let peak = report.overall_max_velocity.unwrap();
        assert_eq!(peak.unit, UnitId(1));
        assert!((peak.velocity - 48.0).abs() < 1e-4);
        assert!((report.longest_step.unwrap().displacement - 2.0).abs() < 1e-9);

        let slow = report.unit(UnitId(0)).unwrap().max_velocity.unwrap();
        assert!((slow.velocity - 24.0).abs() < 1e-4);
        assert!(slow.frame >= Frame(3));
    }
}

// ── Multi-segment timelines ───────────────────────────────────────────────────

#[cfg(test)]
mod segment_tests {
    use super::*;

    fn two_segments() -> Timeline {
        Timeline::new(vec![line("second", 11, 21, "2*t"), line("first", 1, 11, "t")]).unwrap()
    }

    #[test]
    fn segments_run_in_start_order_and_totals_carry() {
        let mut sim = SimBuilder::new(config(DriftModel::Neutral), two_segments(), origins(1))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        let report = sim.run(&mut rec).unwrap();

        assert_eq!(rec.segment_starts, vec![SegmentId(0), SegmentId(1)]);
        assert_eq!(rec.segment_ends, 2);
        assert_eq!(rec.run_ends, 1);
        assert_eq!(report.segments, 2);
        assert_eq!(report.ticks, 22);

        let u = report.unit(UnitId(0)).unwrap();
        assert!((u.total_distance_traveled - 30.0).abs() < 1e-5);

        let peak = report.overall_max_velocity.unwrap();
        assert_eq!(peak.segment, SegmentId(1));
        assert!((peak.velocity - 48.0).abs() < 1e-4);
    }

    #[test]
    fn clocks_reset_on_segment_entry() {
        let mut sim = SimBuilder::new(config(DriftModel::SplitRate), two_segments(), origins(2))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        let entry = rec
            .records
            .iter()
            .find(|r| r.segment == SegmentId(1) && r.tick == 0 && r.unit == UnitId(1))
            .unwrap();
        assert_eq!(entry.local_clock, 11.0);
        assert_eq!(entry.frame_length, 0.0);
        // The jump between segments is not a tick step.
        assert_eq!(entry.displacement, 0.0);
    }

    #[test]
    fn per_segment_offsets() {
        let mut offsets = OffsetTable::new();
        offsets.insert(Frame(1), vec![Position::zeros()]);
        offsets.insert(Frame(11), vec![Position::new(0.0, 5.0, 0.0)]);
        let mut sim = SimBuilder::new(config(DriftModel::Neutral), two_segments(), offsets)
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        let entry = rec.records.iter().find(|r| r.segment == SegmentId(1)).unwrap();
        assert_eq!(entry.position, Position::new(22.0, 5.0, 0.0));
    }

    #[test]
    fn output_interval_thins_records() {
        let cfg = SwarmConfig { output_interval_ticks: 5, ..config(DriftModel::Neutral) };
        let mut sim = SimBuilder::new(cfg, straight_timeline(), origins(2)).build().unwrap();
        let mut rec = Recorder::default();
        let report = sim.run(&mut rec).unwrap();

        // Ticks 0, 5, …, 40.
        assert_eq!(rec.records.len(), 9 * 2);
        assert!(rec.records.iter().all(|r| r.tick % 5 == 0));
        // Maxima still see every tick.
        assert_eq!(report.ticks, 42);
    }

    #[test]
    fn zero_interval_emits_nothing() {
        let cfg = SwarmConfig { output_interval_ticks: 0, ..config(DriftModel::Neutral) };
        let mut sim = SimBuilder::new(cfg, straight_timeline(), origins(1)).build().unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        assert!(rec.records.is_empty());
        assert_eq!(rec.run_ends, 1);
    }
}

// ── Error propagation ─────────────────────────────────────────────────────────

#[cfg(test)]
mod error_tests {
    use super::*;
    use crate::SimError;
    use fls_curve::CurveError;
    use fls_drift::DriftPolicy;
    use fls_motion::MotionError;

    #[test]
    fn evaluation_error_aborts_the_run() {
        let timeline = Timeline::new(vec![line("bad", 1, 10, "log(t - 5)")]).unwrap();
        let mut sim = SimBuilder::new(config(DriftModel::Neutral), timeline, origins(2))
            .build()
            .unwrap();
        match sim.run(&mut NoopObserver).unwrap_err() {
            SimError::Unit { segment, frame, unit, source } => {
                assert_eq!(segment, "bad");
                assert_eq!(frame, Frame(1));
                assert_eq!(unit, UnitId(0));
                assert!(matches!(source, MotionError::Curve(CurveError::Evaluation(_))));
            }
            other => panic!("expected Unit error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_segment_id() {
        let mut sim = SimBuilder::new(config(DriftModel::Neutral), straight_timeline(), origins(1))
            .build()
            .unwrap();
        let err = sim.run_segment(SegmentId(7), &mut NoopObserver).unwrap_err();
        assert!(matches!(err, SimError::Core(_)));
    }

    /// Runs every clock forward by three frames; overruns end in range.
    struct Sprint;

    impl DriftPolicy for Sprint {
        fn advance(&self, _unit: UnitId, clock: &mut fls_core::LogicalClock) {
            clock.count_tick();
            clock.advance_by(3.0);
        }
    }

    #[test]
    fn custom_policy_is_clamped_to_the_segment() {
        let mut sim = SimBuilder::new(config(DriftModel::Neutral), straight_timeline(), origins(1))
            .policy(Sprint)
            .build()
            .unwrap();
        let report = sim.run(&mut NoopObserver).unwrap();
        assert_eq!(report.policy, "custom");
        let u = report.unit(UnitId(0)).unwrap();
        assert!((u.total_distance_traveled - 41.0).abs() < 1e-5);
    }
}

// ── Parallel update phase ─────────────────────────────────────────────────────

#[cfg(all(test, feature = "parallel"))]
mod parallel_tests {
    use super::*;

    fn ring(n: usize) -> OffsetTable {
        let offsets = (0..n)
            .map(|i| {
                let a = i as f64 * 0.7;
                Position::new(3.0 * a.cos(), 3.0 * a.sin(), i as f64 * 0.25)
            })
            .collect();
        OffsetTable::uniform(offsets)
    }

    fn run_with(num_threads: Option<usize>) -> (SwarmReport, Vec<UnitTickRecord>) {
        let cfg = SwarmConfig { num_threads, ..config(DriftModel::SplitRate) };
        let mut sim = SimBuilder::new(cfg, spin_timeline(), ring(9)).build().unwrap();
        let mut rec = Recorder::default();
        let report = sim.run(&mut rec).unwrap();
        (report, rec.records)
    }

    #[test]
    fn pooled_runs_match_single_thread() {
        let (single, single_records) = run_with(Some(1));
        for threads in [Some(2), Some(4), None] {
            let (pooled, pooled_records) = run_with(threads);
            assert_eq!(pooled, single, "report differs with {threads:?} threads");
            assert_eq!(pooled_records, single_records, "records differ with {threads:?} threads");
        }
    }

    #[test]
    fn pooled_error_names_lowest_unit() {
        let timeline = Timeline::new(vec![line("bad", 1, 10, "log(t - 5)")]).unwrap();
        let cfg = SwarmConfig { num_threads: Some(4), ..config(DriftModel::Neutral) };
        let mut sim = SimBuilder::new(cfg, timeline, origins(8)).build().unwrap();
        match sim.run(&mut NoopObserver).unwrap_err() {
            crate::SimError::Unit { unit, frame, .. } => {
                assert_eq!(unit, UnitId(0));
                assert_eq!(frame, Frame(1));
            }
            other => panic!("expected Unit error, got {other:?}"),
        }
    }
}
