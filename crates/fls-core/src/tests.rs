//! Unit tests for fls-core primitives.

#[cfg(test)]
mod ids {
    use crate::{SegmentId, UnitId};

    #[test]
    fn index_roundtrip() {
        let id = UnitId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(UnitId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn parity() {
        assert!(UnitId(1).is_odd());
        assert!(UnitId(2007).is_odd());
        assert!(!UnitId(0).is_odd());
        assert!(!UnitId(10).is_odd());
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(UnitId::INVALID.0, u32::MAX);
        assert_eq!(SegmentId::INVALID.0, u16::MAX);
        assert_eq!(UnitId::default(), UnitId::INVALID);
    }

    #[test]
    fn segment_id_overflow_rejected() {
        assert!(SegmentId::try_from(70_000usize).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(UnitId(7).to_string(), "UnitId(7)");
        assert_eq!(SegmentId(2).to_string(), "SegmentId(2)");
    }
}

#[cfg(test)]
mod geo {
    use crate::geo::{distance, is_finite};
    use crate::Position;

    #[test]
    fn pythagorean_distance() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 4.0, 12.0);
        assert_eq!(distance(&a, &b), 13.0);
    }

    #[test]
    fn nan_is_not_finite() {
        assert!(is_finite(&Position::new(1.0, 2.0, 3.0)));
        assert!(!is_finite(&Position::new(1.0, f64::NAN, 3.0)));
        assert!(!is_finite(&Position::new(f64::INFINITY, 0.0, 0.0)));
    }
}

#[cfg(test)]
mod time {
    use crate::{Frame, LogicalClock};

    #[test]
    fn frame_arithmetic() {
        let f = Frame(10);
        assert_eq!(f + 5, Frame(15));
        assert_eq!(f.offset(3), Frame(13));
        assert_eq!(Frame(15) - Frame(10), 5);
        assert_eq!(Frame(1) - Frame(3), -2);
        assert_eq!(Frame(42).as_param(), 42.0);
        assert_eq!(Frame(42).to_string(), "F42");
    }

    #[test]
    fn clock_starts_parked() {
        let c = LogicalClock::at(Frame(42));
        assert_eq!(c.local, 42.0);
        assert_eq!(c.prev, 42.0);
        assert_eq!(c.advance_count(), 0);
        assert_eq!(c.step(), 0.0);
    }

    #[test]
    fn advance_tracks_previous_value() {
        let mut c = LogicalClock::at(Frame(1));
        c.advance_by(2.0);
        assert_eq!((c.prev, c.local), (1.0, 3.0));
        c.advance_by(2.0);
        assert_eq!((c.prev, c.local), (3.0, 5.0));
        assert_eq!(c.step(), 2.0);
    }

    #[test]
    fn hold_refreshes_prev() {
        let mut c = LogicalClock::at(Frame(1));
        c.advance_by(1.0);
        c.hold();
        assert_eq!((c.prev, c.local), (2.0, 2.0));
        assert_eq!(c.step(), 0.0);
    }

    #[test]
    fn count_tick_and_reset() {
        let mut c = LogicalClock::at(Frame(1));
        assert_eq!(c.count_tick(), 1);
        assert_eq!(c.count_tick(), 2);
        c.advance_by(1.0);
        c.reset(Frame(42));
        assert_eq!(c, LogicalClock::at(Frame(42)));
    }

    #[test]
    fn saturate_clamps_both_ends() {
        let mut c = LogicalClock::at(Frame(40));
        c.advance_by(2.0);
        assert!(!c.saturate_at(Frame(42)));
        c.advance_by(2.0);
        assert!(c.saturate_at(Frame(42)));
        assert_eq!((c.prev, c.local), (42.0, 42.0));
    }
}

#[cfg(test)]
mod config {
    use crate::{DriftModel, SwarmConfig};

    #[test]
    fn defaults_are_reference_values() {
        let c = SwarmConfig::default();
        assert_eq!(c.frame_rate, 24.0);
        assert_eq!(c.velocity_step, 1e-3);
        assert_eq!(c.abs_tolerance, 1e-9);
        assert_eq!(c.rel_tolerance, 1e-9);
        assert_eq!(c.drift, DriftModel::Neutral);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let bad = [
            SwarmConfig { frame_rate: 0.0, ..SwarmConfig::default() },
            SwarmConfig { velocity_step: -1.0, ..SwarmConfig::default() },
            SwarmConfig { velocity_step: 2.0, ..SwarmConfig::default() },
            SwarmConfig { abs_tolerance: 0.0, rel_tolerance: 0.0, ..SwarmConfig::default() },
            SwarmConfig { max_subdivisions: 0, ..SwarmConfig::default() },
            SwarmConfig { num_threads: Some(0), ..SwarmConfig::default() },
        ];
        for c in bad {
            assert!(c.validate().is_err(), "{c:?} should be rejected");
        }
    }

    #[test]
    fn rejects_non_finite_tolerances() {
        let bad = [
            SwarmConfig { abs_tolerance: f64::NAN, ..SwarmConfig::default() },
            SwarmConfig { rel_tolerance: f64::NAN, ..SwarmConfig::default() },
            SwarmConfig { abs_tolerance: f64::INFINITY, ..SwarmConfig::default() },
            SwarmConfig { rel_tolerance: -1e-9, ..SwarmConfig::default() },
            SwarmConfig { range_tolerance: f64::NAN, ..SwarmConfig::default() },
        ];
        for c in bad {
            assert!(c.validate().is_err(), "{c:?} should be rejected");
        }
        let relative_only = SwarmConfig { abs_tolerance: 0.0, ..SwarmConfig::default() };
        assert!(relative_only.validate().is_ok());
    }

    #[test]
    fn drift_model_from_str() {
        assert_eq!("neutral".parse::<DriftModel>().unwrap(), DriftModel::Neutral);
        assert_eq!("split_rate".parse::<DriftModel>().unwrap(), DriftModel::SplitRate);
        assert_eq!("error_model_1".parse::<DriftModel>().unwrap(), DriftModel::SplitRate);
        assert!("jitter".parse::<DriftModel>().is_err());
    }
}
