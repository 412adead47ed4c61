use fls_core::{Frame, UnitId};
use fls_curve::CurveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MotionError {
    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(
        "arc length on [{a}, {b}] did not converge within {subdivisions} subdivisions: \
         best estimate {estimate} ± {error}"
    )]
    Integration {
        a:            f64,
        b:            f64,
        estimate:     f64,
        error:        f64,
        subdivisions: usize,
    },

    #[error("arc length requested over reversed interval [{t1}, {t2}]")]
    ReversedInterval { t1: f64, t2: f64 },

    #[error("unit {unit} has no base offset for the segment starting at {segment_start}")]
    MissingOffset { unit: UnitId, segment_start: Frame },

    #[error("offset table key {0:?} is not a frame number")]
    OffsetKey(String),

    #[error("offset table parse error: {0}")]
    Load(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type MotionResult<T> = Result<T, MotionError>;
