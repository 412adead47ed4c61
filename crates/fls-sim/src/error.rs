use fls_core::{CoreError, Frame, UnitId};
use fls_motion::MotionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("timeline has no segments")]
    EmptyTimeline,

    #[error("swarm has no units")]
    NoUnits,

    #[error("base offsets incomplete: {0}")]
    Offsets(#[source] MotionError),

    #[error("segment {segment:?}, frame {frame}, unit {unit}: {source}")]
    Unit {
        segment: String,
        frame:   Frame,
        unit:    UnitId,
        #[source]
        source:  MotionError,
    },

    #[error("could not build worker pool: {0}")]
    ThreadPool(String),
}

pub type SimResult<T> = Result<T, SimError>;
