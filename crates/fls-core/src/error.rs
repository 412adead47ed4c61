//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::{SegmentId, UnitId};

/// The base error type for `fls-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("segment {0} not found")]
    SegmentNotFound(SegmentId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `fls-core`.
pub type CoreResult<T> = Result<T, CoreError>;
