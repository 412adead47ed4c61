use thiserror::Error;

/// Formula text that is not a well-formed expression in the supported
/// grammar.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at byte {position} of {source_text:?}")]
pub struct FormulaParseError {
    /// The full formula text.
    pub source_text: String,
    /// Byte offset of the offending token.
    pub position: usize,
    pub message: String,
}

/// A formula evaluated outside its real-valued domain.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{operation} is undefined for argument {argument} (t = {t})")]
pub struct EvaluationError {
    /// The function or operator that failed (`"sqrt"`, `"/"`, …).
    pub operation: &'static str,
    pub argument: f64,
    pub t: f64,
}

#[derive(Debug, Error)]
pub enum CurveError {
    #[error("formula parse error in segment {segment:?}: {source}")]
    FormulaParse {
        segment: String,
        #[source]
        source: FormulaParseError,
    },

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error(
        "parameter {t} is outside segment {segment:?} [{start}, {end}] by more than {tolerance}"
    )]
    SegmentRange {
        segment:   String,
        t:         f64,
        start:     i64,
        end:       i64,
        tolerance: f64,
    },

    #[error("invalid segment {segment:?}: {reason}")]
    InvalidSegment { segment: String, reason: String },

    #[error("segment {segment:?} has no {attribute} formula for axis {axis}")]
    MissingFormula {
        segment:   String,
        attribute: &'static str,
        axis:      &'static str,
    },

    #[error("curve definition parse error: {0}")]
    Load(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CurveResult<T> = Result<T, CurveError>;
