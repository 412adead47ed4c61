//! JSON curve-definition loader.
//!
//! # Format
//!
//! One object per keyframe interval, keyed by name:
//!
//! ```json
//! {
//!   "Keyframe 1 to Keyframe 2": {
//!     "start_time": 1,
//!     "end_time": 42,
//!     "location": { "B_X": { "equation": "0.5*t" }, "B_Y": { "equation": "0" }, "B_Z": { "equation": "2" } },
//!     "rotation": { "B_X": { "equation": "0" }, "B_Y": { "equation": "0" }, "B_Z": { "equation": "3*t" } },
//!     "scale":    { "B_X": { "equation": "1" }, "B_Y": { "equation": "1" }, "B_Z": { "equation": "1" } }
//!   }
//! }
//! ```
//!
//! `start_frame`/`end_frame` are accepted as aliases of `start_time`/
//! `end_time`, and an axis may be a bare string instead of
//! `{"equation": ...}`.  An attribute block that is missing entirely is
//! filled with its identity (location and rotation 0, scale 1); a block that
//! is present but lacks an axis is an error.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use fls_core::Frame;

use crate::{Attribute, Axis, AxisFormulas, CurveError, CurveResult, CurveSegment, Formula, Timeline};

// ── JSON records ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SegmentRecord {
    #[serde(alias = "start_frame")]
    start_time: i64,
    #[serde(alias = "end_frame")]
    end_time:   i64,
    location:   Option<AxisRecord>,
    rotation:   Option<AxisRecord>,
    scale:      Option<AxisRecord>,
}

#[derive(Deserialize)]
struct AxisRecord {
    #[serde(rename = "B_X", alias = "x", alias = "X")]
    x: Option<EquationRecord>,
    #[serde(rename = "B_Y", alias = "y", alias = "Y")]
    y: Option<EquationRecord>,
    #[serde(rename = "B_Z", alias = "z", alias = "Z")]
    z: Option<EquationRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EquationRecord {
    Wrapped { equation: String },
    Bare(String),
}

impl EquationRecord {
    fn text(&self) -> &str {
        match self {
            EquationRecord::Wrapped { equation } => equation,
            EquationRecord::Bare(s) => s,
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every keyframe segment from a JSON file.
pub fn load_timeline_json(path: &Path) -> CurveResult<Timeline> {
    let file = std::fs::File::open(path)?;
    load_timeline_reader(std::io::BufReader::new(file))
}

/// Like [`load_timeline_json`] but accepts any `Read` source.
pub fn load_timeline_reader<R: Read>(reader: R) -> CurveResult<Timeline> {
    let records: BTreeMap<String, SegmentRecord> = serde_json::from_reader(reader)?;

    let segments = records
        .into_iter()
        .map(|(name, record)| build_segment(name, record))
        .collect::<CurveResult<Vec<_>>>()?;

    let timeline = Timeline::new(segments)?;
    debug!(
        segments = timeline.len(),
        frames = timeline.total_frames(),
        "loaded curve timeline"
    );
    Ok(timeline)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn build_segment(name: String, record: SegmentRecord) -> CurveResult<CurveSegment> {
    let location = build_axes(&name, Attribute::Location, record.location)?;
    let rotation = build_axes(&name, Attribute::Rotation, record.rotation)?;
    let scale = build_axes(&name, Attribute::Scale, record.scale)?;
    CurveSegment::new(
        name,
        Frame(record.start_time),
        Frame(record.end_time),
        location,
        rotation,
        scale,
    )
}

fn build_axes(
    segment:   &str,
    attribute: Attribute,
    record:    Option<AxisRecord>,
) -> CurveResult<AxisFormulas> {
    let Some(record) = record else {
        debug!(segment, %attribute, "attribute absent; using identity");
        return Ok(AxisFormulas::constant(attribute.identity()));
    };

    let compile = |axis: Axis, eq: Option<EquationRecord>| -> CurveResult<Formula> {
        let eq = eq.ok_or_else(|| CurveError::MissingFormula {
            segment:   segment.to_owned(),
            attribute: attribute.name(),
            axis:      axis.key(),
        })?;
        Formula::compile(eq.text()).map_err(|source| CurveError::FormulaParse {
            segment: segment.to_owned(),
            source,
        })
    };

    Ok(AxisFormulas::new(
        compile(Axis::X, record.x)?,
        compile(Axis::Y, record.y)?,
        compile(Axis::Z, record.z)?,
    ))
}
