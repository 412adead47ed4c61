//! Base offsets: where each unit sits relative to its segment's transform.
//!
//! # JSON formats
//!
//! A flat list is shared by every segment:
//!
//! ```json
//! [[0.0, 0.0, 0.0], [1.5, 0.0, 0.0], [0.0, 2.0, 1.0]]
//! ```
//!
//! An object keyed by segment start frame gives each segment its own layout:
//!
//! ```json
//! { "1": [[0, 0, 0], [1, 0, 0]], "42": [[0, 0, 0], [2, 0, 0]] }
//! ```
//!
//! List position is the unit id.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use fls_core::{Frame, Position, UnitId};

use crate::{MotionError, MotionResult};

/// Per-segment base offsets, keyed by segment start frame.
///
/// An optional shared layout answers for any segment without its own entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OffsetTable {
    per_segment: BTreeMap<Frame, Vec<Position>>,
    shared:      Option<Vec<Position>>,
}

impl OffsetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// One layout used for every segment.
    pub fn uniform(offsets: Vec<Position>) -> Self {
        Self { per_segment: BTreeMap::new(), shared: Some(offsets) }
    }

    /// Set the layout for the segment starting at `start`.
    pub fn insert(&mut self, start: Frame, offsets: Vec<Position>) -> &mut Self {
        self.per_segment.insert(start, offsets);
        self
    }

    fn layout(&self, segment_start: Frame) -> Option<&[Position]> {
        self.per_segment
            .get(&segment_start)
            .or(self.shared.as_ref())
            .map(Vec::as_slice)
    }

    /// Base offset of `unit` in the segment starting at `segment_start`.
    pub fn get(&self, segment_start: Frame, unit: UnitId) -> MotionResult<&Position> {
        self.layout(segment_start)
            .and_then(|layout| layout.get(unit.index()))
            .ok_or(MotionError::MissingOffset { unit, segment_start })
    }

    /// Number of units laid out for the segment starting at `segment_start`.
    pub fn unit_count(&self, segment_start: Frame) -> usize {
        self.layout(segment_start).map_or(0, <[Position]>::len)
    }

    /// The largest layout in the table; the swarm size when nothing else
    /// says otherwise.
    pub fn max_unit_count(&self) -> usize {
        self.per_segment
            .values()
            .chain(self.shared.iter())
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }

    /// Check that every unit below `unit_count` has an offset for every
    /// listed segment start.  Reports the first gap found.
    pub fn check_complete(
        &self,
        segment_starts: impl IntoIterator<Item = Frame>,
        unit_count: usize,
    ) -> MotionResult<()> {
        for start in segment_starts {
            let available = self.unit_count(start);
            if available < unit_count {
                let unit = UnitId::try_from(available).unwrap_or(UnitId::INVALID);
                return Err(MotionError::MissingOffset { unit, segment_start: start });
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.per_segment.is_empty() && self.shared.is_none()
    }
}

// ── JSON loader ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum OffsetsRecord {
    Shared(Vec<[f64; 3]>),
    PerSegment(BTreeMap<String, Vec<[f64; 3]>>),
}

fn to_positions(raw: Vec<[f64; 3]>) -> Vec<Position> {
    raw.into_iter().map(|[x, y, z]| Position::new(x, y, z)).collect()
}

/// Load an offset table from a JSON file.
pub fn load_offsets_json(path: &Path) -> MotionResult<OffsetTable> {
    let file = std::fs::File::open(path)?;
    load_offsets_reader(std::io::BufReader::new(file))
}

/// Like [`load_offsets_json`] but accepts any `Read` source.
pub fn load_offsets_reader<R: Read>(reader: R) -> MotionResult<OffsetTable> {
    let table = match serde_json::from_reader(reader)? {
        OffsetsRecord::Shared(raw) => OffsetTable::uniform(to_positions(raw)),
        OffsetsRecord::PerSegment(map) => {
            let mut table = OffsetTable::new();
            for (key, raw) in map {
                let start = key
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| MotionError::OffsetKey(key.clone()))?;
                table.insert(Frame(start), to_positions(raw));
            }
            table
        }
    };
    debug!(units = table.max_unit_count(), "loaded base offsets");
    Ok(table)
}
