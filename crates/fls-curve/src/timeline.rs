//! The ordered registry of keyframe segments.

use fls_core::{Frame, SegmentId};

use crate::{CurveError, CurveResult, CurveSegment};

/// All keyframe segments of one animation, sorted by start frame.
///
/// Consecutive segments may share a boundary frame (`1–42`, `42–83`) but
/// must not overlap.  The shared frame belongs to the earlier segment for
/// [`segment_for_frame`][Self::segment_for_frame].
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    segments: Vec<CurveSegment>,
}

impl Timeline {
    /// Sort `segments` by start frame and validate that they do not overlap.
    pub fn new(mut segments: Vec<CurveSegment>) -> CurveResult<Self> {
        if segments.len() > SegmentId::INVALID.index() {
            return Err(CurveError::InvalidSegment {
                segment: String::new(),
                reason:  format!("{} segments exceed the SegmentId range", segments.len()),
            });
        }
        segments.sort_by_key(|s| s.start_frame());
        for pair in segments.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if b.start_frame() < a.end_frame() {
                return Err(CurveError::InvalidSegment {
                    segment: b.name().to_owned(),
                    reason:  format!(
                        "starts at {} before {:?} ends at {}",
                        b.start_frame(),
                        a.name(),
                        a.end_frame()
                    ),
                });
            }
        }
        Ok(Self { segments })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, id: SegmentId) -> Option<&CurveSegment> {
        self.segments.get(id.index())
    }

    /// Look up a segment by keyframe-pair name.
    pub fn by_name(&self, name: &str) -> Option<(SegmentId, &CurveSegment)> {
        self.iter().find(|(_, s)| s.name() == name)
    }

    /// Segments in timeline order with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, &CurveSegment)> + '_ {
        self.segments
            .iter()
            .enumerate()
            .map(|(i, s)| (SegmentId(i as u16), s))
    }

    pub fn segments(&self) -> &[CurveSegment] {
        &self.segments
    }

    /// The first segment containing `frame`.
    pub fn segment_for_frame(&self, frame: Frame) -> Option<(SegmentId, &CurveSegment)> {
        self.iter().find(|(_, s)| s.contains(frame))
    }

    /// Start frame of the first segment.
    pub fn start_frame(&self) -> Option<Frame> {
        self.segments.first().map(CurveSegment::start_frame)
    }

    /// End frame of the last segment.
    pub fn end_frame(&self) -> Option<Frame> {
        self.segments.last().map(CurveSegment::end_frame)
    }

    /// Sum of every segment's frame count (ticks the driver will run,
    /// excluding per-segment placement ticks).
    pub fn total_frames(&self) -> u64 {
        self.segments.iter().map(CurveSegment::frame_count).sum()
    }
}
