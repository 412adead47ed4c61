//! Segment → 4×4 homogeneous transform.

use fls_core::Position;
use nalgebra::{Matrix4, Rotation3, Vector3};

use crate::{CurveError, CurveResult, CurveSegment};

/// Compose `Translate(location) · Rotate · Scale`.
///
/// The rotation is `Rz(z) · Ry(y) · Rx(x)` with the angles given in degrees:
/// X is applied first, Z outermost.
pub fn compose(
    location:     &Vector3<f64>,
    rotation_deg: &Vector3<f64>,
    scale:        &Vector3<f64>,
) -> Matrix4<f64> {
    let rotation = Rotation3::from_euler_angles(
        rotation_deg.x.to_radians(),
        rotation_deg.y.to_radians(),
        rotation_deg.z.to_radians(),
    );
    Matrix4::new_translation(location)
        * rotation.to_homogeneous()
        * Matrix4::new_nonuniform_scaling(scale)
}

/// Evaluates a [`CurveSegment`] as a rigid-plus-scale transform.
///
/// The composer borrows its segment, so it is cheap to create per unit or
/// per thread.  Parameters slightly outside the segment are evaluated
/// normally (finite-difference probes step past the boundary); anything
/// beyond `range_tolerance` frames is rejected as a driver bug.
#[derive(Copy, Clone, Debug)]
pub struct TransformComposer<'a> {
    segment:         &'a CurveSegment,
    range_tolerance: f64,
}

impl<'a> TransformComposer<'a> {
    pub fn new(segment: &'a CurveSegment, range_tolerance: f64) -> Self {
        Self { segment, range_tolerance }
    }

    pub fn segment(&self) -> &'a CurveSegment {
        self.segment
    }

    pub fn range_tolerance(&self) -> f64 {
        self.range_tolerance
    }

    /// Fail with [`CurveError::SegmentRange`] if `t` is too far outside the
    /// segment.
    pub fn check_range(&self, t: f64) -> CurveResult<()> {
        let start = self.segment.start_frame().as_param();
        let end = self.segment.end_frame().as_param();
        let tol = self.range_tolerance;
        if t.is_nan() || t < start - tol || t > end + tol {
            return Err(CurveError::SegmentRange {
                segment:   self.segment.name().to_owned(),
                t,
                start:     self.segment.start_frame().0,
                end:       self.segment.end_frame().0,
                tolerance: tol,
            });
        }
        Ok(())
    }

    /// The segment's homogeneous transform at `t`.
    pub fn transform_at(&self, t: f64) -> CurveResult<Matrix4<f64>> {
        self.check_range(t)?;
        let s = self.segment.sample(t)?;
        Ok(compose(&s.location, &s.rotation_deg, &s.scale))
    }

    /// World position of a unit with base offset `offset` at `t`.
    pub fn position(&self, offset: &Position, t: f64) -> CurveResult<Position> {
        let m = self.transform_at(t)?;
        Ok((m * offset.push(1.0)).xyz())
    }
}
