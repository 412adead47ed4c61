//! Velocity and arc length of a unit moving through one segment.

use fls_core::{Position, SwarmConfig};
use fls_curve::{CurveSegment, TransformComposer};
use nalgebra::Vector3;

use crate::quadrature::{Estimate, Tolerance, integrate};
use crate::{MotionError, MotionResult};

/// Kinematics estimator bound to one segment.
///
/// Cheap to copy; the driver creates one per segment and shares it across
/// every unit (and every worker thread under the `parallel` feature).
#[derive(Copy, Clone, Debug)]
pub struct Kinematics<'a> {
    composer:  TransformComposer<'a>,
    /// Finite-difference step in frames.
    step:      f64,
    tolerance: Tolerance,
}

impl<'a> Kinematics<'a> {
    pub fn new(composer: TransformComposer<'a>, step: f64, tolerance: Tolerance) -> Self {
        Self { composer, step, tolerance }
    }

    /// Build from the run configuration.
    pub fn from_config(segment: &'a CurveSegment, config: &SwarmConfig) -> Self {
        Self::new(
            TransformComposer::new(segment, config.range_tolerance),
            config.velocity_step,
            Tolerance::from_config(config),
        )
    }

    pub fn composer(&self) -> &TransformComposer<'a> {
        &self.composer
    }

    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    /// World position of a unit with base offset `offset` at `t`.
    #[inline]
    pub fn position(&self, offset: &Position, t: f64) -> MotionResult<Position> {
        Ok(self.composer.position(offset, t)?)
    }

    /// Forward-difference velocity `(p(t + h) - p(t)) / h`, in world units
    /// per frame.
    ///
    /// The probe at `t + h` may land up to `h` past the segment end.
    pub fn velocity(&self, offset: &Position, t: f64) -> MotionResult<Vector3<f64>> {
        let here = self.position(offset, t)?;
        let ahead = self.position(offset, t + self.step)?;
        Ok((ahead - here) / self.step)
    }

    /// Speed at `t`.
    #[inline]
    pub fn velocity_magnitude(&self, offset: &Position, t: f64) -> MotionResult<f64> {
        Ok(self.velocity(offset, t)?.norm())
    }

    /// Distance covered on `[t1, t2]`: the integral of the speed.
    ///
    /// Returns exactly `0.0` when `t1 == t2` without touching the curve.
    ///
    /// # Errors
    ///
    /// - [`MotionError::ReversedInterval`] if `t1 > t2`
    /// - [`MotionError::Integration`] if the integrator does not converge
    /// - curve evaluation errors, unchanged
    pub fn arc_length(&self, offset: &Position, t1: f64, t2: f64) -> MotionResult<f64> {
        Ok(self.arc_length_estimate(offset, t1, t2)?.value)
    }

    /// [`arc_length`](Self::arc_length) with the integrator's error estimate.
    pub fn arc_length_estimate(
        &self,
        offset: &Position,
        t1: f64,
        t2: f64,
    ) -> MotionResult<Estimate> {
        if t1 > t2 || t1.is_nan() || t2.is_nan() {
            return Err(MotionError::ReversedInterval { t1, t2 });
        }
        if t1 == t2 {
            return Ok(Estimate { value: 0.0, error: 0.0, subdivisions: 0 });
        }
        integrate(|t| self.velocity_magnitude(offset, t), t1, t2, &self.tolerance)
    }
}
