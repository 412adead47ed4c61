//! World-space coordinates.
//!
//! Positions are `f64` so that finite-difference probes 1e-3 frames apart
//! still resolve sub-millimetre displacements.

use nalgebra::Vector3;

/// A point (or base offset) in world space.
pub type Position = Vector3<f64>;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: &Position, b: &Position) -> f64 {
    (a - b).norm()
}

/// `true` if every component is finite (no NaN / ±inf).
#[inline]
pub fn is_finite(p: &Position) -> bool {
    p.iter().all(|c| c.is_finite())
}
