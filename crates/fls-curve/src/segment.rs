//! One keyframe-to-keyframe interval of motion curves.

use std::fmt;

use fls_core::{Frame, Position};
use nalgebra::Vector3;

use crate::{CurveError, CurveResult, EvaluationError, Formula};

// ── Attribute / Axis ──────────────────────────────────────────────────────────

/// Which transform channel a formula drives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    Location,
    /// Euler angles in degrees.
    Rotation,
    Scale,
}

impl Attribute {
    pub const ALL: [Attribute; 3] = [Attribute::Location, Attribute::Rotation, Attribute::Scale];

    pub fn name(self) -> &'static str {
        match self {
            Attribute::Location => "location",
            Attribute::Rotation => "rotation",
            Attribute::Scale => "scale",
        }
    }

    /// Value of every axis when the attribute is absent from a definition.
    pub fn identity(self) -> f64 {
        match self {
            Attribute::Location | Attribute::Rotation => 0.0,
            Attribute::Scale => 1.0,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Key used by the curve export format (`B_X`, `B_Y`, `B_Z`).
    pub fn key(self) -> &'static str {
        match self {
            Axis::X => "B_X",
            Axis::Y => "B_Y",
            Axis::Z => "B_Z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ── AxisFormulas ──────────────────────────────────────────────────────────────

/// Three formulas, one per spatial axis.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisFormulas {
    pub x: Formula,
    pub y: Formula,
    pub z: Formula,
}

impl AxisFormulas {
    pub fn new(x: Formula, y: Formula, z: Formula) -> Self {
        Self { x, y, z }
    }

    /// All three axes fixed at `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(Formula::constant(value), Formula::constant(value), Formula::constant(value))
    }

    pub fn get(&self, axis: Axis) -> &Formula {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    /// Evaluate all three axes at `t`.
    pub fn eval(&self, t: f64) -> Result<Vector3<f64>, EvaluationError> {
        Ok(Vector3::new(self.x.eval(t)?, self.y.eval(t)?, self.z.eval(t)?))
    }
}

// ── CurveSample ───────────────────────────────────────────────────────────────

/// Raw channel values of a segment at one parameter value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CurveSample {
    pub location:    Vector3<f64>,
    /// Euler angles in degrees, as authored.
    pub rotation_deg: Vector3<f64>,
    pub scale:       Vector3<f64>,
}

// ── CurveSegment ──────────────────────────────────────────────────────────────

/// The motion curves for one keyframe interval `[start_frame, end_frame]`.
///
/// Built once at load time and immutable afterwards.  Owned by the
/// [`Timeline`][crate::Timeline] that loaded it.
#[derive(Clone, Debug)]
pub struct CurveSegment {
    name:        String,
    start_frame: Frame,
    end_frame:   Frame,
    location:    AxisFormulas,
    rotation:    AxisFormulas,
    scale:       AxisFormulas,
}

impl CurveSegment {
    /// Build a segment, rejecting empty or inverted frame ranges.
    pub fn new(
        name:        impl Into<String>,
        start_frame: Frame,
        end_frame:   Frame,
        location:    AxisFormulas,
        rotation:    AxisFormulas,
        scale:       AxisFormulas,
    ) -> CurveResult<Self> {
        let name = name.into();
        if start_frame >= end_frame {
            return Err(CurveError::InvalidSegment {
                segment: name,
                reason:  format!("start frame {start_frame} is not before end frame {end_frame}"),
            });
        }
        Ok(Self { name, start_frame, end_frame, location, rotation, scale })
    }

    /// Convenience constructor compiling nine formula texts, indexed
    /// `[attribute][axis]` in `Attribute::ALL` × `Axis::ALL` order.
    pub fn compile(
        name:        impl Into<String>,
        start_frame: Frame,
        end_frame:   Frame,
        texts:       [[&str; 3]; 3],
    ) -> CurveResult<Self> {
        let name = name.into();
        let compile_row = |row: [&str; 3]| -> CurveResult<AxisFormulas> {
            let [x, y, z] = row.map(|text| {
                Formula::compile(text).map_err(|source| CurveError::FormulaParse {
                    segment: name.clone(),
                    source,
                })
            });
            Ok(AxisFormulas::new(x?, y?, z?))
        };
        let [location, rotation, scale] = texts;
        let location = compile_row(location)?;
        let rotation = compile_row(rotation)?;
        let scale = compile_row(scale)?;
        Self::new(name, start_frame, end_frame, location, rotation, scale)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_frame(&self) -> Frame {
        self.start_frame
    }

    pub fn end_frame(&self) -> Frame {
        self.end_frame
    }

    /// Number of frame steps in the segment (`end - start`).
    pub fn frame_count(&self) -> u64 {
        (self.end_frame - self.start_frame) as u64
    }

    /// `true` if `frame` lies in `[start_frame, end_frame]`.
    pub fn contains(&self, frame: Frame) -> bool {
        self.start_frame <= frame && frame <= self.end_frame
    }

    pub fn formulas(&self, attribute: Attribute) -> &AxisFormulas {
        match attribute {
            Attribute::Location => &self.location,
            Attribute::Rotation => &self.rotation,
            Attribute::Scale => &self.scale,
        }
    }

    pub fn formula(&self, attribute: Attribute, axis: Axis) -> &Formula {
        self.formulas(attribute).get(axis)
    }

    /// Evaluate all nine channels at `t`.  No range check; see
    /// [`TransformComposer`][crate::TransformComposer] for that.
    pub fn sample(&self, t: f64) -> Result<CurveSample, EvaluationError> {
        Ok(CurveSample {
            location:     self.location.eval(t)?,
            rotation_deg: self.rotation.eval(t)?,
            scale:        self.scale.eval(t)?,
        })
    }

    /// The curve's own waypoint at `t` (location channels only).
    pub fn waypoint(&self, t: f64) -> Result<Position, EvaluationError> {
        self.location.eval(t)
    }
}
