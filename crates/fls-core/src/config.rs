//! Run configuration.
//!
//! Typically loaded from a JSON file by the application crate (with the
//! `serde` feature) and passed to the simulation builder.  Every field has a
//! reference default, so a config file only needs the fields it changes.

use crate::{CoreError, CoreResult};

// ── DriftModel ────────────────────────────────────────────────────────────────

/// Which built-in clock-drift policy the driver applies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DriftModel {
    /// Every unit advances one frame per tick.  The drift-free baseline.
    #[default]
    Neutral,
    /// "Error model 1": odd units run at double rate, even units at half.
    SplitRate,
}

impl std::str::FromStr for DriftModel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "neutral" | "none" => Ok(DriftModel::Neutral),
            "split_rate" | "split-rate" | "error_model_1" | "1" => Ok(DriftModel::SplitRate),
            other => Err(CoreError::Config(format!(
                "unknown drift model {other:?}: expected \"neutral\" or \"split_rate\""
            ))),
        }
    }
}

// ── SwarmConfig ───────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SwarmConfig {
    /// Frames per second of the animation.  Velocity (distance / second) is
    /// `frame_length * frame_rate`.  Default: 24.
    pub frame_rate: f64,

    /// Clock-drift policy applied to every unit on every tick.
    pub drift: DriftModel,

    /// One-sided finite-difference step, in frames, for velocity estimation.
    /// Default: 1e-3.
    pub velocity_step: f64,

    /// Absolute error tolerance of the arc-length integrator.  Default: 1e-9.
    pub abs_tolerance: f64,

    /// Relative error tolerance of the arc-length integrator.  Default: 1e-9.
    pub rel_tolerance: f64,

    /// Maximum number of interval subdivisions per arc-length call before
    /// the integrator gives up.  Default: 200.
    pub max_subdivisions: usize,

    /// How far (in frames) outside a segment's bounds a curve may be
    /// evaluated before it is treated as a driver bug.  Default: 1.0.
    pub range_tolerance: f64,

    /// Worker thread count for the `parallel` feature.  `None` uses all
    /// logical cores.
    pub num_threads: Option<usize>,

    /// Emit per-tick records every N ticks.  1 = every tick; 0 = never.
    pub output_interval_ticks: u64,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            frame_rate:            24.0,
            drift:                 DriftModel::Neutral,
            velocity_step:         1e-3,
            abs_tolerance:         1e-9,
            rel_tolerance:         1e-9,
            max_subdivisions:      200,
            range_tolerance:       1.0,
            num_threads:           None,
            output_interval_ticks: 1,
        }
    }
}

impl SwarmConfig {
    /// Reject values the numerics cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(CoreError::Config(format!(
                "frame_rate must be positive, got {}",
                self.frame_rate
            )));
        }
        if !(self.velocity_step.is_finite() && self.velocity_step > 0.0) {
            return Err(CoreError::Config(format!(
                "velocity_step must be positive, got {}",
                self.velocity_step
            )));
        }
        if self.range_tolerance.is_nan() || self.velocity_step > self.range_tolerance {
            return Err(CoreError::Config(format!(
                "velocity_step {} exceeds range_tolerance {}; boundary probes would be rejected",
                self.velocity_step, self.range_tolerance
            )));
        }
        let tolerances = [("abs_tolerance", self.abs_tolerance), ("rel_tolerance", self.rel_tolerance)];
        for (name, value) in tolerances {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CoreError::Config(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if self.abs_tolerance == 0.0 && self.rel_tolerance == 0.0 {
            return Err(CoreError::Config(
                "at least one integration tolerance must be positive".into(),
            ));
        }
        if self.max_subdivisions == 0 {
            return Err(CoreError::Config("max_subdivisions must be at least 1".into()));
        }
        if self.num_threads == Some(0) {
            return Err(CoreError::Config("num_threads must be at least 1".into()));
        }
        Ok(())
    }
}
