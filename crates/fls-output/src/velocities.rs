//! `calculated_velocities.json` — the report in the layout downstream
//! animation tooling reads.
//!
//! ```json
//! {
//!   "overall_max_velocity": { "frame": 12, "velocity": 48.0, "fls_id": 1, "segment": 0 },
//!   "fls_max_velocities": {
//!     "FLS0": { "frame": 3, "velocity": 24.0, "total_distance_traveled": 20.0, "total_distance": 41.0 }
//!   },
//!   ...
//! }
//! ```

use std::collections::BTreeMap;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use fls_sim::SwarmReport;

use crate::OutputResult;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverallPeak {
    pub frame:    Option<i64>,
    pub velocity: f64,
    pub fls_id:   Option<u32>,
    pub segment:  Option<u16>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitVelocity {
    pub frame:                   Option<i64>,
    pub velocity:                f64,
    pub total_distance_traveled: f64,
    pub total_distance:          f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LongestStep {
    pub frame:        i64,
    pub displacement: f64,
    pub fls_id:       u32,
    pub segment:      u16,
}

/// Serialized form of a [`SwarmReport`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VelocityReport {
    pub overall_max_velocity: OverallPeak,
    /// Keyed `"FLS<id>"`.
    pub fls_max_velocities:   BTreeMap<String, UnitVelocity>,
    pub longest_step:         Option<LongestStep>,
    pub total_path_length:    f64,
    pub policy:               String,
    pub frame_rate:           f64,
}

impl From<&SwarmReport> for VelocityReport {
    fn from(report: &SwarmReport) -> Self {
        let overall = report.overall_max_velocity;
        let fls_max_velocities = report
            .units
            .iter()
            .map(|u| {
                let entry = UnitVelocity {
                    frame:                   u.max_velocity.map(|p| p.frame.0),
                    velocity:                u.max_velocity.map_or(0.0, |p| p.velocity),
                    total_distance_traveled: u.total_distance_traveled,
                    total_distance:          u.total_distance,
                };
                (format!("FLS{}", u.unit.0), entry)
            })
            .collect();

        Self {
            overall_max_velocity: OverallPeak {
                frame:    overall.map(|p| p.frame.0),
                velocity: overall.map_or(0.0, |p| p.velocity),
                fls_id:   overall.map(|p| p.unit.0),
                segment:  overall.map(|p| p.segment.0),
            },
            fls_max_velocities,
            longest_step: report.longest_step.map(|s| LongestStep {
                frame:        s.frame.0,
                displacement: s.displacement,
                fls_id:       s.unit.0,
                segment:      s.segment.0,
            }),
            total_path_length: report.total_path_length,
            policy:            report.policy.clone(),
            frame_rate:        report.frame_rate,
        }
    }
}

/// Write `report` as pretty-printed JSON to `path`.
pub fn write_velocities_json(path: &Path, report: &SwarmReport) -> OutputResult<()> {
    let mut out = BufWriter::new(std::fs::File::create(path)?);
    serde_json::to_writer_pretty(&mut out, &VelocityReport::from(report))?;
    out.write_all(b"\n")?;
    out.flush()?;
    debug!(path = %path.display(), units = report.units.len(), "wrote velocity report");
    Ok(())
}
