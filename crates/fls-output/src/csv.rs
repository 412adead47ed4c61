//! CSV output backend.
//!
//! Creates in the configured output directory:
//! - `unit_ticks.csv`
//! - `calculated_velocities.json` (on [`OutputWriter::write_report`])

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::Writer;
use fls_sim::SwarmReport;

use crate::writer::OutputWriter;
use crate::{OutputResult, UnitTickRow, write_velocities_json};

/// Writes per-tick rows to CSV and the report to JSON alongside.
pub struct CsvWriter {
    ticks:    Writer<File>,
    dir:      PathBuf,
    finished: bool,
}

impl CsvWriter {
    pub const TICKS_FILE: &'static str = "unit_ticks.csv";
    pub const REPORT_FILE: &'static str = "calculated_velocities.json";

    /// Create `dir` if needed, open the tick file, and write its header row.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let mut ticks = Writer::from_path(dir.join(Self::TICKS_FILE))?;
        ticks.write_record([
            "segment",
            "tick",
            "frame",
            "unit_id",
            "local_clock",
            "x",
            "y",
            "z",
            "frame_length",
            "nominal_length",
            "velocity",
        ])?;

        Ok(Self { ticks, dir: dir.to_path_buf(), finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_ticks(&mut self, rows: &[UnitTickRow]) -> OutputResult<()> {
        for row in rows {
            self.ticks.write_record(&[
                row.segment.to_string(),
                row.tick.to_string(),
                row.frame.to_string(),
                row.unit_id.to_string(),
                row.local_clock.to_string(),
                format!("{:.5}", row.x),
                format!("{:.5}", row.y),
                format!("{:.5}", row.z),
                row.frame_length.to_string(),
                row.nominal_length.to_string(),
                row.velocity.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_report(&mut self, report: &SwarmReport) -> OutputResult<()> {
        write_velocities_json(&self.dir.join(Self::REPORT_FILE), report)
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.ticks.flush()?;
        Ok(())
    }
}
