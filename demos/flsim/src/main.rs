//! flsim — command-line driver for the FLS swarm trajectory simulator.
//!
//! Loads keyframe curves and per-unit offsets, runs every segment under the
//! chosen drift policy, and writes `unit_ticks.csv` and
//! `calculated_velocities.json` to the output directory.  Without input
//! files it runs a built-in two-unit scene: a straight line along x for
//! frames 1–42, then a quarter turn about z for frames 42–84 that swings
//! the second unit around the first.
//!
//! ```text
//! flsim --drift split_rate --out-dir output/run1
//! flsim --curves curves.json --offsets all_FLS_Coords.json --config swarm.json
//! flsim check spheres_waypoints.csv fls_coordinates.csv
//! ```
//!
//! Logging goes through `tracing`; set `RUST_LOG=debug` for per-segment
//! detail.

mod cli;

#[cfg(test)]
mod tests;

use std::fmt::Display;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fls_core::{DriftModel, SegmentId, SwarmConfig};
use fls_curve::{CurveSegment, Timeline, load_timeline_json, load_timeline_reader};
use fls_motion::{OffsetTable, UnitStore, load_offsets_json, load_offsets_reader};
use fls_output::{CsvWriter, OutputWriter, SwarmOutputObserver, check_waypoints};
use fls_sim::{SimBuilder, SwarmObserver, SwarmReport, UnitTickRecord};

// ── Built-in scene ────────────────────────────────────────────────────────────

const SAMPLE_CURVES_JSON: &str = r#"{
  "Keyframe 1 to Keyframe 2": {
    "start_time": 1,
    "end_time": 42,
    "location": { "B_X": "t", "B_Y": "0", "B_Z": "0" }
  },
  "Keyframe 2 to Keyframe 3": {
    "start_time": 42,
    "end_time": 84,
    "location": { "B_X": "42", "B_Y": "0", "B_Z": "0" },
    "rotation": { "B_X": "0", "B_Y": "0", "B_Z": "(t - 42) * 90 / 42" }
  }
}"#;

const SAMPLE_OFFSETS_JSON: &str = "[[0, 0, 0], [0, 4, 0]]";

// ── Observer wrapper to count rows ───────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:     SwarmOutputObserver<W>,
    tick_rows: usize,
    segments:  usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: SwarmOutputObserver<W>) -> Self {
        Self { inner, tick_rows: 0, segments: 0 }
    }
}

impl<W: OutputWriter> SwarmObserver for CountingObserver<W> {
    fn on_segment_start(&mut self, id: SegmentId, segment: &CurveSegment) {
        println!(
            "  {id}  {:<28} frames {}–{}",
            segment.name(),
            segment.start_frame().0,
            segment.end_frame().0
        );
        self.inner.on_segment_start(id, segment);
    }

    fn on_tick(&mut self, record: &UnitTickRecord) {
        self.tick_rows += 1;
        self.inner.on_tick(record);
    }

    fn on_segment_end(&mut self, id: SegmentId, units: &UnitStore) {
        self.segments += 1;
        self.inner.on_segment_end(id, units);
    }

    fn on_run_end(&mut self, report: &SwarmReport) {
        self.inner.on_run_end(report);
    }
}

// ── Input helpers ─────────────────────────────────────────────────────────────

fn parsed<T>(matches: &ArgMatches<'_>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    matches
        .value_of(name)
        .map(|raw| raw.parse::<T>().map_err(|e| anyhow!("invalid --{name} {raw:?}: {e}")))
        .transpose()
}

fn load_config(matches: &ArgMatches<'_>) -> Result<SwarmConfig> {
    let mut config = match matches.value_of("config") {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing config {path}"))?
        }
        None => SwarmConfig::default(),
    };

    if let Some(drift) = parsed::<DriftModel>(matches, "drift")? {
        config.drift = drift;
    }
    if let Some(rate) = parsed::<f64>(matches, "frame-rate")? {
        config.frame_rate = rate;
    }
    if let Some(n) = parsed::<usize>(matches, "threads")? {
        config.num_threads = Some(n);
    }
    if let Some(n) = parsed::<u64>(matches, "interval")? {
        config.output_interval_ticks = n;
    }
    config.validate()?;
    Ok(config)
}

fn load_timeline(matches: &ArgMatches<'_>) -> Result<Timeline> {
    let timeline = match matches.value_of("curves") {
        Some(path) => load_timeline_json(Path::new(path))
            .with_context(|| format!("loading curves from {path}"))?,
        None => load_timeline_reader(Cursor::new(SAMPLE_CURVES_JSON))?,
    };
    Ok(timeline)
}

fn load_offsets(matches: &ArgMatches<'_>) -> Result<OffsetTable> {
    let offsets = match matches.value_of("offsets") {
        Some(path) => load_offsets_json(Path::new(path))
            .with_context(|| format!("loading offsets from {path}"))?,
        None => load_offsets_reader(Cursor::new(SAMPLE_OFFSETS_JSON))?,
    };
    Ok(offsets)
}

/// Surface the first write error the observer stored during the run.
fn output_status<W: OutputWriter>(obs: &mut SwarmOutputObserver<W>, out_dir: &Path) -> Result<()> {
    match obs.take_error() {
        Some(e) => Err(anyhow::Error::new(e)
            .context(format!("writing outputs to {}", out_dir.display()))),
        None => Ok(()),
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn run_check(matches: &ArgMatches<'_>) -> Result<()> {
    let expected = matches.value_of("expected").context("missing expected file")?;
    let actual = matches.value_of("actual").context("missing actual file")?;
    let out = matches.value_of("out").unwrap_or("waypoint_checker.csv");

    let distances = check_waypoints(Path::new(expected), Path::new(actual), Path::new(out))?;
    let worst = distances.iter().copied().fold(0.0_f64, f64::max);
    println!("{} rows compared, max distance {worst:.5}, written to {out}", distances.len());
    Ok(())
}

fn run_swarm(matches: &ArgMatches<'_>) -> Result<()> {
    let config = load_config(matches)?;
    let timeline = load_timeline(matches)?;
    let offsets = load_offsets(matches)?;
    let out_dir = Path::new(matches.value_of("out-dir").unwrap_or("output/flsim"));

    println!("=== flsim — FLS swarm trajectory simulator ===");
    println!(
        "Segments: {}  |  Frames: {}  |  Drift: {:?}  |  Frame rate: {}",
        timeline.len(),
        timeline.total_frames(),
        config.drift,
        config.frame_rate
    );
    println!();

    let mut sim = SimBuilder::new(config, timeline, offsets).build()?;
    println!("Units: {}", sim.units.len());

    let writer = CsvWriter::new(out_dir)
        .with_context(|| format!("creating output in {}", out_dir.display()))?;
    let mut obs = CountingObserver::new(SwarmOutputObserver::new(writer));

    let t0 = Instant::now();
    let report = sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    output_status(&mut obs.inner, out_dir)?;

    println!();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  {:<26} : {} rows", CsvWriter::TICKS_FILE, obs.tick_rows);
    println!("  {:<26} : {} units", CsvWriter::REPORT_FILE, report.units.len());
    if let Some(peak) = report.overall_max_velocity {
        println!(
            "  max velocity {:.5} by FLS{} at frame {} (segment {})",
            peak.velocity, peak.unit.0, peak.frame.0, peak.segment
        );
    }
    println!();

    println!("{:<8} {:>14} {:>14} {:>10}", "Unit", "Max velocity", "Traveled", "At frame");
    println!("{}", "-".repeat(49));
    for unit in &report.units {
        let (velocity, frame) = unit
            .max_velocity
            .map_or((0.0, String::from("-")), |p| (p.velocity, p.frame.0.to_string()));
        println!(
            "{:<8} {:>14.5} {:>14.5} {:>10}",
            format!("FLS{}", unit.unit.0),
            velocity,
            unit.total_distance_traveled,
            frame
        );
    }

    info!(segments = obs.segments, rows = obs.tick_rows, "outputs written");
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let matches = cli::parse_command_line();
    match matches.subcommand_matches("check") {
        Some(check) => run_check(check),
        None => run_swarm(&matches),
    }
}
