//! `fls-output` — run output writers for the FLS swarm simulator.
//!
//! | Module       | Files created                                             |
//! |--------------|-----------------------------------------------------------|
//! | [`csv`]      | `unit_ticks.csv` (+ the JSON report via [`velocities`])   |
//! | [`velocities`] | `calculated_velocities.json`                            |
//! | [`checker`]  | `waypoint_checker.csv`                                    |
//!
//! Writers implement [`OutputWriter`] and are driven by
//! [`SwarmOutputObserver`], which implements `fls_sim::SwarmObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fls_output::{CsvWriter, SwarmOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./results"))?;
//! let mut obs = SwarmOutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod checker;
pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod velocities;
pub mod writer;


pub use checker::{check_waypoints, waypoint_distances};
pub use self::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SwarmOutputObserver;
pub use row::UnitTickRow;
pub use velocities::{VelocityReport, write_velocities_json};
pub use writer::OutputWriter;
