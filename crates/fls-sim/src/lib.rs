//! `fls-sim` — the swarm clock-drift driver.
//!
//! # Segment loop
//!
//! ```text
//! for segment in timeline (ascending start frame):
//!   reset every unit's clock to start_frame, forget positions
//!   tick 0        — place every unit (frame length 0)
//!   ticks 1..=N   — for each unit (parallel with the `parallel` feature):
//!                     ① DriftPolicy::advance, saturating at end_frame
//!                     ② UnitRunState::update_position
//!                   then, sequentially in ascending UnitId:
//!                     ③ velocity = frame_length × frame_rate
//!                     ④ fold into per-unit and swarm maxima
//!                     ⑤ SwarmObserver::on_tick
//! ```
//!
//! Distances and maxima carry across segments; the [`SwarmReport`] is
//! produced once at the end.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs per-unit updates on Rayon's thread pool.          |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fls_core::SwarmConfig;
//! use fls_sim::{NoopObserver, SimBuilder};
//!
//! let timeline = fls_curve::load_timeline_json(curves)?;
//! let offsets = fls_motion::load_offsets_json(coords)?;
//! let mut sim = SimBuilder::new(SwarmConfig::default(), timeline, offsets).build()?;
//! let report = sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod record;
pub mod report;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SwarmObserver};
pub use record::UnitTickRecord;
pub use report::{ReportBuilder, StepPeak, SwarmReport, UnitSummary, VelocityPeak};
pub use sim::Sim;
