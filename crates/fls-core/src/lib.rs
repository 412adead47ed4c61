//! `fls-core` — foundational types for the FLS swarm simulator.
//!
//! Every other `fls-*` crate depends on this one.  It has no `fls-*`
//! dependencies and only `nalgebra` and `thiserror` externally, plus optional
//! `serde`.
//!
//! # What lives here
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`ids`]     | `UnitId`, `SegmentId`                                 |
//! | [`geo`]     | `Position` (world-space 3-vector), distance helpers   |
//! | [`time`]    | `Frame`, `LogicalClock`                               |
//! | [`config`]  | `SwarmConfig`, `DriftModel`                           |
//! | [`error`]   | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{DriftModel, SwarmConfig};
pub use error::{CoreError, CoreResult};
pub use geo::Position;
pub use ids::{SegmentId, UnitId};
pub use time::{Frame, LogicalClock};
